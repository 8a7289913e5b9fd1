//! Running the external generation tool off the controlling thread
//!
//! Each request gets its own thread which runs the tool once, cleans and classifies
//! the output into an [`Outcome`], and sends a [`Completion`] back over a channel.
//! Worker threads never see the history store; the controlling thread records the
//! result when it drains the channel.

pub mod command;
pub mod output;
pub mod worker;

pub use command::{RawOutput, ToolConfig, ToolRequest, execute, run_tool};
pub use output::{Outcome, classify, clean_output};
pub use worker::{Completion, Dispatcher};
