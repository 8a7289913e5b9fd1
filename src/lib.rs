//! tgpt-chat - A terminal chat front-end for the `tgpt` command-line tool
//!
//! Prompts are handed to an external generation tool on a background thread and the
//! conversation is kept in a plain-text transcript, one line per message, grouped into
//! sessions. It provides:
//!
//! - Parsing and atomically persisting the session-structured transcript
//! - Stamping user prompts and responses into the current session
//! - Running the tool off the UI thread and classifying its output (text, image, error)
//! - An interactive terminal UI plus `stats`, `export` and `ask` commands
//!
//! # Example
//!
//! ```no_run
//! use tgpt_chat::HistoryStore;
//!
//! let store = HistoryStore::open("chat_history.txt");
//! for session in store.sessions() {
//!     println!("{}: {} messages", session.timestamp, session.messages.len());
//! }
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod history;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod session;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use controller::{ChatController, SubmitStatus};
pub use dispatch::{Dispatcher, Outcome, ToolConfig, clean_output};
pub use history::HistoryStore;
pub use models::{Message, Session};
pub use presenter::Presenter;
pub use session::SessionManager;
pub use utils::format_path_with_tilde;
