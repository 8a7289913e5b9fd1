//! Chat transcript storage
//!
//! # Error Handling Strategy
//!
//! The transcript is a user's only copy of their conversation, so nothing here is fatal:
//!
//! - **Malformed lines**: logged and skipped, the rest of the file still loads.
//! - **Unreadable file**: history is reset and a fresh, empty transcript is written.
//! - **Persist failures**: returned to the caller and logged; the in-memory sessions stay
//!   authoritative and the next persist rewrites everything.
//!
//! Writes go to `<transcript>.tmp` and are renamed over the transcript, so a crash leaves
//! either the previous or the new complete file on disk.

pub mod store;
pub mod transcript;

pub use store::{HistoryStore, SessionIndex};
pub use transcript::{parse_transcript, serialize_transcript};
