//! Data models for the chat transcript.
//!
//! - [`Session`] - A run of messages that starts when the application launches
//! - [`Message`] - One user prompt or bot response
//!
//! Timestamps are kept as the formatted strings written to the transcript
//! (`YYYY-MM-DD HH:MM:SS`, local time) so a load/persist cycle never rewrites them.

pub mod session;

pub use session::{IMAGE_SENTINEL_PREFIX, Message, Session, TIMESTAMP_FORMAT, now_timestamp};
