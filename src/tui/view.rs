use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::presenter::Presenter;
use crate::utils::strip_ansi_codes;

/// Duration for success status messages (milliseconds)
pub const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
pub const STATUS_ERROR_DURATION_MS: u64 = 5000;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// One renderable entry in the chat pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatItem {
    SessionMarker(String),
    Bubble { text: String, is_user: bool },
    Image(PathBuf),
}

/// Chat pane contents; the terminal UI's [`Presenter`]
#[derive(Debug, Default)]
pub struct ChatView {
    items: Vec<ChatItem>,
    pending: bool,
    status_message: Option<StatusMessage>,
    dirty: bool,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ChatItem] {
        &self.items
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    /// Set a transient status message with automatic expiry
    pub fn set_status(
        &mut self,
        text: impl Into<String>,
        message_type: MessageType,
        duration_ms: u64,
    ) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.dirty = true;
    }

    /// Clear the status message once expired; returns true if one was cleared
    pub fn clear_expired_status(&mut self) -> bool {
        let expired = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if expired {
            self.status_message = None;
            self.dirty = true;
        }
        expired
    }

    /// Whether anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn push(&mut self, item: ChatItem) {
        self.items.push(item);
        self.dirty = true;
    }
}

impl Presenter for ChatView {
    fn render_text_bubble(&mut self, text: &str, is_user: bool) {
        self.push(ChatItem::Bubble { text: strip_ansi_codes(text), is_user });
    }

    fn render_image(&mut self, path: &Path) {
        debug!(path = %path.display(), "Showing generated image");
        self.push(ChatItem::Image(path.to_path_buf()));
    }

    fn render_session_marker(&mut self, timestamp: &str) {
        self.push(ChatItem::SessionMarker(timestamp.to_string()));
    }

    fn show_transient_indicator(&mut self) {
        self.pending = true;
        self.dirty = true;
    }

    fn dismiss_transient_indicator(&mut self) {
        self.pending = false;
        self.dirty = true;
    }

    fn notify(&mut self, text: &str, is_error: bool) {
        if is_error {
            self.set_status(format!("✗ {}", text), MessageType::Error, STATUS_ERROR_DURATION_MS);
        } else {
            self.set_status(
                format!("✓ {}", text),
                MessageType::Success,
                STATUS_SUCCESS_DURATION_MS,
            );
        }
    }
}
