use serde::{Deserialize, Serialize};

/// Prefix marking a bot message that refers to a generated image file
pub const IMAGE_SENTINEL_PREFIX: &str = "Generated image: ";

/// Timestamp format shared by session markers and message records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: String,
    pub is_user: bool,
    pub text: String,
}

impl Message {
    pub fn new(timestamp: impl Into<String>, is_user: bool, text: impl Into<String>) -> Self {
        Self { timestamp: timestamp.into(), is_user, text: text.into() }
    }

    /// Sender label as written to the transcript
    pub fn sender(&self) -> &'static str {
        if self.is_user { "user" } else { "bot" }
    }

    /// File name of the generated image this message refers to, if any
    pub fn image_name(&self) -> Option<&str> {
        if self.is_user {
            return None;
        }
        self.text.strip_prefix(IMAGE_SENTINEL_PREFIX).map(str::trim).filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub timestamp: String,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self { timestamp: timestamp.into(), messages: Vec::new() }
    }
}

/// Current local time in the transcript timestamp format
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
