//! Cleaning and classification of the generation tool's output

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::models::IMAGE_SENTINEL_PREFIX;
use crate::utils::resolve_image_path;

/// Spinner frames and the loading label the tool prints while waiting
static SPINNER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[⣾⣽⣻⢿⡿⣟⣯⣷]|Loading").expect("spinner pattern is valid"));

static BLANK_LINES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

// Only .jpg is recognised; other extensions fall through to text
static SAVED_IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Saved image as (\S+\.jpg)").expect("saved image pattern is valid")
});

pub const NO_RESPONSE_TEXT: &str = "No response received";
pub const IMAGE_NOT_FOUND_TEXT: &str = "Error: Image file not found";

/// Classified result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Text(String),
    Image { name: String, path: PathBuf },
    /// Full user-facing message, already prefixed with `Error: `
    Error(String),
}

impl Outcome {
    pub fn error(detail: impl std::fmt::Display) -> Self {
        Outcome::Error(format!("Error: {}", detail))
    }

    /// Text stored in the transcript for this outcome
    pub fn transcript_text(&self) -> String {
        match self {
            Outcome::Text(text) | Outcome::Error(text) => text.clone(),
            Outcome::Image { name, .. } => format!("{}{}", IMAGE_SENTINEL_PREFIX, name),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Strip spinner noise, collapse blank-line runs, trim
pub fn clean_output(text: &str) -> String {
    let without_spinner = SPINNER_PATTERN.replace_all(text, "");
    let collapsed = BLANK_LINES_PATTERN.replace_all(&without_spinner, "\n");
    collapsed.trim().to_string()
}

/// Extract the image file name from a "Saved image as <name>.jpg" line
pub fn saved_image_name(stdout: &str) -> Option<&str> {
    SAVED_IMAGE_PATTERN.captures(stdout).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Classify cleaned stdout and raw stderr, in priority order:
/// saved image, then stderr, then plain text
pub fn classify(stdout: &str, stderr: &str, image_dir: &Path) -> Outcome {
    if let Some(name) = saved_image_name(stdout) {
        return match resolve_image_path(image_dir, name) {
            Ok(path) if path.is_file() => Outcome::Image { name: name.to_string(), path },
            Ok(path) => {
                warn!(path = %path.display(), "Tool reported an image that does not exist");
                Outcome::Error(IMAGE_NOT_FOUND_TEXT.to_string())
            }
            Err(e) => {
                warn!("Rejected image name from tool output: {:#}", e);
                Outcome::Error(IMAGE_NOT_FOUND_TEXT.to_string())
            }
        };
    }

    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return Outcome::error(stderr);
    }

    if stdout.is_empty() {
        Outcome::Text(NO_RESPONSE_TEXT.to_string())
    } else {
        Outcome::Text(stdout.to_string())
    }
}
