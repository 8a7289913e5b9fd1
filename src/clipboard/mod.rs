//! Copying chat responses to the system clipboard

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

/// Largest response we are willing to put on the clipboard (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Clipboard backend (mocked in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Cannot copy empty text to clipboard");
    }
    if text.len() > MAX_CLIPBOARD_SIZE {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }
    Ok(())
}

fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy a response to the system clipboard
///
/// # Errors
/// Returns error if:
/// - Text is empty or whitespace
/// - Text is larger than 10MB
/// - The system clipboard is unavailable (headless session, no X11/Wayland)
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    // Validate before touching the clipboard so headless runs get the real reason
    validate_clipboard_text(text)?;
    let mut clipboard = SystemClipboard::new()?;
    copy_with_provider(text, &mut clipboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockClipboard {
        text: Option<String>,
        should_fail: bool,
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_copy_response_with_mock() {
        let mut mock = MockClipboard::default();
        copy_with_provider("Hi there\nsecond line", &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some("Hi there\nsecond line"));
    }

    #[test]
    fn test_copy_whitespace_rejected() {
        let mut mock = MockClipboard::default();
        let err = copy_with_provider("  \n", &mut mock).unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(mock.text.is_none());
    }

    #[test]
    fn test_copy_too_large_rejected() {
        let big = "x".repeat(MAX_CLIPBOARD_SIZE + 1);
        let err = copy_to_clipboard(&big).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut mock = MockClipboard { should_fail: true, ..Default::default() };
        let err = copy_with_provider("hello", &mut mock).unwrap_err();
        assert_eq!(err.to_string(), "Mock clipboard error");
    }
}
