//! Terminal output sanitization
//!
//! Responses come straight from an external tool and are drawn into the chat pane.
//! Escape sequences in that text would fight with the TUI's own drawing (cursor moves,
//! colour changes, window-title updates), so bot text goes through [`strip_ansi_codes`]
//! before it reaches a widget. The transcript keeps the text exactly as received.

/// Strips ANSI escape sequences and stray control characters
///
/// Removes CSI sequences (`ESC [ ... letter`) and OSC sequences (`ESC ] ... BEL` or
/// `ESC ] ... ESC \`). Tab, newline and carriage return are kept.
///
/// # Examples
///
/// ```
/// use tgpt_chat::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[32mHello\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Hello");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Skip until the final byte of the CSI sequence
                    for next_ch in chars.by_ref() {
                        if next_ch.is_ascii_alphabetic() {
                            break;
                        }
                    }
                    continue;
                }
                Some(']') => {
                    chars.next();
                    while let Some(next_ch) = chars.next() {
                        if next_ch == '\x07' {
                            break;
                        }
                        if next_ch == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => continue,
            }
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}
