//! Line format of the chat transcript
//!
//! ```text
//! --- Session started at 2024-01-15 10:30:00 ---
//! 2024-01-15 10:30:05 | user | Hello
//! 2024-01-15 10:30:09 | bot | Hi there!\nHow can I help?
//! ```

use tracing::{debug, warn};

use crate::models::{Message, Session};

const MARKER_PREFIX: &str = "--- Session started at ";
const MARKER_SUFFIX: &str = " ---";
const FIELD_DELIMITER: &str = " | ";

/// One classified transcript line
#[derive(Debug, PartialEq, Eq)]
pub enum TranscriptLine<'a> {
    SessionMarker(&'a str),
    Record(Message),
}

/// Escape literal newlines so a message fits on a single line
pub fn escape_text(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Restore newlines escaped by [`escape_text`]
pub fn unescape_text(text: &str) -> String {
    text.replace("\\n", "\n")
}

pub fn format_session_marker(timestamp: &str) -> String {
    format!("{}{}{}", MARKER_PREFIX, timestamp, MARKER_SUFFIX)
}

pub fn format_record(message: &Message) -> String {
    format!(
        "{}{}{}{}{}",
        message.timestamp,
        FIELD_DELIMITER,
        message.sender(),
        FIELD_DELIMITER,
        escape_text(&message.text)
    )
}

/// Classify a single line (without its terminator)
/// Returns None when the line is neither a marker nor a three-field record
pub fn parse_line(line: &str) -> Option<TranscriptLine<'_>> {
    if let Some(rest) = line.strip_prefix(MARKER_PREFIX) {
        let timestamp = rest.trim_end().strip_suffix(MARKER_SUFFIX).unwrap_or(rest).trim();
        return Some(TranscriptLine::SessionMarker(timestamp));
    }

    // Text is the remainder, so a delimiter inside the message survives a round-trip
    let mut fields = line.splitn(3, FIELD_DELIMITER);
    let (Some(timestamp), Some(sender), Some(text)) = (fields.next(), fields.next(), fields.next())
    else {
        return None;
    };

    Some(TranscriptLine::Record(Message::new(
        timestamp.trim(),
        sender.trim() == "user",
        unescape_text(text),
    )))
}

/// Parse transcript contents into sessions
/// Malformed lines and records preceding any session marker are logged and skipped
pub fn parse_transcript(content: &str) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();
    let mut skipped_count = 0;

    for (line_num, line) in content.lines().enumerate() {
        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(TranscriptLine::SessionMarker(timestamp)) => {
                sessions.push(Session::new(timestamp));
            }
            Some(TranscriptLine::Record(message)) => match sessions.last_mut() {
                Some(session) => session.messages.push(message),
                None => {
                    warn!(line = line_num + 1, "Skipping record before any session marker");
                    skipped_count += 1;
                }
            },
            None => {
                warn!(line = line_num + 1, content = line.trim(), "Skipping invalid line");
                skipped_count += 1;
            }
        }
    }

    debug!(sessions = sessions.len(), skipped = skipped_count, "Parsed transcript");
    sessions
}

/// Serialize sessions, each marker followed by its records, one per line
pub fn serialize_transcript(sessions: &[Session]) -> String {
    let mut out = String::new();
    for session in sessions {
        out.push_str(&format_session_marker(&session.timestamp));
        out.push('\n');
        for message in &session.messages {
            out.push_str(&format_record(message));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_marker() {
        let line = "--- Session started at 2024-01-15 10:30:00 ---";
        assert_eq!(parse_line(line), Some(TranscriptLine::SessionMarker("2024-01-15 10:30:00")));
    }

    #[test]
    fn test_parse_marker_trailing_whitespace() {
        let line = "--- Session started at 2024-01-15 10:30:00 ---  ";
        assert_eq!(parse_line(line), Some(TranscriptLine::SessionMarker("2024-01-15 10:30:00")));
    }

    #[test]
    fn test_parse_user_record() {
        let line = "2024-01-15 10:30:05 | user | Hello";
        let Some(TranscriptLine::Record(msg)) = parse_line(line) else {
            panic!("expected record");
        };
        assert_eq!(msg.timestamp, "2024-01-15 10:30:05");
        assert!(msg.is_user);
        assert_eq!(msg.text, "Hello");
    }

    #[test]
    fn test_parse_bot_record_unescapes_newlines() {
        let line = "2024-01-15 10:30:09 | bot | line one\\nline two";
        let Some(TranscriptLine::Record(msg)) = parse_line(line) else {
            panic!("expected record");
        };
        assert!(!msg.is_user);
        assert_eq!(msg.text, "line one\nline two");
    }

    #[test]
    fn test_parse_two_fields_is_invalid() {
        assert_eq!(parse_line("2024-01-15 10:30:05 | user"), None);
        assert_eq!(parse_line("garbage"), None);
    }

    #[test]
    fn test_delimiter_inside_text_is_kept() {
        let msg = Message::new("2024-01-15 10:30:05", true, "a | b | c");
        let line = format_record(&msg);
        assert_eq!(parse_line(&line), Some(TranscriptLine::Record(msg)));
    }

    #[test]
    fn test_format_record_escapes_newlines() {
        let msg = Message::new("2024-01-15 10:30:09", false, "Hi\nthere");
        assert_eq!(format_record(&msg), "2024-01-15 10:30:09 | bot | Hi\\nthere");
    }

    #[test]
    fn test_parse_transcript_groups_by_session() {
        let content = "\
--- Session started at 2024-01-15 10:30:00 ---
2024-01-15 10:30:05 | user | Hello
2024-01-15 10:30:09 | bot | Hi
--- Session started at 2024-01-16 09:00:00 ---
2024-01-16 09:00:03 | user | Again
";
        let sessions = parse_transcript(content);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].timestamp, "2024-01-15 10:30:00");
        assert_eq!(sessions[0].messages.len(), 2);
        assert_eq!(sessions[1].messages[0].text, "Again");
    }

    #[test]
    fn test_parse_transcript_skips_orphan_records() {
        let content = "\
2024-01-15 10:29:00 | user | orphan
--- Session started at 2024-01-15 10:30:00 ---
2024-01-15 10:30:05 | user | Hello
";
        let sessions = parse_transcript(content);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].messages.len(), 1);
        assert_eq!(sessions[0].messages[0].text, "Hello");
    }

    #[test]
    fn test_parse_transcript_crlf_and_blank_lines() {
        let content = "--- Session started at 2024-01-15 10:30:00 ---\r\n\r\n2024-01-15 10:30:05 | user | Hello\r\n";
        let sessions = parse_transcript(content);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].messages[0].text, "Hello");
    }

    #[test]
    fn test_serialize_empty_session_writes_marker() {
        let sessions = vec![Session::new("2024-01-15 10:30:00")];
        assert_eq!(
            serialize_transcript(&sessions),
            "--- Session started at 2024-01-15 10:30:00 ---\n"
        );
    }

    #[test]
    fn test_serialize_then_parse_preserves_sessions() {
        let mut session = Session::new("2024-01-15 10:30:00");
        session.messages.push(Message::new("2024-01-15 10:30:05", true, "multi\nline"));
        session.messages.push(Message::new("2024-01-15 10:30:09", false, "Generated image: a.jpg"));
        let sessions = vec![session, Session::new("2024-01-16 09:00:00")];

        let parsed = parse_transcript(&serialize_transcript(&sessions));
        assert_eq!(parsed, sessions);
    }
}
