use chrono::{Local, NaiveDateTime};

use crate::models::TIMESTAMP_FORMAT;

/// Relative age of a transcript timestamp for the session divider
/// - "just now", "45m ago", "3h ago", "5d ago" for the last week
/// - None for older sessions (the divider already shows the full date)
pub fn format_session_age(timestamp: &str) -> Option<String> {
    session_age_at(timestamp, Local::now().naive_local())
}

fn session_age_at(timestamp: &str, now: NaiveDateTime) -> Option<String> {
    let started = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    let duration = now.signed_duration_since(started);

    // Clock skew or a hand-edited transcript
    if duration.num_seconds() < 0 || duration.num_days() >= 7 {
        return None;
    }
    Some(format_relative(duration.num_seconds()))
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}
