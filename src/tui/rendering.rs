use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::layout::AppLayout;
use super::timestamps::format_session_age;
use super::view::{ChatItem, ChatView, MessageType};
use crate::utils::format_path_with_tilde;

/// Widest a chat bubble may get, in terminal columns
const MAX_BUBBLE_WIDTH: usize = 60;

const MUTED: Color = Color::Rgb(154, 154, 154);
const TEXT: Color = Color::Rgb(224, 224, 224);
const BORDER: Color = Color::Rgb(68, 68, 68);
const USER_BG: Color = Color::Rgb(110, 72, 170);
const BOT_BG: Color = Color::Rgb(45, 45, 45);
const IMAGE_ACCENT: Color = Color::Rgb(50, 205, 50);
const ERROR: Color = Color::Rgb(239, 68, 68);
const STATUS_BG: Color = Color::Rgb(24, 24, 27);

/// Per-frame state that lives outside the chat view
pub struct RenderState<'a> {
    pub input: &'a str,
    pub image_mode: bool,
    /// Lines scrolled up from the bottom of the conversation
    pub scroll_offset: usize,
    pub message_count: usize,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, view: &ChatView, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_chat(frame, layout.chat_area, view, state.scroll_offset);
    render_input(frame, layout.input_area, state);
    render_status_bar(frame, layout.status_area, view, state);
}

fn render_chat(frame: &mut Frame, area: Rect, view: &ChatView, scroll_offset: usize) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_rows = area.height.saturating_sub(2) as usize;
    let lines = chat_lines(view, inner_width);

    // Pin to the bottom unless the user scrolled up
    let max_offset = lines.len().saturating_sub(visible_rows);
    let top = max_offset - scroll_offset.min(max_offset);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER))
                .title(" Chat "),
        )
        .scroll((top.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(paragraph, area);
}

/// Flatten the chat items into display lines for a pane `width` columns wide
pub fn chat_lines(view: &ChatView, width: usize) -> Vec<Line<'static>> {
    let bubble_width = width.saturating_sub(4).clamp(1, MAX_BUBBLE_WIDTH);
    let mut lines = Vec::new();

    for item in view.items() {
        match item {
            ChatItem::SessionMarker(timestamp) => {
                let label = match format_session_age(timestamp) {
                    Some(age) => format!("--- Session started at {} ({}) ---", timestamp, age),
                    None => format!("--- Session started at {} ---", timestamp),
                };
                lines.push(Line::from(""));
                lines.push(
                    Line::from(Span::styled(label, Style::default().fg(MUTED)))
                        .alignment(Alignment::Center),
                );
            }
            ChatItem::Bubble { text, is_user } => {
                lines.push(Line::from(""));
                push_bubble(&mut lines, text, *is_user, bubble_width);
            }
            ChatItem::Image(path) => {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("🖼  ", Style::default().fg(IMAGE_ACCENT)),
                    Span::styled(
                        format_path_with_tilde(path),
                        Style::default().fg(IMAGE_ACCENT).add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
        }
    }

    if view.is_pending() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Waiting for response...",
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn push_bubble(lines: &mut Vec<Line<'static>>, text: &str, is_user: bool, width: usize) {
    let (alignment, style) = if is_user {
        (Alignment::Right, Style::default().fg(Color::Rgb(250, 250, 250)).bg(USER_BG))
    } else {
        (Alignment::Left, Style::default().fg(TEXT).bg(BOT_BG))
    };

    for raw_line in text.split('\n') {
        // "### " headings from the tool are shown bold, set off by blank lines
        if !is_user && let Some(heading) = raw_line.strip_prefix("### ") {
            lines.push(Line::from(""));
            for chunk in wrap_text(heading, width) {
                lines.push(
                    Line::from(Span::styled(chunk, style.add_modifier(Modifier::BOLD)))
                        .alignment(alignment),
                );
            }
            lines.push(Line::from(""));
            continue;
        }

        for chunk in wrap_text(raw_line, width) {
            lines.push(Line::from(Span::styled(format!(" {} ", chunk), style)).alignment(alignment));
        }
    }
}

/// Greedy word wrap on display columns; words wider than `width` are split
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split(' ') {
        let word_width = UnicodeWidthStr::width(word);
        let needed = if current.is_empty() { word_width } else { current_width + 1 + word_width };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Word alone is too wide for a line
        for ch in word.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    out.push(current);
    out
}

/// Longest suffix of `text` that fits in `width` columns, with its width
fn visible_tail(text: &str, width: usize) -> (&str, usize) {
    let mut start = text.len();
    let mut used = 0;
    for (idx, ch) in text.char_indices().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        start = idx;
    }
    (&text[start..], used)
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (title, border) = if state.image_mode {
        (" Message [IMAGE] ", Style::default().fg(IMAGE_ACCENT))
    } else {
        (" Message ", Style::default().fg(BORDER))
    };

    // Keep the end of long input visible
    let inner_width = area.width.saturating_sub(3) as usize;
    let (visible, visible_width) = visible_tail(state.input, inner_width);
    let cursor_x = area.x + 1 + visible_width as u16;

    let content = if state.input.is_empty() {
        Span::styled("Write a message...", Style::default().fg(MUTED))
    } else {
        Span::styled(visible.to_string(), Style::default().fg(TEXT))
    };

    let paragraph = Paragraph::new(Line::from(content))
        .block(Block::default().borders(Borders::ALL).border_style(border).title(title));
    frame.render_widget(paragraph, area);

    let cursor_x = if state.input.is_empty() { area.x + 1 } else { cursor_x };
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_status_bar(frame: &mut Frame, area: Rect, view: &ChatView, state: &RenderState) {
    let (status_text, style) = if let Some(msg) = view.status_message() {
        let fg = match msg.message_type {
            MessageType::Success => IMAGE_ACCENT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", msg.text), Style::default().fg(fg).bg(STATUS_BG))
    } else {
        let mut parts = vec![];

        // Mode indicator
        parts.push(if state.image_mode { "[IMAGE]" } else { "[TEXT]" }.to_string());
        parts.push(format!("{} messages", state.message_count));
        if view.is_pending() {
            parts.push("waiting...".to_string());
        }
        if state.scroll_offset > 0 {
            parts.push(format!("scrolled {}", state.scroll_offset));
        }

        // Keybindings
        parts.push("Enter: send".to_string());
        parts.push("Ctrl+G: image".to_string());
        parts.push("Ctrl+Y: copy".to_string());
        parts.push("Ctrl+C: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(TEXT).bg(STATUS_BG))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}
