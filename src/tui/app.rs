//! TUI application state and event handling.
//!
//! The `App` struct owns the [`ChatController`] (and through it the history and the
//! dispatcher) plus the input line, and runs the main event loop via `run()`:
//!
//! - **Completions**: finished tool requests are drained each tick on this thread
//! - **Input**: typed text is submitted with Enter; Ctrl+G toggles image mode
//! - **Scrolling**: offset from the bottom, reset whenever a new turn arrives
//! - **Dirty state tracking**: redraw only when state changes (or every 100ms for resizes)

use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::warn;

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use super::view::ChatView;
use crate::clipboard::copy_to_clipboard;
use crate::controller::{ChatController, SubmitStatus};
use crate::presenter::Presenter;

/// Maximum input length in characters
const MAX_INPUT_CHARS: usize = 4096;
const PAGE_SCROLL: usize = 10;

pub struct App {
    controller: ChatController<ChatView>,
    input: String,
    image_mode: bool,
    scroll_offset: usize,
    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(controller: ChatController<ChatView>) -> Self {
        Self {
            controller,
            input: String::new(),
            image_mode: false,
            scroll_offset: 0,
            should_quit: false,
            needs_redraw: true, // Initial draw needed
            last_draw_time: Instant::now(),
        }
    }

    /// Give back the controller so the caller can flush history
    pub fn into_controller(self) -> ChatController<ChatView> {
        self.controller
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            if self.controller.poll() > 0 {
                self.scroll_offset = 0;
            }
            self.controller.presenter_mut().clear_expired_status();
            if self.controller.presenter_mut().take_dirty() {
                self.needs_redraw = true;
            }

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                let message_count = self.controller.sessions().current_session().messages.len();
                terminal.draw(|f| {
                    let state = RenderState {
                        input: &self.input,
                        image_mode: self.image_mode,
                        scroll_offset: self.scroll_offset,
                        message_count,
                    };
                    render_ui(f, self.controller.presenter(), &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearInput => {
                if self.input.is_empty() {
                    self.should_quit = true;
                } else {
                    self.input.clear();
                    self.needs_redraw = true;
                }
            }
            Action::Submit => self.submit(),
            Action::ToggleImageMode => {
                self.image_mode = !self.image_mode;
                self.needs_redraw = true;
            }
            Action::CopyLastResponse => self.copy_last_response(),
            Action::ScrollUp => self.scroll(1),
            Action::ScrollDown => self.scroll(-1),
            Action::PageUp => self.scroll(PAGE_SCROLL as isize),
            Action::PageDown => self.scroll(-(PAGE_SCROLL as isize)),
            Action::InsertChar(c) => {
                if self.input.chars().count() < MAX_INPUT_CHARS {
                    self.input.push(c);
                    self.needs_redraw = true;
                }
            }
            Action::DeleteChar => {
                if self.input.pop().is_some() {
                    self.needs_redraw = true;
                }
            }
            Action::None => {}
        }
    }

    fn submit(&mut self) {
        match self.controller.submit(&self.input, self.image_mode) {
            SubmitStatus::Dispatched(_) | SubmitStatus::Failed => {
                self.input.clear();
                self.scroll_offset = 0;
            }
            // Keep the draft so it can be sent once the response arrives
            SubmitStatus::Busy => {}
            SubmitStatus::Empty => self.input.clear(),
        }
        self.needs_redraw = true;
    }

    fn scroll(&mut self, delta: isize) {
        let old = self.scroll_offset;
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
        if old != self.scroll_offset {
            self.needs_redraw = true;
        }
    }

    fn copy_last_response(&mut self) {
        let text = self.controller.last_response().map(|m| m.text.clone());
        let view = self.controller.presenter_mut();
        match text {
            None => view.notify("No response to copy", true),
            Some(text) => match copy_to_clipboard(&text) {
                Ok(()) => view.notify("Copied to clipboard", false),
                Err(e) => {
                    warn!("Clipboard copy failed: {:#}", e);
                    view.notify(&format!("Clipboard error: {}", e), true);
                }
            },
        }
    }
}
