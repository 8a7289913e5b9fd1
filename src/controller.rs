//! Turn-taking between the user, the history and the generation tool.
//!
//! [`ChatController`] owns all conversation state and is driven from a single
//! controlling thread:
//!
//! 1. [`submit`](ChatController::submit) records and renders the user's turn, then hands
//!    the prompt to the [`Dispatcher`] and returns immediately.
//! 2. [`poll`](ChatController::poll) drains finished requests, records each response and
//!    renders it.
//!
//! Only one request may be in flight at a time; a second submission is rejected with a
//! notice and leaves history untouched.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::dispatch::{Completion, Dispatcher, Outcome, ToolRequest};
use crate::models::Message;
use crate::presenter::Presenter;
use crate::session::SessionManager;
use crate::utils::resolve_image_path;

pub const BUSY_NOTICE: &str = "Still waiting for the previous response";

/// What happened to a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Dispatched(u64),
    /// Blank input, nothing recorded
    Empty,
    /// Another request is in flight, nothing recorded
    Busy,
    /// The background thread could not be started; an error response was recorded
    Failed,
}

pub struct ChatController<P: Presenter> {
    sessions: SessionManager,
    dispatcher: Dispatcher,
    presenter: P,
    in_flight: Option<u64>,
}

impl<P: Presenter> ChatController<P> {
    pub fn new(sessions: SessionManager, dispatcher: Dispatcher, presenter: P) -> Self {
        Self { sessions, dispatcher, presenter, in_flight: None }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Render every stored session, ending with the marker of the current one
    pub fn replay_history(&mut self) {
        let image_dir = &self.dispatcher.config().image_dir;
        for session in self.sessions.store().sessions() {
            self.presenter.render_session_marker(&session.timestamp);
            for message in &session.messages {
                render_stored_message(&mut self.presenter, message, image_dir);
            }
        }
    }

    /// Record the user's turn and start the tool in the background
    pub fn submit(&mut self, text: &str, image_mode: bool) -> SubmitStatus {
        let text = text.trim();
        if text.is_empty() {
            return SubmitStatus::Empty;
        }
        if self.in_flight.is_some() {
            self.presenter.notify(BUSY_NOTICE, true);
            return SubmitStatus::Busy;
        }

        // The user's turn is durable before the tool runs
        self.presenter.render_text_bubble(text, true);
        if let Err(e) = self.sessions.record_user_message(text) {
            self.presenter.notify(&format!("Failed to save chat history: {:#}", e), true);
        }

        self.presenter.show_transient_indicator();
        let request = ToolRequest { prompt: text.to_string(), image_mode };
        match self.dispatcher.spawn(request) {
            Ok(request_id) => {
                info!(request_id, image_mode, "Submitted prompt");
                self.in_flight = Some(request_id);
                SubmitStatus::Dispatched(request_id)
            }
            Err(e) => {
                // Treated like a launch failure; the turn still gets a response
                error!("Failed to dispatch request: {:#}", e);
                self.handle_outcome(Outcome::error(format!("{:#}", e)));
                SubmitStatus::Failed
            }
        }
    }

    /// Handle every completion that has already arrived; returns how many were handled
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completion) = self.dispatcher.try_recv() {
            self.handle_completion(completion);
            handled += 1;
        }
        handled
    }

    /// Block until the in-flight request completes or `timeout` elapses
    ///
    /// Returns false when nothing was in flight or the wait timed out.
    pub fn wait_for_response(&mut self, timeout: Option<Duration>) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        let completion = match timeout {
            Some(timeout) => self.dispatcher.recv_timeout(timeout),
            None => self.dispatcher.recv(),
        };
        match completion {
            Some(completion) => {
                self.handle_completion(completion);
                true
            }
            None => false,
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        if self.in_flight != Some(completion.request_id) {
            warn!(request_id = completion.request_id, "Completion for unknown request");
        }
        self.in_flight = None;
        self.handle_outcome(completion.outcome);
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        self.presenter.dismiss_transient_indicator();

        if let Err(e) = self.sessions.record_response_message(outcome.transcript_text()) {
            self.presenter.notify(&format!("Failed to save chat history: {:#}", e), true);
        }

        match outcome {
            Outcome::Image { path, .. } => self.presenter.render_image(&path),
            Outcome::Text(text) => self.presenter.render_text_bubble(&text, false),
            Outcome::Error(text) => self.presenter.render_text_bubble(&text, false),
        }
    }

    /// Most recent bot message of this run
    pub fn last_response(&self) -> Option<&Message> {
        self.sessions.current_session().messages.iter().rev().find(|m| !m.is_user)
    }

    /// Persist the full history before exit
    pub fn shutdown(&mut self) -> anyhow::Result<()> {
        if self.in_flight.is_some() {
            info!("Exiting with a request still in flight");
        }
        self.sessions.flush()
    }
}

fn render_stored_message<P: Presenter>(
    presenter: &mut P,
    message: &Message,
    image_dir: &std::path::Path,
) {
    if let Some(name) = message.image_name()
        && let Ok(path) = resolve_image_path(image_dir, name)
        && path.is_file()
    {
        presenter.render_image(&path);
        return;
    }
    presenter.render_text_bubble(&message.text, message.is_user);
}
