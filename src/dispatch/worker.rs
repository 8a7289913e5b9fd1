use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::command::{ToolConfig, ToolRequest, execute};
use super::output::Outcome;

/// Result of one background invocation, posted back to the controlling thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request_id: u64,
    pub outcome: Outcome,
}

/// Runs tool invocations on short-lived threads
///
/// Worker threads only own their request and a sender; completions are drained
/// serially by whoever owns the dispatcher.
pub struct Dispatcher {
    config: ToolConfig,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    next_id: u64,
}

impl Dispatcher {
    pub fn new(config: ToolConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { config, tx, rx, next_id: 1 }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Start a background invocation and return its request id without waiting
    pub fn spawn(&mut self, request: ToolRequest) -> Result<u64> {
        let request_id = self.next_id;
        self.next_id += 1;

        let config = self.config.clone();
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("tool-request-{}", request_id))
            .spawn(move || {
                let outcome = execute(&config, &request);
                if tx.send(Completion { request_id, outcome }).is_err() {
                    // Receiver dropped: the application is shutting down
                    debug!(request_id, "Dropping completion after shutdown");
                }
            })
            .context("Failed to start background request thread")?;

        debug!(request_id, "Dispatched tool request");
        Ok(request_id)
    }

    /// Next finished completion, if any, without blocking
    pub fn try_recv(&self) -> Option<Completion> {
        match self.rx.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Completion channel disconnected");
                None
            }
        }
    }

    /// Block until a completion arrives or `timeout` elapses
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Block until a completion arrives
    pub fn recv(&self) -> Option<Completion> {
        self.rx.recv().ok()
    }
}
