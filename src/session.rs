//! Current-session bookkeeping on top of the history store

use anyhow::Result;
use tracing::debug;

use crate::history::{HistoryStore, SessionIndex};
use crate::models::{Message, Session, now_timestamp};

/// Stamps and records messages into the session started for this run
#[derive(Debug)]
pub struct SessionManager {
    store: HistoryStore,
    current: SessionIndex,
}

impl SessionManager {
    /// Start a new session stamped with the current time
    pub fn start(store: HistoryStore) -> Self {
        Self::start_at(store, now_timestamp())
    }

    pub fn start_at(mut store: HistoryStore, timestamp: impl Into<String>) -> Self {
        let current = store.start_session(timestamp);
        debug!(session = current, "Started new session");
        Self { store, current }
    }

    pub fn record_user_message(&mut self, text: impl Into<String>) -> Result<()> {
        self.record(true, text.into())
    }

    pub fn record_response_message(&mut self, text: impl Into<String>) -> Result<()> {
        self.record(false, text.into())
    }

    fn record(&mut self, is_user: bool, text: String) -> Result<()> {
        let message = Message::new(now_timestamp(), is_user, text);
        self.store.append(self.current, message)
    }

    pub fn current_session(&self) -> &Session {
        &self.store.sessions()[self.current]
    }

    /// Sessions loaded from the transcript, excluding the current one
    pub fn previous_sessions(&self) -> &[Session] {
        &self.store.sessions()[..self.current]
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Persist everything, including a current session that has no messages yet
    pub fn flush(&self) -> Result<()> {
        self.store.persist()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_start_appends_after_loaded_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.txt");
        std::fs::write(
            &path,
            "--- Session started at 2024-01-15 10:30:00 ---\n2024-01-15 10:30:05 | user | old\n",
        )
        .unwrap();

        let manager = SessionManager::start_at(HistoryStore::open(&path), "2024-02-01 08:00:00");

        assert_eq!(manager.previous_sessions().len(), 1);
        assert_eq!(manager.current_session().timestamp, "2024-02-01 08:00:00");
        assert!(manager.current_session().messages.is_empty());
    }

    #[test]
    fn test_record_messages_into_current_session() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("chat_history.txt"));
        let mut manager = SessionManager::start(store);

        manager.record_user_message("hello").unwrap();
        manager.record_response_message("hi!").unwrap();

        let messages = &manager.current_session().messages;
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "hello");
        assert!(!messages[1].is_user);
        assert_eq!(messages[1].text, "hi!");
    }

    #[test]
    fn test_flush_writes_empty_session_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.txt");
        let manager = SessionManager::start_at(HistoryStore::new(&path), "2024-02-01 08:00:00");

        manager.flush().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "--- Session started at 2024-02-01 08:00:00 ---\n"
        );
    }
}
