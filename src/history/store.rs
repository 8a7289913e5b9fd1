//! Transcript persistence with atomic writes

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};

use super::transcript::{parse_transcript, serialize_transcript};
use crate::models::{Message, Session};

/// Index of a session inside the store's session list
pub type SessionIndex = usize;

/// Owns the in-memory session list and the transcript file backing it
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    staging_path: PathBuf,
    sessions: Vec<Session>,
}

impl HistoryStore {
    /// Create an empty store for `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let staging_path = staging_path_for(&path);
        Self { path, staging_path, sessions: Vec::new() }
    }

    /// Create a store and load whatever transcript already exists at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    /// Load the transcript for inspection without ever writing to it
    ///
    /// Unlike [`open`](Self::open), an unreadable file is reported instead of reset.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        if let Some(content) = read_transcript(&store.path)? {
            store.sessions = parse_transcript(&content);
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Replace the in-memory sessions with the transcript contents
    ///
    /// A missing file yields an empty history. An unreadable file (I/O or UTF-8 failure)
    /// resets history and immediately rewrites a fresh, empty transcript.
    pub fn load(&mut self) -> &[Session] {
        match read_transcript(&self.path) {
            Ok(Some(content)) => {
                self.sessions = parse_transcript(&content);
                info!(
                    path = %self.path.display(),
                    sessions = self.sessions.len(),
                    "Loaded chat history"
                );
            }
            Ok(None) => {
                self.sessions = Vec::new();
            }
            Err(e) => {
                error!("Error loading chat history: {:#}. Resetting chat history.", e);
                self.sessions = Vec::new();
                if let Err(e) = self.persist() {
                    error!("Failed to rewrite chat history after reset: {:#}", e);
                }
            }
        }
        &self.sessions
    }

    /// Append a new empty session; it is written on the next persist
    pub fn start_session(&mut self, timestamp: impl Into<String>) -> SessionIndex {
        self.sessions.push(Session::new(timestamp));
        self.sessions.len() - 1
    }

    /// Append `message` to a session and persist the whole history
    ///
    /// The message stays in memory even when persisting fails.
    pub fn append(&mut self, session: SessionIndex, message: Message) -> Result<()> {
        let Some(target) = self.sessions.get_mut(session) else {
            bail!("Unknown session index {} ({} sessions)", session, self.sessions.len());
        };
        target.messages.push(message);
        self.persist()
    }

    /// Write all sessions to a sibling temp file, then rename it over the transcript
    pub fn persist(&self) -> Result<()> {
        let result = self.write_staging().and_then(|()| self.commit_staging());
        if let Err(e) = &result {
            warn!("Error saving chat history: {:#}", e);
        }
        result
    }

    pub(crate) fn write_staging(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let content = serialize_transcript(&self.sessions);
        let mut file = File::create(&self.staging_path).with_context(|| {
            format!("Failed to create history temp file: {}", self.staging_path.display())
        })?;
        file.write_all(content.as_bytes()).context("Failed to write history temp file")?;
        file.sync_all().context("Failed to sync history temp file")?;
        Ok(())
    }

    pub(crate) fn commit_staging(&self) -> Result<()> {
        fs::rename(&self.staging_path, &self.path).with_context(|| {
            format!("Failed to replace history file: {}", self.path.display())
        })
    }

    #[cfg(test)]
    pub(crate) fn staging_path(&self) -> &Path {
        &self.staging_path
    }
}

fn staging_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read the transcript as UTF-8; Ok(None) when it does not exist
fn read_transcript(path: &Path) -> Result<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read history file: {}", path.display()));
        }
    };
    let content = String::from_utf8(bytes)
        .with_context(|| format!("History file is not valid UTF-8: {}", path.display()))?;
    Ok(Some(content))
}
