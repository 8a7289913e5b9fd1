//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tgpt_chat::dispatch::ToolConfig;
use tgpt_chat::presenter::Presenter;

/// Builder for a scratch directory holding a transcript and an image folder
pub struct TranscriptBuilder {
    temp_dir: TempDir,
    lines: Vec<String>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, lines: Vec::new() }
    }

    /// Add a session marker line
    pub fn session(mut self, timestamp: &str) -> Self {
        self.lines.push(format!("--- Session started at {} ---", timestamp));
        self
    }

    pub fn user(mut self, timestamp: &str, text: &str) -> Self {
        self.lines.push(format!("{} | user | {}", timestamp, text.replace('\n', "\\n")));
        self
    }

    pub fn bot(mut self, timestamp: &str, text: &str) -> Self {
        self.lines.push(format!("{} | bot | {}", timestamp, text.replace('\n', "\\n")));
        self
    }

    /// Add a raw line verbatim (for malformed input)
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Create an image file in the image folder
    pub fn with_image(self, name: &str) -> Self {
        let dir = self.temp_dir.path().join("images");
        fs::create_dir_all(&dir).expect("Failed to create images dir");
        fs::write(dir.join(name), b"\xff\xd8\xff").expect("Failed to write image");
        self
    }

    /// Write the transcript and return the scratch directory
    pub fn build(self) -> TestDir {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        let dir = TestDir { temp_dir: self.temp_dir };
        fs::write(dir.history_file(), content).expect("Failed to write transcript");
        dir
    }

    /// Return the scratch directory without writing a transcript
    pub fn build_empty(self) -> TestDir {
        TestDir { temp_dir: self.temp_dir }
    }
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestDir {
    temp_dir: TempDir,
}

impl TestDir {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn history_file(&self) -> PathBuf {
        self.temp_dir.path().join("chat_history.txt")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.temp_dir.path().join("images")
    }

    pub fn read_history(&self) -> String {
        fs::read_to_string(self.history_file()).expect("Failed to read transcript")
    }

    pub fn tool(&self, program: &str) -> ToolConfig {
        ToolConfig {
            program: program.to_string(),
            image_flag: "-img".to_string(),
            image_dir: self.image_dir(),
        }
    }

    /// Image-mode tool that runs `script` through `sh` inside the image folder
    ///
    /// The script is passed where the image flag goes, so `sh <script> <prompt>` runs
    /// without exec-ing a freshly written file.
    pub fn scripted_image_tool(&self, script: &str) -> ToolConfig {
        let script_path = self.temp_dir.path().join("fake-tool.sh");
        fs::write(&script_path, script).expect("Failed to write tool script");
        ToolConfig {
            program: "sh".to_string(),
            image_flag: script_path.to_string_lossy().into_owned(),
            image_dir: self.image_dir(),
        }
    }
}

/// Presenter that records every call as a short string
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<String>,
}

impl RecordingPresenter {
    pub fn bubbles(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.starts_with("user:") || e.starts_with("bot:"))
            .map(String::as_str)
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render_text_bubble(&mut self, text: &str, is_user: bool) {
        self.events.push(format!("{}:{}", if is_user { "user" } else { "bot" }, text));
    }

    fn render_image(&mut self, path: &Path) {
        self.events.push(format!("image:{}", path.display()));
    }

    fn render_session_marker(&mut self, timestamp: &str) {
        self.events.push(format!("marker:{}", timestamp));
    }

    fn show_transient_indicator(&mut self) {
        self.events.push("indicator:on".to_string());
    }

    fn dismiss_transient_indicator(&mut self) {
        self.events.push("indicator:off".to_string());
    }

    fn notify(&mut self, text: &str, _is_error: bool) {
        self.events.push(format!("notice:{}", text));
    }
}
