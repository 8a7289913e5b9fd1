use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::output::{Outcome, classify, clean_output};

/// How to invoke the external generation tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub program: String,
    pub image_flag: String,
    pub image_dir: PathBuf,
}

/// A single prompt to send to the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub prompt: String,
    pub image_mode: bool,
}

/// Captured output of a finished tool process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolConfig {
    /// Build the process for `request`; image mode runs inside the image directory
    pub fn build_command(&self, request: &ToolRequest) -> Command {
        let mut command = Command::new(&self.program);
        if request.image_mode {
            command.arg(&self.image_flag).current_dir(&self.image_dir);
        }
        command.arg(&request.prompt).stdin(Stdio::null());
        command
    }
}

/// Run the tool to completion and capture stdout/stderr
///
/// Blocks the calling thread until the process exits.
pub fn run_tool(config: &ToolConfig, request: &ToolRequest) -> Result<RawOutput> {
    if request.image_mode {
        fs::create_dir_all(&config.image_dir).with_context(|| {
            format!("Failed to create image directory: {}", config.image_dir.display())
        })?;
    }

    let output = config
        .build_command(request)
        .output()
        .with_context(|| format!("Failed to run {}", config.program))?;

    let raw = RawOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    info!(
        program = %config.program,
        image_mode = request.image_mode,
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Tool finished"
    );
    debug!(stdout = %raw.stdout, stderr = %raw.stderr, "Tool output");
    Ok(raw)
}

/// Run the tool and turn whatever happens into an [`Outcome`]
pub fn execute(config: &ToolConfig, request: &ToolRequest) -> Outcome {
    match run_tool(config, request) {
        Ok(raw) => classify(&clean_output(&raw.stdout), &raw.stderr, &config.image_dir),
        Err(e) => {
            tracing::error!("Error executing command: {:#}", e);
            Outcome::error(format!("{:#}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use tempfile::TempDir;

    use super::*;

    fn config(program: &str, image_dir: PathBuf) -> ToolConfig {
        ToolConfig { program: program.to_string(), image_flag: "-img".to_string(), image_dir }
    }

    #[test]
    fn test_build_command_text_mode() {
        let cfg = config("tgpt", PathBuf::from("/tmp/images"));
        let request = ToolRequest { prompt: "hello world".to_string(), image_mode: false };
        let command = cfg.build_command(&request);

        assert_eq!(command.get_program(), OsStr::new("tgpt"));
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("hello world")]);
        assert_eq!(command.get_current_dir(), None);
    }

    #[test]
    fn test_build_command_image_mode() {
        let cfg = config("tgpt", PathBuf::from("/tmp/images"));
        let request = ToolRequest { prompt: "a cat".to_string(), image_mode: true };
        let command = cfg.build_command(&request);

        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("-img"), OsStr::new("a cat")]);
        assert_eq!(command.get_current_dir(), Some(std::path::Path::new("/tmp/images")));
    }

    #[test]
    fn test_execute_missing_program_is_error_outcome() {
        let dir = TempDir::new().unwrap();
        let cfg = config("definitely-not-a-real-tool-xyz", dir.path().to_path_buf());
        let request = ToolRequest { prompt: "hi".to_string(), image_mode: false };

        let outcome = execute(&cfg, &request);
        match outcome {
            Outcome::Error(text) => {
                assert!(text.starts_with("Error: Failed to run definitely-not-a-real-tool-xyz"))
            }
            other => panic!("expected error outcome, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_echo_is_text_outcome() {
        let dir = TempDir::new().unwrap();
        let cfg = config("echo", dir.path().to_path_buf());
        let request = ToolRequest { prompt: "Hello!".to_string(), image_mode: false };

        assert_eq!(execute(&cfg, &request), Outcome::Text("Hello!".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tool_image_mode_creates_directory() {
        let dir = TempDir::new().unwrap();
        let image_dir = dir.path().join("nested").join("images");
        let cfg = config("echo", image_dir.clone());
        let request = ToolRequest { prompt: "a cat".to_string(), image_mode: true };

        let raw = run_tool(&cfg, &request).unwrap();
        assert!(image_dir.is_dir());
        assert_eq!(raw.stdout.trim(), "-img a cat");
    }
}
