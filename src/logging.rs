use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::config::AppConfig;

/// Install the global tracing subscriber writing to the configured log file
///
/// The chat owns the terminal, so nothing is logged to stdout/stderr. `RUST_LOG`
/// directives are combined with `--log-level`.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let directive: Directive = config
        .log_directive
        .parse()
        .with_context(|| format!("Invalid log directive: {}", config.log_directive))?;

    if let Some(parent) = config.log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file: {}", config.log_file.display()))?;

    // A subscriber may already be installed (tests, embedding); keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    tracing::info!("tgpt-chat v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::*;
    use crate::config::GlobalOptions;

    #[test]
    fn test_invalid_directive_is_reported() {
        let dir = TempDir::new().unwrap();
        let options = GlobalOptions {
            history_file: Some(dir.path().join("chat_history.txt")),
            image_dir: Some(PathBuf::from("/images")),
            log_level: Some("tgpt_chat=loud".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&options).unwrap();

        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log directive: tgpt_chat=loud"));
        // Nothing is created before the directive is accepted
        assert!(!config.log_file.exists());
    }
}
