//! Runtime configuration resolved from command-line options and `$HOME`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::dispatch::ToolConfig;
use crate::utils::get_image_dir;

pub const DEFAULT_HISTORY_FILE: &str = "chat_history.txt";
pub const DEFAULT_TOOL: &str = "tgpt";
pub const DEFAULT_IMAGE_FLAG: &str = "-img";
pub const DEFAULT_LOG_DIRECTIVE: &str = "tgpt_chat=info";
const LOG_FILE_NAME: &str = "tgpt-chat.log";

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Chat transcript file [default: ./chat_history.txt]
    #[arg(long, global = true, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Folder where generated images are saved [default: ~/chatgpt/images]
    #[arg(long, global = true, value_name = "PATH")]
    pub image_dir: Option<PathBuf>,

    /// External generation tool to run [default: tgpt]
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Flag that switches the tool to image generation [default: -img]
    #[arg(long, global = true, value_name = "FLAG", allow_hyphen_values = true)]
    pub image_flag: Option<String>,

    /// Log file [default: next to the transcript]
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. "tgpt_chat=debug"
    #[arg(long, global = true, value_name = "DIRECTIVE")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub history_file: PathBuf,
    pub log_file: PathBuf,
    pub log_directive: String,
    pub tool: ToolConfig,
}

impl AppConfig {
    pub fn resolve(options: &GlobalOptions) -> Result<Self> {
        let history_file =
            options.history_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));
        let image_dir = match &options.image_dir {
            Some(dir) => dir.clone(),
            None => get_image_dir()?,
        };
        let log_file = options.log_file.clone().unwrap_or_else(|| {
            history_file.parent().map(|dir| dir.join(LOG_FILE_NAME)).unwrap_or_else(|| {
                PathBuf::from(LOG_FILE_NAME)
            })
        });

        Ok(Self {
            history_file,
            log_file,
            log_directive: options
                .log_level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVE.to_string()),
            tool: ToolConfig {
                program: options.tool.clone().unwrap_or_else(|| DEFAULT_TOOL.to_string()),
                image_flag: options
                    .image_flag
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IMAGE_FLAG.to_string()),
                image_dir,
            },
        })
    }
}
