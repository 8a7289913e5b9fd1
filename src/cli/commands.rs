use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use super::headless::StdoutPresenter;
use crate::config::{AppConfig, GlobalOptions};
use crate::controller::{ChatController, SubmitStatus};
use crate::dispatch::Dispatcher;
use crate::history::{HistoryStore, serialize_transcript};
use crate::logging::init_logging;
use crate::models::Session;
use crate::session::SessionManager;
use crate::tui::run_interactive;
use crate::utils::format_path_with_tilde;

#[derive(Parser)]
#[command(name = "tgpt-chat")]
#[command(version)]
#[command(about = "Chat with tgpt from the terminal, keeping a plain-text history", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about the chat history
    Stats,
    /// Print the chat history
    Export {
        /// Print sessions as JSON instead of the transcript format
        #[arg(long)]
        json: bool,
    },
    /// Send a single prompt and print the response
    Ask {
        /// Prompt to send
        prompt: String,
        /// Generate an image instead of text
        #[arg(long)]
        image: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.options)?;
    init_logging(&config)?;

    match &cli.command {
        Some(Commands::Stats) => show_stats(&config)?,
        Some(Commands::Export { json }) => export(&config, *json)?,
        Some(Commands::Ask { prompt, image }) => ask(&config, prompt, *image)?,
        None => run_interactive(&config)?,
    }

    Ok(())
}

/// Counts shown by the `stats` command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub sessions: usize,
    pub user_messages: usize,
    pub bot_messages: usize,
    pub images: usize,
}

impl HistoryStats {
    pub fn collect(sessions: &[Session]) -> Self {
        let mut stats = Self { sessions: sessions.len(), ..Default::default() };
        for message in sessions.iter().flat_map(|s| &s.messages) {
            if message.is_user {
                stats.user_messages += 1;
            } else {
                stats.bot_messages += 1;
                if message.image_name().is_some() {
                    stats.images += 1;
                }
            }
        }
        stats
    }
}

fn show_stats(config: &AppConfig) -> Result<()> {
    let store = HistoryStore::open_read_only(&config.history_file)?;
    let sessions = store.sessions();
    let stats = HistoryStats::collect(sessions);

    println!("Chat History Statistics");
    println!("=======================");
    println!("Sessions: {}", stats.sessions);
    println!("Total messages: {}", stats.user_messages + stats.bot_messages);
    println!("  User messages: {}", stats.user_messages);
    println!("  Bot responses: {}", stats.bot_messages);
    println!("  Generated images: {}", stats.images);
    println!();
    println!("History file: {}", format_path_with_tilde(&config.history_file));

    if let Some(first) = sessions.first() {
        println!("First session: {}", first.timestamp);
    }
    if let Some(last) = sessions.last() {
        println!("Last session: {}", last.timestamp);
    }

    Ok(())
}

fn export(config: &AppConfig, json: bool) -> Result<()> {
    let store = HistoryStore::open_read_only(&config.history_file)?;
    if json {
        let out = serde_json::to_string_pretty(store.sessions())
            .context("Failed to serialize chat history")?;
        println!("{}", out);
    } else {
        print!("{}", serialize_transcript(store.sessions()));
    }
    Ok(())
}

fn ask(config: &AppConfig, prompt: &str, image: bool) -> Result<()> {
    let store = HistoryStore::open(&config.history_file);
    let sessions = SessionManager::start(store);
    let dispatcher = Dispatcher::new(config.tool.clone());
    let mut controller = ChatController::new(sessions, dispatcher, StdoutPresenter::new());

    match controller.submit(prompt, image) {
        SubmitStatus::Dispatched(_) => {
            controller.wait_for_response(None);
        }
        SubmitStatus::Empty => anyhow::bail!("Prompt is empty"),
        SubmitStatus::Busy | SubmitStatus::Failed => {}
    }

    controller.shutdown()
}
