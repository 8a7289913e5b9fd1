//! Interactive terminal chat
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;
pub mod view;

use anyhow::Result;
pub use app::App;
use tracing::{error, info};
pub use view::{ChatItem, ChatView};

use self::terminal::ChatScreen;
use crate::config::AppConfig;
use crate::controller::ChatController;
use crate::dispatch::Dispatcher;
use crate::history::HistoryStore;
use crate::session::SessionManager;

/// Run the interactive chat until the user quits
pub fn run_interactive(config: &AppConfig) -> Result<()> {
    let store = HistoryStore::open(&config.history_file);
    let sessions = SessionManager::start(store);
    let dispatcher = Dispatcher::new(config.tool.clone());
    let mut controller = ChatController::new(sessions, dispatcher, ChatView::new());
    controller.replay_history();

    let mut screen = ChatScreen::enter()?;
    let mut app = App::new(controller);
    let res = app.run(screen.terminal_mut());
    let left = screen.leave();

    // Flush even when the loop failed so the session marker is not lost
    let mut controller = app.into_controller();
    if let Err(e) = controller.shutdown() {
        error!("Failed to save chat history on exit: {:#}", e);
    }
    info!("Chat closed");

    res.and(left)
}
