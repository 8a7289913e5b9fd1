use std::io::{self, Stdout};
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type ChatBackend = CrosstermBackend<Stdout>;

static PANIC_HOOK: Once = Once::new();

/// The chat's alternate screen; the shell gets its normal screen back on
/// [`leave`](ChatScreen::leave), on drop, or when the process panics
pub struct ChatScreen {
    terminal: Terminal<ChatBackend>,
    active: bool,
}

impl ChatScreen {
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("Failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        Ok(Self { terminal, active: true })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<ChatBackend> {
        &mut self.terminal
    }

    pub fn leave(mut self) -> Result<()> {
        self.active = false;
        release(&mut self.terminal)
    }
}

impl Drop for ChatScreen {
    fn drop(&mut self) {
        if self.active {
            let _ = release(&mut self.terminal);
        }
    }
}

fn release(terminal: &mut Terminal<ChatBackend>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

// Drop does not run before the default hook prints, so the message would land on the
// alternate screen
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
            previous(info);
        }));
    });
}
