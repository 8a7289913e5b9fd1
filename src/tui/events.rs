use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    ClearInput,
    Submit,
    ToggleImageMode,
    CopyLastResponse,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    InsertChar(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ClearInput,

        // Actions
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('g'), KeyModifiers::CONTROL) => Action::ToggleImageMode,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyLastResponse,

        // Scrolling
        (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        // Message input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InsertChar(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}
