use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// Which keymap is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Reading: letters are commands
    #[default]
    Normal,
    /// Typing a search term: letters are input
    Search,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// Esc: leave the search prompt, clear the search, or quit, in that order
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Home,
    End,
    StartSearch,
    NextMatch,
    PreviousMatch,
    CopyToClipboard,
    SearchInput(char),
    DeleteChar,
    Submit,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, mode: InputMode) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key, mode));
    }
    Ok(Action::None)
}

pub fn key_to_action(key: KeyEvent, mode: InputMode) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => return Action::CopyToClipboard,
        (KeyCode::Esc, _) => return Action::Back,
        (KeyCode::Enter, _) => return Action::Submit,
        (KeyCode::Up, _) => return Action::ScrollUp,
        (KeyCode::Down, _) => return Action::ScrollDown,
        (KeyCode::PageUp, _) => return Action::PageUp,
        (KeyCode::PageDown, _) => return Action::PageDown,
        (KeyCode::Home, _) => return Action::Home,
        (KeyCode::End, _) => return Action::End,
        _ => {}
    }

    match mode {
        InputMode::Search => match (key.code, key.modifiers) {
            (KeyCode::Backspace, _) => Action::DeleteChar,
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                Action::SearchInput(c)
            }
            _ => Action::None,
        },
        InputMode::Normal => match (key.code, key.modifiers) {
            (KeyCode::Char('/'), KeyModifiers::NONE) => Action::StartSearch,
            (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NextMatch,
            (KeyCode::Char('N'), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                Action::PreviousMatch
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
            (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
            (KeyCode::Char('g'), KeyModifiers::NONE) => Action::Home,
            (KeyCode::Char('G'), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::End,
            (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
            _ => Action::None,
        },
    }
}
