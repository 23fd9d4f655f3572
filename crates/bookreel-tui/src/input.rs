use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    StartSearch,
    TogglePlay,
    Start,
    Stop,
    MoreVisible,
    FewerVisible,
    OpenLink,
    ShowHelp,
    ExitMode,
    Submit,
    Cancel,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.is_input_mode() {
        return handle_input_mode(key);
    }

    if app.mode == Mode::Help {
        // Any key exits help
        return Action::ExitMode;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('/'), _) => Action::StartSearch,

        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::TogglePlay,
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Start,
        (KeyCode::Char('x'), KeyModifiers::NONE) => Action::Stop,

        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => Action::MoreVisible,
        (KeyCode::Char('-'), KeyModifiers::NONE) => Action::FewerVisible,

        (KeyCode::Char('o'), KeyModifiers::NONE) | (KeyCode::Enter, KeyModifiers::NONE) => {
            Action::OpenLink
        }

        (KeyCode::Char('?'), _) => Action::ShowHelp,

        _ => Action::None,
    }
}

/// Keys while typing a search term
fn handle_input_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Cancel,
        (KeyCode::Backspace, _) => Action::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InputChar(c)
        }
        _ => Action::None,
    }
}
