//! Event handling - convert crossterm events to demo actions.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use log::trace;

/// What the demo should do in response to an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Expand the search button.
    Activate,
    /// Collapse without selecting.
    Dismiss,
    /// Pick the highlighted result.
    Submit,
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Highlight the previous result.
    Up,
    /// Highlight the next result.
    Down,
    /// Switch to the next demo skin.
    NextSkin,
    ToggleDisabled,
    Click { column: u16, row: u16 },
    Resize,
    Quit,
}

/// Convert a crossterm event. `expanded` selects the key map: while the
/// input is open, printable keys are text.
pub fn convert_event(event: CrosstermEvent, expanded: bool) -> Option<Action> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key, expanded),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Resize(..) => Some(Action::Resize),
        other => {
            trace!("Ignoring event {:?}", other);
            None
        }
    }
}

/// Convert a key press.
pub fn convert_key_event(event: KeyEvent, expanded: bool) -> Option<Action> {
    // Release and repeat events only arrive on some platforms
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match event.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::ToggleDisabled),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Tab => Some(Action::NextSkin),
        KeyCode::Esc if expanded => Some(Action::Dismiss),
        KeyCode::Enter if expanded => Some(Action::Submit),
        KeyCode::Up if expanded => Some(Action::Up),
        KeyCode::Down if expanded => Some(Action::Down),
        KeyCode::Backspace if expanded => Some(Action::Backspace),
        KeyCode::Delete if expanded => Some(Action::Delete),
        KeyCode::Left if expanded => Some(Action::Left),
        KeyCode::Right if expanded => Some(Action::Right),
        KeyCode::Home if expanded => Some(Action::Home),
        KeyCode::End if expanded => Some(Action::End),
        KeyCode::Char(c) if expanded => Some(Action::Insert(c)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Activate),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Convert a mouse event. Only left clicks matter.
pub fn convert_mouse_event(event: MouseEvent) -> Option<Action> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Click {
            column: event.column,
            row: event.row,
        }),
        _ => None,
    }
}
