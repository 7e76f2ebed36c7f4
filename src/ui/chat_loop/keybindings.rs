//! Key classification for the chat loop.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE_LINES: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    /// Enter without Shift.
    Submit,
    /// Shift+Enter. Never submits.
    NewLine,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollTop,
    ScrollBottom,
    /// Anything else goes to the input field.
    Edit,
}

pub fn classify_key(key: &KeyEvent) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyAction::Quit,
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => KeyAction::NewLine,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Up => KeyAction::ScrollUp(1),
        KeyCode::Down => KeyAction::ScrollDown(1),
        KeyCode::PageUp => KeyAction::ScrollUp(PAGE_LINES),
        KeyCode::PageDown => KeyAction::ScrollDown(PAGE_LINES),
        KeyCode::Home if ctrl => KeyAction::ScrollTop,
        KeyCode::End if ctrl => KeyAction::ScrollBottom,
        _ => KeyAction::Edit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn enter_submits_and_shift_enter_does_not() {
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyAction::Submit
        );
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::SHIFT)),
            KeyAction::NewLine
        );
        assert_eq!(
            classify_key(&key(KeyCode::Enter, KeyModifiers::SHIFT | KeyModifiers::ALT)),
            KeyAction::NewLine
        );
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_types() {
        assert_eq!(
            classify_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            classify_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)),
            KeyAction::Edit
        );
    }

    #[test]
    fn navigation_keys_scroll_history() {
        assert_eq!(
            classify_key(&key(KeyCode::PageUp, KeyModifiers::NONE)),
            KeyAction::ScrollUp(PAGE_LINES)
        );
        assert_eq!(
            classify_key(&key(KeyCode::End, KeyModifiers::CONTROL)),
            KeyAction::ScrollBottom
        );
        assert_eq!(
            classify_key(&key(KeyCode::Home, KeyModifiers::NONE)),
            KeyAction::Edit
        );
    }
}
