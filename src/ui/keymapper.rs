//! Key mapping for terminal input
//!
//! Converts crossterm key and mouse events into [`InputAction`]s for the
//! terminal view. Keys that have no meaning for the simulated shell map to
//! `None` and are dropped.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

/// Lines scrolled per Shift+PageUp/PageDown
pub const PAGE_SCROLL: usize = 10;

/// Lines scrolled per mouse wheel notch
pub const WHEEL_SCROLL: usize = 3;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        if mods.intersects(KeyModifiers::META | KeyModifiers::SUPER) {
            result |= Modifiers::META;
        }
        result
    }
}

/// What a key press asks the terminal view to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Append a character to the pending line
    Insert(char),
    /// Remove the last character of the pending line
    Backspace,
    /// Submit the pending line
    Submit,
    /// Read the system clipboard and append its text
    PasteClipboard,
    /// Append text delivered by the host terminal (bracketed paste)
    PasteText(String),
    /// Scroll the view towards older output
    ScrollUp(usize),
    /// Scroll the view towards newer output
    ScrollDown(usize),
    ScrollTop,
    ScrollBottom,
    /// Leave the program
    Quit,
}

/// Key mapper for converting key events to input actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent
    pub fn map(event: &KeyEvent) -> Option<InputAction> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let mods = Modifiers::from(event.modifiers);

        // Ctrl+Shift+V: clipboard paste
        if mods.contains(Modifiers::CTRL | Modifiers::SHIFT)
            && matches!(event.code, KeyCode::Char('v') | KeyCode::Char('V'))
        {
            return Some(InputAction::PasteClipboard);
        }

        if mods.contains(Modifiers::SHIFT) {
            match event.code {
                KeyCode::PageUp => return Some(InputAction::ScrollUp(PAGE_SCROLL)),
                KeyCode::PageDown => return Some(InputAction::ScrollDown(PAGE_SCROLL)),
                KeyCode::Home => return Some(InputAction::ScrollTop),
                KeyCode::End => return Some(InputAction::ScrollBottom),
                _ => {}
            }
        }

        match event.code {
            KeyCode::Enter => Some(InputAction::Submit),
            KeyCode::Backspace => Some(InputAction::Backspace),
            KeyCode::Char(ch) => Self::map_char(ch, mods),
            _ => None,
        }
    }

    /// Map a character with modifiers
    fn map_char(ch: char, mods: Modifiers) -> Option<InputAction> {
        if mods.contains(Modifiers::CTRL) {
            return match ch {
                'c' | 'C' | 'd' | 'D' => Some(InputAction::Quit),
                _ => None,
            };
        }

        if mods.intersects(Modifiers::ALT | Modifiers::META) {
            return None;
        }

        Some(InputAction::Insert(ch))
    }

    /// Map a mouse event (wheel scrolling only)
    pub fn map_mouse(event: &MouseEvent) -> Option<InputAction> {
        match event.kind {
            MouseEventKind::ScrollUp => Some(InputAction::ScrollUp(WHEEL_SCROLL)),
            MouseEventKind::ScrollDown => Some(InputAction::ScrollDown(WHEEL_SCROLL)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_char_keys() {
        let event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Insert('a')));

        // Shifted characters arrive already uppercased
        let event = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Insert('A')));

        let event = key_event(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(KeyMapper::map(&event), None);

        let event = key_event(KeyCode::Char('x'), KeyModifiers::META);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_editing_keys() {
        let event = key_event(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Submit));

        let event = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Backspace));

        let event = key_event(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_paste_shortcut() {
        let mods = KeyModifiers::CONTROL | KeyModifiers::SHIFT;
        let event = key_event(KeyCode::Char('V'), mods);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::PasteClipboard));

        let event = key_event(KeyCode::Char('v'), mods);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::PasteClipboard));

        // Plain Ctrl+V is not a paste
        let event = key_event(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_quit_keys() {
        let event = key_event(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Quit));

        let event = key_event(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::Quit));
    }

    #[test]
    fn test_scroll_keys() {
        let event = key_event(KeyCode::PageUp, KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::ScrollUp(PAGE_SCROLL)));

        let event = key_event(KeyCode::End, KeyModifiers::SHIFT);
        assert_eq!(KeyMapper::map(&event), Some(InputAction::ScrollBottom));

        let event = key_event(KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut event = key_event(KeyCode::Char('a'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_mouse_wheel() {
        let event = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(KeyMapper::map_mouse(&event), Some(InputAction::ScrollUp(WHEEL_SCROLL)));

        let event = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(KeyMapper::map_mouse(&event), None);
    }
}
