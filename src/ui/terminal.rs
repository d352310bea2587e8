//! Terminal view state.
//!
//! Holds everything the window shows besides chrome: the session, its
//! transcript, the pending input line, the scroll position and an optional
//! modal alert. All state changes go through [`TerminalView::handle`] so the
//! main loop stays a thin event pump.
//!
//! # Paste ordering
//!
//! A clipboard read is asynchronous. While one is in flight, every further
//! action is queued and replayed after the pasted text has been appended,
//! so `Ctrl+Shift+V` followed quickly by `Enter` always submits the pasted
//! text.

use std::collections::VecDeque;

use tracing::{error, info};

use super::alert::Alert;
use super::clipboard::ClipboardError;
use super::keymapper::InputAction;
use crate::core::{Session, Transcript};

/// Work the main loop has to do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Start a clipboard read and report back via `paste_finished`
    ReadClipboard,
    Quit,
}

pub struct TerminalView {
    pub session: Session,
    pub transcript: Transcript,
    /// Pending input line
    input: String,
    /// Lines scrolled back from the bottom
    scroll_offset: usize,
    alert: Option<Alert>,
    paste_pending: bool,
    queued: VecDeque<InputAction>,
    cursor_on: bool,
}

impl TerminalView {
    pub fn new(session: Session) -> Self {
        let transcript = Transcript::new(session.prompt());
        Self {
            session,
            transcript,
            input: String::new(),
            scroll_offset: 0,
            alert: None,
            paste_pending: false,
            queued: VecDeque::new(),
            cursor_on: true,
        }
    }

    #[cfg(test)]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn cursor_on(&self) -> bool {
        self.cursor_on
    }

    #[cfg(test)]
    pub fn paste_pending(&self) -> bool {
        self.paste_pending
    }

    /// Blink tick
    pub fn toggle_cursor(&mut self) {
        self.cursor_on = !self.cursor_on;
    }

    /// Apply one input action
    pub fn handle(&mut self, action: InputAction) -> Effect {
        if action == InputAction::Quit {
            return Effect::Quit;
        }

        if self.paste_pending {
            self.queued.push_back(action);
            return Effect::None;
        }

        // Any key dismisses an alert and is otherwise swallowed
        if self.alert.take().is_some() {
            return Effect::None;
        }

        match action {
            InputAction::Insert(ch) => {
                self.input.push(ch);
                self.scroll_offset = 0;
            }
            InputAction::Backspace => {
                self.input.pop();
                self.scroll_offset = 0;
            }
            InputAction::Submit => self.submit(),
            InputAction::PasteClipboard => {
                self.paste_pending = true;
                return Effect::ReadClipboard;
            }
            InputAction::PasteText(text) => {
                self.input.push_str(&text);
                self.scroll_offset = 0;
            }
            InputAction::ScrollUp(lines) => {
                let max = self.transcript.line_count();
                self.scroll_offset = (self.scroll_offset + lines).min(max);
            }
            InputAction::ScrollDown(lines) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(lines);
            }
            InputAction::ScrollTop => self.scroll_offset = self.transcript.line_count(),
            InputAction::ScrollBottom => self.scroll_offset = 0,
            InputAction::Quit => return Effect::Quit,
        }

        Effect::None
    }

    /// Complete a clipboard read started by `Effect::ReadClipboard`
    pub fn paste_finished(&mut self, result: Result<String, ClipboardError>) -> Effect {
        self.paste_pending = false;

        match result {
            Ok(text) => {
                self.input.push_str(&text);
                self.scroll_offset = 0;
                self.replay_queued()
            }
            Err(e) => {
                error!("Clipboard access failed: {}", e);
                // Keys typed while waiting were pressed before the alert
                let effect = self.replay_queued();
                self.alert = Some(Alert::clipboard_denied());
                effect
            }
        }
    }

    fn replay_queued(&mut self) -> Effect {
        while !self.paste_pending {
            let Some(action) = self.queued.pop_front() else {
                break;
            };
            let effect = self.handle(action);
            if effect != Effect::None {
                return effect;
            }
        }
        Effect::None
    }

    fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        if let Some(result) = self.session.submit(&line, &mut self.transcript) {
            info!(mode = ?self.session.nested_mode(), "Ran {:?} -> {:?}", line.trim(), result);
        }
        self.scroll_offset = 0;
    }

    /// Transcript text followed by the pending input
    pub fn text(&self) -> String {
        let mut text = self.transcript.render();
        text.push_str(&self.input);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::NestedMode;
    use crate::core::Identity;

    const P: &str = "terminal@terminal ~ $ ";

    fn view() -> TerminalView {
        TerminalView::new(Session::new(Identity::default()))
    }

    fn type_line(view: &mut TerminalView, line: &str) {
        for ch in line.chars() {
            view.handle(InputAction::Insert(ch));
        }
        view.handle(InputAction::Submit);
    }

    fn denied() -> ClipboardError {
        ClipboardError::Read(arboard::Error::ContentNotAvailable)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut v = view();
        v.handle(InputAction::Insert('l'));
        v.handle(InputAction::Insert('s'));
        v.handle(InputAction::Insert('x'));
        v.handle(InputAction::Backspace);
        assert_eq!(v.input(), "ls");
        assert_eq!(v.text(), format!("{P}ls"));

        v.handle(InputAction::Backspace);
        v.handle(InputAction::Backspace);
        v.handle(InputAction::Backspace);
        assert_eq!(v.input(), "");
    }

    #[test]
    fn test_submit_folds_into_transcript() {
        let mut v = view();
        type_line(&mut v, "echo hi");
        assert_eq!(v.input(), "");
        assert_eq!(v.text(), format!("{P}echo hi\nhi\n{P}"));
        assert_eq!(v.session.history().len(), 1);
    }

    #[test]
    fn test_clear_after_output() {
        let mut v = view();
        type_line(&mut v, "echo a");
        type_line(&mut v, "cd x");
        type_line(&mut v, "clear");
        assert_eq!(v.text(), "terminal@terminal ~/x $ ");
    }

    #[test]
    fn test_blank_enter() {
        let mut v = view();
        v.handle(InputAction::Insert(' '));
        v.handle(InputAction::Submit);
        assert_eq!(v.text(), format!("{P}{P}"));
        assert_eq!(v.session.history().len(), 0);
    }

    #[test]
    fn test_nested_mode_through_keys() {
        let mut v = view();
        type_line(&mut v, "mycommand");
        type_line(&mut v, "pwd");
        assert_eq!(v.session.nested_mode(), Some(NestedMode::MyCommand));
        assert!(v.text().contains("Command not found in mycommand: pwd"));

        type_line(&mut v, "exit");
        assert_eq!(v.session.nested_mode(), None);
        assert!(v.text().ends_with(&format!("{P}exit\n{P}")));
    }

    #[test]
    fn test_bracketed_paste() {
        let mut v = view();
        v.handle(InputAction::PasteText("echo pasted".to_string()));
        v.handle(InputAction::Submit);
        assert!(v.text().contains("\npasted\n"));
    }

    #[test]
    fn test_clipboard_paste_is_serialized_with_enter() {
        let mut v = view();
        v.handle(InputAction::Insert('e'));
        assert_eq!(v.handle(InputAction::PasteClipboard), Effect::ReadClipboard);
        assert!(v.paste_pending());

        // Enter arrives before the clipboard answers
        v.handle(InputAction::Submit);
        assert_eq!(v.session.history().len(), 0);

        assert_eq!(v.paste_finished(Ok("cho late".to_string())), Effect::None);
        assert!(!v.paste_pending());
        assert_eq!(v.session.history().commands().collect::<Vec<_>>(), vec!["echo late"]);
        assert!(v.text().contains("\nlate\n"));
    }

    #[test]
    fn test_queued_paste_restarts_read() {
        let mut v = view();
        v.handle(InputAction::PasteClipboard);
        v.handle(InputAction::PasteClipboard);
        v.handle(InputAction::Insert('!'));

        assert_eq!(v.paste_finished(Ok("a".to_string())), Effect::ReadClipboard);
        assert!(v.paste_pending());
        assert_eq!(v.input(), "a");

        assert_eq!(v.paste_finished(Ok("b".to_string())), Effect::None);
        assert_eq!(v.input(), "ab!");
    }

    #[test]
    fn test_clipboard_failure_shows_alert() {
        let mut v = view();
        type_line(&mut v, "cd x");
        v.handle(InputAction::Insert('p'));
        v.handle(InputAction::PasteClipboard);

        assert_eq!(v.paste_finished(Err(denied())), Effect::None);
        assert_eq!(v.alert(), Some(&Alert::clipboard_denied()));
        assert_eq!(v.input(), "p");
        assert_eq!(v.session.working_directory(), "~/x");

        // The dismissing key is swallowed
        v.handle(InputAction::Insert('w'));
        assert!(v.alert().is_none());
        assert_eq!(v.input(), "p");
    }

    #[test]
    fn test_quit_bypasses_queue_and_alert() {
        let mut v = view();
        v.handle(InputAction::PasteClipboard);
        assert_eq!(v.handle(InputAction::Quit), Effect::Quit);
    }

    #[test]
    fn test_scrolling() {
        let mut v = view();
        for _ in 0..5 {
            type_line(&mut v, "help");
        }
        let lines = v.transcript.line_count();
        assert_eq!(lines, 11);

        v.handle(InputAction::ScrollUp(10));
        assert_eq!(v.scroll_offset(), 10);
        v.handle(InputAction::ScrollUp(10));
        assert_eq!(v.scroll_offset(), lines);
        v.handle(InputAction::ScrollDown(3));
        assert_eq!(v.scroll_offset(), lines - 3);

        // Typing snaps back to the bottom
        v.handle(InputAction::Insert('x'));
        assert_eq!(v.scroll_offset(), 0);

        v.handle(InputAction::ScrollTop);
        assert_eq!(v.scroll_offset(), lines);
        v.handle(InputAction::ScrollBottom);
        assert_eq!(v.scroll_offset(), 0);
    }

    #[test]
    fn test_cursor_blink() {
        let mut v = view();
        assert!(v.cursor_on());
        v.toggle_cursor();
        assert!(!v.cursor_on());
    }
}
