//! Modal alert box.
//!
//! A small bordered popup drawn over the terminal window. While an alert is
//! visible every key press only dismisses it; the session never sees it.
//!
//! # Example
//!
//! ```ignore
//! let alert = Alert::clipboard_denied();
//! let (width, height) = alert.dimensions(screen_width);
//! let (x, y) = alert.position(screen_width, screen_height);
//! ```

use unicode_width::UnicodeWidthStr;

use super::renderer::wrap_line;

/// Text shown when reading the clipboard fails
pub const CLIPBOARD_DENIED: &str =
    "Clipboard access denied. Please check your system clipboard permissions.";

/// Footer hint inside the box
const DISMISS_HINT: &str = "Press any key";

/// Widest the message area may grow, in columns
const MAX_TEXT_WIDTH: u16 = 48;

/// A modal message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    pub fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }

    pub fn clipboard_denied() -> Self {
        Self::new("Clipboard", CLIPBOARD_DENIED)
    }

    /// Width available for text, given the screen width
    fn text_width(&self, screen_width: u16) -> u16 {
        // 2 border columns + 1 space padding on each side
        let available = screen_width.saturating_sub(4).max(1);
        let natural = self.message.width().max(self.title.width() + 2).max(DISMISS_HINT.width()) as u16;
        natural.min(MAX_TEXT_WIDTH).min(available)
    }

    /// Message wrapped to the box width
    pub fn lines(&self, screen_width: u16) -> Vec<String> {
        wrap_words(&self.message, self.text_width(screen_width) as usize)
    }

    /// Box dimensions including borders: message lines, a spacer and the hint
    pub fn dimensions(&self, screen_width: u16) -> (u16, u16) {
        let width = self.text_width(screen_width) + 4;
        let height = self.lines(screen_width).len() as u16 + 4;
        (width, height)
    }

    /// Top-left corner that centers the box on screen
    pub fn position(&self, screen_width: u16, screen_height: u16) -> (u16, u16) {
        let (width, height) = self.dimensions(screen_width);
        (
            screen_width.saturating_sub(width) / 2,
            screen_height.saturating_sub(height) / 2,
        )
    }

    pub fn hint(&self) -> &'static str {
        DISMISS_HINT
    }
}

/// Greedy word wrap; words wider than `width` are split by display width
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let needed = if current.is_empty() { word.width() } else { current.width() + 1 + word.width() };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if word.width() > width {
            let mut pieces = wrap_line(word, width);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        } else {
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
