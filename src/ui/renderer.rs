//! Terminal renderer using crossterm
//!
//! Draws the simulated window onto the host terminal:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ● ● ●  bash                  │  <- title bar
//! ├──────────────────────────────┤
//! │terminal@terminal ~ $ echo hi │
//! │hi                            │
//! │terminal@terminal ~ $ |       │  <- pending input + cursor glyph
//! └──────────────────────────────┘
//! ```
//!
//! Every frame is drawn in full; the text is small and synchronized output
//! keeps it flicker-free.

use std::borrow::Cow;
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::alert::Alert;
use super::terminal::TerminalView;
use crate::config::{Color, ColorScheme, WindowConfig};

/// Title bar dots
const DOT: &str = "●";

/// Rows taken by chrome: top border, title bar, separator, bottom border
const CHROME_ROWS: u16 = 4;

/// Where the window sits on the host screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl WindowLayout {
    /// Fit the configured window onto a `cols` x `rows` screen.
    ///
    /// The minimum size wins over the configured size, and the screen size
    /// wins over both. The window is shifted left/up if it would overflow.
    pub fn compute(window: &WindowConfig, cols: u16, rows: u16) -> Self {
        let width = window.width.max(window.min_width).min(cols);
        let height = window.height.max(window.min_height).min(rows);
        Self {
            x: window.x.min(cols - width),
            y: window.y.min(rows - height),
            width,
            height,
        }
    }

    pub fn content_width(&self) -> u16 {
        self.width.saturating_sub(2)
    }

    pub fn content_height(&self) -> u16 {
        self.height.saturating_sub(CHROME_ROWS)
    }

    /// Top-left cell of the text area
    pub fn content_origin(&self) -> (u16, u16) {
        (self.x + 1, self.y + 3)
    }
}

/// Split a line into rows of at most `width` display columns.
///
/// Breaks anywhere, like a terminal does; a wide character never straddles
/// two rows. An empty line yields one empty row.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += w;
    }

    rows.push(current);
    rows
}

/// Make control characters visible instead of sending them to the host.
///
/// C0 controls and DEL use caret notation (`\r` becomes `^M`, ESC `^[`);
/// other controls become U+FFFD.
pub fn printable(line: &str) -> Cow<'_, str> {
    if !line.chars().any(char::is_control) {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len() + 4);
    for ch in line.chars() {
        match ch {
            '\0'..='\x1f' => {
                out.push('^');
                out.push((ch as u8 + b'@') as char);
            }
            '\x7f' => out.push_str("^?"),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// The rows visible in a `width` x `height` area when scrolled back by
/// `scroll_offset` rows. Returns the rows and the clamped offset.
pub fn visible_lines(text: &str, width: usize, height: usize, scroll_offset: usize) -> (Vec<String>, usize) {
    let rows: Vec<String> = text
        .split('\n')
        .flat_map(|line| wrap_line(&printable(line), width))
        .collect();

    let offset = scroll_offset.min(rows.len().saturating_sub(height));
    let end = rows.len() - offset;
    let start = end.saturating_sub(height);
    (rows[start..end].to_vec(), offset)
}

/// Cut `s` to at most `width` display columns
fn truncate_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

/// Pad `s` with spaces to exactly `width` display columns
fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn fg(color: Color) -> SetForegroundColor {
    SetForegroundColor(color.to_crossterm())
}

fn bg(color: Color) -> SetBackgroundColor {
    SetBackgroundColor(color.to_crossterm())
}

/// Terminal renderer
pub struct Renderer {
    scheme: ColorScheme,
    window: WindowConfig,
    /// Glyph drawn after the pending input
    cursor_glyph: String,
    /// Whether the terminal has been initialized
    initialized: bool,
    /// Clear the whole screen before the next frame
    full_redraw: bool,
    /// Current terminal size
    size: (u16, u16),
}

impl Renderer {
    pub fn new(scheme: ColorScheme, window: WindowConfig, cursor_glyph: String) -> Self {
        Self {
            scheme,
            window,
            cursor_glyph: printable(&cursor_glyph).into_owned(),
            initialized: false,
            full_redraw: true,
            size: (80, 24),
        }
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;

        self.size = Self::size()?;
        self.full_redraw = true;
        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();

        // Reset all attributes first
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(stdout, Show, EnableLineWrap);
        let _ = execute!(stdout, DisableBracketedPaste, DisableMouseCapture);
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();

        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Host terminal was resized
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.full_redraw = true;
    }

    /// Draw one frame
    pub fn render(&mut self, view: &TerminalView) -> io::Result<()> {
        let (cols, rows) = self.size;
        let layout = WindowLayout::compute(&self.window, cols, rows);
        if layout.width < 3 || layout.height <= CHROME_ROWS {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut out = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(out, "\x1b[?2026h")?;
        queue!(out, Hide)?;

        if self.full_redraw {
            queue!(out, ResetColor, Clear(ClearType::All))?;
            self.full_redraw = false;
        }

        self.draw_frame(&mut out, &layout)?;
        self.draw_content(&mut out, &layout, view)?;
        if let Some(alert) = view.alert() {
            self.draw_alert(&mut out, alert, cols, rows)?;
        }

        queue!(out, ResetColor)?;
        write!(out, "\x1b[?2026l")?;
        out.flush()
    }

    fn draw_frame<W: Write>(&self, out: &mut W, layout: &WindowLayout) -> io::Result<()> {
        let inner = layout.content_width() as usize;
        let rule = "─".repeat(inner);
        let s = &self.scheme;

        queue!(
            out,
            bg(s.title_bar_bg),
            fg(s.border),
            MoveTo(layout.x, layout.y),
            Print(format!("┌{}┐", rule)),
            MoveTo(layout.x, layout.y + 1),
            Print("│")
        )?;

        // Title bar: three dots, then the title
        let mut used = 0;
        for color in [s.dot_close, s.dot_minimize, s.dot_maximize] {
            if used + 2 > inner {
                break;
            }
            queue!(out, fg(color), Print(format!(" {}", DOT)))?;
            used += 2;
        }
        let title = pad_to_width(&format!("  {}", printable(&self.window.title)), inner - used);
        queue!(
            out,
            fg(s.title_fg),
            Print(title),
            fg(s.border),
            Print("│"),
            MoveTo(layout.x, layout.y + 2),
            Print(format!("├{}┤", rule)),
            bg(s.background)
        )?;

        let (_, top) = layout.content_origin();
        for row in 0..layout.content_height() {
            queue!(
                out,
                MoveTo(layout.x, top + row),
                Print("│"),
                MoveTo(layout.x + layout.width - 1, top + row),
                Print("│")
            )?;
        }

        queue!(
            out,
            MoveTo(layout.x, layout.y + layout.height - 1),
            Print(format!("└{}┘", rule))
        )
    }

    fn draw_content<W: Write>(&self, out: &mut W, layout: &WindowLayout, view: &TerminalView) -> io::Result<()> {
        let width = layout.content_width() as usize;
        let height = layout.content_height() as usize;
        let (left, top) = layout.content_origin();
        let s = &self.scheme;

        // The glyph is always laid out so blinking never reflows the text
        let mut text = view.text();
        text.push_str(&self.cursor_glyph);

        let (lines, offset) = visible_lines(&text, width, height, view.scroll_offset());
        let last = lines.len().saturating_sub(1);

        queue!(out, bg(s.background))?;
        for row in 0..height {
            queue!(out, MoveTo(left, top + row as u16))?;
            let Some(line) = lines.get(row) else {
                queue!(out, Print(" ".repeat(width)))?;
                continue;
            };

            let body = match line.strip_suffix(self.cursor_glyph.as_str()) {
                Some(body) if row == last && offset == 0 => body,
                _ => {
                    queue!(out, fg(s.foreground), Print(pad_to_width(line, width)))?;
                    continue;
                }
            };

            let glyph = if view.cursor_on() {
                self.cursor_glyph.clone()
            } else {
                " ".repeat(self.cursor_glyph.width())
            };
            queue!(
                out,
                fg(s.foreground),
                Print(body),
                fg(s.cursor),
                Print(glyph),
                Print(" ".repeat(width.saturating_sub(line.width())))
            )?;
        }

        if offset > 0 {
            let indicator = format!("[↑ {} lines]", offset);
            let indicator_width = indicator.width() as u16;
            if indicator_width <= width as u16 {
                queue!(
                    out,
                    MoveTo(left + width as u16 - indicator_width, top),
                    fg(s.indicator_fg),
                    Print(indicator)
                )?;
            }
        }

        Ok(())
    }

    fn draw_alert<W: Write>(&self, out: &mut W, alert: &Alert, cols: u16, rows: u16) -> io::Result<()> {
        let (width, height) = alert.dimensions(cols);
        let (x, y) = alert.position(cols, rows);
        let inner = width.saturating_sub(2) as usize;
        let text_width = inner.saturating_sub(2);
        let s = &self.scheme;

        let title = truncate_to_width(&format!(" {} ", alert.title), inner);
        let top = format!("┌{}{}┐", title, "─".repeat(inner - title.width()));
        queue!(out, bg(s.alert_bg), fg(s.alert_border), MoveTo(x, y), Print(top))?;

        let mut body: Vec<String> = alert.lines(cols);
        body.push(String::new());
        let hint = alert.hint();
        let hint_pad = text_width.saturating_sub(hint.width()) / 2;
        body.push(format!("{}{}", " ".repeat(hint_pad), hint));

        for (i, line) in body.iter().enumerate() {
            queue!(
                out,
                MoveTo(x, y + 1 + i as u16),
                fg(s.alert_border),
                Print("│ "),
                fg(s.alert_fg),
                Print(pad_to_width(line, text_width)),
                fg(s.alert_border),
                Print(" │")
            )?;
        }

        queue!(
            out,
            MoveTo(x, y + height - 1),
            Print(format!("└{}┘", "─".repeat(inner)))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_line() {
        assert_eq!(wrap_line("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap_line("abcd", 4), vec!["abcd"]);
        assert_eq!(wrap_line("", 4), vec![""]);
        assert_eq!(wrap_line("abc", 0), vec!["abc"]);
    }

    #[test]
    fn test_wrap_wide_chars() {
        // Each CJK character is two columns wide
        assert_eq!(wrap_line("日本語", 5), vec!["日本", "語"]);
        assert_eq!(wrap_line("a日", 2), vec!["a", "日"]);
    }

    #[test]
    fn test_visible_lines_bottom() {
        let text = "one\ntwo\nthree\nfour";
        let (lines, offset) = visible_lines(text, 10, 2, 0);
        assert_eq!(lines, vec!["three", "four"]);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_visible_lines_scrolled_and_clamped() {
        let text = "one\ntwo\nthree\nfour";
        let (lines, offset) = visible_lines(text, 10, 2, 1);
        assert_eq!(lines, vec!["two", "three"]);
        assert_eq!(offset, 1);

        let (lines, offset) = visible_lines(text, 10, 2, 99);
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(offset, 2);
    }

    #[test]
    fn test_visible_lines_short_text() {
        let (lines, offset) = visible_lines("only", 10, 5, 3);
        assert_eq!(lines, vec!["only"]);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_visible_lines_wraps() {
        let (lines, _) = visible_lines("abcdefgh\nij", 4, 10, 0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_control_characters_are_escaped() {
        assert_eq!(printable("plain"), "plain");
        assert_eq!(printable("a\rb\tc"), "a^Mb^Ic");
        assert_eq!(printable("\x1b[2J\x7f"), "^[[2J^?");
        assert_eq!(printable("x\u{9b}y"), "x\u{fffd}y");
    }

    #[test]
    fn test_visible_lines_never_carry_controls() {
        let text = "terminal@terminal ~ $ a\rb\x1b[2J";
        let (lines, _) = visible_lines(text, 73, 21, 0);
        assert_eq!(lines, vec!["terminal@terminal ~ $ a^Mb^[[2J"]);
        assert!(lines.iter().all(|l| !l.chars().any(char::is_control)));
    }

    #[test]
    fn test_layout_default_fits() {
        let layout = WindowLayout::compute(&WindowConfig::default(), 120, 40);
        assert_eq!(layout, WindowLayout { x: 2, y: 1, width: 75, height: 25 });
        assert_eq!(layout.content_width(), 73);
        assert_eq!(layout.content_height(), 21);
        assert_eq!(layout.content_origin(), (3, 4));
    }

    #[test]
    fn test_layout_clamped_to_screen() {
        let layout = WindowLayout::compute(&WindowConfig::default(), 60, 20);
        assert_eq!(layout, WindowLayout { x: 0, y: 0, width: 60, height: 20 });

        let layout = WindowLayout::compute(&WindowConfig::default(), 76, 40);
        assert_eq!(layout.x, 1);
    }

    #[test]
    fn test_layout_minimum_size() {
        let window = WindowConfig {
            width: 5,
            height: 2,
            ..WindowConfig::default()
        };
        let layout = WindowLayout::compute(&window, 120, 40);
        assert_eq!((layout.width, layout.height), (25, 10));
    }

    #[test]
    fn test_padding() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcd");
        assert_eq!(pad_to_width("日本", 3), "日 ");
    }
}
