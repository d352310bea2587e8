//! Scrollback transcript.
//!
//! The visible output is kept as a list of entries, each remembering the
//! prompt it was typed at, the line itself and everything printed after
//! it, including the prompt that followed.
//!
//! ```text
//! terminal@terminal ~ $ echo hi      <- entry.prompt + entry.line
//! hi                                 <- entry.body ("\nhi\n" + next prompt)
//! terminal@terminal ~ $
//! ```
//!
//! A fold first drops everything from the last occurrence of the prompt the
//! line was typed at, so the stale "awaiting input" prompt is replaced by the
//! echoed command. The cut may land inside an entry; that entry is shortened
//! in place.

use super::commands::CommandResult;

/// One submitted line and what it printed
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Prompt shown when the line was typed
    prompt: String,
    /// The line as typed (trimmed)
    line: String,
    /// Everything printed after the line
    body: String,
}

impl Entry {
    fn prompt_only(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            line: String::new(),
            body: String::new(),
        }
    }

    fn len(&self) -> usize {
        self.prompt.len() + self.line.len() + self.body.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the first `n` bytes of the rendered entry
    fn truncate(&mut self, mut n: usize) {
        for part in [&mut self.prompt, &mut self.line, &mut self.body] {
            let keep = n.min(part.len());
            part.truncate(keep);
            n -= keep;
        }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.prompt);
        out.push_str(&self.line);
        out.push_str(&self.body);
    }
}

/// The whole scrollback
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// A transcript showing a single prompt
    pub fn new(prompt: String) -> Self {
        Self {
            entries: vec![Entry::prompt_only(&prompt)],
        }
    }

    /// Fold a command result into the scrollback.
    ///
    /// `prompt_before` is the prompt the line was typed at, `fresh_prompt`
    /// reflects the session after the command ran.
    pub fn fold(&mut self, line: &str, prompt_before: &str, fresh_prompt: &str, result: &CommandResult) {
        let body = match result {
            CommandResult::ClearScreen => {
                self.reset(fresh_prompt);
                return;
            }
            CommandResult::Blank => fresh_prompt.to_string(),
            // Multi-line text is printed as is, with no prompt after it
            CommandResult::Text(text) if text.contains('\n') => text.clone(),
            CommandResult::Text(text) => format!("\n{}\n{}", text, fresh_prompt),
        };

        self.cut_at_last(prompt_before);
        self.entries.push(Entry {
            prompt: prompt_before.to_string(),
            line: line.to_string(),
            body,
        });
    }

    /// An empty submission: print the prompt again right after the old one
    pub fn blank_line(&mut self, prompt: &str) {
        self.entries.push(Entry::prompt_only(prompt));
    }

    /// Drop everything and show a single prompt
    pub fn reset(&mut self, prompt: &str) {
        self.entries.clear();
        self.entries.push(Entry::prompt_only(prompt));
    }

    /// Drop the last occurrence of `anchor` and everything after it
    fn cut_at_last(&mut self, anchor: &str) {
        let Some(cut) = self.render().rfind(anchor) else {
            return;
        };

        let mut offset = 0;
        let mut keep = self.entries.len();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let len = entry.len();
            if offset + len > cut {
                entry.truncate(cut - offset);
                keep = if entry.is_empty() { i } else { i + 1 };
                break;
            }
            offset += len;
        }
        self.entries.truncate(keep);
    }

    /// The full scrollback as text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            entry.render_into(&mut out);
        }
        out
    }

    /// Number of text lines in the rendered scrollback
    pub fn line_count(&self) -> usize {
        self.render().split('\n').count()
    }
}
