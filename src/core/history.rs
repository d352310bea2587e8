//! Command history for mockterm
//!
//! In-memory record of every submitted line, oldest first. Nothing is
//! written to disk; a new process starts with an empty history.

/// A single history entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The submitted line, trimmed, case as typed
    pub command: String,
}

/// Command history storage
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// All history entries (newest last)
    entries: Vec<HistoryEntry>,
}

impl CommandHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line.
    ///
    /// Unlike a real shell history there is no dedup and no filtering:
    /// every non-empty submission is kept, recognized or not.
    pub fn add(&mut self, command: &str) {
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return;
        }

        self.entries.push(HistoryEntry {
            command: trimmed.to_string(),
        });
    }

    /// Iterate over commands, oldest first
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.command.as_str())
    }

    /// One command per line, oldest first
    pub fn listing(&self) -> String {
        self.commands().collect::<Vec<_>>().join("\n")
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_order_and_duplicates() {
        let mut history = CommandHistory::new();
        history.add("pwd");
        history.add("  Echo Hi  ");
        history.add("pwd");

        assert_eq!(history.len(), 3);
        assert_eq!(history.commands().collect::<Vec<_>>(), vec!["pwd", "Echo Hi", "pwd"]);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut history = CommandHistory::new();
        history.add("");
        history.add("   ");
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_listing() {
        let mut history = CommandHistory::new();
        assert_eq!(history.listing(), "");

        history.add("cd a");
        history.add("nope");
        assert_eq!(history.listing(), "cd a\nnope");
    }
}
