//! Session management
//!
//! A session owns everything a simulated shell remembers between lines:
//! the working directory, the command history and the active nested mode.
//! It is created once when the terminal starts and dropped when it exits.

use std::collections::BTreeMap;

use tracing::debug;

use super::commands::{CommandResult, CommandTable, NestedMode};
use super::history::CommandHistory;
use super::transcript::Transcript;

/// Working directory of a fresh session
pub const HOME_DIR: &str = "~";

/// User and host shown in the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub hostname: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            username: "terminal".to_string(),
            hostname: "terminal".to_string(),
        }
    }
}

/// A simulated shell session
#[derive(Debug)]
pub struct Session {
    identity: Identity,
    working_directory: String,
    history: CommandHistory,
    nested_mode: Option<NestedMode>,
    /// Top-level command table
    commands: CommandTable,
    /// One table per nested mode
    nested: BTreeMap<NestedMode, CommandTable>,
}

impl Session {
    /// Create a new session
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            working_directory: HOME_DIR.to_string(),
            history: CommandHistory::new(),
            nested_mode: None,
            commands: CommandTable::builtin(),
            nested: NestedMode::ALL
                .iter()
                .map(|&mode| (mode, CommandTable::for_mode(mode)))
                .collect(),
        }
    }

    /// `"{username}@{hostname} {working_directory} $ "`
    pub fn prompt(&self) -> String {
        format!(
            "{}@{} {} $ ",
            self.identity.username, self.identity.hostname, self.working_directory
        )
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub(crate) fn set_working_directory(&mut self, dir: String) {
        self.working_directory = dir;
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn nested_mode(&self) -> Option<NestedMode> {
        self.nested_mode
    }

    pub(crate) fn enter_mode(&mut self, mode: NestedMode) {
        debug!("Entering nested mode {}", mode);
        self.nested_mode = Some(mode);
    }

    pub(crate) fn leave_mode(&mut self) {
        if let Some(mode) = self.nested_mode.take() {
            debug!("Leaving nested mode {}", mode);
        }
    }

    /// Dispatch one line.
    ///
    /// Only the command name is lowercased; arguments are passed through
    /// as typed. While a nested mode is active only that mode's table is
    /// consulted.
    pub fn run(&mut self, line: &str) -> CommandResult {
        let tokens = tokenize(line);
        let name = tokens[0].to_lowercase();

        if let Some(mode) = self.nested_mode {
            let handler = self.nested.get(&mode).and_then(|table| table.get(&name));
            return match handler {
                Some(handler) => {
                    debug!("Dispatch {} (in {})", name, mode);
                    handler(self, &tokens)
                }
                None => CommandResult::Text(format!("Command not found in {}: {}", mode, name)),
            };
        }

        match self.commands.get(&name) {
            Some(handler) => {
                debug!("Dispatch {}", name);
                handler(self, &tokens)
            }
            None if name.is_empty() => CommandResult::text(""),
            None => CommandResult::Text(format!("Command not found: {}", name)),
        }
    }

    /// Handle a submitted line and fold its result into `transcript`.
    ///
    /// Returns `None` for a blank line, which only adds a bare prompt and
    /// leaves history, directory and mode untouched.
    pub fn submit(&mut self, raw_line: &str, transcript: &mut Transcript) -> Option<CommandResult> {
        let line = raw_line.trim();
        if line.is_empty() {
            transcript.blank_line(&self.prompt());
            return None;
        }

        let prompt_before = self.prompt();
        let result = self.run(line);
        self.history.add(line);
        transcript.fold(line, &prompt_before, &self.prompt(), &result);
        Some(result)
    }
}

/// Split on single spaces. No quoting or escaping; consecutive spaces
/// produce empty tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}
