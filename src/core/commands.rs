//! Built-in command tables.
//!
//! Two kinds of table exist:
//!
//! - the top-level table (`pwd`, `cd`, `echo`, `clear`, `history`, `help`,
//!   `mycommand`), consulted while no nested mode is active
//! - one nested table per [`NestedMode`], which fully shadows the top-level
//!   table while its mode is active
//!
//! Handlers are plain function pointers over `&mut Session`, so a table is
//! cheap to build and holds no state of its own.

use std::collections::BTreeMap;
use std::fmt;

use super::session::Session;

/// Output of `help`
pub const HELP_TEXT: &str = "Available commands: clear, echo, cd, pwd, history, help, mycommand";

/// Output of `mycommand`
pub const MYCOMMAND_BANNER: &str = "Entered mycommand mode. Type 'list', 'info', or 'exit'.";

/// Output of `list` inside `mycommand`
pub const MYCOMMAND_LIST: &str = "Item 1, Item 2, Item 3";

/// Output of `info` inside `mycommand`
pub const MYCOMMAND_INFO: &str = "This is info within mycommand.";

/// Result of running one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Text to display below the command line
    Text(String),
    /// Nothing to display, just reprint the prompt
    Blank,
    /// Reset the scrollback to a single fresh prompt
    ClearScreen,
}

impl CommandResult {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A secondary command namespace entered from the top-level table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NestedMode {
    MyCommand,
}

impl NestedMode {
    pub const ALL: [NestedMode; 1] = [NestedMode::MyCommand];

    /// Name as typed by the user and shown in "not found" messages
    pub fn name(self) -> &'static str {
        match self {
            NestedMode::MyCommand => "mycommand",
        }
    }
}

impl fmt::Display for NestedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Command handler: receives the session and the full token list
/// (`tokens[0]` is the command name).
pub type Handler = fn(&mut Session, &[&str]) -> CommandResult;

/// Mapping from command name to handler
#[derive(Clone, Default)]
pub struct CommandTable {
    handlers: BTreeMap<&'static str, Handler>,
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one with the same name
    pub fn register(&mut self, name: &'static str, handler: Handler) -> &mut Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Exact lookup
    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// The top-level table
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table
            .register("pwd", pwd)
            .register("cd", cd)
            .register("echo", echo)
            .register("clear", clear)
            .register("history", history)
            .register("help", help)
            .register("mycommand", mycommand);
        table
    }

    /// The table active while `mode` is entered
    pub fn for_mode(mode: NestedMode) -> Self {
        let mut table = Self::new();
        match mode {
            NestedMode::MyCommand => {
                table
                    .register("list", mycommand_list)
                    .register("info", mycommand_info)
                    .register("exit", mycommand_exit);
            }
        }
        table
    }
}

/// Resolve a `cd` target against the current directory.
///
/// Purely textual: no `..` handling, no existence checks.
pub fn change_directory(current: &str, target: Option<&str>) -> String {
    match target {
        None => "~".to_string(),
        Some(path) if path.starts_with('/') => path.to_string(),
        Some(path) => format!("{}/{}", current, path),
    }
}

fn pwd(session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::text(session.working_directory())
}

fn cd(session: &mut Session, tokens: &[&str]) -> CommandResult {
    let next = change_directory(session.working_directory(), tokens.get(1).copied());
    session.set_working_directory(next);
    CommandResult::Blank
}

fn echo(_session: &mut Session, tokens: &[&str]) -> CommandResult {
    CommandResult::text(tokens.get(1..).unwrap_or_default().join(" "))
}

fn clear(_session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::ClearScreen
}

fn history(session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::text(session.history().listing())
}

fn help(_session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::text(HELP_TEXT)
}

fn mycommand(session: &mut Session, _tokens: &[&str]) -> CommandResult {
    session.enter_mode(NestedMode::MyCommand);
    CommandResult::text(MYCOMMAND_BANNER)
}

fn mycommand_list(_session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::text(MYCOMMAND_LIST)
}

fn mycommand_info(_session: &mut Session, _tokens: &[&str]) -> CommandResult {
    CommandResult::text(MYCOMMAND_INFO)
}

// Leaving the mode prints its own prompt; the fold keeps it verbatim.
fn mycommand_exit(session: &mut Session, _tokens: &[&str]) -> CommandResult {
    session.leave_mode();
    CommandResult::Text(format!("\n{}", session.prompt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::Identity;

    fn session() -> Session {
        Session::new(Identity::default())
    }

    #[test]
    fn test_change_directory() {
        assert_eq!(change_directory("/anything", None), "~");
        assert_eq!(change_directory("~/a", Some("/x")), "/x");
        assert_eq!(change_directory("~", Some("y")), "~/y");
        assert_eq!(change_directory("~", Some("..")), "~/..");
        assert_eq!(change_directory("~", Some("//")), "//");
        assert_eq!(change_directory("~", Some("")), "~/");
    }

    #[test]
    fn test_builtin_names() {
        let table = CommandTable::builtin();
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["cd", "clear", "echo", "help", "history", "mycommand", "pwd"]
        );
        assert!(table.get("list").is_none());
    }

    #[test]
    fn test_nested_names() {
        let table = CommandTable::for_mode(NestedMode::MyCommand);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["exit", "info", "list"]);
        assert!(table.get("pwd").is_none());
    }

    #[test]
    fn test_echo() {
        let mut s = session();
        assert_eq!(echo(&mut s, &["echo", "a", "b", "c"]), CommandResult::text("a b c"));
        assert_eq!(echo(&mut s, &["echo"]), CommandResult::text(""));
        assert_eq!(echo(&mut s, &["echo", "", "a"]), CommandResult::text(" a"));
    }

    #[test]
    fn test_cd_updates_session() {
        let mut s = session();
        assert_eq!(cd(&mut s, &["cd", "docs"]), CommandResult::Blank);
        assert_eq!(s.working_directory(), "~/docs");
        assert_eq!(pwd(&mut s, &["pwd"]), CommandResult::text("~/docs"));
        cd(&mut s, &["cd"]);
        assert_eq!(s.working_directory(), "~");
    }

    #[test]
    fn test_mycommand_enters_and_exit_leaves() {
        let mut s = session();
        assert_eq!(mycommand(&mut s, &["mycommand"]), CommandResult::text(MYCOMMAND_BANNER));
        assert_eq!(s.nested_mode(), Some(NestedMode::MyCommand));

        let result = mycommand_exit(&mut s, &["exit"]);
        assert_eq!(s.nested_mode(), None);
        assert_eq!(result, CommandResult::Text("\nterminal@terminal ~ $ ".to_string()));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(NestedMode::MyCommand.to_string(), "mycommand");
    }
}
