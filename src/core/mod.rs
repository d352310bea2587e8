//! Core shell simulation.
//!
//! Nothing here touches the host terminal:
//!
//! - **commands**: top-level and nested command tables
//! - **session**: working directory, history, nested mode and the dispatcher
//! - **transcript**: the scrollback buffer and its fold rules
//! - **history**: in-memory command history
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── CommandTable (top-level)
//! ├── CommandTable per NestedMode
//! └── CommandHistory
//!
//! Session::submit(line) ──run──> CommandResult ──fold──> Transcript
//! ```

pub mod commands;
pub mod history;
pub mod session;
pub mod transcript;

pub use session::{Identity, Session};
pub use transcript::Transcript;
