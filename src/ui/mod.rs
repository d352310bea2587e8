//! User interface rendering and input handling.
//!
//! This module provides all host-terminal facing functionality:
//!
//! - **terminal**: view state (pending input, scroll, alert) around a session
//! - **keymapper**: keyboard/mouse events to input actions
//! - **renderer**: window chrome and transcript drawing
//! - **alert**: modal message box
//! - **clipboard**: background clipboard reads

pub mod alert;
pub mod clipboard;
pub mod keymapper;
pub mod renderer;
pub mod terminal;

pub use keymapper::{InputAction, KeyMapper};
pub use renderer::Renderer;
pub use terminal::{Effect, TerminalView};
