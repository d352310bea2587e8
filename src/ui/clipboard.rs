//! System clipboard access.
//!
//! Reading the clipboard can block (X11 selection owners, Wayland portals),
//! so the read runs on its own thread and the result comes back over a
//! channel that the main loop polls.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("Failed to read clipboard: {0}")]
    Read(#[source] arboard::Error),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Read the clipboard as text (blocking)
pub fn read_text() -> Result<String> {
    let mut clipboard = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
    clipboard.get_text().map_err(ClipboardError::Read)
}

/// Read the clipboard on a worker thread and send the result to `tx`
pub fn spawn_read(tx: Sender<Result<String>>) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = read_text();
        debug!("Clipboard read finished (ok: {})", result.is_ok());
        // The receiver is gone only when the main loop has already exited
        let _ = tx.send(result);
    })
}
