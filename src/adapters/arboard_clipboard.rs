//! System clipboard adapter backed by arboard.
//!
//! Uses `arboard` to access the OS-level clipboard (NSPasteboard on
//! macOS, X11/Wayland on Linux). An `arboard::Clipboard` handle is not
//! `Sync`, so a fresh handle is opened per operation; clipboard traffic
//! here is one short string per upload.

use crate::traits::{Clipboard, ClipboardError};

/// Production clipboard adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    fn open() -> Result<arboard::Clipboard, ClipboardError> {
        arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))
    }
}

impl Clipboard for ArboardClipboard {
    fn clear(&self) -> Result<(), ClipboardError> {
        Self::open()?
            .clear()
            .map_err(|e| ClipboardError(e.to_string()))
    }

    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        Self::open()?
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))
    }
}
