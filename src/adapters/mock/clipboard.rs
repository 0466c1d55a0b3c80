//! In-memory clipboard for testing.

use std::sync::{Arc, Mutex};

use crate::traits::{Clipboard, ClipboardError};

/// A single clipboard operation, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardOp {
    /// Contents were cleared.
    Clear,
    /// Contents were replaced with the given text.
    Set(String),
}

/// Clipboard test double recording every operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    ops: Arc<Mutex<Vec<ClipboardOp>>>,
}

impl InMemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clipboard text, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }

    /// Every operation performed, in order.
    pub fn ops(&self) -> Vec<ClipboardOp> {
        self.ops.lock().unwrap().clone()
    }
}

impl Clipboard for InMemoryClipboard {
    fn clear(&self) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap() = None;
        self.ops.lock().unwrap().push(ClipboardOp::Clear);
        Ok(())
    }

    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        self.ops
            .lock()
            .unwrap()
            .push(ClipboardOp::Set(text.to_string()));
        Ok(())
    }
}
