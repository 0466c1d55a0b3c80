//! System clipboard trait abstraction.

use thiserror::Error;

/// Clipboard access failure.
///
/// Clipboard writes are a convenience side effect of the upload pipeline;
/// callers log these errors instead of failing the upload.
#[derive(Debug, Clone, Error)]
#[error("clipboard access failed: {0}")]
pub struct ClipboardError(pub String);

/// Trait for system clipboard operations.
///
/// Implementations include the production arboard-backed clipboard and an
/// in-memory clipboard for tests.
pub trait Clipboard: Send + Sync {
    /// Remove the current clipboard contents.
    fn clear(&self) -> Result<(), ClipboardError>;

    /// Replace the clipboard contents with the given text.
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError("no display".to_string());
        assert_eq!(err.to_string(), "clipboard access failed: no display");
    }
}
