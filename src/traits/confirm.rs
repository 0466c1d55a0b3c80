//! Upload confirmation trait abstraction.

use async_trait::async_trait;

/// Trait for requesting explicit user approval before an upload.
///
/// The pipeline suspends on [`confirm`](ConfirmationGate::confirm) until a
/// decision is made, and guarantees at most one prompt is open at any
/// instant. `false` abandons the upload silently.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Ask the user whether `image_name` should be uploaded.
    ///
    /// `image_bytes` is available for a visual preview of what would be
    /// published; implementations may ignore it.
    async fn confirm(&self, image_name: &str, image_bytes: &[u8]) -> bool;
}
