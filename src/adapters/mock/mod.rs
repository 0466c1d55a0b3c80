//! Test doubles for the trait abstractions.

pub mod clipboard;
pub mod confirm;
pub mod http;
pub mod notify;
pub mod trash;

pub use clipboard::{ClipboardOp, InMemoryClipboard};
pub use confirm::ScriptedConfirmation;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use notify::RecordingNotifier;
pub use trash::RecordingTrash;
