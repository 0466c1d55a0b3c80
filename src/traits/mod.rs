//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for the side-effecting
//! collaborators of the upload pipeline, enabling dependency injection,
//! mocking, and better testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - form-encoded HTTP POST operations
//! - [`Clipboard`] - system clipboard access
//! - [`Notifier`] - user-visible notifications
//! - [`ConfirmationGate`] - modal upload confirmation
//! - [`Trash`] - discarding consumed screenshot files

pub mod clipboard;
pub mod confirm;
pub mod http;
pub mod notify;
pub mod trash;

pub use clipboard::{Clipboard, ClipboardError};
pub use confirm::ConfirmationGate;
pub use http::{FormParams, HttpClient, HttpError, Response};
pub use notify::Notifier;
pub use trash::Trash;
