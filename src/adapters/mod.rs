//! Concrete implementations of the trait abstractions.
//!
//! This module provides production adapters implementing the traits
//! defined in `crate::traits`, plus test doubles under [`mock`].
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`ArboardClipboard`] - system clipboard using arboard
//! - [`OsaNotifier`] - Notification Center banners via osascript
//! - [`OsaConfirmationGate`] - modal upload confirmation via osascript
//! - [`OsaTrash`] - Finder move-to-trash via osascript
//!
//! # Mock Implementations
//!
//! - [`mock::MockHttpClient`] - configurable HTTP responses
//! - [`mock::InMemoryClipboard`] - clipboard writes captured in memory
//! - [`mock::RecordingNotifier`] - notifications captured in memory
//! - [`mock::ScriptedConfirmation`] - pre-scripted confirmation decisions
//! - [`mock::RecordingTrash`] - trash requests captured in memory

pub mod arboard_clipboard;
pub mod mock;
pub mod osascript;
pub mod reqwest_http;

pub use arboard_clipboard::ArboardClipboard;
pub use mock::{
    InMemoryClipboard, MockHttpClient, RecordingNotifier, RecordingTrash, ScriptedConfirmation,
};
pub use osascript::{OsaConfirmationGate, OsaNotifier, OsaTrash};
pub use reqwest_http::ReqwestHttpClient;
