//! Upload error taxonomy.
//!
//! Every failure is terminal for the single upload it occurs in; nothing
//! is retried and nothing crashes the process. All failures are reported
//! through one sink (log + notification).

use thiserror::Error;

use crate::traits::HttpError;

/// Fallback notification body when an error carries no useful message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Notification body raised when the endpoint or token is missing.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Please go to Settings and set your Phabricator endpoint and API key!";

/// A terminal failure of a single upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Source file missing or unreadable.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Endpoint or API token not configured; no network call was made.
    #[error("Phabricator endpoint and API key are not configured")]
    NotConfigured,

    /// Network unreachable, non-2xx status, or malformed JSON body.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// Well-formed response missing an expected field.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl UploadError {
    /// The human-readable message for the failure notification.
    ///
    /// Transport and IO errors surface their own message; everything else
    /// degrades to a generic message, with the detail kept in the logs.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::NotConfigured => NOT_CONFIGURED_MESSAGE.to_string(),
            UploadError::Io(err) => err.to_string(),
            UploadError::Transport(err) => err.to_string(),
            UploadError::Decode(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}
