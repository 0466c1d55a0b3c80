//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of the [`HttpClient`] trait. The upstream
//! transport default would wait indefinitely, so the client carries an
//! explicit bounded timeout; expiry surfaces as [`HttpError::Timeout`].

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{FormParams, HttpClient, HttpError, Response};

/// Bound on every request, connection setup included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new client with the default 30-second timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Create a client wrapping a custom `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_form(&self, url: &str, params: &FormParams) -> Result<Response, HttpError> {
        let response = self
            .client
            .post(url)
            .form(params)
            .send()
            .await
            .map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::new(status, body))
    }
}
