//! Phabricator Conduit API client.
//!
//! Implements the three file endpoints the uploader needs: `file.upload`
//! (bytes in, opaque handle out), `file.info` (handle in, durable object
//! reference out) and `file.download` (handle in, preview bytes out).
//! All calls are form-encoded POSTs returning a JSON envelope of the form
//! `{"result": ..., "error_code": ..., "error_info": ...}`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::UploadError;
use crate::models::Settings;
use crate::traits::{FormParams, HttpClient, HttpError, Response};

/// Column width used when line-wrapped base64 is requested.
const BASE64_WRAP_COLUMNS: usize = 64;

/// Resolved metadata for an uploaded file, from `file.info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    /// Display name of the file on the server.
    pub name: String,
    /// Canonical object reference token.
    #[serde(rename = "objectName")]
    pub object_name: String,
}

/// Common Conduit response envelope.
#[derive(Debug, Deserialize)]
struct ConduitEnvelope {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_info: Option<String>,
}

/// Client for the Conduit file endpoints, generic over the HTTP transport.
#[derive(Debug, Clone)]
pub struct PhabricatorApi<C> {
    http: Arc<C>,
}

impl<C: HttpClient> PhabricatorApi<C> {
    /// Create a new API client over the given HTTP transport.
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    /// Upload raw image bytes and return the opaque file handle (PHID).
    pub async fn upload_file(
        &self,
        settings: &Settings,
        name: &str,
        data: &[u8],
        wrap_base64: bool,
    ) -> Result<String, UploadError> {
        let params: FormParams = vec![
            ("api.token".to_string(), settings.api_key.clone()),
            ("name".to_string(), name.to_string()),
            ("data_base64".to_string(), encode_base64(data, wrap_base64)),
            ("output".to_string(), "json".to_string()),
        ];

        let url = method_url(&settings.phab_endpoint, "file.upload");
        let response = self.http.post_form(&url, &params).await?;
        let result = conduit_result(&response)?;

        match result.as_str() {
            Some(ph_id) => Ok(ph_id.to_string()),
            None => Err(UploadError::Decode(
                "file.upload result is not a file handle".to_string(),
            )),
        }
    }

    /// Resolve a file handle into its durable metadata.
    pub async fn file_info(
        &self,
        settings: &Settings,
        ph_id: &str,
    ) -> Result<FileInfo, UploadError> {
        let params = handle_params(settings, ph_id);
        let url = method_url(&settings.phab_endpoint, "file.info");
        let response = self.http.post_form(&url, &params).await?;
        let result = conduit_result(&response)?;

        serde_json::from_value(result)
            .map_err(|err| UploadError::Decode(format!("file.info result: {}", err)))
    }

    /// Fetch the raw bytes of a previously uploaded file.
    pub async fn download(
        &self,
        settings: &Settings,
        ph_id: &str,
    ) -> Result<Vec<u8>, UploadError> {
        let params = handle_params(settings, ph_id);
        let url = method_url(&settings.phab_endpoint, "file.download");
        let response = self.http.post_form(&url, &params).await?;
        let result = conduit_result(&response)?;

        let encoded = result.as_str().ok_or_else(|| {
            UploadError::Decode("file.download result is not base64 data".to_string())
        })?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(|err| UploadError::Decode(format!("file.download payload: {}", err)))
    }
}

/// Base64-encode an upload payload, optionally wrapped at 64 columns.
pub fn encode_base64(data: &[u8], wrap: bool) -> String {
    let encoded = BASE64.encode(data);
    if !wrap {
        return encoded;
    }

    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / BASE64_WRAP_COLUMNS * 2);
    let bytes = encoded.as_bytes();
    for (i, chunk) in bytes.chunks(BASE64_WRAP_COLUMNS).enumerate() {
        if i > 0 {
            wrapped.push_str("\r\n");
        }
        // base64 output is always ASCII
        wrapped.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }
    wrapped
}

/// Build the URL for a Conduit method on the given endpoint.
fn method_url(endpoint: &str, method: &str) -> String {
    format!("{}/api/{}", endpoint.trim_end_matches('/'), method)
}

/// The shared parameter set for handle-based calls.
fn handle_params(settings: &Settings, ph_id: &str) -> FormParams {
    vec![
        ("api.token".to_string(), settings.api_key.clone()),
        ("phid".to_string(), ph_id.to_string()),
        ("output".to_string(), "json".to_string()),
    ]
}

/// Unwrap a Conduit envelope into its `result` value.
///
/// Non-2xx statuses and malformed JSON are transport failures; a reported
/// `error_code` carries the server's `error_info` message; a missing
/// `result` is a decode failure.
fn conduit_result(response: &Response) -> Result<serde_json::Value, UploadError> {
    if !response.is_success() {
        return Err(UploadError::Transport(HttpError::ServerError {
            status: response.status,
            message: String::from_utf8_lossy(&response.body).into_owned(),
        }));
    }

    let envelope: ConduitEnvelope = response
        .json()
        .map_err(|err| UploadError::Transport(HttpError::Other(format!(
            "malformed JSON response: {}",
            err
        ))))?;

    if let Some(code) = envelope.error_code {
        let message = envelope.error_info.unwrap_or_else(|| code.clone());
        return Err(UploadError::Transport(HttpError::Other(message)));
    }

    match envelope.result {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(UploadError::Decode("response missing result".to_string())),
    }
}
