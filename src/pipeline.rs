//! The upload pipeline.
//!
//! Takes an image (file path or in-memory bytes) through screenshot
//! policies, optional downscaling, the two-step upload/resolve Conduit
//! protocol, and the commit side effects (store insert, clipboard copy,
//! notification). Each upload runs as an independent task; the only
//! mutual exclusion is the single-modal confirmation prompt and the
//! store's serialized insert.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::PhabricatorApi;
use crate::error::UploadError;
use crate::models::{Preferences, UploadedImage};
use crate::store::UploadStore;
use crate::traits::{Clipboard, ConfirmationGate, HttpClient, Notifier, Trash};
use crate::transform;

/// Display name used when uploading an anonymous byte buffer.
pub const DEFAULT_IMAGE_NAME: &str = "Filename.png";

/// Notification title for successful uploads.
pub const SUCCESS_TITLE: &str = "Phabricator Upload Succeeded";

/// Notification title for failed uploads.
pub const FAILURE_TITLE: &str = "Phabricator Upload Failed";

/// The image to upload.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Read the bytes from a file on disk.
    Path(PathBuf),
    /// Bytes already in memory, with a display name.
    Bytes {
        /// Raw image data.
        data: Vec<u8>,
        /// Display name sent to the server.
        name: String,
    },
}

impl ImageSource {
    /// An in-memory source with the default display name.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        ImageSource::Bytes {
            data,
            name: DEFAULT_IMAGE_NAME.to_string(),
        }
    }
}

/// How a pipeline run ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The upload committed; the image is the new head of the store.
    Completed(UploadedImage),
    /// Screenshot policy stopped the upload before any network activity.
    /// Not an error: nothing is reported.
    Abandoned,
}

/// End-to-end upload orchestrator.
///
/// Holds no durable state of its own; it reads settings from the store
/// and appends results to it.
pub struct UploadPipeline<C> {
    api: PhabricatorApi<C>,
    store: Arc<UploadStore>,
    prefs: Preferences,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    gate: Arc<dyn ConfirmationGate>,
    trash: Arc<dyn Trash>,
    /// Held across the confirmation prompt so at most one modal is open.
    confirm_slot: tokio::sync::Mutex<()>,
}

impl<C: HttpClient + 'static> UploadPipeline<C> {
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        http: Arc<C>,
        store: Arc<UploadStore>,
        prefs: Preferences,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        gate: Arc<dyn ConfirmationGate>,
        trash: Arc<dyn Trash>,
    ) -> Self {
        Self {
            api: PhabricatorApi::new(http),
            store,
            prefs,
            clipboard,
            notifier,
            gate,
            trash,
            confirm_slot: tokio::sync::Mutex::new(()),
        }
    }

    /// Fire-and-forget upload; failures are reported via notification and
    /// log only.
    pub fn spawn(self: &Arc<Self>, source: ImageSource, is_screenshot: bool) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _ = pipeline.run(source, is_screenshot).await;
        });
    }

    /// Run an upload to its terminal state.
    ///
    /// Failures are routed through the reporting sink before being
    /// returned; abandonment is silent.
    pub async fn run(
        &self,
        source: ImageSource,
        is_screenshot: bool,
    ) -> Result<UploadOutcome, UploadError> {
        match self.drive(source, is_screenshot).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.report_failure(&err);
                Err(err)
            }
        }
    }

    async fn drive(
        &self,
        source: ImageSource,
        is_screenshot: bool,
    ) -> Result<UploadOutcome, UploadError> {
        // Read
        let (mut bytes, name, source_path) = match source {
            ImageSource::Path(path) => {
                let data = tokio::fs::read(&path).await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string());
                (data, name, Some(path))
            }
            ImageSource::Bytes { data, name } => (data, name, None),
        };

        // Screenshot-specific policies
        if is_screenshot {
            if self.prefs.disable_screenshot_detection {
                tracing::debug!(%name, "screenshot detection disabled, skipping upload");
                return Ok(UploadOutcome::Abandoned);
            }

            if self.prefs.requires_upload_confirmation {
                let _slot = self.confirm_slot.lock().await;
                if !self.gate.confirm(&name, &bytes).await {
                    tracing::debug!(%name, "upload declined by user");
                    return Ok(UploadOutcome::Abandoned);
                }
            }

            if let Some(resized) =
                transform::downscale_high_density(&bytes, self.prefs.resize_screenshots)
            {
                bytes = resized;
            }

            if self.prefs.delete_screenshots_after_upload {
                if let Some(path) = &source_path {
                    self.trash.move_to_trash(path);
                }
            }
        }

        // Settings gate: no network traffic without endpoint and token.
        let settings = self.store.settings();
        if !settings.is_configured() {
            return Err(UploadError::NotConfigured);
        }

        // Upload, then resolve the handle into a durable reference.
        let ph_id = self
            .api
            .upload_file(&settings, &name, &bytes, self.prefs.wrap_base64)
            .await?;
        let info = self.api.file_info(&settings, &ph_id).await?;

        let image = UploadedImage {
            ph_id,
            name: info.name,
            object_name: info.object_name,
        };

        // Commit
        if self.prefs.clear_clipboard {
            if let Err(err) = self.clipboard.clear() {
                tracing::warn!(%err, "failed to clear clipboard");
            }
        }

        self.store.insert(image.clone());

        if self.prefs.copy_reference_to_clipboard && !image.object_name.is_empty() {
            if let Err(err) = self.clipboard.set_text(&image.markup_reference()) {
                tracing::warn!(%err, "failed to copy reference to clipboard");
            }
        }

        self.notifier.notify(SUCCESS_TITLE, &image.object_name);
        tracing::info!(
            ph_id = %image.ph_id,
            object_name = %image.object_name,
            "upload completed"
        );

        Ok(UploadOutcome::Completed(image))
    }

    /// The single error-reporting sink for all terminal failures.
    fn report_failure(&self, err: &UploadError) {
        tracing::error!(error = %err, "upload failed");
        self.notifier.notify(FAILURE_TITLE, &err.user_message());
    }
}
