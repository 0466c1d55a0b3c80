//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use phabshot::adapters::mock::{MockHttpClient, MockResponse};
use phabshot::adapters::{
    InMemoryClipboard, RecordingNotifier, RecordingTrash, ScriptedConfirmation,
};
use phabshot::models::{Preferences, Settings};
use phabshot::pipeline::UploadPipeline;
use phabshot::store::UploadStore;
use phabshot::traits::Response;

pub const ENDPOINT: &str = "https://phab.example.com";
pub const UPLOAD_URL: &str = "https://phab.example.com/api/file.upload";
pub const INFO_URL: &str = "https://phab.example.com/api/file.info";
pub const DOWNLOAD_URL: &str = "https://phab.example.com/api/file.download";

/// A fully wired pipeline over mock collaborators and a temp-dir store.
pub struct Harness {
    pub http: Arc<MockHttpClient>,
    pub clipboard: Arc<InMemoryClipboard>,
    pub notifier: Arc<RecordingNotifier>,
    pub gate: Arc<ScriptedConfirmation>,
    pub trash: Arc<RecordingTrash>,
    pub store: Arc<UploadStore>,
    pub pipeline: Arc<UploadPipeline<MockHttpClient>>,
    _dir: TempDir,
}

impl Harness {
    /// Harness with configured settings (normal operation).
    pub fn new(prefs: Preferences) -> Self {
        let harness = Self::unconfigured(prefs);
        harness.store.set_settings(Settings {
            api_key: "api-test-token".to_string(),
            phab_endpoint: ENDPOINT.to_string(),
        });
        harness
    }

    /// Harness whose store has default (empty) settings.
    pub fn unconfigured(prefs: Preferences) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(UploadStore::open_at(dir.path().join("store.json")));

        let http = Arc::new(MockHttpClient::new());
        let clipboard = Arc::new(InMemoryClipboard::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let gate = Arc::new(ScriptedConfirmation::approve_all());
        let trash = Arc::new(RecordingTrash::new());

        let pipeline = Arc::new(UploadPipeline::new(
            Arc::clone(&http),
            Arc::clone(&store),
            prefs,
            clipboard.clone() as Arc<dyn phabshot::traits::Clipboard>,
            notifier.clone() as Arc<dyn phabshot::traits::Notifier>,
            gate.clone() as Arc<dyn phabshot::traits::ConfirmationGate>,
            trash.clone() as Arc<dyn phabshot::traits::Trash>,
        ));

        Self {
            http,
            clipboard,
            notifier,
            gate,
            trash,
            store,
            pipeline,
            _dir: dir,
        }
    }

    /// Replace the confirmation gate (rebuilds the pipeline).
    pub fn with_gate(mut self, gate: ScriptedConfirmation, prefs: Preferences) -> Self {
        let gate = Arc::new(gate);
        self.gate = Arc::clone(&gate);
        self.pipeline = Arc::new(UploadPipeline::new(
            Arc::clone(&self.http),
            Arc::clone(&self.store),
            prefs,
            self.clipboard.clone() as Arc<dyn phabshot::traits::Clipboard>,
            self.notifier.clone() as Arc<dyn phabshot::traits::Notifier>,
            gate as Arc<dyn phabshot::traits::ConfirmationGate>,
            self.trash.clone() as Arc<dyn phabshot::traits::Trash>,
        ));
        self
    }

    /// Mock the standard two-step success exchange.
    pub fn mock_success(&self, ph_id: &str, name: &str, object_name: &str) {
        self.http.set_response(
            UPLOAD_URL,
            json_ok(&format!(r#"{{"result":"{}"}}"#, ph_id)),
        );
        self.http.set_response(
            INFO_URL,
            json_ok(&format!(
                r#"{{"result":{{"name":"{}","objectName":"{}"}}}}"#,
                name, object_name
            )),
        );
    }
}

/// A 200 response with the given JSON body.
pub fn json_ok(body: &str) -> MockResponse {
    MockResponse::Success(Response::new(200, Bytes::from(body.to_string())))
}

/// A 10x10 black square encoded as PNG.
pub fn black_square_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("png encode");
    buf
}
