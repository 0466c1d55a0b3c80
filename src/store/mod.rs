//! Durable, observable storage for upload history and client settings.
//!
//! The store owns the single JSON document holding [`Settings`] and the
//! ordered (most-recent-first) list of [`UploadedImage`] records. It is
//! the only component that mutates persisted state; every mutation is
//! serialized by an internal lock, persisted immediately, and announced
//! on a broadcast channel so dependent components (menu, history views)
//! can rebuild without polling.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::PhabricatorApi;
use crate::models::{Settings, UploadedImage};
use crate::traits::HttpClient;

/// The application directory name under the home directory.
const STORE_DIR: &str = ".phabshot";

/// The store file name.
const STORE_FILE: &str = "store.json";

/// Capacity of the change-event channel; slow subscribers lose old events
/// rather than blocking writers.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// A change announced by the store after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A new upload was prepended to the history.
    Inserted(UploadedImage),
    /// The history was emptied and settings reset.
    Cleared,
    /// Settings were replaced.
    SettingsUpdated,
}

/// The persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    images: Vec<UploadedImage>,
}

/// Durable upload history and settings store.
pub struct UploadStore {
    path: PathBuf,
    // A panicking holder leaves the document consistent, so poisoned
    // locks are recovered instead of crashing the process.
    inner: Mutex<StoreDocument>,
    previews: Mutex<HashMap<String, Bytes>>,
    events: broadcast::Sender<StoreEvent>,
}

impl UploadStore {
    /// Open the store at its default location, `~/.phabshot/store.json`.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn open() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::open_at(home.join(STORE_DIR).join(STORE_FILE)))
    }

    /// Open a store backed by the given file path.
    ///
    /// A missing or unreadable file yields an empty store; corruption is
    /// logged and discarded rather than propagated.
    pub fn open_at(path: PathBuf) -> Self {
        let document = load_document(&path);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            path,
            inner: Mutex::new(document),
            previews: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prepend an upload to the history and persist.
    pub fn insert(&self, image: UploadedImage) {
        {
            let mut doc = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            doc.images.insert(0, image.clone());
            self.persist(&doc);
        }
        let _ = self.events.send(StoreEvent::Inserted(image));
    }

    /// Snapshot of the upload history, most recent first.
    pub fn images(&self) -> Vec<UploadedImage> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).images.clone()
    }

    /// Empty the history, reset settings to defaults, and persist.
    pub fn clear_all(&self) {
        {
            let mut doc = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            *doc = StoreDocument::default();
            self.persist(&doc);
        }
        self.previews.lock().unwrap_or_else(|e| e.into_inner()).clear();
        let _ = self.events.send(StoreEvent::Cleared);
    }

    /// Current client settings.
    pub fn settings(&self) -> Settings {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .settings
            .clone()
    }

    /// Replace the client settings and persist.
    pub fn set_settings(&self, settings: Settings) {
        {
            let mut doc = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            doc.settings = settings;
            self.persist(&doc);
        }
        let _ = self.events.send(StoreEvent::SettingsUpdated);
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Fetch a preview rendering for a stored upload, caching the result.
    ///
    /// Purely advisory: any failure (unconfigured, network, decode) simply
    /// yields no preview.
    pub async fn fetch_preview<C: HttpClient>(
        &self,
        api: &PhabricatorApi<C>,
        ph_id: &str,
    ) -> Option<Bytes> {
        if let Some(cached) = self
            .previews
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(ph_id)
        {
            return Some(cached.clone());
        }

        let settings = self.settings();
        if !settings.is_configured() {
            return None;
        }

        match api.download(&settings, ph_id).await {
            Ok(data) => {
                let bytes = Bytes::from(data);
                self.previews
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(ph_id.to_string(), bytes.clone());
                Some(bytes)
            }
            Err(err) => {
                tracing::debug!(ph_id, %err, "preview fetch failed");
                None
            }
        }
    }

    /// Write the document to disk, creating the parent directory if
    /// needed. Persistence failures are logged; the in-memory state stays
    /// authoritative for the rest of the process lifetime.
    fn persist(&self, document: &StoreDocument) {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    tracing::error!(?err, path = ?self.path, "failed to create store directory");
                    return;
                }
            }
        }

        match serde_json::to_string_pretty(document) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    tracing::error!(?err, path = ?self.path, "failed to write store");
                }
            }
            Err(err) => {
                tracing::error!(?err, "failed to serialize store");
            }
        }
    }
}

fn load_document(path: &Path) -> StoreDocument {
    if !path.exists() {
        return StoreDocument::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse store; starting empty");
            StoreDocument::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read store; starting empty");
            StoreDocument::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn image(n: u32) -> UploadedImage {
        UploadedImage {
            ph_id: format!("PHID-FILE-{}", n),
            name: format!("shot-{}.png", n),
            object_name: format!("F{}", n),
        }
    }

    fn store_in(dir: &TempDir) -> UploadStore {
        UploadStore::open_at(dir.path().join(STORE_DIR).join(STORE_FILE))
    }

    #[test]
    fn test_new_store_is_empty_and_unconfigured() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.images().is_empty());
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn test_insert_prepends() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.insert(image(1));
        store.insert(image(2));

        let images = store.images();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].object_name, "F2");
        assert_eq!(images[1].object_name, "F1");
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_DIR).join(STORE_FILE);
        {
            let store = UploadStore::open_at(path.clone());
            store.set_settings(Settings {
                api_key: "api-token".to_string(),
                phab_endpoint: "https://phab.example.com".to_string(),
            });
            store.insert(image(7));
        }

        let reopened = UploadStore::open_at(path);
        assert_eq!(reopened.images(), vec![image(7)]);
        assert_eq!(reopened.settings().api_key, "api-token");
    }

    #[test]
    fn test_clear_all_resets_images_and_settings() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set_settings(Settings {
            api_key: "api-token".to_string(),
            phab_endpoint: "https://phab.example.com".to_string(),
        });
        store.insert(image(1));

        store.clear_all();

        assert!(store.images().is_empty());
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn test_corrupt_store_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STORE_DIR).join(STORE_FILE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not valid json").unwrap();

        let store = UploadStore::open_at(path);
        assert!(store.images().is_empty());
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn test_subscribe_sees_insert_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut events = store.subscribe();

        store.insert(image(3));
        store.clear_all();

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Inserted(image(3))
        );
        assert_eq!(events.try_recv().unwrap(), StoreEvent::Cleared);
    }

    #[test]
    fn test_store_stays_usable_after_a_poisoned_lock() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store_in(&dir));

        let poisoner = std::sync::Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();
        assert!(result.is_err());

        store.insert(image(5));
        assert_eq!(store.images(), vec![image(5)]);
        assert_eq!(store.settings(), Settings::default());
    }

    #[test]
    fn test_set_settings_emits_event() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut events = store.subscribe();

        store.set_settings(Settings::default());
        assert_eq!(events.try_recv().unwrap(), StoreEvent::SettingsUpdated);
    }
}
