//! Core data types: uploaded images, client settings, and preferences.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::traits::{Clipboard, ClipboardError};

/// A successfully uploaded image, as kept in the local upload history.
///
/// Never mutated after creation; removed only by clearing the whole
/// history. The serialized field names match the records written by the
/// original menu-bar application so existing stores remain readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Opaque file handle assigned by the upload endpoint (PHID). Retained
    /// for later lookups such as preview fetches; not guaranteed unique
    /// across store lifetimes.
    #[serde(rename = "phId")]
    pub ph_id: String,
    /// Display name reported back by the server.
    pub name: String,
    /// Canonical object reference token (e.g. `F123`). Non-empty for every
    /// successful upload.
    #[serde(rename = "objectName")]
    pub object_name: String,
}

impl UploadedImage {
    /// The remote-markup reference for this image, e.g. `{F123}`.
    ///
    /// The curly braces are the embed convention of the consuming wiki and
    /// ticket tooling; they must be preserved exactly.
    pub fn markup_reference(&self) -> String {
        format!("{{{}}}", self.object_name)
    }

    /// URL of the hosted object page on the given endpoint.
    pub fn page_url(&self, endpoint: &str) -> String {
        format!("{}/{}", endpoint.trim_end_matches('/'), self.object_name)
    }

    /// Replace the clipboard contents with the bare object reference.
    ///
    /// The history "copy" action: unlike the post-upload copy, this writes
    /// `F123` without braces.
    pub fn copy_reference(&self, clipboard: &dyn Clipboard) -> Result<(), ClipboardError> {
        clipboard.clear()?;
        clipboard.set_text(&self.object_name)
    }
}

/// Connection settings for the Phabricator instance.
///
/// Both fields empty means "unconfigured"; no network call is attempted in
/// that state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Static Conduit API token.
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Base URL of the Phabricator instance, without the `/api` suffix.
    #[serde(rename = "phabEndpoint", default)]
    pub phab_endpoint: String,
}

impl Settings {
    /// Whether both the token and the endpoint have been set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.phab_endpoint.is_empty()
    }
}

fn default_true() -> bool {
    true
}

/// Per-user behavior toggles for the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Ask for confirmation before uploading a detected screenshot.
    #[serde(default)]
    pub requires_upload_confirmation: bool,
    /// Downscale high-density (retina) screenshots to their logical size.
    #[serde(default)]
    pub resize_screenshots: bool,
    /// Move screenshot source files to the trash once handed to the pipeline.
    #[serde(default)]
    pub delete_screenshots_after_upload: bool,
    /// Ignore detected screenshots entirely.
    #[serde(default)]
    pub disable_screenshot_detection: bool,
    /// Clear the clipboard when an upload commits.
    #[serde(default)]
    pub clear_clipboard: bool,
    /// Copy the `{Fxxx}` markup reference to the clipboard after upload.
    #[serde(default = "default_true")]
    pub copy_reference_to_clipboard: bool,
    /// Wrap the base64 upload payload at 64 columns. Some server builds
    /// accept both forms; kept configurable until verified against the
    /// real endpoint.
    #[serde(default)]
    pub wrap_base64: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            requires_upload_confirmation: false,
            resize_screenshots: false,
            delete_screenshots_after_upload: false,
            disable_screenshot_detection: false,
            clear_clipboard: false,
            copy_reference_to_clipboard: true,
            wrap_base64: false,
        }
    }
}

impl Preferences {
    /// Load preferences from a JSON file.
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(?err, ?path, "failed to parse preferences; using defaults");
                Self::default()
            }),
            Err(err) => {
                tracing::warn!(?err, ?path, "failed to read preferences; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_reference_wraps_in_braces() {
        let image = UploadedImage {
            ph_id: "PHID-FILE-1".to_string(),
            name: "square.png".to_string(),
            object_name: "F1".to_string(),
        };
        assert_eq!(image.markup_reference(), "{F1}");
    }

    #[test]
    fn test_page_url() {
        let image = UploadedImage {
            ph_id: "PHID-FILE-1".to_string(),
            name: "square.png".to_string(),
            object_name: "F1".to_string(),
        };
        assert_eq!(
            image.page_url("https://phab.example.com/"),
            "https://phab.example.com/F1"
        );
        assert_eq!(
            image.page_url("https://phab.example.com"),
            "https://phab.example.com/F1"
        );
    }

    #[test]
    fn test_copy_reference_clears_then_sets_bare_object_name() {
        use crate::adapters::mock::{ClipboardOp, InMemoryClipboard};

        let image = UploadedImage {
            ph_id: "PHID-FILE-1".to_string(),
            name: "square.png".to_string(),
            object_name: "F1".to_string(),
        };
        let clipboard = InMemoryClipboard::new();
        image.copy_reference(&clipboard).unwrap();
        assert_eq!(
            clipboard.ops(),
            vec![ClipboardOp::Clear, ClipboardOp::Set("F1".to_string())]
        );
    }

    #[test]
    fn test_uploaded_image_serde_field_names() {
        let image = UploadedImage {
            ph_id: "PHID-FILE-9".to_string(),
            name: "shot.png".to_string(),
            object_name: "F9".to_string(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["phId"], "PHID-FILE-9");
        assert_eq!(json["name"], "shot.png");
        assert_eq!(json["objectName"], "F9");

        let roundtrip: UploadedImage = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, image);
    }

    #[test]
    fn test_settings_is_configured() {
        assert!(!Settings::default().is_configured());
        assert!(!Settings {
            api_key: "api-token".to_string(),
            phab_endpoint: String::new(),
        }
        .is_configured());
        assert!(!Settings {
            api_key: String::new(),
            phab_endpoint: "https://phab.example.com".to_string(),
        }
        .is_configured());
        assert!(Settings {
            api_key: "api-token".to_string(),
            phab_endpoint: "https://phab.example.com".to_string(),
        }
        .is_configured());
    }

    #[test]
    fn test_settings_serde_field_names() {
        let settings: Settings = serde_json::from_str(
            r#"{"apiKey": "api-abc", "phabEndpoint": "https://phab.example.com"}"#,
        )
        .unwrap();
        assert_eq!(settings.api_key, "api-abc");
        assert_eq!(settings.phab_endpoint, "https://phab.example.com");
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = Preferences::default();
        assert!(!prefs.requires_upload_confirmation);
        assert!(!prefs.resize_screenshots);
        assert!(!prefs.delete_screenshots_after_upload);
        assert!(!prefs.disable_screenshot_detection);
        assert!(!prefs.clear_clipboard);
        assert!(prefs.copy_reference_to_clipboard);
        assert!(!prefs.wrap_base64);
    }

    #[test]
    fn test_preferences_partial_json_uses_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"resize_screenshots": true}"#).unwrap();
        assert!(prefs.resize_screenshots);
        assert!(prefs.copy_reference_to_clipboard);
        assert!(!prefs.clear_clipboard);
    }

    #[test]
    fn test_preferences_load_missing_file() {
        let prefs = Preferences::load(Path::new("/nonexistent/preferences.json"));
        assert_eq!(prefs, Preferences::default());
    }
}
