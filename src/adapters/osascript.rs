//! macOS user-interaction adapters built on `osascript`.
//!
//! Notification banners, the modal upload-confirmation dialog, and
//! move-to-trash all go through `osascript` for reliable delivery from a
//! non-bundled process (no bundle identifier or permissions needed).
//! Everything here is a no-op (or auto-approves) on other platforms.

use async_trait::async_trait;

use crate::traits::{ConfirmationGate, Notifier, Trash};

/// Escape double quotes and backslashes for AppleScript string literals.
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(target_os = "macos")]
fn run_osascript(script: &str) -> Result<std::process::Output, String> {
    use std::process::Command;

    Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|e| e.to_string())
}

/// Notification Center banners via `display notification`.
///
/// Dispatch is spawned onto a blocking task so it never suspends the
/// upload pipeline; delivery failures are logged and discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsaNotifier;

impl Notifier for OsaNotifier {
    fn notify(&self, title: &str, body: &str) {
        let title = title.to_string();
        let body = body.to_string();

        tokio::spawn(async move {
            let _ = tokio::task::spawn_blocking(move || {
                send_notification(&title, &body);
            })
            .await;
        });
    }
}

#[cfg(target_os = "macos")]
fn send_notification(title: &str, body: &str) {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        applescript_escape(body),
        applescript_escape(title)
    );

    match run_osascript(&script) {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("osascript notification failed: {}", stderr.trim());
        }
        Err(e) => {
            tracing::warn!("failed to spawn osascript: {}", e);
        }
        _ => {
            tracing::debug!("OS notification sent");
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn send_notification(title: &str, body: &str) {
    tracing::info!("{}: {}", title, body);
}

/// Modal upload confirmation via `display dialog`.
///
/// Blocks the asking task (on a blocking thread) until the user picks
/// "Upload" or "Cancel". On platforms without osascript the gate
/// auto-approves.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsaConfirmationGate;

#[async_trait]
impl ConfirmationGate for OsaConfirmationGate {
    async fn confirm(&self, image_name: &str, _image_bytes: &[u8]) -> bool {
        let name = image_name.to_string();
        match tokio::task::spawn_blocking(move || ask_confirmation(&name)).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::warn!(%err, "confirmation dialog task failed");
                false
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn ask_confirmation(image_name: &str) -> bool {
    let script = format!(
        concat!(
            "display dialog \"Do you want to upload this screenshot?\n",
            "\\\"{}\\\" will be uploaded to Phabricator, where it will be ",
            "publicly accessible.\" buttons {{\"Cancel\", \"Upload\"}} ",
            "default button \"Upload\" with icon caution"
        ),
        applescript_escape(image_name)
    );

    // osascript exits non-zero when the user cancels the dialog.
    match run_osascript(&script) {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::warn!("failed to spawn osascript: {}", e);
            false
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn ask_confirmation(_image_name: &str) -> bool {
    true
}

/// Finder move-to-trash via osascript, fire-and-forget.
///
/// Failure never affects the upload; it is logged and forgotten.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsaTrash;

impl Trash for OsaTrash {
    fn move_to_trash(&self, path: &std::path::Path) {
        let path = path.to_path_buf();
        tokio::spawn(async move {
            let _ = tokio::task::spawn_blocking(move || {
                trash_file(&path);
            })
            .await;
        });
    }
}

#[cfg(target_os = "macos")]
fn trash_file(path: &std::path::Path) {
    let script = format!(
        "tell application \"Finder\" to delete POSIX file \"{}\"",
        applescript_escape(&path.to_string_lossy())
    );

    match run_osascript(&script) {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(?path, "move to trash failed: {}", stderr.trim());
        }
        Err(e) => {
            tracing::warn!("failed to spawn osascript: {}", e);
        }
        _ => {
            tracing::debug!(?path, "moved screenshot to trash");
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn trash_file(path: &std::path::Path) {
    tracing::debug!(?path, "move to trash is not supported on this platform");
}
