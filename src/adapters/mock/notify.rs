//! Recording notifier for testing.

use std::sync::{Arc, Mutex};

use crate::traits::Notifier;

/// Notifier test double capturing every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    /// Create a notifier with no recorded notifications.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(title, body)` pairs raised so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}
