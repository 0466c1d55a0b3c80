//! Scripted confirmation gate for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::traits::ConfirmationGate;

/// Confirmation gate test double.
///
/// Decisions can be scripted per prompt; once the script is exhausted the
/// configured default applies. Every prompted image name is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedConfirmation {
    decisions: Arc<Mutex<VecDeque<bool>>>,
    default_decision: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConfirmation {
    /// A gate that approves every upload.
    pub fn approve_all() -> Self {
        Self::with_default(true)
    }

    /// A gate that declines every upload.
    pub fn deny_all() -> Self {
        Self::with_default(false)
    }

    fn with_default(default_decision: bool) -> Self {
        Self {
            decisions: Arc::new(Mutex::new(VecDeque::new())),
            default_decision,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a decision for the next prompt.
    pub fn script(&self, decision: bool) {
        self.decisions.lock().unwrap().push_back(decision);
    }

    /// Image names the gate was asked about, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedConfirmation {
    async fn confirm(&self, image_name: &str, _image_bytes: &[u8]) -> bool {
        self.prompts.lock().unwrap().push(image_name.to_string());
        self.decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_decision)
    }
}
