//! Recording trash for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::traits::Trash;

/// Trash test double capturing every requested move.
#[derive(Debug, Clone, Default)]
pub struct RecordingTrash {
    trashed: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingTrash {
    /// Create a trash with no recorded moves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path handed to the trash, in order.
    pub fn trashed(&self) -> Vec<PathBuf> {
        self.trashed.lock().unwrap().clone()
    }
}

impl Trash for RecordingTrash {
    fn move_to_trash(&self, path: &Path) {
        self.trashed.lock().unwrap().push(path.to_path_buf());
    }
}
