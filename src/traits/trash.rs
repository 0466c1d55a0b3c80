//! File trash trait abstraction.

use std::path::Path;

/// Trait for discarding a consumed screenshot source file.
///
/// Fire-and-forget: implementations schedule the move and return
/// immediately. Failure never affects the upload that requested it.
pub trait Trash: Send + Sync {
    /// Move the file at `path` to the trash.
    fn move_to_trash(&self, path: &Path);
}
