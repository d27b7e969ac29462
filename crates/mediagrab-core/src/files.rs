//! Local file removal for the delete entry point.

use std::path::Path;

/// Removes the file at `path`.
///
/// Returns false if nothing exists there or removal fails (e.g. permission
/// denied, or the path is a directory). Failures are logged, never raised.
pub fn delete_file(path: &Path) -> bool {
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("file not found: {}", path.display());
            return false;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not stat file: {}", e);
            return false;
        }
    }
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("deleted file: {}", path.display());
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "error deleting file: {}", e);
            false
        }
    }
}
