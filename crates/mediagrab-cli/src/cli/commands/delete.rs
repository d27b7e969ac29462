//! `mediagrab delete <path>`.

use mediagrab_core::files;
use std::path::Path;

pub fn run_delete(path: &Path) -> bool {
    if files::delete_file(path) {
        println!("Deleted {}", path.display());
        true
    } else {
        println!("Could not delete {}", path.display());
        false
    }
}
