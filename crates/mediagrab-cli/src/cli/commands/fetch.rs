//! `mediagrab fetch <url>`: run the download pipeline and report the result.

use mediagrab_core::config::GrabConfig;
use mediagrab_core::{files, Downloader};
use std::path::Path;

/// Download `url` into `output_dir`. With `delete_after`, remove the file
/// again and check it is really gone. Returns false on any failure.
pub fn run_fetch(cfg: &GrabConfig, url: &str, output_dir: &Path, delete_after: bool) -> bool {
    println!("Downloading from URL: {}", url);

    let path = match Downloader::new(cfg).download(url, output_dir) {
        Some(p) => p,
        None => {
            println!("Download failed");
            return false;
        }
    };
    println!("Successfully downloaded to: {}", path.display());

    if !delete_after {
        return true;
    }
    if !files::delete_file(&path) {
        println!("Failed to delete file: {}", path.display());
        return false;
    }
    if path.exists() {
        println!("Error: file still exists despite successful deletion report");
        return false;
    }
    println!("Deleted and verified: {}", path.display());
    true
}
