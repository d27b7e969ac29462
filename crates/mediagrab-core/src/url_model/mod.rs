//! Filename derivation for direct downloads.
//!
//! The saved file is named after the last segment of the URL path,
//! sanitized for the local filesystem.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Default filename when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "downloaded_file.mp4";

/// Derives a safe filename for saving a direct download.
///
/// # Examples
///
/// - `derive_filename("https://example.com/clip.mp4")` → `"clip.mp4"`
/// - `derive_filename("https://example.com/")` → `"downloaded_file.mp4"`
pub fn derive_filename(url: &str) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
