//! Decides which fetcher handles a URL.
//!
//! A URL is "direct" when its path names a media file; everything else goes
//! through the extraction backend.

pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".avi", ".mov", ".mkv", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".ogg", ".m4a", ".aac", ".flac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRoute {
    /// Plain streaming GET of a media file.
    Direct,
    /// Delegate to the extraction backend.
    Extractor,
}

/// True if the URL path ends with a known video or audio extension (case-insensitive).
///
/// Only the path is inspected, so `?query` and `#fragment` never count.
/// Unparseable URLs are not direct.
pub fn is_direct_media_url(url: &str) -> bool {
    let parsed = match url::Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    let path = parsed.path().to_ascii_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .chain(AUDIO_EXTENSIONS)
        .any(|ext| path.ends_with(ext))
}

pub fn route_for(url: &str) -> FetchRoute {
    if is_direct_media_url(url) {
        FetchRoute::Direct
    } else {
        FetchRoute::Extractor
    }
}
