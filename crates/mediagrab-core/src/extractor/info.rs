//! The part of yt-dlp's info JSON this crate looks at.

use serde::Deserialize;
use std::path::PathBuf;

/// Title used when the extractor reports none.
pub const UNKNOWN_TITLE: &str = "unknown_title";

/// One downloadable stream variant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormatInfo {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    /// Video codec; `"none"` for audio-only streams, `images` for storyboards.
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

impl FormatInfo {
    /// True if the format carries an actual video stream.
    pub fn has_video(&self) -> bool {
        match self.vcodec.as_deref() {
            Some(v) => v != "none" && !v.starts_with("image"),
            None => false,
        }
    }
}

/// A file yt-dlp produced for an item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestedDownload {
    pub filepath: Option<String>,
}

/// Info document for a single item or a playlist (`entries` set).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub ext: Option<String>,
    pub formats: Option<Vec<FormatInfo>>,
    /// Playlist items. Failed items show up as `null` when errors are ignored.
    pub entries: Option<Vec<Option<MediaInfo>>>,
    /// Final path after post-processing (only present after a real download).
    pub filepath: Option<String>,
    pub requested_downloads: Option<Vec<RequestedDownload>>,
}

impl MediaInfo {
    /// Parse the JSON document printed by the extractor. `null` and blank
    /// output mean extraction produced nothing.
    pub fn from_json(text: &str) -> Result<Option<Self>, serde_json::Error> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<MediaInfo>>(text)
    }

    pub fn is_playlist(&self) -> bool {
        self.entries.is_some()
    }

    /// The item to work with: self for single items, the first non-null
    /// entry for playlists (None if the playlist is empty).
    pub fn primary(&self) -> Option<&MediaInfo> {
        match &self.entries {
            Some(entries) => entries.iter().flatten().next(),
            None => Some(self),
        }
    }

    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_TITLE)
    }

    pub fn formats(&self) -> &[FormatInfo] {
        self.formats.as_deref().unwrap_or(&[])
    }

    pub fn video_formats(&self) -> impl Iterator<Item = &FormatInfo> {
        self.formats().iter().filter(|f| f.has_video())
    }

    pub fn has_video_formats(&self) -> bool {
        self.video_formats().next().is_some()
    }

    /// Path the extractor says it wrote, if any.
    pub fn reported_path(&self) -> Option<PathBuf> {
        self.requested_downloads
            .iter()
            .flatten()
            .filter_map(|d| d.filepath.as_deref())
            .chain(self.filepath.as_deref())
            .find(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
