//! Extraction-backed fetcher for platform URLs (anything that is not a direct
//! media file).
//!
//! The heavy lifting (site extraction, format negotiation, transcoding) is
//! done by an external backend. This module only sequences it:
//! probe metadata, refuse early when there is no video, download, and
//! confirm the resulting file exists on disk.

mod info;
mod ytdlp;

pub use info::{FormatInfo, MediaInfo, RequestedDownload, UNKNOWN_TITLE};
pub use ytdlp::{YtDlp, YTDLP_ENV};

use crate::error::FetchError;
use crate::url_model::sanitize_filename;
use std::path::{Path, PathBuf};

/// What a backend returned from a download call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadReport {
    /// Final file paths reported by the backend, in the order produced.
    pub paths: Vec<PathBuf>,
    /// Info document for the downloaded item or playlist, if printed.
    pub info: Option<MediaInfo>,
}

impl DownloadReport {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.info.is_none()
    }
}

/// A media-extraction engine that can resolve page URLs into files.
pub trait ExtractionBackend {
    /// Name of the backend (for logging).
    fn name(&self) -> &'static str;

    /// Extension of the container every download is post-processed into.
    fn container(&self) -> &str;

    /// Extract metadata only; nothing is written to disk.
    fn probe(&self, url: &str) -> Result<MediaInfo, FetchError>;

    /// Extract, download and post-process into `output_dir`.
    fn download(&self, url: &str, output_dir: &Path) -> Result<DownloadReport, FetchError>;
}

/// Downloads `url` through `backend` into `output_dir` (which must exist).
///
/// Fails without downloading when the metadata lists no video-capable
/// format. Success means a file is actually present on disk afterwards.
pub fn fetch_with_extractor(
    backend: &dyn ExtractionBackend,
    url: &str,
    output_dir: &Path,
) -> Result<PathBuf, FetchError> {
    tracing::info!(backend = backend.name(), "extracting media info from: {}", url);
    let probed = backend.probe(url)?;
    let item = probed
        .primary()
        .ok_or_else(|| FetchError::NoEntries(url.to_string()))?;

    if probed.is_playlist() {
        tracing::debug!("playlist result, using first entry {:?}", item.title_or_default());
    }
    if !item.has_video_formats() {
        return Err(FetchError::NoVideoFormats(url.to_string()));
    }
    tracing::debug!(
        "{} of {} formats carry video for {:?}",
        item.video_formats().count(),
        item.formats().len(),
        item.title_or_default()
    );

    let report = backend.download(url, output_dir)?;
    let path = resolve_output_path(&report, item, output_dir, backend.container())?;
    tracing::info!("successfully downloaded video to: {}", path.display());
    Ok(path)
}

/// Pick the file the download produced.
///
/// Candidates in order: the first path the backend printed, the path in its
/// info document, then `<output_dir>/<title>.<container>` with the title
/// sanitized into a single path component. Only the first entry of a
/// playlist-shaped result is considered.
fn resolve_output_path(
    report: &DownloadReport,
    probed: &MediaInfo,
    output_dir: &Path,
    container: &str,
) -> Result<PathBuf, FetchError> {
    let downloaded = match &report.info {
        Some(info) => Some(
            info.primary()
                .ok_or_else(|| FetchError::NoEntries(probed.title_or_default().to_string()))?,
        ),
        None => None,
    };

    let title = sanitize_filename(downloaded.unwrap_or(probed).title_or_default());
    let title = if title.is_empty() { UNKNOWN_TITLE } else { title.as_str() };
    let guessed = output_dir.join(format!("{}.{}", title, container));

    let candidates = report
        .paths
        .first()
        .cloned()
        .into_iter()
        .chain(downloaded.and_then(MediaInfo::reported_path))
        .chain(std::iter::once(guessed.clone()));

    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
        tracing::debug!("no file at {}", candidate.display());
    }
    Err(FetchError::OutputMissing(guessed))
}
