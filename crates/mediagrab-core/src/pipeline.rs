//! Classifier-driven fetch pipeline: the internal "download from URL" call.
//!
//! Every failure is logged here and collapses to `None`; no error escapes
//! past [`Downloader::download`].

use crate::classify::{route_for, FetchRoute};
use crate::config::{self, GrabConfig};
use crate::direct::{fetch_direct, DirectOptions};
use crate::error::FetchError;
use crate::extractor::{fetch_with_extractor, ExtractionBackend, YtDlp};
use std::path::{Path, PathBuf};

/// Downloads land here unless a directory is passed explicitly.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Stateless apart from its settings; each call is independent.
pub struct Downloader {
    direct: DirectOptions,
    backend: Box<dyn ExtractionBackend>,
}

impl Downloader {
    /// Pipeline with the yt-dlp backend configured from `config`.
    pub fn new(config: &GrabConfig) -> Self {
        let backend = YtDlp::new(config.extractor.clone());
        Self::with_backend(config, Box::new(backend))
    }

    pub fn with_backend(config: &GrabConfig, backend: Box<dyn ExtractionBackend>) -> Self {
        Self {
            direct: DirectOptions::from(config),
            backend,
        }
    }

    /// Download `url` into `output_dir`, creating the directory if needed.
    pub fn try_download(&self, url: &str, output_dir: &Path) -> Result<PathBuf, FetchError> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| FetchError::io("create directory", output_dir, e))?;

        match route_for(url) {
            FetchRoute::Direct => fetch_direct(url, output_dir, &self.direct),
            FetchRoute::Extractor => fetch_with_extractor(self.backend.as_ref(), url, output_dir),
        }
    }

    /// Like [`try_download`](Self::try_download) but logs the failure and returns `None`.
    pub fn download(&self, url: &str, output_dir: &Path) -> Option<PathBuf> {
        match self.try_download(url, output_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(url, "download failed: {}", e);
                None
            }
        }
    }
}

/// Download `url` into `output_dir` using the on-disk config (or defaults).
pub fn download_from_url(url: &str, output_dir: &Path) -> Option<PathBuf> {
    let cfg = config::load_or_default();
    Downloader::new(&cfg).download(url, output_dir)
}
