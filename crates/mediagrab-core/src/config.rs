use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "MEDIAGRAB_CONFIG";

/// Format selector: best non-webm video+audio, falling back to any best stream.
pub const DEFAULT_FORMAT: &str = "bestvideo[ext!=webm]+bestaudio[ext!=webm]/best[ext!=webm]/best";

/// Settings for the yt-dlp backed extraction path (`[extractor]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Path to the yt-dlp executable. None = `MEDIAGRAB_YTDLP` or `yt-dlp` on PATH.
    pub binary: Option<PathBuf>,
    /// Directory or path of the ffmpeg binary used for post-processing.
    pub ffmpeg_location: Option<PathBuf>,
    /// yt-dlp format selector.
    pub format: String,
    /// Container the final artifact is transcoded into.
    pub container: String,
    pub geo_bypass: bool,
    /// Skip unavailable items instead of aborting the whole extraction.
    pub ignore_errors: bool,
    pub check_certificates: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: None,
            ffmpeg_location: None,
            format: DEFAULT_FORMAT.to_string(),
            container: "mp4".to_string(),
            geo_bypass: true,
            ignore_errors: true,
            check_certificates: false,
        }
    }
}

/// Global configuration loaded from `~/.config/mediagrab/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Receive buffer size in bytes; each body chunk written to disk is at most this long.
    pub chunk_size: usize,
    /// Log direct-download progress every time this many more bytes are written.
    pub progress_step_bytes: u64,
    /// Verify TLS certificates on direct downloads (off by default).
    pub verify_tls: bool,
    /// Optional connect timeout for direct downloads; None keeps libcurl's default.
    pub connect_timeout_secs: Option<u64>,
    pub extractor: ExtractorConfig,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            chunk_size: 8192,
            progress_step_bytes: 1024 * 1024,
            verify_tls: false,
            connect_timeout_secs: None,
            extractor: ExtractorConfig::default(),
        }
    }
}

/// Location of the config file: `MEDIAGRAB_CONFIG` if set, else the XDG config home.
pub fn config_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(p));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mediagrab")?;
    Ok(xdg_dirs.get_config_home().join("mediagrab").join("config.toml"))
}

/// Parse a config file from `path`.
pub fn load_from(path: &Path) -> Result<GrabConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: GrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration if a file exists; defaults otherwise. Never writes to disk.
pub fn load_or_default() -> GrabConfig {
    let path = match config_path() {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!("no config location: {:#}", e);
            return GrabConfig::default();
        }
    };
    if !path.exists() {
        return GrabConfig::default();
    }
    match load_from(&path) {
        Ok(cfg) => {
            tracing::debug!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            tracing::warn!("ignoring config: {:#}", e);
            GrabConfig::default()
        }
    }
}
