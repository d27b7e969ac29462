//! yt-dlp backend: runs the `yt-dlp` executable and reads its JSON output.
//!
//! Each call is a blocking child process. Probing uses `--dump-single-json`
//! in simulate mode; downloading adds `--no-simulate` and asks yt-dlp to
//! print the final path of every file after post-processing.

use super::info::MediaInfo;
use super::{DownloadReport, ExtractionBackend};
use crate::config::ExtractorConfig;
use crate::error::FetchError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Environment variable naming the yt-dlp executable when the config does not.
pub const YTDLP_ENV: &str = "MEDIAGRAB_YTDLP";

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Keep this many trailing stderr lines in error messages.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    config: ExtractorConfig,
}

impl YtDlp {
    pub fn new(config: ExtractorConfig) -> Self {
        let program = find_ytdlp(&config);
        Self { program, config }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Flags shared by the probe and download calls.
    fn common_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--no-playlist".into(),
            "--no-progress".into(),
            "-f".into(),
            self.config.format.clone().into(),
        ];
        if self.config.ignore_errors {
            args.push("--ignore-errors".into());
        }
        if !self.config.check_certificates {
            args.push("--no-check-certificates".into());
        }
        if self.config.geo_bypass {
            args.push("--geo-bypass".into());
        }
        args
    }

    pub(crate) fn probe_args(&self, url: &str) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("--dump-single-json".into());
        args.push("--".into());
        args.push(url.into());
        args
    }

    pub(crate) fn download_args(&self, url: &str, output_dir: &Path) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("-o".into());
        args.push(output_dir.join(OUTPUT_TEMPLATE).into_os_string());
        args.push("--recode-video".into());
        args.push(self.config.container.clone().into());
        if let Some(ffmpeg) = &self.config.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }
        args.push("--print".into());
        args.push("after_move:filepath".into());
        args.push("--dump-single-json".into());
        args.push("--no-simulate".into());
        args.push("--".into());
        args.push(url.into());
        args
    }

    fn run(&self, args: &[OsString]) -> Result<Output, FetchError> {
        tracing::debug!(
            "running {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| FetchError::ExtractorSpawn {
                program: self.program.display().to_string(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            let line = line.trim();
            if !line.is_empty() {
                tracing::debug!(target: "mediagrab::yt_dlp", "{}", line);
            }
        }
        Ok(output)
    }
}

impl ExtractionBackend for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn container(&self) -> &str {
        &self.config.container
    }

    fn probe(&self, url: &str) -> Result<MediaInfo, FetchError> {
        let output = self.run(&self.probe_args(url))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() && !output.status.success() {
            return Err(failure(&output));
        }
        MediaInfo::from_json(&stdout)?.ok_or_else(|| FetchError::ExtractionEmpty(url.to_string()))
    }

    fn download(&self, url: &str, output_dir: &Path) -> Result<DownloadReport, FetchError> {
        let output = self.run(&self.download_args(url, output_dir))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = parse_download_output(&stdout);
        if report.is_empty() && !output.status.success() {
            return Err(failure(&output));
        }
        if !output.status.success() {
            // Expected with --ignore-errors when some item failed.
            tracing::warn!("yt-dlp exited with {}", output.status);
        }
        Ok(report)
    }
}

/// Split download stdout into printed file paths and the trailing info JSON.
fn parse_download_output(stdout: &str) -> DownloadReport {
    let mut report = DownloadReport::default();
    for line in stdout.lines() {
        let line = line.trim();
        // yt-dlp prints NA for fields it does not have.
        if line.is_empty() || line == "NA" {
            continue;
        }
        if line.starts_with('{') || line == "null" {
            match MediaInfo::from_json(line) {
                Ok(info) => report.info = info,
                Err(e) => tracing::warn!("ignoring unparsable yt-dlp JSON: {}", e),
            }
        } else {
            report.paths.push(PathBuf::from(line));
        }
    }
    report
}

fn failure(output: &Output) -> FetchError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
    FetchError::ExtractorFailed {
        status: output.status.to_string(),
        stderr: tail,
    }
}

/// Executable to run: config, then `MEDIAGRAB_YTDLP`, then `yt-dlp` on PATH.
fn find_ytdlp(config: &ExtractorConfig) -> PathBuf {
    if let Some(p) = &config.binary {
        return p.clone();
    }
    match std::env::var_os(YTDLP_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => PathBuf::from("yt-dlp"),
    }
}
