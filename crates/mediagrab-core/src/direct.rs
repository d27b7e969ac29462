//! Streaming GET of a direct media file (path ends in a known extension).
//!
//! The body is written to `<output_dir>/<url basename>` chunk by chunk as
//! libcurl delivers it. The file is only created once a 2xx response starts
//! delivering a body, and it is removed again if the transfer fails.

use crate::config::GrabConfig;
use crate::error::FetchError;
use crate::progress::ProgressLog;
use crate::url_model::derive_filename;
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

const USER_AGENT: &str = concat!("mediagrab/", env!("CARGO_PKG_VERSION"));

/// Knobs for a direct download, usually taken from [`GrabConfig`].
#[derive(Debug, Clone)]
pub struct DirectOptions {
    /// libcurl receive buffer; upper bound for each chunk written to disk.
    pub chunk_size: usize,
    pub progress_step_bytes: u64,
    pub verify_tls: bool,
    pub connect_timeout: Option<Duration>,
}

impl Default for DirectOptions {
    fn default() -> Self {
        Self::from(&GrabConfig::default())
    }
}

impl From<&GrabConfig> for DirectOptions {
    fn from(cfg: &GrabConfig) -> Self {
        Self {
            chunk_size: cfg.chunk_size,
            progress_step_bytes: cfg.progress_step_bytes,
            verify_tls: cfg.verify_tls,
            connect_timeout: cfg.connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Downloads `url` into `output_dir` and returns the written file's path.
///
/// `output_dir` must already exist. Fails on transport errors, non-2xx
/// responses, disk errors, and bodies shorter than the declared length.
pub fn fetch_direct(
    url: &str,
    output_dir: &Path,
    opts: &DirectOptions,
) -> Result<PathBuf, FetchError> {
    let output_path = output_dir.join(derive_filename(url));
    tracing::info!("downloading file directly from: {}", url);

    let status = Cell::new(0u32);
    let sink = RefCell::new(BodySink::new(&output_path, opts.progress_step_bytes));

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    easy.ssl_verify_peer(opts.verify_tls)?;
    easy.ssl_verify_host(opts.verify_tls)?;
    easy.buffer_size(opts.chunk_size)?;
    if let Some(t) = opts.connect_timeout {
        easy.connect_timeout(t)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                match parse_header_line(line) {
                    HeaderLine::Status(code) => {
                        status.set(code);
                        sink.borrow_mut().progress.set_total(None);
                    }
                    HeaderLine::ContentLength(n) => sink.borrow_mut().progress.set_total(Some(n)),
                    HeaderLine::Other => {}
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if !is_success(status.get()) {
                return Ok(0); // abort: never write an error page to disk
            }
            match sink.borrow_mut().write_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("direct download write failed: {}", e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    let mut sink = sink.into_inner();
    let code = easy.response_code().unwrap_or(0);

    if let Err(e) = performed {
        sink.discard();
        if code != 0 && !is_success(code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }
        if let Some(io) = sink.error.take() {
            return Err(io);
        }
        return Err(e.into());
    }

    if !is_success(code) {
        sink.discard();
        return Err(FetchError::Http {
            url: url.to_string(),
            code,
        });
    }

    let stats = sink.progress.stats();
    if let Err(e) = sink.finish() {
        sink.discard();
        return Err(e);
    }
    if let Some(expected) = stats.total_bytes {
        if stats.bytes_done != expected {
            sink.discard();
            return Err(FetchError::PartialTransfer {
                expected,
                received: stats.bytes_done,
            });
        }
    }

    tracing::info!("successfully downloaded file to: {}", output_path.display());
    Ok(output_path)
}

fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// Destination of the response body; opens the file lazily.
struct BodySink<'a> {
    path: &'a Path,
    file: Option<File>,
    progress: ProgressLog,
    /// First disk error seen inside the write callback.
    error: Option<FetchError>,
}

impl<'a> BodySink<'a> {
    fn new(path: &'a Path, progress_step: u64) -> Self {
        Self {
            path,
            file: None,
            progress: ProgressLog::new(progress_step),
            error: None,
        }
    }

    fn write_chunk(&mut self, data: &[u8]) -> Result<(), String> {
        if let Err(e) = self.try_write(data) {
            let msg = e.to_string();
            self.error.get_or_insert(e);
            return Err(msg);
        }
        self.progress.advance(data.len() as u64);
        Ok(())
    }

    fn try_write(&mut self, data: &[u8]) -> Result<(), FetchError> {
        if self.file.is_none() {
            let f = File::create(self.path).map_err(|e| FetchError::io("create", self.path, e))?;
            self.file = Some(f);
        }
        if let Some(f) = self.file.as_mut() {
            f.write_all(data)
                .map_err(|e| FetchError::io("write", self.path, e))?;
        }
        Ok(())
    }

    /// Flush the file, creating it if the body was empty.
    fn finish(&mut self) -> Result<(), FetchError> {
        if self.file.is_none() {
            let f = File::create(self.path).map_err(|e| FetchError::io("create", self.path, e))?;
            self.file = Some(f);
        }
        match self.file.as_mut() {
            Some(f) => f.flush().map_err(|e| FetchError::io("flush", self.path, e)),
            None => Ok(()),
        }
    }

    /// Drop and remove whatever was written so far.
    fn discard(&mut self) {
        if self.file.take().is_none() {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                "could not remove partial file: {}",
                e
            ),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum HeaderLine {
    Status(u32),
    ContentLength(u64),
    Other,
}

/// Classify one raw header line as delivered by libcurl.
fn parse_header_line(line: &str) -> HeaderLine {
    let line = line.trim();
    if line.starts_with("HTTP/") {
        return line
            .split_whitespace()
            .nth(1)
            .and_then(|c| c.parse::<u32>().ok())
            .map(HeaderLine::Status)
            .unwrap_or(HeaderLine::Other);
    }
    if let Some((name, value)) = line.split_once(':') {
        if name.trim().eq_ignore_ascii_case("content-length") {
            if let Ok(n) = value.trim().parse::<u64>() {
                return HeaderLine::ContentLength(n);
            }
        }
    }
    HeaderLine::Other
}
