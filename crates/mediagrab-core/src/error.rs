//! Error type shared by both fetch paths.
//!
//! Every variant is logged and collapsed to an absent result by the pipeline;
//! callers across the C boundary only ever see 0 or 1.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// libcurl reported a transport error (DNS, connect, TLS, aborted write).
    #[error("transfer failed: {0}")]
    Curl(#[from] curl::Error),

    /// Server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },

    /// Filesystem operation failed.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Body ended before the declared `Content-Length` was reached.
    #[error("partial transfer: wrote {received} of {expected} bytes")]
    PartialTransfer { expected: u64, received: u64 },

    /// The extractor executable could not be started.
    #[error("could not run {program}: {source}")]
    ExtractorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The extractor exited unsuccessfully and produced nothing usable.
    #[error("extractor exited with {status}: {stderr}")]
    ExtractorFailed { status: String, stderr: String },

    /// The extractor's JSON document could not be decoded.
    #[error("invalid extractor output: {0}")]
    ExtractorOutput(#[from] serde_json::Error),

    /// Metadata extraction returned nothing for the URL.
    #[error("failed to extract info from URL: {0}")]
    ExtractionEmpty(String),

    /// Metadata lists no format carrying a real video stream.
    #[error("no video formats available for URL: {0}")]
    NoVideoFormats(String),

    /// A playlist-shaped result had no entries.
    #[error("no entries found in result for URL: {0}")]
    NoEntries(String),

    /// The backend finished but the expected file is not on disk.
    #[error("file not found after download: {}", .0.display())]
    OutputMissing(PathBuf),
}

impl FetchError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
