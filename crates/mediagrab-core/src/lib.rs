pub mod config;
pub mod error;
pub mod logging;

pub mod classify;
pub mod direct;
pub mod extractor;
pub mod files;
pub mod pipeline;
pub mod progress;
pub mod url_model;

pub use error::FetchError;
pub use pipeline::{download_from_url, Downloader, DEFAULT_OUTPUT_DIR};
