//! CLI for manually exercising the mediagrab pipeline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mediagrab_core::{config, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

use commands::{run_classify, run_delete, run_fetch};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mediagrab")]
#[command(about = "Download media from direct links or platform pages", long_about = None)]
pub struct Cli {
    /// Log to ~/.local/state/mediagrab/mediagrab.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Config file to use instead of ~/.config/mediagrab/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL (direct media file or platform page).
    Fetch {
        /// URL to download.
        url: String,
        /// Directory to save into (created if missing).
        #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Delete the file again after a successful download and verify it is gone.
        #[arg(long)]
        delete_after: bool,
    },

    /// Delete a local file.
    Delete {
        /// Path of the file to delete.
        path: PathBuf,
    },

    /// Print which fetcher would handle a URL ("direct" or "extractor").
    Classify {
        url: String,
    },
}

impl Cli {
    /// Dispatch the parsed command. Ok(false) means the operation failed
    /// in a way already reported to the user.
    pub fn run(self) -> Result<bool> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_default(),
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Fetch {
                url,
                output_dir,
                delete_after,
            } => Ok(run_fetch(&cfg, &url, &output_dir, delete_after)),
            CliCommand::Delete { path } => Ok(run_delete(&path)),
            CliCommand::Classify { url } => {
                run_classify(&url);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests;
