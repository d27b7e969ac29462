mod cli;

use crate::cli::Cli;
use clap::Parser;
use mediagrab_core::logging;

fn main() {
    let cli = Cli::parse();

    if cli.log_file {
        if let Err(e) = logging::init_logging() {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable, using stderr: {:#}", e);
        }
    } else {
        logging::init_logging_stderr();
    }

    match cli.run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("mediagrab error: {:#}", err);
            std::process::exit(1);
        }
    }
}
