use clap::Parser;
use prebuild_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize logging as early as possible.
    let verbosity = cli.verbosity();
    match cli.log_file.as_deref() {
        Some(path) => {
            if let Err(err) = logging::init_logging_to_file(path, verbosity) {
                logging::init_logging(verbosity);
                tracing::warn!("{:#}; logging to stderr instead", err);
            }
        }
        None => logging::init_logging(verbosity),
    }

    if let Err(err) = cli.run() {
        eprintln!("fetch-artifact error: {:#}", err);
        std::process::exit(1);
    }
}
