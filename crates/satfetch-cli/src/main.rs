use satfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; an unwritable state dir falls back to stderr.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", e);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("satfetch error: {:#}", err);
        std::process::exit(1);
    }
}
