//! CLI for the satfetch tile downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_batch, run_config, run_status, Overrides};

/// Top-level CLI for satfetch.
#[derive(Debug, Parser)]
#[command(name = "satfetch")]
#[command(about = "satfetch: resumable satellite tile downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every zoom level for every record in a CSV file.
    Run {
        /// CSV file with `lat` and `long` columns.
        #[arg(default_value = "train.csv")]
        input: PathBuf,
        /// Directory tiles are written to (overrides config and OUTPUT_DIR).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Zoom level to fetch; repeat for several (overrides config and ZOOM_LEVELS).
        #[arg(long = "zoom", value_name = "LEVEL")]
        zoom: Vec<u32>,
        /// Print the final summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Count cached and missing tiles for a CSV file. No network access.
    Status {
        /// CSV file with `lat` and `long` columns.
        #[arg(default_value = "train.csv")]
        input: PathBuf,
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        #[arg(long = "zoom", value_name = "LEVEL")]
        zoom: Vec<u32>,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                input,
                output_dir,
                zoom,
                json,
            } => run_batch(&input, Overrides { output_dir, zoom }, json)?,
            CliCommand::Status {
                input,
                output_dir,
                zoom,
            } => run_status(&input, Overrides { output_dir, zoom })?,
            CliCommand::Config => run_config()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
