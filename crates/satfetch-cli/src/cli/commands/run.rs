//! `satfetch run` – fetch all tiles for a CSV file.

use anyhow::Result;
use satfetch_core::batch::{BatchRunner, BatchSummary};
use satfetch_core::config::ConfigError;
use satfetch_core::fetch::FetchClient;
use satfetch_core::logging;
use satfetch_core::record::read_records;
use satfetch_core::storage::ensure_dir;
use satfetch_core::transport::CurlTransport;
use std::path::Path;
use std::time::{Duration, Instant};

use super::{resolve_config, Overrides};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

pub fn run_batch(input: &Path, overrides: Overrides, json: bool) -> Result<()> {
    let cfg = resolve_config(overrides)?;
    ensure_dir(&cfg.output_dir).map_err(|source| ConfigError::OutputDir {
        path: cfg.output_dir.clone(),
        source,
    })?;
    let records = read_records(input)?;
    let total = records.len();
    tracing::info!(
        records = total,
        zooms = cfg.zoom_levels.len(),
        "starting run from {} into {}",
        input.display(),
        cfg.output_dir.display()
    );

    let client = FetchClient::new(&cfg, CurlTransport::new(cfg.request_timeout));
    let runner = BatchRunner::new(client);

    let started = Instant::now();
    let mut last_print = Instant::now();
    let mut summary = BatchSummary::default();
    for outcome in runner.run(records, &cfg.zoom_levels) {
        summary.record(&outcome);

        if !json && last_print.elapsed() >= PROGRESS_INTERVAL {
            println!(
                "  {}/{} records  fetched {}  skipped {}  failed {}",
                summary.records, total, summary.fetched, summary.skipped, summary.failed
            );
            last_print = Instant::now();
        }
    }

    let elapsed = started.elapsed();
    tracing::info!(
        fetched = summary.fetched,
        skipped = summary.skipped,
        failed = summary.failed,
        "run finished in {:.1}s",
        elapsed.as_secs_f64()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Done: {} records, {} tiles ({} fetched, {} skipped, {} failed), {} bytes in {:.1}s",
            summary.records,
            summary.tiles(),
            summary.fetched,
            summary.skipped,
            summary.failed,
            summary.bytes_written,
            elapsed.as_secs_f64()
        );
        if summary.failed > 0 {
            if let Ok(log) = logging::log_file_path() {
                println!("Failed tiles are listed in {}", log.display());
            }
            println!("Re-run the same command to retry failed tiles.");
        }
    }
    Ok(())
}
