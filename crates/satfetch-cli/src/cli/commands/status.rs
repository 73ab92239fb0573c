//! `satfetch status` – cached vs missing tiles for a CSV file.

use anyhow::Result;
use satfetch_core::cache_key::CacheStatus;
use satfetch_core::record::read_records;
use std::path::Path;

use super::{resolve_config, Overrides};

pub fn run_status(input: &Path, overrides: Overrides) -> Result<()> {
    let cfg = resolve_config(overrides)?;
    let records = read_records(input)?;
    let status = CacheStatus::scan(
        &cfg.output_dir,
        &records,
        &cfg.zoom_levels,
        &cfg.image_format,
    );
    let zooms: Vec<String> = cfg.zoom_levels.iter().map(|z| z.to_string()).collect();

    println!("{:<10} {}", "INPUT", input.display());
    println!("{:<10} {}", "OUTPUT", cfg.output_dir.display());
    println!("{:<10} {}", "RECORDS", records.len());
    println!("{:<10} {}", "ZOOMS", zooms.join(","));
    println!("{:<10} {}", "TILES", status.total());
    println!("{:<10} {}", "CACHED", status.cached);
    println!("{:<10} {}", "MISSING", status.missing);
    Ok(())
}
