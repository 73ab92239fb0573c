//! CLI command handlers, one file per command.

mod config;
mod run;
mod status;

pub use config::run_config;
pub use run::run_batch;
pub use status::run_status;

use anyhow::Result;
use satfetch_core::config::{FetchConfig, FileConfig};
use std::path::PathBuf;

/// Command-line values layered on top of file and environment config.
#[derive(Debug, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub zoom: Vec<u32>,
}

impl Overrides {
    pub(crate) fn apply(self, cfg: &mut FileConfig) {
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if !self.zoom.is_empty() {
            cfg.zoom_levels = self.zoom;
        }
    }
}

/// Defaults, config file, `.env`/environment, then CLI flags; validated once.
fn resolve_config(overrides: Overrides) -> Result<FetchConfig> {
    let mut cfg = satfetch_core::config::load()?;
    overrides.apply(&mut cfg);
    let fetch_cfg = cfg.validate()?;
    tracing::debug!("effective config: {:?}", fetch_cfg);
    Ok(fetch_cfg)
}
