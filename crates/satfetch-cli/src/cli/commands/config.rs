//! `satfetch config` – where the config lives and what is in effect.

use anyhow::Result;
use satfetch_core::config::{self, AccessToken};

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let mut cfg = config::load()?;
    cfg.access_token = cfg
        .access_token
        .as_ref()
        .map(|t| AccessToken::new(t.redacted()));

    println!("# config file: {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    if cfg.access_token.is_none() {
        println!("# access token: not set");
    }
    Ok(())
}
