//! Config command handlers.

use anyhow::{Context, Result};
use leadctl_core::config::{self, Config};

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    Config::save_base_url(url).context("save base URL")?;
    println!("Backend base URL set to {}.", url.trim_end_matches('/'));
    Ok(())
}
