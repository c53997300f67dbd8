use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the podstamp config directory. It is created when the config is first saved.
pub fn podstamp_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("podstamp");

    Ok(config_dir)
}
