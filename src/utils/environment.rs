use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application name used for the per-user config directory
pub const APP_DIR_NAME: &str = "chat-export-explorer";

/// Get the per-user config directory (`<config_dir>/chat-export-explorer`)
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Path of the optional JSON config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.json"))
}
