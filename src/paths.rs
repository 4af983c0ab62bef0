//! Common paths for Tusk data storage
//!
//! Tusk keeps its files under ~/.config/tusk/ on all platforms:
//! - config.toml - User configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Tusk data directory (~/.config/tusk/)
pub fn tusk_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let tusk_dir = home.join(".config").join("tusk");
    fs::create_dir_all(&tusk_dir).context("Failed to create tusk directory")?;
    Ok(tusk_dir)
}

/// Get the config file path (~/.config/tusk/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(tusk_dir()?.join("config.toml"))
}
