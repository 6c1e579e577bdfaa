pub mod clean;
pub mod config;
pub mod info;
pub mod stack;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rawstack_core::pipeline::config::StackConfig;

/// Load a TOML config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<StackConfig> {
    let Some(path) = path else {
        return Ok(StackConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
}

/// Directory argument, defaulting to the current directory.
pub fn resolve_dir(dir: Option<&PathBuf>) -> PathBuf {
    dir.cloned().unwrap_or_else(|| PathBuf::from("."))
}
