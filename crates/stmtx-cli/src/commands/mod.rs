//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use stmtx_core::StatementConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stmtx")
        .join("config.json")
}

/// Load the configuration given with `--config`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatementConfig> {
    match config_path {
        Some(path) => StatementConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e)),
        None => Ok(StatementConfig::default()),
    }
}
