//! Subcommand implementations.

pub mod config;
pub mod extract;
pub mod scan;
pub mod validate;

use std::path::Path;

use tracing::debug;

use tds_core::TdsConfig;

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TdsConfig> {
    if let Some(path) = config_path {
        return Ok(TdsConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(TdsConfig::from_file(&default_path)?)
    } else {
        Ok(TdsConfig::default())
    }
}
