pub mod diff;
pub mod hash;
pub mod report;
pub mod schema;

use anyhow::{Context, Result};
use recon_core::ReconConfig;
use recon_parser::parse_config_file;
use std::path::Path;

/// Loads the configuration file if one was given, defaults otherwise.
pub(crate) fn load_config(path: Option<&str>) -> Result<ReconConfig> {
    match path {
        Some(path) => parse_config_file(Path::new(path))
            .with_context(|| format!("Failed to load configuration file: {}", path)),
        None => Ok(ReconConfig::default()),
    }
}
