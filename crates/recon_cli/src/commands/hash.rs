use anyhow::{Context, Result};
use recon_engine::{HashIntegrity, RowHasher};
use recon_parser::load_dataset;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(
    reference_path: &str,
    candidate_path: &str,
    columns: Option<Vec<String>>,
    config_path: Option<&str>,
) -> Result<()> {
    info!("Comparing content hashes of {} and {}", reference_path, candidate_path);

    let config = super::load_config(config_path)?;

    let reference = load_dataset(Path::new(reference_path))
        .with_context(|| format!("Failed to load reference dataset: {}", reference_path))?;
    let candidate = load_dataset(Path::new(candidate_path))
        .with_context(|| format!("Failed to load candidate dataset: {}", candidate_path))?;

    let hasher = match columns.or(config.hash_columns) {
        Some(columns) => RowHasher::with_columns(columns),
        None => RowHasher::new(),
    };

    let report = HashIntegrity::compare_datasets(
        &hasher,
        &config.labels,
        &reference,
        &candidate,
        config.sample_limit,
    )?;

    if report.passed() {
        output::print_success(&report.message());
        Ok(())
    } else {
        output::print_failure(&report.message());
        std::process::exit(1);
    }
}
