use anyhow::{Context, Result};
use recon_engine::{StageInput, StageValidator};
use recon_parser::load_dataset;
use recon_report::WorkbookEmitter;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(
    reference_path: &str,
    candidate_path: &str,
    out_path: &str,
    config_path: Option<&str>,
    format: &str,
) -> Result<()> {
    info!("Comparing {} against {}", candidate_path, reference_path);

    let config = super::load_config(config_path)?;

    let reference = load_dataset(Path::new(reference_path))
        .with_context(|| format!("Failed to load reference dataset: {}", reference_path))?;
    let candidate = load_dataset(Path::new(candidate_path))
        .with_context(|| format!("Failed to load candidate dataset: {}", candidate_path))?;

    let validator = StageValidator::new(config.clone());
    let outcome = validator.validate(StageInput::new(&reference, &candidate))?;

    let emission = WorkbookEmitter::new(&config)
        .emit(&outcome.reconciliation, out_path)
        .with_context(|| format!("Failed to write workbook: {}", out_path))?;

    output::print_stage_report(&outcome.report, format)?;
    if format != "json" {
        output::print_info(&format!(
            "Workbook written to: {}",
            emission.artifact_path.display()
        ));
    }

    if !outcome.report.passed {
        std::process::exit(1);
    }

    Ok(())
}
