use anyhow::{Context, Result};
use recon_parser::load_dbt_results;
use recon_report::TestReportRenderer;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(run_results_path: &str, manifest_path: &str, out_path: &str) -> Result<()> {
    info!("Rendering test report from {}", run_results_path);

    let results = load_dbt_results(Path::new(run_results_path), Path::new(manifest_path))
        .context("Failed to load dbt results")?;

    let report = TestReportRenderer::new()?.render(&results.outcomes, &results.metadata())?;
    report
        .write(out_path)
        .with_context(|| format!("Failed to write report: {}", out_path))?;

    let summary = &report.summary;
    output::print_success(&format!("Report written to: {}", out_path));
    println!(
        "  Total: {} | Passed: {} | Failed: {} | Errors: {}",
        summary.total, summary.passed, summary.failed, summary.errored
    );
    if !summary.is_passing() {
        output::print_warning(&format!("Overall status: {}", summary.overall));
    }

    Ok(())
}
