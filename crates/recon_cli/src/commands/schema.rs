use anyhow::{Context, Result};
use recon_engine::SchemaValidator;
use recon_parser::{load_observed_schema, parse_contract_file};
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(contract_path: &str, observed_path: &str, format: &str) -> Result<()> {
    info!("Checking schema contract: {}", contract_path);

    let contract = parse_contract_file(Path::new(contract_path))
        .with_context(|| format!("Failed to parse contract file: {}", contract_path))?;
    let observed = load_observed_schema(Path::new(observed_path))
        .with_context(|| format!("Failed to load observed schema: {}", observed_path))?;

    let check = SchemaValidator::new().validate(&contract, &observed);

    match format {
        "json" => output::print_json(&json!({
            "passed": check.passed(),
            "message": check.message(),
            "check": check,
        }))?,
        _ => {
            output::print_info(&format!(
                "Contract loaded: {} ({} columns)",
                contract.table_name,
                contract.columns.len()
            ));
            if check.passed() {
                output::print_success(&check.message());
            } else {
                output::print_failure(&check.message());
            }
        }
    }

    if !check.passed() {
        std::process::exit(1);
    }

    Ok(())
}
