//! dbt artifact ingestion.
//!
//! Reads `run_results.json` and `manifest.json` and turns every executed
//! test into a [`TestOutcome`]. Non-test results (models, seeds, snapshots)
//! are skipped. Missing manifest entries never fail the load; each field
//! falls back to a placeholder instead.

use crate::{Result, read_file};
use recon_core::{RunMetadata, TestOutcome, TestStatus};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Placeholder for a model or column the manifest does not name.
pub const NOT_APPLICABLE: &str = "—";

const TEST_PREFIX: &str = "test.";

#[derive(Debug, Default, Deserialize)]
struct RunResults {
    #[serde(default)]
    metadata: Option<RunResultsMetadata>,
    #[serde(default)]
    results: Option<Vec<RunResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct RunResultsMetadata {
    #[serde(default)]
    dbt_schema_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    #[serde(default)]
    unique_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    execution_time: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    nodes: Option<HashMap<String, ManifestNode>>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    attached_node: Option<String>,
    #[serde(default)]
    column_name: Option<String>,
    #[serde(default)]
    test_metadata: Option<TestMetadata>,
    #[serde(default)]
    resource_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TestMetadata {
    #[serde(default)]
    name: Option<String>,
}

/// Test outcomes of one dbt invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DbtResults {
    /// One record per executed test, in run order
    pub outcomes: Vec<TestOutcome>,
    /// `metadata.dbt_schema_version` of the run results (empty if absent)
    pub schema_version: String,
}

impl DbtResults {
    /// Run metadata for a report generated now.
    pub fn metadata(&self) -> RunMetadata {
        RunMetadata::now(self.schema_version.clone())
    }
}

/// Parse dbt run results enriched with manifest metadata.
///
/// # Example
///
/// ```rust
/// use recon_parser::parse_dbt_results;
///
/// let run_results = r#"{
///     "metadata": {"dbt_schema_version": "https://schemas.getdbt.com/dbt/run-results/v6.json"},
///     "results": [
///         {"unique_id": "test.refinery.not_null_drivers_code.1a2b", "status": "pass", "execution_time": 0.42},
///         {"unique_id": "model.refinery.drivers", "status": "success"}
///     ]
/// }"#;
/// let manifest = r#"{"nodes": {}}"#;
///
/// let results = parse_dbt_results(run_results, manifest).unwrap();
/// assert_eq!(results.outcomes.len(), 1);
/// assert_eq!(results.outcomes[0].test_name, "1a2b");
/// ```
pub fn parse_dbt_results(run_results: &str, manifest: &str) -> Result<DbtResults> {
    let run_results: RunResults = serde_json::from_str(run_results)?;
    let manifest: Manifest = serde_json::from_str(manifest)?;
    let nodes = manifest.nodes.unwrap_or_default();
    let empty = ManifestNode::default();

    let outcomes: Vec<TestOutcome> = run_results
        .results
        .unwrap_or_default()
        .into_iter()
        .filter(|result| {
            result
                .unique_id
                .as_deref()
                .is_some_and(|id| id.starts_with(TEST_PREFIX))
        })
        .map(|result| {
            let node = result
                .unique_id
                .as_deref()
                .and_then(|id| nodes.get(id))
                .unwrap_or(&empty);
            outcome(result, node)
        })
        .collect();

    debug!(tests = outcomes.len(), "parsed dbt test results");

    Ok(DbtResults {
        outcomes,
        schema_version: run_results
            .metadata
            .and_then(|metadata| metadata.dbt_schema_version)
            .unwrap_or_default(),
    })
}

/// Load dbt run results and manifest from disk.
pub fn load_dbt_results(run_results_path: &Path, manifest_path: &Path) -> Result<DbtResults> {
    let run_results = read_file(run_results_path)?;
    let manifest = read_file(manifest_path)?;
    parse_dbt_results(&run_results, &manifest)
}

fn outcome(result: RunResult, node: &ManifestNode) -> TestOutcome {
    let unique_id = result.unique_id.as_deref().unwrap_or_default();
    let test_name = non_empty(node.name.as_deref())
        .unwrap_or_else(|| last_segment(unique_id))
        .to_string();

    let model = non_empty(node.attached_node.as_deref())
        .map(last_segment)
        .unwrap_or(NOT_APPLICABLE)
        .to_string();

    let column = non_empty(node.column_name.as_deref())
        .unwrap_or(NOT_APPLICABLE)
        .to_string();

    let test_type = node
        .test_metadata
        .as_ref()
        .and_then(|meta| non_empty(meta.name.as_deref()))
        .or(node.resource_type.as_deref())
        .unwrap_or("test")
        .to_string();

    TestOutcome {
        test_name,
        model,
        column,
        test_type,
        status: result
            .status
            .map(TestStatus::from)
            .unwrap_or_else(|| TestStatus::Unknown("unknown".to_string())),
        execution_time: result.execution_time.unwrap_or_default(),
        message: result.message.unwrap_or_default(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn last_segment(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}
