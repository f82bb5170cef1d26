//! Stage validation engine.
//!
//! This module provides the [`StageValidator`] that runs every in-memory
//! check for one stage transition and folds the outcomes into a
//! [`StageReport`].

use crate::{
    HashIntegrity, PositionalDiff, Reconciliation, RowCountCheck, RowHasher, SchemaValidator,
};
use recon_core::{
    ColumnTypes, Dataset, ReconConfig, Result, SchemaContract, StageReport, StageStats,
};
use std::time::Instant;
use tracing::info;

/// Inputs for one stage transition.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    /// Reference dataset (e.g. bronze)
    pub reference: &'a Dataset,
    /// Candidate dataset (e.g. landing)
    pub candidate: &'a Dataset,
    /// Optional schema contract and the observed schema to check against it
    pub schema: Option<(&'a SchemaContract, &'a ColumnTypes)>,
}

impl<'a> StageInput<'a> {
    /// Creates inputs for a data-only comparison.
    pub fn new(reference: &'a Dataset, candidate: &'a Dataset) -> Self {
        Self {
            reference,
            candidate,
            schema: None,
        }
    }

    /// Adds a schema contract check.
    pub fn with_schema(mut self, contract: &'a SchemaContract, observed: &'a ColumnTypes) -> Self {
        self.schema = Some((contract, observed));
        self
    }
}

/// Outcome of a stage validation: the aggregated report plus the positional
/// diff, which report writers need in full.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub report: StageReport,
    pub reconciliation: Reconciliation,
}

/// Main validation engine for a stage transition.
///
/// # Example
///
/// ```rust
/// use recon_core::{Dataset, ReconConfig, Value};
/// use recon_engine::{StageInput, StageValidator};
///
/// let columns = vec!["id".to_string()];
/// let bronze = Dataset::new(columns.clone(), vec![vec![Value::Int(1)]]).unwrap();
/// let landing = Dataset::new(columns, vec![vec![Value::Int(1)]]).unwrap();
///
/// let validator = StageValidator::new(ReconConfig::new());
/// let outcome = validator.validate(StageInput::new(&bronze, &landing)).unwrap();
///
/// assert!(outcome.report.passed);
/// ```
pub struct StageValidator {
    config: ReconConfig,
    diff: PositionalDiff,
    schema_validator: SchemaValidator,
}

impl StageValidator {
    /// Creates a new validator.
    pub fn new(config: ReconConfig) -> Self {
        Self {
            diff: PositionalDiff::with_labels(config.labels.clone()),
            schema_validator: SchemaValidator::new(),
            config,
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Runs all checks for one stage transition.
    ///
    /// Order: row counts, positional diff, schema contract (when supplied),
    /// content hashes (when enabled). Every check runs; failures do not stop
    /// later checks.
    pub fn validate(&self, input: StageInput<'_>) -> Result<StageOutcome> {
        let start = Instant::now();
        let labels = &self.config.labels;
        let mut report = StageReport::success();

        // 1. Row counts
        let counts = RowCountCheck::compare(
            &labels.candidate,
            input.candidate.len(),
            &labels.reference,
            input.reference.len(),
        );
        report.record(&counts);

        // 2. Positional diff
        let reconciliation = self.diff.compare(input.reference, input.candidate)?;
        report.record(&reconciliation);

        // 3. Schema contract
        if let Some((contract, observed)) = input.schema {
            let schema = self.schema_validator.validate(contract, observed);
            report.record(&schema);
        }

        // 4. Content hashes
        if self.config.check_hashes {
            let hasher = match &self.config.hash_columns {
                Some(columns) => RowHasher::with_columns(columns.clone()),
                None => RowHasher::new(),
            };
            let integrity = HashIntegrity::compare_datasets(
                &hasher,
                labels,
                input.reference,
                input.candidate,
                self.config.sample_limit,
            )?;
            report.record(&integrity);
        }

        report.stats = StageStats {
            reference_rows: input.reference.len(),
            candidate_rows: input.candidate.len(),
            columns_compared: reconciliation.common_columns.len(),
            mismatched_rows: reconciliation.summary.mismatched_rows,
            checks_run: report.stats.checks_run,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            passed = report.passed,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "stage validation finished"
        );

        Ok(StageOutcome {
            report,
            reconciliation,
        })
    }
}

impl Default for StageValidator {
    fn default() -> Self {
        Self::new(ReconConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::Value;

    fn ids(values: &[i64]) -> Dataset {
        Dataset::new(
            vec!["id".to_string()],
            values.iter().map(|v| vec![Value::Int(*v)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_matching_stage() {
        let data = ids(&[1, 2, 3]);
        let outcome = StageValidator::default()
            .validate(StageInput::new(&data, &data))
            .unwrap();

        assert!(outcome.report.passed);
        assert_eq!(outcome.report.stats.checks_run, 2);
        assert_eq!(outcome.report.stats.reference_rows, 3);
        assert_eq!(outcome.report.stats.columns_compared, 1);
    }

    #[test]
    fn test_count_and_diff_failures_both_reported() {
        let bronze = ids(&[1, 2]);
        let landing = ids(&[1]);
        let outcome = StageValidator::default()
            .validate(StageInput::new(&bronze, &landing))
            .unwrap();

        assert!(!outcome.report.passed);
        assert_eq!(outcome.report.errors.len(), 2);
        assert!(outcome.report.errors[0].starts_with("[row-count]"));
        assert!(outcome.report.errors[1].starts_with("[positional-diff]"));
        assert_eq!(outcome.reconciliation.diff_positions(), vec![1]);
    }

    #[test]
    fn test_schema_check_runs_when_supplied() {
        let data = ids(&[1]);
        let contract = SchemaContract::builder("T").column("id", "NUMBER").build();
        let observed: ColumnTypes = [("id".to_string(), "TEXT".to_string())].into_iter().collect();

        let outcome = StageValidator::default()
            .validate(StageInput::new(&data, &data).with_schema(&contract, &observed))
            .unwrap();

        assert!(!outcome.report.passed);
        assert_eq!(outcome.report.errors.len(), 1);
        assert!(outcome.report.errors[0].starts_with("[schema]"));
    }

    #[test]
    fn test_hash_check_runs_when_enabled() {
        let bronze = ids(&[1, 1]);
        let validator = StageValidator::new(ReconConfig::new().with_hash_check(true));
        let outcome = validator.validate(StageInput::new(&bronze, &bronze)).unwrap();

        assert_eq!(outcome.report.stats.checks_run, 3);
        assert!(!outcome.report.passed);
        assert!(outcome.report.errors[0].starts_with("[hash-integrity]"));
    }

    #[test]
    fn test_empty_inputs_warn_but_pass() {
        let empty = ids(&[]);
        let outcome = StageValidator::default()
            .validate(StageInput::new(&empty, &empty))
            .unwrap();

        assert!(outcome.report.passed);
        // two zero-count warnings plus the degenerate diff warning
        assert_eq!(outcome.report.warnings.len(), 3);
    }
}
