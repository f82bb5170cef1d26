//! Schema contract validation.
//!
//! An observed schema conforms to a contract only when both mappings are
//! exactly equal: same column set and the same datatype label for every
//! column. Labels are compared byte-for-byte, with no case folding and no
//! type leniency.

use recon_core::{CheckOutcome, ColumnTypes, ReconError, Result, SchemaContract};
use serde::Serialize;
use tracing::debug;

/// A column whose datatype label differs from the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeChange {
    pub column: String,
    pub expected: String,
    pub actual: String,
}

/// Result of comparing an observed schema against a contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaCheck {
    /// Table the contract applies to
    pub table_name: String,
    /// Expected mapping from the contract
    pub expected: ColumnTypes,
    /// Observed mapping from the catalog
    pub actual: ColumnTypes,
    /// Columns in the contract but not observed
    pub missing: Vec<String>,
    /// Columns observed but not in the contract
    pub unexpected: Vec<String>,
    /// Columns present on both sides with different labels
    pub changed: Vec<TypeChange>,
}

impl SchemaCheck {
    /// Whether the observed schema matches the contract exactly.
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }

    /// Describes the comparison, naming both mappings in full followed by
    /// the specific differences.
    pub fn message(&self) -> String {
        if self.passed() {
            return format!("Schema for table '{}' matches its contract", self.table_name);
        }

        let mut parts = vec![format!(
            "Schema for table '{}' does not match its contract. Expected: {}. Actual: {}.",
            self.table_name,
            render_mapping(&self.expected),
            render_mapping(&self.actual)
        )];

        if !self.missing.is_empty() {
            parts.push(format!("Missing columns: {}.", self.missing.join(", ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("Unexpected columns: {}.", self.unexpected.join(", ")));
        }
        if !self.changed.is_empty() {
            let changes: Vec<String> = self
                .changed
                .iter()
                .map(|c| format!("{} ({} -> {})", c.column, c.expected, c.actual))
                .collect();
            parts.push(format!("Changed types: {}.", changes.join(", ")));
        }

        parts.join(" ")
    }

    /// Converts a failed check into [`ReconError::SchemaMismatch`].
    pub fn into_result(self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(ReconError::SchemaMismatch {
                details: self.message(),
                table: self.table_name,
            })
        }
    }
}

impl CheckOutcome for SchemaCheck {
    fn check_name(&self) -> &'static str {
        "schema"
    }

    fn passed(&self) -> bool {
        SchemaCheck::passed(self)
    }

    fn failure_message(&self) -> Option<String> {
        (!SchemaCheck::passed(self)).then(|| self.message())
    }
}

/// Validates observed schemas against contracts.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Compares `observed` against the contract's expected mapping.
    pub fn validate(&self, contract: &SchemaContract, observed: &ColumnTypes) -> SchemaCheck {
        let expected = &contract.columns;

        let missing: Vec<String> = expected
            .keys()
            .filter(|column| !observed.contains_key(*column))
            .cloned()
            .collect();

        let unexpected: Vec<String> = observed
            .keys()
            .filter(|column| !expected.contains_key(*column))
            .cloned()
            .collect();

        let changed: Vec<TypeChange> = expected
            .iter()
            .filter_map(|(column, expected_type)| {
                observed
                    .get(column)
                    .filter(|actual_type| *actual_type != expected_type)
                    .map(|actual_type| TypeChange {
                        column: column.clone(),
                        expected: expected_type.clone(),
                        actual: actual_type.clone(),
                    })
            })
            .collect();

        debug!(
            table = %contract.table_name,
            missing = missing.len(),
            unexpected = unexpected.len(),
            changed = changed.len(),
            "schema compared"
        );

        SchemaCheck {
            table_name: contract.table_name.clone(),
            expected: expected.clone(),
            actual: observed.clone(),
            missing,
            unexpected,
            changed,
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn render_mapping(columns: &ColumnTypes) -> String {
    let entries: Vec<String> = columns
        .iter()
        .map(|(name, datatype)| format!("'{name}': '{datatype}'"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
