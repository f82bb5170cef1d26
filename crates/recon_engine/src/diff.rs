//! Positional diff between two datasets.
//!
//! Rows are matched by index, never by key: both layers are expected to keep
//! the row order of the extraction they share. The engine
//!
//! 1. builds the common column set (union of both schemas, sorted),
//! 2. re-selects both datasets over it and pads the shorter one with null
//!    rows up to `max(len_a, len_b)`,
//! 3. compares every cell with [`Value::cell_eq`],
//! 4. records each position where at least one column differs.
//!
//! A column present on only one side reads as null on the other and so shows
//! up as a value mismatch rather than as a missing column. Reordering or
//! inserting rows upstream shifts every following position and produces a
//! cascade of mismatches; callers that cannot guarantee a shared order
//! should not rely on this comparison.

use crate::capitalize;
use recon_core::{CheckOutcome, Dataset, Result, Row, SideLabels, Value};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Name of the column carrying the original row position in detail tables.
pub const ROW_POSITION_COLUMN: &str = "_row_pos";

const COUNTS_DIFFER: &str = "Row count differs and/or column values differ at same row positions";
const COUNTS_MATCH: &str = "Row counts match; differences are due to column value mismatches";

/// Differences found at one row position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiff {
    /// 0-based position in the padded range
    pub position: usize,
    /// Number of differing columns
    pub diff_count: usize,
    /// Differing columns, in common column order
    pub diff_columns: Vec<String>,
}

/// Dataset-level reconciliation metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationSummary {
    /// Rows in the reference dataset
    pub reference_count: usize,
    /// Rows in the candidate dataset
    pub candidate_count: usize,
    /// `reference_count - candidate_count`
    pub count_delta: i64,
    /// Number of positions with at least one differing column
    pub mismatched_rows: usize,
    /// Human-readable explanation of the differences
    pub description: String,
}

impl ReconciliationSummary {
    fn new(reference_count: usize, candidate_count: usize, mismatched_rows: usize) -> Self {
        let description = if reference_count != candidate_count {
            COUNTS_DIFFER
        } else {
            COUNTS_MATCH
        };

        Self {
            reference_count,
            candidate_count,
            count_delta: reference_count as i64 - candidate_count as i64,
            mismatched_rows,
            description: description.to_string(),
        }
    }

    /// The five named metrics, in report order.
    pub fn metrics(&self, labels: &SideLabels) -> Vec<(String, Value)> {
        let reference = capitalize(&labels.reference);
        let candidate = capitalize(&labels.candidate);

        vec![
            (
                format!("{reference} record count"),
                Value::Int(self.reference_count as i64),
            ),
            (
                format!("{candidate} record count"),
                Value::Int(self.candidate_count as i64),
            ),
            (
                format!("Row count difference ({reference} - {candidate})"),
                Value::Int(self.count_delta),
            ),
            (
                "Total mismatched rows".to_string(),
                Value::Int(self.mismatched_rows as i64),
            ),
            (
                "Difference description".to_string(),
                Value::Text(self.description.clone()),
            ),
        ]
    }
}

/// Aligned rows of one side at the diff positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideDetail {
    /// Side label, used as column prefix
    pub label: String,
    /// Common column set
    pub columns: Vec<String>,
    /// Diff positions, one per row
    pub positions: Vec<usize>,
    /// Aligned values, one row per position
    pub rows: Vec<Row>,
}

impl SideDetail {
    /// Column headers: the position column followed by the common columns.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(ROW_POSITION_COLUMN.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Headers prefixed with the side label (`bronze__row_pos`, `bronze_id`, ...).
    pub fn prefixed_header(&self) -> Vec<String> {
        self.header()
            .into_iter()
            .map(|column| format!("{}_{}", self.label, column))
            .collect()
    }

    /// Number of detail rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no detail rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of a positional comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Side labels used for prefixes and metric names
    pub labels: SideLabels,
    /// Union of both schemas, sorted lexicographically
    pub common_columns: Vec<String>,
    /// Dataset-level metrics
    pub summary: ReconciliationSummary,
    /// One record per diff position, ascending
    pub row_diffs: Vec<RowDiff>,
    /// Reference-side rows at the diff positions
    pub reference_detail: SideDetail,
    /// Candidate-side rows at the diff positions
    pub candidate_detail: SideDetail,
    /// Non-fatal observations
    pub warnings: Vec<String>,
}

impl Reconciliation {
    /// Diff positions in ascending order.
    pub fn diff_positions(&self) -> Vec<usize> {
        self.row_diffs.iter().map(|diff| diff.position).collect()
    }

    /// True when there was nothing to compare on either side.
    pub fn is_degenerate(&self) -> bool {
        self.summary.reference_count == 0 && self.summary.candidate_count == 0
    }
}

impl CheckOutcome for Reconciliation {
    fn check_name(&self) -> &'static str {
        "positional-diff"
    }

    fn passed(&self) -> bool {
        self.row_diffs.is_empty() && self.summary.count_delta == 0
    }

    fn failure_message(&self) -> Option<String> {
        if CheckOutcome::passed(self) {
            return None;
        }
        Some(format!(
            "{} of {} row positions differ between {} ({} rows) and {} ({} rows): {}",
            self.summary.mismatched_rows,
            self.summary.reference_count.max(self.summary.candidate_count),
            self.labels.reference,
            self.summary.reference_count,
            self.labels.candidate,
            self.summary.candidate_count,
            self.summary.description
        ))
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

/// Positional diff engine.
///
/// # Example
///
/// ```rust
/// use recon_core::{Dataset, Value};
/// use recon_engine::PositionalDiff;
///
/// let columns = vec!["id".to_string(), "name".to_string()];
/// let bronze = Dataset::new(
///     columns.clone(),
///     vec![
///         vec![Value::Int(1), Value::from("x")],
///         vec![Value::Int(2), Value::from("y")],
///     ],
/// )
/// .unwrap();
/// let landing = Dataset::new(columns, vec![vec![Value::Int(1), Value::from("x")]]).unwrap();
///
/// let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();
/// assert_eq!(result.diff_positions(), vec![1]);
/// assert_eq!(result.row_diffs[0].diff_count, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionalDiff {
    labels: SideLabels,
}

impl PositionalDiff {
    /// Creates an engine with the default `bronze`/`landing` labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with custom side labels.
    pub fn with_labels(labels: SideLabels) -> Self {
        Self { labels }
    }

    /// Compares `reference` (A) against `candidate` (B) position by position.
    ///
    /// Inputs are never modified.
    pub fn compare(&self, reference: &Dataset, candidate: &Dataset) -> Result<Reconciliation> {
        let common_columns = common_columns(reference, candidate);
        let reference_count = reference.len();
        let candidate_count = candidate.len();
        let aligned_len = reference_count.max(candidate_count);

        debug!(
            columns = common_columns.len(),
            reference_count, candidate_count, "aligning datasets"
        );

        let aligned_reference = reference.select(&common_columns)?.with_row_count(aligned_len);
        let aligned_candidate = candidate.select(&common_columns)?.with_row_count(aligned_len);

        let mut row_diffs = Vec::new();
        let mut reference_rows = Vec::new();
        let mut candidate_rows = Vec::new();

        for (position, (left, right)) in aligned_reference
            .rows()
            .zip(aligned_candidate.rows())
            .enumerate()
        {
            let diff_columns: Vec<String> = common_columns
                .iter()
                .zip(left.iter().zip(right.iter()))
                .filter(|(_, (a, b))| !a.cell_eq(b))
                .map(|(column, _)| column.clone())
                .collect();

            if diff_columns.is_empty() {
                continue;
            }

            row_diffs.push(RowDiff {
                position,
                diff_count: diff_columns.len(),
                diff_columns,
            });
            reference_rows.push(left.clone());
            candidate_rows.push(right.clone());
        }

        let positions: Vec<usize> = row_diffs.iter().map(|diff| diff.position).collect();
        let summary = ReconciliationSummary::new(reference_count, candidate_count, row_diffs.len());

        let mut warnings = Vec::new();
        if reference_count == 0 && candidate_count == 0 {
            warn!("both datasets are empty; nothing was compared");
            warnings.push(format!(
                "{} and {} datasets are both empty; nothing was compared",
                self.labels.reference, self.labels.candidate
            ));
        } else if reference_count == 0 || candidate_count == 0 {
            let empty = if reference_count == 0 {
                &self.labels.reference
            } else {
                &self.labels.candidate
            };
            warn!(side = %empty, "dataset has no records");
            warnings.push(format!("{empty} dataset has no records"));
        }

        debug!(mismatched = row_diffs.len(), "positional diff complete");

        Ok(Reconciliation {
            labels: self.labels.clone(),
            reference_detail: SideDetail {
                label: self.labels.reference.clone(),
                columns: common_columns.clone(),
                positions: positions.clone(),
                rows: reference_rows,
            },
            candidate_detail: SideDetail {
                label: self.labels.candidate.clone(),
                columns: common_columns.clone(),
                positions,
                rows: candidate_rows,
            },
            common_columns,
            summary,
            row_diffs,
            warnings,
        })
    }
}

/// Union of both column sets, sorted lexicographically.
pub fn common_columns(reference: &Dataset, candidate: &Dataset) -> Vec<String> {
    reference
        .columns()
        .iter()
        .chain(candidate.columns())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset(columns: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::new(columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    fn id_name(rows: &[(i64, &str)]) -> Dataset {
        dataset(
            &["id", "name"],
            rows.iter()
                .map(|(id, name)| vec![Value::Int(*id), Value::from(*name)])
                .collect(),
        )
    }

    #[test]
    fn test_identical_datasets() {
        let a = id_name(&[(1, "x"), (2, "y"), (3, "z")]);
        let result = PositionalDiff::new().compare(&a, &a.clone()).unwrap();

        assert_eq!(result.summary.mismatched_rows, 0);
        assert_eq!(result.summary.count_delta, 0);
        assert!(result.row_diffs.is_empty());
        assert!(result.reference_detail.is_empty());
        assert!(CheckOutcome::passed(&result));
    }

    #[test]
    fn test_candidate_shorter() {
        let bronze = id_name(&[(1, "x"), (2, "y")]);
        let landing = id_name(&[(1, "x")]);

        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();

        assert_eq!(result.summary.reference_count, 2);
        assert_eq!(result.summary.candidate_count, 1);
        assert_eq!(result.summary.count_delta, 1);
        assert_eq!(result.summary.mismatched_rows, 1);
        assert_eq!(
            result.row_diffs,
            vec![RowDiff {
                position: 1,
                diff_count: 2,
                diff_columns: vec!["id".to_string(), "name".to_string()],
            }]
        );
        assert_eq!(result.summary.description, COUNTS_DIFFER);
        assert_eq!(result.candidate_detail.rows, vec![vec![Value::Null, Value::Null]]);
    }

    #[test]
    fn test_reference_padded_rows_fully_mismatch() {
        let bronze = id_name(&[(1, "x")]);
        let landing = id_name(&[(1, "x"), (2, "y"), (3, "z")]);

        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();

        assert_eq!(result.diff_positions(), vec![1, 2]);
        for diff in &result.row_diffs {
            assert_eq!(diff.diff_columns, result.common_columns);
        }
        for row in &result.reference_detail.rows {
            assert!(row.iter().all(Value::is_null));
        }
        assert_eq!(result.summary.count_delta, -2);
    }

    #[test]
    fn test_value_level_mismatch() {
        let bronze = id_name(&[(1, "x"), (2, "y")]);
        let landing = id_name(&[(1, "x"), (2, "Y")]);

        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();

        assert_eq!(result.summary.description, COUNTS_MATCH);
        assert_eq!(result.row_diffs[0].diff_columns, vec!["name".to_string()]);
        assert_eq!(result.reference_detail.positions, vec![1]);
        assert_eq!(
            result.candidate_detail.rows[0],
            vec![Value::Int(2), Value::from("Y")]
        );
    }

    #[test]
    fn test_nulls_on_both_sides_are_equal() {
        let bronze = dataset(&["a", "b"], vec![vec![Value::Null, Value::Int(1)]]);
        let landing = dataset(&["a", "b"], vec![vec![Value::Null, Value::Int(2)]]);

        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();
        assert_eq!(result.row_diffs[0].diff_columns, vec!["b".to_string()]);
        assert_eq!(result.row_diffs[0].diff_count, 1);
    }

    #[test]
    fn test_one_sided_column_reads_as_null() {
        let bronze = dataset(&["id", "extra"], vec![vec![Value::Int(1), Value::Null]]);
        let landing = dataset(&["id"], vec![vec![Value::Int(1)]]);

        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();
        assert_eq!(result.common_columns, vec!["extra".to_string(), "id".to_string()]);
        assert!(result.row_diffs.is_empty());

        let bronze = dataset(&["id", "extra"], vec![vec![Value::Int(1), Value::Int(9)]]);
        let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();
        assert_eq!(result.row_diffs[0].diff_columns, vec!["extra".to_string()]);
    }

    #[test]
    fn test_common_columns_sorted() {
        let a = dataset(&["zeta", "Alpha"], Vec::new());
        let b = dataset(&["beta", "zeta"], Vec::new());
        assert_eq!(
            common_columns(&a, &b),
            vec!["Alpha".to_string(), "beta".to_string(), "zeta".to_string()]
        );
    }

    #[test]
    fn test_empty_datasets_warn() {
        let empty = dataset(&["id"], Vec::new());
        let result = PositionalDiff::new().compare(&empty, &empty).unwrap();

        assert!(result.is_degenerate());
        assert_eq!(result.summary.mismatched_rows, 0);
        assert!(result.row_diffs.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(CheckOutcome::warnings(&result).len(), 1);
    }

    #[test]
    fn test_metrics_use_labels() {
        let bronze = id_name(&[(1, "x")]);
        let result = PositionalDiff::with_labels(SideLabels {
            reference: "silver".into(),
            candidate: "bronze".into(),
        })
        .compare(&bronze, &bronze)
        .unwrap();

        let metrics = result.summary.metrics(&result.labels);
        let names: Vec<&str> = metrics.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Silver record count",
                "Bronze record count",
                "Row count difference (Silver - Bronze)",
                "Total mismatched rows",
                "Difference description",
            ]
        );
        assert_eq!(result.reference_detail.prefixed_header()[0], "silver__row_pos");
    }
}
