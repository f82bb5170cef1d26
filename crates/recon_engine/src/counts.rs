//! Row count comparison between two stages.

use crate::capitalize;
use recon_core::{CheckOutcome, ReconError, Result};
use serde::Serialize;
use tracing::warn;

/// Result of comparing the row counts of two tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowCountCheck {
    pub source_label: String,
    pub source_count: usize,
    pub target_label: String,
    pub target_count: usize,
    pub warnings: Vec<String>,
}

impl RowCountCheck {
    /// Compares two counts. A zero count on either side is recorded as a
    /// warning: an empty table trivially "matches" another empty table.
    pub fn compare(
        source_label: impl Into<String>,
        source_count: usize,
        target_label: impl Into<String>,
        target_count: usize,
    ) -> Self {
        let source_label = source_label.into();
        let target_label = target_label.into();

        let mut warnings = Vec::new();
        for (label, count) in [(&source_label, source_count), (&target_label, target_count)] {
            if count == 0 {
                warn!(table = %label, "table has no records (count = 0)");
                warnings.push(format!("{label} table has no records (count = 0)"));
            }
        }

        Self {
            source_label,
            source_count,
            target_label,
            target_count,
            warnings,
        }
    }

    /// Absolute difference between the two counts.
    pub fn difference(&self) -> usize {
        self.source_count.abs_diff(self.target_count)
    }

    /// Whether both counts are equal.
    pub fn passed(&self) -> bool {
        self.source_count == self.target_count
    }

    /// Human-readable outcome.
    pub fn message(&self) -> String {
        if self.passed() {
            format!(
                "Row counts match: {} count={}, {} count={}",
                capitalize(&self.source_label),
                self.source_count,
                capitalize(&self.target_label),
                self.target_count
            )
        } else {
            format!(
                "Row count difference {}: {} count={}, {} count={}",
                self.difference(),
                capitalize(&self.source_label),
                self.source_count,
                capitalize(&self.target_label),
                self.target_count
            )
        }
    }

    /// Converts a failed check into [`ReconError::RowCountMismatch`].
    pub fn into_result(self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(ReconError::RowCountMismatch(self.message()))
        }
    }
}

impl CheckOutcome for RowCountCheck {
    fn check_name(&self) -> &'static str {
        "row-count"
    }

    fn passed(&self) -> bool {
        RowCountCheck::passed(self)
    }

    fn failure_message(&self) -> Option<String> {
        (!RowCountCheck::passed(self)).then(|| self.message())
    }

    fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_counts() {
        let check = RowCountCheck::compare("landing", 42, "bronze", 42);
        assert!(check.passed());
        assert!(check.warnings.is_empty());
        assert_eq!(
            check.message(),
            "Row counts match: Landing count=42, Bronze count=42"
        );
    }

    #[test]
    fn test_differing_counts() {
        let check = RowCountCheck::compare("landing", 10, "bronze", 7);
        assert!(!check.passed());
        assert_eq!(check.difference(), 3);
        assert_eq!(
            check.message(),
            "Row count difference 3: Landing count=10, Bronze count=7"
        );

        let err = check.into_result().unwrap_err();
        assert!(matches!(err, ReconError::RowCountMismatch(_)));
    }

    #[test]
    fn test_zero_count_warns() {
        let check = RowCountCheck::compare("bronze", 0, "silver", 0);
        assert!(check.passed());
        assert_eq!(check.warnings.len(), 2);
        assert_eq!(CheckOutcome::warnings(&check).len(), 2);
    }
}
