//! Check outcome traits and stage report types.
//!
//! Each check in the engine produces its own result type. They all implement
//! [`CheckOutcome`] so a [`StageReport`] can collect them uniformly.

use serde::Serialize;

/// Common view of a finished check.
///
/// # Example
///
/// ```rust
/// use recon_core::{CheckOutcome, StageReport};
///
/// struct AlwaysPasses;
///
/// impl CheckOutcome for AlwaysPasses {
///     fn check_name(&self) -> &'static str {
///         "always"
///     }
///
///     fn passed(&self) -> bool {
///         true
///     }
///
///     fn failure_message(&self) -> Option<String> {
///         None
///     }
/// }
///
/// let mut report = StageReport::success();
/// report.record(&AlwaysPasses);
/// assert!(report.passed);
/// ```
pub trait CheckOutcome {
    /// Short name of the check, used to prefix messages.
    fn check_name(&self) -> &'static str;

    /// Whether the check passed.
    fn passed(&self) -> bool;

    /// Description of the failure, `None` when the check passed.
    fn failure_message(&self) -> Option<String>;

    /// Non-fatal observations, such as comparing empty datasets.
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Report of all checks run for one stage transition.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// Whether every check passed
    pub passed: bool,

    /// List of failures
    pub errors: Vec<String>,

    /// List of warnings
    pub warnings: Vec<String>,

    /// Run statistics
    pub stats: StageStats,
}

/// Statistics about a stage validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageStats {
    /// Rows in the reference dataset
    pub reference_rows: usize,

    /// Rows in the candidate dataset
    pub candidate_rows: usize,

    /// Columns in the common column set
    pub columns_compared: usize,

    /// Positions where at least one column differs
    pub mismatched_rows: usize,

    /// Number of checks recorded
    pub checks_run: usize,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl StageReport {
    /// Creates a new successful report.
    pub fn success() -> Self {
        Self {
            passed: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: StageStats::default(),
        }
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.passed = false;
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Records the outcome of one check.
    pub fn record(&mut self, outcome: &dyn CheckOutcome) {
        self.stats.checks_run += 1;
        for warning in outcome.warnings() {
            self.add_warning(format!("[{}] {}", outcome.check_name(), warning));
        }
        if !outcome.passed() {
            let message = outcome
                .failure_message()
                .unwrap_or_else(|| "check failed".to_string());
            self.add_error(format!("[{}] {}", outcome.check_name(), message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        passed: bool,
        warnings: Vec<String>,
    }

    impl CheckOutcome for Fixed {
        fn check_name(&self) -> &'static str {
            "fixed"
        }

        fn passed(&self) -> bool {
            self.passed
        }

        fn failure_message(&self) -> Option<String> {
            (!self.passed).then(|| "boom".to_string())
        }

        fn warnings(&self) -> Vec<String> {
            self.warnings.clone()
        }
    }

    #[test]
    fn test_record_prefixes_messages() {
        let mut report = StageReport::success();
        report.record(&Fixed {
            passed: false,
            warnings: vec!["careful".into()],
        });

        assert!(!report.passed);
        assert_eq!(report.errors, vec!["[fixed] boom".to_string()]);
        assert_eq!(report.warnings, vec!["[fixed] careful".to_string()]);
        assert_eq!(report.stats.checks_run, 1);
    }

    #[test]
    fn test_passing_check_keeps_report_green() {
        let mut report = StageReport::success();
        report.record(&Fixed {
            passed: true,
            warnings: Vec::new(),
        });
        assert!(report.passed);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_report_serializes_stats() {
        let mut report = StageReport::success();
        report.add_error("[row-count] off by one");
        report.stats.reference_rows = 3;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["errors"][0], "[row-count] off by one");
        assert_eq!(json["stats"]["reference_rows"], 3);
    }
}
