//! Reconciliation configuration.
//!
//! All knobs are carried explicitly in [`ReconConfig`]; nothing in the core
//! reads environment variables.

use crate::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Names of the two sides of a comparison.
///
/// The reference side is the layer being validated against (bronze), the
/// candidate is the layer it was loaded from (landing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideLabels {
    /// Reference side label, used as column prefix in reports
    pub reference: String,
    /// Candidate side label
    pub candidate: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            reference: "bronze".to_string(),
            candidate: "landing".to_string(),
        }
    }
}

/// Sheet names of the reconciliation workbook.
///
/// The per-side sheets are optional and omitted when `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetNames {
    pub summary: String,
    pub details: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub candidate: Option<String>,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            summary: "summary".to_string(),
            details: "details".to_string(),
            reference: Some("bronze_details".to_string()),
            candidate: Some("landing_details".to_string()),
        }
    }
}

impl SheetNames {
    /// Returns every sheet that will be written, in workbook order.
    pub fn all(&self) -> Vec<&str> {
        let mut names = vec![self.summary.as_str(), self.details.as_str()];
        names.extend(self.reference.as_deref());
        names.extend(self.candidate.as_deref());
        names
    }
}

/// Configuration for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Directory relative artifact paths are resolved under
    pub output_dir: PathBuf,

    /// Side labels
    pub labels: SideLabels,

    /// Workbook sheet names
    pub sheets: SheetNames,

    /// Columns hashed by the content-hash check (all columns when `None`)
    pub hash_columns: Option<Vec<String>>,

    /// Whether the stage validator runs the content-hash check
    pub check_hashes: bool,

    /// Maximum number of offending hashes listed in a message
    pub sample_limit: usize,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            labels: SideLabels::default(),
            sheets: SheetNames::default(),
            hash_columns: None,
            check_hashes: false,
            sample_limit: 10,
        }
    }
}

impl ReconConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the side labels.
    pub fn with_labels(mut self, reference: impl Into<String>, candidate: impl Into<String>) -> Self {
        self.labels = SideLabels {
            reference: reference.into(),
            candidate: candidate.into(),
        };
        self
    }

    /// Sets the workbook sheet names.
    pub fn with_sheets(mut self, sheets: SheetNames) -> Self {
        self.sheets = sheets;
        self
    }

    /// Restricts content hashing to the given columns and enables the check.
    pub fn with_hash_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hash_columns = Some(columns.into_iter().map(Into::into).collect());
        self.check_hashes = true;
        self
    }

    /// Enables or disables the content-hash check.
    pub fn with_hash_check(mut self, enabled: bool) -> Self {
        self.check_hashes = enabled;
        self
    }

    /// Sets how many offending entries messages list.
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.labels.reference.is_empty() || self.labels.candidate.is_empty() {
            return Err(ReconError::configuration("side labels cannot be empty"));
        }
        if self.labels.reference == self.labels.candidate {
            return Err(ReconError::configuration(format!(
                "side labels must differ, both are '{}'",
                self.labels.reference
            )));
        }

        // Excel compares sheet names case-insensitively
        let mut seen = HashSet::new();
        for name in self.sheets.all() {
            validate_sheet_name(name)?;
            if !seen.insert(name.to_lowercase()) {
                return Err(ReconError::configuration(format!(
                    "duplicate sheet name '{name}'"
                )));
            }
        }

        Ok(())
    }
}

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ReconError::configuration("sheet names cannot be empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(ReconError::configuration(format!(
            "sheet name '{name}' is longer than {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(ReconError::configuration(format!(
            "sheet name '{name}' contains the forbidden character '{c}'"
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(ReconError::configuration(format!(
            "sheet name '{name}' cannot start or end with an apostrophe"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReconConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.sheets.all(),
            vec!["summary", "details", "bronze_details", "landing_details"]
        );
    }

    #[test]
    fn test_duplicate_sheet_rejected() {
        let config = ReconConfig::new().with_sheets(SheetNames {
            summary: "s".into(),
            details: "s".into(),
            reference: None,
            candidate: None,
        });
        assert!(matches!(
            config.validate(),
            Err(ReconError::Configuration(_))
        ));
    }

    #[test]
    fn test_duplicate_sheet_rejected_ignoring_case() {
        let config = ReconConfig::new().with_sheets(SheetNames {
            summary: "summary".into(),
            details: "SUMMARY".into(),
            reference: None,
            candidate: None,
        });
        assert!(matches!(
            config.validate(),
            Err(ReconError::Configuration(msg)) if msg.contains("SUMMARY")
        ));
    }

    #[test]
    fn test_sheet_name_rules() {
        let with_summary = |summary: &str| {
            ReconConfig::new().with_sheets(SheetNames {
                summary: summary.into(),
                ..SheetNames::default()
            })
        };

        assert!(with_summary(&"s".repeat(MAX_SHEET_NAME_LEN)).validate().is_ok());
        assert!(with_summary(&"s".repeat(MAX_SHEET_NAME_LEN + 1)).validate().is_err());
        for bad in ["a[b", "a]b", "a:b", "a*b", "a?b", "a/b", "a\\b", "'quoted"] {
            assert!(
                matches!(with_summary(bad).validate(), Err(ReconError::Configuration(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_same_labels_rejected() {
        let config = ReconConfig::new().with_labels("bronze", "bronze");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hash_columns_enable_check() {
        let config = ReconConfig::new().with_hash_columns(["code", "dob"]);
        assert!(config.check_hashes);
        assert_eq!(
            config.hash_columns,
            Some(vec!["code".to_string(), "dob".to_string()])
        );
    }
}
