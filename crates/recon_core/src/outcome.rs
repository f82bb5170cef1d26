//! Test outcome records consumed by the test-result report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single executed test.
///
/// Any label other than the four known ones is kept verbatim as
/// [`TestStatus::Unknown`] so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
    Warn,
    Unknown(String),
}

impl TestStatus {
    /// Returns the raw status label.
    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Error => "error",
            TestStatus::Warn => "warn",
            TestStatus::Unknown(label) => label,
        }
    }

    /// Returns true for failing and erroring outcomes.
    pub fn is_actionable(&self) -> bool {
        matches!(self, TestStatus::Fail | TestStatus::Error)
    }
}

impl From<&str> for TestStatus {
    fn from(label: &str) -> Self {
        match label {
            "pass" => TestStatus::Pass,
            "fail" => TestStatus::Fail,
            "error" => TestStatus::Error,
            "warn" => TestStatus::Warn,
            other => TestStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for TestStatus {
    fn from(label: String) -> Self {
        TestStatus::from(label.as_str())
    }
}

impl From<TestStatus> for String {
    fn from(status: TestStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed test, as produced by the test runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test name
    pub test_name: String,

    /// Model the test is attached to
    pub model: String,

    /// Column under test
    pub column: String,

    /// Kind of test (e.g. `not_null`, `unique`)
    pub test_type: String,

    /// Outcome status
    pub status: TestStatus,

    /// Execution time in seconds
    #[serde(default)]
    pub execution_time: f64,

    /// Free-text message, unescaped
    #[serde(default)]
    pub message: String,
}

/// Metadata describing one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Pipeline / results schema version
    pub schema_version: String,
}

impl RunMetadata {
    /// Creates run metadata stamped with the current time.
    pub fn now(schema_version: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            schema_version: schema_version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(TestStatus::from("pass"), TestStatus::Pass);
        assert_eq!(TestStatus::from("error"), TestStatus::Error);
        assert_eq!(
            TestStatus::from("skipped"),
            TestStatus::Unknown("skipped".to_string())
        );
        assert_eq!(TestStatus::Unknown("skipped".into()).as_str(), "skipped");
        assert!(TestStatus::Fail.is_actionable());
        assert!(!TestStatus::Warn.is_actionable());
    }

    #[test]
    fn test_outcome_deserializes_defaults() {
        let outcome: TestOutcome = serde_json::from_str(
            r#"{"test_name":"t","model":"m","column":"c","test_type":"unique","status":"fail"}"#,
        )
        .unwrap();

        assert_eq!(outcome.status, TestStatus::Fail);
        assert_eq!(outcome.execution_time, 0.0);
        assert!(outcome.message.is_empty());
    }
}
