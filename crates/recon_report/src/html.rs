//! Self-contained HTML test report.
//!
//! The document embeds its stylesheet and references no external assets,
//! so it renders the same when opened offline. Every embedded string goes
//! through the template engine's HTML auto-escaping.

use crate::write_atomic;
use minijinja::Environment;
use recon_core::{ReconError, Result, RunMetadata, TestOutcome, TestStatus};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

const TEMPLATE_NAME: &str = "test_report.html";
const TEMPLATE: &str = include_str!("../templates/test_report.html");
const TITLE: &str = "dbt Test Report";
const GENERATOR: &str = concat!("recon ", env!("CARGO_PKG_VERSION"));

/// Aggregate counts over a batch of outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Everything that is neither pass, fail nor error
    pub skipped: usize,
    /// `PASSED` when nothing failed or errored, `FAILED` otherwise
    pub overall: String,
}

impl TestSummary {
    /// Counts outcomes by status.
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let count = |status: TestStatus| outcomes.iter().filter(|o| o.status == status).count();

        let total = outcomes.len();
        let passed = count(TestStatus::Pass);
        let failed = count(TestStatus::Fail);
        let errored = count(TestStatus::Error);
        let overall = if failed == 0 && errored == 0 {
            "PASSED"
        } else {
            "FAILED"
        };

        Self {
            total,
            passed,
            failed,
            errored,
            skipped: total - passed - failed - errored,
            overall: overall.to_string(),
        }
    }

    /// Whether the batch passed overall.
    pub fn is_passing(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// A rendered report.
#[derive(Debug, Clone)]
pub struct TestReport {
    /// The complete document
    pub html: String,
    pub summary: TestSummary,
}

impl TestReport {
    /// Writes the document to `path`, creating its parent directory.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, self.html.as_bytes())?;
        info!(
            path = %path.display(),
            total = self.summary.total,
            overall = %self.summary.overall,
            "test report written"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct RowView<'a> {
    icon: &'static str,
    css_class: &'static str,
    test_name: &'a str,
    model: &'a str,
    column: &'a str,
    test_type: &'a str,
    status: String,
    time: String,
    message: &'a str,
}

impl<'a> RowView<'a> {
    fn new(outcome: &'a TestOutcome) -> Self {
        Self {
            icon: status_icon(&outcome.status),
            css_class: status_class(&outcome.status),
            test_name: &outcome.test_name,
            model: &outcome.model,
            column: &outcome.column,
            test_type: &outcome.test_type,
            status: outcome.status.as_str().to_uppercase(),
            time: format!("{:.2}s", outcome.execution_time),
            message: &outcome.message,
        }
    }
}

#[derive(Serialize)]
struct ReportContext<'a> {
    title: &'static str,
    generator: &'static str,
    generated_at: String,
    schema_version: &'a str,
    summary: &'a TestSummary,
    rows: Vec<RowView<'a>>,
}

/// Renders test outcomes into a [`TestReport`].
///
/// # Example
///
/// ```rust
/// use recon_core::{RunMetadata, TestOutcome, TestStatus};
/// use recon_report::TestReportRenderer;
///
/// let outcomes = vec![TestOutcome {
///     test_name: "not_null_drivers_code".into(),
///     model: "drivers".into(),
///     column: "code".into(),
///     test_type: "not_null".into(),
///     status: TestStatus::Fail,
///     execution_time: 0.25,
///     message: "Got 1 result".into(),
/// }];
///
/// let renderer = TestReportRenderer::new().unwrap();
/// let report = renderer.render(&outcomes, &RunMetadata::now("v12")).unwrap();
/// assert_eq!(report.summary.overall, "FAILED");
/// assert!(report.html.contains("0.25s"));
/// ```
pub struct TestReportRenderer {
    env: Environment<'static>,
}

impl TestReportRenderer {
    /// Creates a renderer with the built-in template.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)
            .map_err(|e| ReconError::render(e.to_string()))?;
        Ok(Self { env })
    }

    /// Renders the outcomes, actionable ones first.
    pub fn render(&self, outcomes: &[TestOutcome], metadata: &RunMetadata) -> Result<TestReport> {
        let summary = TestSummary::from_outcomes(outcomes);

        let context = ReportContext {
            title: TITLE,
            generator: GENERATOR,
            generated_at: metadata
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            schema_version: &metadata.schema_version,
            summary: &summary,
            rows: sort_outcomes(outcomes).into_iter().map(RowView::new).collect(),
        };

        let html = self
            .env
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(&context))
            .map_err(|e| ReconError::render(e.to_string()))?;

        Ok(TestReport { html, summary })
    }
}

/// Orders outcomes for review: fail and error first, then warn and unknown
/// statuses, then pass; ties by model, then test name. The sort is stable.
pub fn sort_outcomes(outcomes: &[TestOutcome]) -> Vec<&TestOutcome> {
    let mut sorted: Vec<&TestOutcome> = outcomes.iter().collect();
    sorted.sort_by(|a, b| compare_outcomes(a, b));
    sorted
}

fn compare_outcomes(a: &TestOutcome, b: &TestOutcome) -> Ordering {
    precedence(&a.status)
        .cmp(&precedence(&b.status))
        .then_with(|| a.model.cmp(&b.model))
        .then_with(|| a.test_name.cmp(&b.test_name))
}

fn precedence(status: &TestStatus) -> u8 {
    if status.is_actionable() {
        0
    } else if *status == TestStatus::Pass {
        2
    } else {
        1
    }
}

fn status_icon(status: &TestStatus) -> &'static str {
    match status {
        TestStatus::Pass => "✅",
        TestStatus::Fail => "❌",
        TestStatus::Error | TestStatus::Warn => "⚠️",
        TestStatus::Unknown(_) => "❓",
    }
}

fn status_class(status: &TestStatus) -> &'static str {
    match status {
        TestStatus::Pass => "pass",
        TestStatus::Fail => "fail",
        TestStatus::Error => "error",
        TestStatus::Warn => "warn",
        TestStatus::Unknown(_) => "unknown",
    }
}
