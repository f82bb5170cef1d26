//! Report writers for layer reconciliation.
//!
//! - [`WorkbookEmitter`] writes a positional diff as a multi-sheet xlsx
//!   workbook and returns an [`EmissionSummary`].
//! - [`TestReportRenderer`] renders test outcomes as a single
//!   self-contained HTML document.
//!
//! Artifacts are written through a temporary file and only appear at their
//! destination once complete.

mod html;
mod output;
mod workbook;

pub use html::*;
pub use output::*;
pub use workbook::*;
