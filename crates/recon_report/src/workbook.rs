//! Reconciliation workbook (xlsx) emitter.
//!
//! Sheet layout:
//!
//! - **summary**: a `metric`/`value` table with the five dataset-level
//!   metrics, then, two rows further down, the row-level table
//!   (`_row_pos`, `diff_count`, `diff_columns`).
//! - **details**: reference and candidate rows at each diff position side by
//!   side, every column prefixed with its side label.
//! - **reference / candidate sheets** (optional): each side's rows alone.

use crate::write_atomic;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use recon_core::{Dataset, ReconConfig, ReconError, Result, SheetNames, Value};
use recon_engine::{PositionalDiff, ROW_POSITION_COLUMN, Reconciliation, SideDetail};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Largest integer an xlsx number cell holds exactly (2^53).
const MAX_EXACT_INTEGER: u64 = 1 << 53;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// What was written, enough to assert on without re-reading the artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionSummary {
    pub reference_count: usize,
    pub candidate_count: usize,
    pub diff_row_count: usize,
    pub diff_positions: Vec<usize>,
    pub artifact_path: PathBuf,
}

/// Writes reconciliation results as a multi-sheet workbook.
///
/// # Example
///
/// ```no_run
/// use recon_core::{Dataset, ReconConfig, Value};
/// use recon_report::WorkbookEmitter;
///
/// let columns = vec!["id".to_string()];
/// let bronze = Dataset::new(columns.clone(), vec![vec![Value::Int(1)]]).unwrap();
/// let landing = Dataset::new(columns, vec![vec![Value::Int(2)]]).unwrap();
///
/// let emitter = WorkbookEmitter::new(&ReconConfig::new());
/// let summary = emitter.reconcile(&bronze, &landing, "drivers_diffs.xlsx").unwrap();
/// assert_eq!(summary.diff_positions, vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct WorkbookEmitter {
    config: ReconConfig,
}

impl WorkbookEmitter {
    /// Creates an emitter using the labels, sheet names and output directory
    /// of `config`.
    pub fn new(config: &ReconConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Diffs both datasets and writes the workbook under the current
    /// working directory.
    pub fn reconcile(
        &self,
        reference: &Dataset,
        candidate: &Dataset,
        out_path: impl AsRef<Path>,
    ) -> Result<EmissionSummary> {
        let reconciliation = PositionalDiff::with_labels(self.config.labels.clone())
            .compare(reference, candidate)?;
        self.emit(&reconciliation, out_path)
    }

    /// Writes an existing reconciliation, resolving `out_path` against the
    /// current working directory.
    pub fn emit(
        &self,
        reconciliation: &Reconciliation,
        out_path: impl AsRef<Path>,
    ) -> Result<EmissionSummary> {
        self.config.validate()?;
        let path = crate::resolve_output_path(out_path, &self.config.output_dir)?;
        self.write(reconciliation, path)
    }

    /// Writes an existing reconciliation, resolving `out_path` against `base`.
    pub fn emit_in(
        &self,
        base: impl AsRef<Path>,
        reconciliation: &Reconciliation,
        out_path: impl AsRef<Path>,
    ) -> Result<EmissionSummary> {
        self.config.validate()?;
        let path = crate::resolve_output_path_in(base, &self.config.output_dir, out_path)?;
        self.write(reconciliation, path)
    }

    fn write(&self, reconciliation: &Reconciliation, path: PathBuf) -> Result<EmissionSummary> {
        let mut workbook = build_workbook(reconciliation, &self.config.sheets)?;
        let buffer = workbook.save_to_buffer().map_err(xlsx_error)?;
        write_atomic(&path, &buffer)?;

        let summary = EmissionSummary {
            reference_count: reconciliation.summary.reference_count,
            candidate_count: reconciliation.summary.candidate_count,
            diff_row_count: reconciliation.summary.mismatched_rows,
            diff_positions: reconciliation.diff_positions(),
            artifact_path: path,
        };

        info!(
            path = %summary.artifact_path.display(),
            diff_rows = summary.diff_row_count,
            "reconciliation workbook written"
        );
        Ok(summary)
    }
}

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format(DATE_FORMAT),
            datetime: Format::new().set_num_format(DATETIME_FORMAT),
        }
    }
}

fn build_workbook(reconciliation: &Reconciliation, sheets: &SheetNames) -> Result<XlsxWorkbook> {
    let formats = Formats::new();
    let mut workbook = XlsxWorkbook::new();

    let summary = new_sheet(&mut workbook, &sheets.summary)?;
    write_summary(summary, reconciliation, &formats)?;

    let details = new_sheet(&mut workbook, &sheets.details)?;
    write_details(details, reconciliation, &formats)?;

    let side_sheets = [
        (&sheets.reference, &reconciliation.reference_detail),
        (&sheets.candidate, &reconciliation.candidate_detail),
    ];
    for (name, detail) in side_sheets {
        if let Some(name) = name {
            let sheet = new_sheet(&mut workbook, name)?;
            write_side(sheet, detail, &formats)?;
        }
    }

    debug!(sheets = sheets.all().len(), "workbook built");
    Ok(workbook)
}

fn new_sheet<'a>(workbook: &'a mut XlsxWorkbook, name: &str) -> Result<&'a mut Worksheet> {
    workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| ReconError::workbook(format!("Failed to create sheet '{name}': {e}")))
}

fn write_summary(sheet: &mut Worksheet, reconciliation: &Reconciliation, formats: &Formats) -> Result<()> {
    write_header(sheet, 0, &["metric", "value"], formats)?;

    let metrics = reconciliation.summary.metrics(&reconciliation.labels);
    for (index, (metric, value)) in metrics.iter().enumerate() {
        let row = cell_row(index + 1)?;
        sheet.write_string(row, 0, metric).map_err(xlsx_error)?;
        write_value(sheet, row, 1, value, formats)?;
    }

    // one blank row between the two tables
    let start = metrics.len() + 2;
    write_header(
        sheet,
        cell_row(start)?,
        &[ROW_POSITION_COLUMN, "diff_count", "diff_columns"],
        formats,
    )?;

    for (index, diff) in reconciliation.row_diffs.iter().enumerate() {
        let row = cell_row(start + 1 + index)?;
        write_value(sheet, row, 0, &Value::Int(diff.position as i64), formats)?;
        write_value(sheet, row, 1, &Value::Int(diff.diff_count as i64), formats)?;
        sheet
            .write_string(row, 2, diff.diff_columns.join(", "))
            .map_err(xlsx_error)?;
    }

    Ok(())
}

fn write_details(sheet: &mut Worksheet, reconciliation: &Reconciliation, formats: &Formats) -> Result<()> {
    let reference = &reconciliation.reference_detail;
    let candidate = &reconciliation.candidate_detail;

    let header: Vec<String> = reference
        .prefixed_header()
        .into_iter()
        .chain(candidate.prefixed_header())
        .collect();
    write_header(sheet, 0, &header, formats)?;

    let offset = reference.header().len();
    let aligned = reference
        .positions
        .iter()
        .zip(&reference.rows)
        .zip(&candidate.rows);
    for (index, ((position, left), right)) in aligned.enumerate() {
        let row = cell_row(index + 1)?;
        write_detail_row(sheet, row, 0, *position, left, formats)?;
        write_detail_row(sheet, row, offset, *position, right, formats)?;
    }

    Ok(())
}

fn write_side(sheet: &mut Worksheet, detail: &SideDetail, formats: &Formats) -> Result<()> {
    write_header(sheet, 0, &detail.header(), formats)?;

    for (index, (position, values)) in detail.positions.iter().zip(&detail.rows).enumerate() {
        write_detail_row(sheet, cell_row(index + 1)?, 0, *position, values, formats)?;
    }

    Ok(())
}

fn write_detail_row(
    sheet: &mut Worksheet,
    row: u32,
    first_column: usize,
    position: usize,
    values: &[Value],
    formats: &Formats,
) -> Result<()> {
    let position = Value::Int(position as i64);
    for (offset, value) in std::iter::once(&position).chain(values).enumerate() {
        write_value(sheet, row, cell_column(first_column + offset)?, value, formats)?;
    }
    Ok(())
}

fn write_header<S: AsRef<str>>(sheet: &mut Worksheet, row: u32, names: &[S], formats: &Formats) -> Result<()> {
    for (index, name) in names.iter().enumerate() {
        sheet
            .write_string_with_format(row, cell_column(index)?, name.as_ref(), &formats.header)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

/// Writes one typed cell. Nulls stay blank; integers an xlsx number cannot
/// hold exactly, non-finite floats and dates outside the xlsx calendar are
/// written as text.
fn write_value(sheet: &mut Worksheet, row: u32, column: u16, value: &Value, formats: &Formats) -> Result<()> {
    let written = match value {
        Value::Null => return Ok(()),
        Value::Int(i) if i.unsigned_abs() > MAX_EXACT_INTEGER => {
            sheet.write_string(row, column, i.to_string())
        }
        Value::Int(i) => sheet.write_number(row, column, *i as f64),
        Value::Float(f) if !f.is_finite() => sheet.write_string(row, column, f.to_string()),
        Value::Float(f) => sheet.write_number(row, column, *f),
        Value::Bool(b) => sheet.write_boolean(row, column, *b),
        Value::Text(s) => sheet.write_string(row, column, s),
        Value::Date(d) => match d.and_hms_opt(0, 0, 0).and_then(excel_serial) {
            Some(serial) => sheet.write_number_with_format(row, column, serial, &formats.date),
            None => sheet.write_string(row, column, value.to_string()),
        },
        Value::Timestamp(ts) => match excel_serial(*ts) {
            Some(serial) => sheet.write_number_with_format(row, column, serial, &formats.datetime),
            None => sheet.write_string(row, column, value.to_string()),
        },
    };
    written.map(|_| ()).map_err(xlsx_error)
}

/// Days since the xlsx epoch, for dates the 1900 calendar represents
/// unambiguously (1900-03-01 through 9999-12-31).
fn excel_serial(timestamp: NaiveDateTime) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let first = NaiveDate::from_ymd_opt(1900, 3, 1)?;
    if timestamp.date() < first || timestamp.year() > 9999 {
        return None;
    }
    let elapsed = timestamp - epoch;
    Some(elapsed.num_milliseconds() as f64 / 86_400_000.0)
}

fn cell_row(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| ReconError::workbook(format!("row {index} exceeds the worksheet limit")))
}

fn cell_column(index: usize) -> Result<u16> {
    u16::try_from(index)
        .map_err(|_| ReconError::workbook(format!("column {index} exceeds the worksheet limit")))
}

fn xlsx_error(err: XlsxError) -> ReconError {
    ReconError::workbook(err.to_string())
}
