//! Error types for reconciliation.
//!
//! Contract violations on inputs, assertion failures a caller chose to turn
//! into errors, and I/O failures while writing artifacts all surface as
//! [`ReconError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Main error type for reconciliation operations.
#[derive(Error, Debug)]
pub enum ReconError {
    /// The same column name appears twice in one dataset
    #[error("Duplicate column '{0}' in dataset")]
    DuplicateColumn(String),

    /// A row does not have one value per column
    #[error("Row {row} has {found} values but the dataset has {expected} columns")]
    RowWidth {
        /// Row index
        row: usize,
        /// Number of columns
        expected: usize,
        /// Number of values in the row
        found: usize,
    },

    /// A record's column set differs from the first record's
    #[error("Record {row} has columns [{found}] but the dataset has [{expected}]")]
    InconsistentRecord {
        /// Record index
        row: usize,
        /// Columns of the dataset, comma-joined
        expected: String,
        /// Columns of the offending record, comma-joined
        found: String,
    },

    /// Observed schema differs from the expected contract
    #[error("Schema mismatch for table '{table}': {details}")]
    SchemaMismatch {
        /// Table name
        table: String,
        /// Full description of both mappings and their differences
        details: String,
    },

    /// Row counts differ between two stages
    #[error("{0}")]
    RowCountMismatch(String),

    /// Content hashes disagree between two stages
    #[error("Hash integrity check failed: {0}")]
    HashIntegrity(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Artifact could not be written
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path being written
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Workbook writer failure
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Template rendering failure
    #[error("Render error: {0}")]
    Render(String),
}

impl ReconError {
    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a workbook error.
    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook(message.into())
    }

    /// Creates a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Returns true for errors that describe a validation outcome rather than
    /// a broken input or environment.
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::SchemaMismatch { .. } | Self::RowCountMismatch(_) | Self::HashIntegrity(_)
        )
    }
}
