//! Loaders for reconciliation inputs.
//!
//! This crate turns files into the strongly-typed structures of
//! `recon_core`:
//!
//! - schema contracts and [`ReconConfig`] from YAML or TOML
//! - datasets and observed schemas from JSON
//! - dbt `run_results.json` + `manifest.json` into test outcome records
//!
//! # Example
//!
//! ```rust
//! use recon_parser::parse_contract_yaml;
//!
//! let yaml = r#"
//! table_name: AIRBNBDRIVERS
//! description: Drivers in the bronze layer
//! columns:
//!   driverId: NUMBER
//!   code: TEXT
//!   dob: DATE
//! "#;
//!
//! let contract = parse_contract_yaml(yaml).expect("Failed to parse contract");
//! assert_eq!(contract.table_name, "AIRBNBDRIVERS");
//! assert_eq!(contract.expected_type("dob"), Some("DATE"));
//! ```

mod dataset;
mod dbt;

pub use dataset::*;
pub use dbt::*;

use recon_core::{ReconConfig, ReconError, SchemaContract};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading inputs.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A JSON value that has no tabular representation
    #[error("Unsupported value in column '{column}' of row {row}: {kind}")]
    UnsupportedValue {
        row: usize,
        column: String,
        kind: String,
    },

    /// Parsed input violates a core invariant
    #[error(transparent)]
    Invalid(#[from] ReconError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported document formats for contracts and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a schema contract from a YAML string.
pub fn parse_contract_yaml(content: &str) -> Result<SchemaContract> {
    from_yaml(content)
}

/// Parse a schema contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use recon_parser::parse_contract_toml;
///
/// let toml = r#"
/// table_name = "AIRBNBCIRCUITS"
///
/// [columns]
/// circuitId = "NUMBER"
/// name = "TEXT"
/// "#;
///
/// let contract = parse_contract_toml(toml).unwrap();
/// assert_eq!(contract.columns.len(), 2);
/// ```
pub fn parse_contract_toml(content: &str) -> Result<SchemaContract> {
    from_toml(content)
}

/// Parse a schema contract from a file with automatic format detection.
///
/// ```no_run
/// use recon_parser::parse_contract_file;
/// use std::path::Path;
///
/// let contract = parse_contract_file(Path::new("contracts/drivers.yml")).unwrap();
/// println!("Loaded contract: {}", contract.table_name);
/// ```
pub fn parse_contract_file(path: &Path) -> Result<SchemaContract> {
    let contract: SchemaContract = parse_document_file(path)?;
    debug!(
        table = %contract.table_name,
        columns = contract.columns.len(),
        "loaded schema contract"
    );
    Ok(contract)
}

/// Parse a reconciliation configuration from a YAML or TOML file.
///
/// Missing keys take their defaults; the result is validated before it is
/// returned.
pub fn parse_config_file(path: &Path) -> Result<ReconConfig> {
    let config: ReconConfig = parse_document_file(path)?;
    config.validate()?;
    Ok(config)
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_document_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = detect_format(path)?;
    let content = read_file(path)?;

    match format {
        DocumentFormat::Yaml => from_yaml(&content),
        DocumentFormat::Toml => from_toml(&content),
    }
}

fn from_yaml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_yaml_ng::from_str(content)?)
}

fn from_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
}

/// Reads a whole file, reporting a missing file by path.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ParserError::FileNotFound(path.to_path_buf()),
        _ => ParserError::IoError(err),
    })
}
