//! JSON loaders for datasets and observed schemas.
//!
//! A dataset document is either an array of flat objects (one per row, the
//! first object fixing the column order) or an object with explicit
//! `columns` and `rows`, which is the only way to describe a zero-row
//! dataset that still has a schema.

use crate::{ParserError, Result, read_file};
use indexmap::IndexMap;
use recon_core::{ColumnTypes, Dataset, Record, Value};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetDocument {
    Records(Vec<IndexMap<String, serde_json::Value>>),
    Table {
        columns: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<serde_json::Value>>,
    },
}

/// Parse a dataset from a JSON string.
///
/// Numbers that fit in `i64` become integers, every other number a float.
/// Strings stay text; no date inference is attempted. Nested arrays and
/// objects are rejected.
///
/// # Example
///
/// ```rust
/// use recon_core::Value;
/// use recon_parser::parse_dataset_json;
///
/// let dataset = parse_dataset_json(r#"[{"id": 1, "name": "x"}, {"id": 2, "name": null}]"#).unwrap();
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.value(1, "name"), Some(&Value::Null));
/// ```
pub fn parse_dataset_json(content: &str) -> Result<Dataset> {
    let document: DatasetDocument = serde_json::from_str(content)?;

    let dataset = match document {
        DatasetDocument::Records(objects) => {
            let records = objects
                .into_iter()
                .enumerate()
                .map(|(row, object)| {
                    object
                        .into_iter()
                        .map(|(column, value)| {
                            let value = convert(row, &column, value)?;
                            Ok((column, value))
                        })
                        .collect::<Result<Record>>()
                })
                .collect::<Result<Vec<_>>>()?;
            Dataset::from_records(records)?
        }
        DatasetDocument::Table { columns, rows } => {
            let rows = rows
                .into_iter()
                .enumerate()
                .map(|(row, values)| {
                    values
                        .into_iter()
                        .enumerate()
                        .map(|(index, value)| {
                            let column = columns.get(index).map(String::as_str).unwrap_or("?");
                            convert(row, column, value)
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            Dataset::new(columns, rows)?
        }
    };

    debug!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "parsed dataset"
    );
    Ok(dataset)
}

/// Load a dataset from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    parse_dataset_json(&read_file(path)?)
}

/// Parse an observed schema (`{"column": "DATATYPE", ...}`) from JSON.
pub fn parse_observed_schema(content: &str) -> Result<ColumnTypes> {
    Ok(serde_json::from_str(content)?)
}

/// Load an observed schema from a JSON file.
pub fn load_observed_schema(path: &Path) -> Result<ColumnTypes> {
    parse_observed_schema(&read_file(path)?)
}

fn convert(row: usize, column: &str, value: serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    match value {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => Ok(n.as_f64().map(Value::from).unwrap_or(Value::Null)),
        },
        Json::String(s) => Ok(Value::Text(s)),
        Json::Array(_) => Err(unsupported(row, column, "array")),
        Json::Object(_) => Err(unsupported(row, column, "object")),
    }
}

fn unsupported(row: usize, column: &str, kind: &str) -> ParserError {
    ParserError::UnsupportedValue {
        row,
        column: column.to_string(),
        kind: format!("nested {kind} values are not supported"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recon_core::ReconError;

    #[test]
    fn test_records_document() {
        let dataset = parse_dataset_json(
            r#"[
                {"raceId": 1, "name": "Bahrain", "lat": 26.03, "sprint": false},
                {"raceId": 2, "name": "Jeddah", "lat": 21.63, "sprint": true}
            ]"#,
        )
        .unwrap();

        assert_eq!(dataset.columns(), &["raceId", "name", "lat", "sprint"]);
        assert_eq!(dataset.value(0, "raceId"), Some(&Value::Int(1)));
        assert_eq!(dataset.value(1, "lat"), Some(&Value::Float(21.63)));
        assert_eq!(dataset.value(1, "sprint"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_table_document_allows_zero_rows() {
        let dataset = parse_dataset_json(r#"{"columns": ["id", "name"]}"#).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns().len(), 2);

        let dataset =
            parse_dataset_json(r#"{"columns": ["id"], "rows": [[1], [null]]}"#).unwrap();
        assert_eq!(dataset.value(1, "id"), Some(&Value::Null));
    }

    #[test]
    fn test_empty_array_is_empty_dataset() {
        let dataset = parse_dataset_json("[]").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());
    }

    #[test]
    fn test_inconsistent_records_rejected() {
        let result = parse_dataset_json(r#"[{"id": 1}, {"code": "HAM"}]"#);
        assert!(matches!(
            result.unwrap_err(),
            ParserError::Invalid(ReconError::InconsistentRecord { .. })
        ));
    }

    #[test]
    fn test_nested_values_rejected() {
        let result = parse_dataset_json(r#"[{"id": 1, "tags": ["a"]}]"#);
        match result.unwrap_err() {
            ParserError::UnsupportedValue { row, column, .. } => {
                assert_eq!(row, 0);
                assert_eq!(column, "tags");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let dataset = parse_dataset_json(r#"[{"n": 18446744073709551615}]"#).unwrap();
        assert!(matches!(dataset.value(0, "n"), Some(Value::Float(_))));
    }

    #[test]
    fn test_observed_schema() {
        let schema = parse_observed_schema(r#"{"id": "NUMBER", "name": "TEXT"}"#).unwrap();
        assert_eq!(schema.get("id").map(String::as_str), Some("NUMBER"));
        assert_eq!(schema.keys().next().map(String::as_str), Some("id"));
    }
}
