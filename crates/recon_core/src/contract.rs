//! Schema contract types.
//!
//! A [`SchemaContract`] is the column-name to datatype-label mapping a table
//! must satisfy. Observed schemas fetched from a catalog use the same
//! [`ColumnTypes`] mapping so the two can be compared directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column name to datatype label, in catalog ordinal order.
///
/// Equality is order-independent: two mappings are equal when they have the
/// same key set and the same label for every key.
pub type ColumnTypes = IndexMap<String, String>;

/// The expected schema of a table.
///
/// # Example
///
/// ```rust
/// use recon_core::SchemaContract;
///
/// let contract = SchemaContract::builder("AIRBNBDRIVERS")
///     .column("driverId", "NUMBER")
///     .column("dob", "DATE")
///     .build();
///
/// assert_eq!(contract.columns.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaContract {
    /// Table the contract applies to
    pub table_name: String,

    /// Human-readable description of the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Expected column datatypes; labels are compared byte-for-byte
    pub columns: ColumnTypes,
}

impl SchemaContract {
    /// Creates a contract from a table name and its expected columns.
    pub fn new(table_name: impl Into<String>, columns: ColumnTypes) -> Self {
        Self {
            table_name: table_name.into(),
            description: None,
            columns,
        }
    }

    /// Returns the expected label for a column.
    pub fn expected_type(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}
