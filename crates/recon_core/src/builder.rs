//! Builder pattern for creating schema contracts.
//!
//! This module provides an ergonomic builder for constructing contracts with
//! a fluent API.

use crate::{ColumnTypes, SchemaContract};

/// Builder for creating a [`SchemaContract`].
///
/// # Example
///
/// ```rust
/// use recon_core::SchemaContractBuilder;
///
/// let contract = SchemaContractBuilder::new("AIRBNBDRIVERS")
///     .description("Drivers copied from landing")
///     .column("code", "TEXT")
///     .column("driverId", "NUMBER")
///     .build();
///
/// assert_eq!(contract.expected_type("driverId"), Some("NUMBER"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaContractBuilder {
    table_name: String,
    description: Option<String>,
    columns: ColumnTypes,
}

impl SchemaContractBuilder {
    /// Creates a new builder for the given table.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Sets the contract description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a column with its expected datatype label.
    ///
    /// Adding the same column twice keeps the last label.
    pub fn column(mut self, name: impl Into<String>, datatype: impl Into<String>) -> Self {
        self.columns.insert(name.into(), datatype.into());
        self
    }

    /// Adds multiple columns.
    pub fn columns<I, K, V>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builds the contract.
    pub fn build(self) -> SchemaContract {
        SchemaContract {
            table_name: self.table_name,
            description: self.description,
            columns: self.columns,
        }
    }
}

impl SchemaContract {
    /// Creates a new builder for `SchemaContract`.
    pub fn builder(table_name: impl Into<String>) -> SchemaContractBuilder {
        SchemaContractBuilder::new(table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_keeps_ordinal_order() {
        let contract = SchemaContractBuilder::new("T")
            .column("b", "TEXT")
            .columns([("a", "NUMBER"), ("c", "DATE")])
            .build();

        let names: Vec<&str> = contract.columns.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(contract.description, None);
    }

    #[test]
    fn test_last_label_wins() {
        let contract = SchemaContract::builder("T")
            .column("id", "TEXT")
            .column("id", "NUMBER")
            .build();

        assert_eq!(contract.columns.len(), 1);
        assert_eq!(contract.expected_type("id"), Some("NUMBER"));
    }
}
