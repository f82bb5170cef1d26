//! Dataset representation for reconciliation.
//!
//! A [`Dataset`] is an ordered sequence of rows over a single, fixed column
//! list. Column order is kept for display; comparisons treat the columns as
//! a set. Datasets are read-only once built: every reshaping operation
//! returns a new dataset.

use crate::{ReconError, Result, Value};
use indexmap::IndexMap;
use std::collections::HashSet;

/// A single record keyed by column name, in source column order.
pub type Record = IndexMap<String, Value>;

/// A single row of values, positionally aligned with [`Dataset::columns`].
pub type Row = Vec<Value>;

/// A dataset with one schema shared by all of its rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Creates a new empty dataset with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a zero-row dataset with the given columns.
    pub fn with_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(columns.into_iter().map(Into::into).collect(), Vec::new())
    }

    /// Creates a dataset from a column list and positional rows.
    ///
    /// Fails on duplicate column names or on a row whose width differs from
    /// the number of columns. NaN floats are stored as nulls.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ReconError::DuplicateColumn(column.clone()));
            }
        }

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(ReconError::RowWidth {
                row,
                expected: columns.len(),
                found: values.len(),
            });
        }

        let rows = rows
            .into_iter()
            .map(|values| values.into_iter().map(Value::normalized).collect())
            .collect();

        Ok(Self { columns, rows })
    }

    /// Creates a dataset from keyed records.
    ///
    /// The first record fixes the column order. Every other record must carry
    /// exactly the same column set (in any order).
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let Some(first) = records.first() else {
            return Ok(Self::empty());
        };
        let columns: Vec<String> = first.keys().cloned().collect();

        let mut rows = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let consistent = record.len() == columns.len()
                && columns.iter().all(|column| record.contains_key(column));
            if !consistent {
                return Err(ReconError::InconsistentRecord {
                    row: idx,
                    expected: columns.join(", "),
                    found: record.keys().cloned().collect::<Vec<_>>().join(", "),
                });
            }
            rows.push(columns.iter().map(|column| record[column].clone()).collect());
        }

        Self::new(columns, rows)
    }

    /// Returns the column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Returns the number of rows in the dataset.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Gets a specific row by index.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Gets a single cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[col])
    }

    /// Re-expresses the dataset over `columns`.
    ///
    /// Columns absent from this dataset are filled with nulls; columns not
    /// listed are dropped. Row order is unchanged.
    pub fn select(&self, columns: &[String]) -> Result<Self> {
        let mapping: Vec<Option<usize>> = columns
            .iter()
            .map(|column| self.column_index(column))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|values| {
                mapping
                    .iter()
                    .map(|idx| idx.map_or(Value::Null, |i| values[i].clone()))
                    .collect()
            })
            .collect();

        Self::new(columns.to_vec(), rows)
    }

    /// Returns a dataset with exactly `n` rows.
    ///
    /// Shorter datasets are padded with all-null rows at the end; longer ones
    /// are truncated.
    pub fn with_row_count(&self, n: usize) -> Self {
        let mut rows: Vec<Row> = self.rows.iter().take(n).cloned().collect();
        rows.resize_with(n, || vec![Value::Null; self.columns.len()]);
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}
