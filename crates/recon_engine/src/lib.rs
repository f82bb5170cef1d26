//! # Layer Reconciliation Engine
//!
//! Checks that records survived a pipeline stage transition unchanged:
//!
//! - Positional diff of two datasets (cell, row and dataset level)
//! - Schema contract validation (exact column → datatype equality)
//! - Row count comparison
//! - Content-hash integrity between stages
//!
//! Every check returns a value describing what it found; deciding whether a
//! failure is fatal is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use recon_core::{Dataset, Value};
//! use recon_engine::PositionalDiff;
//!
//! let columns = vec!["id".to_string(), "name".to_string()];
//! let bronze = Dataset::new(columns.clone(), vec![vec![Value::Int(1), Value::from("x")]]).unwrap();
//! let landing = Dataset::new(columns, vec![vec![Value::Int(1), Value::from("x")]]).unwrap();
//!
//! let result = PositionalDiff::new().compare(&bronze, &landing).unwrap();
//! assert_eq!(result.summary.mismatched_rows, 0);
//! ```

mod counts;
mod diff;
mod engine;
mod hash;
mod schema;

pub use counts::*;
pub use diff::*;
pub use engine::*;
pub use hash::*;
pub use schema::*;

/// Upper-cases the first character of a side label for display.
pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
