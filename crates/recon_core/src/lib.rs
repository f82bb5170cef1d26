//! # Layer Reconciliation Core
//!
//! Core data structures shared by the reconciliation engine and its report
//! writers.
//!
//! Records move through sequential pipeline stages (landing → bronze →
//! silver). Proving they survived a stage transition unchanged means
//! comparing two materialized tables, checking a table's schema against a
//! contract, and summarizing test results. This crate provides the types
//! all of that is expressed in.
//!
//! ## Key Concepts
//!
//! - **Dataset**: rows over one fixed column list, with typed [`Value`]s
//! - **Schema contract**: expected column → datatype label mapping
//! - **Test outcome**: one executed pipeline test and its status
//! - **Config**: explicit settings for labels, sheet names and output paths
//!
//! ## Example
//!
//! ```rust
//! use recon_core::{Dataset, Record, Value};
//!
//! let mut record = Record::new();
//! record.insert("id".to_string(), Value::Int(1));
//! record.insert("name".to_string(), Value::from("x"));
//!
//! let dataset = Dataset::from_records(vec![record]).unwrap();
//! assert_eq!(dataset.columns(), &["id".to_string(), "name".to_string()]);
//! ```

pub mod builder;
pub mod config;
pub mod contract;
pub mod dataset;
pub mod error;
pub mod outcome;
pub mod report;
pub mod value;

pub use builder::*;
pub use config::*;
pub use contract::*;
pub use dataset::*;
pub use error::*;
pub use outcome::*;
pub use report::*;
pub use value::*;
