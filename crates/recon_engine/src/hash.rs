//! Content hashing and hash-set integrity between stages.
//!
//! Each row is reduced to one deterministic hash over a fixed column list:
//! values are rendered as text, trimmed, nulls become the empty string, the
//! parts are joined with `|` and the whole line is upper-cased before
//! hashing. Two layers holding the same records yield the same hash set.

use blake3::Hasher;
use recon_core::{CheckOutcome, Dataset, ReconError, Result, SideLabels};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Separator between rendered values.
const FIELD_SEPARATOR: &str = "|";

/// Computes per-row content hashes.
#[derive(Debug, Clone, Default)]
pub struct RowHasher {
    columns: Option<Vec<String>>,
}

impl RowHasher {
    /// Hashes every column of the dataset, in its source order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes the given columns, in the given order. Columns a dataset lacks
    /// read as null.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns: Some(columns),
        }
    }

    /// Returns the normalized line that gets hashed for one row.
    pub fn normalize(values: &[recon_core::Value]) -> String {
        values
            .iter()
            .map(|value| value.to_string().trim().to_string())
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR)
            .to_uppercase()
    }

    /// Hashes a single normalized line.
    pub fn hash_line(line: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(line.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Hashes every row of the dataset, in row order.
    pub fn hash_dataset(&self, dataset: &Dataset) -> Result<Vec<String>> {
        let projected;
        let source = match &self.columns {
            Some(columns) => {
                projected = dataset.select(columns)?;
                &projected
            }
            None => dataset,
        };

        let hashes: Vec<String> = source
            .rows()
            .map(|row| Self::hash_line(&Self::normalize(row)))
            .collect();

        debug!(rows = hashes.len(), "hashed dataset rows");
        Ok(hashes)
    }
}

/// Result of comparing the hash sets of two stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashIntegrityReport {
    pub labels: SideLabels,
    /// Hashes occurring more than once in the reference
    pub duplicates_reference: Vec<String>,
    /// Hashes occurring more than once in the candidate
    pub duplicates_candidate: Vec<String>,
    /// Reference hashes absent from the candidate
    pub missing_in_candidate: Vec<String>,
    /// Candidate hashes absent from the reference
    pub extra_in_candidate: Vec<String>,
    /// Maximum number of hashes listed per category in messages
    pub sample_limit: usize,
}

impl HashIntegrityReport {
    /// Whether both sides hold the same set of unique hashes.
    pub fn passed(&self) -> bool {
        self.duplicates_reference.is_empty()
            && self.duplicates_candidate.is_empty()
            && self.missing_in_candidate.is_empty()
            && self.extra_in_candidate.is_empty()
    }

    /// Describes every failing category with a bounded sample.
    pub fn message(&self) -> String {
        if self.passed() {
            return format!(
                "{} -> {} hash integrity validated",
                self.labels.reference, self.labels.candidate
            );
        }

        let categories = [
            (
                format!("Duplicate hashes in {}", self.labels.reference),
                &self.duplicates_reference,
            ),
            (
                format!("Duplicate hashes in {}", self.labels.candidate),
                &self.duplicates_candidate,
            ),
            (
                format!("{} is missing hashes present in {}", self.labels.candidate, self.labels.reference),
                &self.missing_in_candidate,
            ),
            (
                format!("{} has extra hashes not present in {}", self.labels.candidate, self.labels.reference),
                &self.extra_in_candidate,
            ),
        ];

        categories
            .iter()
            .filter(|(_, hashes)| !hashes.is_empty())
            .map(|(title, hashes)| {
                let sample: Vec<&str> = hashes
                    .iter()
                    .take(self.sample_limit)
                    .map(String::as_str)
                    .collect();
                format!("{} ({}): [{}]", title, hashes.len(), sample.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Converts a failed check into [`ReconError::HashIntegrity`].
    pub fn into_result(self) -> Result<()> {
        if self.passed() {
            Ok(())
        } else {
            Err(ReconError::HashIntegrity(self.message()))
        }
    }
}

impl CheckOutcome for HashIntegrityReport {
    fn check_name(&self) -> &'static str {
        "hash-integrity"
    }

    fn passed(&self) -> bool {
        HashIntegrityReport::passed(self)
    }

    fn failure_message(&self) -> Option<String> {
        (!HashIntegrityReport::passed(self)).then(|| self.message())
    }
}

/// Compares hash sets between two stages.
pub struct HashIntegrity;

impl HashIntegrity {
    /// Compares reference and candidate hashes.
    ///
    /// All result lists are sorted and free of repeats.
    pub fn compare(
        labels: &SideLabels,
        reference: &[String],
        candidate: &[String],
        sample_limit: usize,
    ) -> HashIntegrityReport {
        let reference_set: BTreeSet<&String> = reference.iter().collect();
        let candidate_set: BTreeSet<&String> = candidate.iter().collect();

        HashIntegrityReport {
            labels: labels.clone(),
            duplicates_reference: duplicates(reference),
            duplicates_candidate: duplicates(candidate),
            missing_in_candidate: reference_set
                .difference(&candidate_set)
                .map(|hash| (*hash).clone())
                .collect(),
            extra_in_candidate: candidate_set
                .difference(&reference_set)
                .map(|hash| (*hash).clone())
                .collect(),
            sample_limit,
        }
    }

    /// Hashes both datasets with `hasher` and compares the results.
    pub fn compare_datasets(
        hasher: &RowHasher,
        labels: &SideLabels,
        reference: &Dataset,
        candidate: &Dataset,
        sample_limit: usize,
    ) -> Result<HashIntegrityReport> {
        let reference_hashes = hasher.hash_dataset(reference)?;
        let candidate_hashes = hasher.hash_dataset(candidate)?;
        Ok(Self::compare(
            labels,
            &reference_hashes,
            &candidate_hashes,
            sample_limit,
        ))
    }
}

fn duplicates(hashes: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&String, usize> = BTreeMap::new();
    for hash in hashes {
        *counts.entry(hash).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(hash, _)| hash.clone())
        .collect()
}
