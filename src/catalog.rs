//! Catalog data model, aggregation, and output
//!
//! The types shared across the extraction pipeline, the pure merge step that
//! joins model records with pricing, and the JSONL writer that persists one
//! catalog file per provider.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::extract::RawRecord;
use crate::normalize::{self, IdentifierSpec};

/// Per-model pricing in USD per million tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Price per million input tokens
    pub input_price: Option<f64>,
    /// Price per million output tokens
    pub output_price: Option<f64>,
    /// Price per million tokens written to the prompt cache
    pub cache_write_price: Option<f64>,
    /// Price per million tokens read from the prompt cache
    pub cache_hit_price: Option<f64>,
}

impl Pricing {
    /// Whether no price field is set at all
    pub fn is_empty(&self) -> bool {
        self.input_price.is_none()
            && self.output_price.is_none()
            && self.cache_write_price.is_none()
            && self.cache_hit_price.is_none()
    }
}

/// Pricing keyed by model identifier
pub type PricingMap = HashMap<String, Pricing>;

/// A model joined with its pricing, ready for the catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Human-readable model name as shown on the provider's page
    pub name: String,
    /// Canonical machine-usable identifier
    pub identifier: String,
    /// Context window in tokens, when the page states one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
    /// Pricing, empty when the pricing page had no row for this model
    pub pricing: Pricing,
}

/// Errors that can occur when writing a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Creating the directory or writing the file failed
    #[error("failed to write catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be serialized
    #[error("failed to serialize catalog entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Joins model records with the pricing map.
///
/// Pure function of its inputs: records with invalid identifiers are
/// discarded, duplicates are collapsed keeping the first occurrence, the
/// result is sorted by display name (case-sensitive), and each survivor
/// carries the pricing found under its identifier — or empty pricing when
/// the map has none.
pub fn merge_catalog(
    records: &[RawRecord],
    pricing: &PricingMap,
    ids: &IdentifierSpec,
) -> Vec<ModelEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries: Vec<ModelEntry> = records
        .iter()
        .filter(|record| ids.is_valid(&record.identifier))
        .filter(|record| seen.insert(record.identifier.as_str()))
        .map(|record| ModelEntry {
            name: record.name.clone(),
            identifier: record.identifier.clone(),
            context_window: record
                .cells
                .iter()
                .find_map(|cell| normalize::extract_context_window(cell)),
            pricing: pricing.get(&record.identifier).cloned().unwrap_or_default(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Writes entries as JSON Lines: one serialized `ModelEntry` per line.
///
/// The parent directory is created if missing; an existing file is
/// overwritten.
pub fn write_catalog(path: &Path, entries: &[ModelEntry]) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut output = String::new();
    for entry in entries {
        output.push_str(&serde_json::to_string(entry)?);
        output.push('\n');
    }
    fs::write(path, output)?;
    Ok(())
}
