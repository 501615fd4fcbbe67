//! Heuristic extraction of structured records from semi-structured pages
//!
//! Two strategies share this module: a table scan for pages that lay models
//! out in `<table>` markup, and a heading/sibling fallback for docs-style
//! pages that don't. Both isolate faults per row or per heading, deduplicate
//! by identifier with the first occurrence winning, and log how many unique
//! records they produced.

mod headings;
mod tables;

pub use headings::extract_from_headings;
pub use tables::{extract_model_records, extract_pricing};

use scraper::ElementRef;
use std::collections::HashSet;

/// One table row or heading block worth of scraped fields
///
/// Transient: lives only within a single extraction pass. The identifier has
/// already passed format validation when a record is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Display text, usually the first cell or the heading text
    pub name: String,
    /// Validated canonical identifier
    pub identifier: String,
    /// Remaining cell texts, kept for downstream field mining
    pub cells: Vec<String>,
}

/// Collapses an element's text: trimmed, internal whitespace normalized to
/// single spaces, `""` for empty elements.
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drops records whose identifier was already seen, keeping the first.
pub(crate) fn dedup_by_identifier(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.identifier.clone()))
        .collect()
}
