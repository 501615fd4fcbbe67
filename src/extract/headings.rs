//! Heading/sibling fallback extraction
//!
//! Docs-style pages often introduce each model with a heading and mention
//! its identifier in a nearby code snippet instead of a table. This strategy
//! walks forward from each heading through a bounded number of sibling
//! elements looking for a token that validates as an identifier, stopping
//! early at the next heading of equal or higher priority.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info};

use crate::normalize::IdentifierSpec;

use super::{dedup_by_identifier, element_text, RawRecord};

/// How many sibling elements to scan past a heading before giving up
const SIBLING_SCAN_LIMIT: usize = 10;

/// Punctuation stripped from candidate tokens before validation
const TOKEN_TRIM: &[char] = &['(', ')', '"', '\'', ',', ':', ';', '`', '.'];

/// Numeric priority of a heading element; lower is higher priority.
fn heading_level(element: &ElementRef) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Extracts model records from the page's headings.
///
/// Each `h2`/`h3` becomes a candidate display name; a heading that yields no
/// identifier within the scan window is logged and skipped without affecting
/// the rest of the scan.
pub fn extract_from_headings(document: &Html, ids: &IdentifierSpec) -> Vec<RawRecord> {
    let (heading_sel, code_sel) = match (Selector::parse("h2, h3"), Selector::parse("code")) {
        (Ok(h), Ok(c)) => (h, c),
        _ => {
            error!("error scanning headings: invalid selector");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for heading in document.select(&heading_sel) {
        let name = element_text(heading);
        if name.is_empty() {
            continue;
        }
        match identifier_near(heading, &code_sel, ids) {
            Some(identifier) => records.push(RawRecord {
                name,
                identifier,
                cells: Vec::new(),
            }),
            None => debug!(heading = %name, "no identifier found for heading"),
        }
    }

    let records = dedup_by_identifier(records);
    info!("extracted {} unique model records from headings", records.len());
    records
}

/// Scans forward from `heading` for a code-like token that validates as an
/// identifier. Returns `None` when the scan window closes — either by
/// running out of siblings or by hitting a heading of equal or higher
/// priority, which starts the next model's section.
fn identifier_near(
    heading: ElementRef,
    code_sel: &Selector,
    ids: &IdentifierSpec,
) -> Option<String> {
    let level = heading_level(&heading)?;

    for sibling in heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take(SIBLING_SCAN_LIMIT)
    {
        if let Some(sibling_level) = heading_level(&sibling) {
            if sibling_level <= level {
                return None;
            }
        }

        // Code blocks are the most reliable carrier, so check them first.
        for code in sibling.select(code_sel) {
            let token = element_text(code);
            let token = token.trim_matches(TOKEN_TRIM);
            if ids.is_valid(token) {
                return Some(token.to_string());
            }
        }
        // Otherwise any whitespace-separated token in the sibling's text.
        let text = element_text(sibling);
        for token in text.split_whitespace() {
            let token = token.trim_matches(TOKEN_TRIM);
            if ids.is_valid(token) {
                return Some(token.to_string());
            }
        }
    }
    None
}
