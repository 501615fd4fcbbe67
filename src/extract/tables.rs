//! Table-scan extraction strategy
//!
//! Walks every `<table>` on a page, skipping header rows, and maps data
//! cells to semantic fields. Column roles come from the header row's titles
//! when they match known keywords, and from column position otherwise. A
//! malformed row is logged and skipped; a structural failure aborts the pass
//! with an empty result.

use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::catalog::{Pricing, PricingMap};
use crate::normalize::{self, IdentifierSpec};

use super::{dedup_by_identifier, element_text, RawRecord};

/// First-cell titles that mark a row as a header rather than data
const HEADER_KEYWORDS: &[&str] = &[
    "model", "name", "api", "feature", "pricing", "price", "version", "context",
];

/// Which column holds which field, by index
#[derive(Debug, Clone, Copy, Default)]
struct ColumnRoles {
    name: Option<usize>,
    identifier: Option<usize>,
    input: Option<usize>,
    output: Option<usize>,
    cache_write: Option<usize>,
    cache_hit: Option<usize>,
}

impl ColumnRoles {
    /// Whether any pricing column was identified from the header titles.
    fn has_price_column(&self) -> bool {
        self.input.is_some()
            || self.output.is_some()
            || self.cache_write.is_some()
            || self.cache_hit.is_some()
    }
}

/// The selectors every scan needs; `None` is the structural failure case
/// that aborts a whole pass.
fn selectors() -> Option<(Selector, Selector, Selector)> {
    Some((
        Selector::parse("table").ok()?,
        Selector::parse("tr").ok()?,
        Selector::parse("th, td").ok()?,
    ))
}

/// A row is a header when its first cell reads like a column title.
fn is_header_row(cells: &[String]) -> bool {
    cells
        .first()
        .map(|first| {
            let first = first.to_lowercase();
            HEADER_KEYWORDS.iter().any(|kw| first.starts_with(kw))
        })
        .unwrap_or(false)
}

/// Maps header titles to column roles by keyword.
///
/// "api"/"id" are checked before "model"/"name" so an "API Name" column
/// lands on the identifier role, not the display-name role.
fn roles_from_headers(headers: &[String]) -> ColumnRoles {
    let mut roles = ColumnRoles::default();
    for (idx, title) in headers.iter().enumerate() {
        let title = title.to_lowercase();
        let slot = if title.contains("input") {
            &mut roles.input
        } else if title.contains("output") {
            &mut roles.output
        } else if title.contains("write") {
            &mut roles.cache_write
        } else if title.contains("hit") || title.contains("read") || title.contains("refresh") {
            &mut roles.cache_hit
        } else if title.contains("api") || title.contains("id") {
            &mut roles.identifier
        } else if title.contains("model") || title.contains("name") || title.contains("feature") {
            &mut roles.name
        } else {
            continue;
        };
        slot.get_or_insert(idx);
    }
    roles
}

/// Positional fallback when no header titles matched: column 0 is the
/// display name, the first data column is the input price, the last is the
/// output price, and interior columns are the cache write/hit tiers.
fn positional_roles(width: usize) -> ColumnRoles {
    let mut roles = ColumnRoles {
        name: Some(0),
        ..Default::default()
    };
    if width >= 2 {
        roles.input = Some(1);
        roles.output = Some(width - 1);
        if width >= 4 {
            roles.cache_write = Some(2);
        }
        if width >= 5 {
            roles.cache_hit = Some(3);
        }
    }
    roles
}

/// Extracts model records from every table on the page.
///
/// Each data row must yield a display name and a validated identifier —
/// either an explicit identifier cell or one derived from the display name.
/// Rows that can't are logged and skipped. Returns the empty list when the
/// page structure can't be scanned at all.
pub fn extract_model_records(document: &Html, ids: &IdentifierSpec) -> Vec<RawRecord> {
    let Some((table_sel, row_sel, cell_sel)) = selectors() else {
        error!("error scanning model tables: invalid selector");
        return Vec::new();
    };

    let mut records = Vec::new();
    for table in document.select(&table_sel) {
        for row in table.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            if cells.is_empty() || is_header_row(&cells) {
                continue;
            }
            match parse_model_row(&cells, ids) {
                Some(record) => records.push(record),
                None => debug!(row = ?cells.first(), "error parsing model row, skipping"),
            }
        }
    }

    let records = dedup_by_identifier(records);
    info!("extracted {} unique model records", records.len());
    records
}

/// One data row into a record: first cell is the name, the identifier comes
/// from the first cell that validates as-is, or is derived from the name.
fn parse_model_row(cells: &[String], ids: &IdentifierSpec) -> Option<RawRecord> {
    let name = cells.first()?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let identifier = cells
        .iter()
        .skip(1)
        .map(|cell| cell.trim())
        .find(|cell| ids.is_valid(cell))
        .map(str::to_string)
        .or_else(|| ids.extract(&name))?;
    Some(RawRecord {
        name,
        identifier,
        cells: cells[1..].to_vec(),
    })
}

/// Extracts a pricing map from every table on the page.
///
/// Column roles are taken from the most recent header row when its titles
/// matched pricing keywords, and fall back to positional rules otherwise.
/// Duplicate identifiers keep their first-seen pricing.
pub fn extract_pricing(document: &Html, ids: &IdentifierSpec) -> PricingMap {
    let Some((table_sel, row_sel, cell_sel)) = selectors() else {
        error!("error scanning pricing tables: invalid selector");
        return PricingMap::new();
    };

    let mut pricing = PricingMap::new();
    for table in document.select(&table_sel) {
        let mut header_roles: Option<ColumnRoles> = None;
        for row in table.select(&row_sel) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            if cells.is_empty() {
                continue;
            }
            if is_header_row(&cells) {
                header_roles = Some(roles_from_headers(&cells));
                continue;
            }

            let roles = match header_roles {
                Some(roles) if roles.has_price_column() => roles,
                _ => positional_roles(cells.len()),
            };
            match parse_pricing_row(&cells, roles, ids) {
                Some((identifier, prices)) => {
                    pricing.entry(identifier).or_insert(prices);
                }
                None => debug!(row = ?cells.first(), "error parsing pricing row, skipping"),
            }
        }
    }

    info!("extracted pricing for {} models", pricing.len());
    pricing
}

/// One data row into `(identifier, pricing)`; `None` when the row has no
/// usable identifier or no parsable price at all.
fn parse_pricing_row(
    cells: &[String],
    roles: ColumnRoles,
    ids: &IdentifierSpec,
) -> Option<(String, Pricing)> {
    let name_idx = roles.name.unwrap_or(0);
    let identifier = roles
        .identifier
        .and_then(|idx| cells.get(idx))
        .and_then(|cell| ids.extract(cell))
        .or_else(|| cells.get(name_idx).and_then(|cell| ids.extract(cell)))?;

    let price_at = |idx: Option<usize>| {
        idx.and_then(|i| cells.get(i))
            .and_then(|cell| normalize::extract_price(cell))
    };
    let prices = Pricing {
        input_price: price_at(roles.input),
        output_price: price_at(roles.output),
        cache_write_price: price_at(roles.cache_write),
        cache_hit_price: price_at(roles.cache_hit),
    };
    if prices.is_empty() {
        return None;
    }
    Some((identifier, prices))
}
