//! Free-text normalization
//!
//! Turns loosely formatted strings scraped from provider pages into canonical
//! numbers and model identifiers: "$1,500" into a price, "200K" into a token
//! count, "Claude Opus 4" into "claude-opus-4".

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading decimal token after currency/separator stripping
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)").expect("valid regex"));

/// Number with a k/M magnitude suffix, e.g. "200K" or "1M"
static CONTEXT_WINDOW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*([km])\b").expect("valid regex"));

/// Parses a price out of free-form text.
///
/// Strips currency symbols, thousands separators, and surrounding whitespace,
/// then reads the leading numeric token: `"$15 / MTok"` yields `15.0`.
/// Returns `None` for empty or non-numeric input and for zero or negative
/// values — a `$0` cell means "no price here", not "free".
pub fn extract_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect();
    let value: f64 = LEADING_NUMBER
        .captures(cleaned.trim_start())?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;
    if value <= 0.0 {
        return None;
    }
    Some(value)
}

/// Parses a context-window size like "200K" or "1M" into a token count.
///
/// The magnitude suffix is required; a bare number is not a context window
/// on the pages we scrape.
pub fn extract_context_window(text: &str) -> Option<u64> {
    let captures = CONTEXT_WINDOW.captures(text.trim())?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "k" => 1_000.0,
        "m" => 1_000_000.0,
        _ => return None,
    };
    Some((value * multiplier) as u64)
}

/// One free-text-to-identifier mapping rule.
///
/// All `patterns` must appear (case-insensitively) in the text for the rule
/// to produce its canonical `id`. Patterns are written lowercase.
#[derive(Debug, Clone, Copy)]
pub struct IdRule {
    /// Substrings that must all be present
    pub patterns: &'static [&'static str],
    /// Canonical identifier produced on match
    pub id: &'static str,
}

/// Validation and canonicalization rules for one provider's identifiers
///
/// `rules` is an ordered list evaluated first-match-wins, so more specific
/// rules ("opus" + "4.1") must precede more general ones ("opus" + "4").
#[derive(Debug, Clone)]
pub struct IdentifierSpec {
    /// A valid identifier starts with one of these prefixes
    pub prefixes: &'static [&'static str],
    /// Minimum length of a plausible identifier
    pub min_len: usize,
    /// Ordered fallback rules for display text that is not itself an id
    pub rules: &'static [IdRule],
}

impl IdentifierSpec {
    /// Whether `text` is already a well-formed identifier: prefixed, long
    /// enough, and free of whitespace and uppercase.
    pub fn is_valid(&self, text: &str) -> bool {
        text.len() >= self.min_len
            && self.prefixes.iter().any(|p| text.starts_with(p))
            && text.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_')
            })
    }

    /// Canonicalizes `text` into an identifier.
    ///
    /// Already-valid input is returned unchanged; otherwise the rule list is
    /// consulted in order and the first full match wins. `None` when nothing
    /// applies.
    pub fn extract(&self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if self.is_valid(trimmed) {
            return Some(trimmed.to_string());
        }
        let haystack = trimmed.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().all(|p| haystack.contains(p)))
            .map(|rule| rule.id.to_string())
    }
}
