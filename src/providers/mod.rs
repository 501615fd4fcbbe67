//! Provider registry
//!
//! The static list of AI providers whose public pages we scrape, with the
//! page URLs and identifier rules for each. Identifier rules are ordered
//! most-specific first; the normalizer evaluates them first-match-wins.

mod scraper;

pub use scraper::ModelScraper;

use crate::normalize::{IdRule, IdentifierSpec};

/// A provider whose model and pricing pages feed one catalog file
#[derive(Debug, Clone)]
pub struct Provider {
    /// Unique identifier used in CLI arguments and catalog file names
    pub id: &'static str,
    /// Human-readable provider name, used in log descriptions
    pub name: &'static str,
    /// Page listing available models
    pub models_url: &'static str,
    /// Page listing per-model pricing; may be the same page
    pub pricing_url: &'static str,
    /// Identifier validation and canonicalization rules
    pub ids: IdentifierSpec,
}

static ANTHROPIC_RULES: &[IdRule] = &[
    IdRule {
        patterns: &["opus", "4.1"],
        id: "claude-opus-4-1",
    },
    IdRule {
        patterns: &["opus", "4"],
        id: "claude-opus-4",
    },
    IdRule {
        patterns: &["sonnet", "4"],
        id: "claude-sonnet-4",
    },
    IdRule {
        patterns: &["sonnet", "3.7"],
        id: "claude-3-7-sonnet",
    },
    IdRule {
        patterns: &["haiku", "3.5"],
        id: "claude-3-5-haiku",
    },
    IdRule {
        patterns: &["sonnet", "3.5"],
        id: "claude-3-5-sonnet",
    },
    IdRule {
        patterns: &["opus", "3"],
        id: "claude-3-opus",
    },
    IdRule {
        patterns: &["haiku", "3"],
        id: "claude-3-haiku",
    },
];

static OPENAI_RULES: &[IdRule] = &[
    IdRule {
        patterns: &["gpt-4o", "mini"],
        id: "gpt-4o-mini",
    },
    IdRule {
        patterns: &["gpt-4o"],
        id: "gpt-4o",
    },
    IdRule {
        patterns: &["4.1", "mini"],
        id: "gpt-4.1-mini",
    },
    IdRule {
        patterns: &["4.1"],
        id: "gpt-4.1",
    },
    IdRule {
        patterns: &["o1", "mini"],
        id: "o1-mini",
    },
    IdRule {
        patterns: &["o1"],
        id: "o1",
    },
];

static MISTRAL_RULES: &[IdRule] = &[
    IdRule {
        patterns: &["large"],
        id: "mistral-large-latest",
    },
    IdRule {
        patterns: &["medium"],
        id: "mistral-medium-latest",
    },
    IdRule {
        patterns: &["small"],
        id: "mistral-small-latest",
    },
    IdRule {
        patterns: &["codestral"],
        id: "codestral-latest",
    },
];

static XAI_RULES: &[IdRule] = &[
    IdRule {
        patterns: &["grok", "mini"],
        id: "grok-3-mini",
    },
    IdRule {
        patterns: &["grok"],
        id: "grok-3",
    },
];

/// Static array of all supported providers
pub static PROVIDERS: [Provider; 4] = [
    Provider {
        id: "anthropic",
        name: "Anthropic",
        models_url: "https://docs.anthropic.com/en/docs/about-claude/models/overview",
        pricing_url: "https://www.anthropic.com/pricing",
        ids: IdentifierSpec {
            prefixes: &["claude"],
            min_len: 8,
            rules: ANTHROPIC_RULES,
        },
    },
    Provider {
        id: "openai",
        name: "OpenAI",
        models_url: "https://platform.openai.com/docs/models",
        pricing_url: "https://openai.com/api/pricing/",
        ids: IdentifierSpec {
            prefixes: &["gpt", "o1", "o3", "o4"],
            min_len: 2,
            rules: OPENAI_RULES,
        },
    },
    Provider {
        id: "mistral",
        name: "Mistral",
        models_url: "https://docs.mistral.ai/getting-started/models/models_overview/",
        pricing_url: "https://mistral.ai/technology/#pricing",
        ids: IdentifierSpec {
            prefixes: &["mistral", "codestral", "ministral", "pixtral"],
            min_len: 7,
            rules: MISTRAL_RULES,
        },
    },
    Provider {
        id: "xai",
        name: "xAI",
        models_url: "https://docs.x.ai/docs/models",
        pricing_url: "https://x.ai/api",
        ids: IdentifierSpec {
            prefixes: &["grok"],
            min_len: 5,
            rules: XAI_RULES,
        },
    },
];

/// All registered providers, in catalog-update order
pub fn all_providers() -> &'static [Provider] {
    &PROVIDERS
}

/// Get a provider by its ID
///
/// # Arguments
///
/// * `id` - The unique identifier for the provider (e.g., "anthropic")
///
/// # Returns
///
/// Returns `Some(&Provider)` if found, `None` otherwise
pub fn get_provider_by_id(id: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|provider| provider.id == id)
}
