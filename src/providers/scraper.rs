//! Per-provider scrape orchestration
//!
//! `ModelScraper` binds a fetch client to one provider definition and turns
//! its pages into catalog entries. Every operation returns an empty
//! collection instead of an error when a page is unreachable or
//! unrecognizable, so a run over many providers continues past individual
//! failures.

use tracing::info;

use crate::cache::ResponseCache;
use crate::catalog::{merge_catalog, ModelEntry, PricingMap};
use crate::extract::{self, RawRecord};
use crate::fetch::{FetchClient, FetchOptions};

use super::Provider;

/// Scrapes one provider's public pages into catalog entries
pub struct ModelScraper {
    provider: &'static Provider,
    client: FetchClient,
}

impl ModelScraper {
    /// Creates a scraper for `provider` with default fetch options.
    pub fn new(provider: &'static Provider, cache: ResponseCache) -> Self {
        Self {
            provider,
            client: FetchClient::new(cache, FetchOptions::default()),
        }
    }

    /// Creates a scraper with a custom fetch client
    ///
    /// Used by tests to script network behavior offline.
    #[allow(dead_code)]
    pub fn with_client(provider: &'static Provider, client: FetchClient) -> Self {
        Self { provider, client }
    }

    /// Fetches the provider's model listing and extracts raw records.
    ///
    /// Tries the table scan first and falls back to the heading scan when the
    /// page has no usable tables. Returns the empty list when the page can't
    /// be fetched.
    pub async fn fetch_models(&self) -> Vec<RawRecord> {
        let description = format!("{} models", self.provider.name);
        let Some(document) = self
            .client
            .fetch(self.provider.models_url, &description)
            .await
        else {
            return Vec::new();
        };

        let records = extract::extract_model_records(&document, &self.provider.ids);
        if !records.is_empty() {
            return records;
        }
        extract::extract_from_headings(&document, &self.provider.ids)
    }

    /// Fetches the provider's pricing page and extracts the pricing map.
    ///
    /// Returns the empty map when the page can't be fetched.
    pub async fn fetch_pricing(&self) -> PricingMap {
        let description = format!("{} pricing", self.provider.name);
        let Some(document) = self
            .client
            .fetch(self.provider.pricing_url, &description)
            .await
        else {
            return PricingMap::new();
        };
        extract::extract_pricing(&document, &self.provider.ids)
    }

    /// One full catalog pass: models joined with pricing, deduplicated and
    /// sorted by display name.
    pub async fn update(&self) -> Vec<ModelEntry> {
        let records = self.fetch_models().await;
        let pricing = self.fetch_pricing().await;
        let entries = merge_catalog(&records, &pricing, &self.provider.ids);
        info!(
            provider = self.provider.id,
            models = entries.len(),
            "catalog update complete"
        );
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ok_response, status_response, ScriptedTransport};
    use crate::fetch::{Response, TransportError};
    use crate::providers::get_provider_by_id;
    use std::time::Duration;

    fn scripted_scraper(
        provider: &'static Provider,
        script: Vec<Result<Response, TransportError>>,
    ) -> ModelScraper {
        let options = FetchOptions {
            timeout: Duration::from_secs(1),
            max_retries: 3,
            retry_delay: Duration::ZERO,
        };
        let client = FetchClient::with_transport(
            Box::new(ScriptedTransport::new(script)),
            ResponseCache::disabled(),
            options,
        );
        ModelScraper::with_client(provider, client)
    }

    fn anthropic() -> &'static Provider {
        get_provider_by_id("anthropic").expect("anthropic is registered")
    }

    const MODELS_PAGE: &str = "<html><body><table>\
        <tr><th>Model</th><th>API Name</th><th>Context</th></tr>\
        <tr><td>Claude Opus 4</td><td>claude-opus-4-20250514</td><td>200K</td></tr>\
        <tr><td>Claude Sonnet 4</td><td>claude-sonnet-4-20250514</td><td>200K</td></tr>\
        </table></body></html>";

    const PRICING_PAGE: &str = "<html><body><table>\
        <tr><th>Model</th><th>Input</th><th>Output</th></tr>\
        <tr><td>Claude Opus 4</td><td>$15</td><td>$75</td></tr>\
        </table></body></html>";

    #[tokio::test]
    async fn test_fetch_models_from_table_page() {
        let scraper = scripted_scraper(anthropic(), vec![Ok(ok_response(MODELS_PAGE))]);
        let records = scraper.fetch_models().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "claude-opus-4-20250514");
    }

    #[tokio::test]
    async fn test_fetch_models_falls_back_to_headings() {
        let page = "<html><body>\
            <h2>Claude Opus 4</h2><p><code>claude-opus-4-20250514</code></p>\
            </body></html>";
        let scraper = scripted_scraper(anthropic(), vec![Ok(ok_response(page))]);
        let records = scraper.fetch_models().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Claude Opus 4");
    }

    #[tokio::test]
    async fn test_fetch_models_unreachable_page_yields_empty_list() {
        let scraper = scripted_scraper(anthropic(), vec![Ok(status_response(503))]);
        assert!(scraper.fetch_models().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_pricing_end_to_end() {
        let scraper = scripted_scraper(anthropic(), vec![Ok(ok_response(PRICING_PAGE))]);
        let pricing = scraper.fetch_pricing().await;
        assert_eq!(pricing.len(), 1);
        let opus = pricing.get("claude-opus-4").expect("Derived from name");
        assert_eq!(opus.input_price, Some(15.0));
        assert_eq!(opus.output_price, Some(75.0));
    }

    #[tokio::test]
    async fn test_update_joins_models_with_pricing() {
        // Models page uses dated API ids while the pricing page only shows
        // display names; the join happens on whatever identifier each side
        // normalizes to, so only exact matches carry pricing.
        let models_page = "<html><body><table>\
            <tr><th>Model</th><th>API Name</th></tr>\
            <tr><td>Opus four</td><td>claude-opus-4</td></tr>\
            <tr><td>Sonnet four</td><td>claude-sonnet-4</td></tr>\
            </table></body></html>";
        let scraper = scripted_scraper(
            anthropic(),
            vec![Ok(ok_response(models_page)), Ok(ok_response(PRICING_PAGE))],
        );

        let entries = scraper.update().await;
        assert_eq!(entries.len(), 2);

        // Sorted by display name: "Opus four" before "Sonnet four".
        assert_eq!(entries[0].identifier, "claude-opus-4");
        assert_eq!(entries[0].pricing.input_price, Some(15.0));
        assert!(entries[1].pricing.is_empty());
    }

    #[tokio::test]
    async fn test_update_survives_total_network_failure() {
        let errors = (0..8)
            .map(|_| Err(TransportError::Timeout("timed out".to_string())))
            .collect();
        let scraper = scripted_scraper(anthropic(), errors);
        let entries = scraper.update().await;
        assert!(entries.is_empty(), "Failure must yield an empty catalog");
    }
}
