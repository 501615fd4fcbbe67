//! Modelscout - collect model and pricing catalogs from AI provider websites
//!
//! Fetches each selected provider's public model and pricing pages through a
//! TTL disk cache, extracts structured records, and writes one JSON Lines
//! catalog file per provider. A failed scrape never aborts the run; the
//! remaining providers are still updated.

mod cache;
mod catalog;
mod cli;
mod extract;
mod fetch;
mod normalize;
mod providers;

use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::ResponseCache;
use cli::{Cli, RunConfig};
use providers::ModelScraper;

/// Initializes the tracing subscriber. RUST_LOG overrides the default
/// level; --verbose bumps it to debug.
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        "modelscout=debug"
    } else {
        "modelscout=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// XDG-compliant cache directory for fetched responses, or `None` when the
/// platform has no usable home directory.
fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "modelscout").map(|dirs| dirs.cache_dir().to_path_buf())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let config = match RunConfig::from_cli(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let cache_dir = if config.use_cache {
        default_cache_dir()
    } else {
        None
    };

    // One provider at a time: a fetch completes or exhausts its retries
    // before the next provider starts.
    for &provider in &config.providers {
        let cache = ResponseCache::new(cache_dir.clone());
        let scraper = ModelScraper::new(provider, cache);
        let entries = scraper.update().await;

        if entries.is_empty() {
            warn!(
                provider = provider.id,
                "no catalog entries extracted, skipping file"
            );
            continue;
        }

        let path = config.output.join(format!("{}.jsonl", provider.id));
        catalog::write_catalog(&path, &entries)?;
        info!(
            provider = provider.id,
            path = %path.display(),
            entries = entries.len(),
            "catalog written"
        );
    }

    Ok(())
}
