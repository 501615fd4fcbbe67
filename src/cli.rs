//! Command-line interface parsing for modelscout
//!
//! This module handles parsing of CLI arguments using clap, including
//! provider selection, the output directory for catalog files, and the
//! --no-cache flag that forces live fetching.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::providers::{all_providers, get_provider_by_id, Provider};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified provider id is not registered
    #[error("unknown provider: '{0}'. Valid providers: {1}")]
    UnknownProvider(String, String),
}

/// Modelscout - collect model and pricing catalogs from AI provider websites
#[derive(Parser, Debug)]
#[command(name = "modelscout")]
#[command(about = "Collects model and pricing metadata from AI provider websites")]
#[command(version)]
pub struct Cli {
    /// Provider to update; may be repeated. Defaults to all providers.
    ///
    /// Examples:
    ///   modelscout                          # update every provider
    ///   modelscout --provider anthropic     # update one provider
    #[arg(long = "provider", value_name = "ID")]
    pub providers: Vec<String>,

    /// Directory to write per-provider catalog files into
    #[arg(long, value_name = "DIR", default_value = "catalog")]
    pub output: PathBuf,

    /// Skip the on-disk response cache and always fetch live
    #[arg(long)]
    pub no_cache: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Providers to update, in registry order when none were named
    pub providers: Vec<&'static Provider>,
    /// Directory for catalog files
    pub output: PathBuf,
    /// Whether the response cache is used
    pub use_cache: bool,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with resolved providers
    /// * `Err(CliError)` if an unknown provider id was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let providers = if cli.providers.is_empty() {
            all_providers().iter().collect()
        } else {
            cli.providers
                .iter()
                .map(|id| {
                    get_provider_by_id(id)
                        .ok_or_else(|| CliError::UnknownProvider(id.clone(), valid_ids()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            providers,
            output: cli.output.clone(),
            use_cache: !cli.no_cache,
        })
    }
}

/// Comma-separated list of registered provider ids, for error messages.
fn valid_ids() -> String {
    all_providers()
        .iter()
        .map(|provider| provider.id)
        .collect::<Vec<_>>()
        .join(", ")
}
