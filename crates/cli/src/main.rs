//! Catalog localization CLI - cross-locale catalog sync runs.
//!
//! # Usage
//!
//! ```bash
//! # Localize parameter types (run first: values depend on type peers)
//! catalog-localize sync parameter-types
//!
//! # Localize parameter values
//! catalog-localize sync parameter-values
//!
//! # Localize products
//! catalog-localize sync products
//!
//! # Mirror product/parameter-value links onto localized products
//! catalog-localize sync product-parameters
//!
//! # All four passes in dependency order
//! catalog-localize sync all
//!
//! # Override the configured locale pair for one run
//! catalog-localize sync products --source-locale uk --target-locale en
//! ```
//!
//! Configuration comes from the environment (see `SyncConfig`); flags
//! override it per run. A run that completes with per-item failures still
//! exits 0 - the counters and error listing are the report, and re-running
//! is always safe.

#![cfg_attr(not(test), forbid(unsafe_code))]

use catalog_core::{Locale, LocalePair};
use catalog_sync::config::SyncConfig;
use clap::{Parser, Subcommand};
use std::time::Duration;

mod commands;

use commands::sync::Target;

#[derive(Parser)]
#[command(name = "catalog-localize")]
#[command(author, version, about = "Cross-locale catalog localization tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a localization sync pass
    Sync {
        #[command(subcommand)]
        target: SyncTarget,

        /// Locale to read from (overrides SOURCE_LOCALE)
        #[arg(long, global = true)]
        source_locale: Option<Locale>,

        /// Locale to create peers in (overrides TARGET_LOCALE)
        #[arg(long, global = true)]
        target_locale: Option<Locale>,

        /// Listing page size (overrides PAGE_SIZE)
        #[arg(long, global = true)]
        page_size: Option<u32>,

        /// Delay between translation calls in milliseconds
        /// (overrides TRANSLATION_THROTTLE_MS)
        #[arg(long, global = true)]
        throttle_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
enum SyncTarget {
    /// Localize parameter types
    ParameterTypes,
    /// Localize parameter values
    ParameterValues,
    /// Localize products
    Products,
    /// Mirror product/parameter-value links
    ProductParameters,
    /// All passes in dependency order
    All,
}

impl From<&SyncTarget> for Target {
    fn from(target: &SyncTarget) -> Self {
        match target {
            SyncTarget::ParameterTypes => Self::ParameterTypes,
            SyncTarget::ParameterValues => Self::ParameterValues,
            SyncTarget::Products => Self::Products,
            SyncTarget::ProductParameters => Self::ProductParameters,
            SyncTarget::All => Self::All,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Sync {
            target,
            source_locale,
            target_locale,
            page_size,
            throttle_ms,
        } => {
            let mut config = SyncConfig::from_env()?;
            apply_overrides(
                &mut config,
                source_locale,
                target_locale,
                page_size,
                throttle_ms,
            )?;
            commands::sync::run((&target).into(), &config).await?;
        }
    }
    Ok(())
}

fn apply_overrides(
    config: &mut SyncConfig,
    source_locale: Option<Locale>,
    target_locale: Option<Locale>,
    page_size: Option<u32>,
    throttle_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if source_locale.is_some() || target_locale.is_some() {
        let source = source_locale.unwrap_or(config.locales.source);
        let target = target_locale.unwrap_or(config.locales.target);
        config.locales = LocalePair::new(source, target)?;
    }
    if let Some(page_size) = page_size {
        config.page_size = page_size;
    }
    if let Some(throttle_ms) = throttle_ms {
        config.translation.throttle = Duration::from_millis(throttle_ms);
    }
    Ok(())
}
