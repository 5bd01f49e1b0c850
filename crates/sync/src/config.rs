//! Sync configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CMS_URL` - Base URL of the CMS (GraphQL endpoint is `<CMS_URL>/graphql`)
//! - `CMS_API_TOKEN` - CMS API token with write access to catalog content
//! - `OPENAI_API_KEY` - `OpenAI` API key for translations
//!
//! ## Optional
//! - `SOURCE_LOCALE` - Locale to read from (default: uk)
//! - `TARGET_LOCALE` - Locale to create peers in (default: ru)
//! - `PAGE_SIZE` - Listing page size (default: 100)
//! - `TRANSLATION_THROTTLE_MS` - Delay between translation calls (default: 500)
//! - `TRANSLATION_MODEL` - Chat model id (default: gpt-3.5-turbo)
//! - `MEDIA_UPLOAD_URL` - Storage endpoint for product media archives
//!   (media attachment is skipped when unset)

use std::time::Duration;

use catalog_core::{Locale, LocalePair};
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_THROTTLE_MS: u64 = 500;
const DEFAULT_TRANSLATION_MODEL: &str = "gpt-3.5-turbo";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CMS connection configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CmsConfig {
    /// Base URL, e.g. `https://cms.example.com`.
    pub url: String,
    /// API token with catalog write access.
    pub api_token: SecretString,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("url", &self.url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Translation provider configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct TranslationConfig {
    /// `OpenAI` API key.
    pub api_key: SecretString,
    /// Chat model id.
    pub model: String,
    /// Delay inserted between consecutive provider calls. A deliberate
    /// throttle for upstream rate limits, not a retry backoff.
    pub throttle: Duration,
}

impl std::fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("throttle", &self.throttle)
            .finish()
    }
}

/// Full sync tool configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// CMS connection.
    pub cms: CmsConfig,
    /// Translation provider.
    pub translation: TranslationConfig,
    /// Source/target locale pair for this run.
    pub locales: LocalePair,
    /// Listing page size.
    pub page_size: u32,
    /// Storage endpoint for media archives (media skipped when `None`).
    pub media_upload_url: Option<String>,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Ignore a missing .env file; variables may come from the shell.
        let _ = dotenvy::dotenv();

        let url = require_env("CMS_URL")?;
        let api_token = SecretString::from(require_env("CMS_API_TOKEN")?);
        let api_key = SecretString::from(require_env("OPENAI_API_KEY")?);

        let source = parse_env("SOURCE_LOCALE", Locale::Uk)?;
        let target = parse_env("TARGET_LOCALE", Locale::Ru)?;
        let locales = LocalePair::new(source, target).map_err(|e| {
            ConfigError::InvalidEnvVar("TARGET_LOCALE".to_string(), e.to_string())
        })?;

        let page_size = parse_env("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let throttle_ms = parse_env("TRANSLATION_THROTTLE_MS", DEFAULT_THROTTLE_MS)?;
        let model = optional_env("TRANSLATION_MODEL")
            .unwrap_or_else(|| DEFAULT_TRANSLATION_MODEL.to_string());

        Ok(Self {
            cms: CmsConfig { url, api_token },
            translation: TranslationConfig {
                api_key,
                model,
                throttle: Duration::from_millis(throttle_ms),
            },
            locales,
            page_size,
            media_upload_url: optional_env("MEDIA_UPLOAD_URL"),
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    optional_env(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(name).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
    })
}
