//! Translation gateway.
//!
//! Wraps the external translation provider and owns everything
//! deterministic about translation: the pass-through predicate, result
//! cleaning, echo collapsing, tenant term overrides, and the inter-call
//! throttle. The provider itself is a narrow trait so engine tests run
//! with a canned fake.

mod openai;
mod overrides;
pub mod rules;

pub use openai::OpenAiTranslator;
pub use overrides::TermOverrides;

use std::time::Duration;

use catalog_core::LocalePair;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::TranslationConfig;
use crate::error::TranslationError;

/// The raw external translation call: text + locale pair -> translated text.
pub trait TranslationProvider {
    /// Translate `text` from `pair.source` into `pair.target`.
    ///
    /// Implementations return the provider's answer as-is; all cleaning
    /// happens in the gateway.
    async fn translate_raw(
        &self,
        text: &str,
        pair: LocalePair,
    ) -> Result<String, TranslationError>;
}

/// Gateway applying the deterministic translation rules around a provider.
pub struct TranslationGateway<P> {
    provider: P,
    overrides: TermOverrides,
    throttle: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl<P: TranslationProvider> TranslationGateway<P> {
    #[must_use]
    pub fn new(provider: P, config: &TranslationConfig) -> Self {
        Self::with_overrides(provider, config.throttle, TermOverrides::default())
    }

    /// Build with an explicit override table (the table encodes
    /// tenant-specific terminology corrections, so it is injectable).
    #[must_use]
    pub fn with_overrides(provider: P, throttle: Duration, overrides: TermOverrides) -> Self {
        Self {
            provider,
            overrides,
            throttle,
            last_call: Mutex::new(None),
        }
    }

    /// Translate free text (product titles, descriptions, value texts).
    ///
    /// Untranslatable strings (numbers, unit-suffixed values, anything with
    /// a Latin letter) and overridden terms return without a network call.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] if the provider fails or the cleaned
    /// result is empty.
    pub async fn translate(&self, text: &str, pair: LocalePair) -> Result<String, TranslationError> {
        if !rules::is_translatable(text) {
            debug!(text, "pass-through, not translatable");
            return Ok(text.to_string());
        }
        if let Some(fixed) = self.overrides.fixed_term(text, pair) {
            debug!(text, fixed, "pass-through, overridden term");
            return Ok(fixed.to_string());
        }

        let raw = self.call_provider(text, pair).await?;
        let cleaned = rules::collapse_arrow_echo(&rules::clean_string(&raw));
        self.finish(text, cleaned, pair)
    }

    /// Translate a key-like term (parameter type names), with the stricter
    /// key cleanup applied to the result.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] if the provider fails or the cleaned
    /// result is empty.
    pub async fn translate_name(
        &self,
        name: &str,
        pair: LocalePair,
    ) -> Result<String, TranslationError> {
        if let Some(fixed) = self.overrides.fixed_term(name, pair) {
            return Ok(fixed.to_string());
        }
        if !rules::is_translatable(name) {
            return Ok(name.to_string());
        }

        let raw = self.call_provider(name, pair).await?;
        let cleaned = rules::clean_key(&rules::collapse_arrow_echo(&rules::clean_string(&raw)));
        self.finish(name, cleaned, pair)
    }

    fn finish(
        &self,
        source: &str,
        cleaned: String,
        pair: LocalePair,
    ) -> Result<String, TranslationError> {
        let corrected = self.overrides.correct(&cleaned, pair);
        if corrected.is_empty() {
            return Err(TranslationError::Empty {
                original: source.to_string(),
            });
        }
        Ok(corrected)
    }

    /// Throttled provider call. The delay respects the provider's rate
    /// limits and must stay between consecutive calls, not around them.
    async fn call_provider(&self, text: &str, pair: LocalePair) -> Result<String, TranslationError> {
        if !self.throttle.is_zero() {
            let mut last = self.last_call.lock().await;
            if let Some(at) = *last {
                let elapsed = at.elapsed();
                if elapsed < self.throttle {
                    tokio::time::sleep(self.throttle - elapsed).await;
                }
            }
            *last = Some(Instant::now());
        }
        self.provider.translate_raw(text, pair).await
    }
}
