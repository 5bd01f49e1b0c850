//! The reconciliation engine: find-or-create-with-localization.
//!
//! All four entity kinds follow the same shape: check the per-run cache,
//! re-check existence remotely, create whatever peer is missing (translating
//! the human-readable fields on demand), memoize the resolution. Creation is
//! strictly additive - the engine never deletes and never rewrites a
//! source-locale record's fields.
//!
//! Per-kind algorithms live in their own impl files, the way the remote
//! operations are grouped:
//!
//! - [`parameter_types`](self) - natural key is the name text
//! - [`parameter_values`](self) - natural key is (value, owning type);
//!   depends on the type's peer existing first
//! - [`products`](self) - natural key is the part number; peripheral
//!   relations are dropped when unresolvable, never blocking
//! - [`product_parameters`](self) - idempotent join linking

mod parameter_types;
mod parameter_values;
mod product_parameters;
mod products;

use catalog_core::{EntityId, EntityKind, LocalePair};

use crate::cache::{CacheKey, LocalizationCache};
use crate::client::CatalogClient;
use crate::error::RemoteError;
use crate::media::{MediaUploader, NoMedia};
use crate::translate::{TranslationGateway, TranslationProvider};

/// What reconciling one entity did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A localization peer (or join record) was created.
    Created,
    /// The peer was already in place; nothing was written.
    AlreadyExists,
    /// The entity was left alone for a stated reason (no peer to link to,
    /// media unavailable, nothing to do).
    Skipped(String),
}

/// Cross-locale reconciliation engine for one locale pair.
///
/// Generic over the remote client, the translation provider and the media
/// uploader so tests can drive it entirely in memory. The cache is scoped to
/// a run: freshly built by [`ReconcileEngine::new`], or handed in through
/// [`ReconcileEngine::with_cache`] to share resolutions across passes.
pub struct ReconcileEngine<C, P, M = NoMedia> {
    client: C,
    translator: TranslationGateway<P>,
    cache: LocalizationCache,
    pair: LocalePair,
    media: Option<M>,
    media_folder: String,
}

impl<C, P> ReconcileEngine<C, P, NoMedia>
where
    C: CatalogClient,
    P: TranslationProvider,
{
    /// Engine without a media uploader; products with unexpanded media
    /// archives are skipped with a warning.
    #[must_use]
    pub fn new(client: C, translator: TranslationGateway<P>, pair: LocalePair) -> Self {
        Self::with_cache(client, translator, pair, LocalizationCache::new())
    }

    /// Engine sharing an externally owned cache, so a caller chaining
    /// several passes can carry resolutions across them.
    #[must_use]
    pub fn with_cache(
        client: C,
        translator: TranslationGateway<P>,
        pair: LocalePair,
        cache: LocalizationCache,
    ) -> Self {
        Self {
            client,
            translator,
            cache,
            pair,
            media: None,
            media_folder: String::new(),
        }
    }
}

impl<C, P, M> ReconcileEngine<C, P, M>
where
    C: CatalogClient,
    P: TranslationProvider,
    M: MediaUploader,
{
    /// Engine with a media uploader attached.
    #[must_use]
    pub fn with_media(
        client: C,
        translator: TranslationGateway<P>,
        pair: LocalePair,
        media: M,
        media_folder: impl Into<String>,
    ) -> Self {
        Self {
            client,
            translator,
            cache: LocalizationCache::new(),
            pair,
            media: Some(media),
            media_folder: media_folder.into(),
        }
    }

    /// The locale pair this engine reconciles.
    #[must_use]
    pub const fn pair(&self) -> LocalePair {
        self.pair
    }

    /// The remote client (the batch driver paginates through it).
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The per-run cache (exposed for inspection in tests and run stats).
    #[must_use]
    pub const fn cache(&self) -> &LocalizationCache {
        &self.cache
    }

    /// Resolve the target-locale peer id of a referenced entity, memoizing
    /// positive answers. Negative answers are never cached: the next pass
    /// may have created the peer in the meantime.
    pub(crate) async fn resolve_peer(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<EntityId>, RemoteError> {
        let key = CacheKey::peer(kind, id.clone(), self.pair.target);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(Some(hit));
        }

        let peer = self.client.localization_of(kind, id, self.pair.target).await?;
        if let Some(peer_id) = &peer {
            self.cache.insert(key, peer_id.clone()).await;
        }
        Ok(peer)
    }

    pub(crate) const fn translator(&self) -> &TranslationGateway<P> {
        &self.translator
    }
}
