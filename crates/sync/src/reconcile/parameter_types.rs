//! Parameter type reconciliation. Natural key: the name text.
//!
//! The slug is derived once from the source-locale name and reused verbatim
//! on the localized peer - translating it would fork the type's identity.

use catalog_core::{EntityId, EntityKind, ParameterType, text};
use tracing::{info, instrument};

use super::{Outcome, ReconcileEngine};
use crate::cache::CacheKey;
use crate::client::{CatalogClient, LinkOutcome};
use crate::error::SyncError;
use crate::media::MediaUploader;
use crate::translate::TranslationProvider;

impl<C, P, M> ReconcileEngine<C, P, M>
where
    C: CatalogClient,
    P: TranslationProvider,
    M: MediaUploader,
{
    /// Resolve a parameter type by name in the source locale, creating it
    /// (and its target-locale peer) if anything is missing. Returns the
    /// source-locale id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on remote or translation failure; the caller
    /// counts it and moves on.
    #[instrument(skip(self), fields(pair = %self.pair()))]
    pub async fn find_or_create_parameter_type(
        &self,
        name: &str,
    ) -> Result<EntityId, SyncError> {
        let cache_key = CacheKey::natural(EntityKind::ParameterType, name, self.pair().source);
        if let Some(hit) = self.cache().get(&cache_key).await {
            return Ok(hit);
        }

        // The cache is never trusted for existence: a miss always re-checks
        // the backend before creating anything.
        let existing = self
            .client()
            .parameter_type_by_name(name, self.pair().source)
            .await?;

        let id = if let Some(parameter_type) = existing {
            self.ensure_parameter_type_peer(&parameter_type).await?;
            parameter_type.id
        } else {
            let slug = text::derive_slug(name);
            let created = self
                .client()
                .create_parameter_type(name, &slug, self.pair().source)
                .await?;
            info!(name, id = %created.id, "created parameter type");
            self.ensure_parameter_type_peer(&created).await?;
            created.id
        };

        self.cache().insert(cache_key, id.clone()).await;
        Ok(id)
    }

    /// Ensure a listed parameter type has its target-locale peer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on remote or translation failure.
    #[instrument(skip(self, parameter_type), fields(name = %parameter_type.name, pair = %self.pair()))]
    pub async fn reconcile_parameter_type(
        &self,
        parameter_type: &ParameterType,
    ) -> Result<Outcome, SyncError> {
        self.ensure_parameter_type_peer(parameter_type).await
    }

    async fn ensure_parameter_type_peer(
        &self,
        parameter_type: &ParameterType,
    ) -> Result<Outcome, SyncError> {
        if parameter_type.localization(self.pair().target).is_some() {
            return Ok(Outcome::AlreadyExists);
        }

        let translated = self
            .translator()
            .translate_name(&parameter_type.name, self.pair())
            .await?;

        let outcome = self
            .client()
            .create_parameter_type_localization(
                &parameter_type.id,
                self.pair().target,
                &translated,
                &parameter_type.slug,
            )
            .await?;

        match outcome {
            LinkOutcome::Created(peer_id) => {
                info!(
                    name = %parameter_type.name,
                    translated,
                    %peer_id,
                    "created parameter type localization"
                );
                Ok(Outcome::Created)
            }
            // The backend saw a peer we did not; someone else created it.
            LinkOutcome::AlreadyExists(_) => Ok(Outcome::AlreadyExists),
        }
    }
}
