//! Parameter value reconciliation. Natural key: (value text, owning type).
//!
//! The `code` is derived once from the source-locale value plus the owning
//! type id and reused unchanged on the peer. A value's localization can
//! only be created after its type has a target-locale peer; a missing type
//! peer is a [`SyncError::MissingDependency`] skip, never an orphan.

use catalog_core::{EntityId, EntityKind, ParameterValue, text};
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
    /// Resolve a parameter value by (owning type, value text) in the source
    /// locale, creating it and its target-locale peer if missing. Returns
    /// the source-locale id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingDependency`] when the owning type has no
    /// target-locale peer yet; remote and translation failures otherwise.
    #[instrument(skip(self), fields(%parameter_type, pair = %self.pair()))]
    pub async fn find_or_create_parameter_value(
        &self,
        parameter_type: &EntityId,
        value: &str,
    ) -> Result<EntityId, SyncError> {
        let cache_key = CacheKey::natural(
            EntityKind::ParameterValue,
            format!("{parameter_type}:{value}"),
            self.pair().source,
        );
        if let Some(hit) = self.cache().get(&cache_key).await {
            return Ok(hit);
        }

        let existing = self
            .client()
            .parameter_value_by_value(value, parameter_type, self.pair().source)
            .await?;

        let id = if let Some(parameter_value) = existing {
            if parameter_value.localization(self.pair().target).is_none() {
                self.create_value_peer(
                    &parameter_value.id,
                    value,
                    &parameter_value.code,
                    parameter_type,
                )
                .await?;
            }
            parameter_value.id
        } else {
            let code = text::derive_code(value, parameter_type);
            let created = self
                .client()
                .create_parameter_value(value, &code, parameter_type, self.pair().source)
                .await?;
            info!(value, id = %created.id, "created parameter value");
            self.create_value_peer(&created.id, value, &created.code, parameter_type)
                .await?;
            created.id
        };

        self.cache().insert(cache_key, id.clone()).await;
        Ok(id)
    }

    /// Give a listed source-locale parameter value a target-locale peer.
    ///
    /// A value without an owning type reference, or whose type has no
    /// target-locale peer yet, is a [`SyncError::MissingDependency`] skip.
    ///
    /// # Errors
    ///
    /// Remote and translation failures, plus the dependency skip above.
    #[instrument(skip(self, parameter_value), fields(value = %parameter_value.value, pair = %self.pair()))]
    pub async fn reconcile_parameter_value(
        &self,
        parameter_value: &ParameterValue,
    ) -> Result<Outcome, SyncError> {
        if parameter_value.localization(self.pair().target).is_some() {
            return Ok(Outcome::AlreadyExists);
        }
        let Some(owning_type) = &parameter_value.parameter_type else {
            return Err(SyncError::MissingDependency {
                kind: EntityKind::ParameterValue,
                key: parameter_value.value.clone(),
                dependency: EntityKind::ParameterType,
                pair: self.pair(),
            });
        };
        self.create_value_peer(
            &parameter_value.id,
            &parameter_value.value,
            &parameter_value.code,
            &owning_type.id,
        )
        .await
    }

    /// Create the target-locale peer of a parameter value, wiring it to the
    /// owning type's own peer.
    async fn create_value_peer(
        &self,
        id: &EntityId,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
    ) -> Result<Outcome, SyncError> {
        // Dependency ordering: the type's peer must exist first. This is
        // checked before any write so a failure leaves nothing behind.
        let owning_type = self
            .client()
            .parameter_type_by_id(parameter_type, self.pair().source)
            .await?;
        let localized_type = owning_type
            .as_ref()
            .and_then(|t| t.localization(self.pair().target))
            .ok_or_else(|| SyncError::MissingDependency {
                kind: EntityKind::ParameterValue,
                key: value.to_string(),
                dependency: EntityKind::ParameterType,
                pair: self.pair(),
            })?
            .clone();

        let translated = self.translator().translate(value, self.pair()).await?;

        let outcome = self
            .client()
            .create_parameter_value_localization(
                id,
                self.pair().target,
                &translated,
                code,
                &localized_type,
            )
            .await?;

        match outcome {
            LinkOutcome::Created(peer_id) => {
                info!(value, translated, %peer_id, "created parameter value localization");
                Ok(Outcome::Created)
            }
            LinkOutcome::AlreadyExists(_) => Ok(Outcome::AlreadyExists),
        }
    }
}
