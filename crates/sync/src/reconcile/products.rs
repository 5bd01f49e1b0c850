//! Product localization. Natural key: the part number.
//!
//! A product's peer creation must never be blocked by its periphery:
//! relations whose localized counterpart cannot be resolved are dropped
//! from the payload with a warning. Media archive failures skip the
//! product for this run only.

use catalog_core::{EntityId, EntityKind, Product, text};
use tracing::{info, instrument, warn};

use super::{Outcome, ReconcileEngine};
use crate::client::{CatalogClient, LinkOutcome, ProductLocalizationInput};
use crate::error::SyncError;
use crate::media::MediaUploader;
use crate::translate::TranslationProvider;

impl<C, P, M> ReconcileEngine<C, P, M>
where
    C: CatalogClient,
    P: TranslationProvider,
    M: MediaUploader,
{
    /// Fetch a product by part number and ensure its target-locale peer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on remote or translation failure.
    #[instrument(skip(self), fields(pair = %self.pair()))]
    pub async fn find_or_localize_product(
        &self,
        part_number: &str,
    ) -> Result<Outcome, SyncError> {
        let Some(product) = self
            .client()
            .product_by_part_number(part_number, self.pair().source)
            .await?
        else {
            return Ok(Outcome::Skipped(format!(
                "no product with part number {part_number:?} in {}",
                self.pair().source
            )));
        };
        self.localize_product(&product).await
    }

    /// Ensure a listed product has its target-locale peer, translating the
    /// human-readable fields and rewiring relations to their own peers.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on remote or translation failure.
    #[instrument(skip(self, product), fields(part_number = %product.part_number, pair = %self.pair()))]
    pub async fn localize_product(&self, product: &Product) -> Result<Outcome, SyncError> {
        if product.localization(self.pair().target).is_some() {
            return Ok(Outcome::AlreadyExists);
        }

        let title = self
            .translator()
            .translate(&product.title, self.pair())
            .await?;
        let description = match &product.description {
            Some(text) if !text.trim().is_empty() => {
                Some(self.translator().translate(text, self.pair()).await?)
            }
            _ => None,
        };

        let additional_images = match self.gather_media(product).await {
            Ok(links) => links,
            Err(reason) => return Ok(Outcome::Skipped(reason)),
        };

        let subcategory = match &product.subcategory {
            Some(id) => {
                let peer = self.resolve_peer(EntityKind::Subcategory, id).await?;
                if peer.is_none() {
                    warn!(
                        part_number = %product.part_number,
                        subcategory = %id,
                        "dropping subcategory without localization"
                    );
                }
                peer
            }
            None => None,
        };

        let mut product_types = Vec::with_capacity(product.product_types.len());
        for type_id in &product.product_types {
            match self.resolve_peer(EntityKind::ProductType, type_id).await? {
                Some(peer) => product_types.push(peer),
                None => warn!(
                    part_number = %product.part_number,
                    product_type = %type_id,
                    "dropping product type without localization"
                ),
            }
        }

        let fields = ProductLocalizationInput {
            part_number: product.part_number.clone(),
            title: title.clone(),
            description,
            retail: product.retail,
            currency: product.currency.clone(),
            slug: text::derive_localized_slug(&title, self.pair().target),
            image_link: product.image_link.clone(),
            additional_images,
            subcategory,
            product_types,
        };

        let outcome = self
            .client()
            .create_product_localization(&product.id, self.pair().target, &fields)
            .await?;

        match outcome {
            LinkOutcome::Created(peer_id) => {
                info!(part_number = %product.part_number, %peer_id, "created product localization");
                self.remember_product_peer(&product.id, peer_id).await;
                Ok(Outcome::Created)
            }
            LinkOutcome::AlreadyExists(existing) => {
                if let Some(peer_id) = existing {
                    self.remember_product_peer(&product.id, peer_id).await;
                }
                Ok(Outcome::AlreadyExists)
            }
        }
    }

    /// The localized peer's gallery: the source links, or a freshly
    /// materialized archive when ingestion left one pending.
    async fn gather_media(&self, product: &Product) -> Result<Vec<String>, String> {
        let Some(archive_url) = &product.media_archive else {
            return Ok(product.additional_images.clone());
        };

        let Some(uploader) = &self.media else {
            warn!(
                part_number = %product.part_number,
                "media archive pending but no uploader configured; keeping source links"
            );
            return Ok(product.additional_images.clone());
        };

        match uploader
            .upload_archive(archive_url, &product.title, &self.media_folder)
            .await
        {
            Ok(records) => Ok(records.into_iter().map(|r| r.link).collect()),
            Err(error) => {
                warn!(
                    part_number = %product.part_number,
                    %error,
                    "media archive unavailable, skipping product this run"
                );
                Err(format!("media archive unavailable: {error}"))
            }
        }
    }

    async fn remember_product_peer(&self, source_id: &EntityId, peer_id: EntityId) {
        self.cache()
            .insert(
                crate::cache::CacheKey::peer(
                    EntityKind::Product,
                    source_id.clone(),
                    self.pair().target,
                ),
                peer_id,
            )
            .await;
    }
}
