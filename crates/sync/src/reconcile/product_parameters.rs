//! Product/parameter-value join linking in the target locale.
//!
//! Linking is idempotent twice over: pairs the localized product already
//! carries are recognized before the write, and a backend duplicate-conflict
//! answer on the write itself is treated as "already exists", not an error.

use catalog_core::{EntityKind, Product};
use tracing::{debug, instrument, warn};

use super::ReconcileEngine;
use crate::batch::{ItemError, RunResult};
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
    /// Mirror a product's parameter links onto its target-locale peer.
    ///
    /// Each source join is resolved to (localized product, localized value)
    /// and linked; unresolved peers are skips, link failures are counted
    /// per link and never abort the product.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] only when the target peer's existing links
    /// cannot be read at all.
    #[instrument(skip(self, product), fields(part_number = %product.part_number, pair = %self.pair()))]
    pub async fn link_product_parameters(
        &self,
        product: &Product,
    ) -> Result<RunResult, SyncError> {
        let mut result = RunResult::new();

        let Some(localized_product) = product.localization(self.pair().target).cloned() else {
            debug!(part_number = %product.part_number, "no localized product, skipping");
            result.skipped += 1;
            return Ok(result);
        };

        if product.parameters.is_empty() {
            debug!(part_number = %product.part_number, "no parameter values, skipping");
            result.skipped += 1;
            return Ok(result);
        }

        // One read up front; linked pairs are then recognized locally.
        let existing: Vec<_> = self
            .client()
            .product_parameters(&localized_product, self.pair().target)
            .await?
            .into_iter()
            .map(|join| join.parameter_value)
            .collect();

        for join in &product.parameters {
            let localized_value = match self
                .resolve_peer(EntityKind::ParameterValue, &join.parameter_value)
                .await
            {
                Ok(Some(id)) => id,
                Ok(None) => {
                    debug!(
                        parameter_value = %join.parameter_value,
                        "no localized parameter value, skipping link"
                    );
                    result.skipped += 1;
                    continue;
                }
                Err(error) => {
                    result.failed += 1;
                    result.errors.push(ItemError {
                        kind: EntityKind::ProductParameter,
                        key: format!("{}:{}", product.part_number, join.parameter_value),
                        pair: self.pair(),
                        message: error.to_string(),
                    });
                    continue;
                }
            };

            if existing.contains(&localized_value) {
                result.already_exists += 1;
                continue;
            }

            match self
                .client()
                .create_product_parameter(&localized_product, &localized_value, self.pair().target)
                .await
            {
                Ok(LinkOutcome::Created(_)) => result.succeeded += 1,
                Ok(LinkOutcome::AlreadyExists(_)) => result.already_exists += 1,
                Err(error) => {
                    warn!(
                        part_number = %product.part_number,
                        parameter_value = %localized_value,
                        %error,
                        "failed to link parameter value"
                    );
                    result.failed += 1;
                    result.errors.push(ItemError {
                        kind: EntityKind::ProductParameter,
                        key: format!("{}:{}", product.part_number, localized_value),
                        pair: self.pair(),
                        message: error.to_string(),
                    });
                }
            }
        }

        Ok(result)
    }
}
