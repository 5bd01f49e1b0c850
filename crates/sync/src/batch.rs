//! Batch driver: pagination, per-item dispatch and run accounting.
//!
//! The driver walks a kind's source-locale listing page by page and applies
//! the engine to every item, sequentially - each item's multi-step workflow
//! finishes before the next starts, which is what keeps the cache and the
//! backend's locale-uniqueness constraint safe. Per-item failures become
//! counters; only pagination itself is allowed to abort a run.

use catalog_core::{EntityKind, LocalePair};
use tracing::{error, info, warn};

use crate::client::CatalogClient;
use crate::error::{RemoteError, SyncError};
use crate::media::MediaUploader;
use crate::reconcile::{Outcome, ReconcileEngine};
use crate::translate::TranslationProvider;

/// Context of one failed item, kept for manual retry triage.
#[derive(Debug, Clone)]
pub struct ItemError {
    pub kind: EntityKind,
    pub key: String,
    pub pair: LocalePair,
    pub message: String,
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:?} ({}): {}",
            self.kind, self.key, self.pair, self.message
        )
    }
}

/// Aggregate outcome of a batch run.
///
/// A run with failures still *completes*; the process edge decides what a
/// partial success means for the exit code.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub succeeded: u64,
    pub already_exists: u64,
    pub skipped: u64,
    pub failed: u64,
    pub errors: Vec<ItemError>,
}

impl RunResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another result (e.g. one product's link report) into this one.
    pub fn merge(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.already_exists += other.already_exists;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.errors.extend(other.errors);
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created => self.succeeded += 1,
            Outcome::AlreadyExists => self.already_exists += 1,
            Outcome::Skipped(reason) => {
                info!(%reason, "skipped");
                self.skipped += 1;
            }
        }
    }

    fn record_error(&mut self, kind: EntityKind, key: &str, pair: LocalePair, error: &SyncError) {
        if error.is_skip() {
            warn!(%kind, key, %error, "skipped");
            self.skipped += 1;
        } else {
            error!(%kind, key, %error, "failed");
            self.failed += 1;
            self.errors.push(ItemError {
                kind,
                key: key.to_string(),
                pair,
                message: error.to_string(),
            });
        }
    }

    /// Total number of item outcomes recorded.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.succeeded + self.already_exists + self.skipped + self.failed
    }

    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "created: {}, already existed: {}, skipped: {}, failed: {}",
            self.succeeded, self.already_exists, self.skipped, self.failed
        )
    }
}

/// Paginates source-locale listings and drives the engine over every item.
pub struct BatchDriver<C, P, M> {
    engine: ReconcileEngine<C, P, M>,
    page_size: u32,
    progress_every: u64,
}

const DEFAULT_PROGRESS_EVERY: u64 = 10;

impl<C, P, M> BatchDriver<C, P, M>
where
    C: CatalogClient,
    P: TranslationProvider,
    M: MediaUploader,
{
    #[must_use]
    pub const fn new(engine: ReconcileEngine<C, P, M>, page_size: u32) -> Self {
        Self {
            engine,
            page_size,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }

    /// The engine this driver runs (for post-run inspection).
    #[must_use]
    pub const fn engine(&self) -> &ReconcileEngine<C, P, M> {
        &self.engine
    }

    /// Ensure every source-locale parameter type has its target peer.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] only if pagination itself fails; per-item
    /// failures are counted in the result.
    pub async fn sync_parameter_types(&self) -> Result<RunResult, RemoteError> {
        let pair = self.engine.pair();
        info!(%pair, "syncing parameter types");
        let mut result = RunResult::new();
        let mut page = 1;

        loop {
            let listing = self
                .engine
                .client()
                .list_parameter_types(pair.source, page, self.page_size)
                .await?;
            info!(page, total = listing.total, "fetched parameter types page");

            for parameter_type in &listing.items {
                match self.engine.reconcile_parameter_type(parameter_type).await {
                    Ok(outcome) => result.record(&outcome),
                    Err(e) => result.record_error(
                        EntityKind::ParameterType,
                        &parameter_type.name,
                        pair,
                        &e,
                    ),
                }
                self.progress(&result);
            }

            if !listing.has_next() {
                break;
            }
            page += 1;
        }

        info!(%result, "parameter type sync complete");
        Ok(result)
    }

    /// Ensure every source-locale parameter value has its target peer.
    /// Values whose owning type has no peer yet are counted as skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] only if pagination itself fails; per-item
    /// failures are counted in the result.
    pub async fn sync_parameter_values(&self) -> Result<RunResult, RemoteError> {
        let pair = self.engine.pair();
        info!(%pair, "syncing parameter values");
        let mut result = RunResult::new();
        let mut page = 1;

        loop {
            let listing = self
                .engine
                .client()
                .list_parameter_values(pair.source, page, self.page_size)
                .await?;
            info!(page, total = listing.total, "fetched parameter values page");

            for parameter_value in &listing.items {
                match self.engine.reconcile_parameter_value(parameter_value).await {
                    Ok(outcome) => result.record(&outcome),
                    Err(e) => result.record_error(
                        EntityKind::ParameterValue,
                        &parameter_value.value,
                        pair,
                        &e,
                    ),
                }
                self.progress(&result);
            }

            if !listing.has_next() {
                break;
            }
            page += 1;
        }

        info!(%result, "parameter value sync complete");
        Ok(result)
    }

    /// Ensure every source-locale product has its target-locale peer.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] only if pagination itself fails.
    pub async fn sync_products(&self) -> Result<RunResult, RemoteError> {
        let pair = self.engine.pair();
        info!(%pair, "syncing products");
        let mut result = RunResult::new();
        let mut page = 1;

        loop {
            let listing = self
                .engine
                .client()
                .list_products(pair.source, page, self.page_size)
                .await?;
            info!(page, total = listing.total, "fetched products page");

            for product in &listing.items {
                match self.engine.localize_product(product).await {
                    Ok(outcome) => result.record(&outcome),
                    Err(e) => {
                        result.record_error(EntityKind::Product, &product.part_number, pair, &e);
                    }
                }
                self.progress(&result);
            }

            if !listing.has_next() {
                break;
            }
            page += 1;
        }

        info!(%result, "product sync complete");
        Ok(result)
    }

    /// Mirror every product's parameter links onto its localized peer.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] only if pagination itself fails.
    pub async fn sync_product_parameters(&self) -> Result<RunResult, RemoteError> {
        let pair = self.engine.pair();
        info!(%pair, "syncing product parameters");
        let mut result = RunResult::new();
        let mut page = 1;
        let mut processed: u64 = 0;

        loop {
            let listing = self
                .engine
                .client()
                .list_products(pair.source, page, self.page_size)
                .await?;
            info!(page, total = listing.total, "fetched products page");

            for product in &listing.items {
                match self.engine.link_product_parameters(product).await {
                    Ok(report) => result.merge(report),
                    Err(e) => {
                        result.record_error(
                            EntityKind::ProductParameter,
                            &product.part_number,
                            pair,
                            &e,
                        );
                    }
                }
                processed += 1;
                if processed % self.progress_every == 0 {
                    info!(processed, %result, "progress");
                }
            }

            if !listing.has_next() {
                break;
            }
            page += 1;
        }

        info!(%result, "product parameter sync complete");
        Ok(result)
    }

    fn progress(&self, result: &RunResult) {
        if result.total() % self.progress_every == 0 {
            info!(%result, "progress");
        }
    }
}
