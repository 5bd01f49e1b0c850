//! Localization sync passes.
//!
//! Each pass walks one entity kind; `all` chains them in dependency order
//! (types before their values, products before their joins). Only
//! setup and pagination failures abort a pass - per-item failures are
//! counted, listed and reported, and the process still exits cleanly so
//! schedulers treat a partial run as "done, re-run later".

use catalog_sync::batch::{BatchDriver, RunResult};
use catalog_sync::client::CatalogClient;
use catalog_sync::config::SyncConfig;
use catalog_sync::error::RemoteError;
use catalog_sync::media::{HttpMediaUploader, MediaUploader};
use catalog_sync::reconcile::ReconcileEngine;
use catalog_sync::strapi::StrapiClient;
use catalog_sync::translate::{OpenAiTranslator, TranslationGateway, TranslationProvider};
use tracing::{info, warn};

/// Folder product gallery images are uploaded into.
const MEDIA_FOLDER: &str = "products";

/// What to sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    ParameterTypes,
    ParameterValues,
    Products,
    ProductParameters,
    All,
}

/// Run one sync pass (or all of them) against the configured CMS.
///
/// # Errors
///
/// Returns [`RemoteError`] if pagination fails; per-item failures are
/// reported, not returned.
pub async fn run(target: Target, config: &SyncConfig) -> Result<(), RemoteError> {
    let client = StrapiClient::new(&config.cms);
    let translator = OpenAiTranslator::new(&config.translation);
    let gateway = TranslationGateway::new(translator, &config.translation);

    let result = match &config.media_upload_url {
        Some(upload_url) => {
            let engine = ReconcileEngine::with_media(
                client,
                gateway,
                config.locales,
                HttpMediaUploader::new(upload_url),
                MEDIA_FOLDER,
            );
            dispatch(&BatchDriver::new(engine, config.page_size), target).await?
        }
        None => {
            let engine = ReconcileEngine::new(client, gateway, config.locales);
            dispatch(&BatchDriver::new(engine, config.page_size), target).await?
        }
    };

    report(&result);
    Ok(())
}

async fn dispatch<C, P, M>(
    driver: &BatchDriver<C, P, M>,
    target: Target,
) -> Result<RunResult, RemoteError>
where
    C: CatalogClient,
    P: TranslationProvider,
    M: MediaUploader,
{
    match target {
        Target::ParameterTypes => driver.sync_parameter_types().await,
        Target::ParameterValues => driver.sync_parameter_values().await,
        Target::Products => driver.sync_products().await,
        Target::ProductParameters => driver.sync_product_parameters().await,
        Target::All => {
            let mut result = driver.sync_parameter_types().await?;
            result.merge(driver.sync_parameter_values().await?);
            result.merge(driver.sync_products().await?);
            result.merge(driver.sync_product_parameters().await?);
            Ok(result)
        }
    }
}

fn report(result: &RunResult) {
    info!(%result, "sync run complete");
    if result.has_failures() {
        warn!(
            failed = result.failed,
            "run completed with failures; re-run after fixing the causes below"
        );
        for error in &result.errors {
            warn!("{error}");
        }
    }
}
