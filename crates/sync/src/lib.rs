//! Catalog Sync - cross-locale reconciliation engine.
//!
//! Moves product catalog data (parameter types, parameter values, products
//! and their parameter links) between locales inside a headless CMS. For
//! every source-locale entity the engine decides whether a localization
//! peer already exists, creates it if not (translating the human-readable
//! fields on demand), and rewires the dependent relations so the locale
//! graph stays consistent.
//!
//! # Architecture
//!
//! - [`client`] - the remote entity contract the engine is generic over
//! - [`strapi`] - the Strapi v4 GraphQL implementation of that contract
//! - [`translate`] - translation gateway: pass-through rules, cleaning,
//!   term overrides, throttling, and the `OpenAI` provider
//! - [`cache`] - per-run memoization of resolved localizations
//! - [`reconcile`] - the find-or-create-with-localization algorithms
//! - [`batch`] - pagination driver and run accounting
//! - [`media`] - product media archive uploader
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_sync::{batch::BatchDriver, config::SyncConfig, reconcile::ReconcileEngine};
//! use catalog_sync::{strapi::StrapiClient, translate::{OpenAiTranslator, TranslationGateway}};
//!
//! let config = SyncConfig::from_env()?;
//! let engine = ReconcileEngine::new(
//!     StrapiClient::new(&config.cms),
//!     TranslationGateway::new(OpenAiTranslator::new(&config.translation), &config.translation),
//!     config.locales,
//! );
//! let result = BatchDriver::new(engine, config.page_size).sync_parameter_types().await?;
//! tracing::info!(%result, "done");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod media;
pub mod reconcile;
pub mod strapi;
pub mod translate;

pub use error::{RemoteError, SyncError, TranslationError};
