//! Error taxonomy for the sync engine.
//!
//! Per-item failures ([`SyncError`]) are caught at the reconciliation
//! boundary and folded into run counters; they never abort a batch. Only
//! setup-level failures (config, pagination) propagate to the process edge.

use catalog_core::{EntityKind, LocalePair};
use thiserror::Error;

/// A failure talking to the CMS backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The GraphQL layer returned errors; the raw upstream messages are
    /// kept for manual retry triage.
    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQL { messages: Vec<String> },

    /// 2xx response whose body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A failure producing a usable translation.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider responded but with no usable content.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The cleaned translation came back empty. Never silently fall back
    /// to the source text here: an empty peer field would pass unnoticed.
    /// The field holds the untranslated input (a name `source` would be
    /// claimed by thiserror as the error chain).
    #[error("empty translation for {original:?}")]
    Empty { original: String },
}

/// Everything a single entity's reconciliation can fail with.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// A required peer relation does not exist yet in the target locale.
    /// Always a skip; resolved by re-running after an earlier pass has
    /// created the dependency.
    #[error("missing {dependency} localization ({pair}) required by {kind} {key:?}")]
    MissingDependency {
        kind: EntityKind,
        key: String,
        dependency: EntityKind,
        pair: LocalePair,
    },
}

impl SyncError {
    /// Whether this error is a skip (counted, never retried within the run)
    /// rather than a genuine per-item failure.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}
