//! Per-run memoization of resolved localizations.
//!
//! The cache only remembers resolutions this run made itself; it is never
//! trusted for existence. Before any create the engine re-checks the
//! backend, so cross-run staleness costs one extra read, not a duplicate
//! peer. One cache is constructed per batch run and injected into the
//! engine, which keeps the engine testable with a fresh cache per test.

use std::collections::HashMap;

use catalog_core::{EntityId, EntityKind, Locale};
use tokio::sync::Mutex;

/// Key of one memoized resolution.
///
/// Natural-key lookups and peer-id lookups are distinct key spaces: the
/// former memoizes "entity with this natural key in this locale", the
/// latter "the `target`-locale peer of this entity id".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// (kind, natural key, locale) -> source-locale entity id.
    Natural {
        kind: EntityKind,
        key: String,
        locale: Locale,
    },
    /// (kind, entity id, target locale) -> peer entity id.
    Peer {
        kind: EntityKind,
        id: EntityId,
        target: Locale,
    },
}

impl CacheKey {
    #[must_use]
    pub fn natural(kind: EntityKind, key: impl Into<String>, locale: Locale) -> Self {
        Self::Natural {
            kind,
            key: key.into(),
            locale,
        }
    }

    #[must_use]
    pub fn peer(kind: EntityKind, id: EntityId, target: Locale) -> Self {
        Self::Peer { kind, id, target }
    }
}

/// Process-lifetime key-value store for localization lookups.
///
/// The mutex serializes the read-check-then-write sequence so two
/// concurrent paths cannot both decide "not found" for the same key.
#[derive(Debug, Default)]
pub struct LocalizationCache {
    entries: Mutex<HashMap<CacheKey, EntityId>>,
}

impl LocalizationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized id for `key`, if this run already resolved it.
    pub async fn get(&self, key: &CacheKey) -> Option<EntityId> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Record a successful resolution.
    pub async fn insert(&self, key: CacheKey, id: EntityId) {
        self.entries.lock().await.insert(key, id);
    }

    /// Number of memoized resolutions.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = LocalizationCache::new();
        let key = CacheKey::natural(EntityKind::ParameterType, "Колір", Locale::Uk);
        assert_eq!(cache.get(&key).await, None);

        cache.insert(key.clone(), EntityId::from("12")).await;
        assert_eq!(cache.get(&key).await, Some(EntityId::from("12")));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_natural_and_peer_keys_do_not_collide() {
        let cache = LocalizationCache::new();
        cache
            .insert(
                CacheKey::natural(EntityKind::Product, "42", Locale::Uk),
                EntityId::from("1"),
            )
            .await;
        let peer_key = CacheKey::peer(EntityKind::Product, EntityId::from("42"), Locale::Uk);
        assert_eq!(cache.get(&peer_key).await, None);
    }
}
