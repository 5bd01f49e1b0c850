//! Catalog entity records as the sync tools see them.
//!
//! These are transient working copies of remote CMS records. The engine
//! never owns catalog data beyond a single item's reconciliation; every
//! record here is read from the wire, inspected, and dropped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntityId, Locale};

/// A localization peer reference: the same logical entity in another locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationRef {
    pub id: EntityId,
    pub locale: Locale,
}

/// One page of a remote listing, mirroring the CMS pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_count: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// A parameter type ("Цвет", "Количество жил", ...).
///
/// Logical identity across locales is the peer link: two records in
/// different locales are the same type iff one lists the other in
/// `localizations`. The `slug` is derived once from the source-locale name
/// and shared verbatim by every peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterType {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub localizations: Vec<LocalizationRef>,
}

impl ParameterType {
    /// The peer id in `locale`, if one exists.
    #[must_use]
    pub fn localization(&self, locale: Locale) -> Option<&EntityId> {
        self.localizations
            .iter()
            .find(|l| l.locale == locale)
            .map(|l| &l.id)
    }
}

/// A parameter value ("Белый", "2х0.75", ...), owned by a parameter type.
///
/// `code` is locale-invariant: derived once from the source-locale value
/// plus the owning type id, and reused unchanged on every peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    pub id: EntityId,
    pub value: String,
    pub code: String,
    pub parameter_type: Option<ParameterTypeRef>,
    pub localizations: Vec<LocalizationRef>,
}

impl ParameterValue {
    /// The peer id in `locale`, if one exists.
    #[must_use]
    pub fn localization(&self, locale: Locale) -> Option<&EntityId> {
        self.localizations
            .iter()
            .find(|l| l.locale == locale)
            .map(|l| &l.id)
    }
}

/// Embedded reference to a parameter value's owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTypeRef {
    pub id: EntityId,
    pub name: String,
}

/// A catalog product. `part_number` is the cross-locale natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: EntityId,
    pub part_number: String,
    pub title: String,
    pub description: Option<String>,
    pub retail: Option<Decimal>,
    pub currency: Option<String>,
    pub slug: Option<String>,
    pub image_link: Option<String>,
    pub additional_images: Vec<String>,
    /// Unexpanded media archive URL left behind by catalog ingestion, if
    /// the product's gallery has not been materialized yet.
    pub media_archive: Option<String>,
    pub subcategory: Option<EntityId>,
    pub product_types: Vec<EntityId>,
    pub parameters: Vec<ProductParameter>,
    pub localizations: Vec<LocalizationRef>,
}

impl Product {
    /// The peer id in `locale`, if one exists.
    #[must_use]
    pub fn localization(&self, locale: Locale) -> Option<&EntityId> {
        self.localizations
            .iter()
            .find(|l| l.locale == locale)
            .map(|l| &l.id)
    }
}

/// A product/parameter-value join record in one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductParameter {
    pub id: EntityId,
    pub parameter_value: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str, locale: Locale) -> LocalizationRef {
        LocalizationRef {
            id: EntityId::from(id),
            locale,
        }
    }

    #[test]
    fn test_localization_lookup_finds_peer() {
        let pt = ParameterType {
            id: EntityId::from("1"),
            name: "Колір".to_string(),
            slug: "kolir".to_string(),
            localizations: vec![peer("7", Locale::Ru)],
        };
        assert_eq!(pt.localization(Locale::Ru), Some(&EntityId::from("7")));
        assert_eq!(pt.localization(Locale::En), None);
    }

    #[test]
    fn test_page_has_next() {
        let page = Page::<()> {
            items: vec![],
            page: 1,
            page_count: 3,
            total: 250,
        };
        assert!(page.has_next());
        let last = Page::<()> {
            items: vec![],
            page: 3,
            page_count: 3,
            total: 250,
        };
        assert!(!last.has_next());
    }
}
