//! Serde shapes for the Strapi v4 GraphQL wire format and their
//! conversions into the domain records.
//!
//! Strapi wraps everything in `data`/`attributes` envelopes; the generic
//! [`Single`]/[`Collection`]/[`Document`] types mirror that once instead of
//! per entity.

use catalog_core::{
    EntityId, Locale, LocalizationRef, Page, ParameterType, ParameterTypeRef, ParameterValue,
    Product, ProductParameter,
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// A single-entity envelope: `{ data: { id, attributes } | null }`.
///
/// Bounds are spelled out on every generic envelope: serde's inference
/// would otherwise demand `T: Default` for the defaulted `attributes`
/// field, which none of the attrs types implement.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Single<T> {
    pub data: Option<Document<T>>,
}

/// A collection envelope: `{ data: [..], meta? }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Collection<T> {
    pub data: Vec<Document<T>>,
    pub meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct Document<T> {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct Meta {
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
}

/// `{ entry: ... }` - aliased single-root responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct EntryData<T> {
    pub entry: Single<T>,
}

/// `{ entries: ... }` - aliased collection-root responses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct EntriesData<T> {
    pub entries: Collection<T>,
}

/// Attributes carrying only a locale code (localization stubs).
#[derive(Debug, Deserialize)]
pub struct LocaleAttrs {
    pub locale: String,
}

/// Attributes carrying only the localization peer list.
#[derive(Debug, Deserialize)]
pub struct LocalizationsAttrs {
    #[serde(default)]
    pub localizations: Option<Collection<LocaleAttrs>>,
}

#[derive(Debug, Deserialize)]
pub struct ParameterTypeAttrs {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub localizations: Option<Collection<LocaleAttrs>>,
}

#[derive(Debug, Deserialize)]
pub struct ParameterValueAttrs {
    pub value: String,
    pub code: String,
    #[serde(default)]
    pub parameter_type: Option<Single<NameAttrs>>,
    #[serde(default)]
    pub localizations: Option<Collection<LocaleAttrs>>,
}

/// Attributes carrying only a display name (owning-type references).
#[derive(Debug, Deserialize)]
pub struct NameAttrs {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageAttrs {
    pub link: String,
}

#[derive(Debug, Deserialize)]
pub struct IdOnly {}

#[derive(Debug, Deserialize)]
pub struct ProductParameterAttrs {
    #[serde(default)]
    pub parameter_value: Option<Single<IdOnly>>,
}

#[derive(Debug, Deserialize)]
pub struct ProductAttrs {
    pub part_number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub retail: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub media_archive: Option<String>,
    #[serde(default)]
    pub additional_images: Option<Vec<ImageAttrs>>,
    #[serde(default)]
    pub subcategory: Option<Single<IdOnly>>,
    #[serde(default)]
    pub product_types: Option<Collection<IdOnly>>,
    #[serde(default)]
    pub product_parameters: Option<Collection<ProductParameterAttrs>>,
    #[serde(default)]
    pub localizations: Option<Collection<LocaleAttrs>>,
}

/// Locale codes the sync tools do not know are skipped rather than failing
/// the whole document; peers in other locales are irrelevant to a run.
pub fn convert_localizations(localizations: Option<Collection<LocaleAttrs>>) -> Vec<LocalizationRef> {
    localizations
        .map(|c| c.data)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|doc| {
            let locale: Locale = doc.attributes?.locale.parse().ok()?;
            Some(LocalizationRef {
                id: EntityId::from(doc.id),
                locale,
            })
        })
        .collect()
}

pub fn convert_parameter_type(doc: Document<ParameterTypeAttrs>) -> Option<ParameterType> {
    let attrs = doc.attributes?;
    Some(ParameterType {
        id: EntityId::from(doc.id),
        name: attrs.name,
        slug: attrs.slug,
        localizations: convert_localizations(attrs.localizations),
    })
}

pub fn convert_parameter_value(doc: Document<ParameterValueAttrs>) -> Option<ParameterValue> {
    let attrs = doc.attributes?;
    Some(ParameterValue {
        id: EntityId::from(doc.id),
        value: attrs.value,
        code: attrs.code,
        parameter_type: attrs.parameter_type.and_then(|single| single.data).map(|owner| {
            ParameterTypeRef {
                id: EntityId::from(owner.id),
                name: owner.attributes.map(|a| a.name).unwrap_or_default(),
            }
        }),
        localizations: convert_localizations(attrs.localizations),
    })
}

pub fn convert_product_parameter(doc: Document<ProductParameterAttrs>) -> Option<ProductParameter> {
    let value = doc.attributes?.parameter_value?.data?;
    Some(ProductParameter {
        id: EntityId::from(doc.id),
        parameter_value: EntityId::from(value.id),
    })
}

pub fn convert_product(doc: Document<ProductAttrs>) -> Option<Product> {
    let attrs = doc.attributes?;
    Some(Product {
        id: EntityId::from(doc.id),
        part_number: attrs.part_number,
        title: attrs.title,
        description: attrs.description,
        retail: attrs.retail.and_then(|v| Decimal::try_from(v).ok()),
        currency: attrs.currency,
        slug: attrs.slug,
        image_link: attrs.image_link,
        media_archive: attrs.media_archive,
        additional_images: attrs
            .additional_images
            .unwrap_or_default()
            .into_iter()
            .map(|image| image.link)
            .collect(),
        subcategory: attrs
            .subcategory
            .and_then(|s| s.data)
            .map(|doc| EntityId::from(doc.id)),
        product_types: attrs
            .product_types
            .map(|c| c.data)
            .unwrap_or_default()
            .into_iter()
            .map(|doc| EntityId::from(doc.id))
            .collect(),
        parameters: attrs
            .product_parameters
            .map(|c| c.data)
            .unwrap_or_default()
            .into_iter()
            .filter_map(convert_product_parameter)
            .collect(),
        localizations: convert_localizations(attrs.localizations),
    })
}

/// Build a [`Page`] out of a collection response, converting each document.
pub fn convert_page<A, T>(
    collection: Collection<A>,
    requested_page: u32,
    convert: impl Fn(Document<A>) -> Option<T>,
) -> Page<T> {
    let (page, page_count, total) = collection.meta.as_ref().map_or(
        // Missing pagination metadata means a single-page result.
        (requested_page, requested_page, collection.data.len() as u64),
        |meta| {
            (
                meta.pagination.page,
                meta.pagination.page_count,
                meta.pagination.total,
            )
        },
    );

    Page {
        items: collection.data.into_iter().filter_map(convert).collect(),
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_product_from_wire_json() {
        let doc: Document<ProductAttrs> = serde_json::from_value(serde_json::json!({
            "id": "101",
            "attributes": {
                "part_number": "ShVVP-2x075",
                "title": "Провід ШВВП",
                "retail": 25.5,
                "currency": "UAH",
                "additional_images": [{ "link": "https://cdn/1.jpg" }],
                "subcategory": { "data": { "id": "3" } },
                "product_types": { "data": [{ "id": "8" }] },
                "product_parameters": { "data": [
                    { "id": "55", "attributes": { "parameter_value": { "data": { "id": "9" } } } }
                ] },
                "localizations": { "data": [
                    { "id": "202", "attributes": { "locale": "ru" } }
                ] }
            }
        }))
        .unwrap();

        let product = convert_product(doc).unwrap();
        assert_eq!(product.id, EntityId::from("101"));
        assert_eq!(product.part_number, "ShVVP-2x075");
        assert_eq!(product.additional_images, vec!["https://cdn/1.jpg"]);
        assert_eq!(product.subcategory, Some(EntityId::from("3")));
        assert_eq!(product.parameters.len(), 1);
        assert_eq!(
            product.localization(Locale::Ru),
            Some(&EntityId::from("202"))
        );
    }

    #[test]
    fn test_envelopes_deserialize_without_default_attrs() {
        // The aliased envelopes must deserialize for attrs types that have
        // no Default impl, and a document missing `attributes` entirely
        // (id-only selections) must come through as None.
        let reply: EntriesData<ParameterTypeAttrs> = serde_json::from_value(serde_json::json!({
            "entries": {
                "data": [{ "id": "4", "attributes": { "name": "Колір", "slug": "kolir" } }],
                "meta": { "pagination": { "total": 1, "page": 1, "pageSize": 25, "pageCount": 1 } }
            }
        }))
        .unwrap();
        assert_eq!(reply.entries.data.len(), 1);

        let stub: EntryData<LocalizationsAttrs> = serde_json::from_value(serde_json::json!({
            "entry": { "data": { "id": "9" } }
        }))
        .unwrap();
        assert!(stub.entry.data.unwrap().attributes.is_none());
    }

    #[test]
    fn test_unknown_locale_peers_are_skipped() {
        let refs = convert_localizations(Some(Collection {
            data: vec![
                Document {
                    id: "1".to_string(),
                    attributes: Some(LocaleAttrs {
                        locale: "ru".to_string(),
                    }),
                },
                Document {
                    id: "2".to_string(),
                    attributes: Some(LocaleAttrs {
                        locale: "pl".to_string(),
                    }),
                },
            ],
            meta: None,
        }));
        assert_eq!(refs.len(), 1);
        assert_eq!(refs.first().map(|r| r.locale), Some(Locale::Ru));
    }
}
