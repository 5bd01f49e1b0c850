//! Strapi v4 GraphQL implementation of the [`CatalogClient`] contract.
//!
//! Pure request/response: every method posts one hand-written document and
//! converts the enveloped reply into domain records. The one piece of
//! interpretation living here is duplicate-conflict classification
//! ([`classify_duplicate`]): Strapi reports "this locale peer / join
//! already exists" as a GraphQL error, and this module is the only place
//! allowed to recognize that shape.

mod queries;
mod types;

use catalog_core::{
    EntityId, EntityKind, Locale, Page, ParameterType, ParameterValue, Product, ProductParameter,
};
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;

use crate::client::{CatalogClient, LinkOutcome, ProductLocalizationInput};
use crate::config::CmsConfig;
use crate::error::RemoteError;

use types::{
    EntriesData, EntryData, LocalizationsAttrs, ParameterTypeAttrs, ParameterValueAttrs,
    ProductAttrs, ProductParameterAttrs, convert_localizations, convert_page,
    convert_parameter_type, convert_parameter_value, convert_product, convert_product_parameter,
};

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    extensions: serde_json::Value,
}

/// Strapi GraphQL client.
#[derive(Clone)]
pub struct StrapiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl StrapiClient {
    /// Create a new client for the configured CMS.
    ///
    /// # Panics
    ///
    /// Panics if the API token contains invalid header characters.
    #[must_use]
    pub fn new(config: &CmsConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_token.expose_secret()))
                .expect("Invalid API token for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: format!("{}/graphql", config.url.trim_end_matches('/')),
        }
    }

    /// Execute a GraphQL document and return the full envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQLResponse<T>, RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::GraphQL {
                messages: vec![format!("CMS returned {status}: {body}")],
            });
        }

        Ok(response.json().await?)
    }

    /// Execute and require data, turning GraphQL errors into [`RemoteError`].
    async fn execute_data<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, RemoteError> {
        let response = self.execute::<T>(query, variables).await?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            return Err(RemoteError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        response
            .data
            .ok_or_else(|| RemoteError::MalformedResponse("no data in response".to_string()))
    }

    /// Execute a create whose backend may answer "already exists".
    ///
    /// A duplicate-conflict error becomes [`LinkOutcome::AlreadyExists`];
    /// any other GraphQL error stays a [`RemoteError`].
    async fn execute_create<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        extract_id: impl FnOnce(T) -> Option<EntityId>,
    ) -> Result<LinkOutcome, RemoteError> {
        let response = self.execute::<T>(query, variables).await?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            if let Some(existing) = classify_duplicate(&errors) {
                return Ok(LinkOutcome::AlreadyExists(existing));
            }
            return Err(RemoteError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        let data = response
            .data
            .ok_or_else(|| RemoteError::MalformedResponse("no data in response".to_string()))?;
        extract_id(data)
            .map(LinkOutcome::Created)
            .ok_or_else(|| RemoteError::MalformedResponse("create returned no id".to_string()))
    }

    fn localizations_query(kind: EntityKind) -> Option<&'static str> {
        match kind {
            EntityKind::Product => Some(queries::PRODUCT_LOCALIZATIONS),
            EntityKind::ParameterValue => Some(queries::PARAMETER_VALUE_LOCALIZATIONS),
            EntityKind::Subcategory => Some(queries::SUBCATEGORY_LOCALIZATIONS),
            EntityKind::ProductType => Some(queries::PRODUCT_TYPE_LOCALIZATIONS),
            EntityKind::ParameterType | EntityKind::ProductParameter => None,
        }
    }
}

/// Recognize Strapi's duplicate-conflict error shapes.
///
/// Strapi reports these either through the `isExists` exception detail or
/// through a built-in message. Returns the existing id when the backend
/// reveals it.
fn classify_duplicate(errors: &[GraphQLErrorResponse]) -> Option<Option<EntityId>> {
    for error in errors {
        let details = &error.extensions["exception"]["details"];
        let is_exists = details["isExists"].as_bool().unwrap_or(false);
        let message_match = error.message.contains("already exists")
            || error.message.contains("locale is already used");

        if is_exists || message_match {
            let existing = details["existingId"]
                .as_str()
                .map(EntityId::from)
                .or_else(|| details["existingId"].as_u64().map(|id| EntityId::new(id.to_string())));
            return Some(existing);
        }
    }
    None
}

fn published_now() -> String {
    Utc::now().to_rfc3339()
}

impl CatalogClient for StrapiClient {
    #[instrument(skip(self), fields(%locale))]
    async fn parameter_type_by_name(
        &self,
        name: &str,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError> {
        let data: EntriesData<ParameterTypeAttrs> = self
            .execute_data(
                queries::PARAMETER_TYPE_BY_NAME,
                json!({ "name": name, "locale": locale.as_str() }),
            )
            .await?;
        Ok(data.entries.data.into_iter().next().and_then(convert_parameter_type))
    }

    #[instrument(skip(self), fields(%id, %locale))]
    async fn parameter_type_by_id(
        &self,
        id: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError> {
        let data: EntryData<ParameterTypeAttrs> = self
            .execute_data(
                queries::PARAMETER_TYPE_BY_ID,
                json!({ "id": id.as_str(), "locale": locale.as_str() }),
            )
            .await?;
        Ok(data.entry.data.and_then(convert_parameter_type))
    }

    #[instrument(skip(self), fields(%locale))]
    async fn create_parameter_type(
        &self,
        name: &str,
        slug: &str,
        locale: Locale,
    ) -> Result<ParameterType, RemoteError> {
        let data: EntryData<ParameterTypeAttrs> = self
            .execute_data(
                queries::CREATE_PARAMETER_TYPE,
                json!({
                    "data": { "name": name, "slug": slug, "publishedAt": published_now() },
                    "locale": locale.as_str(),
                }),
            )
            .await?;
        data.entry
            .data
            .and_then(convert_parameter_type)
            .ok_or_else(|| RemoteError::MalformedResponse("create returned no entity".to_string()))
    }

    #[instrument(skip(self), fields(%id, %locale))]
    async fn create_parameter_type_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        name: &str,
        slug: &str,
    ) -> Result<LinkOutcome, RemoteError> {
        self.execute_create(
            queries::CREATE_PARAMETER_TYPE_LOCALIZATION,
            json!({
                "id": id.as_str(),
                "locale": locale.as_str(),
                "data": { "name": name, "slug": slug, "publishedAt": published_now() },
            }),
            |data: EntryData<LocalizationsAttrs>| data.entry.data.map(|doc| EntityId::from(doc.id)),
        )
        .await
    }

    #[instrument(skip(self), fields(%locale, page))]
    async fn list_parameter_types(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterType>, RemoteError> {
        let data: EntriesData<ParameterTypeAttrs> = self
            .execute_data(
                queries::LIST_PARAMETER_TYPES,
                json!({
                    "locale": locale.as_str(),
                    "pagination": { "page": page, "pageSize": page_size },
                }),
            )
            .await?;
        Ok(convert_page(data.entries, page, convert_parameter_type))
    }

    #[instrument(skip(self), fields(%parameter_type, %locale))]
    async fn parameter_value_by_value(
        &self,
        value: &str,
        parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterValue>, RemoteError> {
        let data: EntriesData<ParameterValueAttrs> = self
            .execute_data(
                queries::PARAMETER_VALUE_BY_VALUE,
                json!({
                    "value": value,
                    "parameterTypeId": parameter_type.as_str(),
                    "locale": locale.as_str(),
                }),
            )
            .await?;
        Ok(data.entries.data.into_iter().next().and_then(convert_parameter_value))
    }

    #[instrument(skip(self), fields(%parameter_type, %locale))]
    async fn create_parameter_value(
        &self,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<ParameterValue, RemoteError> {
        let data: EntryData<ParameterValueAttrs> = self
            .execute_data(
                queries::CREATE_PARAMETER_VALUE,
                json!({
                    "data": {
                        "value": value,
                        "code": code,
                        "parameter_type": parameter_type.as_str(),
                        "publishedAt": published_now(),
                    },
                    "locale": locale.as_str(),
                }),
            )
            .await?;
        data.entry
            .data
            .and_then(convert_parameter_value)
            .ok_or_else(|| RemoteError::MalformedResponse("create returned no entity".to_string()))
    }

    #[instrument(skip(self), fields(%id, %locale))]
    async fn create_parameter_value_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
    ) -> Result<LinkOutcome, RemoteError> {
        self.execute_create(
            queries::CREATE_PARAMETER_VALUE_LOCALIZATION,
            json!({
                "id": id.as_str(),
                "locale": locale.as_str(),
                "data": {
                    "value": value,
                    "code": code,
                    "parameter_type": parameter_type.as_str(),
                    "publishedAt": published_now(),
                },
            }),
            |data: EntryData<LocalizationsAttrs>| data.entry.data.map(|doc| EntityId::from(doc.id)),
        )
        .await
    }

    #[instrument(skip(self), fields(%locale, page))]
    async fn list_parameter_values(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterValue>, RemoteError> {
        let data: EntriesData<ParameterValueAttrs> = self
            .execute_data(
                queries::LIST_PARAMETER_VALUES,
                json!({
                    "locale": locale.as_str(),
                    "pagination": { "page": page, "pageSize": page_size },
                }),
            )
            .await?;
        Ok(convert_page(data.entries, page, convert_parameter_value))
    }

    #[instrument(skip(self), fields(%locale))]
    async fn product_by_part_number(
        &self,
        part_number: &str,
        locale: Locale,
    ) -> Result<Option<Product>, RemoteError> {
        let data: EntriesData<ProductAttrs> = self
            .execute_data(
                queries::PRODUCT_BY_PART_NUMBER,
                json!({ "partNumber": part_number, "locale": locale.as_str() }),
            )
            .await?;
        Ok(data.entries.data.into_iter().next().and_then(convert_product))
    }

    #[instrument(skip(self, fields), fields(%id, %locale))]
    async fn create_product_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        fields: &ProductLocalizationInput,
    ) -> Result<LinkOutcome, RemoteError> {
        let mut data = json!({
            "part_number": fields.part_number,
            "title": fields.title,
            "description": fields.description,
            "retail": fields.retail,
            "currency": fields.currency,
            "slug": fields.slug,
            "image_link": fields.image_link,
            "additional_images": fields
                .additional_images
                .iter()
                .map(|link| json!({ "link": link }))
                .collect::<Vec<_>>(),
            "publishedAt": published_now(),
        });
        // Dropped relations stay absent from the payload entirely.
        if let Some(subcategory) = &fields.subcategory {
            data["subcategory"] = json!(subcategory.as_str());
        }
        if !fields.product_types.is_empty() {
            data["product_types"] = json!(
                fields
                    .product_types
                    .iter()
                    .map(EntityId::as_str)
                    .collect::<Vec<_>>()
            );
        }

        self.execute_create(
            queries::CREATE_PRODUCT_LOCALIZATION,
            json!({ "id": id.as_str(), "locale": locale.as_str(), "data": data }),
            |reply: EntryData<LocalizationsAttrs>| reply.entry.data.map(|doc| EntityId::from(doc.id)),
        )
        .await
    }

    #[instrument(skip(self), fields(%locale, page))]
    async fn list_products(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, RemoteError> {
        let data: EntriesData<ProductAttrs> = self
            .execute_data(
                queries::LIST_PRODUCTS,
                json!({
                    "locale": locale.as_str(),
                    "pagination": { "page": page, "pageSize": page_size },
                }),
            )
            .await?;
        Ok(convert_page(data.entries, page, convert_product))
    }

    #[instrument(skip(self), fields(%product, %locale))]
    async fn product_parameters(
        &self,
        product: &EntityId,
        locale: Locale,
    ) -> Result<Vec<ProductParameter>, RemoteError> {
        let data: EntriesData<ProductParameterAttrs> = self
            .execute_data(
                queries::PRODUCT_PARAMETERS,
                json!({ "productId": product.as_str(), "locale": locale.as_str() }),
            )
            .await?;
        Ok(data
            .entries
            .data
            .into_iter()
            .filter_map(convert_product_parameter)
            .collect())
    }

    #[instrument(skip(self), fields(%product, %parameter_value, %locale))]
    async fn create_product_parameter(
        &self,
        product: &EntityId,
        parameter_value: &EntityId,
        locale: Locale,
    ) -> Result<LinkOutcome, RemoteError> {
        self.execute_create(
            queries::CREATE_PRODUCT_PARAMETER,
            json!({
                "data": {
                    "product": product.as_str(),
                    "parameter_value": parameter_value.as_str(),
                    "publishedAt": published_now(),
                },
                "locale": locale.as_str(),
            }),
            |data: EntryData<types::IdOnly>| data.entry.data.map(|doc| EntityId::from(doc.id)),
        )
        .await
    }

    #[instrument(skip(self), fields(%kind, %id, %target))]
    async fn localization_of(
        &self,
        kind: EntityKind,
        id: &EntityId,
        target: Locale,
    ) -> Result<Option<EntityId>, RemoteError> {
        let query = Self::localizations_query(kind).ok_or_else(|| {
            RemoteError::MalformedResponse(format!("{kind} has no localization lookup"))
        })?;

        let data: EntryData<LocalizationsAttrs> = self
            .execute_data(query, json!({ "id": id.as_str() }))
            .await?;

        let peers = data
            .entry
            .data
            .and_then(|doc| doc.attributes)
            .map(|attrs| convert_localizations(attrs.localizations))
            .unwrap_or_default();

        Ok(peers
            .into_iter()
            .find(|peer| peer.locale == target)
            .map(|peer| peer.id))
    }
}
