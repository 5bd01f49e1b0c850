//! The remote entity contract the reconciliation engine is generic over.
//!
//! [`StrapiClient`](crate::strapi::StrapiClient) is the production
//! implementation; tests drive the engine with in-memory fakes.

use catalog_core::{
    EntityId, EntityKind, Locale, Page, ParameterType, ParameterValue, Product, ProductParameter,
};
use rust_decimal::Decimal;

use crate::error::RemoteError;

/// Result of a create that the backend may reject as a duplicate.
///
/// Duplicate-conflict classification happens inside the client (the only
/// layer that knows the backend's error shape); the engine treats
/// `AlreadyExists` as success-equivalent and never inspects upstream error
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The record was created.
    Created(EntityId),
    /// The backend reported the record (or locale peer) already exists.
    /// The existing id is returned when the backend reveals it.
    AlreadyExists(Option<EntityId>),
}

/// Fields of a product localization peer.
///
/// Relations whose localized counterpart could not be resolved are absent
/// here by construction; the engine drops them before building the payload.
#[derive(Debug, Clone, Default)]
pub struct ProductLocalizationInput {
    pub part_number: String,
    pub title: String,
    pub description: Option<String>,
    pub retail: Option<Decimal>,
    pub currency: Option<String>,
    pub slug: String,
    pub image_link: Option<String>,
    pub additional_images: Vec<String>,
    pub subcategory: Option<EntityId>,
    pub product_types: Vec<EntityId>,
}

/// Read/write operations against the CMS for the four catalog entity kinds.
///
/// Pure request/response; no reconciliation logic lives here. Every method
/// may fail with [`RemoteError`] carrying the raw upstream payload.
pub trait CatalogClient {
    // Parameter types ------------------------------------------------------

    /// Look a parameter type up by its natural key (the name text).
    async fn parameter_type_by_name(
        &self,
        name: &str,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError>;

    /// Fetch a parameter type by id, with its localization peers.
    async fn parameter_type_by_id(
        &self,
        id: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError>;

    /// Create a parameter type in `locale`.
    async fn create_parameter_type(
        &self,
        name: &str,
        slug: &str,
        locale: Locale,
    ) -> Result<ParameterType, RemoteError>;

    /// Create a localization peer of an existing parameter type.
    async fn create_parameter_type_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        name: &str,
        slug: &str,
    ) -> Result<LinkOutcome, RemoteError>;

    /// One page of parameter types in `locale`.
    async fn list_parameter_types(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterType>, RemoteError>;

    // Parameter values -----------------------------------------------------

    /// Look a parameter value up by (value text, owning type id).
    async fn parameter_value_by_value(
        &self,
        value: &str,
        parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterValue>, RemoteError>;

    /// Create a parameter value in `locale`.
    async fn create_parameter_value(
        &self,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<ParameterValue, RemoteError>;

    /// Create a localization peer of an existing parameter value, linked to
    /// the already-localized owning type.
    async fn create_parameter_value_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
    ) -> Result<LinkOutcome, RemoteError>;

    /// One page of parameter values in `locale`, each carrying its owning
    /// type reference.
    async fn list_parameter_values(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterValue>, RemoteError>;

    // Products -------------------------------------------------------------

    /// Look a product up by its part number.
    async fn product_by_part_number(
        &self,
        part_number: &str,
        locale: Locale,
    ) -> Result<Option<Product>, RemoteError>;

    /// Create a localization peer of an existing product.
    async fn create_product_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        fields: &ProductLocalizationInput,
    ) -> Result<LinkOutcome, RemoteError>;

    /// One page of products in `locale`, with their parameter joins and
    /// localization peers.
    async fn list_products(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, RemoteError>;

    // Joins ----------------------------------------------------------------

    /// Existing product/parameter-value joins for a product in `locale`.
    async fn product_parameters(
        &self,
        product: &EntityId,
        locale: Locale,
    ) -> Result<Vec<ProductParameter>, RemoteError>;

    /// Create a product/parameter-value join in `locale`.
    async fn create_product_parameter(
        &self,
        product: &EntityId,
        parameter_value: &EntityId,
        locale: Locale,
    ) -> Result<LinkOutcome, RemoteError>;

    // Peer resolution ------------------------------------------------------

    /// Resolve the `target`-locale peer id of an entity, for the kinds the
    /// engine only references (products, parameter values, subcategories,
    /// product types).
    async fn localization_of(
        &self,
        kind: EntityKind,
        id: &EntityId,
        target: Locale,
    ) -> Result<Option<EntityId>, RemoteError>;
}
