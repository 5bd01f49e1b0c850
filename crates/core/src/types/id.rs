//! Opaque entity identifiers and entity kinds.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a remote catalog record.
///
/// The CMS hands ids out as the GraphQL `ID` scalar (a numeric string);
/// nothing in the sync tools ever does arithmetic on them, so they are kept
/// as strings end to end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an id from its wire representation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form, as sent in GraphQL variables.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The localizable entity kinds the reconciliation engine works with.
///
/// `Subcategory` and `ProductType` are never created by the sync tools, but
/// their locale peers are resolved when rewiring product relations, so they
/// participate in cache keys and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ParameterType,
    ParameterValue,
    Product,
    ProductParameter,
    Subcategory,
    ProductType,
}

impl EntityKind {
    /// Stable lowercase name used in logs and error context.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParameterType => "parameter_type",
            Self::ParameterValue => "parameter_value",
            Self::Product => "product",
            Self::ProductParameter => "product_parameter",
            Self::Subcategory => "subcategory",
            Self::ProductType => "product_type",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
