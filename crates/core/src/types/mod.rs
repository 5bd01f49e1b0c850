//! Shared type definitions.

mod entity;
mod id;
mod locale;

pub use entity::{
    LocalizationRef, Page, ParameterType, ParameterTypeRef, ParameterValue, Product,
    ProductParameter,
};
pub use id::{EntityId, EntityKind};
pub use locale::{Locale, LocalePair, LocalePairError, ParseLocaleError};
