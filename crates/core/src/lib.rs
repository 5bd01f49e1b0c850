//! Catalog Core - Shared types for the localization sync tools.
//!
//! This crate provides the domain vocabulary used across the sync engine
//! and the CLI:
//!
//! - [`types`] - locales, entity ids and the catalog entity records
//! - [`text`] - slug/code derivation shared by every entity kind
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows the reconciliation engine
//! to be tested against in-memory fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod text;
pub mod types;

pub use types::*;
