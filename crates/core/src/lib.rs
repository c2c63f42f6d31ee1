//! `storefront-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no async): identifiers,
//! money in minor currency units, and the small traits the catalog and cart
//! crates build on.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, IngredientId, ProductId, RequestId};
pub use value_object::{Money, ValueObject};
