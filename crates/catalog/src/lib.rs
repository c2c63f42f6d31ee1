//! `storefront-catalog`
//!
//! **Responsibility:** retrieving the storefront catalog.
//!
//! This crate provides:
//! - The wire model (`Product`, `Category`, `Ingredient`, `CatalogResponse`)
//! - A decoder that either fully succeeds or fails with `DecodeError`
//! - The transport port (`Transport`) with in-memory and HTTP implementations
//! - `CatalogService`: per-facet fetches delivered on the UI context, plus a
//!   single-fetch `load_catalog` and `async` result-typed variants
//!
//! The service keeps no catalog state between calls.

pub mod cancel;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod service;
pub mod transport;

pub use cancel::CancelToken;
pub use decoder::decode;
pub use dispatch::{InlineDispatcher, Job, MainLoop, MainQueue, UiDispatcher, main_queue};
pub use error::{CatalogError, DecodeError, TransportError};
pub use model::{CatalogResponse, CatalogSnapshot, Category, Ingredient, Product, SizesAndDough};
pub use service::{CatalogService, Facet, FetchHandle, FetchOutcome, DEFAULT_CATALOG_URL};
pub use transport::{InMemoryTransport, Transport};

#[cfg(feature = "http")]
pub use transport::http::HttpTransport;
