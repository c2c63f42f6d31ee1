//! Catalog wire model (matches the catalog endpoint's JSON shape).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{CategoryId, Entity, IngredientId, Money, ProductId};

/// A purchasable catalog entry.
///
/// `count` is the quantity selected in the cart; `0` means "not in cart".
/// Only `id`, `price` and `count` matter for cart aggregation; the rest is
/// descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Price in smallest currency unit.
    pub price: Money,
    #[serde(default)]
    pub count: u32,
    /// Selected size label, if the user picked one.
    #[serde(default)]
    pub size: Option<String>,
    /// Selected dough label, if the user picked one.
    #[serde(default)]
    pub dough: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            image: None,
            price,
            count: 0,
            size: None,
            dough: None,
        }
    }

    /// Same product with a different quantity.
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    /// One more unit (what a "+" button produces).
    pub fn increment(&self) -> Self {
        self.with_count(self.count.saturating_add(1))
    }

    /// One less unit, never below zero (what a "-" button produces).
    pub fn decrement(&self) -> Self {
        self.with_count(self.count.saturating_sub(1))
    }

    pub fn is_in_cart(&self) -> bool {
        self.count > 0
    }

    /// `price * count`.
    pub fn line_total(&self) -> Money {
        self.price.times(self.count)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Menu category (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Optional topping / ingredient (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub image: Option<String>,
}

impl Entity for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> IngredientId {
        self.id
    }
}

/// Decoded catalog envelope.
///
/// All sequences come from one decode of one payload. `sizes` and `dough` are
/// `None` when the payload omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub dough: Option<Vec<String>>,
}

impl CatalogResponse {
    pub fn sizes_and_dough(&self) -> SizesAndDough {
        SizesAndDough {
            sizes: self.sizes.clone(),
            dough: self.dough.clone(),
        }
    }
}

/// Projection delivered by the sizes/dough facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizesAndDough {
    pub sizes: Option<Vec<String>>,
    pub dough: Option<Vec<String>>,
}

/// One decoded catalog shared read-only between every facet consumer.
///
/// Cloning is cheap (the response sits behind an `Arc`).
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    response: Arc<CatalogResponse>,
    fetched_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(response: CatalogResponse, fetched_at: DateTime<Utc>) -> Self {
        Self {
            response: Arc::new(response),
            fetched_at,
        }
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn products(&self) -> &[Product] {
        &self.response.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.response.categories
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.response.ingredients
    }

    pub fn sizes(&self) -> Option<&[String]> {
        self.response.sizes.as_deref()
    }

    pub fn dough(&self) -> Option<&[String]> {
        self.response.dough.as_deref()
    }

    pub fn sizes_and_dough(&self) -> SizesAndDough {
        self.response.sizes_and_dough()
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.response.products.iter().find(|p| p.id == id)
    }

    pub fn response(&self) -> &CatalogResponse {
        &self.response
    }
}
