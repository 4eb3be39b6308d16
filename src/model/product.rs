//! A catalog product.
//!
//! Managed by the catalog actor; see [`crate::catalog_actor`] for the entity
//! implementation. After creation only the `in_stock` flag may change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Energy,
    Soft,
}

impl Category {
    /// Parses the lowercase wire name. Unknown names yield `None`, not an error.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "energy" => Some(Self::Energy),
            "soft" => Some(Self::Soft),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Soft => "soft",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Whole currency units; always positive.
    pub price: u32,
    pub volume: String,
    pub category: Category,
    pub image: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: u32,
    pub volume: String,
    pub category: Category,
    pub image: String,
    pub in_stock: bool,
}

/// The only mutation a product supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub in_stock: Option<bool>,
}
