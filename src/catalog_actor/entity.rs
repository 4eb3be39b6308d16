//! [`ActorEntity`] implementation for [`Product`].
//!
//! The catalog has no dependencies (`Context = ()`) and no custom actions. Listing
//! accepts a [`Category`] filter.

use super::CatalogError;
use crate::framework::ActorEntity;
use crate::model::{Category, Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Query = Category;
    type Context = ();
    type Error = CatalogError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, CatalogError> {
        if params.name.trim().is_empty() {
            return Err(CatalogError::ValidationError("name must not be empty".into()));
        }
        if params.price == 0 {
            return Err(CatalogError::ValidationError(format!(
                "price of {} must be positive",
                params.name
            )));
        }
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            volume: params.volume,
            category: params.category,
            image: params.image,
            in_stock: params.in_stock,
            created_at: Utc::now(),
        })
    }

    fn matches(&self, category: &Category) -> bool {
        self.category == *category
    }

    /// Only the stock flag is mutable; price and descriptive fields are fixed at creation.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), CatalogError> {
        if let Some(in_stock) = update.in_stock {
            self.in_stock = in_stock;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), CatalogError> {
        Ok(())
    }
}
