//! # Catalog Client
//!
//! High-level API for the catalog actor.

use crate::catalog_actor::CatalogError;
use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{Category, Product, ProductCreate, ProductId, ProductUpdate};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, CatalogError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Products in one category, in id order.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: Category) -> Result<Vec<Product>, CatalogError> {
        debug!("Sending request");
        self.inner
            .list(Some(category))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn set_in_stock(
        &self,
        id: ProductId,
        in_stock: bool,
    ) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner
            .update(
                id,
                ProductUpdate {
                    in_stock: Some(in_stock),
                },
            )
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Product> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<CatalogError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => CatalogError::NotFound(id),
            Err(other) => CatalogError::ActorCommunicationError(other.to_string()),
        }
    }
}
