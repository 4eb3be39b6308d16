use crate::catalog_actor::{seed_products, CatalogError};
use crate::clients::{CatalogClient, OrderClient, UserClient};
use std::time::Duration;
use tracing::{error, info};

/// Starts, wires and stops the three store actors.
///
/// - **Catalog** and **User** actors have no dependencies (`Context = ()`).
/// - The **Order** actor is run with a [`CatalogClient`] as its context, so order
///   creation can check line items against the live catalog.
///
/// ```ignore
/// let system = StorefrontSystem::new(Duration::from_secs(5));
/// system.seed_catalog().await?;
/// let id = system.order_client.create_order(draft).await?;
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    pub catalog_client: CatalogClient,
    pub order_client: OrderClient,
    pub user_client: UserClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Spawns every actor. `store_timeout` bounds each request to a store.
    pub fn new(store_timeout: Duration) -> Self {
        let (catalog_actor, catalog_client) = crate::catalog_actor::new(store_timeout);
        let (user_actor, user_client) = crate::user_actor::new(store_timeout);
        let (order_actor, order_client) = crate::order_actor::new(store_timeout);

        let catalog_handle = tokio::spawn(catalog_actor.run(()));
        let user_handle = tokio::spawn(user_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(catalog_client.clone()));

        Self {
            catalog_client,
            order_client,
            user_client,
            handles: vec![catalog_handle, user_handle, order_handle],
        }
    }

    /// Loads the default products. Returns how many were added.
    pub async fn seed_catalog(&self) -> Result<usize, CatalogError> {
        let products = seed_products();
        let count = products.len();
        for product in products {
            self.catalog_client.create_product(product).await?;
        }
        info!(count, "Catalog seeded");
        Ok(count)
    }

    /// Drops the clients held here and waits for every actor to exit.
    ///
    /// Actors stop once *all* clones of their client are gone, so anything else holding
    /// a client (such as the HTTP state) must be dropped first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // The order actor holds a catalog client, so it must exit before the catalog can.
        drop(self.order_client);
        drop(self.user_client);
        drop(self.catalog_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
