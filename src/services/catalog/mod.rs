pub mod sqlite;

use async_trait::async_trait;

use crate::models::{CategoryQuery, ServiceCategory, ServiceRecord};

/// Seam between the search aggregator and whatever backs the inventory:
/// given a filter predicate and a limit, return matching rows or an error.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search(
        &self,
        category: ServiceCategory,
        query: &CategoryQuery,
    ) -> anyhow::Result<Vec<ServiceRecord>>;
}
