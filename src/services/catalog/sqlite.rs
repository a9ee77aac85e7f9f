use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use super::CatalogProvider;
use crate::db::queries;
use crate::models::{CategoryQuery, ServiceCategory, ServiceRecord};

/// Inventory catalog backed by the application's SQLite database.
pub struct SqliteCatalog {
    db: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogProvider for SqliteCatalog {
    async fn search(
        &self,
        category: ServiceCategory,
        query: &CategoryQuery,
    ) -> anyhow::Result<Vec<ServiceRecord>> {
        let db = self.db.lock().unwrap();
        let records = match category {
            ServiceCategory::Jet => queries::search_jets(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
            ServiceCategory::EmptyLeg => queries::search_empty_legs(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
            ServiceCategory::Helicopter => queries::search_helicopters(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
            ServiceCategory::Yacht => queries::search_yachts(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
            ServiceCategory::Car => queries::search_cars(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
            ServiceCategory::Adventure => queries::search_adventures(&db, query)?
                .into_iter()
                .map(|row| row.into_record())
                .collect(),
        };
        Ok(records)
    }
}
