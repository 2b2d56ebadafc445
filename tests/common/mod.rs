#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use warehouse_manager::{
    db::{self, DbConfig},
    models::{NewProduct, NewWarehouse},
    InventoryService,
};

/// Inventory service over a private in-memory SQLite store.
pub struct TestInventory {
    pub db: Arc<DatabaseConnection>,
    pub service: InventoryService,
}

impl TestInventory {
    /// Migrated, empty store.
    pub async fn empty() -> Self {
        Self::build(false).await
    }

    /// Migrated store holding the two example warehouses and three products.
    pub async fn seeded() -> Self {
        Self::build(true).await
    }

    async fn build(seed: bool) -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        let db = Arc::new(pool);

        let service = InventoryService::with_cache_ttl(db.clone(), Duration::from_secs(300))
            .seed_on_initialize(seed);
        service
            .initialize()
            .await
            .expect("failed to initialize inventory store");

        Self { db, service }
    }

    /// Writes a row behind the service's back, so any change visible through
    /// the service afterwards came from the store and not from its cache.
    pub async fn raw_execute(&self, sql: &str) {
        let backend = self.db.get_database_backend();
        self.db
            .execute(Statement::from_string(backend, sql.to_string()))
            .await
            .expect("raw statement failed");
    }

    pub async fn raw_count(&self, table: &str) -> i64 {
        let backend = self.db.get_database_backend();
        let row = self
            .db
            .query_one(Statement::from_string(
                backend,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .expect("count query failed")
            .expect("count returned no row");
        row.try_get("", "n").expect("count column missing")
    }
}

pub fn warehouse(name: &str, capacity_m3: i32) -> NewWarehouse {
    NewWarehouse::new(name, "Rzeszow, ul.Krakowska 12", capacity_m3)
}

pub fn product(name: &str, sku: &str, warehouse_id: i32, quantity: i32) -> NewProduct {
    NewProduct::new(name, sku, warehouse_id).with_quantity(quantity)
}
