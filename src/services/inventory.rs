use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};

use crate::cache::{Snapshot, SnapshotCache, DEFAULT_CACHE_TTL};
use crate::config::AppConfig;
use crate::db::{self, with_transaction};
use crate::entities::{product, warehouse};
use crate::errors::ServiceError;
use crate::models::inventory::{product_update, warehouse_update};
use crate::models::{
    DashboardStatistics, NewProduct, NewWarehouse, ProductWithWarehouse, WarehouseWithProducts,
};
use crate::repositories::{ProductRepository, WarehouseRepository};
use crate::services::seed;
use crate::validation::{validate_product, validate_warehouse};

/// Service for managing warehouses and the products stored in them.
///
/// Reads of whole collections are served from two TTL snapshot caches, one for
/// products and one for warehouses. Every successful write invalidates the
/// slot(s) it affects before returning, so the next read reflects it.
/// Clones share the connection and both caches.
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    warehouses: WarehouseRepository,
    products: ProductRepository,
    warehouse_cache: Arc<SnapshotCache<warehouse::Model>>,
    product_cache: Arc<SnapshotCache<ProductWithWarehouse>>,
    seed_on_initialize: bool,
}

impl InventoryService {
    /// Creates a service with the default five minute cache TTL
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self::with_cache_ttl(db, DEFAULT_CACHE_TTL)
    }

    pub fn with_cache_ttl(db: Arc<DatabaseConnection>, ttl: Duration) -> Self {
        Self {
            warehouses: WarehouseRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            warehouse_cache: Arc::new(SnapshotCache::new("warehouses", ttl)),
            product_cache: Arc::new(SnapshotCache::new("products", ttl)),
            seed_on_initialize: true,
            db,
        }
    }

    pub fn from_config(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        let mut service = Self::with_cache_ttl(db, config.cache_ttl());
        service.seed_on_initialize = config.seed_on_initialize;
        service
    }

    /// Disables or re-enables seeding of an empty store in [`Self::initialize`].
    pub fn seed_on_initialize(mut self, enabled: bool) -> Self {
        self.seed_on_initialize = enabled;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.product_cache.ttl()
    }

    /// Brings the schema up to date and seeds the example data into an empty
    /// store. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        db::run_migrations(&self.db).await?;

        if self.seed_on_initialize {
            let existing = self.warehouses.count().await?;
            if existing == 0 {
                seed::seed_example_data(&self.db).await?;
            } else {
                debug!(warehouses = existing, "store already populated, skipping seed");
            }
        }

        self.invalidate_all().await;
        info!("Inventory store initialized");
        Ok(())
    }

    /// Every product with its resolved warehouse, ascending by id
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Snapshot<ProductWithWarehouse>, ServiceError> {
        self.product_cache
            .get_or_load(|| self.products.find_all_with_warehouse())
            .await
    }

    /// Every warehouse, in the order the store returns them
    #[instrument(skip(self))]
    pub async fn list_warehouses(&self) -> Result<Snapshot<warehouse::Model>, ServiceError> {
        self.warehouse_cache
            .get_or_load(|| self.warehouses.find_all())
            .await
    }

    /// Products stored in `warehouse_id`, taken from the product snapshot
    #[instrument(skip(self))]
    pub async fn list_products_in_warehouse(
        &self,
        warehouse_id: i32,
    ) -> Result<Vec<ProductWithWarehouse>, ServiceError> {
        let products = self.list_products().await?;
        Ok(products
            .iter()
            .filter(|row| row.product.warehouse_id == warehouse_id)
            .cloned()
            .collect())
    }

    /// Reads straight from the store, bypassing the cache
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> Result<Option<ProductWithWarehouse>, ServiceError> {
        self.products.find_by_id_with_warehouse(id).await
    }

    /// Reads straight from the store with the warehouse's products eager-loaded
    #[instrument(skip(self))]
    pub async fn get_warehouse(
        &self,
        id: i32,
    ) -> Result<Option<WarehouseWithProducts>, ServiceError> {
        self.warehouses.find_with_products(id).await
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self) -> Result<usize, ServiceError> {
        Ok(self.list_products().await?.len())
    }

    #[instrument(skip(self))]
    pub async fn count_products_in_warehouse(&self, warehouse_id: i32) -> Result<usize, ServiceError> {
        let products = self.list_products().await?;
        Ok(products
            .iter()
            .filter(|row| row.product.warehouse_id == warehouse_id)
            .count())
    }

    #[instrument(skip(self))]
    pub async fn count_warehouses(&self) -> Result<usize, ServiceError> {
        Ok(self.list_warehouses().await?.len())
    }

    /// Create a new product
    ///
    /// Fails with `ValidationError` for bad fields or an unknown warehouse and
    /// with `Conflict` when the SKU is already used; nothing is written then.
    #[instrument(skip(self, new_product), fields(sku = %new_product.sku))]
    pub async fn add_product(&self, new_product: NewProduct) -> Result<product::Model, ServiceError> {
        let candidate = new_product.to_model();
        validate_product(&candidate)?;
        self.ensure_warehouse_exists(candidate.warehouse_id).await?;

        if self.products.sku_taken(&candidate.sku, None).await? {
            debug!("duplicate SKU rejected");
            return Err(ServiceError::Conflict { sku: candidate.sku });
        }

        let created = self.products.create(new_product.into_active_model()).await?;
        self.product_cache.invalidate().await;

        debug!(product_id = created.id, "product created");
        Ok(created)
    }

    /// Overwrite every field of an existing product
    ///
    /// The SKU may stay the same; it conflicts only with other products.
    #[instrument(skip(self, product), fields(product_id = product.id, sku = %product.sku))]
    pub async fn update_product(&self, product: product::Model) -> Result<product::Model, ServiceError> {
        validate_product(&product)?;
        self.ensure_warehouse_exists(product.warehouse_id).await?;

        if self.products.sku_taken(&product.sku, Some(product.id)).await? {
            debug!("duplicate SKU rejected");
            return Err(ServiceError::Conflict { sku: product.sku });
        }

        self.product_cache.invalidate().await;
        let updated = self.products.update(product_update(&product)).await?;
        self.product_cache.invalidate().await;

        debug!("product updated");
        Ok(updated)
    }

    /// Delete a product; `false` when there was nothing to delete
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> Result<bool, ServiceError> {
        if self.products.find_by_id(id).await?.is_none() {
            debug!("product not found, nothing to delete");
            return Ok(false);
        }

        self.products.delete_by_id(id).await?;
        self.product_cache.invalidate().await;

        debug!("product deleted");
        Ok(true)
    }

    /// Create a new warehouse
    #[instrument(skip(self, new_warehouse), fields(name = %new_warehouse.name))]
    pub async fn add_warehouse(
        &self,
        new_warehouse: NewWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        validate_warehouse(&new_warehouse.to_model())?;

        let created = self
            .warehouses
            .create(new_warehouse.into_active_model())
            .await?;
        self.warehouse_cache.invalidate().await;

        debug!(warehouse_id = created.id, "warehouse created");
        Ok(created)
    }

    /// Overwrite every field of an existing warehouse
    ///
    /// Product snapshots embed their warehouse, so both caches are dropped.
    #[instrument(skip(self, warehouse), fields(warehouse_id = warehouse.id))]
    pub async fn update_warehouse(
        &self,
        warehouse: warehouse::Model,
    ) -> Result<warehouse::Model, ServiceError> {
        validate_warehouse(&warehouse)?;

        self.warehouse_cache.invalidate().await;
        let updated = self.warehouses.update(warehouse_update(&warehouse)).await?;
        self.invalidate_all().await;

        debug!("warehouse updated");
        Ok(updated)
    }

    /// Delete a warehouse together with every product stored in it
    ///
    /// Returns the number of products removed, or `None` when the warehouse
    /// does not exist. Products and warehouse go in one transaction.
    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, id: i32) -> Result<Option<u64>, ServiceError> {
        if !self.warehouses.exists(id).await? {
            debug!("warehouse not found, nothing to delete");
            return Ok(None);
        }

        let removed_products = with_transaction::<_, _, ServiceError>(&self.db, |txn| {
            Box::pin(async move { WarehouseRepository::delete_with_products(txn, id).await })
        })
        .await?;

        self.invalidate_all().await;

        debug!(removed_products, "warehouse deleted");
        Ok(Some(removed_products))
    }

    /// Statistics over the current warehouse and product snapshots
    #[instrument(skip(self))]
    pub async fn get_dashboard_statistics(&self) -> Result<DashboardStatistics, ServiceError> {
        let warehouses = self.list_warehouses().await?;
        let products = self.list_products().await?;
        Ok(DashboardStatistics::compute(&warehouses, &products))
    }

    /// Drops both snapshots; the next reads go to the store.
    pub async fn invalidate_all(&self) {
        self.warehouse_cache.invalidate().await;
        self.product_cache.invalidate().await;
    }

    /// Whether fresh snapshots are currently cached, as (warehouses, products)
    pub async fn cached_snapshots(&self) -> (bool, bool) {
        (
            self.warehouse_cache.peek().await.is_some(),
            self.product_cache.peek().await.is_some(),
        )
    }

    async fn ensure_warehouse_exists(&self, warehouse_id: i32) -> Result<(), ServiceError> {
        if self.warehouses.exists(warehouse_id).await? {
            Ok(())
        } else {
            Err(ServiceError::invalid(format!(
                "Warehouse {} does not exist",
                warehouse_id
            )))
        }
    }
}
