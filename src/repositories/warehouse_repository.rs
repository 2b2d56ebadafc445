use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
};
use std::sync::Arc;

use crate::entities::product::Entity as Product;
use crate::entities::warehouse::{
    ActiveModel as WarehouseActiveModel, Entity as Warehouse, Model as WarehouseModel,
};
use crate::errors::ServiceError;
use crate::models::WarehouseWithProducts;
use crate::repositories::{ProductRepository, Repository};

use super::BaseRepository;

/// Repository for warehouse rows
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    base: BaseRepository,
}

impl WarehouseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Every warehouse, in the order the store returns them
    pub async fn find_all(&self) -> Result<Vec<WarehouseModel>, ServiceError> {
        Ok(Warehouse::find().all(self.base.get_db()).await?)
    }

    /// Find a warehouse together with every product stored in it
    pub async fn find_with_products(
        &self,
        id: i32,
    ) -> Result<Option<WarehouseWithProducts>, ServiceError> {
        let mut rows = Warehouse::find_by_id(id)
            .find_with_related(Product)
            .all(self.base.get_db())
            .await?;

        Ok(rows.pop().map(WarehouseWithProducts::from))
    }

    pub async fn exists(&self, id: i32) -> Result<bool, ServiceError> {
        let count = Warehouse::find_by_id(id)
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> {
        Self::count_in(self.base.get_db()).await
    }

    /// Create a new warehouse
    pub async fn create(
        &self,
        warehouse: WarehouseActiveModel,
    ) -> Result<WarehouseModel, ServiceError> {
        Self::create_in(self.base.get_db(), warehouse).await
    }

    /// Overwrite every column of an existing warehouse
    ///
    /// Fails with `DbErr::RecordNotUpdated` when no row has `warehouse.id`.
    pub async fn update(&self, warehouse: WarehouseActiveModel) -> Result<WarehouseModel, ServiceError> {
        Ok(warehouse.update(self.base.get_db()).await?)
    }

    pub async fn count_in<C: ConnectionTrait>(conn: &C) -> Result<u64, ServiceError> {
        Ok(Warehouse::find().count(conn).await?)
    }

    /// Insert on an arbitrary connection, typically an open transaction
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        warehouse: WarehouseActiveModel,
    ) -> Result<WarehouseModel, ServiceError> {
        Ok(warehouse.insert(conn).await?)
    }

    /// Delete a warehouse row, returning the number of rows removed
    pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> Result<u64, ServiceError> {
        let result = Warehouse::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }

    /// Delete every product stored in warehouse `id`, then the warehouse row,
    /// returning the number of products removed
    ///
    /// Fails with `DbErr::RecordNotFound` when the warehouse row is already
    /// gone; run it inside a transaction so the product deletes roll back too.
    pub async fn delete_with_products<C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> Result<u64, ServiceError> {
        let products = ProductRepository::delete_by_warehouse(conn, id).await?;
        if Self::delete_by_id(conn, id).await? != 1 {
            return Err(ServiceError::DatabaseError(DbErr::RecordNotFound(format!(
                "warehouse {} vanished before it could be deleted",
                id
            ))));
        }
        Ok(products)
    }
}
