use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::product::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model as ProductModel,
};
use crate::entities::warehouse::Entity as Warehouse;
use crate::errors::ServiceError;
use crate::models::ProductWithWarehouse;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for product rows
#[derive(Debug, Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Every product joined with its owning warehouse, ascending by ID
    pub async fn find_all_with_warehouse(&self) -> Result<Vec<ProductWithWarehouse>, ServiceError> {
        let rows = Product::find()
            .find_also_related(Warehouse)
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?;

        Ok(rows.into_iter().map(ProductWithWarehouse::from).collect())
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find_by_id(id).one(self.base.get_db()).await?)
    }

    /// Find a product by ID together with its owning warehouse
    pub async fn find_by_id_with_warehouse(
        &self,
        id: i32,
    ) -> Result<Option<ProductWithWarehouse>, ServiceError> {
        let row = Product::find_by_id(id)
            .find_also_related(Warehouse)
            .one(self.base.get_db())
            .await?;

        Ok(row.map(ProductWithWarehouse::from))
    }

    /// Whether any product other than `excluding` already uses `sku`
    pub async fn sku_taken(&self, sku: &str, excluding: Option<i32>) -> Result<bool, ServiceError> {
        let mut query = Product::find().filter(Column::Sku.eq(sku));
        if let Some(id) = excluding {
            query = query.filter(Column::Id.ne(id));
        }

        let count = query.count(self.base.get_db()).await?;
        Ok(count > 0)
    }

    /// Create a new product
    pub async fn create(&self, product: ProductActiveModel) -> Result<ProductModel, ServiceError> {
        Self::create_in(self.base.get_db(), product).await
    }

    /// Overwrite every column of an existing product
    ///
    /// Fails with `DbErr::RecordNotUpdated` when no row has `product.id`.
    pub async fn update(&self, product: ProductActiveModel) -> Result<ProductModel, ServiceError> {
        Ok(product.update(self.base.get_db()).await?)
    }

    /// Delete a product, returning the number of rows removed
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, ServiceError> {
        let result = Product::delete_by_id(id).exec(self.base.get_db()).await?;
        Ok(result.rows_affected)
    }

    /// Insert on an arbitrary connection, typically an open transaction
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        product: ProductActiveModel,
    ) -> Result<ProductModel, ServiceError> {
        Ok(product.insert(conn).await?)
    }

    /// Delete every product stored in `warehouse_id`
    pub async fn delete_by_warehouse<C: ConnectionTrait>(
        conn: &C,
        warehouse_id: i32,
    ) -> Result<u64, ServiceError> {
        let result = Product::delete_many()
            .filter(Column::WarehouseId.eq(warehouse_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
