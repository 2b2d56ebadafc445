//! Example data written into an empty store on first start.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::db::with_transaction;
use crate::errors::ServiceError;
use crate::models::{NewProduct, NewWarehouse};
use crate::repositories::{ProductRepository, WarehouseRepository};

/// Warehouses created by [`seed_example_data`].
pub fn example_warehouses() -> [NewWarehouse; 2] {
    [
        NewWarehouse::new("Main Warehouse", "Niepolomice, ul.Przemyslowa 3", 10_000),
        NewWarehouse::new("Secondary Warehouse", "Jasionka, ul.Lotnicza 6", 6_000),
    ]
}

/// Products created by [`seed_example_data`], paired with the index of their
/// warehouse in [`example_warehouses`]. The warehouse id is filled in once the
/// warehouse row exists.
fn example_products() -> [(usize, NewProduct); 3] {
    [
        (
            0,
            NewProduct::new("Dell Laptop", "DELL-SPX15", 0)
                .with_quantity(36)
                .with_minimum_quantity(5),
        ),
        (
            0,
            NewProduct::new("Defender mouse", "MM-275", 0)
                .with_quantity(24)
                .with_minimum_quantity(10),
        ),
        (
            1,
            NewProduct::new("Dell Mechanical Keyboard", "KB212-B", 0)
                .with_quantity(12)
                .with_minimum_quantity(20),
        ),
    ]
}

/// Inserts the example warehouses and products in one transaction.
///
/// Callers are responsible for checking the store is empty first.
pub async fn seed_example_data(db: &DatabaseConnection) -> Result<(u64, u64), ServiceError> {
    let seeded = with_transaction::<_, _, ServiceError>(db, |txn| {
        Box::pin(async move {
            let mut warehouse_ids = Vec::with_capacity(2);
            for warehouse in example_warehouses() {
                let stored =
                    WarehouseRepository::create_in(txn, warehouse.into_active_model()).await?;
                warehouse_ids.push(stored.id);
            }

            let mut products = 0u64;
            for (index, mut product) in example_products() {
                product.warehouse_id = *warehouse_ids.get(index).ok_or_else(|| {
                    ServiceError::InternalError(format!("seed warehouse #{index} was not stored"))
                })?;
                ProductRepository::create_in(txn, product.into_active_model()).await?;
                products += 1;
            }

            Ok((warehouse_ids.len() as u64, products))
        })
    })
    .await?;

    info!(
        warehouses = seeded.0,
        products = seeded.1,
        "Seeded example inventory"
    );
    Ok(seeded)
}
