mod common;

use assert_matches::assert_matches;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr, Statement};
use warehouse_manager::{
    db::with_transaction,
    entities::product,
    repositories::{ProductRepository, WarehouseRepository},
    ServiceError,
};

use common::{product, warehouse, TestInventory};

#[tokio::test]
async fn add_then_get_returns_equal_product() {
    let inv = TestInventory::empty().await;
    let wh = inv.service.add_warehouse(warehouse("Annex", 500)).await.unwrap();

    let created = inv
        .service
        .add_product(
            product("USB Hub", "HUB-4P", wh.id, 15)
                .with_minimum_quantity(3)
                .with_volume_per_unit_m3(0.5),
        )
        .await
        .unwrap();

    let fetched = inv.service.get_product(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.product, created);
    assert_eq!(fetched.warehouse.as_ref().map(|w| w.id), Some(wh.id));
    assert_eq!(fetched.warehouse_name(), "Annex");
}

#[tokio::test]
async fn add_then_get_returns_equal_warehouse() {
    let inv = TestInventory::empty().await;

    let created = inv.service.add_warehouse(warehouse("Annex", 500)).await.unwrap();
    let fetched = inv.service.get_warehouse(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.warehouse, created);
    assert!(fetched.products.is_empty());
    assert_eq!(fetched.utilization_percentage(), 0.0);
}

#[tokio::test]
async fn get_of_unknown_ids_is_none() {
    let inv = TestInventory::empty().await;
    assert!(inv.service.get_product(404).await.unwrap().is_none());
    assert!(inv.service.get_warehouse(404).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_sku_is_a_conflict_and_writes_nothing() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();
    let before = inv.service.count_products().await.unwrap();

    let err = inv
        .service
        .add_product(product("Another Laptop", "DELL-SPX15", main.id, 1))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::Conflict { ref sku } if sku == "DELL-SPX15");
    assert_eq!(inv.service.count_products().await.unwrap(), before);
    assert_eq!(inv.raw_count("products").await, before as i64);
}

#[tokio::test]
async fn sku_comparison_is_case_sensitive_but_format_is_enforced() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();

    let err = inv
        .service
        .add_product(product("Lowercase", "dell-spx15", main.id, 1))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ValidationError(ref messages) if messages.len() == 1);
}

#[tokio::test]
async fn invalid_product_is_rejected_before_any_write() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();

    let err = inv
        .service
        .add_product(product("X", "BAD SKU", main.id, -1).with_volume_per_unit_m3(0.0))
        .await
        .unwrap_err();

    assert_eq!(err.validation_messages().len(), 4);
    assert_eq!(inv.raw_count("products").await, 3);
}

#[tokio::test]
async fn product_in_unknown_warehouse_is_a_validation_error() {
    let inv = TestInventory::empty().await;

    let err = inv
        .service
        .add_product(product("Orphan", "ORPH-1", 99, 1))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(inv.raw_count("products").await, 0);
}

#[tokio::test]
async fn update_keeping_own_sku_succeeds() {
    let inv = TestInventory::seeded().await;
    let mut laptop = inv.service.list_products().await.unwrap()[0].product.clone();
    assert_eq!(laptop.sku, "DELL-SPX15");

    laptop.quantity = 40;
    let updated = inv.service.update_product(laptop.clone()).await.unwrap();

    assert_eq!(updated, laptop);
    let fetched = inv.service.get_product(laptop.id).await.unwrap().unwrap();
    assert_eq!(fetched.product.quantity, 40);
}

#[tokio::test]
async fn update_to_another_products_sku_fails_without_writing() {
    let inv = TestInventory::seeded().await;
    let products = inv.service.list_products().await.unwrap();
    let mut mouse = products[1].product.clone();
    let original = mouse.clone();

    mouse.sku = products[0].product.sku.clone();
    mouse.quantity = 1;
    let err = inv.service.update_product(mouse).await.unwrap_err();

    assert_matches!(err, ServiceError::Conflict { ref sku } if sku == "DELL-SPX15");
    let stored = inv.service.get_product(original.id).await.unwrap().unwrap();
    assert_eq!(stored.product, original);
}

#[tokio::test]
async fn update_can_move_product_between_warehouses() {
    let inv = TestInventory::seeded().await;
    let warehouses = inv.service.list_warehouses().await.unwrap();
    let (main, secondary) = (warehouses[0].id, warehouses[1].id);
    let mut keyboard = inv.service.list_products_in_warehouse(secondary).await.unwrap()[0]
        .product
        .clone();

    keyboard.warehouse_id = main;
    inv.service.update_product(keyboard).await.unwrap();

    assert_eq!(inv.service.count_products_in_warehouse(main).await.unwrap(), 3);
    assert_eq!(inv.service.count_products_in_warehouse(secondary).await.unwrap(), 0);
}

#[tokio::test]
async fn update_of_vanished_product_surfaces_store_error() {
    let inv = TestInventory::seeded().await;
    let mut mouse = inv.service.list_products().await.unwrap()[1].product.clone();
    inv.service.delete_product(mouse.id).await.unwrap();

    mouse.quantity = 99;
    let err = inv.service.update_product(mouse).await.unwrap_err();

    assert_matches!(err, ServiceError::DatabaseError(DbErr::RecordNotUpdated));
}

#[tokio::test]
async fn delete_product_reports_whether_anything_was_removed() {
    let inv = TestInventory::seeded().await;
    let mouse = inv.service.list_products().await.unwrap()[1].product.clone();

    assert!(inv.service.delete_product(mouse.id).await.unwrap());
    assert!(!inv.service.delete_product(mouse.id).await.unwrap());
    assert_eq!(inv.service.count_products().await.unwrap(), 2);
}

#[tokio::test]
async fn delete_warehouse_cascades_to_its_products() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();
    assert_eq!(inv.service.count_products_in_warehouse(main.id).await.unwrap(), 2);

    let removed = inv.service.delete_warehouse(main.id).await.unwrap();

    assert_eq!(removed, Some(2));
    assert!(inv.service.get_warehouse(main.id).await.unwrap().is_none());
    assert_eq!(inv.service.count_warehouses().await.unwrap(), 1);
    assert_eq!(inv.service.count_products().await.unwrap(), 1);
    assert_eq!(inv.raw_count("products").await, 1);
}

#[tokio::test]
async fn delete_of_missing_warehouse_is_a_no_op() {
    let inv = TestInventory::seeded().await;

    assert_eq!(inv.service.delete_warehouse(404).await.unwrap(), None);
    assert_eq!(inv.raw_count("warehouses").await, 2);
    assert_eq!(inv.raw_count("products").await, 3);
}

#[tokio::test]
async fn delete_of_empty_warehouse_removes_zero_products() {
    let inv = TestInventory::empty().await;
    let wh = inv.service.add_warehouse(warehouse("Overflow", 100)).await.unwrap();

    assert_eq!(inv.service.delete_warehouse(wh.id).await.unwrap(), Some(0));
    assert_eq!(inv.raw_count("warehouses").await, 0);
}

#[tokio::test]
async fn cascade_rolls_back_when_warehouse_row_is_gone() {
    let inv = TestInventory::empty().await;
    inv.raw_execute("PRAGMA foreign_keys = OFF").await;
    inv.raw_execute(
        "INSERT INTO products (name, sku, quantity, minimum_quantity, volume_per_unit_m3, warehouse_id) \
         VALUES ('Stray Crate', 'STRAY-1', 4, 1, 1.0, 77), ('Stray Pallet', 'STRAY-2', 2, 1, 1.0, 77)",
    )
    .await;

    let result = with_transaction::<_, _, ServiceError>(&inv.db, |txn| {
        Box::pin(async move { WarehouseRepository::delete_with_products(txn, 77).await })
    })
    .await;

    assert_matches!(
        result,
        Err(ServiceError::DatabaseError(DbErr::RecordNotFound(_)))
    );
    assert_eq!(inv.raw_count("products").await, 2);
}

#[tokio::test]
async fn unset_columns_take_store_defaults() {
    let inv = TestInventory::empty().await;
    let wh = inv.service.add_warehouse(warehouse("Annex", 500)).await.unwrap();

    let created = ProductRepository::new(inv.db.clone())
        .create(product::ActiveModel {
            name: Set("Packing Tape".into()),
            sku: Set("TAPE-48".into()),
            warehouse_id: Set(wh.id),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.quantity, 0);
    assert_eq!(created.minimum_quantity, product::DEFAULT_MINIMUM_QUANTITY);
    assert_eq!(created.volume_per_unit_m3, product::DEFAULT_VOLUME_PER_UNIT_M3);
}

#[tokio::test]
async fn store_refuses_to_orphan_products() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();

    let backend = inv.db.get_database_backend();
    let result = inv
        .db
        .execute(Statement::from_string(
            backend,
            format!("DELETE FROM warehouses WHERE id = {}", main.id),
        ))
        .await;

    assert!(result.is_err());
    assert_eq!(inv.raw_count("warehouses").await, 2);
}

#[tokio::test]
async fn store_rejects_duplicate_sku_written_directly() {
    let inv = TestInventory::seeded().await;
    let main = inv.service.list_warehouses().await.unwrap()[0].clone();

    let backend = inv.db.get_database_backend();
    let result = inv
        .db
        .execute(Statement::from_string(
            backend,
            format!(
                "INSERT INTO products (name, sku, quantity, minimum_quantity, volume_per_unit_m3, warehouse_id) \
                 VALUES ('Clone', 'MM-275', 1, 1, 1.0, {})",
                main.id
            ),
        ))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn invalid_warehouse_update_leaves_row_untouched() {
    let inv = TestInventory::seeded().await;
    let original = inv.service.list_warehouses().await.unwrap()[0].clone();

    let mut broken = original.clone();
    broken.capacity_m3 = 0;
    broken.name = "Main/Warehouse".into();
    let err = inv.service.update_warehouse(broken).await.unwrap_err();

    assert_eq!(err.validation_messages().len(), 2);
    let stored = inv.service.get_warehouse(original.id).await.unwrap().unwrap();
    assert_eq!(stored.warehouse, original);
}

#[tokio::test]
async fn warehouse_metrics_follow_stored_products() {
    let inv = TestInventory::empty().await;
    let wh = inv.service.add_warehouse(warehouse("Cold Store", 100)).await.unwrap();
    inv.service
        .add_product(product("Ice Packs", "ICE-01", wh.id, 60).with_volume_per_unit_m3(1.0))
        .await
        .unwrap();
    inv.service
        .add_product(product("Freezer Bags", "FRZ-02", wh.id, 70).with_volume_per_unit_m3(0.5))
        .await
        .unwrap();

    let loaded = inv.service.get_warehouse(wh.id).await.unwrap().unwrap();

    assert_eq!(loaded.products.len(), 2);
    assert_eq!(loaded.used_space_m3(), 95.0);
    assert_eq!(loaded.free_space_m3(), 5.0);
    assert!(loaded.is_near_capacity());
    assert!(loaded.is_critical_capacity());
}
