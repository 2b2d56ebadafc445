use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{NAME_PATTERN, SKU_PATTERN};

/// Minimum quantity a product gets when none is given; matches the column default.
pub const DEFAULT_MINIMUM_QUANTITY: i32 = 1;

/// Per-unit volume a product gets when none is given; matches the column default.
pub const DEFAULT_VOLUME_PER_UNIT_M3: f64 = 1.0;

/// Product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key, assigned by the store
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Product name
    #[validate(
        length(
            min = 3,
            max = 200,
            message = "Product name must be between 3 and 200 characters"
        ),
        regex(
            path = "NAME_PATTERN",
            message = "Product name contains some forbidden characters"
        )
    )]
    pub name: String,

    /// SKU (Stock Keeping Unit), unique across all products
    #[sea_orm(unique)]
    #[validate(
        length(min = 2, max = 100, message = "SKU must be between 2 and 100 characters"),
        regex(
            path = "SKU_PATTERN",
            message = "SKU must contain only uppercase letters, numbers and hyphens"
        )
    )]
    pub sku: String,

    /// Units on hand
    #[validate(range(min = 0, message = "Quantity must be 0 or greater"))]
    pub quantity: i32,

    /// Threshold below which the product counts as low stock
    #[validate(range(min = 0, message = "Minimum quantity must be 0 or greater"))]
    pub minimum_quantity: i32,

    /// Volume of a single unit in cubic meters
    pub volume_per_unit_m3: f64,

    /// Owning warehouse
    #[validate(range(min = 1, message = "Please select a warehouse"))]
    pub warehouse_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Warehouse,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Quantity has fallen below the minimum threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.minimum_quantity
    }

    /// Volume occupied by every unit of this product.
    pub fn total_volume_m3(&self) -> f64 {
        f64::from(self.quantity) * self.volume_per_unit_m3
    }
}
