use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{product, LOCATION_PATTERN, NAME_PATTERN};

/// Utilization at or above which a warehouse is flagged as nearly full.
pub const NEAR_CAPACITY_PERCENT: f64 = 80.0;

/// Utilization at or above which a warehouse is flagged as critically full.
pub const CRITICAL_CAPACITY_PERCENT: f64 = 95.0;

/// Warehouse entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    /// Primary key, assigned by the store
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Warehouse name
    #[validate(
        length(
            min = 3,
            max = 200,
            message = "Warehouse name must be between 3 and 200 characters"
        ),
        regex(
            path = "NAME_PATTERN",
            message = "Warehouse name contains some forbidden characters"
        )
    )]
    pub name: String,

    /// Street address or other free-form location
    #[validate(
        length(
            min = 5,
            max = 500,
            message = "Location must be between 5 and 500 characters"
        ),
        regex(
            path = "LOCATION_PATTERN",
            message = "Warehouse location contains some forbidden characters"
        )
    )]
    pub location: String,

    /// Storage capacity in cubic meters
    #[validate(range(min = 1, message = "Capacity must be greater than 0"))]
    pub capacity_m3: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Volume occupied by `products`: the sum of quantity times per-unit volume.
pub fn used_space_m3<'a, I>(products: I) -> f64
where
    I: IntoIterator<Item = &'a product::Model>,
{
    products.into_iter().map(product::Model::total_volume_m3).sum()
}

/// Percentage of `capacity_m3` taken by `used_space_m3`; 0 when there is no capacity.
pub fn utilization_percentage(capacity_m3: i32, used_space_m3: f64) -> f64 {
    if capacity_m3 > 0 {
        used_space_m3 / f64::from(capacity_m3) * 100.0
    } else {
        0.0
    }
}

impl Model {
    pub fn free_space_m3(&self, used_space_m3: f64) -> f64 {
        f64::from(self.capacity_m3) - used_space_m3
    }
}
