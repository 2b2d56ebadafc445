use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::entities::{product, warehouse};

/// Name reported for a product whose warehouse could not be resolved.
pub const UNKNOWN_WAREHOUSE: &str = "Unknown";

/// A product together with its owning warehouse, resolved at read time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductWithWarehouse {
    #[serde(flatten)]
    pub product: product::Model,
    pub warehouse: Option<warehouse::Model>,
}

impl ProductWithWarehouse {
    pub fn warehouse_name(&self) -> &str {
        self.warehouse
            .as_ref()
            .map(|w| w.name.as_str())
            .unwrap_or(UNKNOWN_WAREHOUSE)
    }
}

impl From<(product::Model, Option<warehouse::Model>)> for ProductWithWarehouse {
    fn from((product, warehouse): (product::Model, Option<warehouse::Model>)) -> Self {
        Self { product, warehouse }
    }
}

/// A warehouse together with every product it holds; the basis for the
/// per-warehouse space metrics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WarehouseWithProducts {
    #[serde(flatten)]
    pub warehouse: warehouse::Model,
    pub products: Vec<product::Model>,
}

impl WarehouseWithProducts {
    pub fn used_space_m3(&self) -> f64 {
        warehouse::used_space_m3(&self.products)
    }

    pub fn free_space_m3(&self) -> f64 {
        self.warehouse.free_space_m3(self.used_space_m3())
    }

    pub fn utilization_percentage(&self) -> f64 {
        warehouse::utilization_percentage(self.warehouse.capacity_m3, self.used_space_m3())
    }

    pub fn is_near_capacity(&self) -> bool {
        self.utilization_percentage() >= warehouse::NEAR_CAPACITY_PERCENT
    }

    pub fn is_critical_capacity(&self) -> bool {
        self.utilization_percentage() >= warehouse::CRITICAL_CAPACITY_PERCENT
    }
}

impl From<(warehouse::Model, Vec<product::Model>)> for WarehouseWithProducts {
    fn from((warehouse, products): (warehouse::Model, Vec<product::Model>)) -> Self {
        Self {
            warehouse,
            products,
        }
    }
}

/// Input for creating a warehouse; the id is assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewWarehouse {
    pub name: String,
    pub location: String,
    pub capacity_m3: i32,
}

impl NewWarehouse {
    pub fn new(name: impl Into<String>, location: impl Into<String>, capacity_m3: i32) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            capacity_m3,
        }
    }

    /// Unsaved model (id 0) used for validation.
    pub fn to_model(&self) -> warehouse::Model {
        warehouse::Model {
            id: 0,
            name: self.name.clone(),
            location: self.location.clone(),
            capacity_m3: self.capacity_m3,
        }
    }

    pub fn into_active_model(self) -> warehouse::ActiveModel {
        warehouse::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            location: Set(self.location),
            capacity_m3: Set(self.capacity_m3),
        }
    }
}

/// Input for creating a product; the id is assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    #[serde(default = "default_minimum_quantity")]
    pub minimum_quantity: i32,
    #[serde(default = "default_volume_per_unit_m3")]
    pub volume_per_unit_m3: f64,
    pub warehouse_id: i32,
}

fn default_minimum_quantity() -> i32 {
    product::DEFAULT_MINIMUM_QUANTITY
}

fn default_volume_per_unit_m3() -> f64 {
    product::DEFAULT_VOLUME_PER_UNIT_M3
}

impl NewProduct {
    /// Product with zero quantity and the default minimum quantity and volume.
    pub fn new(name: impl Into<String>, sku: impl Into<String>, warehouse_id: i32) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            quantity: 0,
            minimum_quantity: product::DEFAULT_MINIMUM_QUANTITY,
            volume_per_unit_m3: product::DEFAULT_VOLUME_PER_UNIT_M3,
            warehouse_id,
        }
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_minimum_quantity(mut self, minimum_quantity: i32) -> Self {
        self.minimum_quantity = minimum_quantity;
        self
    }

    pub fn with_volume_per_unit_m3(mut self, volume_per_unit_m3: f64) -> Self {
        self.volume_per_unit_m3 = volume_per_unit_m3;
        self
    }

    /// Unsaved model (id 0) used for validation.
    pub fn to_model(&self) -> product::Model {
        product::Model {
            id: 0,
            name: self.name.clone(),
            sku: self.sku.clone(),
            quantity: self.quantity,
            minimum_quantity: self.minimum_quantity,
            volume_per_unit_m3: self.volume_per_unit_m3,
            warehouse_id: self.warehouse_id,
        }
    }

    pub fn into_active_model(self) -> product::ActiveModel {
        product::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            sku: Set(self.sku),
            quantity: Set(self.quantity),
            minimum_quantity: Set(self.minimum_quantity),
            volume_per_unit_m3: Set(self.volume_per_unit_m3),
            warehouse_id: Set(self.warehouse_id),
        }
    }
}

/// Active model that writes every column of `model` to the row with its id.
pub(crate) fn product_update(model: &product::Model) -> product::ActiveModel {
    product::ActiveModel {
        id: Unchanged(model.id),
        name: Set(model.name.clone()),
        sku: Set(model.sku.clone()),
        quantity: Set(model.quantity),
        minimum_quantity: Set(model.minimum_quantity),
        volume_per_unit_m3: Set(model.volume_per_unit_m3),
        warehouse_id: Set(model.warehouse_id),
    }
}

/// Active model that writes every column of `model` to the row with its id.
pub(crate) fn warehouse_update(model: &warehouse::Model) -> warehouse::ActiveModel {
    warehouse::ActiveModel {
        id: Unchanged(model.id),
        name: Set(model.name.clone()),
        location: Set(model.location.clone()),
        capacity_m3: Set(model.capacity_m3),
    }
}
