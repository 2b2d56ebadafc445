// Service-level views over the entities
pub mod dashboard;
pub mod inventory;

pub use dashboard::{DashboardStatistics, LowStockProduct, ProductDistribution, WarehouseCapacity};
pub use inventory::{NewProduct, NewWarehouse, ProductWithWarehouse, WarehouseWithProducts};
