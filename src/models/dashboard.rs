use std::collections::HashMap;

use serde::Serialize;

use crate::entities::{product, warehouse};
use crate::models::inventory::ProductWithWarehouse;

/// Utilization above which the dashboard reports a warehouse as critical.
///
/// Not the same as [`warehouse::CRITICAL_CAPACITY_PERCENT`] (95 %, inclusive).
pub const DASHBOARD_CRITICAL_UTILIZATION_PERCENT: f64 = 80.0;

/// Point-in-time summary of every warehouse and product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardStatistics {
    pub total_warehouses: usize,
    pub total_products: usize,
    pub low_stock_items: usize,
    pub critical_capacity_warehouses: usize,
    pub average_warehouse_utilization: f64,
    pub warehouse_capacities: Vec<WarehouseCapacity>,
    pub products_by_warehouse: Vec<ProductDistribution>,
    pub low_stock_products: Vec<LowStockProduct>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WarehouseCapacity {
    pub warehouse_id: i32,
    pub warehouse_name: String,
    pub current_products: usize,
    pub capacity_m3: i32,
    pub utilization_percentage: f64,
    /// Only when utilization is over 80 %
    pub is_critical: bool,
    pub volume_occupied_m3: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductDistribution {
    pub warehouse_name: String,
    pub product_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LowStockProduct {
    pub product_name: String,
    pub sku: String,
    pub current_quantity: i32,
    pub minimum_quantity: i32,
    pub warehouse_name: String,
}

impl DashboardStatistics {
    /// Aggregates the given snapshots. Warehouse rows keep `warehouses` order,
    /// low-stock rows keep `products` order.
    pub fn compute(warehouses: &[warehouse::Model], products: &[ProductWithWarehouse]) -> Self {
        let mut by_warehouse: HashMap<i32, Vec<&product::Model>> = HashMap::new();
        for row in products {
            by_warehouse
                .entry(row.product.warehouse_id)
                .or_default()
                .push(&row.product);
        }

        let warehouse_capacities: Vec<WarehouseCapacity> = warehouses
            .iter()
            .map(|w| {
                let held = by_warehouse.get(&w.id).map(Vec::as_slice).unwrap_or(&[]);
                let volume_occupied_m3 = warehouse::used_space_m3(held.iter().copied());
                let utilization_percentage =
                    warehouse::utilization_percentage(w.capacity_m3, volume_occupied_m3);

                WarehouseCapacity {
                    warehouse_id: w.id,
                    warehouse_name: w.name.clone(),
                    current_products: held.len(),
                    capacity_m3: w.capacity_m3,
                    utilization_percentage,
                    is_critical: utilization_percentage > DASHBOARD_CRITICAL_UTILIZATION_PERCENT,
                    volume_occupied_m3,
                }
            })
            .collect();

        let average_warehouse_utilization = if warehouse_capacities.is_empty() {
            0.0
        } else {
            warehouse_capacities
                .iter()
                .map(|c| c.utilization_percentage)
                .sum::<f64>()
                / warehouse_capacities.len() as f64
        };

        let products_by_warehouse = warehouse_capacities
            .iter()
            .map(|c| ProductDistribution {
                warehouse_name: c.warehouse_name.clone(),
                product_count: c.current_products,
            })
            .collect();

        let low_stock_products: Vec<LowStockProduct> = products
            .iter()
            .filter(|row| row.product.is_low_stock())
            .map(|row| LowStockProduct {
                product_name: row.product.name.clone(),
                sku: row.product.sku.clone(),
                current_quantity: row.product.quantity,
                minimum_quantity: row.product.minimum_quantity,
                warehouse_name: row.warehouse_name().to_string(),
            })
            .collect();

        Self {
            total_warehouses: warehouses.len(),
            total_products: products.len(),
            low_stock_items: low_stock_products.len(),
            critical_capacity_warehouses: warehouse_capacities
                .iter()
                .filter(|c| c.is_critical)
                .count(),
            average_warehouse_utilization,
            warehouse_capacities,
            products_by_warehouse,
            low_stock_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn warehouse(id: i32, name: &str, capacity_m3: i32) -> warehouse::Model {
        warehouse::Model {
            id,
            name: name.into(),
            location: "Jasionka, ul.Lotnicza 6".into(),
            capacity_m3,
        }
    }

    fn stocked(
        id: i32,
        owner: Option<&warehouse::Model>,
        warehouse_id: i32,
        quantity: i32,
        minimum_quantity: i32,
        volume_per_unit_m3: f64,
    ) -> ProductWithWarehouse {
        ProductWithWarehouse {
            product: product::Model {
                id,
                name: format!("Product {id}"),
                sku: format!("SKU-{id}"),
                quantity,
                minimum_quantity,
                volume_per_unit_m3,
                warehouse_id,
            },
            warehouse: owner.cloned(),
        }
    }

    #[test]
    fn half_full_and_empty_warehouse_average_to_twenty_five() {
        let a = warehouse(1, "A", 100);
        let b = warehouse(2, "B", 100);
        let products = vec![stocked(1, Some(&a), 1, 50, 1, 1.0)];

        let stats = DashboardStatistics::compute(&[a, b], &products);

        assert_eq!(stats.total_warehouses, 2);
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.low_stock_items, 0);
        assert_eq!(stats.warehouse_capacities[0].utilization_percentage, 50.0);
        assert_eq!(stats.warehouse_capacities[1].utilization_percentage, 0.0);
        assert_eq!(stats.average_warehouse_utilization, 25.0);
        assert_eq!(stats.critical_capacity_warehouses, 0);
        assert_eq!(
            stats.products_by_warehouse,
            vec![
                ProductDistribution {
                    warehouse_name: "A".into(),
                    product_count: 1
                },
                ProductDistribution {
                    warehouse_name: "B".into(),
                    product_count: 0
                },
            ]
        );
    }

    #[test]
    fn critical_means_strictly_above_eighty_percent() {
        let exactly = warehouse(1, "Exactly", 100);
        let over = warehouse(2, "Over", 100);
        let products = vec![
            stocked(1, Some(&exactly), 1, 80, 0, 1.0),
            stocked(2, Some(&over), 2, 81, 0, 1.0),
        ];

        let stats = DashboardStatistics::compute(&[exactly, over], &products);

        assert!(!stats.warehouse_capacities[0].is_critical);
        assert!(stats.warehouse_capacities[1].is_critical);
        assert_eq!(stats.critical_capacity_warehouses, 1);
    }

    #[test]
    fn low_stock_rows_name_their_warehouse_or_unknown() {
        let main = warehouse(1, "Main Warehouse", 10_000);
        let products = vec![
            stocked(1, Some(&main), 1, 12, 20, 1.0),
            stocked(2, Some(&main), 1, 36, 5, 1.0),
            stocked(3, None, 9, 0, 1, 1.0),
        ];

        let stats = DashboardStatistics::compute(&[main], &products);

        assert_eq!(stats.low_stock_items, 2);
        assert_eq!(stats.low_stock_products[0].sku, "SKU-1");
        assert_eq!(stats.low_stock_products[0].current_quantity, 12);
        assert_eq!(stats.low_stock_products[0].minimum_quantity, 20);
        assert_eq!(stats.low_stock_products[0].warehouse_name, "Main Warehouse");
        assert_eq!(stats.low_stock_products[1].warehouse_name, "Unknown");
    }

    #[test]
    fn zero_capacity_reports_zero_utilization() {
        let broken = warehouse(1, "Broken", 0);
        let products = vec![stocked(1, Some(&broken), 1, 10, 1, 1.0)];

        let stats = DashboardStatistics::compute(&[broken], &products);

        assert_eq!(stats.warehouse_capacities[0].volume_occupied_m3, 10.0);
        assert_eq!(stats.warehouse_capacities[0].utilization_percentage, 0.0);
        assert!(!stats.warehouse_capacities[0].is_critical);
    }

    #[test]
    fn no_warehouses_means_zero_average() {
        let stats = DashboardStatistics::compute(&[], &[]);
        assert_eq!(stats.average_warehouse_utilization, 0.0);
        assert!(stats.warehouse_capacities.is_empty());
        assert!(stats.low_stock_products.is_empty());
    }

    proptest! {
        #[test]
        fn average_lies_between_extremes(
            loads in proptest::collection::vec((1i32..5_000, 0i32..5_000), 1..8)
        ) {
            let warehouses: Vec<_> = loads
                .iter()
                .enumerate()
                .map(|(i, (cap, _))| warehouse(i as i32 + 1, "W", *cap))
                .collect();
            let products: Vec<_> = loads
                .iter()
                .enumerate()
                .map(|(i, (_, qty))| stocked(i as i32 + 1, warehouses.get(i), i as i32 + 1, *qty, 0, 1.0))
                .collect();

            let stats = DashboardStatistics::compute(&warehouses, &products);
            let utilizations: Vec<f64> = stats
                .warehouse_capacities
                .iter()
                .map(|c| c.utilization_percentage)
                .collect();
            let min = utilizations.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = utilizations.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            prop_assert_eq!(stats.total_products, loads.len());
            prop_assert!(stats.average_warehouse_utilization >= min - 1e-9);
            prop_assert!(stats.average_warehouse_utilization <= max + 1e-9);
        }
    }
}
