use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use warehouse_manager::{
    config,
    db,
    entities::warehouse,
    models::{DashboardStatistics, NewProduct, NewWarehouse, ProductWithWarehouse},
    InventoryService,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let service = connect().await?;

    match cli.command {
        Commands::Init => handle_init(&service, cli.json).await?,
        Commands::Stats => handle_stats(&service, cli.json).await?,
        Commands::Warehouses(command) => {
            handle_warehouses_command(&service, command, cli.json).await?
        }
        Commands::Products(command) => handle_products_command(&service, command, cli.json).await?,
    }

    Ok(())
}

async fn connect() -> Result<InventoryService> {
    let config = config::load_config().context("failed to load application config")?;
    config::init_tracing(config.log_level(), config.log_json);

    let db_pool = db::establish_connection_from_app_config(&config)
        .await
        .context("failed to connect to database")?;

    let service = InventoryService::from_config(Arc::new(db_pool), &config);
    service
        .initialize()
        .await
        .context("failed to initialize inventory store")?;

    Ok(service)
}

#[derive(Parser)]
#[command(
    name = "warehouse-manager",
    about = "Manage warehouses and the products stored in them",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and seed an empty store
    Init,
    /// Show dashboard statistics
    Stats,
    #[command(subcommand)]
    Warehouses(WarehousesCommands),
    #[command(subcommand)]
    Products(ProductsCommands),
}

#[derive(Subcommand)]
enum WarehousesCommands {
    List,
    Show(IdArgs),
    Add(WarehouseAddArgs),
    Update(WarehouseUpdateArgs),
    Delete(IdArgs),
}

#[derive(Subcommand)]
enum ProductsCommands {
    List(ProductListArgs),
    Show(IdArgs),
    Add(ProductAddArgs),
    Update(ProductUpdateArgs),
    Delete(IdArgs),
}

#[derive(Args)]
struct IdArgs {
    id: i32,
}

#[derive(Args)]
struct WarehouseAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    location: String,
    #[arg(long, help = "Capacity in cubic meters")]
    capacity: i32,
}

#[derive(Args)]
struct WarehouseUpdateArgs {
    id: i32,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long, help = "Capacity in cubic meters")]
    capacity: Option<i32>,
}

#[derive(Args)]
struct ProductListArgs {
    #[arg(long, help = "Only products stored in this warehouse")]
    warehouse: Option<i32>,
}

#[derive(Args)]
struct ProductAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sku: String,
    #[arg(long, default_value_t = 0)]
    quantity: i32,
    #[arg(long, default_value_t = 1)]
    minimum_quantity: i32,
    #[arg(long, default_value_t = 1.0, help = "Volume of one unit in cubic meters")]
    volume: f64,
    #[arg(long)]
    warehouse: i32,
}

#[derive(Args)]
struct ProductUpdateArgs {
    id: i32,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    quantity: Option<i32>,
    #[arg(long)]
    minimum_quantity: Option<i32>,
    #[arg(long, help = "Volume of one unit in cubic meters")]
    volume: Option<f64>,
    #[arg(long)]
    warehouse: Option<i32>,
}

async fn handle_init(service: &InventoryService, json: bool) -> Result<()> {
    let warehouses = service.count_warehouses().await?;
    let products = service.count_products().await?;

    if json {
        print_json(&serde_json::json!({
            "warehouses": warehouses,
            "products": products,
        }))?;
    } else {
        println!(
            "Store ready: {} warehouses, {} products",
            warehouses, products
        );
    }

    Ok(())
}

async fn handle_stats(service: &InventoryService, json: bool) -> Result<()> {
    let stats = service.get_dashboard_statistics().await?;

    if json {
        print_json(&stats)?;
    } else {
        render_statistics(&stats);
    }

    Ok(())
}

async fn handle_warehouses_command(
    service: &InventoryService,
    command: WarehousesCommands,
    json: bool,
) -> Result<()> {
    match command {
        WarehousesCommands::List => {
            let warehouses = service.list_warehouses().await?;
            if json {
                print_json(&*warehouses)?;
            } else if warehouses.is_empty() {
                println!("No warehouses");
            } else {
                warehouses.iter().for_each(render_warehouse);
            }
        }
        WarehousesCommands::Show(args) => {
            let loaded = service
                .get_warehouse(args.id)
                .await?
                .ok_or_else(|| anyhow!("warehouse {} not found", args.id))?;
            if json {
                print_json(&loaded)?;
            } else {
                render_warehouse(&loaded.warehouse);
                println!(
                    "  used {:.2} m³ • free {:.2} m³ • {:.1}% full",
                    loaded.used_space_m3(),
                    loaded.free_space_m3(),
                    loaded.utilization_percentage()
                );
                for product in &loaded.products {
                    println!(
                        "  • {} [{}] qty {} (min {})",
                        product.name, product.sku, product.quantity, product.minimum_quantity
                    );
                }
            }
        }
        WarehousesCommands::Add(args) => {
            let created = service
                .add_warehouse(NewWarehouse::new(args.name, args.location, args.capacity))
                .await?;
            if json {
                print_json(&created)?;
            } else {
                println!("Created warehouse {}", created.id);
            }
        }
        WarehousesCommands::Update(args) => {
            let mut current = service
                .get_warehouse(args.id)
                .await?
                .ok_or_else(|| anyhow!("warehouse {} not found", args.id))?
                .warehouse;
            if let Some(name) = args.name {
                current.name = name;
            }
            if let Some(location) = args.location {
                current.location = location;
            }
            if let Some(capacity) = args.capacity {
                current.capacity_m3 = capacity;
            }

            let updated = service.update_warehouse(current).await?;
            if json {
                print_json(&updated)?;
            } else {
                println!("Updated warehouse {}", updated.id);
            }
        }
        WarehousesCommands::Delete(args) => {
            let removed = service.delete_warehouse(args.id).await?;
            if json {
                print_json(&serde_json::json!({
                    "deleted": removed.is_some(),
                    "removed_products": removed,
                }))?;
            } else {
                match removed {
                    Some(products) => println!(
                        "Deleted warehouse {} and {} product(s)",
                        args.id, products
                    ),
                    None => println!("Warehouse {} does not exist", args.id),
                }
            }
        }
    }

    Ok(())
}

async fn handle_products_command(
    service: &InventoryService,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    match command {
        ProductsCommands::List(args) => {
            let products = match args.warehouse {
                Some(warehouse_id) => service.list_products_in_warehouse(warehouse_id).await?,
                None => service.list_products().await?.to_vec(),
            };
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("No products");
            } else {
                products.iter().for_each(render_product);
            }
        }
        ProductsCommands::Show(args) => {
            let product = service
                .get_product(args.id)
                .await?
                .ok_or_else(|| anyhow!("product {} not found", args.id))?;
            if json {
                print_json(&product)?;
            } else {
                render_product(&product);
            }
        }
        ProductsCommands::Add(args) => {
            let new_product = NewProduct::new(args.name, args.sku, args.warehouse)
                .with_quantity(args.quantity)
                .with_minimum_quantity(args.minimum_quantity)
                .with_volume_per_unit_m3(args.volume);
            let created = service.add_product(new_product).await?;
            if json {
                print_json(&created)?;
            } else {
                println!("Created product {} ({})", created.id, created.sku);
            }
        }
        ProductsCommands::Update(args) => {
            let mut current = service
                .get_product(args.id)
                .await?
                .ok_or_else(|| anyhow!("product {} not found", args.id))?
                .product;
            if let Some(name) = args.name {
                current.name = name;
            }
            if let Some(sku) = args.sku {
                current.sku = sku;
            }
            if let Some(quantity) = args.quantity {
                current.quantity = quantity;
            }
            if let Some(minimum_quantity) = args.minimum_quantity {
                current.minimum_quantity = minimum_quantity;
            }
            if let Some(volume) = args.volume {
                current.volume_per_unit_m3 = volume;
            }
            if let Some(warehouse_id) = args.warehouse {
                current.warehouse_id = warehouse_id;
            }

            let updated = service.update_product(current).await?;
            if json {
                print_json(&updated)?;
            } else {
                println!("Updated product {} ({})", updated.id, updated.sku);
            }
        }
        ProductsCommands::Delete(args) => {
            let deleted = service.delete_product(args.id).await?;
            if json {
                print_json(&serde_json::json!({ "deleted": deleted }))?;
            } else if deleted {
                println!("Deleted product {}", args.id);
            } else {
                println!("Product {} does not exist", args.id);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_warehouse(warehouse: &warehouse::Model) {
    println!(
        "- Warehouse {} • {} • {} • {} m³",
        warehouse.id, warehouse.name, warehouse.location, warehouse.capacity_m3
    );
}

fn render_product(row: &ProductWithWarehouse) {
    let product = &row.product;
    let flag = if product.is_low_stock() { " LOW" } else { "" };
    println!(
        "- Product {} • {} [{}] • qty {} (min {}){} • {:.2} m³ • {}",
        product.id,
        product.name,
        product.sku,
        product.quantity,
        product.minimum_quantity,
        flag,
        product.total_volume_m3(),
        row.warehouse_name()
    );
}

fn render_statistics(stats: &DashboardStatistics) {
    println!(
        "Warehouses: {} • Products: {} • Low stock: {} • Critical: {}",
        stats.total_warehouses,
        stats.total_products,
        stats.low_stock_items,
        stats.critical_capacity_warehouses
    );
    println!(
        "Average utilization: {:.1}%",
        stats.average_warehouse_utilization
    );
    for capacity in &stats.warehouse_capacities {
        let flag = if capacity.is_critical { " CRITICAL" } else { "" };
        println!(
            "  • {} • {} product(s) • {:.2}/{} m³ • {:.1}%{}",
            capacity.warehouse_name,
            capacity.current_products,
            capacity.volume_occupied_m3,
            capacity.capacity_m3,
            capacity.utilization_percentage,
            flag
        );
    }
    if !stats.low_stock_products.is_empty() {
        println!("Low stock:");
        for item in &stats.low_stock_products {
            println!(
                "  • {} [{}] {} of {} in {}",
                item.product_name,
                item.sku,
                item.current_quantity,
                item.minimum_quantity,
                item.warehouse_name
            );
        }
    }
}
