use once_cell::sync::Lazy;
use regex::Regex;

pub mod product;
pub mod warehouse;

pub use product::{Entity as Product, Model as ProductModel};
pub use warehouse::{Entity as Warehouse, Model as WarehouseModel};

/// Names may not contain any of `! @ # $ % ^ & * ( ) { } [ ] < > ? / \`.
pub(crate) static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^!@#$%^&*(){}\[\]<>?/\\]+$").expect("valid name pattern"));

/// Same forbidden set as names, except square brackets are allowed.
pub(crate) static LOCATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^!@#$%^&*(){}<>?/\\]+$").expect("valid location pattern"));

/// Uppercase letters, digits and hyphens only.
pub(crate) static SKU_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9\-]+$").expect("valid SKU pattern"));
