//! Warehouse Manager Library
//!
//! Data-access layer for a small warehouse/product inventory: sea-orm entities,
//! a TTL snapshot cache, the [`services::inventory::InventoryService`] that
//! enforces the inventory invariants, and dashboard statistics.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

pub use errors::ServiceError;
pub use services::inventory::InventoryService;
