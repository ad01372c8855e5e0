//! Warehouse gateway for bronzegen
//!
//! This crate provides the `WarehouseClient` trait the rest of the tool
//! talks to, a BigQuery implementation, and an in-memory mock for tests.
//!
//! ## Features
//!
//! BigQuery support is compiled behind the `bigquery` cargo feature; without
//! it the adapter's operations return a configuration error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bronzegen_catalog::{BigQueryWarehouse, WarehouseClient};
//!
//! let warehouse = BigQueryWarehouse::from_service_account_file("creds.json").await?;
//! let schema = warehouse.table_schema("sales_raw", "orders").await?;
//! ```

pub mod bigquery;
pub mod client;
pub mod mock;

pub use bigquery::BigQueryWarehouse;
pub use client::{ColumnStats, GatewayError, TablePreview, ValueCount, WarehouseClient};
pub use mock::MockWarehouse;
