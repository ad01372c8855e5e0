//! Bronzegen Core
//!
//! Domain model for bronze-layer view generation: table schemas as reported
//! by the warehouse, per-table column configurations, and the naming rule
//! that derives a bronze dataset from its source dataset.

pub mod config;
pub mod fs;
pub mod naming;
pub mod schema;

pub use config::{ColumnConfig, ConfigError, ConfigStore, Selector};
pub use naming::bronze_dataset_name;
pub use schema::{Column, TableSchema};
