//! Built-in template bodies
//!
//! Written into the template directory on first run only; operator edits to
//! the stored files are never overwritten.

/// The base view template. Placeholders: `source_dataset`, `bronze_dataset`,
/// `table_name`, `columns`.
pub const BASE: &str = "-- Create the bronze dataset if it doesn't exist
CREATE SCHEMA IF NOT EXISTS `{bronze_dataset}`
OPTIONS (
  location = 'US'
);

-- Create or replace the view
CREATE OR REPLACE VIEW `{bronze_dataset}.{table_name}` AS
SELECT
{columns}
FROM `{source_dataset}.{table_name}`";

/// Column templates, each with the single `column_name` placeholder.
pub const STRING: &str = "CAST({column_name} AS STRING) AS {column_name}";
pub const INT: &str = "CAST({column_name} AS INT64) AS {column_name}";
pub const FLOAT: &str = "CAST({column_name} AS FLOAT64) AS {column_name}";
pub const TIMESTAMP: &str = "TIMESTAMP({column_name}) AS {column_name}";
pub const DATE: &str = "DATE({column_name}) AS {column_name}";

/// All built-in (name, body) pairs keyed by storage name
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base", BASE),
    ("string", STRING),
    ("int", INT),
    ("float", FLOAT),
    ("timestamp", TIMESTAMP),
    ("date", DATE),
];
