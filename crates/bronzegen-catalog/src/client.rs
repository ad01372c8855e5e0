//! Warehouse client trait and gateway result types

use bronzegen_core::TableSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Errors surfaced by warehouse operations
///
/// Every variant renders to a human-readable string; gateway failures are
/// reported, never allowed to take the process down.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A distinct column value with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Basic per-column statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub total_count: i64,
    pub null_count: i64,
    pub empty_string_count: i64,

    /// Percentage of non-null rows, rounded to two decimals; 0 for an empty
    /// table.
    pub not_null_percent: f64,
}

impl ColumnStats {
    /// Derive the not-null percentage from raw counts
    pub fn from_counts(total_count: i64, null_count: i64, empty_string_count: i64) -> Self {
        let not_null_percent = if total_count > 0 {
            let raw = 100.0 * (total_count - null_count) as f64 / total_count as f64;
            (raw * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self {
            total_count,
            null_count,
            empty_string_count,
            not_null_percent,
        }
    }
}

/// A structured row preview of a table or view
///
/// `columns` carries the result's column order; row values are stringified
/// for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TablePreview {
    /// Column names in result order
    pub columns: Vec<String>,

    /// Column name to warehouse type string
    pub column_types: HashMap<String, String>,

    /// Stringified row values keyed by column name
    pub rows: Vec<BTreeMap<String, String>>,
}

impl TablePreview {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Type string for a column, or `UNKNOWN`
    pub fn column_type(&self, column: &str) -> &str {
        self.column_types
            .get(column)
            .map(String::as_str)
            .unwrap_or("UNKNOWN")
    }
}

/// Trait for warehouse clients
///
/// All operations are potentially failing remote calls; errors come back as
/// `GatewayError` values and stop at the orchestration boundary.
#[async_trait::async_trait]
pub trait WarehouseClient: Send + Sync {
    /// The client name (e.g. "BigQuery")
    fn name(&self) -> &'static str;

    /// List dataset identifiers visible to the client
    async fn list_datasets(&self) -> Result<Vec<String>, GatewayError>;

    /// List table identifiers in a dataset
    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<String>, GatewayError>;

    /// Fetch the ordered column schema of a table
    async fn table_schema(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableSchema, GatewayError>;

    /// Up to 3 random non-empty sample values from a column
    async fn sample_values(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<String>, GatewayError>;

    /// Up to 3 most common values of a column with their counts
    async fn value_counts(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<ValueCount>, GatewayError>;

    /// Basic statistics for a column
    async fn column_stats(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<ColumnStats, GatewayError>;

    /// Execute a SQL statement, returning a success message
    async fn execute_query(&self, sql: &str) -> Result<String, GatewayError>;

    /// Preview the first `limit` rows of a qualified table or view name
    async fn preview_table(
        &self,
        qualified_name: &str,
        limit: u32,
    ) -> Result<TablePreview, GatewayError>;

    /// Validate credentials and connectivity
    async fn test_connection(&self) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_percentage_rounding() {
        let stats = ColumnStats::from_counts(3, 1, 0);
        assert_eq!(stats.not_null_percent, 66.67);

        let stats = ColumnStats::from_counts(10, 0, 2);
        assert_eq!(stats.not_null_percent, 100.0);
    }

    #[test]
    fn stats_empty_table() {
        let stats = ColumnStats::from_counts(0, 0, 0);
        assert_eq!(stats.not_null_percent, 0.0);
    }

    #[test]
    fn preview_column_type_fallback() {
        let preview = TablePreview::default();
        assert_eq!(preview.column_type("missing"), "UNKNOWN");
    }
}
