//! Mock warehouse client for testing
//!
//! Returns canned catalog listings, schemas, previews and errors without
//! connecting anywhere. Used by the engine tests and for demos without real
//! credentials.

use crate::client::{ColumnStats, GatewayError, TablePreview, ValueCount, WarehouseClient};
use bronzegen_core::TableSchema;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

fn table_key(dataset_id: &str, table_id: &str) -> String {
    format!("{}.{}", dataset_id, table_id)
}

fn column_key(dataset_id: &str, table_id: &str, column: &str) -> String {
    format!("{}.{}.{}", dataset_id, table_id, column)
}

/// In-memory mock warehouse
///
/// Clones share state, so a test can keep a handle for assertions while the
/// engine owns another.
#[derive(Clone, Default)]
pub struct MockWarehouse {
    schemas: Arc<RwLock<HashMap<String, TableSchema>>>,
    samples: Arc<RwLock<HashMap<String, Vec<String>>>>,
    value_counts: Arc<RwLock<HashMap<String, Vec<ValueCount>>>>,
    stats: Arc<RwLock<HashMap<String, ColumnStats>>>,
    previews: Arc<RwLock<HashMap<String, TablePreview>>>,
    preview_errors: Arc<RwLock<HashMap<String, GatewayError>>>,
    executed: Arc<RwLock<Vec<String>>>,
    execute_error: Arc<RwLock<Option<GatewayError>>>,
    fail_connection: bool,
}

impl MockWarehouse {
    /// Create a mock with no canned data
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure all connection tests to fail
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Register a table schema (the dataset and table also appear in the
    /// catalog listings)
    pub async fn add_schema(&self, dataset_id: &str, table_id: &str, schema: TableSchema) {
        self.schemas
            .write()
            .await
            .insert(table_key(dataset_id, table_id), schema);
    }

    /// Register sample values for a column
    pub async fn add_samples(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
        samples: Vec<String>,
    ) {
        self.samples
            .write()
            .await
            .insert(column_key(dataset_id, table_id, column), samples);
    }

    /// Register value counts for a column
    pub async fn add_value_counts(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
        counts: Vec<ValueCount>,
    ) {
        self.value_counts
            .write()
            .await
            .insert(column_key(dataset_id, table_id, column), counts);
    }

    /// Register statistics for a column
    pub async fn add_stats(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
        stats: ColumnStats,
    ) {
        self.stats
            .write()
            .await
            .insert(column_key(dataset_id, table_id, column), stats);
    }

    /// Register a preview for a qualified view or table name
    pub async fn add_preview(&self, qualified_name: &str, preview: TablePreview) {
        self.previews
            .write()
            .await
            .insert(qualified_name.to_string(), preview);
    }

    /// Register a preview failure for a qualified name
    pub async fn add_preview_error(&self, qualified_name: &str, error: GatewayError) {
        self.preview_errors
            .write()
            .await
            .insert(qualified_name.to_string(), error);
    }

    /// Make every execute_query call fail with `error`
    pub async fn set_execute_error(&self, error: GatewayError) {
        *self.execute_error.write().await = Some(error);
    }

    /// SQL statements executed so far, in order
    pub async fn executed_queries(&self) -> Vec<String> {
        self.executed.read().await.clone()
    }
}

#[async_trait::async_trait]
impl WarehouseClient for MockWarehouse {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn list_datasets(&self) -> Result<Vec<String>, GatewayError> {
        let mut datasets: Vec<String> = self
            .schemas
            .read()
            .await
            .keys()
            .filter_map(|key| key.split('.').next().map(str::to_string))
            .collect();
        datasets.sort();
        datasets.dedup();
        Ok(datasets)
    }

    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<String>, GatewayError> {
        let prefix = format!("{}.", dataset_id);
        let mut tables: Vec<String> = self
            .schemas
            .read()
            .await
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        tables.sort();
        Ok(tables)
    }

    async fn table_schema(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableSchema, GatewayError> {
        self.schemas
            .read()
            .await
            .get(&table_key(dataset_id, table_id))
            .cloned()
            .ok_or_else(|| GatewayError::TableNotFound(table_key(dataset_id, table_id)))
    }

    async fn sample_values(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .samples
            .read()
            .await
            .get(&column_key(dataset_id, table_id, column))
            .cloned()
            .unwrap_or_default())
    }

    async fn value_counts(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<ValueCount>, GatewayError> {
        Ok(self
            .value_counts
            .read()
            .await
            .get(&column_key(dataset_id, table_id, column))
            .cloned()
            .unwrap_or_default())
    }

    async fn column_stats(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<ColumnStats, GatewayError> {
        self.stats
            .read()
            .await
            .get(&column_key(dataset_id, table_id, column))
            .cloned()
            .ok_or_else(|| {
                GatewayError::Query(format!(
                    "No statistics configured for {}",
                    column_key(dataset_id, table_id, column)
                ))
            })
    }

    async fn execute_query(&self, sql: &str) -> Result<String, GatewayError> {
        if let Some(error) = self.execute_error.read().await.clone() {
            return Err(error);
        }

        let mut executed = self.executed.write().await;
        executed.push(sql.to_string());
        Ok(format!(
            "Query executed successfully. Job ID: mock-job-{}",
            executed.len()
        ))
    }

    async fn preview_table(
        &self,
        qualified_name: &str,
        _limit: u32,
    ) -> Result<TablePreview, GatewayError> {
        if let Some(error) = self.preview_errors.read().await.get(qualified_name) {
            return Err(error.clone());
        }

        self.previews
            .read()
            .await
            .get(qualified_name)
            .cloned()
            .ok_or_else(|| GatewayError::TableNotFound(qualified_name.to_string()))
    }

    async fn test_connection(&self) -> Result<(), GatewayError> {
        if self.fail_connection {
            Err(GatewayError::Network(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
