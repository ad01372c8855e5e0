//! BigQuery warehouse client using `gcp-bigquery-client`
//!
//! Schema and catalog listings go through INFORMATION_SCHEMA job queries.
//! Required IAM permissions:
//! - bigquery.jobs.create
//! - bigquery.tables.get / bigquery.tables.getData
//!
//! ## Authentication
//!
//! 1. Service account JSON key file (the project id is read from the key)
//! 2. Application Default Credentials (ADC) with an explicit project id
//!
//! ```rust,ignore
//! // Using a service account file
//! let warehouse = BigQueryWarehouse::from_service_account_file("sa.json").await?;
//!
//! // Using ADC
//! let warehouse = BigQueryWarehouse::with_adc("my-project").await?;
//! ```

use crate::client::{ColumnStats, GatewayError, TablePreview, ValueCount, WarehouseClient};
use bronzegen_core::TableSchema;

#[cfg(feature = "bigquery")]
use bronzegen_core::Column;
#[cfg(feature = "bigquery")]
use gcp_bigquery_client::{
    model::query_request::QueryRequest, model::query_response::QueryResponse,
    model::query_response::ResultSet, Client as BigQueryClient,
};

/// BigQuery warehouse client
pub struct BigQueryWarehouse {
    /// Project ID
    project_id: String,

    /// BigQuery client (only available with the bigquery feature)
    #[cfg(feature = "bigquery")]
    client: BigQueryClient,

    /// Placeholder for when the feature is disabled
    #[cfg(not(feature = "bigquery"))]
    _phantom: std::marker::PhantomData<()>,
}

#[cfg(not(feature = "bigquery"))]
fn feature_missing() -> GatewayError {
    GatewayError::Config(
        "BigQuery support not compiled. Rebuild with: cargo build --features bigquery".to_string(),
    )
}

impl BigQueryWarehouse {
    /// Create a client using Application Default Credentials (ADC)
    ///
    /// ADC detects credentials from GOOGLE_APPLICATION_CREDENTIALS, the
    /// gcloud CLI, or the GCE/GKE metadata service.
    #[cfg(feature = "bigquery")]
    pub async fn with_adc(project_id: impl Into<String>) -> Result<Self, GatewayError> {
        let project_id = project_id.into();

        let client = BigQueryClient::from_application_default_credentials()
            .await
            .map_err(|e| {
                GatewayError::Authentication(format!(
                    "Failed to authenticate with ADC: {}. \
                     Ensure GOOGLE_APPLICATION_CREDENTIALS is set or run \
                     'gcloud auth application-default login'",
                    e
                ))
            })?;

        Ok(Self { project_id, client })
    }

    #[cfg(not(feature = "bigquery"))]
    pub async fn with_adc(project_id: impl Into<String>) -> Result<Self, GatewayError> {
        let _ = project_id;
        Err(feature_missing())
    }

    /// Create a client from a service account key file.
    ///
    /// The project id is taken from the key file itself.
    #[cfg(feature = "bigquery")]
    pub async fn from_service_account_file(
        key_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, GatewayError> {
        let key_path_str = key_path.as_ref().to_string_lossy().to_string();

        let key_json = std::fs::read_to_string(key_path.as_ref()).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to read service account key file '{}': {}",
                key_path_str, e
            ))
        })?;
        let key_value: serde_json::Value = serde_json::from_str(&key_json).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to parse service account key file '{}': {}",
                key_path_str, e
            ))
        })?;
        let project_id = key_value
            .get("project_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                GatewayError::Config(format!(
                    "Service account key file '{}' has no project_id",
                    key_path_str
                ))
            })?
            .to_string();

        let client = BigQueryClient::from_service_account_key_file(&key_path_str)
            .await
            .map_err(|e| {
                GatewayError::Authentication(format!(
                    "Failed to authenticate with service account key '{}': {}",
                    key_path_str, e
                ))
            })?;

        Ok(Self { project_id, client })
    }

    #[cfg(not(feature = "bigquery"))]
    pub async fn from_service_account_file(
        key_path: impl AsRef<std::path::Path>,
    ) -> Result<Self, GatewayError> {
        let _ = key_path;
        Err(feature_missing())
    }

    /// The project this client operates in
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[cfg(feature = "bigquery")]
    async fn run_query(&self, sql: String) -> Result<QueryResponse, GatewayError> {
        let request = QueryRequest::new(sql);
        self.client
            .job()
            .query(&self.project_id, request)
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                if err_str.contains("Not found") {
                    GatewayError::TableNotFound(err_str)
                } else if err_str.contains("Access Denied") || err_str.contains("Permission") {
                    GatewayError::PermissionDenied(err_str)
                } else {
                    GatewayError::Query(err_str)
                }
            })
    }

    /// Collect a single string column from a query's result set
    #[cfg(feature = "bigquery")]
    async fn query_string_column(
        &self,
        sql: String,
        column: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let response = self.run_query(sql).await?;
        let mut rs = ResultSet::new_from_query_response(response);

        let mut values = Vec::new();
        while rs.next_row() {
            let value = rs
                .get_string_by_name(column)
                .map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to get {}: {}", column, e))
                })?
                .unwrap_or_default();
            values.push(value);
        }
        Ok(values)
    }
}

#[cfg(feature = "bigquery")]
fn cell_to_string(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "NULL".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(feature = "bigquery")]
fn parse_count(value: Option<String>, column: &str) -> Result<i64, GatewayError> {
    value
        .unwrap_or_default()
        .parse::<i64>()
        .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse {}: {}", column, e)))
}

#[cfg(feature = "bigquery")]
#[async_trait::async_trait]
impl WarehouseClient for BigQueryWarehouse {
    fn name(&self) -> &'static str {
        "BigQuery"
    }

    async fn list_datasets(&self) -> Result<Vec<String>, GatewayError> {
        let sql = format!(
            "SELECT schema_name FROM `{}`.INFORMATION_SCHEMA.SCHEMATA ORDER BY schema_name",
            self.project_id
        );
        self.query_string_column(sql, "schema_name").await
    }

    async fn list_tables(&self, dataset_id: &str) -> Result<Vec<String>, GatewayError> {
        let sql = format!(
            "SELECT table_name FROM `{}.{}`.INFORMATION_SCHEMA.TABLES ORDER BY table_name",
            self.project_id, dataset_id
        );
        self.query_string_column(sql, "table_name").await
    }

    async fn table_schema(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<TableSchema, GatewayError> {
        let sql = format!(
            r#"
            SELECT
                column_name,
                data_type
            FROM `{}.{}.INFORMATION_SCHEMA.COLUMNS`
            WHERE table_name = '{}'
            ORDER BY ordinal_position
            "#,
            self.project_id, dataset_id, table_id
        );

        let response = self.run_query(sql).await?;
        let mut rs = ResultSet::new_from_query_response(response);

        let mut columns = Vec::new();
        while rs.next_row() {
            let name = rs
                .get_string_by_name("column_name")
                .map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to get column_name: {}", e))
                })?
                .unwrap_or_default();
            let data_type = rs
                .get_string_by_name("data_type")
                .map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to get data_type: {}", e))
                })?
                .unwrap_or_else(|| "UNKNOWN".to_string());

            columns.push(Column::new(name, data_type));
        }

        if columns.is_empty() {
            return Err(GatewayError::TableNotFound(format!(
                "Table {}.{} not found or has no columns",
                dataset_id, table_id
            )));
        }

        Ok(TableSchema::from_columns(columns))
    }

    async fn sample_values(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let sql = format!(
            r#"
            SELECT {column} AS sample_value
            FROM `{project}.{dataset}.{table}`
            WHERE {column} IS NOT NULL
            AND TRIM(CAST({column} AS STRING)) != ''
            ORDER BY RAND()
            LIMIT 3
            "#,
            column = column,
            project = self.project_id,
            dataset = dataset_id,
            table = table_id
        );
        self.query_string_column(sql, "sample_value").await
    }

    async fn value_counts(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<Vec<ValueCount>, GatewayError> {
        let sql = format!(
            r#"
            SELECT
                CAST({column} AS STRING) AS value,
                COUNT(*) AS occurrences
            FROM `{project}.{dataset}.{table}`
            WHERE {column} IS NOT NULL
            GROUP BY value
            ORDER BY occurrences DESC
            LIMIT 3
            "#,
            column = column,
            project = self.project_id,
            dataset = dataset_id,
            table = table_id
        );

        let response = self.run_query(sql).await?;
        let mut rs = ResultSet::new_from_query_response(response);

        let mut counts = Vec::new();
        while rs.next_row() {
            let value = rs
                .get_string_by_name("value")
                .map_err(|e| GatewayError::InvalidResponse(format!("Failed to get value: {}", e)))?
                .unwrap_or_default();
            let count = parse_count(
                rs.get_string_by_name("occurrences").map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to get occurrences: {}", e))
                })?,
                "occurrences",
            )?;
            counts.push(ValueCount { value, count });
        }
        Ok(counts)
    }

    async fn column_stats(
        &self,
        dataset_id: &str,
        table_id: &str,
        column: &str,
    ) -> Result<ColumnStats, GatewayError> {
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total_count,
                COUNTIF({column} IS NULL) AS null_count,
                COUNTIF(CAST({column} AS STRING) = '') AS empty_string_count
            FROM `{project}.{dataset}.{table}`
            "#,
            column = column,
            project = self.project_id,
            dataset = dataset_id,
            table = table_id
        );

        let response = self.run_query(sql).await?;
        let mut rs = ResultSet::new_from_query_response(response);

        if !rs.next_row() {
            return Err(GatewayError::InvalidResponse(
                "Statistics query returned no rows".to_string(),
            ));
        }

        let total = parse_count(
            rs.get_string_by_name("total_count").map_err(|e| {
                GatewayError::InvalidResponse(format!("Failed to get total_count: {}", e))
            })?,
            "total_count",
        )?;
        let nulls = parse_count(
            rs.get_string_by_name("null_count").map_err(|e| {
                GatewayError::InvalidResponse(format!("Failed to get null_count: {}", e))
            })?,
            "null_count",
        )?;
        let empties = parse_count(
            rs.get_string_by_name("empty_string_count").map_err(|e| {
                GatewayError::InvalidResponse(format!("Failed to get empty_string_count: {}", e))
            })?,
            "empty_string_count",
        )?;

        Ok(ColumnStats::from_counts(total, nulls, empties))
    }

    async fn execute_query(&self, sql: &str) -> Result<String, GatewayError> {
        let response = self.run_query(sql.to_string()).await?;

        let job_id = response
            .job_reference
            .as_ref()
            .and_then(|reference| reference.job_id.clone())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(format!("Query executed successfully. Job ID: {}", job_id))
    }

    async fn preview_table(
        &self,
        qualified_name: &str,
        limit: u32,
    ) -> Result<TablePreview, GatewayError> {
        let sql = format!("SELECT * FROM `{}` LIMIT {}", qualified_name, limit);
        let response = self.run_query(sql).await?;

        let mut columns = Vec::new();
        let mut column_types = std::collections::HashMap::new();
        if let Some(schema) = &response.schema {
            if let Some(fields) = &schema.fields {
                for field in fields {
                    let type_name = format!("{:?}", field.r#type).to_uppercase();
                    columns.push(field.name.clone());
                    column_types.insert(field.name.clone(), type_name);
                }
            }
        }

        let mut rows = Vec::new();
        if let Some(response_rows) = &response.rows {
            for row in response_rows {
                let mut values = std::collections::BTreeMap::new();
                if let Some(cells) = &row.columns {
                    for (column, cell) in columns.iter().zip(cells) {
                        values.insert(column.clone(), cell_to_string(cell.value.as_ref()));
                    }
                }
                rows.push(values);
            }
        }

        Ok(TablePreview {
            columns,
            column_types,
            rows,
        })
    }

    async fn test_connection(&self) -> Result<(), GatewayError> {
        self.run_query("SELECT 1".to_string())
            .await
            .map_err(|e| GatewayError::Query(format!("Connection test failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(not(feature = "bigquery"))]
#[async_trait::async_trait]
impl WarehouseClient for BigQueryWarehouse {
    fn name(&self) -> &'static str {
        "BigQuery"
    }

    async fn list_datasets(&self) -> Result<Vec<String>, GatewayError> {
        Err(feature_missing())
    }

    async fn list_tables(&self, _dataset_id: &str) -> Result<Vec<String>, GatewayError> {
        Err(feature_missing())
    }

    async fn table_schema(
        &self,
        _dataset_id: &str,
        _table_id: &str,
    ) -> Result<TableSchema, GatewayError> {
        Err(feature_missing())
    }

    async fn sample_values(
        &self,
        _dataset_id: &str,
        _table_id: &str,
        _column: &str,
    ) -> Result<Vec<String>, GatewayError> {
        Err(feature_missing())
    }

    async fn value_counts(
        &self,
        _dataset_id: &str,
        _table_id: &str,
        _column: &str,
    ) -> Result<Vec<ValueCount>, GatewayError> {
        Err(feature_missing())
    }

    async fn column_stats(
        &self,
        _dataset_id: &str,
        _table_id: &str,
        _column: &str,
    ) -> Result<ColumnStats, GatewayError> {
        Err(feature_missing())
    }

    async fn execute_query(&self, _sql: &str) -> Result<String, GatewayError> {
        Err(feature_missing())
    }

    async fn preview_table(
        &self,
        _qualified_name: &str,
        _limit: u32,
    ) -> Result<TablePreview, GatewayError> {
        Err(feature_missing())
    }

    async fn test_connection(&self) -> Result<(), GatewayError> {
        Err(feature_missing())
    }
}
