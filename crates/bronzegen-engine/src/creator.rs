//! Creates warehouse views from stored SQL artifacts

use bronzegen_catalog::{TablePreview, WarehouseClient};
use bronzegen_sql::{extract_view_name, ArtifactError, ArtifactStore};

/// Rows fetched when previewing a freshly created view
const PREVIEW_LIMIT: u32 = 5;

/// View creation error types
///
/// Only conditions that prevent the view from existing are errors here;
/// everything after a successful execute is reported inside `ViewCreation`.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("SQL file for {dataset}.{table} not found")]
    SqlNotFound { dataset: String, table: String },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Error executing query: {0}")]
    Execution(String),
}

/// What happened to the post-creation preview
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Preview rows were fetched
    Loaded(TablePreview),

    /// The view exists but previewing it failed
    Failed(String),

    /// No preview was attempted because the view name could not be recovered
    Skipped,
}

/// Result of a successful view creation
///
/// `view_name` is `None` when the artifact's view-creation clause did not
/// match the expected shape; the view was still created, its identity is
/// just unconfirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCreation {
    /// Execution success message from the warehouse
    pub message: String,

    /// Qualified view name recovered from the artifact
    pub view_name: Option<String>,

    /// Preview of the created view
    pub preview: PreviewOutcome,
}

/// Creates views from the artifact store through a warehouse client
pub struct ViewCreator<'a> {
    warehouse: &'a dyn WarehouseClient,
    artifacts: ArtifactStore,
}

impl<'a> ViewCreator<'a> {
    pub fn new(warehouse: &'a dyn WarehouseClient, artifacts: ArtifactStore) -> Self {
        Self { warehouse, artifacts }
    }

    /// Execute a table's stored SQL artifact, then confirm the created
    /// view's identity and preview it.
    ///
    /// Name extraction and preview failures never fail the call once the
    /// execute succeeded; they downgrade the result instead.
    pub async fn create_view(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<ViewCreation, CreateError> {
        let sql = self
            .artifacts
            .read(dataset_id, table_id)?
            .ok_or_else(|| CreateError::SqlNotFound {
                dataset: dataset_id.to_string(),
                table: table_id.to_string(),
            })?;

        let message = self
            .warehouse
            .execute_query(&sql)
            .await
            .map_err(|e| CreateError::Execution(e.to_string()))?;

        let Some(view_name) = extract_view_name(&sql) else {
            return Ok(ViewCreation {
                message,
                view_name: None,
                preview: PreviewOutcome::Skipped,
            });
        };

        let preview = match self
            .warehouse
            .preview_table(&view_name, PREVIEW_LIMIT)
            .await
        {
            Ok(preview) => PreviewOutcome::Loaded(preview),
            Err(e) => PreviewOutcome::Failed(e.to_string()),
        };

        Ok(ViewCreation {
            message,
            view_name: Some(view_name),
            preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bronzegen_catalog::{GatewayError, MockWarehouse};
    use pretty_assertions::assert_eq;

    const VIEW_SQL: &str = "CREATE OR REPLACE VIEW `sales_bronze.orders` AS\n\
                            SELECT\nCAST(id AS INT64) AS id\nFROM `sales_raw.orders`";

    fn artifact_store(dir: &std::path::Path) -> ArtifactStore {
        ArtifactStore::new(dir.join("datasets"))
    }

    #[tokio::test]
    async fn creates_view_with_confirmed_identity_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifact_store(dir.path());
        artifacts.write("sales_raw", "orders", VIEW_SQL).unwrap();

        let warehouse = MockWarehouse::new();
        warehouse
            .add_preview("sales_bronze.orders", TablePreview::default())
            .await;

        let creator = ViewCreator::new(&warehouse, artifacts);
        let creation = creator.create_view("sales_raw", "orders").await.unwrap();

        assert_eq!(creation.view_name.as_deref(), Some("sales_bronze.orders"));
        assert!(matches!(creation.preview, PreviewOutcome::Loaded(_)));
        assert_eq!(warehouse.executed_queries().await, vec![VIEW_SQL]);
    }

    #[tokio::test]
    async fn missing_artifact_aborts_that_table_only() {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = MockWarehouse::new();
        let creator = ViewCreator::new(&warehouse, artifact_store(dir.path()));

        let result = creator.create_view("sales_raw", "missing").await;

        assert!(matches!(result, Err(CreateError::SqlNotFound { .. })));
        assert!(warehouse.executed_queries().await.is_empty());
    }

    #[tokio::test]
    async fn execution_failure_is_reported_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifact_store(dir.path());
        artifacts.write("sales_raw", "orders", VIEW_SQL).unwrap();

        let warehouse = MockWarehouse::new();
        warehouse
            .set_execute_error(GatewayError::Query("table busy".to_string()))
            .await;

        let creator = ViewCreator::new(&warehouse, artifacts);
        let result = creator.create_view("sales_raw", "orders").await;

        assert!(matches!(result, Err(CreateError::Execution(_))));
    }

    #[tokio::test]
    async fn unrecoverable_view_name_downgrades_to_skipped_preview() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifact_store(dir.path());
        // Operator customized the base template away from the expected shape.
        artifacts
            .write("sales_raw", "orders", "CREATE VIEW sales_bronze.orders AS SELECT 1")
            .unwrap();

        let warehouse = MockWarehouse::new();
        let creator = ViewCreator::new(&warehouse, artifacts);
        let creation = creator.create_view("sales_raw", "orders").await.unwrap();

        assert_eq!(creation.view_name, None);
        assert_eq!(creation.preview, PreviewOutcome::Skipped);
        assert_eq!(warehouse.executed_queries().await.len(), 1);
    }

    #[tokio::test]
    async fn preview_failure_does_not_fail_creation() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = artifact_store(dir.path());
        artifacts.write("sales_raw", "orders", VIEW_SQL).unwrap();

        let warehouse = MockWarehouse::new();
        warehouse
            .add_preview_error(
                "sales_bronze.orders",
                GatewayError::PermissionDenied("no read access".to_string()),
            )
            .await;

        let creator = ViewCreator::new(&warehouse, artifacts);
        let creation = creator.create_view("sales_raw", "orders").await.unwrap();

        assert_eq!(creation.view_name.as_deref(), Some("sales_bronze.orders"));
        assert!(matches!(creation.preview, PreviewOutcome::Failed(_)));
    }
}
