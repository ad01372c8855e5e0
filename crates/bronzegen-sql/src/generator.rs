//! Renders a column configuration into a bronze view definition

use std::path::PathBuf;

use bronzegen_core::{bronze_dataset_name, ColumnConfig, Selector};
use bronzegen_templates::{render_base, render_column, BaseContext, TemplateStore};

use crate::artifacts::ArtifactStore;

/// Renderer error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("base template not found in template store")]
    MissingBaseTemplate,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Generates SQL view definitions from templates and column configurations
///
/// Rendering is pure over the template store snapshot and the configuration:
/// rendering the same inputs twice yields byte-identical SQL.
pub struct SqlGenerator<'a> {
    templates: &'a TemplateStore,
    artifacts: ArtifactStore,
}

impl<'a> SqlGenerator<'a> {
    /// Create a generator writing artifacts through `artifacts`
    pub fn new(templates: &'a TemplateStore, artifacts: ArtifactStore) -> Self {
        Self { templates, artifacts }
    }

    /// Render the view definition for one table.
    ///
    /// Columns are emitted in configuration order. `skip` entries emit
    /// nothing; `custom` entries emit a `-- custom: <name>` comment line; a
    /// selector naming a template that is not in the store drops that column
    /// silently so one bad entry never blocks the rest of the view.
    pub fn render(
        &self,
        dataset_id: &str,
        table_id: &str,
        config: &ColumnConfig,
    ) -> Result<String, RenderError> {
        let base = self
            .templates
            .get("base")
            .ok_or(RenderError::MissingBaseTemplate)?;

        let mut lines = Vec::new();
        for (column, selector) in config.iter() {
            match selector {
                Selector::Skip => {}
                Selector::Custom => lines.push(format!("-- custom: {}", column)),
                Selector::Template(name) => {
                    if let Some(body) = self.templates.get(name) {
                        lines.push(render_column(body, column));
                    }
                }
            }
        }

        let columns = lines.join(",\n");
        let bronze_dataset = bronze_dataset_name(dataset_id);

        Ok(render_base(
            base,
            &BaseContext {
                source_dataset: dataset_id,
                bronze_dataset: &bronze_dataset,
                table_name: table_id,
                columns: &columns,
            },
        ))
    }

    /// Render and persist the artifact, returning its path
    pub fn generate(
        &self,
        dataset_id: &str,
        table_id: &str,
        config: &ColumnConfig,
    ) -> Result<PathBuf, RenderError> {
        let sql = self.render(dataset_id, table_id, config)?;
        self.artifacts
            .write(dataset_id, table_id, &sql)
            .map_err(|e| RenderError::IoError(e.to_string()))
    }
}
