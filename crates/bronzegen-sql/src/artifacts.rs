//! On-disk store of generated SQL artifacts
//!
//! One text file per (dataset, table) at `<dir>/<dataset>/<table>.sql`,
//! overwritten on every regeneration.

use std::path::{Path, PathBuf};

use bronzegen_core::fs::atomic_write;

/// Artifact store error types
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// File-backed store of rendered SQL view definitions
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir` (conventionally `datasets/`)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the artifact for (dataset, table)
    pub fn sql_path(&self, dataset_id: &str, table_id: &str) -> PathBuf {
        self.dir.join(dataset_id).join(format!("{}.sql", table_id))
    }

    /// Write an artifact, replacing any existing file
    pub fn write(
        &self,
        dataset_id: &str,
        table_id: &str,
        sql: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.sql_path(dataset_id, table_id);
        atomic_write(&path, sql).map_err(|e| ArtifactError::IoError(e.to_string()))?;
        Ok(path)
    }

    /// Read an artifact, or `None` if it does not exist
    pub fn read(&self, dataset_id: &str, table_id: &str) -> Result<Option<String>, ArtifactError> {
        let path = self.sql_path(dataset_id, table_id);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ArtifactError::IoError(e.to_string()))
    }

    /// Datasets that have at least one artifact directory, sorted
    pub fn datasets(&self) -> Result<Vec<String>, ArtifactError> {
        let mut datasets = Vec::new();
        if !self.dir.exists() {
            return Ok(datasets);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| ArtifactError::IoError(e.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|e| ArtifactError::IoError(e.to_string()))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    datasets.push(name.to_string());
                }
            }
        }

        datasets.sort();
        Ok(datasets)
    }

    /// Tables with an artifact under a dataset, sorted
    pub fn tables(&self, dataset_id: &str) -> Result<Vec<String>, ArtifactError> {
        let dataset_dir = self.dir.join(dataset_id);
        let mut tables = Vec::new();
        if !dataset_dir.exists() {
            return Ok(tables);
        }

        let entries =
            std::fs::read_dir(&dataset_dir).map_err(|e| ArtifactError::IoError(e.to_string()))?;
        for entry in entries {
            let path = entry.map_err(|e| ArtifactError::IoError(e.to_string()))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                tables.push(stem.to_string());
            }
        }

        tables.sort();
        Ok(tables)
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let path = store.write("sales_raw", "orders", "SELECT 1").unwrap();
        assert_eq!(path, dir.path().join("sales_raw").join("orders.sql"));

        assert_eq!(
            store.read("sales_raw", "orders").unwrap(),
            Some("SELECT 1".to_string())
        );
    }

    #[test]
    fn missing_artifact_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        assert!(store.read("sales_raw", "missing").unwrap().is_none());
    }

    #[test]
    fn listing_is_sorted_and_tolerates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("does-not-exist"));
        assert!(store.datasets().unwrap().is_empty());
        assert!(store.tables("sales_raw").unwrap().is_empty());

        let store = ArtifactStore::new(dir.path());
        store.write("zoo_raw", "b_table", "x").unwrap();
        store.write("zoo_raw", "a_table", "y").unwrap();
        store.write("ark_raw", "t", "z").unwrap();

        assert_eq!(store.datasets().unwrap(), vec!["ark_raw", "zoo_raw"]);
        assert_eq!(store.tables("zoo_raw").unwrap(), vec!["a_table", "b_table"]);
    }
}
