//! File-backed template store

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bronzegen_core::fs::atomic_write;

use crate::defaults::DEFAULT_TEMPLATES;

/// Template store error types
///
/// An uninitializable store is fatal for the whole pipeline: without
/// templates no SQL can be produced.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    IoError(String),
}

/// Named SQL fragment templates, loaded from a directory of `*.sql` files
///
/// On open, any missing built-in template is written with its default body;
/// existing files are never overwritten. The store is an immutable snapshot
/// for the rest of the run.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
    templates: HashMap<String, String>,
}

impl TemplateStore {
    /// Open the store at `dir` (conventionally `templates/`), seeding
    /// defaults and loading every stored template keyed by file stem.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| TemplateError::IoError(e.to_string()))?;

        for (name, body) in DEFAULT_TEMPLATES {
            let path = dir.join(format!("{}.sql", name));
            if !path.exists() {
                atomic_write(&path, body).map_err(|e| TemplateError::IoError(e.to_string()))?;
            }
        }

        let mut templates = HashMap::new();
        let entries = std::fs::read_dir(&dir).map_err(|e| TemplateError::IoError(e.to_string()))?;
        for entry in entries {
            let path = entry.map_err(|e| TemplateError::IoError(e.to_string()))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let body = std::fs::read_to_string(&path)
                .map_err(|e| TemplateError::IoError(e.to_string()))?;
            templates.insert(name.to_string(), body);
        }

        Ok(Self { dir, templates })
    }

    /// Build a store from in-memory (name, body) pairs.
    ///
    /// No defaults are seeded and nothing touches the filesystem; callers
    /// own the snapshot's contents entirely.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            dir: PathBuf::new(),
            templates: entries.into_iter().collect(),
        }
    }

    /// Get a template body by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Names of the column templates, sorted, excluding `base`
    pub fn column_template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .templates
            .keys()
            .filter(|name| name.as_str() != "base")
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Directory the store was opened at
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::open(dir.path()).unwrap();

        for (name, body) in DEFAULT_TEMPLATES {
            assert_eq!(store.get(name), Some(*body));
            assert!(dir.path().join(format!("{}.sql", name)).exists());
        }
    }

    #[test]
    fn existing_templates_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let custom_base = "CREATE OR REPLACE VIEW `{bronze_dataset}.{table_name}` AS SELECT 1";
        std::fs::write(dir.path().join("base.sql"), custom_base).unwrap();

        let store = TemplateStore::open(dir.path()).unwrap();

        assert_eq!(store.get("base"), Some(custom_base));
    }

    #[test]
    fn operator_added_templates_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("trimmed.sql"),
            "TRIM({column_name}) AS {column_name}",
        )
        .unwrap();

        let store = TemplateStore::open(dir.path()).unwrap();

        assert_eq!(store.get("trimmed"), Some("TRIM({column_name}) AS {column_name}"));
        assert!(store
            .column_template_names()
            .contains(&"trimmed".to_string()));
    }

    #[test]
    fn column_template_names_exclude_base() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::open(dir.path()).unwrap();

        let names = store.column_template_names();
        assert_eq!(names, vec!["date", "float", "int", "string", "timestamp"]);
    }

    #[test]
    fn non_sql_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

        let store = TemplateStore::open(dir.path()).unwrap();

        assert!(store.get("notes").is_none());
    }
}
