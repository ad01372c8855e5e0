//! Per-table column configuration and its persistence
//!
//! A `ColumnConfig` records, for each column of a source table, which
//! transformation template renders it. Entries stay in schema order: the
//! order of the JSON document on disk is the order of the emitted SQL lines,
//! so the in-memory representation is an ordered list of pairs rather than a
//! map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::fs::atomic_write;

/// How a single column is rendered into the generated view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Render with the named column template
    Template(String),

    /// Omit the column from the generated view
    Skip,

    /// Emit a `-- custom: <name>` placeholder comment for manual editing
    Custom,
}

impl Selector {
    /// Parse a selector from its stored string form
    pub fn parse(value: &str) -> Self {
        match value {
            "skip" => Self::Skip,
            "custom" => Self::Custom,
            other => Self::Template(other.to_string()),
        }
    }

    /// The stored string form of this selector
    pub fn as_str(&self) -> &str {
        match self {
            Self::Template(name) => name,
            Self::Skip => "skip",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Ordered mapping from column name to selector for one table
///
/// Insertion order is schema order and is preserved through JSON
/// serialization in both directions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnConfig {
    entries: Vec<(String, Selector)>,
}

impl ColumnConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a selector to a column.
    ///
    /// A repeated name replaces the earlier selector in place, keeping the
    /// column's original position.
    pub fn insert(&mut self, column: impl Into<String>, selector: Selector) {
        let column = column.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = selector,
            None => self.entries.push((column, selector)),
        }
    }

    /// Look up the selector for a column
    pub fn get(&self, column: &str) -> Option<&Selector> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, selector)| selector)
    }

    /// Iterate entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Selector)> {
        self.entries
            .iter()
            .map(|(name, selector)| (name.as_str(), selector))
    }

    /// Number of configured columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no columns are configured
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Selector)> for ColumnConfig {
    fn from_iter<I: IntoIterator<Item = (String, Selector)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (column, selector) in iter {
            config.insert(column, selector);
        }
        config
    }
}

impl Serialize for ColumnConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, selector) in &self.entries {
            map.serialize_entry(name, selector)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ColumnConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = ColumnConfig;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of column name to selector string")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut config = ColumnConfig::new();
                while let Some((name, selector)) = access.next_entry::<String, Selector>()? {
                    config.insert(name, selector);
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// Config persistence error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

/// File-backed store of per-table column configurations
///
/// One JSON record per (dataset, table) at `<dir>/<dataset>/<table>.json`.
/// A save replaces the whole record; records are never partially updated.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at `dir` (conventionally `configs/`)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for (dataset, table)
    pub fn config_path(&self, dataset_id: &str, table_id: &str) -> PathBuf {
        self.dir.join(dataset_id).join(format!("{}.json", table_id))
    }

    /// Save a table's configuration, replacing any existing record
    pub fn save(
        &self,
        dataset_id: &str,
        table_id: &str,
        config: &ColumnConfig,
    ) -> Result<PathBuf, ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        let path = self.config_path(dataset_id, table_id);
        atomic_write(&path, &json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(path)
    }

    /// Load a table's configuration, or `None` if no record exists
    pub fn load(
        &self,
        dataset_id: &str,
        table_id: &str,
    ) -> Result<Option<ColumnConfig>, ConfigError> {
        let path = self.config_path(dataset_id, table_id);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(Some(config))
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

    fn sample_config() -> ColumnConfig {
        let mut config = ColumnConfig::new();
        config.insert("id", Selector::Template("int".to_string()));
        config.insert("name", Selector::Template("string".to_string()));
        config.insert("internal_notes", Selector::Skip);
        config.insert("amount", Selector::Custom);
        config
    }

    #[test]
    fn selector_string_forms() {
        assert_eq!(Selector::parse("skip"), Selector::Skip);
        assert_eq!(Selector::parse("custom"), Selector::Custom);
        assert_eq!(
            Selector::parse("string"),
            Selector::Template("string".to_string())
        );
        assert_eq!(Selector::Skip.as_str(), "skip");
        assert_eq!(Selector::Template("date".to_string()).as_str(), "date");
    }

    #[test]
    fn selector_is_case_sensitive() {
        // "Skip" is not the skip sentinel, it is an (unknown) template name.
        assert_eq!(Selector::parse("Skip"), Selector::Template("Skip".to_string()));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut config = ColumnConfig::new();
        config.insert("a", Selector::Skip);
        config.insert("b", Selector::Custom);
        config.insert("a", Selector::Template("string".to_string()));

        let entries: Vec<_> = config.iter().map(|(n, s)| (n.to_string(), s.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), Selector::Template("string".to_string())),
                ("b".to_string(), Selector::Custom),
            ]
        );
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let config = sample_config();

        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: ColumnConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, parsed);
        let names: Vec<_> = parsed.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "name", "internal_notes", "amount"]);
    }

    #[test]
    fn deserializes_plain_json_object_in_document_order() {
        let json = r#"{"zulu": "string", "alpha": "skip", "mike": "custom"}"#;
        let config: ColumnConfig = serde_json::from_str(json).unwrap();

        let names: Vec<_> = config.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
        assert_eq!(config.get("alpha"), Some(&Selector::Skip));
    }

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        let config = sample_config();

        let path = store.save("sales_raw", "orders", &config).unwrap();
        assert_eq!(path, dir.path().join("sales_raw").join("orders.json"));

        let loaded = store.load("sales_raw", "orders").unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());

        assert!(store.load("nope", "missing").unwrap().is_none());
    }

    #[test]
    fn save_replaces_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());

        store.save("d", "t", &sample_config()).unwrap();

        let mut replacement = ColumnConfig::new();
        replacement.insert("only", Selector::Skip);
        store.save("d", "t", &replacement).unwrap();

        let loaded = store.load("d", "t").unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("only"), Some(&Selector::Skip));
        assert!(loaded.get("id").is_none());
    }
}
