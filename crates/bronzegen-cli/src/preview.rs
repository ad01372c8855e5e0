//! Preview rendering for freshly created views

use anyhow::Result;
use colored::Colorize;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;

use bronzegen_catalog::TablePreview;

const MAX_VALUE_LEN: usize = 100;

/// Transposed display: one `column: value` line per cell, aligned on the
/// widest `name (TYPE)` label.
pub fn print_transposed(preview: &TablePreview) {
    if preview.rows.is_empty() {
        println!("\nNo rows returned.");
        return;
    }

    println!(
        "\nPreview ({} rows, {} columns):",
        preview.row_count(),
        preview.column_count()
    );

    let width = label_width(preview);
    for (i, row) in preview.rows.iter().enumerate() {
        println!("\n{}", format!("--- Row {} ---", i + 1).bold());
        for column in &preview.columns {
            let label = column_label(column, preview.column_type(column));
            let value = row.get(column).map(String::as_str).unwrap_or("NULL");
            println!("{:>width$}: {}", label, truncate(value), width = width);
        }
    }
}

/// JSON display: the preview rows, pretty-printed with keys in
/// result-column order
pub fn print_json(preview: &TablePreview) -> Result<()> {
    println!("\n{}", rows_json(preview)?);
    Ok(())
}

fn rows_json(preview: &TablePreview) -> Result<String> {
    Ok(serde_json::to_string_pretty(&OrderedRows(preview))?)
}

// The rows live in BTreeMaps, which would serialize alphabetically; these
// adapters drive serialization in the order of `preview.columns` instead.
struct OrderedRows<'a>(&'a TablePreview);

impl Serialize for OrderedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&OrderedRow {
                columns: &self.0.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct OrderedRow<'a> {
    columns: &'a [String],
    row: &'a BTreeMap<String, String>,
}

impl Serialize for OrderedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for column in self.columns {
            if let Some(value) = self.row.get(column) {
                map.serialize_entry(column, value)?;
            }
        }
        map.end()
    }
}

fn column_label(name: &str, field_type: &str) -> String {
    format!("{} ({})", name, field_type)
}

fn label_width(preview: &TablePreview) -> usize {
    preview
        .columns
        .iter()
        .map(|c| c.len() + preview.column_type(c).len() + 3)
        .max()
        .unwrap_or(0)
}

fn truncate(value: &str) -> String {
    if value.chars().count() > MAX_VALUE_LEN {
        let head: String = value.chars().take(MAX_VALUE_LEN - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn preview_with(columns: &[(&str, &str)]) -> TablePreview {
        TablePreview {
            columns: columns.iter().map(|(c, _)| c.to_string()).collect(),
            column_types: columns
                .iter()
                .map(|(c, t)| (c.to_string(), t.to_string()))
                .collect::<HashMap<_, _>>(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn label_combines_name_and_type() {
        assert_eq!(column_label("order_id", "INT64"), "order_id (INT64)");
    }

    #[test]
    fn width_covers_widest_label() {
        let preview = preview_with(&[("id", "INT64"), ("created_at", "TIMESTAMP")]);
        // "created_at (TIMESTAMP)" is 22 characters
        assert_eq!(label_width(&preview), 22);
    }

    #[test]
    fn width_of_empty_preview_is_zero() {
        let preview = preview_with(&[]);
        assert_eq!(label_width(&preview), 0);
    }

    #[test]
    fn short_values_pass_through() {
        assert_eq!(truncate("hello"), "hello");
    }

    #[test]
    fn exactly_max_length_is_not_truncated() {
        let value = "x".repeat(100);
        assert_eq!(truncate(&value), value);
    }

    #[test]
    fn long_values_are_truncated_with_ellipsis() {
        let value = "y".repeat(150);
        let shown = truncate(&value);
        assert_eq!(shown.chars().count(), 100);
        assert!(shown.ends_with("..."));
        assert!(shown.starts_with(&"y".repeat(97)));
    }

    #[test]
    fn json_rows_follow_column_order() {
        let mut preview = preview_with(&[("zeta", "STRING"), ("alpha", "INT64")]);
        let mut row = std::collections::BTreeMap::new();
        row.insert("alpha".to_string(), "1".to_string());
        row.insert("zeta".to_string(), "z".to_string());
        preview.rows.push(row);

        let json = rows_json(&preview).unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        assert!(zeta < alpha, "expected zeta before alpha in:\n{}", json);
    }

    #[test]
    fn json_omits_columns_absent_from_a_row() {
        let mut preview = preview_with(&[("id", "INT64"), ("note", "STRING")]);
        let mut row = std::collections::BTreeMap::new();
        row.insert("id".to_string(), "7".to_string());
        preview.rows.push(row);

        let json = rows_json(&preview).unwrap();
        assert!(json.contains("\"id\""));
        assert!(!json.contains("\"note\""));
    }

    #[test]
    fn unknown_column_type_falls_back() {
        let preview = preview_with(&[("id", "INT64")]);
        assert_eq!(preview.column_type("missing"), "UNKNOWN");
    }
}
