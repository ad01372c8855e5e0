//! Recovers the created view's qualified name from rendered SQL
//!
//! This is a narrow structural match over text this tool generated itself,
//! not a SQL parser. It finds the first backtick-quoted identifier of a
//! `CREATE OR REPLACE VIEW` clause. An operator who customizes the base
//! template away from that shape loses name extraction; callers treat that
//! as "created, identity unconfirmed" rather than a failure.

use regex::Regex;
use std::sync::OnceLock;

static VIEW_NAME: OnceLock<Regex> = OnceLock::new();

/// Extract the qualified view name from rendered SQL, or `None` if no
/// `CREATE OR REPLACE VIEW` clause is present. Only the first clause is
/// considered.
pub fn extract_view_name(sql: &str) -> Option<String> {
    let pattern = VIEW_NAME.get_or_init(|| {
        Regex::new(r"CREATE OR REPLACE VIEW\s+`([^`]+)`").expect("view name pattern is valid")
    });

    pattern
        .captures(sql)
        .map(|captures| captures[1].to_string())
}
