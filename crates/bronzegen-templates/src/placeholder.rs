//! Placeholder substitution over fixed, named placeholder sets
//!
//! Templates use `{name}` substitution points. Each template kind has a
//! closed placeholder set: the base template the four view-level names, a
//! column template only `column_name`. Substitution replaces exactly those
//! names; any other `{...}` sequence in a template body is left verbatim.

/// Substitution context for the base view template
#[derive(Debug, Clone, Copy)]
pub struct BaseContext<'a> {
    pub source_dataset: &'a str,
    pub bronze_dataset: &'a str,
    pub table_name: &'a str,
    pub columns: &'a str,
}

/// Render the base template with its four placeholders resolved
pub fn render_base(body: &str, ctx: &BaseContext<'_>) -> String {
    substitute(
        body,
        &[
            ("source_dataset", ctx.source_dataset),
            ("bronze_dataset", ctx.bronze_dataset),
            ("table_name", ctx.table_name),
            ("columns", ctx.columns),
        ],
    )
}

/// Render a column template, resolving every `column_name` occurrence
pub fn render_column(body: &str, column_name: &str) -> String {
    substitute(body, &[("column_name", column_name)])
}

fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in values {
        rendered = rendered.replace(&format!("{{{}}}", key), value);
    }
    rendered
}
