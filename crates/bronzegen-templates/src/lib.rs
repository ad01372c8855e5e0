//! SQL fragment templates for bronze view generation
//!
//! This crate handles:
//! - The file-backed template store, seeded with built-in defaults on first run
//! - Placeholder substitution over the fixed per-kind placeholder sets

pub mod defaults;
pub mod placeholder;
pub mod store;

pub use placeholder::{render_base, render_column, BaseContext};
pub use store::{TemplateError, TemplateStore};
