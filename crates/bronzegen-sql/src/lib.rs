//! SQL rendering for bronze views
//!
//! This crate handles:
//! - Rendering a column configuration and template store into a view DDL text
//! - The on-disk artifact store of generated SQL files
//! - Recovering the created view's qualified name from rendered SQL

pub mod artifacts;
pub mod extractor;
pub mod generator;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use extractor::extract_view_name;
pub use generator::{RenderError, SqlGenerator};
