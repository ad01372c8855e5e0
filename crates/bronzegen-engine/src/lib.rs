//! Orchestration above the stores and the warehouse gateway
//!
//! This crate handles:
//! - Creating a warehouse view from a stored SQL artifact and reporting its
//!   recovered identity and preview
//! - Regenerating a table's SQL artifact from its saved column configuration

pub mod creator;
pub mod regenerate;

pub use creator::{CreateError, PreviewOutcome, ViewCreation, ViewCreator};
pub use regenerate::{regenerate, RegenerateError};
