//! Shared fixtures and formatting helpers for snippet analysis tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::{format_diagnostic_messages, format_spans};
pub use fixtures::{entity_registry, lexical_backend, offset_of};
