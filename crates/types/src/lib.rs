//! Foundation types for template snippet analysis.
//!
//! This crate provides shared types used across the snippet analysis stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **Offset types**: [`OffsetRange`], [`LineIndex`]
//! - **Classification types**: [`TokenCategory`]
//! - **Severity types**: [`DiagnosticSeverity`]

mod category;
mod line_index;
mod position;
mod severity;

pub use category::TokenCategory;
pub use line_index::LineIndex;
pub use position::OffsetRange;
pub use severity::DiagnosticSeverity;
