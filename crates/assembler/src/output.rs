//! Query results in template coordinates.

use std::path::PathBuf;

use snippet_backend::SymbolKind;
use snippet_types::{DiagnosticSeverity, OffsetRange, TokenCategory};

/// A classified span of template source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub category: TokenCategory,
    pub range: OffsetRange,
}

/// A diagnostic attached to template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorToken {
    pub message: String,
    pub range: OffsetRange,
    pub severity: DiagnosticSeverity,
}

/// A symbol resolved at a template position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub type_name: Option<String>,
    /// Where the symbol is declared, when that is template code
    pub declaration: Option<OffsetRange>,
}

/// Result of compiling the synthetic document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub success: bool,
    pub output_path: PathBuf,
    /// Diagnostics in template coordinates, including those raised in
    /// generated text and pinned to the nearest template code
    pub diagnostics: Vec<ErrorToken>,
    /// Messages of diagnostics in a document with no template code
    pub unmapped: Vec<String>,
    pub promoted_methods: usize,
}
