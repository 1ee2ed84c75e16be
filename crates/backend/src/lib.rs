//! # Snippet Analysis Backend
//!
//! This crate defines the capability contract between the snippet assembler
//! and a language-analysis engine, plus [`LexicalBackend`], a reference engine
//! for the C#-flavoured host language the synthetic document is written in.
//!
//! ## Contract
//!
//! Every capability works in *document* coordinates: byte offsets into the
//! text most recently committed with [`AnalysisBackend::set_document`]. The
//! assembler owns translation back to template coordinates; a backend never
//! sees template offsets.
//!
//! Span-scoped capabilities take an [`OffsetRange`] window so that a large
//! document can be analyzed per fragment rather than wholesale.
//!
//! ```rust,ignore
//! let mut backend = LexicalBackend::new();
//! backend.set_document("namespace N { }");
//! for span in backend.classified_spans(OffsetRange::new(0, 9)) {
//!     println!("{} {}", span.category, span.range);
//! }
//! ```

mod error;
pub mod lexical;

use std::path::{Path, PathBuf};

pub use error::{BackendError, Result};
pub use lexical::LexicalBackend;
pub use snippet_types::{DiagnosticSeverity, OffsetRange, TokenCategory};

/// A classified span in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedSpan {
    pub category: TokenCategory,
    pub range: OffsetRange,
}

impl ClassifiedSpan {
    #[must_use]
    pub const fn new(category: TokenCategory, range: OffsetRange) -> Self {
        Self { category, range }
    }
}

/// A problem the backend found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDiagnostic {
    /// Human-readable message
    pub message: String,
    /// Document range the problem is attached to
    pub range: OffsetRange,
    pub severity: DiagnosticSeverity,
}

impl BackendDiagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>, range: OffsetRange) -> Self {
        Self {
            message: message.into(),
            range,
            severity: DiagnosticSeverity::Error,
        }
    }
}

/// A method declared anywhere in the document.
///
/// Only the facts needed for completion synthesis are reported: the name,
/// the spelled return type and the spelled type of the first parameter
/// (empty when the method takes no parameters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
    pub name: String,
    pub return_type: String,
    pub first_parameter_type: String,
    /// Document range of the method name
    pub name_range: OffsetRange,
}

/// Kind of a resolved symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Class, struct, interface, enum or a registered host type
    Type,
    Method,
    Parameter,
    Local,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Method => write!(f, "method"),
            Self::Parameter => write!(f, "parameter"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A symbol handle as reported by the backend (document coordinates)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Spelled type of a parameter/local, or return type of a method
    pub type_name: Option<String>,
    /// Range of the declaring name, `None` for types known only by name
    pub declaration: Option<OffsetRange>,
}

/// Result of a compile request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// `true` if the output file was written
    pub success: bool,
    pub output_path: PathBuf,
    /// Diagnostics that blocked (or accompanied) compilation
    pub diagnostics: Vec<BackendDiagnostic>,
    /// Number of method declarations promoted to `public static`
    pub promoted_methods: usize,
}

/// Capability interface implemented against a concrete analysis engine.
///
/// The assembler depends only on this trait. Implementations must treat every
/// call as synchronous; there is no cancellation.
pub trait AnalysisBackend {
    /// Commit the finalized document text. Replaces any previous document.
    fn set_document(&mut self, text: &str);

    /// Classified spans intersecting `window`, clipped to it.
    ///
    /// Engine categories without a [`TokenCategory`] counterpart are dropped.
    fn classified_spans(&self, window: OffsetRange) -> Vec<ClassifiedSpan>;

    /// Diagnostics whose range intersects `window`.
    fn diagnostics(&self, window: OffsetRange) -> Vec<BackendDiagnostic>;

    /// Every method declared in the document, in document order.
    fn declared_methods(&self) -> Vec<DeclaredMethod>;

    /// The symbol referenced or declared at `position`.
    fn symbol_at(&self, position: usize) -> Option<BackendSymbol>;

    /// Symbols that make sense to offer as completions at `position`.
    fn recommended_symbols_at(&self, position: usize) -> Vec<BackendSymbol>;

    /// Promote every declared method to a publicly invocable, state-independent
    /// form and compile the result to `output_path`.
    fn compile(&self, output_path: &Path) -> Result<CompileOutput>;
}
