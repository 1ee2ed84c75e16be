//! Lexical reference backend.
//!
//! [`LexicalBackend`] analyzes the synthetic document without a compiler:
//! a tokenizer classifies spans, a delimiter pass reports structural errors,
//! and a declaration scan feeds symbol lookup, completion candidates and the
//! context resolver. It is precise enough for highlighting, error markers and
//! extension-method discovery; type checking is out of its reach.

mod declarations;
mod delimiters;
mod keywords;
mod lexer;
mod promote;

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use snippet_types::{OffsetRange, TokenCategory};

use crate::{
    AnalysisBackend, BackendDiagnostic, BackendError, BackendSymbol, ClassifiedSpan,
    CompileOutput, DeclaredMethod, Result, SymbolKind,
};
use declarations::{Declaration, Declarations};
use lexer::{Token, TokenKind};

/// Reference [`AnalysisBackend`] for the C#-flavoured host language.
#[derive(Debug, Default)]
pub struct LexicalBackend {
    /// Host types known by name only (e.g. registered template contexts)
    known_types: BTreeSet<String>,
    document: Option<Analysis>,
}

/// Everything derived from one committed document
#[derive(Debug)]
struct Analysis {
    text: String,
    tokens: Vec<Token>,
    diagnostics: Vec<BackendDiagnostic>,
    declarations: Declarations,
    /// Identifier tokens classified as type names, by start offset
    type_tokens: HashSet<usize>,
}

impl LexicalBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add host types that should be highlighted and offered as type names.
    #[must_use]
    pub fn with_known_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// The committed document text, if any.
    #[must_use]
    pub fn document_text(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.text.as_str())
    }

    fn analyze(&self, text: &str) -> Analysis {
        let lexed = lexer::lex(text);
        let delimiters = delimiters::balance(text, &lexed.tokens);
        let declarations = declarations::collect(text, &lexed.tokens, &delimiters);

        let mut diagnostics: Vec<BackendDiagnostic> = lexed
            .errors
            .iter()
            .map(|e| BackendDiagnostic::error(e.message, e.range))
            .collect();
        diagnostics.extend(delimiters.errors);
        diagnostics.sort_by_key(|d| d.range.start);

        let type_tokens = self.type_tokens(text, &lexed.tokens, &declarations);

        Analysis {
            text: text.to_string(),
            tokens: lexed.tokens,
            diagnostics,
            declarations,
            type_tokens,
        }
    }

    fn type_tokens(&self, text: &str, tokens: &[Token], declarations: &Declarations) -> HashSet<usize> {
        let declared: HashSet<&str> = declarations.type_names().collect();
        let mut result = declarations.type_positions.clone();
        let mut previous: Option<&str> = None;

        for token in tokens.iter().filter(|t| !t.kind.is_trivia()) {
            let word = &text[token.range.start..token.range.end];
            if token.kind == TokenKind::Ident {
                let after_type_operator = matches!(previous, Some("new" | "is" | "as"));
                if after_type_operator
                    || declared.contains(word)
                    || self.known_types.contains(word)
                {
                    result.insert(token.range.start);
                }
            }
            previous = Some(word);
        }
        result
    }
}

impl Analysis {
    fn category(&self, token: &Token) -> Option<TokenCategory> {
        match token.kind {
            TokenKind::Keyword | TokenKind::PredefinedType => Some(TokenCategory::Keyword),
            TokenKind::String | TokenKind::Char => Some(TokenCategory::StringLiteral),
            TokenKind::LineComment | TokenKind::BlockComment => Some(TokenCategory::Comment),
            TokenKind::Ident if self.type_tokens.contains(&token.range.start) => {
                Some(TokenCategory::TypeName)
            }
            TokenKind::Ident => Some(TokenCategory::Identifier),
            TokenKind::Number | TokenKind::Punct | TokenKind::Whitespace => None,
        }
    }

    /// The identifier token under (or immediately before) `position`
    fn identifier_at(&self, position: usize) -> Option<&Token> {
        let idents = || self.tokens.iter().filter(|t| t.kind == TokenKind::Ident);
        idents()
            .find(|t| t.range.contains(position))
            .or_else(|| idents().find(|t| t.range.end == position))
    }

    fn is_visible(decl: &Declaration, position: usize) -> bool {
        decl.scope.touches(position)
            && (decl.kind != SymbolKind::Local || decl.name_range.start < position)
    }

    fn resolve(&self, name: &str, position: usize) -> Option<&Declaration> {
        self.declarations
            .items
            .iter()
            .filter(|d| d.name == name && Self::is_visible(d, position))
            .min_by_key(|d| (d.scope.len(), std::cmp::Reverse(d.name_range.start)))
    }
}

fn to_symbol(decl: &Declaration) -> BackendSymbol {
    BackendSymbol {
        name: decl.name.clone(),
        kind: decl.kind,
        type_name: decl.type_name.clone(),
        declaration: Some(decl.name_range),
    }
}

impl AnalysisBackend for LexicalBackend {
    fn set_document(&mut self, text: &str) {
        let analysis = self.analyze(text);
        tracing::debug!(
            len = text.len(),
            tokens = analysis.tokens.len(),
            diagnostics = analysis.diagnostics.len(),
            methods = analysis.declarations.methods.len(),
            "Lexical analysis complete"
        );
        self.document = Some(analysis);
    }

    fn classified_spans(&self, window: OffsetRange) -> Vec<ClassifiedSpan> {
        let Some(doc) = &self.document else {
            return Vec::new();
        };
        doc.tokens
            .iter()
            .filter_map(|token| {
                let category = doc.category(token)?;
                let range = token.range.intersect(window)?;
                (!range.is_empty()).then_some(ClassifiedSpan::new(category, range))
            })
            .collect()
    }

    fn diagnostics(&self, window: OffsetRange) -> Vec<BackendDiagnostic> {
        let Some(doc) = &self.document else {
            return Vec::new();
        };
        doc.diagnostics
            .iter()
            .filter(|d| d.range.intersect(window).is_some())
            .cloned()
            .collect()
    }

    fn declared_methods(&self) -> Vec<DeclaredMethod> {
        let Some(doc) = &self.document else {
            return Vec::new();
        };
        doc.declarations
            .methods
            .iter()
            .filter(|header| header.is_member)
            .map(|header| header.method.clone())
            .collect()
    }

    fn symbol_at(&self, position: usize) -> Option<BackendSymbol> {
        let doc = self.document.as_ref()?;
        let token = doc.identifier_at(position)?;

        if let Some(decl) = doc
            .declarations
            .items
            .iter()
            .find(|d| d.name_range == token.range)
        {
            return Some(to_symbol(decl));
        }

        let name = &doc.text[token.range.start..token.range.end];
        if let Some(decl) = doc.resolve(name, token.range.start) {
            return Some(to_symbol(decl));
        }

        self.known_types.contains(name).then(|| BackendSymbol {
            name: name.to_string(),
            kind: SymbolKind::Type,
            type_name: None,
            declaration: None,
        })
    }

    fn recommended_symbols_at(&self, position: usize) -> Vec<BackendSymbol> {
        let Some(doc) = &self.document else {
            return Vec::new();
        };

        let mut visible: Vec<&Declaration> = doc
            .declarations
            .items
            .iter()
            .filter(|d| Analysis::is_visible(d, position))
            .collect();
        // Innermost declarations shadow outer ones of the same name
        visible.sort_by_key(|d| d.scope.len());

        let mut seen = HashSet::new();
        let mut symbols: Vec<BackendSymbol> = visible
            .into_iter()
            .filter(|d| seen.insert(d.name.as_str()))
            .map(to_symbol)
            .collect();

        for name in &self.known_types {
            if seen.insert(name.as_str()) {
                symbols.push(BackendSymbol {
                    name: name.clone(),
                    kind: SymbolKind::Type,
                    type_name: None,
                    declaration: None,
                });
            }
        }
        symbols
    }

    #[tracing::instrument(skip(self), fields(path = %output_path.display()))]
    fn compile(&self, output_path: &Path) -> Result<CompileOutput> {
        let doc = self.document.as_ref().ok_or(BackendError::NoDocument)?;

        let errors: Vec<BackendDiagnostic> = doc
            .diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .cloned()
            .collect();
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "Compilation blocked by diagnostics");
            return Ok(CompileOutput {
                success: false,
                output_path: output_path.to_path_buf(),
                diagnostics: errors,
                promoted_methods: 0,
            });
        }

        let (source, promoted_methods) = promote::promote(&doc.text, &doc.declarations.methods);
        std::fs::write(output_path, source).map_err(|source| BackendError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;
        tracing::info!(promoted_methods, "Compiled synthetic document");

        Ok(CompileOutput {
            success: true,
            output_path: output_path.to_path_buf(),
            diagnostics: Vec::new(),
            promoted_methods,
        })
    }
}
