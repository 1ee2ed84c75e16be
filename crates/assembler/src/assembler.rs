use std::path::Path;

use snippet_backend::{AnalysisBackend, BackendDiagnostic, BackendSymbol};
use snippet_context::{resolve_identifiers, ContextRegistry, Identifier};
use snippet_types::OffsetRange;

use crate::boilerplate::BoilerplateOptions;
use crate::fragment::{Fragment, FragmentKind};
use crate::output::{CompileReport, ErrorToken, Symbol, Token};
use crate::{AssemblerError, Result};

/// Whether the wrapper type has been opened in the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Empty,
    /// Index of the wrapper-open boilerplate fragment
    Open { fragment: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Building,
    Finalized,
}

/// Builds the synthetic document for one template and answers queries
/// about it in template coordinates.
///
/// One editing cycle is `clear`, any number of `add_*` calls in source
/// order, `finalize`, then queries. Queries always refer to the most
/// recently finalized document.
#[derive(Debug)]
pub struct Assembler<B, R> {
    backend: B,
    registry: R,
    options: BoilerplateOptions,
    fragments: Vec<Fragment>,
    /// Total length of all fragments so far
    running_offset: usize,
    wrapper: Wrapper,
    phase: Phase,
    document: String,
}

impl<B: AnalysisBackend, R: ContextRegistry> Assembler<B, R> {
    /// Create an assembler with default boilerplate, ready for appends.
    pub fn new(backend: B, registry: R) -> Self {
        Self::with_options(backend, registry, BoilerplateOptions::default())
    }

    pub fn with_options(backend: B, registry: R, options: BoilerplateOptions) -> Self {
        let mut assembler = Self {
            backend,
            registry,
            options,
            fragments: Vec::new(),
            running_offset: 0,
            wrapper: Wrapper::Empty,
            phase: Phase::Building,
            document: String::new(),
        };
        assembler.clear();
        assembler
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    pub const fn registry(&self) -> &R {
        &self.registry
    }

    pub const fn options(&self) -> &BoilerplateOptions {
        &self.options
    }

    /// Start a new cycle: drop every fragment and seed the prologue.
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.running_offset = 0;
        self.wrapper = Wrapper::Empty;
        self.phase = Phase::Building;
        self.document.clear();

        let prologue = self.options.prologue();
        self.push_boilerplate(prologue);
    }

    /// Append a `using` directive.
    ///
    /// Directives stay ahead of the wrapper type: once code has opened the
    /// wrapper, a late directive is inserted in front of it.
    pub fn add_using(&mut self, text: &str, source_start: usize) -> Result<()> {
        self.ensure_building()?;
        match self.wrapper {
            Wrapper::Empty => {
                self.push_author(FragmentKind::Using, text, source_start, 0);
                self.push_boilerplate(BoilerplateOptions::line_break());
            }
            Wrapper::Open { fragment } => self.insert_using(fragment, text, source_start),
        }
        Ok(())
    }

    /// Append a code block verbatim inside the wrapper type.
    pub fn add_block(&mut self, text: &str, source_start: usize) -> Result<()> {
        self.ensure_building()?;
        self.open_wrapper();
        self.push_author(FragmentKind::Code, text, source_start, 0);
        self.push_boilerplate(BoilerplateOptions::line_break());
        Ok(())
    }

    /// Append a template lambda such as `(p) => p.IsKey` as a boolean
    /// method taking one `parameter_type` argument.
    ///
    /// Everything up to the first `=>` and the whitespace after it is
    /// stripped; the rest becomes the returned expression.
    pub fn add_lambda(
        &mut self,
        text: &str,
        parameter_type: &str,
        parameter_name: &str,
        source_start: usize,
    ) -> Result<()> {
        self.ensure_building()?;
        let Some(arrow) = text.find("=>") else {
            return Err(AssemblerError::MalformedLambda { source_start });
        };
        let body = text[arrow + 2..].trim_start();
        let bias = text.len() - body.len();

        self.open_wrapper();
        let header = self
            .options
            .lambda_header(source_start, parameter_type, parameter_name);
        self.push_boilerplate(header);
        self.push_author(FragmentKind::LambdaBody, body, source_start, bias);
        self.push_boilerplate(BoilerplateOptions::lambda_footer());
        self.push_boilerplate(BoilerplateOptions::line_break());
        Ok(())
    }

    /// Close the document and commit it to the backend.
    pub fn finalize(&mut self) -> Result<()> {
        self.ensure_building()?;
        if matches!(self.wrapper, Wrapper::Open { .. }) {
            self.push_boilerplate(BoilerplateOptions::wrapper_close());
        }
        self.push_boilerplate(BoilerplateOptions::epilogue());

        self.document = self.fragments.iter().map(Fragment::text).collect();
        debug_assert_eq!(self.document.len(), self.running_offset);
        self.backend.set_document(&self.document);
        self.phase = Phase::Finalized;

        tracing::debug!(
            fragments = self.fragments.len(),
            len = self.document.len(),
            wrapper = matches!(self.wrapper, Wrapper::Open { .. }),
            "Document finalized"
        );
        Ok(())
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    /// Fragments of the current cycle, in document order
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Text of the finalized document
    #[must_use]
    pub fn document_text(&self) -> Option<&str> {
        self.is_finalized().then_some(self.document.as_str())
    }

    /// The author fragment that owns a template caret position.
    #[must_use]
    pub fn fragment_at_source(&self, position: usize) -> Option<&Fragment> {
        self.author_fragments()
            .find(|f| f.source_range().is_some_and(|r| r.contains(position)))
            .or_else(|| {
                self.author_fragments()
                    .find(|f| f.covers_source(position))
            })
    }

    /// The fragment that owns a document position, preferring an author
    /// fragment whose end the caret sits on over the boilerplate after it.
    #[must_use]
    pub fn fragment_at_document(&self, position: usize) -> Option<&Fragment> {
        self.author_fragments()
            .find(|f| f.document_range().contains(position))
            .or_else(|| {
                self.author_fragments()
                    .find(|f| f.document_range().end == position)
            })
            .or_else(|| {
                self.fragments
                    .iter()
                    .find(|f| f.document_range().contains(position))
            })
    }

    /// Classified spans of the template code, in source order.
    pub fn tokens(&self) -> Result<Vec<Token>> {
        self.ensure_finalized()?;
        let mut tokens: Vec<Token> = self
            .author_fragments()
            .flat_map(|fragment| {
                self.backend
                    .classified_spans(fragment.document_range())
                    .into_iter()
                    .filter_map(|span| {
                        let range = fragment.to_source_range(span.range)?;
                        Some(Token {
                            category: span.category,
                            range,
                        })
                    })
            })
            .collect();
        tokens.sort_by_key(|t| t.range.start);
        Ok(tokens)
    }

    /// Diagnostics located in template code, in source order.
    ///
    /// A diagnostic raised in generated text (an unbalanced brace paired
    /// with the wrapper, say) is reported as a zero-width token at the
    /// nearest template code before it.
    pub fn error_tokens(&self) -> Result<Vec<ErrorToken>> {
        self.ensure_finalized()?;
        let diagnostics = self
            .backend
            .diagnostics(OffsetRange::new(0, self.document.len()));
        let (tokens, unmapped) = self.map_diagnostics(&diagnostics);
        for diagnostic in unmapped {
            tracing::warn!(
                message = %diagnostic.message,
                range = %diagnostic.range,
                "Diagnostic with no template code to attach to"
            );
        }
        Ok(tokens)
    }

    /// Completion identifiers synthesized from methods declared in the
    /// template.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        self.ensure_finalized()?;
        Ok(resolve_identifiers(
            &self.backend.declared_methods(),
            &self.registry,
            &self.options.synthetic_prefix,
        ))
    }

    /// Completion list for an expression bound to the named context, or
    /// `None` if no such context is registered.
    pub fn completions_for(&self, context: &str) -> Result<Option<Vec<Identifier>>> {
        let identifiers = self.identifiers()?;
        Ok(self.registry.context(context).map(|descriptor| {
            snippet_context::completions_for(descriptor, &identifiers, &self.registry)
        }))
    }

    /// The symbol under a template caret position.
    pub fn symbol_at(&self, source_position: usize) -> Result<Option<Symbol>> {
        self.ensure_finalized()?;
        Ok(self
            .document_position(source_position)
            .and_then(|position| self.backend.symbol_at(position))
            .map(|symbol| self.to_symbol(symbol)))
    }

    /// Symbols in scope at a template caret position, without synthesized
    /// members.
    pub fn recommended_symbols_at(&self, source_position: usize) -> Result<Vec<Symbol>> {
        self.ensure_finalized()?;
        let Some(position) = self.document_position(source_position) else {
            return Ok(Vec::new());
        };
        Ok(self
            .backend
            .recommended_symbols_at(position)
            .into_iter()
            .filter(|symbol| !symbol.name.starts_with(&self.options.synthetic_prefix))
            .map(|symbol| self.to_symbol(symbol))
            .collect())
    }

    /// Compile the finalized document to `output_path`.
    pub fn compile(&self, output_path: &Path) -> Result<CompileReport> {
        self.ensure_finalized()?;
        let output = self.backend.compile(output_path)?;
        let (diagnostics, unmapped) = self.map_diagnostics(&output.diagnostics);
        Ok(CompileReport {
            success: output.success,
            output_path: output.output_path,
            diagnostics,
            unmapped: unmapped.into_iter().map(|d| d.message.clone()).collect(),
            promoted_methods: output.promoted_methods,
        })
    }

    fn ensure_building(&self) -> Result<()> {
        match self.phase {
            Phase::Building => Ok(()),
            Phase::Finalized => Err(AssemblerError::AlreadyFinalized),
        }
    }

    fn ensure_finalized(&self) -> Result<()> {
        match self.phase {
            Phase::Finalized => Ok(()),
            Phase::Building => Err(AssemblerError::NotFinalized),
        }
    }

    fn author_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.kind().is_author())
    }

    fn push_boilerplate(&mut self, text: impl Into<String>) {
        let fragment = Fragment::boilerplate(text, self.running_offset);
        self.push(fragment);
    }

    fn push_author(&mut self, kind: FragmentKind, text: &str, source_start: usize, bias: usize) {
        let fragment = Fragment::author(kind, text, self.running_offset, source_start, bias);
        self.push(fragment);
    }

    fn push(&mut self, fragment: Fragment) {
        tracing::trace!(
            kind = %fragment.kind(),
            offset = fragment.document_offset(),
            len = fragment.document_len(),
            source = ?fragment.source_start(),
            "Fragment appended"
        );
        self.running_offset += fragment.document_len();
        self.fragments.push(fragment);
    }

    fn open_wrapper(&mut self) {
        if self.wrapper == Wrapper::Empty {
            self.wrapper = Wrapper::Open {
                fragment: self.fragments.len(),
            };
            let open = self.options.wrapper_open();
            self.push_boilerplate(open);
        }
    }

    /// Insert a directive (and its line break) before the wrapper-open
    /// fragment at `index`, shifting everything after it.
    fn insert_using(&mut self, index: usize, text: &str, source_start: usize) {
        let offset = self.fragments[index].document_offset();
        let line_break = BoilerplateOptions::line_break();
        let delta = text.len() + line_break.len();

        for fragment in &mut self.fragments[index..] {
            fragment.shift(delta);
        }
        let using = Fragment::author(FragmentKind::Using, text, offset, source_start, 0);
        let separator = Fragment::boilerplate(line_break, offset + text.len());
        self.fragments.splice(index..index, [using, separator]);

        self.wrapper = Wrapper::Open {
            fragment: index + 2,
        };
        self.running_offset += delta;
        tracing::trace!(
            offset,
            source_start,
            shifted_by = delta,
            "Late using inserted before wrapper"
        );
    }

    fn document_position(&self, source_position: usize) -> Option<usize> {
        self.fragment_at_source(source_position)?
            .to_document_position(source_position)
    }

    /// Translate a document range through the author fragment it overlaps
    fn source_range(&self, range: OffsetRange) -> Option<OffsetRange> {
        self.author_fragments()
            .find_map(|fragment| fragment.to_source_range(range))
    }

    fn to_symbol(&self, symbol: BackendSymbol) -> Symbol {
        Symbol {
            declaration: symbol.declaration.and_then(|r| self.source_range(r)),
            name: symbol.name,
            kind: symbol.kind,
            type_name: symbol.type_name,
        }
    }

    /// Map diagnostics into template coordinates. A diagnostic spanning
    /// several author fragments yields one error token per fragment; one
    /// lying wholly in generated text is pinned to the nearest author
    /// fragment. Only diagnostics in a document without template code are
    /// returned as unmapped.
    fn map_diagnostics<'a>(
        &self,
        diagnostics: &'a [BackendDiagnostic],
    ) -> (Vec<ErrorToken>, Vec<&'a BackendDiagnostic>) {
        let mut tokens = Vec::new();
        let mut unmapped = Vec::new();
        for diagnostic in diagnostics {
            let before = tokens.len();
            tokens.extend(self.author_fragments().filter_map(|fragment| {
                Some(ErrorToken {
                    message: diagnostic.message.clone(),
                    range: fragment.to_source_range(diagnostic.range)?,
                    severity: diagnostic.severity,
                })
            }));
            if tokens.len() > before {
                continue;
            }
            match self.nearest_source_position(diagnostic.range.start) {
                Some(position) => {
                    tracing::debug!(
                        message = %diagnostic.message,
                        range = %diagnostic.range,
                        position,
                        "Diagnostic in generated text attached to template code"
                    );
                    tokens.push(ErrorToken {
                        message: diagnostic.message.clone(),
                        range: OffsetRange::at(position),
                        severity: diagnostic.severity,
                    });
                }
                None => unmapped.push(diagnostic),
            }
        }
        tokens.sort_by_key(|t| t.range.start);
        (tokens, unmapped)
    }

    /// Template position closest to a boilerplate document position: the
    /// end of the last author fragment before it, else the start of the
    /// first one after it.
    fn nearest_source_position(&self, document_position: usize) -> Option<usize> {
        self.fragments
            .iter()
            .rev()
            .find(|f| f.kind().is_author() && f.document_range().end <= document_position)
            .and_then(Fragment::source_end)
            .or_else(|| {
                self.author_fragments()
                    .find(|f| f.document_offset() >= document_position)
                    .and_then(|f| f.source_range().map(|r| r.start))
            })
    }
}
