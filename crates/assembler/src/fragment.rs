//! Fragments of the synthetic document and offset translation.
//!
//! Every piece of text in the synthetic document is owned by exactly one
//! [`Fragment`]. Author fragments remember where their text came from in the
//! template so positions can be translated in both directions; boilerplate
//! fragments have no template origin and never translate.

use snippet_types::OffsetRange;

/// What a fragment contributes to the synthetic document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Generated text with no template origin
    Boilerplate,
    /// A `using` directive written by the template author
    Using,
    /// A statement or member block written by the template author
    Code,
    /// The expression body of a template lambda, arrow stripped
    LambdaBody,
}

impl FragmentKind {
    /// Author fragments map back to template source; boilerplate does not.
    #[must_use]
    pub const fn is_author(self) -> bool {
        !matches!(self, Self::Boilerplate)
    }
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boilerplate => write!(f, "boilerplate"),
            Self::Using => write!(f, "using"),
            Self::Code => write!(f, "code"),
            Self::LambdaBody => write!(f, "lambda"),
        }
    }
}

/// A contiguous run of text in the synthetic document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: FragmentKind,
    text: String,
    document_offset: usize,
    /// Template offset of the construct; `None` for boilerplate
    source_start: Option<usize>,
    /// Bytes of the template construct skipped before `text` begins
    translation_bias: usize,
}

impl Fragment {
    pub(crate) fn boilerplate(text: impl Into<String>, document_offset: usize) -> Self {
        Self {
            kind: FragmentKind::Boilerplate,
            text: text.into(),
            document_offset,
            source_start: None,
            translation_bias: 0,
        }
    }

    pub(crate) fn author(
        kind: FragmentKind,
        text: impl Into<String>,
        document_offset: usize,
        source_start: usize,
        translation_bias: usize,
    ) -> Self {
        debug_assert!(kind.is_author());
        Self {
            kind,
            text: text.into(),
            document_offset,
            source_start: Some(source_start),
            translation_bias,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FragmentKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn document_offset(&self) -> usize {
        self.document_offset
    }

    #[must_use]
    pub fn document_len(&self) -> usize {
        self.text.len()
    }

    /// Byte range of this fragment in the synthetic document
    #[must_use]
    pub fn document_range(&self) -> OffsetRange {
        OffsetRange::with_len(self.document_offset, self.text.len())
    }

    /// Start of the template construct, before any stripped prefix
    #[must_use]
    pub const fn source_start(&self) -> Option<usize> {
        self.source_start
    }

    /// End of the template construct
    #[must_use]
    pub fn source_end(&self) -> Option<usize> {
        self.source_range().map(|r| r.end)
    }

    /// Byte range in the template that `text` was copied from
    #[must_use]
    pub fn source_range(&self) -> Option<OffsetRange> {
        self.source_start
            .map(|start| OffsetRange::with_len(start + self.translation_bias, self.text.len()))
    }

    #[must_use]
    pub const fn translation_bias(&self) -> usize {
        self.translation_bias
    }

    /// Does the fragment own this document caret position? (end inclusive)
    #[must_use]
    pub fn covers_document(&self, position: usize) -> bool {
        self.document_range().touches(position)
    }

    /// Does the fragment own this template caret position? (end inclusive)
    #[must_use]
    pub fn covers_source(&self, position: usize) -> bool {
        self.source_range().is_some_and(|r| r.touches(position))
    }

    /// Translate a template position into the synthetic document.
    ///
    /// Returns `None` for boilerplate and for positions the fragment does
    /// not cover.
    #[must_use]
    pub fn to_document_position(&self, source_position: usize) -> Option<usize> {
        let source = self.source_range()?;
        source
            .touches(source_position)
            .then(|| self.document_offset + (source_position - source.start))
    }

    /// Translate a synthetic-document position back into the template.
    ///
    /// Returns `None` for boilerplate and for positions the fragment does
    /// not cover.
    #[must_use]
    pub fn to_source_position(&self, document_position: usize) -> Option<usize> {
        let source_start = self.source_start?;
        self.covers_document(document_position).then(|| {
            source_start + (document_position - self.document_offset) + self.translation_bias
        })
    }

    /// Clip a document range to this fragment and translate it.
    ///
    /// Returns `None` if the range does not overlap the fragment.
    #[must_use]
    pub fn to_source_range(&self, document_range: OffsetRange) -> Option<OffsetRange> {
        let clipped = document_range.intersect(self.document_range())?;
        Some(OffsetRange::new(
            self.to_source_position(clipped.start)?,
            self.to_source_position(clipped.end)?,
        ))
    }

    pub(crate) fn shift(&mut self, delta: usize) {
        self.document_offset += delta;
    }
}
