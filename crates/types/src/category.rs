//! Token classification categories.

/// Classification of a highlighted span.
///
/// This is the closed set of categories the editor understands. Backends map
/// their own classification vocabulary onto it at their boundary and drop
/// anything that has no counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenCategory {
    /// Language keyword (`using`, `var`, `return`, predefined type keywords)
    Keyword,
    /// Name of a type
    TypeName,
    /// Any other identifier
    Identifier,
    /// String or character literal
    StringLiteral,
    /// Line or block comment
    Comment,
}

impl TokenCategory {
    /// Stable lower-case name, used for machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::TypeName => "type-name",
            Self::Identifier => "identifier",
            Self::StringLiteral => "string-literal",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
