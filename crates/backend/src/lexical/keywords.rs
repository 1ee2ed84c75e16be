//! Keyword tables for the host language.

/// Keywords that name built-in types
const PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "float", "int", "long", "object", "sbyte",
    "short", "string", "uint", "ulong", "ushort", "void",
];

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "break", "case", "catch", "checked", "class", "const", "continue",
    "default", "delegate", "do", "else", "enum", "event", "explicit", "extern", "false",
    "finally", "fixed", "for", "foreach", "goto", "if", "implicit", "in", "interface",
    "internal", "is", "lock", "namespace", "new", "null", "operator", "out", "override",
    "params", "private", "protected", "public", "readonly", "ref", "return", "sealed", "sizeof",
    "stackalloc", "static", "struct", "switch", "this", "throw", "true", "try", "typeof",
    "unchecked", "unsafe", "using", "virtual", "volatile", "while",
];

/// Contextual keywords highlighted as keywords wherever they appear
const CONTEXTUAL: &[&str] = &[
    "async", "await", "dynamic", "nameof", "partial", "record", "var", "when", "where", "yield",
];

/// Modifiers that may precede a member declaration
pub(crate) const MEMBER_MODIFIERS: &[&str] = &[
    "abstract", "async", "extern", "internal", "new", "override", "partial", "private",
    "protected", "public", "readonly", "sealed", "static", "unsafe", "virtual",
];

/// Access modifiers replaced by `public` when a method is promoted
pub(crate) const ACCESS_MODIFIERS: &[&str] = &["internal", "private", "protected", "public"];

/// Keywords that introduce a type declaration
pub(crate) const TYPE_DECLARATION_KEYWORDS: &[&str] =
    &["class", "enum", "interface", "record", "struct"];

/// Modifiers that may precede a parameter type
pub(crate) const PARAMETER_MODIFIERS: &[&str] = &["in", "out", "params", "ref", "this"];

pub(crate) fn is_predefined_type(word: &str) -> bool {
    PREDEFINED_TYPES.contains(&word)
}

pub(crate) fn is_keyword(word: &str) -> bool {
    RESERVED.contains(&word) || CONTEXTUAL.contains(&word)
}
