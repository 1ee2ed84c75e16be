//! Snapshot-friendly formatting of analysis results.
//!
//! Spans are printed with the template text they cover so snapshots stay
//! readable when offsets shift.

use std::fmt::Display;

use snippet_types::OffsetRange;

/// Format labelled source spans, one per line, as `label start..end `text``.
///
/// # Example
///
/// ```ignore
/// use snippet_test_utils::format_spans;
///
/// let tokens = assembler.tokens()?;
/// insta::assert_snapshot!(format_spans(source, tokens.iter().map(|t| (t.category, t.range))));
/// ```
pub fn format_spans<L, I>(source: &str, spans: I) -> String
where
    L: Display,
    I: IntoIterator<Item = (L, OffsetRange)>,
{
    let lines: Vec<String> = spans
        .into_iter()
        .map(|(label, range)| {
            let text = source.get(range.start..range.end).unwrap_or("<out of bounds>");
            format!("{label} {range} `{text}`")
        })
        .collect();

    if lines.is_empty() {
        String::from("(no spans)")
    } else {
        lines.join("\n")
    }
}

/// Format diagnostics with their messages only (without position info).
/// Useful when you only care about the error messages, not positions.
pub fn format_diagnostic_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no diagnostics)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
