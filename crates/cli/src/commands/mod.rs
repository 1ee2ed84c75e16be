pub mod compile;
pub mod diagnostics;
pub mod document;
pub mod identifiers;
pub mod tokens;

use serde::Serialize;
use snippet_types::OffsetRange;

/// JSON form of a template range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct RangeJson {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) length: usize,
}

impl From<OffsetRange> for RangeJson {
    fn from(range: OffsetRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
            length: range.len(),
        }
    }
}
