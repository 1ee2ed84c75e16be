//! Byte offset ranges shared by the template source and the synthetic document.

/// Byte offset range in a text.
///
/// The same type is used for template-source coordinates and for
/// synthetic-document coordinates; which space a value lives in is
/// determined by the API that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct OffsetRange {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range from a start offset and a length.
    #[must_use]
    pub const fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if an offset lies inside the range (end exclusive).
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if an offset lies inside the range or sits exactly on its end.
    ///
    /// Caret positions use this form: a cursor right after the last
    /// character still belongs to the range.
    #[must_use]
    pub const fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Returns the overlap of two ranges, or `None` if they are disjoint.
    ///
    /// Zero-width ranges overlap a range they touch.
    #[must_use]
    pub fn intersect(&self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end || (start == end && !self.is_empty() && !other.is_empty()) {
            return None;
        }
        Some(Self { start, end })
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
