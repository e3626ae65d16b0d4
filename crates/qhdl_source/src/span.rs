//! File identifiers and byte-offset spans.

use serde::{Deserialize, Serialize};

/// Index of a file inside a [`SourceDb`](crate::SourceDb).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Placeholder for text that did not come from a registered file,
    /// such as a string handed directly to `parse_str`.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A half-open byte range `[start, end)` inside one file.
///
/// Every AST node and every diagnostic label carries one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The file the range points into.
    pub file: FileId,
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
}

impl Span {
    /// A span that points nowhere.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a span over `[start, end)` in `file`.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// Spans from different files cannot be joined; `self` is returned
    /// unchanged in that case.
    pub fn to(self, other: Span) -> Span {
        if self.file != other.file {
            return self;
        }
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if the span does not belong to a registered file.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_covers_both() {
        let f = FileId::from_raw(0);
        let a = Span::new(f, 12, 20);
        let b = Span::new(f, 3, 14);
        assert_eq!(a.to(b), Span::new(f, 3, 20));
        assert_eq!(a.to(b), b.to(a));
    }

    #[test]
    fn join_across_files_keeps_left() {
        let a = Span::new(FileId::from_raw(0), 1, 2);
        let b = Span::new(FileId::from_raw(1), 5, 9);
        assert_eq!(a.to(b), a);
    }

    #[test]
    fn len_and_empty() {
        let f = FileId::from_raw(2);
        assert_eq!(Span::new(f, 4, 10).len(), 6);
        assert!(Span::new(f, 4, 4).is_empty());
        assert!(!Span::new(f, 4, 5).is_empty());
    }

    #[test]
    fn dummy() {
        assert!(Span::DUMMY.is_dummy());
        assert!(!Span::new(FileId::from_raw(0), 0, 0).is_dummy());
        assert_eq!(FileId::DUMMY.as_raw(), u32::MAX);
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(FileId::from_raw(3), 7, 11);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
