//! The set of design files taking part in one elaboration run.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use qhdl_common::ContentHash;

use crate::line_index::LineIndex;
use crate::span::{FileId, Span};

/// One QHDL design file held in memory.
pub struct SourceFile {
    /// Position of this file in its [`SourceDb`].
    pub id: FileId,
    /// Path on disk, or a synthetic name for in-memory text.
    pub path: PathBuf,
    /// Full file text.
    pub content: String,
    /// Hash of `content`.
    pub content_hash: ContentHash,
    lines: LineIndex,
}

impl SourceFile {
    /// Wraps `content` and indexes its lines.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        Self {
            id,
            lines: LineIndex::new(&content),
            content_hash: ContentHash::from_bytes(content.as_bytes()),
            path,
            content,
        }
    }

    /// 1-indexed `(line, column)` of a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        self.lines.line_col(offset)
    }

    /// Text between two byte offsets, clamped to the file.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        let len = self.content.len();
        let start = (start as usize).min(len);
        let end = (end as usize).clamp(start, len);
        self.content.get(start..end).unwrap_or("")
    }

    /// The full text of 1-indexed line `line`, without its newline.
    pub fn line_text(&self, line: u32) -> &str {
        self.content
            .lines()
            .nth(line.saturating_sub(1) as usize)
            .unwrap_or("")
    }
}

/// A [`Span`] expressed as 1-indexed line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path of the file.
    pub file_path: PathBuf,
    /// First line.
    pub start_line: u32,
    /// First column.
    pub start_col: u32,
    /// Last line.
    pub end_line: u32,
    /// Last column (inclusive).
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}

/// Owns every loaded file and resolves spans against them.
#[derive(Default)]
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a design file from disk.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path, content))
    }

    /// Registers in-memory text under `name`.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the file for `id`, if it was registered here.
    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.as_raw() as usize)
    }

    /// Returns the file for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this database.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Iterates over all files in registration order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// Identifiers of all files in registration order.
    pub fn file_ids(&self) -> Vec<FileId> {
        self.files.iter().map(|f| f.id).collect()
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file has been registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves a span to line/column form. Dummy or foreign spans yield `None`.
    pub fn resolve_span(&self, span: Span) -> Option<ResolvedSpan> {
        let file = self.get(span.file)?;
        let (start_line, start_col) = file.line_col(span.start);
        let last = span.end.saturating_sub(1).max(span.start);
        let (end_line, end_col) = file.line_col(last);
        Some(ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        })
    }

    /// Source text covered by `span`, or `""` for a dummy span.
    pub fn snippet(&self, span: Span) -> &str {
        self.get(span.file)
            .map(|f| f.snippet(span.start, span.end))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BS: &str = "entity Beamsplitter is\n  port (In1 : in fieldmode);\nend Beamsplitter;\n";

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("bs.qhdl", BS.to_string());
        assert_eq!(db.get_file(id).content, BS);
        assert_eq!(db.len(), 1);
        assert!(db.get(FileId::DUMMY).is_none());
    }

    #[test]
    fn resolve_span_to_line_col() {
        let mut db = SourceDb::new();
        let id = db.add_source("bs.qhdl", BS.to_string());
        let start = BS.find("In1").unwrap() as u32;
        let resolved = db.resolve_span(Span::new(id, start, start + 3)).unwrap();
        assert_eq!(resolved.start_line, 2);
        assert_eq!(resolved.start_col, 9);
        assert_eq!(resolved.end_col, 11);
        assert_eq!(format!("{resolved}"), "bs.qhdl:2:9");
    }

    #[test]
    fn dummy_span_does_not_resolve() {
        let db = SourceDb::new();
        assert!(db.resolve_span(Span::DUMMY).is_none());
        assert_eq!(db.snippet(Span::DUMMY), "");
    }

    #[test]
    fn snippet_and_line_text() {
        let mut db = SourceDb::new();
        let id = db.add_source("bs.qhdl", BS.to_string());
        assert_eq!(db.snippet(Span::new(id, 7, 19)), "Beamsplitter");
        assert_eq!(db.get_file(id).line_text(3), "end Beamsplitter;");
        assert_eq!(db.get_file(id).snippet(70, 200), "");
    }

    #[test]
    fn files_are_numbered_in_order() {
        let mut db = SourceDb::new();
        let a = db.add_source("a.qhdl", String::new());
        let b = db.add_source("b.qhdl", String::new());
        assert_eq!(db.file_ids(), vec![a, b]);
        assert_ne!(a, b);
    }

    #[test]
    fn load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bs.qhdl");
        std::fs::write(&path, BS).unwrap();

        let mut db = SourceDb::new();
        let id = db.load_file(&path).unwrap();
        assert_eq!(db.get_file(id).content_hash, ContentHash::from_bytes(BS.as_bytes()));
    }
}
