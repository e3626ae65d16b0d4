//! Source text management and location tracking for QHDL design files.
//!
//! [`SourceDb`] owns every loaded file, [`Span`] ties byte ranges to a
//! [`FileId`], and [`LineIndex`] turns offsets into the 1-indexed line and
//! column pairs shown in diagnostics and syntax errors.

#![warn(missing_docs)]

pub mod line_index;
pub mod source_db;
pub mod span;

pub use line_index::LineIndex;
pub use source_db::{ResolvedSpan, SourceDb, SourceFile};
pub use span::{FileId, Span};
