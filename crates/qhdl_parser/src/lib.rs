//! Recursive-descent parser for the structural QHDL subset.
//!
//! The entry points are [`parse_str`] for in-memory text, [`parse_file`] for a
//! file held in a [`SourceDb`], and [`parse_all`] which parses many files in
//! parallel. Parsing stops at the first problem and returns a
//! [`SyntaxError`]; there is no partial AST.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): bytes to [`Token`]s with case-insensitive keywords.
//! - **Parser** ([`parser`]): token primitives plus the top-level rule, with
//!   declarations, statements and expressions in private sibling modules.
//! - **AST** ([`ast`]): spanned, serde-enabled syntax tree.

#![warn(missing_docs)]

pub mod ast;
mod decl;
pub mod error;
mod expr;
pub mod lexer;
pub mod parser;
mod stmt;
pub mod token;

pub use ast::DesignFile;
pub use error::SyntaxError;
pub use token::{Token, TokenKind};

use qhdl_common::Interner;
use qhdl_source::{FileId, LineIndex, SourceDb, SourceFile};
use rayon::prelude::*;

/// Parses QHDL text that is not registered in a [`SourceDb`].
///
/// Spans in the result use [`FileId::DUMMY`].
pub fn parse_str(text: &str, interner: &Interner) -> Result<DesignFile, SyntaxError> {
    let lines = LineIndex::new(text);
    parse_text(text, FileId::DUMMY, &lines, interner)
}

/// Parses one registered file.
pub fn parse_file(file: &SourceFile, interner: &Interner) -> Result<DesignFile, SyntaxError> {
    let lines = LineIndex::new(&file.content);
    parse_text(&file.content, file.id, &lines, interner)
}

/// Parses several files in parallel.
///
/// Results come back in the order of `files`. Each file succeeds or fails
/// on its own; ids not present in `db` are skipped.
pub fn parse_all(
    db: &SourceDb,
    files: &[FileId],
    interner: &Interner,
) -> Vec<(FileId, Result<DesignFile, SyntaxError>)> {
    files
        .par_iter()
        .filter_map(|&id| db.get(id).map(|file| (id, parse_file(file, interner))))
        .collect()
}

fn parse_text(
    text: &str,
    file: FileId,
    lines: &LineIndex,
    interner: &Interner,
) -> Result<DesignFile, SyntaxError> {
    let tokens = lexer::lex(text, file, lines)?;
    parser::Parser::new(tokens, text, lines, interner).parse_design_file()
}
