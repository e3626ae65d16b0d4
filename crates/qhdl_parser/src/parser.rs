//! Core parser state and the top-level design-file rule.
//!
//! [`Parser`] provides the token-level primitives (`at`, `eat`, `expect`,
//! `expect_name`) shared by the declaration, statement and expression rules
//! in the sibling modules. Every rule returns [`PResult`], so the first
//! mismatch unwinds straight out of the parse with `?`.

use qhdl_common::{Interner, Name};
use qhdl_source::{FileId, LineIndex, Span};

use crate::ast::{ContextItem, DesignFile, DesignUnit};
use crate::error::SyntaxError;
use crate::token::{Token, TokenKind};

/// Result of a grammar rule.
pub type PResult<T> = Result<T, SyntaxError>;

/// Deepest expression tree the parser builds. Parentheses and each operator
/// of a chain count one level; later stages walk expressions recursively.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser over a lexed token stream.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    source: &'src str,
    lines: &'src LineIndex,
    pub(crate) interner: &'src Interner,
}

impl<'src> Parser<'src> {
    /// Creates a parser. `tokens` must end with [`TokenKind::Eof`].
    pub fn new(
        tokens: Vec<Token>,
        source: &'src str,
        lines: &'src LineIndex,
        interner: &'src Interner,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            source,
            lines,
            interner,
        }
    }

    pub(crate) fn current(&self) -> TokenKind {
        self.tokens.get(self.pos).map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Span::new(FileId::DUMMY, 0, 0), |t| t.span)
    }

    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos + 1).is_some_and(|t| t.kind == kind)
    }

    pub(crate) fn prev_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|p| self.tokens.get(p)) {
            Some(tok) => tok.span,
            None => self.current_span(),
        }
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes `kind` and returns its span.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        let span = self.current_span();
        if self.eat(kind) {
            Ok(span)
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    /// Consumes an identifier.
    pub(crate) fn expect_name(&mut self) -> PResult<(Name, Span)> {
        if self.at(TokenKind::Identifier) {
            let span = self.current_span();
            let name = self.interner.intern_name(self.current_text());
            self.advance();
            Ok((name, span))
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// Enters one level of expression nesting at the current token.
    pub(crate) fn nest(&mut self) -> PResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.expected("shallower nesting"));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn nesting(&self) -> usize {
        self.depth
    }

    pub(crate) fn unnest_to(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Builds an "expected `what`" error at the current token.
    pub(crate) fn expected(&self, what: &str) -> SyntaxError {
        let found = match self.current() {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Identifier => format!("identifier `{}`", self.current_text()),
            _ => format!("`{}`", self.current_text()),
        };
        self.error_at(self.current_span(), what, found)
    }

    pub(crate) fn error_at(&self, span: Span, expected: &str, found: String) -> SyntaxError {
        let (line, col) = self.lines.line_col(span.start);
        SyntaxError {
            line,
            col,
            expected: expected.to_string(),
            found,
            span,
        }
    }

    /// Parses the optional unit name after `end` and checks it repeats `unit`.
    pub(crate) fn parse_end_name(&mut self, unit: Name) -> PResult<()> {
        if !self.at(TokenKind::Identifier) {
            return Ok(());
        }
        let span = self.current_span();
        let (name, _) = self.expect_name()?;
        if name != unit {
            return Err(self.error_at(
                span,
                &format!("`{}`", self.interner.spelling(unit)),
                format!("`{}`", self.interner.spelling(name)),
            ));
        }
        Ok(())
    }

    /// Parses a whole file.
    pub fn parse_design_file(&mut self) -> PResult<DesignFile> {
        let start = self.current_span();
        let mut context = Vec::new();
        let mut units = Vec::new();
        while !self.at_eof() {
            match self.current() {
                TokenKind::Library => context.push(self.parse_library_clause()?),
                TokenKind::Use => context.push(self.parse_use_clause()?),
                TokenKind::Entity => units.push(DesignUnit::Entity(self.parse_entity()?)),
                TokenKind::Architecture => {
                    units.push(DesignUnit::Architecture(self.parse_architecture()?))
                }
                _ => return Err(self.expected("`entity`, `architecture`, `library` or `use`")),
            }
        }
        Ok(DesignFile {
            context,
            units,
            span: start.to(self.current_span()),
        })
    }

    fn parse_library_clause(&mut self) -> PResult<ContextItem> {
        let start = self.expect(TokenKind::Library)?;
        let mut names = vec![self.expect_name()?.0];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_name()?.0);
        }
        let end = self.expect(TokenKind::Semicolon)?;
        Ok(ContextItem::Library {
            names,
            span: start.to(end),
        })
    }

    fn parse_use_clause(&mut self) -> PResult<ContextItem> {
        let start = self.expect(TokenKind::Use)?;
        let mut path = vec![self.expect_name()?.0];
        let mut all = false;
        while self.eat(TokenKind::Dot) {
            if self.eat(TokenKind::All) {
                all = true;
                break;
            }
            if !self.at(TokenKind::Identifier) {
                return Err(self.expected("identifier or `all`"));
            }
            path.push(self.expect_name()?.0);
        }
        let end = self.expect(TokenKind::Semicolon)?;
        Ok(ContextItem::Use {
            path,
            all,
            span: start.to(end),
        })
    }
}
