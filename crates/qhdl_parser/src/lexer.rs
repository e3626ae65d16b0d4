//! Lexical analysis of QHDL source text.
//!
//! Keywords are matched case-insensitively, `--` starts a comment running to
//! the end of the line, and numeric literals may contain `_` separators and
//! an exponent. The first malformed token stops lexing with a [`SyntaxError`].

use qhdl_source::{FileId, LineIndex, Span};

use crate::error::SyntaxError;
use crate::token::{lookup_keyword, Token, TokenKind};

/// Splits `source` into tokens terminated by [`TokenKind::Eof`].
pub fn lex(source: &str, file: FileId, lines: &LineIndex) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        lines,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    lines: &'a LineIndex,
}

impl<'a> Lexer<'a> {
    fn lex_all(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: self.span_from(self.pos),
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, start: usize, expected: &str, found: String) -> SyntaxError {
        let span = self.span_from(start);
        let (line, col) = self.lines.line_col(span.start);
        SyntaxError {
            line,
            col,
            expected: expected.to_string(),
            found,
            span,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.peek().is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek() == b'-' && self.peek_at(1) == b'-' {
                while self.pos < self.source.len() && self.peek() != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            return;
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let b = self.peek();
        let kind = if b.is_ascii_alphabetic() {
            self.lex_word(start)
        } else if b.is_ascii_digit() {
            self.lex_number(start)?
        } else if b == b'"' {
            self.lex_string(start)?
        } else {
            self.lex_punct(start)?
        };
        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_word(&mut self, start: usize) -> TokenKind {
        while is_ident_char(self.peek()) {
            self.pos += 1;
        }
        let word = String::from_utf8_lossy(&self.source[start..self.pos]).to_ascii_lowercase();
        lookup_keyword(&word).unwrap_or(TokenKind::Identifier)
    }

    fn lex_number(&mut self, start: usize) -> Result<TokenKind, SyntaxError> {
        self.eat_digits();
        let mut kind = TokenKind::IntLiteral;
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
            kind = TokenKind::RealLiteral;
        }
        if matches!(self.peek(), b'e' | b'E') {
            let sign = usize::from(matches!(self.peek_at(1), b'+' | b'-'));
            if !self.peek_at(1 + sign).is_ascii_digit() {
                self.pos += 1 + sign;
                return Err(self.error(start, "exponent digits", self.found_here()));
            }
            self.pos += 1 + sign;
            self.eat_digits();
        }
        if is_ident_char(self.peek()) {
            let bad = self.pos;
            while is_ident_char(self.peek()) {
                self.pos += 1;
            }
            let text = String::from_utf8_lossy(&self.source[start..self.pos]);
            return Err(self.error(bad, "a numeric literal", format!("`{text}`")));
        }
        Ok(kind)
    }

    fn eat_digits(&mut self) {
        while self.peek().is_ascii_digit() || (self.peek() == b'_' && self.peek_at(1).is_ascii_digit())
        {
            self.pos += 1;
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<TokenKind, SyntaxError> {
        self.pos += 1;
        loop {
            if self.pos >= self.source.len() || self.peek() == b'\n' {
                return Err(self.error(start, "closing `\"`", self.found_here()));
            }
            if self.peek() == b'"' {
                if self.peek_at(1) == b'"' {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                return Ok(TokenKind::StringLiteral);
            }
            self.pos += 1;
        }
    }

    fn lex_punct(&mut self, start: usize) -> Result<TokenKind, SyntaxError> {
        let (kind, len) = match (self.peek(), self.peek_at(1)) {
            (b':', b'=') => (TokenKind::ColonEquals, 2),
            (b'<', b'=') => (TokenKind::LessEquals, 2),
            (b'=', b'>') => (TokenKind::Arrow, 2),
            (b'(', _) => (TokenKind::LeftParen, 1),
            (b')', _) => (TokenKind::RightParen, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b';', _) => (TokenKind::Semicolon, 1),
            (b':', _) => (TokenKind::Colon, 1),
            (b'.', _) => (TokenKind::Dot, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            _ => {
                let found = self.found_here();
                self.pos += self.char_len();
                return Err(self.error(start, "a token", found));
            }
        };
        self.pos += len;
        Ok(kind)
    }

    fn char_len(&self) -> usize {
        let rest = &self.source[self.pos..];
        let text = String::from_utf8_lossy(&rest[..rest.len().min(4)]);
        text.chars().next().map_or(1, |c| c.len_utf8().max(1))
    }

    fn found_here(&self) -> String {
        if self.pos >= self.source.len() {
            return "end of file".to_string();
        }
        let rest = &self.source[self.pos..];
        let text = String::from_utf8_lossy(&rest[..rest.len().min(4)]);
        match text.chars().next() {
            Some('\n') => "end of line".to_string(),
            Some(c) => format!("`{c}`"),
            None => "end of file".to_string(),
        }
    }
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let lines = LineIndex::new(src);
        lex(src, FileId::DUMMY, &lines)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(src: &str) -> SyntaxError {
        let lines = LineIndex::new(src);
        lex(src, FileId::DUMMY, &lines).unwrap_err()
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            kinds("ENTITY Entity entity"),
            vec![TokenKind::Entity, TokenKind::Entity, TokenKind::Entity, TokenKind::Eof]
        );
    }

    #[test]
    fn port_declaration() {
        assert_eq!(
            kinds("In1, In2 : in fieldmode;"),
            vec![
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::In,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn compound_punctuation() {
        assert_eq!(
            kinds(":= <= => : ."),
            vec![
                TokenKind::ColonEquals,
                TokenKind::LessEquals,
                TokenKind::Arrow,
                TokenKind::Colon,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(
            kinds("42 1_000 0.7853981633974483 1.0e-3 2E4"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::RealLiteral,
                TokenKind::RealLiteral,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("-- header\nsignal -- trailing\n s1"),
            vec![TokenKind::Signal, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn minus_is_not_a_comment() {
        assert_eq!(
            kinds("a - -b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_with_escaped_quote() {
        assert_eq!(
            kinds(r#""say ""hi""" x"#),
            vec![TokenKind::StringLiteral, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = lex_err("signal s;\n  \"oops\n");
        assert_eq!((err.line, err.col), (2, 3));
        assert_eq!(err.expected, "closing `\"`");
    }

    #[test]
    fn stray_character() {
        let err = lex_err("port (a : in f) # x");
        assert_eq!(err.found, "`#`");
        assert_eq!(err.col, 17);
    }

    #[test]
    fn malformed_number() {
        let err = lex_err("x := 12abc;");
        assert_eq!(err.found, "`12abc`");
        let err = lex_err("x := 1e;");
        assert_eq!(err.expected, "exponent digits");
    }

    #[test]
    fn spans_cover_tokens() {
        let src = "theta : real";
        let lines = LineIndex::new(src);
        let tokens = lex(src, FileId::DUMMY, &lines).unwrap();
        assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 5));
        assert_eq!((tokens[2].span.start, tokens[2].span.end), (8, 12));
    }
}
