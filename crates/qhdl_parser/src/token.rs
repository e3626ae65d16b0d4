//! Token kinds produced by the QHDL lexer.

use qhdl_source::Span;
use serde::{Deserialize, Serialize};

/// A QHDL token kind.
///
/// Literal values are not stored; the parser reads them back from the
/// source text through the token span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    /// `all`
    All,
    /// `architecture`
    Architecture,
    /// `begin`
    Begin,
    /// `component`
    Component,
    /// `end`
    End,
    /// `entity`
    Entity,
    /// `generic`
    Generic,
    /// `in`
    In,
    /// `is`
    Is,
    /// `library`
    Library,
    /// `map`
    Map,
    /// `of`
    Of,
    /// `open`
    Open,
    /// `out`
    Out,
    /// `port`
    Port,
    /// `signal`
    Signal,
    /// `use`
    Use,

    // Literals and names
    /// An identifier.
    Identifier,
    /// An integer literal such as `42` or `1_000`.
    IntLiteral,
    /// A real literal such as `0.785` or `1.0e-3`.
    RealLiteral,
    /// A double-quoted string literal.
    StringLiteral,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `:=`
    ColonEquals,
    /// `<=`
    LessEquals,
    /// `=>`
    Arrow,
    /// `.`
    Dot,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// How the token is named in "expected ..., found ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::All => "`all`",
            TokenKind::Architecture => "`architecture`",
            TokenKind::Begin => "`begin`",
            TokenKind::Component => "`component`",
            TokenKind::End => "`end`",
            TokenKind::Entity => "`entity`",
            TokenKind::Generic => "`generic`",
            TokenKind::In => "`in`",
            TokenKind::Is => "`is`",
            TokenKind::Library => "`library`",
            TokenKind::Map => "`map`",
            TokenKind::Of => "`of`",
            TokenKind::Open => "`open`",
            TokenKind::Out => "`out`",
            TokenKind::Port => "`port`",
            TokenKind::Signal => "`signal`",
            TokenKind::Use => "`use`",
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::RealLiteral => "real literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::ColonEquals => "`:=`",
            TokenKind::LessEquals => "`<=`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Dot => "`.`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Eof => "end of file",
        }
    }

    /// Returns `true` for reserved words.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::All
                | TokenKind::Architecture
                | TokenKind::Begin
                | TokenKind::Component
                | TokenKind::End
                | TokenKind::Entity
                | TokenKind::Generic
                | TokenKind::In
                | TokenKind::Is
                | TokenKind::Library
                | TokenKind::Map
                | TokenKind::Of
                | TokenKind::Open
                | TokenKind::Out
                | TokenKind::Port
                | TokenKind::Signal
                | TokenKind::Use
        )
    }
}

/// A token kind with its location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// Kind.
    pub kind: TokenKind,
    /// Location in the source.
    pub span: Span,
}

/// Looks up a lowercase word in the keyword table.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "all" => TokenKind::All,
        "architecture" => TokenKind::Architecture,
        "begin" => TokenKind::Begin,
        "component" => TokenKind::Component,
        "end" => TokenKind::End,
        "entity" => TokenKind::Entity,
        "generic" => TokenKind::Generic,
        "in" => TokenKind::In,
        "is" => TokenKind::Is,
        "library" => TokenKind::Library,
        "map" => TokenKind::Map,
        "of" => TokenKind::Of,
        "open" => TokenKind::Open,
        "out" => TokenKind::Out,
        "port" => TokenKind::Port,
        "signal" => TokenKind::Signal,
        "use" => TokenKind::Use,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(lookup_keyword("entity"), Some(TokenKind::Entity));
        assert_eq!(lookup_keyword("open"), Some(TokenKind::Open));
        assert_eq!(lookup_keyword("fieldmode"), None);
        assert_eq!(lookup_keyword("inout"), None);
    }

    #[test]
    fn keywords_are_flagged() {
        assert!(TokenKind::Architecture.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Semicolon.is_keyword());
    }
}
