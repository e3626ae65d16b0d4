//! Expression rules for generic values.
//!
//! ```text
//! expr    := term {(+|-) term}
//! term    := factor {(*|/) factor}
//! factor  := [+|-] primary
//! primary := int | real | string | id | ( expr )
//! ```

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::parser::{PResult, Parser};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        let base = self.nesting();
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.current() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => {
                    self.unnest_to(base);
                    return Ok(lhs);
                }
            };
            self.nest()?;
            self.advance();
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        let base = self.nesting();
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.current() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => {
                    self.unnest_to(base);
                    return Ok(lhs);
                }
            };
            self.nest()?;
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        let op = match self.current() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_primary(),
        };
        let start = self.current_span();
        self.advance();
        let operand = self.parse_primary()?;
        Ok(Expr::Unary {
            op,
            span: start.to(operand.span()),
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.current_span();
        match self.current() {
            TokenKind::IntLiteral => {
                let value = self.int_value()?;
                self.advance();
                Ok(Expr::Int { value, span })
            }
            TokenKind::RealLiteral => {
                let value = self.real_value()?;
                self.advance();
                Ok(Expr::Real { value, span })
            }
            TokenKind::StringLiteral => {
                let text = self.current_text();
                let value = text[1..text.len() - 1].replace("\"\"", "\"");
                self.advance();
                Ok(Expr::Str { value, span })
            }
            TokenKind::Identifier => {
                let (name, span) = self.expect_name()?;
                Ok(Expr::Name { name, span })
            }
            TokenKind::LeftParen => {
                let base = self.nesting();
                self.nest()?;
                self.advance();
                let inner = self.parse_expr()?;
                let end = self.expect(TokenKind::RightParen)?;
                self.unnest_to(base);
                Ok(Expr::Paren {
                    inner: Box::new(inner),
                    span: span.to(end),
                })
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// Value of the current integer literal, applying any exponent.
    fn int_value(&self) -> PResult<i64> {
        let text = self.current_text().replace('_', "");
        let span = self.current_span();
        let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
            Some(at) => (&text[..at], &text[at + 1..]),
            None => (text.as_str(), "0"),
        };
        let out_of_range = || self.error_at(span, "an integer in range", format!("`{text}`"));
        let base: i64 = mantissa.parse().map_err(|_| out_of_range())?;
        let exponent: u32 = exponent.trim_start_matches('+').parse().map_err(|_| {
            self.error_at(span, "a non-negative integer exponent", format!("`{text}`"))
        })?;
        10i64
            .checked_pow(exponent)
            .and_then(|scale| base.checked_mul(scale))
            .ok_or_else(out_of_range)
    }

    fn real_value(&self) -> PResult<f64> {
        let text = self.current_text().replace('_', "");
        text.parse()
            .map_err(|_| self.error_at(self.current_span(), "a real literal", format!("`{text}`")))
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        span: lhs.span().to(rhs.span()),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_str;
    use qhdl_common::Interner;

    fn default_of(expr: &str, interner: &Interner) -> Expr {
        let src = format!("entity E is generic (g : real := {expr}); end;");
        let file = parse_str(&src, interner).unwrap();
        let entity = file.entities().next().unwrap();
        entity.generics[0].default.clone().unwrap()
    }

    #[test]
    fn precedence() {
        let interner = Interner::new();
        match default_of("1 + 2 * 3", &interner) {
            Expr::Binary { op: BinaryOp::Add, rhs, .. } => {
                assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("expected addition, got {other:?}"),
        }
    }

    #[test]
    fn left_associative() {
        let interner = Interner::new();
        match default_of("8 - 4 - 2", &interner) {
            Expr::Binary { op: BinaryOp::Sub, lhs, .. } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Sub, .. }));
            }
            other => panic!("expected subtraction, got {other:?}"),
        }
    }

    #[test]
    fn unary_and_parens() {
        let interner = Interner::new();
        match default_of("-(theta / 2)", &interner) {
            Expr::Unary { op: UnaryOp::Neg, operand, .. } => {
                assert!(matches!(*operand, Expr::Paren { .. }));
            }
            other => panic!("expected negation, got {other:?}"),
        }
    }

    #[test]
    fn literal_values() {
        let interner = Interner::new();
        assert!(matches!(default_of("1_000", &interner), Expr::Int { value: 1000, .. }));
        assert!(matches!(default_of("2e3", &interner), Expr::Int { value: 2000, .. }));
        assert!(matches!(default_of("1.5e-1", &interner), Expr::Real { value, .. } if value == 0.15));
        assert!(matches!(
            default_of("\"a \"\"b\"\"\"", &interner),
            Expr::Str { ref value, .. } if value == "a \"b\""
        ));
    }

    #[test]
    fn integer_overflow_is_a_syntax_error() {
        let interner = Interner::new();
        let err = parse_str(
            "entity E is generic (g : integer := 99999999999999999999); end;",
            &interner,
        )
        .unwrap_err();
        assert_eq!(err.expected, "an integer in range");
    }

    #[test]
    fn nesting_is_limited() {
        let interner = Interner::new();
        let deep = format!("{}1.0{}", "(".repeat(100_000), ")".repeat(100_000));
        let err = parse_str(&format!("entity E is generic (g : real := {deep}); end;"), &interner)
            .unwrap_err();
        assert_eq!(err.expected, "shallower nesting");
        assert_eq!(err.found, "`(`");

        let chain = vec!["1"; 1_000].join(" + ");
        let err = parse_str(&format!("entity E is generic (g : real := {chain}); end;"), &interner)
            .unwrap_err();
        assert_eq!(err.expected, "shallower nesting");

        let nested = format!("{}1.0{}", "(".repeat(100), ")".repeat(100));
        assert!(matches!(default_of(&nested, &interner), Expr::Paren { .. }));
        let sum = vec!["1"; 100].join(" + ");
        assert!(matches!(default_of(&sum, &interner), Expr::Binary { .. }));
    }

    #[test]
    fn missing_operand() {
        let interner = Interner::new();
        let err = parse_str("entity E is generic (g : real := 1 + ); end;", &interner).unwrap_err();
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found, "`)`");
    }
}
