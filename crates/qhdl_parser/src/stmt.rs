//! Architecture statements and association lists.

use crate::ast::*;
use crate::parser::{PResult, Parser};
use crate::token::TokenKind;

/// A statement in an architecture body, before it is sorted into
/// instances and assignments.
pub(crate) enum Statement {
    Instance(Instance),
    Assignment(Assignment),
}

impl<'src> Parser<'src> {
    /// `id : [component] id [generic map (...)] [port map (...)] ;`
    /// or `id <= id ;`
    pub(crate) fn parse_statement(&mut self) -> PResult<Statement> {
        if self.at(TokenKind::Identifier) && self.peek_is(TokenKind::LessEquals) {
            return self.parse_assignment().map(Statement::Assignment);
        }
        if !(self.at(TokenKind::Identifier) && self.peek_is(TokenKind::Colon)) {
            return Err(self.expected("instance label or signal assignment"));
        }

        let (label, label_span) = self.expect_name()?;
        self.expect(TokenKind::Colon)?;
        self.eat(TokenKind::Component);
        let (component, component_span) = self.expect_name()?;

        let generic_map = if self.eat(TokenKind::Generic) {
            self.expect(TokenKind::Map)?;
            self.parse_assoc_list()?
        } else {
            Vec::new()
        };
        let port_map = if self.eat(TokenKind::Port) {
            self.expect(TokenKind::Map)?;
            self.parse_assoc_list()?
        } else {
            Vec::new()
        };
        let end = self.expect(TokenKind::Semicolon)?;

        Ok(Statement::Instance(Instance {
            label,
            component,
            generic_map,
            port_map,
            span: label_span.to(end),
            label_span,
            component_span,
        }))
    }

    fn parse_assignment(&mut self) -> PResult<Assignment> {
        let (target, target_span) = self.expect_name()?;
        self.expect(TokenKind::LessEquals)?;
        let (source, source_span) = self.expect_name()?;
        let end = self.expect(TokenKind::Semicolon)?;
        Ok(Assignment {
            target,
            target_span,
            source,
            source_span,
            span: target_span.to(end),
        })
    }

    /// `( assoc {, assoc} )` where `assoc := [id =>] (expr | open)`
    fn parse_assoc_list(&mut self) -> PResult<Vec<Association>> {
        self.expect(TokenKind::LeftParen)?;
        let mut assocs = Vec::new();
        loop {
            let start = self.current_span();
            let formal = if self.at(TokenKind::Identifier) && self.peek_is(TokenKind::Arrow) {
                let formal = self.expect_name()?;
                self.expect(TokenKind::Arrow)?;
                Some(formal)
            } else {
                None
            };
            let actual = if self.eat(TokenKind::Open) {
                Actual::Open
            } else {
                Actual::Expr(self.parse_expr()?)
            };
            assocs.push(Association {
                formal,
                actual,
                span: start.to(self.prev_span()),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(assocs)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_str;
    use qhdl_common::Interner;

    fn arch(src: &str, interner: &Interner) -> ArchitectureBody {
        let file = parse_str(src, interner).unwrap();
        let arch = file.architectures().next().unwrap().clone();
        arch
    }

    #[test]
    fn named_instance() {
        let interner = Interner::new();
        let a = arch(
            "architecture s of Top is begin
                B1 : Beamsplitter generic map (theta => 0.5)
                    port map (In1 => a, In2 => open, Out1 => c, Out2 => d);
             end s;",
            &interner,
        );
        assert_eq!(a.instances.len(), 1);
        let b1 = &a.instances[0];
        assert_eq!(interner.spelling(b1.label), "B1");
        assert_eq!(interner.spelling(b1.component), "Beamsplitter");
        assert_eq!(b1.generic_map.len(), 1);
        assert_eq!(b1.port_map.len(), 4);
        assert!(matches!(b1.port_map[1].actual, Actual::Open));
        let (formal, _) = b1.port_map[2].formal.unwrap();
        assert_eq!(interner.spelling(formal), "Out1");
    }

    #[test]
    fn positional_instance_with_component_keyword() {
        let interner = Interner::new();
        let a = arch(
            "architecture s of Top is begin
                P : component Phase port map (x, y);
             end;",
            &interner,
        );
        let p = &a.instances[0];
        assert!(p.generic_map.is_empty());
        assert!(p.port_map.iter().all(|assoc| assoc.formal.is_none()));
        assert_eq!(
            p.port_map[1].actual_name().map(|n| interner.spelling(n).to_string()),
            Some("y".to_string())
        );
    }

    #[test]
    fn signal_assignment() {
        let interner = Interner::new();
        let a = arch(
            "architecture s of Top is begin Out1 <= s1; end;",
            &interner,
        );
        assert!(a.instances.is_empty());
        assert_eq!(a.assignments.len(), 1);
        assert_eq!(interner.spelling(a.assignments[0].target), "Out1");
        assert_eq!(interner.spelling(a.assignments[0].source), "s1");
    }

    #[test]
    fn assignment_source_must_be_a_name() {
        let interner = Interner::new();
        let err = parse_str("architecture s of Top is begin o <= 1; end;", &interner).unwrap_err();
        assert_eq!(err.expected, "identifier");
        assert_eq!(err.found, "`1`");
    }

    #[test]
    fn missing_semicolon_after_instance() {
        let interner = Interner::new();
        let err = parse_str(
            "architecture s of Top is begin\n  B1 : Beamsplitter port map (a, b)\nend;",
            &interner,
        )
        .unwrap_err();
        assert_eq!(err.expected, "`;`");
        assert_eq!(err.found, "`end`");
        assert_eq!((err.line, err.col), (3, 1));
    }

    #[test]
    fn stray_statement() {
        let interner = Interner::new();
        let err = parse_str("architecture s of Top is begin signal x; end;", &interner).unwrap_err();
        assert_eq!(err.expected, "instance label or signal assignment");
    }
}
