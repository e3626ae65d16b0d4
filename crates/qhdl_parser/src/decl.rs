//! Declaration rules: entities, architectures, components, generics, ports, signals.

use qhdl_common::Name;
use qhdl_source::Span;

use crate::ast::*;
use crate::parser::{PResult, Parser};
use crate::stmt::Statement;
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    /// `entity id is [generic_clause] [port_clause] end [entity] [id] ;`
    pub(crate) fn parse_entity(&mut self) -> PResult<EntityDecl> {
        let start = self.expect(TokenKind::Entity)?;
        let (name, name_span) = self.expect_name()?;
        self.expect(TokenKind::Is)?;
        let (generics, ports) = self.parse_interface()?;
        self.expect(TokenKind::End)?;
        self.eat(TokenKind::Entity);
        self.parse_end_name(name)?;
        let end = self.expect(TokenKind::Semicolon)?;
        Ok(EntityDecl {
            name,
            generics,
            ports,
            span: start.to(end),
            name_span,
        })
    }

    /// `[generic_clause] [port_clause]`
    fn parse_interface(&mut self) -> PResult<(Vec<GenericDecl>, Vec<PortDecl>)> {
        let generics = if self.at(TokenKind::Generic) {
            self.parse_generic_clause()?
        } else {
            Vec::new()
        };
        let ports = if self.at(TokenKind::Port) {
            self.parse_port_clause()?
        } else {
            Vec::new()
        };
        Ok((generics, ports))
    }

    /// `generic ( generic_decl {; generic_decl} ) ;`
    fn parse_generic_clause(&mut self) -> PResult<Vec<GenericDecl>> {
        self.expect(TokenKind::Generic)?;
        self.expect(TokenKind::LeftParen)?;
        let mut generics = Vec::new();
        loop {
            let names = self.parse_name_list()?;
            self.expect(TokenKind::Colon)?;
            let (ty, _) = self.expect_name()?;
            let default = if self.eat(TokenKind::ColonEquals) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            generics.extend(names.into_iter().map(|(name, span)| GenericDecl {
                name,
                ty,
                default: default.clone(),
                span,
            }));
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(generics)
    }

    /// `port ( port_decl {; port_decl} ) ;`
    fn parse_port_clause(&mut self) -> PResult<Vec<PortDecl>> {
        self.expect(TokenKind::Port)?;
        self.expect(TokenKind::LeftParen)?;
        let mut ports = Vec::new();
        loop {
            let names = self.parse_name_list()?;
            self.expect(TokenKind::Colon)?;
            let mode = if self.eat(TokenKind::In) {
                PortMode::In
            } else if self.eat(TokenKind::Out) {
                PortMode::Out
            } else {
                return Err(self.expected("`in` or `out`"));
            };
            let (ty, _) = self.expect_name()?;
            ports.extend(
                names
                    .into_iter()
                    .map(|(name, span)| PortDecl { name, mode, ty, span }),
            );
            if !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(ports)
    }

    /// `id {, id}`
    fn parse_name_list(&mut self) -> PResult<Vec<(Name, Span)>> {
        let mut names = vec![self.expect_name()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        Ok(names)
    }

    /// `architecture id of id is {component | signal} begin {stmt} end [architecture] [id] ;`
    pub(crate) fn parse_architecture(&mut self) -> PResult<ArchitectureBody> {
        let start = self.expect(TokenKind::Architecture)?;
        let (name, name_span) = self.expect_name()?;
        self.expect(TokenKind::Of)?;
        let (entity, entity_span) = self.expect_name()?;
        self.expect(TokenKind::Is)?;

        let mut components = Vec::new();
        let mut signals = Vec::new();
        loop {
            match self.current() {
                TokenKind::Component => components.push(self.parse_component()?),
                TokenKind::Signal => signals.extend(self.parse_signal_decl()?),
                TokenKind::Begin => break,
                _ => return Err(self.expected("`component`, `signal` or `begin`")),
            }
        }
        self.expect(TokenKind::Begin)?;

        let mut instances = Vec::new();
        let mut assignments = Vec::new();
        while !self.at(TokenKind::End) {
            match self.parse_statement()? {
                Statement::Instance(inst) => instances.push(inst),
                Statement::Assignment(assign) => assignments.push(assign),
            }
        }
        self.expect(TokenKind::End)?;
        self.eat(TokenKind::Architecture);
        self.parse_end_name(name)?;
        let end = self.expect(TokenKind::Semicolon)?;

        Ok(ArchitectureBody {
            name,
            entity,
            components,
            signals,
            instances,
            assignments,
            span: start.to(end),
            name_span,
            entity_span,
        })
    }

    /// `component id [is] [generic_clause] [port_clause] end component [id] ;`
    fn parse_component(&mut self) -> PResult<ComponentDecl> {
        self.expect(TokenKind::Component)?;
        let (name, span) = self.expect_name()?;
        self.eat(TokenKind::Is);
        let (generics, ports) = self.parse_interface()?;
        self.expect(TokenKind::End)?;
        self.expect(TokenKind::Component)?;
        self.parse_end_name(name)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(ComponentDecl {
            name,
            generics,
            ports,
            span,
        })
    }

    /// `signal id_list : type_name ;`
    fn parse_signal_decl(&mut self) -> PResult<Vec<SignalDecl>> {
        self.expect(TokenKind::Signal)?;
        let names = self.parse_name_list()?;
        self.expect(TokenKind::Colon)?;
        let (ty, _) = self.expect_name()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(names
            .into_iter()
            .map(|(name, span)| SignalDecl { name, ty, span })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_str;
    use qhdl_common::Interner;

    const BEAMSPLITTER: &str = "
entity Beamsplitter is
    generic (theta : real := 0.7853981633974483);
    port (In1, In2 : in fieldmode; Out1, Out2 : out fieldmode);
end entity Beamsplitter;
";

    #[test]
    fn entity_with_generics_and_ports() {
        let interner = Interner::new();
        let file = parse_str(BEAMSPLITTER, &interner).unwrap();
        let entity = file.entities().next().unwrap();
        assert_eq!(interner.spelling(entity.name), "Beamsplitter");
        assert_eq!(entity.generics.len(), 1);
        assert_eq!(interner.spelling(entity.generics[0].ty), "real");
        assert!(matches!(
            entity.generics[0].default,
            Some(Expr::Real { value, .. }) if value == 0.7853981633974483
        ));
        assert_eq!(entity.ports.len(), 4);
        assert_eq!(entity.ports[1].mode, PortMode::In);
        assert_eq!(entity.ports[2].mode, PortMode::Out);
        assert_eq!(interner.spelling(entity.ports[3].name), "Out2");
    }

    #[test]
    fn entity_end_forms() {
        let interner = Interner::new();
        for src in [
            "entity E is end;",
            "entity E is end entity;",
            "entity E is end e;",
            "ENTITY E IS END ENTITY E;",
        ] {
            assert!(parse_str(src, &interner).is_ok(), "failed on {src}");
        }
    }

    #[test]
    fn end_name_must_match() {
        let interner = Interner::new();
        let err = parse_str("entity Beamsplitter is end Splitter;", &interner).unwrap_err();
        assert_eq!(err.expected, "`Beamsplitter`");
        assert_eq!(err.found, "`Splitter`");
    }

    #[test]
    fn inout_is_rejected() {
        let interner = Interner::new();
        let err = parse_str("entity E is port (a : inout fieldmode); end;", &interner).unwrap_err();
        assert_eq!(err.expected, "`in` or `out`");
        assert_eq!(err.found, "identifier `inout`");
    }

    #[test]
    fn architecture_declarations() {
        let interner = Interner::new();
        let file = parse_str(
            "
architecture structure of DoubleBeamsplitter is
    component Beamsplitter is
        generic (theta : real := 0.7853981633974483);
        port (In1, In2 : in fieldmode; Out1, Out2 : out fieldmode);
    end component Beamsplitter;
    signal s1, s2 : fieldmode;
    signal s3 : fieldmode;
begin
end architecture structure;
",
            &interner,
        )
        .unwrap();
        let arch = file.architectures().next().unwrap();
        assert_eq!(interner.spelling(arch.entity), "DoubleBeamsplitter");
        assert_eq!(arch.components.len(), 1);
        assert_eq!(arch.components[0].ports.len(), 4);
        assert_eq!(arch.signals.len(), 3);
        assert!(arch.instances.is_empty());
    }

    #[test]
    fn component_requires_end_component() {
        let interner = Interner::new();
        let err = parse_str(
            "architecture a of e is component c end; begin end;",
            &interner,
        )
        .unwrap_err();
        assert_eq!(err.expected, "`component`");
    }
}
