//! Port-map and signal-assignment binding.
//!
//! Actuals are resolved through an [`ActualResolver`], which maps a name in
//! the instantiating architecture to the net node of a signal or an
//! enclosing-entity port. The binder applies the association, direction and
//! type rules; it never touches the nets itself.

use qhdl_common::{Interner, Name};
use qhdl_config::PortSeverity;
use qhdl_diagnostics::Diagnostic;
use qhdl_netlist::Direction;
use qhdl_parser::ast::{Actual, Assignment, Association, PortDecl, PortMode};
use qhdl_source::Span;

use crate::errors;
use crate::nets::NodeId;

/// What an actual name resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectableKind {
    /// An internal signal.
    Signal,
    /// A port of the enclosing entity, with its declared direction.
    Port(Direction),
}

/// A signal or enclosing port that can appear as an actual.
#[derive(Clone, Copy, Debug)]
pub struct Connectable {
    /// The node the name stands for.
    pub node: NodeId,
    /// Signal or port.
    pub kind: ConnectableKind,
    /// Declared type name.
    pub ty: Name,
}

/// Resolves actual names in the instantiating architecture.
pub trait ActualResolver {
    /// Resolves `name`, or explains why it cannot be connected.
    fn resolve(&self, name: Name, span: Span) -> Result<Connectable, Diagnostic>;
}

/// Outcome for one formal port.
#[derive(Clone, Copy, Debug)]
pub enum PortBinding {
    /// Bound to a signal or enclosing port.
    Connected(Connectable),
    /// Explicitly `open`.
    Open,
    /// Not mentioned in the port map; already reported.
    Unassociated,
    /// Associated with something invalid; already reported. Carries the
    /// actual's node when the name resolved but the connection was refused.
    Invalid(Option<NodeId>),
}

impl PortBinding {
    /// The bound node, if connected.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            PortBinding::Connected(c) => Some(c.node),
            _ => None,
        }
    }

    /// The node of an actual whose connection was refused.
    pub fn refused(&self) -> Option<NodeId> {
        match self {
            PortBinding::Invalid(node) => *node,
            _ => None,
        }
    }
}

/// Converts a declared port mode to a netlist direction.
pub fn direction(mode: PortMode) -> Direction {
    match mode {
        PortMode::In => Direction::In,
        PortMode::Out => Direction::Out,
    }
}

/// The instance being bound, for diagnostics.
pub struct InstanceRef<'a> {
    /// Hierarchical instance path.
    pub path: &'a str,
    /// Component name.
    pub component: &'a str,
    /// Instance statement span.
    pub span: Span,
}

/// Binds an instance's port map against the component's ports.
///
/// Returns one [`PortBinding`] per formal, in declaration order.
pub fn bind_ports(
    instance: &InstanceRef<'_>,
    formals: &[PortDecl],
    map: &[Association],
    resolver: &impl ActualResolver,
    severity: PortSeverity,
    interner: &Interner,
    diags: &mut Vec<Diagnostic>,
) -> Vec<PortBinding> {
    let mut associated: Vec<Option<&Association>> = vec![None; formals.len()];
    let mut bindings = vec![PortBinding::Unassociated; formals.len()];

    for (position, assoc) in map.iter().enumerate() {
        let index = match assoc.formal {
            Some((formal, span)) => match formals.iter().position(|p| p.name == formal) {
                Some(index) => index,
                None => {
                    diags.push(errors::error_unknown_port(
                        interner.spelling(formal),
                        instance.component,
                        span,
                    ));
                    continue;
                }
            },
            None if position < formals.len() => position,
            None => {
                diags.push(errors::error_unknown_connection(
                    format!(
                        "too many port associations: component `{}` declares {}",
                        instance.component,
                        formals.len()
                    ),
                    assoc.span,
                ));
                continue;
            }
        };
        if let Some(prev) = associated[index] {
            diags.push(errors::error_duplicate_association(
                interner.spelling(formals[index].name),
                assoc.span,
                prev.span,
            ));
            continue;
        }
        associated[index] = Some(assoc);
        bindings[index] = bind_one(instance, &formals[index], assoc, resolver, interner, diags);
    }

    for (formal, assoc) in formals.iter().zip(&associated) {
        if assoc.is_none() {
            diags.push(errors::unconnected_port(
                interner.spelling(formal.name),
                instance.path,
                severity,
                instance.span,
            ));
        }
    }
    bindings
}

fn bind_one(
    instance: &InstanceRef<'_>,
    formal: &PortDecl,
    assoc: &Association,
    resolver: &impl ActualResolver,
    interner: &Interner,
    diags: &mut Vec<Diagnostic>,
) -> PortBinding {
    let formal_name = interner.spelling(formal.name);
    let expr = match &assoc.actual {
        Actual::Open => return PortBinding::Open,
        Actual::Expr(expr) => expr,
    };
    let Some(actual) = expr.as_name() else {
        diags.push(errors::error_unknown_connection(
            format!("actual for port `{formal_name}` must be a signal or port name"),
            expr.span(),
        ));
        return PortBinding::Invalid(None);
    };
    let target = match resolver.resolve(actual, expr.span()) {
        Ok(target) => target,
        Err(diag) => {
            diags.push(diag);
            return PortBinding::Invalid(None);
        }
    };

    let actual_name = interner.spelling(actual);
    match (direction(formal.mode), target.kind) {
        (Direction::In, ConnectableKind::Port(Direction::Out)) => {
            diags.push(errors::error_direction(
                format!(
                    "input `{formal_name}` of `{}` cannot read output port `{actual_name}`",
                    instance.path
                ),
                expr.span(),
            ));
            return PortBinding::Invalid(Some(target.node));
        }
        (Direction::Out, ConnectableKind::Port(Direction::In)) => {
            diags.push(errors::error_direction(
                format!(
                    "output `{formal_name}` of `{}` cannot drive input port `{actual_name}`",
                    instance.path
                ),
                expr.span(),
            ));
            return PortBinding::Invalid(Some(target.node));
        }
        _ => {}
    }
    if target.ty != formal.ty {
        diags.push(errors::error_connection_type(
            &format!("port `{formal_name}` of `{}`", instance.path),
            interner.spelling(formal.ty),
            interner.spelling(target.ty),
            expr.span(),
        ));
        return PortBinding::Invalid(Some(target.node));
    }
    PortBinding::Connected(target)
}

/// Binds `target <= source;`, returning the two nodes to alias.
///
/// The target must be a signal or an `out` port of the enclosing entity; the
/// source a signal or an `in` port. A refused assignment returns the nodes
/// of whichever sides did resolve.
pub fn bind_assignment(
    assign: &Assignment,
    resolver: &impl ActualResolver,
    interner: &Interner,
    diags: &mut Vec<Diagnostic>,
) -> Result<(NodeId, NodeId), Vec<NodeId>> {
    let target = resolver.resolve(assign.target, assign.target_span);
    let source = resolver.resolve(assign.source, assign.source_span);
    let (target, source) = match (target, source) {
        (Ok(t), Ok(s)) => (t, s),
        (t, s) => {
            let mut resolved = Vec::new();
            for side in [t, s] {
                match side {
                    Ok(c) => resolved.push(c.node),
                    Err(diag) => diags.push(diag),
                }
            }
            return Err(resolved);
        }
    };

    let mut ok = true;
    if target.kind == ConnectableKind::Port(Direction::In) {
        diags.push(errors::error_direction(
            format!("cannot assign to input port `{}`", interner.spelling(assign.target)),
            assign.target_span,
        ));
        ok = false;
    }
    if source.kind == ConnectableKind::Port(Direction::Out) {
        diags.push(errors::error_direction(
            format!("cannot read output port `{}`", interner.spelling(assign.source)),
            assign.source_span,
        ));
        ok = false;
    }
    if ok && target.ty != source.ty {
        diags.push(errors::error_connection_type(
            &format!("assignment to `{}`", interner.spelling(assign.target)),
            interner.spelling(target.ty),
            interner.spelling(source.ty),
            assign.source_span,
        ));
        ok = false;
    }
    if ok {
        Ok((target.node, source.node))
    } else {
        Err(vec![target.node, source.node])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{E400, E401, E402, E403, E404};
    use crate::nets::{NodeKind, Nets};
    use qhdl_parser::ast::ArchitectureBody;
    use qhdl_parser::parse_str;
    use qhdl_common::Ident;
    use std::collections::HashMap;

    /// Resolves against a fixed table of names.
    struct Table(HashMap<Ident, Connectable>);

    impl ActualResolver for Table {
        fn resolve(&self, name: Name, span: Span) -> Result<Connectable, Diagnostic> {
            self.0
                .get(&name.key)
                .copied()
                .ok_or_else(|| errors::error_unknown_connection("unknown signal or port", span))
        }
    }

    fn table(nets: &mut Nets, interner: &Interner) -> Table {
        let mut t = HashMap::new();
        let fm = interner.intern_name("fieldmode");
        let other = interner.intern_name("other");
        for (name, kind, ty) in [
            ("s", ConnectableKind::Signal, fm),
            ("pin", ConnectableKind::Port(Direction::In), fm),
            ("pout", ConnectableKind::Port(Direction::Out), fm),
            ("odd", ConnectableKind::Signal, other),
        ] {
            let node = nets.add(NodeKind::Alias { open: false }, name, Span::DUMMY);
            t.insert(interner.fold(name), Connectable { node, kind, ty });
        }
        Table(t)
    }

    fn arch(stmt: &str, interner: &Interner) -> ArchitectureBody {
        let src = format!(
            "architecture a of T is
                component C is port (i : in fieldmode; o : out fieldmode); end component;
             begin {stmt} end;"
        );
        parse_str(&src, interner)
            .unwrap()
            .architectures()
            .next()
            .unwrap()
            .clone()
    }

    fn bind(stmt: &str, severity: PortSeverity) -> (Vec<PortBinding>, Vec<Diagnostic>) {
        let interner = Interner::new();
        let mut nets = Nets::new();
        let resolver = table(&mut nets, &interner);
        let a = arch(stmt, &interner);
        let inst = InstanceRef {
            path: "X",
            component: "C",
            span: Span::DUMMY,
        };
        let mut diags = Vec::new();
        let b = bind_ports(
            &inst,
            &a.components[0].ports,
            &a.instances[0].port_map,
            &resolver,
            severity,
            &interner,
            &mut diags,
        );
        (b, diags)
    }

    fn codes(diags: &[Diagnostic]) -> Vec<String> {
        diags.iter().map(|d| d.code.to_string()).collect()
    }

    #[test]
    fn named_and_positional() {
        let (b, diags) = bind("X : C port map (pin, o => s);", PortSeverity::Error);
        assert!(diags.is_empty(), "{diags:?}");
        assert!(matches!(b[0], PortBinding::Connected(Connectable { kind: ConnectableKind::Port(Direction::In), .. })));
        assert!(matches!(b[1], PortBinding::Connected(Connectable { kind: ConnectableKind::Signal, .. })));
    }

    #[test]
    fn open_is_silent_but_missing_is_reported() {
        let (b, diags) = bind("X : C port map (i => open);", PortSeverity::Error);
        assert!(matches!(b[0], PortBinding::Open));
        assert!(matches!(b[1], PortBinding::Unassociated));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, E401);

        let (_, diags) = bind("X : C port map (i => open);", PortSeverity::Warning);
        assert_eq!(codes(&diags), vec!["W401"]);
        assert!(!diags[0].is_error());
    }

    #[test]
    fn direction_rules() {
        let (_, diags) = bind("X : C port map (i => pout, o => pin);", PortSeverity::Error);
        assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![E402, E402]);
        assert!(diags[0].message.contains("cannot read output port `pout`"));
    }

    #[test]
    fn type_rule() {
        let (b, diags) = bind("X : C port map (i => odd, o => s);", PortSeverity::Error);
        assert!(matches!(b[0], PortBinding::Invalid(Some(_))));
        assert!(b[0].refused().is_some());
        assert!(b[1].refused().is_none());
        assert_eq!(diags[0].code, E403);
        assert!(diags[0].message.contains("expected `fieldmode`, found `other`"));
    }

    #[test]
    fn association_errors() {
        let (b, diags) = bind("X : C port map (q => s, i => s, I => s, o => 1 + 2);", PortSeverity::Error);
        assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![E400, E404, E400]);
        assert!(matches!(b[1], PortBinding::Invalid(None)));

        let (_, diags) = bind("X : C port map (s, s, s);", PortSeverity::Error);
        assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![E400]);

        let (_, diags) = bind("X : C port map (nothing, s);", PortSeverity::Error);
        assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![E400]);
    }

    fn assign(stmt: &str) -> (Result<(NodeId, NodeId), Vec<NodeId>>, Vec<Diagnostic>) {
        let interner = Interner::new();
        let mut nets = Nets::new();
        let resolver = table(&mut nets, &interner);
        let a = arch(stmt, &interner);
        let mut diags = Vec::new();
        let r = bind_assignment(&a.assignments[0], &resolver, &interner, &mut diags);
        (r, diags)
    }

    #[test]
    fn assignment_rules() {
        let (r, diags) = assign("pout <= pin;");
        assert!(r.is_ok());
        assert!(diags.is_empty());

        let (r, diags) = assign("s <= pin;");
        assert!(r.is_ok() && diags.is_empty());

        let (r, diags) = assign("pin <= pout;");
        assert_eq!(r.unwrap_err().len(), 2);
        assert_eq!(diags.iter().map(|d| d.code).collect::<Vec<_>>(), vec![E402, E402]);

        let (_, diags) = assign("s <= odd;");
        assert_eq!(diags[0].code, E403);

        let (r, diags) = assign("s <= ghost;");
        assert_eq!(diags[0].code, E400);
        assert_eq!(r.unwrap_err().len(), 1);
    }
}
