//! Recursive hierarchy expansion.
//!
//! Starting from the top entity, each architecture is given a symbol table,
//! its signals become net nodes, and each instance is either expanded into
//! the child entity's architecture or recorded as a leaf. Signals and ports
//! below the top are name-mangled with the instance path, e.g. `X.B1.s1`.

use qhdl_common::{Interner, Name};
use qhdl_diagnostics::Diagnostic;
use qhdl_netlist::{ArchitectureId, EntityId, LeafInstance, LeafPort};
use qhdl_parser::ast::{Actual, ArchitectureBody, ComponentDecl, EntityDecl, Instance};
use qhdl_source::Span;
use tracing::{debug, trace};

use crate::binder::{self, ActualResolver, Connectable, ConnectableKind, InstanceRef, PortBinding};
use crate::context::{ElaborationContext, LeafMeta};
use crate::errors;
use crate::generics::{self, GenericEnv};
use crate::nets::{NodeId, NodeKind};
use crate::symbols::{DuplicateName, ScopeId, Symbol, SymbolKind, SymbolTable};

/// The selected top entity and architecture.
#[derive(Clone, Copy, Debug)]
pub struct TopDesign {
    /// The top entity.
    pub entity: EntityId,
    /// Its selected architecture.
    pub architecture: ArchitectureId,
}

/// Joins an instance path and a local name with a dot.
pub fn mangle(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

/// Expands the hierarchy below the entity named `top`.
///
/// Returns `None` after emitting a diagnostic if the top entity or its
/// architecture cannot be found.
pub fn expand_top(ctx: &mut ElaborationContext<'_>, top: &str) -> Option<TopDesign> {
    let library = ctx.library;
    let interner = ctx.interner;

    let Some(entity) = library.lookup(top) else {
        ctx.emit(errors::error_top_not_found(top));
        return None;
    };
    let decl = &library.entity(entity).decl;
    let top_name = interner.spelling(decl.name);
    let architecture = match library.select_top_architecture(entity, &ctx.options.architecture) {
        Ok(Some(arch)) => arch,
        Ok(None) => {
            ctx.emit(errors::error_no_architecture(top_name, decl.name_span));
            return None;
        }
        Err(diag) => {
            ctx.emit(diag);
            return None;
        }
    };

    let mut diags = Vec::new();
    let resolved = generics::resolve(
        top_name,
        &decl.generics,
        &[],
        &GenericEnv::new(),
        interner,
        &mut diags,
    );
    ctx.emit_all(diags);
    for (name, decl_span) in &resolved.unresolved {
        ctx.emit(errors::error_unresolved_generic(
            name,
            top_name,
            decl.name_span,
            *decl_span,
        ));
    }

    let ports: Vec<NodeId> = decl
        .ports
        .iter()
        .map(|port| {
            let name = interner.spelling(port.name);
            ctx.nets.add(
                NodeKind::TopPort {
                    port: name.to_string(),
                    direction: binder::direction(port.mode),
                },
                name,
                port.span,
            )
        })
        .collect();

    ctx.push_expansion(entity, top_name, decl.name_span);
    expand_architecture(ctx, entity, architecture, "", &resolved.env, &ports);
    ctx.pop_expansion();

    Some(TopDesign { entity, architecture })
}

/// The declarative region of one architecture during one expansion.
struct Region<'s> {
    table: SymbolTable,
    scope: ScopeId,
    entity: &'s EntityDecl,
    arch: &'s ArchitectureBody,
    port_nodes: &'s [NodeId],
    signal_nodes: Vec<NodeId>,
    interner: &'s Interner,
}

impl<'s> Region<'s> {
    /// Declares the entity's generics and ports, then the architecture's
    /// components, signals and instance labels.
    fn build(
        entity: &'s EntityDecl,
        arch: &'s ArchitectureBody,
        port_nodes: &'s [NodeId],
        interner: &'s Interner,
        diags: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut table = SymbolTable::new();
        let entity_scope = table.push_scope(None);
        let scope = table.push_scope(Some(entity_scope));

        let mut declare = |scope: ScopeId, name: Name, kind: SymbolKind, index: usize, span: Span| {
            let symbol = Symbol { name, kind, index, span };
            if let Err(DuplicateName { symbol, previous }) = table.declare(scope, symbol) {
                diags.push(errors::error_duplicate(
                    symbol.kind.describe(),
                    interner.spelling(symbol.name),
                    symbol.span,
                    previous.span,
                ));
            }
        };
        for (i, g) in entity.generics.iter().enumerate() {
            declare(entity_scope, g.name, SymbolKind::Generic, i, g.span);
        }
        for (i, p) in entity.ports.iter().enumerate() {
            declare(entity_scope, p.name, SymbolKind::Port, i, p.span);
        }
        for (i, c) in arch.components.iter().enumerate() {
            declare(scope, c.name, SymbolKind::Component, i, c.span);
        }
        for (i, s) in arch.signals.iter().enumerate() {
            declare(scope, s.name, SymbolKind::Signal, i, s.span);
        }
        for (i, inst) in arch.instances.iter().enumerate() {
            declare(scope, inst.label, SymbolKind::Instance, i, inst.label_span);
        }

        Self {
            table,
            scope,
            entity,
            arch,
            port_nodes,
            signal_nodes: Vec::with_capacity(arch.signals.len()),
            interner,
        }
    }

    fn component(&self, name: Name, span: Span) -> Option<&'s ComponentDecl> {
        match self.table.lookup(self.scope, name, span) {
            Ok(symbol) if symbol.kind == SymbolKind::Component => Some(&self.arch.components[symbol.index]),
            _ => None,
        }
    }
}

impl ActualResolver for Region<'_> {
    fn resolve(&self, name: Name, span: Span) -> Result<Connectable, Diagnostic> {
        let spelling = self.interner.spelling(name);
        let symbol = self.table.lookup(self.scope, name, span).map_err(|_| {
            errors::error_unknown_connection(format!("unknown signal or port `{spelling}`"), span)
        })?;
        match symbol.kind {
            SymbolKind::Signal => Ok(Connectable {
                node: self.signal_nodes[symbol.index],
                kind: ConnectableKind::Signal,
                ty: self.arch.signals[symbol.index].ty,
            }),
            SymbolKind::Port => {
                let port = &self.entity.ports[symbol.index];
                Ok(Connectable {
                    node: self.port_nodes[symbol.index],
                    kind: ConnectableKind::Port(binder::direction(port.mode)),
                    ty: port.ty,
                })
            }
            other => Err(errors::error_unknown_connection(
                format!("`{spelling}` is a {}, not a signal or port", other.describe()),
                span,
            )),
        }
    }
}

fn expand_architecture(
    ctx: &mut ElaborationContext<'_>,
    entity: EntityId,
    architecture: ArchitectureId,
    path: &str,
    env: &GenericEnv,
    port_nodes: &[NodeId],
) {
    let library = ctx.library;
    let interner = ctx.interner;
    let decl = &library.entity(entity).decl;
    let arch = library.architecture(architecture);
    debug!(
        path,
        entity = interner.spelling(decl.name),
        architecture = interner.spelling(arch.name),
        depth = ctx.depth(),
        "expanding architecture"
    );

    let mut diags = Vec::new();
    let mut region = Region::build(decl, arch, port_nodes, interner, &mut diags);
    ctx.emit_all(diags);
    for signal in &arch.signals {
        let node = ctx.nets.add(
            NodeKind::Alias { open: false },
            mangle(path, interner.spelling(signal.name)),
            signal.span,
        );
        region.signal_nodes.push(node);
    }

    for inst in &arch.instances {
        expand_instance(ctx, &region, inst, path, env);
    }

    for assign in &arch.assignments {
        let mut diags = Vec::new();
        let aliased = binder::bind_assignment(assign, &region, interner, &mut diags);
        ctx.emit_all(diags);
        match aliased {
            Ok((target, source)) => {
                trace!(
                    to = %mangle(path, interner.spelling(assign.target)),
                    from = %mangle(path, interner.spelling(assign.source)),
                    "alias"
                );
                ctx.nets.union(target, source);
            }
            Err(refused) => {
                for node in refused {
                    ctx.nets.mark_suspect(node);
                }
            }
        }
    }
}

fn expand_instance(
    ctx: &mut ElaborationContext<'_>,
    region: &Region<'_>,
    inst: &Instance,
    path: &str,
    env: &GenericEnv,
) {
    let library = ctx.library;
    let interner = ctx.interner;
    let label = interner.spelling(inst.label);
    let inst_path = mangle(path, label);

    let Some(comp) = region.component(inst.component, inst.component_span) else {
        ctx.emit(errors::error_unresolved_component(
            interner.spelling(inst.component),
            label,
            inst.component_span,
        ));
        mark_actuals(ctx, region, inst);
        return;
    };
    let comp_name = interner.spelling(comp.name);

    let child = match library.lookup_key(comp.name.key) {
        None => None,
        Some(entity) => {
            let decl = &library.entity(entity).decl;
            if let Some(detail) = shape_mismatch(comp, decl, interner) {
                ctx.emit(errors::error_component_mismatch(
                    comp_name,
                    &detail,
                    comp.span,
                    decl.name_span,
                ));
                mark_actuals(ctx, region, inst);
                return;
            }
            match library.select_architecture(entity, &ctx.options.architecture) {
                Ok(arch) => arch.map(|arch| (entity, arch)),
                Err(diag) => {
                    ctx.emit(diag);
                    mark_actuals(ctx, region, inst);
                    return;
                }
            }
        }
    };

    let mut diags = Vec::new();
    let resolved = generics::resolve(
        comp_name,
        &comp.generics,
        &inst.generic_map,
        env,
        interner,
        &mut diags,
    );
    let instance = InstanceRef {
        path: &inst_path,
        component: comp_name,
        span: inst.span,
    };
    let bindings = binder::bind_ports(
        &instance,
        &comp.ports,
        &inst.port_map,
        region,
        ctx.options.unconnected_port_severity,
        interner,
        &mut diags,
    );
    ctx.emit_all(diags);
    for node in bindings.iter().filter_map(PortBinding::refused) {
        ctx.nets.mark_suspect(node);
    }

    match child {
        Some((entity, architecture)) => {
            for (name, decl_span) in &resolved.unresolved {
                ctx.emit(errors::error_unresolved_generic(
                    name,
                    &inst_path,
                    inst.span,
                    *decl_span,
                ));
            }
            if !ctx.push_expansion(entity, &inst_path, inst.span) {
                for node in bindings.iter().filter_map(PortBinding::node) {
                    ctx.nets.mark_suspect(node);
                }
                return;
            }
            let child_ports: Vec<NodeId> = comp
                .ports
                .iter()
                .zip(&bindings)
                .map(|(port, binding)| {
                    binding.node().unwrap_or_else(|| {
                        ctx.nets.add(
                            NodeKind::Alias { open: true },
                            mangle(&inst_path, interner.spelling(port.name)),
                            inst.span,
                        )
                    })
                })
                .collect();
            expand_architecture(ctx, entity, architecture, &inst_path, &resolved.env, &child_ports);
            ctx.pop_expansion();
        }
        None => {
            let leaf = ctx.leaves.alloc(LeafInstance {
                path: inst_path.clone(),
                component: comp_name.to_string(),
                generics: resolved.bindings,
                ports: comp
                    .ports
                    .iter()
                    .map(|p| LeafPort {
                        name: interner.spelling(p.name).to_string(),
                        direction: binder::direction(p.mode),
                        ty: interner.spelling(p.ty).to_string(),
                    })
                    .collect(),
            });
            ctx.leaf_meta.push(LeafMeta {
                span: inst.span,
                unresolved: resolved.unresolved,
            });
            for (port, binding) in comp.ports.iter().zip(&bindings) {
                let Some(actual) = binding.node() else { continue };
                let name = interner.spelling(port.name);
                let node = ctx.nets.add(
                    NodeKind::LeafPort {
                        leaf,
                        port: name.to_string(),
                        direction: binder::direction(port.mode),
                    },
                    mangle(&inst_path, name),
                    inst.span,
                );
                ctx.nets.union(node, actual);
            }
            debug!(path = %inst_path, component = comp_name, "leaf instance");
        }
    }
}

/// Marks the nets an abandoned instance would have joined, so validation
/// does not report them as undriven or unconnected.
fn mark_actuals(ctx: &mut ElaborationContext<'_>, region: &Region<'_>, inst: &Instance) {
    for assoc in &inst.port_map {
        let Actual::Expr(expr) = &assoc.actual else { continue };
        let Some(name) = expr.as_name() else { continue };
        if let Ok(actual) = region.resolve(name, expr.span()) {
            ctx.nets.mark_suspect(actual.node);
        }
    }
}

/// Describes the first difference between a component declaration and the
/// entity of the same name, if any.
///
/// Ports must agree in order, name, direction and type; generics in order,
/// name and type.
fn shape_mismatch(comp: &ComponentDecl, entity: &EntityDecl, interner: &Interner) -> Option<String> {
    if comp.ports.len() != entity.ports.len() {
        return Some(format!(
            "the entity has {} ports, the component {}",
            entity.ports.len(),
            comp.ports.len()
        ));
    }
    for (c, e) in comp.ports.iter().zip(&entity.ports) {
        let name = interner.spelling(e.name);
        if c.name != e.name {
            return Some(format!(
                "port `{name}` of the entity is `{}` in the component",
                interner.spelling(c.name)
            ));
        }
        if c.mode != e.mode {
            return Some(format!(
                "port `{name}` is {} in the entity but {} in the component",
                binder::direction(e.mode),
                binder::direction(c.mode)
            ));
        }
        if c.ty != e.ty {
            return Some(format!(
                "port `{name}` has type `{}` in the entity but `{}` in the component",
                interner.spelling(e.ty),
                interner.spelling(c.ty)
            ));
        }
    }

    if comp.generics.len() != entity.generics.len() {
        return Some(format!(
            "the entity has {} generics, the component {}",
            entity.generics.len(),
            comp.generics.len()
        ));
    }
    for (c, e) in comp.generics.iter().zip(&entity.generics) {
        let name = interner.spelling(e.name);
        if c.name != e.name {
            return Some(format!(
                "generic `{name}` of the entity is `{}` in the component",
                interner.spelling(c.name)
            ));
        }
        if c.ty != e.ty {
            return Some(format!(
                "generic `{name}` has type `{}` in the entity but `{}` in the component",
                interner.spelling(e.ty),
                interner.spelling(c.ty)
            ));
        }
    }
    None
}
