//! Post-expansion checks over the flattened nets.
//!
//! Runs after every expansion, including one that reported errors. Checks
//! driver counts, undriven nets, unconnected top ports and unresolved leaf
//! generics, optionally rejects feedback between leaves, and produces the
//! edge set. Nets touched by a connection expansion refused are exempt from
//! the undriven and unconnected checks, since their endpoints are incomplete.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use qhdl_common::{InternalError, QhdlResult};
use qhdl_diagnostics::Diagnostic;
use qhdl_netlist::{Edge, Endpoint, LeafId};
use qhdl_source::Span;
use tracing::debug;

use crate::context::ElaborationContext;
use crate::errors;
use crate::nets::{NodeKind, Role};

/// Validates the nets built by expansion and returns the graph's edges.
///
/// `top` names the top entity in diagnostics about its ports. Problems are
/// emitted into the context; an `Err` means the nets are inconsistent in a
/// way expansion should never produce.
pub fn validate(ctx: &mut ElaborationContext<'_>, top: &str) -> QhdlResult<Vec<Edge>> {
    let groups = ctx.nets.groups();
    let severity = ctx.options.unconnected_port_severity;
    let mut diags: Vec<Diagnostic> = Vec::new();
    let mut edges = Vec::new();

    let nets = &ctx.nets;
    for net in &groups {
        let drivers: Vec<_> = nets.with_role(net, Role::Driver).collect();
        let receivers: Vec<_> = nets.with_role(net, Role::Receiver).collect();
        let name = nets.net_name(net);
        let first = nets.node(net.members[0]);

        if drivers.len() > 1 && !ctx.options.allow_multi_driver {
            let described: Vec<(String, Span)> = drivers
                .iter()
                .map(|&id| {
                    let node = nets.node(id);
                    (node.name.clone(), node.span)
                })
                .collect();
            diags.push(errors::error_driver_conflict(name, &described, first.span));
        }

        let endpoints = drivers.len() + receivers.len();
        let open = net
            .members
            .iter()
            .any(|&id| matches!(nets.node(id).kind, NodeKind::Alias { open: true }));
        let lone_top_port = net.members.iter().find(|&&id| {
            matches!(nets.node(id).kind, NodeKind::TopPort { .. }) && endpoints == 1
        });
        if !nets.is_suspect(net) {
            if let Some(&id) = lone_top_port {
                let node = nets.node(id);
                diags.push(errors::unconnected_port(&node.name, top, severity, node.span));
            } else if drivers.is_empty() && !receivers.is_empty() && !open {
                let span = nets.node(receivers[0]).span;
                diags.push(errors::undriven_net(name, severity, span));
            }
        }

        let receiving: Vec<Endpoint> = receivers
            .iter()
            .filter_map(|&id| nets.node(id).endpoint())
            .collect();
        for &driver in &drivers {
            let node = nets.node(driver);
            let endpoint = node.endpoint().ok_or_else(|| {
                InternalError::new(format!("driver `{}` has no endpoint", node.name))
            })?;
            edges.push(Edge {
                driver: endpoint,
                receivers: receiving.clone(),
            });
        }
    }
    debug!(nets = groups.len(), edges = edges.len(), "validated nets");

    for (raw, meta) in ctx.leaf_meta.iter().enumerate() {
        let leaf = ctx
            .leaves
            .try_get(LeafId::from_raw(raw as u32))
            .ok_or_else(|| InternalError::new(format!("leaf {raw} has metadata but no instance")))?;
        for (name, decl_span) in &meta.unresolved {
            diags.push(errors::error_unresolved_generic(
                name,
                &leaf.path,
                meta.span,
                *decl_span,
            ));
        }
    }

    if !ctx.options.allow_feedback {
        diags.extend(feedback_loops(ctx, &edges));
    }

    ctx.emit_all(diags);
    Ok(edges)
}

/// Reports each strongly connected group of leaves, including a leaf that
/// feeds itself.
fn feedback_loops(ctx: &ElaborationContext<'_>, edges: &[Edge]) -> Vec<Diagnostic> {
    let mut graph: DiGraph<LeafId, ()> = DiGraph::with_capacity(ctx.leaves.len(), edges.len());
    let index: Vec<NodeIndex> = ctx.leaves.iter().map(|(id, _)| graph.add_node(id)).collect();
    let leaf_node = |endpoint: &Endpoint| match endpoint {
        Endpoint::LeafPort { leaf, .. } => index.get(leaf.as_raw() as usize).copied(),
        Endpoint::TopPort { .. } => None,
    };
    for edge in edges {
        let Some(from) = leaf_node(&edge.driver) else { continue };
        for receiver in &edge.receivers {
            if let Some(to) = leaf_node(receiver) {
                graph.update_edge(from, to, ());
            }
        }
    }

    let mut loops: Vec<Vec<LeafId>> = kosaraju_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut leaves: Vec<LeafId> = scc.into_iter().map(|n| graph[n]).collect();
            leaves.sort();
            leaves
        })
        .collect();
    loops.sort();

    loops
        .into_iter()
        .map(|leaves| {
            let paths: Vec<String> = leaves
                .iter()
                .map(|&id| ctx.leaves.get(id).path.clone())
                .collect();
            let span = ctx
                .leaf_meta
                .get(leaves[0].as_raw() as usize)
                .map_or(Span::DUMMY, |meta| meta.span);
            errors::error_feedback(&paths, span)
        })
        .collect()
}
