//! Structural elaboration of QHDL designs.
//!
//! Registers parsed entities and architectures in a [`Library`], then expands
//! the hierarchy below a top entity into a validated [`FlatGraph`]: generics
//! are resolved per instance, port maps and signal assignments are bound into
//! nets, and every instance without an architecture becomes a leaf.
//!
//! # Usage
//!
//! ```ignore
//! let mut library = Library::new(&interner);
//! library.register_file(parse_str(text, &interner)?)?;
//! let elaboration = elaborate(&library, "DoubleBeamsplitter", &options, &interner)?;
//! ```

#![warn(missing_docs)]

pub mod binder;
pub mod context;
pub mod errors;
pub mod expand;
pub mod generics;
pub mod library;
pub mod nets;
pub mod symbols;
pub mod validate;

use qhdl_common::Interner;
use qhdl_config::ElaborationOptions;
use qhdl_diagnostics::{Diagnostic, DiagnosticSink};
use qhdl_netlist::{FlatGraph, TopPort};
use tracing::{debug, info_span};

use context::ElaborationContext;
pub use library::{EntityEntry, Library};

/// A successful elaboration.
#[derive(Debug, Clone)]
pub struct Elaboration {
    /// The flattened circuit.
    pub graph: FlatGraph,
    /// Warnings emitted along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Elaborates the entity named `top` into a flat graph.
///
/// Returns every diagnostic if any of them is an error; a graph is never
/// returned alongside errors. Net validation runs even after expansion
/// errors, so independent problems are reported together.
pub fn elaborate(
    library: &Library<'_>,
    top: &str,
    options: &ElaborationOptions,
    interner: &Interner,
) -> Result<Elaboration, Vec<Diagnostic>> {
    let span = info_span!("elaborate", top);
    let _guard = span.enter();

    let sink = DiagnosticSink::new();
    let mut ctx = ElaborationContext::new(library, options, interner, &sink);

    let Some(design) = expand::expand_top(&mut ctx, top) else {
        return Err(sink.take_all());
    };

    let decl = &library.entity(design.entity).decl;
    let top_name = interner.spelling(decl.name);
    let edges = match validate::validate(&mut ctx, top_name) {
        Ok(edges) => edges,
        Err(err) => {
            ctx.emit(errors::error_internal(&err));
            return Err(sink.take_all());
        }
    };
    debug!(
        leaves = ctx.leaves.len(),
        nodes = ctx.nets.len(),
        edges = edges.len(),
        "elaborated"
    );
    if ctx.has_errors() {
        return Err(sink.take_all());
    }

    let graph = FlatGraph {
        top: top_name.to_string(),
        architecture: interner
            .spelling(library.architecture(design.architecture).name)
            .to_string(),
        ports: decl
            .ports
            .iter()
            .map(|port| TopPort {
                name: interner.spelling(port.name).to_string(),
                direction: binder::direction(port.mode),
                ty: interner.spelling(port.ty).to_string(),
            })
            .collect(),
        leaves: ctx.leaves,
        edges,
    };
    Ok(Elaboration {
        graph,
        diagnostics: sink.take_all(),
    })
}
