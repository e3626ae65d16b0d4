//! Mutable elaboration state for recursive expansion.
//!
//! [`ElaborationContext`] holds the nets and leaves under construction, the
//! library being elaborated, and the current expansion path of entity IDs
//! used for recursion and depth checks.

use std::collections::HashSet;

use qhdl_common::Interner;
use qhdl_config::ElaborationOptions;
use qhdl_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use qhdl_netlist::{Arena, EntityId, LeafId, LeafInstance};
use qhdl_source::Span;

use crate::errors;
use crate::library::Library;
use crate::nets::Nets;

/// Per-leaf data that does not belong in the flattened graph.
#[derive(Debug, Clone)]
pub struct LeafMeta {
    /// Span of the instance statement.
    pub span: Span,
    /// Names and declaration spans of generics left without a value.
    pub unresolved: Vec<(String, Span)>,
}

/// Mutable state carried through recursive expansion.
pub struct ElaborationContext<'a> {
    /// The library being elaborated.
    pub library: &'a Library<'a>,
    /// Elaboration options.
    pub options: &'a ElaborationOptions,
    /// The interner the library's names belong to.
    pub interner: &'a Interner,
    /// Connectivity built so far.
    pub nets: Nets,
    /// Leaf instances in elaboration order.
    pub leaves: Arena<LeafId, LeafInstance>,
    /// Side data for each leaf, indexed like `leaves`.
    pub leaf_meta: Vec<LeafMeta>,
    sink: &'a DiagnosticSink,
    /// Entities currently being expanded, outermost first.
    stack: Vec<EntityId>,
    /// Diagnostics already emitted, so an architecture expanded many times
    /// reports each problem once.
    reported: HashSet<(DiagnosticCode, Span, String)>,
}

impl<'a> ElaborationContext<'a> {
    /// Creates a context with no nets or leaves.
    pub fn new(
        library: &'a Library<'a>,
        options: &'a ElaborationOptions,
        interner: &'a Interner,
        sink: &'a DiagnosticSink,
    ) -> Self {
        Self {
            library,
            options,
            interner,
            nets: Nets::new(),
            leaves: Arena::new(),
            leaf_meta: Vec::new(),
            sink,
            stack: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Emits `diag` unless an identical one was already emitted.
    pub fn emit(&mut self, diag: Diagnostic) {
        let key = (diag.code, diag.primary_span, diag.message.clone());
        if self.reported.insert(key) {
            self.sink.emit(diag);
        }
    }

    /// Emits every diagnostic in `diags`.
    pub fn emit_all(&mut self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// Returns `true` once any error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.sink.has_errors()
    }

    /// Nesting depth of the entity being expanded; the top entity is 0.
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(1)
    }

    /// Enters `entity` for the instance at `path`.
    ///
    /// Returns `false` after emitting `E500` if the entity is already being
    /// expanded, or `E501` if entering it would exceed the depth limit.
    pub fn push_expansion(&mut self, entity: EntityId, path: &str, span: Span) -> bool {
        if let Some(start) = self.stack.iter().position(|&e| e == entity) {
            let cycle: Vec<String> = self.stack[start..]
                .iter()
                .chain(std::iter::once(&entity))
                .map(|&e| self.entity_name(e).to_string())
                .collect();
            let diag = errors::error_recursive(self.entity_name(entity), &cycle, span);
            self.emit(diag);
            return false;
        }
        if self.stack.len() > self.options.max_expansion_depth as usize {
            let diag = errors::error_depth_exceeded(path, self.options.max_expansion_depth, span);
            self.emit(diag);
            return false;
        }
        self.stack.push(entity);
        true
    }

    /// Leaves the most recently entered entity.
    pub fn pop_expansion(&mut self) {
        self.stack.pop();
    }

    fn entity_name(&self, entity: EntityId) -> &'a str {
        self.interner
            .spelling(self.library.entity(entity).decl.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{E500, E501};
    use qhdl_parser::parse_str;

    fn library(interner: &Interner) -> Library<'_> {
        let mut lib = Library::new(interner);
        let file = parse_str("entity A is end; entity B is end; entity C is end;", interner).unwrap();
        lib.register_file(file).unwrap();
        lib
    }

    #[test]
    fn recursion_is_detected() {
        let interner = Interner::new();
        let lib = library(&interner);
        let options = ElaborationOptions::default();
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&lib, &options, &interner, &sink);
        let (a, b) = (lib.lookup("a").unwrap(), lib.lookup("b").unwrap());

        assert!(ctx.push_expansion(a, "A", Span::DUMMY));
        assert!(ctx.push_expansion(b, "X", Span::DUMMY));
        assert_eq!(ctx.depth(), 1);
        assert!(!ctx.push_expansion(a, "X.Y", Span::DUMMY));

        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, E500);
        assert!(diags[0].notes[0].contains("A -> B -> A"));

        ctx.pop_expansion();
        assert!(ctx.push_expansion(lib.lookup("c").unwrap(), "Z", Span::DUMMY));
    }

    #[test]
    fn depth_limit() {
        let interner = Interner::new();
        let lib = library(&interner);
        let options = ElaborationOptions {
            max_expansion_depth: 1,
            ..ElaborationOptions::default()
        };
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&lib, &options, &interner, &sink);

        assert!(ctx.push_expansion(lib.lookup("a").unwrap(), "A", Span::DUMMY));
        assert!(ctx.push_expansion(lib.lookup("b").unwrap(), "X", Span::DUMMY));
        assert!(!ctx.push_expansion(lib.lookup("c").unwrap(), "X.Y", Span::DUMMY));
        assert_eq!(sink.take_all()[0].code, E501);
    }

    #[test]
    fn identical_diagnostics_are_emitted_once() {
        let interner = Interner::new();
        let lib = library(&interner);
        let options = ElaborationOptions::default();
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&lib, &options, &interner, &sink);

        let diag = errors::error_unknown_name("signal", "s", Span::DUMMY);
        ctx.emit(diag.clone());
        ctx.emit(diag);
        ctx.emit(errors::error_unknown_name("signal", "t", Span::DUMMY));
        assert_eq!(sink.error_count(), 2);
        assert!(ctx.has_errors());
    }
}
