//! Scoped symbol table for one entity/architecture pair.
//!
//! The entity scope holds generics and ports; the architecture scope, whose
//! parent is the entity scope, holds components, signals and instance
//! labels. The pair forms a single declarative region, so a declaration
//! clashes with any name visible from its scope, not just its own.

use std::collections::HashMap;

use qhdl_common::{Ident, Name};
use qhdl_netlist::{Arena, ArenaId};
use qhdl_source::Span;

/// Handle to a scope in a [`SymbolTable`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ScopeId(u32);

impl ArenaId for ScopeId {
    fn from_raw(index: u32) -> Self {
        Self(index)
    }

    fn as_raw(self) -> u32 {
        self.0
    }
}

/// What a name refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    /// A generic of the entity.
    Generic,
    /// A port of the entity.
    Port,
    /// A component declaration.
    Component,
    /// An internal signal.
    Signal,
    /// An instance label.
    Instance,
}

impl SymbolKind {
    /// Noun used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Generic => "generic",
            SymbolKind::Port => "port",
            SymbolKind::Component => "component",
            SymbolKind::Signal => "signal",
            SymbolKind::Instance => "instance",
        }
    }
}

/// A declared name.
#[derive(Clone, Copy, Debug)]
pub struct Symbol {
    /// The name as declared.
    pub name: Name,
    /// What it refers to.
    pub kind: SymbolKind,
    /// Position of the declaration in its AST list.
    pub index: usize,
    /// Where it was declared.
    pub span: Span,
}

/// A name declared twice in one declarative region.
#[derive(Clone, Copy, Debug)]
pub struct DuplicateName {
    /// The rejected declaration.
    pub symbol: Symbol,
    /// The declaration it clashes with.
    pub previous: Symbol,
}

/// A name with no visible declaration.
#[derive(Clone, Copy, Debug)]
pub struct UnknownName {
    /// The name looked up.
    pub name: Name,
    /// Where it was referenced.
    pub span: Span,
}

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    symbols: HashMap<Ident, Symbol>,
}

/// Scopes linked to their parents, addressed by [`ScopeId`].
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Arena<ScopeId, Scope>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope nested in `parent`.
    pub fn push_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.alloc(Scope {
            parent,
            symbols: HashMap::new(),
        })
    }

    /// Declares `symbol` in `scope`.
    ///
    /// Fails if the name is visible from `scope`, including through
    /// enclosing scopes.
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> Result<(), DuplicateName> {
        if let Some(previous) = self.find(scope, symbol.name.key) {
            return Err(DuplicateName {
                symbol,
                previous: *previous,
            });
        }
        self.scopes
            .get_mut(scope)
            .symbols
            .insert(symbol.name.key, symbol);
        Ok(())
    }

    /// Resolves `name` from `scope` outwards.
    pub fn lookup(&self, scope: ScopeId, name: Name, span: Span) -> Result<&Symbol, UnknownName> {
        self.find(scope, name.key)
            .ok_or(UnknownName { name, span })
    }

    fn find(&self, scope: ScopeId, key: Ident) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(symbol) = scope.symbols.get(&key) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }
}
