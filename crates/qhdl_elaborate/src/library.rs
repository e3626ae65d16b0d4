//! The design library: registered entities and their architectures.
//!
//! Entities are keyed by their case-folded name. Architectures are attached
//! to an already registered entity, so [`Library::register_file`] registers
//! every entity in a file before any of its architectures.

use std::collections::HashMap;

use qhdl_common::{Ident, Interner};
use qhdl_config::ArchitectureSelection;
use qhdl_diagnostics::Diagnostic;
use qhdl_netlist::{Arena, ArchitectureId, EntityId};
use qhdl_parser::ast::{ArchitectureBody, DesignFile, DesignUnit, EntityDecl};
use tracing::debug;

use crate::errors;

/// An entity together with the architectures registered for it.
#[derive(Debug, Clone)]
pub struct EntityEntry {
    /// The declaration.
    pub decl: EntityDecl,
    /// Architectures in registration order.
    pub architectures: Vec<ArchitectureId>,
}

/// Registry of every entity and architecture in a design.
///
/// Immutable once elaboration starts; [`elaborate`](crate::elaborate) only
/// borrows it.
pub struct Library<'a> {
    interner: &'a Interner,
    entities: Arena<EntityId, EntityEntry>,
    architectures: Arena<ArchitectureId, ArchitectureBody>,
    by_name: HashMap<Ident, EntityId>,
}

impl<'a> Library<'a> {
    /// Creates an empty library whose names come from `interner`.
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            entities: Arena::new(),
            architectures: Arena::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers an entity.
    ///
    /// Fails with `E200` if an entity of the same name is already registered.
    pub fn register_entity(&mut self, decl: EntityDecl) -> Result<EntityId, Diagnostic> {
        if let Some(&prev) = self.by_name.get(&decl.name.key) {
            return Err(errors::error_duplicate(
                "entity",
                self.interner.spelling(decl.name),
                decl.name_span,
                self.entities[prev].decl.name_span,
            ));
        }
        let key = decl.name.key;
        debug!(entity = self.interner.spelling(decl.name), "registered entity");
        let id = self.entities.alloc(EntityEntry {
            decl,
            architectures: Vec::new(),
        });
        self.by_name.insert(key, id);
        Ok(id)
    }

    /// Registers an architecture of an already registered entity.
    ///
    /// Fails with `E201` if the entity is unknown, or `E200` if the entity
    /// already has an architecture of the same name.
    pub fn register_architecture(
        &mut self,
        arch: ArchitectureBody,
    ) -> Result<ArchitectureId, Diagnostic> {
        let Some(&entity) = self.by_name.get(&arch.entity.key) else {
            return Err(errors::error_unknown_name(
                "entity",
                self.interner.spelling(arch.entity),
                arch.entity_span,
            ));
        };
        if let Some(&prev) = self.entities[entity]
            .architectures
            .iter()
            .find(|&&a| self.architectures[a].name == arch.name)
        {
            return Err(errors::error_duplicate(
                "architecture",
                self.interner.spelling(arch.name),
                arch.name_span,
                self.architectures[prev].name_span,
            ));
        }
        debug!(
            architecture = self.interner.spelling(arch.name),
            entity = self.interner.spelling(arch.entity),
            "registered architecture"
        );
        let id = self.architectures.alloc(arch);
        self.entities.get_mut(entity).architectures.push(id);
        Ok(id)
    }

    /// Registers every unit of a parsed file, entities first.
    ///
    /// Units that fail are skipped; the others stay registered.
    pub fn register_file(&mut self, file: DesignFile) -> Result<(), Vec<Diagnostic>> {
        let (entities, architectures): (Vec<_>, Vec<_>) = file
            .units
            .into_iter()
            .partition(|u| matches!(u, DesignUnit::Entity(_)));

        let mut errors = Vec::new();
        for unit in entities.into_iter().chain(architectures) {
            let result = match unit {
                DesignUnit::Entity(decl) => self.register_entity(decl).map(|_| ()),
                DesignUnit::Architecture(arch) => self.register_architecture(arch).map(|_| ()),
            };
            if let Err(diag) = result {
                errors.push(diag);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The interner the library's names belong to.
    pub fn interner(&self) -> &'a Interner {
        self.interner
    }

    /// Looks up an entity by name (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(&self.interner.fold(name)).copied()
    }

    /// Looks up an entity by folded name key.
    pub fn lookup_key(&self, key: Ident) -> Option<EntityId> {
        self.by_name.get(&key).copied()
    }

    /// The entity with `id`.
    pub fn entity(&self, id: EntityId) -> &EntityEntry {
        &self.entities[id]
    }

    /// The architecture with `id`.
    pub fn architecture(&self, id: ArchitectureId) -> &ArchitectureBody {
        &self.architectures[id]
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Picks the architecture of `entity` to elaborate.
    ///
    /// Returns `Ok(None)` when the entity has no architecture. An entity with
    /// exactly one architecture always uses it; with several, `selection`
    /// must name one of them.
    pub fn select_architecture(
        &self,
        entity: EntityId,
        selection: &ArchitectureSelection,
    ) -> Result<Option<ArchitectureId>, Diagnostic> {
        let entry = &self.entities[entity];
        match entry.architectures.as_slice() {
            [] => return Ok(None),
            [only] => return Ok(Some(*only)),
            _ => {}
        }
        if let Some(wanted) = selection.name() {
            let key = self.interner.fold(wanted);
            if let Some(&id) = entry
                .architectures
                .iter()
                .find(|&&a| self.architectures[a].name.key == key)
            {
                return Ok(Some(id));
            }
        }
        Err(errors::error_ambiguous_architecture(
            self.interner.spelling(entry.decl.name),
            &self.candidates(entity),
            entry.decl.name_span,
        ))
    }

    /// Picks the architecture of the top entity.
    ///
    /// Like [`Library::select_architecture`], except that a `named:<name>`
    /// selection must match even when the entity has a single architecture.
    pub fn select_top_architecture(
        &self,
        entity: EntityId,
        selection: &ArchitectureSelection,
    ) -> Result<Option<ArchitectureId>, Diagnostic> {
        let chosen = self.select_architecture(entity, selection)?;
        let (Some(id), Some(wanted)) = (chosen, selection.name()) else {
            return Ok(chosen);
        };
        if self.architectures[id].name.key == self.interner.fold(wanted) {
            return Ok(chosen);
        }
        let entry = &self.entities[entity];
        Err(errors::error_unknown_architecture(
            self.interner.spelling(entry.decl.name),
            wanted,
            &self.candidates(entity),
            entry.decl.name_span,
        ))
    }

    fn candidates(&self, entity: EntityId) -> Vec<String> {
        self.entities[entity]
            .architectures
            .iter()
            .map(|&a| self.interner.spelling(self.architectures[a].name).to_string())
            .collect()
    }
}
