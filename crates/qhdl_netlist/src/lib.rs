//! The flattened circuit graph produced by QHDL elaboration.
//!
//! This crate defines [`FlatGraph`], the single output of a successful
//! elaboration run: the top entity's ports, every leaf instance with its
//! resolved generic values, and the driver-to-receiver edges between their
//! ports. It also provides the dense [`Arena`] storage and typed IDs shared
//! with the elaborator, plus the [`Value`] and [`GenericType`] model for
//! generic parameters.

#![warn(missing_docs)]

pub mod arena;
pub mod graph;
pub mod ids;
pub mod port;
pub mod value;

pub use arena::{Arena, ArenaId};
pub use graph::{Edge, Endpoint, FlatGraph, GenericBinding, GenericOrigin, LeafInstance, LeafPort, TopPort};
pub use ids::{ArchitectureId, EntityId, LeafId};
pub use port::Direction;
pub use value::{GenericType, Value};
