//! The flattened circuit graph.
//!
//! A [`FlatGraph`] is self-contained: names are stored as strings in their
//! source spelling, so the graph can be serialized and compared without the
//! interner that produced it.

use qhdl_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::ids::LeafId;
use crate::port::Direction;
use crate::value::{GenericType, Value};

/// A port of the top-level entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPort {
    /// Port name.
    pub name: String,
    /// Direction as declared on the entity.
    pub direction: Direction,
    /// Type name.
    pub ty: String,
}

/// A port of a leaf instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafPort {
    /// Port name.
    pub name: String,
    /// Direction as declared on the component.
    pub direction: Direction,
    /// Type name.
    pub ty: String,
}

/// Where a generic's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericOrigin {
    /// Taken from the instance's generic map.
    Mapped,
    /// Taken from the declaration's default.
    Default,
    /// Neither mapped nor defaulted.
    Unresolved,
}

/// The binding of one generic on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericBinding {
    /// Generic name.
    pub name: String,
    /// Declared type.
    pub ty: GenericType,
    /// Provenance of `value`.
    pub origin: GenericOrigin,
    /// The value; `None` only when `origin` is [`GenericOrigin::Unresolved`].
    pub value: Option<Value>,
}

/// An instance with nothing further to expand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafInstance {
    /// Dotted hierarchical path of instance labels, e.g. `X.B1`.
    pub path: String,
    /// Component name.
    pub component: String,
    /// Generic bindings in declaration order.
    pub generics: Vec<GenericBinding>,
    /// Ports in declaration order.
    pub ports: Vec<LeafPort>,
}

impl LeafInstance {
    /// Looks up a generic binding by name (case-insensitive).
    pub fn generic(&self, name: &str) -> Option<&GenericBinding> {
        self.generics
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Looks up a port by name (case-insensitive).
    pub fn port(&self, name: &str) -> Option<&LeafPort> {
        self.ports.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// One side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// A port of the top entity.
    TopPort {
        /// Port name.
        port: String,
    },
    /// A port of a leaf instance.
    LeafPort {
        /// The instance.
        leaf: LeafId,
        /// Port name.
        port: String,
    },
}

/// A driving endpoint and every endpoint it reaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// The driver: a leaf `out` port or a top `in` port.
    pub driver: Endpoint,
    /// The receivers: leaf `in` ports and top `out` ports. May be empty.
    pub receivers: Vec<Endpoint>,
}

/// The validated, fully flattened circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatGraph {
    /// Name of the top entity.
    pub top: String,
    /// Name of the architecture used for the top entity.
    pub architecture: String,
    /// Ports of the top entity in declaration order.
    pub ports: Vec<TopPort>,
    /// Leaf instances in elaboration order.
    pub leaves: Arena<LeafId, LeafInstance>,
    /// One edge per driving endpoint.
    pub edges: Vec<Edge>,
}

impl FlatGraph {
    /// Finds a leaf by its hierarchical path (case-insensitive).
    pub fn leaf_by_path(&self, path: &str) -> Option<(LeafId, &LeafInstance)> {
        self.leaves
            .iter()
            .find(|(_, leaf)| leaf.path.eq_ignore_ascii_case(path))
    }

    /// The drivers reaching `endpoint` as a receiver.
    pub fn drivers_of<'a>(&'a self, endpoint: &'a Endpoint) -> impl Iterator<Item = &'a Endpoint> {
        self.edges
            .iter()
            .filter(move |e| e.receivers.contains(endpoint))
            .map(|e| &e.driver)
    }

    /// The receivers reached from `endpoint` as a driver.
    pub fn receivers_of(&self, endpoint: &Endpoint) -> &[Endpoint] {
        self.edges
            .iter()
            .find(|e| &e.driver == endpoint)
            .map_or(&[], |e| e.receivers.as_slice())
    }

    /// How many times `endpoint` appears across all edges, as driver or receiver.
    pub fn occurrences(&self, endpoint: &Endpoint) -> usize {
        self.edges
            .iter()
            .map(|e| {
                usize::from(&e.driver == endpoint)
                    + e.receivers.iter().filter(|r| *r == endpoint).count()
            })
            .sum()
    }

    /// Human-readable form of an endpoint: `Out1` or `B1.Out1`.
    pub fn describe(&self, endpoint: &Endpoint) -> String {
        match endpoint {
            Endpoint::TopPort { port } => port.clone(),
            Endpoint::LeafPort { leaf, port } => match self.leaves.try_get(*leaf) {
                Some(inst) => format!("{}.{}", inst.path, port),
                None => format!("<leaf {}>.{}", leaf.as_raw(), port),
            },
        }
    }

    /// An order-independent hash of the graph's structure.
    ///
    /// Leaves are identified by path rather than by [`LeafId`], so two
    /// elaborations that differ only in the order of instance statements
    /// produce the same fingerprint.
    pub fn fingerprint(&self) -> ContentHash {
        let mut parts = Vec::with_capacity(1 + self.ports.len() + self.leaves.len() + self.edges.len());

        parts.push(ContentHash::from_bytes(
            format!("top\0{}", self.top.to_ascii_lowercase()).as_bytes(),
        ));
        for port in &self.ports {
            parts.push(ContentHash::from_bytes(
                format!("port\0{}\0{}\0{}", fold(&port.name), port.direction, fold(&port.ty))
                    .as_bytes(),
            ));
        }
        for leaf in self.leaves.values() {
            let mut bytes = format!("leaf\0{}\0{}", fold(&leaf.path), fold(&leaf.component)).into_bytes();
            let mut generics: Vec<Vec<u8>> = leaf
                .generics
                .iter()
                .map(|g| {
                    let mut b = format!("{}\0{}\0", fold(&g.name), g.ty).into_bytes();
                    if let Some(v) = &g.value {
                        b.extend(v.canonical_bytes());
                    }
                    b
                })
                .collect();
            generics.sort();
            for g in generics {
                bytes.push(0);
                bytes.extend(g);
            }
            parts.push(ContentHash::from_bytes(&bytes));
        }
        for edge in &self.edges {
            let mut receivers: Vec<String> =
                edge.receivers.iter().map(|r| fold(&self.describe(r))).collect();
            receivers.sort();
            let text = format!(
                "edge\0{}\0{}",
                fold(&self.describe(&edge.driver)),
                receivers.join("\0")
            );
            parts.push(ContentHash::from_bytes(text.as_bytes()));
        }
        ContentHash::combine_unordered(parts)
    }
}

fn fold(s: &str) -> String {
    s.to_ascii_lowercase()
}
