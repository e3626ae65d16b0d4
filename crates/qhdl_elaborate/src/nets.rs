//! Net connectivity as a union-find over port and signal nodes.
//!
//! Every top port, connected leaf port and internal signal becomes a node.
//! Port maps and signal assignments union nodes together; each resulting
//! set is one net.

use qhdl_netlist::{Direction, Endpoint, LeafId};
use qhdl_source::Span;

/// Index of a node in [`Nets`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

/// What a node stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A port of the top entity.
    TopPort {
        /// Port name.
        port: String,
        /// Declared direction.
        direction: Direction,
    },
    /// A port of a leaf instance.
    LeafPort {
        /// The leaf.
        leaf: LeafId,
        /// Port name.
        port: String,
        /// Declared direction.
        direction: Direction,
    },
    /// A signal, or a port of an expanded instance.
    Alias {
        /// Stands for a composite port left `open` or unassociated.
        open: bool,
    },
}

/// Whether a node drives its net, receives from it, or only joins it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    /// A leaf `out` port or top `in` port.
    Driver,
    /// A leaf `in` port or top `out` port.
    Receiver,
    /// An alias.
    Passive,
}

/// A node with its mangled name and source position.
#[derive(Clone, Debug)]
pub struct NetNode {
    /// What the node stands for.
    pub kind: NodeKind,
    /// Hierarchical name, e.g. `B1.Out1` or `X.s1`.
    pub name: String,
    /// Declaration or instance span.
    pub span: Span,
    /// Named by a connection that expansion refused; its net may be missing
    /// endpoints.
    pub suspect: bool,
}

impl NetNode {
    /// This node's role in its net.
    pub fn role(&self) -> Role {
        match self.kind {
            NodeKind::TopPort { direction: Direction::In, .. }
            | NodeKind::LeafPort { direction: Direction::Out, .. } => Role::Driver,
            NodeKind::TopPort { direction: Direction::Out, .. }
            | NodeKind::LeafPort { direction: Direction::In, .. } => Role::Receiver,
            NodeKind::Alias { .. } => Role::Passive,
        }
    }

    /// The graph endpoint for a port node; `None` for aliases.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match &self.kind {
            NodeKind::TopPort { port, .. } => Some(Endpoint::TopPort { port: port.clone() }),
            NodeKind::LeafPort { leaf, port, .. } => Some(Endpoint::LeafPort {
                leaf: *leaf,
                port: port.clone(),
            }),
            NodeKind::Alias { .. } => None,
        }
    }

    /// The leaf this node belongs to, if it is a leaf port.
    pub fn leaf(&self) -> Option<LeafId> {
        match self.kind {
            NodeKind::LeafPort { leaf, .. } => Some(leaf),
            _ => None,
        }
    }
}

/// One net: the nodes of a union-find set, in creation order.
#[derive(Clone, Debug)]
pub struct Net {
    /// Member nodes.
    pub members: Vec<NodeId>,
}

/// Union-find over [`NetNode`]s.
#[derive(Debug, Default)]
pub struct Nets {
    nodes: Vec<NetNode>,
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl Nets {
    /// Creates an empty set of nets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node in a net of its own.
    pub fn add(&mut self, kind: NodeKind, name: impl Into<String>, span: Span) -> NodeId {
        let id = self.nodes.len() as u32;
        self.nodes.push(NetNode {
            kind,
            name: name.into(),
            span,
            suspect: false,
        });
        self.parent.push(id);
        self.rank.push(0);
        NodeId(id)
    }

    /// The node with `id`.
    pub fn node(&self, id: NodeId) -> &NetNode {
        &self.nodes[id.0 as usize]
    }

    /// Marks `id` as named by a refused connection.
    pub fn mark_suspect(&mut self, id: NodeId) {
        self.nodes[id.0 as usize].suspect = true;
    }

    /// Returns `true` if any member of `net` is suspect.
    pub fn is_suspect(&self, net: &Net) -> bool {
        net.members.iter().any(|&id| self.node(id).suspect)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node was added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Representative of the set containing `id`.
    pub fn find(&mut self, id: NodeId) -> NodeId {
        let mut root = id.0;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut current = id.0;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        NodeId(root)
    }

    /// Merges the nets of `a` and `b`.
    pub fn union(&mut self, a: NodeId, b: NodeId) {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        let (ra, rb) = (self.rank[a.0 as usize], self.rank[b.0 as usize]);
        if ra < rb {
            self.parent[a.0 as usize] = b.0;
        } else {
            self.parent[b.0 as usize] = a.0;
            if ra == rb {
                self.rank[a.0 as usize] += 1;
            }
        }
    }

    /// Every net, ordered by its first member.
    pub fn groups(&mut self) -> Vec<Net> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut nets: Vec<Net> = Vec::new();
        for index in 0..self.nodes.len() {
            let id = NodeId(index as u32);
            let root = self.find(id).0 as usize;
            match slot_of_root[root] {
                Some(slot) => nets[slot].members.push(id),
                None => {
                    slot_of_root[root] = Some(nets.len());
                    nets.push(Net { members: vec![id] });
                }
            }
        }
        nets
    }

    /// Members of `net` with the given role.
    pub fn with_role<'n>(&'n self, net: &'n Net, role: Role) -> impl Iterator<Item = NodeId> + 'n {
        net.members
            .iter()
            .copied()
            .filter(move |&id| self.node(id).role() == role)
    }

    /// A readable name for `net`: its first signal if it has one, else its first member.
    pub fn net_name(&self, net: &Net) -> &str {
        net.members
            .iter()
            .map(|&id| self.node(id))
            .find(|n| matches!(n.kind, NodeKind::Alias { open: false }))
            .or_else(|| net.members.first().map(|&id| self.node(id)))
            .map_or("", |n| n.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(nets: &mut Nets, name: &str, direction: Direction) -> NodeId {
        nets.add(
            NodeKind::TopPort { port: name.into(), direction },
            name,
            Span::DUMMY,
        )
    }

    fn signal(nets: &mut Nets, name: &str) -> NodeId {
        nets.add(NodeKind::Alias { open: false }, name, Span::DUMMY)
    }

    #[test]
    fn union_find_groups() {
        let mut nets = Nets::new();
        let a = top(&mut nets, "In1", Direction::In);
        let s = signal(&mut nets, "s");
        let b = top(&mut nets, "Out1", Direction::Out);
        let c = top(&mut nets, "Out2", Direction::Out);
        nets.union(s, b);
        nets.union(a, s);

        assert_eq!(nets.find(a), nets.find(b));
        assert_ne!(nets.find(a), nets.find(c));

        let groups = nets.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![a, s, b]);
        assert_eq!(groups[1].members, vec![c]);
        assert_eq!(nets.net_name(&groups[0]), "s");
        assert_eq!(nets.net_name(&groups[1]), "Out2");
    }

    #[test]
    fn roles() {
        let mut nets = Nets::new();
        let a = top(&mut nets, "In1", Direction::In);
        let b = top(&mut nets, "Out1", Direction::Out);
        let leaf_out = nets.add(
            NodeKind::LeafPort {
                leaf: LeafId::from_raw(0),
                port: "Out1".into(),
                direction: Direction::Out,
            },
            "B1.Out1",
            Span::DUMMY,
        );
        let s = signal(&mut nets, "s");
        nets.union(a, b);
        nets.union(b, leaf_out);
        nets.union(leaf_out, s);

        let groups = nets.groups();
        let drivers: Vec<_> = nets.with_role(&groups[0], Role::Driver).collect();
        assert_eq!(drivers, vec![a, leaf_out]);
        assert_eq!(nets.with_role(&groups[0], Role::Receiver).count(), 1);
        assert_eq!(nets.node(s).endpoint(), None);
        assert_eq!(nets.node(leaf_out).leaf(), Some(LeafId::from_raw(0)));
    }

    #[test]
    fn suspicion_spreads_to_the_whole_net() {
        let mut nets = Nets::new();
        let a = signal(&mut nets, "a");
        let b = signal(&mut nets, "b");
        let c = signal(&mut nets, "c");
        nets.mark_suspect(b);
        nets.union(a, b);

        let groups = nets.groups();
        assert!(nets.is_suspect(&groups[0]));
        assert!(!nets.is_suspect(&groups[1]));
        assert!(!nets.node(c).suspect);
    }

    #[test]
    fn union_is_idempotent() {
        let mut nets = Nets::new();
        let a = signal(&mut nets, "a");
        let b = signal(&mut nets, "b");
        nets.union(a, b);
        nets.union(b, a);
        nets.union(a, a);
        assert_eq!(nets.groups().len(), 1);
        assert_eq!(nets.len(), 2);
    }
}
