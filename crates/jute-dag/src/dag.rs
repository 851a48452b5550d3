//! The block DAG arena: node storage, creation, and structural queries.
//!
//! [`BlockDag`] stores nodes in a `Vec` indexed by [`NodeId`]. Identities are
//! handed out in creation order, and every parent must exist before its
//! child is created, so the graph is acyclic by construction and ascending
//! identity order is a topological order. No cycle check is ever needed.
//!
//! # Invariants
//!
//! - `nodes[i].id == NodeId(i)`.
//! - Every parent identity is strictly smaller than its child's.
//! - `children` mirrors the parent edges exactly.
//!
//! Nothing per-node is stored beyond the edges themselves. Ancestor sets are
//! walked on demand, so a query costs time in proportion to the tip's
//! history and never to the size of the whole graph.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::error::{DagError, DagResult};
use crate::node::{Edge, Node, NodeId};

/// An append-only, multi-root block DAG.
#[derive(Clone, Debug, Default)]
pub struct BlockDag {
    /// All nodes, indexed by identity.
    nodes: Vec<Node>,
    /// Nodes created through `create_root`, ascending.
    roots: Vec<NodeId>,
}

impl BlockDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of nodes in the DAG.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the DAG has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Create a new root (genesis) node.
    ///
    /// May be called any number of times; each call starts an independent
    /// origin of causal history.
    pub fn create_root(&mut self) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node::new(id, Vec::new()));
        self.roots.push(id);
        debug!(node = %id, "created root");
        id
    }

    /// Create a node depending on `parents`.
    ///
    /// Duplicate parent identities collapse to a single edge; the first
    /// occurrence fixes the position. All parents are checked before the
    /// graph is touched, so a failed call leaves the DAG unchanged.
    pub fn create_node(&mut self, parents: &[NodeId]) -> DagResult<NodeId> {
        if parents.is_empty() {
            return Err(DagError::EmptyParentSet);
        }

        let mut unique = Vec::with_capacity(parents.len());
        let mut slots = Vec::with_capacity(parents.len());
        for &parent in parents {
            let slot = self.slot_of(parent).ok_or(DagError::UnknownParent(parent))?;
            if !unique.contains(&parent) {
                unique.push(parent);
                slots.push(slot);
            }
        }

        let id = self.next_id();
        for slot in slots {
            self.nodes[slot].children.push(id);
        }

        debug!(node = %id, parents = unique.len(), "created node");
        self.nodes.push(Node::new(id, unique));
        Ok(id)
    }

    fn next_id(&self) -> NodeId {
        NodeId::from_index(self.nodes.len())
    }

    /// Arena slot of `id`, if the node exists.
    fn slot_of(&self, id: NodeId) -> Option<usize> {
        id.slot().filter(|&slot| slot < self.nodes.len())
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    /// Returns `true` if `id` names a node in this DAG.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Retrieve a node by identity.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.slot_of(id).map(|slot| &self.nodes[slot])
    }

    /// All root nodes, in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes in identity (and therefore topological) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Every edge in the DAG, sorted by parent then child.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.nodes.iter().flat_map(Node::parent_edges).collect();
        edges.sort_unstable();
        edges
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    ///
    /// Walks parent edges back from `node`, skipping anything older than
    /// `ancestor` since parents always precede their children. Unknown
    /// identities are never ancestors of anything.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor >= node || !self.contains(ancestor) {
            return false;
        }
        let Some(start) = self.get_node(node) else {
            return false;
        };

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &parent in &current.parents {
                if parent == ancestor {
                    return true;
                }
                if parent > ancestor && visited.insert(parent) {
                    stack.extend(self.get_node(parent));
                }
            }
        }
        false
    }

    /// The ancestor set of `tip`, inclusive of `tip`, sorted by identity.
    ///
    /// Breadth-first over parent edges; each member is visited once.
    pub(crate) fn ancestor_set(&self, tip: NodeId) -> DagResult<Vec<&Node>> {
        let start = self.get_node(tip).ok_or(DagError::UnreachableTip(tip))?;

        let mut visited = HashSet::new();
        visited.insert(tip);
        let mut members = vec![start];
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for &parent in &current.parents {
                if !visited.insert(parent) {
                    continue;
                }
                if let Some(node) = self.get_node(parent) {
                    members.push(node);
                    queue.push_back(node);
                }
            }
        }

        members.sort_unstable_by_key(|node| node.id);
        Ok(members)
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    /// Validate the DAG's structural integrity.
    ///
    /// Checks that:
    /// - identities match arena positions,
    /// - every parent precedes its child and lists it as a child,
    /// - the children index holds no edge without a matching parent entry.
    pub fn validate(&self) -> DagResult<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.slot() != Some(index) {
                return Err(inconsistent(node.id, "identity does not match arena slot"));
            }
            if node.is_root() != self.roots.binary_search(&node.id).is_ok() {
                return Err(inconsistent(node.id, "root tracking mismatch"));
            }

            for &parent in &node.parents {
                if parent >= node.id {
                    return Err(inconsistent(node.id, "parent does not precede child"));
                }
                let registered = self
                    .get_node(parent)
                    .is_some_and(|p| p.children.contains(&node.id));
                if !registered {
                    return Err(inconsistent(parent, "missing child back-reference"));
                }
            }

            for &child in &node.children {
                let listed = self
                    .get_node(child)
                    .is_some_and(|c| c.parents.contains(&node.id));
                if !listed {
                    return Err(inconsistent(node.id, "child does not list node as parent"));
                }
            }
        }
        Ok(())
    }
}

fn inconsistent(node: NodeId, reason: &str) -> DagError {
    DagError::Inconsistent {
        node,
        reason: reason.to_string(),
    }
}
