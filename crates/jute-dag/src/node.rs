//! Node, identity, and edge types of the block DAG.
//!
//! Each [`Node`] is one block. Its identity ([`NodeId`]) is handed out by the
//! store at creation time and doubles as the node's index in the arena, so
//! identity order is always a valid topological order. Parent edges are
//! stored on the child; the `children` list is a derived back-reference kept
//! for forward traversal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonically increasing identity of a node.
///
/// Identities are assigned by the store in creation order starting at zero.
/// They are stable for the lifetime of the graph and serve as the final
/// tie-break key when ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identity value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Arena slot for this identity, or `None` if it does not fit in
    /// `usize` (and so cannot name a stored node).
    pub(crate) fn slot(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u64)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A parent -> child dependency edge.
///
/// Edges order by parent first, then child, which is the order in which
/// vote graphs iterate and export them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    /// The node being depended on.
    pub parent: NodeId,
    /// The node declaring the dependency.
    pub child: NodeId,
}

impl Edge {
    /// Create an edge from `parent` to `child`.
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parent, self.child)
    }
}

/// A block in the DAG.
///
/// Nodes are immutable once created apart from the store appending child
/// back-references as later nodes attach to them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Identity assigned by the store.
    pub(crate) id: NodeId,
    /// Deduplicated parents in first-seen order (empty for roots).
    pub(crate) parents: Vec<NodeId>,
    /// Nodes that list this one as a parent, in creation order.
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, parents: Vec<NodeId>) -> Self {
        Self {
            id,
            parents,
            children: Vec::new(),
        }
    }

    /// This node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent identities, deduplicated.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Child identities registered so far.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns `true` if this node has no parents.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Edges from each parent into this node.
    pub fn parent_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.parents.iter().map(move |&p| Edge::new(p, self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn root_node_has_no_parents() {
        let node = Node::new(id(0), vec![]);
        assert!(node.is_root());
        assert_eq!(node.parent_edges().count(), 0);
    }

    #[test]
    fn parent_edges_point_at_node() {
        let node = Node::new(id(3), vec![id(1), id(2)]);
        assert!(!node.is_root());
        let edges: Vec<Edge> = node.parent_edges().collect();
        assert_eq!(edges, vec![Edge::new(id(1), id(3)), Edge::new(id(2), id(3))]);
    }

    #[test]
    fn edges_order_by_parent_then_child() {
        let mut edges = vec![
            Edge::new(id(2), id(3)),
            Edge::new(id(0), id(4)),
            Edge::new(id(0), id(1)),
        ];
        edges.sort();
        assert_eq!(
            edges,
            vec![
                Edge::new(id(0), id(1)),
                Edge::new(id(0), id(4)),
                Edge::new(id(2), id(3)),
            ]
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(id(7).to_string(), "7");
        assert_eq!(Edge::new(id(1), id(9)).to_string(), "1-9");
    }

    #[test]
    fn slot_matches_raw_value() {
        assert_eq!(id(0).slot(), Some(0));
        assert_eq!(id(17).slot(), Some(17));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn slot_rejects_identities_wider_than_usize() {
        assert_eq!(id(1 << 32).slot(), None);
        assert_eq!(id(u64::MAX).slot(), None);
    }

    #[test]
    fn node_id_serializes_as_integer() {
        let json = serde_json::to_string(&id(42)).unwrap();
        assert_eq!(json, "42");
        let edge: Edge = serde_json::from_str(r#"{"parent":1,"child":2}"#).unwrap();
        assert_eq!(edge, Edge::new(id(1), id(2)));
    }
}
