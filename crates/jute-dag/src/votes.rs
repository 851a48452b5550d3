//! Vote graphs: per-edge corroboration weights relative to a tip.
//!
//! Every node in the tip's ancestor set other than the tip itself votes for
//! each edge whose child it causally depends on (the child included). The
//! tip is the reference point and only votes for the edges it declares
//! itself. So for an edge `(p, c)` inside the ancestor set:
//!
//! - `weight = reach(c) - 1` when `c` is not the tip,
//! - `weight = 1` when `c` is the tip,
//!
//! where `reach(c)` counts the distinct ancestor-set members reachable
//! forward from `c`, `c` included.
//!
//! Reachable counts come from descendant sets built once per node in
//! descending identity order (children before parents) as the union of the
//! children's sets. Summing child counts instead would count a shared
//! descendant once per reconverging path. The sets are indexed by each
//! member's position in the ancestor set, so their width is bounded by the
//! ancestor set and not by the graph.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ancestry::SlotSet;
use crate::dag::BlockDag;
use crate::error::DagResult;
use crate::node::{Edge, Node, NodeId};

/// One weighted edge, the unit handed to exporters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub parent: NodeId,
    pub child: NodeId,
    pub weight: u64,
}

/// Edge weights and the ancestor set they were computed over.
///
/// All collections are ordered, so two vote graphs computed from the same
/// DAG and tip compare equal and iterate identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteGraph {
    tip: NodeId,
    ancestors: BTreeSet<NodeId>,
    #[serde(with = "weights_as_list")]
    weights: BTreeMap<Edge, u64>,
    reach: BTreeMap<NodeId, u64>,
}

impl VoteGraph {
    /// The tip these votes are relative to.
    pub fn tip(&self) -> NodeId {
        self.tip
    }

    /// The tip and all of its ancestors.
    pub fn ancestors(&self) -> &BTreeSet<NodeId> {
        &self.ancestors
    }

    /// Weight of every edge inside the ancestor set.
    pub fn weights(&self) -> &BTreeMap<Edge, u64> {
        &self.weights
    }

    /// Weight of the edge `parent -> child`, if that edge exists here.
    pub fn weight(&self, parent: NodeId, child: NodeId) -> Option<u64> {
        self.weights.get(&Edge::new(parent, child)).copied()
    }

    /// Forward-reachable count of `node` within the ancestor set.
    pub fn reach(&self, node: NodeId) -> Option<u64> {
        self.reach.get(&node).copied()
    }

    /// Weighted edges as `(parent, child, weight)` records, sorted by edge.
    pub fn triples(&self) -> Vec<WeightedEdge> {
        self.weights
            .iter()
            .map(|(edge, &weight)| WeightedEdge {
                parent: edge.parent,
                child: edge.child,
                weight,
            })
            .collect()
    }
}

impl BlockDag {
    /// Compute the vote graph of `tip`.
    ///
    /// Fails with [`DagError::UnreachableTip`] if `tip` is unknown.
    ///
    /// [`DagError::UnreachableTip`]: crate::DagError::UnreachableTip
    pub fn compute_votes(&self, tip: NodeId) -> DagResult<VoteGraph> {
        let members = self.ancestor_set(tip)?;
        Ok(votes_over(tip, &members))
    }
}

/// Position of `id` among `members`, which are sorted by identity.
pub(crate) fn position(members: &[&Node], id: NodeId) -> Option<usize> {
    members.binary_search_by_key(&id, |node| node.id()).ok()
}

/// Vote graph of `tip` over its already collected ancestor set.
pub(crate) fn votes_over(tip: NodeId, members: &[&Node]) -> VoteGraph {
    // Descending identity is reverse topological order.
    let mut descendants: Vec<SlotSet> = vec![SlotSet::new(); members.len()];
    for slot in (0..members.len()).rev() {
        let mut set = SlotSet::new();
        set.insert(slot);
        for &child in members[slot].children() {
            if let Some(child_slot) = position(members, child) {
                set.union_with(&descendants[child_slot]);
            }
        }
        descendants[slot] = set;
    }

    let mut reach = BTreeMap::new();
    let mut weights = BTreeMap::new();
    for (node, set) in members.iter().zip(&descendants) {
        let count = set.len() as u64;
        reach.insert(node.id(), count);
        let weight = if node.id() == tip { 1 } else { count - 1 };
        for edge in node.parent_edges() {
            trace!(edge = %edge, weight, "edge weight");
            weights.insert(edge, weight);
        }
    }

    debug!(
        tip = %tip,
        ancestors = members.len(),
        edges = weights.len(),
        "computed vote graph"
    );
    VoteGraph {
        tip,
        ancestors: members.iter().map(|node| node.id()).collect(),
        weights,
        reach,
    }
}

/// JSON objects need string keys, so weights travel as a list of triples.
mod weights_as_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::WeightedEdge;
    use crate::node::Edge;

    pub fn serialize<S: Serializer>(
        weights: &BTreeMap<Edge, u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        weights
            .iter()
            .map(|(edge, &weight)| WeightedEdge {
                parent: edge.parent,
                child: edge.child,
                weight,
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Edge, u64>, D::Error> {
        let list = Vec::<WeightedEdge>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|e| (Edge::new(e.parent, e.child), e.weight))
            .collect())
    }
}
