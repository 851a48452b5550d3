//! Canonical linearization of a tip's ancestor set.
//!
//! Placement is a topological walk driven by the vote graph:
//!
//! 1. Every root in the ancestor set is eligible from the start and has no
//!    parent edges to weigh, so the roots go first in identity order.
//! 2. From then on each placement releases the children whose parents are
//!    now all placed. A released batch is ranked by the summed weight of its
//!    parent edges (heavier first), then by smaller identity, and the batch
//!    released most recently is drained before older candidates.
//!
//! Taking the most recent release first keeps a branch that only reconnects
//! at the tip in one contiguous run. Symmetric shapes fall through to the
//! identity tie-break.

use std::cmp::Reverse;

use tracing::debug;

use crate::dag::BlockDag;
use crate::error::{DagError, DagResult};
use crate::node::{Node, NodeId};
use crate::votes::{position, votes_over, VoteGraph};

/// Separator used for ordering titles.
pub const TITLE_SEPARATOR: &str = "-";

impl BlockDag {
    /// Linear order of the tip's ancestor set.
    ///
    /// Fails with [`DagError::UnreachableTip`] if `tip` is unknown.
    pub fn linear_order(&self, tip: NodeId) -> DagResult<Vec<NodeId>> {
        let members = self.ancestor_set(tip)?;
        let votes = votes_over(tip, &members);
        Ok(order_members(&members, &votes))
    }

    /// Linear order for an already computed vote graph.
    ///
    /// The vote graph is checked against this DAG first: its tip must exist
    /// here ([`DagError::UnreachableTip`]) and its ancestor set and edges
    /// must be the ones this DAG has for that tip
    /// ([`DagError::VotesMismatch`]). Votes computed before later nodes were
    /// appended stay valid, since appending never changes an existing
    /// node's history.
    pub fn linear_order_with(&self, votes: &VoteGraph) -> DagResult<Vec<NodeId>> {
        let members = self.ancestor_set(votes.tip())?;
        if !describes(&members, votes) {
            return Err(DagError::VotesMismatch(votes.tip()));
        }
        Ok(order_members(&members, votes))
    }

    /// Summed weight of the edges entering `node`.
    pub fn aggregate_weight(&self, votes: &VoteGraph, node: NodeId) -> u64 {
        self.get_node(node)
            .map_or(0, |n| incoming_weight(votes, n))
    }
}

/// Whether `votes` covers exactly `members` and their parent edges.
fn describes(members: &[&Node], votes: &VoteGraph) -> bool {
    let edges: usize = members.iter().map(|n| n.parents().len()).sum();
    members.len() == votes.ancestors().len()
        && members
            .iter()
            .map(|n| n.id())
            .eq(votes.ancestors().iter().copied())
        && edges == votes.weights().len()
        && members
            .iter()
            .flat_map(|n| n.parent_edges())
            .all(|edge| votes.weights().contains_key(&edge))
}

fn incoming_weight(votes: &VoteGraph, node: &Node) -> u64 {
    node.parent_edges()
        .filter_map(|edge| votes.weights().get(&edge).copied())
        .sum()
}

/// Place `members`, which must be a tip's ancestor set sorted by identity.
fn order_members(members: &[&Node], votes: &VoteGraph) -> Vec<NodeId> {
    let mut walk = Walk {
        members,
        votes,
        waiting: members.iter().map(|n| n.parents().len()).collect(),
        stack: Vec::new(),
    };
    let mut order = Vec::with_capacity(members.len());

    let roots: Vec<usize> = (0..members.len())
        .filter(|&slot| members[slot].is_root())
        .collect();
    let mut released = Vec::new();
    for &root in &roots {
        order.push(members[root].id());
        walk.release(root, &mut released);
    }
    walk.push_ranked(released);

    while let Some(next) = walk.stack.pop() {
        order.push(members[next].id());
        let mut released = Vec::new();
        walk.release(next, &mut released);
        walk.push_ranked(released);
    }

    debug!(
        tip = %votes.tip(),
        roots = roots.len(),
        placed = order.len(),
        "linearized ancestor set"
    );
    order
}

/// Placement state over ancestor-set slots.
struct Walk<'a> {
    members: &'a [&'a Node],
    votes: &'a VoteGraph,
    /// Unplaced parent count per slot.
    waiting: Vec<usize>,
    stack: Vec<usize>,
}

impl Walk<'_> {
    /// Collect children of `slot` whose last unplaced parent was `slot`.
    fn release(&mut self, slot: usize, released: &mut Vec<usize>) {
        for &child in self.members[slot].children() {
            let Some(child_slot) = position(self.members, child) else {
                continue;
            };
            self.waiting[child_slot] -= 1;
            if self.waiting[child_slot] == 0 {
                released.push(child_slot);
            }
        }
    }

    /// Push a released batch so its best-ranked node is popped first.
    fn push_ranked(&mut self, mut batch: Vec<usize>) {
        let (members, votes) = (self.members, self.votes);
        batch.sort_by_cached_key(|&slot| {
            let node = members[slot];
            (Reverse(incoming_weight(votes, node)), node.id())
        });
        self.stack.extend(batch.into_iter().rev());
    }
}

/// Join an order into a display title, e.g. `0-1-3-2-4`.
pub fn ordering_title(order: &[NodeId], separator: &str) -> String {
    order
        .iter()
        .map(NodeId::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
