//! Error types for the block DAG.

use crate::node::NodeId;

/// Errors that can occur during DAG operations.
///
/// Every variant is a local validation failure. A rejected call never
/// mutates the graph, so the DAG stays usable after any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    /// A parent identity supplied to `create_node` does not exist.
    #[error("unknown parent: {0}")]
    UnknownParent(NodeId),

    /// `create_node` was called without parents. Roots use `create_root`.
    #[error("empty parent set: roots must be created with create_root")]
    EmptyParentSet,

    /// A query referenced a tip that is not in the graph.
    #[error("unreachable tip: {0}")]
    UnreachableTip(NodeId),

    /// A vote graph handed back for ordering was not computed from this
    /// graph, or the graph it came from has a different history for its tip.
    #[error("vote graph for tip {0} does not match this dag")]
    VotesMismatch(NodeId),

    /// The lock guarding a shared graph was poisoned by a panicking writer.
    #[error("dag lock poisoned")]
    LockPoisoned,

    /// Structural self-check failed.
    #[error("inconsistent node {node}: {reason}")]
    Inconsistent {
        /// The node whose bookkeeping is wrong.
        node: NodeId,
        /// What the check found.
        reason: String,
    },
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
