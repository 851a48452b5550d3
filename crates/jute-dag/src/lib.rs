//! Block DAG with vote weighting and canonical total ordering.
//!
//! Nodes are appended to a multi-root DAG and identified by monotonically
//! increasing [`NodeId`]s. Given a tip, the crate computes a weight for every
//! edge in the tip's ancestor set ([`VoteGraph`]) and a deterministic
//! linearization of that set consistent with the causal order.
//!
//! The crate does no I/O. Exporters and demo harnesses live in other crates
//! and consume [`VoteGraph::triples`] and the ordered identity list.

mod ancestry;
pub mod dag;
pub mod error;
pub mod node;
pub mod order;
pub mod shared;
pub mod votes;

pub use dag::BlockDag;
pub use error::{DagError, DagResult};
pub use node::{Edge, Node, NodeId};
pub use order::{ordering_title, TITLE_SEPARATOR};
pub use shared::SharedDag;
pub use votes::{VoteGraph, WeightedEdge};
