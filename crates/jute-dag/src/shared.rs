//! Lock-guarded handle for sharing one DAG between a writer and readers.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dag::BlockDag;
use crate::error::{DagError, DagResult};
use crate::node::NodeId;
use crate::votes::VoteGraph;

/// A [`BlockDag`] behind a reader-writer lock.
///
/// Creation calls take the write lock one at a time; queries share the read
/// lock and never observe a half-appended node. Long-running consumers can
/// take a [`snapshot`](SharedDag::snapshot) and query it without holding the
/// lock at all.
#[derive(Debug, Default)]
pub struct SharedDag {
    inner: RwLock<BlockDag>,
}

impl SharedDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing DAG.
    pub fn from_dag(dag: BlockDag) -> Self {
        Self {
            inner: RwLock::new(dag),
        }
    }

    pub fn create_root(&self) -> DagResult<NodeId> {
        Ok(self.write()?.create_root())
    }

    pub fn create_node(&self, parents: &[NodeId]) -> DagResult<NodeId> {
        self.write()?.create_node(parents)
    }

    pub fn compute_votes(&self, tip: NodeId) -> DagResult<VoteGraph> {
        self.read()?.compute_votes(tip)
    }

    pub fn linear_order(&self, tip: NodeId) -> DagResult<Vec<NodeId>> {
        self.read()?.linear_order(tip)
    }

    pub fn len(&self) -> DagResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> DagResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Clone the current graph for lock-free querying.
    pub fn snapshot(&self) -> DagResult<BlockDag> {
        Ok(self.read()?.clone())
    }

    /// Unwrap the inner DAG.
    pub fn into_inner(self) -> DagResult<BlockDag> {
        self.inner.into_inner().map_err(|_| DagError::LockPoisoned)
    }

    fn read(&self) -> DagResult<RwLockReadGuard<'_, BlockDag>> {
        self.inner.read().map_err(|_| DagError::LockPoisoned)
    }

    fn write(&self) -> DagResult<RwLockWriteGuard<'_, BlockDag>> {
        self.inner.write().map_err(|_| DagError::LockPoisoned)
    }
}
