//! Named demonstration topologies.
//!
//! Each builder returns the DAG and the tip to order it from. Shapes come
//! from the classic Jute ordering walkthroughs: diamonds, a pentagon, an
//! ongoing five-wide mesh, and several adversarial layouts.

use jute_dag::{BlockDag, DagResult, NodeId};

/// A named graph builder.
pub struct Topology {
    pub name: &'static str,
    pub title: &'static str,
    pub build: fn() -> DagResult<(BlockDag, NodeId)>,
    /// Intermediate tips worth rendering on their own, in build order.
    pub snapshots: &'static [Snapshot],
}

/// A labelled intermediate tip of a topology.
pub struct Snapshot {
    pub label: &'static str,
    pub tip: u64,
}

impl Topology {
    /// Look up a topology by name.
    pub fn find(name: &str) -> Option<&'static Topology> {
        TOPOLOGIES.iter().find(|t| t.name == name)
    }
}

/// All topologies in presentation order.
pub static TOPOLOGIES: &[Topology] = &[
    Topology { name: "diamond", title: "Diamond Graph", build: diamond, snapshots: &[] },
    Topology { name: "pentagon", title: "Pentagon Graph", build: pentagon, snapshots: &[] },
    Topology {
        name: "double-diamond",
        title: "Double Diamond Graph",
        build: double_diamond,
        snapshots: &[],
    },
    Topology {
        name: "nested-diamond",
        title: "Nested Diamond Graph",
        build: nested_diamond,
        snapshots: NESTED_DIAMOND_STEPS,
    },
    Topology { name: "ongoing", title: "Ongoing Graph", build: ongoing, snapshots: &[] },
    Topology {
        name: "impossibility",
        title: "Impossibility Proof Graph",
        build: impossibility,
        snapshots: &[],
    },
    Topology { name: "abstain", title: "Abstain Graph", build: abstain, snapshots: &[] },
    Topology { name: "leech", title: "Leech Graph", build: leech, snapshots: &[] },
    Topology {
        name: "low-latency-adversary",
        title: "Low Latency Adversary Graph",
        build: low_latency_adversary,
        snapshots: &[],
    },
];

/// The nested diamond as it grows: after n4, n6, n7 and n8.
static NESTED_DIAMOND_STEPS: &[Snapshot] = &[
    Snapshot { label: "M1", tip: 4 },
    Snapshot { label: "M2", tip: 6 },
    Snapshot { label: "M3", tip: 7 },
    Snapshot { label: "M4", tip: 8 },
];

/// Extend a single-parent chain `len` nodes past `from`, returning its end.
fn chain(dag: &mut BlockDag, from: NodeId, len: usize) -> DagResult<NodeId> {
    let mut last = from;
    for _ in 0..len {
        last = dag.create_node(&[last])?;
    }
    Ok(last)
}

fn diamond() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let d1 = g.create_node(&[genesis])?;
    let d2 = g.create_node(&[genesis])?;
    let d3 = g.create_node(&[d1, d2])?;
    Ok((g, d3))
}

fn pentagon() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let p1 = g.create_node(&[genesis])?;
    let p2 = g.create_node(&[genesis])?;
    let p3 = g.create_node(&[p1])?;
    let p4 = g.create_node(&[p2, p3])?;
    Ok((g, p4))
}

fn double_diamond() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let d1 = g.create_node(&[genesis])?;
    let d2 = g.create_node(&[genesis])?;
    let d3 = g.create_node(&[d1, d2])?;
    let d4 = g.create_node(&[d2])?;
    let d5 = g.create_node(&[d3, d4])?;
    Ok((g, d5))
}

fn nested_diamond() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let n1 = g.create_node(&[genesis])?;
    let n2 = g.create_node(&[genesis])?;
    let n3 = g.create_node(&[n1])?;
    let n4 = g.create_node(&[n1, n2])?;
    let n5 = g.create_node(&[n2])?;
    let n6 = g.create_node(&[n3, n4])?;
    let n7 = g.create_node(&[n4, n5])?;
    let n8 = g.create_node(&[n6, n7])?;
    let tip = chain(&mut g, n8, 3)?;
    Ok((g, tip))
}

/// Five-wide mesh, four layers deep, each node citing its neighbours.
///
/// The last column repeats a parent (`[o4, o5, o5]`) on purpose.
fn ongoing() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let mut layer = Vec::with_capacity(5);
    for _ in 0..5 {
        layer.push(g.create_node(&[genesis])?);
    }
    for _ in 0..4 {
        let p = layer.clone();
        layer = vec![
            g.create_node(&[p[0], p[1]])?,
            g.create_node(&[p[0], p[1], p[2]])?,
            g.create_node(&[p[1], p[2], p[3]])?,
            g.create_node(&[p[2], p[3], p[4]])?,
            g.create_node(&[p[3], p[4], p[4]])?,
        ];
    }
    let tip = g.create_node(&layer)?;
    Ok((g, tip))
}

fn impossibility() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let i1 = g.create_node(&[genesis])?;
    let i2 = g.create_node(&[genesis])?;
    let i3 = g.create_node(&[i1])?;
    let i4 = g.create_node(&[i2])?;
    let i5 = g.create_node(&[i3])?;
    let i6 = g.create_node(&[i4, i5])?;
    let i10 = chain(&mut g, i4, 4)?;
    let tip = g.create_node(&[i10, i6])?;
    Ok((g, tip))
}

/// A short and a long chain from genesis that only meet at the tip.
fn abstain() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let short = chain(&mut g, genesis, 5)?;
    let long = chain(&mut g, genesis, 12)?;
    let tip = g.create_node(&[long, short])?;
    Ok((g, tip))
}

/// A side chain that keeps citing an honest chain to borrow its weight.
fn leech() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let mut honest = Vec::with_capacity(12);
    let mut last = genesis;
    for _ in 0..12 {
        last = g.create_node(&[last])?;
        honest.push(last);
    }
    let mut leech = g.create_node(&[genesis])?;
    for &cited in &[honest[1], honest[2], honest[4], honest[6], honest[7], honest[8], honest[10]] {
        leech = g.create_node(&[leech, cited])?;
    }
    let tip = g.create_node(&[leech, honest[11]])?;
    Ok((g, tip))
}

fn low_latency_adversary() -> DagResult<(BlockDag, NodeId)> {
    let mut g = BlockDag::new();
    let genesis = g.create_root();
    let mut early = Vec::with_capacity(5);
    for _ in 0..5 {
        early.push(g.create_node(&[genesis])?);
    }
    let l6 = g.create_node(&[early[4]])?;
    let l7 = g.create_node(&[early[0], early[1], early[2], early[3], l6])?;
    let l9 = chain(&mut g, l6, 2)?;
    let tip = g.create_node(&[l7, l9])?;
    Ok((g, tip))
}
