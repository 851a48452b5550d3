use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jute_dag::{BlockDag, NodeId};

/// `layers` rounds of five-wide merges, each node citing the whole previous layer.
fn fan_in(layers: usize) -> (BlockDag, NodeId) {
    let mut dag = BlockDag::new();
    let mut layer: Vec<NodeId> = (0..5).map(|_| dag.create_root()).collect();
    for _ in 0..layers {
        let prev = layer.clone();
        layer = (0..5).map(|_| dag.create_node(&prev).unwrap()).collect();
    }
    let tip = dag.create_node(&layer).unwrap();
    (dag, tip)
}

fn chain(len: usize) -> (BlockDag, NodeId) {
    let mut dag = BlockDag::new();
    let mut tip = dag.create_root();
    for _ in 0..len {
        tip = dag.create_node(&[tip]).unwrap();
    }
    (dag, tip)
}

fn bench_ordering(c: &mut Criterion) {
    let (wide, wide_tip) = fan_in(100);
    c.bench_function("linear_order fan_in_100", |b| {
        b.iter(|| wide.linear_order(black_box(wide_tip)).unwrap())
    });
    c.bench_function("compute_votes fan_in_100", |b| {
        b.iter(|| wide.compute_votes(black_box(wide_tip)).unwrap())
    });

    let (long, long_tip) = chain(2_000);
    c.bench_function("linear_order chain_2000", |b| {
        b.iter(|| long.linear_order(black_box(long_tip)).unwrap())
    });
}

criterion_group!(benches, bench_ordering);
criterion_main!(benches);
