//! Randomized checks of the ordering and voting invariants.
//!
//! Properties verified on arbitrary multi-root DAGs:
//! - the linear order is a permutation of the ancestor set
//! - every edge inside the ancestor set points forward in the order
//! - repeated queries on an unmodified graph agree
//! - repeating a parent in one creation call changes nothing

use std::collections::{BTreeSet, HashMap};

use jute_dag::{BlockDag, NodeId};
use proptest::prelude::*;
use proptest::sample::Index;

/// One creation step: a root, or a node picking parents among existing ids.
#[derive(Clone, Debug)]
enum Step {
    Root,
    Node(Vec<Index>),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Root),
        5 => prop::collection::vec(any::<Index>(), 1..5).prop_map(Step::Node),
    ]
}

fn dag_strategy() -> impl Strategy<Value = (Vec<Step>, Index)> {
    (prop::collection::vec(step_strategy(), 1..48), any::<Index>())
}

/// Replay `steps`; when `repeat_parents` is set every parent list is doubled.
fn build(steps: &[Step], repeat_parents: bool) -> BlockDag {
    let mut dag = BlockDag::new();
    for step in steps {
        match step {
            Step::Node(picks) if !dag.is_empty() => {
                let mut parents: Vec<NodeId> = picks
                    .iter()
                    .map(|pick| NodeId::new(pick.index(dag.len()) as u64))
                    .collect();
                if repeat_parents {
                    parents.extend(parents.clone());
                }
                dag.create_node(&parents).unwrap();
            }
            _ => {
                dag.create_root();
            }
        }
    }
    dag
}

fn tip_of(dag: &BlockDag, pick: &Index) -> NodeId {
    NodeId::new(pick.index(dag.len()) as u64)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn order_is_permutation_of_ancestors((steps, pick) in dag_strategy()) {
        let dag = build(&steps, false);
        let tip = tip_of(&dag, &pick);
        let votes = dag.compute_votes(tip).unwrap();
        let order = dag.linear_order(tip).unwrap();

        prop_assert_eq!(order.len(), votes.ancestors().len());
        let placed: BTreeSet<NodeId> = order.iter().copied().collect();
        prop_assert_eq!(&placed, votes.ancestors());
        prop_assert_eq!(order.last().copied(), Some(tip));
    }

    #[test]
    fn order_is_topological((steps, pick) in dag_strategy()) {
        let dag = build(&steps, false);
        let tip = tip_of(&dag, &pick);
        let votes = dag.compute_votes(tip).unwrap();
        let order = dag.linear_order(tip).unwrap();
        let position: HashMap<NodeId, usize> =
            order.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        for edge in votes.weights().keys() {
            prop_assert!(position[&edge.parent] < position[&edge.child]);
        }
        for edge in dag.edges() {
            let inside = votes.ancestors().contains(&edge.child);
            prop_assert_eq!(inside, votes.weight(edge.parent, edge.child).is_some());
        }
    }

    #[test]
    fn queries_are_deterministic((steps, pick) in dag_strategy()) {
        let dag = build(&steps, false);
        let tip = tip_of(&dag, &pick);
        prop_assert_eq!(dag.compute_votes(tip).unwrap(), dag.compute_votes(tip).unwrap());
        prop_assert_eq!(dag.linear_order(tip).unwrap(), dag.linear_order(tip).unwrap());

        let rebuilt = build(&steps, false);
        prop_assert_eq!(dag.linear_order(tip).unwrap(), rebuilt.linear_order(tip).unwrap());
    }

    #[test]
    fn repeated_parents_are_idempotent((steps, pick) in dag_strategy()) {
        let plain = build(&steps, false);
        let doubled = build(&steps, true);
        let tip = tip_of(&plain, &pick);

        prop_assert_eq!(plain.edges(), doubled.edges());
        prop_assert_eq!(plain.compute_votes(tip).unwrap(), doubled.compute_votes(tip).unwrap());
        prop_assert_eq!(plain.linear_order(tip).unwrap(), doubled.linear_order(tip).unwrap());
        doubled.validate().unwrap();
    }

    #[test]
    fn weights_count_non_tip_dependents((steps, pick) in dag_strategy()) {
        let dag = build(&steps, false);
        let tip = tip_of(&dag, &pick);
        let votes = dag.compute_votes(tip).unwrap();

        for (edge, &weight) in votes.weights() {
            let expected = if edge.child == tip {
                1
            } else {
                votes
                    .ancestors()
                    .iter()
                    .filter(|&&x| x != tip && (x == edge.child || dag.is_ancestor(edge.child, x)))
                    .count() as u64
            };
            prop_assert_eq!(weight, expected);
        }
    }
}
