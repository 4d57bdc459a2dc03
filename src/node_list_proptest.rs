#![cfg(test)]

// Property tests for NodeList kept inside the crate so they can exercise
// the orchestrator against a plain model without feature gates.

use crate::node::SearchNode;
use crate::node_list::NodeList;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct Node {
    key: u32,
    total: i32,
}

impl SearchNode for Node {
    type Key = u32;
    type Cost = i32;
    fn key(&self) -> &u32 {
        &self.key
    }
    fn total_cost(&self) -> i32 {
        self.total
    }
}

// Pool-indexed operations so shrinking reduces to earlier keys and shorter
// op lists. Costs are i8 to make equal-cost collisions common.
#[derive(Clone, Debug)]
enum Op {
    Open(usize, i8),
    PopBest,
    CloseBest,
    Reinsert(usize, i8),
    Discard,
    Lookups(usize),
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1usize..=8).prop_flat_map(|keys| {
        let idx = 0..keys;
        let op = prop_oneof![
            (idx.clone(), any::<i8>()).prop_map(|(k, c)| Op::Open(k, c)),
            Just(Op::PopBest),
            Just(Op::CloseBest),
            (idx.clone(), any::<i8>()).prop_map(|(k, c)| Op::Reinsert(k, c)),
            Just(Op::Discard),
            idx.prop_map(Op::Lookups),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (keys, ops))
    })
}

// Property: state-machine equivalence against a flat model of the open and
// closed sets. Invariants exercised across random operation sequences:
// - A key is never in both the open and the closed set.
// - `pop_best_open` returns a node of minimum cost among open nodes.
// - `open_count`/`closed_count` track the model after every operation.
// - `total_count` grows by exactly one per staged allocation and never
//   shrinks (no node is ever silently dropped from the arena).
// - Staging reuse: two `create_new_node` calls without a commit return the
//   same handle.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((keys, ops) in arb_scenario()) {
        let mut sut: NodeList<Node> = NodeList::new();
        let mut open: HashMap<u32, i32> = HashMap::new();
        let mut closed: HashSet<u32> = HashSet::new();
        let mut expected_total = 0usize;

        for op in ops {
            match op {
                Op::Open(k, c) => {
                    let key = k as u32;
                    if open.contains_key(&key) || closed.contains(&key) {
                        // Committing a duplicate is a contract violation;
                        // the driver checks membership first, and so do we.
                        continue;
                    }
                    let h = sut.create_new_node().unwrap();
                    let again = sut.create_new_node().unwrap();
                    prop_assert_eq!(h, again, "staging slot must be reused");
                    expected_total += 1;
                    let n = sut.node_mut(h);
                    n.key = key;
                    n.total = c as i32;
                    sut.insert_open(h);
                    open.insert(key, c as i32);
                }
                Op::PopBest => {
                    match sut.pop_best_open() {
                        Some(h) => {
                            let node = sut.node(h);
                            let min = open.values().min().copied().expect("model has open nodes");
                            prop_assert_eq!(node.total, min, "popped node must be minimal");
                            prop_assert!(open.remove(&node.key).is_some());
                            // Popped and never closed: the key is simply gone
                            // from both sets until re-opened.
                        }
                        None => prop_assert!(open.is_empty()),
                    }
                }
                Op::CloseBest => {
                    if let Some(h) = sut.pop_best_open() {
                        let (key, total) = {
                            let node = sut.node(h);
                            (node.key, node.total)
                        };
                        let min = open.values().min().copied().expect("model has open nodes");
                        prop_assert_eq!(total, min);
                        prop_assert!(open.remove(&key).is_some());
                        sut.insert_closed(h);
                        prop_assert!(closed.insert(key));
                    } else {
                        prop_assert!(open.is_empty());
                    }
                }
                Op::Reinsert(k, c) => {
                    let key = k as u32;
                    if !open.contains_key(&key) {
                        continue;
                    }
                    let h = sut.pop_open(&key);
                    sut.node_mut(h).total = c as i32;
                    sut.insert_open(h);
                    open.insert(key, c as i32);
                }
                Op::Discard => {
                    let h = sut.create_new_node().unwrap();
                    prop_assert_eq!(sut.create_new_node().unwrap(), h);
                    expected_total += 1;
                    sut.found_best_node(h);
                    let fresh = sut.create_new_node().unwrap();
                    prop_assert_ne!(fresh, h, "detached node must not be handed out again");
                    // Leave `fresh` staged and immediately detach it so the
                    // next Open allocates cleanly.
                    expected_total += 1;
                    sut.found_best_node(fresh);
                }
                Op::Lookups(k) => {
                    let key = k as u32;
                    prop_assert_eq!(sut.find_open(&key).is_some(), open.contains_key(&key));
                    prop_assert_eq!(sut.find_closed(&key).is_some(), closed.contains(&key));
                }
            }

            // Post-conditions after each op.
            for key in open.keys() {
                prop_assert!(!closed.contains(key), "key in both open and closed");
            }
            prop_assert_eq!(sut.open_count(), open.len());
            prop_assert_eq!(sut.closed_count(), closed.len());
            prop_assert_eq!(sut.total_count(), expected_total);
            if let Some(best) = sut.get_best_open() {
                let min = open.values().min().copied().unwrap();
                prop_assert_eq!(sut.node(best).total, min);
            } else {
                prop_assert!(open.is_empty());
            }
        }

        // Drain: remaining open nodes must come out in ascending cost order.
        let mut last = i32::MIN;
        while let Some(h) = sut.pop_best_open() {
            let node = sut.node(h);
            prop_assert!(node.total >= last);
            last = node.total;
            prop_assert!(open.remove(&node.key).is_some());
        }
        prop_assert!(open.is_empty());
        prop_assert_eq!(sut.open_count(), 0);
    }
}
