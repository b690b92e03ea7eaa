#![cfg(test)]

// Property tests for the hash engines kept inside the crate so they can
// check table internals (probe reachability, link integrity) after every
// operation.

use crate::hash_map::OpenHashMap;
use crate::linked_hash_map::LinkedHashMap;
use crate::map::{MapRead, MapWrite};
use crate::strategy::{FnStrategy, HashStrategy};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, i32),
    Remove(u16),
    Get(u16),
    Merge(u16, i32),
    Retain(i32),
    Trim,
}

fn arb_op() -> impl Strategy<Value = Op> {
    // A small key range keeps collisions and repeated keys frequent.
    let key = 0u16..48;
    prop_oneof![
        4 => (key.clone(), -50i32..50).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        2 => key.clone().prop_map(Op::Get),
        2 => (key, -3i32..3).prop_map(|(k, d)| Op::Merge(k, d)),
        1 => (-50i32..50).prop_map(Op::Retain),
        1 => Just(Op::Trim),
    ]
}

type WeakStrategy = FnStrategy<fn(&u16) -> u64, fn(&u16, &u16) -> bool>;

// Four hash values for 48 keys: long collision runs on every table size.
fn weak_strategy() -> WeakStrategy {
    fn hash(k: &u16) -> u64 {
        u64::from(*k % 4)
    }
    fn eq(a: &u16, b: &u16) -> bool {
        a == b
    }
    FnStrategy::new(hash as fn(&u16) -> u64, eq as fn(&u16, &u16) -> bool)
}

// DRV-aware merge on the model: a zero sum removes the key.
fn model_merge(model: &mut HashMap<u16, i32>, k: u16, d: i32) -> i32 {
    let new = model.get(&k).map_or(d, |old| old + d);
    if new == 0 {
        model.remove(&k);
    } else {
        model.insert(k, new);
    }
    new
}

fn run_open<S: HashStrategy<u16>>(
    mut sut: OpenHashMap<u16, i32, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<u16, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
                prop_assert_eq!(sut.get_or_default(&k), model.get(&k).copied().unwrap_or(0));
            }
            Op::Merge(k, d) => {
                let got = sut.merge(k, d, |old, new| old + new);
                prop_assert_eq!(got, model_merge(&mut model, k, d));
            }
            Op::Retain(t) => {
                sut.retain(|_, v| *v >= t);
                model.retain(|_, v| *v >= t);
            }
            Op::Trim => {
                sut.trim();
            }
        }
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.len() <= sut.capacity(), "load factor exceeded");
    }
    let mut entries: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_unstable();
    let mut expected: Vec<(u16, i32)> = model.into_iter().collect();
    expected.sort_unstable();
    prop_assert_eq!(entries, expected);
    Ok(())
}

// Insertion-order model: re-inserting a present key keeps its position,
// inserting after removal appends.
fn run_linked<S: HashStrategy<u16>>(
    mut sut: LinkedHashMap<u16, i32, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(u16, i32)> = Vec::new();
    for op in ops {
        let pos = |model: &Vec<(u16, i32)>, k: u16| model.iter().position(|e| e.0 == k);
        match op {
            Op::Insert(k, v) => {
                let expected = match pos(&model, k) {
                    Some(i) => Some(std::mem::replace(&mut model[i].1, v)),
                    None => {
                        model.push((k, v));
                        None
                    }
                };
                prop_assert_eq!(sut.insert(k, v), expected);
            }
            Op::Remove(k) => {
                let expected = pos(&model, k).map(|i| model.remove(i).1);
                prop_assert_eq!(sut.remove(&k), expected);
            }
            Op::Get(k) => {
                let expected = pos(&model, k).map(|i| model[i].1);
                prop_assert_eq!(sut.get(&k).copied(), expected);
            }
            Op::Merge(k, d) => {
                let got = sut.merge(k, d, |old, new| old + new);
                let new = match pos(&model, k) {
                    Some(i) => {
                        let new = model[i].1 + d;
                        if new == 0 {
                            model.remove(i);
                        } else {
                            model[i].1 = new;
                        }
                        new
                    }
                    None => {
                        if d != 0 {
                            model.push((k, d));
                        }
                        d
                    }
                };
                prop_assert_eq!(got, new);
            }
            Op::Retain(t) => {
                sut.retain(|_, v| *v >= t);
                model.retain(|e| e.1 >= t);
            }
            Op::Trim => {
                sut.trim();
            }
        }
        sut.assert_invariants();
        let order: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&order, &model);
        let mut back: Vec<(u16, i32)> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
        back.reverse();
        prop_assert_eq!(back, order);
    }
    Ok(())
}

// Access-order model: get_mut and updating inserts move the entry to the
// end; plain get is a pure read.
fn run_linked_access<S: HashStrategy<u16>>(
    sut: LinkedHashMap<u16, i32, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut sut = sut.with_access_order(true);
    let mut model: Vec<(u16, i32)> = Vec::new();
    let pos = |model: &Vec<(u16, i32)>, k: u16| model.iter().position(|e| e.0 == k);
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let expected = pos(&model, k).map(|i| model.remove(i).1);
                model.push((k, v));
                prop_assert_eq!(sut.insert(k, v), expected);
            }
            Op::Remove(k) => {
                let expected = pos(&model, k).map(|i| model.remove(i).1);
                prop_assert_eq!(sut.remove(&k), expected);
            }
            Op::Get(k) => {
                let expected = pos(&model, k).map(|i| model[i].1);
                prop_assert_eq!(sut.get(&k).copied(), expected);
                let before: Vec<u16> = sut.keys().copied().collect();
                prop_assert_eq!(before, model.iter().map(|e| e.0).collect::<Vec<_>>());
                if let Some(i) = pos(&model, k) {
                    let e = model.remove(i);
                    model.push(e);
                }
                prop_assert_eq!(sut.get_mut(&k).map(|v| *v), expected);
            }
            Op::Merge(k, d) => {
                let got = sut.merge(k, d, |old, new| old + new);
                let new = match pos(&model, k) {
                    Some(i) => model.remove(i).1 + d,
                    None => d,
                };
                if new != 0 {
                    model.push((k, new));
                }
                prop_assert_eq!(got, new);
            }
            Op::Retain(t) => {
                sut.retain(|_, v| *v >= t);
                model.retain(|e| e.1 >= t);
            }
            Op::Trim => {
                sut.trim();
            }
        }
        sut.assert_invariants();
        let order: Vec<(u16, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&order, &model);
        let mut back: Vec<(u16, i32)> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
        back.reverse();
        prop_assert_eq!(back, order);
    }
    Ok(())
}

// Property: OpenHashMap matches std's HashMap under random churn, keeps
// every key reachable from its home slot, and never exceeds its load factor.
// Property: LinkedHashMap in insertion order iterates exactly like an
// append-on-first-insert list, forwards and backwards, through resizes and
// backward shifts.
// Property: in access order, every mutable touch moves the entry last while
// reads leave the order alone, across resizes, relocations and retain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_open_map_matches_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        run_open(OpenHashMap::with_capacity(2), ops)?;
    }

    #[test]
    fn prop_open_map_with_collisions(ops in proptest::collection::vec(arb_op(), 1..200)) {
        run_open(OpenHashMap::with_capacity_and_strategy(2, weak_strategy()), ops)?;
    }

    #[test]
    fn prop_linked_map_keeps_insertion_order(ops in proptest::collection::vec(arb_op(), 1..150)) {
        run_linked(LinkedHashMap::with_capacity(2), ops)?;
    }

    #[test]
    fn prop_linked_map_with_collisions(ops in proptest::collection::vec(arb_op(), 1..150)) {
        run_linked(LinkedHashMap::with_capacity_and_strategy(2, weak_strategy()), ops)?;
    }

    #[test]
    fn prop_linked_map_access_order(ops in proptest::collection::vec(arb_op(), 1..150)) {
        run_linked_access(LinkedHashMap::with_capacity(2), ops)?;
    }

    #[test]
    fn prop_linked_map_access_order_with_collisions(ops in proptest::collection::vec(arb_op(), 1..150)) {
        run_linked_access(LinkedHashMap::with_capacity_and_strategy(2, weak_strategy()), ops)?;
    }
}
