#![cfg(test)]

// Property tests for TreeMap. Both balancing schemes run the same operation
// sequences against std's BTreeMap and must keep their balance invariant
// after every step.

use crate::tree::{Avl, Balance, RedBlack, TreeMap};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Clone, Debug)]
enum Op {
    Insert(i16, u8),
    Remove(i16),
    PopFirst,
    PopLast,
    Navigate(i16),
    Window(i16, bool, i16, bool),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let key = -64i16..64;
    prop_oneof![
        5 => (key.clone(), any::<u8>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => key.clone().prop_map(Op::Remove),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
        2 => key.clone().prop_map(Op::Navigate),
        2 => (key.clone(), any::<bool>(), key, any::<bool>())
            .prop_map(|(a, ai, b, bi)| Op::Window(a, ai, b, bi)),
    ]
}

fn bound(k: i16, inclusive: bool) -> Bound<i16> {
    if inclusive {
        Bound::Included(k)
    } else {
        Bound::Excluded(k)
    }
}

fn run<B: Balance>(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut: TreeMap<i16, u8, B> = TreeMap::new();
    let mut model: BTreeMap<i16, u8> = BTreeMap::new();
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::PopFirst => {
                prop_assert_eq!(sut.pop_first(), model.pop_first());
            }
            Op::PopLast => {
                prop_assert_eq!(sut.pop_last(), model.pop_last());
            }
            Op::Navigate(k) => {
                let below = model.range(..k).next_back().map(|e| e.0);
                let at_or_below = model.range(..=k).next_back().map(|e| e.0);
                let at_or_above = model.range(k..).next().map(|e| e.0);
                let above = model
                    .range((Bound::Excluded(k), Bound::Unbounded))
                    .next()
                    .map(|e| e.0);
                prop_assert_eq!(sut.lower_key(&k), below);
                prop_assert_eq!(sut.floor_key(&k), at_or_below);
                prop_assert_eq!(sut.ceiling_key(&k), at_or_above);
                prop_assert_eq!(sut.higher_key(&k), above);
            }
            Op::Window(a, ai, b, bi) => {
                let view = sut.sub_map(a, ai, b, bi);
                // BTreeMap::range panics on inverted or empty-exclusive
                // ranges; those windows are empty here.
                let expected: Vec<i16> = if a < b || (a == b && ai && bi) {
                    model.range((bound(a, ai), bound(b, bi))).map(|e| *e.0).collect()
                } else {
                    Vec::new()
                };
                let got: Vec<i16> = view.keys().copied().collect();
                prop_assert_eq!(&got, &expected);
                prop_assert_eq!(view.len(), expected.len());
                prop_assert_eq!(view.first_key(), expected.first());
                prop_assert_eq!(view.last_key(), expected.last());
                let mut back: Vec<i16> = view.descending_keys().copied().collect();
                back.reverse();
                prop_assert_eq!(back, expected);
            }
        }
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
    }
    prop_assert!(sut.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));
    Ok(())
}

// Property: both balancing schemes behave as an ordered map identical to
// BTreeMap (including navigation and windowed views) while keeping their
// balance invariants after every mutation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_red_black_matches_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        run::<RedBlack>(ops)?;
    }

    #[test]
    fn prop_avl_matches_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        run::<Avl>(ops)?;
    }
}
