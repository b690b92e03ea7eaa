// LinkedHashMap integration suite.
//
// The core invariants exercised:
// - Order preservation: without explicit moves, iteration follows first
//   insertion; re-inserting a removed key appends it.
// - Physical relocation (backward shift, resize) never changes logical order.
// - Access order moves touched entries to the end.
use primmap::{LinkedHashMap, MapWrite};

fn keys(m: &LinkedHashMap<u32, u32>) -> Vec<u32> {
    m.keys().copied().collect()
}

// Test: insertion order under churn large enough to resize several times.
// Verifies: surviving keys iterate in first-insertion order.
#[test]
fn insertion_order_survives_resizes_and_removals() {
    let mut m = LinkedHashMap::with_capacity(2);
    for k in (0..500u32).rev() {
        m.insert(k, k);
    }
    for k in (0..500).filter(|k| k % 3 == 0) {
        m.remove(&k);
    }
    m.insert(3, 3);
    let mut expected: Vec<u32> = (0..500).rev().filter(|k| k % 3 != 0).collect();
    expected.push(3);
    assert_eq!(keys(&m), expected);
    m.trim();
    assert_eq!(keys(&m), expected);
}

// Test: explicit move operations.
#[test]
fn explicit_moves() {
    let mut m: LinkedHashMap<u32, u32> = (1..=4).map(|k| (k, k * 10)).collect();
    assert!(m.move_to_first(&3));
    assert!(!m.move_to_first(&9));
    assert_eq!(keys(&m), vec![3, 1, 2, 4]);
    assert_eq!(m.get_and_move_to_last(&1), Some(&10));
    assert_eq!(keys(&m), vec![3, 2, 4, 1]);
    assert_eq!(m.put_and_move_to_first(4, 44), Some(40));
    assert_eq!(m.put_and_move_to_last(5, 50), None);
    assert_eq!(keys(&m), vec![4, 3, 2, 1, 5]);
    assert_eq!(m.first_entry(), Some((&4, &44)));
    assert_eq!(m.pop_last(), Some((5, 50)));
    assert_eq!(m.pop_first(), Some((4, 44)));
    assert_eq!(m.last_key(), Some(&1));
}

// Test: access-order mode.
// Verifies: get_mut and updating insert promote; get and contains_key are
// pure reads.
#[test]
fn access_order_promotes_on_use() {
    let mut m: LinkedHashMap<u32, u32> = LinkedHashMap::new().with_access_order(true);
    m.extend((1..=4).map(|k| (k, k)));
    assert_eq!(m.get(&1), Some(&1));
    assert_eq!(keys(&m), vec![1, 2, 3, 4]);
    if let Some(v) = m.get_mut(&2) {
        *v += 1;
    }
    assert_eq!(keys(&m), vec![1, 3, 4, 2]);
    m.insert(3, 30);
    assert!(m.contains_key(&4));
    assert_eq!(keys(&m), vec![1, 4, 2, 3]);
}

// Test: LRU-style lookups while walking an access-order map.
// Verifies: the walk visits every entry exactly once, in order.
#[test]
fn lookups_while_iterating_access_order() {
    let mut m: LinkedHashMap<u32, u32> = LinkedHashMap::new().with_access_order(true);
    m.extend((1..=3).map(|k| (k, k)));
    let mut seen = Vec::new();
    for (k, _) in m.iter() {
        if *k == 1 {
            assert_eq!(m.get(&2), Some(&2));
        }
        seen.push(*k);
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

// Test: bidirectional iteration from a key.
#[test]
fn iterate_from_key_both_ways() {
    let m: LinkedHashMap<u32, u32> = [5, 1, 4, 2].into_iter().map(|k| (k, k)).collect();
    let after: Vec<u32> = m.iter_from(&1).unwrap().map(|(k, _)| *k).collect();
    assert_eq!(after, vec![4, 2]);
    let suffix_back: Vec<u32> = m.iter_from(&1).unwrap().rev().map(|(k, _)| *k).collect();
    assert_eq!(suffix_back, vec![2, 4]);
    let back: Vec<u32> = m.iter().rev().map(|(k, _)| *k).collect();
    assert_eq!(back, vec![2, 4, 1, 5]);
    assert!(m.iter_from(&9).is_none());
}

// Test: compute family keeps position on update and appends on insert.
#[test]
fn compute_family_respects_order() {
    let mut m: LinkedHashMap<u32, u32> = (1..=3).map(|k| (k, k)).collect();
    m.merge(1, 5, |a, b| a + b);
    m.compute(9, |_, _| 9);
    m.compute_if_present(&2, |_, _| 0);
    assert_eq!(keys(&m), vec![1, 3, 9]);
    assert_eq!(m.get(&1), Some(&6));
}
