// OpenHashMap integration suite.
//
// Each test documents the behavior being verified. The core invariants
// exercised:
// - Round-trip: a stored value is returned until removed; afterwards the
//   default return value (DRV) stands in for it.
// - Compute family: a callback result equal to the DRV removes the key.
// - Preconditions: invalid bulk ranges and configs fail before mutating.
// - Strategies: identity and closure strategies replace `Hash + Eq`.
use primmap::{
    FnStrategy, IdentityStrategy, MapError, MapRead, MapWrite, OpenHashMap, TableConfig,
};
use std::sync::Arc;

// Test: put/get/remove round-trip with a non-zero DRV.
// Verifies: absent lookups yield the DRV; contains_key distinguishes a
// stored value equal to the DRV from absence.
#[test]
fn round_trip_with_default_return_value() {
    let mut m: OpenHashMap<i64, i32> = OpenHashMap::new();
    m.set_default_return_value(-1);
    assert_eq!(m.put(7, 70), -1);
    assert_eq!(m.get_or_default(&7), 70);
    assert!(m.contains_key(&7));
    assert_eq!(m.remove_or_default(&7), 70);
    assert_eq!(m.get_or_default(&7), -1);
    assert!(!m.contains_key(&7));

    m.insert(8, -1);
    assert_eq!(m.get_or_default(&8), -1);
    assert!(m.contains_key(&8));
}

// Test: compute family with DRV = 0 on an int-valued map.
// Verifies: merge/compute results of 0 remove rather than insert.
#[test]
fn compute_results_equal_to_drv_remove() {
    let mut m: OpenHashMap<char, i32> = OpenHashMap::new();
    assert_eq!(m.get_or_default(&'x'), 0);
    assert_eq!(m.merge('a', 2, |old, new| old + new), 2);
    assert_eq!(m.merge('a', -2, |old, new| old + new), 0);
    assert!(!m.contains_key(&'a'));
    assert_eq!(m.compute('b', |_, _| 0), 0);
    assert!(!m.contains_key(&'b'));
    assert_eq!(m.compute('b', |_, old| old.copied().unwrap_or(5)), 5);
    assert_eq!(m.compute_if_present(&'b', |_, v| v - 5), 0);
    assert!(m.is_empty());
    assert_eq!(m.compute_if_absent('c', |_| 0), 0);
    assert!(m.is_empty());
}

// Test: replace and conditional operations.
#[test]
fn conditional_updates() {
    let mut m: OpenHashMap<&str, u32> = OpenHashMap::new();
    assert_eq!(m.replace(&"k", 1), None);
    assert!(m.is_empty());
    assert_eq!(m.put_if_absent("k", 1), None);
    assert_eq!(m.put_if_absent("k", 2), Some(1));
    assert!(!m.replace_if(&"k", &2, 3));
    assert!(m.replace_if(&"k", &1, 3));
    assert!(!m.remove_if(&"k", &1));
    assert!(m.contains_value(&3));
    assert!(m.remove_if(&"k", &3));
    assert!(m.is_empty());
}

// Test: bulk insertion bounds.
// Verifies: an out-of-range slice fails and leaves the map unchanged; a
// valid slice inserts exactly that window.
#[test]
fn put_all_validates_before_mutating() {
    let keys = [1u8, 2, 3, 4];
    let values = [10u8, 20, 30, 40];
    let mut m: OpenHashMap<u8, u8> = OpenHashMap::new();
    m.insert(9, 9);
    assert_eq!(
        m.put_all(&keys, &values, 3, 2),
        Err(MapError::OutOfBounds {
            offset: 3,
            len: 2,
            size: 4
        })
    );
    assert_eq!(m.len(), 1);
    m.put_all(&keys, &values, 1, 2).unwrap();
    let mut got: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
    got.sort_unstable();
    assert_eq!(got, vec![(2, 20), (3, 30), (9, 9)]);
    assert!(OpenHashMap::from_arrays(&keys, &values[..3]).is_err());
}

// Test: configuration validation and sizing.
#[test]
fn config_controls_capacity() {
    let m: OpenHashMap<u32, u32> =
        OpenHashMap::with_config(TableConfig::new().initial_capacity(100).load_factor(0.5))
            .unwrap();
    assert!(m.capacity() >= 100);
    assert_eq!(m.load_factor(), 0.5);
    assert_eq!(
        OpenHashMap::<u32, u32>::with_config(TableConfig::new().load_factor(0.0)).err(),
        Some(MapError::InvalidLoadFactor(0.0))
    );
}

// Test: identity strategy.
// Verifies: structurally equal keys from different allocations are
// distinct entries.
#[test]
fn identity_strategy_separates_equal_values() {
    let a = Arc::new("same".to_string());
    let b = Arc::new("same".to_string());
    let mut m = OpenHashMap::<Arc<String>, u8, IdentityStrategy>::with_strategy(IdentityStrategy);
    m.insert(Arc::clone(&a), 1);
    m.insert(Arc::clone(&b), 2);
    assert_eq!(m.len(), 2);
    assert_eq!(m.get(&a), Some(&1));
    assert_eq!(m.get(&Arc::new("same".to_string())), None);
}

// Test: closure strategy defining case-insensitive equivalence.
#[test]
fn closure_strategy_defines_equivalence() {
    let strategy = FnStrategy::new(
        |k: &String| {
            k.bytes()
                .fold(0u64, |h, b| h.wrapping_mul(31) ^ u64::from(b.to_ascii_lowercase()))
        },
        |a: &String, b: &String| a.eq_ignore_ascii_case(b),
    );
    let mut m = OpenHashMap::with_strategy(strategy);
    m.insert("Key".to_string(), 1);
    assert_eq!(m.insert("KEY".to_string(), 2), Some(1));
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"key".to_string()), Some(&2));
}

// Test: the recycling cursor sees every entry once.
#[test]
fn fast_cursor_visits_all_entries() {
    let m: OpenHashMap<u32, u32> = (0..100).map(|k| (k, k * 2)).collect();
    let mut cursor = m.fast_cursor();
    let mut sum = 0;
    while let Some(e) = cursor.advance() {
        assert_eq!(*e.value(), e.key() * 2);
        sum += e.key();
    }
    assert_eq!(sum, (0..100).sum());
}

// Test: copy constructors.
// Verifies: from_map copies entries but not the DRV; Clone copies both.
#[test]
fn copies_and_drv() {
    let mut m: OpenHashMap<u8, u8> = (1..=3).map(|k| (k, k)).collect();
    m.set_default_return_value(42);
    let copied = OpenHashMap::from_map(&m);
    assert_eq!(copied, m);
    assert_eq!(*copied.default_return_value(), 0);
    assert_eq!(*m.clone().default_return_value(), 42);
}
