// TreeMap integration suite.
//
// The core invariants exercised:
// - Ordered contract: navigation queries agree for both balancing schemes.
// - Live windows: sub-map views store bounds, not entries, so later
//   mutations of the backing tree inside the bounds show through.
// - Default min/max values stand in for the open side of head/tail maps.
use primmap::{AvlTreeMap, MapError, MapRead, MapWrite, Natural, RbTreeMap, Reverse, TreeMap};

// Test: the live sub-map scenario on both tree variants.
// Verifies: {1,3,5,7,9} with sub_map(3, true, 7, false) holds {3,5}; a later
// insert of 4 shows up, an insert of 10 does not.
#[test]
fn sub_map_is_a_live_window() {
    let mut rb: RbTreeMap<i32, i32> = RbTreeMap::new();
    for k in [1, 3, 5, 7, 9] {
        rb.insert(k, k);
    }
    let window = |t: &RbTreeMap<i32, i32>| -> Vec<i32> {
        t.sub_map(3, true, 7, false).keys().copied().collect()
    };
    assert_eq!(window(&rb), vec![3, 5]);
    rb.insert(4, 4);
    assert_eq!(window(&rb), vec![3, 4, 5]);
    rb.insert(10, 10);
    assert_eq!(window(&rb), vec![3, 4, 5]);

    let mut avl: AvlTreeMap<i32, i32> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, k)).collect();
    let mut view = avl.sub_map_mut(3, true, 7, false);
    assert_eq!(view.keys().copied().collect::<Vec<_>>(), vec![3, 5]);
    view.backing_mut().insert(4, 4);
    view.backing_mut().insert(10, 10);
    assert_eq!(view.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(view.insert(7, 7), Err(MapError::KeyOutOfRange));
}

// Test: navigation on both variants.
#[test]
fn navigation_agrees_across_variants() {
    let rb: RbTreeMap<u32, ()> = (0..100).step_by(10).map(|k| (k, ())).collect();
    let avl: AvlTreeMap<u32, ()> = AvlTreeMap::from_map(&rb);
    for probe in [0, 5, 10, 55, 90, 95] {
        assert_eq!(rb.lower_key(&probe), avl.lower_key(&probe));
        assert_eq!(rb.floor_key(&probe), avl.floor_key(&probe));
        assert_eq!(rb.ceiling_key(&probe), avl.ceiling_key(&probe));
        assert_eq!(rb.higher_key(&probe), avl.higher_key(&probe));
    }
    assert_eq!(rb.floor_key(&55), Some(&50));
    assert_eq!(rb.ceiling_key(&55), Some(&60));
    assert_eq!(rb.higher_key(&90), None);
    assert_eq!(rb.lower_key(&0), None);
}

// Test: head/tail maps use the configured default bounds.
#[test]
fn head_and_tail_maps() {
    let mut t: RbTreeMap<i32, char> = (0..10).map(|k| (k, 'x')).collect();
    assert_eq!(t.head_map(3, false).len(), 3);
    assert_eq!(t.tail_map(7, true).len(), 3);
    t.set_default_min_value(Some(2));
    t.set_default_max_value(Some(8));
    assert_eq!(t.head_map(3, false).keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(t.tail_map(7, true).keys().copied().collect::<Vec<_>>(), vec![7, 8]);
}

// Test: descending map and key set.
#[test]
fn descending_views() {
    let t: RbTreeMap<i32, i32> = (1..=5).map(|k| (k, k * k)).collect();
    let d = t.descending_map();
    assert_eq!(d.keys().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    assert_eq!(d.first_entry(), Some((&5, &25)));
    assert_eq!(d.higher_key(&3), Some(&2));
    assert_eq!(t.descending_keys().next(), Some(&5));
    assert_eq!(d.head_map(3, true).keys().copied().collect::<Vec<_>>(), vec![5, 4, 3]);
}

// Test: views through the engine traits.
// Verifies: a view answers absent keys with the backing DRV.
#[test]
fn views_read_through_traits() {
    let mut t: RbTreeMap<i32, i32> = (1..=5).map(|k| (k, k)).collect();
    t.set_default_return_value(-1);
    let v = t.sub_map(2, true, 4, true);
    assert_eq!(v.get_or_default(&5), -1);
    assert_eq!(v.get_or_default(&3), 3);
    assert_eq!(MapRead::len(&v), 3);
}

// Test: a comparator that reverses the natural order.
#[test]
fn custom_comparator() {
    let mut t: TreeMap<&str, u8, primmap::RedBlack, Reverse<Natural>> =
        TreeMap::with_comparator(Reverse(Natural));
    t.extend([("a", 1), ("c", 3), ("b", 2)]);
    assert_eq!(t.first_key(), Some(&"c"));
    assert_eq!(t.floor_key(&"bb"), Some(&"c"));
    assert_eq!(t.pop_last(), Some(("a", 1)));
}

// Test: compute family and bulk helpers on the tree.
#[test]
fn compute_and_bulk() {
    let mut t: AvlTreeMap<u8, i32> = AvlTreeMap::new();
    t.put_all(&[1, 2, 3], &[10, 20, 30], 0, 3).unwrap();
    assert_eq!(t.merge(1, -10, |a, b| a + b), 0);
    assert!(!t.contains_key(&1));
    assert_eq!(t.compute_if_absent(4, |k| i32::from(*k)), 4);
    assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
}
