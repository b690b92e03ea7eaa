// View layer integration suite.
//
// The core invariants exercised:
// - Unmodifiable: every mutator fails with `Unsupported` and the backing
//   map is byte-for-byte unchanged, checked by snapshotting before and after.
// - Synchronized: one lock serializes all clones and callers sharing it.
use primmap::{
    ArrayMap, LinkedHashMap, MapError, MapRead, MapWrite, OpenHashMap, RbTreeMap, Synchronized,
    Unmodifiable,
};
use std::sync::Arc;
use std::thread;

fn snapshot<M: MapRead<Key = u32, Value = u32>>(m: &M) -> Vec<(u32, u32)> {
    let mut v: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
    v.sort_unstable();
    v
}

// Test: failed mutators leave every engine untouched.
// Assumes: the same wrapper works over any `MapRead` engine.
#[test]
fn unmodifiable_is_idempotent_over_every_engine() {
    fn check<M: MapRead<Key = u32, Value = u32>>(m: &M) {
        let before = snapshot(m);
        let mut view = Unmodifiable::new(m);
        assert!(matches!(
            view.insert(100, 1),
            Err(MapError::Unsupported { op: "insert" })
        ));
        assert!(view.remove(&1).is_err());
        assert!(view.clear().is_err());
        assert!(view.merge(1, 1, |a, b| a + b).is_err());
        assert!(view.put_all(&[5], &[5], 0, 1).is_err());
        assert_eq!(view.len(), before.len());
        assert_eq!(snapshot(m), before);
    }
    let entries = || (0..20u32).map(|k| (k, k + 1));
    check(&entries().collect::<OpenHashMap<_, _>>());
    check(&entries().collect::<LinkedHashMap<_, _>>());
    check(&entries().collect::<RbTreeMap<_, _>>());
    check(&entries().collect::<ArrayMap<_, _>>());
}

// Test: the error message names the rejected operation.
#[test]
fn unsupported_error_message() {
    let m: OpenHashMap<u32, u32> = OpenHashMap::new();
    let err = m.unmodifiable().set_default_return_value(1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported operation on unmodifiable view: set_default_return_value"
    );
}

// Test: a caller-visible lock makes multi-step sequences atomic.
// Verifies: a transfer between two keys never exposes a half-done state to
// concurrent readers that take the same lock.
#[test]
fn synchronized_multi_step_sequences() {
    let map = Synchronized::new(RbTreeMap::<u32, u32>::new());
    map.insert(0, 1_000);
    map.insert(1, 0);
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let map = map.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    map.with_lock(|m| {
                        m.compute_if_present(&0, |_, v| v - 1);
                        m.merge(1, 1, |a, b| a + b);
                    });
                }
            })
        })
        .collect();
    let reader = {
        let map = map.clone();
        thread::spawn(move || {
            for _ in 0..500 {
                let total = map.with_lock(|m| m.get_or_default(&0) + m.get_or_default(&1));
                assert_eq!(total, 1_000);
            }
        })
    };
    for w in writers {
        w.join().unwrap();
    }
    reader.join().unwrap();
    assert_eq!(map.get(&0), None);
    assert_eq!(map.get(&1), Some(1_000));
}

// Test: wrapping an existing shared lock.
#[test]
fn synchronized_over_shared_mutex() {
    let lock = Arc::new(parking_lot::Mutex::new(LinkedHashMap::<&str, u8>::new()));
    let a = Synchronized::with_mutex(Arc::clone(&lock));
    let b = a.clone();
    a.insert("x", 1);
    b.insert("y", 2);
    assert_eq!(lock.lock().keys().copied().collect::<Vec<_>>(), vec!["x", "y"]);
    assert!(Arc::ptr_eq(a.mutex(), &lock));
}
