//! ConcurrentHashMap: a power-of-two number of `OpenHashMap` shards, each
//! behind its own `parking_lot::RwLock`.
//!
//! A key's shard comes from a secondary mix of its strategy hash, so shard
//! choice is independent of the slot choice inside the shard. Operations on
//! different shards run in parallel; readers of one shard share its lock.
//!
//! Consistency
//! - Single-key operations are atomic with respect to their shard.
//! - `len`, `for_each`, `snapshot` and `clear` visit shards one at a time;
//!   each shard is seen consistently, the whole map is not.
//! - `put_all` validates the arrays up front, then inserts key by key.
//!
//! Compute-family callbacks run under the owning shard's write lock and
//! nothing else. A callback that reaches back into that same shard would
//! deadlock; debug builds detect it and panic (see `reentrancy`).

use crate::config::ConcurrentConfig;
use crate::error::MapError;
use crate::hash_map::OpenHashMap;
use crate::map::MapWrite;
use crate::reentrancy;
use crate::strategy::{shard_spread, DefaultStrategy, HashStrategy};
use core::fmt;
use core::hash::Hash;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct ConcurrentHashMap<K, V, S = DefaultStrategy> {
    shards: Box<[RwLock<OpenHashMap<K, V, S>>]>,
    shard_mask: usize,
    strategy: S,
    drv: V,
}

impl<K, V> ConcurrentHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    /// Map with `4 * available_parallelism` shards (rounded up to a power
    /// of two) and default table sizing.
    pub fn new() -> Self {
        Self::with_config(ConcurrentConfig::default())
            .expect("default concurrent configuration is valid")
    }

    pub fn with_shards(shards: usize) -> Result<Self, MapError> {
        Self::with_config(ConcurrentConfig::new().shards(shards))
    }

    pub fn with_config(cfg: ConcurrentConfig) -> Result<Self, MapError> {
        Self::with_config_and_strategy(cfg, DefaultStrategy::default())
    }
}

impl<K, V> Default for ConcurrentHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ConcurrentHashMap<K, V, S>
where
    S: HashStrategy<K> + Clone,
{
    pub fn with_config_and_strategy(cfg: ConcurrentConfig, strategy: S) -> Result<Self, MapError>
    where
        V: Default,
    {
        cfg.validate()?;
        let shards = (0..cfg.shards)
            .map(|_| {
                OpenHashMap::with_config_and_strategy(cfg.table, strategy.clone()).map(RwLock::new)
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();
        log::debug!(
            "concurrent map: {} shards, {} entries each before resize",
            cfg.shards,
            shards[0].read().capacity()
        );
        Ok(Self {
            shards,
            shard_mask: cfg.shards - 1,
            strategy,
            drv: V::default(),
        })
    }

    #[inline]
    fn shard_index(&self, key: &K) -> usize {
        shard_spread(self.strategy.hash(key)) as usize & self.shard_mask
    }

    #[inline]
    fn shard_addr(&self, i: usize) -> usize {
        &self.shards[i] as *const RwLock<OpenHashMap<K, V, S>> as usize
    }

    fn read(&self, i: usize) -> RwLockReadGuard<'_, OpenHashMap<K, V, S>> {
        debug_assert!(
            !reentrancy::is_held(self.shard_addr(i)),
            "reentrancy detected: callback read the shard it runs under"
        );
        self.shards[i].read()
    }

    fn write(&self, i: usize) -> RwLockWriteGuard<'_, OpenHashMap<K, V, S>> {
        debug_assert!(
            !reentrancy::is_held(self.shard_addr(i)),
            "reentrancy detected: callback wrote the shard it runs under"
        );
        self.shards[i].write()
    }

    /// Runs `op` on shard `i` under its write lock with the re-entry guard
    /// armed.
    fn with_callback<R>(&self, i: usize, op: impl FnOnce(&mut OpenHashMap<K, V, S>) -> R) -> R {
        let mut shard = self.write(i);
        let _guard = reentrancy::enter(self.shard_addr(i));
        op(&mut shard)
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Sum of shard sizes, each read under its own lock.
    pub fn len(&self) -> usize {
        (0..self.shards.len()).map(|i| self.read(i).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        (0..self.shards.len()).all(|i| self.read(i).is_empty())
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.read(self.shard_index(key)).get(key).cloned()
    }

    /// The stored value, or the DRV when `key` is absent.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone,
    {
        self.get(key).unwrap_or_else(|| self.drv.clone())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.read(self.shard_index(key)).contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        (0..self.shards.len()).any(|i| self.read(i).values().any(|v| v == value))
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let i = self.shard_index(&key);
        self.write(i).insert(key, value)
    }

    /// `insert` returning the previous value or the DRV.
    pub fn put(&self, key: K, value: V) -> V
    where
        V: Clone,
    {
        self.insert(key, value).unwrap_or_else(|| self.drv.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.write(self.shard_index(key)).remove(key)
    }

    pub fn remove_or_default(&self, key: &K) -> V
    where
        V: Clone,
    {
        self.remove(key).unwrap_or_else(|| self.drv.clone())
    }

    pub fn put_if_absent(&self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        let i = self.shard_index(&key);
        self.write(i).put_if_absent(key, value)
    }

    pub fn replace(&self, key: &K, value: V) -> Option<V> {
        self.write(self.shard_index(key)).replace(key, value)
    }

    pub fn replace_if(&self, key: &K, old: &V, new: V) -> bool
    where
        V: PartialEq,
    {
        self.write(self.shard_index(key)).replace_if(key, old, new)
    }

    pub fn remove_if(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.write(self.shard_index(key)).remove_if(key, value)
    }

    pub fn compute_if_absent<F>(&self, key: K, f: F) -> V
    where
        V: Clone + PartialEq,
        F: FnOnce(&K) -> V,
    {
        let i = self.shard_index(&key);
        self.with_callback(i, |shard| shard.compute_if_absent(key, f))
    }

    pub fn compute_if_present<F>(&self, key: &K, f: F) -> V
    where
        V: Clone + PartialEq,
        F: FnOnce(&K, &V) -> V,
    {
        self.with_callback(self.shard_index(key), |shard| shard.compute_if_present(key, f))
    }

    pub fn compute<F>(&self, key: K, f: F) -> V
    where
        V: Clone + PartialEq,
        F: FnOnce(&K, Option<&V>) -> V,
    {
        let i = self.shard_index(&key);
        self.with_callback(i, |shard| shard.compute(key, f))
    }

    pub fn merge<F>(&self, key: K, value: V, f: F) -> V
    where
        V: Clone + PartialEq,
        F: FnOnce(&V, V) -> V,
    {
        let i = self.shard_index(&key);
        self.with_callback(i, |shard| shard.merge(key, value, f))
    }

    /// Inserts `keys[offset..offset + len]` with the matching values. The
    /// range is checked first; the inserts are individually atomic only.
    pub fn put_all(&self, keys: &[K], values: &[V], offset: usize, len: usize) -> Result<(), MapError>
    where
        K: Clone,
        V: Clone,
    {
        MapError::check_bulk(keys.len(), values.len(), offset, len)?;
        for (k, v) in keys[offset..offset + len]
            .iter()
            .zip(&values[offset..offset + len])
        {
            self.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    /// Empties every shard in turn.
    pub fn clear(&self) {
        for i in 0..self.shards.len() {
            self.write(i).clear();
        }
    }

    /// Visits every entry, holding one shard's read lock at a time. `f` may
    /// use other shards but must not access the shard being visited, not even
    /// to read it; debug builds panic when it does.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for i in 0..self.shards.len() {
            let shard = self.read(i);
            let _guard = reentrancy::enter(self.shard_addr(i));
            for (k, v) in shard.iter() {
                f(k, v);
            }
        }
    }

    /// Copies all entries into a single-threaded map.
    pub fn snapshot(&self) -> OpenHashMap<K, V, S>
    where
        K: Clone,
        V: Clone + Default,
    {
        let mut out = OpenHashMap::with_capacity_and_strategy(self.len(), self.strategy.clone());
        for i in 0..self.shards.len() {
            let shard = self.read(i);
            for (k, v) in shard.iter() {
                out.insert(k.clone(), v.clone());
            }
        }
        out.set_default_return_value(self.drv.clone());
        out
    }

    pub fn default_return_value(&self) -> &V {
        &self.drv
    }

    /// Sets the DRV of the map and of every shard. Requires exclusive access
    /// so that no compute call observes a half-updated DRV.
    pub fn set_default_return_value(&mut self, value: V)
    where
        V: Clone,
    {
        for shard in self.shards.iter_mut() {
            shard.get_mut().set_default_return_value(value.clone());
        }
        self.drv = value;
    }
}

impl<K, V, S> fmt::Debug for ConcurrentHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: HashStrategy<K> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for shard in self.shards.iter() {
            m.entries(shard.read().iter());
        }
        m.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn small() -> ConcurrentHashMap<u64, u64> {
        ConcurrentHashMap::with_shards(4).unwrap()
    }

    #[test]
    fn shard_count_must_be_power_of_two() {
        assert_eq!(
            ConcurrentHashMap::<u8, u8>::with_shards(3).err(),
            Some(MapError::InvalidShardCount(3))
        );
        assert_eq!(
            ConcurrentHashMap::<u8, u8>::with_shards(0).err(),
            Some(MapError::InvalidShardCount(0))
        );
        assert_eq!(small().shard_count(), 4);
        assert!(ConcurrentHashMap::<u8, u8>::new().shard_count().is_power_of_two());
    }

    #[test]
    fn single_key_operations() {
        let m = small();
        assert_eq!(m.insert(1, 10), None);
        assert_eq!(m.put(1, 11), 10);
        assert_eq!(m.get(&1), Some(11));
        assert_eq!(m.get_or_default(&2), 0);
        assert_eq!(m.put_if_absent(1, 99), Some(11));
        assert_eq!(m.put_if_absent(2, 20), None);
        assert_eq!(m.replace(&3, 30), None);
        assert!(!m.contains_key(&3));
        assert!(m.replace_if(&2, &20, 21));
        assert!(!m.replace_if(&2, &20, 22));
        assert!(m.contains_value(&21));
        assert!(!m.remove_if(&2, &20));
        assert_eq!(m.remove_or_default(&9), 0);
        assert_eq!(m.remove(&2), Some(21));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: compute-family results equal to the DRV remove the key.
    #[test]
    fn compute_family_honours_drv() {
        let mut m = small();
        m.set_default_return_value(u64::MAX);
        assert_eq!(m.get_or_default(&5), u64::MAX);
        assert_eq!(m.compute_if_absent(5, |k| k * 2), 10);
        assert_eq!(m.compute_if_absent(5, |_| 0), 10);
        assert_eq!(m.compute_if_present(&5, |_, v| v + 1), 11);
        assert_eq!(m.compute_if_present(&6, |_, _| 1), u64::MAX);
        assert_eq!(m.merge(5, 4, |old, new| old + new), 15);
        assert_eq!(m.compute(5, |_, _| u64::MAX), u64::MAX);
        assert!(!m.contains_key(&5));
        assert_eq!(m.compute(7, |_, old| old.map_or(1, |v| v + 1)), 1);
        assert_eq!(m.merge(7, 0, |_, _| u64::MAX), u64::MAX);
        assert!(m.is_empty());
    }

    /// Invariant: callbacks may use other shards, never their own.
    #[cfg(debug_assertions)]
    #[test]
    fn callback_reentering_its_shard_panics() {
        let m = small();
        m.insert(1, 1);
        let other = (2..1000u64)
            .find(|k| m.shard_index(k) != m.shard_index(&1))
            .unwrap();
        m.insert(other, 5);
        let seen = m.compute_if_present(&1, |_, v| v + m.get(&other).unwrap_or(0));
        assert_eq!(seen, 6);

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.compute(1, |_, _| m.get(&1).unwrap_or(0))
        }));
        assert!(res.is_err());
        // The lock and the guard were released while unwinding.
        assert_eq!(m.get(&1), Some(6));
    }

    /// Invariant: a `for_each` visitor may read other shards; touching the
    /// shard being visited panics in debug builds, and the read lock is
    /// released while unwinding.
    #[cfg(debug_assertions)]
    #[test]
    fn for_each_visitor_must_leave_its_shard_alone() {
        let m = small();
        m.insert(1, 1);
        let other = (2..1000u64)
            .find(|k| m.shard_index(k) != m.shard_index(&1))
            .unwrap();
        m.insert(other, 5);
        let mut cross = 0;
        m.for_each(|k, _| {
            let peer = if *k == 1 { other } else { 1 };
            cross += m.get(&peer).unwrap_or(0);
        });
        assert_eq!(cross, 6);

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.for_each(|k, _| {
                m.get(k);
            })
        }));
        assert!(res.is_err());
        m.insert(1, 2);
        assert_eq!(m.get(&1), Some(2));
    }

    /// Invariant: threads inserting disjoint ranges lose no updates.
    #[test]
    fn disjoint_parallel_inserts() {
        let m = Arc::new(small());
        let threads: Vec<_> = (0..8u64)
            .map(|t| {
                let m = Arc::clone(&m);
                std::thread::spawn(move || {
                    for k in t * 1000..(t + 1) * 1000 {
                        m.insert(k, k + 1);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(m.len(), 8000);
        let snap = m.snapshot();
        assert_eq!(snap.len(), 8000);
        assert!((0..8000).all(|k| snap.get(&k) == Some(&(k + 1))));
    }

    #[test]
    fn bulk_for_each_and_clear() {
        let m = small();
        let keys: Vec<u64> = (0..10).collect();
        let values: Vec<u64> = (100..110).collect();
        assert!(m.put_all(&keys, &values, 8, 5).is_err());
        assert!(m.is_empty());
        m.put_all(&keys, &values, 2, 5).unwrap();
        let mut sum = 0;
        m.for_each(|_, v| sum += v);
        assert_eq!(sum, 102 + 103 + 104 + 105 + 106);
        assert_eq!(format!("{:?}", ConcurrentHashMap::<u8, u8>::with_shards(1).unwrap()), "{}");
        m.clear();
        assert_eq!(m.len(), 0);
    }
}
