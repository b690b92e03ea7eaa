//! OpenHashMap: open-addressing hash map with linear probing and
//! backward-shift deletion, generic over a `HashStrategy`.

use crate::config::{TableConfig, DEFAULT_INITIAL_CAPACITY};
use crate::error::MapError;
use crate::map::{check_arrays, MapRead, MapWrite};
use crate::raw_table::{Bucket, RawTable};
use crate::strategy::{DefaultStrategy, HashStrategy};
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;

pub struct OpenHashMap<K, V, S = DefaultStrategy> {
    table: RawTable<K, V, S>,
    drv: V,
}

impl<K, V> OpenHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Map able to hold `capacity` entries before resizing.
    ///
    /// # Panics
    /// Panics if the table length overflows `usize`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity, DefaultStrategy::default())
    }

    pub fn with_config(cfg: TableConfig) -> Result<Self, MapError> {
        Self::with_config_and_strategy(cfg, DefaultStrategy::default())
    }

    /// Builds a map from parallel key/value arrays. Later duplicates win.
    pub fn from_arrays(keys: &[K], values: &[V]) -> Result<Self, MapError>
    where
        K: Clone,
        V: Clone,
    {
        check_arrays(keys, values)?;
        let mut map = Self::with_capacity(keys.len());
        for (k, v) in keys.iter().zip(values) {
            map.insert(k.clone(), v.clone());
        }
        Ok(map)
    }

    /// Copies the entries of any map. The default return value is not copied.
    pub fn from_map<M>(other: &M) -> Self
    where
        M: MapRead<Key = K, Value = V>,
        K: Clone,
        V: Clone,
    {
        let mut map = Self::with_capacity(other.len());
        map.put_all_from(other);
        map
    }
}

impl<K, V> Default for OpenHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    pub fn with_strategy(strategy: S) -> Self
    where
        V: Default,
    {
        Self::with_capacity_and_strategy(DEFAULT_INITIAL_CAPACITY, strategy)
    }

    pub fn with_capacity_and_strategy(capacity: usize, strategy: S) -> Self
    where
        V: Default,
    {
        Self {
            table: RawTable::with_capacity(capacity, strategy),
            drv: V::default(),
        }
    }

    pub fn with_config_and_strategy(cfg: TableConfig, strategy: S) -> Result<Self, MapError>
    where
        V: Default,
    {
        Ok(Self {
            table: RawTable::with_config(cfg, strategy)?,
            drv: V::default(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Entries the map holds before its next resize.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn strategy(&self) -> &S {
        self.table.strategy()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.table.make_hash(key);
        let i = self.table.find(hash, key)?;
        self.table.bucket(i).map(|b| &b.value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let hash = self.table.make_hash(key);
        let i = self.table.find(hash, key)?;
        self.table.bucket(i).map(|b| (&b.key, &b.value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.table.make_hash(key);
        let i = self.table.find(hash, key)?;
        self.table.bucket_mut(i).map(|b| &mut b.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let hash = self.table.make_hash(key);
        self.table.find(hash, key).is_some()
    }

    /// Stores `value` under `key`, returning the value it replaced.
    /// The stored key is kept when `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.table.make_hash(&key);
        match self.table.find_slot(hash, &key) {
            Ok(i) => self
                .table
                .bucket_mut(i)
                .map(|b| core::mem::replace(&mut b.value, value)),
            Err(i) => {
                self.table.insert_vacant(i, hash, key, value);
                if self.table.needs_grow() {
                    self.table.grow(|_, _| {});
                }
                None
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.table.make_hash(key);
        let i = self.table.find(hash, key)?;
        let b = self.table.take(i, |_, _| {})?;
        self.table.maybe_shrink(|_, _| {});
        Some((b.key, b.value))
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the table to the smallest length that holds the current
    /// entries. Returns whether the table was rebuilt.
    pub fn trim(&mut self) -> bool {
        self.table.trim(|_, _| {})
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), MapError> {
        self.table.reserve(additional, |_, _| {})
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.table.retain(|k, v| keep(k, v), |_, _| {});
    }

    pub fn default_return_value(&self) -> &V {
        &self.drv
    }

    pub fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.table.slots().iter(),
            remaining: self.table.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.table.len();
        IterMut {
            slots: self.table.slots_mut().iter_mut(),
            remaining,
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes every entry, yielding them by value. The table keeps its length.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        let remaining = self.table.len();
        IntoIter {
            slots: self.table.take_all().into_iter(),
            remaining,
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
    }
}

impl<K, V, S> Clone for OpenHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            drv: self.drv.clone(),
        }
    }
}

impl<K, V, S> fmt::Debug for OpenHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: HashStrategy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Maps are equal when they hold the same entries; the default return value
/// and table sizing are ignored.
impl<K, V, S> PartialEq for OpenHashMap<K, V, S>
where
    V: PartialEq,
    S: HashStrategy<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| *v == *ov))
    }
}

impl<K, V> FromIterator<(K, V)> for OpenHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0.max(DEFAULT_INITIAL_CAPACITY));
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.drain()
    }
}

impl<K, V, S> MapRead for OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    type Key = K;
    type Value = V;
    type Iter<'a> = Iter<'a, K, V>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.table.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        OpenHashMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        OpenHashMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        OpenHashMap::iter(self)
    }

    fn default_return_value(&self) -> &V {
        &self.drv
    }
}

impl<K, V, S> MapWrite for OpenHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        OpenHashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        OpenHashMap::remove(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        OpenHashMap::get_mut(self, key)
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }
}

/// Iterator over the entries of an `OpenHashMap`, in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(b) = slot {
                self.remaining -= 1;
                return Some((&b.key, &b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over entries with mutable values.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(b) = slot {
                self.remaining -= 1;
                return Some((&b.key, &mut b.value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning iterator; also returned by `drain`.
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let b = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((b.key, b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
