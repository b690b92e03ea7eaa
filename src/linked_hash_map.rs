//! LinkedHashMap: `RawTable` plus a doubly-linked order over its slots.
//!
//! Physical vs logical position
//! - `links.cells[i]` holds the prev/next slot indices of the entry living in
//!   slot `i`; `NIL` marks the list ends.
//! - Backward-shift deletion moves entries between slots. Every relocation
//!   reported by the table copies the moved entry's links to its new slot and
//!   patches its two neighbours, so logical order survives physical moves.
//! - Resizes rehash in slot order, then the list is rebuilt by walking the
//!   old order through the old→new index map.
//!
//! Access order is driven by `&mut self` paths only (`get_mut`, updating
//! inserts, the explicit moves); `get` is a pure read, so iterators never
//! observe relinking.

use crate::config::{TableConfig, DEFAULT_INITIAL_CAPACITY};
use crate::error::MapError;
use crate::map::{check_arrays, MapRead, MapWrite};
use crate::raw_table::{Bucket, RawTable};
use crate::strategy::{DefaultStrategy, HashStrategy};
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;

const NIL: usize = usize::MAX;

#[derive(Copy, Clone)]
struct Link {
    prev: usize,
    next: usize,
}

#[derive(Clone)]
struct Links {
    cells: Box<[Link]>,
    first: usize,
    last: usize,
}

impl Links {
    fn new(n: usize) -> Self {
        Self {
            cells: vec![Link { prev: NIL, next: NIL }; n].into_boxed_slice(),
            first: NIL,
            last: NIL,
        }
    }

    #[inline]
    fn next(&self, i: usize) -> usize {
        self.cells[i].next
    }

    #[inline]
    fn prev(&self, i: usize) -> usize {
        self.cells[i].prev
    }

    fn unlink(&mut self, i: usize) {
        let Link { prev: p, next: n } = self.cells[i];
        if p == NIL {
            self.first = n;
        } else {
            self.cells[p].next = n;
        }
        if n == NIL {
            self.last = p;
        } else {
            self.cells[n].prev = p;
        }
    }

    fn link_last(&mut self, i: usize) {
        let last = self.last;
        self.cells[i] = Link { prev: last, next: NIL };
        if last == NIL {
            self.first = i;
        } else {
            self.cells[last].next = i;
        }
        self.last = i;
    }

    fn link_first(&mut self, i: usize) {
        let first = self.first;
        self.cells[i] = Link { prev: NIL, next: first };
        if first == NIL {
            self.last = i;
        } else {
            self.cells[first].prev = i;
        }
        self.first = i;
    }

    fn move_to_first(&mut self, i: usize) {
        if self.first != i {
            self.unlink(i);
            self.link_first(i);
        }
    }

    fn move_to_last(&mut self, i: usize) {
        if self.last != i {
            self.unlink(i);
            self.link_last(i);
        }
    }

    /// The entry in slot `from` now lives in slot `to`.
    fn relocate(&mut self, from: usize, to: usize) {
        let link = self.cells[from];
        self.cells[to] = link;
        if link.prev == NIL {
            self.first = to;
        } else {
            self.cells[link.prev].next = to;
        }
        if link.next == NIL {
            self.last = to;
        } else {
            self.cells[link.next].prev = to;
        }
    }

    fn clear(&mut self) {
        self.first = NIL;
        self.last = NIL;
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Place {
    Keep,
    First,
    Last,
}

pub struct LinkedHashMap<K, V, S = DefaultStrategy> {
    table: RawTable<K, V, S>,
    links: Links,
    access_order: bool,
    drv: V,
}

impl<K, V> LinkedHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// # Panics
    /// Panics if the table length overflows `usize`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity, DefaultStrategy::default())
    }

    pub fn with_config(cfg: TableConfig) -> Result<Self, MapError> {
        Self::with_config_and_strategy(cfg, DefaultStrategy::default())
    }

    /// Inserts pairs in array order. Later duplicates overwrite the value but
    /// keep the first insertion position.
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

    /// Copies entries in `other`'s iteration order.
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

impl<K, V> Default for LinkedHashMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
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
        Self::from_table(RawTable::with_capacity(capacity, strategy))
    }

    pub fn with_config_and_strategy(cfg: TableConfig, strategy: S) -> Result<Self, MapError>
    where
        V: Default,
    {
        Ok(Self::from_table(RawTable::with_config(cfg, strategy)?))
    }

    fn from_table(table: RawTable<K, V, S>) -> Self
    where
        V: Default,
    {
        Self {
            links: Links::new(table.table_len()),
            table,
            access_order: false,
            drv: V::default(),
        }
    }

    /// Switches between insertion order (`false`, the default) and access
    /// order, where `get_mut` and updating inserts move the entry last.
    pub fn with_access_order(mut self, access_order: bool) -> Self {
        self.access_order = access_order;
        self
    }

    pub fn is_access_order(&self) -> bool {
        self.access_order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    fn find(&self, key: &K) -> Option<usize> {
        let hash = self.table.make_hash(key);
        self.table.find(hash, key)
    }

    fn value_at(&self, i: usize) -> Option<&V> {
        self.table.bucket(i).map(|b| &b.value)
    }

    fn entry_at(&self, i: usize) -> Option<(&K, &V)> {
        self.table.bucket(i).map(|b| (&b.key, &b.value))
    }

    fn place(&mut self, i: usize, place: Place) {
        match place {
            Place::Keep => {}
            Place::First => self.links.move_to_first(i),
            Place::Last => self.links.move_to_last(i),
        }
    }

    fn touched(&self) -> Place {
        if self.access_order {
            Place::Last
        } else {
            Place::Keep
        }
    }

    /// Runs a table operation that may rehash, then rebuilds the link list
    /// from the reported `(old, new)` slot moves. Entries with no reported
    /// move were dropped by the operation.
    fn remap<R>(
        &mut self,
        force: bool,
        op: impl FnOnce(&mut RawTable<K, V, S>, &mut dyn FnMut(usize, usize)) -> R,
    ) -> R {
        let old_len = self.table.table_len();
        let mut to_new = vec![NIL; old_len];
        let r = op(&mut self.table, &mut |from, to| to_new[from] = to);
        if !force && self.table.table_len() == old_len {
            return r;
        }
        let mut links = Links::new(self.table.table_len());
        let mut i = self.links.first;
        while i != NIL {
            if to_new[i] != NIL {
                links.link_last(to_new[i]);
            }
            i = self.links.next(i);
        }
        self.links = links;
        r
    }

    /// Pure lookup; never changes access order. Use `get_mut` or
    /// `get_and_move_to_last` to record an access.
    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.find(key)?;
        self.value_at(i)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        self.place(i, self.touched());
        self.table.bucket_mut(i).map(|b| &mut b.value)
    }

    /// Presence test; never changes access order.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    fn put_placed(&mut self, key: K, value: V, existing: Place, fresh: Place) -> Option<V> {
        let hash = self.table.make_hash(&key);
        match self.table.find_slot(hash, &key) {
            Ok(i) => {
                self.place(i, existing);
                self.table
                    .bucket_mut(i)
                    .map(|b| core::mem::replace(&mut b.value, value))
            }
            Err(i) => {
                self.table.insert_vacant(i, hash, key, value);
                if fresh == Place::First {
                    self.links.link_first(i);
                } else {
                    self.links.link_last(i);
                }
                if self.table.needs_grow() {
                    self.remap(false, |t, moved| t.grow(moved));
                }
                None
            }
        }
    }

    /// New keys are appended; existing keys keep their position unless the
    /// map is in access order.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let existing = self.touched();
        self.put_placed(key, value, existing, Place::Last)
    }

    /// Inserts or updates `key` and makes it the first entry.
    pub fn put_and_move_to_first(&mut self, key: K, value: V) -> Option<V> {
        self.put_placed(key, value, Place::First, Place::First)
    }

    /// Inserts or updates `key` and makes it the last entry.
    pub fn put_and_move_to_last(&mut self, key: K, value: V) -> Option<V> {
        self.put_placed(key, value, Place::Last, Place::Last)
    }

    /// Returns whether `key` was present.
    pub fn move_to_first(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(i) => {
                self.links.move_to_first(i);
                true
            }
            None => false,
        }
    }

    pub fn move_to_last(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(i) => {
                self.links.move_to_last(i);
                true
            }
            None => false,
        }
    }

    pub fn get_and_move_to_first(&mut self, key: &K) -> Option<&V> {
        let i = self.find(key)?;
        self.links.move_to_first(i);
        self.value_at(i)
    }

    pub fn get_and_move_to_last(&mut self, key: &K) -> Option<&V> {
        let i = self.find(key)?;
        self.links.move_to_last(i);
        self.value_at(i)
    }

    fn remove_at(&mut self, i: usize) -> Option<(K, V)> {
        self.links.unlink(i);
        let links = &mut self.links;
        let b = self.table.take(i, |from, to| links.relocate(from, to))?;
        self.remap(false, |t, moved| t.maybe_shrink(moved));
        Some((b.key, b.value))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.find(key)?;
        self.remove_at(i)
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.links.clear();
    }

    pub fn first_key(&self) -> Option<&K> {
        self.first_entry().map(|(k, _)| k)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.last_entry().map(|(k, _)| k)
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.links.first)
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.links.last)
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        match self.links.first {
            NIL => None,
            i => self.remove_at(i),
        }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        match self.links.last {
            NIL => None,
            i => self.remove_at(i),
        }
    }

    /// Shrinks the table to the smallest length holding the current entries.
    pub fn trim(&mut self) -> bool {
        self.remap(false, |t, moved| t.trim(moved))
    }

    pub fn reserve(&mut self, additional: usize) -> Result<(), MapError> {
        self.remap(false, |t, moved| t.reserve(additional, moved))
    }

    /// Keeps the entries `keep` accepts; survivors keep their relative order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.remap(true, |t, moved| t.retain(|k, v| keep(k, v), moved));
    }

    pub fn default_return_value(&self) -> &V {
        &self.drv
    }

    pub fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }

    /// Entries in link order. Double-ended: `rev()` walks from the last.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(
            self.table.slots(),
            &self.links,
            self.links.first,
            self.links.last,
        )
    }

    /// Entries strictly after `key` in link order, or `None` when `key` is
    /// absent. This is a suffix range: `rev()` walks from the last entry
    /// back to the one following `key` and never reaches `key` itself.
    pub fn iter_from(&self, key: &K) -> Option<Iter<'_, K, V>> {
        let i = self.find(key)?;
        Some(Iter::new(
            self.table.slots(),
            &self.links,
            self.links.next(i),
            self.links.last,
        ))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
        let mut seen = 0;
        let mut prev = NIL;
        let mut i = self.links.first;
        while i != NIL {
            assert!(self.table.bucket(i).is_some(), "link to vacant slot {i}");
            assert_eq!(self.links.prev(i), prev, "broken prev link at {i}");
            prev = i;
            i = self.links.next(i);
            seen += 1;
            assert!(seen <= self.len(), "cycle in link list");
        }
        assert_eq!(self.links.last, prev);
        assert_eq!(seen, self.len(), "link list must cover every entry");
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            links: self.links.clone(),
            access_order: self.access_order,
            drv: self.drv.clone(),
        }
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: HashStrategy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equality is by contents; iteration order is not compared.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    V: PartialEq,
    S: HashStrategy<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| {
                other
                    .find(k)
                    .and_then(|i| other.value_at(i))
                    .map_or(false, |ov| *v == *ov)
            })
    }
}

impl<K, V> FromIterator<(K, V)> for LinkedHashMap<K, V>
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

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consumes the map in link order.
impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut out = Vec::with_capacity(self.len());
        let mut slots = self.table.take_all();
        let mut i = self.links.first;
        while i != NIL {
            if let Some(b) = slots[i].take() {
                out.push((b.key, b.value));
            }
            i = self.links.next(i);
        }
        out.into_iter()
    }
}

impl<K, V, S> MapRead for LinkedHashMap<K, V, S>
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
        LinkedHashMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LinkedHashMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        LinkedHashMap::iter(self)
    }

    fn default_return_value(&self) -> &V {
        &self.drv
    }
}

impl<K, V, S> MapWrite for LinkedHashMap<K, V, S>
where
    S: HashStrategy<K>,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        LinkedHashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LinkedHashMap::remove(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        LinkedHashMap::get_mut(self, key)
    }

    fn clear(&mut self) {
        LinkedHashMap::clear(self);
    }

    fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }
}

/// Bidirectional iterator over a `LinkedHashMap` in link order.
pub struct Iter<'a, K, V> {
    slots: &'a [Option<Bucket<K, V>>],
    links: &'a Links,
    front: usize,
    back: usize,
    done: bool,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(slots: &'a [Option<Bucket<K, V>>], links: &'a Links, front: usize, back: usize) -> Self {
        Self {
            slots,
            links,
            front,
            back,
            done: front == NIL || back == NIL,
        }
    }

    fn entry(&self, i: usize) -> Option<(&'a K, &'a V)> {
        let slots: &'a [Option<Bucket<K, V>>] = self.slots;
        slots[i].as_ref().map(|b| (&b.key, &b.value))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let i = self.front;
        if i == self.back {
            self.done = true;
        } else {
            self.front = self.links.next(i);
        }
        self.entry(i)
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let i = self.back;
        if i == self.front {
            self.done = true;
        } else {
            self.back = self.links.prev(i);
        }
        self.entry(i)
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
