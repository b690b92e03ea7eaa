//! TreeMap: ordered map over a self-balancing binary search tree.
//!
//! Layers
//! - `node::Arena`: nodes in a `SlotMap`, parent/child links as keys,
//!   rotations and splicing.
//! - `Balance` (sealed): the rebalancing scheme. `RedBlack` recolors and
//!   rotates after each mutation; `Avl` keeps subtree heights within one.
//!   Both expose the same map contract.
//! - `KeyComparator`: the ordering. `Natural` uses `Ord`.
//! - `view`: live windows (`SubMap`, `SubMapMut`) that store bounds and
//!   re-evaluate them on every call.
//!
//! Deletion of a node with two children first swaps its entry with the
//! in-order successor, so both schemes only ever unlink a node with at
//! most one child.

mod avl;
mod node;
mod order;
mod red_black;
mod view;

pub use avl::Avl;
pub use order::{FnComparator, KeyComparator, Natural, Reverse};
pub use red_black::RedBlack;
pub use view::{SubMap, SubMapMut};

use crate::error::MapError;
use crate::map::{check_arrays, MapRead, MapWrite};
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::RangeBounds;
use node::{Arena, Node, NodeKey};

mod sealed {
    use super::node::{Arena, NodeKey};

    pub trait Sealed {
        type Meta: Copy + core::fmt::Debug;

        /// Metadata of a freshly inserted leaf.
        fn leaf() -> Self::Meta;

        /// Restores the balance invariant after `node` was linked in as a leaf.
        fn after_insert<K, V>(arena: &mut Arena<K, V, Self::Meta>, node: NodeKey);

        /// Unlinks `node`, rebalances, and returns its entry.
        fn remove<K, V>(arena: &mut Arena<K, V, Self::Meta>, node: NodeKey) -> (K, V);

        #[cfg(test)]
        fn assert_balanced<K, V>(arena: &Arena<K, V, Self::Meta>);
    }
}

/// Rebalancing scheme of a `TreeMap`. Implemented by `RedBlack` and `Avl`.
pub trait Balance: sealed::Sealed {}

pub type RbTreeMap<K, V, C = Natural> = TreeMap<K, V, RedBlack, C>;
pub type AvlTreeMap<K, V, C = Natural> = TreeMap<K, V, Avl, C>;

#[derive(Copy, Clone, Debug)]
enum Seek {
    Lower,
    Floor,
    Ceiling,
    Higher,
}

pub struct TreeMap<K, V, B: Balance = RedBlack, C = Natural> {
    arena: Arena<K, V, B::Meta>,
    cmp: C,
    drv: V,
    default_min: Option<K>,
    default_max: Option<K>,
}

impl<K, V, B> TreeMap<K, V, B, Natural>
where
    K: Ord,
    V: Default,
    B: Balance,
{
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Builds a tree from parallel key/value arrays. Later duplicates win.
    pub fn from_arrays(keys: &[K], values: &[V]) -> Result<Self, MapError>
    where
        K: Clone,
        V: Clone,
    {
        check_arrays(keys, values)?;
        let mut map = Self::new();
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
        let mut map = Self::new();
        map.put_all_from(other);
        map
    }
}

impl<K, V, B> Default for TreeMap<K, V, B, Natural>
where
    K: Ord,
    V: Default,
    B: Balance,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B, C> TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    pub fn with_comparator(cmp: C) -> Self
    where
        V: Default,
    {
        Self {
            arena: Arena::new(),
            cmp,
            drv: V::default(),
            default_min: None,
            default_max: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.nodes.is_empty()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    fn find(&self, key: &K) -> Option<NodeKey> {
        let mut cur = self.arena.root;
        while let Some(n) = cur {
            let node = &self.arena.nodes[n];
            cur = match self.cmp.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(n),
            };
        }
        None
    }

    fn seek(&self, key: &K, seek: Seek) -> Option<NodeKey> {
        let mut cur = self.arena.root;
        let mut best = None;
        while let Some(n) = cur {
            let node = &self.arena.nodes[n];
            let go_right = match (seek, self.cmp.compare(key, &node.key)) {
                (Seek::Floor | Seek::Ceiling, Ordering::Equal) => return Some(n),
                (Seek::Lower | Seek::Floor, Ordering::Greater) => {
                    best = Some(n);
                    true
                }
                (Seek::Lower | Seek::Floor, _) => false,
                (Seek::Ceiling | Seek::Higher, Ordering::Less) => {
                    best = Some(n);
                    false
                }
                (Seek::Ceiling | Seek::Higher, _) => true,
            };
            cur = if go_right { node.right } else { node.left };
        }
        best
    }

    #[inline]
    fn key_at(&self, n: NodeKey) -> &K {
        &self.arena.nodes[n].key
    }

    #[inline]
    fn entry_at(&self, n: NodeKey) -> (&K, &V) {
        let node = &self.arena.nodes[n];
        (&node.key, &node.value)
    }

    fn remove_node(&mut self, n: NodeKey) -> (K, V) {
        B::remove(&mut self.arena, n)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|n| &self.arena.nodes[n].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let n = self.find(key)?;
        Some(&mut self.arena.nodes[n].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Stores `value`, returning the previous value. The stored key is kept
    /// when an equal key is already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = None;
        let mut went_left = false;
        let mut cur = self.arena.root;
        while let Some(n) = cur {
            let node = &self.arena.nodes[n];
            match self.cmp.compare(&key, &node.key) {
                Ordering::Less => {
                    went_left = true;
                    cur = node.left;
                }
                Ordering::Greater => {
                    went_left = false;
                    cur = node.right;
                }
                Ordering::Equal => {
                    return Some(core::mem::replace(&mut self.arena.nodes[n].value, value));
                }
            }
            parent = Some(n);
        }
        let n = self.arena.nodes.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            meta: B::leaf(),
        });
        match parent {
            None => self.arena.root = Some(n),
            Some(p) if went_left => self.arena.nodes[p].left = Some(n),
            Some(p) => self.arena.nodes[p].right = Some(n),
        }
        B::after_insert(&mut self.arena, n);
        None
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let n = self.find(key)?;
        Some(self.remove_node(n))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }

    pub fn first_key(&self) -> Option<&K> {
        self.arena.first().map(|n| self.key_at(n))
    }

    pub fn last_key(&self) -> Option<&K> {
        self.arena.last().map(|n| self.key_at(n))
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.arena.first().map(|n| self.entry_at(n))
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.arena.last().map(|n| self.entry_at(n))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let n = self.arena.first()?;
        Some(self.remove_node(n))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let n = self.arena.last()?;
        Some(self.remove_node(n))
    }

    /// Greatest key strictly less than `key`.
    pub fn lower_key(&self, key: &K) -> Option<&K> {
        self.seek(key, Seek::Lower).map(|n| self.key_at(n))
    }

    /// Greatest key less than or equal to `key`.
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.seek(key, Seek::Floor).map(|n| self.key_at(n))
    }

    /// Least key greater than or equal to `key`.
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.seek(key, Seek::Ceiling).map(|n| self.key_at(n))
    }

    /// Least key strictly greater than `key`.
    pub fn higher_key(&self, key: &K) -> Option<&K> {
        self.seek(key, Seek::Higher).map(|n| self.key_at(n))
    }

    pub fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.seek(key, Seek::Lower).map(|n| self.entry_at(n))
    }

    pub fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.seek(key, Seek::Floor).map(|n| self.entry_at(n))
    }

    pub fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.seek(key, Seek::Ceiling).map(|n| self.entry_at(n))
    }

    pub fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
        self.seek(key, Seek::Higher).map(|n| self.entry_at(n))
    }

    /// In-order iteration; `rev()` walks from the greatest key.
    pub fn iter(&self) -> Iter<'_, K, V, B> {
        Iter::new(&self.arena, self.arena.first(), self.arena.last(), false)
    }

    /// Entries whose keys fall in `range`, in comparator order.
    pub fn range<R>(&self, range: R) -> Iter<'_, K, V, B>
    where
        R: RangeBounds<K>,
        K: Clone,
    {
        let window = view::Window::new(range.start_bound().cloned(), range.end_bound().cloned());
        self.window_iter(&window, false)
    }

    pub fn keys(&self) -> Keys<'_, K, V, B> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, B> {
        Values { inner: self.iter() }
    }

    /// Keys from greatest to least.
    pub fn descending_keys(&self) -> Keys<'_, K, V, B> {
        Keys {
            inner: self.iter().reversed(),
        }
    }

    pub fn default_return_value(&self) -> &V {
        &self.drv
    }

    pub fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }

    /// Lower bound used by `head_map` in place of "unbounded".
    pub fn set_default_min_value(&mut self, key: Option<K>) {
        self.default_min = key;
    }

    /// Upper bound used by `tail_map` in place of "unbounded".
    pub fn set_default_max_value(&mut self, key: Option<K>) {
        self.default_max = key;
    }

    pub fn default_min_value(&self) -> Option<&K> {
        self.default_min.as_ref()
    }

    pub fn default_max_value(&self) -> Option<&K> {
        self.default_max.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        B::assert_balanced(&self.arena);
        if let Some(r) = self.arena.root {
            assert!(self.arena.parent(r).is_none(), "root must have no parent");
        }
        let mut count = 0;
        for (n, node) in self.arena.nodes.iter() {
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.arena.parent(child), Some(n), "broken parent link");
            }
            count += 1;
        }
        let keys: Vec<&K> = self.keys().collect();
        assert_eq!(keys.len(), count, "every node must be reachable");
        for w in keys.windows(2) {
            assert_eq!(
                self.cmp.compare(w[0], w[1]),
                Ordering::Less,
                "in-order traversal must be strictly increasing"
            );
        }
    }
}

impl<K, V, B, C> Clone for TreeMap<K, V, B, C>
where
    K: Clone,
    V: Clone,
    B: Balance,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            cmp: self.cmp.clone(),
            drv: self.drv.clone(),
            default_min: self.default_min.clone(),
            default_max: self.default_max.clone(),
        }
    }
}

impl<K, V, B, C> fmt::Debug for TreeMap<K, V, B, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
    B: Balance,
    C: KeyComparator<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, B, C> PartialEq for TreeMap<K, V, B, C>
where
    V: PartialEq,
    B: Balance,
    C: KeyComparator<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| self.cmp.compare(ka, kb).is_eq() && va == vb)
    }
}

impl<K, V, B> FromIterator<(K, V)> for TreeMap<K, V, B, Natural>
where
    K: Ord,
    V: Default,
    B: Balance,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, B, C> Extend<(K, V)> for TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, B, C> IntoIterator for &'a TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, B, C> IntoIterator for TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, B, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self }
    }
}

impl<K, V, B, C> MapRead for TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    type Key = K;
    type Value = V;
    type Iter<'a> = Iter<'a, K, V, B>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.arena.nodes.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        TreeMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        TreeMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V, B> {
        TreeMap::iter(self)
    }

    fn default_return_value(&self) -> &V {
        &self.drv
    }
}

impl<K, V, B, C> MapWrite for TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        TreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        TreeMap::remove(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        TreeMap::get_mut(self, key)
    }

    fn clear(&mut self) {
        self.arena.clear();
    }

    fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }
}

/// Bidirectional in-order iterator over a tree or a window of it.
pub struct Iter<'a, K, V, B: Balance> {
    arena: &'a Arena<K, V, B::Meta>,
    front: Option<NodeKey>,
    back: Option<NodeKey>,
    descending: bool,
}

impl<'a, K, V, B: Balance> Iter<'a, K, V, B> {
    fn new(
        arena: &'a Arena<K, V, B::Meta>,
        front: Option<NodeKey>,
        back: Option<NodeKey>,
        descending: bool,
    ) -> Self {
        let (front, back) = match (front, back) {
            (Some(f), Some(b)) => (Some(f), Some(b)),
            _ => (None, None),
        };
        Self {
            arena,
            front,
            back,
            descending,
        }
    }

    fn reversed(mut self) -> Self {
        self.descending = !self.descending;
        self
    }

    fn entry(&self, n: NodeKey) -> (&'a K, &'a V) {
        let arena: &'a Arena<K, V, B::Meta> = self.arena;
        let node = &arena.nodes[n];
        (&node.key, &node.value)
    }

    fn step_front(&mut self) -> Option<NodeKey> {
        let n = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.arena.successor(n);
        }
        Some(n)
    }

    fn step_back(&mut self) -> Option<NodeKey> {
        let n = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.arena.predecessor(n);
        }
        Some(n)
    }
}

impl<K, V, B: Balance> Clone for Iter<'_, K, V, B> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            descending: self.descending,
        }
    }
}

impl<'a, K, V, B: Balance> Iterator for Iter<'a, K, V, B> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = if self.descending {
            self.step_back()
        } else {
            self.step_front()
        }?;
        Some(self.entry(n))
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Iter<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let n = if self.descending {
            self.step_front()
        } else {
            self.step_back()
        }?;
        Some(self.entry(n))
    }
}

impl<K, V, B: Balance> FusedIterator for Iter<'_, K, V, B> {}

pub struct Keys<'a, K, V, B: Balance> {
    inner: Iter<'a, K, V, B>,
}

impl<'a, K, V, B: Balance> Iterator for Keys<'a, K, V, B> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Keys<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

pub struct Values<'a, K, V, B: Balance> {
    inner: Iter<'a, K, V, B>,
}

impl<'a, K, V, B: Balance> Iterator for Values<'a, K, V, B> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Values<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

/// Owning iterator in comparator order.
pub struct IntoIter<K, V, B: Balance, C> {
    tree: TreeMap<K, V, B, C>,
}

impl<K, V, B, C> Iterator for IntoIter<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<K, V, B, C> DoubleEndedIterator for IntoIter<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn next_back(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }
}

impl<K, V, B, C> ExactSizeIterator for IntoIter<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
}
