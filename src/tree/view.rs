//! Live sub-map views over a `TreeMap`.
//!
//! A view stores a `Window` (two bounds in the tree's comparator order) and
//! a direction flag; it never copies entries. Every call re-reads the tree
//! through the window, so entries inserted into the backing tree within the
//! bounds appear immediately and entries outside them never do.
//!
//! Nested views intersect their window with the parent's. A window whose
//! lower bound lies above its upper bound is simply empty.

use super::{Balance, Iter, KeyComparator, Keys, NodeKey, Seek, TreeMap, Values};
use crate::error::MapError;
use crate::map::MapRead;
use core::cmp::Ordering;
use core::fmt;
use core::ops::Bound;

#[derive(Clone, Debug)]
pub(super) struct Window<K> {
    lo: Bound<K>,
    hi: Bound<K>,
}

impl<K> Window<K> {
    pub(super) fn new(lo: Bound<K>, hi: Bound<K>) -> Self {
        Self { lo, hi }
    }

    fn full() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }
}

fn bound<K>(key: K, inclusive: bool) -> Bound<K> {
    if inclusive {
        Bound::Included(key)
    } else {
        Bound::Excluded(key)
    }
}

fn bound_key<K>(b: &Bound<K>) -> Option<&K> {
    match b {
        Bound::Included(k) | Bound::Excluded(k) => Some(k),
        Bound::Unbounded => None,
    }
}

impl<K, V, B, C> TreeMap<K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn too_low(&self, w: &Window<K>, key: &K) -> bool {
        match &w.lo {
            Bound::Unbounded => false,
            Bound::Included(lo) => self.cmp.compare(key, lo) == Ordering::Less,
            Bound::Excluded(lo) => self.cmp.compare(key, lo) != Ordering::Greater,
        }
    }

    fn too_high(&self, w: &Window<K>, key: &K) -> bool {
        match &w.hi {
            Bound::Unbounded => false,
            Bound::Included(hi) => self.cmp.compare(key, hi) == Ordering::Greater,
            Bound::Excluded(hi) => self.cmp.compare(key, hi) != Ordering::Less,
        }
    }

    fn in_window(&self, w: &Window<K>, key: &K) -> bool {
        !self.too_low(w, key) && !self.too_high(w, key)
    }

    fn abs_lowest(&self, w: &Window<K>) -> Option<NodeKey> {
        let n = match &w.lo {
            Bound::Unbounded => self.arena.first(),
            Bound::Included(lo) => self.seek(lo, Seek::Ceiling),
            Bound::Excluded(lo) => self.seek(lo, Seek::Higher),
        }?;
        (!self.too_high(w, self.key_at(n))).then_some(n)
    }

    fn abs_highest(&self, w: &Window<K>) -> Option<NodeKey> {
        let n = match &w.hi {
            Bound::Unbounded => self.arena.last(),
            Bound::Included(hi) => self.seek(hi, Seek::Floor),
            Bound::Excluded(hi) => self.seek(hi, Seek::Lower),
        }?;
        (!self.too_low(w, self.key_at(n))).then_some(n)
    }

    /// `seek` clamped to the window: probes below (above) the window answer
    /// with its lowest (highest) entry, results outside it are dropped.
    fn abs_seek(&self, w: &Window<K>, key: &K, seek: Seek) -> Option<NodeKey> {
        match seek {
            Seek::Ceiling | Seek::Higher => {
                if self.too_low(w, key) {
                    return self.abs_lowest(w);
                }
                let n = self.seek(key, seek)?;
                (!self.too_high(w, self.key_at(n))).then_some(n)
            }
            Seek::Lower | Seek::Floor => {
                if self.too_high(w, key) {
                    return self.abs_highest(w);
                }
                let n = self.seek(key, seek)?;
                (!self.too_low(w, self.key_at(n))).then_some(n)
            }
        }
    }

    fn bound_order(&self, a: &Bound<K>, b: &Bound<K>) -> Option<Ordering> {
        Some(self.cmp.compare(bound_key(a)?, bound_key(b)?))
    }

    fn tighter_lo(&self, a: Bound<K>, b: Bound<K>) -> Bound<K> {
        match self.bound_order(&a, &b) {
            None if matches!(a, Bound::Unbounded) => b,
            None => a,
            Some(Ordering::Less) => b,
            Some(Ordering::Greater) => a,
            Some(Ordering::Equal) if matches!(a, Bound::Excluded(_)) => a,
            Some(Ordering::Equal) => b,
        }
    }

    fn tighter_hi(&self, a: Bound<K>, b: Bound<K>) -> Bound<K> {
        match self.bound_order(&a, &b) {
            None if matches!(a, Bound::Unbounded) => b,
            None => a,
            Some(Ordering::Less) => a,
            Some(Ordering::Greater) => b,
            Some(Ordering::Equal) if matches!(a, Bound::Excluded(_)) => a,
            Some(Ordering::Equal) => b,
        }
    }

    pub(super) fn window_iter(&self, w: &Window<K>, descending: bool) -> Iter<'_, K, V, B> {
        Iter::new(&self.arena, self.abs_lowest(w), self.abs_highest(w), descending)
    }

    fn head_window(&self, to: K, inclusive: bool) -> Window<K>
    where
        K: Clone,
    {
        let lo = self
            .default_min
            .clone()
            .map_or(Bound::Unbounded, Bound::Included);
        Window::new(lo, bound(to, inclusive))
    }

    fn tail_window(&self, from: K, inclusive: bool) -> Window<K>
    where
        K: Clone,
    {
        let hi = self
            .default_max
            .clone()
            .map_or(Bound::Unbounded, Bound::Included);
        Window::new(bound(from, inclusive), hi)
    }

    /// Live view of the keys between `from` and `to`.
    pub fn sub_map(&self, from: K, from_inclusive: bool, to: K, to_inclusive: bool) -> SubMap<'_, K, V, B, C> {
        SubMap::new(self, Window::new(bound(from, from_inclusive), bound(to, to_inclusive)), false)
    }

    pub fn sub_map_mut(
        &mut self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> SubMapMut<'_, K, V, B, C> {
        let w = Window::new(bound(from, from_inclusive), bound(to, to_inclusive));
        SubMapMut::new(self, w, false)
    }

    /// Live view of the keys below `to`, starting at the default minimum when
    /// one is set.
    pub fn head_map(&self, to: K, inclusive: bool) -> SubMap<'_, K, V, B, C>
    where
        K: Clone,
    {
        SubMap::new(self, self.head_window(to, inclusive), false)
    }

    pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.head_window(to, inclusive);
        SubMapMut::new(self, w, false)
    }

    /// Live view of the keys above `from`, ending at the default maximum when
    /// one is set.
    pub fn tail_map(&self, from: K, inclusive: bool) -> SubMap<'_, K, V, B, C>
    where
        K: Clone,
    {
        SubMap::new(self, self.tail_window(from, inclusive), false)
    }

    pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.tail_window(from, inclusive);
        SubMapMut::new(self, w, false)
    }

    /// The whole tree in reverse comparator order.
    pub fn descending_map(&self) -> SubMap<'_, K, V, B, C> {
        SubMap::new(self, Window::full(), true)
    }

    pub fn descending_map_mut(&mut self) -> SubMapMut<'_, K, V, B, C> {
        SubMapMut::new(self, Window::full(), true)
    }
}

/// Borrowed window with the read logic shared by both view types.
struct Nav<'t, K, V, B: Balance, C> {
    tree: &'t TreeMap<K, V, B, C>,
    window: &'t Window<K>,
    descending: bool,
}

impl<'t, K, V, B, C> Nav<'t, K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn contains(&self, key: &K) -> bool {
        self.tree.in_window(self.window, key)
    }

    fn get(&self, key: &K) -> Option<&'t V> {
        if !self.contains(key) {
            return None;
        }
        let tree: &'t TreeMap<K, V, B, C> = self.tree;
        tree.get(key)
    }

    fn first(&self) -> Option<NodeKey> {
        if self.descending {
            self.tree.abs_highest(self.window)
        } else {
            self.tree.abs_lowest(self.window)
        }
    }

    fn last(&self) -> Option<NodeKey> {
        if self.descending {
            self.tree.abs_lowest(self.window)
        } else {
            self.tree.abs_highest(self.window)
        }
    }

    /// Navigation in view order: a descending view swaps lower/higher and
    /// floor/ceiling.
    fn seek(&self, key: &K, seek: Seek) -> Option<NodeKey> {
        let seek = match (self.descending, seek) {
            (false, s) => s,
            (true, Seek::Lower) => Seek::Higher,
            (true, Seek::Floor) => Seek::Ceiling,
            (true, Seek::Ceiling) => Seek::Floor,
            (true, Seek::Higher) => Seek::Lower,
        };
        self.tree.abs_seek(self.window, key, seek)
    }

    fn key(&self, n: Option<NodeKey>) -> Option<&'t K> {
        let tree: &'t TreeMap<K, V, B, C> = self.tree;
        n.map(|n| tree.key_at(n))
    }

    fn entry(&self, n: Option<NodeKey>) -> Option<(&'t K, &'t V)> {
        let tree: &'t TreeMap<K, V, B, C> = self.tree;
        n.map(|n| tree.entry_at(n))
    }

    fn iter(&self) -> Iter<'t, K, V, B> {
        let tree: &'t TreeMap<K, V, B, C> = self.tree;
        tree.window_iter(self.window, self.descending)
    }

    /// Window for a nested view whose bounds are given in view order.
    fn narrow(&self, from: Bound<K>, to: Bound<K>) -> Window<K>
    where
        K: Clone,
    {
        let (lo, hi) = if self.descending { (to, from) } else { (from, to) };
        Window::new(
            self.tree.tighter_lo(self.window.lo.clone(), lo),
            self.tree.tighter_hi(self.window.hi.clone(), hi),
        )
    }
}

/// Read operations shared by `SubMap` and `SubMapMut`, all in view order.
macro_rules! view_reads {
    () => {
        /// Number of entries currently inside the window. Walks the window.
        pub fn len(&self) -> usize {
            self.nav().iter().count()
        }

        pub fn is_empty(&self) -> bool {
            self.nav().first().is_none()
        }

        pub fn is_descending(&self) -> bool {
            self.descending
        }

        /// Whether `key` lies inside the window, present or not.
        pub fn in_range(&self, key: &K) -> bool {
            self.nav().contains(key)
        }

        pub fn get(&self, key: &K) -> Option<&V> {
            self.nav().get(key)
        }

        pub fn contains_key(&self, key: &K) -> bool {
            self.nav().get(key).is_some()
        }

        pub fn first_key(&self) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.first())
        }

        pub fn last_key(&self) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.last())
        }

        pub fn first_entry(&self) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.first())
        }

        pub fn last_entry(&self) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.last())
        }

        pub fn lower_key(&self, key: &K) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.seek(key, Seek::Lower))
        }

        pub fn floor_key(&self, key: &K) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.seek(key, Seek::Floor))
        }

        pub fn ceiling_key(&self, key: &K) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.seek(key, Seek::Ceiling))
        }

        pub fn higher_key(&self, key: &K) -> Option<&K> {
            let nav = self.nav();
            nav.key(nav.seek(key, Seek::Higher))
        }

        pub fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.seek(key, Seek::Lower))
        }

        pub fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.seek(key, Seek::Floor))
        }

        pub fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.seek(key, Seek::Ceiling))
        }

        pub fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
            let nav = self.nav();
            nav.entry(nav.seek(key, Seek::Higher))
        }

        pub fn iter(&self) -> Iter<'_, K, V, B> {
            self.nav().iter()
        }

        pub fn keys(&self) -> Keys<'_, K, V, B> {
            Keys {
                inner: self.nav().iter(),
            }
        }

        pub fn values(&self) -> Values<'_, K, V, B> {
            Values {
                inner: self.nav().iter(),
            }
        }

        /// Keys in the reverse of this view's order.
        pub fn descending_keys(&self) -> Keys<'_, K, V, B> {
            Keys {
                inner: self.nav().iter().reversed(),
            }
        }

        pub fn default_return_value(&self) -> &V {
            &self.tree.drv
        }
    };
}

/// Shared live window over a `TreeMap`.
pub struct SubMap<'a, K, V, B: Balance, C> {
    tree: &'a TreeMap<K, V, B, C>,
    window: Window<K>,
    descending: bool,
}

impl<'a, K, V, B, C> SubMap<'a, K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn new(tree: &'a TreeMap<K, V, B, C>, window: Window<K>, descending: bool) -> Self {
        Self {
            tree,
            window,
            descending,
        }
    }

    fn nav(&self) -> Nav<'_, K, V, B, C> {
        Nav {
            tree: self.tree,
            window: &self.window,
            descending: self.descending,
        }
    }

    view_reads!();

    /// Nested view; `from` and `to` are in this view's order.
    pub fn sub_map(&self, from: K, from_inclusive: bool, to: K, to_inclusive: bool) -> SubMap<'a, K, V, B, C>
    where
        K: Clone,
    {
        let w = self
            .nav()
            .narrow(bound(from, from_inclusive), bound(to, to_inclusive));
        SubMap::new(self.tree, w, self.descending)
    }

    pub fn head_map(&self, to: K, inclusive: bool) -> SubMap<'a, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.nav().narrow(Bound::Unbounded, bound(to, inclusive));
        SubMap::new(self.tree, w, self.descending)
    }

    pub fn tail_map(&self, from: K, inclusive: bool) -> SubMap<'a, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.nav().narrow(bound(from, inclusive), Bound::Unbounded);
        SubMap::new(self.tree, w, self.descending)
    }

    /// Same window, opposite direction.
    pub fn descending_map(&self) -> SubMap<'a, K, V, B, C>
    where
        K: Clone,
    {
        SubMap::new(self.tree, self.window.clone(), !self.descending)
    }
}

impl<K, V, B, C> Clone for SubMap<'_, K, V, B, C>
where
    K: Clone,
    B: Balance,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            window: self.window.clone(),
            descending: self.descending,
        }
    }
}

/// Exclusive live window over a `TreeMap`. Inserts outside the window fail;
/// removals outside it find nothing.
pub struct SubMapMut<'a, K, V, B: Balance, C> {
    tree: &'a mut TreeMap<K, V, B, C>,
    window: Window<K>,
    descending: bool,
}

impl<'a, K, V, B, C> SubMapMut<'a, K, V, B, C>
where
    B: Balance,
    C: KeyComparator<K>,
{
    fn new(tree: &'a mut TreeMap<K, V, B, C>, window: Window<K>, descending: bool) -> Self {
        Self {
            tree,
            window,
            descending,
        }
    }

    fn nav(&self) -> Nav<'_, K, V, B, C> {
        Nav {
            tree: &*self.tree,
            window: &self.window,
            descending: self.descending,
        }
    }

    view_reads!();

    /// The backing tree. Changes made through it show up in this view when
    /// they fall inside the window.
    pub fn backing_mut(&mut self) -> &mut TreeMap<K, V, B, C> {
        &mut *self.tree
    }

    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        if !self.tree.in_window(&self.window, &key) {
            return Err(MapError::KeyOutOfRange);
        }
        Ok(self.tree.insert(key, value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if !self.tree.in_window(&self.window, key) {
            return None;
        }
        self.tree.get_mut(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.tree.in_window(&self.window, key) {
            return None;
        }
        self.tree.remove(key)
    }

    /// Removes the first entry in view order.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let n = self.nav().first()?;
        Some(self.tree.remove_node(n))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let n = self.nav().last()?;
        Some(self.tree.remove_node(n))
    }

    /// Removes every entry inside the window.
    pub fn clear(&mut self) {
        while self.pop_first().is_some() {}
    }

    pub fn sub_map(
        &mut self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self
            .nav()
            .narrow(bound(from, from_inclusive), bound(to, to_inclusive));
        SubMapMut::new(self.tree, w, self.descending)
    }

    pub fn head_map(&mut self, to: K, inclusive: bool) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.nav().narrow(Bound::Unbounded, bound(to, inclusive));
        SubMapMut::new(self.tree, w, self.descending)
    }

    pub fn tail_map(&mut self, from: K, inclusive: bool) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.nav().narrow(bound(from, inclusive), Bound::Unbounded);
        SubMapMut::new(self.tree, w, self.descending)
    }

    pub fn descending_map(&mut self) -> SubMapMut<'_, K, V, B, C>
    where
        K: Clone,
    {
        let w = self.window.clone();
        SubMapMut::new(self.tree, w, !self.descending)
    }

    /// Shared view of the same window.
    pub fn as_sub_map(&self) -> SubMap<'_, K, V, B, C>
    where
        K: Clone,
    {
        SubMap::new(&*self.tree, self.window.clone(), self.descending)
    }
}

macro_rules! view_map_read {
    ($ty:ident) => {
        impl<'v, K, V, B, C> MapRead for $ty<'v, K, V, B, C>
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
                $ty::len(self)
            }

            fn is_empty(&self) -> bool {
                $ty::is_empty(self)
            }

            fn get(&self, key: &K) -> Option<&V> {
                $ty::get(self, key)
            }

            fn iter(&self) -> Iter<'_, K, V, B> {
                $ty::iter(self)
            }

            fn default_return_value(&self) -> &V {
                &self.tree.drv
            }
        }

        impl<K, V, B, C> fmt::Debug for $ty<'_, K, V, B, C>
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
    };
}

view_map_read!(SubMap);
view_map_read!(SubMapMut);

#[cfg(test)]
mod tests {
    use super::super::{Avl, RbTreeMap, RedBlack};
    use super::*;

    fn odd_tree<B: Balance>() -> TreeMap<i32, i32, B> {
        [1, 3, 5, 7, 9].into_iter().map(|k| (k, k * 10)).collect()
    }

    fn collect<'a>(it: impl Iterator<Item = (&'a i32, &'a i32)>) -> Vec<i32> {
        it.map(|(k, _)| *k).collect()
    }

    /// Invariant: a sub-map reflects later insertions inside its bounds and
    /// ignores those outside.
    fn live_window<B: Balance>() {
        let mut t = odd_tree::<B>();
        let mut v = t.sub_map_mut(3, true, 7, false);
        assert_eq!(collect(v.iter()), vec![3, 5]);
        v.backing_mut().insert(4, 40);
        assert_eq!(collect(v.iter()), vec![3, 4, 5]);
        v.backing_mut().insert(10, 100);
        v.backing_mut().insert(7, 71);
        assert_eq!(collect(v.iter()), vec![3, 4, 5]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.get(&7), None);
        assert_eq!(v.get(&4), Some(&40));
        assert_eq!(v.insert(8, 80), Err(MapError::KeyOutOfRange));
        assert_eq!(v.insert(6, 60), Ok(None));
        assert_eq!(v.remove(&9), None);
        assert_eq!(v.remove(&3), Some(30));
        assert_eq!(v.pop_last(), Some((6, 60)));
        drop(v);
        assert_eq!(
            t.keys().copied().collect::<Vec<_>>(),
            vec![1, 4, 5, 7, 9, 10]
        );
        t.assert_invariants();
    }

    #[test]
    fn live_window_red_black() {
        live_window::<RedBlack>();
    }

    #[test]
    fn live_window_avl() {
        live_window::<Avl>();
    }

    #[test]
    fn view_navigation_is_clamped() {
        let t: RbTreeMap<i32, i32> = odd_tree();
        let v = t.sub_map(2, false, 8, true);
        assert_eq!(v.first_key(), Some(&3));
        assert_eq!(v.last_key(), Some(&7));
        assert_eq!(v.lower_key(&3), None);
        assert_eq!(v.floor_key(&100), Some(&7));
        assert_eq!(v.ceiling_key(&-5), Some(&3));
        assert_eq!(v.higher_key(&7), None);
        assert_eq!(v.higher_entry(&3), Some((&5, &50)));
        assert!(v.in_range(&8));
        assert!(!v.contains_key(&9));
        assert_eq!(v.default_return_value(), &0);
        assert_eq!(format!("{v:?}"), "{3: 30, 5: 50, 7: 70}");
    }

    /// Invariant: a descending view mirrors navigation and iteration.
    #[test]
    fn descending_views() {
        let t: RbTreeMap<i32, i32> = odd_tree();
        let d = t.descending_map();
        assert!(d.is_descending());
        assert_eq!(collect(d.iter()), vec![9, 7, 5, 3, 1]);
        assert_eq!(d.first_key(), Some(&9));
        assert_eq!(d.higher_key(&5), Some(&3));
        assert_eq!(d.ceiling_key(&6), Some(&5));
        assert_eq!(d.floor_key(&6), Some(&7));
        assert_eq!(d.lower_key(&9), None);

        let head = d.head_map(5, false);
        assert_eq!(collect(head.iter()), vec![9, 7]);
        let tail = d.tail_map(5, true);
        assert_eq!(collect(tail.iter()), vec![5, 3, 1]);
        let sub = d.sub_map(8, true, 2, true);
        assert_eq!(collect(sub.iter()), vec![7, 5, 3]);
        assert_eq!(
            sub.descending_keys().copied().collect::<Vec<_>>(),
            vec![3, 5, 7]
        );
        assert_eq!(collect(sub.descending_map().iter()), vec![3, 5, 7]);
    }

    /// Invariant: nested windows intersect; they never widen the parent.
    #[test]
    fn nested_views_intersect() {
        let t: RbTreeMap<i32, i32> = (0..20).map(|k| (k, k)).collect();
        let outer = t.sub_map(5, true, 15, false);
        let inner = outer.sub_map(0, true, 8, true);
        assert_eq!(collect(inner.iter()), vec![5, 6, 7, 8]);
        let inner = outer.tail_map(12, false);
        assert_eq!(collect(inner.iter()), vec![13, 14]);
        let empty = outer.sub_map(16, true, 30, true);
        assert!(empty.is_empty());
        let inverted = t.sub_map(9, true, 3, true);
        assert!(inverted.is_empty());
        assert_eq!(inverted.first_entry(), None);
    }

    #[test]
    fn default_bounds_limit_head_and_tail() {
        let mut t: RbTreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
        t.set_default_min_value(Some(3));
        t.set_default_max_value(Some(6));
        assert_eq!(collect(t.head_map(5, true).iter()), vec![3, 4, 5]);
        assert_eq!(collect(t.tail_map(5, false).iter()), vec![6]);
        t.set_default_min_value(None);
        assert_eq!(collect(t.head_map(2, false).iter()), vec![0, 1]);
        assert_eq!(t.default_max_value(), Some(&6));
    }

    #[test]
    fn mutable_nested_view_clears_its_window() {
        let mut t: RbTreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
        {
            let mut v = t.tail_map_mut(4, true);
            let mut inner = v.head_map(6, true);
            if let Some(x) = inner.get_mut(&5) {
                *x = 500;
            }
            assert_eq!(inner.get_mut(&7), None);
            assert_eq!(inner.as_sub_map().get(&5), Some(&500));
            inner.clear();
            assert!(inner.is_empty());
            assert_eq!(v.first_key(), Some(&7));
            let mut d = v.descending_map();
            assert_eq!(d.pop_first(), Some((9, 9)));
        }
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 7, 8]);
        let mut d = t.descending_map_mut();
        assert_eq!(d.pop_last(), Some((0, 0)));
        t.assert_invariants();
    }

    #[test]
    fn views_implement_map_read() {
        let t: RbTreeMap<i32, i32> = odd_tree();
        let v = t.head_map(5, true);
        assert_eq!(MapRead::len(&v), 3);
        assert_eq!(v.get_or_default(&9), 0);
        assert_eq!(v.get_or_default(&3), 30);
        assert!(v.contains_value(&50));
        let snapshot = crate::hash_map::OpenHashMap::from_map(&v);
        assert_eq!(snapshot.len(), 3);
    }
}
