//! Key orderings for `TreeMap`.

use core::cmp::Ordering;

/// Total order over keys. Two keys comparing `Equal` are the same key.
pub trait KeyComparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own `Ord`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Natural;

impl<K: ?Sized + Ord> KeyComparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
#[derive(Copy, Clone, Debug, Default)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: KeyComparator<K>> KeyComparator<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Comparator backed by a closure.
#[derive(Clone)]
pub struct FnComparator<F>(F);

impl<F> FnComparator<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<K: ?Sized, F> KeyComparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> core::fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnComparator")
    }
}
