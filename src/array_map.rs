//! ArrayMap: parallel key and value vectors searched linearly.
//!
//! Meant for maps that stay small; a scan over a few contiguous keys beats
//! hashing or tree descent. Keys need only `PartialEq`. Iteration follows
//! insertion order and removal shifts later entries down to keep it.

use crate::error::MapError;
use crate::map::{check_arrays, MapRead, MapWrite};
use core::fmt;
use core::iter::FusedIterator;

pub struct ArrayMap<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    drv: V,
}

impl<K, V> ArrayMap<K, V>
where
    K: PartialEq,
    V: Default,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            drv: V::default(),
        }
    }

    /// Builds a map from parallel arrays. Later duplicates overwrite the
    /// value but keep the first position.
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

impl<K, V> Default for ArrayMap<K, V>
where
    K: PartialEq,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V> ArrayMap<K, V> {
    #[inline]
    fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|i| &self.values[i])
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.position(key)?;
        Some(&mut self.values[i])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    /// Overwrites in place when present, otherwise appends.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.position(&key) {
            Some(i) => Some(core::mem::replace(&mut self.values[i], value)),
            None => {
                self.keys.push(key);
                self.values.push(value);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.position(key)?;
        Some((self.keys.remove(i), self.values.remove(i)))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    /// Releases spare vector capacity.
    pub fn trim(&mut self) {
        self.keys.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut write = 0;
        for read in 0..self.keys.len() {
            if keep(&self.keys[read], &mut self.values[read]) {
                self.keys.swap(write, read);
                self.values.swap(write, read);
                write += 1;
            }
        }
        self.keys.truncate(write);
        self.values.truncate(write);
    }

    pub fn default_return_value(&self) -> &V {
        &self.drv
    }

    pub fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.keys.iter().zip(self.values.iter()),
        }
    }

    pub fn keys(&self) -> core::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn values(&self) -> core::slice::Iter<'_, V> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> core::slice::IterMut<'_, V> {
        self.values.iter_mut()
    }
}

impl<K: Clone, V: Clone> Clone for ArrayMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            drv: self.drv.clone(),
        }
    }
}

impl<K, V> fmt::Debug for ArrayMap<K, V>
where
    K: PartialEq + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Same entries regardless of position.
impl<K: PartialEq, V: PartialEq> PartialEq for ArrayMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: PartialEq, V: Default> FromIterator<(K, V)> for ArrayMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: PartialEq, V> Extend<(K, V)> for ArrayMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: PartialEq, V> IntoIterator for &'a ArrayMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for ArrayMap<K, V> {
    type Item = (K, V);
    type IntoIter = core::iter::Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

impl<K: PartialEq, V> MapRead for ArrayMap<K, V> {
    type Key = K;
    type Value = V;
    type Iter<'a> = Iter<'a, K, V>
    where
        Self: 'a;

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        ArrayMap::get(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        ArrayMap::iter(self)
    }

    fn default_return_value(&self) -> &V {
        &self.drv
    }
}

impl<K: PartialEq, V> MapWrite for ArrayMap<K, V> {
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        ArrayMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ArrayMap::remove(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        ArrayMap::get_mut(self, key)
    }

    fn clear(&mut self) {
        ArrayMap::clear(self);
    }

    fn set_default_return_value(&mut self, value: V) {
        self.drv = value;
    }
}

/// Entries in insertion order.
pub struct Iter<'a, K, V> {
    inner: core::iter::Zip<core::slice::Iter<'a, K>, core::slice::Iter<'a, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: removal shifts later entries down, keeping insertion order.
    #[test]
    fn removal_preserves_order() {
        let mut m: ArrayMap<&str, i32> = ArrayMap::new();
        for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
            assert_eq!(m.insert(k, i as i32), None);
        }
        assert_eq!(m.insert("b", 10), Some(1));
        assert_eq!(m.remove(&"a"), Some(0));
        assert_eq!(m.remove(&"zz"), None);
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec!["b", "c", "d"]);
        m.insert("a", 7);
        assert_eq!(
            m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            vec![("b", 10), ("c", 2), ("d", 3), ("a", 7)]
        );
        assert_eq!(m.iter().next_back(), Some((&"a", &7)));
    }

    /// Keys without `Hash` or `Ord` still work.
    #[test]
    fn float_keys() {
        let mut m: ArrayMap<f64, u8> = ArrayMap::new();
        m.insert(0.5, 1);
        m.insert(1.5, 2);
        assert_eq!(m.get(&1.5), Some(&2));
        assert_eq!(m.get_or_default(&2.5), 0);
        m.set_default_return_value(9);
        assert_eq!(m.put(3.0, 4), 9);
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn retain_keeps_relative_order() {
        let mut m: ArrayMap<u32, u32> = (0..10).map(|k| (k, k)).collect();
        m.retain(|k, v| {
            *v += 1;
            k % 3 != 0
        });
        assert_eq!(
            m.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 4, 5, 7, 8]
        );
        assert_eq!(m.get(&4), Some(&5));
        m.trim();
        assert!(m.capacity() >= m.len());
    }

    #[test]
    fn bulk_copy_and_equality() {
        let m = ArrayMap::from_arrays(&[1, 2, 1], &['a', 'b', 'c']).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&1), Some(&'c'));
        assert_eq!(
            ArrayMap::<u8, u8>::from_arrays(&[1, 2], &[1]),
            Err(MapError::LengthMismatch { keys: 2, values: 1 })
        );
        let reordered: ArrayMap<i32, char> = [(2, 'b'), (1, 'c')].into_iter().collect();
        assert_eq!(m, reordered);
        assert_eq!(m.clone(), m);
        assert_eq!(format!("{m:?}"), "{1: 'c', 2: 'b'}");
        assert_eq!(m.into_iter().collect::<Vec<_>>(), vec![(1, 'c'), (2, 'b')]);
    }
}
