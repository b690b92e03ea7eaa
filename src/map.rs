//! Engine traits: the surface every single-threaded map exposes.
//!
//! `MapRead` and `MapWrite` are the minimal contract a typed facade needs
//! from an engine. Lookups are `Option` based; the default return value
//! (DRV) shims (`get_or_default`, `put`, `remove_or_default`) and the
//! compute family are provided on top of them.
//!
//! DRV rules
//! - Every map owns a DRV, `V::default()` unless changed. Changing it never
//!   rewrites stored entries.
//! - `*_or_default` methods return the DRV where the `Option` methods would
//!   return `None`; use `contains_key` to tell "absent" from "stored value
//!   equal to the DRV".
//! - Compute-family callbacks that produce a value equal to the DRV remove
//!   the key (or leave it absent) instead of storing the DRV.

use crate::cursor::FastCursor;
use crate::error::MapError;
use crate::view::{Synchronized, Unmodifiable};

/// Read access to an associative container.
pub trait MapRead {
    type Key;
    type Value;
    type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    fn contains_value(&self, value: &Self::Value) -> bool
    where
        Self::Value: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    fn iter(&self) -> Self::Iter<'_>;

    fn default_return_value(&self) -> &Self::Value;

    /// The stored value, or the DRV when `key` is absent.
    fn get_or_default(&self, key: &Self::Key) -> Self::Value
    where
        Self::Value: Clone,
    {
        self.get(key)
            .unwrap_or_else(|| self.default_return_value())
            .clone()
    }

    /// The stored value, or `fallback` when `key` is absent.
    fn get_or(&self, key: &Self::Key, fallback: Self::Value) -> Self::Value
    where
        Self::Value: Clone,
    {
        self.get(key).cloned().unwrap_or(fallback)
    }

    /// Iteration through one recycled entry record; see `FastCursor`.
    fn fast_cursor(&self) -> FastCursor<Self::Key, Self::Value, Self::Iter<'_>>
    where
        Self::Key: Clone,
        Self::Value: Clone,
    {
        FastCursor::new(self.iter())
    }

    /// Read-only view whose mutators all fail with `MapError::Unsupported`.
    fn unmodifiable(&self) -> Unmodifiable<&Self>
    where
        Self: Sized,
    {
        Unmodifiable::new(self)
    }
}

/// Mutation of an associative container.
pub trait MapWrite: MapRead {
    /// Stores `value`, returning the previous value if `key` was present.
    fn insert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn get_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    fn clear(&mut self);

    fn set_default_return_value(&mut self, value: Self::Value);

    /// `insert` with DRV semantics: the previous value, or the DRV.
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Self::Value
    where
        Self::Value: Clone,
    {
        match self.insert(key, value) {
            Some(old) => old,
            None => self.default_return_value().clone(),
        }
    }

    /// `remove` with DRV semantics: the removed value, or the DRV.
    fn remove_or_default(&mut self, key: &Self::Key) -> Self::Value
    where
        Self::Value: Clone,
    {
        match self.remove(key) {
            Some(old) => old,
            None => self.default_return_value().clone(),
        }
    }

    /// Inserts only when `key` is absent. Returns the existing value otherwise.
    fn put_if_absent(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>
    where
        Self::Value: Clone,
    {
        if let Some(existing) = self.get(&key) {
            return Some(existing.clone());
        }
        self.insert(key, value);
        None
    }

    /// Overwrites the value of a present key; absent keys are left absent.
    fn replace(&mut self, key: &Self::Key, value: Self::Value) -> Option<Self::Value> {
        self.get_mut(key).map(|slot| core::mem::replace(slot, value))
    }

    /// Overwrites the value only if it currently equals `old`.
    fn replace_if(&mut self, key: &Self::Key, old: &Self::Value, new: Self::Value) -> bool
    where
        Self::Value: PartialEq,
    {
        match self.get_mut(key) {
            Some(slot) if *slot == *old => {
                *slot = new;
                true
            }
            _ => false,
        }
    }

    /// Removes the entry only if its value equals `value`.
    fn remove_if(&mut self, key: &Self::Key, value: &Self::Value) -> bool
    where
        Self::Value: PartialEq,
    {
        if self.get(key) == Some(value) {
            self.remove(key);
            true
        } else {
            false
        }
    }

    /// Returns the present value, or stores and returns `f(key)`.
    /// A result equal to the DRV is returned but not stored.
    fn compute_if_absent<F>(&mut self, key: Self::Key, f: F) -> Self::Value
    where
        Self::Value: Clone + PartialEq,
        F: FnOnce(&Self::Key) -> Self::Value,
    {
        if let Some(existing) = self.get(&key) {
            return existing.clone();
        }
        let value = f(&key);
        if value != *self.default_return_value() {
            self.insert(key, value.clone());
        }
        value
    }

    /// Recomputes a present value. Returns the DRV without calling `f` when
    /// `key` is absent; a result equal to the DRV removes the key.
    fn compute_if_present<F>(&mut self, key: &Self::Key, f: F) -> Self::Value
    where
        Self::Value: Clone + PartialEq,
        F: FnOnce(&Self::Key, &Self::Value) -> Self::Value,
    {
        let drv = self.default_return_value().clone();
        let new = match self.get_mut(key) {
            None => return drv,
            Some(slot) => {
                let new = f(key, slot);
                if new != drv {
                    *slot = new.clone();
                    return new;
                }
                new
            }
        };
        self.remove(key);
        new
    }

    /// Computes a value from the current one (`None` when absent). A result
    /// equal to the DRV removes the key.
    fn compute<F>(&mut self, key: Self::Key, f: F) -> Self::Value
    where
        Self::Value: Clone + PartialEq,
        F: FnOnce(&Self::Key, Option<&Self::Value>) -> Self::Value,
    {
        let new = f(&key, self.get(&key));
        if new == *self.default_return_value() {
            self.remove(&key);
        } else {
            self.insert(key, new.clone());
        }
        new
    }

    /// Stores `value` when absent, otherwise `f(old, value)`. A result equal
    /// to the DRV removes the key.
    fn merge<F>(&mut self, key: Self::Key, value: Self::Value, f: F) -> Self::Value
    where
        Self::Value: Clone + PartialEq,
        F: FnOnce(&Self::Value, Self::Value) -> Self::Value,
    {
        let new = match self.get(&key) {
            Some(old) => f(old, value),
            None => value,
        };
        if new == *self.default_return_value() {
            self.remove(&key);
        } else {
            self.insert(key, new.clone());
        }
        new
    }

    /// Inserts `keys[offset..offset + len]` paired with the same range of
    /// `values`. The range is validated before anything is inserted.
    fn put_all(
        &mut self,
        keys: &[Self::Key],
        values: &[Self::Value],
        offset: usize,
        len: usize,
    ) -> Result<(), MapError>
    where
        Self::Key: Clone,
        Self::Value: Clone,
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

    /// Copies every entry of `other` into this map.
    fn put_all_from<M>(&mut self, other: &M)
    where
        M: MapRead<Key = Self::Key, Value = Self::Value>,
        Self::Key: Clone,
        Self::Value: Clone,
    {
        for (k, v) in other.iter() {
            self.insert(k.clone(), v.clone());
        }
    }

    /// Wraps the map behind a single lock; see `Synchronized`.
    fn synchronize(self) -> Synchronized<Self>
    where
        Self: Sized,
    {
        Synchronized::new(self)
    }
}

impl<'m, M: MapRead> MapRead for &'m M {
    type Key = M::Key;
    type Value = M::Value;
    type Iter<'a> = M::Iter<'a>
    where
        Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn get(&self, key: &M::Key) -> Option<&M::Value> {
        (**self).get(key)
    }

    #[inline]
    fn contains_key(&self, key: &M::Key) -> bool {
        (**self).contains_key(key)
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        (**self).iter()
    }

    #[inline]
    fn default_return_value(&self) -> &M::Value {
        (**self).default_return_value()
    }
}

/// Validates the parallel arrays handed to a bulk constructor.
pub(crate) fn check_arrays<K, V>(keys: &[K], values: &[V]) -> Result<(), MapError> {
    if keys.len() != values.len() {
        return Err(MapError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    Ok(())
}
