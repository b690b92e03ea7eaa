//! Wrappers that change how a map may be used, not what it stores.
//!
//! - `Unmodifiable<M>` reads through to `M` and rejects every mutator with
//!   `MapError::Unsupported`, leaving the map untouched.
//! - `Synchronized<M>` puts `M` behind one `parking_lot::Mutex` shared by all
//!   clones of the wrapper. Each method holds the lock for its whole body;
//!   `with_lock` holds it across a caller-defined sequence.

use crate::error::MapError;
use crate::map::{MapRead, MapWrite};
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Read-only face of a map.
#[derive(Clone, Copy)]
pub struct Unmodifiable<M> {
    inner: M,
}

impl<M> Unmodifiable<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: MapRead> MapRead for Unmodifiable<M> {
    type Key = M::Key;
    type Value = M::Value;
    type Iter<'a> = M::Iter<'a>
    where
        Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    fn get(&self, key: &M::Key) -> Option<&M::Value> {
        self.inner.get(key)
    }

    #[inline]
    fn contains_key(&self, key: &M::Key) -> bool {
        self.inner.contains_key(key)
    }

    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.inner.iter()
    }

    #[inline]
    fn default_return_value(&self) -> &M::Value {
        self.inner.default_return_value()
    }
}

/// Every mutator fails without side effects.
impl<M: MapRead> Unmodifiable<M> {
    pub fn insert(&mut self, _key: M::Key, _value: M::Value) -> Result<Option<M::Value>, MapError> {
        Err(MapError::unsupported("insert"))
    }

    pub fn put(&mut self, _key: M::Key, _value: M::Value) -> Result<M::Value, MapError> {
        Err(MapError::unsupported("put"))
    }

    pub fn remove(&mut self, _key: &M::Key) -> Result<Option<M::Value>, MapError> {
        Err(MapError::unsupported("remove"))
    }

    pub fn remove_or_default(&mut self, _key: &M::Key) -> Result<M::Value, MapError> {
        Err(MapError::unsupported("remove_or_default"))
    }

    pub fn get_mut(&mut self, _key: &M::Key) -> Result<&mut M::Value, MapError> {
        Err(MapError::unsupported("get_mut"))
    }

    pub fn clear(&mut self) -> Result<(), MapError> {
        Err(MapError::unsupported("clear"))
    }

    pub fn put_if_absent(&mut self, _key: M::Key, _value: M::Value) -> Result<Option<M::Value>, MapError> {
        Err(MapError::unsupported("put_if_absent"))
    }

    pub fn replace(&mut self, _key: &M::Key, _value: M::Value) -> Result<Option<M::Value>, MapError> {
        Err(MapError::unsupported("replace"))
    }

    pub fn replace_if(&mut self, _key: &M::Key, _old: &M::Value, _new: M::Value) -> Result<bool, MapError> {
        Err(MapError::unsupported("replace_if"))
    }

    pub fn remove_if(&mut self, _key: &M::Key, _value: &M::Value) -> Result<bool, MapError> {
        Err(MapError::unsupported("remove_if"))
    }

    pub fn compute_if_absent<F>(&mut self, _key: M::Key, _f: F) -> Result<M::Value, MapError>
    where
        F: FnOnce(&M::Key) -> M::Value,
    {
        Err(MapError::unsupported("compute_if_absent"))
    }

    pub fn compute_if_present<F>(&mut self, _key: &M::Key, _f: F) -> Result<M::Value, MapError>
    where
        F: FnOnce(&M::Key, &M::Value) -> M::Value,
    {
        Err(MapError::unsupported("compute_if_present"))
    }

    pub fn compute<F>(&mut self, _key: M::Key, _f: F) -> Result<M::Value, MapError>
    where
        F: FnOnce(&M::Key, Option<&M::Value>) -> M::Value,
    {
        Err(MapError::unsupported("compute"))
    }

    pub fn merge<F>(&mut self, _key: M::Key, _value: M::Value, _f: F) -> Result<M::Value, MapError>
    where
        F: FnOnce(&M::Value, M::Value) -> M::Value,
    {
        Err(MapError::unsupported("merge"))
    }

    pub fn put_all(
        &mut self,
        _keys: &[M::Key],
        _values: &[M::Value],
        _offset: usize,
        _len: usize,
    ) -> Result<(), MapError> {
        Err(MapError::unsupported("put_all"))
    }

    pub fn set_default_return_value(&mut self, _value: M::Value) -> Result<(), MapError> {
        Err(MapError::unsupported("set_default_return_value"))
    }
}

impl<M> fmt::Debug for Unmodifiable<M>
where
    M: MapRead,
    M::Key: fmt::Debug,
    M::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

/// A map behind a single shared lock.
pub struct Synchronized<M> {
    shared: Arc<Mutex<M>>,
}

impl<M> Clone for Synchronized<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M> Synchronized<M> {
    /// Wraps `map` behind a fresh lock.
    pub fn new(map: M) -> Self {
        Self::with_mutex(Arc::new(Mutex::new(map)))
    }

    /// Uses a caller-visible lock, so code outside the wrapper can serialize
    /// with it.
    pub fn with_mutex(shared: Arc<Mutex<M>>) -> Self {
        Self { shared }
    }

    pub fn mutex(&self) -> &Arc<Mutex<M>> {
        &self.shared
    }

    /// Runs `f` with the lock held for its whole duration.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.shared.lock())
    }

    /// The wrapped map if this is the last handle to it.
    pub fn try_into_inner(self) -> Result<M, Self> {
        Arc::try_unwrap(self.shared)
            .map(Mutex::into_inner)
            .map_err(Self::with_mutex)
    }
}

impl<M: MapWrite> Synchronized<M> {
    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    pub fn get(&self, key: &M::Key) -> Option<M::Value>
    where
        M::Value: Clone,
    {
        self.shared.lock().get(key).cloned()
    }

    pub fn get_or_default(&self, key: &M::Key) -> M::Value
    where
        M::Value: Clone,
    {
        self.shared.lock().get_or_default(key)
    }

    pub fn contains_key(&self, key: &M::Key) -> bool {
        self.shared.lock().contains_key(key)
    }

    pub fn contains_value(&self, value: &M::Value) -> bool
    where
        M::Value: PartialEq,
    {
        self.shared.lock().contains_value(value)
    }

    pub fn insert(&self, key: M::Key, value: M::Value) -> Option<M::Value> {
        self.shared.lock().insert(key, value)
    }

    pub fn put(&self, key: M::Key, value: M::Value) -> M::Value
    where
        M::Value: Clone,
    {
        self.shared.lock().put(key, value)
    }

    pub fn remove(&self, key: &M::Key) -> Option<M::Value> {
        self.shared.lock().remove(key)
    }

    pub fn remove_or_default(&self, key: &M::Key) -> M::Value
    where
        M::Value: Clone,
    {
        self.shared.lock().remove_or_default(key)
    }

    pub fn put_if_absent(&self, key: M::Key, value: M::Value) -> Option<M::Value>
    where
        M::Value: Clone,
    {
        self.shared.lock().put_if_absent(key, value)
    }

    pub fn replace(&self, key: &M::Key, value: M::Value) -> Option<M::Value> {
        self.shared.lock().replace(key, value)
    }

    pub fn replace_if(&self, key: &M::Key, old: &M::Value, new: M::Value) -> bool
    where
        M::Value: PartialEq,
    {
        self.shared.lock().replace_if(key, old, new)
    }

    pub fn remove_if(&self, key: &M::Key, value: &M::Value) -> bool
    where
        M::Value: PartialEq,
    {
        self.shared.lock().remove_if(key, value)
    }

    pub fn compute_if_absent<F>(&self, key: M::Key, f: F) -> M::Value
    where
        M::Value: Clone + PartialEq,
        F: FnOnce(&M::Key) -> M::Value,
    {
        self.shared.lock().compute_if_absent(key, f)
    }

    pub fn compute_if_present<F>(&self, key: &M::Key, f: F) -> M::Value
    where
        M::Value: Clone + PartialEq,
        F: FnOnce(&M::Key, &M::Value) -> M::Value,
    {
        self.shared.lock().compute_if_present(key, f)
    }

    pub fn compute<F>(&self, key: M::Key, f: F) -> M::Value
    where
        M::Value: Clone + PartialEq,
        F: FnOnce(&M::Key, Option<&M::Value>) -> M::Value,
    {
        self.shared.lock().compute(key, f)
    }

    pub fn merge<F>(&self, key: M::Key, value: M::Value, f: F) -> M::Value
    where
        M::Value: Clone + PartialEq,
        F: FnOnce(&M::Value, M::Value) -> M::Value,
    {
        self.shared.lock().merge(key, value, f)
    }

    /// The whole batch is inserted under one lock acquisition.
    pub fn put_all(
        &self,
        keys: &[M::Key],
        values: &[M::Value],
        offset: usize,
        len: usize,
    ) -> Result<(), MapError>
    where
        M::Key: Clone,
        M::Value: Clone,
    {
        self.shared.lock().put_all(keys, values, offset, len)
    }

    pub fn clear(&self) {
        self.shared.lock().clear();
    }

    pub fn default_return_value(&self) -> M::Value
    where
        M::Value: Clone,
    {
        self.shared.lock().default_return_value().clone()
    }

    pub fn set_default_return_value(&self, value: M::Value) {
        self.shared.lock().set_default_return_value(value);
    }
}

impl<M: fmt::Debug> fmt::Debug for Synchronized<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.try_lock() {
            Some(map) => f.debug_tuple("Synchronized").field(&*map).finish(),
            None => f.write_str("Synchronized(<locked>)"),
        }
    }
}
