//! Hashing strategies: how a hash engine hashes and compares keys.
//!
//! Every hash engine is generic over a `HashStrategy`. The default strategy
//! defers to `K: Hash + Eq` through a `BuildHasher`; custom strategies allow
//! identity semantics or externally defined equivalence without changing the
//! table mechanics.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use std::sync::Arc;

/// Hash/equality pair used in place of `K: Hash + Eq`.
///
/// Implementations must be consistent: `equals(a, b)` implies
/// `hash(a) == hash(b)`.
pub trait HashStrategy<K: ?Sized> {
    fn hash(&self, key: &K) -> u64;
    fn equals(&self, a: &K, b: &K) -> bool;
}

/// `K: Hash + Eq` hashed through a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct DefaultStrategy<S = DefaultHashBuilder> {
    hasher: S,
}

impl<S> DefaultStrategy<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl<K, S> HashStrategy<K> for DefaultStrategy<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Pointer identity for shared keys: two keys are equal only when they are
/// the same allocation, regardless of `Eq` on the pointee.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityStrategy;

impl<T: ?Sized> HashStrategy<Arc<T>> for IdentityStrategy {
    #[inline]
    fn hash(&self, key: &Arc<T>) -> u64 {
        Arc::as_ptr(key) as *const () as usize as u64
    }

    #[inline]
    fn equals(&self, a: &Arc<T>, b: &Arc<T>) -> bool {
        Arc::ptr_eq(a, b)
    }
}

impl<'a, T: ?Sized> HashStrategy<&'a T> for IdentityStrategy {
    #[inline]
    fn hash(&self, key: &&'a T) -> u64 {
        *key as *const T as *const () as usize as u64
    }

    #[inline]
    fn equals(&self, a: &&'a T, b: &&'a T) -> bool {
        core::ptr::eq(*a as *const T as *const (), *b as *const T as *const ())
    }
}

/// Strategy assembled from two closures.
#[derive(Clone)]
pub struct FnStrategy<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnStrategy<H, E> {
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<K, H, E> HashStrategy<K> for FnStrategy<H, E>
where
    K: ?Sized,
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> u64 {
        (self.hash)(key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}

impl<H, E> core::fmt::Debug for FnStrategy<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnStrategy")
    }
}

/// Scrambles a strategy hash before masking so that weak hashes (identity,
/// small integers) still spread over the low bits.
#[inline]
pub(crate) fn spread(hash: u64) -> u64 {
    let h = hash.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^ (h >> 32)
}

/// Independent mix used to pick a shard, so shard selection and in-shard
/// slot selection do not correlate.
#[inline]
pub(crate) fn shard_spread(hash: u64) -> u64 {
    let h = (hash ^ (hash >> 29)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^ (h >> 31)
}
