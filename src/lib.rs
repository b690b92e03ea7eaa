//! primmap: generic associative containers with default-return-value
//! semantics: an open-addressing hash map, a linked (ordered) hash map,
//! AVL and red-black tree maps with live sub-map views, a linear array map
//! and a sharded concurrent hash map.
//!
//! Internal Design:
//!
//! Summary
//! - One engine per container family, generic over key and value types.
//!   Hash engines take a `HashStrategy`, tree engines a `KeyComparator`.
//! - Layers:
//!   - `RawTable<K, V, S>`: power-of-two slot array with linear probing and
//!     backward-shift deletion. It reports every slot relocation to its
//!     caller so overlays can follow entries around.
//!   - `OpenHashMap`: public face of `RawTable`.
//!   - `LinkedHashMap`: `RawTable` plus a parallel prev/next link array
//!     giving insertion or access order.
//!   - `TreeMap<K, V, B, C>`: arena-backed binary search tree, balanced by
//!     `RedBlack` or `Avl`; `SubMap`/`SubMapMut` are live windows on it.
//!   - `ArrayMap`: parallel vectors, linear scan.
//!   - `ConcurrentHashMap`: `OpenHashMap` shards behind `RwLock`s.
//!   - `Unmodifiable`/`Synchronized`: wrappers over any engine.
//! - `MapRead`/`MapWrite` are the shared contract; compute-family methods
//!   and default-return-value shims are provided once on the traits.
//!
//! Constraints
//! - No tombstones: removal compacts the probe run it leaves, so probe
//!   lengths never degrade with churn.
//! - Each slot stores its hash; strategy hashing never runs after insertion
//!   (resize and backward shift reuse the stored hash).
//! - Lookups return `Option`. The default return value (DRV) is a shim for
//!   callers that want a sentinel instead; it never rewrites entries.
//! - Single-threaded engines are not internally synchronized.
//!
//! Errors
//! - `MapError` reports contract violations (bulk array bounds, invalid
//!   configuration, mutation of an unmodifiable view, insertion outside a
//!   sub-map window) before anything is changed. Absent keys are not errors.
//!
//! Logging
//! - Through the `log` facade: `trace!` on table resize, `debug!` on trim
//!   and on concurrent map construction. No logger is installed here.
//!
//! Reentrancy
//! - Compute-family callbacks of `ConcurrentHashMap` run under their shard's
//!   write lock. In debug builds a thread-local guard turns a callback that
//!   re-enters its own shard into a panic instead of a deadlock.

pub mod array_map;
pub mod concurrent;
pub mod config;
pub mod cursor;
pub mod error;
pub mod hash_map;
mod hash_map_proptest;
pub mod linked_hash_map;
pub mod map;
mod raw_table;
mod reentrancy;
pub mod strategy;
pub mod tree;
mod tree_proptest;
pub mod view;

// Public surface
pub use array_map::ArrayMap;
pub use concurrent::ConcurrentHashMap;
pub use config::{ConcurrentConfig, TableConfig};
pub use cursor::{CursorEntry, FastCursor};
pub use error::MapError;
pub use hash_map::OpenHashMap;
pub use linked_hash_map::LinkedHashMap;
pub use map::{MapRead, MapWrite};
pub use strategy::{DefaultStrategy, FnStrategy, HashStrategy, IdentityStrategy};
pub use tree::{
    Avl, AvlTreeMap, Balance, FnComparator, KeyComparator, Natural, RbTreeMap, RedBlack, Reverse,
    SubMap, SubMapMut, TreeMap,
};
pub use view::{Synchronized, Unmodifiable};
