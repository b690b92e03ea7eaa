//! RawTable: open-addressing slot array shared by the hash engines.
//!
//! Layout
//! - `slots[i]` is `None` when vacant; occupancy never depends on a key value.
//! - Each bucket stores the strategy hash computed at insertion. Probing,
//!   resizing and backward shifting all use the stored hash, so the strategy
//!   only runs on the key being looked up.
//! - Linear probing from `spread(hash) & mask`.
//!
//! Deletion is backward-shift: the run after a vacated slot is compacted
//! toward its home positions, so no tombstones exist and every key stays
//! reachable from its home slot. Relocations are reported to the caller so
//! an overlay (the linked map) can patch its side arrays.

use crate::config::{self, TableConfig};
use crate::error::MapError;
use crate::strategy::{spread, HashStrategy};

#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

#[derive(Clone)]
pub(crate) struct RawTable<K, V, S> {
    slots: Box<[Option<Bucket<K, V>>]>,
    len: usize,
    mask: usize,
    max_fill: usize,
    // Table length chosen at construction; removals never shrink below it.
    min_len: usize,
    load_factor: f32,
    strategy: S,
}

fn vacant_slots<K, V>(n: usize) -> Box<[Option<Bucket<K, V>>]> {
    (0..n).map(|_| None).collect()
}

impl<K, V, S> RawTable<K, V, S>
where
    S: HashStrategy<K>,
{
    pub(crate) fn with_config(cfg: TableConfig, strategy: S) -> Result<Self, MapError> {
        cfg.validate()?;
        let n = config::table_len(cfg.initial_capacity, cfg.load_factor)?;
        Ok(Self::with_table_len(n, cfg.load_factor, strategy))
    }

    /// Table sized for `capacity` entries at the default load factor.
    ///
    /// # Panics
    /// Panics with "capacity overflow" when the table length does not fit in
    /// `usize`, as `Vec::with_capacity` does.
    pub(crate) fn with_capacity(capacity: usize, strategy: S) -> Self {
        match config::table_len(capacity, config::DEFAULT_LOAD_FACTOR) {
            Ok(n) => Self::with_table_len(n, config::DEFAULT_LOAD_FACTOR, strategy),
            Err(_) => panic!("capacity overflow"),
        }
    }

    fn with_table_len(n: usize, load_factor: f32, strategy: S) -> Self {
        debug_assert!(n.is_power_of_two());
        Self {
            slots: vacant_slots(n),
            len: 0,
            mask: n - 1,
            max_fill: config::max_fill(n, load_factor),
            min_len: n,
            load_factor,
            strategy,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Entries the table holds before the next resize.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.max_fill
    }

    #[inline]
    pub(crate) fn table_len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    #[inline]
    pub(crate) fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub(crate) fn make_hash(&self, key: &K) -> u64 {
        self.strategy.hash(key)
    }

    #[inline]
    fn home(&self, hash: u64) -> usize {
        spread(hash) as usize & self.mask
    }

    /// Index of the slot holding `key`, if present.
    pub(crate) fn find(&self, hash: u64, key: &K) -> Option<usize> {
        self.find_slot(hash, key).ok()
    }

    /// `Ok(index)` of the slot holding `key`, or `Err(index)` of the vacant
    /// slot where it would be inserted.
    pub(crate) fn find_slot(&self, hash: u64, key: &K) -> Result<usize, usize> {
        let mut i = self.home(hash);
        loop {
            match &self.slots[i] {
                None => return Err(i),
                Some(b) if b.hash == hash && self.strategy.equals(&b.key, key) => return Ok(i),
                Some(_) => i = (i + 1) & self.mask,
            }
        }
    }

    #[inline]
    pub(crate) fn bucket(&self, i: usize) -> Option<&Bucket<K, V>> {
        self.slots.get(i).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self, i: usize) -> Option<&mut Bucket<K, V>> {
        self.slots.get_mut(i).and_then(Option::as_mut)
    }

    pub(crate) fn slots(&self) -> &[Option<Bucket<K, V>>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Bucket<K, V>>] {
        &mut self.slots
    }

    /// Fills the vacant slot `i` returned by `find_slot`. The caller must
    /// follow up with `needs_grow`/`grow`.
    pub(crate) fn insert_vacant(&mut self, i: usize, hash: u64, key: K, value: V) {
        debug_assert!(self.slots[i].is_none(), "insert into occupied slot");
        self.slots[i] = Some(Bucket { hash, key, value });
        self.len += 1;
    }

    #[inline]
    pub(crate) fn needs_grow(&self) -> bool {
        self.len > self.max_fill
    }

    /// Grows to the smallest table keeping `len` within the load factor.
    pub(crate) fn grow(&mut self, moved: impl FnMut(usize, usize)) {
        let n = match config::table_len(self.len, self.load_factor) {
            Ok(n) => n.max(self.slots.len() * 2),
            Err(_) => panic!("capacity overflow"),
        };
        self.resize(n, moved);
    }

    /// Halves the table after removals left it mostly empty.
    pub(crate) fn maybe_shrink(&mut self, moved: impl FnMut(usize, usize)) -> bool {
        let n = self.slots.len();
        if n > self.min_len && n > config::MIN_TABLE_LEN && self.len < self.max_fill / 4 {
            self.resize(n / 2, moved);
            true
        } else {
            false
        }
    }

    /// Shrinks to the smallest table holding the current entries. Returns
    /// whether a rehash happened.
    pub(crate) fn trim(&mut self, moved: impl FnMut(usize, usize)) -> bool {
        let n = match config::table_len(self.len, self.load_factor) {
            Ok(n) => n,
            Err(_) => return false,
        };
        if n >= self.slots.len() {
            return false;
        }
        log::debug!("trim: {} -> {} slots for {} entries", self.slots.len(), n, self.len);
        self.resize(n, moved);
        self.min_len = n;
        true
    }

    /// Makes room for `additional` more entries without further resizing.
    pub(crate) fn reserve(
        &mut self,
        additional: usize,
        moved: impl FnMut(usize, usize),
    ) -> Result<(), MapError> {
        let wanted = self
            .len
            .checked_add(additional)
            .ok_or(MapError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        let n = config::table_len(wanted, self.load_factor)?;
        if n > self.slots.len() {
            self.resize(n, moved);
        }
        Ok(())
    }

    /// Rehashes every live bucket into a table of length `n`, reporting each
    /// `(old_index, new_index)` pair in old-index order.
    pub(crate) fn resize(&mut self, n: usize, mut moved: impl FnMut(usize, usize)) {
        debug_assert!(n.is_power_of_two() && n > self.len);
        log::trace!(
            "resize: {} -> {} slots, {} live entries",
            self.slots.len(),
            n,
            self.len
        );
        let old = core::mem::replace(&mut self.slots, vacant_slots(n));
        self.mask = n - 1;
        self.max_fill = config::max_fill(n, self.load_factor);
        for (from, slot) in old.into_vec().into_iter().enumerate() {
            if let Some(b) = slot {
                let mut to = self.home(b.hash);
                while self.slots[to].is_some() {
                    to = (to + 1) & self.mask;
                }
                self.slots[to] = Some(b);
                moved(from, to);
            }
        }
    }

    /// Vacates slot `i` and closes the gap by backward shifting. Each
    /// relocation is reported as `(from, to)` in the order it happens.
    pub(crate) fn take(
        &mut self,
        i: usize,
        mut relocated: impl FnMut(usize, usize),
    ) -> Option<Bucket<K, V>> {
        let bucket = self.slots[i].take()?;
        self.len -= 1;

        let mut gap = i;
        let mut j = (i + 1) & self.mask;
        loop {
            let home = match &self.slots[j] {
                None => break,
                Some(b) => self.home(b.hash),
            };
            // The entry at `j` may fill the gap unless its home lies
            // cyclically in (gap, j].
            let from_home = j.wrapping_sub(home) & self.mask;
            let from_gap = j.wrapping_sub(gap) & self.mask;
            if from_home >= from_gap {
                self.slots[gap] = self.slots[j].take();
                relocated(j, gap);
                gap = j;
            }
            j = (j + 1) & self.mask;
        }
        Some(bucket)
    }

    pub(crate) fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }

    /// Keeps entries for which `keep` returns true, rebuilding the table in
    /// place. Kept entries are reported as `(old_index, new_index)`.
    pub(crate) fn retain(
        &mut self,
        mut keep: impl FnMut(&K, &mut V) -> bool,
        mut moved: impl FnMut(usize, usize),
    ) {
        let n = self.slots.len();
        let old = core::mem::replace(&mut self.slots, vacant_slots(n));
        self.len = 0;
        for (from, slot) in old.into_vec().into_iter().enumerate() {
            if let Some(mut b) = slot {
                if keep(&b.key, &mut b.value) {
                    let mut to = self.home(b.hash);
                    while self.slots[to].is_some() {
                        to = (to + 1) & self.mask;
                    }
                    self.slots[to] = Some(b);
                    self.len += 1;
                    moved(from, to);
                }
            }
        }
    }

    /// Empties the table, keeping its length, and hands back the old slots.
    pub(crate) fn take_all(&mut self) -> Vec<Option<Bucket<K, V>>> {
        self.len = 0;
        core::mem::replace(&mut self.slots, vacant_slots(self.mask + 1)).into_vec()
    }

    /// Checks that every live key is reachable by probing from its home slot
    /// and that the size bookkeeping matches the slots.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(live, self.len, "len must match occupied slots");
        assert!(self.len <= self.max_fill, "len exceeds max fill");
        assert!(live < self.slots.len(), "table must keep a vacant slot");
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(b) = slot {
                assert_eq!(b.hash, self.strategy.hash(&b.key), "stale stored hash");
                let mut p = self.home(b.hash);
                while p != i {
                    assert!(
                        self.slots[p].is_some(),
                        "slot {i} unreachable: vacant slot {p} on its probe path"
                    );
                    p = (p + 1) & self.mask;
                }
            }
        }
    }
}
