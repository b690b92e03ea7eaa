//! Table sizing configuration for the hash engines.

use crate::error::MapError;

pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Smallest table length ever allocated.
pub(crate) const MIN_TABLE_LEN: usize = 2;

/// Sizing for one open-addressing table.
///
/// `initial_capacity` is the number of entries the table must hold before
/// its first resize, not the slot count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), MapError> {
        check_load_factor(self.load_factor)?;
        table_len(self.initial_capacity, self.load_factor).map(|_| ())
    }
}

/// Sizing for the sharded engine. Each shard is a table sized by `table`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConcurrentConfig {
    pub shards: usize,
    pub table: TableConfig,
}

impl Default for ConcurrentConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            shards: (cpus * 4).next_power_of_two(),
            table: TableConfig::default(),
        }
    }
}

impl ConcurrentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Total expected entries, spread evenly over the shards.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.table.initial_capacity = capacity.div_ceil(self.shards.max(1));
        self
    }

    pub fn load_factor(mut self, load_factor: f32) -> Self {
        self.table.load_factor = load_factor;
        self
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.shards == 0 || !self.shards.is_power_of_two() {
            return Err(MapError::InvalidShardCount(self.shards));
        }
        self.table.validate()
    }
}

pub(crate) fn check_load_factor(f: f32) -> Result<(), MapError> {
    if f > 0.0 && f <= 1.0 {
        Ok(())
    } else {
        Err(MapError::InvalidLoadFactor(f))
    }
}

/// Table length able to hold `expected` entries at load factor `f`:
/// the next power of two of `ceil(expected / f)`, never below `MIN_TABLE_LEN`.
pub(crate) fn table_len(expected: usize, f: f32) -> Result<usize, MapError> {
    let wanted = (expected as f64 / f as f64).ceil();
    if !wanted.is_finite() || wanted > (usize::MAX / 2) as f64 {
        return Err(MapError::CapacityOverflow {
            requested: expected,
        });
    }
    let wanted = (wanted as usize).max(MIN_TABLE_LEN);
    wanted
        .checked_next_power_of_two()
        .ok_or(MapError::CapacityOverflow {
            requested: expected,
        })
}

/// Maximum live entries before a table of length `n` must grow.
/// Always leaves at least one empty slot so probes terminate.
pub(crate) fn max_fill(n: usize, f: f32) -> usize {
    let fill = (n as f64 * f as f64).ceil() as usize;
    fill.min(n - 1)
}
