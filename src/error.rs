//! Error taxonomy shared by every engine.
//!
//! Absent keys are not errors: lookups return `None` (or the default return
//! value through the `*_or_default` shims). `MapError` only reports contract
//! violations detected before any mutation, so a failed call always leaves
//! the map unchanged.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// Bulk key and value arrays have different lengths.
    #[error("key/value length mismatch: {keys} keys, {values} values")]
    LengthMismatch { keys: usize, values: usize },

    /// `offset + len` runs past the end of a bulk array.
    #[error("range {offset}..{offset}+{len} out of bounds for array of length {size}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("load factor must be in (0, 1], got {0}")]
    InvalidLoadFactor(f32),

    #[error("capacity overflow: cannot hold {requested} entries")]
    CapacityOverflow { requested: usize },

    #[error("shard count must be a non-zero power of two, got {0}")]
    InvalidShardCount(usize),

    /// A mutator was called on a read-only view.
    #[error("unsupported operation on unmodifiable view: {op}")]
    Unsupported { op: &'static str },

    /// A key was inserted through a sub-map view outside of its window.
    #[error("key out of range for sub-map view")]
    KeyOutOfRange,
}

impl MapError {
    pub(crate) fn unsupported(op: &'static str) -> Self {
        MapError::Unsupported { op }
    }

    /// Checks that `offset..offset + len` lies within both bulk arrays.
    pub(crate) fn check_bulk(
        keys: usize,
        values: usize,
        offset: usize,
        len: usize,
    ) -> Result<(), MapError> {
        let end = offset.checked_add(len);
        let size = keys.min(values);
        match end {
            Some(end) if end <= size => Ok(()),
            _ => Err(MapError::OutOfBounds { offset, len, size }),
        }
    }
}
