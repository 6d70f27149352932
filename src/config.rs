//! Construction-time configuration for the hash-based collections.

use crate::error::{CollectionError, Result};

/// Bucket count used when a table without an explicit capacity allocates.
pub const DEFAULT_CAPACITY: usize = 16;

/// Ratio of live entries to buckets above which a table rehashes.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Largest bucket count a table will grow to. Past this the threshold is
/// pinned to `usize::MAX` and chains simply get longer.
pub const MAX_CAPACITY: usize = 1 << (usize::BITS - 2);

/// Sizing parameters for a hash table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f32,
}

impl TableConfig {
    pub const fn new(initial_capacity: usize, load_factor: f32) -> Self {
        Self {
            initial_capacity,
            load_factor,
        }
    }

    /// A config whose table can take `len` entries without rehashing.
    pub fn for_len(len: usize, load_factor: f32) -> Self {
        let needed = (len as f64 / load_factor as f64).ceil() as usize;
        Self::new(needed.max(DEFAULT_CAPACITY), load_factor)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(CollectionError::illegal_argument(format!(
                "load factor must be finite and positive, got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }
}

/// Rounds a requested capacity up to the bucket count actually allocated.
pub(crate) fn table_size_for(cap: usize) -> usize {
    if cap >= MAX_CAPACITY {
        MAX_CAPACITY
    } else {
        cap.max(1).next_power_of_two()
    }
}

/// The order a linked map threads its entries in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkOrder {
    /// Entries stay where they were first inserted.
    #[default]
    Insertion,
    /// Reads and overwrites move an entry to the tail (least recently used first).
    Access,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_load_factors() {
        assert!(TableConfig::new(16, 0.0).validate().is_err());
        assert!(TableConfig::new(16, -1.0).validate().is_err());
        assert!(TableConfig::new(16, f32::NAN).validate().is_err());
        assert!(TableConfig::new(16, f32::INFINITY).validate().is_err());
        assert!(TableConfig::new(0, 0.5).validate().is_ok());
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn sizes_round_to_powers_of_two() {
        assert_eq!(table_size_for(0), 1);
        assert_eq!(table_size_for(1), 1);
        assert_eq!(table_size_for(8), 8);
        assert_eq!(table_size_for(9), 16);
        assert_eq!(table_size_for(usize::MAX), MAX_CAPACITY);
    }

    #[test]
    fn for_len_fits_without_rehash() {
        let cfg = TableConfig::for_len(100, 0.75);
        assert!(cfg.initial_capacity as f32 * cfg.load_factor >= 100.0);
        assert_eq!(TableConfig::for_len(1, 0.75).initial_capacity, DEFAULT_CAPACITY);
    }
}
