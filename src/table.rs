use std::collections::TryReserveError;

/// Width of a single counter.
pub const COUNTER_BITS: u32 = 4;
/// Mask of one counter once shifted down to bit 0.
pub const COUNTER_MASK: u64 = 0xF;
/// Saturation point of a counter.
pub const MAX_COUNT: u8 = 15;
/// Each u64 block holds 16 counters.
pub const COUNTERS_PER_BLOCK: usize = 64 / COUNTER_BITS as usize;
/// Keeps the low 3 bits of every counter after a right shift by one, so the
/// low bit of a counter never lands in the top bit of its neighbour.
pub const RESET_MASK: u64 = 0x7777_7777_7777_7777;

/// Flat array of 4-bit saturating counters, 16 to a block.
///
/// Blocks are split into four 16 bit sub-blocks starting at 0, 16, 32 and 48,
/// each holding four counters. Callers address a counter by block index and
/// bit offset, the offset being a multiple of 4 in [0, 60].
#[derive(Clone, Debug)]
pub struct CounterTable {
    blocks: Vec<u64>,
}

impl CounterTable {
    /// `len` must be a power of two. Fails instead of aborting when the
    /// allocator cannot provide `len` blocks.
    pub fn new(len: usize) -> Result<CounterTable, TryReserveError> {
        debug_assert!(len.is_power_of_two());
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(len)?;
        blocks.resize(len, 0);
        Ok(CounterTable { blocks })
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a table has at least one block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// `len - 1`, usable as a modulo mask since len is a power of two.
    #[inline]
    pub fn index_mask(&self) -> usize {
        self.blocks.len() - 1
    }

    #[inline]
    pub fn get(&self, index: usize, offset: u32) -> u8 {
        ((self.blocks[index] >> offset) & COUNTER_MASK) as u8
    }

    /// Increments the counter unless it already sits at 15. Returns true if
    /// the table changed.
    #[inline]
    pub fn try_increment(&mut self, index: usize, offset: u32) -> bool {
        let mask = COUNTER_MASK << offset;
        let block = &mut self.blocks[index];
        if *block & mask != mask {
            *block += 1 << offset;
            return true;
        }
        false
    }

    /// Halves every counter in place.
    pub fn halve(&mut self) {
        for block in self.blocks.iter_mut() {
            *block = (*block >> 1) & RESET_MASK;
        }
    }

    /// Replaces the table with a fresh allocation of `len` zeroed blocks and
    /// frees the old one. On error the table is untouched.
    pub fn resize(&mut self, len: usize) -> Result<(), TryReserveError> {
        *self = CounterTable::new(len)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn allocated(&self) -> usize {
        self.blocks.capacity()
    }

    #[cfg(test)]
    pub(crate) fn block(&self, index: usize) -> u64 {
        self.blocks[index]
    }

    #[cfg(test)]
    pub(crate) fn set_block(&mut self, index: usize, value: u64) {
        self.blocks[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::{CounterTable, COUNTERS_PER_BLOCK, MAX_COUNT};

    #[test]
    fn test_counters_are_independent() {
        let mut table = CounterTable::new(4).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.index_mask(), 3);
        assert_eq!(COUNTERS_PER_BLOCK, 16);

        for slot in 0..COUNTERS_PER_BLOCK as u32 {
            for _ in 0..slot {
                assert!(table.try_increment(2, slot * 4));
            }
        }
        for slot in 0..COUNTERS_PER_BLOCK as u32 {
            assert_eq!(table.get(2, slot * 4) as u32, slot);
        }
        assert_eq!(table.block(0), 0);
        assert_eq!(table.block(1), 0);
        assert_eq!(table.block(3), 0);
    }

    #[test]
    fn test_saturates() {
        let mut table = CounterTable::new(1).unwrap();
        for _ in 0..MAX_COUNT {
            assert!(table.try_increment(0, 60));
        }
        assert_eq!(table.get(0, 60), 15);
        assert!(!table.try_increment(0, 60));
        assert_eq!(table.get(0, 60), 15);
        // top counter did not overflow out of the block or into its neighbour
        assert_eq!(table.get(0, 56), 0);
        assert_eq!(table.block(0), 0xF000_0000_0000_0000);
    }

    #[test]
    fn test_halve_no_bleed() {
        let mut table = CounterTable::new(1).unwrap();
        // 9 at offset 4, 15 right below it at offset 0
        table.set_block(0, 0x9F);
        table.halve();
        assert_eq!(table.get(0, 4), 4);
        assert_eq!(table.get(0, 0), 7);
        assert_eq!(table.block(0), 0x47);

        table.set_block(0, u64::MAX);
        table.halve();
        for slot in 0..16 {
            assert_eq!(table.get(0, slot * 4), 7);
        }
    }

    #[test]
    fn test_resize_zeroes() {
        let mut table = CounterTable::new(2).unwrap();
        table.try_increment(1, 8);
        table.resize(8).unwrap();
        assert_eq!(table.len(), 8);
        for i in 0..8 {
            assert_eq!(table.block(i), 0);
        }
        table.resize(1).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_shrink_releases_memory() {
        let mut table = CounterTable::new(1 << 20).unwrap();
        assert!(table.allocated() >= 1 << 20);
        table.resize(1).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.allocated() < 1024, "kept {} blocks", table.allocated());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_allocation_failure() {
        assert!(CounterTable::new(1 << 59).is_err());

        let mut table = CounterTable::new(4).unwrap();
        table.try_increment(3, 12);
        assert!(table.resize(1 << 59).is_err());
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(3, 12), 1);
    }
}
