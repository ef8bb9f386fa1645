use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::capacity::nearest_power_of_two;
use crate::error::SketchError;
use crate::hash::{AHashElementHasher, ElementHasher};
use crate::table::{CounterTable, COUNTER_BITS};

/// Counters per element, one per row.
pub const DEPTH: usize = 4;

/// Tunables of the sketch. The defaults follow Caffeine's frequency sketch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SketchConfig {
    /// Odd multipliers, one per row, spreading a hash over the table.
    pub seeds: [u64; DEPTH],
    /// Counters are halved after `table_len * sampling_ratio` admitted increments.
    pub sampling_ratio: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            seeds: [
                0xc3a5_c85c_97cb_3127,
                0xb492_b66f_be98_f273,
                0x9ae1_6a3b_2f90_404f,
                0xcbf2_9ce4_8422_2325,
            ],
            sampling_ratio: 10,
        }
    }
}

impl SketchConfig {
    fn validate(&self) -> Result<(), SketchError> {
        if self.seeds.iter().any(|s| s & 1 == 0) {
            return Err(SketchError::InvalidConfig("seeds must be odd"));
        }
        if self.sampling_ratio == 0 {
            return Err(SketchError::InvalidConfig(
                "sampling_ratio must be larger than 0",
            ));
        }
        Ok(())
    }
}

/// A probabilistic estimate of how often an element was accessed within a
/// recent window. Frequencies saturate at 15.
///
/// Four 4-bit counters are kept per element, all inside the same 16 bit
/// sub-block position of (usually different) 64 bit blocks, and the smallest
/// of the four is the estimate. After `sampling_size` admitted increments
/// every counter is halved so old popularity fades out.
///
/// The table length is the capacity rounded up to a power of two.
///
/// Not synchronized: mutation goes through `&mut self`, so sharing one sketch
/// between threads needs an outer lock, usually the one guarding the cache.
pub struct FrequencySketch<T: ?Sized, H = AHashElementHasher> {
    table: CounterTable,
    // admitted increments since the last halving
    size: usize,
    sampling_size: usize,
    config: SketchConfig,
    hasher: H,
    _element: PhantomData<fn(&T)>,
}

impl<T: Hash + ?Sized> FrequencySketch<T> {
    pub fn new(capacity: usize) -> Result<Self, SketchError> {
        Self::with_hasher(capacity, AHashElementHasher::new())
    }
}

impl<T: ?Sized, H: ElementHasher<T>> FrequencySketch<T, H> {
    pub fn with_hasher(capacity: usize, hasher: H) -> Result<Self, SketchError> {
        Self::with_config(capacity, hasher, SketchConfig::default())
    }

    pub fn with_config(
        capacity: usize,
        hasher: H,
        config: SketchConfig,
    ) -> Result<Self, SketchError> {
        config.validate()?;
        let len = nearest_power_of_two(capacity)?;
        let table = CounterTable::new(len)
            .map_err(|_| SketchError::InvalidCapacity { requested: capacity })?;
        let sampling_size = len.saturating_mul(config.sampling_ratio);
        log::debug!(
            "FrequencySketch created: capacity={}, table_len={}, sampling_size={}",
            capacity,
            len,
            sampling_size
        );
        Ok(Self {
            table,
            size: 0,
            sampling_size,
            config,
            hasher,
            _element: PhantomData,
        })
    }

    /// Reallocates the table for `capacity` and drops every recorded count.
    /// On error the sketch is left as it was.
    pub fn change_capacity(&mut self, capacity: usize) -> Result<(), SketchError> {
        let len = nearest_power_of_two(capacity)?;
        self.table
            .resize(len)
            .map_err(|_| SketchError::InvalidCapacity { requested: capacity })?;
        self.size = 0;
        self.sampling_size = len.saturating_mul(self.config.sampling_ratio);
        log::debug!(
            "FrequencySketch resized: capacity={}, table_len={}, sampling_size={}",
            capacity,
            len,
            self.sampling_size
        );
        Ok(())
    }

    pub fn record_access(&mut self, element: &T) {
        let h = self.hasher.hash32(element);
        self.record_hash(h);
    }

    /// Estimated frequency of `element`, in [0, 15].
    pub fn get_frequency(&self, element: &T) -> u8 {
        self.frequency_of_hash(self.hasher.hash32(element))
    }

    pub fn has(&self, element: &T) -> bool {
        self.get_frequency(element) > 0
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}

impl<T: ?Sized, H> FrequencySketch<T, H> {
    /// Same as `record_access` for a caller that already holds the hash.
    pub fn record_hash(&mut self, h: u32) {
        let mut added = false;
        for row in 0..DEPTH {
            let (index, offset) = self.index_of(h, row);
            added |= self.table.try_increment(index, offset);
        }

        if added {
            self.size += 1;
            if self.size == self.sampling_size {
                self.reset();
            }
        }
    }

    pub fn frequency_of_hash(&self, h: u32) -> u8 {
        let mut frequency = u8::MAX;
        for row in 0..DEPTH {
            let (index, offset) = self.index_of(h, row);
            frequency = frequency.min(self.table.get(index, offset));
        }
        frequency
    }

    pub fn has_hash(&self, h: u32) -> bool {
        self.frequency_of_hash(h) > 0
    }

    /// Number of 64 bit blocks backing the sketch.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    pub fn sampling_size(&self) -> usize {
        self.sampling_size
    }

    /// Admitted increments since the last halving.
    pub fn samples(&self) -> usize {
        self.size
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Block index and bit offset of the `row`th counter of `h`.
    ///
    /// The block comes from the row's seed multiplied into the hash, with the
    /// high half folded down before masking. The low two bits of the hash pick
    /// the 16 bit sub-block, shared by all rows, and the row picks one of its
    /// four counters.
    #[inline]
    fn index_of(&self, h: u32, row: usize) -> (usize, u32) {
        let mut m = self.config.seeds[row].wrapping_mul(h as u64);
        m = m.wrapping_add(m >> 32);
        let index = (m as usize) & self.table.index_mask();
        let sub_block = (h & 3) << 2;
        let offset = (sub_block + row as u32) * COUNTER_BITS;
        (index, offset)
    }

    /// Halves every counter and the sample count.
    fn reset(&mut self) {
        self.table.halve();
        self.size /= 2;
        log::trace!(
            "FrequencySketch aged: table_len={}, samples={}",
            self.table.len(),
            self.size
        );
    }
}

impl<T: ?Sized, H: Clone> Clone for FrequencySketch<T, H> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            size: self.size,
            sampling_size: self.sampling_size,
            config: self.config,
            hasher: self.hasher.clone(),
            _element: PhantomData,
        }
    }
}

impl<T: ?Sized, H> fmt::Debug for FrequencySketch<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencySketch")
            .field("table_len", &self.table.len())
            .field("size", &self.size)
            .field("sampling_size", &self.sampling_size)
            .field("config", &self.config)
            .finish()
    }
}
