//! 4-bit count-min frequency sketch for cache admission.
//!
//! Tracks an approximate, recency-biased access count per element in a fixed
//! amount of memory. Counts saturate at 15 and are periodically halved.
//!
//! ```
//! use frequency_sketch::FrequencySketch;
//!
//! let mut sketch: FrequencySketch<str> = FrequencySketch::new(100).unwrap();
//! sketch.record_access("foo");
//! sketch.record_access("foo");
//! assert!(sketch.get_frequency("foo") >= 2);
//! assert!(sketch.has("foo"));
//! ```
mod capacity;
mod error;
mod hash;
#[cfg(feature = "python")]
mod python;
mod sketch;
mod table;

pub use capacity::nearest_power_of_two;
pub use error::SketchError;
pub use hash::{AHashElementHasher, ElementHasher};
pub use sketch::{FrequencySketch, SketchConfig, DEPTH};
pub use table::{
    CounterTable, COUNTERS_PER_BLOCK, COUNTER_BITS, COUNTER_MASK, MAX_COUNT, RESET_MASK,
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn frequency_sketch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyFrequencySketch>()?;
    Ok(())
}
