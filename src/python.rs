use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::sketch::FrequencySketch;

fn to_capacity(capacity: i64) -> PyResult<usize> {
    usize::try_from(capacity).map_err(|_| {
        PyValueError::new_err(format!(
            "FrequencySketch capacity must be larger than 0, got {}",
            capacity
        ))
    })
}

/// String keyed sketch for Python callers.
#[pyclass(name = "FrequencySketch")]
pub struct PyFrequencySketch {
    sketch: FrequencySketch<str>,
}

#[pymethods]
impl PyFrequencySketch {
    #[new]
    fn new(capacity: i64) -> PyResult<Self> {
        Ok(Self {
            sketch: FrequencySketch::new(to_capacity(capacity)?)?,
        })
    }

    pub fn change_capacity(&mut self, capacity: i64) -> PyResult<()> {
        self.sketch.change_capacity(to_capacity(capacity)?)?;
        Ok(())
    }

    pub fn record_access(&mut self, key: &str) {
        self.sketch.record_access(key);
    }

    pub fn get_frequency(&self, key: &str) -> u8 {
        self.sketch.get_frequency(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.sketch.has(key)
    }

    fn __contains__(&self, key: &str) -> bool {
        self.sketch.has(key)
    }

    #[getter]
    fn table_len(&self) -> usize {
        self.sketch.table_len()
    }
}
