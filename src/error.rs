use std::fmt;

/// Errors raised when building or resizing a sketch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Capacity was zero, or too large to round up to a power of two.
    InvalidCapacity { requested: usize },
    /// A `SketchConfig` field is out of range.
    InvalidConfig(&'static str),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidCapacity { requested } => write!(
                f,
                "FrequencySketch capacity must be larger than 0 and addressable, got {}",
                requested
            ),
            SketchError::InvalidConfig(reason) => write!(f, "invalid sketch config: {}", reason),
        }
    }
}

impl std::error::Error for SketchError {}

#[cfg(feature = "python")]
impl From<SketchError> for pyo3::PyErr {
    fn from(err: SketchError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
