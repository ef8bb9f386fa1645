use crate::error::SketchError;

/// Largest table length we agree to allocate, in 64-bit blocks.
const MAX_TABLE_LEN: usize = (isize::MAX as usize) / std::mem::size_of::<u64>();

/// Rounds `capacity` up to the nearest power of two.
///
/// Zero, and anything whose rounded table would not fit in memory, is rejected.
pub fn nearest_power_of_two(capacity: usize) -> Result<usize, SketchError> {
    if capacity == 0 {
        return Err(SketchError::InvalidCapacity {
            requested: capacity,
        });
    }
    match capacity.checked_next_power_of_two() {
        Some(len) if len <= MAX_TABLE_LEN => Ok(len),
        _ => Err(SketchError::InvalidCapacity {
            requested: capacity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::nearest_power_of_two;
    use crate::error::SketchError;

    #[test]
    fn test_rounding() {
        assert_eq!(nearest_power_of_two(1).unwrap(), 1);
        assert_eq!(nearest_power_of_two(2).unwrap(), 2);
        assert_eq!(nearest_power_of_two(3).unwrap(), 4);
        assert_eq!(nearest_power_of_two(100).unwrap(), 128);
        assert_eq!(nearest_power_of_two(128).unwrap(), 128);
        assert_eq!(nearest_power_of_two(129).unwrap(), 256);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            nearest_power_of_two(0),
            Err(SketchError::InvalidCapacity { requested: 0 })
        );
        assert!(nearest_power_of_two(usize::MAX).is_err());
        assert!(nearest_power_of_two((usize::MAX >> 1) + 2).is_err());
    }
}
