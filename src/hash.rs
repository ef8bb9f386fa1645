use std::hash::Hash;

use ahash::RandomState;

/// Produces the 32-bit hash a sketch addresses its counters with.
///
/// Estimation accuracy depends directly on how well this spreads bits. Any
/// `Fn(&T) -> u32` closure is also a hasher, which lets tests pin hashes.
pub trait ElementHasher<T: ?Sized> {
    fn hash32(&self, element: &T) -> u32;
}

impl<T: ?Sized, F> ElementHasher<T> for F
where
    F: Fn(&T) -> u32,
{
    #[inline]
    fn hash32(&self, element: &T) -> u32 {
        self(element)
    }
}

/// Default hasher backed by `ahash`.
#[derive(Clone, Debug)]
pub struct AHashElementHasher {
    state: RandomState,
}

impl Default for AHashElementHasher {
    fn default() -> Self {
        AHashElementHasher::new()
    }
}

impl AHashElementHasher {
    /// Randomly seeded, so two instances disagree on every key.
    pub fn new() -> Self {
        Self {
            state: RandomState::new(),
        }
    }

    /// Deterministic hasher, stable across instances in one process.
    pub fn with_seeds(k0: u64, k1: u64, k2: u64, k3: u64) -> Self {
        Self {
            state: RandomState::with_seeds(k0, k1, k2, k3),
        }
    }
}

impl<T: Hash + ?Sized> ElementHasher<T> for AHashElementHasher {
    #[inline]
    fn hash32(&self, element: &T) -> u32 {
        let h = self.state.hash_one(element);
        // fold so the high half still influences the sub-block bits
        (h ^ (h >> 32)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::{AHashElementHasher, ElementHasher};

    #[test]
    fn test_seeded_is_stable() {
        let a = AHashElementHasher::with_seeds(1, 2, 3, 4);
        let b = AHashElementHasher::with_seeds(1, 2, 3, 4);
        for i in 0..100 {
            let key = format!("foo:bar:{}", i);
            assert_eq!(a.hash32(key.as_str()), b.hash32(key.as_str()));
        }
    }

    #[test]
    fn test_closure_hasher() {
        let fixed = |k: &u64| *k as u32;
        assert_eq!(fixed.hash32(&7u64), 7);
        assert_eq!(fixed.hash32(&(u32::MAX as u64 + 3)), 2);
    }
}
