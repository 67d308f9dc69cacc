//! Random number generation for layout building
//!
//! Uses a seeded ChaCha RNG so a layout can be regenerated from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Layout random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
/// Note: RNG state is not serialized - only the seed is kept, so a
/// deserialized generator restarts its stream from the beginning.
#[derive(Debug, Clone)]
pub struct MapRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for MapRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MapRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(MapRng::new(seed))
    }
}

impl MapRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random integer in `0..n`
    ///
    /// Returns 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Random float in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Returns true with probability `p` (clamped to `[0, 1]` by comparison)
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }
}

impl Default for MapRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = MapRng::new(42);
        for _ in 0..1000 {
            let n = rng.rn2(10);
            assert!(n < 10);
        }
    }

    #[test]
    fn test_unit_range() {
        let mut rng = MapRng::new(42);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = MapRng::new(42);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = MapRng::new(42);
        let mut rng2 = MapRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
            assert_eq!(rng1.unit(), rng2.unit());
        }
    }

    #[test]
    fn test_zero_inputs() {
        let mut rng = MapRng::new(42);
        assert_eq!(rng.rn2(0), 0);
        assert!(rng.choose::<u8>(&[]).is_none());
    }

    #[test]
    fn test_serde_round_trip_keeps_seed() {
        let rng = MapRng::new(1234);
        let json = serde_json::to_string(&rng).unwrap();
        let restored: MapRng = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed(), 1234);
    }
}
