//! RNG module - uniform random shape selection
//!
//! Each new piece picks one of the five templates with equal probability.
//! The generator is a seeded LCG so a session can be replayed from its seed.

use crate::types::ShapeKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would still cycle, but keep seeds 0 and 1 equivalent.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // (a * state + c) mod 2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Draws shape kinds uniformly from the catalog
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: SimpleRng,
}

impl ShapeGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn next_kind(&mut self) -> ShapeKind {
        let i = self.rng.next_range(ShapeKind::ALL.len() as u32) as usize;
        ShapeKind::ALL[i]
    }

    /// Current RNG state (for restarting a game that continues the sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(5) < 5);
        }
    }

    #[test]
    fn test_generator_covers_catalog() {
        let mut gen = ShapeGenerator::new(42);
        let mut counts = [0u32; 5];
        for _ in 0..5000 {
            counts[gen.next_kind().index()] += 1;
        }
        // Uniform draw: each kind lands near 1000.
        for (i, &c) in counts.iter().enumerate() {
            assert!((800..1200).contains(&c), "kind {} drawn {} times", i, c);
        }
    }

    #[test]
    fn test_generator_resumes_from_seed() {
        let mut a = ShapeGenerator::new(99);
        for _ in 0..10 {
            a.next_kind();
        }
        let mut b = ShapeGenerator::new(a.seed());
        for _ in 0..20 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }
}
