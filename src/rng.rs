//! Random source for loot generation.
//!
//! Every generation call owns its `LootRng`. Nothing is shared between
//! calls, so concurrent generation on worker threads never contends on a
//! lock. Independent streams come either from the thread-local entropy
//! source or from a SHA3 derivation of (seed, stream index), which keeps
//! parallel streams uncorrelated while staying reproducible.

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use sha3::{Digest, Sha3_256};

#[derive(Debug, Clone)]
pub struct LootRng {
    rng: Xoshiro256PlusPlus,
    seed: u64,
}

impl LootRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Deterministic independent stream `stream` of `seed`
    pub fn derived(seed: u64, stream: u64) -> Self {
        Self::new(derive_seed(seed, stream))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[lo, hi)`. An empty range yields `lo`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.rng.gen::<f64>()
    }

    /// Uniform integer in `[lo, hi]`. An inverted range yields `lo`.
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform integer in `[lo, hi]`. An inverted range yields `lo`.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Flat 1..=100 roll, true when the roll is within `percent`
    pub fn percent(&mut self, percent: u8) -> bool {
        self.range_u32(1, 100) <= percent as u32
    }

    /// True with probability `p` (clamped to [0,1])
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p.clamp(0.0, 1.0)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.gen::<bool>()
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.gen_range(0..items.len())])
        }
    }

    /// Squared uniform draw from `[quality_mod, 1]`.
    ///
    /// Most results land near the floor of whatever range they scale;
    /// raising `quality_mod` lifts both the average and the density of
    /// high rolls. `quality_mod == 1.0` always yields exactly `1.0`.
    pub fn diminishing_roll(&mut self, quality_mod: f64) -> f64 {
        let floor = quality_mod.clamp(0.0, 1.0);
        let x = if floor >= 1.0 {
            1.0
        } else {
            self.range_f64(floor, 1.0)
        };
        x * x
    }
}

impl Default for LootRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngCore for LootRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// SHA3 of (seed, stream) folded to 64 bits
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(stream.to_le_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut a = LootRng::new(42);
        let mut b = LootRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.range_u32(0, 1000), b.range_u32(0, 1000));
        }
    }

    #[test]
    fn test_derived_streams_differ() {
        assert_ne!(derive_seed(7, 0), derive_seed(7, 1));
        assert_eq!(derive_seed(7, 3), derive_seed(7, 3));
        let mut a = LootRng::derived(7, 0);
        let mut b = LootRng::derived(7, 1);
        let same = (0..32).filter(|_| a.next_u64() == b.next_u64()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn test_empty_ranges() {
        let mut rng = LootRng::new(1);
        assert_eq!(rng.range_f64(0.5, 0.5), 0.5);
        assert_eq!(rng.range_u32(5, 5), 5);
        assert_eq!(rng.range_u32(6, 2), 6);
        assert_eq!(rng.range_i32(-3, -3), -3);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = LootRng::new(9);
        for _ in 0..1000 {
            let v = rng.range_f64(0.7, 1.3);
            assert!((0.7..1.3).contains(&v));
            let n = rng.range_u32(1, 6);
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn test_diminishing_roll_upper_bound() {
        let mut rng = LootRng::new(3);
        for _ in 0..100 {
            assert_eq!(rng.diminishing_roll(1.0), 1.0);
        }
    }

    #[test]
    fn test_diminishing_roll_biases_low() {
        let mut rng = LootRng::new(5);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.diminishing_roll(0.0)).sum::<f64>() / n as f64;
        // E[x^2] for x ~ U[0,1] is 1/3
        assert!((mean - 1.0 / 3.0).abs() < 0.01, "mean was {mean}");
    }

    #[test]
    fn test_quality_raises_floor() {
        let mut rng = LootRng::new(11);
        for _ in 0..1000 {
            let r = rng.diminishing_roll(0.5);
            assert!(r >= 0.25 && r <= 1.0);
        }
    }

    #[test]
    fn test_percent_extremes() {
        let mut rng = LootRng::new(13);
        for _ in 0..500 {
            assert!(rng.percent(100));
            assert!(!rng.percent(0));
        }
    }
}
