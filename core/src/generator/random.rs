use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly random, distinct samples used to pick mine positions.
pub trait MineSampler {
    /// Picks `amount` distinct indices out of `0..pool`, every index being equally likely.
    ///
    /// Callers guarantee `amount <= pool`.
    fn sample_distinct(&mut self, pool: usize, amount: usize) -> Vec<usize>;
}

impl<R: Rng + ?Sized> MineSampler for R {
    fn sample_distinct(&mut self, pool: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(self, pool, amount).into_vec()
    }
}

/// Small, fast generator that replays the same layout for the same seed.
pub fn seeded_sampler(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
