//! Random source used by every stochastic part of the simulation.
//!
//! `RandomSource` is the seam: production code runs on [`GameRng`]
//! (ChaCha8, seeded), tests can substitute fixed draws.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform draws plus the derived helpers the engine needs.
pub trait RandomSource {
    /// Uniform float in `[low, high]`. Returns `low` when the range is empty.
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `[low, high]` inclusive. Returns `low` when the
    /// range is empty.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;

    /// Bernoulli trial with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.uniform_f64(0.0, 1.0) < p
    }

    /// Index drawn proportionally to `weights`. Negative or non-finite
    /// weights count as zero; `None` when nothing has positive weight.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().copied().map(clean).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.uniform_f64(0.0, total);
        let mut last_positive = None;
        for (i, w) in weights.iter().copied().map(clean).enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
            last_positive = Some(i);
        }
        // Float drift can leave a sliver past the final bucket.
        last_positive
    }

    /// `amount` distinct indices from `0..len` (partial Fisher-Yates).
    fn sample_unique(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..len).collect();
        let take = amount.min(len);
        for i in 0..take {
            let j = self.uniform_int(i as i64, (len - 1) as i64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(take);
        pool
    }

    /// Pick a reference to one element, or `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.uniform_int(0, items.len() as i64 - 1) as usize;
        items.get(i)
    }
}

/// Seeded generator backing a game session.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for GameRng {
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        if !(high > low) {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..=high)
    }
}

/// Replays a fixed cycle of unit draws; each float draw maps `u` in `[0,1]`
/// onto the requested range. Useful for pinning outcomes in tests.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Every draw lands at the same relative position `u`.
    pub fn constant(u: f64) -> Self {
        Self::new(vec![u])
    }

    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.5;
        }
        let u = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        u.clamp(0.0, 1.0)
    }
}

impl RandomSource for ScriptedRng {
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        let u = self.next_unit();
        if !(high > low) {
            return low;
        }
        low + (high - low) * u
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        let u = self.next_unit();
        if high <= low {
            return low;
        }
        let span = (high - low) as f64;
        low + (span * u).round() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seeded_streams_repeat() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.uniform_int(0, 1000), b.uniform_int(0, 1000));
        }
    }

    #[test]
    fn empty_ranges_return_low() {
        let mut r = GameRng::new(1);
        assert_eq!(r.uniform_f64(2.0, 2.0), 2.0);
        assert_eq!(r.uniform_int(5, 3), 5);
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut r = GameRng::new(9);
        for _ in 0..200 {
            let i = r.weighted_index(&[0.0, 3.0, -1.0, f64::NAN, 1.0]).unwrap();
            assert!(i == 1 || i == 4);
        }
        assert_eq!(r.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(r.weighted_index(&[]), None);
    }

    #[test]
    fn scripted_draws_hit_range_edges() {
        let mut r = ScriptedRng::new(vec![0.0, 1.0]);
        assert_eq!(r.uniform_f64(0.4, 0.7), 0.4);
        assert_eq!(r.uniform_f64(0.4, 0.7), 0.7);
        let mut last = ScriptedRng::constant(1.0);
        assert_eq!(last.weighted_index(&[1.0, 1.0]), Some(1));
    }

    proptest! {
        #[test]
        fn sample_unique_is_distinct(seed in any::<u64>(), len in 0usize..30, amount in 0usize..40) {
            let mut r = GameRng::new(seed);
            let mut picks = r.sample_unique(len, amount);
            prop_assert_eq!(picks.len(), amount.min(len));
            picks.sort_unstable();
            picks.dedup();
            prop_assert_eq!(picks.len(), amount.min(len));
            prop_assert!(picks.iter().all(|&i| i < len));
        }
    }
}
