//! Development-point allocation.

use crate::strategy::{by_priority, Weights};
use sim_core::{Axis, RandomSource};
use std::collections::BTreeMap;

/// Split `budget` across axes. Every point is spent: each axis in priority
/// order takes `min(remaining, floor(weight * budget), draw(1..=2))`, then
/// the remainder goes one point at a time to random axes.
pub fn allocate<R: RandomSource>(weights: Weights, budget: u32, rng: &mut R) -> BTreeMap<Axis, u32> {
    let mut plan = BTreeMap::new();
    let mut remaining = budget;
    for (axis, weight) in by_priority(weights) {
        if remaining == 0 {
            break;
        }
        let share = (weight * f64::from(budget)).floor().max(0.0) as u32;
        let draw = rng.uniform_int(1, 2) as u32;
        let points = remaining.min(share).min(draw);
        if points > 0 {
            *plan.entry(axis).or_insert(0) += points;
            remaining -= points;
        }
    }
    while remaining > 0 {
        let idx = rng.uniform_int(0, Axis::ALL.len() as i64 - 1) as usize;
        let axis = Axis::ALL[idx.min(Axis::ALL.len() - 1)];
        *plan.entry(axis).or_insert(0) += 1;
        remaining -= 1;
    }
    plan
}
