//! Core simulation parameters.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Starting values every country is created with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountrySeed {
    pub population: u64,
    pub money: i64,
    pub income: i64,
    pub army: u64,
    pub birth_rate: f64,
}

impl Default for CountrySeed {
    fn default() -> Self {
        Self {
            population: 1_000_000,
            money: 1_000,
            income: 100,
            army: 1_000,
            birth_rate: 1.0,
        }
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the session RNG.
    pub rng_seed: u64,
    /// Development points granted to every country each week.
    pub points_per_week: u32,
    /// Any stat reaching this level wins the game.
    pub victory_threshold: f64,
    /// The game ends after this many weeks.
    pub max_weeks: u32,
    /// Event generation runs every N weeks.
    pub event_interval_weeks: u32,
    /// Highest attainable army experience.
    pub max_experience: u8,
    pub seed: CountrySeed,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            points_per_week: 3,
            victory_threshold: 100.0,
            max_weeks: 520,
            event_interval_weeks: 4,
            max_experience: 10,
            seed: CountrySeed::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.victory_threshold.is_finite() || self.victory_threshold <= 0.0 {
            return Err(ValidationError::Config("victory_threshold must be > 0".into()));
        }
        if self.event_interval_weeks == 0 {
            return Err(ValidationError::Config("event_interval_weeks must be >= 1".into()));
        }
        if self.max_experience == 0 {
            return Err(ValidationError::Config("max_experience must be >= 1".into()));
        }
        if self.seed.money < 0 || self.seed.income < 0 {
            return Err(ValidationError::NegativeMoney);
        }
        if !self.seed.birth_rate.is_finite() || self.seed.birth_rate < 0.0 {
            return Err(ValidationError::NonFinite);
        }
        Ok(())
    }
}
