//! Battle tunables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive `[low, high]` fraction range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

impl Range {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, v: f64) -> bool {
        (self.low..=self.high).contains(&v)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Per-side multiplicative noise on strength.
    pub noise: Range,
    /// Attacker/defender ratio above which the attacker wins.
    pub victory_ratio: f64,
    /// Ratio below which the attacker loses.
    pub defeat_ratio: f64,
    pub winner_casualties: Range,
    pub loser_casualties: Range,
    pub draw_casualties: Range,
    pub loot_fraction: f64,
    pub raze_fraction: f64,
    pub conquer_stat_fraction: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            noise: Range::new(0.8, 1.2),
            victory_ratio: 1.2,
            defeat_ratio: 0.8,
            winner_casualties: Range::new(0.10, 0.25),
            loser_casualties: Range::new(0.40, 0.70),
            draw_casualties: Range::new(0.25, 0.40),
            loot_fraction: 0.75,
            raze_fraction: 0.25,
            conquer_stat_fraction: 0.10,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BattleConfigError {
    #[error("{0} range must satisfy 0 <= low <= high")]
    Range(&'static str),
    #[error("defeat_ratio must not exceed victory_ratio")]
    Tiers,
    #[error("{0} must be a fraction in [0, 1]")]
    Fraction(&'static str),
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), BattleConfigError> {
        let ranges = [
            ("noise", self.noise),
            ("winner_casualties", self.winner_casualties),
            ("loser_casualties", self.loser_casualties),
            ("draw_casualties", self.draw_casualties),
        ];
        for (name, r) in ranges {
            if !(r.low.is_finite() && r.high.is_finite() && 0.0 <= r.low && r.low <= r.high) {
                return Err(BattleConfigError::Range(name));
            }
        }
        for &(name, r) in &ranges[1..] {
            if r.high > 1.0 {
                return Err(BattleConfigError::Fraction(name));
            }
        }
        if !(self.defeat_ratio.is_finite() && self.victory_ratio.is_finite()) || self.defeat_ratio > self.victory_ratio {
            return Err(BattleConfigError::Tiers);
        }
        let fractions = [
            ("loot_fraction", self.loot_fraction),
            ("raze_fraction", self.raze_fraction),
            ("conquer_stat_fraction", self.conquer_stat_fraction),
        ];
        for (name, f) in fractions {
            if !(0.0..=1.0).contains(&f) {
                return Err(BattleConfigError::Fraction(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(BattleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_tiers_and_bad_fractions() {
        let cfg = BattleConfig { defeat_ratio: 1.5, ..BattleConfig::default() };
        assert_eq!(cfg.validate(), Err(BattleConfigError::Tiers));
        let cfg = BattleConfig { loot_fraction: 1.5, ..BattleConfig::default() };
        assert_eq!(cfg.validate(), Err(BattleConfigError::Fraction("loot_fraction")));
        let cfg = BattleConfig { loser_casualties: Range::new(0.5, 1.2), ..BattleConfig::default() };
        assert_eq!(cfg.validate(), Err(BattleConfigError::Fraction("loser_casualties")));
    }
}
