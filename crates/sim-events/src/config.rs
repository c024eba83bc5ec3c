//! Tunables for event generation and application.

use serde::{Deserialize, Serialize};
use sim_core::EventKind;
use std::collections::BTreeMap;
use thiserror::Error;

/// Hard gate in front of inspiration (golden-age) events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenAgeGate {
    pub min_weeks: u32,
    /// How many axes must reach `high_axis_level`.
    pub min_high_axes: usize,
    pub high_axis_level: f64,
    /// No axis may sit at or below this.
    pub low_axis_level: f64,
    /// Average-stat ceiling is `average_ceiling_base + weeks * average_ceiling_per_week`.
    pub average_ceiling_base: f64,
    pub average_ceiling_per_week: f64,
}

impl Default for GoldenAgeGate {
    fn default() -> Self {
        Self {
            min_weeks: 20,
            min_high_axes: 3,
            high_axis_level: 6.0,
            low_axis_level: 2.0,
            average_ceiling_base: 8.0,
            average_ceiling_per_week: 1.0 / 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Base category weights before re-weighting.
    pub weights: BTreeMap<EventKind, f64>,
    /// Per-country probability that a generation pass produces an event.
    pub event_chance: f64,
    /// Crisis weight is multiplied by `crisis_suppression` while the
    /// average stat is below `crisis_average_floor`.
    pub crisis_average_floor: f64,
    pub crisis_suppression: f64,
    /// A focused axis at or above this level boosts its categories.
    pub focus_level: f64,
    pub focus_boost: f64,
    pub golden_age: GoldenAgeGate,
    /// A synergy axis strictly above this level grants the bonus.
    pub synergy_threshold: f64,
    pub synergy_fraction: f64,
    pub milestone_bonus: f64,
    pub discovery_bonus: f64,
    /// Also subtract the bonus part when a timed event expires.
    pub revert_synergy_bonus: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (EventKind::Personage, 20.0),
                (EventKind::Crisis, 15.0),
                (EventKind::Inspiration, 5.0),
                (EventKind::Milestone, 10.0),
                (EventKind::Discovery, 15.0),
                (EventKind::Cultural, 15.0),
                (EventKind::Technological, 15.0),
                (EventKind::Financial, 10.0),
                (EventKind::Population, 10.0),
            ]),
            event_chance: 0.75,
            crisis_average_floor: 3.0,
            crisis_suppression: 0.2,
            focus_level: 5.0,
            focus_boost: 1.5,
            golden_age: GoldenAgeGate::default(),
            synergy_threshold: 5.0,
            synergy_fraction: 0.2,
            milestone_bonus: 1.0,
            discovery_bonus: 0.5,
            revert_synergy_bonus: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EventConfigError {
    #[error("event_chance must be within [0, 1], got {0}")]
    Chance(f64),
    #[error("weight for {0} must be finite and non-negative")]
    Weight(EventKind),
    #[error("{0} cannot be drawn by the generator")]
    NotGenerated(EventKind),
    #[error("{0} must be finite and non-negative")]
    Negative(&'static str),
}

impl EventConfig {
    pub fn validate(&self) -> Result<(), EventConfigError> {
        if !(0.0..=1.0).contains(&self.event_chance) {
            return Err(EventConfigError::Chance(self.event_chance));
        }
        for (&kind, &w) in &self.weights {
            if !EventKind::GENERATED.contains(&kind) {
                return Err(EventConfigError::NotGenerated(kind));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(EventConfigError::Weight(kind));
            }
        }
        let scalars = [
            ("crisis_suppression", self.crisis_suppression),
            ("focus_boost", self.focus_boost),
            ("synergy_fraction", self.synergy_fraction),
            ("milestone_bonus", self.milestone_bonus),
            ("discovery_bonus", self.discovery_bonus),
        ];
        for (name, v) in scalars {
            if !v.is_finite() || v < 0.0 {
                return Err(EventConfigError::Negative(name));
            }
        }
        Ok(())
    }

    pub fn weight(&self, kind: EventKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EventConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.weight(EventKind::Personage), 20.0);
        assert_eq!(cfg.weight(EventKind::Industry), 0.0);
        let total: f64 = cfg.weights.values().sum();
        assert_eq!(total, 115.0);
    }

    #[test]
    fn construction_kinds_are_rejected_as_weights() {
        let mut cfg = EventConfig::default();
        cfg.weights.insert(EventKind::Industry, 3.0);
        assert_eq!(cfg.validate(), Err(EventConfigError::NotGenerated(EventKind::Industry)));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: EventConfig = serde_yaml::from_str("event_chance: 0.5\nrevert_synergy_bonus: true\n").unwrap();
        assert_eq!(cfg.event_chance, 0.5);
        assert!(cfg.revert_synergy_bonus);
        assert_eq!(cfg.golden_age.min_weeks, 20);
        assert_eq!(cfg.weights.len(), 9);
    }
}
