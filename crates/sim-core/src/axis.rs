//! The five development axes and the per-country stat block.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five development dimensions a nation grows along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Armed forces and doctrine.
    Military,
    /// Welfare, cohesion and public order.
    Social,
    /// Arts, religion and soft power.
    Culture,
    /// Research and education.
    Science,
    /// Trade and production.
    Economy,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 5] = [
        Axis::Military,
        Axis::Social,
        Axis::Culture,
        Axis::Science,
        Axis::Economy,
    ];

    /// Lowercase identifier used in configs and logs.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Military => "military",
            Axis::Social => "social",
            Axis::Culture => "culture",
            Axis::Science => "science",
            Axis::Economy => "economy",
        }
    }

    /// Axes whose progress amplifies events touching `self`.
    pub fn synergies(self) -> &'static [Axis] {
        match self {
            Axis::Military => &[Axis::Economy, Axis::Science],
            Axis::Social => &[Axis::Culture, Axis::Economy],
            Axis::Culture => &[Axis::Social, Axis::Science],
            Axis::Science => &[Axis::Economy, Axis::Military],
            Axis::Economy => &[Axis::Social, Axis::Science],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown axis name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown axis: {0}")]
pub struct UnknownAxis(pub String);

impl FromStr for Axis {
    type Err = UnknownAxis;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Axis::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAxis(s.to_string()))
    }
}

/// Development levels along each axis. Every field is kept `>= 0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub military: f64,
    pub social: f64,
    pub culture: f64,
    pub science: f64,
    pub economy: f64,
}

impl Stats {
    /// Level on a single axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Military => self.military,
            Axis::Social => self.social,
            Axis::Culture => self.culture,
            Axis::Science => self.science,
            Axis::Economy => self.economy,
        }
    }

    fn slot(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Military => &mut self.military,
            Axis::Social => &mut self.social,
            Axis::Culture => &mut self.culture,
            Axis::Science => &mut self.science,
            Axis::Economy => &mut self.economy,
        }
    }

    /// Overwrite an axis, flooring at zero. Non-finite input is treated as zero.
    pub fn set(&mut self, axis: Axis, value: f64) {
        let v = if value.is_finite() { value.max(0.0) } else { 0.0 };
        *self.slot(axis) = v;
    }

    /// Add a signed delta to an axis and return the change actually applied
    /// after the zero floor.
    pub fn add(&mut self, axis: Axis, delta: f64) -> f64 {
        let before = self.get(axis);
        self.set(axis, before + delta);
        self.get(axis) - before
    }

    /// Iterate `(axis, level)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }

    pub fn average(&self) -> f64 {
        self.total() / Axis::ALL.len() as f64
    }

    /// Highest axis; ties resolve to the earliest axis in canonical order.
    pub fn highest(&self) -> (Axis, f64) {
        self.iter()
            .fold((Axis::Military, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// Lowest axis; ties resolve to the earliest axis in canonical order.
    pub fn lowest(&self) -> (Axis, f64) {
        self.iter()
            .fold((Axis::Military, f64::MAX), |best, cur| if cur.1 < best.1 { cur } else { best })
    }

    /// Number of axes at or above `threshold`.
    pub fn count_at_least(&self, threshold: f64) -> usize {
        self.iter().filter(|(_, v)| *v >= threshold).count()
    }
}
