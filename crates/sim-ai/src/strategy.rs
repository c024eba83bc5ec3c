//! Strategy archetypes: axis priorities and construction preferences.

use serde::{Deserialize, Serialize};
use sim_core::{Axis, IndustryKind, InfrastructureKind, InvestmentKind, Project};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Militarist,
    Mercantile,
    Scholarly,
    Cultural,
    Balanced,
}

/// Axis weights summing to 1.
pub type Weights = [(Axis, f64); 5];

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Militarist,
        Strategy::Mercantile,
        Strategy::Scholarly,
        Strategy::Cultural,
        Strategy::Balanced,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Militarist => "militarist",
            Strategy::Mercantile => "mercantile",
            Strategy::Scholarly => "scholarly",
            Strategy::Cultural => "cultural",
            Strategy::Balanced => "balanced",
        }
    }

    pub fn weights(self) -> Weights {
        use Axis::*;
        match self {
            Strategy::Militarist => [(Military, 0.35), (Economy, 0.30), (Science, 0.20), (Social, 0.10), (Culture, 0.05)],
            Strategy::Mercantile => [(Economy, 0.40), (Social, 0.20), (Science, 0.20), (Military, 0.10), (Culture, 0.10)],
            Strategy::Scholarly => [(Science, 0.40), (Economy, 0.20), (Culture, 0.20), (Social, 0.10), (Military, 0.10)],
            Strategy::Cultural => [(Culture, 0.40), (Social, 0.25), (Science, 0.15), (Economy, 0.15), (Military, 0.05)],
            Strategy::Balanced => [(Military, 0.20), (Social, 0.20), (Culture, 0.20), (Science, 0.20), (Economy, 0.20)],
        }
    }

    /// Projects the AI tries, in order, when it has money to spend.
    pub fn preferences(self) -> &'static [Project] {
        use IndustryKind as I;
        use InfrastructureKind as F;
        use InvestmentKind as V;
        match self {
            Strategy::Militarist => &[
                Project::Industry(I::Arms),
                Project::Infrastructure(F::Roads),
                Project::Industry(I::Basic),
                Project::Industry(I::Manufacturing),
                Project::Infrastructure(F::Hospitals),
            ],
            Strategy::Mercantile => &[
                Project::Industry(I::Basic),
                Project::Infrastructure(F::Roads),
                Project::Infrastructure(F::Ports),
                Project::Investment(V::Bonds),
                Project::Infrastructure(F::Banks),
                Project::Industry(I::Services),
                Project::Investment(V::Stocks),
            ],
            Strategy::Scholarly => &[
                Project::Infrastructure(F::Universities),
                Project::Industry(I::Technology),
                Project::Industry(I::Basic),
                Project::Industry(I::Manufacturing),
                Project::Investment(V::Ventures),
            ],
            Strategy::Cultural => &[
                Project::Infrastructure(F::Hospitals),
                Project::Industry(I::Services),
                Project::Industry(I::Basic),
                Project::Infrastructure(F::Roads),
            ],
            Strategy::Balanced => &[
                Project::Industry(I::Basic),
                Project::Infrastructure(F::Roads),
                Project::Infrastructure(F::Hospitals),
                Project::Industry(I::Manufacturing),
                Project::Investment(V::Bonds),
            ],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Weights sorted by descending weight; ties keep axis order.
pub fn by_priority(mut weights: Weights) -> Weights {
    weights.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    weights
}

/// Swap `axis` into the top slot, giving it the highest weight and handing
/// its own weight to the previous leader.
pub fn prioritize(weights: Weights, axis: Axis) -> Weights {
    let mut sorted = by_priority(weights);
    if let Some(pos) = sorted.iter().position(|(a, _)| *a == axis) {
        if pos != 0 {
            let top = sorted[0].1;
            sorted[0].1 = sorted[pos].1;
            sorted[pos].1 = top;
        }
    }
    by_priority(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        for s in Strategy::ALL {
            let total: f64 = s.weights().iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9, "{s}");
            let mut axes: Vec<Axis> = s.weights().iter().map(|(a, _)| *a).collect();
            axes.sort();
            assert_eq!(axes, Axis::ALL.to_vec(), "{s}");
        }
    }

    #[test]
    fn prioritize_moves_axis_to_front() {
        let w = prioritize(Strategy::Cultural.weights(), Axis::Military);
        assert_eq!(w[0], (Axis::Military, 0.40));
        assert!(w.contains(&(Axis::Culture, 0.05)));
        let same = prioritize(Strategy::Militarist.weights(), Axis::Military);
        assert_eq!(same, by_priority(Strategy::Militarist.weights()));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Scholarly".parse::<Strategy>(), Ok(Strategy::Scholarly));
        assert!("pacifist".parse::<Strategy>().is_err());
        let s: Strategy = serde_yaml::from_str("mercantile").unwrap();
        assert_eq!(s, Strategy::Mercantile);
    }
}
