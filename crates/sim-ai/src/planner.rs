//! Weekly AI turn: reactive override, point allocation, one construction.

use crate::allocate::allocate;
use crate::strategy::{by_priority, prioritize, Strategy, Weights};
use serde::{Deserialize, Serialize};
use sim_core::{Axis, Country, Project, RandomSource};
use sim_econ::{military_power, Economy, Stance};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// React when the strongest rival's power exceeds own power by this fraction.
    pub power_deficit_margin: f64,
    pub crisis_focus: Axis,
    pub threat_focus: Axis,
    /// Attempt one construction per turn.
    pub build: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            power_deficit_margin: 0.25,
            crisis_focus: Axis::Social,
            threat_focus: Axis::Military,
            build: true,
        }
    }
}

/// Why the strategy's priority order was switched this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Crisis,
    Threatened,
}

/// World facts the planner needs about one country.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Outlook {
    pub has_crisis: bool,
    pub strongest_rival_power: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Turn {
    pub reaction: Option<Reaction>,
    pub allocation: BTreeMap<Axis, u32>,
    pub built: Option<Project>,
}

pub fn detect_reaction(own_power: f64, outlook: &Outlook, cfg: &AiConfig) -> Option<Reaction> {
    if outlook.has_crisis {
        return Some(Reaction::Crisis);
    }
    if outlook.strongest_rival_power > own_power * (1.0 + cfg.power_deficit_margin) {
        return Some(Reaction::Threatened);
    }
    None
}

pub fn effective_weights(strategy: Strategy, reaction: Option<Reaction>, cfg: &AiConfig) -> Weights {
    match reaction {
        None => by_priority(strategy.weights()),
        Some(Reaction::Crisis) => prioritize(strategy.weights(), cfg.crisis_focus),
        Some(Reaction::Threatened) => prioritize(strategy.weights(), cfg.threat_focus),
    }
}

/// First affordable project in the strategy's preference list.
pub fn choose_project(strategy: Strategy, country: &Country, economy: &Economy, week: u32) -> Option<Project> {
    strategy
        .preferences()
        .iter()
        .copied()
        .find(|p| economy.check(country, *p, week).is_ok())
}

/// Play one week for an AI country.
pub fn take_turn<R: RandomSource>(
    country: &mut Country,
    strategy: Strategy,
    outlook: &Outlook,
    economy: &Economy,
    week: u32,
    cfg: &AiConfig,
    rng: &mut R,
) -> Turn {
    let own = military_power(country, Stance::Neutral);
    let reaction = detect_reaction(own, outlook, cfg);
    let weights = effective_weights(strategy, reaction, cfg);
    let plan = allocate(weights, country.development_points, rng);
    let allocation = match country.apply_development(&plan) {
        Ok(_) => plan,
        Err(err) => {
            warn!(country = %country.name, %err, "allocation rejected");
            BTreeMap::new()
        }
    };
    let built = if cfg.build {
        choose_project(strategy, country, economy, week).and_then(|p| economy.build(country, p, week).ok().map(|_| p))
    } else {
        None
    };
    debug!(country = %country.name, %strategy, ?reaction, ?built, "ai turn");
    Turn { reaction, allocation, built }
}
