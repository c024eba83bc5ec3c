//! Military cross-cut of the economy.
//!
//! Industries and infrastructure feed a bonus set that drives the army cap,
//! upkeep and combat power. The bonus set is recomputed whenever economic
//! assets or population change.

use crate::config::{EconConfig, MilitaryConfig};
use crate::synergy::SynergyFlags;
use sim_core::{Country, EconomicData, MilitaryBonuses};

/// Which side of a fight power is evaluated for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stance {
    Attack,
    Defense,
    /// Raw power without attack/defense modifiers.
    Neutral,
}

fn add_scaled(acc: &mut MilitaryBonuses, b: &MilitaryBonuses, times: f64) {
    acc.army_size += b.army_size * times;
    acc.experience += b.experience * times;
    acc.maintenance_reduction += b.maintenance_reduction * times;
    acc.attack += b.attack * times;
    acc.defense += b.defense * times;
    acc.recruitment += b.recruitment * times;
}

/// Aggregate military bonuses from economic assets.
pub fn military_bonuses(econ: &EconomicData, cfg: &MilitaryConfig) -> MilitaryBonuses {
    let mut acc = MilitaryBonuses::default();
    for (kind, b) in &cfg.per_industry_level {
        add_scaled(&mut acc, b, f64::from(econ.industry_level(*kind)));
    }
    for kind in &econ.infrastructure {
        if let Some(b) = cfg.per_infrastructure.get(kind) {
            add_scaled(&mut acc, b, 1.0);
        }
    }
    let flags = SynergyFlags::of(&econ.infrastructure);
    if flags.transport {
        add_scaled(&mut acc, &cfg.transport, 1.0);
    }
    if flags.education {
        add_scaled(&mut acc, &cfg.education, 1.0);
    }
    if flags.complete {
        add_scaled(&mut acc, &cfg.complete, 1.0);
    }
    let cap = |v: f64, max: f64| v.clamp(0.0, max);
    MilitaryBonuses {
        army_size: cap(acc.army_size, cfg.bonus_cap),
        experience: cap(acc.experience, cfg.bonus_cap),
        maintenance_reduction: cap(acc.maintenance_reduction, cfg.maintenance_cap),
        attack: cap(acc.attack, cfg.bonus_cap),
        defense: cap(acc.defense, cfg.bonus_cap),
        recruitment: cap(acc.recruitment, cfg.bonus_cap),
    }
}

/// `floor(population * ratio * (1 + army_size))`.
pub fn max_army_size(population: u64, bonuses: &MilitaryBonuses, cfg: &MilitaryConfig) -> u64 {
    let cap = population as f64 * cfg.army_population_ratio * (1.0 + bonuses.army_size);
    if !cap.is_finite() || cap <= 0.0 {
        return 0;
    }
    (cap.floor() as u64).min(population)
}

/// Recompute cached bonuses and the army cap, clamping the army.
pub fn refresh_military(country: &mut Country, cfg: &EconConfig) {
    let bonuses = country
        .economic
        .as_ref()
        .map(|e| military_bonuses(e, &cfg.military))
        .unwrap_or_default();
    let max = max_army_size(country.population, &bonuses, &cfg.military);
    if let Some(econ) = country.economic.as_mut() {
        econ.military = bonuses;
    }
    country.set_max_army(max);
}

fn cached(country: &Country) -> MilitaryBonuses {
    country
        .economic
        .as_ref()
        .map(|e| e.military.clone())
        .unwrap_or_default()
}

/// Weekly upkeep: `floor(army * per_soldier * (1 - maintenance_reduction))`.
pub fn maintenance_cost(country: &Country, cfg: &MilitaryConfig) -> i64 {
    let b = cached(country);
    let cost = country.army as f64 * cfg.maintenance_per_soldier * (1.0 - b.maintenance_reduction);
    if cost.is_finite() && cost > 0.0 {
        cost.floor() as i64
    } else {
        0
    }
}

/// Combat power derived from army size, military stat and experience.
pub fn military_power(country: &Country, stance: Stance) -> f64 {
    let b = cached(country);
    let base = country.army as f64
        * (1.0 + country.stats.military / 10.0)
        * (1.0 + f64::from(country.army_experience.saturating_sub(1)) / 10.0);
    match stance {
        Stance::Attack => base * (1.0 + b.attack),
        Stance::Defense => base * (1.0 + b.defense),
        Stance::Neutral => base,
    }
}

/// Money needed for the next recruitment round.
pub fn recruit_cost(country: &Country, cfg: &MilitaryConfig) -> i64 {
    let b = cached(country);
    let raw = cfg.recruit_base_cost as f64
        * cfg.recruit_cost_growth.powi(country.recruit_count.min(i32::MAX as u32) as i32)
        * (1.0 - b.recruitment).max(0.0);
    raw.ceil().min(i64::MAX as f64) as i64
}

/// Money needed for the next training round.
pub fn train_cost(country: &Country, cfg: &MilitaryConfig) -> i64 {
    let raw = cfg.train_base_cost as f64
        * cfg.train_cost_growth.powi(country.training_count.min(i32::MAX as u32) as i32);
    raw.ceil().min(i64::MAX as f64) as i64
}
