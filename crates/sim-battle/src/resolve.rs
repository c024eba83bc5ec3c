//! Strength roll, outcome tier and casualties.

use crate::config::{BattleConfig, Range};
use serde::{Deserialize, Serialize};
use sim_core::{Country, CountryId, RandomSource};
use sim_econ::{military_power, Stance};
use std::fmt;
use tracing::debug;

/// Result from the attacker's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Draw,
    Defeat,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Victory => "victory",
            Outcome::Draw => "draw",
            Outcome::Defeat => "defeat",
        })
    }
}

/// One side of a resolved battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub country: CountryId,
    /// Power before noise.
    pub power: f64,
    /// Power after noise.
    pub strength: f64,
    pub army_before: u64,
    pub casualty_rate: f64,
    pub casualties: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub attacker: Side,
    pub defender: Side,
    pub ratio: f64,
    pub outcome: Outcome,
    pub week: u32,
    /// Set once a post-battle action has been taken.
    pub settled: bool,
}

/// Noisy strengths, ratio and tier for two raw powers.
pub fn resolve_strengths<R: RandomSource>(
    attack_power: f64,
    defense_power: f64,
    cfg: &BattleConfig,
    rng: &mut R,
) -> (f64, f64, f64, Outcome) {
    let a = attack_power * rng.uniform_f64(cfg.noise.low, cfg.noise.high);
    let d = defense_power * rng.uniform_f64(cfg.noise.low, cfg.noise.high);
    let ratio = a / (d + 1.0);
    let outcome = if ratio > cfg.victory_ratio {
        Outcome::Victory
    } else if ratio < cfg.defeat_ratio {
        Outcome::Defeat
    } else {
        Outcome::Draw
    };
    (a, d, ratio, outcome)
}

/// Casualty ranges for (attacker, defender).
pub fn casualty_ranges(outcome: Outcome, cfg: &BattleConfig) -> (Range, Range) {
    match outcome {
        Outcome::Victory => (cfg.winner_casualties, cfg.loser_casualties),
        Outcome::Defeat => (cfg.loser_casualties, cfg.winner_casualties),
        Outcome::Draw => (cfg.draw_casualties, cfg.draw_casualties),
    }
}

fn side<R: RandomSource>(country: &Country, power: f64, strength: f64, range: Range, rng: &mut R) -> Side {
    let rate = rng.uniform_f64(range.low, range.high);
    let casualties = ((country.army as f64 * rate).floor() as u64).min(country.army);
    Side {
        country: country.id,
        power,
        strength,
        army_before: country.army,
        casualty_rate: rate,
        casualties,
    }
}

/// Resolve a battle without touching either country.
pub fn resolve<R: RandomSource>(
    attacker: &Country,
    defender: &Country,
    week: u32,
    cfg: &BattleConfig,
    rng: &mut R,
) -> BattleReport {
    let ap = military_power(attacker, Stance::Attack);
    let dp = military_power(defender, Stance::Defense);
    let (a, d, ratio, outcome) = resolve_strengths(ap, dp, cfg, rng);
    let (att_range, def_range) = casualty_ranges(outcome, cfg);
    let report = BattleReport {
        attacker: side(attacker, ap, a, att_range, rng),
        defender: side(defender, dp, d, def_range, rng),
        ratio,
        outcome,
        week,
        settled: false,
    };
    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        ratio = report.ratio,
        outcome = %report.outcome,
        "battle resolved"
    );
    report
}

/// Remove reported casualties from army and population of both sides.
pub fn apply_casualties(report: &BattleReport, attacker: &mut Country, defender: &mut Country) {
    for (side, country) in [(&report.attacker, attacker), (&report.defender, defender)] {
        let lost = country.remove_army(side.casualties);
        country.remove_population(lost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::{CountrySeed, GameRng, ScriptedRng};

    fn nation(id: u32, army: u64) -> Country {
        let mut c = Country::new(CountryId(id), format!("N{id}"), false, &CountrySeed::default());
        c.army = army;
        c.max_army_size = army.max(c.max_army_size);
        c
    }

    #[test]
    fn fixed_noise_double_power_is_a_victory() {
        let cfg = BattleConfig::default();
        let mut rng = ScriptedRng::constant(0.5);
        let (a, d, ratio, outcome) = resolve_strengths(100.0, 50.0, &cfg, &mut rng);
        assert!((a - 100.0).abs() < 1e-9 && (d - 50.0).abs() < 1e-9);
        assert!((ratio - 100.0 / 51.0).abs() < 1e-9);
        assert_eq!(outcome, Outcome::Victory);

        let (_, def) = casualty_ranges(outcome, &cfg);
        assert_eq!(def, Range::new(0.4, 0.7));
    }

    #[test]
    fn tiers_follow_ratio_bands() {
        let cfg = BattleConfig::default();
        let mut rng = ScriptedRng::constant(0.5);
        assert_eq!(resolve_strengths(50.0, 100.0, &cfg, &mut rng).3, Outcome::Defeat);
        assert_eq!(resolve_strengths(100.0, 99.0, &cfg, &mut rng).3, Outcome::Draw);
        // an empty defender still goes through the +1 guard
        assert_eq!(resolve_strengths(0.0, 0.0, &cfg, &mut rng).3, Outcome::Defeat);
        assert_eq!(resolve_strengths(5.0, 0.0, &cfg, &mut rng).3, Outcome::Victory);
    }

    #[test]
    fn casualties_hit_army_and_population_equally() {
        let cfg = BattleConfig::default();
        let mut att = nation(1, 2000);
        let mut def = nation(2, 500);
        let mut rng = ScriptedRng::constant(0.5);
        let report = resolve(&att, &def, 10, &cfg, &mut rng);
        assert_eq!(report.outcome, Outcome::Victory);
        let (a_lost, d_lost) = (report.attacker.casualties, report.defender.casualties);
        assert!((200..=500).contains(&a_lost));
        assert!((200..=350).contains(&d_lost));

        let (pop_a, pop_d) = (att.population, def.population);
        apply_casualties(&report, &mut att, &mut def);
        assert_eq!(att.army, 2000 - a_lost);
        assert_eq!(def.army, 500 - d_lost);
        assert_eq!(pop_a - att.population, a_lost);
        assert_eq!(pop_d - def.population, d_lost);
        assert!(!report.settled);
    }

    proptest! {
        #[test]
        fn casualties_never_exceed_armies(seed in any::<u64>(), a in 0u64..100_000, d in 0u64..100_000) {
            let cfg = BattleConfig::default();
            let mut att = nation(1, a);
            let mut def = nation(2, d);
            let mut rng = GameRng::new(seed);
            let report = resolve(&att, &def, 1, &cfg, &mut rng);
            prop_assert!(report.attacker.casualties <= a);
            prop_assert!(report.defender.casualties <= d);
            let (pa, pd) = (att.population, def.population);
            apply_casualties(&report, &mut att, &mut def);
            prop_assert_eq!(a - att.army, pa - att.population);
            prop_assert_eq!(d - def.army, pd - def.population);
        }
    }
}
