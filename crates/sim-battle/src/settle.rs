//! Post-battle transforms chosen by the victor.

use crate::config::BattleConfig;
use crate::resolve::{BattleReport, Outcome};
use serde::{Deserialize, Serialize};
use sim_core::{Axis, Country, InvalidAction};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostBattle {
    Loot,
    Raze,
    Conquer,
}

impl fmt::Display for PostBattle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PostBattle::Loot => "loot",
            PostBattle::Raze => "raze",
            PostBattle::Conquer => "conquer",
        })
    }
}

/// What moved from defender to attacker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Spoils {
    pub money: i64,
    pub stats: BTreeMap<Axis, f64>,
    pub population: u64,
    pub conquered: bool,
}

fn transfer_stats(fraction: f64, attacker: &mut Country, defender: &mut Country) -> BTreeMap<Axis, f64> {
    let mut moved = BTreeMap::new();
    for axis in Axis::ALL {
        let amount = (defender.stats.get(axis) * fraction).floor();
        if amount <= 0.0 {
            continue;
        }
        defender.add_stat(axis, -amount);
        attacker.add_stat(axis, amount);
        moved.insert(axis, amount);
    }
    moved
}

/// Check that `action` may be taken on `report`.
pub fn check(report: &BattleReport, action: PostBattle, defender: &Country) -> Result<(), InvalidAction> {
    if report.settled {
        return Err(InvalidAction::AlreadySettled);
    }
    if report.outcome != Outcome::Victory {
        return Err(InvalidAction::NotAVictory);
    }
    if action == PostBattle::Conquer && defender.army > 0 {
        return Err(InvalidAction::ArmyNotDefeated);
    }
    Ok(())
}

/// Apply a post-battle action and mark the report settled. A settled report
/// rejects every further action.
pub fn settle(
    report: &mut BattleReport,
    action: PostBattle,
    attacker: &mut Country,
    defender: &mut Country,
    cfg: &BattleConfig,
) -> Result<Spoils, InvalidAction> {
    check(report, action, defender)?;
    let mut spoils = Spoils::default();
    match action {
        PostBattle::Loot => {
            let take = (defender.money as f64 * cfg.loot_fraction).floor() as i64;
            let take = take.clamp(0, defender.money.max(0));
            defender.money -= take;
            attacker.credit(take);
            spoils.money = take;
        }
        PostBattle::Raze => {
            spoils.stats = transfer_stats(cfg.raze_fraction, attacker, defender);
        }
        PostBattle::Conquer => {
            spoils.stats = transfer_stats(cfg.conquer_stat_fraction, attacker, defender);
            let people = defender.remove_population(defender.population);
            attacker.add_population(people);
            defender.is_active = false;
            spoils.population = people;
            spoils.conquered = true;
            info!(attacker = %attacker.name, defender = %defender.name, people, "country conquered");
        }
    }
    report.settled = true;
    debug!(action = %action, money = spoils.money, "battle settled");
    Ok(spoils)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Side;
    use sim_core::{CountryId, CountrySeed};

    fn side(id: u32) -> Side {
        Side {
            country: CountryId(id),
            power: 0.0,
            strength: 0.0,
            army_before: 0,
            casualty_rate: 0.0,
            casualties: 0,
        }
    }

    fn report(outcome: Outcome) -> BattleReport {
        BattleReport {
            attacker: side(1),
            defender: side(2),
            ratio: 2.0,
            outcome,
            week: 5,
            settled: false,
        }
    }

    fn pair() -> (Country, Country) {
        let seed = CountrySeed::default();
        let mut a = Country::new(CountryId(1), "A", false, &seed);
        let mut d = Country::new(CountryId(2), "D", false, &seed);
        for axis in Axis::ALL {
            a.stats.set(axis, 2.0);
            d.stats.set(axis, 10.0);
        }
        d.money = 1001;
        (a, d)
    }

    #[test]
    fn loot_takes_three_quarters_floored() {
        let (mut a, mut d) = pair();
        let mut r = report(Outcome::Victory);
        let spoils = settle(&mut r, PostBattle::Loot, &mut a, &mut d, &BattleConfig::default()).unwrap();
        assert_eq!(spoils.money, 750);
        assert_eq!(d.money, 251);
        assert_eq!(a.money, 1750);
        assert!(r.settled);
    }

    #[test]
    fn settled_report_rejects_second_action() {
        let (mut a, mut d) = pair();
        let cfg = BattleConfig::default();
        let mut r = report(Outcome::Victory);
        settle(&mut r, PostBattle::Raze, &mut a, &mut d, &cfg).unwrap();
        let before = (a.clone(), d.clone());
        assert_eq!(
            settle(&mut r, PostBattle::Loot, &mut a, &mut d, &cfg),
            Err(InvalidAction::AlreadySettled)
        );
        assert_eq!((a, d), before);
    }

    #[test]
    fn raze_moves_a_quarter_of_each_stat() {
        let (mut a, mut d) = pair();
        let mut r = report(Outcome::Victory);
        let spoils = settle(&mut r, PostBattle::Raze, &mut a, &mut d, &BattleConfig::default()).unwrap();
        for axis in Axis::ALL {
            assert_eq!(spoils.stats[&axis], 2.0);
            assert_eq!(d.stats.get(axis), 8.0);
            assert_eq!(a.stats.get(axis), 4.0);
        }
    }

    #[test]
    fn only_victories_can_be_settled() {
        let (mut a, mut d) = pair();
        let cfg = BattleConfig::default();
        for outcome in [Outcome::Draw, Outcome::Defeat] {
            let mut r = report(outcome);
            assert_eq!(
                settle(&mut r, PostBattle::Loot, &mut a, &mut d, &cfg),
                Err(InvalidAction::NotAVictory)
            );
            assert!(!r.settled);
        }
    }

    #[test]
    fn conquest_requires_destroyed_army_and_absorbs_population() {
        let (mut a, mut d) = pair();
        let cfg = BattleConfig::default();
        let mut r = report(Outcome::Victory);
        assert_eq!(
            settle(&mut r, PostBattle::Conquer, &mut a, &mut d, &cfg),
            Err(InvalidAction::ArmyNotDefeated)
        );
        d.army = 0;
        let spoils = settle(&mut r, PostBattle::Conquer, &mut a, &mut d, &cfg).unwrap();
        assert!(spoils.conquered);
        assert_eq!(spoils.population, 1_000_000);
        assert_eq!(a.population, 2_000_000);
        assert_eq!(d.population, 0);
        assert!(!d.is_active);
        assert_eq!(a.stats.military, 3.0);
        assert_eq!(d.stats.military, 9.0);
    }
}
