//! The country aggregate: one nation's full mutable state.
//!
//! Every mutator here keeps the basic invariants (non-negative stats,
//! population and money, `army <= max_army_size`). Derived economic values
//! are refreshed by `sim-econ`.

use crate::axis::{Axis, Stats};
use crate::config::CountrySeed;
use crate::economy::EconomicData;
use crate::error::{InvalidAction, ValidationError};
use crate::event::EventRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque country identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountryId(pub u32);

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The country registry, ordered by id for deterministic iteration.
pub type Roster = BTreeMap<CountryId, Country>;

/// Golden-age flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenAge {
    /// Set once, never cleared.
    pub activated: bool,
    /// Set on the week a golden age starts; cleared on the next week.
    pub triggered: bool,
}

/// Weekly summary line kept for charts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub week: u32,
    pub total_stats: f64,
    pub money: i64,
    pub population: u64,
    pub army: u64,
}

/// A nation taking part in the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub is_player: bool,
    /// False once conquered.
    pub is_active: bool,

    pub stats: Stats,
    /// Unspent development budget.
    pub development_points: u32,
    pub golden_age: GoldenAge,

    pub population: u64,
    /// Multiplier on natural population growth.
    pub birth_rate: f64,

    /// Treasury; never negative.
    pub money: i64,
    /// Base income before bonuses and multipliers.
    pub income: i64,

    pub army: u64,
    /// In `1..=max_experience`.
    pub army_experience: u8,
    pub max_army_size: u64,
    /// Recruitment purchases so far; drives recruitment cost.
    pub recruit_count: u32,
    /// Training purchases so far; drives training cost.
    pub training_count: u32,

    /// `None` until the economy is initialized for this country.
    pub economic: Option<EconomicData>,

    /// Append-only log of applied events.
    pub events: Vec<EventRecord>,
    pub history: Vec<HistoryEntry>,
}

impl Country {
    /// Fresh country with zero stats and the seeded treasury, population and
    /// army. Economic data is left uninitialized.
    pub fn new(id: CountryId, name: impl Into<String>, is_player: bool, seed: &CountrySeed) -> Self {
        Self {
            id,
            name: name.into(),
            is_player,
            is_active: true,
            stats: Stats::default(),
            development_points: 0,
            golden_age: GoldenAge::default(),
            population: seed.population,
            birth_rate: seed.birth_rate,
            money: seed.money.max(0),
            income: seed.income.max(0),
            army: seed.army.min(seed.population),
            army_experience: 1,
            max_army_size: seed.army.min(seed.population),
            recruit_count: 0,
            training_count: 0,
            economic: None,
            events: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        amount <= self.money
    }

    /// Add (or with a negative amount, remove) money, flooring at zero.
    pub fn credit(&mut self, amount: i64) {
        self.money = self.money.saturating_add(amount).max(0);
    }

    /// Remove exactly `amount` or fail without touching the treasury.
    pub fn debit(&mut self, amount: i64) -> Result<(), InvalidAction> {
        if amount < 0 || !self.can_afford(amount) {
            return Err(InvalidAction::InsufficientFunds);
        }
        self.money -= amount;
        Ok(())
    }

    /// Signed stat change with zero floor; returns the applied change.
    pub fn add_stat(&mut self, axis: Axis, delta: f64) -> f64 {
        self.stats.add(axis, delta)
    }

    pub fn grant_points(&mut self, points: u32) {
        self.development_points = self.development_points.saturating_add(points);
    }

    /// Spend development points on axes. Rejected as a whole when the sum
    /// exceeds the unspent budget. Returns the points spent.
    pub fn apply_development(&mut self, allocation: &BTreeMap<Axis, u32>) -> Result<u32, InvalidAction> {
        let total = allocation
            .values()
            .try_fold(0u32, |acc, &p| acc.checked_add(p))
            .ok_or(InvalidAction::InsufficientPoints)?;
        if total > self.development_points {
            return Err(InvalidAction::InsufficientPoints);
        }
        for (&axis, &points) in allocation {
            self.stats.add(axis, f64::from(points));
        }
        self.development_points -= total;
        Ok(total)
    }

    pub fn add_population(&mut self, amount: u64) {
        self.population = self.population.saturating_add(amount);
    }

    /// Remove up to `amount` people; returns how many were removed.
    pub fn remove_population(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.population);
        self.population -= removed;
        removed
    }

    /// Remove up to `amount` soldiers; returns how many were removed.
    pub fn remove_army(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.army);
        self.army -= removed;
        removed
    }

    /// Set the army cap and pull the army down to it if needed.
    pub fn set_max_army(&mut self, max: u64) {
        self.max_army_size = max;
        self.clamp_army();
    }

    pub fn clamp_army(&mut self) {
        if self.army > self.max_army_size {
            self.army = self.max_army_size;
        }
    }

    pub fn log_event(&mut self, record: EventRecord) {
        self.events.push(record);
    }

    pub fn record_history(&mut self, week: u32) {
        self.history.push(HistoryEntry {
            week,
            total_stats: self.stats.total(),
            money: self.money,
            population: self.population,
            army: self.army,
        });
    }

    /// Check the invariants that must hold at every observation point.
    pub fn validate(&self, max_experience: u8) -> Result<(), ValidationError> {
        for (axis, v) in self.stats.iter() {
            if !v.is_finite() || v < 0.0 {
                return Err(ValidationError::BadStat(axis));
            }
        }
        if self.money < 0 {
            return Err(ValidationError::NegativeMoney);
        }
        if self.army > self.max_army_size {
            return Err(ValidationError::ArmyOverCap {
                army: self.army,
                max: self.max_army_size,
            });
        }
        if self.army_experience == 0 || self.army_experience > max_experience {
            return Err(ValidationError::ExperienceOutOfRange(self.army_experience));
        }
        if !self.birth_rate.is_finite() {
            return Err(ValidationError::NonFinite);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn country() -> Country {
        Country::new(CountryId(1), "Testland", true, &CountrySeed::default())
    }

    #[test]
    fn new_country_is_valid() {
        let c = country();
        c.validate(10).unwrap();
        assert_eq!(c.stats.total(), 0.0);
        assert!(c.economic.is_none());
        assert!(c.is_active);
    }

    #[test]
    fn development_rejects_overspend_without_side_effects() {
        let mut c = country();
        c.grant_points(10);
        let ask = BTreeMap::from([(Axis::Military, 6), (Axis::Science, 5)]);
        assert_eq!(c.apply_development(&ask), Err(InvalidAction::InsufficientPoints));
        assert_eq!(c.development_points, 10);
        assert_eq!(c.stats.total(), 0.0);

        let ok = BTreeMap::from([(Axis::Military, 6), (Axis::Science, 4)]);
        assert_eq!(c.apply_development(&ok), Ok(10));
        assert_eq!(c.development_points, 0);
        assert_eq!(c.stats.military, 6.0);
        assert_eq!(c.stats.science, 4.0);
    }

    #[test]
    fn debit_is_all_or_nothing() {
        let mut c = country();
        assert_eq!(c.debit(5_000), Err(InvalidAction::InsufficientFunds));
        assert_eq!(c.money, 1_000);
        c.debit(400).unwrap();
        assert_eq!(c.money, 600);
        c.credit(-10_000);
        assert_eq!(c.money, 0);
    }

    #[test]
    fn shrinking_cap_clamps_army() {
        let mut c = country();
        c.set_max_army(10);
        assert_eq!(c.army, 10);
        c.validate(10).unwrap();
    }

    proptest! {
        #[test]
        fn removals_never_underflow(pop in 0u64..10_000, army in 0u64..10_000, loss in 0u64..20_000) {
            let mut c = country();
            c.population = pop;
            c.army = army.min(pop);
            c.max_army_size = c.army;
            let removed_army = c.remove_army(loss);
            let removed_pop = c.remove_population(loss);
            prop_assert!(removed_army <= army);
            prop_assert!(removed_pop <= pop);
            prop_assert!(c.validate(10).is_ok());
        }
    }
}
