//! Application, aging and reversal of event instances.

use crate::catalog::{Catalog, EventTemplate};
use crate::config::EventConfig;
use crate::generate::pick_template;
use serde::{Deserialize, Serialize};
use sim_core::{Axis, Country, CountryId, EventEffect, EventId, EventKind, EventRecord, Project, RandomSource, Roster, Stats};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A timed event still waiting to expire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub country: CountryId,
    pub record: EventRecord,
}

/// Persistable part of the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub active: Vec<ActiveEvent>,
    pub next_id: u64,
}

/// Outcome of one generation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub expired: Vec<(CountryId, EventRecord)>,
    pub applied: Vec<(CountryId, EventRecord)>,
}

pub struct EventEngine {
    pub config: EventConfig,
    catalog: Catalog,
    state: EngineState,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

impl EventEngine {
    pub fn new(config: EventConfig, catalog: Catalog) -> Self {
        Self { config, catalog, state: EngineState::default() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active(&self) -> &[ActiveEvent] {
        &self.state.active
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn restore(&mut self, state: EngineState) {
        self.state = state;
    }

    fn allocate_id(&mut self) -> EventId {
        self.state.next_id += 1;
        EventId(self.state.next_id)
    }

    /// Bonus deltas on top of the base effect, computed against the stats
    /// before the event lands.
    pub fn bonus_for(&self, kind: EventKind, base: &BTreeMap<Axis, f64>, stats: &Stats) -> BTreeMap<Axis, f64> {
        let flat = match kind {
            EventKind::Milestone => self.config.milestone_bonus,
            EventKind::Discovery => self.config.discovery_bonus,
            _ => 0.0,
        };
        let mut bonus = BTreeMap::new();
        for (&axis, &delta) in base {
            if delta <= 0.0 {
                continue;
            }
            let mut extra = flat;
            if axis.synergies().iter().any(|&s| stats.get(s) > self.config.synergy_threshold) {
                extra += round1(delta * self.config.synergy_fraction);
            }
            if extra > 0.0 {
                bonus.insert(axis, extra);
            }
        }
        bonus
    }

    /// Apply `template` to `country` and return the resulting record.
    pub fn apply(&mut self, country: &mut Country, template: &EventTemplate, week: u32) -> EventRecord {
        let id = self.allocate_id();
        let base = template.effect.resolve(&country.stats);
        let bonus = self.bonus_for(template.kind, &base, &country.stats);
        // records hold the change that actually landed after the zero floor
        let applied: BTreeMap<Axis, f64> = base
            .into_iter()
            .map(|(axis, delta)| (axis, country.add_stat(axis, delta)))
            .collect();
        let bonus: BTreeMap<Axis, f64> = bonus
            .into_iter()
            .map(|(axis, delta)| (axis, country.add_stat(axis, delta)))
            .collect();
        country.credit(template.money);

        let pct = template.population_pct;
        if pct != 0.0 {
            let amount = (country.population as f64 * pct.abs()).floor() as u64;
            if pct > 0.0 {
                country.add_population(amount);
            } else {
                country.remove_population(amount);
            }
        }
        let mut birth_rate_delta = 0.0;
        if template.birth_rate_delta != 0.0 {
            let before = country.birth_rate;
            country.birth_rate = (before + template.birth_rate_delta).max(0.0);
            birth_rate_delta = country.birth_rate - before;
        }
        if let (Some(multipliers), Some(econ)) = (&template.investment_multipliers, country.economic.as_mut()) {
            econ.investment_multipliers = Some(multipliers.clone());
            econ.active_financial_event = Some(id);
        }
        if template.kind == EventKind::Inspiration {
            country.golden_age.activated = true;
            country.golden_age.triggered = true;
        }

        let record = EventRecord {
            id,
            kind: template.kind,
            title: template.title.clone(),
            description: template.description.clone(),
            effects: template.effect.clone(),
            applied,
            bonus,
            duration: template.duration,
            remaining: template.duration,
            week,
            money: template.money,
            population_pct: template.population_pct,
            birth_rate_delta,
            investment_multipliers: template.investment_multipliers.clone(),
        };
        info!(country = %country.name, event = %record.title, kind = %record.kind, id = %id, "event applied");
        country.log_event(record.clone());
        if record.is_timed() {
            self.state.active.push(ActiveEvent { country: country.id, record: record.clone() });
        }
        record
    }

    /// Undo the lasting parts of an expired event.
    pub fn revert(&self, country: &mut Country, record: &EventRecord) {
        for (&axis, &delta) in &record.applied {
            country.add_stat(axis, -delta);
        }
        if self.config.revert_synergy_bonus {
            for (&axis, &delta) in &record.bonus {
                country.add_stat(axis, -delta);
            }
        }
        if record.birth_rate_delta != 0.0 {
            country.birth_rate = (country.birth_rate - record.birth_rate_delta).max(0.0);
        }
        if let Some(econ) = country.economic.as_mut() {
            if econ.active_financial_event == Some(record.id) {
                econ.investment_multipliers = None;
                econ.active_financial_event = None;
            }
        }
    }

    /// Decrement every timed event once; revert and drop those reaching 0.
    pub fn age(&mut self, roster: &mut Roster) -> Vec<(CountryId, EventRecord)> {
        let mut expired = Vec::new();
        let active = std::mem::take(&mut self.state.active);
        for mut ev in active {
            ev.record.remaining = ev.record.remaining.saturating_sub(1);
            let Some(country) = roster.get_mut(&ev.country) else {
                debug!(country = %ev.country, id = %ev.record.id, "dropping event of unknown country");
                continue;
            };
            if let Some(logged) = country.events.iter_mut().find(|r| r.id == ev.record.id) {
                logged.remaining = ev.record.remaining;
            }
            if ev.record.remaining > 0 {
                self.state.active.push(ev);
                continue;
            }
            self.revert(country, &ev.record);
            info!(country = %country.name, event = %ev.record.title, "event expired");
            expired.push((ev.country, ev.record));
        }
        expired
    }

    /// Roll for one new event per active country.
    pub fn generate<R: RandomSource>(&mut self, roster: &mut Roster, week: u32, rng: &mut R) -> Vec<(CountryId, EventRecord)> {
        let mut applied = Vec::new();
        for country in roster.values_mut().filter(|c| c.is_active) {
            if !rng.chance(self.config.event_chance) {
                continue;
            }
            let Some(template) = pick_template(country, week, &self.config, &self.catalog, rng).cloned() else {
                debug!(country = %country.name, "no eligible event");
                continue;
            };
            let record = self.apply(country, &template, week);
            applied.push((country.id, record));
        }
        applied
    }

    /// Aging followed by generation.
    pub fn run_pass<R: RandomSource>(&mut self, roster: &mut Roster, week: u32, rng: &mut R) -> PassReport {
        let expired = self.age(roster);
        let applied = self.generate(roster, week, rng);
        PassReport { expired, applied }
    }

    /// Log a completed construction as an instantaneous record. Investments
    /// are not logged.
    pub fn log_construction(&mut self, country: &mut Country, project: Project, week: u32) -> Option<EventRecord> {
        let (kind, title, description) = match project {
            Project::Industry(k) => {
                let level = country.economic.as_ref().map_or(0, |e| e.industry_level(k));
                (EventKind::Industry, format!("Industry expanded: {k}"), format!("The {k} sector reaches level {level}."))
            }
            Project::Infrastructure(k) => (
                EventKind::Infrastructure,
                format!("Infrastructure completed: {k}"),
                format!("Construction of {k} is finished."),
            ),
            Project::Investment(_) => return None,
        };
        let record = EventRecord {
            id: self.allocate_id(),
            kind,
            title,
            description,
            effects: EventEffect::None,
            applied: BTreeMap::new(),
            bonus: BTreeMap::new(),
            duration: 0,
            remaining: 0,
            week,
            money: 0,
            population_pct: 0.0,
            birth_rate_delta: 0.0,
            investment_multipliers: None,
        };
        country.log_event(record.clone());
        Some(record)
    }

    pub fn has_active_crisis(&self, country: CountryId) -> bool {
        self.state
            .active
            .iter()
            .any(|e| e.country == country && e.record.kind == EventKind::Crisis)
    }

    /// Drop pending timed events of a country that left the game.
    pub fn forget(&mut self, country: CountryId) {
        self.state.active.retain(|e| e.country != country);
    }
}

impl Default for EventEngine {
    fn default() -> Self {
        Self::new(EventConfig::default(), Catalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{CountrySeed, EconomicData, InvestmentKind, ScriptedRng};

    fn roster_of(countries: Vec<Country>) -> Roster {
        countries.into_iter().map(|c| (c.id, c)).collect()
    }

    fn country(id: u32) -> Country {
        Country::new(CountryId(id), format!("C{id}"), false, &CountrySeed::default())
    }

    fn crisis(duration: u32) -> EventTemplate {
        EventTemplate::new(EventKind::Crisis, "drought", "Drought")
            .deltas(&[(Axis::Economy, -2.0)])
            .lasting(duration)
    }

    #[test]
    fn synergy_bonus_only_on_positive_deltas() {
        let engine = EventEngine::default();
        let mut stats = Stats::default();
        stats.set(Axis::Economy, 6.0);
        let base = BTreeMap::from([(Axis::Military, 3.0), (Axis::Social, -2.0)]);
        let bonus = engine.bonus_for(EventKind::Personage, &base, &stats);
        assert_eq!(bonus, BTreeMap::from([(Axis::Military, 0.6)]));

        // economy exactly at the threshold does not count
        stats.set(Axis::Economy, 5.0);
        assert!(engine.bonus_for(EventKind::Personage, &base, &stats).is_empty());
    }

    #[test]
    fn milestone_and_discovery_add_flat_bonus() {
        let engine = EventEngine::default();
        let stats = Stats::default();
        let base = BTreeMap::from([(Axis::Science, 2.0), (Axis::Culture, 1.0)]);
        let m = engine.bonus_for(EventKind::Milestone, &base, &stats);
        assert_eq!(m, BTreeMap::from([(Axis::Culture, 1.0), (Axis::Science, 1.0)]));
        let d = engine.bonus_for(EventKind::Discovery, &base, &stats);
        assert_eq!(d.get(&Axis::Science), Some(&0.5));
    }

    #[test]
    fn timed_event_reverts_base_effect_after_aging() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        c.stats.set(Axis::Economy, 5.0);
        let rec = engine.apply(&mut c, &crisis(2), 4);
        assert_eq!(c.stats.economy, 3.0);
        assert_eq!(rec.remaining, 2);
        assert!(engine.has_active_crisis(CountryId(1)));

        let mut roster = roster_of(vec![c]);
        assert!(engine.age(&mut roster).is_empty());
        assert_eq!(roster[&CountryId(1)].events[0].remaining, 1);
        let expired = engine.age(&mut roster);
        assert_eq!(expired.len(), 1);
        assert!(engine.active().is_empty());
        assert_eq!(roster[&CountryId(1)].stats.economy, 5.0);
        assert!(!engine.has_active_crisis(CountryId(1)));
    }

    #[test]
    fn synergy_drift_survives_reversal_by_default() {
        let boost = EventTemplate::new(EventKind::Cultural, "revival", "Revival")
            .deltas(&[(Axis::Culture, 2.0)])
            .lasting(1);
        let mut c = country(1);
        c.stats.set(Axis::Social, 6.0);

        let mut engine = EventEngine::default();
        let rec = engine.apply(&mut c, &boost, 4);
        assert_eq!(rec.bonus, BTreeMap::from([(Axis::Culture, 0.4)]));
        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        assert!((roster[&CountryId(1)].stats.culture - 0.4).abs() < 1e-9);

        let mut c = country(1);
        c.stats.set(Axis::Social, 6.0);

        let mut exact = EventEngine::new(
            EventConfig { revert_synergy_bonus: true, ..EventConfig::default() },
            Catalog::default(),
        );
        exact.apply(&mut c, &boost, 4);
        let mut roster = roster_of(vec![c]);
        exact.age(&mut roster);
        assert!(roster[&CountryId(1)].stats.culture.abs() < 1e-9);
    }

    #[test]
    fn reversal_floors_stats_at_zero() {
        let gift = EventTemplate::new(EventKind::Cultural, "gift", "Gift")
            .deltas(&[(Axis::Culture, 3.0)])
            .lasting(1);
        let mut engine = EventEngine::default();
        let mut c = country(1);
        engine.apply(&mut c, &gift, 4);
        c.stats.set(Axis::Culture, 1.0);
        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        assert_eq!(roster[&CountryId(1)].stats.culture, 0.0);
    }

    #[test]
    fn crisis_on_empty_stats_leaves_nothing_behind() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        c.stats.set(Axis::Social, 1.0);
        let before = c.stats.clone();
        let t = engine.catalog().get("plague").cloned().unwrap();
        let rec = engine.apply(&mut c, &t, 4);
        assert_eq!(rec.applied, BTreeMap::from([(Axis::Economy, 0.0), (Axis::Social, -1.0)]));
        assert_eq!(c.stats.social, 0.0);

        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        engine.age(&mut roster);
        assert!(engine.active().is_empty());
        assert_eq!(roster[&CountryId(1)].stats, before);
    }

    #[test]
    fn birth_rate_floor_is_undone_exactly() {
        let bust = EventTemplate::new(EventKind::Population, "bust", "Bust")
            .population(-0.01, -2.0)
            .lasting(1);
        let mut engine = EventEngine::default();
        let mut c = country(1);
        let rec = engine.apply(&mut c, &bust, 4);
        assert_eq!(c.birth_rate, 0.0);
        assert!((rec.birth_rate_delta + 1.0).abs() < 1e-9);
        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        assert!((roster[&CountryId(1)].birth_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn newer_financial_event_overwrites_the_slot() {
        let boom = EventTemplate::new(EventKind::Financial, "boom", "Boom")
            .multipliers(&[(InvestmentKind::Stocks, 1.5)])
            .money(500)
            .lasting(1);
        let panic = EventTemplate::new(EventKind::Financial, "panic", "Panic")
            .multipliers(&[(InvestmentKind::Stocks, 0.5)])
            .lasting(2);
        let mut engine = EventEngine::default();
        let mut c = country(1);
        c.economic = Some(EconomicData::default());
        let first = engine.apply(&mut c, &boom, 4);
        assert_eq!(c.money, 1500);
        let second = engine.apply(&mut c, &panic, 4);
        let econ = c.economic.as_ref().unwrap();
        assert_eq!(econ.active_financial_event, Some(second.id));
        assert_ne!(first.id, second.id);

        // the older event expires first and must leave the newer slot alone
        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        let econ = roster[&CountryId(1)].economic.as_ref().unwrap();
        assert_eq!(econ.interest_multiplier(InvestmentKind::Stocks), 0.5);
        engine.age(&mut roster);
        let econ = roster[&CountryId(1)].economic.as_ref().unwrap();
        assert_eq!(econ.active_financial_event, None);
        assert_eq!(econ.interest_multiplier(InvestmentKind::Stocks), 1.0);
    }

    #[test]
    fn population_event_moves_people_and_birth_rate() {
        let boom = EventTemplate::new(EventKind::Population, "boom", "Boom")
            .population(0.03, 0.3)
            .lasting(1);
        let mut engine = EventEngine::default();
        let mut c = country(1);
        engine.apply(&mut c, &boom, 4);
        assert_eq!(c.population, 1_030_000);
        assert!((c.birth_rate - 1.3).abs() < 1e-9);
        let mut roster = roster_of(vec![c]);
        engine.age(&mut roster);
        let c = &roster[&CountryId(1)];
        assert_eq!(c.population, 1_030_000);
        assert!((c.birth_rate - 1.0).abs() < 1e-9);
    }

    #[test]
    fn inspiration_marks_golden_age() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        let t = engine.catalog().get("enlightenment").cloned().unwrap();
        let rec = engine.apply(&mut c, &t, 30);
        assert!(c.golden_age.activated && c.golden_age.triggered);
        assert_eq!(rec.kind.label(), "Golden Age");
        assert!(!rec.is_timed());
        assert!(engine.active().is_empty());
    }

    #[test]
    fn lowest_stat_is_resolved_at_application() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        for a in Axis::ALL {
            c.stats.set(a, 4.0);
        }
        c.stats.set(Axis::Social, 1.0);
        let t = engine.catalog().get("wandering_scholar").cloned().unwrap();
        let rec = engine.apply(&mut c, &t, 8);
        assert_eq!(rec.applied, BTreeMap::from([(Axis::Social, 2.0)]));
        assert_eq!(c.stats.social, 3.0);
    }

    #[test]
    fn generation_skips_inactive_and_failed_rolls() {
        let mut engine = EventEngine::default();
        let mut dead = country(2);
        dead.is_active = false;
        let mut roster = roster_of(vec![country(1), dead]);
        // 0.9 fails the 0.75 roll
        let mut rng = ScriptedRng::constant(0.9);
        assert!(engine.generate(&mut roster, 4, &mut rng).is_empty());

        let mut rng = ScriptedRng::constant(0.1);
        let applied = engine.generate(&mut roster, 4, &mut rng);
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0, CountryId(1));
        assert!(roster[&CountryId(2)].events.is_empty());
    }

    #[test]
    fn construction_records_are_instantaneous() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        let rec = engine
            .log_construction(&mut c, Project::Infrastructure(sim_core::InfrastructureKind::Roads), 3)
            .unwrap();
        assert_eq!(rec.kind, EventKind::Infrastructure);
        assert_eq!(rec.duration, 0);
        assert_eq!(c.events.len(), 1);
        assert!(engine
            .log_construction(&mut c, Project::Investment(InvestmentKind::Bonds), 3)
            .is_none());
    }

    #[test]
    fn state_restores_ids_and_active_list() {
        let mut engine = EventEngine::default();
        let mut c = country(1);
        engine.apply(&mut c, &crisis(3), 4);
        let saved = engine.state().clone();
        let mut fresh = EventEngine::default();
        fresh.restore(saved.clone());
        assert_eq!(fresh.state(), &saved);
        let next = fresh.apply(&mut c, &crisis(1), 8);
        assert_eq!(next.id, EventId(2));
        fresh.forget(CountryId(1));
        assert!(fresh.active().is_empty());
    }
}
