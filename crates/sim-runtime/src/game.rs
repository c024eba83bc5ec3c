//! The session: country registry, commands and the weekly sequence.

use crate::calendar::Calendar;
use crate::config::{ConfigError, GameConfig};
use crate::snapshot::{GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sim_ai::{take_turn, Outlook, Strategy};
use sim_battle::{apply_casualties, resolve, settle, BattleReport, PostBattle, Spoils};
use sim_core::{
    Axis, Country, CountryId, EventRecord, GameRng, InvalidAction, InvestmentKind, Project, Roster,
};
use sim_econ::{military_power, Economy, IncomeBreakdown, Price, Stance};
use sim_events::{Catalog, EventEngine};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info, warn};

/// An event record waiting to be shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingEvent {
    pub country: CountryId,
    pub record: EventRecord,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// A country pushed one axis to the victory threshold.
    Victory { country: CountryId, axis: Axis },
    /// Time ran out; the leader has the highest stat total.
    TimeLimit { leader: Option<CountryId> },
    /// The player's country was conquered.
    Defeated,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeekReport {
    pub week: u32,
    pub events_applied: usize,
    pub events_expired: usize,
    pub ai_turns: usize,
    pub outcome: Option<GameOutcome>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayReport {
    pub day_of_week: u8,
    pub week: Option<WeekReport>,
}

pub struct Game {
    config: GameConfig,
    countries: Roster,
    calendar: Calendar,
    economy: Economy,
    events: EventEngine,
    ai: BTreeMap<CountryId, Strategy>,
    rng: GameRng,
    pending: VecDeque<PendingEvent>,
    outcome: Option<GameOutcome>,
}

fn unknown(id: CountryId) -> InvalidAction {
    warn!(country = %id, "unknown country");
    InvalidAction::UnknownCountry
}

fn active_mut(countries: &mut Roster, id: CountryId) -> Result<&mut Country, InvalidAction> {
    let country = countries.get_mut(&id).ok_or_else(|| unknown(id))?;
    if !country.is_active {
        return Err(InvalidAction::Inactive);
    }
    Ok(country)
}

fn pair_mut(countries: &mut Roster, a: CountryId, b: CountryId) -> Result<(&mut Country, &mut Country), InvalidAction> {
    if a == b {
        return Err(InvalidAction::SelfTarget);
    }
    let mut first = None;
    let mut second = None;
    for (id, c) in countries.iter_mut() {
        if *id == a {
            first = Some(c);
        } else if *id == b {
            second = Some(c);
        }
    }
    match (first, second) {
        (Some(x), Some(y)) => Ok((x, y)),
        (None, _) => Err(unknown(a)),
        (_, None) => Err(unknown(b)),
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = match &config.event_catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::default(),
        };
        let economy = Economy::new(config.econ.clone());
        let mut countries = Roster::new();
        let mut ai = BTreeMap::new();
        for (i, spec) in config.countries.iter().enumerate() {
            let id = CountryId(i as u32 + 1);
            let mut country = Country::new(id, spec.name.clone(), spec.is_player, &config.sim.seed);
            economy.init_country(&mut country);
            if !spec.is_player {
                let strategy = spec.strategy.unwrap_or(Strategy::ALL[i % Strategy::ALL.len()]);
                ai.insert(id, strategy);
            }
            countries.insert(id, country);
        }
        info!(countries = countries.len(), seed = config.sim.rng_seed, "game created");
        Ok(Self {
            countries,
            calendar: Calendar::new(config.start_date),
            economy,
            events: EventEngine::new(config.events.clone(), catalog),
            ai,
            rng: GameRng::new(config.sim.rng_seed),
            pending: VecDeque::new(),
            outcome: None,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn week(&self) -> u32 {
        self.calendar.week
    }

    pub fn date(&self) -> NaiveDate {
        self.calendar.date()
    }

    pub fn countries(&self) -> &Roster {
        &self.countries
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        let found = self.countries.get(&id);
        if found.is_none() {
            warn!(country = %id, "unknown country");
        }
        found
    }

    pub fn player(&self) -> Option<CountryId> {
        self.countries.values().find(|c| c.is_player).map(|c| c.id)
    }

    pub fn strategy(&self, id: CountryId) -> Option<Strategy> {
        self.ai.get(&id).copied()
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn events(&self) -> &EventEngine {
        &self.events
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Income breakdown a country would collect this week.
    pub fn income(&self, id: CountryId) -> Option<IncomeBreakdown> {
        self.country(id).map(|c| self.economy.income(c, self.calendar.week))
    }

    /// Current price of a project, for affordability displays.
    pub fn price(&self, id: CountryId, project: Project) -> Option<Price> {
        self.country(id).map(|c| self.economy.price(c, project, self.calendar.week))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Take the oldest event waiting to be shown.
    pub fn next_pending(&mut self) -> Option<PendingEvent> {
        self.pending.pop_front()
    }

    fn ensure_running(&self) -> Result<(), InvalidAction> {
        if self.is_over() {
            return Err(InvalidAction::GameOver);
        }
        Ok(())
    }

    // ---- commands ----

    pub fn apply_development(&mut self, id: CountryId, allocation: &BTreeMap<Axis, u32>) -> Result<u32, InvalidAction> {
        self.ensure_running()?;
        let spent = active_mut(&mut self.countries, id)?.apply_development(allocation)?;
        debug!(country = %id, spent, "development applied");
        Ok(spent)
    }

    /// Build an industry level or infrastructure, or buy an investment.
    pub fn build(&mut self, id: CountryId, project: Project) -> Result<Price, InvalidAction> {
        self.ensure_running()?;
        let week = self.calendar.week;
        let country = active_mut(&mut self.countries, id)?;
        let price = self.economy.build(country, project, week)?;
        if let Some(record) = self.events.log_construction(country, project, week) {
            self.pending.push_back(PendingEvent { country: id, record });
        }
        Ok(price)
    }

    pub fn invest(&mut self, id: CountryId, kind: InvestmentKind) -> Result<Price, InvalidAction> {
        self.build(id, Project::Investment(kind))
    }

    pub fn increase_army(&mut self, id: CountryId) -> Result<u64, InvalidAction> {
        self.ensure_running()?;
        let country = active_mut(&mut self.countries, id)?;
        self.economy.increase_army(country)
    }

    pub fn train_army(&mut self, id: CountryId) -> Result<u8, InvalidAction> {
        self.ensure_running()?;
        let max = self.config.sim.max_experience;
        let country = active_mut(&mut self.countries, id)?;
        self.economy.train_army(country, max)
    }

    /// Fight a battle and apply casualties. Post-battle actions are taken
    /// separately through [`Game::choose_outcome`].
    pub fn attack(&mut self, attacker: CountryId, defender: CountryId) -> Result<BattleReport, InvalidAction> {
        self.ensure_running()?;
        let week = self.calendar.week;
        let (a, d) = pair_mut(&mut self.countries, attacker, defender)?;
        if !a.is_active || !d.is_active {
            return Err(InvalidAction::Inactive);
        }
        let report = resolve(a, d, week, &self.config.battle, &mut self.rng);
        apply_casualties(&report, a, d);
        self.economy.refresh(a);
        self.economy.refresh(d);
        info!(attacker = %a.name, defender = %d.name, outcome = %report.outcome, "battle fought");
        Ok(report)
    }

    /// Loot, raze or conquer after a victory. The report is marked settled.
    pub fn choose_outcome(&mut self, report: &mut BattleReport, action: PostBattle) -> Result<Spoils, InvalidAction> {
        self.ensure_running()?;
        let defender = report.defender.country;
        let (a, d) = pair_mut(&mut self.countries, report.attacker.country, defender)?;
        if !a.is_active || !d.is_active {
            return Err(InvalidAction::Inactive);
        }
        let spoils = settle(report, action, a, d, &self.config.battle)?;
        self.economy.refresh(a);
        self.economy.refresh(d);
        if spoils.conquered {
            self.ai.remove(&defender);
            self.events.forget(defender);
            if self.player() == Some(defender) {
                info!("player country conquered");
                self.outcome = Some(GameOutcome::Defeated);
            }
        }
        Ok(spoils)
    }

    // ---- time ----

    /// Advance one day; runs the weekly sequence when the week rolls over.
    pub fn advance_day(&mut self) -> DayReport {
        if self.is_over() {
            return DayReport { day_of_week: self.calendar.day_of_week, week: None };
        }
        let rolled = self.calendar.advance_day();
        let week = rolled.then(|| self.advance_week());
        DayReport { day_of_week: self.calendar.day_of_week, week }
    }

    /// Advance whole weeks until `weeks` have passed or the game ends.
    pub fn run_weeks(&mut self, weeks: u32) -> Vec<WeekReport> {
        let mut reports = Vec::new();
        while reports.len() < weeks as usize && !self.is_over() {
            if let Some(report) = self.advance_day().week {
                reports.push(report);
            }
        }
        reports
    }

    fn advance_week(&mut self) -> WeekReport {
        let week = self.calendar.week;
        let mut report = WeekReport { week, ..WeekReport::default() };

        let points = self.config.sim.points_per_week;
        for c in self.countries.values_mut() {
            c.golden_age.triggered = false;
            if c.is_active {
                c.grant_points(points);
            }
        }

        self.economy.adjust_balance(self.countries.values());
        for c in self.countries.values_mut().filter(|c| c.is_active) {
            if let Err(err) = self.economy.weekly_update(c, week) {
                warn!(country = %c.name, %err, "weekly update skipped");
            }
        }

        if week % self.config.sim.event_interval_weeks == 0 {
            let pass = self.events.run_pass(&mut self.countries, week, &mut self.rng);
            for c in self.countries.values_mut() {
                self.economy.refresh(c);
            }
            report.events_applied = pass.applied.len();
            report.events_expired = pass.expired.len();
            self.pending
                .extend(pass.applied.into_iter().map(|(country, record)| PendingEvent { country, record }));
        }

        report.ai_turns = self.run_ai(week);

        for c in self.countries.values_mut().filter(|c| c.is_active) {
            c.record_history(week);
        }

        self.outcome = self.judge(week);
        report.outcome = self.outcome;
        match self.outcome {
            Some(outcome) => info!(week, ?outcome, "game over"),
            None if week % 52 == 0 => info!(week, date = %self.calendar.date(), "year completed"),
            None => debug!(week, "week advanced"),
        }
        report
    }

    fn run_ai(&mut self, week: u32) -> usize {
        let roster: Vec<(CountryId, Strategy)> = self.ai.iter().map(|(id, s)| (*id, *s)).collect();
        let mut turns = 0;
        for (id, strategy) in roster {
            if !self.countries.get(&id).is_some_and(|c| c.is_active) {
                continue;
            }
            let strongest_rival_power = self
                .countries
                .values()
                .filter(|c| c.is_active && c.id != id)
                .map(|c| military_power(c, Stance::Neutral))
                .fold(0.0, f64::max);
            let outlook = Outlook {
                has_crisis: self.events.has_active_crisis(id),
                strongest_rival_power,
            };
            let Some(country) = self.countries.get_mut(&id) else {
                continue;
            };
            let turn = take_turn(country, strategy, &outlook, &self.economy, week, &self.config.ai, &mut self.rng);
            if let Some(project) = turn.built {
                if let Some(record) = self.events.log_construction(country, project, week) {
                    self.pending.push_back(PendingEvent { country: id, record });
                }
            }
            turns += 1;
        }
        turns
    }

    fn judge(&self, week: u32) -> Option<GameOutcome> {
        if let Some(player) = self.player() {
            if self.countries.get(&player).is_some_and(|c| !c.is_active) {
                return Some(GameOutcome::Defeated);
            }
        }
        let threshold = self.config.sim.victory_threshold;
        let winner = self
            .countries
            .values()
            .filter(|c| c.is_active)
            .filter_map(|c| {
                let (axis, level) = c.stats.highest();
                (level >= threshold).then_some((c.id, axis, level))
            })
            .max_by(|a, b| a.2.total_cmp(&b.2).then(b.0.cmp(&a.0)));
        if let Some((country, axis, _)) = winner {
            return Some(GameOutcome::Victory { country, axis });
        }
        if week >= self.config.sim.max_weeks {
            let leader = self
                .countries
                .values()
                .filter(|c| c.is_active)
                .max_by(|a, b| a.stats.total().total_cmp(&b.stats.total()).then(b.id.cmp(&a.id)))
                .map(|c| c.id);
            return Some(GameOutcome::TimeLimit { leader });
        }
        None
    }

    // ---- persistence ----

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            calendar: self.calendar.clone(),
            countries: self.countries.values().cloned().collect(),
            events: self.events.state().clone(),
            ai: self.ai.clone(),
            balance: self.economy.balance.clone(),
            outcome: self.outcome,
            pending: self.pending.iter().cloned().collect(),
            rng_seed: self.config.sim.rng_seed,
        }
    }

    /// Replace the session state with a snapshot. The RNG is reseeded from
    /// the stored seed and the elapsed day count.
    pub fn restore(&mut self, snapshot: GameSnapshot) -> Result<(), SnapshotError> {
        snapshot.check(self.config.sim.max_experience)?;
        self.countries = snapshot.countries.into_iter().map(|c| (c.id, c)).collect();
        self.rng = GameRng::new(snapshot.rng_seed.wrapping_add(snapshot.calendar.elapsed_days));
        self.calendar = snapshot.calendar;
        self.events.restore(snapshot.events);
        self.ai = snapshot.ai;
        self.economy.balance = snapshot.balance;
        self.outcome = snapshot.outcome;
        self.pending = snapshot.pending.into();
        info!(week = self.calendar.week, countries = self.countries.len(), "snapshot restored");
        Ok(())
    }
}
