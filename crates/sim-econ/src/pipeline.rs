//! The economic pipeline as one component: pricing, construction, army
//! purchases and the weekly update.

use crate::balance::{BalanceState, CostCategory};
use crate::config::EconConfig;
use crate::income::{income_breakdown, investment_interest, IncomeBreakdown};
use crate::military::{self, refresh_military};
use serde::{Deserialize, Serialize};
use sim_core::{Axis, Country, CountryId, EconomicData, InvalidAction, Project};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Hard failures of the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EconError {
    /// Indicator recomputation needs initialized economic data.
    #[error("economic data for country {0} is not initialized")]
    Uninitialized(CountryId),
}

/// Scaled cost of one purchase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub money: i64,
    pub stats: BTreeMap<Axis, f64>,
}

/// What a weekly update did to one country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub income: IncomeBreakdown,
    pub interest: i64,
    pub maintenance: i64,
    pub population_growth: u64,
}

/// Economic tables plus the rubber-band state.
#[derive(Clone, Debug, Default)]
pub struct Economy {
    pub config: EconConfig,
    pub balance: BalanceState,
}

fn ceil_money(v: f64) -> i64 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    // Snap float noise first so 500.0000000001 does not round up to 501.
    let snapped = (v * 1e6).round() / 1e6;
    snapped.ceil().min(i64::MAX as f64) as i64
}

impl Economy {
    pub fn new(config: EconConfig) -> Self {
        Self {
            config,
            balance: BalanceState::default(),
        }
    }

    /// Initialize economic data (if missing) and derived values. Must run
    /// before the first weekly update.
    pub fn init_country(&self, country: &mut Country) {
        if country.economic.is_none() {
            country.economic = Some(EconomicData::default());
        }
        refresh_military(country, &self.config);
        let income = income_breakdown(country, &self.config, 1.0);
        if let Some(econ) = country.economic.as_mut() {
            econ.indicators.efficiency = income.efficiency;
            econ.indicators.stability = income.stability;
            econ.indicators.gdp = income.total.saturating_mul(self.config.weeks_per_year);
        }
    }

    /// Recompute military bonuses and the army cap after an outside change
    /// such as a population event or battle losses.
    pub fn refresh(&self, country: &mut Country) {
        refresh_military(country, &self.config);
    }

    /// Re-tune the balance tier from the current roster.
    pub fn adjust_balance<'a>(&mut self, countries: impl IntoIterator<Item = &'a Country>) -> bool {
        self.balance.adjust(&self.config.balance, countries)
    }

    pub fn benefit_multiplier(&self, week: u32) -> f64 {
        self.balance.benefit_multiplier(&self.config.balance, week)
    }

    fn scale(&self, country: &Country, category: CostCategory, week: u32) -> f64 {
        let time = self.balance.cost_multiplier(&self.config.balance, category, week);
        time * (1.0 + country.stats.total() * self.config.balance.stat_cost_factor)
    }

    /// Current price of a project for `country` at `week`.
    pub fn price(&self, country: &Country, project: Project, week: u32) -> Price {
        let cfg = &self.config;
        let empty = EconomicData::default();
        let econ = country.economic.as_ref().unwrap_or(&empty);
        match project {
            Project::Industry(kind) => {
                let Some(spec) = cfg.industries.get(&kind) else {
                    return Price::default();
                };
                let growth = cfg.industry_cost_growth.powi(econ.upgrades(kind).min(i32::MAX as u32) as i32);
                Price {
                    money: ceil_money(
                        spec.cost.money as f64 * growth * self.scale(country, CostCategory::Industry, week),
                    ),
                    stats: spec.cost.stats.clone(),
                }
            }
            Project::Infrastructure(kind) => {
                let Some(spec) = cfg.infrastructure.get(&kind) else {
                    return Price::default();
                };
                Price {
                    money: ceil_money(
                        spec.cost.money as f64 * self.scale(country, CostCategory::Infrastructure, week),
                    ),
                    stats: spec.cost.stats.clone(),
                }
            }
            Project::Investment(kind) => {
                let Some(spec) = cfg.investments.get(&kind) else {
                    return Price::default();
                };
                let count = f64::from(econ.investment(kind).count);
                let growth = 1.0 + count / f64::from(spec.count_divisor.max(1));
                Price {
                    money: ceil_money(
                        spec.base_cost as f64 * growth * self.scale(country, CostCategory::Investment, week),
                    ),
                    stats: BTreeMap::new(),
                }
            }
        }
    }

    fn requirements(&self, project: Project) -> Option<&BTreeMap<Axis, f64>> {
        match project {
            Project::Industry(k) => self.config.industries.get(&k).map(|s| &s.requires),
            Project::Infrastructure(k) => self.config.infrastructure.get(&k).map(|s| &s.requires),
            Project::Investment(k) => self.config.investments.get(&k).map(|s| &s.requires),
        }
    }

    /// Affordability check without side effects. Returns the price that
    /// [`Economy::build`] would charge.
    pub fn check(&self, country: &Country, project: Project, week: u32) -> Result<Price, InvalidAction> {
        if !country.is_active {
            return Err(InvalidAction::Inactive);
        }
        if let Project::Infrastructure(kind) = project {
            if country.economic.as_ref().is_some_and(|e| e.has(kind)) {
                return Err(InvalidAction::AlreadyBuilt);
            }
        }
        if let Some(requires) = self.requirements(project) {
            if let Some((&axis, _)) = requires.iter().find(|(a, min)| country.stats.get(**a) < **min) {
                return Err(InvalidAction::RequirementNotMet(axis));
            }
        }
        let price = self.price(country, project, week);
        if !country.can_afford(price.money) {
            return Err(InvalidAction::InsufficientFunds);
        }
        if let Some((&axis, _)) = price.stats.iter().find(|(a, cost)| country.stats.get(**a) < **cost) {
            return Err(InvalidAction::InsufficientStat(axis));
        }
        Ok(price)
    }

    /// Build, upgrade or invest. All-or-nothing: on rejection nothing changes.
    pub fn build(&self, country: &mut Country, project: Project, week: u32) -> Result<Price, InvalidAction> {
        let price = self.check(country, project, week)?;
        country.debit(price.money)?;
        for (&axis, &cost) in &price.stats {
            country.add_stat(axis, -cost);
        }
        let econ = country.economic.get_or_insert_with(EconomicData::default);
        match project {
            Project::Industry(kind) => {
                *econ.industries.entry(kind).or_insert(0) += 1;
                *econ.industry_upgrades.entry(kind).or_insert(0) += 1;
            }
            Project::Infrastructure(kind) => {
                econ.infrastructure.insert(kind);
            }
            Project::Investment(kind) => {
                let held = econ.investments.entry(kind).or_default();
                held.count += 1;
                held.cumulative_value = held.cumulative_value.saturating_add(price.money);
            }
        }
        refresh_military(country, &self.config);
        self.refresh_bands(country, week);
        debug!(country = %country.id, %project, money = price.money, "project completed");
        Ok(price)
    }

    /// Income breakdown at `week` without mutating anything.
    pub fn income(&self, country: &Country, week: u32) -> IncomeBreakdown {
        income_breakdown(country, &self.config, self.benefit_multiplier(week))
    }

    /// Recompute efficiency, stability, gdp and growth.
    pub fn update_indicators(&self, country: &mut Country, week: u32) -> Result<IncomeBreakdown, EconError> {
        if country.economic.is_none() {
            return Err(EconError::Uninitialized(country.id));
        }
        let income = self.income(country, week);
        let gdp = income.total.saturating_mul(self.config.weeks_per_year);
        if let Some(econ) = country.economic.as_mut() {
            let ind = &mut econ.indicators;
            ind.growth_rate = if ind.gdp > 0 {
                (gdp - ind.gdp) as f64 / ind.gdp as f64
            } else {
                0.0
            };
            ind.gdp = gdp;
            ind.efficiency = income.efficiency;
            ind.stability = income.stability;
        }
        Ok(income)
    }

    /// Refresh efficiency and stability after a mid-week change. Gdp and
    /// growth stay on the weekly cadence.
    fn refresh_bands(&self, country: &mut Country, week: u32) {
        let income = self.income(country, week);
        if let Some(econ) = country.economic.as_mut() {
            econ.indicators.efficiency = income.efficiency;
            econ.indicators.stability = income.stability;
        }
    }

    /// Weekly economic step: indicators, income, interest, upkeep,
    /// population growth and the army cap.
    pub fn weekly_update(&self, country: &mut Country, week: u32) -> Result<WeeklyReport, EconError> {
        let income = self.update_indicators(country, week)?;
        country.credit(income.total);

        let interest: i64 = country
            .economic
            .as_ref()
            .map(|e| investment_interest(e, &self.config).values().sum())
            .unwrap_or(0);
        country.credit(interest);

        let maintenance = military::maintenance_cost(country, &self.config.military);
        country.credit(-maintenance);

        let growth = country.population as f64
            * self.config.population_growth
            * country.birth_rate.max(0.0)
            * (1.0 + country.stats.social / self.config.social_growth_divisor.max(f64::EPSILON));
        let population_growth = if growth.is_finite() && growth > 0.0 {
            growth.floor() as u64
        } else {
            0
        };
        country.add_population(population_growth);
        refresh_military(country, &self.config);

        Ok(WeeklyReport {
            income,
            interest,
            maintenance,
            population_growth,
        })
    }

    /// Recruit a fraction of the population, up to the army cap. Returns
    /// the number of soldiers added.
    pub fn increase_army(&self, country: &mut Country) -> Result<u64, InvalidAction> {
        if !country.is_active {
            return Err(InvalidAction::Inactive);
        }
        let headroom = country.max_army_size.saturating_sub(country.army);
        if headroom == 0 {
            return Err(InvalidAction::ArmyAtCapacity);
        }
        let cost = military::recruit_cost(country, &self.config.military);
        country.debit(cost)?;
        let wanted = (country.population as f64 * self.config.military.recruit_fraction).floor() as u64;
        let added = wanted.max(1).min(headroom);
        country.army += added;
        country.recruit_count += 1;
        debug!(country = %country.id, added, cost, "army increased");
        Ok(added)
    }

    /// Raise army experience by one level. Returns the new level.
    pub fn train_army(&self, country: &mut Country, max_experience: u8) -> Result<u8, InvalidAction> {
        if !country.is_active {
            return Err(InvalidAction::Inactive);
        }
        if country.army_experience >= max_experience {
            return Err(InvalidAction::ExperienceMaxed);
        }
        let cost = military::train_cost(country, &self.config.military);
        country.debit(cost)?;
        country.army_experience += 1;
        country.training_count += 1;
        debug!(country = %country.id, level = country.army_experience, cost, "army trained");
        Ok(country.army_experience)
    }
}
