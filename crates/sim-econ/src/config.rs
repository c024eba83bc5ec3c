//! Economic balance tables.
//!
//! Every constant the pipeline uses lives here so balance can be tuned from
//! a config file. Income, efficiency and stability fractions are `Decimal`
//! so integer floors come out exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{Axis, IndustryKind, InfrastructureKind, InvestmentKind, MilitaryBonuses};
use std::collections::BTreeMap;

fn pct(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

fn stats(pairs: &[(Axis, f64)]) -> BTreeMap<Axis, f64> {
    pairs.iter().copied().collect()
}

/// Money and stat cost of one purchase before scaling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseCost {
    pub money: i64,
    pub stats: BTreeMap<Axis, f64>,
}

/// One industry sector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndustrySpec {
    pub cost: BaseCost,
    /// Minimum stat levels required to build or upgrade.
    #[serde(default)]
    pub requires: BTreeMap<Axis, f64>,
    /// Fraction of base income added per level.
    pub income_bonus: Decimal,
    /// Efficiency added per level.
    #[serde(default)]
    pub efficiency: Decimal,
}

/// One infrastructure project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureSpec {
    pub cost: BaseCost,
    #[serde(default)]
    pub requires: BTreeMap<Axis, f64>,
    pub income_bonus: Decimal,
    #[serde(default)]
    pub efficiency: Decimal,
    #[serde(default)]
    pub stability: Decimal,
}

/// One investment vehicle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSpec {
    pub base_cost: i64,
    /// Cost grows as `base_cost * (1 + count / count_divisor)`.
    pub count_divisor: u32,
    /// Interest credited per weekly update as a fraction of cumulative value.
    pub interest_rate: Decimal,
    #[serde(default)]
    pub requires: BTreeMap<Axis, f64>,
    /// Fraction of base income added per purchase.
    pub income_bonus_per_count: Decimal,
    #[serde(default)]
    pub efficiency_per_count: Decimal,
    #[serde(default)]
    pub stability_per_count: Decimal,
}

/// Infrastructure synergy magnitudes for one domain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyValues {
    /// Granted per built type beyond the first (once two or more exist).
    pub per_extra_type: Decimal,
    /// Roads and ports.
    pub transport: Decimal,
    /// Universities and hospitals.
    pub education: Decimal,
    /// Banks plus at least one other type.
    pub financial: Decimal,
    /// All five types.
    pub complete: Decimal,
}

/// Clamp bands for the income multipliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bands {
    pub base_efficiency: Decimal,
    pub efficiency_min: Decimal,
    pub efficiency_max: Decimal,
    pub base_stability: Decimal,
    pub stability_min: Decimal,
    pub stability_max: Decimal,
}

impl Default for Bands {
    fn default() -> Self {
        Self {
            base_efficiency: Decimal::ONE,
            efficiency_min: Decimal::ZERO,
            efficiency_max: Decimal::new(2, 0),
            base_stability: Decimal::ONE,
            stability_min: Decimal::ZERO,
            stability_max: Decimal::new(15, 1),
        }
    }
}

/// Military cross-cut: bonuses from economic assets and army upkeep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilitaryConfig {
    /// Share of population that can serve, before size bonuses.
    pub army_population_ratio: f64,
    pub per_industry_level: BTreeMap<IndustryKind, MilitaryBonuses>,
    pub per_infrastructure: BTreeMap<InfrastructureKind, MilitaryBonuses>,
    pub transport: MilitaryBonuses,
    pub education: MilitaryBonuses,
    pub complete: MilitaryBonuses,
    /// Upper bound for every bonus except maintenance.
    pub bonus_cap: f64,
    pub maintenance_cap: f64,
    /// Weekly upkeep per soldier.
    pub maintenance_per_soldier: f64,
    pub recruit_base_cost: i64,
    pub recruit_cost_growth: f64,
    /// Share of population recruited per purchase.
    pub recruit_fraction: f64,
    pub train_base_cost: i64,
    pub train_cost_growth: f64,
}

impl Default for MilitaryConfig {
    fn default() -> Self {
        let bonus = |f: fn(&mut MilitaryBonuses)| {
            let mut b = MilitaryBonuses::default();
            f(&mut b);
            b
        };
        Self {
            army_population_ratio: 0.4,
            per_industry_level: BTreeMap::from([
                (
                    IndustryKind::Arms,
                    bonus(|b| {
                        b.army_size = 0.05;
                        b.attack = 0.05;
                        b.defense = 0.03;
                    }),
                ),
                (IndustryKind::Manufacturing, bonus(|b| b.recruitment = 0.03)),
                (IndustryKind::Technology, bonus(|b| b.experience = 0.03)),
            ]),
            per_infrastructure: BTreeMap::from([
                (InfrastructureKind::Roads, bonus(|b| b.recruitment = 0.05)),
                (InfrastructureKind::Ports, bonus(|b| b.attack = 0.03)),
                (InfrastructureKind::Universities, bonus(|b| b.experience = 0.05)),
                (
                    InfrastructureKind::Hospitals,
                    bonus(|b| {
                        b.maintenance_reduction = 0.05;
                        b.army_size = 0.03;
                    }),
                ),
                (InfrastructureKind::Banks, bonus(|b| b.maintenance_reduction = 0.05)),
            ]),
            transport: bonus(|b| {
                b.recruitment = 0.05;
                b.attack = 0.05;
            }),
            education: bonus(|b| b.experience = 0.05),
            complete: MilitaryBonuses {
                army_size: 0.05,
                experience: 0.05,
                maintenance_reduction: 0.05,
                attack: 0.05,
                defense: 0.05,
                recruitment: 0.05,
            },
            bonus_cap: 1.0,
            maintenance_cap: 0.75,
            maintenance_per_soldier: 0.01,
            recruit_base_cost: 500,
            recruit_cost_growth: 1.2,
            recruit_fraction: 0.05,
            train_base_cost: 800,
            train_cost_growth: 1.3,
        }
    }
}

/// One rubber-band tier. The first tier whose `max_average` exceeds the
/// population-average stat total applies; `None` matches everything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceTier {
    pub max_average: Option<f64>,
    pub industry_cost_base: f64,
    pub infrastructure_cost_base: f64,
    pub investment_cost_base: f64,
    pub benefit_base: f64,
}

/// Time- and progress-based scaling of costs and benefits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub tiers: Vec<BalanceTier>,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    /// Extra cost per point of a country's own stat total.
    pub stat_cost_factor: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                BalanceTier {
                    max_average: Some(50.0),
                    industry_cost_base: 1.005,
                    infrastructure_cost_base: 1.004,
                    investment_cost_base: 1.006,
                    benefit_base: 1.004,
                },
                BalanceTier {
                    max_average: Some(150.0),
                    industry_cost_base: 1.010,
                    infrastructure_cost_base: 1.008,
                    investment_cost_base: 1.012,
                    benefit_base: 1.002,
                },
                BalanceTier {
                    max_average: None,
                    industry_cost_base: 1.015,
                    infrastructure_cost_base: 1.012,
                    investment_cost_base: 1.018,
                    benefit_base: 1.000,
                },
            ],
            min_multiplier: 0.5,
            max_multiplier: 3.0,
            stat_cost_factor: 0.002,
        }
    }
}

/// Complete economic configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconConfig {
    pub industries: BTreeMap<IndustryKind, IndustrySpec>,
    /// Industry cost multiplier is `industry_cost_growth ^ upgrades`.
    pub industry_cost_growth: f64,
    pub infrastructure: BTreeMap<InfrastructureKind, InfrastructureSpec>,
    pub investments: BTreeMap<InvestmentKind, InvestmentSpec>,
    /// Cap on the investment share of base income.
    pub investment_bonus_cap: Decimal,
    pub income_synergy: SynergyValues,
    pub efficiency_synergy: SynergyValues,
    pub stability_synergy: SynergyValues,
    pub bands: Bands,
    pub military: MilitaryConfig,
    pub balance: BalanceConfig,
    /// Weekly natural growth as a share of population.
    pub population_growth: f64,
    /// Social level that doubles natural growth.
    pub social_growth_divisor: f64,
    /// Weekly income to gdp conversion.
    pub weeks_per_year: i64,
}

impl Default for EconConfig {
    fn default() -> Self {
        use Axis::*;
        let industry = |money, cost: &[(Axis, f64)], req: &[(Axis, f64)], income, eff| IndustrySpec {
            cost: BaseCost {
                money,
                stats: stats(cost),
            },
            requires: stats(req),
            income_bonus: pct(income),
            efficiency: pct(eff),
        };
        let infra = |money, cost: &[(Axis, f64)], req: &[(Axis, f64)], income, eff, stab| {
            InfrastructureSpec {
                cost: BaseCost {
                    money,
                    stats: stats(cost),
                },
                requires: stats(req),
                income_bonus: pct(income),
                efficiency: pct(eff),
                stability: pct(stab),
            }
        };
        Self {
            industries: BTreeMap::from([
                (IndustryKind::Basic, industry(500, &[(Economy, 1.0)], &[(Economy, 1.0)], 10, 0)),
                (
                    IndustryKind::Manufacturing,
                    industry(1000, &[(Economy, 2.0), (Science, 1.0)], &[(Economy, 3.0)], 15, 3),
                ),
                (
                    IndustryKind::Technology,
                    industry(2000, &[(Science, 3.0)], &[(Science, 5.0)], 20, 5),
                ),
                (
                    IndustryKind::Services,
                    industry(
                        1500,
                        &[(Economy, 2.0), (Social, 2.0)],
                        &[(Economy, 4.0), (Social, 3.0)],
                        12,
                        0,
                    ),
                ),
                (IndustryKind::Arms, industry(1500, &[(Military, 2.0)], &[(Military, 3.0)], 5, 0)),
            ]),
            industry_cost_growth: 1.5,
            infrastructure: BTreeMap::from([
                (
                    InfrastructureKind::Roads,
                    infra(800, &[(Economy, 1.0)], &[(Economy, 2.0)], 10, 10, 5),
                ),
                (
                    InfrastructureKind::Ports,
                    infra(1200, &[(Economy, 2.0)], &[(Economy, 3.0)], 15, 5, 0),
                ),
                (
                    InfrastructureKind::Universities,
                    infra(1500, &[(Science, 2.0)], &[(Science, 4.0)], 8, 10, 5),
                ),
                (
                    InfrastructureKind::Hospitals,
                    infra(1000, &[(Social, 2.0)], &[(Social, 3.0)], 5, 5, 10),
                ),
                (
                    InfrastructureKind::Banks,
                    infra(2000, &[(Economy, 3.0)], &[(Economy, 5.0)], 12, 10, 5),
                ),
            ]),
            investments: BTreeMap::from([
                (
                    InvestmentKind::Bonds,
                    InvestmentSpec {
                        base_cost: 500,
                        count_divisor: 10,
                        interest_rate: pct(1),
                        requires: BTreeMap::new(),
                        income_bonus_per_count: pct(1),
                        efficiency_per_count: Decimal::ZERO,
                        stability_per_count: pct(1),
                    },
                ),
                (
                    InvestmentKind::Stocks,
                    InvestmentSpec {
                        base_cost: 1000,
                        count_divisor: 5,
                        interest_rate: pct(2),
                        requires: stats(&[(Economy, 3.0)]),
                        income_bonus_per_count: pct(2),
                        efficiency_per_count: pct(1),
                        stability_per_count: Decimal::ZERO,
                    },
                ),
                (
                    InvestmentKind::Ventures,
                    InvestmentSpec {
                        base_cost: 2000,
                        count_divisor: 3,
                        interest_rate: Decimal::new(35, 3),
                        requires: stats(&[(Economy, 5.0), (Science, 3.0)]),
                        income_bonus_per_count: pct(3),
                        efficiency_per_count: pct(2),
                        stability_per_count: Decimal::ZERO,
                    },
                ),
            ]),
            investment_bonus_cap: pct(50),
            income_synergy: SynergyValues {
                per_extra_type: pct(5),
                transport: pct(25),
                education: pct(15),
                financial: pct(10),
                complete: pct(50),
            },
            efficiency_synergy: SynergyValues {
                per_extra_type: pct(2),
                transport: pct(10),
                education: pct(10),
                financial: Decimal::ZERO,
                complete: pct(20),
            },
            stability_synergy: SynergyValues {
                per_extra_type: pct(1),
                transport: pct(5),
                education: pct(10),
                financial: Decimal::ZERO,
                complete: pct(15),
            },
            bands: Bands::default(),
            military: MilitaryConfig::default(),
            balance: BalanceConfig::default(),
            population_growth: 0.001,
            social_growth_divisor: 50.0,
            weeks_per_year: 52,
        }
    }
}

/// Config values the pipeline cannot work with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EconConfigError {
    #[error("missing table entry for {0}")]
    MissingEntry(String),
    #[error("{0} must be finite and positive")]
    NotPositive(&'static str),
    #[error("balance needs at least one tier")]
    NoTiers,
}

impl EconConfig {
    /// Check that every kind has a table entry and growth factors are sane.
    pub fn validate(&self) -> Result<(), EconConfigError> {
        for k in IndustryKind::ALL {
            if !self.industries.contains_key(&k) {
                return Err(EconConfigError::MissingEntry(format!("industry {k}")));
            }
        }
        for k in InfrastructureKind::ALL {
            if !self.infrastructure.contains_key(&k) {
                return Err(EconConfigError::MissingEntry(format!("infrastructure {k}")));
            }
        }
        for (k, spec) in InvestmentKind::ALL.iter().map(|k| (k, self.investments.get(k))) {
            match spec {
                None => return Err(EconConfigError::MissingEntry(format!("investment {k}"))),
                Some(s) if s.count_divisor == 0 => {
                    return Err(EconConfigError::NotPositive("investment count_divisor"))
                }
                Some(_) => {}
            }
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.industry_cost_growth) {
            return Err(EconConfigError::NotPositive("industry_cost_growth"));
        }
        if !positive(self.military.army_population_ratio) {
            return Err(EconConfigError::NotPositive("army_population_ratio"));
        }
        if !positive(self.balance.min_multiplier) || self.balance.max_multiplier < self.balance.min_multiplier {
            return Err(EconConfigError::NotPositive("balance multiplier band"));
        }
        if self.balance.tiers.is_empty() {
            return Err(EconConfigError::NoTiers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        EconConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_tables_are_reported() {
        let mut cfg = EconConfig::default();
        cfg.infrastructure.remove(&InfrastructureKind::Banks);
        assert!(matches!(cfg.validate(), Err(EconConfigError::MissingEntry(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EconConfig = serde_json::from_str(r#"{"industry_cost_growth": 2.0}"#).unwrap();
        assert_eq!(cfg.industry_cost_growth, 2.0);
        assert_eq!(cfg.industries.len(), 5);
        assert_eq!(cfg.bands, Bands::default());
    }
}
