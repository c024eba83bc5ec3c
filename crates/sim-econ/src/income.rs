//! Income, efficiency, stability and investment interest.
//!
//! Bonuses are fractions of the country's *base* income, never of an
//! already-bonused figure, so nothing compounds within a single pass.

use crate::config::EconConfig;
use crate::synergy::SynergyFlags;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{Country, EconomicData, InvestmentKind};
use std::collections::BTreeMap;

/// Itemised income for one country, as shown to the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub base: i64,
    pub industry_bonus: i64,
    pub infrastructure_bonus: i64,
    pub investment_bonus: i64,
    pub efficiency: f64,
    pub stability: f64,
    /// `floor((base + bonuses) * efficiency * stability)`.
    pub total: i64,
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

fn floor_i64(d: Decimal) -> i64 {
    d.floor().to_i64().unwrap_or(0)
}

/// Income-bonus fraction from industry levels.
pub fn industry_fraction(econ: &EconomicData, cfg: &EconConfig) -> Decimal {
    cfg.industries
        .iter()
        .map(|(kind, spec)| spec.income_bonus * Decimal::from(econ.industry_level(*kind)))
        .sum()
}

/// Income-bonus fraction from built infrastructure and its synergies.
pub fn infrastructure_fraction(econ: &EconomicData, cfg: &EconConfig) -> Decimal {
    let individual: Decimal = econ
        .infrastructure
        .iter()
        .filter_map(|k| cfg.infrastructure.get(k))
        .map(|s| s.income_bonus)
        .sum();
    individual + cfg.income_synergy.total(SynergyFlags::of(&econ.infrastructure))
}

/// Income-bonus fraction from investments, capped.
pub fn investment_fraction(econ: &EconomicData, cfg: &EconConfig) -> Decimal {
    let raw: Decimal = cfg
        .investments
        .iter()
        .map(|(kind, spec)| spec.income_bonus_per_count * Decimal::from(econ.investment(*kind).count))
        .sum();
    raw.min(cfg.investment_bonus_cap)
}

/// Efficiency after aggregating every contribution, clamped to its band.
pub fn efficiency(econ: &EconomicData, cfg: &EconConfig) -> Decimal {
    let industry: Decimal = cfg
        .industries
        .iter()
        .map(|(kind, spec)| spec.efficiency * Decimal::from(econ.industry_level(*kind)))
        .sum();
    let infra: Decimal = econ
        .infrastructure
        .iter()
        .filter_map(|k| cfg.infrastructure.get(k))
        .map(|s| s.efficiency)
        .sum();
    let invest: Decimal = cfg
        .investments
        .iter()
        .map(|(kind, spec)| spec.efficiency_per_count * Decimal::from(econ.investment(*kind).count))
        .sum();
    let synergy = cfg.efficiency_synergy.total(SynergyFlags::of(&econ.infrastructure));
    (cfg.bands.base_efficiency + industry + infra + invest + synergy)
        .clamp(cfg.bands.efficiency_min, cfg.bands.efficiency_max)
}

/// Stability after aggregating every contribution, clamped to its band.
pub fn stability(econ: &EconomicData, cfg: &EconConfig) -> Decimal {
    let infra: Decimal = econ
        .infrastructure
        .iter()
        .filter_map(|k| cfg.infrastructure.get(k))
        .map(|s| s.stability)
        .sum();
    let invest: Decimal = cfg
        .investments
        .iter()
        .map(|(kind, spec)| spec.stability_per_count * Decimal::from(econ.investment(*kind).count))
        .sum();
    let synergy = cfg.stability_synergy.total(SynergyFlags::of(&econ.infrastructure));
    (cfg.bands.base_stability + infra + invest + synergy)
        .clamp(cfg.bands.stability_min, cfg.bands.stability_max)
}

/// Compute the income breakdown. `benefit_multiplier` scales the bonus
/// portion (see `BalanceState::benefit_multiplier`). A country without
/// economic data earns its plain base income.
pub fn income_breakdown(country: &Country, cfg: &EconConfig, benefit_multiplier: f64) -> IncomeBreakdown {
    let empty = EconomicData::default();
    let econ = country.economic.as_ref().unwrap_or(&empty);
    let base = Decimal::from(country.income.max(0));
    let benefit = Decimal::from_f64(benefit_multiplier).unwrap_or(Decimal::ONE);

    let industry = base * industry_fraction(econ, cfg) * benefit;
    let infra = base * infrastructure_fraction(econ, cfg) * benefit;
    let invest = base * investment_fraction(econ, cfg) * benefit;
    let eff = efficiency(econ, cfg);
    let stab = stability(econ, cfg);
    let total = floor_i64((base + industry + infra + invest) * eff * stab).max(0);

    IncomeBreakdown {
        base: country.income.max(0),
        industry_bonus: floor_i64(industry),
        infrastructure_bonus: floor_i64(infra),
        investment_bonus: floor_i64(invest),
        efficiency: to_f64(eff),
        stability: to_f64(stab),
        total,
    }
}

/// Interest per investment kind for one weekly update:
/// `floor(floor(cumulative * rate) * event_multiplier)`.
pub fn investment_interest(econ: &EconomicData, cfg: &EconConfig) -> BTreeMap<InvestmentKind, i64> {
    cfg.investments
        .iter()
        .map(|(kind, spec)| {
            let held = econ.investment(*kind);
            let raw = floor_i64(Decimal::from(held.cumulative_value) * spec.interest_rate);
            let mult = Decimal::from_f64(econ.interest_multiplier(*kind)).unwrap_or(Decimal::ONE);
            (*kind, floor_i64(Decimal::from(raw) * mult).max(0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::{CountryId, CountrySeed, IndustryKind, InfrastructureKind, Investment};

    fn country() -> Country {
        let mut c = Country::new(CountryId(1), "Econ", true, &CountrySeed::default());
        c.income = 100;
        c.economic = Some(EconomicData::default());
        c
    }

    #[test]
    fn one_basic_industry_adds_ten_percent() {
        let cfg = EconConfig::default();
        let mut c = country();
        c.economic.as_mut().unwrap().industries.insert(IndustryKind::Basic, 1);
        let b = income_breakdown(&c, &cfg, 1.0);
        assert_eq!(b.industry_bonus, 10);
        assert_eq!(b.efficiency, 1.0);
        assert_eq!(b.stability, 1.0);
        assert_eq!(b.total, 110);
    }

    #[test]
    fn roads_and_ports_stack_individual_and_synergy_bonuses() {
        let cfg = EconConfig::default();
        let mut c = country();
        let econ = c.economic.as_mut().unwrap();
        econ.infrastructure.insert(InfrastructureKind::Roads);
        econ.infrastructure.insert(InfrastructureKind::Ports);
        // 10% + 15% individual, 5% for one extra type, 25% transport.
        assert_eq!(infrastructure_fraction(econ, &cfg), Decimal::new(55, 2));
        let b = income_breakdown(&c, &cfg, 1.0);
        assert_eq!(b.infrastructure_bonus, 55);
        // efficiency 1 + 0.10 + 0.05 + 0.02 + 0.10, stability 1 + 0.05 + 0.01 + 0.05
        assert_eq!(b.efficiency, 1.27);
        assert_eq!(b.stability, 1.11);
        assert_eq!(b.total, 218);
    }

    #[test]
    fn uninitialized_economy_earns_base_income() {
        let cfg = EconConfig::default();
        let mut c = country();
        c.economic = None;
        assert_eq!(income_breakdown(&c, &cfg, 1.0).total, 100);
    }

    #[test]
    fn benefit_multiplier_only_scales_bonuses() {
        let cfg = EconConfig::default();
        let mut c = country();
        c.economic.as_mut().unwrap().industries.insert(IndustryKind::Basic, 2);
        let b = income_breakdown(&c, &cfg, 0.5);
        assert_eq!(b.industry_bonus, 10);
        assert_eq!(b.total, 110);
    }

    #[test]
    fn interest_is_floored_then_scaled() {
        let cfg = EconConfig::default();
        let mut econ = EconomicData::default();
        econ.investments.insert(
            InvestmentKind::Ventures,
            Investment {
                count: 1,
                cumulative_value: 2_990,
            },
        );
        // floor(2990 * 0.035) = 104
        assert_eq!(investment_interest(&econ, &cfg)[&InvestmentKind::Ventures], 104);
        econ.investment_multipliers = Some(BTreeMap::from([(InvestmentKind::Ventures, 1.5)]));
        assert_eq!(investment_interest(&econ, &cfg)[&InvestmentKind::Ventures], 156);
        assert_eq!(investment_interest(&econ, &cfg)[&InvestmentKind::Bonds], 0);
    }

    proptest! {
        #[test]
        fn multipliers_stay_in_bands(levels in proptest::collection::vec(0u32..40, 5),
                                     built in proptest::collection::vec(any::<bool>(), 5),
                                     counts in proptest::collection::vec(0u32..200, 3)) {
            let cfg = EconConfig::default();
            let mut econ = EconomicData::default();
            for (k, l) in IndustryKind::ALL.iter().zip(&levels) {
                econ.industries.insert(*k, *l);
            }
            for (k, b) in InfrastructureKind::ALL.iter().zip(&built) {
                if *b {
                    econ.infrastructure.insert(*k);
                }
            }
            for (k, n) in InvestmentKind::ALL.iter().zip(&counts) {
                econ.investments.insert(*k, Investment { count: *n, cumulative_value: 0 });
            }
            let e = efficiency(&econ, &cfg);
            let s = stability(&econ, &cfg);
            prop_assert!(e >= cfg.bands.efficiency_min && e <= cfg.bands.efficiency_max);
            prop_assert!(s >= cfg.bands.stability_min && s <= cfg.bands.stability_max);
            prop_assert!(investment_fraction(&econ, &cfg) <= cfg.investment_bonus_cap);
        }
    }
}
