//! Economic sub-state carried by each country.
//!
//! Only data lives here; the pipeline that reads and updates it is in
//! `sim-econ`.

use crate::event::EventId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Upgradable industry sectors. Level 0 means the sector is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryKind {
    Basic,
    Manufacturing,
    Technology,
    Services,
    Arms,
}

impl IndustryKind {
    pub const ALL: [IndustryKind; 5] = [
        IndustryKind::Basic,
        IndustryKind::Manufacturing,
        IndustryKind::Technology,
        IndustryKind::Services,
        IndustryKind::Arms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndustryKind::Basic => "basic",
            IndustryKind::Manufacturing => "manufacturing",
            IndustryKind::Technology => "technology",
            IndustryKind::Services => "services",
            IndustryKind::Arms => "arms",
        }
    }
}

/// Build-once infrastructure projects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfrastructureKind {
    Roads,
    Ports,
    Universities,
    Hospitals,
    Banks,
}

impl InfrastructureKind {
    pub const ALL: [InfrastructureKind; 5] = [
        InfrastructureKind::Roads,
        InfrastructureKind::Ports,
        InfrastructureKind::Universities,
        InfrastructureKind::Hospitals,
        InfrastructureKind::Banks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InfrastructureKind::Roads => "roads",
            InfrastructureKind::Ports => "ports",
            InfrastructureKind::Universities => "universities",
            InfrastructureKind::Hospitals => "hospitals",
            InfrastructureKind::Banks => "banks",
        }
    }
}

/// Interest-bearing investment vehicles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Bonds,
    Stocks,
    Ventures,
}

impl InvestmentKind {
    pub const ALL: [InvestmentKind; 3] = [
        InvestmentKind::Bonds,
        InvestmentKind::Stocks,
        InvestmentKind::Ventures,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InvestmentKind::Bonds => "bonds",
            InvestmentKind::Stocks => "stocks",
            InvestmentKind::Ventures => "ventures",
        }
    }
}

macro_rules! display_by_name {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(IndustryKind, InfrastructureKind, InvestmentKind);

/// Anything a country can construct or buy into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Project {
    Industry(IndustryKind),
    Infrastructure(InfrastructureKind),
    Investment(InvestmentKind),
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Project::Industry(k) => write!(f, "industry:{k}"),
            Project::Infrastructure(k) => write!(f, "infrastructure:{k}"),
            Project::Investment(k) => write!(f, "investment:{k}"),
        }
    }
}

/// Accumulated holdings of one investment kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    /// Number of purchases made.
    pub count: u32,
    /// Sum of money put in; interest accrues on this.
    pub cumulative_value: i64,
}

/// Aggregate economic readouts recomputed every week.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// Annualised output estimate.
    pub gdp: i64,
    /// Fractional change in gdp versus the previous recomputation.
    pub growth_rate: f64,
    /// Income multiplier, clamped to the configured band.
    pub efficiency: f64,
    /// Income multiplier, clamped to the configured band.
    pub stability: f64,
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            gdp: 0,
            growth_rate: 0.0,
            efficiency: 1.0,
            stability: 1.0,
        }
    }
}

/// Military modifiers derived from industry and infrastructure.
/// All values are fractions (0.05 = +5%).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilitaryBonuses {
    pub army_size: f64,
    pub experience: f64,
    pub maintenance_reduction: f64,
    pub attack: f64,
    pub defense: f64,
    pub recruitment: f64,
}

/// Per-country economic state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicData {
    /// Industry levels keyed by sector; absent means level 0.
    pub industries: BTreeMap<IndustryKind, u32>,
    /// Built infrastructure.
    pub infrastructure: BTreeSet<InfrastructureKind>,
    pub investments: BTreeMap<InvestmentKind, Investment>,
    pub indicators: Indicators,
    /// Upgrade purchases per industry, drives exponential cost.
    pub industry_upgrades: BTreeMap<IndustryKind, u32>,
    /// Cached military modifiers; refreshed whenever assets change.
    pub military: MilitaryBonuses,
    /// Interest multipliers from the active financial event, if any.
    #[serde(default)]
    pub investment_multipliers: Option<BTreeMap<InvestmentKind, f64>>,
    /// The financial event currently driving `investment_multipliers`.
    #[serde(default)]
    pub active_financial_event: Option<EventId>,
}

impl EconomicData {
    pub fn industry_level(&self, kind: IndustryKind) -> u32 {
        self.industries.get(&kind).copied().unwrap_or(0)
    }

    pub fn upgrades(&self, kind: IndustryKind) -> u32 {
        self.industry_upgrades.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: InfrastructureKind) -> bool {
        self.infrastructure.contains(&kind)
    }

    pub fn investment(&self, kind: InvestmentKind) -> Investment {
        self.investments.get(&kind).cloned().unwrap_or_default()
    }

    /// Interest multiplier for `kind`; 1 when no financial event is active.
    pub fn interest_multiplier(&self, kind: InvestmentKind) -> f64 {
        self.investment_multipliers
            .as_ref()
            .and_then(|m| m.get(&kind).copied())
            .unwrap_or(1.0)
    }
}
