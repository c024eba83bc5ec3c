//! Rubber-band scaling of costs and benefits.
//!
//! Multipliers grow as `base ^ week`, clamped to the configured band. The
//! bases come from a tier picked by the population-average stat total, so
//! a world that progresses quickly sees costs rise faster and benefits grow
//! slower. The tier is only re-picked when [`BalanceState::adjust`] is
//! called; the caller owns the cadence.

use crate::config::{BalanceConfig, BalanceTier};
use serde::{Deserialize, Serialize};
use sim_core::Country;
use tracing::debug;

/// Construction categories that scale independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostCategory {
    Industry,
    Infrastructure,
    Investment,
}

/// The currently selected tier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceState {
    pub tier: usize,
    /// Population-average stat total seen at the last adjustment.
    pub average_progress: f64,
}

impl BalanceState {
    /// Re-pick the tier from the active countries' stat totals. Returns
    /// true when the tier changed.
    pub fn adjust<'a>(&mut self, cfg: &BalanceConfig, countries: impl IntoIterator<Item = &'a Country>) -> bool {
        let (sum, n) = countries
            .into_iter()
            .filter(|c| c.is_active)
            .fold((0.0, 0usize), |(s, n), c| (s + c.stats.total(), n + 1));
        let average = if n == 0 { 0.0 } else { sum / n as f64 };
        let tier = cfg
            .tiers
            .iter()
            .position(|t| t.max_average.map_or(true, |m| average < m))
            .unwrap_or(cfg.tiers.len().saturating_sub(1));
        self.average_progress = average;
        let changed = tier != self.tier;
        if changed {
            debug!(from = self.tier, to = tier, average, "balance tier changed");
        }
        self.tier = tier;
        changed
    }

    fn tier<'c>(&self, cfg: &'c BalanceConfig) -> Option<&'c BalanceTier> {
        cfg.tiers.get(self.tier).or_else(|| cfg.tiers.last())
    }

    /// Cost multiplier for a category at `week`.
    pub fn cost_multiplier(&self, cfg: &BalanceConfig, category: CostCategory, week: u32) -> f64 {
        let base = self.tier(cfg).map_or(1.0, |t| match category {
            CostCategory::Industry => t.industry_cost_base,
            CostCategory::Infrastructure => t.infrastructure_cost_base,
            CostCategory::Investment => t.investment_cost_base,
        });
        scaled(cfg, base, week)
    }

    /// Benefit multiplier applied to income bonuses at `week`.
    pub fn benefit_multiplier(&self, cfg: &BalanceConfig, week: u32) -> f64 {
        let base = self.tier(cfg).map_or(1.0, |t| t.benefit_base);
        scaled(cfg, base, week)
    }
}

fn scaled(cfg: &BalanceConfig, base: f64, week: u32) -> f64 {
    let exp = i32::try_from(week).unwrap_or(i32::MAX);
    let m = base.powi(exp);
    if !m.is_finite() {
        return cfg.max_multiplier;
    }
    m.clamp(cfg.min_multiplier, cfg.max_multiplier)
}
