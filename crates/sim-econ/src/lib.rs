#![deny(warnings)]

//! Economic pipeline for the nations simulation.
//!
//! This crate turns a country's built assets into income, efficiency and
//! stability, prices and executes construction, investment and army
//! purchases, and scales costs and benefits over time:
//! - Industry levels, infrastructure and investments add fractions of base income
//! - Infrastructure synergies stack on top of individual bonuses
//! - Efficiency and stability multiply the total and are clamped to bands
//! - The same assets feed a military bonus set (army cap, upkeep, power)
//! - A rubber-band tier slows cost and benefit curves for runaway worlds

pub mod balance;
pub mod config;
pub mod income;
pub mod military;
pub mod pipeline;
pub mod synergy;

pub use balance::{BalanceState, CostCategory};
pub use config::{EconConfig, EconConfigError};
pub use income::{income_breakdown, investment_interest, IncomeBreakdown};
pub use military::{military_power, Stance};
pub use pipeline::{EconError, Economy, Price, WeeklyReport};
pub use synergy::SynergyFlags;
