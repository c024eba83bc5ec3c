//! Event records as stored on a country.
//!
//! Templates and the selection/aging logic live in `sim-events`; this module
//! only holds the applied-record shape so that `Country` can own its log.

use crate::axis::{Axis, Stats};
use crate::economy::InvestmentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier of an applied event instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt-{}", self.0)
    }
}

/// Closed set of event categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Personage,
    Crisis,
    Inspiration,
    Milestone,
    Discovery,
    Cultural,
    Technological,
    Financial,
    Population,
    Industry,
    Infrastructure,
}

/// How the presentation layer should frame an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl EventKind {
    /// Categories that the random generator draws from. Construction
    /// records are logged by the economy, never drawn.
    pub const GENERATED: [EventKind; 9] = [
        EventKind::Personage,
        EventKind::Crisis,
        EventKind::Inspiration,
        EventKind::Milestone,
        EventKind::Discovery,
        EventKind::Cultural,
        EventKind::Technological,
        EventKind::Financial,
        EventKind::Population,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Personage => "Personage",
            EventKind::Crisis => "Crisis",
            EventKind::Inspiration => "Golden Age",
            EventKind::Milestone => "Milestone",
            EventKind::Discovery => "Discovery",
            EventKind::Cultural => "Cultural",
            EventKind::Technological => "Technological",
            EventKind::Financial => "Financial",
            EventKind::Population => "Population",
            EventKind::Industry => "Industry",
            EventKind::Infrastructure => "Infrastructure",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            EventKind::Crisis => Tone::Negative,
            EventKind::Financial | EventKind::Population => Tone::Neutral,
            _ => Tone::Positive,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stat effect of an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventEffect {
    /// Signed delta per axis.
    Deltas(BTreeMap<Axis, f64>),
    /// Delta applied to whichever axis is lowest at application time.
    LowestStat(f64),
    /// No stat change.
    None,
}

impl EventEffect {
    /// Resolve into concrete per-axis deltas against the current stats.
    pub fn resolve(&self, stats: &Stats) -> BTreeMap<Axis, f64> {
        match self {
            EventEffect::Deltas(d) => d.clone(),
            EventEffect::LowestStat(v) => BTreeMap::from([(stats.lowest().0, *v)]),
            EventEffect::None => BTreeMap::new(),
        }
    }
}

/// An event as applied to a specific country.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    /// Template effect as authored.
    pub effects: EventEffect,
    /// Base deltas as they landed after the zero floor; reversal subtracts these.
    pub applied: BTreeMap<Axis, f64>,
    /// Extra deltas granted by axis synergies and category bonuses.
    pub bonus: BTreeMap<Axis, f64>,
    /// Total duration in weeks-of-aging; 0 means instantaneous.
    pub duration: u32,
    /// Remaining aging passes before reversal.
    pub remaining: u32,
    /// Week the event was applied.
    pub week: u32,
    /// Treasury change applied once at application.
    pub money: i64,
    /// Fractional population change applied once at application.
    pub population_pct: f64,
    /// Birth-rate change, reverted with the event.
    pub birth_rate_delta: f64,
    /// Interest multipliers for financial events.
    pub investment_multipliers: Option<BTreeMap<InvestmentKind, f64>>,
}

impl EventRecord {
    pub fn is_timed(&self) -> bool {
        self.duration > 0
    }
}
