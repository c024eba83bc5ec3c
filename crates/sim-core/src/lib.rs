#![deny(warnings)]

//! Core domain models and invariants for the nations simulation.
//!
//! This crate defines the serializable country aggregate, the five
//! development axes, event records, the random source and the error types
//! shared by the economy, event, battle, AI and runtime crates.

pub mod axis;
pub mod config;
pub mod country;
pub mod economy;
pub mod error;
pub mod event;
pub mod rng;

pub use axis::{Axis, Stats, UnknownAxis};
pub use config::{CountrySeed, SimConfig};
pub use country::{Country, CountryId, GoldenAge, HistoryEntry, Roster};
pub use economy::{
    EconomicData, Indicators, IndustryKind, InfrastructureKind, Investment, InvestmentKind,
    MilitaryBonuses, Project,
};
pub use error::{InvalidAction, ValidationError};
pub use event::{EventEffect, EventId, EventKind, EventRecord, Tone};
pub use rng::{GameRng, RandomSource, ScriptedRng};
