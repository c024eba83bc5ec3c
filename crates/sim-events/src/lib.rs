#![deny(warnings)]

//! Random national events: weighted selection, application with synergy
//! bonuses, timed expiry and reversal.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod generate;

pub use catalog::{Catalog, CatalogError, Condition, EventTemplate, Measure, Rarity};
pub use config::{EventConfig, EventConfigError, GoldenAgeGate};
pub use engine::{ActiveEvent, EngineState, EventEngine, PassReport};
pub use generate::{category_weights, golden_age_open, pick_template};
