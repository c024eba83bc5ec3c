#![deny(warnings)]

//! Battle resolution between two countries and the post-battle transforms
//! (loot, raze, conquer) a victor may choose.

pub mod config;
pub mod resolve;
pub mod settle;

pub use config::{BattleConfig, BattleConfigError, Range};
pub use resolve::{apply_casualties, casualty_ranges, resolve, resolve_strengths, BattleReport, Outcome, Side};
pub use settle::{check, settle, PostBattle, Spoils};
