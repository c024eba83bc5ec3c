//! Error types shared across the simulation crates.

use crate::axis::Axis;
use thiserror::Error;

/// Why a player or AI action was refused. Refusal never mutates state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("not enough money")]
    InsufficientFunds,
    #[error("not enough {0} to pay the stat cost")]
    InsufficientStat(Axis),
    #[error("{0} is below the required minimum")]
    RequirementNotMet(Axis),
    #[error("already built")]
    AlreadyBuilt,
    #[error("not enough development points")]
    InsufficientPoints,
    #[error("army is at maximum size")]
    ArmyAtCapacity,
    #[error("army experience is already maxed")]
    ExperienceMaxed,
    #[error("defender still has an army")]
    ArmyNotDefeated,
    #[error("post-battle actions require a victory")]
    NotAVictory,
    #[error("battle already settled")]
    AlreadySettled,
    #[error("a country cannot target itself")]
    SelfTarget,
    #[error("country is no longer active")]
    Inactive,
    #[error("unknown country")]
    UnknownCountry,
    #[error("the game is over")]
    GameOver,
}

/// Invariant violations detected on a country snapshot.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("stat {0} is negative or non-finite")]
    BadStat(Axis),
    #[error("negative money")]
    NegativeMoney,
    #[error("army {army} exceeds maximum {max}")]
    ArmyOverCap { army: u64, max: u64 },
    #[error("army experience {0} outside [1,10]")]
    ExperienceOutOfRange(u8),
    #[error("indicator {0} outside its band")]
    IndicatorOutOfBand(&'static str),
    #[error("non-finite numeric value encountered")]
    NonFinite,
    #[error("invalid configuration: {0}")]
    Config(String),
}
