//! Full serializable session state.

use crate::calendar::Calendar;
use crate::game::{GameOutcome, PendingEvent};
use serde::{Deserialize, Serialize};
use sim_ai::Strategy;
use sim_core::{Country, CountryId, ValidationError};
use sim_econ::BalanceState;
use sim_events::EngineState;
use std::collections::BTreeMap;
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub calendar: Calendar,
    pub countries: Vec<Country>,
    pub events: EngineState,
    pub ai: BTreeMap<CountryId, Strategy>,
    pub balance: BalanceState,
    pub outcome: Option<GameOutcome>,
    pub pending: Vec<PendingEvent>,
    pub rng_seed: u64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    #[error("country {country}: {source}")]
    Invalid {
        country: CountryId,
        #[source]
        source: ValidationError,
    },
    #[error("duplicate country {0}")]
    Duplicate(CountryId),
}

impl GameSnapshot {
    /// Reject snapshots from another format version or with broken
    /// country invariants.
    pub fn check(&self, max_experience: u8) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version(self.version));
        }
        let mut seen = std::collections::BTreeSet::new();
        for c in &self.countries {
            if !seen.insert(c.id) {
                return Err(SnapshotError::Duplicate(c.id));
            }
            c.validate(max_experience)
                .map_err(|source| SnapshotError::Invalid { country: c.id, source })?;
        }
        Ok(())
    }
}
