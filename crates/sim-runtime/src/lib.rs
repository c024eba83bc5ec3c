#![deny(warnings)]

//! Session runtime: calendar, weekly sequence, player and AI commands,
//! the real-time scheduler and snapshots.

pub mod calendar;
pub mod config;
pub mod game;
pub mod scheduler;
pub mod snapshot;

pub use calendar::{Calendar, DAYS_PER_WEEK};
pub use config::{ConfigError, CountrySpec, GameConfig};
pub use game::{DayReport, Game, GameOutcome, PendingEvent, WeekReport};
pub use scheduler::{FrameReport, Scheduler, Speed, DISPLAY_INTERVAL_MS};
pub use snapshot::{GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
