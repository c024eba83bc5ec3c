#![deny(warnings)]

//! Save files: `GameSnapshot` encoded as JSON or bincode.

use serde::{Deserialize, Serialize};
use sim_runtime::GameSnapshot;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Directory used for saves when no explicit path is given.
pub const DEFAULT_SAVE_DIR: &str = "./saves";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Json,
    Bincode,
}

impl Format {
    /// `.json` is JSON; `.bin` and `.sav` are bincode.
    pub fn from_path(path: &Path) -> Result<Self, PersistenceError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("bin") | Some("sav") => Ok(Format::Bincode),
            other => Err(PersistenceError::Extension(other.unwrap_or("").to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Bincode => "bin",
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("unsupported save extension: {0:?}")]
    Extension(String),
}

pub fn encode(snapshot: &GameSnapshot, format: Format) -> Result<Vec<u8>, PersistenceError> {
    let bytes = match format {
        Format::Json => serde_json::to_vec_pretty(snapshot)?,
        Format::Bincode => bincode::serialize(snapshot)?,
    };
    Ok(bytes)
}

pub fn decode(bytes: &[u8], format: Format) -> Result<GameSnapshot, PersistenceError> {
    let snapshot = match format {
        Format::Json => serde_json::from_slice(bytes)?,
        Format::Bincode => bincode::deserialize(bytes)?,
    };
    Ok(snapshot)
}

/// Default save path for a named slot.
pub fn slot_path(name: &str, format: Format) -> PathBuf {
    Path::new(DEFAULT_SAVE_DIR).join(format!("{name}.{}", format.extension()))
}

/// Write a snapshot, choosing the format from the file extension. Parent
/// directories are created as needed.
pub fn save<P: AsRef<Path>>(path: P, snapshot: &GameSnapshot) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let bytes = encode(snapshot, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), week = snapshot.calendar.week, "game saved");
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<GameSnapshot, PersistenceError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let bytes = fs::read(path)?;
    let snapshot = decode(&bytes, format)?;
    debug!(path = %path.display(), week = snapshot.calendar.week, "game loaded");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{Axis, CountryId};
    use sim_runtime::{Game, GameConfig};
    use std::collections::BTreeMap;

    fn played() -> Game {
        let mut cfg = GameConfig::default();
        cfg.sim.rng_seed = 11;
        let mut game = Game::new(cfg).unwrap();
        game.run_weeks(8);
        game.apply_development(CountryId(1), &BTreeMap::from([(Axis::Economy, 4)])).unwrap();
        game
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("nations-persistence-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn both_formats_preserve_the_snapshot() {
        let snap = played().snapshot();
        for format in [Format::Json, Format::Bincode] {
            let bytes = encode(&snap, format).unwrap();
            assert_eq!(decode(&bytes, format).unwrap(), snap);
        }
    }

    #[test]
    fn saved_game_resumes_where_it_stopped() {
        let game = played();
        let path = temp_path("slot.bin");
        save(&path, &game.snapshot()).unwrap();
        let mut resumed = Game::new(GameConfig::default()).unwrap();
        resumed.restore(load(&path).unwrap()).unwrap();
        assert_eq!(resumed.week(), 8);
        assert_eq!(resumed.countries(), game.countries());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let snap = played().snapshot();
        let err = save(temp_path("slot.txt"), &snap).unwrap_err();
        assert!(matches!(err, PersistenceError::Extension(ref e) if e == "txt"));
        assert!(matches!(load(temp_path("missing.json")), Err(PersistenceError::Io(_))));
    }

    #[test]
    fn corrupt_bytes_fail_cleanly() {
        assert!(matches!(decode(b"{not json", Format::Json), Err(PersistenceError::Json(_))));
        assert!(matches!(decode(&[1, 2, 3], Format::Bincode), Err(PersistenceError::Bincode(_))));
    }

    #[test]
    fn slot_paths_live_under_the_save_dir() {
        let path = slot_path("autosave", Format::Json);
        assert!(path.starts_with(DEFAULT_SAVE_DIR));
        assert_eq!(Format::from_path(&path).unwrap(), Format::Json);
    }
}
