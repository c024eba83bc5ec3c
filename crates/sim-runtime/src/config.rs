//! Session configuration, loadable from YAML or JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sim_ai::{AiConfig, Strategy};
use sim_battle::BattleConfig;
use sim_core::SimConfig;
use sim_econ::EconConfig;
use sim_events::EventConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One country in the starting roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountrySpec {
    pub name: String,
    #[serde(default)]
    pub is_player: bool,
    /// AI archetype; assigned round-robin when absent.
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

impl CountrySpec {
    pub fn player(name: &str) -> Self {
        Self { name: name.into(), is_player: true, strategy: None }
    }

    pub fn ai(name: &str, strategy: Option<Strategy>) -> Self {
        Self { name: name.into(), is_player: false, strategy }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub sim: SimConfig,
    pub econ: EconConfig,
    pub events: EventConfig,
    pub battle: BattleConfig,
    pub ai: AiConfig,
    pub start_date: NaiveDate,
    pub countries: Vec<CountrySpec>,
    /// Optional YAML event catalog replacing the built-in one.
    pub event_catalog: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            econ: EconConfig::default(),
            events: EventConfig::default(),
            battle: BattleConfig::default(),
            ai: AiConfig::default(),
            start_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default(),
            countries: vec![
                CountrySpec::player("Aurelia"),
                CountrySpec::ai("Borealis", Some(Strategy::Militarist)),
                CountrySpec::ai("Caldera", Some(Strategy::Mercantile)),
                CountrySpec::ai("Dunmore", Some(Strategy::Scholarly)),
                CountrySpec::ai("Estmark", Some(Strategy::Cultural)),
            ],
            event_catalog: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension: {0}")]
    Extension(String),
    #[error("sim: {0}")]
    Sim(#[from] sim_core::ValidationError),
    #[error("econ: {0}")]
    Econ(#[from] sim_econ::EconConfigError),
    #[error("events: {0}")]
    Events(#[from] sim_events::EventConfigError),
    #[error("battle: {0}")]
    Battle(#[from] sim_battle::BattleConfigError),
    #[error("catalog: {0}")]
    Catalog(#[from] sim_events::CatalogError),
    #[error("{0}")]
    Invalid(String),
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load by file extension (`.yaml`, `.yml` or `.json`).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::Extension(other.unwrap_or("").to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sim.validate()?;
        self.econ.validate()?;
        self.events.validate()?;
        self.battle.validate()?;
        if !self.ai.power_deficit_margin.is_finite() || self.ai.power_deficit_margin < 0.0 {
            return Err(ConfigError::Invalid("ai.power_deficit_margin must be >= 0".into()));
        }
        if self.countries.is_empty() {
            return Err(ConfigError::Invalid("at least one country is required".into()));
        }
        if self.countries.iter().filter(|c| c.is_player).count() > 1 {
            return Err(ConfigError::Invalid("at most one player country".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GameConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.countries.iter().filter(|c| c.is_player).count(), 1);
    }

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let yaml = r#"
sim:
  rng_seed: 7
  max_weeks: 52
events:
  event_chance: 0.5
countries:
  - name: Solo
    strategy: balanced
  - name: Duo
"#;
        let cfg = GameConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.sim.rng_seed, 7);
        assert_eq!(cfg.sim.max_weeks, 52);
        assert_eq!(cfg.sim.points_per_week, 3);
        assert_eq!(cfg.events.event_chance, 0.5);
        assert_eq!(cfg.countries.len(), 2);
        assert_eq!(cfg.countries[0].strategy, Some(Strategy::Balanced));
        assert!(!cfg.countries[1].is_player);
    }

    #[test]
    fn json_is_accepted_and_validated() {
        let cfg = GameConfig::from_json_str(r#"{"sim": {"max_weeks": 10}}"#).unwrap();
        assert_eq!(cfg.sim.max_weeks, 10);
        let err = GameConfig::from_json_str(r#"{"events": {"event_chance": 2.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Events(_)));
        let err = GameConfig::from_json_str(r#"{"countries": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
