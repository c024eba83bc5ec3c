//! Event templates and the built-in catalog.
//!
//! A catalog can also be loaded from YAML so scenarios can ship their own
//! flavor without touching the engine.

use serde::{Deserialize, Serialize};
use sim_core::{Axis, Country, EventEffect, EventKind, InvestmentKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Quantity a template condition is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Stat(Axis),
    TotalStats,
    AverageStat,
    Money,
    Population,
}

impl Measure {
    pub fn read(self, country: &Country) -> f64 {
        match self {
            Measure::Stat(axis) => country.stats.get(axis),
            Measure::TotalStats => country.stats.total(),
            Measure::AverageStat => country.stats.average(),
            Measure::Money => country.money as f64,
            Measure::Population => country.population as f64,
        }
    }
}

/// Minimum threshold on a measure.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub measure: Measure,
    pub min: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    /// Relative draw weight within a category.
    pub fn weight(self) -> f64 {
        match self {
            Rarity::Common => 3.0,
            Rarity::Uncommon => 2.0,
            Rarity::Rare => 1.0,
        }
    }
}

/// An immutable event blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub key: String,
    pub kind: EventKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub effect: EventEffect,
    #[serde(default)]
    pub duration: u32,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub conditions: Vec<Condition>,
    /// Same-axis gate for personages and inspirations.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub focus: Option<Condition>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub money: i64,
    #[serde(default)]
    pub population_pct: f64,
    #[serde(default)]
    pub birth_rate_delta: f64,
    #[serde(default)]
    pub investment_multipliers: Option<BTreeMap<InvestmentKind, f64>>,
}

impl EventTemplate {
    pub fn new(kind: EventKind, key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            kind,
            title: title.to_string(),
            description: String::new(),
            effect: EventEffect::None,
            duration: 0,
            conditions: Vec::new(),
            focus: None,
            rarity: Rarity::Common,
            money: 0,
            population_pct: 0.0,
            birth_rate_delta: 0.0,
            investment_multipliers: None,
        }
    }

    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    pub fn deltas(mut self, deltas: &[(Axis, f64)]) -> Self {
        self.effect = EventEffect::Deltas(deltas.iter().copied().collect());
        self
    }

    pub fn lowest(mut self, delta: f64) -> Self {
        self.effect = EventEffect::LowestStat(delta);
        self
    }

    pub fn lasting(mut self, weeks: u32) -> Self {
        self.duration = weeks;
        self
    }

    pub fn requires(mut self, measure: Measure, min: f64) -> Self {
        self.conditions.push(Condition { measure, min });
        self
    }

    pub fn focus(mut self, axis: Axis, min: f64) -> Self {
        self.focus = Some(Condition { measure: Measure::Stat(axis), min });
        self
    }

    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn money(mut self, amount: i64) -> Self {
        self.money = amount;
        self
    }

    pub fn population(mut self, pct: f64, birth_rate_delta: f64) -> Self {
        self.population_pct = pct;
        self.birth_rate_delta = birth_rate_delta;
        self
    }

    pub fn multipliers(mut self, multipliers: &[(InvestmentKind, f64)]) -> Self {
        self.investment_multipliers = Some(multipliers.iter().copied().collect());
        self
    }

    /// Whether every condition and the focus gate hold for `country`.
    pub fn is_eligible(&self, country: &Country) -> bool {
        self.conditions
            .iter()
            .chain(self.focus.iter())
            .all(|c| c.measure.read(country) >= c.min)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("template {0} has a kind the generator never draws")]
    NotGenerated(String),
    #[error("duplicate template key {0}")]
    Duplicate(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    templates: Vec<EventTemplate>,
}

impl Catalog {
    pub fn new(templates: Vec<EventTemplate>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        for t in &templates {
            if !EventKind::GENERATED.contains(&t.kind) {
                return Err(CatalogError::NotGenerated(t.key.clone()));
            }
            if !seen.insert(t.key.as_str()) {
                return Err(CatalogError::Duplicate(t.key.clone()));
            }
        }
        Ok(Self { templates })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let templates: Vec<EventTemplate> = serde_yaml::from_str(text)?;
        Self::new(templates)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn templates(&self) -> &[EventTemplate] {
        &self.templates
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &EventTemplate> + '_ {
        self.templates.iter().filter(move |t| t.kind == kind)
    }

    pub fn get(&self, key: &str) -> Option<&EventTemplate> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self { templates: standard() }
    }
}

fn standard() -> Vec<EventTemplate> {
    use Axis::*;
    use EventKind as K;
    use InvestmentKind::*;
    vec![
        // personages
        EventTemplate::new(K::Personage, "great_general", "A Great General Rises")
            .describe("A brilliant commander reforms the army.")
            .deltas(&[(Military, 3.0)])
            .focus(Military, 3.0),
        EventTemplate::new(K::Personage, "visionary_scientist", "Visionary Scientist")
            .describe("A scholar overturns old certainties.")
            .deltas(&[(Science, 3.0)])
            .focus(Science, 3.0),
        EventTemplate::new(K::Personage, "master_artist", "Master Artist")
            .describe("A new school of painting draws crowds.")
            .deltas(&[(Culture, 3.0)])
            .focus(Culture, 3.0),
        EventTemplate::new(K::Personage, "reformist_statesman", "Reformist Statesman")
            .describe("Sweeping reforms pass the assembly.")
            .deltas(&[(Social, 2.0), (Economy, 1.0)])
            .focus(Social, 3.0),
        EventTemplate::new(K::Personage, "merchant_prince", "Merchant Prince")
            .describe("A trading house expands across the seas.")
            .deltas(&[(Economy, 3.0)])
            .focus(Economy, 3.0),
        EventTemplate::new(K::Personage, "wandering_scholar", "Wandering Scholar")
            .describe("A traveller teaches what the nation lacks most.")
            .lowest(2.0)
            .rarity(Rarity::Uncommon),
        // crises
        EventTemplate::new(K::Crisis, "plague", "Plague Outbreak")
            .describe("Disease spreads through the cities.")
            .deltas(&[(Social, -2.0), (Economy, -1.0)])
            .population(-0.02, -0.2)
            .lasting(2),
        EventTemplate::new(K::Crisis, "recession", "Economic Recession")
            .describe("Markets contract and credit dries up.")
            .deltas(&[(Economy, -2.0)])
            .money(-200)
            .requires(Measure::Stat(Economy), 2.0)
            .lasting(2),
        EventTemplate::new(K::Crisis, "civil_unrest", "Civil Unrest")
            .describe("Protests fill the squares.")
            .deltas(&[(Social, -2.0), (Culture, -1.0)])
            .lasting(1),
        EventTemplate::new(K::Crisis, "border_skirmish", "Border Skirmish")
            .describe("Raiders test the frontier.")
            .deltas(&[(Military, -1.0)]),
        EventTemplate::new(K::Crisis, "crop_failure", "Crop Failure")
            .describe("A dry summer ruins the harvest.")
            .deltas(&[(Economy, -1.0), (Social, -1.0)])
            .population(-0.01, 0.0)
            .lasting(1)
            .rarity(Rarity::Uncommon),
        // golden ages
        EventTemplate::new(K::Inspiration, "golden_age_arts", "Golden Age of the Arts")
            .describe("Artists and poets define an era.")
            .deltas(&[(Culture, 4.0), (Social, 2.0)])
            .focus(Culture, 6.0),
        EventTemplate::new(K::Inspiration, "enlightenment", "Age of Enlightenment")
            .describe("Reason and inquiry flourish.")
            .deltas(&[(Science, 4.0), (Culture, 2.0)])
            .focus(Science, 6.0),
        EventTemplate::new(K::Inspiration, "prosperity", "Age of Prosperity")
            .describe("Wealth reaches every household.")
            .deltas(&[(Economy, 4.0), (Social, 2.0)])
            .focus(Economy, 6.0),
        // milestones
        EventTemplate::new(K::Milestone, "printing_press", "First Printing Press")
            .describe("Books become affordable.")
            .deltas(&[(Science, 2.0), (Culture, 1.0)])
            .requires(Measure::Stat(Science), 5.0),
        EventTemplate::new(K::Milestone, "national_railway", "National Railway")
            .describe("Rail links the provinces.")
            .deltas(&[(Economy, 2.0), (Military, 1.0)])
            .requires(Measure::Stat(Economy), 8.0),
        EventTemplate::new(K::Milestone, "universal_schooling", "Universal Schooling")
            .describe("Every child learns to read.")
            .deltas(&[(Social, 2.0), (Science, 1.0)])
            .requires(Measure::Stat(Social), 6.0)
            .requires(Measure::Stat(Science), 4.0),
        EventTemplate::new(K::Milestone, "standing_army", "Standing Army")
            .describe("A professional army replaces the levies.")
            .deltas(&[(Military, 2.0)])
            .requires(Measure::Stat(Military), 8.0)
            .rarity(Rarity::Uncommon),
        // discoveries
        EventTemplate::new(K::Discovery, "trade_route", "New Trade Route")
            .describe("Explorers chart a passage to distant markets.")
            .deltas(&[(Economy, 2.0)])
            .money(300),
        EventTemplate::new(K::Discovery, "observatory", "Astronomical Observatory")
            .describe("New instruments reveal the heavens.")
            .deltas(&[(Science, 2.0)])
            .requires(Measure::Stat(Science), 2.0),
        EventTemplate::new(K::Discovery, "medical_breakthrough", "Medical Breakthrough")
            .describe("Physicians learn to contain fevers.")
            .deltas(&[(Social, 1.0), (Science, 1.0)])
            .population(0.01, 0.0)
            .rarity(Rarity::Uncommon),
        EventTemplate::new(K::Discovery, "ore_deposits", "Rich Ore Deposits")
            .describe("Prospectors strike iron and copper.")
            .deltas(&[(Economy, 1.0), (Military, 1.0)])
            .money(200),
        // cultural
        EventTemplate::new(K::Cultural, "grand_festival", "Grand Festival")
            .describe("The whole nation celebrates.")
            .deltas(&[(Culture, 2.0), (Social, 1.0)]),
        EventTemplate::new(K::Cultural, "epic_poem", "National Epic")
            .describe("A poem captures the national spirit.")
            .deltas(&[(Culture, 2.0)])
            .requires(Measure::Stat(Culture), 2.0),
        EventTemplate::new(K::Cultural, "religious_revival", "Religious Revival")
            .describe("Temples fill again, for a while.")
            .deltas(&[(Culture, 1.0), (Social, 1.0)])
            .lasting(3)
            .rarity(Rarity::Uncommon),
        // technological
        EventTemplate::new(K::Technological, "steam_engine", "Steam Engine")
            .describe("Machines take over the mills.")
            .deltas(&[(Economy, 2.0), (Science, 1.0)])
            .requires(Measure::Stat(Science), 4.0),
        EventTemplate::new(K::Technological, "metallurgy", "Improved Metallurgy")
            .describe("Stronger steel for tools and blades.")
            .deltas(&[(Military, 2.0), (Economy, 1.0)])
            .requires(Measure::Stat(Science), 2.0),
        EventTemplate::new(K::Technological, "telegraph", "Telegraph")
            .describe("News crosses the country in minutes.")
            .deltas(&[(Science, 1.0), (Social, 1.0)])
            .requires(Measure::Stat(Science), 6.0)
            .rarity(Rarity::Rare),
        // financial
        EventTemplate::new(K::Financial, "market_boom", "Market Boom")
            .describe("Share prices soar.")
            .deltas(&[(Economy, 1.0)])
            .money(500)
            .multipliers(&[(Stocks, 1.5), (Ventures, 1.3)])
            .lasting(3),
        EventTemplate::new(K::Financial, "banking_panic", "Banking Panic")
            .describe("Depositors rush the banks.")
            .deltas(&[(Economy, -1.0)])
            .money(-300)
            .multipliers(&[(Bonds, 0.8), (Stocks, 0.5), (Ventures, 0.5)])
            .lasting(2)
            .rarity(Rarity::Uncommon),
        EventTemplate::new(K::Financial, "stable_currency", "Stable Currency")
            .describe("The treasury guarantees the coinage.")
            .money(200)
            .multipliers(&[(Bonds, 1.2)])
            .lasting(4),
        // population
        EventTemplate::new(K::Population, "baby_boom", "Baby Boom")
            .describe("Families grow after years of peace.")
            .deltas(&[(Social, 1.0)])
            .population(0.03, 0.3)
            .lasting(3),
        EventTemplate::new(K::Population, "emigration", "Emigration Wave")
            .describe("Citizens leave in search of opportunity.")
            .population(-0.02, -0.1)
            .lasting(2),
        EventTemplate::new(K::Population, "immigration", "Immigration Wave")
            .describe("Newcomers bring skills and labor.")
            .deltas(&[(Economy, 1.0)])
            .population(0.02, 0.0),
    ]
}
