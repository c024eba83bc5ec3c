#![deny(warnings)]

//! Headless CLI: runs a session for a number of weeks and prints KPIs.

use anyhow::{Context, Result};
use sim_ai::{allocate, Strategy};
use sim_core::{CountryId, GameRng};
use sim_runtime::{Game, GameConfig, GameOutcome};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    weeks: Option<u32>,
    seed: Option<u64>,
    config: Option<PathBuf>,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    /// Spend the player's points with this archetype instead of leaving them idle.
    auto: Option<Strategy>,
}

/// `RUST_LOG` directives when present and valid, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--weeks" => args.weeks = it.next().and_then(|s| s.parse().ok()),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--config" => args.config = it.next().map(PathBuf::from),
            "--load" => args.load = it.next().map(PathBuf::from),
            "--save" => args.save = it.next().map(PathBuf::from),
            "--auto" => {
                let name = it.next().unwrap_or_else(|| "balanced".into());
                args.auto = Some(name.parse()?);
            }
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }
    Ok(args)
}

fn auto_develop(game: &mut Game, player: CountryId, strategy: Strategy, rng: &mut GameRng) -> Result<()> {
    let budget = game.country(player).map_or(0, |c| c.development_points);
    if budget == 0 || game.is_over() {
        return Ok(());
    }
    let allocation = allocate(strategy.weights(), budget, rng);
    game.apply_development(player, &allocation)
        .context("auto development rejected")?;
    Ok(())
}

fn main() -> Result<()> {
    let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    info!(?args, "starting CLI");

    let mut cfg = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.sim.rng_seed = seed;
    }
    let weeks = args.weeks.unwrap_or(52);
    let auto_seed = cfg.sim.rng_seed ^ 0x5eed;

    let mut game = Game::new(cfg)?;
    if let Some(path) = &args.load {
        let snapshot = persistence::load(path).with_context(|| format!("loading save {}", path.display()))?;
        game.restore(snapshot)?;
    }

    let player = game.player();
    let mut rng = GameRng::new(auto_seed);
    let mut events = 0usize;
    let mut played = 0u32;
    while played < weeks && !game.is_over() {
        if let (Some(id), Some(strategy)) = (player, args.auto) {
            auto_develop(&mut game, id, strategy, &mut rng)?;
        }
        let reports = game.run_weeks(1);
        played += reports.len() as u32;
        events += reports.iter().map(|r| r.events_applied).sum::<usize>();
        while game.next_pending().is_some() {}
    }

    if let Some(path) = &args.save {
        persistence::save(path, &game.snapshot()).with_context(|| format!("saving {}", path.display()))?;
    }

    for c in game.countries().values() {
        let (axis, level) = c.stats.highest();
        println!(
            "{:<10} | active: {:<5} | stats: {:>6.1} | best: {} {:.1} | money: {} | pop: {} | army: {}",
            c.name,
            c.is_active,
            c.stats.total(),
            axis,
            level,
            c.money,
            c.population,
            c.army
        );
    }
    let outcome = match game.outcome() {
        Some(GameOutcome::Victory { country, axis }) => format!("victory {country} by {axis}"),
        Some(GameOutcome::TimeLimit { leader }) => format!("time limit, leader {leader:?}"),
        Some(GameOutcome::Defeated) => "defeated".to_string(),
        None => "running".to_string(),
    };
    println!(
        "KPI | weeks: {} | date: {} | events: {} | outcome: {}",
        game.week(),
        game.date(),
        events,
        outcome
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_overrides_the_default_level() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("debug".into())).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some("sim_events=trace".into())).max_level_hint(), Some(LevelFilter::TRACE));
    }
}
