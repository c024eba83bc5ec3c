#![deny(warnings)]

//! Headless HUD: a `bevy_ecs` schedule feeds frame time into the scheduler
//! and drains pending event records into a display log.

use bevy_ecs::prelude::*;
use sim_runtime::{FrameReport, Game, GameConfig, GameOutcome, Scheduler, Speed};

/// Maximum lines kept in the HUD event log.
const LOG_CAPACITY: usize = 32;

#[derive(Resource)]
struct Session {
    game: Game,
    scheduler: Scheduler,
}

/// Real milliseconds elapsed since the previous frame.
#[derive(Resource, Default)]
struct FrameClock {
    elapsed_ms: u64,
}

#[derive(Resource, Default)]
struct LastFrame(FrameReport);

#[derive(Resource, Default)]
struct HudState {
    week: u32,
    date: String,
    days: u64,
    refreshes: u32,
    leader: String,
    log: Vec<String>,
    status: String,
}

fn advance_system(clock: Res<FrameClock>, mut session: ResMut<Session>, mut last: ResMut<LastFrame>) {
    let Session { game, scheduler } = &mut *session;
    last.0 = scheduler.frame(clock.elapsed_ms, game);
}

fn drain_events_system(mut session: ResMut<Session>, mut hud: ResMut<HudState>) {
    while let Some(pending) = session.game.next_pending() {
        let name = session
            .game
            .country(pending.country)
            .map_or_else(|| pending.country.to_string(), |c| c.name.clone());
        hud.log.push(format!("w{} {}: {}", pending.record.week, name, pending.record.title));
    }
    let overflow = hud.log.len().saturating_sub(LOG_CAPACITY);
    hud.log.drain(..overflow);
}

fn hud_system(session: Res<Session>, last: Res<LastFrame>, mut hud: ResMut<HudState>) {
    hud.days += u64::from(last.0.days);
    if last.0.display_refreshes == 0 && !last.0.game_over {
        return;
    }
    hud.refreshes += last.0.display_refreshes;
    let game = &session.game;
    hud.week = game.week();
    hud.date = game.date().to_string();
    hud.leader = game
        .countries()
        .values()
        .filter(|c| c.is_active)
        .max_by(|a, b| a.stats.total().total_cmp(&b.stats.total()))
        .map(|c| c.name.clone())
        .unwrap_or_default();
    hud.status = match game.outcome() {
        Some(GameOutcome::Victory { country, axis }) => format!("victory: {country} by {axis}"),
        Some(GameOutcome::TimeLimit { .. }) => "time limit".into(),
        Some(GameOutcome::Defeated) => "defeated".into(),
        None if session.scheduler.speed() == Speed::Paused => "paused".into(),
        None => "running".into(),
    };
}

fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((advance_system, drain_events_system, hud_system).chain());
    schedule
}

fn build_world(game: Game, speed: Speed) -> World {
    let mut world = World::new();
    world.insert_resource(Session { game, scheduler: Scheduler::new(speed) });
    world.insert_resource(FrameClock::default());
    world.insert_resource(LastFrame::default());
    world.insert_resource(HudState::default());
    world
}

fn main() {
    let game = match Game::new(GameConfig::default()) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("game-frontend: invalid config: {err}");
            return;
        }
    };
    let mut world = build_world(game, Speed::Fast);
    let mut schedule = build_schedule();
    // 60 fps worth of frames, one simulated minute
    world.resource_mut::<FrameClock>().elapsed_ms = 16;
    for _ in 0..3600 {
        schedule.run(&mut world);
        if world.resource::<LastFrame>().0.game_over {
            break;
        }
    }
    let s = world.resource::<HudState>();
    println!(
        "game-frontend: HUD | week={} date={} days={} leader={} status={} events={}",
        s.week,
        s.date,
        s.days,
        s.leader,
        s.status,
        s.log.len()
    );
    for line in &s.log {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(event_chance: f64) -> World {
        let mut cfg = GameConfig::default();
        cfg.events.event_chance = event_chance;
        build_world(Game::new(cfg).unwrap(), Speed::Normal)
    }

    #[test]
    fn frames_advance_days_and_refresh_the_hud() {
        let mut world = world(0.0);
        let mut schedule = build_schedule();
        world.resource_mut::<FrameClock>().elapsed_ms = 1000;
        for _ in 0..7 {
            schedule.run(&mut world);
        }
        let s = world.resource::<HudState>();
        assert_eq!(s.days, 7);
        assert_eq!(s.week, 1);
        assert_eq!(s.refreshes, 7);
        assert_eq!(s.status, "running");
        assert!(!s.leader.is_empty());
    }

    #[test]
    fn pending_events_land_in_the_log() {
        let mut world = world(1.0);
        let mut schedule = build_schedule();
        world.resource_mut::<FrameClock>().elapsed_ms = 28_000;
        schedule.run(&mut world);
        assert_eq!(world.resource::<Session>().game.pending_len(), 0);
        let s = world.resource::<HudState>();
        assert_eq!(s.week, 4);
        // five events plus any ai construction records
        assert!(s.log.len() >= 5);
    }

    #[test]
    fn paused_session_keeps_refreshing() {
        let mut world = world(0.0);
        world.resource_mut::<Session>().scheduler.pause();
        let mut schedule = build_schedule();
        world.resource_mut::<FrameClock>().elapsed_ms = 2500;
        schedule.run(&mut world);
        let s = world.resource::<HudState>();
        assert_eq!(s.days, 0);
        assert_eq!(s.refreshes, 2);
        assert_eq!(s.status, "paused");
    }
}
