//! Fixed-step driver fed by real frame time.
//!
//! Two accumulators share each frame's elapsed time: the tick accumulator
//! pops whole simulated days at the current speed's step, the display
//! accumulator fires on a fixed cadence regardless of speed. Days are only
//! ever advanced in whole steps.

use crate::game::Game;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DISPLAY_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Paused,
    Slow,
    Normal,
    Fast,
}

impl Speed {
    /// Real milliseconds per simulated day; `None` while paused.
    pub fn step_ms(self) -> Option<u64> {
        match self {
            Speed::Paused => None,
            Speed::Slow => Some(3000),
            Speed::Normal => Some(1000),
            Speed::Fast => Some(143),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub days: u32,
    pub weeks: u32,
    /// Display refreshes due this frame.
    pub display_refreshes: u32,
    pub game_over: bool,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    speed: Speed,
    resume_speed: Speed,
    tick_acc_ms: u64,
    display_acc_ms: u64,
    stopped: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Speed::Normal)
    }
}

impl Scheduler {
    pub fn new(speed: Speed) -> Self {
        let resume_speed = if speed == Speed::Paused { Speed::Normal } else { speed };
        Self {
            speed,
            resume_speed,
            tick_acc_ms: 0,
            display_acc_ms: 0,
            stopped: false,
        }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Change the step size. Accumulated time is kept.
    pub fn set_speed(&mut self, speed: Speed) {
        if speed != Speed::Paused {
            self.resume_speed = speed;
        }
        debug!(from = ?self.speed, to = ?speed, "speed changed");
        self.speed = speed;
    }

    pub fn pause(&mut self) {
        if self.speed != Speed::Paused {
            self.resume_speed = self.speed;
            self.speed = Speed::Paused;
        }
    }

    /// Return to the speed in effect before the last pause.
    pub fn resume(&mut self) {
        self.speed = self.resume_speed;
    }

    /// Feed one real frame into the accumulators.
    pub fn frame(&mut self, elapsed_ms: u64, game: &mut Game) -> FrameReport {
        let mut report = FrameReport::default();
        if self.stopped || game.is_over() {
            self.stopped = true;
            report.game_over = true;
            return report;
        }
        if let Some(step) = self.speed.step_ms() {
            self.tick_acc_ms = self.tick_acc_ms.saturating_add(elapsed_ms);
            while self.tick_acc_ms >= step {
                self.tick_acc_ms -= step;
                let day = game.advance_day();
                report.days += 1;
                if day.week.is_some() {
                    report.weeks += 1;
                }
                if game.is_over() {
                    self.stopped = true;
                    report.game_over = true;
                    info!(week = game.week(), "scheduler stopped");
                    break;
                }
            }
        }
        self.display_acc_ms = self.display_acc_ms.saturating_add(elapsed_ms);
        while self.display_acc_ms >= DISPLAY_INTERVAL_MS {
            self.display_acc_ms -= DISPLAY_INTERVAL_MS;
            report.display_refreshes += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn game() -> Game {
        let mut cfg = GameConfig::default();
        cfg.events.event_chance = 0.0;
        Game::new(cfg).unwrap()
    }

    #[test]
    fn whole_steps_only() {
        let mut g = game();
        let mut s = Scheduler::new(Speed::Normal);
        let r = s.frame(2500, &mut g);
        assert_eq!(r.days, 2);
        assert_eq!(r.display_refreshes, 2);
        let r = s.frame(499, &mut g);
        assert_eq!(r.days, 0);
        let r = s.frame(1, &mut g);
        assert_eq!(r.days, 1);
        assert_eq!(r.display_refreshes, 1);
    }

    #[test]
    fn speed_change_keeps_partial_progress() {
        let mut g = game();
        let mut s = Scheduler::new(Speed::Slow);
        assert_eq!(s.frame(900, &mut g).days, 0);
        s.set_speed(Speed::Normal);
        assert_eq!(s.frame(100, &mut g).days, 1);
    }

    #[test]
    fn pause_freezes_ticks_but_not_display() {
        let mut g = game();
        let mut s = Scheduler::new(Speed::Fast);
        s.pause();
        let r = s.frame(5000, &mut g);
        assert_eq!(r.days, 0);
        assert_eq!(r.display_refreshes, 5);
        s.resume();
        assert_eq!(s.speed(), Speed::Fast);
        assert_eq!(s.frame(143 * 7, &mut g).weeks, 1);
    }

    #[test]
    fn stops_for_good_when_the_game_ends() {
        let mut cfg = GameConfig::default();
        cfg.events.event_chance = 0.0;
        cfg.sim.max_weeks = 1;
        let mut g = Game::new(cfg).unwrap();
        let mut s = Scheduler::new(Speed::Fast);
        let r = s.frame(143 * 20, &mut g);
        assert_eq!(r.days, 7);
        assert!(r.game_over && s.is_stopped());
        assert_eq!(s.frame(10_000, &mut g), FrameReport { game_over: true, ..FrameReport::default() });
    }

    proptest! {
        #[test]
        fn days_depend_only_on_total_time(frames in proptest::collection::vec(0u64..400, 1..60)) {
            let mut g = game();
            let mut s = Scheduler::new(Speed::Fast);
            let days: u32 = frames.iter().map(|f| s.frame(*f, &mut g).days).sum();
            let total: u64 = frames.iter().sum();
            prop_assert_eq!(u64::from(days), total / 143);
        }
    }
}
