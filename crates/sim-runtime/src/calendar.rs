//! Day and week counters with a derived display date.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: u8 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub start: NaiveDate,
    /// Completed weeks.
    pub week: u32,
    /// Day of the current week, `1..=7`.
    pub day_of_week: u8,
    pub elapsed_days: u64,
}

impl Calendar {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            week: 0,
            day_of_week: 1,
            elapsed_days: 0,
        }
    }

    /// Advance one day. Returns true when the week rolls over (7 -> 1).
    pub fn advance_day(&mut self) -> bool {
        self.elapsed_days += 1;
        if self.day_of_week >= DAYS_PER_WEEK {
            self.day_of_week = 1;
            self.week += 1;
            true
        } else {
            self.day_of_week += 1;
            false
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(self.elapsed_days))
            .unwrap_or(NaiveDate::MAX)
    }
}
