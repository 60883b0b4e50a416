//! Simulation clock — owns elapsed time and the tick size.
//!
//! The tick counter is measured in in-game hours: every step adds the
//! current tick size, so hour-denominated horizons (loan terms, financing
//! cooldowns) compare directly against it at any tick size.

use crate::{
    error::{SimError, SimResult},
    types::{Hours, Tick, HOURS_PER_DAY, HOURS_PER_WEEK, HOURS_PER_YEAR},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    pub tick_size:    TickSize,
}

impl SimClock {
    pub fn new(tick_size: TickSize) -> Self {
        Self { current_tick: 0, tick_size }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += self.tick_size.hours();
        self.current_tick
    }

    pub fn set_tick_size(&mut self, tick_size: TickSize) {
        self.tick_size = tick_size;
    }

    /// Number of ticks in one in-game year at the current tick size.
    pub fn ticks_per_year(&self) -> f64 {
        self.tick_size.ticks_per_year()
    }

    pub fn day(&self) -> u64 {
        self.current_tick / HOURS_PER_DAY
    }

    pub fn hour_of_day(&self) -> u64 {
        self.current_tick % HOURS_PER_DAY
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TickSize {
    Hourly, // 8760 ticks per year
    Daily,  // 365 ticks per year
    Weekly, // ~52 ticks per year
}

impl TickSize {
    pub fn from_hours(hours: Hours) -> SimResult<Self> {
        match hours {
            1   => Ok(Self::Hourly),
            24  => Ok(Self::Daily),
            168 => Ok(Self::Weekly),
            _   => Err(SimError::InvalidTickSize { hours }),
        }
    }

    pub fn hours(&self) -> Hours {
        match self {
            Self::Hourly => 1,
            Self::Daily  => HOURS_PER_DAY,
            Self::Weekly => HOURS_PER_WEEK,
        }
    }

    pub fn ticks_per_year(&self) -> f64 {
        HOURS_PER_YEAR as f64 / self.hours() as f64
    }

    /// True when `horizon` hours is a whole number of ticks.
    pub fn divides(&self, horizon: Hours) -> bool {
        horizon.is_multiple_of(self.hours())
    }
}
