//! Shared primitive types used across the entire simulation.

/// A point on the simulation clock, measured in elapsed in-game hours.
/// The clock advances by the tick size (1, 24 or 168 hours) each step.
pub type Tick = u64;

/// A duration in in-game hours.
pub type Hours = u64;

pub const HOURS_PER_DAY: Hours = 24;
pub const HOURS_PER_WEEK: Hours = 168;
pub const HOURS_PER_YEAR: Hours = 8760;
