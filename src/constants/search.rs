//! Grid search constants.

/// Cost multiplier applied to a diagonal step's weight
pub const DIAGONAL_COST_FACTOR: f32 = 1.5;
/// Default weight of an allowed cell
pub const OPEN_WEIGHT: f32 = 1.0;

// NAVIGATION
/// Runtime agents re-plan at most once per this many ticks
pub const REPLAN_INTERVAL_TICKS: u32 = 8;
/// Half-size of the search box around a navigating agent
pub const NAVIGATION_MAX_DIST: i32 = 24;
