//! Feature placement constants.

/// Fine location grid cell size and clearance radius
pub const LOCATION_RADIUS: i32 = 2;
/// Coarse location grid cell size; placed features are at least this far apart
pub const LOCATION_DIST: i32 = 8;
/// A waypoint is dropped every this many route cells
pub const WAYPOINT_SPACING: usize = 51;
/// Minimum Euclidean distance between an enemy and the start
pub const ENEMY_MIN_START_DISTANCE: f32 = 50.0;
/// Maximum number of enemies per level
pub const MAX_ENEMIES: usize = 2;
/// Coin count range (inclusive)
pub const COIN_COUNT_MIN: usize = 5;
pub const COIN_COUNT_MAX: usize = 15;
/// Wisp count range (inclusive)
pub const WISP_COUNT_MAX: usize = 5;
/// Beacon count range (inclusive)
pub const BEACON_COUNT_MIN: usize = 1;
pub const BEACON_COUNT_MAX: usize = 3;
/// Invisible pickup count range (inclusive)
pub const INVISIBLE_COUNT_MAX: usize = 5;
