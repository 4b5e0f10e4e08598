//! Cavern carving constants.

/// Side length of the coarse zone grid; one cavern is scattered per zone
pub const CAVERN_ZONE_SIZE: usize = 30;
/// Smallest ellipse semi-axis
pub const CAVERN_MIN_RADIUS: f32 = 4.0;
/// Largest ellipse semi-axis (also the margin kept free at map edges)
pub const CAVERN_MAX_RADIUS: f32 = 10.0;
/// Tiles closer than this to a cavern centre are always carved
pub const CAVERN_CORE_RADIUS: f32 = 2.5;
/// Combined score below which a tile becomes floor
pub const CAVERN_CARVE_THRESHOLD: f32 = 1.0;
/// Combined score below which a tile becomes thin wall
pub const CAVERN_THIN_WALL_THRESHOLD: f32 = 1.3;
/// Scale of the carve noise channel added to the ellipse distance
pub const CAVERN_NOISE_WEIGHT: f32 = 0.7;
/// Unreached open pockets smaller than this are sealed back to wall
pub const CAVE_MIN_POCKET_SIZE: usize = 12;
