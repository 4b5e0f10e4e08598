//! Terrain painting constants. Thresholds apply to noise samples in [0, 1].

/// Water channel value above which floor floods on level 0
pub const WATER_THRESHOLD: f32 = 0.66;
/// How much the water threshold drops per level
pub const WATER_THRESHOLD_PER_LEVEL: f32 = 0.015;
/// Lowest the water threshold can go
pub const WATER_THRESHOLD_MIN: f32 = 0.56;
/// Depth channel value above which flooded floor becomes deep water
pub const DEEP_WATER_THRESHOLD: f32 = 0.55;
/// Rock channel value above which floor becomes rock on level 0
pub const ROCK_THRESHOLD: f32 = 0.70;
/// How much the rock threshold drops per level
pub const ROCK_THRESHOLD_PER_LEVEL: f32 = 0.01;
/// Grass channel value above which floor becomes grass on level 0
pub const GRASS_THRESHOLD: f32 = 0.58;
/// How much the grass threshold rises per level (less grass deeper down)
pub const GRASS_THRESHOLD_PER_LEVEL: f32 = 0.02;
/// Thresholds never leave this band
pub const TERRAIN_THRESHOLD_MAX: f32 = 0.95;
