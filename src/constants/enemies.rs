//! Enemy roster constants.

// STALKER
/// Stalker movement speed in tiles per tick
pub const STALKER_SPEED: f32 = 0.55;
/// Stalker body colour
pub const STALKER_COLOR: [f32; 3] = [0.85, 0.22, 0.18];

// DRIFTER
/// Drifter movement speed in tiles per tick
pub const DRIFTER_SPEED: f32 = 0.8;
/// Drifter body colour
pub const DRIFTER_COLOR: [f32; 3] = [0.62, 0.3, 0.9];
