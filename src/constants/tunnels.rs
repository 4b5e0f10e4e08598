//! Tunnel digging constants.

/// Dig cost of a tile that is already open (paths prefer digging walls)
pub const TUNNEL_OPEN_COST: f32 = 12.0;
/// Scale of the dig noise channel added to the base wall cost of 1
pub const TUNNEL_NOISE_WEIGHT: f32 = 4.0;
/// Tunnel width while in a narrow run
pub const TUNNEL_NARROW_WIDTH: i32 = 1;
/// Tunnel width while in a wide run
pub const TUNNEL_WIDE_WIDTH: i32 = 2;
/// Shortest run before the width toggles
pub const TUNNEL_MIN_RUN: usize = 3;
/// Longest run before the width toggles
pub const TUNNEL_MAX_RUN: usize = 9;
