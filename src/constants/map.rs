//! Whole-map constants.

/// Smallest accepted row or column count
pub const MIN_MAP_DIMENSION: usize = 20;
/// Fresh seeds tried before a missing start biome is reported
pub const GENERATION_ATTEMPTS: u32 = 4;
