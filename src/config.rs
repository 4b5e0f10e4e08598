//! Tunable generation parameters.
//!
//! Defaults come from [`crate::constants`]. Any subset of fields can be
//! overridden from a JSON file; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::GenResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavernConfig {
    pub zone_size: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub core_radius: f32,
    pub carve_threshold: f32,
    pub thin_wall_threshold: f32,
    pub noise_weight: f32,
    pub min_pocket_size: usize,
}

impl Default for CavernConfig {
    fn default() -> Self {
        Self {
            zone_size: CAVERN_ZONE_SIZE,
            min_radius: CAVERN_MIN_RADIUS,
            max_radius: CAVERN_MAX_RADIUS,
            core_radius: CAVERN_CORE_RADIUS,
            carve_threshold: CAVERN_CARVE_THRESHOLD,
            thin_wall_threshold: CAVERN_THIN_WALL_THRESHOLD,
            noise_weight: CAVERN_NOISE_WEIGHT,
            min_pocket_size: CAVE_MIN_POCKET_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub open_cost: f32,
    pub noise_weight: f32,
    pub narrow_width: i32,
    pub wide_width: i32,
    pub min_run: usize,
    pub max_run: usize,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            open_cost: TUNNEL_OPEN_COST,
            noise_weight: TUNNEL_NOISE_WEIGHT,
            narrow_width: TUNNEL_NARROW_WIDTH,
            wide_width: TUNNEL_WIDE_WIDTH,
            min_run: TUNNEL_MIN_RUN,
            max_run: TUNNEL_MAX_RUN,
        }
    }
}

/// Level-0 terrain thresholds and how they drift with depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub water: f32,
    pub water_per_level: f32,
    pub water_min: f32,
    pub deep_water: f32,
    pub rock: f32,
    pub rock_per_level: f32,
    pub grass: f32,
    pub grass_per_level: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            water: WATER_THRESHOLD,
            water_per_level: WATER_THRESHOLD_PER_LEVEL,
            water_min: WATER_THRESHOLD_MIN,
            deep_water: DEEP_WATER_THRESHOLD,
            rock: ROCK_THRESHOLD,
            rock_per_level: ROCK_THRESHOLD_PER_LEVEL,
            grass: GRASS_THRESHOLD,
            grass_per_level: GRASS_THRESHOLD_PER_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub location_radius: i32,
    pub location_dist: i32,
    pub waypoint_spacing: usize,
    pub enemy_min_start_distance: f32,
    pub max_enemies: usize,
    pub coins: (usize, usize),
    pub wisps: (usize, usize),
    pub beacons: (usize, usize),
    pub invisible_pickups: (usize, usize),
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            location_radius: LOCATION_RADIUS,
            location_dist: LOCATION_DIST,
            waypoint_spacing: WAYPOINT_SPACING,
            enemy_min_start_distance: ENEMY_MIN_START_DISTANCE,
            max_enemies: MAX_ENEMIES,
            coins: (COIN_COUNT_MIN, COIN_COUNT_MAX),
            wisps: (0, WISP_COUNT_MAX),
            beacons: (BEACON_COUNT_MIN, BEACON_COUNT_MAX),
            invisible_pickups: (0, INVISIBLE_COUNT_MAX),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub caverns: CavernConfig,
    pub tunnels: TunnelConfig,
    pub terrain: TerrainConfig,
    pub placement: PlacementConfig,
}

impl GeneratorConfig {
    pub fn from_json(text: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
