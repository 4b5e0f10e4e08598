//! Terrain painting: the second noise pass over a connected cave map.
//!
//! Only primary floor is promoted, and never to a wall type, so painting
//! cannot break connectivity.

use crate::config::TerrainConfig;
use crate::constants::TERRAIN_THRESHOLD_MAX;
use crate::grid::Grid;
use crate::noise_field::{NoiseChannel, NoiseField};
use crate::tile::TileType;

/// Thresholds for one level; deeper levels get more water and rock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainThresholds {
    pub water: f32,
    pub deep_water: f32,
    pub rock: f32,
    pub grass: f32,
}

impl TerrainThresholds {
    pub fn for_level(config: &TerrainConfig, level: u32) -> Self {
        let level = level as f32;
        Self {
            water: (config.water - config.water_per_level * level)
                .max(config.water_min)
                .min(TERRAIN_THRESHOLD_MAX),
            deep_water: config.deep_water.min(TERRAIN_THRESHOLD_MAX),
            rock: (config.rock - config.rock_per_level * level).clamp(0.0, TERRAIN_THRESHOLD_MAX),
            grass: (config.grass + config.grass_per_level * level).min(TERRAIN_THRESHOLD_MAX),
        }
    }
}

/// The four channel values painting looks at for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub water: f32,
    pub depth: f32,
    pub rock: f32,
    pub grass: f32,
}

impl TerrainSample {
    pub fn at(noise: &NoiseField, i: i32, j: i32) -> Self {
        Self {
            water: noise.sample(NoiseChannel::Water, i, j),
            depth: noise.sample(NoiseChannel::Depth, i, j),
            rock: noise.sample(NoiseChannel::Rock, i, j),
            grass: noise.sample(NoiseChannel::Grass, i, j),
        }
    }
}

/// New type for a tile. Water wins over rock, rock over grass.
pub fn paint_tile(tile_type: TileType, sample: TerrainSample, thresholds: &TerrainThresholds) -> TileType {
    if tile_type != TileType::Floor {
        return tile_type;
    }
    if sample.water > thresholds.water {
        if sample.depth > thresholds.deep_water {
            TileType::DeepWater
        } else {
            TileType::Water
        }
    } else if sample.rock > thresholds.rock {
        TileType::Rock
    } else if sample.grass > thresholds.grass {
        TileType::Grass
    } else {
        TileType::Floor
    }
}

pub fn paint_terrain(grid: &mut Grid, noise: &NoiseField, thresholds: &TerrainThresholds) {
    puffin::profile_function!();
    for i in 0..grid.rows as i32 {
        for j in 0..grid.columns as i32 {
            let sample = TerrainSample::at(noise, i, j);
            if let Some(tile) = grid.get_mut(i, j) {
                tile.tile_type = paint_tile(tile.tile_type, sample, thresholds);
            }
        }
    }
}
