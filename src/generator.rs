//! Level generation entry point.
//!
//! Phase order: noise, caverns, caves, tunnels, terrain, biomes, biome
//! route, placement. All intermediate state lives in a [`GenerationContext`]
//! built for one call and dropped when it returns; only the [`LevelRecord`]
//! escapes.

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biomes::{biome_route, label_biomes, Biome, BiomeGraph, BiomeType};
use crate::caverns::{carve_caverns, scatter_caverns, Cavern};
use crate::caves::{label_caves, Cave};
use crate::config::GeneratorConfig;
use crate::constants::{GENERATION_ATTEMPTS, MIN_MAP_DIMENSION};
use crate::error::{GenError, GenResult};
use crate::grid::{Grid, TileMap};
use crate::noise_field::NoiseField;
use crate::palette::Palette;
use crate::placement::{choose_endpoints, sample_waypoints, FeaturePlacer, Item, Secret, Waypoint};
use crate::spawning::Enemy;
use crate::terrain::{paint_terrain, TerrainThresholds};
use crate::tile::Cell;
use crate::tunnels::{connect_caves, Tunnel};

/// A finished level. Tiles carry their types only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub tile_map: TileMap,
    pub start: Cell,
    pub exit: Cell,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub secrets: Vec<Secret>,
    pub waypoints: Vec<Waypoint>,
    /// `[r, g, b, ...]`, one triple per tile type in declaration order
    pub colors: Vec<f32>,
    /// Biome types crossed from start to exit
    pub biome_route: Vec<BiomeType>,
}

/// Generate a level with the default configuration.
pub fn generate(seed: u64, rows: usize, columns: usize, game_seed: u64, level: u32) -> GenResult<LevelRecord> {
    generate_with_config(&GeneratorConfig::default(), seed, rows, columns, game_seed, level)
}

pub fn generate_with_config(
    config: &GeneratorConfig,
    seed: u64,
    rows: usize,
    columns: usize,
    game_seed: u64,
    level: u32,
) -> GenResult<LevelRecord> {
    puffin::profile_function!();
    if rows < MIN_MAP_DIMENSION || columns < MIN_MAP_DIMENSION {
        return Err(GenError::InvalidDimensions {
            rows,
            columns,
            min: MIN_MAP_DIMENSION,
        });
    }

    let mut attempt = 0;
    loop {
        let rng = ChaCha8Rng::seed_from_u64(mix_seed(seed, game_seed, level, attempt));
        let context = GenerationContext::new(config, rows, columns, game_seed, level, rng);
        match context.run() {
            Err(GenError::NoStartBiome { min_size }) if attempt + 1 < GENERATION_ATTEMPTS => {
                warn!(
                    "seed {} attempt {}: no wide-ground biome over {} tiles, reseeding",
                    seed, attempt, min_size
                );
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Fold the call arguments into one RNG seed.
fn mix_seed(seed: u64, game_seed: u64, level: u32, attempt: u32) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    for part in [game_seed, level as u64, attempt as u64] {
        h = (h ^ part).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
    }
    h
}

/// Everything one generation call owns while it runs.
pub struct GenerationContext<'c> {
    config: &'c GeneratorConfig,
    game_seed: u64,
    level: u32,
    rng: ChaCha8Rng,
    grid: Grid,
    noise: NoiseField,
    caverns: Vec<Cavern>,
    caves: Vec<Cave>,
    tunnels: Vec<Tunnel>,
    biomes: Vec<Biome>,
}

impl<'c> GenerationContext<'c> {
    pub fn new(
        config: &'c GeneratorConfig,
        rows: usize,
        columns: usize,
        game_seed: u64,
        level: u32,
        mut rng: ChaCha8Rng,
    ) -> Self {
        let noise = NoiseField::generate(rng.gen(), rows, columns);
        Self {
            config,
            game_seed,
            level,
            rng,
            grid: Grid::new(rows, columns),
            noise,
            caverns: Vec::new(),
            caves: Vec::new(),
            tunnels: Vec::new(),
            biomes: Vec::new(),
        }
    }

    fn carve(&mut self) {
        let config = &self.config.caverns;
        self.caverns = scatter_caverns(&mut self.rng, self.grid.rows, self.grid.columns, config);
        carve_caverns(&mut self.grid, &self.caverns, &self.noise, config);
        let seeds: Vec<Cell> = self.caverns.iter().map(Cavern::center_cell).collect();
        self.caves = label_caves(&mut self.grid, &seeds, config.min_pocket_size);
        debug!("{} caverns carved into {} caves", self.caverns.len(), self.caves.len());
    }

    fn connect(&mut self) {
        self.tunnels = connect_caves(
            &mut self.grid,
            &self.caves,
            &self.noise,
            &self.config.tunnels,
            &mut self.rng,
        );
    }

    fn paint(&mut self) {
        let thresholds = TerrainThresholds::for_level(&self.config.terrain, self.level);
        paint_terrain(&mut self.grid, &self.noise, &thresholds);
        self.biomes = label_biomes(&mut self.grid);
    }

    /// Run every phase and hand back the finished level.
    pub fn run(mut self) -> GenResult<LevelRecord> {
        self.carve();
        self.connect();
        self.paint();

        let graph = BiomeGraph::build(&self.grid, self.biomes.len());
        let endpoints = choose_endpoints(&self.grid, &self.biomes, &mut self.rng)?;
        let route = biome_route(&graph, &self.biomes, endpoints.start_biome, endpoints.exit_biome);
        let waypoints = sample_waypoints(
            &self.grid,
            endpoints.start,
            endpoints.exit,
            self.config.placement.waypoint_spacing,
        );

        let cavern_centers: Vec<Cell> = self.caverns.iter().map(Cavern::center_cell).collect();
        let mut placer = FeaturePlacer::new(
            &mut self.grid,
            &mut self.biomes,
            &self.config.placement,
            &mut self.rng,
            &endpoints,
        );
        let features = placer.place_all(&endpoints, &route, &cavern_centers);

        info!(
            "level {}: {}x{}, {} caves, {} tunnels, {} biomes, {} secrets, {} items, {} enemies",
            self.level,
            self.grid.rows,
            self.grid.columns,
            self.caves.len(),
            self.tunnels.len(),
            self.biomes.len(),
            features.secrets.len(),
            features.items.len(),
            features.enemies.len()
        );

        Ok(LevelRecord {
            tile_map: self.grid.to_tile_map(),
            start: endpoints.start,
            exit: endpoints.exit,
            enemies: features.enemies,
            items: features.items,
            secrets: features.secrets,
            waypoints,
            colors: Palette::for_level(self.game_seed, self.level).flat(),
            biome_route: route.iter().map(|&id| self.biomes[id].biome_type).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tiny_maps() {
        assert!(matches!(
            generate(1, 10, 80, 0, 0),
            Err(GenError::InvalidDimensions { rows: 10, .. })
        ));
    }

    #[test]
    fn test_mix_seed_separates_arguments() {
        let base = mix_seed(1, 2, 3, 0);
        assert_ne!(base, mix_seed(2, 2, 3, 0));
        assert_ne!(base, mix_seed(1, 3, 3, 0));
        assert_ne!(base, mix_seed(1, 2, 4, 0));
        assert_ne!(base, mix_seed(1, 2, 3, 1));
        assert_eq!(base, mix_seed(1, 2, 3, 0));
    }

    #[test]
    fn test_record_matches_requested_size() {
        let level = generate(7, 60, 70, 1, 0).unwrap();
        assert_eq!(level.tile_map.rows, 60);
        assert_eq!(level.tile_map.columns, 70);
        assert_eq!(level.tile_map.tiles.len(), 4200);
        assert_eq!(level.colors.len(), 24);
        assert!(!level.biome_route.is_empty());
    }
}
