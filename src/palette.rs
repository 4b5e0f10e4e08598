//! Per-level tile colours.
//!
//! Each tile type has a base HSV colour. A level's palette rotates every hue
//! by an offset drawn from the game seed plus a fixed step per level, so
//! consecutive levels of one game drift through the colour wheel together.

use image::Rgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tile::TileType;

/// Hue rotation per level, in degrees
const LEVEL_HUE_STEP: f32 = 23.0;
/// Largest rotation the game seed can add, in degrees
const SEED_HUE_RANGE: f32 = 60.0;

/// (hue 0-360, saturation 0-1, value 0-1)
fn base_hsv(tile_type: TileType) -> (f32, f32, f32) {
    match tile_type {
        TileType::HighWall => (30.0, 0.25, 0.18),
        TileType::ThinWall => (30.0, 0.22, 0.32),
        TileType::Floor => (35.0, 0.30, 0.55),
        TileType::Rock => (25.0, 0.15, 0.45),
        TileType::Grass => (105.0, 0.50, 0.55),
        TileType::Paved => (45.0, 0.12, 0.70),
        TileType::Water => (200.0, 0.60, 0.70),
        TileType::DeepWater => (215.0, 0.75, 0.45),
    }
}

/// Convert HSV to RGB in [0, 1]
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: [[f32; 3]; TileType::ALL.len()],
}

impl Palette {
    pub fn for_level(game_seed: u64, level: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(game_seed);
        let shift = rng.gen_range(0.0..SEED_HUE_RANGE) + level as f32 * LEVEL_HUE_STEP;
        let mut colors = [[0.0; 3]; TileType::ALL.len()];
        for (slot, tile_type) in colors.iter_mut().zip(TileType::ALL) {
            let (h, s, v) = base_hsv(tile_type);
            *slot = hsv_to_rgb(h + shift, s, v);
        }
        Self { colors }
    }

    pub fn rgb(&self, tile_type: TileType) -> [f32; 3] {
        self.colors[tile_type as usize]
    }

    pub fn rgb8(&self, tile_type: TileType) -> Rgb<u8> {
        let [r, g, b] = self.rgb(tile_type);
        Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
    }

    /// `[r, g, b, r, g, b, ...]` in tile type declaration order
    pub fn flat(&self) -> Vec<f32> {
        self.colors.iter().flatten().copied().collect()
    }
}
