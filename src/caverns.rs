//! Cavern carving: the first pass that turns solid rock into open caves.
//!
//! A handful of rotated ellipses ("caverns") are scattered over a coarse zone
//! grid. Each interior tile is scored by its normalised distance to the
//! nearest ellipse plus a carve-noise offset; two thresholds split the score
//! into floor, a thin-wall rim, and untouched high wall.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::config::CavernConfig;
use crate::grid::Grid;
use crate::noise_field::{NoiseChannel, NoiseField};
use crate::tile::{Cell, TileType};

/// Elliptical seed region. Only lives for the duration of a generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cavern {
    /// Map-space centre (x along columns, y along rows)
    pub center: Vec2,
    pub angle: f32,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl Cavern {
    pub fn center_cell(&self) -> Cell {
        Cell::new(self.center.y.floor() as i32, self.center.x.floor() as i32)
    }

    /// Distance to the centre in ellipse units: 1.0 on the rim.
    pub fn ellipse_distance(&self, point: Vec2) -> f32 {
        let d = point - self.center;
        let (sin, cos) = self.angle.sin_cos();
        let local_x = d.x * cos + d.y * sin;
        let local_y = -d.x * sin + d.y * cos;
        ((local_x / self.radius_x).powi(2) + (local_y / self.radius_y).powi(2)).sqrt()
    }
}

/// Largest radius that still leaves room for a cavern on this map
fn effective_max_radius(rows: usize, columns: usize, config: &CavernConfig) -> f32 {
    config
        .max_radius
        .min(rows.min(columns) as f32 / 4.0)
        .max(config.min_radius.min(2.0))
}

/// Scatter one cavern per zone of a coarse grid, jittered inside its zone and
/// kept a max-radius margin away from the map edges.
pub fn scatter_caverns(rng: &mut impl Rng, rows: usize, columns: usize, config: &CavernConfig) -> Vec<Cavern> {
    puffin::profile_function!();
    let max_radius = effective_max_radius(rows, columns, config);
    let min_radius = config.min_radius.min(max_radius);
    let margin = max_radius.ceil() + 1.0;

    let usable_h = (rows as f32 - 2.0 * margin).max(1.0);
    let usable_w = (columns as f32 - 2.0 * margin).max(1.0);
    let zone = config.zone_size.max(1) as f32;
    let zones_i = ((usable_h / zone).floor() as usize).max(1);
    let zones_j = ((usable_w / zone).floor() as usize).max(1);
    let zone_h = usable_h / zones_i as f32;
    let zone_w = usable_w / zones_j as f32;

    let mut caverns = Vec::with_capacity(zones_i * zones_j);
    for zi in 0..zones_i {
        for zj in 0..zones_j {
            let y = margin + zone_h * (zi as f32 + rng.gen_range(0.2..0.8));
            let x = margin + zone_w * (zj as f32 + rng.gen_range(0.2..0.8));
            caverns.push(Cavern {
                center: Vec2::new(x, y),
                angle: rng.gen_range(0.0..PI),
                radius_x: rng.gen_range(min_radius..=max_radius),
                radius_y: rng.gen_range(min_radius..=max_radius),
            });
        }
    }
    caverns
}

/// Carve floor and thin-wall rims around the caverns. The outer ring of the
/// map is never touched.
pub fn carve_caverns(grid: &mut Grid, caverns: &[Cavern], noise: &NoiseField, config: &CavernConfig) {
    puffin::profile_function!();
    if caverns.is_empty() {
        return;
    }
    let cells: Vec<Cell> = grid.cells().filter(|c| grid.in_interior(c.i, c.j)).collect();
    for cell in cells {
        let point = cell.center();
        let in_core = caverns
            .iter()
            .any(|c| c.center.distance(point) <= config.core_radius);
        let tile_type = if in_core {
            TileType::Floor
        } else {
            let nearest = caverns
                .iter()
                .map(|c| c.ellipse_distance(point))
                .fold(f32::INFINITY, f32::min);
            let offset = (noise.sample(NoiseChannel::Carve, cell.i, cell.j) - 0.5) * config.noise_weight;
            let score = nearest + offset;
            if score < config.carve_threshold {
                TileType::Floor
            } else if score < config.thin_wall_threshold {
                TileType::ThinWall
            } else {
                TileType::HighWall
            }
        };
        grid.set_type(cell.i, cell.j, tile_type);
    }
}
