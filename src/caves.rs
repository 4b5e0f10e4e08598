//! Cave labelling: group carved tiles into connected components.

use log::debug;

use crate::grid::Grid;
use crate::tile::{Cell, TileAccess, TileType};

/// A connected component of open tiles found before tunnels are dug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cave {
    pub representative: Cell,
    pub id: usize,
    pub size: usize,
}

/// Flood-fill open tiles into caves, starting from each seed (cavern centre)
/// that has no cave yet. Open pockets no seed reaches are sealed back to
/// high wall when smaller than `min_pocket_size` and become caves of their
/// own otherwise, so every open tile ends up in some cave.
pub fn label_caves(grid: &mut Grid, seeds: &[Cell], min_pocket_size: usize) -> Vec<Cave> {
    puffin::profile_function!();
    let mut caves = Vec::new();

    for &seed in seeds {
        let unlabeled = grid.get(seed.i, seed.j).is_some_and(|t| !t.tile_type.is_wall() && t.cave_id.is_none());
        if unlabeled {
            claim(grid, seed, &mut caves);
        }
    }

    let mut sealed = 0;
    let cells: Vec<Cell> = grid.cells().collect();
    for cell in cells {
        let Some(tile) = grid.get(cell.i, cell.j) else {
            continue;
        };
        if tile.tile_type.is_wall() || tile.cave_id.is_some() {
            continue;
        }
        let pocket = grid.flood(cell, |c| !grid.is_wall(c.i, c.j));
        if pocket.len() < min_pocket_size {
            sealed += pocket.len();
            for c in pocket {
                grid.set_type(c.i, c.j, TileType::HighWall);
            }
        } else {
            claim(grid, cell, &mut caves);
        }
    }

    debug!("labelled {} caves, sealed {} orphan tiles", caves.len(), sealed);
    caves
}

fn claim(grid: &mut Grid, seed: Cell, caves: &mut Vec<Cave>) {
    let id = caves.len();
    let region = grid.flood(seed, |c| !grid.is_wall(c.i, c.j));
    for c in &region {
        if let Some(tile) = grid.get_mut(c.i, c.j) {
            tile.cave_id = Some(id);
        }
    }
    caves.push(Cave {
        representative: seed,
        id,
        size: region.len(),
    });
}
