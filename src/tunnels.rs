//! Tunnel digging: join every cave into a single cave system.
//!
//! Phase one gives each still-isolated cave a tunnel to the nearest cave of
//! another system (a no-target search that stops on the first foreign cave
//! tile). Phase two repeatedly joins the two heaviest remaining systems with
//! a targeted search until only one system is left. Both phases price open
//! tiles far above walls, so routes prefer digging fresh rock to wandering
//! through existing caves.

use log::{debug, warn};
use rand::Rng;

use crate::caves::Cave;
use crate::config::TunnelConfig;
use crate::disjoint_set::DisjointSet;
use crate::grid::Grid;
use crate::noise_field::{NoiseChannel, NoiseField};
use crate::search::{PathQuery, Route, SearchWindow};
use crate::tile::{Cell, TileType};

#[derive(Debug, Clone, PartialEq)]
pub struct Tunnel {
    pub representative: Cell,
    pub id: usize,
    /// Centre line, from the start cave to the reached cave
    pub route: Vec<Cell>,
    /// Wall tiles turned into floor, including widening
    pub dug: usize,
}

/// Cost of stepping onto a cell while digging
pub fn dig_cost(grid: &Grid, noise: &NoiseField, config: &TunnelConfig, cell: Cell) -> f32 {
    match grid.get(cell.i, cell.j) {
        Some(tile) if !tile.tile_type.is_wall() => config.open_cost,
        _ => 1.0 + noise.sample(NoiseChannel::Dig, cell.i, cell.j) * config.noise_weight,
    }
}

/// Dig tunnels until every cave belongs to one system. Returns the tunnels
/// in the order they were dug.
pub fn connect_caves(
    grid: &mut Grid,
    caves: &[Cave],
    noise: &NoiseField,
    config: &TunnelConfig,
    rng: &mut impl Rng,
) -> Vec<Tunnel> {
    puffin::profile_function!();
    let mut systems = DisjointSet::new(&caves.iter().map(|c| c.size).collect::<Vec<_>>());
    let mut tunnels = Vec::new();
    let window = SearchWindow::interior(grid.rows, grid.columns);

    for cave in caves {
        if systems.set_count() <= 1 {
            break;
        }
        if systems.set_size(cave.id) > 1 {
            continue;
        }
        let origin = systems.root(cave.id);
        let route = {
            let grid: &Grid = grid;
            let systems = &systems;
            PathQuery::new(window, cave.representative)
                .weight(|c| dig_cost(grid, noise, config, c))
                .stop_when(|c| {
                    grid.get(c.i, c.j)
                        .and_then(|t| t.cave_id)
                        .is_some_and(|id| systems.root(id) != origin)
                })
                .run()
        };
        let Some(reached) = route.end().and_then(|c| grid.get(c.i, c.j)).and_then(|t| t.cave_id) else {
            warn!("cave {} found no neighbour to tunnel to", cave.id);
            continue;
        };
        tunnels.push(dig(grid, &route, tunnels.len(), config, rng));
        systems.union(cave.id, reached);
    }

    while systems.set_count() > 1 {
        let roots = systems.roots_by_weight();
        let (a, b) = (roots[0], roots[1]);
        let route = {
            let grid: &Grid = grid;
            PathQuery::new(window, caves[a].representative)
                .target(caves[b].representative)
                .weight(|c| dig_cost(grid, noise, config, c))
                .run()
        };
        if route.is_empty() {
            warn!("no route between cave systems {} and {}", a, b);
            break;
        }
        tunnels.push(dig(grid, &route, tunnels.len(), config, rng));
        systems.union(a, b);
    }

    debug!(
        "dug {} tunnels, {} wall tiles, {} system(s) left",
        tunnels.len(),
        tunnels.iter().map(|t| t.dug).sum::<usize>(),
        systems.set_count()
    );
    tunnels
}

/// Carve a route into the grid. Width toggles between the narrow and wide
/// settings at random run lengths; high walls on the ring around each carved
/// block become thin walls.
fn dig(grid: &mut Grid, route: &Route, id: usize, config: &TunnelConfig, rng: &mut impl Rng) -> Tunnel {
    let cells: Vec<Cell> = route.cells.iter().rev().copied().collect();
    let mut run_length = || rng.gen_range(config.min_run..=config.max_run.max(config.min_run));

    let mut width = config.narrow_width;
    let mut run_left = run_length();
    let mut blocks = Vec::with_capacity(cells.len() + 8);
    let mut prev: Option<Cell> = None;
    for &cell in &cells {
        if run_left == 0 {
            width = if width == config.narrow_width {
                config.wide_width
            } else {
                config.narrow_width
            };
            run_left = run_length();
        }
        run_left = run_left.saturating_sub(1);

        // a diagonal step also opens one corner so the tunnel stays 4-connected
        if let Some(p) = prev {
            if p.i != cell.i && p.j != cell.j {
                blocks.push((Cell::new(p.i, cell.j), 1));
            }
        }
        blocks.push((cell, width.max(1)));
        prev = Some(cell);
    }

    let mut dug = 0;
    for &(origin, size) in &blocks {
        for di in 0..size {
            for dj in 0..size {
                let c = origin.offset(di, dj);
                if !grid.in_interior(c.i, c.j) {
                    continue;
                }
                if let Some(tile) = grid.get_mut(c.i, c.j) {
                    if tile.tile_type.is_wall() {
                        tile.tile_type = TileType::Floor;
                        if tile.tunnel_id.is_none() {
                            tile.tunnel_id = Some(id);
                        }
                        dug += 1;
                    }
                }
            }
        }
    }

    for &(origin, size) in &blocks {
        for di in -1..=size {
            for dj in -1..=size {
                let c = origin.offset(di, dj);
                if !grid.in_interior(c.i, c.j) {
                    continue;
                }
                if let Some(tile) = grid.get_mut(c.i, c.j) {
                    if tile.tile_type == TileType::HighWall {
                        tile.tile_type = TileType::ThinWall;
                    }
                }
            }
        }
    }

    Tunnel {
        representative: cells.get(cells.len() / 2).copied().unwrap_or(Cell::new(0, 0)),
        id,
        route: cells,
        dug,
    }
}
