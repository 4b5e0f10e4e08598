//! Biomes: connected regions sharing one passability class, the graph of
//! which biomes touch, and the cheapest biome route from start to exit.

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::navigation::Form;
use crate::priority_queue::PriorityQueue;
use crate::tile::{Cell, TileAccess};

/// Passability class of a biome. The discriminant is the cost of entering a
/// biome of this type on the biome route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeType {
    NarrowGround = 1,
    WideGround = 2,
    NarrowWater = 3,
    WideWater = 4,
}

impl BiomeType {
    /// Narrow types are scanned first so they win tiles that are both
    pub const SCAN_ORDER: [BiomeType; 4] = [
        BiomeType::NarrowGround,
        BiomeType::NarrowWater,
        BiomeType::WideGround,
        BiomeType::WideWater,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn matches(self, map: &impl TileAccess, cell: Cell) -> bool {
        match self {
            BiomeType::NarrowGround => map.is_narrow_ground(cell.i, cell.j),
            BiomeType::WideGround => map.is_wide_ground(cell.i, cell.j),
            BiomeType::NarrowWater => map.is_narrow_water(cell.i, cell.j),
            BiomeType::WideWater => map.is_wide_water(cell.i, cell.j),
        }
    }

    /// Form a player picks up by crossing a biome of this type
    pub fn unlocks(self) -> Option<Form> {
        match self {
            BiomeType::NarrowGround => Some(Form::Dot),
            BiomeType::WideWater => Some(Form::Box),
            BiomeType::NarrowWater => Some(Form::Snake),
            BiomeType::WideGround => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    pub representative: Cell,
    pub id: usize,
    pub biome_type: BiomeType,
    pub size: usize,
    /// Region cell closest to the region's centroid
    pub center: Cell,
    /// Free feature slots inside this biome, filled in by placement
    pub locations: Vec<Cell>,
}

/// Flood-fill every passable tile into a biome. Each tile is claimed at most
/// once; ids follow [`BiomeType::SCAN_ORDER`] then row-major order.
pub fn label_biomes(grid: &mut Grid) -> Vec<Biome> {
    puffin::profile_function!();
    let mut biomes = Vec::new();
    let cells: Vec<Cell> = grid.cells().collect();

    for biome_type in BiomeType::SCAN_ORDER {
        for &cell in &cells {
            let unclaimed = grid.get(cell.i, cell.j).is_some_and(|t| t.biome_id.is_none());
            if !unclaimed || !biome_type.matches(&*grid, cell) {
                continue;
            }
            let region = {
                let view: &Grid = grid;
                view.flood(cell, |c| {
                    view.get(c.i, c.j).is_some_and(|t| t.biome_id.is_none()) && biome_type.matches(view, c)
                })
            };
            let id = biomes.len();
            for c in &region {
                if let Some(tile) = grid.get_mut(c.i, c.j) {
                    tile.biome_id = Some(id);
                }
            }
            biomes.push(Biome {
                representative: cell,
                id,
                biome_type,
                size: region.len(),
                center: region_center(&region),
                locations: Vec::new(),
            });
        }
    }

    debug!("labelled {} biomes", biomes.len());
    biomes
}

fn region_center(region: &[Cell]) -> Cell {
    let n = region.len().max(1) as f32;
    let (si, sj) = region
        .iter()
        .fold((0.0, 0.0), |(si, sj), c| (si + c.i as f32, sj + c.j as f32));
    let (mi, mj) = (si / n, sj / n);
    region
        .iter()
        .copied()
        .min_by(|a, b| {
            let da = (a.i as f32 - mi).powi(2) + (a.j as f32 - mj).powi(2);
            let db = (b.i as f32 - mi).powi(2) + (b.j as f32 - mj).powi(2);
            da.total_cmp(&db)
        })
        .unwrap_or(Cell::new(0, 0))
}

/// Undirected adjacency between biome ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiomeGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl BiomeGraph {
    /// One scan comparing each tile with the tiles above and to the right.
    pub fn build(grid: &Grid, biome_count: usize) -> Self {
        puffin::profile_function!();
        let mut graph = Self {
            adjacency: vec![BTreeSet::new(); biome_count],
        };
        for cell in grid.cells() {
            let Some(here) = grid.get(cell.i, cell.j).and_then(|t| t.biome_id) else {
                continue;
            };
            for (di, dj) in [(-1, 0), (0, 1)] {
                let other = grid.get(cell.i + di, cell.j + dj).and_then(|t| t.biome_id);
                if let Some(other) = other.filter(|&o| o != here) {
                    graph.add_edge(here, other);
                }
            }
        }
        graph
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        let needed = a.max(b) + 1;
        if self.adjacency.len() < needed {
            self.adjacency.resize(needed, BTreeSet::new());
        }
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(id).into_iter().flatten().copied()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|n| n.contains(&b))
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }
}

/// Dijkstra over the biome graph; entering a biome costs its type code.
/// Returns biome ids from `start` to `exit`, or nothing if unreachable.
pub fn biome_route(graph: &BiomeGraph, biomes: &[Biome], start: usize, exit: usize) -> Vec<usize> {
    puffin::profile_function!();
    let n = biomes.len();
    if start >= n || exit >= n {
        return Vec::new();
    }
    let mut dist = vec![f32::INFINITY; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut done = vec![false; n];
    let mut open = PriorityQueue::with_capacity(n);
    dist[start] = 0.0;
    open.push(start, 0.0);

    while let Some(current) = open.pop() {
        if current == exit {
            break;
        }
        done[current] = true;
        for next in graph.neighbors(current) {
            if next >= n || done[next] {
                continue;
            }
            let d = dist[current] + biomes[next].biome_type.code() as f32;
            if d < dist[next] {
                dist[next] = d;
                previous[next] = Some(current);
                open.push(next, d);
            }
        }
    }

    if !dist[exit].is_finite() {
        return Vec::new();
    }
    let mut route = vec![exit];
    let mut current = exit;
    while let Some(prev) = previous[current] {
        route.push(prev);
        current = prev;
    }
    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::ORTHOGONAL;

    fn mixed_grid() -> Grid {
        Grid::from_ascii(&[
            "############",
            "#....#~~~~~#",
            "#....#~~~~~#",
            "#..........#",
            "#....#~~~~~#",
            "###.##~~~~~#",
            "###.##~###~#",
            "###.##~###~#",
            "############",
        ])
    }

    #[test]
    fn test_every_labelled_tile_matches_its_biome() {
        let mut grid = mixed_grid();
        let biomes = label_biomes(&mut grid);
        assert!(biomes.len() >= 4);
        for cell in grid.cells().collect::<Vec<_>>() {
            let tile = grid.get(cell.i, cell.j).unwrap();
            match tile.biome_id {
                Some(id) => assert!(biomes[id].biome_type.matches(&grid, cell), "{cell:?}"),
                None => assert!(grid.is_wall(cell.i, cell.j), "{cell:?} unlabelled"),
            }
        }
        let total: usize = biomes.iter().map(|b| b.size).sum();
        assert_eq!(total, grid.tiles.iter().filter(|t| !t.tile_type.is_wall()).count());
    }

    #[test]
    fn test_narrow_biomes_are_labelled_first() {
        let mut grid = mixed_grid();
        let biomes = label_biomes(&mut grid);
        let first_wide = biomes
            .iter()
            .position(|b| matches!(b.biome_type, BiomeType::WideGround | BiomeType::WideWater))
            .unwrap();
        assert!(biomes[..first_wide]
            .iter()
            .all(|b| matches!(b.biome_type, BiomeType::NarrowGround | BiomeType::NarrowWater)));
        let corridor = grid.get(6, 3).unwrap().biome_id.unwrap();
        assert_eq!(biomes[corridor].biome_type, BiomeType::NarrowGround);
    }

    #[test]
    fn test_adjacent_biomes_share_symmetric_edges() {
        let mut grid = mixed_grid();
        let biomes = label_biomes(&mut grid);
        let graph = BiomeGraph::build(&grid, biomes.len());
        for cell in grid.cells() {
            let Some(a) = grid.get(cell.i, cell.j).and_then(|t| t.biome_id) else {
                continue;
            };
            for (di, dj) in ORTHOGONAL {
                if let Some(b) = grid.get(cell.i + di, cell.j + dj).and_then(|t| t.biome_id) {
                    if a != b {
                        assert!(graph.has_edge(a, b) && graph.has_edge(b, a));
                    }
                }
            }
        }
        assert!(graph.edge_count() > 0);
    }

    fn chain(types: &[BiomeType]) -> Vec<Biome> {
        types
            .iter()
            .enumerate()
            .map(|(id, &biome_type)| Biome {
                representative: Cell::new(0, id as i32),
                id,
                biome_type,
                size: 10,
                center: Cell::new(0, id as i32),
                locations: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_route_prefers_cheap_biome_types() {
        // 0 -> 1 (wide water) -> 3, or 0 -> 2 (narrow ground) -> 3
        let biomes = chain(&[
            BiomeType::WideGround,
            BiomeType::WideWater,
            BiomeType::NarrowGround,
            BiomeType::WideGround,
        ]);
        let mut graph = BiomeGraph::default();
        graph.add_edge(0, 1);
        graph.add_edge(1, 3);
        graph.add_edge(0, 2);
        graph.add_edge(2, 3);
        assert_eq!(biome_route(&graph, &biomes, 0, 3), vec![0, 2, 3]);
        assert_eq!(biome_route(&graph, &biomes, 3, 3), vec![3]);
    }

    #[test]
    fn test_unreachable_exit_gives_empty_route() {
        let biomes = chain(&[BiomeType::WideGround, BiomeType::WideGround, BiomeType::WideGround]);
        let mut graph = BiomeGraph::default();
        graph.add_edge(0, 1);
        assert!(biome_route(&graph, &biomes, 0, 2).is_empty());
        assert!(biome_route(&graph, &biomes, 0, 7).is_empty());
    }
}
