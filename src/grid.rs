use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::tile::{Cell, Tile, TileAccess, TileType, ORTHOGONAL};

/// Row-major tile grid owned by a single generation call.
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub tiles: Vec<Tile>,
}

impl Grid {
    /// A grid of solid high wall.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            tiles: vec![Tile::default(); rows * columns],
        }
    }

    /// Build a grid from glyph rows (see [`TileType::glyph`]). Unknown glyphs
    /// read as high wall.
    pub fn from_ascii(lines: &[&str]) -> Self {
        let rows = lines.len();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(rows, columns);
        for (i, line) in lines.iter().enumerate() {
            for (j, c) in line.chars().enumerate() {
                let tile_type = TileType::from_glyph(c).unwrap_or(TileType::HighWall);
                grid.tiles[i * columns + j] = Tile::new(tile_type);
            }
        }
        grid
    }

    pub fn in_bounds(&self, i: i32, j: i32) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.rows && (j as usize) < self.columns
    }

    /// True for cells at least one tile away from every edge
    pub fn in_interior(&self, i: i32, j: i32) -> bool {
        i >= 1 && j >= 1 && (i as usize) + 1 < self.rows && (j as usize) + 1 < self.columns
    }

    pub fn get(&self, i: i32, j: i32) -> Option<&Tile> {
        if !self.in_bounds(i, j) {
            return None;
        }
        Some(&self.tiles[i as usize * self.columns + j as usize])
    }

    pub fn get_mut(&mut self, i: i32, j: i32) -> Option<&mut Tile> {
        if !self.in_bounds(i, j) {
            return None;
        }
        Some(&mut self.tiles[i as usize * self.columns + j as usize])
    }

    pub fn set_type(&mut self, i: i32, j: i32, tile_type: TileType) {
        if let Some(tile) = self.get_mut(i, j) {
            tile.tile_type = tile_type;
        }
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32).flat_map(move |i| (0..self.columns as i32).map(move |j| Cell::new(i, j)))
    }

    /// 4-directional flood fill from `start` over cells matching `matches`.
    /// Returns the region in visit order, or nothing if `start` doesn't match.
    pub fn flood(&self, start: Cell, matches: impl Fn(Cell) -> bool) -> Vec<Cell> {
        if !self.in_bounds(start.i, start.j) || !matches(start) {
            return Vec::new();
        }
        let mut seen = vec![false; self.rows * self.columns];
        let mut region = Vec::new();
        let mut queue = VecDeque::from([start]);
        seen[start.i as usize * self.columns + start.j as usize] = true;
        while let Some(cell) = queue.pop_front() {
            region.push(cell);
            for (di, dj) in ORTHOGONAL {
                let next = cell.offset(di, dj);
                if !self.in_bounds(next.i, next.j) {
                    continue;
                }
                let idx = next.i as usize * self.columns + next.j as usize;
                if !seen[idx] && matches(next) {
                    seen[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        region
    }

    pub fn count(&self, tile_type: TileType) -> usize {
        self.tiles.iter().filter(|t| t.tile_type == tile_type).count()
    }

    /// Strip the bookkeeping ids, keeping only tile types.
    pub fn to_tile_map(&self) -> TileMap {
        TileMap {
            rows: self.rows,
            columns: self.columns,
            tiles: self.tiles.iter().map(|t| t.tile_type).collect(),
        }
    }
}

impl TileAccess for Grid {
    fn tile_type(&self, i: i32, j: i32) -> Option<TileType> {
        self.get(i, j).map(|t| t.tile_type)
    }
}

/// The tile types of a finished level; this is what map owners receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    pub rows: usize,
    pub columns: usize,
    pub tiles: Vec<TileType>,
}

impl TileMap {
    pub fn get(&self, i: i32, j: i32) -> Option<TileType> {
        if i < 0 || j < 0 || i as usize >= self.rows || j as usize >= self.columns {
            return None;
        }
        Some(self.tiles[i as usize * self.columns + j as usize])
    }

    /// One line of glyphs per row
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.columns + 1));
        for row in self.tiles.chunks(self.columns.max(1)) {
            out.extend(row.iter().map(TileType::glyph));
            out.push('\n');
        }
        out
    }
}

impl TileAccess for TileMap {
    fn tile_type(&self, i: i32, j: i32) -> Option<TileType> {
        self.get(i, j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_solid_wall() {
        let grid = Grid::new(4, 6);
        assert_eq!(grid.tiles.len(), 24);
        assert_eq!(grid.count(TileType::HighWall), 24);
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, -1).is_none());
    }

    #[test]
    fn test_interior_excludes_border() {
        let grid = Grid::new(5, 5);
        assert!(!grid.in_interior(0, 2));
        assert!(!grid.in_interior(2, 4));
        assert!(grid.in_interior(1, 1));
        assert!(grid.in_interior(3, 3));
    }

    #[test]
    fn test_ascii_round_trip_keeps_types_only() {
        let mut grid = Grid::from_ascii(&["#####", "#..~#", "#####"]);
        grid.get_mut(1, 1).unwrap().cave_id = Some(3);
        let map = grid.to_tile_map();
        assert_eq!(map.to_ascii(), "#####\n#..~#\n#####\n");
        assert_eq!(map.get(1, 3), Some(TileType::Water));
    }

    #[test]
    fn test_flood_is_four_connected() {
        let grid = Grid::from_ascii(&["..#.", ".#..", "#..."]);
        let region = grid.flood(Cell::new(0, 0), |c| !grid.is_wall(c.i, c.j));
        assert_eq!(region.len(), 3);
        assert!(!region.contains(&Cell::new(2, 1)));
        assert!(grid.flood(Cell::new(0, 2), |c| !grid.is_wall(c.i, c.j)).is_empty());
    }

    #[test]
    fn test_narrow_and_wide_ground() {
        let grid = Grid::from_ascii(&[
            "#######",
            "#.....#",
            "#.....#",
            "#.....#",
            "###.###",
            "###.###",
            "#######",
        ]);
        // corridor tile between two walls
        assert!(grid.is_narrow_ground(4, 3));
        assert!(!grid.is_wide_ground(4, 3));
        // room centre
        assert!(grid.is_wide_ground(2, 3));
        // room corner: walls N and W, but S and E are open
        assert!(grid.is_wide_ground(1, 1));
        // tile above the corridor mouth: only SW and SE are wall
        assert!(grid.is_wide_ground(3, 3));
        assert!(!grid.is_narrow_water(2, 3));
    }

    #[test]
    fn test_diagonal_pinch_is_narrow() {
        let grid = Grid::from_ascii(&[".....", "...#.", ".....", ".#...", "....."]);
        // orthogonal neighbours are open, but NE and SW are both wall
        assert!(grid.is_narrow_ground(2, 2));
        let open = Grid::from_ascii(&[".....", ".....", ".....", ".....", "....."]);
        assert!(open.is_wide_ground(2, 2));
    }
}
