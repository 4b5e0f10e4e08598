//! Weighted A* / Dijkstra over a bounded window of a tile grid.
//!
//! One search engine serves level generation (tunnel digging, the start to
//! exit route) and runtime navigation. Callers describe the problem with
//! predicates over cells, so the engine never looks at tiles directly:
//!
//! - `allowed`: may a path enter this cell?
//! - `weight`: cost of stepping onto an allowed cell (defaults to 1)
//! - `stop_when`: in no-target mode, the first popped cell matching this wins
//!
//! Movement is 8-directional. A diagonal step costs 1.5x the destination
//! weight and is refused when both orthogonal cells beside it are blocked,
//! so paths never squeeze through a diagonal wall gap. Scratch state lives
//! only for the duration of one `run`.

use glam::Vec2;

use crate::constants::{DIAGONAL_COST_FACTOR, OPEN_WEIGHT};
use crate::priority_queue::PriorityQueue;
use crate::tile::{Cell, COMPASS};

/// Inclusive rectangle of cells a search may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub min_i: i32,
    pub min_j: i32,
    pub max_i: i32,
    pub max_j: i32,
}

impl SearchWindow {
    /// Every cell of a `rows x columns` grid
    pub fn whole(rows: usize, columns: usize) -> Self {
        Self {
            min_i: 0,
            min_j: 0,
            max_i: rows as i32 - 1,
            max_j: columns as i32 - 1,
        }
    }

    /// Every cell except the outermost ring
    pub fn interior(rows: usize, columns: usize) -> Self {
        Self {
            min_i: 1,
            min_j: 1,
            max_i: rows as i32 - 2,
            max_j: columns as i32 - 2,
        }
    }

    /// A box of radius `max_dist` around `center`, clamped to the interior
    pub fn around(center: Cell, max_dist: i32, rows: usize, columns: usize) -> Self {
        let interior = Self::interior(rows, columns);
        Self {
            min_i: (center.i - max_dist).max(interior.min_i),
            min_j: (center.j - max_dist).max(interior.min_j),
            max_i: (center.i + max_dist).min(interior.max_i),
            max_j: (center.j + max_dist).min(interior.max_j),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.i >= self.min_i && cell.i <= self.max_i && cell.j >= self.min_j && cell.j <= self.max_j
    }

    pub fn height(&self) -> usize {
        (self.max_i - self.min_i + 1).max(0) as usize
    }

    pub fn width(&self) -> usize {
        (self.max_j - self.min_j + 1).max(0) as usize
    }

    pub fn area(&self) -> usize {
        self.height() * self.width()
    }

    fn index(&self, cell: Cell) -> usize {
        (cell.i - self.min_i) as usize * self.width() + (cell.j - self.min_j) as usize
    }

    fn cell(&self, index: usize) -> Cell {
        let width = self.width();
        Cell::new(self.min_i + (index / width) as i32, self.min_j + (index % width) as i32)
    }
}

/// Result of a search: cells ordered from the reached cell back to the start.
/// Empty when the search exhausted its frontier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub cells: Vec<Cell>,
    pub cost: f32,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// The cell the search stopped on (target or first stop match)
    pub fn end(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    /// Cell centres in the same target-to-start order
    pub fn centers(&self) -> Vec<Vec2> {
        self.cells.iter().map(|c| c.center()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Scratch {
    g: f32,
    f: f32,
    predecessor: Option<usize>,
    visited: bool,
    closed: bool,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            g: f32::INFINITY,
            f: f32::INFINITY,
            predecessor: None,
            visited: false,
            closed: false,
        }
    }
}

type CellPredicate<'a> = Box<dyn Fn(Cell) -> bool + 'a>;
type CellWeight<'a> = Box<dyn Fn(Cell) -> f32 + 'a>;

/// A single search request, built up with the chained setters and run once.
pub struct PathQuery<'a> {
    window: SearchWindow,
    start: Cell,
    target: Option<Cell>,
    allowed: CellPredicate<'a>,
    weight: Option<CellWeight<'a>>,
    stop: Option<CellPredicate<'a>>,
}

impl<'a> PathQuery<'a> {
    /// Every cell in the window is allowed until `allowed` says otherwise.
    pub fn new(window: SearchWindow, start: Cell) -> Self {
        Self {
            window,
            start,
            target: None,
            allowed: Box::new(|_| true),
            weight: None,
            stop: None,
        }
    }

    pub fn target(mut self, target: Cell) -> Self {
        self.target = Some(target);
        self
    }

    pub fn allowed(mut self, allowed: impl Fn(Cell) -> bool + 'a) -> Self {
        self.allowed = Box::new(allowed);
        self
    }

    pub fn weight(mut self, weight: impl Fn(Cell) -> f32 + 'a) -> Self {
        self.weight = Some(Box::new(weight));
        self
    }

    pub fn stop_when(mut self, stop: impl Fn(Cell) -> bool + 'a) -> Self {
        self.stop = Some(Box::new(stop));
        self
    }

    fn is_open(&self, cell: Cell) -> bool {
        self.window.contains(cell) && (self.allowed)(cell)
    }

    /// Only called for cells that passed `is_open`.
    fn weight_of(&self, cell: Cell) -> f32 {
        self.weight.as_ref().map_or(OPEN_WEIGHT, |weight| weight(cell))
    }

    fn heuristic(&self, cell: Cell) -> f32 {
        self.target.map_or(0.0, |t| cell.manhattan(t) as f32)
    }

    fn is_goal(&self, cell: Cell) -> bool {
        self.target == Some(cell) || self.stop.as_ref().is_some_and(|stop| stop(cell))
    }

    pub fn run(&self) -> Route {
        puffin::profile_function!();
        if !self.window.contains(self.start) {
            return Route::default();
        }

        let window = self.window;
        let mut scratch = vec![Scratch::default(); window.area()];
        let mut open = PriorityQueue::new();

        let start = window.index(self.start);
        scratch[start].g = 0.0;
        scratch[start].f = self.heuristic(self.start);
        scratch[start].visited = true;
        open.push(start, scratch[start].f);

        while let Some(current) = open.pop() {
            scratch[current].closed = true;
            let cell = window.cell(current);
            if self.is_goal(cell) {
                return reconstruct(&window, &scratch, current);
            }

            for (di, dj) in COMPASS {
                let next = cell.offset(di, dj);
                if !self.is_open(next) {
                    continue;
                }
                let diagonal = di != 0 && dj != 0;
                if diagonal && !self.is_open(cell.offset(di, 0)) && !self.is_open(cell.offset(0, dj)) {
                    continue;
                }

                let n = window.index(next);
                if scratch[n].closed {
                    continue;
                }
                let factor = if diagonal { DIAGONAL_COST_FACTOR } else { 1.0 };
                let g = scratch[current].g + self.weight_of(next) * factor;
                if !scratch[n].visited || g < scratch[n].g {
                    let f = g + self.heuristic(next);
                    scratch[n] = Scratch {
                        g,
                        f,
                        predecessor: Some(current),
                        visited: true,
                        closed: false,
                    };
                    open.push(n, f);
                }
            }
        }

        Route::default()
    }
}

fn reconstruct(window: &SearchWindow, scratch: &[Scratch], end: usize) -> Route {
    let mut cells = vec![window.cell(end)];
    let mut current = end;
    while let Some(prev) = scratch[current].predecessor {
        cells.push(window.cell(prev));
        current = prev;
    }
    Route {
        cells,
        cost: scratch[end].g,
    }
}

/// Convenience wrapper returning cell centres from target back to start, or
/// an empty vector when nothing was reached.
pub fn find_path(
    window: SearchWindow,
    start: Cell,
    target: Option<Cell>,
    is_allowed: impl Fn(Cell) -> bool,
    weight: Option<&dyn Fn(Cell) -> f32>,
    stop: Option<&dyn Fn(Cell) -> bool>,
) -> Vec<Vec2> {
    let mut query = PathQuery::new(window, start).allowed(is_allowed);
    if let Some(target) = target {
        query = query.target(target);
    }
    if let Some(weight) = weight {
        query = query.weight(weight);
    }
    if let Some(stop) = stop {
        query = query.stop_when(stop);
    }
    query.run().centers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::tile::TileAccess;

    fn open_window(grid: &Grid) -> SearchWindow {
        SearchWindow::whole(grid.rows, grid.columns)
    }

    #[test]
    fn test_open_3x3_takes_diagonals() {
        let grid = Grid::from_ascii(&["...", "...", "..."]);
        let route = PathQuery::new(open_window(&grid), Cell::new(0, 0))
            .target(Cell::new(2, 2))
            .allowed(|c| !grid.is_wall(c.i, c.j))
            .run();
        assert_eq!(
            route.cells,
            vec![Cell::new(2, 2), Cell::new(1, 1), Cell::new(0, 0)]
        );
        assert_eq!(route.cost, 3.0);
    }

    #[test]
    fn test_single_diagonal_step_costs_one_and_a_half() {
        let grid = Grid::from_ascii(&["...", "...", "..."]);
        let route = PathQuery::new(open_window(&grid), Cell::new(0, 0))
            .target(Cell::new(1, 1))
            .allowed(|c| !grid.is_wall(c.i, c.j))
            .run();
        assert_eq!(route.cells, vec![Cell::new(1, 1), Cell::new(0, 0)]);
        assert_eq!(route.cost, 1.5);
    }

    #[test]
    fn test_diagonal_gap_is_refused() {
        let grid = Grid::from_ascii(&[".#.", "#..", "..."]);
        let route = PathQuery::new(SearchWindow::whole(2, 2), Cell::new(0, 0))
            .target(Cell::new(1, 1))
            .allowed(|c| !grid.is_wall(c.i, c.j))
            .run();
        assert!(route.is_empty());

        // one open orthogonal is enough
        let grid = Grid::from_ascii(&["..", "#."]);
        let route = PathQuery::new(open_window(&grid), Cell::new(0, 0))
            .target(Cell::new(1, 1))
            .allowed(|c| !grid.is_wall(c.i, c.j))
            .run();
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn test_start_equals_target_is_single_cell() {
        let grid = Grid::from_ascii(&["...", "...", "..."]);
        let route = PathQuery::new(open_window(&grid), Cell::new(1, 1))
            .target(Cell::new(1, 1))
            .run();
        assert_eq!(route.cells, vec![Cell::new(1, 1)]);
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn test_walled_off_target_returns_empty() {
        let grid = Grid::from_ascii(&[".#.", ".#.", ".#."]);
        let path = find_path(
            open_window(&grid),
            Cell::new(0, 0),
            Some(Cell::new(2, 2)),
            |c| !grid.is_wall(c.i, c.j),
            None,
            None,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_stop_predicate_without_target() {
        let grid = Grid::from_ascii(&[".....", ".....", "....~"]);
        let route = PathQuery::new(open_window(&grid), Cell::new(0, 0))
            .stop_when(|c| grid.is_water(c.i, c.j))
            .run();
        assert_eq!(route.end(), Some(Cell::new(2, 4)));
        assert_eq!(route.cells.last(), Some(&Cell::new(0, 0)));
    }

    #[test]
    fn test_weights_steer_the_route() {
        let grid = Grid::from_ascii(&[".....", ".....", "....."]);
        // middle row is expensive, so the straight line along it loses
        let route = PathQuery::new(open_window(&grid), Cell::new(1, 0))
            .target(Cell::new(1, 4))
            .weight(|c| if c.i == 1 { 10.0 } else { 1.0 })
            .run();
        assert!(route.cells[1..route.len() - 1].iter().all(|c| c.i != 1));
    }

    #[test]
    fn test_default_weight_is_one_per_allowed_step() {
        let grid = Grid::from_ascii(&["#####", ".....", "#####"]);
        let route = PathQuery::new(open_window(&grid), Cell::new(1, 0))
            .target(Cell::new(1, 4))
            .allowed(|c| !grid.is_wall(c.i, c.j))
            .run();
        assert_eq!(route.len(), 5);
        assert_eq!(route.cost, 4.0);
    }

    #[test]
    fn test_search_is_deterministic() {
        let grid = Grid::from_ascii(&[
            "..........",
            "..##......",
            "...#..#...",
            "...#..#...",
            "......#...",
        ]);
        let run = || {
            PathQuery::new(open_window(&grid), Cell::new(0, 0))
                .target(Cell::new(4, 9))
                .allowed(|c| !grid.is_wall(c.i, c.j))
                .run()
        };
        let first = run();
        assert!(!first.is_empty());
        for _ in 0..5 {
            assert_eq!(run(), first);
        }
    }

    #[test]
    fn test_window_around_is_clamped_to_interior() {
        let window = SearchWindow::around(Cell::new(1, 18), 5, 20, 20);
        assert_eq!(window.min_i, 1);
        assert_eq!(window.max_i, 6);
        assert_eq!(window.min_j, 13);
        assert_eq!(window.max_j, 18);
        assert!(!window.contains(Cell::new(0, 15)));
    }

    #[test]
    fn test_start_outside_window_is_empty() {
        let route = PathQuery::new(SearchWindow::interior(10, 10), Cell::new(0, 0))
            .target(Cell::new(5, 5))
            .run();
        assert!(route.is_empty());
    }
}
