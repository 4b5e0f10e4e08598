//! Runtime navigation for agents moving over a finished level.
//!
//! An agent's [`Form`] decides which tiles it may occupy; that rule becomes
//! the `allowed` predicate of an ordinary [`PathQuery`], so the multi-cell
//! box form needs no search of its own.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{NAVIGATION_MAX_DIST, REPLAN_INTERVAL_TICKS};
use crate::grid::TileMap;
use crate::search::{PathQuery, SearchWindow};
use crate::tile::{Cell, TileAccess};

/// Agent shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Form {
    /// 1x1, ground only
    Dot,
    /// 1x1, ground or water
    Snake,
    /// 2x2, anything that isn't wall; the cell is the top-left corner
    Box,
}

impl Form {
    pub const ALL: [Form; 3] = [Form::Dot, Form::Snake, Form::Box];

    pub fn footprint(self) -> &'static [(i32, i32)] {
        match self {
            Form::Dot | Form::Snake => &[(0, 0)],
            Form::Box => &[(0, 0), (0, 1), (1, 0), (1, 1)],
        }
    }

    /// Can this form stand with its anchor on `cell`?
    pub fn fits(self, map: &impl TileAccess, cell: Cell) -> bool {
        self.footprint().iter().all(|&(di, dj)| {
            let (i, j) = (cell.i + di, cell.j + dj);
            match self {
                Form::Dot => map.is_ground(i, j),
                Form::Snake | Form::Box => !map.is_wall(i, j),
            }
        })
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Small set of forms, e.g. the forms a shrine grants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Form>", from = "Vec<Form>")]
pub struct FormSet(u8);

impl FormSet {
    pub const EMPTY: FormSet = FormSet(0);

    pub fn insert(&mut self, form: Form) {
        self.0 |= form.bit();
    }

    pub fn contains(&self, form: Form) -> bool {
        self.0 & form.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: FormSet) -> FormSet {
        FormSet(self.0 | other.0)
    }

    /// Forms in `self` that `other` lacks
    pub fn difference(self, other: FormSet) -> FormSet {
        FormSet(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Form> {
        Form::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Form> for FormSet {
    fn from(form: Form) -> Self {
        FormSet(form.bit())
    }
}

impl From<Vec<Form>> for FormSet {
    fn from(forms: Vec<Form>) -> Self {
        let mut set = FormSet::EMPTY;
        for form in forms {
            set.insert(form);
        }
        set
    }
}

impl From<FormSet> for Vec<Form> {
    fn from(set: FormSet) -> Self {
        set.iter().collect()
    }
}

/// Find a route for `form` from `from` to `to` inside a box of radius
/// `max_dist` around `from`.
/// Returns the cells to walk, excluding `from`, or None if no route exists.
pub fn plan_route(map: &TileMap, form: Form, from: Cell, to: Cell, max_dist: i32) -> Option<Vec<Cell>> {
    puffin::profile_function!();
    if !form.fits(map, to) {
        return None;
    }
    let window = SearchWindow::around(from, max_dist, map.rows, map.columns);
    let route = PathQuery::new(window, from)
        .target(to)
        .allowed(|c| form.fits(map, c))
        .run();
    if route.is_empty() {
        return None;
    }
    // route runs target -> start; drop the start and walk forwards
    let mut cells = route.cells;
    cells.pop();
    cells.reverse();
    Some(cells)
}

/// Per-agent route cache that re-plans only every few ticks.
///
/// Searches are not incremental, so agents that chase a moving goal every
/// tick would redo a full search each time.
#[derive(Debug, Clone)]
pub struct Replanner {
    pub form: Form,
    interval: u32,
    max_dist: i32,
    ticks_since_plan: u32,
    goal: Option<Cell>,
    route: VecDeque<Cell>,
    plans: usize,
}

impl Replanner {
    pub fn new(form: Form) -> Self {
        Self::with_interval(form, REPLAN_INTERVAL_TICKS, NAVIGATION_MAX_DIST)
    }

    pub fn with_interval(form: Form, interval: u32, max_dist: i32) -> Self {
        Self {
            form,
            interval: interval.max(1),
            max_dist,
            ticks_since_plan: 0,
            goal: None,
            route: VecDeque::new(),
            plans: 0,
        }
    }

    /// Number of searches run so far
    pub fn plans(&self) -> usize {
        self.plans
    }

    /// Advance one tick and return the next cell to step onto, if any.
    /// A new plan is made when the cached one runs out, when the interval
    /// has elapsed since the last plan, or on the first tick.
    pub fn tick(&mut self, map: &TileMap, position: Cell, goal: Cell) -> Option<Cell> {
        self.ticks_since_plan += 1;
        while self.route.front() == Some(&position) {
            self.route.pop_front();
        }

        let stale = self.goal.is_none() || self.ticks_since_plan >= self.interval;
        if stale || (self.route.is_empty() && self.goal != Some(goal)) {
            self.route = plan_route(map, self.form, position, goal, self.max_dist)
                .map(VecDeque::from)
                .unwrap_or_default();
            self.goal = Some(goal);
            self.ticks_since_plan = 0;
            self.plans += 1;
        }
        self.route.front().copied()
    }
}
