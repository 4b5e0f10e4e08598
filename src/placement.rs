//! Feature placement: start, exit, waypoints, secrets, items and enemies.
//!
//! Free spots come from [`LocationGrids`]. A fine grid keeps one candidate
//! tile per cell whose whole neighbourhood shares its passability class; a
//! coarse grid then keeps at most one of those per coarse cell, at least
//! `location_dist` away from every other kept candidate. Each placed feature
//! consumes a coarse slot, so features never overlap and never sit on
//! incompatible terrain. Features placed off the slot grid (beacons on cavern
//! centres) are claimed instead, which applies the same clearance and spacing
//! and clears every slot around them. Running out of slots only means fewer
//! features.

use glam::Vec2;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biomes::{Biome, BiomeType};
use crate::config::PlacementConfig;
use crate::error::{GenError, GenResult};
use crate::grid::Grid;
use crate::navigation::FormSet;
use crate::search::{PathQuery, SearchWindow};
use crate::spawning::{enemies, Enemy};
use crate::tile::{Cell, Passability, TileAccess, TileType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Waypoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub i: i32,
    pub j: i32,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecretKind {
    /// Grants the forms needed for the next stretch of the biome route
    Shrine { forms: FormSet },
    Wisp,
    Beacon,
    InvisiblePickup,
    /// Puzzle node; the two flanking tiles are paved
    ParticlePuzzle { flanks: [Cell; 2] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub i: i32,
    pub j: i32,
    #[serde(flatten)]
    pub kind: SecretKind,
}

impl Secret {
    fn at(cell: Cell, kind: SecretKind) -> Self {
        Self {
            i: cell.i,
            j: cell.j,
            kind,
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.i, self.j)
    }
}

/// A free feature slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub cell: Cell,
    pub class: Passability,
    pub biome: Option<usize>,
}

/// Two-resolution spatial hash of free feature slots.
#[derive(Debug, Clone)]
pub struct LocationGrids {
    radius: i32,
    dist: i32,
    fine: Vec<Option<Location>>,
    coarse_columns: usize,
    coarse: Vec<Option<Location>>,
    /// Cells handed out by `take` or `claim`
    placed: Vec<Cell>,
}

fn class_of(tile_type: TileType) -> Option<Passability> {
    if tile_type.is_ground() {
        Some(Passability::Ground)
    } else if tile_type.is_water() {
        Some(Passability::Water)
    } else {
        None
    }
}

/// Every tile within `radius` of `cell` (a `(2r+1)²` box) is in `class`.
pub fn has_clean_box(map: &impl TileAccess, cell: Cell, radius: i32, class: Passability) -> bool {
    (-radius..=radius).all(|di| {
        (-radius..=radius).all(|dj| {
            map.tile_type(cell.i + di, cell.j + dj)
                .is_some_and(|t| class.matches(t))
        })
    })
}

impl LocationGrids {
    pub fn build(grid: &Grid, radius: i32, dist: i32) -> Self {
        puffin::profile_function!();
        let radius = radius.max(1);
        let dist = dist.max(1);
        let fine_rows = grid.rows.div_ceil(radius as usize);
        let fine_columns = grid.columns.div_ceil(radius as usize);
        let coarse_rows = grid.rows.div_ceil(dist as usize);
        let coarse_columns = grid.columns.div_ceil(dist as usize);

        let mut fine = vec![None; fine_rows * fine_columns];
        let mut buckets: Vec<Vec<Location>> = vec![Vec::new(); coarse_rows * coarse_columns];
        for fi in 0..fine_rows {
            for fj in 0..fine_columns {
                let cell = Cell::new(fi as i32 * radius + radius / 2, fj as i32 * radius + radius / 2);
                let Some(tile) = grid.get(cell.i, cell.j) else {
                    continue;
                };
                let Some(class) = class_of(tile.tile_type) else {
                    continue;
                };
                if !has_clean_box(grid, cell, radius, class) {
                    continue;
                }
                let location = Location {
                    cell,
                    class,
                    biome: tile.biome_id,
                };
                fine[fi * fine_columns + fj] = Some(location);
                let ci = cell.i as usize / dist as usize;
                let cj = cell.j as usize / dist as usize;
                buckets[ci * coarse_columns + cj].push(location);
            }
        }

        // one slot per coarse cell, clear of the already-filled neighbours
        // above and to the left
        let mut coarse: Vec<Option<Location>> = vec![None; coarse_rows * coarse_columns];
        for ci in 0..coarse_rows {
            for cj in 0..coarse_columns {
                let middle = Vec2::new(
                    (cj as f32 + 0.5) * dist as f32,
                    (ci as f32 + 0.5) * dist as f32,
                );
                let mut candidates = std::mem::take(&mut buckets[ci * coarse_columns + cj]);
                candidates.sort_by(|a, b| {
                    a.cell.center()
                        .distance(middle)
                        .total_cmp(&b.cell.center().distance(middle))
                        .then(a.cell.cmp(&b.cell))
                });
                let previous: Vec<Location> = [(-1, -1), (-1, 0), (-1, 1), (0, -1)]
                    .iter()
                    .filter_map(|&(di, dj)| {
                        let (ni, nj) = (ci as i32 + di, cj as i32 + dj);
                        if ni < 0 || nj < 0 || nj as usize >= coarse_columns {
                            return None;
                        }
                        coarse[ni as usize * coarse_columns + nj as usize]
                    })
                    .collect();
                coarse[ci * coarse_columns + cj] = candidates.into_iter().find(|c| {
                    previous
                        .iter()
                        .all(|p| c.cell.distance(p.cell) >= dist as f32)
                });
            }
        }

        Self {
            radius,
            dist,
            fine,
            coarse_columns,
            coarse,
            placed: Vec::new(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn dist(&self) -> i32 {
        self.dist
    }

    /// Cells already handed out, in order
    pub fn placed(&self) -> &[Cell] {
        &self.placed
    }

    /// Candidates that passed the fine scan, before deduplication
    pub fn fine_candidates(&self) -> impl Iterator<Item = &Location> {
        self.fine.iter().flatten()
    }

    /// Slots not yet consumed
    pub fn slots(&self) -> impl Iterator<Item = &Location> {
        self.coarse.iter().flatten()
    }

    pub fn available(&self) -> usize {
        self.slots().count()
    }

    /// Consume every slot closer than the coarse spacing to `cell`.
    pub fn reserve_near(&mut self, cell: Cell) {
        let dist = self.dist as f32;
        for slot in self.coarse.iter_mut() {
            if slot.is_some_and(|l| l.cell.distance(cell) < dist) {
                *slot = None;
            }
        }
    }

    /// Consume a random slot matching `filter`.
    pub fn take(&mut self, rng: &mut impl Rng, filter: impl Fn(&Location) -> bool) -> Option<Location> {
        let matching: Vec<usize> = self
            .coarse
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_some_and(&filter))
            .map(|(idx, _)| idx)
            .collect();
        if matching.is_empty() {
            return None;
        }
        let idx = matching[rng.gen_range(0..matching.len())];
        let location = self.coarse[idx].take()?;
        self.placed.push(location.cell);
        Some(location)
    }

    /// Place a feature on an arbitrary cell. Refused when the cell is within
    /// the coarse spacing of an earlier feature; otherwise every slot that
    /// close is consumed so later features keep their distance.
    pub fn claim(&mut self, cell: Cell) -> bool {
        let dist = self.dist as f32;
        if self.placed.iter().any(|&p| p.distance(cell) < dist) {
            return false;
        }
        self.reserve_near(cell);
        self.placed.push(cell);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub start: Cell,
    pub exit: Cell,
    pub start_biome: usize,
    pub exit_biome: usize,
}

/// Smallest size a wide-ground biome needs to host the start or exit
pub fn large_biome_size(rows: usize, columns: usize) -> f32 {
    ((rows * columns) as f32).sqrt()
}

/// Start in a random large wide-ground biome; exit in the large wide-ground
/// biome farthest from it, on its tile farthest from the start.
pub fn choose_endpoints(grid: &Grid, biomes: &[Biome], rng: &mut impl Rng) -> GenResult<Endpoints> {
    let min_size = large_biome_size(grid.rows, grid.columns);
    let qualifies = |b: &Biome| b.biome_type == BiomeType::WideGround && b.size as f32 > min_size;
    let no_biome = GenError::NoStartBiome {
        min_size: min_size as usize,
    };
    if biomes.is_empty() {
        return Err(no_biome);
    }

    let first = rng.gen_range(0..biomes.len());
    let Some(start_biome) = (0..biomes.len())
        .map(|k| (first + k) % biomes.len())
        .find(|&id| qualifies(&biomes[id]))
    else {
        return Err(no_biome);
    };
    let start = biomes[start_biome].center;

    let mut exit_biome = start_biome;
    let mut best = -1.0;
    for biome in biomes.iter().filter(|b| qualifies(b)) {
        let d = biome.center.distance(start);
        if d > best {
            best = d;
            exit_biome = biome.id;
        }
    }

    let mut exit = biomes[exit_biome].center;
    let mut best = exit.distance(start);
    for cell in grid.cells() {
        if grid.get(cell.i, cell.j).and_then(|t| t.biome_id) == Some(exit_biome) {
            let d = cell.distance(start);
            if d > best {
                best = d;
                exit = cell;
            }
        }
    }

    Ok(Endpoints {
        start,
        exit,
        start_biome,
        exit_biome,
    })
}

/// Every `spacing`-th cell of an unweighted start-to-exit route over any
/// non-wall tile.
pub fn sample_waypoints(grid: &Grid, start: Cell, exit: Cell, spacing: usize) -> Vec<Waypoint> {
    puffin::profile_function!();
    let route = PathQuery::new(SearchWindow::whole(grid.rows, grid.columns), start)
        .target(exit)
        .allowed(|c| !grid.is_wall(c.i, c.j))
        .run();
    if route.is_empty() {
        warn!("no route from start {:?} to exit {:?}", start, exit);
        return Vec::new();
    }
    route
        .cells
        .iter()
        .rev()
        .step_by(spacing.max(1))
        .skip(1)
        .map(|c| c.center().into())
        .collect()
}

fn count_in(rng: &mut impl Rng, (lo, hi): (usize, usize)) -> usize {
    rng.gen_range(lo..=hi.max(lo))
}

/// Everything placement adds to a level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    pub waypoints: Vec<Waypoint>,
    pub secrets: Vec<Secret>,
    pub items: Vec<Item>,
    pub enemies: Vec<Enemy>,
}

/// Places features into one level, consuming location slots as it goes.
pub struct FeaturePlacer<'a, R: Rng> {
    grid: &'a mut Grid,
    biomes: &'a [Biome],
    config: &'a PlacementConfig,
    rng: &'a mut R,
    slots: LocationGrids,
    large_biome: f32,
}

impl<'a, R: Rng> FeaturePlacer<'a, R> {
    /// Builds the location grids, reserves the slots around the endpoints,
    /// and records each biome's free locations.
    pub fn new(
        grid: &'a mut Grid,
        biomes: &'a mut [Biome],
        config: &'a PlacementConfig,
        rng: &'a mut R,
        endpoints: &Endpoints,
    ) -> Self {
        let mut slots = LocationGrids::build(grid, config.location_radius, config.location_dist);
        slots.reserve_near(endpoints.start);
        slots.reserve_near(endpoints.exit);
        for slot in slots.slots() {
            if let Some(biome) = slot.biome.and_then(|id| biomes.get_mut(id)) {
                biome.locations.push(slot.cell);
            }
        }
        debug!("{} free feature slots", slots.available());
        let large_biome = large_biome_size(grid.rows, grid.columns);
        Self {
            grid,
            biomes,
            config,
            rng,
            slots,
            large_biome,
        }
    }

    pub fn slots(&self) -> &LocationGrids {
        &self.slots
    }

    /// Walk the biome route collecting the forms each biome needs. Whenever
    /// the next biome needs a form the player lacks, drop a shrine granting
    /// it in the biome before; consecutive needs share one shrine.
    pub fn place_shrines(&mut self, route: &[usize], start: Cell) -> Vec<Secret> {
        let mut unlocked = FormSet::EMPTY;
        let mut shrines: Vec<(usize, FormSet)> = Vec::new();
        for pair in route.windows(2) {
            let (before, next) = (pair[0], pair[1]);
            let Some(form) = self.biomes.get(next).and_then(|b| b.biome_type.unlocks()) else {
                continue;
            };
            if unlocked.contains(form) {
                continue;
            }
            unlocked.insert(form);
            match shrines.last_mut() {
                Some((host, forms)) if *host == before => forms.insert(form),
                _ => shrines.push((before, form.into())),
            }
        }

        let mut placed = Vec::with_capacity(shrines.len());
        for (host, forms) in shrines {
            let cell = match self.slots.take(self.rng, |l| l.biome == Some(host)) {
                Some(location) => location.cell,
                None => {
                    let biome = &self.biomes[host];
                    let fallback = if biome.size as f32 > self.large_biome {
                        biome.center
                    } else {
                        start
                    };
                    self.slots.reserve_near(fallback);
                    fallback
                }
            };
            placed.push(Secret::at(cell, SecretKind::Shrine { forms }));
        }
        placed
    }

    /// Up to `count` secrets of one kind on ground slots
    fn scatter(&mut self, count: usize, kind: SecretKind) -> Vec<Secret> {
        let mut placed = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(location) = self.slots.take(self.rng, |l| l.class == Passability::Ground) else {
                debug!("ran out of slots for {:?}", kind);
                break;
            };
            placed.push(Secret::at(location.cell, kind.clone()));
        }
        placed
    }

    pub fn place_wisps(&mut self) -> Vec<Secret> {
        let count = count_in(self.rng, self.config.wisps);
        self.scatter(count, SecretKind::Wisp)
    }

    pub fn place_invisible_pickups(&mut self) -> Vec<Secret> {
        let count = count_in(self.rng, self.config.invisible_pickups);
        self.scatter(count, SecretKind::InvisiblePickup)
    }

    /// Beacons go on cavern centres that sit in clean ground and clear of
    /// earlier features, then on ordinary slots.
    pub fn place_beacons(&mut self, cavern_centers: &[Cell]) -> Vec<Secret> {
        let count = count_in(self.rng, self.config.beacons);
        let radius = self.slots.radius();
        let mut placed = Vec::with_capacity(count);
        for &center in cavern_centers {
            if placed.len() == count {
                break;
            }
            if has_clean_box(&*self.grid, center, radius, Passability::Ground) && self.slots.claim(center) {
                placed.push(Secret::at(center, SecretKind::Beacon));
            }
        }
        let remaining = count - placed.len();
        placed.extend(self.scatter(remaining, SecretKind::Beacon));
        placed
    }

    /// One puzzle node with its east and west neighbours paved.
    pub fn place_particle_puzzle(&mut self) -> Option<Secret> {
        let grid: &Grid = self.grid;
        let location = self.slots.take(self.rng, |l| {
            l.class == Passability::Ground
                && grid.is_ground(l.cell.i, l.cell.j - 1)
                && grid.is_ground(l.cell.i, l.cell.j + 1)
        })?;
        let cell = location.cell;
        let flanks = [cell.offset(0, -1), cell.offset(0, 1)];
        for flank in flanks {
            self.grid.set_type(flank.i, flank.j, TileType::Paved);
        }
        Some(Secret::at(cell, SecretKind::ParticlePuzzle { flanks }))
    }

    pub fn place_coins(&mut self) -> Vec<Item> {
        let count = count_in(self.rng, self.config.coins);
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(location) = self.slots.take(self.rng, |l| l.class == Passability::Ground) else {
                debug!("placed {} of {} coins", items.len(), count);
                break;
            };
            items.push(Item {
                i: location.cell.i,
                j: location.cell.j,
                item_type: ItemType::Coin,
            });
        }
        items
    }

    /// Enemies only spawn in large wide-ground biomes, far from the start.
    pub fn place_enemies(&mut self, start: Cell) -> Vec<Enemy> {
        let biomes = self.biomes;
        let large = self.large_biome;
        let min_distance = self.config.enemy_min_start_distance;
        let mut placed = Vec::new();
        for k in 0..self.config.max_enemies {
            let Some(location) = self.slots.take(self.rng, |l| {
                let in_large_wide_ground = l
                    .biome
                    .and_then(|id| biomes.get(id))
                    .is_some_and(|b| b.biome_type == BiomeType::WideGround && b.size as f32 > large);
                in_large_wide_ground && l.cell.distance(start) >= min_distance
            }) else {
                break;
            };
            let def = &enemies::ROSTER[k % enemies::ROSTER.len()];
            placed.push(def.spawn(location.cell));
        }
        placed
    }

    /// Run every placer in a fixed order.
    pub fn place_all(&mut self, endpoints: &Endpoints, route: &[usize], cavern_centers: &[Cell]) -> Features {
        puffin::profile_function!();
        let mut secrets = self.place_shrines(route, endpoints.start);
        secrets.extend(self.place_particle_puzzle());
        let enemies = self.place_enemies(endpoints.start);
        secrets.extend(self.place_beacons(cavern_centers));
        secrets.extend(self.place_wisps());
        secrets.extend(self.place_invisible_pickups());
        let items = self.place_coins();
        if enemies.is_empty() {
            debug!("no room for enemies");
        }
        Features {
            waypoints: Vec::new(),
            secrets,
            items,
            enemies,
        }
    }
}
