//! # Generation Tests
//!
//! Whole-pipeline properties of `generate`: connectivity, determinism, and
//! that placed features respect the map.

use std::collections::{HashSet, VecDeque};

use cavegen::constants::{ENEMY_MIN_START_DISTANCE, LOCATION_DIST, LOCATION_RADIUS, MIN_MAP_DIMENSION};
use cavegen::placement::{has_clean_box, SecretKind};
use cavegen::tile::{Passability, ORTHOGONAL};
use cavegen::{find_path, generate, Cell, GenError, LevelRecord, SearchWindow, TileAccess, TileType};

const SIZES: [(usize, usize); 3] = [(50, 50), (64, 96), (90, 70)];

fn levels() -> Vec<(u64, LevelRecord)> {
    let mut out = Vec::new();
    for seed in 1..=4u64 {
        for (rows, columns) in SIZES {
            let level = generate(seed, rows, columns, 77, (seed % 3) as u32)
                .unwrap_or_else(|e| panic!("seed {seed} {rows}x{columns}: {e}"));
            out.push((seed, level));
        }
    }
    out
}

/// Non-wall tiles reachable from `start` with 4-directional steps
fn open_region(level: &LevelRecord, start: Cell) -> HashSet<Cell> {
    let map = &level.tile_map;
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for (di, dj) in ORTHOGONAL {
            let next = cell.offset(di, dj);
            if !map.is_wall(next.i, next.j) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Test: start reaches exit through non-wall tiles.
#[test]
fn test_start_reaches_exit() {
    for (seed, level) in levels() {
        let map = &level.tile_map;
        let path = find_path(
            SearchWindow::whole(map.rows, map.columns),
            level.start,
            Some(level.exit),
            |c| !map.is_wall(c.i, c.j),
            None,
            None,
        );
        assert!(!path.is_empty(), "seed {seed}: exit unreachable");
    }
}

/// Test: every open tile belongs to one 4-connected region.
#[test]
fn test_all_open_tiles_are_connected() {
    for (seed, level) in levels() {
        let map = &level.tile_map;
        let open = map.tiles.iter().filter(|t| !t.is_wall()).count();
        let reached = open_region(&level, level.start);
        assert_eq!(reached.len(), open, "seed {seed}: open tiles split into several regions");
    }
}

/// Test: the outer ring of the map is always high wall.
#[test]
fn test_border_is_high_wall() {
    for (_, level) in levels() {
        let map = &level.tile_map;
        let (rows, columns) = (map.rows as i32, map.columns as i32);
        for i in 0..rows {
            assert_eq!(map.get(i, 0), Some(TileType::HighWall));
            assert_eq!(map.get(i, columns - 1), Some(TileType::HighWall));
        }
        for j in 0..columns {
            assert_eq!(map.get(0, j), Some(TileType::HighWall));
            assert_eq!(map.get(rows - 1, j), Some(TileType::HighWall));
        }
    }
}

/// Test: identical arguments give identical levels; any changed argument
/// gives a different one.
#[test]
fn test_generation_is_deterministic() {
    let a = generate(9, 60, 80, 5, 2).unwrap();
    let b = generate(9, 60, 80, 5, 2).unwrap();
    assert_eq!(a, b);

    let other_seed = generate(10, 60, 80, 5, 2).unwrap();
    assert_ne!(a.tile_map, other_seed.tile_map);
    let other_level = generate(9, 60, 80, 5, 3).unwrap();
    assert_ne!(a.tile_map, other_level.tile_map);
}

/// Test: features sit on sensible tiles and keep their distance.
#[test]
fn test_features_respect_the_map() {
    for (seed, level) in levels() {
        let map = &level.tile_map;
        assert!(map.is_wide_ground(level.start.i, level.start.j), "seed {seed}: start");
        assert!(map.is_ground(level.exit.i, level.exit.j), "seed {seed}: exit");

        for enemy in &level.enemies {
            assert!(map.is_ground(enemy.i, enemy.j));
            assert!(enemy.cell().distance(level.start) >= ENEMY_MIN_START_DISTANCE);
        }
        assert!(level.enemies.len() <= 2);
        for item in &level.items {
            assert!(map.is_ground(item.i, item.j), "seed {seed}: coin on {:?}", map.get(item.i, item.j));
        }
        assert!(level.items.len() <= 15);

        let mut taken = HashSet::new();
        for secret in &level.secrets {
            assert!(!map.is_wall(secret.i, secret.j));
            if let SecretKind::ParticlePuzzle { flanks } = &secret.kind {
                for flank in flanks {
                    assert_eq!(map.get(flank.i, flank.j), Some(TileType::Paved));
                }
            }
            if !matches!(secret.kind, SecretKind::Shrine { .. }) {
                assert!(taken.insert(secret.cell()), "seed {seed}: two secrets on {:?}", secret.cell());
            }
        }
        let puzzles = level
            .secrets
            .iter()
            .filter(|s| matches!(s.kind, SecretKind::ParticlePuzzle { .. }))
            .count();
        assert!(puzzles <= 1);
    }
}

/// Every placed feature except shrines, which may fall back to a biome centre
/// or the start.
fn spaced_features(level: &LevelRecord) -> Vec<Cell> {
    let mut cells: Vec<Cell> = level
        .secrets
        .iter()
        .filter(|s| !matches!(s.kind, SecretKind::Shrine { .. }))
        .map(|s| s.cell())
        .collect();
    cells.extend(level.items.iter().map(|item| Cell::new(item.i, item.j)));
    cells.extend(level.enemies.iter().map(|enemy| enemy.cell()));
    cells
}

/// Test: features keep the placement spacing from one another.
#[test]
fn test_features_are_spaced_apart() {
    for (seed, level) in levels() {
        let cells = spaced_features(&level);
        for (n, &a) in cells.iter().enumerate() {
            for &b in &cells[n + 1..] {
                assert!(
                    a.distance(b) >= LOCATION_DIST as f32,
                    "seed {seed}: {:?} and {:?} are {:.2} apart",
                    a,
                    b,
                    a.distance(b)
                );
            }
        }
    }
}

/// Test: every feature sits in a clear box of ground.
#[test]
fn test_features_sit_in_clean_ground() {
    for (seed, level) in levels() {
        for cell in spaced_features(&level) {
            assert!(
                has_clean_box(&level.tile_map, cell, LOCATION_RADIUS, Passability::Ground),
                "seed {seed}: {:?} is crowded by other terrain",
                cell
            );
        }
    }
}

/// Test: bookkeeping ids never reach the serialized record.
#[test]
fn test_record_hides_internal_ids() {
    let level = generate(3, 60, 60, 0, 0).unwrap();
    let json = serde_json::to_string(&level).unwrap();
    for key in ["cave_id", "tunnel_id", "biome_id"] {
        assert!(!json.contains(key), "{key} leaked");
    }
    let back: LevelRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, level);
}

/// Test: maps below the minimum size are rejected, not generated.
#[test]
fn test_small_maps_are_rejected() {
    let too_small = MIN_MAP_DIMENSION - 1;
    assert!(matches!(
        generate(1, too_small, 100, 0, 0),
        Err(GenError::InvalidDimensions { .. })
    ));
}
