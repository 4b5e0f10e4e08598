//! Seeded cave-level generation and weighted grid search.
//!
//! [`generate`] turns a seed into a connected, feature-populated cave level.
//! The search engine in [`search`] is shared with runtime navigation
//! ([`navigation`]).

pub mod biomes;
pub mod caverns;
pub mod caves;
pub mod config;
pub mod constants;
pub mod disjoint_set;
pub mod error;
pub mod generator;
pub mod grid;
pub mod navigation;
pub mod noise_field;
pub mod palette;
pub mod placement;
pub mod priority_queue;
pub mod search;
pub mod spawning;
pub mod terrain;
pub mod tile;
pub mod tunnels;

pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use generator::{generate, generate_with_config, LevelRecord};
pub use grid::TileMap;
pub use navigation::{plan_route, Form, Replanner};
pub use search::{find_path, PathQuery, Route, SearchWindow};
pub use tile::{Cell, TileAccess, TileType};
