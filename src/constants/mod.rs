//! Generator constants organized by domain.
//!
//! These are the defaults behind [`crate::config::GeneratorConfig`]; tune them
//! here or override them per run with a JSON config file.

mod caverns;
mod enemies;
mod map;
mod placement;
mod search;
mod terrain;
mod tunnels;

pub use caverns::*;
pub use enemies::*;
pub use map::*;
pub use placement::*;
pub use search::*;
pub use terrain::*;
pub use tunnels::*;
