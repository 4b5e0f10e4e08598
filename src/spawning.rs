//! Data-driven enemy roster.
//!
//! Defines enemy types and their properties, so placement can hand out
//! enemies without knowing what each one is.

use serde::{Deserialize, Serialize};

use crate::navigation::Form;
use crate::tile::Cell;

/// Behaviour the runtime attaches to an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyAi {
    /// Re-plans toward the player every few ticks
    Stalk,
    /// Picks random nearby goals
    Drift,
}

/// Definition of an enemy type - all the data needed to spawn one
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDef {
    pub name: &'static str,
    pub form: Form,
    pub ai: EnemyAi,
    /// Tiles per tick
    pub speed: f32,
    pub color: [f32; 3],
}

impl EnemyDef {
    pub fn spawn(&self, cell: Cell) -> Enemy {
        Enemy {
            i: cell.i,
            j: cell.j,
            color: self.color,
            speed: self.speed,
            form: self.form,
            ai: self.ai,
            name: self.name.to_string(),
        }
    }
}

/// A placed enemy as it appears in the level record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub i: i32,
    pub j: i32,
    pub color: [f32; 3],
    pub speed: f32,
    pub form: Form,
    pub ai: EnemyAi,
    pub name: String,
}

impl Enemy {
    pub fn cell(&self) -> Cell {
        Cell::new(self.i, self.j)
    }
}

/// Predefined enemy types
pub mod enemies {
    use super::*;
    use crate::constants::*;

    pub const STALKER: EnemyDef = EnemyDef {
        name: "Stalker",
        form: Form::Box,
        ai: EnemyAi::Stalk,
        speed: STALKER_SPEED,
        color: STALKER_COLOR,
    };

    pub const DRIFTER: EnemyDef = EnemyDef {
        name: "Drifter",
        form: Form::Snake,
        ai: EnemyAi::Drift,
        speed: DRIFTER_SPEED,
        color: DRIFTER_COLOR,
    };

    /// Placement order; the n-th enemy of a level uses entry n mod len
    pub const ROSTER: [EnemyDef; 2] = [STALKER, DRIFTER];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_copies_definition() {
        let enemy = enemies::STALKER.spawn(Cell::new(4, 9));
        assert_eq!(enemy.cell(), Cell::new(4, 9));
        assert_eq!(enemy.form, Form::Box);
        assert_eq!(enemy.speed, enemies::STALKER.speed);
        assert_eq!(enemy.name, "Stalker");
    }

    #[test]
    fn test_enemy_json_uses_snake_case_ai() {
        let json = serde_json::to_string(&enemies::DRIFTER.spawn(Cell::new(1, 2))).unwrap();
        assert!(json.contains(r#""ai":"drift""#));
        assert!(json.contains(r#""form":"Snake""#));
    }
}
