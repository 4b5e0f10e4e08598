use serde::{Deserialize, Serialize};

/// A grid coordinate: `i` is the row, `j` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self::new(self.i + di, self.j + dj)
    }

    /// Centre of the cell in map space (x runs along columns, y along rows)
    pub fn center(self) -> glam::Vec2 {
        glam::Vec2::new(self.j as f32 + 0.5, self.i as f32 + 0.5)
    }

    pub fn distance(self, other: Cell) -> f32 {
        self.center().distance(other.center())
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.i - other.i).abs() + (self.j - other.j).abs()
    }
}

/// The 4 orthogonal neighbour offsets (N, E, S, W)
pub const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// The 8 compass neighbour offsets, clockwise from north
pub const COMPASS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    HighWall,
    ThinWall, // Rim left by carving and tunnel flanks
    Floor,
    Rock,
    Grass,
    Paved,
    Water,
    DeepWater,
}

impl TileType {
    pub const ALL: [TileType; 8] = [
        TileType::HighWall,
        TileType::ThinWall,
        TileType::Floor,
        TileType::Rock,
        TileType::Grass,
        TileType::Paved,
        TileType::Water,
        TileType::DeepWater,
    ];

    pub fn is_wall(&self) -> bool {
        matches!(self, TileType::HighWall | TileType::ThinWall)
    }

    pub fn is_water(&self) -> bool {
        matches!(self, TileType::Water | TileType::DeepWater)
    }

    pub fn is_ground(&self) -> bool {
        !self.is_wall() && !self.is_water()
    }

    /// Character used by the ASCII dump and test fixtures
    pub fn glyph(&self) -> char {
        match self {
            TileType::HighWall => '#',
            TileType::ThinWall => '+',
            TileType::Floor => '.',
            TileType::Rock => ':',
            TileType::Grass => '"',
            TileType::Paved => '=',
            TileType::Water => '~',
            TileType::DeepWater => 'W',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        TileType::ALL.into_iter().find(|t| t.glyph() == c)
    }
}

/// Passability class used by the narrow/wide tests and biome labelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passability {
    Ground,
    Water,
}

impl Passability {
    pub fn matches(&self, tile_type: TileType) -> bool {
        match self {
            Passability::Ground => tile_type.is_ground(),
            Passability::Water => tile_type.is_water(),
        }
    }
}

/// One tile of the generation grid.
///
/// The ids are generation bookkeeping: each is assigned at most once and is
/// never exported with the finished level.
#[derive(Debug, Clone)]
pub struct Tile {
    pub tile_type: TileType,
    pub cave_id: Option<usize>,
    pub tunnel_id: Option<usize>,
    pub biome_id: Option<usize>,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            cave_id: None,
            tunnel_id: None,
            biome_id: None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TileType::HighWall)
    }
}

/// Read access to tile types, plus the classification predicates used by
/// placement and by runtime AI. Off-map coordinates read as wall.
pub trait TileAccess {
    fn tile_type(&self, i: i32, j: i32) -> Option<TileType>;

    fn is_wall(&self, i: i32, j: i32) -> bool {
        self.tile_type(i, j).map_or(true, |t| t.is_wall())
    }

    fn is_ground(&self, i: i32, j: i32) -> bool {
        self.tile_type(i, j).is_some_and(|t| t.is_ground())
    }

    fn is_water(&self, i: i32, j: i32) -> bool {
        self.tile_type(i, j).is_some_and(|t| t.is_water())
    }

    /// A tile is narrow when both its N and S (or E and W) neighbours fall
    /// outside its passability class, or when all four orthogonal neighbours
    /// are open but an opposite pair of diagonals is blocked (a pinch between
    /// two corners).
    fn is_narrow(&self, i: i32, j: i32, class: Passability) -> bool {
        if !self.tile_type(i, j).is_some_and(|t| class.matches(t)) {
            return false;
        }
        let blocked: Vec<bool> = COMPASS
            .iter()
            .map(|&(di, dj)| !self.tile_type(i + di, j + dj).is_some_and(|t| class.matches(t)))
            .collect();
        // COMPASS[k] and COMPASS[k + 4] are opposite; even k are orthogonal
        if blocked[0] && blocked[4] || blocked[2] && blocked[6] {
            return true;
        }
        let orthogonal_open = !(blocked[0] || blocked[2] || blocked[4] || blocked[6]);
        orthogonal_open && (blocked[1] && blocked[5] || blocked[3] && blocked[7])
    }

    fn is_narrow_ground(&self, i: i32, j: i32) -> bool {
        self.is_narrow(i, j, Passability::Ground)
    }

    fn is_wide_ground(&self, i: i32, j: i32) -> bool {
        self.is_ground(i, j) && !self.is_narrow(i, j, Passability::Ground)
    }

    fn is_narrow_water(&self, i: i32, j: i32) -> bool {
        self.is_narrow(i, j, Passability::Water)
    }

    fn is_wide_water(&self, i: i32, j: i32) -> bool {
        self.is_water(i, j) && !self.is_narrow(i, j, Passability::Water)
    }
}
