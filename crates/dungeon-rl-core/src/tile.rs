//! Tile catalog: the closed set of tile kinds and their static properties

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DungeonError, Result};

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor
    #[default]
    Empty,
    /// Impassable wall
    Wall,
    /// Episode start (at most one per grid)
    Start,
    /// Episode goal (at most one per grid)
    Goal,
    /// Damages the agent on entry
    Trap,
    /// Restores health on entry
    Heal,
}

/// Immutable properties of a tile kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileProperties {
    /// Whether the agent may enter the tile
    pub passable: bool,
    /// Immediate reward associated with the tile
    pub reward: f64,
    /// Layout character
    pub symbol: char,
    /// Human-readable name
    pub name: &'static str,
}

/// Property table, indexed by [`TileKind::code`]
const TILE_PROPERTIES: [TileProperties; TileKind::COUNT] = [
    TileProperties { passable: true, reward: 0.0, symbol: '.', name: "Empty" },
    TileProperties { passable: false, reward: -1.0, symbol: '#', name: "Wall" },
    TileProperties { passable: true, reward: 0.0, symbol: 'S', name: "Start" },
    TileProperties { passable: true, reward: 100.0, symbol: 'G', name: "Goal" },
    TileProperties { passable: true, reward: -10.0, symbol: 'T', name: "Trap" },
    TileProperties { passable: true, reward: 5.0, symbol: 'H', name: "Heal" },
];

impl TileKind {
    /// Number of tile kinds
    pub const COUNT: usize = 6;

    /// All kinds in declaration order
    pub const ALL: [TileKind; Self::COUNT] = [
        Self::Empty,
        Self::Wall,
        Self::Start,
        Self::Goal,
        Self::Trap,
        Self::Heal,
    ];

    /// Stable numeric code (declaration order)
    #[must_use]
    pub fn code(self) -> usize {
        self as usize
    }

    /// Look up the properties of this kind
    #[must_use]
    pub fn properties(self) -> &'static TileProperties {
        &TILE_PROPERTIES[self.code()]
    }

    /// Whether the agent may enter a tile of this kind
    #[must_use]
    pub fn is_passable(self) -> bool {
        self.properties().passable
    }

    /// Immediate reward of this kind
    #[must_use]
    pub fn reward(self) -> f64 {
        self.properties().reward
    }

    /// Layout character of this kind
    #[must_use]
    pub fn symbol(self) -> char {
        self.properties().symbol
    }

    /// Resolve a layout character to its tile kind
    pub fn from_symbol(symbol: char) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.symbol() == symbol)
            .ok_or(DungeonError::UnknownTileCharacter(symbol))
    }
}

impl TryFrom<char> for TileKind {
    type Error = DungeonError;

    fn try_from(symbol: char) -> Result<Self> {
        Self::from_symbol(symbol)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.properties().name)
    }
}
