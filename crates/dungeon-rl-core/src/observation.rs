//! Observations of the dungeon and observation spaces

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{Grid, Position, TileKind};

/// Grid-observation value marking the agent's cell
///
/// Tile codes are `0..TileKind::COUNT`, so a negative value never collides.
pub const AGENT_MARKER: i32 = -1;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Which observation an environment emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// Normalized `(x, y)` position
    #[default]
    Position,
    /// Full tile-code grid with the agent marked
    Grid,
}

/// Observation of the agent in the dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DungeonObservation {
    /// `[x / (width - 1), y / (height - 1)]`
    Position([f32; 2]),
    /// `height × width` tile codes, agent cell set to [`AGENT_MARKER`]
    Grid(Array2<i32>),
}

impl DungeonObservation {
    /// Observe `agent` on `grid` as `kind`
    #[must_use]
    pub fn observe(kind: ObservationKind, grid: &Grid, agent: Position) -> Self {
        match kind {
            ObservationKind::Position => Self::normalized_position(grid, agent),
            ObservationKind::Grid => Self::tile_grid(grid, agent),
        }
    }

    /// Position scaled into `[0, 1]` on each axis
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized_position(grid: &Grid, agent: Position) -> Self {
        let scale = |coord: usize, extent: usize| {
            if extent > 1 {
                coord as f32 / (extent - 1) as f32
            } else {
                0.0
            }
        };
        Self::Position([scale(agent.x, grid.width()), scale(agent.y, grid.height())])
    }

    /// Tile codes with the agent's cell marked
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn tile_grid(grid: &Grid, agent: Position) -> Self {
        let mut codes = Array2::from_elem((grid.height(), grid.width()), TileKind::Empty.code() as i32);
        for (position, kind) in grid.cells() {
            codes[[position.y, position.x]] = kind.code() as i32;
        }
        if grid.contains(agent) {
            codes[[agent.y, agent.x]] = AGENT_MARKER;
        }
        Self::Grid(codes)
    }
}

impl Observation for DungeonObservation {
    fn to_vec(&self) -> Vec<f64> {
        match self {
            Self::Position(xy) => xy.iter().map(|&v| f64::from(v)).collect(),
            Self::Grid(codes) => codes.iter().map(|&v| f64::from(v)).collect(),
        }
    }

    fn shape(&self) -> Vec<usize> {
        match self {
            Self::Position(_) => vec![2],
            Self::Grid(codes) => codes.shape().to_vec(),
        }
    }
}

/// Box observation space
#[derive(Debug, Clone, PartialEq)]
pub struct BoxObservationSpace {
    /// Lower bound of every element
    pub low: f64,
    /// Upper bound of every element
    pub high: f64,
    /// Shape of observations
    pub shape: Vec<usize>,
}

impl BoxObservationSpace {
    /// Space matching `kind` observations of `grid`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_grid(kind: ObservationKind, grid: &Grid) -> Self {
        match kind {
            ObservationKind::Position => Self {
                low: 0.0,
                high: 1.0,
                shape: vec![2],
            },
            ObservationKind::Grid => Self {
                low: f64::from(AGENT_MARKER),
                high: (TileKind::COUNT - 1) as f64,
                shape: vec![grid.height(), grid.width()],
            },
        }
    }

    /// Check if an observation is valid within this space
    pub fn contains<O: Observation>(&self, obs: &O) -> bool {
        obs.shape() == self.shape
            && obs.to_vec().iter().all(|v| (self.low..=self.high).contains(v))
    }
}
