//! Error types for the dungeon simulation

use thiserror::Error;

/// Core error type for simulation and training operations
#[derive(Error, Debug)]
pub enum DungeonError {
    /// Position outside the grid
    #[error("Position ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Grid width
        width: usize,
        /// Grid height
        height: usize,
    },

    /// Layout character with no tile kind
    #[error("Unknown tile character: {0:?}")]
    UnknownTileCharacter(char),

    /// Episode requested on a grid without a start tile
    #[error("Grid has no start position")]
    NoStartPosition,

    /// Action index outside the action space
    #[error("Invalid action: {0}")]
    InvalidAction(usize),

    /// Rejected hyperparameters or environment settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Registry lookup failure
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for dungeon operations
pub type Result<T> = std::result::Result<T, DungeonError>;
