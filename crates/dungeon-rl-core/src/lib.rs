//! Grid-world simulation engine
//!
//! This crate provides the tile catalog, the bounded tile grid, the agent
//! transition model and the environment abstractions that the trainer and
//! the environment adapters are built on.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod grid;
pub mod observation;
pub mod reward;
pub mod tile;
pub mod transition;

// Re-export core traits and types
pub use action::{Action, DiscreteSpace};
pub use agent::AgentState;
pub use environment::{Environment, EnvironmentConfig, Episode, Step, StepInfo, TrackedEnvironment};
pub use error::{DungeonError, Result};
pub use grid::{Grid, Position};
pub use observation::{BoxObservationSpace, DungeonObservation, Observation, ObservationKind, AGENT_MARKER};
pub use reward::Reward;
pub use tile::{TileKind, TileProperties};
pub use transition::{DynamicsConfig, Termination, Transition, TransitionModel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Action, AgentState, DungeonError, DynamicsConfig, Environment, Grid, Position, Result,
        Reward, Step, TileKind, Transition, TransitionModel,
    };
}
