//! Environments for the dungeon grid world
//!
//! This crate provides:
//! - `DungeonEnv`, the grid world behind the `Environment` interface
//! - Built-in levels of increasing difficulty
//! - A registry creating environments by name

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dungeon;
pub mod layouts;
pub mod registry;

// Re-export environments
pub use dungeon::{DungeonEnv, AGENT_SYMBOL};
pub use registry::EnvRegistry;

// Re-export core types
pub use dungeon_rl_core::{
    Action, BoxObservationSpace, DiscreteSpace, DungeonObservation, Environment,
    EnvironmentConfig, Episode, ObservationKind, Reward, Step, StepInfo, TrackedEnvironment,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{DungeonEnv, EnvRegistry};
    pub use dungeon_rl_core::prelude::*;
}
