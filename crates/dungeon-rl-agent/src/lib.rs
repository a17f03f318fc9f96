//! Tabular reinforcement learning agents for the dungeon grid world
//!
//! This crate provides:
//! - A dense state-action value table
//! - Epsilon-greedy exploration with per-episode decay
//! - A Q-Learning trainer with training and evaluation statistics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod policy;
pub mod q_learning;
pub mod q_table;
pub mod stats;
pub mod utils;

// Re-export the trainer
pub use q_learning::{QLearning, QLearningConfig};
pub use q_table::QTable;

// Re-export utilities
pub use stats::{EpisodeResult, EvaluationStats, TrainingStats};
pub use utils::{moving_average, ExplorationSchedule};

// Re-export policy components
pub use policy::{epsilon_greedy, PolicyCell, PolicyGrid};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EvaluationStats, PolicyGrid, QLearning, QLearningConfig, QTable, TrainingStats,
    };
    pub use dungeon_rl_core::prelude::*;
}
