//! Per-episode agent state

use serde::{Deserialize, Serialize};

use crate::{Action, DungeonError, Grid, Position, Result, Transition, TransitionModel};

/// Position, health and reward of the agent during one episode
///
/// Created at the grid's start tile and discarded when the episode ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Current cell
    pub position: Position,
    /// Current health
    pub health: i32,
    /// Health ceiling
    pub max_health: i32,
    /// Sum of rewards earned so far
    pub cumulative_reward: f64,
    /// Steps taken so far
    pub steps: usize,
}

impl AgentState {
    /// Spawn at the grid's start tile with full health
    pub fn spawn(grid: &Grid, max_health: i32) -> Result<Self> {
        let position = grid.start_position().ok_or(DungeonError::NoStartPosition)?;
        Ok(Self {
            position,
            health: max_health,
            max_health,
            cumulative_reward: 0.0,
            steps: 0,
        })
    }

    /// Return to the start tile with full health and no reward
    pub fn reset(&mut self, grid: &Grid) -> Result<()> {
        *self = Self::spawn(grid, self.max_health)?;
        Ok(())
    }

    /// Whether health is above zero
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Record the result of a step
    pub fn apply(&mut self, transition: &Transition) {
        self.position = transition.position;
        self.health = transition.health;
        self.cumulative_reward += transition.reward.value();
        self.steps += 1;
    }

    /// Step through `model` and apply the result
    pub fn act(&mut self, grid: &Grid, model: &TransitionModel, action: Action) -> Transition {
        let transition = model.step(grid, self.position, self.health, action);
        self.apply(&transition);
        transition
    }
}
