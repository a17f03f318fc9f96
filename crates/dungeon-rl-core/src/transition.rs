//! Agent transition model
//!
//! A pure function of `(grid, position, health, action)`. The caller owns the
//! agent state and the running reward total; see [`crate::AgentState`].

use serde::{Deserialize, Serialize};

use crate::{Action, Grid, Position, Reward, TileKind};

/// Numeric constants of the dynamics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Applied to every step, accepted or not
    pub step_penalty: f64,
    /// Added when a move is rejected
    pub bump_penalty: f64,
    /// Added on entering the goal
    pub goal_reward: f64,
    /// Added on entering a trap
    pub trap_penalty: f64,
    /// Health lost on entering a trap
    pub trap_damage: i32,
    /// Added on entering a heal tile
    pub heal_bonus: f64,
    /// Health restored on entering a heal tile
    pub heal_amount: i32,
    /// Health ceiling, also the health at spawn
    pub max_health: i32,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            step_penalty: -0.1,
            bump_penalty: TileKind::Wall.reward(),
            goal_reward: TileKind::Goal.reward(),
            trap_penalty: TileKind::Trap.reward(),
            trap_damage: 10,
            heal_bonus: TileKind::Heal.reward(),
            heal_amount: 10,
            max_health: 100,
        }
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// The agent entered the goal tile
    GoalReached,
    /// Health dropped to zero
    HealthDepleted,
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Position after the step
    pub position: Position,
    /// Health after the step
    pub health: i32,
    /// Reward earned by the step
    pub reward: Reward,
    /// Whether the agent actually changed cell
    pub moved: bool,
    /// Terminal outcome, if the step ended the episode
    pub termination: Option<Termination>,
}

impl Transition {
    /// Whether the step ended the episode
    #[must_use]
    pub fn terminated(&self) -> bool {
        self.termination.is_some()
    }

    /// Whether the step ended the episode on the goal
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.termination == Some(Termination::GoalReached)
    }
}

/// Transition function over a grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionModel {
    config: DynamicsConfig,
}

impl TransitionModel {
    /// Create a model with the given constants
    #[must_use]
    pub fn new(config: DynamicsConfig) -> Self {
        Self { config }
    }

    /// Constants in use
    #[must_use]
    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    /// Advance one step from `position` with `health`
    #[must_use]
    pub fn step(&self, grid: &Grid, position: Position, health: i32, action: Action) -> Transition {
        let cfg = &self.config;
        let (dx, dy) = action.delta();

        let entered = position
            .offset(dx, dy)
            .and_then(|target| grid.tile_at(target).ok().map(|tile| (target, tile)))
            .filter(|(_, tile)| tile.is_passable());

        let Some((target, tile)) = entered else {
            return Transition {
                position,
                health,
                reward: Reward(cfg.step_penalty + cfg.bump_penalty),
                moved: false,
                termination: None,
            };
        };

        let (health, bonus, termination) = match tile {
            TileKind::Goal => (health, cfg.goal_reward, Some(Termination::GoalReached)),
            TileKind::Trap => {
                let health = (health - cfg.trap_damage).max(0);
                let termination = (health == 0).then_some(Termination::HealthDepleted);
                (health, cfg.trap_penalty, termination)
            }
            TileKind::Heal => (
                (health + cfg.heal_amount).min(cfg.max_health),
                cfg.heal_bonus,
                None,
            ),
            TileKind::Empty | TileKind::Start | TileKind::Wall => (health, 0.0, None),
        };

        Transition {
            position: target,
            health,
            reward: Reward(cfg.step_penalty + bonus),
            moved: true,
            termination,
        }
    }
}
