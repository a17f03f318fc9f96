//! Dungeon grid world behind the `Environment` interface

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use dungeon_rl_core::{
    Action, AgentState, BoxObservationSpace, DiscreteSpace, DungeonError, DungeonObservation,
    Environment, EnvironmentConfig, Grid, Position, Result, Step, StepInfo, TransitionModel,
};

/// Character drawn on the agent's cell by [`DungeonEnv::render_ansi`]
pub const AGENT_SYMBOL: char = '@';

/// Dungeon environment
///
/// Observations are the normalized agent position or the full tile-code
/// grid, chosen by [`EnvironmentConfig::observation`]. Episodes truncate
/// after `max_steps` steps without reaching a terminal tile.
#[derive(Debug, Clone)]
pub struct DungeonEnv {
    grid: Arc<Grid>,
    config: EnvironmentConfig,
    model: TransitionModel,
    agent: AgentState,
}

impl DungeonEnv {
    /// Create an environment over `grid`
    pub fn new(grid: impl Into<Arc<Grid>>, config: EnvironmentConfig) -> Result<Self> {
        let grid = grid.into();
        let agent = AgentState::spawn(&grid, config.dynamics.max_health)?;
        Ok(Self {
            model: TransitionModel::new(config.dynamics),
            grid,
            config,
            agent,
        })
    }

    /// Create an environment from layout text, unknown characters become `Empty`
    pub fn from_layout(text: &str, config: EnvironmentConfig) -> Result<Self> {
        Self::new(Grid::from_layout(text), config)
    }

    /// [`DungeonEnv::from_layout`] that also returns, and logs at warn
    /// level, every unknown character with its position
    pub fn from_layout_reporting(
        text: &str,
        config: EnvironmentConfig,
    ) -> Result<(Self, Vec<(Position, DungeonError)>)> {
        let (grid, issues) = Grid::from_layout_reporting(text);
        Ok((Self::new(grid, config)?, issues))
    }

    /// Create an environment from a layout file
    pub fn from_file(path: impl AsRef<Path>, config: EnvironmentConfig) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Loaded dungeon layout");
        Self::from_layout(&text, config)
    }

    /// Grid being played
    #[must_use]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Agent of the current episode
    #[must_use]
    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    /// Current observation
    #[must_use]
    pub fn observe(&self) -> DungeonObservation {
        DungeonObservation::observe(self.config.observation, &self.grid, self.agent.position)
    }

    /// Layout characters with the agent drawn as [`AGENT_SYMBOL`]
    #[must_use]
    pub fn render_ansi(&self) -> String {
        let mut out = String::with_capacity(self.grid.cell_count() + self.grid.height());
        for (position, kind) in self.grid.cells() {
            if position.x == 0 && position.y > 0 {
                out.push('\n');
            }
            if position == self.agent.position {
                out.push(AGENT_SYMBOL);
            } else {
                out.push(kind.symbol());
            }
        }
        out
    }
}

#[async_trait]
impl Environment for DungeonEnv {
    type Observation = DungeonObservation;

    fn observation_space(&self) -> BoxObservationSpace {
        BoxObservationSpace::for_grid(self.config.observation, &self.grid)
    }

    fn action_space(&self) -> DiscreteSpace {
        DiscreteSpace::new(Action::COUNT)
    }

    async fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        self.agent.reset(&self.grid)?;
        Ok((self.observe(), StepInfo::from_agent(&self.agent)))
    }

    async fn step(&mut self, action: usize) -> Result<Step<Self::Observation>> {
        let action = Action::try_from(action)?;
        let transition = self.agent.act(&self.grid, &self.model, action);

        let terminated = transition.terminated();
        let truncated = !terminated && self.agent.steps >= self.config.max_steps;
        if terminated || truncated {
            debug!(
                steps = self.agent.steps,
                reward = self.agent.cumulative_reward,
                termination = ?transition.termination,
                truncated,
                "Episode ended"
            );
        }

        Ok(Step {
            observation: self.observe(),
            reward: transition.reward,
            terminated,
            truncated,
            info: StepInfo::from_agent(&self.agent).with("moved", transition.moved),
        })
    }

    fn render(&self) -> Option<String> {
        Some(self.render_ansi())
    }
}
