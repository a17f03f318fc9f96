//! Environment traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    AgentState, BoxObservationSpace, DiscreteSpace, DynamicsConfig, Observation, ObservationKind,
    Position, Reward,
};

/// Result of a single environment step
#[derive(Debug, Clone)]
pub struct Step<O> {
    /// Observation from the environment
    pub observation: O,
    /// Reward signal
    pub reward: Reward,
    /// Whether the episode reached a terminal outcome
    pub terminated: bool,
    /// Whether the step budget ran out before termination
    pub truncated: bool,
    /// Additional info from the environment
    pub info: StepInfo,
}

impl<O> Step<O> {
    /// Whether the episode is over for any reason
    #[must_use]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Additional information from a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Agent position
    pub position: Position,
    /// Agent health
    pub health: i32,
    /// Reward accumulated this episode
    pub cumulative_reward: f64,
    /// Steps taken this episode
    pub step_count: usize,
    /// Custom fields
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl StepInfo {
    /// Snapshot of an agent's episode state
    #[must_use]
    pub fn from_agent(agent: &AgentState) -> Self {
        Self {
            position: agent.position,
            health: agent.health,
            cumulative_reward: agent.cumulative_reward,
            step_count: agent.steps,
            fields: serde_json::Map::new(),
        }
    }

    /// Attach a custom field
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: String,
    /// Total reward
    pub total_reward: f64,
    /// Number of steps
    pub steps: usize,
    /// Whether episode was truncated
    pub truncated: bool,
    /// Start time
    pub start_time: chrono::DateTime<chrono::Utc>,
    /// End time
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Configuration for environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Step budget per episode
    pub max_steps: usize,
    /// Observation emitted by `reset` and `step`
    pub observation: ObservationKind,
    /// Transition constants
    pub dynamics: DynamicsConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            max_steps: 200,
            observation: ObservationKind::default(),
            dynamics: DynamicsConfig::default(),
        }
    }
}

/// Core environment trait
#[async_trait]
pub trait Environment: Send + Sync {
    /// Observation type
    type Observation: Observation;

    /// Get the observation space
    fn observation_space(&self) -> BoxObservationSpace;

    /// Get the action space
    fn action_space(&self) -> DiscreteSpace;

    /// Reset the environment
    async fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)>;

    /// Take a step in the environment
    async fn step(&mut self, action: usize) -> crate::Result<Step<Self::Observation>>;

    /// Text rendering of the current state, if supported
    fn render(&self) -> Option<String> {
        None
    }

    /// Close the environment
    async fn close(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Get current episode info
    fn episode_info(&self) -> Option<Episode> {
        None
    }
}

/// Wrapper for environments that tracks episodes
pub struct TrackedEnvironment<E> {
    /// Inner environment
    pub env: E,
    /// Current episode
    pub episode: Option<Episode>,
    /// Step counter
    pub step_count: usize,
}

impl<E> TrackedEnvironment<E> {
    /// Create a new tracked environment
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode: None,
            step_count: 0,
        }
    }
}

#[async_trait]
impl<E> Environment for TrackedEnvironment<E>
where
    E: Environment,
{
    type Observation = E::Observation;

    fn observation_space(&self) -> BoxObservationSpace {
        self.env.observation_space()
    }

    fn action_space(&self) -> DiscreteSpace {
        self.env.action_space()
    }

    async fn reset(&mut self) -> crate::Result<(Self::Observation, StepInfo)> {
        // End current episode if exists
        if let Some(ref mut episode) = self.episode {
            episode.end_time.get_or_insert_with(chrono::Utc::now);
        }

        self.episode = Some(Episode {
            id: uuid::Uuid::new_v4().to_string(),
            total_reward: 0.0,
            steps: 0,
            truncated: false,
            start_time: chrono::Utc::now(),
            end_time: None,
        });
        self.step_count = 0;

        self.env.reset().await
    }

    async fn step(&mut self, action: usize) -> crate::Result<Step<Self::Observation>> {
        let step = self.env.step(action).await?;

        self.step_count += 1;
        if let Some(ref mut episode) = self.episode {
            episode.total_reward += step.reward.value();
            episode.steps = self.step_count;

            if step.done() {
                episode.truncated = step.truncated;
                episode.end_time = Some(chrono::Utc::now());
            }
        }

        Ok(step)
    }

    fn render(&self) -> Option<String> {
        self.env.render()
    }

    async fn close(&mut self) -> crate::Result<()> {
        self.env.close().await
    }

    fn episode_info(&self) -> Option<Episode> {
        self.episode.clone()
    }
}
