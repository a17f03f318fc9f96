//! Tabular Q-Learning over a dungeon grid

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use dungeon_rl_core::{
    Action, AgentState, DungeonError, DynamicsConfig, Grid, Position, Result, TileKind,
    Transition, TransitionModel,
};

use crate::policy::{epsilon_greedy, PolicyCell, PolicyGrid};
use crate::stats::{EpisodeResult, EvaluationStats, TrainingStats};
use crate::utils::ExplorationSchedule;
use crate::QTable;

/// Episodes between progress reports
const LOG_INTERVAL: usize = 100;

/// Q-Learning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Initial exploration rate
    pub epsilon_start: f64,
    /// Exploration floor
    pub epsilon_min: f64,
    /// Per-episode multiplicative decay
    pub epsilon_decay: f64,
    /// Default step budget per episode
    pub max_steps: usize,
    /// RNG seed, entropy-seeded when `None`
    pub seed: Option<u64>,
    /// Transition constants
    pub dynamics: DynamicsConfig,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            max_steps: 200,
            seed: None,
            dynamics: DynamicsConfig::default(),
        }
    }
}

impl QLearningConfig {
    /// Reject rates outside `[0, 1]` and a floor above the start
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(DungeonError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        };
        unit("alpha", self.alpha)?;
        unit("gamma", self.gamma)?;
        unit("epsilon_start", self.epsilon_start)?;
        unit("epsilon_min", self.epsilon_min)?;
        unit("epsilon_decay", self.epsilon_decay)?;

        if self.epsilon_min > self.epsilon_start {
            return Err(DungeonError::InvalidConfig(format!(
                "epsilon_min {} exceeds epsilon_start {}",
                self.epsilon_min, self.epsilon_start
            )));
        }
        Ok(())
    }
}

/// Q-Learning trainer
///
/// Owns the value table, the exploration rate and the random source. The
/// grid is shared read-only; episodes run strictly one after another because
/// every step writes the table.
#[derive(Debug)]
pub struct QLearning {
    grid: Arc<Grid>,
    config: QLearningConfig,
    model: TransitionModel,
    table: QTable,
    schedule: ExplorationSchedule,
    rng: StdRng,
}

impl QLearning {
    /// Create a trainer with an all-zero table
    pub fn new(grid: impl Into<Arc<Grid>>, config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        let grid = grid.into();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            table: QTable::new(grid.cell_count(), Action::COUNT),
            model: TransitionModel::new(config.dynamics),
            schedule: ExplorationSchedule::new(
                config.epsilon_start,
                config.epsilon_min,
                config.epsilon_decay,
            ),
            rng,
            grid,
            config,
        })
    }

    /// Grid being learned
    #[must_use]
    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Value table
    #[must_use]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Current exploration rate
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.schedule.rate()
    }

    /// Dense row-major state index of `position`
    #[must_use]
    pub fn state_index(&self, position: Position) -> usize {
        position.y * self.grid.width() + position.x
    }

    /// Inverse of [`QLearning::state_index`]
    #[must_use]
    pub fn position_of(&self, state: usize) -> Position {
        self.grid.position_of(state)
    }

    /// Action values of `state`
    #[must_use]
    pub fn q_values(&self, state: usize) -> ArrayView1<'_, f64> {
        self.table.row(state)
    }

    /// Best action value of `state`
    #[must_use]
    pub fn max_q(&self, state: usize) -> f64 {
        self.table.max_value(state)
    }

    /// Greedy action of `state`, lowest index on ties
    #[must_use]
    pub fn greedy_action(&self, state: usize) -> Action {
        self.table.greedy_action(state)
    }

    /// Epsilon-greedy action of `state`
    pub fn select_action(&mut self, state: usize, epsilon: f64) -> Action {
        epsilon_greedy(&self.table, state, epsilon, &mut self.rng)
    }

    /// One-step Q-Learning update
    pub fn update(
        &mut self,
        state: usize,
        action: Action,
        reward: f64,
        next_state: usize,
        terminated: bool,
    ) {
        let target = if terminated {
            reward
        } else {
            reward + self.config.gamma * self.table.max_value(next_state)
        };
        let current = self.table.get(state, action);
        self.table
            .set(state, action, current + self.config.alpha * (target - current));
    }

    /// Decay the exploration rate by one episode
    pub fn decay_exploration(&mut self) -> f64 {
        self.schedule.decay()
    }

    /// Run one episode from the start tile
    ///
    /// Explores and updates the table when `learn` is set, otherwise acts
    /// greedily and leaves the table untouched.
    pub fn run_episode(&mut self, max_steps: usize, learn: bool) -> Result<EpisodeResult> {
        self.run_episode_with(max_steps, learn, |_, _, _| {})
    }

    /// [`QLearning::run_episode`] calling `on_step` after every step with the
    /// updated agent, the chosen action and its transition
    pub fn run_episode_with<F>(
        &mut self,
        max_steps: usize,
        learn: bool,
        mut on_step: F,
    ) -> Result<EpisodeResult>
    where
        F: FnMut(&AgentState, Action, &Transition),
    {
        let mut agent = AgentState::spawn(&self.grid, self.model.config().max_health)?;
        let mut termination = None;

        while agent.steps < max_steps {
            let state = self.state_index(agent.position);
            let action = if learn {
                let epsilon = self.schedule.rate();
                self.select_action(state, epsilon)
            } else {
                self.greedy_action(state)
            };

            let transition = agent.act(&self.grid, &self.model, action);
            if learn {
                let next_state = self.state_index(transition.position);
                self.update(
                    state,
                    action,
                    transition.reward.value(),
                    next_state,
                    transition.terminated(),
                );
            }
            on_step(&agent, action, &transition);

            if transition.termination.is_some() {
                termination = transition.termination;
                break;
            }
        }

        Ok(EpisodeResult {
            total_reward: agent.cumulative_reward,
            steps: agent.steps,
            termination,
        })
    }

    /// Train for `episodes` learning episodes
    pub fn train(&mut self, episodes: usize, max_steps: usize) -> Result<TrainingStats> {
        self.train_with(episodes, max_steps, |_, _| {})
    }

    /// [`QLearning::train`] calling `on_episode` with the index and result of
    /// every finished episode
    pub fn train_with<F>(
        &mut self,
        episodes: usize,
        max_steps: usize,
        mut on_episode: F,
    ) -> Result<TrainingStats>
    where
        F: FnMut(usize, &EpisodeResult),
    {
        self.grid
            .start_position()
            .ok_or(DungeonError::NoStartPosition)?;

        info!(
            episodes,
            max_steps,
            alpha = self.config.alpha,
            gamma = self.config.gamma,
            epsilon = self.epsilon(),
            "Starting Q-Learning training"
        );

        let mut stats = TrainingStats::default();
        for episode in 0..episodes {
            let result = self.run_episode(max_steps, true)?;
            stats.record(&result);
            let epsilon = self.decay_exploration();

            debug!(
                episode,
                reward = result.total_reward,
                steps = result.steps,
                reached_goal = result.reached_goal(),
                "Episode finished"
            );
            metrics::counter!("dungeon_rl_train_episodes_total", 1);
            if result.reached_goal() {
                metrics::counter!("dungeon_rl_train_successes_total", 1);
            }
            metrics::gauge!("dungeon_rl_train_epsilon", epsilon);

            on_episode(episode, &result);

            if (episode + 1) % LOG_INTERVAL == 0 {
                info!(
                    episode = episode + 1,
                    avg_reward = stats.recent_mean_reward(LOG_INTERVAL),
                    avg_steps = stats.recent_mean_steps(LOG_INTERVAL),
                    epsilon,
                    success_rate = stats.recent_success_rate(LOG_INTERVAL),
                    "Training progress"
                );
            }
        }

        stats.final_epsilon = self.epsilon();
        info!(
            episodes,
            successes = stats.total_successes,
            final_epsilon = stats.final_epsilon,
            "Training finished"
        );
        Ok(stats)
    }

    /// Run `episodes` greedy episodes without learning or decay
    pub fn evaluate(&mut self, episodes: usize, max_steps: usize) -> Result<EvaluationStats> {
        self.grid
            .start_position()
            .ok_or(DungeonError::NoStartPosition)?;

        let results = (0..episodes)
            .map(|_| self.run_episode(max_steps, false))
            .collect::<Result<Vec<_>>>()?;
        let stats = EvaluationStats::from_results(&results);

        info!(
            episodes,
            mean_reward = stats.mean_reward,
            std_reward = stats.std_reward,
            mean_steps = stats.mean_steps,
            success_rate = stats.success_rate,
            "Evaluation finished"
        );
        Ok(stats)
    }

    /// Greedy action of every cell; walls and the goal have none
    #[must_use]
    pub fn policy(&self) -> PolicyGrid {
        let cells = self
            .grid
            .cells()
            .map(|(position, kind)| match kind {
                TileKind::Wall => PolicyCell::Wall,
                TileKind::Goal => PolicyCell::Goal,
                _ => PolicyCell::Act(self.greedy_action(self.state_index(position))),
            })
            .collect();
        PolicyGrid::new(self.grid.width(), self.grid.height(), cells)
    }

    /// Best action value of every cell, `height × width`
    #[must_use]
    pub fn value_grid(&self) -> Array2<f64> {
        let width = self.grid.width();
        Array2::from_shape_fn((self.grid.height(), width), |(y, x)| {
            self.table.max_value(y * width + x)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dungeon_rl_core::Termination;

    fn open_room() -> Grid {
        let mut grid = Grid::bordered(5, 5);
        grid.set(1, 1, TileKind::Start).unwrap();
        grid.set(3, 3, TileKind::Goal).unwrap();
        grid
    }

    fn seeded(seed: u64) -> QLearningConfig {
        QLearningConfig {
            seed: Some(seed),
            ..QLearningConfig::default()
        }
    }

    #[test]
    fn test_open_room_converges() {
        let mut trainer = QLearning::new(open_room(), seeded(42)).unwrap();
        let stats = trainer.train(500, 200).unwrap();
        assert_eq!(stats.episodes(), 500);

        let eval = trainer.evaluate(100, 200).unwrap();
        assert!(eval.success_rate >= 0.9, "success rate {}", eval.success_rate);
        assert!(eval.mean_steps <= 6.0);
    }

    #[test]
    fn test_state_index_is_row_major() {
        let trainer = QLearning::new(open_room(), seeded(0)).unwrap();
        assert_eq!(trainer.state_index(Position::new(3, 2)), 13);
        for state in 0..25 {
            assert_eq!(trainer.state_index(trainer.position_of(state)), state);
        }
    }

    #[test]
    fn test_update_rule() {
        let mut trainer = QLearning::new(
            open_room(),
            QLearningConfig {
                gamma: 0.9,
                ..seeded(0)
            },
        )
        .unwrap();

        trainer.update(6, Action::Right, 10.0, 7, true);
        assert_relative_eq!(trainer.table().get(6, Action::Right), 1.0);

        trainer.table.set(8, Action::Down, 5.0);
        trainer.update(7, Action::Right, -0.1, 8, false);
        assert_relative_eq!(trainer.table().get(7, Action::Right), 0.1 * (-0.1 + 0.9 * 5.0));

        trainer.update(7, Action::Right, -0.1, 8, true);
        let expected = 0.44 + 0.1 * (-0.1 - 0.44);
        assert_relative_eq!(trainer.table().get(7, Action::Right), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_epsilon_matches_policy() {
        let mut trainer = QLearning::new(open_room(), seeded(3)).unwrap();
        trainer.train(50, 200).unwrap();

        let policy = trainer.policy();
        for (position, kind) in open_room().cells() {
            let state = trainer.state_index(position);
            match kind {
                TileKind::Wall | TileKind::Goal => assert_eq!(policy.action_at(position), None),
                _ => assert_eq!(
                    policy.action_at(position),
                    Some(trainer.select_action(state, 0.0))
                ),
            }
        }
    }

    #[test]
    fn test_decay_once_per_episode() {
        let mut trainer = QLearning::new(open_room(), seeded(1)).unwrap();
        let stats = trainer.train(3, 200).unwrap();
        assert_relative_eq!(stats.final_epsilon, 0.995_f64.powi(3), max_relative = 1e-12);
        assert_relative_eq!(trainer.epsilon(), stats.final_epsilon);
    }

    #[test]
    fn test_evaluate_leaves_table_untouched() {
        let mut trainer = QLearning::new(open_room(), seeded(5)).unwrap();
        trainer.train(20, 200).unwrap();
        let table = trainer.table().clone();
        let epsilon = trainer.epsilon();

        trainer.evaluate(10, 50).unwrap();
        assert_eq!(trainer.table(), &table);
        assert_relative_eq!(trainer.epsilon(), epsilon);
    }

    #[test]
    fn test_missing_start_fails_before_stepping() {
        let mut grid = Grid::bordered(5, 5);
        grid.set(3, 3, TileKind::Goal).unwrap();
        let mut trainer = QLearning::new(grid, seeded(0)).unwrap();

        assert!(matches!(trainer.train(10, 200), Err(DungeonError::NoStartPosition)));
        assert!(matches!(trainer.evaluate(1, 200), Err(DungeonError::NoStartPosition)));
        assert!(matches!(
            trainer.run_episode(200, true),
            Err(DungeonError::NoStartPosition)
        ));
        assert_relative_eq!(trainer.epsilon(), 1.0);
    }

    #[test]
    fn test_health_depletion_is_not_success() {
        let grid = Grid::from_layout("#####\n#STG#\n#####");
        let config = QLearningConfig {
            dynamics: DynamicsConfig {
                max_health: 10,
                ..DynamicsConfig::default()
            },
            ..seeded(0)
        };
        let mut trainer = QLearning::new(grid, config).unwrap();
        let start = trainer.state_index(Position::new(1, 1));
        trainer.table.set(start, Action::Right, 1.0);

        let result = trainer.run_episode(200, false).unwrap();
        assert_eq!(result.termination, Some(Termination::HealthDepleted));
        assert!(!result.reached_goal());
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn test_step_budget_bounds_episode() {
        let mut grid = Grid::bordered(5, 5);
        grid.set(1, 1, TileKind::Start).unwrap();
        let mut trainer = QLearning::new(grid, seeded(0)).unwrap();

        let mut observed = 0;
        let result = trainer
            .run_episode_with(25, true, |agent, _, _| {
                observed += 1;
                assert_eq!(agent.steps, observed);
            })
            .unwrap();
        assert_eq!(result.steps, 25);
        assert_eq!(result.termination, None);
        assert_eq!(observed, 25);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let mut a = QLearning::new(open_room(), seeded(9)).unwrap();
        let mut b = QLearning::new(open_room(), seeded(9)).unwrap();
        assert_eq!(a.train(30, 200).unwrap(), b.train(30, 200).unwrap());
        assert_eq!(a.table(), b.table());
    }

    #[test]
    fn test_train_observer_sees_every_episode() {
        let mut trainer = QLearning::new(open_room(), seeded(2)).unwrap();
        let mut seen = Vec::new();
        let stats = trainer
            .train_with(5, 200, |episode, result| seen.push((episode, result.steps)))
            .unwrap();
        let expected: Vec<_> = stats.episode_steps.iter().copied().enumerate().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_policy_and_value_grid_shapes() {
        let trainer = QLearning::new(open_room(), seeded(0)).unwrap();
        let policy = trainer.policy();
        assert_eq!(
            policy.to_string(),
            "# # # # #\n# ^ ^ ^ #\n# ^ ^ ^ #\n# ^ ^ G #\n# # # # #"
        );
        assert_eq!(trainer.value_grid().dim(), (5, 5));
    }

    #[test]
    fn test_value_grid_follows_cell_layout() {
        let mut grid = Grid::bordered(4, 3);
        grid.set(1, 1, TileKind::Start).unwrap();
        grid.set(2, 1, TileKind::Goal).unwrap();
        let mut trainer = QLearning::new(grid, seeded(0)).unwrap();

        for state in 0..12 {
            let best = Action::ALL[state % Action::COUNT];
            trainer.table.set(state, best, 10.0 * state as f64 + 1.0);
        }

        let values = trainer.value_grid();
        assert_eq!(values.dim(), (3, 4));
        for y in 0..3 {
            for x in 0..4 {
                let state = trainer.state_index(Position::new(x, y));
                assert_relative_eq!(values[[y, x]], trainer.max_q(state));
                assert_relative_eq!(values[[y, x]], 10.0 * (y * 4 + x) as f64 + 1.0);
            }
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = QLearningConfig {
            alpha: 1.5,
            ..QLearningConfig::default()
        };
        assert!(matches!(
            QLearning::new(open_room(), config),
            Err(DungeonError::InvalidConfig(_))
        ));

        let config = QLearningConfig {
            epsilon_start: 0.1,
            epsilon_min: 0.2,
            ..QLearningConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(QLearningConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: QLearningConfig = serde_json::from_str(r#"{"alpha": 0.5}"#).unwrap();
        assert_relative_eq!(config.alpha, 0.5);
        assert_relative_eq!(config.gamma, 0.99);
        assert_eq!(config.max_steps, 200);
        assert_eq!(config.dynamics, DynamicsConfig::default());
    }
}
