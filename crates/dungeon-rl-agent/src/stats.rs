//! Episode, training and evaluation statistics

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use dungeon_rl_core::Termination;

use crate::utils::moving_average;

/// Outcome of one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Sum of step rewards
    pub total_reward: f64,
    /// Steps taken
    pub steps: usize,
    /// Terminal outcome, `None` if the step budget ran out
    pub termination: Option<Termination>,
}

impl EpisodeResult {
    /// Whether the episode ended on the goal
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.termination == Some(Termination::GoalReached)
    }
}

/// History of a training run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Reward of every episode, in order
    pub episode_rewards: Vec<f64>,
    /// Step count of every episode, in order
    pub episode_steps: Vec<usize>,
    /// Whether each episode reached the goal, in order
    pub episode_successes: Vec<bool>,
    /// Episodes that reached the goal
    pub total_successes: usize,
    /// Exploration rate after the last decay
    pub final_epsilon: f64,
}

impl TrainingStats {
    /// Append one episode
    pub fn record(&mut self, result: &EpisodeResult) {
        self.episode_rewards.push(result.total_reward);
        self.episode_steps.push(result.steps);
        self.episode_successes.push(result.reached_goal());
        if result.reached_goal() {
            self.total_successes += 1;
        }
    }

    /// Number of recorded episodes
    #[must_use]
    pub fn episodes(&self) -> usize {
        self.episode_rewards.len()
    }

    /// Fraction of episodes that reached the goal
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.episodes() == 0 {
            0.0
        } else {
            self.total_successes as f64 / self.episodes() as f64
        }
    }

    /// Success rate over the last `window` episodes
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recent_success_rate(&self, window: usize) -> f64 {
        let start = self.episodes().saturating_sub(window);
        let recent = &self.episode_successes[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().filter(|&&s| s).count() as f64 / recent.len() as f64
        }
    }

    /// Mean reward over the last `window` episodes, `0.0` when empty
    #[must_use]
    pub fn recent_mean_reward(&self, window: usize) -> f64 {
        let start = self.episodes().saturating_sub(window);
        let recent = &self.episode_rewards[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().mean()
        }
    }

    /// Mean step count over the last `window` episodes, `0.0` when empty
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn recent_mean_steps(&self, window: usize) -> f64 {
        let start = self.episodes().saturating_sub(window);
        let recent: Vec<f64> = self.episode_steps[start..].iter().map(|&s| s as f64).collect();
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().mean()
        }
    }

    /// Trailing mean of episode rewards
    #[must_use]
    pub fn reward_moving_average(&self, window: usize) -> Vec<f64> {
        moving_average(&self.episode_rewards, window)
    }

    /// Trailing mean of episode lengths
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn steps_moving_average(&self, window: usize) -> Vec<f64> {
        let steps: Vec<f64> = self.episode_steps.iter().map(|&s| s as f64).collect();
        moving_average(&steps, window)
    }
}

/// Summary of greedy evaluation episodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    /// Episodes run
    pub episodes: usize,
    /// Mean episode reward
    pub mean_reward: f64,
    /// Population standard deviation of episode reward
    pub std_reward: f64,
    /// Mean episode length
    pub mean_steps: f64,
    /// Fraction of episodes that reached the goal
    pub success_rate: f64,
}

impl EvaluationStats {
    /// Summarize a batch of episodes; all zeros when empty
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_results(results: &[EpisodeResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let rewards: Vec<f64> = results.iter().map(|r| r.total_reward).collect();
        let steps: Vec<f64> = results.iter().map(|r| r.steps as f64).collect();
        let successes = results.iter().filter(|r| r.reached_goal()).count();

        Self {
            episodes: results.len(),
            mean_reward: rewards.iter().mean(),
            std_reward: rewards.iter().population_std_dev(),
            mean_steps: steps.iter().mean(),
            success_rate: successes as f64 / results.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn result(total_reward: f64, steps: usize, termination: Option<Termination>) -> EpisodeResult {
        EpisodeResult {
            total_reward,
            steps,
            termination,
        }
    }

    #[test]
    fn test_health_depletion_is_not_success() {
        let mut stats = TrainingStats::default();
        stats.record(&result(99.0, 4, Some(Termination::GoalReached)));
        stats.record(&result(-30.0, 9, Some(Termination::HealthDepleted)));
        stats.record(&result(-20.0, 200, None));

        assert_eq!(stats.episodes(), 3);
        assert_eq!(stats.total_successes, 1);
        assert_relative_eq!(stats.success_rate(), 1.0 / 3.0);
        assert_eq!(stats.steps_moving_average(3), vec![71.0]);
        assert_relative_eq!(stats.recent_success_rate(2), 0.0);
        assert_relative_eq!(stats.recent_success_rate(10), 1.0 / 3.0);
    }

    #[test]
    fn test_recent_means() {
        let mut stats = TrainingStats::default();
        assert_relative_eq!(stats.recent_mean_reward(100), 0.0);
        assert_relative_eq!(stats.recent_mean_steps(100), 0.0);

        stats.record(&result(90.0, 10, Some(Termination::GoalReached)));
        stats.record(&result(-20.0, 200, None));
        stats.record(&result(40.0, 6, Some(Termination::GoalReached)));

        assert_relative_eq!(stats.recent_mean_reward(2), 10.0);
        assert_relative_eq!(stats.recent_mean_steps(2), 103.0);
        assert_relative_eq!(stats.recent_mean_reward(100), 110.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(stats.recent_mean_steps(100), 72.0);
        assert_relative_eq!(stats.recent_mean_reward(0), 0.0);
    }

    #[test]
    fn test_evaluation_summary() {
        let stats = EvaluationStats::from_results(&[
            result(10.0, 4, Some(Termination::GoalReached)),
            result(20.0, 6, Some(Termination::GoalReached)),
            result(0.0, 8, None),
            result(10.0, 6, Some(Termination::HealthDepleted)),
        ]);

        assert_eq!(stats.episodes, 4);
        assert_relative_eq!(stats.mean_reward, 10.0);
        assert_relative_eq!(stats.std_reward, 50.0_f64.sqrt());
        assert_relative_eq!(stats.mean_steps, 6.0);
        assert_relative_eq!(stats.success_rate, 0.5);
    }

    #[test]
    fn test_empty_evaluation() {
        assert_eq!(EvaluationStats::from_results(&[]), EvaluationStats::default());
    }
}
