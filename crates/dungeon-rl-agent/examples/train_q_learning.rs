//! Train a Q-Learning agent on a small room and print the learned policy
//!
//! Run with `RUST_LOG=info cargo run --example train_q_learning`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use dungeon_rl_agent::{QLearning, QLearningConfig};
use dungeon_rl_core::Grid;

const LAYOUT: &str = "\
#######
#S..T.#
#.#...#
#...#.#
#.H..G#
#######";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let grid = Grid::from_layout(LAYOUT);
    let config = QLearningConfig {
        seed: Some(42),
        ..QLearningConfig::default()
    };
    let max_steps = config.max_steps;
    let mut trainer = QLearning::new(grid, config)?;

    let stats = trainer.train(1000, max_steps)?;
    println!(
        "Trained {} episodes, success rate {:.2}, final epsilon {:.3}",
        stats.episodes(),
        stats.success_rate(),
        stats.final_epsilon
    );
    if let Some(last) = stats.reward_moving_average(100).last() {
        println!("Average reward over the last 100 episodes: {last:.2}");
    }

    let eval = trainer.evaluate(100, max_steps)?;
    println!(
        "Greedy evaluation: reward {:.2} ± {:.2}, steps {:.1}, success rate {:.2}",
        eval.mean_reward, eval.std_reward, eval.mean_steps, eval.success_rate
    );

    println!("\nPolicy:\n{}", trainer.policy());
    println!("\nState values:\n{:.1}", trainer.value_grid());
    Ok(())
}
