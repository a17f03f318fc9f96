//! Example: Random agent exploring the trap level

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use dungeon_rl_env::{Environment, EnvironmentConfig, EnvRegistry, TrackedEnvironment};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = EnvRegistry::with_builtin();
    let env = registry.make("Dungeon-Trap-v0", EnvironmentConfig::default())?;
    let mut env = TrackedEnvironment::new(env);
    let action_space = env.action_space();
    let mut rng = StdRng::seed_from_u64(7);

    let num_episodes = 5;
    let mut episode_rewards = Vec::new();

    for episode in 0..num_episodes {
        env.reset().await?;
        loop {
            let step = env.step(action_space.sample(&mut rng)).await?;
            if step.done() {
                break;
            }
        }

        if let Some(info) = env.episode_info() {
            println!(
                "Episode {}: Total Reward = {:.2}, Steps = {}, Truncated = {}",
                episode + 1,
                info.total_reward,
                info.steps,
                info.truncated
            );
            episode_rewards.push(info.total_reward);
        }
        if let Some(frame) = env.render() {
            println!("{frame}\n");
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_reward = episode_rewards.iter().sum::<f64>() / episode_rewards.len() as f64;
    println!("Average Reward over {num_episodes} episodes: {avg_reward:.2}");

    env.close().await?;
    Ok(())
}
