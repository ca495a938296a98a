//! Episode loops shared by the binary's play modes
//!
//! A driver owns one [`FlappyEnv`], asks a [`Policy`] for an action every
//! tick and optionally pushes frames into a [`RenderSink`].

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::env::FlappyEnv;
use crate::error::EnvError;
use crate::policy::Policy;
use crate::render::RenderSink;
use crate::scoreboard::{EpisodeRecord, Scoreboard};
use crate::ticks_to_secs;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("render sink failed: {0}")]
    Render(#[from] io::Error),
}

/// How a driver runs its episodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    /// Stop an episode after this many steps even if it's still running
    pub max_steps: Option<u64>,
    /// Sleep between ticks so a human can follow along
    pub pace: Option<Duration>,
    /// Tick rate used for the episode duration in logs
    pub ticks_per_second: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            pace: None,
            ticks_per_second: crate::consts::TICKS_PER_SECOND,
        }
    }
}

/// Run one episode from reset until it terminates or hits the step cap
pub fn run_episode(
    env: &mut FlappyEnv,
    policy: &mut dyn Policy,
    mut sink: Option<&mut (dyn RenderSink + '_)>,
    config: &RunConfig,
) -> Result<EpisodeRecord, DriverError> {
    let mut obs = env.reset();
    if let Some(sink) = sink.as_deref_mut() {
        env.render(sink)?;
    }

    let mut steps = 0u64;
    let mut total_reward = 0.0f32;
    loop {
        if config.max_steps.is_some_and(|max| steps >= max) {
            log::debug!("episode {} capped at {} steps", env.state().episode, steps);
            break;
        }
        let started = Instant::now();

        let step = env.step_action(policy.act(&obs))?;
        steps += 1;
        total_reward += step.reward;
        obs = step.observation;

        if let Some(sink) = sink.as_deref_mut() {
            env.render(sink)?;
        }
        if step.done {
            break;
        }
        if let Some(pace) = config.pace {
            if let Some(rest) = pace.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    let record = EpisodeRecord {
        episode: env.state().episode,
        score: env.score(),
        ticks: steps,
        total_reward,
    };
    log::info!(
        "{} episode {}: score {} in {:.1}s, reward {:.1}",
        policy.name(),
        record.episode,
        record.score,
        ticks_to_secs(record.ticks, config.ticks_per_second),
        record.total_reward
    );
    Ok(record)
}

/// Run several episodes back to back, recording each on the scoreboard
pub fn run_episodes(
    env: &mut FlappyEnv,
    policy: &mut dyn Policy,
    mut sink: Option<&mut (dyn RenderSink + '_)>,
    config: &RunConfig,
    episodes: u32,
    board: &mut Scoreboard,
) -> Result<Vec<EpisodeRecord>, DriverError> {
    let mut records = Vec::with_capacity(episodes as usize);
    for _ in 0..episodes {
        let record = run_episode(env, policy, sink.as_deref_mut(), config)?;
        if let Some(rank) = board.record(record.clone()) {
            log::debug!("episode {} placed #{}", record.episode, rank);
        }
        records.push(record);
    }
    Ok(records)
}
