//! Reinforcement learning adapter
//!
//! Wraps the simulation in a gym-style step/reset contract with a fixed
//! four-element observation and a two-valued discrete action space.

mod observation;
mod spaces;

pub use observation::{OBS_SIZE, Observation};
pub use spaces::{BoxSpace, Discrete};

use std::collections::BTreeMap;
use std::io;

use crate::error::EnvError;
use crate::render::{Frame, RenderSink};
use crate::sim::{Action, GameState, TickOutcome, tick};

/// Auxiliary per-step info. Always empty; kept for contract compatibility.
pub type Info = BTreeMap<String, f32>;

/// Result of one environment step: exactly four elements
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

impl Step {
    pub fn into_tuple(self) -> (Observation, f32, bool, Info) {
        (self.observation, self.reward, self.done, self.info)
    }
}

/// Flappy bird environment, exclusively owned by its driver
#[derive(Debug, Clone)]
pub struct FlappyEnv {
    state: GameState,
    observation_space: BoxSpace,
    action_space: Discrete,
    last_outcome: Option<TickOutcome>,
}

impl FlappyEnv {
    pub fn new(seed: u64) -> Self {
        Self::from_state(GameState::new(seed))
    }

    /// Wrap an existing simulation state (e.g. a restored snapshot)
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            observation_space: BoxSpace::default(),
            action_space: Discrete::new(2),
            last_outcome: None,
        }
    }

    /// Start a new episode and return its first observation
    pub fn reset(&mut self) -> Observation {
        self.state.reset();
        self.last_outcome = None;
        log::debug!(
            "episode {} reset (pipe top {})",
            self.state.episode,
            self.state.front_pipe().top_height
        );
        self.observation()
    }

    /// Step with a raw action index; anything but 0 or 1 is rejected
    /// without touching the simulation.
    pub fn step(&mut self, action: i64) -> Result<Step, EnvError> {
        let action = Action::try_from(action)?;
        self.step_action(action)
    }

    pub fn step_action(&mut self, action: Action) -> Result<Step, EnvError> {
        let outcome = tick(&mut self.state, action)?;
        let step = Step {
            observation: self.observation(),
            reward: outcome.reward,
            done: outcome.terminal,
            info: Info::new(),
        };
        self.last_outcome = Some(outcome);
        Ok(step)
    }

    pub fn observation(&self) -> Observation {
        Observation::from_state(&self.state)
    }

    pub fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    pub fn action_space(&self) -> Discrete {
        self.action_space
    }

    /// Details of the most recent step (reward terms, collision cause)
    pub fn last_outcome(&self) -> Option<&TickOutcome> {
        self.last_outcome.as_ref()
    }

    /// Snapshot of what a render sink needs this tick
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state)
    }

    /// Push the current frame into a sink
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> io::Result<()> {
        sink.present(&self.frame())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.state.best_score
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_reset_twice_matches() {
        let mut env = FlappyEnv::new(10);
        let a = env.reset();
        let b = env.reset();
        assert_eq!(a.bird_y, b.bird_y);
        assert_eq!(a.bird_vel, b.bird_vel);
        assert_eq!(a.pipe_x, b.pipe_x);
        for obs in [a, b] {
            assert!(obs.pipe_top >= 100.0 && obs.pipe_top < SCREEN_HEIGHT - 200.0);
            assert!(env.observation_space().contains(&obs));
        }
        assert_eq!(a.to_array()[..3], [300.0, 0.0, 400.0]);
    }

    #[test]
    fn test_step_returns_four_elements() {
        let mut env = FlappyEnv::new(1);
        env.reset();
        let (obs, reward, done, info) = env.step(0).unwrap().into_tuple();
        assert_eq!(obs.bird_vel, GRAVITY);
        assert_eq!(obs.pipe_x, SCREEN_WIDTH - PIPE_SPEED);
        assert!(!done);
        assert!(info.is_empty());
        // 300.5 is below the optimal band; velocity 0.5 is stable
        assert_eq!(reward, 4.0);
    }

    #[test]
    fn test_invalid_action_rejected() {
        let mut env = FlappyEnv::new(1);
        let before = env.reset();
        assert_eq!(env.step(2), Err(EnvError::InvalidAction(2)));
        assert_eq!(env.step(-3), Err(EnvError::InvalidAction(-3)));
        assert_eq!(env.observation(), before);
        assert_eq!(env.state().time_ticks, 0);
    }

    #[test]
    fn test_step_after_done_requires_reset() {
        let mut env = FlappyEnv::new(6);
        env.reset();
        let mut last = None;
        for _ in 0..200 {
            let step = env.step(0).unwrap();
            if step.done {
                last = Some(step);
                break;
            }
        }
        let last = last.unwrap();
        assert_eq!(last.reward, CRASH_PENALTY);
        assert_eq!(env.step(0), Err(EnvError::EpisodeTerminated));
        assert_eq!(env.step(1), Err(EnvError::EpisodeTerminated));

        env.reset();
        assert!(env.step(1).is_ok());
    }

    #[test]
    fn test_flap_then_gravity_exceeds_soft_bound() {
        let mut env = FlappyEnv::new(2);
        env.reset();
        let obs = env.step(1).unwrap().observation;
        assert_eq!(obs.bird_vel, FLAP_IMPULSE);
        assert!(env.observation_space().contains(&obs));

        // Free fall pushes velocity past the declared bound without clamping
        let mut obs = obs;
        for _ in 0..45 {
            obs = env.step(0).unwrap().observation;
        }
        assert_eq!(obs.bird_vel, FLAP_IMPULSE + 45.0 * GRAVITY);
        assert!(obs.bird_vel > 10.0);
        assert!(!env.observation_space().contains(&obs));
        assert!(!env.is_terminal());
    }

    #[test]
    fn test_best_score_survives_reset() {
        let mut env = FlappyEnv::new(31);
        env.reset();
        env.state_mut().best_score = 7;
        env.reset();
        assert_eq!(env.best_score(), 7);
        assert_eq!(env.score(), 0);
    }

    #[test]
    fn test_render_pushes_frame() {
        struct Capture(Vec<Frame>);
        impl RenderSink for Capture {
            fn present(&mut self, frame: &Frame) -> io::Result<()> {
                self.0.push(frame.clone());
                Ok(())
            }
        }

        let mut env = FlappyEnv::new(12);
        env.reset();
        env.step(0).unwrap();
        let mut sink = Capture(Vec::new());
        env.render(&mut sink).unwrap();
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].bird_y, env.state().bird.y);
        assert_eq!(sink.0[0].pipes.len(), 1);
    }
}
