//! Discrete simulation tick
//!
//! Advances the game by exactly one step: physics, pipe lifecycle, reward,
//! then the terminal check. One call completes fully before the next.

use serde::{Deserialize, Serialize};

use super::collision::{Collision, detect_collision};
use super::reward::{RewardBreakdown, shape_reward};
use super::state::{EpisodePhase, GameState, Pipe};
use crate::consts::*;
use crate::error::EnvError;

/// Discrete action for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Noop,
    Flap,
}

impl Action {
    /// Every action, ordered by index
    pub const ALL: [Action; 2] = [Action::Noop, Action::Flap];

    /// Wire index of the action (0 = no-op, 1 = flap)
    pub fn index(self) -> i64 {
        match self {
            Action::Noop => 0,
            Action::Flap => 1,
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = EnvError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Noop),
            1 => Ok(Action::Flap),
            other => Err(EnvError::InvalidAction(other)),
        }
    }
}

impl From<bool> for Action {
    fn from(flap: bool) -> Self {
        if flap { Action::Flap } else { Action::Noop }
    }
}

/// Everything a single tick produced
#[derive(Debug, Clone)]
pub struct TickOutcome {
    /// Shaped reward, or the crash penalty if the tick was terminal
    pub reward: f32,
    pub breakdown: RewardBreakdown,
    pub terminal: bool,
    pub collision: Option<Collision>,
    /// Pipe removed from the front of the queue this tick, in its final position
    pub recycled: Option<Pipe>,
}

/// Advance the game state by one tick.
///
/// Fails only if the episode already ended; a reset is required first.
pub fn tick(state: &mut GameState, action: Action) -> Result<TickOutcome, EnvError> {
    if state.phase == EpisodePhase::Terminal {
        return Err(EnvError::EpisodeTerminated);
    }

    state.time_ticks += 1;

    // Gravity always accumulates; a flap then overrides it for this tick
    state.bird.apply_gravity();
    if action == Action::Flap {
        state.bird.flap();
    }
    state.bird.integrate();

    for pipe in state.pipes.iter_mut() {
        pipe.advance(PIPE_SPEED);
    }

    let recycled = if state.front_pipe().has_exited() {
        let next = state.spawn_pipe();
        let passed = state.pipes.recycle(next);
        state.score += 1;
        if state.score > state.best_score {
            state.best_score = state.score;
        }
        log::debug!(
            "pipe {} passed at tick {} (score {}, best {})",
            passed.id,
            state.time_ticks,
            state.score,
            state.best_score
        );
        Some(passed)
    } else {
        None
    };

    let mut breakdown = shape_reward(&state.bird, state.front_pipe(), action);

    let collision = detect_collision(state);
    if let Some(cause) = collision {
        breakdown.crashed = true;
        state.phase = EpisodePhase::Terminal;
        log::info!(
            "episode {} ended at tick {} by {:?}: score {}, best {}",
            state.episode,
            state.time_ticks,
            cause,
            state.score,
            state.best_score
        );
    }

    Ok(TickOutcome {
        reward: breakdown.total(),
        breakdown,
        terminal: collision.is_some(),
        collision,
        recycled,
    })
}
