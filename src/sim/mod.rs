//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete tick per step, no wall-clock time
//! - Seeded RNG only
//! - No rendering, input, or platform dependencies

pub mod collision;
pub mod reward;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Collision, detect_collision};
pub use reward::{RewardBreakdown, shape_reward};
pub use state::{Bird, EpisodePhase, GameState, Pipe, PipeQueue};
pub use tick::{Action, TickOutcome, tick};
