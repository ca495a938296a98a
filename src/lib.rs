//! Flappy Gym - a side-scrolling obstacle game and reinforcement learning environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, reward)
//! - `env`: Step/reset adapter with a fixed observation and action space
//! - `policy`: Decision makers that turn observations into actions
//! - `render`: Presentation sinks consuming per-tick frames
//! - `driver`: Episode loops shared by the binary's play modes

pub mod driver;
pub mod env;
pub mod error;
pub mod policy;
pub mod render;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use env::{FlappyEnv, Observation, Step};
pub use error::EnvError;
pub use scoreboard::Scoreboard;
pub use settings::Settings;
pub use sim::Action;

/// Game configuration constants (source units are pixels and ticks)
pub mod consts {
    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Height of the ground strip at the bottom of the playfield
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// First y at which the bird counts as having hit the ground
    pub const FLOOR_Y: f32 = SCREEN_HEIGHT - GROUND_HEIGHT;

    /// Downward acceleration added to the bird's velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity the bird is set to (not accelerated by) on a flap
    pub const FLAP_IMPULSE: f32 = -10.0;

    /// Bird defaults - fixed column, box anchored at the top-left corner
    pub const BIRD_X: f32 = 100.0;
    pub const BIRD_WIDTH: f32 = 40.0;
    pub const BIRD_HEIGHT: f32 = 30.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const PIPE_GAP: f32 = 150.0;
    /// Horizontal distance a pipe travels per tick
    pub const PIPE_SPEED: f32 = 3.0;
    /// Upper segment height range, `[MIN, MAX)`
    pub const PIPE_TOP_MIN: u32 = 100;
    pub const PIPE_TOP_MAX: u32 = SCREEN_HEIGHT as u32 - 200;

    /// Reward shaping terms
    pub const REWARD_ALIVE: f32 = 1.0;
    pub const REWARD_OPTIMAL_ZONE: f32 = 5.0;
    pub const REWARD_PERFECT_PASS: f32 = 10.0;
    pub const REWARD_STABLE_FLIGHT: f32 = 3.0;
    /// Speeds strictly below this count as stable flight
    pub const STABLE_SPEED: f32 = 3.0;
    pub const FLAP_COST: f32 = 1.0;
    /// Replaces the shaped reward on the tick a collision happens
    pub const CRASH_PENALTY: f32 = -100.0;

    /// Optimal flying band, exclusive on both ends
    pub const OPTIMAL_ZONE_TOP: f32 = SCREEN_HEIGHT / 3.0;
    pub const OPTIMAL_ZONE_BOTTOM: f32 = SCREEN_HEIGHT / 2.0;

    /// Presentation frame rate for the interactive drivers
    pub const TICKS_PER_SECOND: u32 = 30;
}

/// Convert a duration in ticks to seconds at the given tick rate
#[inline]
pub fn ticks_to_secs(ticks: u64, ticks_per_second: u32) -> f32 {
    ticks as f32 / ticks_per_second.max(1) as f32
}
