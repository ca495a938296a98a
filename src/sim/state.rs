//! Game state and core simulation types
//!
//! Everything needed to continue an episode deterministically lives here.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Episode state machine. `Terminal` is left only through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Bird is alive and the episode accepts steps
    Running,
    /// Bird hit a boundary or a pipe
    Terminal,
}

/// The player/AI controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Fixed column of the bird's left edge
    pub x: f32,
    /// Top edge of the bird (grows downward)
    pub y: f32,
    /// Vertical velocity in pixels per tick (positive = falling)
    pub vel: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            x: BIRD_X,
            y: SCREEN_HEIGHT / 2.0,
            vel: 0.0,
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
        }
    }
}

impl Bird {
    /// Accumulate one tick of gravity
    #[inline]
    pub fn apply_gravity(&mut self) {
        self.vel += GRAVITY;
    }

    /// Override the current velocity with the upward impulse
    #[inline]
    pub fn flap(&mut self) {
        self.vel = FLAP_IMPULSE;
    }

    /// Advance position by the current velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.y += self.vel;
    }
}

/// A pipe: solid upper and lower segments around a fixed-size gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge, decreases every tick
    pub x: f32,
    /// Height of the upper segment, which is also the top of the gap
    pub top_height: f32,
}

impl Pipe {
    /// Spawn a pipe at `x` with a uniformly random gap position
    pub fn spawn<R: Rng>(id: u32, x: f32, rng: &mut R) -> Self {
        let top_height = rng.random_range(PIPE_TOP_MIN..PIPE_TOP_MAX) as f32;
        Self { id, x, top_height }
    }

    /// Top edge of the lower segment
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.top_height + PIPE_GAP
    }

    /// Height of the lower segment (it extends to the bottom of the screen)
    #[inline]
    pub fn bottom_height(&self) -> f32 {
        SCREEN_HEIGHT - self.bottom_y()
    }

    pub fn gap_center(&self) -> f32 {
        self.top_height + PIPE_GAP / 2.0
    }

    /// Scroll left by `speed`
    #[inline]
    pub fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// True once the pipe is more than its own width past the left boundary
    #[inline]
    pub fn has_exited(&self) -> bool {
        self.x < -PIPE_WIDTH
    }
}

/// Ordered pipe queue whose front is the nearest pipe.
///
/// The front always exists, so there is exactly one "current" pipe at every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeQueue {
    front: Pipe,
    queued: VecDeque<Pipe>,
}

impl PipeQueue {
    pub fn new(front: Pipe) -> Self {
        Self {
            front,
            queued: VecDeque::new(),
        }
    }

    /// The nearest pipe
    pub fn front(&self) -> &Pipe {
        &self.front
    }

    pub fn front_mut(&mut self) -> &mut Pipe {
        &mut self.front
    }

    /// Append a pipe behind the existing ones
    pub fn push_back(&mut self, pipe: Pipe) {
        self.queued.push_back(pipe);
    }

    /// Remove the front pipe and append `next` at the back.
    /// Returns the removed pipe.
    pub fn recycle(&mut self, next: Pipe) -> Pipe {
        let new_front = match self.queued.pop_front() {
            Some(pipe) => {
                self.queued.push_back(next);
                pipe
            }
            None => next,
        };
        std::mem::replace(&mut self.front, new_front)
    }

    /// Iterate front to back
    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        std::iter::once(&self.front).chain(self.queued.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pipe> {
        std::iter::once(&mut self.front).chain(self.queued.iter_mut())
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        1 + self.queued.len()
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Process seed for reproducibility
    pub seed: u64,
    /// Gap-height RNG, carried across resets
    pub rng: Pcg32,
    pub bird: Bird,
    pub pipes: PipeQueue,
    /// Pipes passed this episode
    pub score: u32,
    /// Highest score seen by this instance; survives resets
    pub best_score: u32,
    pub phase: EpisodePhase,
    /// Ticks elapsed in the current episode
    pub time_ticks: u64,
    /// Resets performed on this instance
    pub episode: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed, ready to step
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first = Pipe::spawn(1, SCREEN_WIDTH, &mut rng);
        Self {
            seed,
            rng,
            bird: Bird::default(),
            pipes: PipeQueue::new(first),
            score: 0,
            best_score: 0,
            phase: EpisodePhase::Running,
            time_ticks: 0,
            episode: 0,
            next_id: 2,
        }
    }

    /// Start a new episode: bird mid-screen at rest, one fresh pipe at the
    /// right boundary, score cleared. The best score is kept.
    pub fn reset(&mut self) {
        let pipe = self.spawn_pipe();
        self.bird = Bird::default();
        self.pipes = PipeQueue::new(pipe);
        self.score = 0;
        self.phase = EpisodePhase::Running;
        self.time_ticks = 0;
        self.episode += 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a pipe at the right boundary
    pub fn spawn_pipe(&mut self) -> Pipe {
        let id = self.next_entity_id();
        Pipe::spawn(id, SCREEN_WIDTH, &mut self.rng)
    }

    /// The pipe the observation tracks
    pub fn front_pipe(&self) -> &Pipe {
        self.pipes.front()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == EpisodePhase::Terminal
    }
}
