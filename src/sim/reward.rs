//! Shaped reward
//!
//! A base survival reward plus additive bonus/penalty terms, replaced
//! wholesale by the crash penalty on the tick a collision happens.

use serde::{Deserialize, Serialize};

use super::state::{Bird, Pipe};
use super::tick::Action;
use crate::consts::*;

/// Individual reward terms for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub alive: f32,
    pub optimal_zone: f32,
    pub perfect_pass: f32,
    pub stable_flight: f32,
    pub flap_cost: f32,
    /// Set when a terminal collision overrides the shaped terms
    pub crashed: bool,
}

impl RewardBreakdown {
    /// Sum of the shaped terms, ignoring any crash
    pub fn shaped(&self) -> f32 {
        self.alive + self.optimal_zone + self.perfect_pass + self.stable_flight - self.flap_cost
    }

    /// Reward actually handed to the caller
    pub fn total(&self) -> f32 {
        if self.crashed { CRASH_PENALTY } else { self.shaped() }
    }
}

/// Compute the shaped terms from post-physics state
pub fn shape_reward(bird: &Bird, front: &Pipe, action: Action) -> RewardBreakdown {
    let in_zone = bird.y > OPTIMAL_ZONE_TOP && bird.y < OPTIMAL_ZONE_BOTTOM;
    // Exact match against the stepped position; with PIPE_SPEED = 3 this
    // happens once per pipe (400 - 3 * 100 == 100).
    #[allow(clippy::float_cmp)]
    let perfect = front.x == bird.x;
    let stable = bird.vel.abs() < STABLE_SPEED;

    RewardBreakdown {
        alive: REWARD_ALIVE,
        optimal_zone: if in_zone { REWARD_OPTIMAL_ZONE } else { 0.0 },
        perfect_pass: if perfect { REWARD_PERFECT_PASS } else { 0.0 },
        stable_flight: if stable { REWARD_STABLE_FLIGHT } else { 0.0 },
        flap_cost: if action == Action::Flap { FLAP_COST } else { 0.0 },
        crashed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_pipe() -> Pipe {
        Pipe {
            id: 1,
            x: 300.0,
            top_height: 200.0,
        }
    }

    #[test]
    fn test_base_reward_only() {
        let bird = Bird {
            y: 400.0,
            vel: 5.0,
            ..Bird::default()
        };
        let r = shape_reward(&bird, &far_pipe(), Action::Noop);
        assert_eq!(r.total(), 1.0);
    }

    #[test]
    fn test_zone_is_exclusive() {
        let mut bird = Bird {
            vel: 5.0,
            ..Bird::default()
        };
        bird.y = 200.0;
        assert_eq!(shape_reward(&bird, &far_pipe(), Action::Noop).optimal_zone, 0.0);
        bird.y = 300.0;
        assert_eq!(shape_reward(&bird, &far_pipe(), Action::Noop).optimal_zone, 0.0);
        bird.y = 250.0;
        assert_eq!(shape_reward(&bird, &far_pipe(), Action::Noop).optimal_zone, 5.0);
    }

    #[test]
    fn test_all_bonuses_stack() {
        let bird = Bird {
            y: 250.0,
            vel: -2.5,
            ..Bird::default()
        };
        let pipe = Pipe {
            x: BIRD_X,
            ..far_pipe()
        };
        let r = shape_reward(&bird, &pipe, Action::Flap);
        // 1 + 5 + 10 + 3 - 1
        assert_eq!(r.total(), 18.0);
    }

    #[test]
    fn test_perfect_pass_needs_exact_match() {
        let bird = Bird {
            y: 400.0,
            vel: 5.0,
            ..Bird::default()
        };
        let pipe = Pipe {
            x: BIRD_X + 0.5,
            ..far_pipe()
        };
        assert_eq!(shape_reward(&bird, &pipe, Action::Noop).perfect_pass, 0.0);
    }

    #[test]
    fn test_stable_flight_threshold() {
        let mut bird = Bird {
            y: 400.0,
            ..Bird::default()
        };
        bird.vel = 3.0;
        assert_eq!(shape_reward(&bird, &far_pipe(), Action::Noop).stable_flight, 0.0);
        bird.vel = -2.9;
        assert_eq!(shape_reward(&bird, &far_pipe(), Action::Noop).stable_flight, 3.0);
    }

    #[test]
    fn test_crash_overrides_everything() {
        let bird = Bird {
            y: 250.0,
            vel: 0.0,
            ..Bird::default()
        };
        let mut r = shape_reward(&bird, &far_pipe(), Action::Noop);
        assert_eq!(r.total(), 9.0);
        r.crashed = true;
        assert_eq!(r.total(), -100.0);
        assert_eq!(r.shaped(), 9.0);
    }
}
