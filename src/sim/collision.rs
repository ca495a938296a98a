//! Collision detection for the bird against the playfield and pipes
//!
//! Everything is an axis-aligned box in screen space (y grows downward).
//! Boxes touching along an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bird, GameState, Pipe};
use crate::consts::*;

/// Axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// A box with no area can't collide with anything
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: min edges inside, max edges outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x < max.x && p.y >= self.min.y && p.y < max.y
    }

    /// Strict overlap test
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Which part of a pipe was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Upper,
    Lower,
}

/// Terminal collision cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    /// Bird rose above the top of the screen
    Ceiling,
    /// Bird reached the ground strip
    Ground,
    /// Bird overlapped a pipe segment
    Pipe { id: u32, segment: Segment },
}

/// Bird bounding box
pub fn bird_aabb(bird: &Bird) -> Aabb {
    Aabb::new(bird.x, bird.y, bird.width, bird.height)
}

/// Upper and lower segments of a pipe
pub fn pipe_segments(pipe: &Pipe) -> [Aabb; 2] {
    [
        Aabb::new(pipe.x, 0.0, PIPE_WIDTH, pipe.top_height),
        Aabb::new(pipe.x, pipe.bottom_y(), PIPE_WIDTH, pipe.bottom_height()),
    ]
}

/// Check a bird against the vertical playfield bounds
pub fn boundary_collision(bird: &Bird) -> Option<Collision> {
    if bird.y < 0.0 {
        Some(Collision::Ceiling)
    } else if bird.y >= FLOOR_Y {
        Some(Collision::Ground)
    } else {
        None
    }
}

/// Check a bird against both segments of a pipe
pub fn bird_pipe_collision(bird: &Bird, pipe: &Pipe) -> Option<Collision> {
    let bird_box = bird_aabb(bird);
    let [upper, lower] = pipe_segments(pipe);
    if bird_box.intersects(&upper) {
        Some(Collision::Pipe {
            id: pipe.id,
            segment: Segment::Upper,
        })
    } else if bird_box.intersects(&lower) {
        Some(Collision::Pipe {
            id: pipe.id,
            segment: Segment::Lower,
        })
    } else {
        None
    }
}

/// First terminal collision in the current state, bounds before pipes
pub fn detect_collision(state: &GameState) -> Option<Collision> {
    boundary_collision(&state.bird).or_else(|| {
        state
            .pipes
            .iter()
            .find_map(|pipe| bird_pipe_collision(&state.bird, pipe))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipe_at(x: f32, top_height: f32) -> Pipe {
        Pipe {
            id: 9,
            x,
            top_height,
        }
    }

    #[test]
    fn test_aabb_overlap_and_touching() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.intersects(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Aabb::new(0.0, 10.0, 10.0, 10.0)));
        // Empty boxes never collide
        assert!(!a.intersects(&Aabb::new(2.0, 2.0, 0.0, 5.0)));
    }

    #[test]
    fn test_boundary_collision() {
        let mut bird = Bird::default();
        assert_eq!(boundary_collision(&bird), None);

        bird.y = -0.5;
        assert_eq!(boundary_collision(&bird), Some(Collision::Ceiling));

        bird.y = 0.0;
        assert_eq!(boundary_collision(&bird), None);

        bird.y = FLOOR_Y - 0.5;
        assert_eq!(boundary_collision(&bird), None);

        bird.y = FLOOR_Y;
        assert_eq!(boundary_collision(&bird), Some(Collision::Ground));
    }

    #[test]
    fn test_bird_in_gap_is_safe() {
        let bird = Bird {
            y: 210.0,
            ..Bird::default()
        };
        // Gap spans 200..350, bird spans 210..240
        assert_eq!(bird_pipe_collision(&bird, &pipe_at(BIRD_X, 200.0)), None);
    }

    #[test]
    fn test_bird_hits_upper_segment() {
        let bird = Bird {
            y: 190.0,
            ..Bird::default()
        };
        assert_eq!(
            bird_pipe_collision(&bird, &pipe_at(80.0, 200.0)),
            Some(Collision::Pipe {
                id: 9,
                segment: Segment::Upper
            })
        );
    }

    #[test]
    fn test_bird_hits_lower_segment() {
        let bird = Bird {
            y: 330.0,
            ..Bird::default()
        };
        assert_eq!(
            bird_pipe_collision(&bird, &pipe_at(120.0, 200.0)),
            Some(Collision::Pipe {
                id: 9,
                segment: Segment::Lower
            })
        );
    }

    #[test]
    fn test_pipe_clear_horizontally() {
        let bird = Bird {
            y: 10.0,
            ..Bird::default()
        };
        // Pipe right edge exactly at bird left edge
        assert_eq!(bird_pipe_collision(&bird, &pipe_at(BIRD_X - PIPE_WIDTH, 200.0)), None);
        // Pipe left edge exactly at bird right edge
        assert_eq!(bird_pipe_collision(&bird, &pipe_at(BIRD_X + BIRD_WIDTH, 200.0)), None);
    }

    #[test]
    fn test_detect_prefers_bounds() {
        let mut state = GameState::new(1);
        state.bird.y = FLOOR_Y + 10.0;
        state.pipes.front_mut().x = BIRD_X;
        assert_eq!(detect_collision(&state), Some(Collision::Ground));
    }
}
