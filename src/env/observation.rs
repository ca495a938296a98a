//! Fixed four-element observation vector

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Number of components in an observation
pub const OBS_SIZE: usize = 4;

/// What an external decision maker sees each tick, in this order
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Observation {
    pub bird_y: f32,
    pub bird_vel: f32,
    /// Left edge of the nearest pipe
    pub pipe_x: f32,
    /// Upper segment height of the nearest pipe
    pub pipe_top: f32,
}

impl Observation {
    pub fn from_state(state: &GameState) -> Self {
        let pipe = state.front_pipe();
        Self {
            bird_y: state.bird.y,
            bird_vel: state.bird.vel,
            pipe_x: pipe.x,
            pipe_top: pipe.top_height,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; OBS_SIZE] {
        bytemuck::cast(self)
    }

    #[inline]
    pub fn from_array(values: [f32; OBS_SIZE]) -> Self {
        bytemuck::cast(values)
    }

    /// Borrow as a flat slice (for writing into policy input buffers)
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}
