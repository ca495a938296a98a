//! Presentation sinks
//!
//! The simulation never draws. Each tick a driver captures a [`Frame`] and
//! hands it to a [`RenderSink`]; nothing flows back into the core.

mod ascii;

pub use ascii::{AsciiRenderer, JsonLinesSink, TerminalSink};

use std::io;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::GameState;

/// Render-facing view of one pipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeFrame {
    pub x: f32,
    pub width: f32,
    pub top_height: f32,
    pub bottom_y: f32,
    pub bottom_height: f32,
}

/// Everything a sink needs to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub episode: u32,
    pub tick: u64,
    pub bird_x: f32,
    pub bird_y: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub pipes: Vec<PipeFrame>,
    pub score: u32,
    pub best_score: u32,
    pub terminal: bool,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let pipes = state
            .pipes
            .iter()
            .map(|p| PipeFrame {
                x: p.x,
                width: PIPE_WIDTH,
                top_height: p.top_height,
                bottom_y: p.bottom_y(),
                bottom_height: p.bottom_height(),
            })
            .collect();

        Self {
            episode: state.episode,
            tick: state.time_ticks,
            bird_x: state.bird.x,
            bird_y: state.bird.y,
            bird_width: state.bird.width,
            bird_height: state.bird.height,
            pipes,
            score: state.score,
            best_score: state.best_score,
            terminal: state.is_terminal(),
        }
    }

    /// Scoreboard line shown above the playfield
    pub fn hud(&self) -> String {
        format!("Score: {}  Best: {}", self.score, self.best_score)
    }
}

/// Consumer of per-tick frames
pub trait RenderSink {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Sink that discards every frame (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(17);
        state.reset();
        state.score = 2;
        state.best_score = 5;
        let frame = Frame::capture(&state);

        assert_eq!(frame.bird_x, BIRD_X);
        assert_eq!(frame.bird_y, 300.0);
        assert_eq!(frame.pipes.len(), 1);
        let pipe = &frame.pipes[0];
        assert_eq!(pipe.x, SCREEN_WIDTH);
        assert_eq!(pipe.bottom_y, pipe.top_height + PIPE_GAP);
        assert_eq!(pipe.bottom_y + pipe.bottom_height, SCREEN_HEIGHT);
        assert_eq!(frame.hud(), "Score: 2  Best: 5");
        assert!(!frame.terminal);
    }

    #[test]
    fn test_null_sink_accepts_frames() {
        let state = GameState::new(1);
        let mut sink = NullSink;
        assert!(sink.present(&Frame::capture(&state)).is_ok());
    }
}
