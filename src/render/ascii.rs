//! Text renderers: a character-grid view of the playfield and a JSON lines stream

use std::io::{self, Write};

use crossterm::{cursor, queue, terminal};
use glam::Vec2;

use super::{Frame, RenderSink};
use crate::consts::*;
use crate::sim::Aabb;

const BIRD_CHAR: char = '@';
const PIPE_CHAR: char = '#';
const GROUND_CHAR: char = '=';
const SKY_CHAR: char = ' ';

/// Samples the playfield at cell centers onto a fixed character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiRenderer {
    pub cols: usize,
    pub rows: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        // 10x20 px cells, roughly square in a terminal
        Self { cols: 40, rows: 30 }
    }
}

impl AsciiRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// HUD line followed by one line per grid row
    pub fn draw(&self, frame: &Frame) -> Vec<String> {
        let cell = Vec2::new(
            SCREEN_WIDTH / self.cols as f32,
            SCREEN_HEIGHT / self.rows as f32,
        );
        let bird = Aabb::new(frame.bird_x, frame.bird_y, frame.bird_width, frame.bird_height);
        let pipes: Vec<Aabb> = frame
            .pipes
            .iter()
            .flat_map(|p| {
                [
                    Aabb::new(p.x, 0.0, p.width, p.top_height),
                    Aabb::new(p.x, p.bottom_y, p.width, p.bottom_height),
                ]
            })
            .collect();

        let mut hud = frame.hud();
        if frame.terminal {
            hud.push_str("  CRASHED");
        }

        let mut lines = Vec::with_capacity(self.rows + 1);
        lines.push(hud);
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|col| {
                    let p = (Vec2::new(col as f32, row as f32) + 0.5) * cell;
                    if bird.contains_point(p) {
                        BIRD_CHAR
                    } else if p.y >= FLOOR_Y {
                        GROUND_CHAR
                    } else if pipes.iter().any(|seg| seg.contains_point(p)) {
                        PIPE_CHAR
                    } else {
                        SKY_CHAR
                    }
                })
                .collect();
            lines.push(line);
        }
        lines
    }
}

/// Redraws the grid in place on a terminal
pub struct TerminalSink<W: Write> {
    out: W,
    renderer: AsciiRenderer,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, renderer: AsciiRenderer) -> Self {
        Self { out, renderer }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::All)
        )?;
        // Raw mode needs explicit carriage returns
        for line in self.renderer.draw(frame) {
            write!(self.out, "{line}\r\n")?;
        }
        self.out.flush()
    }
}

/// Writes one JSON object per frame, for external viewers
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}
