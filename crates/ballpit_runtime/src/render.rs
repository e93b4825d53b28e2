//! Frame sinks for the host loop.

use std::fmt::Write as _;
use std::io::{self, Write};

use ballpit_core::glam::Vec2;
use ballpit_core::math::{in_unit_domain, simulation_rng};
use ballpit_core::Renderer;
use rand::Rng;
use thiserror::Error;

/// Density ramp, from one particle per character cell to five or more.
const RAMP: &[u8] = b".:oO@";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write frame")]
    Io(#[from] io::Error),
}

/// Logs a short summary of every frame.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    type Error = RenderError;

    fn initialize(&mut self, positions: &[Vec2], diameter: f32) -> Result<(), RenderError> {
        tracing::info!(particles = positions.len(), diameter, "log renderer ready");
        Ok(())
    }

    fn update(&mut self, positions: &[Vec2]) -> Result<(), RenderError> {
        self.frames += 1;
        if positions.is_empty() {
            tracing::debug!(frame = self.frames, "empty frame");
            return Ok(());
        }
        let (lo, hi) = positions
            .iter()
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), &p| {
                (lo.min(p), hi.max(p))
            });
        let centroid = positions.iter().copied().sum::<Vec2>() / positions.len() as f32;
        tracing::debug!(
            frame = self.frames,
            centroid = ?centroid,
            min = ?lo,
            max = ?hi,
            "frame"
        );
        Ok(())
    }
}

/// ANSI truecolor density map of the unit square.
///
/// Each particle slot gets a random color when the renderer initializes. A
/// character cell takes the color of the highest slot that landed in it.
pub struct TerminalRenderer<W: Write> {
    out: W,
    columns: usize,
    rows: usize,
    seed: Option<u64>,
    colors: Vec<[u8; 3]>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, columns: u16, rows: u16, seed: Option<u64>) -> Self {
        Self {
            out,
            columns: columns.max(1) as usize,
            rows: rows.max(1) as usize,
            seed,
            colors: Vec::new(),
        }
    }

    #[cfg(test)]
    fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    /// Character cell for a position, with `y` growing upwards.
    fn cell_of(&self, p: Vec2) -> Option<usize> {
        if !in_unit_domain(p) {
            return None;
        }
        let col = ((p.x * self.columns as f32) as usize).min(self.columns - 1);
        let row = ((p.y * self.rows as f32) as usize).min(self.rows - 1);
        Some((self.rows - 1 - row) * self.columns + col)
    }

    /// One full frame, starting at the cursor home position.
    pub fn draw(&self, positions: &[Vec2]) -> String {
        let mut counts = vec![0usize; self.columns * self.rows];
        let mut last = vec![0usize; self.columns * self.rows];
        for (slot, &p) in positions.iter().enumerate() {
            if let Some(cell) = self.cell_of(p) {
                counts[cell] += 1;
                last[cell] = slot;
            }
        }

        let mut frame = String::from("\x1b[H");
        for row in 0..self.rows {
            for col in 0..self.columns {
                let cell = row * self.columns + col;
                match counts[cell] {
                    0 => frame.push(' '),
                    n => {
                        let glyph = RAMP[(n - 1).min(RAMP.len() - 1)] as char;
                        let [r, g, b] = self.colors.get(last[cell]).copied().unwrap_or([255; 3]);
                        let _ = write!(frame, "\x1b[38;2;{r};{g};{b}m{glyph}");
                    }
                }
            }
            frame.push_str("\x1b[0m\n");
        }
        frame.push_str("\x1b[0m");
        frame
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = RenderError;

    fn initialize(&mut self, positions: &[Vec2], diameter: f32) -> Result<(), RenderError> {
        let mut rng = simulation_rng(self.seed);
        self.colors = (0..positions.len())
            .map(|_| {
                let mut channel = || (rng.gen_range(0.1f32..0.99) * 255.0) as u8;
                [channel(), channel(), channel()]
            })
            .collect();
        tracing::info!(
            columns = self.columns,
            rows = self.rows,
            diameter,
            "terminal renderer ready"
        );
        // Clear once; frames only move the cursor home.
        self.out.write_all(b"\x1b[2J")?;
        self.out.flush()?;
        Ok(())
    }

    fn update(&mut self, positions: &[Vec2]) -> Result<(), RenderError> {
        let frame = self.draw(positions);
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renderer picked from settings at startup.
pub enum FrameSink {
    Log(LogRenderer),
    Terminal(TerminalRenderer<io::Stdout>),
}

impl Renderer for FrameSink {
    type Error = RenderError;

    fn initialize(&mut self, positions: &[Vec2], diameter: f32) -> Result<(), RenderError> {
        match self {
            FrameSink::Log(renderer) => renderer.initialize(positions, diameter),
            FrameSink::Terminal(renderer) => renderer.initialize(positions, diameter),
        }
    }

    fn update(&mut self, positions: &[Vec2]) -> Result<(), RenderError> {
        match self {
            FrameSink::Log(renderer) => renderer.update(positions),
            FrameSink::Terminal(renderer) => renderer.update(positions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_renderer_counts_frames() {
        let mut renderer = LogRenderer::new();
        renderer.initialize(&[Vec2::splat(0.5)], 0.004).unwrap();
        renderer.update(&[Vec2::splat(0.5), Vec2::splat(0.25)]).unwrap();
        renderer.update(&[]).unwrap();
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_colors_per_slot_in_range() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 4, 4, Some(3));
        let positions = vec![Vec2::splat(0.5); 50];
        renderer.initialize(&positions, 0.01).unwrap();

        assert_eq!(renderer.colors().len(), 50);
        let lo = (0.1f32 * 255.0) as u8;
        let hi = (0.99f32 * 255.0) as u8;
        for color in renderer.colors() {
            for &c in color {
                assert!((lo..=hi).contains(&c));
            }
        }
        assert!(renderer.into_inner().starts_with(b"\x1b[2J"));
    }

    #[test]
    fn test_seeded_colors_repeat() {
        let positions = vec![Vec2::splat(0.5); 8];
        let mut a = TerminalRenderer::new(Vec::new(), 2, 2, Some(9));
        let mut b = TerminalRenderer::new(Vec::new(), 2, 2, Some(9));
        a.initialize(&positions, 0.01).unwrap();
        b.initialize(&positions, 0.01).unwrap();
        assert_eq!(a.colors(), b.colors());
    }

    #[test]
    fn test_draw_places_particles_with_y_up() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 2, 2, Some(1));
        // Bottom-left once, top-right twice; one particle outside the domain.
        let positions = vec![
            Vec2::new(0.1, 0.1),
            Vec2::new(0.9, 0.9),
            Vec2::new(0.8, 0.7),
            Vec2::new(1.5, 0.5),
        ];
        renderer.initialize(&positions, 0.01).unwrap();
        let [r, g, b] = renderer.colors()[2];
        let [r0, g0, b0] = renderer.colors()[0];

        let frame = renderer.draw(&positions);
        let expected = format!(
            "\x1b[H \x1b[38;2;{r};{g};{b}m:\x1b[0m\n\x1b[38;2;{r0};{g0};{b0}m. \x1b[0m\n\x1b[0m"
        );
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_update_writes_frame() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 3, 1, Some(1));
        renderer.initialize(&[], 0.01).unwrap();
        renderer.update(&[]).unwrap();
        let out = renderer.into_inner();
        assert_eq!(out, b"\x1b[2J\x1b[H   \x1b[0m\n\x1b[0m".to_vec());
    }
}
