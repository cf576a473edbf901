//! Terminal backend
//!
//! Rasterizes the 800x600 playfield onto the terminal's character grid and
//! writes the frame with crossterm. Shapes are drawn into a cell buffer first
//! so later primitives overwrite earlier ones, then each row is flushed as
//! runs of equal color.

use std::io::Write;

use crossterm::{QueueableCommand, cursor, style, terminal};
use glam::Vec2;

use super::canvas::{Canvas, Stroke};
use crate::Color;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;

/// Fills with alpha below this are drawn as a blank dimming layer
const TRANSLUCENT_ALPHA: u8 = 255;
/// Particles fainter than this use the small dot glyph
const FAINT_ALPHA: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg,
        }
    }
}

/// Canvas that draws into a terminal through any `Write` sink
pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    background: Color,
}

impl<W: Write> TerminalCanvas<W> {
    /// Create a canvas sized to a `cols` x `rows` grid
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            out,
            cols,
            rows,
            cells: vec![Cell::blank(Color::BLACK); cols as usize * rows as usize],
            background: Color::BLACK,
        }
    }

    /// Create a canvas sized to the current terminal
    pub fn from_terminal(out: W) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::new(out, cols, rows))
    }

    /// Adopt a new grid size (terminal resize event)
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::blank(self.background); self.cols as usize * self.rows as usize];
        log::debug!("Terminal canvas resized to {}x{}", self.cols, self.rows);
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Consume the canvas, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Logical x to column (may be out of range)
    fn col(&self, x: f32) -> i32 {
        (x / SCREEN_WIDTH * self.cols as f32).floor() as i32
    }

    /// Logical y to row (may be out of range)
    fn row(&self, y: f32) -> i32 {
        (y / SCREEN_HEIGHT * self.rows as f32).floor() as i32
    }

    /// Inclusive cell span covered by a rectangle; at least one cell
    fn span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let c0 = self.col(rect.left());
        let r0 = self.row(rect.top());
        let c1 = (self.col(rect.right() - 0.01)).max(c0);
        let r1 = (self.row(rect.bottom() - 0.01)).max(r0);
        (c0, r0, c1, r1)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn shade(&mut self, col: i32, row: i32, bg: Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            *cell = Cell::blank(bg);
        }
    }

    /// Character at a cell, for inspection in tests
    #[cfg(test)]
    fn char_at(&self, col: u16, row: u16) -> char {
        self.cells[row as usize * self.cols as usize + col as usize].ch
    }
}

fn to_crossterm(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn fill(&mut self, color: Color) {
        self.background = color;
        self.cells.fill(Cell::blank(color));
    }

    fn rect(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        let (c0, r0, c1, r1) = self.span(rect);
        match stroke {
            Stroke::Fill if color.a < TRANSLUCENT_ALPHA => {
                // Overlay: blank out everything underneath
                let bg = self.background;
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        self.shade(col, row, bg);
                    }
                }
            }
            Stroke::Fill => {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        self.put(col, row, '█', color);
                    }
                }
            }
            Stroke::Outline => {
                // Too small to show a border without hiding the fill
                if r1 - r0 < 2 || c1 - c0 < 2 {
                    return;
                }
                for col in c0..=c1 {
                    self.put(col, r0, '─', color);
                    self.put(col, r1, '─', color);
                }
                for row in r0..=r1 {
                    self.put(c0, row, '│', color);
                    self.put(c1, row, '│', color);
                }
                self.put(c0, r0, '┌', color);
                self.put(c1, r0, '┐', color);
                self.put(c0, r1, '└', color);
                self.put(c1, r1, '┘', color);
            }
        }
    }

    fn ellipse(&mut self, rect: Rect, color: Color, stroke: Stroke) {
        if stroke == Stroke::Outline {
            return;
        }
        let ch = if color.a < FAINT_ALPHA { '·' } else { '●' };
        let (c0, r0, c1, r1) = self.span(rect);
        let round = c1 - c0 >= 2 && r1 - r0 >= 2;
        for row in r0..=r1 {
            for col in c0..=c1 {
                // Large spans leave their corners empty
                let corner = (col == c0 || col == c1) && (row == r0 || row == r1);
                if round && corner {
                    continue;
                }
                self.put(col, row, ch, color);
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (mut x0, mut y0) = (self.col(from.x), self.row(from.y));
        let (x1, y1) = (self.col(to.x - 0.01), self.row(to.y - 0.01));
        let ch = match (x1 - x0).signum() * (y1 - y0).signum() {
            0 if y1 == y0 => '─',
            0 => '│',
            1 => '╲',
            _ => '╱',
        };

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, ch, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        let row = self.row(pos.y);
        let start = self.col(pos.x).max(0);
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        let cols = self.cols as usize;
        for (row, line) in self.cells.chunks(cols).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;

            let mut run = String::with_capacity(cols);
            let mut current: Option<(Color, Color)> = None;
            for cell in line {
                let colors = (cell.fg, cell.bg);
                if current != Some(colors) {
                    if !run.is_empty() {
                        self.out.queue(style::Print(&run))?;
                        run.clear();
                    }
                    self.out.queue(style::SetForegroundColor(to_crossterm(cell.fg)))?;
                    self.out.queue(style::SetBackgroundColor(to_crossterm(cell.bg)))?;
                    current = Some(colors);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                self.out.queue(style::Print(&run))?;
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas<Vec<u8>> {
        // 10 px per column, 20 px per row
        TerminalCanvas::new(Vec::new(), 80, 30)
    }

    #[test]
    fn test_rect_maps_to_cells() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.rect(Rect::new(100.0, 100.0, 50.0, 20.0), Color::RED, Stroke::Fill);
        assert_eq!(canvas.char_at(10, 5), '█');
        assert_eq!(canvas.char_at(14, 5), '█');
        assert_eq!(canvas.char_at(15, 5), ' ');
        assert_eq!(canvas.char_at(10, 6), ' ');
    }

    #[test]
    fn test_small_outline_is_skipped() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        let brick = Rect::new(15.0, 50.0, 75.0, 30.0);
        canvas.rect(brick, Color::RED, Stroke::Fill);
        canvas.rect(brick, Color::WHITE, Stroke::Outline);
        assert_eq!(canvas.char_at(1, 2), '█');
    }

    #[test]
    fn test_text_clips_at_edge() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.text(Vec2::new(770.0, 0.0), "Lives: 3", Color::WHITE);
        assert_eq!(canvas.char_at(77, 0), 'L');
        assert_eq!(canvas.char_at(79, 0), 'v');
    }

    #[test]
    fn test_translucent_fill_blanks() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.text(Vec2::new(0.0, 0.0), "Score", Color::WHITE);
        canvas.rect(
            Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
            Color::BLACK.with_alpha(180),
            Stroke::Fill,
        );
        assert_eq!(canvas.char_at(0, 0), ' ');
    }

    #[test]
    fn test_diagonal_line() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.line(Vec2::new(0.0, 0.0), Vec2::new(40.0, 80.0), Color::RED);
        assert_eq!(canvas.char_at(0, 0), '╲');
        assert_eq!(canvas.char_at(3, 3), '╲');
    }

    #[test]
    fn test_present_writes_frame() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.text(Vec2::new(0.0, 0.0), "GAME OVER", Color::RED);
        canvas.present().unwrap();
        let bytes = canvas.into_inner();
        let output = String::from_utf8_lossy(&bytes);
        assert!(output.contains("GAME OVER"));
    }

    #[test]
    fn test_offscreen_draws_are_ignored() {
        let mut canvas = canvas();
        canvas.fill(Color::BLACK);
        canvas.rect(Rect::new(-50.0, 700.0, 20.0, 20.0), Color::RED, Stroke::Fill);
        canvas.ellipse(Rect::new(900.0, 10.0, 15.0, 15.0), Color::WHITE, Stroke::Fill);
        assert!(canvas.cells.iter().all(|c| c.ch == ' '));
    }
}
