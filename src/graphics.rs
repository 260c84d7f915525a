//! Terminal rasterizer: maps viewport primitives onto a grid of character
//! cells and writes only the cells that changed since the last flush.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};

use crate::palette::Rgb;
use crate::primitive::{Primitive, Stroke, BAND_FEATHER, BAND_WIDTH};
use crate::projection::Viewport;
use crate::render::Frame;
use crate::vertex::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
    };
}

/// Character grid the size of the terminal
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    /// What the terminal currently shows; `None` forces a full redraw
    shown: Option<Vec<Cell>>,
    scale: [f64; 2],
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Glyph for a line with the given cell-space direction
fn line_glyph(dx: f64, dy: f64) -> char {
    if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
        return '.';
    }
    let slope = dy.abs() / dx.abs().max(f64::EPSILON);
    if slope < 0.4 {
        '-'
    } else if slope > 2.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, viewport: &Viewport) -> Self {
        let mut canvas = Canvas {
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            shown: None,
            scale: [1.0, 1.0],
        };
        canvas.resize(cols, rows, viewport);
        canvas
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn resize(&mut self, cols: u16, rows: u16, viewport: &Viewport) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::BLANK; self.cols as usize * self.rows as usize];
        self.shown = None;
        self.scale = [
            self.cols as f64 / viewport.width,
            self.rows as f64 / viewport.height,
        ];
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: isize, row: isize) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as isize || row >= self.rows as isize {
            return None;
        }
        let index = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(index)
    }

    /// Viewport coordinates to fractional cell coordinates
    pub fn to_cell(&self, p: Point2) -> (f64, f64) {
        (p.x * self.scale[0], p.y * self.scale[1])
    }

    /// Centre of a cell in viewport coordinates
    pub fn to_viewport(&self, col: u16, row: u16) -> Point2 {
        Point2::new(
            (col as f64 + 0.5) / self.scale[0],
            (row as f64 + 0.5) / self.scale[1],
        )
    }

    fn row_of(&self, y: f64) -> isize {
        (y * self.scale[1]).floor() as isize
    }

    /// Rasterizes a whole frame, replacing the previous contents
    pub fn draw_frame(&mut self, frame: &Frame) {
        self.cells.fill(Cell::BLANK);
        for primitive in &frame.primitives {
            self.draw(primitive);
        }
    }

    pub fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::SkyGradient(stops) => self.sky(stops),
            Primitive::Flash { color, opacity } => {
                for cell in &mut self.cells {
                    cell.bg = cell.bg.mix(*color, *opacity);
                }
            }
            Primitive::Line { from, to, stroke } => {
                let (x0, y0) = self.to_cell(*from);
                let (x1, y1) = self.to_cell(*to);
                self.draw_line(x0, y0, x1, y1, stroke);
            }
            Primitive::Polyline { points, stroke } => {
                for pair in points.windows(2) {
                    let (x0, y0) = self.to_cell(pair[0]);
                    let (x1, y1) = self.to_cell(pair[1]);
                    self.draw_line(x0, y0, x1, y1, stroke);
                }
            }
            Primitive::Circle {
                center,
                radius,
                outline,
                color,
                opacity,
            } => match outline {
                Some(stroke) => self.ring(*center, *radius, stroke),
                None => self.disc(*center, *radius, *radius, *color, *opacity, Some('*')),
            },
            Primitive::Ellipse {
                center,
                radius_x,
                radius_y,
                color,
                opacity,
            } => self.disc(*center, *radius_x, *radius_y, *color, *opacity, None),
            Primitive::Band {
                x_offset,
                y,
                height,
                color,
                opacity,
            } => {
                let (top, bottom) = (self.row_of(*y), self.row_of(y + height));
                for col in 0..self.cols {
                    let u = self.to_viewport(col, 0).x - x_offset;
                    if !(0.0..=BAND_WIDTH).contains(&u) {
                        continue;
                    }
                    let edge = (u.min(BAND_WIDTH - u) / BAND_FEATHER).min(1.0);
                    for row in top..=bottom {
                        if let Some(cell) = self.cell_mut(col as isize, row) {
                            cell.bg = cell.bg.mix(*color, opacity * edge);
                        }
                    }
                }
            }
            Primitive::Label {
                at,
                text,
                color,
                opacity,
            } => {
                let (x, y) = self.to_cell(*at);
                let start = x.round() as isize - text.chars().count() as isize / 2;
                self.text(start, y.round() as isize, text, *color, *opacity);
            }
        }
    }

    fn sky(&mut self, stops: &[Rgb; 4]) {
        let last = (stops.len() - 1) as f64;
        for row in 0..self.rows {
            let t = row as f64 / self.rows.max(2).saturating_sub(1) as f64 * last;
            let i = (t.floor() as usize).min(stops.len() - 2);
            let bg = stops[i].mix(stops[i + 1], t - i as f64);
            for col in 0..self.cols {
                if let Some(cell) = self.cell_mut(col as isize, row as isize) {
                    cell.bg = bg;
                }
            }
        }
    }

    /// Plots one cell of a stroke; faint strokes blend into the background
    fn plot(&mut self, col: isize, row: isize, ch: char, stroke: &Stroke) {
        let weight = (0.35 + stroke.opacity * 0.65 + stroke.glow * 0.03).min(1.0);
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = cell.bg.mix(stroke.color, weight);
        }
    }

    /// Draws a line between two cell positions using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, stroke: &Stroke) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let glyph = line_glyph(x1 - x0, y1 - y0);
        let limit = 4 * (self.cols as isize + self.rows as isize);
        let (mut x0, mut y0, x1, y1) = (
            (x0.round() as isize).clamp(-limit, limit),
            (y0.round() as isize).clamp(-limit, limit),
            (x1.round() as isize).clamp(-limit, limit),
            (y1.round() as isize).clamp(-limit, limit),
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, glyph, stroke);
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

    fn ring(&mut self, center: Point2, radius: f64, stroke: &Stroke) {
        let (cx, cy) = self.to_cell(center);
        let (rx, ry) = (radius * self.scale[0], radius * self.scale[1]);
        let steps = ((rx + ry) * 4.0).ceil().max(8.0) as usize;
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            let col = (cx + angle.cos() * rx).round() as isize;
            let row = (cy + angle.sin() * ry).round() as isize;
            self.plot(col, row, 'o', stroke);
        }
    }

    /// Tints every cell inside the ellipse; with `glyph`, also marks it
    fn disc(
        &mut self,
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        color: Rgb,
        opacity: f64,
        glyph: Option<char>,
    ) {
        let (cx, cy) = self.to_cell(center);
        let (rx, ry) = (
            (radius_x * self.scale[0]).max(0.5),
            (radius_y * self.scale[1]).max(0.5),
        );
        let opacity = opacity.clamp(0.0, 1.0);
        for row in (cy - ry).floor() as isize..=(cy + ry).ceil() as isize {
            for col in (cx - rx).floor() as isize..=(cx + rx).ceil() as isize {
                let nx = (col as f64 + 0.5 - cx) / rx;
                let ny = (row as f64 + 0.5 - cy) / ry;
                if nx * nx + ny * ny > 1.0 {
                    continue;
                }
                if let Some(cell) = self.cell_mut(col, row) {
                    match glyph {
                        Some(ch) => {
                            cell.ch = ch;
                            cell.fg = cell.bg.mix(color, 0.4 + opacity * 0.6);
                        }
                        None => cell.bg = cell.bg.mix(color, opacity),
                    }
                }
            }
        }
        // Sub-cell dots still show up
        if glyph.is_some() && rx <= 0.5 && ry <= 0.5 {
            if let Some(cell) = self.cell_mut(cx.floor() as isize, cy.floor() as isize) {
                cell.ch = '.';
                cell.fg = cell.bg.mix(color, 0.4 + opacity * 0.6);
            }
        }
    }

    /// Writes `text` starting at a cell, clipped to the grid
    pub fn text(&mut self, col: isize, row: isize, text: &str, color: Rgb, opacity: f64) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as isize, row) {
                cell.ch = ch;
                cell.fg = cell.bg.mix(color, opacity.clamp(0.0, 1.0));
            }
        }
    }

    /// Queues the changed cells and flushes them to `out`
    pub fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        let mut written = 0;
        let mut pen: Option<(Rgb, Rgb)> = None;
        let mut cursor: Option<(u16, u16)> = None;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let index = row as usize * self.cols as usize + col as usize;
                let cell = self.cells[index];
                if let Some(shown) = &self.shown {
                    if shown[index] == cell {
                        continue;
                    }
                }
                if cursor != Some((col, row)) {
                    queue!(out, MoveTo(col, row))?;
                }
                if pen != Some((cell.fg, cell.bg)) {
                    queue!(
                        out,
                        SetForegroundColor(to_color(cell.fg)),
                        SetBackgroundColor(to_color(cell.bg))
                    )?;
                    pen = Some((cell.fg, cell.bg));
                }
                queue!(out, Print(cell.ch))?;
                cursor = Some((col + 1, row));
                written += 1;
            }
        }
        out.flush()?;
        self.shown = Some(self.cells.clone());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        // One cell per 10 x 20 viewport units
        Canvas::new(90, 26, &Viewport::default())
    }

    fn glyphs(canvas: &Canvas) -> usize {
        canvas.cells.iter().filter(|c| c.ch != ' ').count()
    }

    const RED: Stroke = Stroke::new(Rgb::hex(0xFF0000), 1.0, 1.0);

    #[test]
    fn viewport_maps_onto_cells() {
        let c = canvas();
        let (col, row) = c.to_cell(Point2::new(450.0, 260.0));
        assert!((col - 45.0).abs() < 1e-9 && (row - 13.0).abs() < 1e-9);
        assert_eq!(c.size(), (90, 26));
    }

    #[test]
    fn horizontal_line_fills_its_row() {
        let mut c = canvas();
        c.draw_line(2.0, 5.0, 11.0, 5.0, &RED);
        assert_eq!(glyphs(&c), 10);
        assert_eq!(c.cell(2, 5).map(|cell| cell.ch), Some('-'));
        assert_eq!(c.cell(11, 5).map(|cell| cell.fg), Some(Rgb::hex(0xFF0000)));
    }

    #[test]
    fn glyphs_follow_slope() {
        assert_eq!(line_glyph(10.0, 0.0), '-');
        assert_eq!(line_glyph(0.0, 10.0), '|');
        assert_eq!(line_glyph(5.0, 5.0), '\\');
        assert_eq!(line_glyph(5.0, -5.0), '/');
        assert_eq!(line_glyph(0.0, 0.0), '.');
    }

    #[test]
    fn off_screen_lines_are_clipped() {
        let mut c = canvas();
        c.draw_line(-500.0, -500.0, -400.0, -300.0, &RED);
        assert_eq!(glyphs(&c), 0);
        c.draw_line(f64::NAN, 0.0, 3.0, 3.0, &RED);
        assert_eq!(glyphs(&c), 0);
    }

    #[test]
    fn sky_gradient_runs_top_to_bottom() {
        let mut c = canvas();
        let stops = [
            Rgb::hex(0x000000),
            Rgb::hex(0x202020),
            Rgb::hex(0x404040),
            Rgb::hex(0x606060),
        ];
        c.draw(&Primitive::SkyGradient(stops));
        assert_eq!(c.cell(0, 0).map(|cell| cell.bg), Some(stops[0]));
        assert_eq!(c.cell(0, 25).map(|cell| cell.bg), Some(stops[3]));
    }

    #[test]
    fn labels_are_centred() {
        let mut c = canvas();
        c.draw(&Primitive::Label {
            at: Point2::new(450.0, 100.0),
            text: "ABCD".to_string(),
            color: Rgb::WHITE,
            opacity: 1.0,
        });
        assert_eq!(c.cell(43, 5).map(|cell| cell.ch), Some('A'));
        assert_eq!(c.cell(46, 5).map(|cell| cell.ch), Some('D'));
    }

    #[test]
    fn bands_start_at_their_offset_and_feather_in() {
        let mut c = canvas();
        let band = |x_offset| Primitive::Band {
            x_offset,
            y: 200.0,
            height: 40.0,
            color: Rgb::WHITE,
            opacity: 0.5,
        };
        c.draw(&band(300.0));
        let bg = |c: &Canvas, col| c.cell(col, 11).map(|cell| cell.bg);
        // Cells are 10 units wide: column 29 is left of the band, 31 sits in
        // its feathered edge and 40 is fully inside
        assert_eq!(bg(&c, 29), Some(Rgb::BLACK));
        assert_eq!(bg(&c, 31), Some(Rgb::BLACK.mix(Rgb::WHITE, 0.5 * 15.0 / 60.0)));
        assert_eq!(bg(&c, 40), Some(Rgb::BLACK.mix(Rgb::WHITE, 0.5)));
        assert_eq!(c.cell(40, 5).map(|cell| cell.bg), Some(Rgb::BLACK));

        let mut shifted = canvas();
        shifted.draw(&band(-20.0));
        assert_ne!(bg(&shifted, 0), Some(Rgb::BLACK));
        assert_eq!(bg(&shifted, 0), Some(Rgb::BLACK.mix(Rgb::WHITE, 0.5 * 25.0 / 60.0)));
    }

    #[test]
    fn flush_writes_only_changes() {
        let mut c = Canvas::new(8, 4, &Viewport::default());
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(c.flush(&mut out).unwrap(), 32);
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(c.flush(&mut out).unwrap(), 0);
        c.text(1, 1, "hi", Rgb::WHITE, 1.0);
        let mut out: Vec<u8> = Vec::new();
        assert_eq!(c.flush(&mut out).unwrap(), 2);
        assert!(String::from_utf8_lossy(&out).contains('h'));
    }

    #[test]
    fn resize_forces_a_full_redraw() {
        let mut c = Canvas::new(8, 4, &Viewport::default());
        c.flush(&mut Vec::<u8>::new()).unwrap();
        c.resize(10, 5, &Viewport::default());
        assert_eq!(c.flush(&mut Vec::<u8>::new()).unwrap(), 50);
    }
}
