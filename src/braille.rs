use crate::color::Rgba;
use crate::surface::Surface;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Alpha multiplier applied when compositing onto the terminal's black background.
/// Cells can't blend, so faint paints need a boost to stay visible.
const ALPHA_GAIN: f32 = 2.0;

/// A single rendered Braille cell with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Drawing surface backed by terminal cells. Logical pixel coordinates are mapped to
/// braille dots; each cell takes the color of the most opaque paint that touched it.
pub struct BrailleCanvas {
    cols: u16,
    rows: u16,
    /// Logical px covered by one dot horizontally and vertically
    dot_width: f32,
    dot_height: f32,
    patterns: Vec<u8>,
    paints: Vec<Option<Rgba>>,
}

impl BrailleCanvas {
    /// `cell_width` x `cell_height` is the logical pixel size of one terminal cell
    pub fn new(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        let len = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            dot_width: (cell_width / 2.0).max(f32::EPSILON),
            dot_height: (cell_height / 4.0).max(f32::EPSILON),
            patterns: vec![0; len],
            paints: vec![None; len],
        }
    }

    fn dots_wide(&self) -> i64 {
        self.cols as i64 * 2
    }

    fn dots_high(&self) -> i64 {
        self.rows as i64 * 4
    }

    /// Logical px to dot index, with the far edge folded onto the last dot
    fn to_dot(&self, x: f32, y: f32) -> (i64, i64) {
        let dx = (x / self.dot_width).floor() as i64;
        let dy = (y / self.dot_height).floor() as i64;
        (
            if dx == self.dots_wide() { dx - 1 } else { dx },
            if dy == self.dots_high() { dy - 1 } else { dy },
        )
    }

    fn set_dot(&mut self, dx: i64, dy: i64, color: Rgba) {
        if dx < 0 || dy < 0 || dx >= self.dots_wide() || dy >= self.dots_high() {
            return;
        }
        let idx = (dy / 4) as usize * self.cols as usize + (dx / 2) as usize;
        self.patterns[idx] |= BRAILLE_DOTS[(dx % 2) as usize][(dy % 4) as usize];
        match self.paints[idx] {
            Some(existing) if existing.a >= color.a => {}
            _ => self.paints[idx] = Some(color),
        }
    }

    /// Emit every cell with at least one dot set
    pub fn cells(&self) -> Vec<BrailleCell> {
        let mut cells = Vec::new();
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let idx = cy as usize * self.cols as usize + cx as usize;
                let pattern = self.patterns[idx];
                if pattern == 0 {
                    continue;
                }
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');
                let color = self.paints[idx]
                    .map(|paint| paint.over_black(ALPHA_GAIN))
                    .unwrap_or(Color::White);
                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color,
                });
            }
        }
        cells
    }
}

impl Surface for BrailleCanvas {
    fn size(&self) -> (f32, f32) {
        (
            self.dots_wide() as f32 * self.dot_width,
            self.dots_high() as f32 * self.dot_height,
        )
    }

    fn clear(&mut self) {
        self.patterns.fill(0);
        self.paints.fill(None);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        // The center dot is always lit so particles smaller than a dot still show
        let (cx, cy) = self.to_dot(x, y);
        self.set_dot(cx, cy, color);

        let (min_x, min_y) = self.to_dot(x - radius, y - radius);
        let (max_x, max_y) = self.to_dot(x + radius, y + radius);
        let radius_sq = radius * radius;
        for dy in min_y..=max_y {
            for dx in min_x..=max_x {
                let px = (dx as f32 + 0.5) * self.dot_width - x;
                let py = (dy as f32 + 0.5) * self.dot_height - y;
                if px * px + py * py <= radius_sq {
                    self.set_dot(dx, dy, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return;
        }
        let (ax, ay) = self.to_dot(x0, y0);
        let (bx, by) = self.to_dot(x1, y1);
        let steps = (bx - ax).abs().max((by - ay).abs());
        if steps == 0 {
            self.set_dot(ax, ay, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let dx = ax as f32 + (bx - ax) as f32 * t;
            let dy = ay as f32 + (by - ay) as f32 * t;
            self.set_dot(dx.round() as i64, dy.round() as i64, color);
        }
    }
}
