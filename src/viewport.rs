use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical pixel size of one terminal cell. Roughly a typical monospace glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 20.0,
        }
    }
}

impl CellSize {
    /// Replace unusable values with the defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            width: positive(self.width, defaults.width),
            height: positive(self.height, defaults.height),
        }
    }
}

/// A drawable area measured in terminal cells, viewed in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub cell: CellSize,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, cell: CellSize) -> Self {
        Self { cols, rows, cell }
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * self.cell.width
    }

    pub fn height_px(&self) -> f32 {
        self.rows as f32 * self.cell.height
    }

    /// Convert a terminal cell position (relative to this viewport) to the logical
    /// pixel at the cell's center
    pub fn cell_to_px(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell.width,
            (row as f32 + 0.5) * self.cell.height,
        )
    }

    pub fn is_narrow(&self, breakpoint: f32) -> bool {
        self.width_px() < breakpoint
    }
}

/// Why the animation refused to start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disabled {
    ReducedMotion,
    NarrowViewport { width: f32, breakpoint: f32 },
}

impl fmt::Display for Disabled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disabled::ReducedMotion => write!(f, "reduced motion requested"),
            Disabled::NarrowViewport { width, breakpoint } => write!(
                f,
                "viewport is {width}px wide, narrower than the {breakpoint}px breakpoint"
            ),
        }
    }
}

/// Startup policy: no animation for motion-sensitive users or on narrow viewports
pub fn check_startup(viewport: &Viewport, reduced_motion: bool, breakpoint: f32) -> Result<(), Disabled> {
    if reduced_motion {
        return Err(Disabled::ReducedMotion);
    }
    if viewport.is_narrow(breakpoint) {
        return Err(Disabled::NarrowViewport {
            width: viewport.width_px(),
            breakpoint,
        });
    }
    Ok(())
}
