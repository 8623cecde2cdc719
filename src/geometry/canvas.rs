//! # Canvas
//!
//! The rectangular working area geometry is generated for. Hosts resolve
//! percentage parameters against it and generators clamp stray points into
//! its padded interior.

use super::Point;
use serde::{Deserialize, Serialize};

/// Default boundary padding (5% of each dimension).
pub const DEFAULT_PADDING: f64 = 0.05;

/// Working area dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Fraction of each dimension kept clear by [`Canvas::clamp`].
    pub padding: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: DEFAULT_PADDING,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.clamp(0.0, 0.5);
        self
    }

    #[inline]
    pub fn width_f(&self) -> f64 {
        self.width as f64
    }

    #[inline]
    pub fn height_f(&self) -> f64 {
        self.height as f64
    }

    /// Clamp `p` into `[padding * dim, (1 - padding) * dim]` on each axis.
    pub fn clamp(&self, p: Point) -> Point {
        let (w, h) = (self.width_f(), self.height_f());
        let (px, py) = (w * self.padding, h * self.padding);
        Point::new(p.x.max(px).min(w - px), p.y.max(py).min(h - py))
    }

    /// Whether `p` lies inside the padded interior.
    pub fn contains(&self, p: Point) -> bool {
        self.clamp(p) == p
    }

    /// Resolve a percentage position into whole pixels.
    pub fn point_at_percent(&self, x_percent: f64, y_percent: f64) -> Point {
        Point::new(
            (self.width_f() * x_percent * 0.01).trunc(),
            (self.height_f() * y_percent * 0.01).trunc(),
        )
    }

    /// Resolve a percentage of the width into whole pixels.
    pub fn width_percent(&self, percent: f64) -> f64 {
        (self.width_f() * percent * 0.01).trunc()
    }

    /// Resolve a percentage of the height into whole pixels.
    pub fn height_percent(&self, percent: f64) -> f64 {
        (self.height_f() * percent * 0.01).trunc()
    }
}
