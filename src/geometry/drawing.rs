//! Uniform generator output handed to the host.
//!
//! Each generator returns its own typed result (sides, branch layers,
//! ellipses, bolts); all of them convert into a [`Drawing`] so a host can
//! render or serialize any generator the same way.

use super::Point;
use crate::color::Color;
use serde::Serialize;

/// One stroked polyline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    /// Logical layer name (e.g. "side 2", "depth 3").
    pub layer: String,
    pub points: Vec<Point>,
    pub color: Color,
    /// Brush width in pixels.
    pub width: f64,
    /// Opacity in [0, 1].
    pub opacity: f64,
    /// Connect the last point back to the first.
    pub closed: bool,
    /// Fade opacity linearly from full at the first point to zero at the last.
    pub fade: bool,
}

impl Stroke {
    pub fn new(layer: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            layer: layer.into(),
            points,
            color: Color::BLACK,
            width: 1.0,
            opacity: 1.0,
            closed: false,
            fade: false,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width.max(0.0);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn fade(mut self) -> Self {
        self.fade = true;
        self
    }
}

/// A finished set of strokes over a canvas of known size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Drawing {
    pub width: u32,
    pub height: u32,
    pub strokes: Vec<Stroke>,
}

impl Drawing {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
        }
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Total number of points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Axis-aligned bounds of every point, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point, Point)> {
        super::bounds(self.strokes.iter().flat_map(|s| s.points.iter()))
    }
}
