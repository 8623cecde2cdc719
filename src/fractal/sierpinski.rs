//! # Sierpinski Triangles
//!
//! Sierpinski triangle traced as line segments, replicated into three sides.
//!
//! Each step splits a base segment into the seven segments of the
//! canonical construction (bottom-left, bottom-right, top triangles and
//! their connectors) and recurses on each. Terminal segments contribute
//! both endpoints, so one side holds `2 * 7^depth` points.

use super::polygon;
use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Polyline, Stroke};
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_3;
use std::fmt;

pub const MAX_DEPTH: u32 = 6;
const SIDES: usize = 3;
const SIDE_ROTATION: f64 = 120.0;

/// Parameters for the Sierpinski generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Subdivision depth, 0 to 6. Default: 3
    #[serde(deserialize_with = "super::deserialize_count")]
    pub max_depth: u32,
    /// Length of the base side in pixels. Default: 200
    #[serde(deserialize_with = "super::deserialize_count")]
    pub size: u32,
    /// Stroke color. Default: black
    pub color: Color,
    /// Stroke width in pixels. Default: 1.0
    pub brush: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_depth: 3,
            size: 200,
            color: Color::BLACK,
            brush: 1.0,
        }
    }
}

impl Params {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            max_depth: rng.random_range(1..=5),
            size: rng.random_range(120..=260),
            ..Self::default()
        }
    }

    pub fn clamped(&self) -> Self {
        Self {
            max_depth: self.max_depth.min(MAX_DEPTH),
            size: self.size.max(1),
            color: self.color,
            brush: self.brush.max(0.0),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth={} size={}", self.max_depth, self.size)
    }
}

/// Output of the Sierpinski generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SierpinskiShape {
    pub start: Point,
    pub end: Point,
    /// Three sides of `2 * 7^depth` points: consecutive pairs are segments.
    pub sides: Vec<Polyline>,
}

/// Trace one Sierpinski side from `start` to `end`.
pub fn curve(start: Point, end: Point, max_depth: u32) -> Polyline {
    let mut points = Vec::with_capacity(2 * 7usize.pow(max_depth));
    subdivide(start, end, 0, max_depth, &mut points);
    points
}

fn subdivide(a: Point, end: Point, depth: u32, max_depth: u32, out: &mut Polyline) {
    if depth >= max_depth {
        out.push(a);
        out.push(end);
        return;
    }

    let length = a.distance(end) * 0.5;
    let heading = end.angle_of(a);

    let b = a.make_point(length, heading); // bottom middle
    let c = a.make_point(2.0 * length, heading); // bottom right
    let d = a.make_point(length, heading - FRAC_PI_3); // middle left
    let e = a.make_point(2.0 * length, heading - FRAC_PI_3); // top
    let f = e.make_point(length, heading + FRAC_PI_3); // middle right

    let next = depth + 1;
    subdivide(a, b, next, max_depth, out);
    subdivide(b, d, next, max_depth, out);
    subdivide(d, f, next, max_depth, out);
    subdivide(f, b, next, max_depth, out);
    subdivide(b, c, next, max_depth, out);
    subdivide(c, e, next, max_depth, out);
    subdivide(e, a, next, max_depth, out);
}

/// Generate the three-sided figure on `canvas`.
pub fn generate(params: &Params, canvas: &Canvas) -> SierpinskiShape {
    let p = params.clamped();
    let size = p.size as f64;

    let start = Point::new(
        ((canvas.width_f() - size) / 2.0).floor(),
        (canvas.height_f() * 0.5).trunc(),
    );
    let end = start.translate(size, 0.0);

    let line = curve(start, end, p.max_depth);
    let mut sides = polygon::replicate(&line, SIDES, SIDE_ROTATION, start, end);
    polygon::center_vertically(&mut sides, canvas.height_f());

    debug!("sierpinski: {} points per side ({})", line.len(), p);

    SierpinskiShape { start, end, sides }
}

impl SierpinskiShape {
    /// One stroke per segment, since consecutive segments are not joined.
    pub fn to_drawing(&self, canvas: &Canvas, color: Color, brush: f64) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);
        for (i, side) in self.sides.iter().enumerate() {
            for pair in side.chunks_exact(2) {
                drawing.push(
                    Stroke::new(format!("side {}", i), pair.to_vec())
                        .color(color)
                        .width(brush),
                );
            }
        }
        drawing
    }
}

/// Sierpinski triangle generator.
#[derive(Debug, Clone, Default)]
pub struct Sierpinski {
    params: Params,
}

impl Sierpinski {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            params: Params::random(rng),
        }
    }
}

impl super::Generator for Sierpinski {
    fn name(&self) -> &'static str {
        "sierpinski"
    }

    fn draw(&self, canvas: &Canvas, _rng: &mut dyn RngCore) -> Drawing {
        let p = self.params.clamped();
        generate(&p, canvas).to_drawing(canvas, p.color, p.brush)
    }

    fn params_description(&self) -> String {
        self.params.to_string()
    }

    fn set_param(&mut self, name: &str, value: &str) -> Result<(), String> {
        use super::{parse_count, parse_value};
        match name {
            "max_depth" | "depth" => self.params.max_depth = parse_count(value)?,
            "size" => self.params.size = parse_count(value)?,
            "color" => self.params.color = parse_value(value)?,
            "brush" => self.params.brush = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "sierpinski")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("max_depth", self.params.max_depth.to_string()),
            ("size", self.params.size.to_string()),
            ("color", self.params.color.to_string()),
            ("brush", format!("{:.1}", self.params.brush)),
        ]
    }

    fn load_config(&mut self, json: &str) -> Result<(), GeomancyError> {
        self.params = serde_json::from_str(json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_point_count() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(256.0, 0.0);
        for depth in 0..=4 {
            assert_eq!(curve(start, end, depth).len(), 2 * 7usize.pow(depth));
        }
    }

    #[test]
    fn test_depth_zero_is_the_segment() {
        let start = Point::new(1.0, 2.0);
        let end = Point::new(9.0, 2.0);
        assert_eq!(curve(start, end, 0), vec![start, end]);
    }

    #[test]
    fn test_first_segment_halves_each_depth() {
        let start = Point::new(0.0, 0.0);
        for depth in 0..=4 {
            let line = curve(start, Point::new(64.0, 0.0), depth);
            assert_eq!(line[0], start);
            let expected = 64.0 / 2f64.powi(depth as i32);
            assert!((line[0].distance(line[1]) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_first_level_segments() {
        let s = 3f64.sqrt();
        let line = curve(Point::new(0.0, 0.0), Point::new(4.0, 0.0), 1);
        let expected = [
            (Point::new(0.0, 0.0), Point::new(2.0, 0.0)),
            (Point::new(2.0, 0.0), Point::new(1.0, -s)),
            (Point::new(1.0, -s), Point::new(3.0, -s)),
            (Point::new(3.0, -s), Point::new(2.0, 0.0)),
            (Point::new(2.0, 0.0), Point::new(4.0, 0.0)),
            (Point::new(4.0, 0.0), Point::new(2.0, -2.0 * s)),
            (Point::new(2.0, -2.0 * s), Point::new(0.0, 0.0)),
        ];
        for (pair, (a, b)) in line.chunks_exact(2).zip(expected) {
            assert!(pair[0].distance(a) < 1e-9 && pair[1].distance(b) < 1e-9);
        }
    }

    #[test]
    fn test_generate_three_sides() {
        let canvas = Canvas::new(400, 400);
        let shape = generate(&Params::default(), &canvas);
        assert_eq!(shape.sides.len(), 3);
        assert!(shape.sides.iter().all(|s| s.len() == 2 * 7usize.pow(3)));
    }

    #[test]
    fn test_drawing_has_one_stroke_per_segment() {
        let canvas = Canvas::new(400, 400);
        let params = Params {
            max_depth: 1,
            ..Params::default()
        };
        let drawing = generate(&params, &canvas).to_drawing(&canvas, Color::BLACK, 1.0);
        assert_eq!(drawing.strokes.len(), 3 * 7);
    }
}
