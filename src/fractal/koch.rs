//! # Koch Curves
//!
//! Koch curve with an adjustable tent angle, replicated into a closed
//! 1-10 sided outline centered vertically on the canvas.
//!
//! ## Description
//!
//! Each segment is replaced by four sub-segments forming a "tent" whose
//! peak angle is configurable between -90° and 90°. At 60° this is the
//! classic snowflake edge; negative angles fold the tent inwards. The
//! single curve is then copied into `sides` sides (see
//! [`super::polygon::replicate`]).

use super::polygon;
use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Polyline, Stroke};
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest useful subdivision at normal resolutions.
pub const MAX_DEPTH: u32 = 6;
pub const MAX_SIDES: u32 = 10;

/// Parameters for the Koch generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Tent angle in degrees, -90 to 90. Default: 60
    pub angle: f64,
    /// Subdivision depth, 0 to 6. Default: 4
    #[serde(deserialize_with = "super::deserialize_count")]
    pub max_depth: u32,
    /// Number of sides, 1 to 10. Default: 3
    #[serde(deserialize_with = "super::deserialize_count")]
    pub sides: u32,
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
            angle: 60.0,
            max_depth: 4,
            sides: 3,
            size: 200,
            color: Color::BLACK,
            brush: 1.0,
        }
    }
}

impl Params {
    /// Generate randomized parameters.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            angle: rng.random_range(-85.0..85.0f64).round(),
            max_depth: rng.random_range(2..=5),
            sides: rng.random_range(1..=MAX_SIDES),
            size: rng.random_range(120..=260),
            ..Self::default()
        }
    }

    /// Copy with every field pulled into its legal range.
    pub fn clamped(&self) -> Self {
        Self {
            angle: self.angle.clamp(-90.0, 90.0),
            max_depth: self.max_depth.min(MAX_DEPTH),
            sides: self.sides.clamp(1, MAX_SIDES),
            size: self.size.max(1),
            color: self.color,
            brush: self.brush.max(0.0),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "angle={:.0} depth={} sides={} size={}",
            self.angle, self.max_depth, self.sides, self.size
        )
    }
}

/// Output of the Koch generator.
#[derive(Debug, Clone, PartialEq)]
pub struct KochShape {
    /// Base segment the curve was built on (before centering).
    pub start: Point,
    pub end: Point,
    /// One side per requested side, each `4^depth + 1` points.
    pub sides: Vec<Polyline>,
}

/// Length of each tent sub-segment relative to its parent.
///
/// Closed form of the law-of-sines construction: `1 / (4 cos²(angle / 2))`.
/// One third at 60°, one quarter at 0°, one half at ±90°.
pub fn line_scale(angle_deg: f64) -> f64 {
    let c = (angle_deg / 2.0).to_radians().cos();
    1.0 / (4.0 * c * c)
}

/// Build a single Koch curve from `start` to `end`.
///
/// The result starts with `start` and has `4^max_depth + 1` points.
pub fn curve(start: Point, end: Point, angle_deg: f64, max_depth: u32) -> Polyline {
    let tent = Tent {
        turn: angle_deg.to_radians(),
        scale: line_scale(angle_deg),
        max_depth,
    };
    let mut points = Vec::with_capacity(4usize.pow(max_depth) + 1);
    points.push(start);
    tent.subdivide(start, end, 0, &mut points);
    points
}

struct Tent {
    turn: f64,
    scale: f64,
    max_depth: u32,
}

impl Tent {
    /// Leaves append only their end point; the previous leaf supplied the start.
    fn subdivide(&self, a: Point, e: Point, depth: u32, out: &mut Polyline) {
        if depth >= self.max_depth {
            out.push(e);
            return;
        }

        let length = a.distance(e) * self.scale;
        let heading = e.angle_of(a);

        let b = a.make_point(length, heading);
        let c = b.make_point(length, heading - self.turn);
        let d = c.make_point(length, heading + self.turn);

        self.subdivide(a, b, depth + 1, out);
        self.subdivide(b, c, depth + 1, out);
        self.subdivide(c, d, depth + 1, out);
        self.subdivide(d, e, depth + 1, out);
    }
}

/// Generate the full outline on `canvas`.
pub fn generate(params: &Params, canvas: &Canvas) -> KochShape {
    let p = params.clamped();
    let size = p.size as f64;

    let start = Point::new(
        ((canvas.width_f() - size) / 2.0).floor(),
        (canvas.height_f() * 0.5).trunc(),
    );
    let end = start.translate(size, 0.0);

    let line = curve(start, end, p.angle, p.max_depth);
    let mut sides = polygon::replicate(
        &line,
        p.sides as usize,
        360.0 / p.sides as f64,
        start,
        end,
    );
    polygon::center_vertically(&mut sides, canvas.height_f());

    debug!(
        "koch: {} sides x {} points ({})",
        sides.len(),
        line.len(),
        p
    );

    KochShape { start, end, sides }
}

impl KochShape {
    pub fn to_drawing(&self, canvas: &Canvas, color: Color, brush: f64) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);
        for (i, side) in self.sides.iter().enumerate() {
            drawing.push(
                Stroke::new(format!("side {}", i), side.clone())
                    .color(color)
                    .width(brush),
            );
        }
        drawing
    }
}

/// Koch curve generator.
#[derive(Debug, Clone, Default)]
pub struct Koch {
    params: Params,
}

impl Koch {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            params: Params::random(rng),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl super::Generator for Koch {
    fn name(&self) -> &'static str {
        "koch"
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
            "angle" => self.params.angle = parse_value(value)?,
            "max_depth" | "depth" => self.params.max_depth = parse_count(value)?,
            "sides" => self.params.sides = parse_count(value)?,
            "size" => self.params.size = parse_count(value)?,
            "color" => self.params.color = parse_value(value)?,
            "brush" => self.params.brush = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "koch")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("angle", format!("{:.0}", self.params.angle)),
            ("max_depth", self.params.max_depth.to_string()),
            ("sides", self.params.sides.to_string()),
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
