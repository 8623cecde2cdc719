//! # Concentric Ellipses
//!
//! A nest of ellipses, each spawning shrunken children around its center.
//!
//! With both offsets at zero every child is concentric with its parent.
//! A nonzero offset on one axis pushes two children apart along that axis;
//! nonzero offsets on both axes give four children (left, right, below,
//! above).

use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Polyline, Stroke};
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

pub const MAX_DEPTH: u32 = 5;
/// Offset children stop once either radius shrinks to this or below.
pub const MIN_OFFSET_RADIUS: f64 = 8.0;
/// Segments used when flattening an ellipse for drawing.
pub const POLYLINE_SEGMENTS: usize = 72;

/// Parameters for the ellipse nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Center x (percent of width, or pixels). Default: 50
    pub center_x: f64,
    /// Center y (percent of height, or pixels). Default: 50
    pub center_y: f64,
    /// Horizontal radius (percent of width, or pixels). Default: 50
    pub radius_x: f64,
    /// Vertical radius (percent of height, or pixels). Default: 50
    pub radius_y: f64,
    /// Treat center and radii as percentages of the canvas. Default: true
    pub in_percent: bool,
    /// Rotation of the x axis in degrees, counter-clockwise. Default: 0
    pub angle: f64,
    /// Recursion depth, 1 to 5. Default: 3
    #[serde(deserialize_with = "super::deserialize_count")]
    pub max_depth: u32,
    /// Fraction of the radii kept per level, 0.01 to 1. Default: 0.5
    pub decrease: f64,
    /// Child offset along x as a fraction of the child radius. Default: 1.0
    pub offset_x: f64,
    /// Child offset along y as a fraction of the child radius. Default: 1.0
    pub offset_y: f64,
    /// Stroke color. Default: black
    pub color: Color,
    /// Stroke width in pixels. Default: 1.0
    pub brush: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            center_x: 50.0,
            center_y: 50.0,
            radius_x: 50.0,
            radius_y: 50.0,
            in_percent: true,
            angle: 0.0,
            max_depth: 3,
            decrease: 0.5,
            offset_x: 1.0,
            offset_y: 1.0,
            color: Color::BLACK,
            brush: 1.0,
        }
    }
}

impl Params {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let offset = |rng: &mut R| {
            if rng.random_bool(0.3) {
                0.0
            } else {
                rng.random_range(0.2..=1.0)
            }
        };
        Self {
            radius_x: rng.random_range(20.0..50.0f64).round(),
            radius_y: rng.random_range(20.0..50.0f64).round(),
            angle: rng.random_range(0.0..90.0f64).round(),
            max_depth: rng.random_range(2..=4),
            decrease: rng.random_range(0.35..0.75),
            offset_x: offset(rng),
            offset_y: offset(rng),
            ..Self::default()
        }
    }

    pub fn clamped(&self) -> Self {
        Self {
            max_depth: self.max_depth.clamp(1, MAX_DEPTH),
            decrease: self.decrease.clamp(0.01, 1.0),
            offset_x: self.offset_x.clamp(0.0, 1.0),
            offset_y: self.offset_y.clamp(0.0, 1.0),
            brush: self.brush.max(0.0),
            ..self.clone()
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "radius={:.0}x{:.0}{} depth={} decrease={:.2} offset={:.2},{:.2}",
            self.radius_x,
            self.radius_y,
            if self.in_percent { "%" } else { "px" },
            self.max_depth,
            self.decrease,
            self.offset_x,
            self.offset_y
        )
    }
}

/// One ellipse in the nest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Rotation in radians, counter-clockwise as seen on screen (y down).
    pub angle: f64,
    /// Recursion level, starting at 1.
    pub depth: u32,
}

impl Ellipse {
    /// Flatten into `segments` points (closing segment implied), starting
    /// at the end of the x radius.
    pub fn to_polyline(&self, segments: usize) -> Polyline {
        let segments = segments.max(3);
        (0..segments)
            .map(|i| {
                let t = TAU * i as f64 / segments as f64;
                self.center
                    .translate(self.radius_x * t.cos(), self.radius_y * t.sin())
                    .rotate(-self.angle, self.center)
            })
            .collect()
    }
}

/// Output of the ellipse generator, in plotting order.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseNest {
    pub ellipses: Vec<Ellipse>,
}

impl EllipseNest {
    pub fn len(&self) -> usize {
        self.ellipses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ellipses.is_empty()
    }

    pub fn to_drawing(&self, canvas: &Canvas, color: Color, brush: f64) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);
        for ellipse in &self.ellipses {
            drawing.push(
                Stroke::new(
                    format!("depth {}", ellipse.depth),
                    ellipse.to_polyline(POLYLINE_SEGMENTS),
                )
                .color(color)
                .width(brush)
                .closed(),
            );
        }
        drawing
    }
}

struct Nest {
    angle: f64,
    max_depth: u32,
    decrease: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Nest {
    fn plot(&self, center: Point, rx: f64, ry: f64, depth: u32, out: &mut Vec<Ellipse>) {
        out.push(Ellipse {
            center,
            radius_x: rx,
            radius_y: ry,
            angle: self.angle,
            depth,
        });

        if self.decrease >= 1.0 || depth > self.max_depth {
            return;
        }

        let rx = (rx * self.decrease).trunc();
        let ry = (ry * self.decrease).trunc();
        let ox = (rx * self.offset_x).trunc();
        let oy = (ry * self.offset_y).trunc();
        let next = depth + 1;

        let children: Vec<Point> = match (self.offset_x == 0.0, self.offset_y == 0.0) {
            (true, true) if rx > 0.0 && ry > 0.0 => vec![center],
            (true, false) if rx > MIN_OFFSET_RADIUS && ry > MIN_OFFSET_RADIUS => {
                vec![center.translate(0.0, oy), center.translate(0.0, -oy)]
            }
            (false, true) if rx > MIN_OFFSET_RADIUS && ry > MIN_OFFSET_RADIUS => {
                vec![center.translate(ox, 0.0), center.translate(-ox, 0.0)]
            }
            (false, false) if rx > MIN_OFFSET_RADIUS && ry > MIN_OFFSET_RADIUS => vec![
                center.translate(ox, 0.0),
                center.translate(-ox, 0.0),
                center.translate(0.0, oy),
                center.translate(0.0, -oy),
            ],
            _ => Vec::new(),
        };

        for child in children {
            self.plot(child, rx, ry, next, out);
        }
    }
}

/// Build the nest on `canvas`, resolving percentages when `in_percent` is set.
pub fn generate(params: &Params, canvas: &Canvas) -> EllipseNest {
    let p = params.clamped();

    let (center, rx, ry) = if p.in_percent {
        (
            canvas.point_at_percent(p.center_x, p.center_y),
            canvas.width_percent(p.radius_x),
            canvas.height_percent(p.radius_y),
        )
    } else {
        (
            Point::new(p.center_x, p.center_y).trunc(),
            p.radius_x.trunc(),
            p.radius_y.trunc(),
        )
    };

    let nest = Nest {
        angle: p.angle.to_radians(),
        max_depth: p.max_depth,
        decrease: p.decrease,
        offset_x: p.offset_x,
        offset_y: p.offset_y,
    };

    let mut ellipses = Vec::new();
    nest.plot(center, rx.max(1.0), ry.max(1.0), 1, &mut ellipses);

    debug!("ellipses: {} plotted ({})", ellipses.len(), p);

    EllipseNest { ellipses }
}

/// Concentric ellipse generator.
#[derive(Debug, Clone, Default)]
pub struct Ellipses {
    params: Params,
}

impl Ellipses {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            params: Params::random(rng),
        }
    }
}

impl super::Generator for Ellipses {
    fn name(&self) -> &'static str {
        "ellipses"
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
            "center_x" => self.params.center_x = parse_value(value)?,
            "center_y" => self.params.center_y = parse_value(value)?,
            "radius_x" => self.params.radius_x = parse_value(value)?,
            "radius_y" => self.params.radius_y = parse_value(value)?,
            "in_percent" => self.params.in_percent = super::parse_flag(value)?,
            "angle" => self.params.angle = parse_value(value)?,
            "max_depth" | "depth" => self.params.max_depth = parse_count(value)?,
            "decrease" => self.params.decrease = parse_value(value)?,
            "offset_x" => self.params.offset_x = parse_value(value)?,
            "offset_y" => self.params.offset_y = parse_value(value)?,
            "color" => self.params.color = parse_value(value)?,
            "brush" => self.params.brush = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "ellipses")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("center_x", format!("{:.0}", self.params.center_x)),
            ("center_y", format!("{:.0}", self.params.center_y)),
            ("radius_x", format!("{:.0}", self.params.radius_x)),
            ("radius_y", format!("{:.0}", self.params.radius_y)),
            ("in_percent", self.params.in_percent.to_string()),
            ("angle", format!("{:.0}", self.params.angle)),
            ("max_depth", self.params.max_depth.to_string()),
            ("decrease", format!("{:.2}", self.params.decrease)),
            ("offset_x", format!("{:.2}", self.params.offset_x)),
            ("offset_y", format!("{:.2}", self.params.offset_y)),
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

    fn pixels(radius: f64, max_depth: u32, offset_x: f64, offset_y: f64) -> Params {
        Params {
            center_x: 2000.0,
            center_y: 2000.0,
            radius_x: radius,
            radius_y: radius,
            in_percent: false,
            max_depth,
            offset_x,
            offset_y,
            ..Params::default()
        }
    }

    #[test]
    fn test_concentric_count() {
        let canvas = Canvas::new(800, 600);
        for depth in 1..=5 {
            let nest = generate(&pixels(1000.0, depth, 0.0, 0.0), &canvas);
            assert_eq!(nest.len(), depth as usize + 1);
            assert!(nest.ellipses.iter().all(|e| e.center == Point::new(2000.0, 2000.0)));
        }
    }

    #[test]
    fn test_four_way_count() {
        let nest = generate(&pixels(1000.0, 2, 1.0, 1.0), &Canvas::default());
        assert_eq!(nest.len(), 1 + 4 + 16);
    }

    #[test]
    fn test_two_way_children() {
        let nest = generate(&pixels(100.0, 1, 0.5, 0.0), &Canvas::default());
        let centers: Vec<Point> = nest.ellipses.iter().map(|e| e.center).collect();
        // radius 100 -> 50, offset trunc(50 * 0.5) = 25
        assert_eq!(
            centers,
            vec![
                Point::new(2000.0, 2000.0),
                Point::new(2025.0, 2000.0),
                Point::new(1975.0, 2000.0),
            ]
        );
        assert!(nest.ellipses[1..].iter().all(|e| e.radius_x == 50.0 && e.depth == 2));
    }

    #[test]
    fn test_small_offset_children_stop() {
        // radius 16 -> 8, which is not above the cutoff
        let nest = generate(&pixels(16.0, 5, 1.0, 1.0), &Canvas::default());
        assert_eq!(nest.len(), 1);
    }

    #[test]
    fn test_no_decrease_plots_one() {
        let params = Params {
            decrease: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            ..Params::default()
        };
        assert_eq!(generate(&params, &Canvas::default()).len(), 1);
    }

    #[test]
    fn test_percent_resolution() {
        let nest = generate(&Params::default(), &Canvas::new(800, 600));
        let root = nest.ellipses[0];
        assert_eq!(root.center, Point::new(400.0, 300.0));
        assert_eq!((root.radius_x, root.radius_y), (400.0, 300.0));
        assert_eq!(root.depth, 1);
    }

    #[test]
    fn test_radius_floor() {
        let nest = generate(&pixels(0.0, 1, 0.0, 0.0), &Canvas::default());
        assert_eq!((nest.ellipses[0].radius_x, nest.ellipses[0].radius_y), (1.0, 1.0));
        // 1 * 0.5 truncates to zero, so nothing follows
        assert_eq!(nest.len(), 1);
    }

    #[test]
    fn test_polyline_rotation() {
        let ellipse = Ellipse {
            center: Point::new(10.0, 10.0),
            radius_x: 4.0,
            radius_y: 2.0,
            angle: std::f64::consts::FRAC_PI_2,
            depth: 1,
        };
        let line = ellipse.to_polyline(4);
        assert_eq!(line.len(), 4);
        // a quarter turn counter-clockwise: the x radius points up the screen
        assert!(line[0].distance(Point::new(10.0, 6.0)) < 1e-9);
        assert!(line[1].distance(Point::new(12.0, 10.0)) < 1e-9);
        assert!(line[2].distance(Point::new(10.0, 14.0)) < 1e-9);
    }

    #[test]
    fn test_drawing_is_closed() {
        let canvas = Canvas::new(400, 300);
        let drawing = generate(&Params::default(), &canvas).to_drawing(&canvas, Color::BLACK, 1.0);
        assert!(drawing.strokes.iter().all(|s| s.closed));
        assert_eq!(drawing.strokes[0].layer, "depth 1");
    }
}
