//! # Fractal Tree
//!
//! Recursive branching tree grown upwards from a base point.
//!
//! ## Description
//!
//! Each node draws one branch, shortens the length by `decrease_ratio`
//! and spawns children. With a fixed `branch_angle` the children fan out
//! evenly around the parent heading; with `branch_angle = 0` each child
//! heading is drawn from a Gaussian around the parent heading. With
//! `branches = 0` each node picks 2-4 children at random.
//!
//! Output is split into one layer per depth so hosts can style depths
//! separately; the drawing tints each layer along a start/end gradient.

use crate::color::{self, Color};
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Stroke};
use log::debug;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_BRANCHES: u32 = 6;
pub const MAX_DEPTH: u32 = 10;
pub const MAX_BRANCH_ANGLE: f64 = 180.0;
/// Initial heading in degrees (straight up in image space).
pub const INITIAL_ANGLE: f64 = -90.0;
/// Branches at or below this length are not drawn.
pub const MIN_LENGTH: f64 = 2.0;

const SINGLE_BRANCH_SD: f64 = 20.0;
const MULTI_BRANCH_SD: f64 = 50.0;

/// Parameters for the fractal tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Base x as a percentage of canvas width. Default: 50
    pub base_x: f64,
    /// Base y as a percentage of canvas height. Default: 100
    pub base_y: f64,
    /// Trunk length in pixels. Default: 150
    pub length: f64,
    /// Children per node, 0 to 6 (0 = random 2-4). Default: 2
    #[serde(deserialize_with = "super::deserialize_count")]
    pub branches: u32,
    /// Total fan angle in degrees, 0 to 180 (0 = Gaussian). Default: 45
    pub branch_angle: f64,
    /// Recursion depth, 1 to 10. Default: 5
    #[serde(deserialize_with = "super::deserialize_count")]
    pub max_depth: u32,
    /// Fraction of length kept per depth, 0.01 to 1. Default: 0.67
    pub decrease_ratio: f64,
    /// Trunk color. Default: #4a2f1b
    pub start_color: Color,
    /// Color the outermost twigs approach. Default: #3f9b3a
    pub end_color: Color,
    /// Stroke width in pixels. Default: 3.0
    pub brush: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            base_x: 50.0,
            base_y: 100.0,
            length: 150.0,
            branches: 2,
            branch_angle: 45.0,
            max_depth: 5,
            decrease_ratio: 0.67,
            start_color: Color::new(0x4a, 0x2f, 0x1b, 255),
            end_color: Color::new(0x3f, 0x9b, 0x3a, 255),
            brush: 3.0,
        }
    }
}

impl Params {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            length: rng.random_range(100.0..200.0f64).round(),
            branches: rng.random_range(0..=4),
            branch_angle: if rng.random_bool(0.25) {
                0.0
            } else {
                rng.random_range(20.0..120.0f64).round()
            },
            max_depth: rng.random_range(4..=8),
            decrease_ratio: rng.random_range(0.55..0.8),
            ..Self::default()
        }
    }

    pub fn clamped(&self) -> Self {
        Self {
            base_x: self.base_x.clamp(0.0, 100.0),
            base_y: self.base_y.clamp(0.0, 100.0),
            length: self.length.max(0.0),
            branches: self.branches.min(MAX_BRANCHES),
            branch_angle: self.branch_angle.clamp(0.0, MAX_BRANCH_ANGLE),
            max_depth: self.max_depth.clamp(1, MAX_DEPTH),
            decrease_ratio: self.decrease_ratio.clamp(0.01, 1.0),
            start_color: self.start_color,
            end_color: self.end_color,
            brush: self.brush.max(0.0),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "length={:.0} branches={} angle={:.0} depth={} ratio={:.2}",
            self.length, self.branches, self.branch_angle, self.max_depth, self.decrease_ratio
        )
    }
}

/// One drawn branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Nominal length before any bounds clamping of `to`.
    pub length: f64,
    /// Heading in degrees.
    pub heading: f64,
}

/// Output of the tree generator: `layers[d]` holds every branch drawn at depth `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub layers: Vec<Vec<Segment>>,
}

impl Tree {
    pub fn segment_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Deepest non-empty layer plus one.
    pub fn depth(&self) -> usize {
        self.layers
            .iter()
            .rposition(|layer| !layer.is_empty())
            .map_or(0, |i| i + 1)
    }

    pub fn to_drawing(&self, canvas: &Canvas, params: &Params) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);
        let colors = color::gradient(&params.start_color, &params.end_color, self.layers.len());

        for (depth, (layer, color)) in self.layers.iter().zip(colors).enumerate() {
            for segment in layer {
                drawing.push(
                    Stroke::new(format!("depth {}", depth), vec![segment.from, segment.to])
                        .color(color)
                        .width(params.brush),
                );
            }
        }
        drawing
    }
}

struct Grower<'a, R: Rng + ?Sized> {
    params: &'a Params,
    canvas: &'a Canvas,
    rng: &'a mut R,
    layers: Vec<Vec<Segment>>,
}

impl<R: Rng + ?Sized> Grower<'_, R> {
    fn gaussian(&mut self, mean: f64, sd: f64) -> f64 {
        match Normal::new(mean, sd) {
            Ok(normal) => normal.sample(&mut *self.rng),
            Err(_) => mean,
        }
    }

    fn grow(&mut self, base: Point, depth: u32, angle: f64, length: f64) {
        if depth >= self.params.max_depth || length <= MIN_LENGTH {
            return;
        }

        let mut tip = base.make_point(length, angle.to_radians());
        if self.params.branches == 1 {
            tip = self.canvas.clamp(tip);
        }

        self.layers[depth as usize].push(Segment {
            from: base,
            to: tip,
            length,
            heading: angle,
        });

        let next_length = length * self.params.decrease_ratio;
        let count = match self.params.branches {
            0 => self.rng.random_range(2..=4),
            n => n,
        };

        if self.params.branch_angle > 0.0 {
            let spread = self.params.branch_angle;
            let offset = spread * (count - 1) as f64 / 2.0;
            for i in 0..count {
                let theta = i as f64 * spread - offset;
                self.grow(tip, depth + 1, angle + theta, next_length);
            }
        } else {
            let sd = if count == 1 {
                SINGLE_BRANCH_SD
            } else {
                MULTI_BRANCH_SD
            };
            let heading = tip.angle_of(base).to_degrees();
            for _ in 0..count {
                let theta = self.gaussian(heading, sd);
                self.grow(tip, depth + 1, theta, next_length);
            }
        }
    }
}

/// Grow a tree on `canvas`.
pub fn generate<R: Rng + ?Sized>(params: &Params, canvas: &Canvas, rng: &mut R) -> Tree {
    let p = params.clamped();
    let base = canvas.point_at_percent(p.base_x, p.base_y);

    let mut grower = Grower {
        params: &p,
        canvas,
        rng,
        layers: vec![Vec::new(); p.max_depth as usize],
    };

    let angle = if p.branches == 1 {
        grower.gaussian(INITIAL_ANGLE, SINGLE_BRANCH_SD)
    } else {
        INITIAL_ANGLE
    };
    grower.grow(base, 0, angle, p.length);

    let tree = Tree {
        layers: grower.layers,
    };
    debug!(
        "tree: {} segments over {} layers ({})",
        tree.segment_count(),
        tree.depth(),
        p
    );
    tree
}

/// Fractal tree generator.
#[derive(Debug, Clone, Default)]
pub struct FractalTree {
    params: Params,
}

impl FractalTree {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            params: Params::random(rng),
        }
    }
}

impl super::Generator for FractalTree {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn draw(&self, canvas: &Canvas, rng: &mut dyn RngCore) -> Drawing {
        let p = self.params.clamped();
        generate(&p, canvas, rng).to_drawing(canvas, &p)
    }

    fn params_description(&self) -> String {
        self.params.to_string()
    }

    fn set_param(&mut self, name: &str, value: &str) -> Result<(), String> {
        use super::{parse_count, parse_value};
        match name {
            "base_x" => self.params.base_x = parse_value(value)?,
            "base_y" => self.params.base_y = parse_value(value)?,
            "length" => self.params.length = parse_value(value)?,
            "branches" => self.params.branches = parse_count(value)?,
            "branch_angle" | "angle" => self.params.branch_angle = parse_value(value)?,
            "max_depth" | "depth" => self.params.max_depth = parse_count(value)?,
            "decrease_ratio" | "ratio" => self.params.decrease_ratio = parse_value(value)?,
            "start_color" => self.params.start_color = parse_value(value)?,
            "end_color" => self.params.end_color = parse_value(value)?,
            "brush" => self.params.brush = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "tree")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("base_x", format!("{:.0}", self.params.base_x)),
            ("base_y", format!("{:.0}", self.params.base_y)),
            ("length", format!("{:.0}", self.params.length)),
            ("branches", self.params.branches.to_string()),
            ("branch_angle", format!("{:.0}", self.params.branch_angle)),
            ("max_depth", self.params.max_depth.to_string()),
            ("decrease_ratio", format!("{:.2}", self.params.decrease_ratio)),
            ("start_color", self.params.start_color.to_string()),
            ("end_color", self.params.end_color.to_string()),
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
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canvas() -> Canvas {
        Canvas::new(800, 600)
    }

    #[test]
    fn test_fixed_fan_is_a_full_binary_tree() {
        let params = Params {
            max_depth: 4,
            ..Params::default()
        };
        let tree = generate(&params, &canvas(), &mut StdRng::seed_from_u64(0));
        let sizes: Vec<usize> = tree.layers.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 2, 4, 8]);
    }

    #[test]
    fn test_trunk_points_up() {
        let tree = generate(&Params::default(), &canvas(), &mut StdRng::seed_from_u64(0));
        let trunk = tree.layers[0][0];
        assert_eq!(trunk.from, Point::new(400.0, 600.0));
        assert!((trunk.to.x - 400.0).abs() < 1e-9);
        assert!((trunk.to.y - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_fan_is_centered_on_parent() {
        let params = Params {
            branches: 3,
            branch_angle: 60.0,
            max_depth: 2,
            ..Params::default()
        };
        let tree = generate(&params, &canvas(), &mut StdRng::seed_from_u64(0));
        let headings: Vec<f64> = tree.layers[1].iter().map(|s| s.heading).collect();
        assert_eq!(headings, vec![-150.0, -90.0, -30.0]);
    }

    #[test]
    fn test_random_branching_terminates_and_shrinks() {
        let params = Params {
            branches: 0,
            branch_angle: 0.0,
            max_depth: 5,
            ..Params::default()
        };
        for seed in 0..10 {
            let tree = generate(&params, &canvas(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(tree.layers.len(), 5);
            assert!(tree.depth() <= 5);

            for depth in 1..tree.layers.len() {
                for child in &tree.layers[depth] {
                    for parent in &tree.layers[depth - 1] {
                        assert!(child.length < parent.length);
                    }
                }
            }

            for pair in tree.layers.windows(2) {
                let (parents, children) = (pair[0].len(), pair[1].len());
                assert!(children >= parents * 2 && children <= parents * 4);
            }
        }
    }

    #[test]
    fn test_short_branches_stop() {
        let params = Params {
            length: 10.0,
            decrease_ratio: 0.1,
            max_depth: 10,
            ..Params::default()
        };
        let tree = generate(&params, &canvas(), &mut StdRng::seed_from_u64(0));
        // 10 -> 1.0 which is below the minimum length
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.layers.len(), 10);
    }

    #[test]
    fn test_single_branch_stays_in_bounds() {
        let params = Params {
            branches: 1,
            branch_angle: 0.0,
            length: 400.0,
            decrease_ratio: 1.0,
            max_depth: 10,
            ..Params::default()
        };
        let c = canvas();
        let tree = generate(&params, &c, &mut StdRng::seed_from_u64(3));
        for segment in tree.layers.iter().flatten() {
            assert!(c.contains(segment.to), "{:?} escaped", segment.to);
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let params = Params {
            branches: 0,
            branch_angle: 0.0,
            ..Params::default()
        };
        let a = generate(&params, &canvas(), &mut StdRng::seed_from_u64(99));
        let b = generate(&params, &canvas(), &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_layers_are_tinted_by_depth() {
        let params = Params {
            max_depth: 3,
            start_color: Color::BLACK,
            end_color: Color::WHITE,
            ..Params::default()
        };
        let c = canvas();
        let tree = generate(&params, &c, &mut StdRng::seed_from_u64(0));
        let drawing = tree.to_drawing(&c, &params);
        assert_eq!(drawing.strokes.len(), 7);
        assert_eq!(drawing.strokes[0].color.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(drawing.strokes[0].layer, "depth 0");
        assert_eq!(drawing.strokes[6].layer, "depth 2");
        assert!(drawing.strokes[6].color.r > drawing.strokes[1].color.r);
    }
}
