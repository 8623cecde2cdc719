//! # Lightning
//!
//! Noise-perturbed bolt paths and a storm of main and side bolts.
//!
//! ## Description
//!
//! A [`LightningPath`] is one straight leg made jagged: a fractal noise
//! wave is sampled along the leg's length, rotated onto the leg's true
//! heading and moved to its start point. Two legs (start to mid, mid to
//! end) add up to one main bolt.
//!
//! Side bolts branch off random points of the main bolts along the local
//! heading. They use the finer depth-2 noise preset and are drawn fading
//! out towards their tips.

use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Polyline, Stroke};
use crate::noise::{NoiseField, normalize};
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

pub const MAX_MAIN_BOLTS: u32 = 10;
pub const MAX_SIDE_BOLTS: u32 = 20;

/// Persistence of every bolt's noise field.
const PERSISTENCE: f64 = 0.1;
/// Main bolt brush is the canvas width divided by one of these.
const MAIN_BRUSH_DIVISORS: [f64; 4] = [120.0, 150.0, 180.0, 200.0];
const SIDE_BRUSH_DIVISOR: f64 = 150.0;
const GLOW_SPREAD: f64 = 4.0;
const GLOW_OPACITY: f64 = 0.4;

/// Noise settings for one bolt depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoisePreset {
    pub octaves: usize,
    pub lacunarity: f64,
    pub gain: f64,
    pub scale: f64,
    /// Peak-to-peak wave height in pixels.
    pub amplitude: f64,
    /// Horizontal grid size; the first octave's period.
    pub hgrid: f64,
}

impl NoisePreset {
    /// Depth 1 is the coarse main-bolt preset; anything deeper is finer.
    pub fn for_depth(depth: u32, length: usize) -> Self {
        let length = length as f64;
        if depth <= 1 {
            Self {
                octaves: 8,
                lacunarity: 2.5,
                gain: 0.40,
                scale: 0.4,
                amplitude: 200.0,
                hgrid: (length / 2.0).trunc().max(1.0),
            }
        } else {
            Self {
                octaves: 8,
                lacunarity: 2.0,
                gain: 0.55,
                scale: 0.2,
                amplitude: 200.0,
                hgrid: length.max(1.0),
            }
        }
    }
}

/// One jagged leg (or several concatenated legs) of a bolt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightningPath {
    pub start: Point,
    pub end: Point,
    pub depth: u32,
    /// Straight-line length in whole pixels, not the length of the jagged path.
    pub length: usize,
    /// Heading from start to end in radians.
    pub angle: f64,
    pub points: Polyline,
}

impl LightningPath {
    /// An empty path from `start` to `end`.
    pub fn new(start: Point, end: Point, depth: u32) -> Self {
        Self {
            start,
            end,
            depth: depth.max(1),
            length: end.distance(start).trunc() as usize,
            angle: end.angle_of(start),
            points: Vec::new(),
        }
    }

    /// A path from `start` to `end` with its wave generated from `rng`.
    pub fn generate<R: Rng + ?Sized>(start: Point, end: Point, depth: u32, rng: &mut R) -> Self {
        let mut path = Self::new(start, end, depth);
        path.make_wave(rng);
        path
    }

    pub fn preset(&self) -> NoisePreset {
        NoisePreset::for_depth(self.depth, self.length)
    }

    /// One point per pixel of length: a noise wave rotated and moved onto the leg.
    fn make_wave<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let preset = self.preset();
        let field = NoiseField::new(preset.octaves, PERSISTENCE, Some(preset.scale), rng);
        let half = (preset.amplitude / 2.0).trunc();
        let (sin, cos) = self.angle.sin_cos();

        self.points = (0..self.length)
            .map(|i| {
                let x = i as f64;
                let n = field.fractal(x, preset.hgrid, preset.lacunarity, preset.gain);
                let y = (normalize(n) * preset.amplitude).trunc() - half;
                Point::new((x * cos - y * sin).trunc(), (x * sin + y * cos).trunc())
                    + self.start
            })
            .collect();

        trace!(
            "lightning: depth {} leg {} -> {} ({} points)",
            self.depth,
            self.start,
            self.end,
            self.points.len()
        );
    }

    /// A random point that has a successor, with its index.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, Point)> {
        if self.points.len() < 2 {
            return None;
        }
        let index = rng.random_range(0..self.points.len() - 1);
        Some((index, self.points[index]))
    }

    /// Pick a side-bolt leg: from a random point, along the local heading, for
    /// a whole-pixel distance in `[length / 15, length / 3]`, clamped to `canvas`.
    pub fn sample_branch<R: Rng + ?Sized>(&self, canvas: &Canvas, rng: &mut R) -> Option<(Point, Point)> {
        let (index, from) = self.random_point(rng)?;
        let next = self.points[index + 1];
        let heading = next.angle_of(from);

        let lo = self.length / 15;
        let hi = self.length / 3;
        let distance = rng.random_range(lo..=hi) as f64;

        Some((from, canvas.clamp(from.make_point(distance, heading))))
    }
}

/// Concatenation: start of the left path, end of the right, summed lengths.
/// Continuity is not checked.
impl Add for LightningPath {
    type Output = LightningPath;

    fn add(self, other: LightningPath) -> LightningPath {
        let mut points = self.points;
        points.extend(other.points);
        LightningPath {
            start: self.start,
            end: other.end,
            depth: self.depth,
            length: self.length + other.length,
            angle: other.end.angle_of(self.start),
            points,
        }
    }
}

/// Parameters for a storm. Positions are percentages of the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Default: 10
    pub start_x: f64,
    /// Default: 50
    pub start_y: f64,
    /// Where the bolt bends. Default: 40
    pub mid_x: f64,
    /// Default: 40
    pub mid_y: f64,
    /// Default: 90
    pub end_x: f64,
    /// Default: 60
    pub end_y: f64,
    /// Number of main bolts, 1 to 10. Default: 1
    #[serde(deserialize_with = "super::deserialize_count")]
    pub main_bolts: u32,
    /// Number of side bolts, 0 to 20. Default: 0
    #[serde(deserialize_with = "super::deserialize_count")]
    pub side_bolts: u32,
    /// Nudge the end point by up to 5% of the canvas before each main bolt. Default: true
    pub wiggle_end: bool,
    /// Default: #000000
    pub bolt_color: Color,
    /// Glow drawn under main bolts. Default: #7f7fff
    pub glow_color: Color,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            start_x: 10.0,
            start_y: 50.0,
            mid_x: 40.0,
            mid_y: 40.0,
            end_x: 90.0,
            end_y: 60.0,
            main_bolts: 1,
            side_bolts: 0,
            wiggle_end: true,
            bolt_color: Color::BLACK,
            glow_color: Color::new(0x7f, 0x7f, 0xff, 255),
        }
    }
}

impl Params {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            start_x: rng.random_range(0.0..20.0f64).round(),
            start_y: rng.random_range(20.0..80.0f64).round(),
            mid_x: rng.random_range(30.0..70.0f64).round(),
            mid_y: rng.random_range(20.0..80.0f64).round(),
            end_x: rng.random_range(80.0..100.0f64).round(),
            end_y: rng.random_range(20.0..80.0f64).round(),
            main_bolts: rng.random_range(1..=3),
            side_bolts: rng.random_range(0..=8),
            ..Self::default()
        }
    }

    pub fn clamped(&self) -> Self {
        let pct = |v: f64| v.clamp(0.0, 100.0);
        Self {
            start_x: pct(self.start_x),
            start_y: pct(self.start_y),
            mid_x: pct(self.mid_x),
            mid_y: pct(self.mid_y),
            end_x: pct(self.end_x),
            end_y: pct(self.end_y),
            main_bolts: self.main_bolts.clamp(1, MAX_MAIN_BOLTS),
            side_bolts: self.side_bolts.min(MAX_SIDE_BOLTS),
            ..self.clone()
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.0},{:.0}) -> ({:.0},{:.0}) -> ({:.0},{:.0}) main={} side={}",
            self.start_x,
            self.start_y,
            self.mid_x,
            self.mid_y,
            self.end_x,
            self.end_y,
            self.main_bolts,
            self.side_bolts
        )
    }
}

/// A path with the brush width it is drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bolt {
    pub path: LightningPath,
    pub width: f64,
}

/// Output of the lightning generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Storm {
    pub main: Vec<Bolt>,
    pub sides: Vec<Bolt>,
}

impl Storm {
    pub fn to_drawing(&self, canvas: &Canvas, params: &Params) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);

        for (i, bolt) in self.main.iter().enumerate() {
            drawing.push(
                Stroke::new(format!("main {} glow", i), bolt.path.points.clone())
                    .color(params.glow_color)
                    .width(bolt.width * GLOW_SPREAD)
                    .opacity(GLOW_OPACITY),
            );
            drawing.push(
                Stroke::new(format!("main {}", i), bolt.path.points.clone())
                    .color(params.bolt_color)
                    .width(bolt.width),
            );
        }

        for (i, bolt) in self.sides.iter().enumerate() {
            drawing.push(
                Stroke::new(format!("side {}", i), bolt.path.points.clone())
                    .color(params.bolt_color)
                    .width(bolt.width)
                    .fade(),
            );
        }

        drawing
    }
}

/// Brush width for side bolts at `depth`.
pub fn side_brush(canvas: &Canvas, depth: u32) -> f64 {
    let base = (canvas.width_f() / SIDE_BRUSH_DIVISOR).trunc();
    (base / depth.max(1) as f64).trunc().max(1.0)
}

/// Generate main bolts through start, mid and end, then the side bolts.
pub fn generate<R: Rng + ?Sized>(params: &Params, canvas: &Canvas, rng: &mut R) -> Storm {
    let p = params.clamped();
    let start = canvas.point_at_percent(p.start_x, p.start_y);
    let mid = canvas.point_at_percent(p.mid_x, p.mid_y);
    let mut end = canvas.point_at_percent(p.end_x, p.end_y);

    let mut main = Vec::with_capacity(p.main_bolts as usize);
    let mut candidates = Vec::new();

    for _ in 0..p.main_bolts {
        let first = LightningPath::generate(start, mid, 1, rng);
        if p.wiggle_end {
            end = end.jitter(canvas.width_f() / 20.0, canvas.height_f() / 20.0, rng);
        }
        let second = LightningPath::generate(mid, end, 1, rng);
        let path = first + second;

        let divisor = MAIN_BRUSH_DIVISORS[rng.random_range(0..MAIN_BRUSH_DIVISORS.len())];
        let width = (canvas.width_f() / divisor).trunc();

        for _ in 0..p.side_bolts {
            if let Some(leg) = path.sample_branch(canvas, rng) {
                candidates.push(leg);
            }
        }

        main.push(Bolt { path, width });
    }

    candidates.shuffle(rng);

    let width = side_brush(canvas, 2);
    let sides: Vec<Bolt> = candidates
        .into_iter()
        .take(p.side_bolts as usize)
        .map(|(from, to)| Bolt {
            path: LightningPath::generate(from, to, 2, rng),
            width,
        })
        .collect();

    debug!(
        "lightning: {} main, {} side bolts ({})",
        main.len(),
        sides.len(),
        p
    );

    Storm { main, sides }
}

/// Lightning generator.
#[derive(Debug, Clone, Default)]
pub struct Lightning {
    params: Params,
}

impl Lightning {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            params: Params::random(rng),
        }
    }
}

impl super::Generator for Lightning {
    fn name(&self) -> &'static str {
        "lightning"
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
            "start_x" => self.params.start_x = parse_value(value)?,
            "start_y" => self.params.start_y = parse_value(value)?,
            "mid_x" => self.params.mid_x = parse_value(value)?,
            "mid_y" => self.params.mid_y = parse_value(value)?,
            "end_x" => self.params.end_x = parse_value(value)?,
            "end_y" => self.params.end_y = parse_value(value)?,
            "main_bolts" | "main" => self.params.main_bolts = parse_count(value)?,
            "side_bolts" | "side" => self.params.side_bolts = parse_count(value)?,
            "wiggle_end" => self.params.wiggle_end = super::parse_flag(value)?,
            "bolt_color" => self.params.bolt_color = parse_value(value)?,
            "glow_color" => self.params.glow_color = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "lightning")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_x", format!("{:.0}", self.params.start_x)),
            ("start_y", format!("{:.0}", self.params.start_y)),
            ("mid_x", format!("{:.0}", self.params.mid_x)),
            ("mid_y", format!("{:.0}", self.params.mid_y)),
            ("end_x", format!("{:.0}", self.params.end_x)),
            ("end_y", format!("{:.0}", self.params.end_y)),
            ("main_bolts", self.params.main_bolts.to_string()),
            ("side_bolts", self.params.side_bolts.to_string()),
            ("wiggle_end", self.params.wiggle_end.to_string()),
            ("bolt_color", self.params.bolt_color.to_string()),
            ("glow_color", self.params.glow_color.to_string()),
        ]
    }

    fn load_config(&mut self, json: &str) -> Result<(), GeomancyError> {
        self.params = serde_json::from_str(json)?;
        Ok(())
    }
}
