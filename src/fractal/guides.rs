//! # Guide Grid
//!
//! Evenly spaced vertical and horizontal guide positions over the canvas,
//! with a closing guide on the right and bottom borders.

use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Canvas, Drawing, Point, Stroke};
use log::debug;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters for the guide grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Horizontal spacing (percent of width, or pixels). Default: 10
    pub spacing_x: f64,
    /// Vertical spacing (percent of height, or pixels). Default: 10
    pub spacing_y: f64,
    /// Default: true
    pub in_percent: bool,
    /// Default: #00a0ff
    pub color: Color,
    /// Default: 1.0
    pub brush: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            spacing_x: 10.0,
            spacing_y: 10.0,
            in_percent: true,
            color: Color::new(0x00, 0xa0, 0xff, 255),
            brush: 1.0,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.in_percent { "%" } else { "px" };
        write!(f, "spacing={}{}x{}{}", self.spacing_x, unit, self.spacing_y, unit)
    }
}

/// Guide positions in pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuideGrid {
    /// x positions of vertical guides.
    pub vertical: Vec<u32>,
    /// y positions of horizontal guides.
    pub horizontal: Vec<u32>,
}

impl GuideGrid {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }

    pub fn to_drawing(&self, canvas: &Canvas, color: Color, brush: f64) -> Drawing {
        let mut drawing = Drawing::new(canvas.width, canvas.height);
        let (w, h) = (canvas.width_f(), canvas.height_f());
        for &x in &self.vertical {
            let x = x as f64;
            drawing.push(
                Stroke::new("vertical", vec![Point::new(x, 0.0), Point::new(x, h)])
                    .color(color)
                    .width(brush),
            );
        }
        for &y in &self.horizontal {
            let y = y as f64;
            drawing.push(
                Stroke::new("horizontal", vec![Point::new(0.0, y), Point::new(w, y)])
                    .color(color)
                    .width(brush),
            );
        }
        drawing
    }
}

fn positions(space: u32, limit: u32) -> Vec<u32> {
    let mut out: Vec<u32> = (0..limit / space).map(|i| i * space).collect();
    out.push(limit);
    out
}

/// Resolve spacings against `canvas`. A spacing that resolves to zero on
/// either axis yields an empty grid.
pub fn generate(params: &Params, canvas: &Canvas) -> GuideGrid {
    let (space_x, space_y) = if params.in_percent {
        (
            canvas.width_percent(params.spacing_x.max(0.0)) as u32,
            canvas.height_percent(params.spacing_y.max(0.0)) as u32,
        )
    } else {
        (
            (params.spacing_x.trunc().max(1.0) as u32).min(canvas.width),
            (params.spacing_y.trunc().max(1.0) as u32).min(canvas.height),
        )
    };

    if space_x == 0 || space_y == 0 {
        debug!("guides: spacing resolved to zero ({})", params);
        return GuideGrid::default();
    }

    GuideGrid {
        vertical: positions(space_x, canvas.width),
        horizontal: positions(space_y, canvas.height),
    }
}

/// Guide grid generator.
#[derive(Debug, Clone, Default)]
pub struct Guides {
    params: Params,
}

impl Guides {
    pub fn new(params: Params) -> Self {
        Self { params }
    }
}

impl super::Generator for Guides {
    fn name(&self) -> &'static str {
        "guides"
    }

    fn draw(&self, canvas: &Canvas, _rng: &mut dyn RngCore) -> Drawing {
        generate(&self.params, canvas).to_drawing(canvas, self.params.color, self.params.brush)
    }

    fn params_description(&self) -> String {
        self.params.to_string()
    }

    fn set_param(&mut self, name: &str, value: &str) -> Result<(), String> {
        use super::parse_value;
        match name {
            "spacing_x" => self.params.spacing_x = parse_value(value)?,
            "spacing_y" => self.params.spacing_y = parse_value(value)?,
            "in_percent" => self.params.in_percent = super::parse_flag(value)?,
            "color" => self.params.color = parse_value(value)?,
            "brush" => self.params.brush = parse_value(value)?,
            _ => return Err(super::unknown_param(name, "guides")),
        }
        Ok(())
    }

    fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("spacing_x", self.params.spacing_x.to_string()),
            ("spacing_y", self.params.spacing_y.to_string()),
            ("in_percent", self.params.in_percent.to_string()),
            ("color", self.params.color.to_string()),
            ("brush", format!("{:.1}", self.params.brush)),
        ]
    }

    fn load_config(&mut self, json: &str) -> Result<(), GeomancyError> {
        self.params = serde_json::from_str(json)?;
        Ok(())
    }
}
