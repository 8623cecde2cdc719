//! # Color Model
//!
//! RGBA colors with WCAG relative luminance, contrast ratios and linear
//! blending. Used to tint generated strokes.
//!
//! Luminance is computed once at construction. Blending mutates r, g, b in
//! place and leaves the stored luminance alone; call [`Color::refreshed`]
//! when an accurate luminance is needed after a blend.
//!
//! ## Example
//!
//! ```
//! use geomancy::color::Color;
//!
//! let mut c = Color::BLACK;
//! c.blend_towards(&Color::WHITE, 0.5);
//! assert!((c.r - 0.5).abs() < 1e-12);
//! assert_eq!(Color::WHITE.contrast_ratio(&Color::WHITE), 1.0);
//! ```

use crate::error::GeomancyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear interpolation: `(1 - t) * start + t * end`.
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (1.0 - t) * start + t * end
}

/// WCAG gamma expansion of one normalized sRGB channel.
#[inline]
fn linearize(v: f64) -> f64 {
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG 2.0 relative luminance of normalized r, g, b.
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// An RGBA color with r, g, b normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Opacity byte, carried through untouched.
    pub a: u8,
    luminance: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 255,
        luminance: 0.0,
    };

    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 255,
        luminance: 1.0,
    };

    /// Build from byte channels.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_unit(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, a)
    }

    /// Build from normalized channels, clamped to [0, 1].
    pub fn from_unit(r: f64, g: f64, b: f64, a: u8) -> Self {
        let (r, g, b) = (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0));
        Self {
            r,
            g,
            b,
            a,
            luminance: relative_luminance(r, g, b),
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, GeomancyError> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(GeomancyError::InvalidColor(format!(
                "'{}' is not #rrggbb or #rrggbbaa",
                s
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| GeomancyError::InvalidColor(format!("'{}': {}", s, e)))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Luminance as computed when this color was built.
    #[inline]
    pub fn luminance(&self) -> f64 {
        self.luminance
    }

    /// A copy with luminance recomputed from the current channels.
    pub fn refreshed(&self) -> Self {
        Self::from_unit(self.r, self.g, self.b, self.a)
    }

    /// WCAG contrast ratio, from 1.0 (none) to 21.0 (black on white).
    pub fn contrast_ratio(&self, other: &Color) -> f64 {
        let hi = self.luminance.max(other.luminance);
        let lo = self.luminance.min(other.luminance);
        (hi + 0.05) / (lo + 0.05)
    }

    /// Move r, g, b towards `target` by `amount` in [0, 1]. Alpha is kept.
    pub fn blend_towards(&mut self, target: &Color, amount: f64) {
        let t = amount.clamp(0.0, 1.0);
        self.r = lerp(self.r, target.r, t);
        self.g = lerp(self.g, target.g, t);
        self.b = lerp(self.b, target.b, t);
    }

    pub fn lighten(&mut self, amount: f64) {
        self.blend_towards(&Color::WHITE, amount);
    }

    pub fn darken(&mut self, amount: f64) {
        self.blend_towards(&Color::BLACK, amount);
    }

    /// Channels as rounded bytes.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b), self.a]
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

/// One color per step, accumulated by repeatedly blending a running color
/// from `start` towards `end` with `amount = i / steps`.
///
/// Step 0 is `start` itself; later steps compound, so the sequence
/// approaches `end` faster than a plain linear ramp.
pub fn gradient(start: &Color, end: &Color, steps: usize) -> Vec<Color> {
    let mut running = *start;
    (0..steps)
        .map(|i| {
            running.blend_towards(end, i as f64 / steps as f64);
            running.refreshed()
        })
        .collect()
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = GeomancyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl std::str::FromStr for Color {
    type Err = GeomancyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(Color::new(0, 0, 0, 255).luminance(), 0.0);
        assert!((Color::new(255, 255, 255, 255).luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luminance_is_gamma_corrected() {
        // Mid grey: raw 0.502 would give 0.502, corrected is ~0.216
        let grey = Color::new(128, 128, 128, 255);
        assert!((grey.luminance() - 0.2158605).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_ratio() {
        let red = Color::new(200, 30, 30, 255);
        assert_eq!(red.contrast_ratio(&red), 1.0);
        assert!((Color::WHITE.contrast_ratio(&Color::BLACK) - 21.0).abs() < 1e-9);
        assert!((Color::BLACK.contrast_ratio(&Color::WHITE) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_endpoints() {
        let start = Color::new(10, 200, 30, 128);
        let target = Color::new(250, 0, 90, 255);

        let mut c = start;
        c.blend_towards(&target, 0.0);
        assert_eq!(c, start);

        let mut c = start;
        c.blend_towards(&target, 1.0);
        assert_eq!((c.r, c.g, c.b), (target.r, target.g, target.b));
        assert_eq!(c.a, 128);
    }

    #[test]
    fn test_blend_keeps_stale_luminance() {
        let mut c = Color::BLACK;
        c.lighten(1.0);
        assert_eq!(c.luminance(), 0.0);
        assert!((c.refreshed().luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lighten_darken() {
        let mut c = Color::new(100, 100, 100, 255);
        c.lighten(0.5);
        assert!(c.r > 100.0 / 255.0);
        c.darken(1.0);
        assert_eq!(c.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(Color::from_hex("11223344").unwrap().to_hex(), "#11223344");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_gradient_compounds() {
        let steps = gradient(&Color::BLACK, &Color::WHITE, 4);
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].to_rgba8(), [0, 0, 0, 255]);
        // 0.25, then 0.25 + 0.75 * 0.5 = 0.625
        assert!((steps[1].r - 0.25).abs() < 1e-12);
        assert!((steps[2].r - 0.625).abs() < 1e-12);
        assert!(gradient(&Color::BLACK, &Color::WHITE, 0).is_empty());
    }

    #[test]
    fn test_serde_as_hex() {
        let c: Color = serde_json::from_str("\"#0000ff\"").unwrap();
        assert_eq!(c.to_rgba8(), [0, 0, 255, 255]);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#0000ff\"");
    }
}
