//! Stroke rasterizer for PNG previews.
//!
//! Each stroke is first accumulated into a coverage mask the size of its
//! bounding box (taking the maximum where segments overlap, so joints do
//! not darken), then composited onto the image in one pass.

use crate::color::Color;
use crate::error::GeomancyError;
use crate::geometry::{Drawing, Point, Stroke, bounds};
use image::{Rgba, RgbaImage};
use log::debug;
use std::path::Path;

/// Thinnest line drawn, in pixels.
const MIN_THICKNESS: f64 = 1.0;

/// Per-stroke coverage in [0, 1], covering a window of the image.
struct Mask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    buf: Vec<f32>,
}

impl Mask {
    /// Window around `points` grown by `pad`, clipped to the image.
    fn covering(points: &[Point], pad: f64, image_w: u32, image_h: u32) -> Option<Self> {
        let (lo, hi) = bounds(points)?;

        let x0 = (lo.x - pad).floor().max(0.0);
        let y0 = (lo.y - pad).floor().max(0.0);
        let x1 = (hi.x + pad).ceil().min(image_w as f64 - 1.0);
        let y1 = (hi.y + pad).ceil().min(image_h as f64 - 1.0);
        if !(x1 >= x0 && y1 >= y0) {
            return None;
        }

        let width = (x1 - x0) as u32 + 1;
        let height = (y1 - y0) as u32 + 1;
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            width,
            height,
            buf: vec![0.0; (width * height) as usize],
        })
    }

    /// Raise coverage at image pixel (x, y), keeping the maximum.
    #[inline]
    fn blend(&mut self, x: i64, y: i64, coverage: f32) {
        let lx = x - self.x0 as i64;
        let ly = y - self.y0 as i64;
        if lx < 0 || ly < 0 || lx >= self.width as i64 || ly >= self.height as i64 {
            return;
        }
        let idx = (ly as u32 * self.width + lx as u32) as usize;
        self.buf[idx] = self.buf[idx].max(coverage);
    }

    /// Pixel index range of the window intersected with `[lo, hi]` on one axis.
    fn span(&self, lo: f64, hi: f64, vertical: bool) -> (i64, i64) {
        let (start, len) = if vertical {
            (self.y0 as i64, self.height as i64)
        } else {
            (self.x0 as i64, self.width as i64)
        };
        let a = (lo.floor() as i64).max(start);
        let b = (hi.ceil() as i64).min(start + len - 1);
        (a, b)
    }

    fn disc(&mut self, center: Point, radius: f64, intensity: f32) {
        let (x_lo, x_hi) = self.span(center.x - radius - 1.0, center.x + radius + 1.0, false);
        let (y_lo, y_hi) = self.span(center.y - radius - 1.0, center.y + radius + 1.0, true);

        for py in y_lo..=y_hi {
            for px in x_lo..=x_hi {
                let dist = (px as f64 - center.x).hypot(py as f64 - center.y);
                self.cover(px, py, dist, radius, intensity);
            }
        }
    }

    /// Thick segment: pixels within `half` of the segment are fully
    /// covered, with a one pixel anti-aliased edge.
    fn segment(&mut self, a: Point, b: Point, half: f64, intensity: f32) {
        let d = b - a;
        let len_sq = d.x * d.x + d.y * d.y;
        if len_sq < 1e-6 {
            self.disc(a, half, intensity);
            return;
        }

        let (x_lo, x_hi) = self.span(a.x.min(b.x) - half - 1.0, a.x.max(b.x) + half + 1.0, false);
        let (y_lo, y_hi) = self.span(a.y.min(b.y) - half - 1.0, a.y.max(b.y) + half + 1.0, true);

        for py in y_lo..=y_hi {
            for px in x_lo..=x_hi {
                let p = Point::new(px as f64, py as f64);
                let t = (((p.x - a.x) * d.x + (p.y - a.y) * d.y) / len_sq).clamp(0.0, 1.0);
                let closest = Point::new(a.x + t * d.x, a.y + t * d.y);
                self.cover(px, py, p.distance(closest), half, intensity);
            }
        }
    }

    #[inline]
    fn cover(&mut self, px: i64, py: i64, dist: f64, half: f64, intensity: f32) {
        if dist <= half {
            self.blend(px, py, intensity);
        } else if dist <= half + 1.0 {
            let aa = 1.0 - (dist - half) as f32;
            self.blend(px, py, intensity * aa);
        }
    }

    /// Source-over composite of `color` through the mask.
    fn composite(&self, img: &mut RgbaImage, color: &Color) {
        let [r, g, b, a] = color.to_rgba8();
        let src_alpha = a as f32 / 255.0;

        for ly in 0..self.height {
            for lx in 0..self.width {
                let coverage = self.buf[(ly * self.width + lx) as usize];
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = coverage * src_alpha;
                let px = img.get_pixel_mut(self.x0 + lx, self.y0 + ly);
                let mix = |dst: u8, src: u8| {
                    (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8
                };
                let Rgba([dr, dg, db, da]) = *px;
                *px = Rgba([
                    mix(dr, r),
                    mix(dg, g),
                    mix(db, b),
                    (da as f32 + (255.0 - da as f32) * alpha).round() as u8,
                ]);
            }
        }
    }
}

/// Fade multiplier for the segment starting at point `index` of `count`.
#[inline]
fn fade_factor(index: usize, count: usize) -> f32 {
    1.0 - index as f32 / count.max(1) as f32
}

fn paint_stroke(img: &mut RgbaImage, stroke: &Stroke) {
    let half = stroke.width.max(MIN_THICKNESS) / 2.0;
    let Some(mut mask) = Mask::covering(&stroke.points, half + 1.0, img.width(), img.height())
    else {
        return;
    };

    let opacity = stroke.opacity as f32;
    let count = stroke.points.len();
    let intensity = |i: usize| {
        if stroke.fade {
            opacity * fade_factor(i, count)
        } else {
            opacity
        }
    };

    if let [only] = stroke.points.as_slice() {
        mask.disc(*only, half, opacity);
    }

    for (i, pair) in stroke.points.windows(2).enumerate() {
        mask.segment(pair[0], pair[1], half, intensity(i));
    }

    if stroke.closed && count > 2 {
        mask.segment(
            stroke.points[count - 1],
            stroke.points[0],
            half,
            intensity(count - 1),
        );
    }

    mask.composite(img, &stroke.color);
}

/// Paint every stroke of `drawing`, in order, over a `background` fill.
pub fn rasterize(drawing: &Drawing, background: &Color) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(drawing.width, drawing.height, Rgba(background.to_rgba8()));
    for stroke in &drawing.strokes {
        paint_stroke(&mut img, stroke);
    }
    debug!(
        "rasterized {} strokes onto {}x{}",
        drawing.strokes.len(),
        drawing.width,
        drawing.height
    );
    img
}

/// Save a rendered image as PNG.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), GeomancyError> {
    img.save(path)
        .map_err(|e| GeomancyError::Image(format!("Failed to save PNG: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn line(points: Vec<Point>) -> Drawing {
        let mut drawing = Drawing::new(20, 10);
        drawing.push(Stroke::new("test", points));
        drawing
    }

    #[test]
    fn test_background_only() {
        let img = rasterize(&Drawing::new(8, 4), &Color::WHITE);
        assert_eq!(img.dimensions(), (8, 4));
        assert!(img.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_horizontal_line() {
        let drawing = line(vec![Point::new(2.0, 5.0), Point::new(17.0, 5.0)]);
        let img = rasterize(&drawing, &Color::WHITE);
        assert_eq!(img.get_pixel(10, 5).0, BLACK);
        assert_eq!(img.get_pixel(10, 8).0, WHITE);
        assert_eq!(img.get_pixel(19, 5).0, WHITE);
    }

    #[test]
    fn test_opacity_blends() {
        let mut drawing = line(vec![Point::new(2.0, 5.0), Point::new(17.0, 5.0)]);
        drawing.strokes[0] = drawing.strokes[0].clone().opacity(0.5);
        let img = rasterize(&drawing, &Color::WHITE);
        let v = img.get_pixel(10, 5).0[0];
        assert!((127..=128).contains(&v), "got {}", v);
    }

    #[test]
    fn test_closed_stroke_draws_last_edge() {
        let square = vec![
            Point::new(2.0, 2.0),
            Point::new(17.0, 2.0),
            Point::new(17.0, 7.0),
            Point::new(2.0, 7.0),
        ];
        let open = rasterize(&line(square.clone()), &Color::WHITE);
        assert_eq!(open.get_pixel(2, 5).0, WHITE);

        let mut drawing = line(square);
        drawing.strokes[0].closed = true;
        let closed = rasterize(&drawing, &Color::WHITE);
        assert_eq!(closed.get_pixel(2, 5).0, BLACK);
    }

    #[test]
    fn test_fade_lightens_towards_the_end() {
        let mut drawing = line(vec![
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(19.0, 5.0),
        ]);
        drawing.strokes[0].fade = true;
        let img = rasterize(&drawing, &Color::WHITE);
        assert_eq!(img.get_pixel(3, 5).0, BLACK);
        assert!(img.get_pixel(16, 5).0[0] > 0);
    }

    #[test]
    fn test_offscreen_stroke_is_skipped() {
        let drawing = line(vec![Point::new(-50.0, -50.0), Point::new(-30.0, -40.0)]);
        let img = rasterize(&drawing, &Color::WHITE);
        assert!(img.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn test_single_point_is_a_dot() {
        let mut drawing = line(vec![Point::new(5.0, 5.0)]);
        drawing.strokes[0].width = 3.0;
        let img = rasterize(&drawing, &Color::WHITE);
        assert_eq!(img.get_pixel(5, 5).0, BLACK);
        assert_eq!(img.get_pixel(6, 5).0, BLACK);
    }

    #[test]
    fn test_save_png() {
        let path = std::env::temp_dir().join(format!("geomancy-raster-{}.png", std::process::id()));
        let drawing = line(vec![Point::new(2.0, 5.0), Point::new(17.0, 5.0)]);
        save_png(&rasterize(&drawing, &Color::WHITE), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (20, 10));
        assert_eq!(loaded.get_pixel(10, 5).0, BLACK);
        std::fs::remove_file(&path).unwrap();
    }
}
