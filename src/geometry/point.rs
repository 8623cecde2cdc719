//! 2D point algebra shared by every generator.
//!
//! [`Point`] is a `Copy` value: every operation returns a new point rather
//! than mutating the receiver, so recursive generators can hand points down
//! the call stack without aliasing.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point (or vector) in image space. The y axis is not flipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Heading of `self` as seen from `other`, in radians.
    ///
    /// `atan2(self.y - other.y, self.x - other.x)`, so `end.angle_of(start)`
    /// is the direction of travel from `start` to `end`.
    #[inline]
    pub fn angle_of(self, other: Point) -> f64 {
        (self.y - other.y).atan2(self.x - other.x)
    }

    /// The point `radius` away from `self` along `radians`.
    #[inline]
    pub fn make_point(self, radius: f64, radians: f64) -> Point {
        Point::new(
            self.x + radius * radians.cos(),
            self.y + radius * radians.sin(),
        )
    }

    /// Rotate about `pivot` by `radians` (standard rotation matrix).
    pub fn rotate(self, radians: f64, pivot: Point) -> Point {
        let (s, c) = radians.sin_cos();
        let local = self - pivot;
        Point::new(local.x * c - local.y * s, local.x * s + local.y * c) + pivot
    }

    /// Mirror the x coordinate through `pivot.x`.
    #[inline]
    pub fn reflect_x(self, pivot: Point) -> Point {
        Point::new(2.0 * pivot.x - self.x, self.y)
    }

    /// Mirror the y coordinate through `pivot.y`.
    #[inline]
    pub fn reflect_y(self, pivot: Point) -> Point {
        Point::new(self.x, 2.0 * pivot.y - self.y)
    }

    /// Point reflection through `pivot` (both axes).
    #[inline]
    pub fn reflect(self, pivot: Point) -> Point {
        self.reflect_x(pivot).reflect_y(pivot)
    }

    #[inline]
    pub fn translate(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Midpoint of `self` and `other`, truncated to whole pixels.
    pub fn halfway_to(self, other: Point) -> Point {
        Point::new(
            ((self.x + other.x) / 2.0).trunc(),
            ((self.y + other.y) / 2.0).trunc(),
        )
    }

    /// Offset by independent whole-pixel amounts drawn from
    /// `[-max_dx, max_dx]` and `[-max_dy, max_dy]`.
    pub fn jitter<R: Rng + ?Sized>(self, max_dx: f64, max_dy: f64, rng: &mut R) -> Point {
        let mx = max_dx.abs().trunc() as i64;
        let my = max_dy.abs().trunc() as i64;
        let dx = rng.random_range(-mx..=mx);
        let dy = rng.random_range(-my..=my);
        self.translate(dx as f64, dy as f64)
    }

    /// Truncate both coordinates toward zero.
    #[inline]
    pub fn trunc(self) -> Point {
        Point::new(self.x.trunc(), self.y.trunc())
    }
}

/// Axis-aligned `(min, max)` corners of `points`, or `None` when empty.
pub fn bounds<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<(Point, Point)> {
    let mut points = points.into_iter();
    let first = *points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x as i64, self.y as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_distance() {
        assert!((Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_of() {
        let start = Point::new(10.0, 10.0);
        assert!(Point::new(20.0, 10.0).angle_of(start).abs() < 1e-12);
        assert!((Point::new(10.0, 20.0).angle_of(start) - FRAC_PI_2).abs() < 1e-12);
        assert!((Point::new(0.0, 10.0).angle_of(start) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_make_point() {
        let p = Point::new(1.0, 1.0).make_point(2.0, FRAC_PI_2);
        assert_close(p, Point::new(1.0, 3.0));
    }

    #[test]
    fn test_rotate_about_pivot() {
        let p = Point::new(2.0, 1.0).rotate(FRAC_PI_2, Point::new(1.0, 1.0));
        assert_close(p, Point::new(1.0, 2.0));
    }

    #[test]
    fn test_rotate_roundtrip() {
        let pivot = Point::new(-12.5, 40.0);
        for i in 0..50 {
            let p = Point::new(i as f64 * 7.3 - 100.0, 250.0 - i as f64 * 3.1);
            let theta = i as f64 * 0.37;
            assert_close(p.rotate(theta, pivot).rotate(-theta, pivot), p);
        }
    }

    #[test]
    fn test_reflect_involution() {
        let pivot = Point::new(3.0, -7.0);
        let p = Point::new(11.25, 2.5);
        assert_eq!(p.reflect_x(pivot).reflect_x(pivot), p);
        assert_eq!(p.reflect_y(pivot).reflect_y(pivot), p);
        assert_eq!(p.reflect_x(pivot), Point::new(-5.25, 2.5));
        assert_eq!(p.reflect(pivot), Point::new(-5.25, -16.5));
    }

    #[test]
    fn test_halfway_truncates() {
        let mid = Point::new(0.0, 0.0).halfway_to(Point::new(5.0, -3.0));
        assert_eq!(mid, Point::new(2.0, -1.0));
    }

    #[test]
    fn test_jitter_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let origin = Point::new(100.0, 100.0);
        for _ in 0..200 {
            let p = origin.jitter(5.0, 2.0, &mut rng);
            assert!((p.x - 100.0).abs() <= 5.0);
            assert!((p.y - 100.0).abs() <= 2.0);
            assert_eq!(p, p.trunc());
        }
    }

    #[test]
    fn test_jitter_zero_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Point::new(4.5, 6.5);
        assert_eq!(p.jitter(0.0, 0.0, &mut rng), p);
    }

    #[test]
    fn test_operators() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(0.5, -1.0);
        assert_eq!(a + b, Point::new(1.5, 1.0));
        assert_eq!(a - b, Point::new(0.5, 3.0));
        assert_eq!(a.to_string(), "(1,2)");
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds(&Vec::<Point>::new()), None);

        let points = [Point::new(3.0, -2.0), Point::new(-4.0, 8.0), Point::new(1.0, 1.0)];
        assert_eq!(
            bounds(&points),
            Some((Point::new(-4.0, -2.0), Point::new(3.0, 8.0)))
        );
        assert_eq!(bounds(&points[2..]), Some((points[2], points[2])));
    }
}
