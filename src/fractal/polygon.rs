//! Side replication shared by the Koch and Sierpinski generators.
//!
//! A single base curve is copied into `n` sides. The copies are not plain
//! rotations: each point is carried through a running sequence of
//! transforms, alternating rotate-then-reflect (odd sides) with a reflection
//! about the base midpoint (even sides), which keeps neighbouring sides
//! mirror-continuous.

use crate::geometry::{Point, Polyline, bounds};

/// Replicate `curve` into `n_sides` sides.
///
/// For every point a running copy is transformed side by side:
/// side 0 is the point itself; odd sides rotate the running copy by
/// `rotation_deg` about `start` and then mirror its x about `start`; even
/// sides after the first mirror its x about the truncated midpoint of
/// `start` and `end`.
pub fn replicate(
    curve: &[Point],
    n_sides: usize,
    rotation_deg: f64,
    start: Point,
    end: Point,
) -> Vec<Polyline> {
    let mid = start.halfway_to(end);
    let theta = rotation_deg.to_radians();
    let mut sides = vec![Vec::with_capacity(curve.len()); n_sides];

    for &point in curve {
        let mut item = point;
        for (i, side) in sides.iter_mut().enumerate() {
            if i % 2 == 1 {
                item = item.rotate(theta, start).reflect_x(start);
            } else if i > 0 {
                item = item.reflect_x(mid);
            }
            side.push(item);
        }
    }

    sides
}

/// Shift every point vertically so the combined bounding box is centered
/// in `height`.
pub fn center_vertically(sides: &mut [Polyline], height: f64) {
    let Some((lo, hi)) = bounds(sides.iter().flatten()) else {
        return;
    };

    let shift = height / 2.0 - (hi.y - lo.y) / 2.0 - lo.y;
    for p in sides.iter_mut().flatten() {
        p.y += shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_side_is_the_curve() {
        let curve = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let sides = replicate(&curve, 1, 360.0, curve[0], curve[1]);
        assert_eq!(sides, vec![curve]);
    }

    #[test]
    fn test_two_sides_mirror() {
        // 180 degrees about start then mirror x: the segment flips onto itself
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);
        let sides = replicate(&[start, end], 2, 180.0, start, end);
        assert_eq!(sides.len(), 2);
        assert!((sides[1][1].x - 10.0).abs() < 1e-9);
        assert!(sides[1][1].y.abs() < 1e-9);
    }

    #[test]
    fn test_every_side_has_every_point() {
        let curve: Vec<Point> = (0..7).map(|i| Point::new(i as f64, (i * i) as f64)).collect();
        let sides = replicate(&curve, 5, 72.0, curve[0], curve[6]);
        assert!(sides.iter().all(|s| s.len() == curve.len()));
    }

    #[test]
    fn test_center_vertically() {
        let mut sides = vec![
            vec![Point::new(0.0, 10.0), Point::new(5.0, 30.0)],
            vec![Point::new(1.0, 20.0)],
        ];
        center_vertically(&mut sides, 100.0);
        assert_eq!(sides[0][0].y, 40.0);
        assert_eq!(sides[0][1].y, 60.0);
        assert_eq!(sides[1][0].y, 50.0);
        assert_eq!(sides[0][1].x, 5.0);
    }

    #[test]
    fn test_center_empty_is_noop() {
        let mut sides: Vec<Polyline> = vec![vec![], vec![]];
        center_vertically(&mut sides, 100.0);
        assert!(sides.iter().all(|s| s.is_empty()));
    }
}
