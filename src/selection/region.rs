use crate::math::intersect_2d::{
    segment_circle_intersect_2d, segment_rect_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::Point2;

/// A screen-space selection region, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectRegion {
    /// Axis-aligned rectangle.
    Box { min: Point2, max: Point2 },
    Circle { center: Point2, radius: f64 },
    /// Closed free-hand polygon (the last point connects to the first).
    Free(Vec<Point2>),
}

impl SelectRegion {
    /// Rectangle spanned by two drag corners, in any order.
    #[must_use]
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::Box {
            min: Point2::new(x0.min(x1), y0.min(y1)),
            max: Point2::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Circle around `center`; the radius sign is ignored.
    #[must_use]
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self::Circle {
            center,
            radius: radius.abs(),
        }
    }

    #[must_use]
    pub fn free(points: Vec<Point2>) -> Self {
        Self::Free(points)
    }

    /// `true` if the screen point lies inside the region.
    #[must_use]
    pub fn is_inside(&self, p: &Point2) -> bool {
        match self {
            Self::Box { min, max } => p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y,
            Self::Circle { center, radius } => (p - center).norm_squared() <= radius * radius,
            Self::Free(poly) => point_in_polygon(p, poly),
        }
    }

    /// `true` if the segment has an end inside the region or crosses its
    /// boundary.
    #[must_use]
    pub fn line_intersects(&self, p0: &Point2, p1: &Point2) -> bool {
        match self {
            Self::Box { min, max } => segment_rect_intersect_2d(p0, p1, min, max),
            Self::Circle { center, radius } => segment_circle_intersect_2d(p0, p1, center, *radius),
            Self::Free(poly) => {
                if self.is_inside(p0) || self.is_inside(p1) {
                    return true;
                }
                let n = poly.len();
                n >= 2
                    && (0..n).any(|i| {
                        segment_segment_intersect_2d(p0, p1, &poly[i], &poly[(i + 1) % n]).is_some()
                    })
            }
        }
    }

    /// `true` if any corner is inside the region or any triangle edge
    /// crosses the region boundary.
    ///
    /// A triangle that fully contains a small region without touching it
    /// does not count.
    #[must_use]
    pub fn triangle_intersects(&self, tri: &[Point2; 3]) -> bool {
        tri.iter().any(|p| self.is_inside(p))
            || (0..3).any(|i| self.line_intersects(&tri[i], &tri[(i + 1) % 3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn rect_normalizes_corners() {
        let r = SelectRegion::rect(10.0, 10.0, 0.0, 0.0);
        assert!(r.is_inside(&p(5.0, 5.0)));
        assert!(r.is_inside(&p(0.0, 10.0)));
        assert!(!r.is_inside(&p(-1.0, 5.0)));
    }

    #[test]
    fn circle_containment() {
        let c = SelectRegion::circle(p(0.0, 0.0), -2.0);
        assert!(c.is_inside(&p(1.0, 1.0)));
        assert!(!c.is_inside(&p(2.0, 2.0)));
        assert!(c.line_intersects(&p(-5.0, 1.0), &p(5.0, 1.0)));
    }

    #[test]
    fn free_region_edge_crossing() {
        let tri = SelectRegion::free(vec![p(0.0, 0.0), p(10.0, 0.0), p(0.0, 10.0)]);
        assert!(tri.is_inside(&p(2.0, 2.0)));
        assert!(!tri.is_inside(&p(8.0, 8.0)));
        // both ends outside, crossing the hypotenuse and a leg
        assert!(tri.line_intersects(&p(-1.0, 5.0), &p(8.0, 5.0)));
        assert!(!tri.line_intersects(&p(8.0, 8.0), &p(9.0, 9.0)));
    }

    #[test]
    fn triangle_overlap_rules() {
        let r = SelectRegion::rect(0.0, 0.0, 10.0, 10.0);
        // vertex inside
        assert!(r.triangle_intersects(&[p(5.0, 5.0), p(20.0, 5.0), p(20.0, 20.0)]));
        // edges cross, no vertex inside
        assert!(r.triangle_intersects(&[p(-5.0, 5.0), p(15.0, 5.0), p(5.0, 30.0)]));
        // disjoint
        assert!(!r.triangle_intersects(&[p(20.0, 20.0), p(30.0, 20.0), p(20.0, 30.0)]));
        // small region swallowed by a large triangle is not a hit
        let small = SelectRegion::rect(1.0, 1.0, 2.0, 2.0);
        assert!(!small.triangle_intersects(&[p(-50.0, -50.0), p(50.0, -50.0), p(0.0, 50.0)]));
    }
}
