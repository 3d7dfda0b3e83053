use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the projected triangle is back-facing.
///
/// Counter-clockwise winding in screen space is front-facing. Zero-area
/// (edge-on or degenerate) triangles count as back-facing.
#[must_use]
pub fn is_backfacing(tri: &[Point2; 3]) -> bool {
    signed_area_2d(tri) <= TOLERANCE
}

/// Axis-aligned bounds `(min, max)` of a point set, or `None` if empty.
#[must_use]
pub fn polygon_bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for pt in &points[1..] {
        min.x = min.x.min(pt.x);
        min.y = min.y.min(pt.y);
        max.x = max.x.max(pt.x);
        max.y = max.y.max(pt.y);
    }
    Some((min, max))
}

/// Crossing-number point-in-polygon test.
///
/// The polygon is implicitly closed. Points exactly on a horizontal edge
/// are resolved by nudging the scan line up by a small offset.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let yc = point.y + 1e-4;
    let mut crossings = 0usize;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        if (b.y > yc && a.y < yc) || (a.y > yc && b.y < yc) {
            let xi = b.x + (a.x - b.x) * (b.y - yc) / (b.y - a.y);
            if xi > point.x {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}
