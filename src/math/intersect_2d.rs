use super::{Point2, TOLERANCE};

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are the parameters
/// on the two segments, both in `[0, 1]`. Parallel segments never intersect.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = (d.x * db.y - d.y * db.x) / cross;
    let u = (d.x * da.y - d.y * da.x) / cross;

    // Use a small epsilon to include endpoints.
    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some((a0 + da * t, t, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Returns `true` if the segment touches the axis-aligned rectangle
/// `[min, max]`, either by having an endpoint inside or by crossing one of
/// its sides.
#[must_use]
pub fn segment_rect_intersect_2d(p0: &Point2, p1: &Point2, min: &Point2, max: &Point2) -> bool {
    let inside = |p: &Point2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;
    if inside(p0) || inside(p1) {
        return true;
    }
    let corners = [
        Point2::new(min.x, min.y),
        Point2::new(max.x, min.y),
        Point2::new(max.x, max.y),
        Point2::new(min.x, max.y),
    ];
    (0..4).any(|i| {
        segment_segment_intersect_2d(p0, p1, &corners[i], &corners[(i + 1) % 4]).is_some()
    })
}

/// Returns `true` if the segment passes within `radius` of `center`.
#[must_use]
pub fn segment_circle_intersect_2d(p0: &Point2, p1: &Point2, center: &Point2, radius: f64) -> bool {
    let r2 = radius * radius;
    if (p0 - center).norm_squared() <= r2 || (p1 - center).norm_squared() <= r2 {
        return true;
    }
    let t = p1 - p0;
    let n = t.norm_squared();
    if n < TOLERANCE {
        return false;
    }
    let s = t.dot(&(center - p0)) / n;
    if !(0.0..=1.0).contains(&s) {
        return false;
    }
    let closest = p0 + t * s;
    (closest - center).norm_squared() <= r2
}
