use crate::math::intersect_2d::segment_rect_intersect_2d;
use crate::math::{Point2, Point3};
use crate::view::{passes_cut, PlaneCut, ViewTransform};

/// Item found by a screen-rectangle query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenHit {
    pub index: usize,
    /// Normalized depth of the item (smaller is closer).
    pub depth: f64,
}

fn keep_closest(best: &mut Option<ScreenHit>, candidate: ScreenHit) {
    if best.is_none_or(|b| candidate.depth < b.depth) {
        *best = Some(candidate);
    }
}

/// Closest world point whose projection falls in the square of half-size
/// `radius` around `(x, y)`.
///
/// Points outside the frustum or on the cut-away side of `cut` are ignored.
pub fn nearest_point_in_rect(
    view: &dyn ViewTransform,
    points: impl IntoIterator<Item = (usize, Point3)>,
    x: f64,
    y: f64,
    radius: f64,
    cut: Option<&PlaneCut>,
) -> Option<ScreenHit> {
    let mut best = None;
    for (index, p) in points {
        if !passes_cut(cut, &p) {
            continue;
        }
        let s = view.world_to_screen(&p);
        if !view.point_visible_in_frustum(&s) {
            continue;
        }
        if (s.x - x).abs() <= radius && (s.y - y).abs() <= radius {
            keep_closest(&mut best, ScreenHit { index, depth: s.z });
        }
    }
    best
}

/// Closest world segment whose projection crosses the square of half-size
/// `radius` around `(x, y)`.
///
/// A segment needs at least one end inside the frustum and at least one end
/// on the kept side of `cut`. Its depth is that of its nearer end.
pub fn nearest_segment_in_rect(
    view: &dyn ViewTransform,
    segments: impl IntoIterator<Item = (usize, Point3, Point3)>,
    x: f64,
    y: f64,
    radius: f64,
    cut: Option<&PlaneCut>,
) -> Option<ScreenHit> {
    let min = Point2::new(x - radius, y - radius);
    let max = Point2::new(x + radius, y + radius);
    let mut best = None;
    for (index, a, b) in segments {
        if !passes_cut(cut, &a) && !passes_cut(cut, &b) {
            continue;
        }
        let sa = view.world_to_screen(&a);
        let sb = view.world_to_screen(&b);
        if !view.point_visible_in_frustum(&sa) && !view.point_visible_in_frustum(&sb) {
            continue;
        }
        if segment_rect_intersect_2d(&Point2::new(sa.x, sa.y), &Point2::new(sb.x, sb.y), &min, &max) {
            keep_closest(
                &mut best,
                ScreenHit {
                    index,
                    depth: sa.z.min(sb.z),
                },
            );
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::OrthographicView;

    fn view() -> OrthographicView {
        // 1 world unit = 10 px, origin at (50, 50)
        OrthographicView::new(100.0, 100.0, 10.0)
    }

    #[test]
    fn closest_point_by_depth() {
        let pts = vec![
            (0, Point3::new(0.0, 0.0, 0.0)),
            (1, Point3::new(0.1, 0.0, 2.0)),
            (2, Point3::new(3.0, 0.0, 5.0)),
        ];
        let hit = nearest_point_in_rect(&view(), pts, 50.0, 50.0, 4.0, None).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn no_point_in_rect() {
        let pts = vec![(0, Point3::new(2.0, 2.0, 0.0))];
        assert!(nearest_point_in_rect(&view(), pts, 50.0, 50.0, 4.0, None).is_none());
    }

    #[test]
    fn cut_point_is_ignored() {
        let pts = vec![(0, Point3::new(0.0, 0.0, 0.0)), (1, Point3::new(0.0, 0.0, 2.0))];
        let cut = PlaneCut::new(0.0, 0.0, -1.0, 1.0);
        let hit = nearest_point_in_rect(&view(), pts, 50.0, 50.0, 4.0, Some(&cut)).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn segment_crossing_rect() {
        let segs = vec![
            (0, Point3::new(-2.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)),
            (1, Point3::new(-2.0, 3.0, 1.0), Point3::new(2.0, 3.0, 1.0)),
        ];
        let hit = nearest_segment_in_rect(&view(), segs, 50.0, 50.0, 6.0, None).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn nearer_segment_wins() {
        let segs = vec![
            (0, Point3::new(-2.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)),
            (1, Point3::new(0.0, -2.0, 1.0), Point3::new(0.0, 2.0, 1.0)),
        ];
        let hit = nearest_segment_in_rect(&view(), segs, 50.0, 50.0, 6.0, None).unwrap();
        assert_eq!(hit.index, 1);
    }
}
