use super::{Point3, Ray, TOLERANCE};

/// Slack on barycentric coordinates so that hits exactly on a shared edge
/// are not lost between two triangles.
const BARYCENTRIC_SLACK: f64 = 1e-9;

/// A ray hit on a triangle or quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray (positive).
    pub t: f64,
    /// The intersection point.
    pub point: Point3,
    /// First barycentric coordinate (weight of the second vertex).
    pub u: f64,
    /// Second barycentric coordinate (weight of the third vertex).
    pub v: f64,
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Both windings are hit; facing is decided elsewhere. Returns `None` for
/// zero-area triangles, rays parallel to the triangle plane and hits behind
/// the ray origin.
#[must_use]
pub fn ray_triangle(ray: &Ray, a: &Point3, b: &Point3, c: &Point3) -> Option<RayHit> {
    let e1 = b - a;
    let e2 = c - a;
    if e1.cross(&e2).norm() < TOLERANCE {
        return None;
    }

    let pvec = ray.direction.cross(&e2);
    let det = e1.dot(&pvec);
    if det.abs() < TOLERANCE {
        return None;
    }
    let inv = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(&pvec) * inv;
    if !(-BARYCENTRIC_SLACK..=1.0 + BARYCENTRIC_SLACK).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = ray.direction.dot(&qvec) * inv;
    if v < -BARYCENTRIC_SLACK || u + v > 1.0 + BARYCENTRIC_SLACK {
        return None;
    }

    let t = e2.dot(&qvec) * inv;
    if t <= TOLERANCE {
        return None;
    }

    Some(RayHit {
        t,
        point: ray.point_at(t),
        u,
        v,
    })
}

/// Ray/quad intersection, splitting the quad into `(0, 1, 2)` and `(2, 3, 0)`.
#[must_use]
pub fn ray_quad(ray: &Ray, q: &[Point3; 4]) -> Option<RayHit> {
    ray_triangle(ray, &q[0], &q[1], &q[2]).or_else(|| ray_triangle(ray, &q[2], &q[3], &q[0]))
}

/// Ray intersection with a planar polygon given as 3 or 4 corners.
///
/// Other corner counts never hit.
#[must_use]
pub fn ray_polygon(ray: &Ray, corners: &[Point3]) -> Option<RayHit> {
    match corners {
        [a, b, c] => ray_triangle(ray, a, b, c),
        [a, b, c, d] => ray_quad(ray, &[*a, *b, *c, *d]),
        _ => None,
    }
}

/// Signed distance of `point` to the plane `a*x + b*y + c*z + d = 0`.
///
/// The result is scaled by the length of `(a, b, c)`; only its sign is
/// meaningful for unnormalized coefficients.
#[must_use]
pub fn signed_distance_to_plane(point: &Point3, coefficients: &[f64; 4]) -> f64 {
    let [a, b, c, d] = *coefficients;
    a * point.x + b * point.y + c * point.z + d
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn down_ray(x: f64, y: f64) -> Ray {
        Ray::new(p(x, y, 10.0), Vector3::new(0.0, 0.0, -1.0)).unwrap()
    }

    #[test]
    fn hits_triangle_interior() {
        let hit = ray_triangle(
            &down_ray(0.25, 0.25),
            &p(0.0, 0.0, 1.0),
            &p(1.0, 0.0, 1.0),
            &p(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(hit.t, 9.0);
        assert_relative_eq!(hit.point.z, 1.0);
        assert_relative_eq!(hit.u, 0.25);
        assert_relative_eq!(hit.v, 0.25);
    }

    #[test]
    fn misses_outside_triangle() {
        assert!(ray_triangle(
            &down_ray(0.75, 0.75),
            &p(0.0, 0.0, 0.0),
            &p(1.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn hits_either_winding() {
        let r = down_ray(0.2, 0.2);
        assert!(ray_triangle(&r, &p(0.0, 0.0, 0.0), &p(0.0, 1.0, 0.0), &p(1.0, 0.0, 0.0)).is_some());
    }

    #[test]
    fn triangle_behind_origin_is_ignored() {
        let r = down_ray(0.2, 0.2);
        assert!(ray_triangle(&r, &p(0.0, 0.0, 20.0), &p(1.0, 0.0, 20.0), &p(0.0, 1.0, 20.0)).is_none());
    }

    #[test]
    fn degenerate_triangle_never_matches() {
        let r = down_ray(0.5, 0.0);
        assert!(ray_triangle(&r, &p(0.0, 0.0, 0.0), &p(1.0, 0.0, 0.0), &p(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn quad_hit_on_second_half() {
        let q = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ];
        // (0.1, 0.9) lies in triangle (2, 3, 0)
        let hit = ray_quad(&down_ray(0.1, 0.9), &q).unwrap();
        assert_relative_eq!(hit.point.x, 0.1);
        assert_relative_eq!(hit.point.y, 0.9);
        assert!(ray_quad(&down_ray(1.1, 0.5), &q).is_none());
    }

    #[test]
    fn polygon_dispatch() {
        let tri = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];
        assert!(ray_polygon(&down_ray(0.1, 0.1), &tri).is_some());
        assert!(ray_polygon(&down_ray(0.1, 0.1), &tri[..2]).is_none());
    }

    #[test]
    fn plane_side() {
        let plane = [0.0, 0.0, 1.0, -1.0];
        assert!(signed_distance_to_plane(&p(0.0, 0.0, 2.0), &plane) > 0.0);
        assert!(signed_distance_to_plane(&p(0.0, 0.0, 0.0), &plane) < 0.0);
    }
}
