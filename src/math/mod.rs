pub mod intersect_2d;
pub mod intersect_3d;
pub mod polygon_2d;

/// 2D point type (screen space).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rigid body transform used to place objects in the world.
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// A half-line `origin + t * direction`, `t >= 0`.
///
/// The direction is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` for a zero-length direction.
    #[must_use]
    pub fn new(origin: Point3, direction: Vector3) -> Option<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Point at parameter `t` along the ray.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Maps a world-space ray into the local frame of `transform`.
    #[must_use]
    pub fn to_local(&self, transform: &Isometry3) -> Self {
        let inv = transform.inverse();
        Self {
            origin: inv * self.origin,
            direction: inv * self.direction,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_normalizes_direction() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -4.0)).unwrap();
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.point_at(2.0).z, -2.0);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Point3::origin(), Vector3::zeros()).is_none());
    }

    #[test]
    fn local_ray_undoes_translation() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 10.0), Vector3::new(0.0, 0.0, -1.0)).unwrap();
        let t = Isometry3::translation(1.0, 2.0, 0.0);
        let local = ray.to_local(&t);
        assert_relative_eq!(local.origin.x, 0.0);
        assert_relative_eq!(local.origin.y, 0.0);
        assert_relative_eq!(local.direction.z, -1.0);
    }
}
