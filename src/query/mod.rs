//! Spatial queries: ray picking, screen-rectangle picking, back-face
//! tagging and region containment.
//!
//! Queries that need per-item scratch state write it into mesh tags;
//! see [`crate::mesh::Mesh`] for the tag contract.

pub mod backface;
mod ray;
mod region;
mod screen;

pub use ray::{nearest_element_hit, nearest_face_hit, nearest_render_hit};
pub use region::{
    region_edges, region_elements, region_faces, region_geometry, region_nodes, RegionOptions,
};
pub use screen::{nearest_point_in_rect, nearest_segment_in_rect, ScreenHit};

use crate::math::Point3;

/// Nearest intersection found by a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the item that was hit.
    pub index: usize,
    /// World-space intersection point.
    pub point: Point3,
    /// Distance along the ray.
    pub distance: f64,
}

/// Keeps the closer of `best` and `candidate`. On a tie the earlier hit wins.
fn keep_nearest(best: &mut Option<Hit>, candidate: Hit) {
    if best.is_none_or(|b| candidate.distance < b.distance) {
        *best = Some(candidate);
    }
}
