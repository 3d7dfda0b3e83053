use crate::math::intersect_3d::{ray_polygon, ray_triangle};
use crate::math::{Isometry3, Point3, Ray};
use crate::mesh::{Mesh, MeshItem};
use crate::topology::GObject;
use crate::view::{passes_cut, PlaneCut};

use super::{keep_nearest, Hit};

/// Tests one local polygon and records the hit if it survives the cut.
fn test_polygon(
    best: &mut Option<Hit>,
    index: usize,
    corners: &[Point3],
    local: &Ray,
    transform: &Isometry3,
    cut: Option<&PlaneCut>,
) {
    if let Some(h) = ray_polygon(local, corners) {
        let point = transform * h.point;
        if passes_cut(cut, &point) {
            keep_nearest(
                best,
                Hit {
                    index,
                    point,
                    distance: h.t,
                },
            );
        }
    }
}

/// Nearest visible mesh face hit by a world-space ray.
///
/// `transform` places the mesh in the world. Hidden faces and hits on the
/// cut-away side of `cut` are ignored.
#[must_use]
pub fn nearest_face_hit(
    mesh: &Mesh,
    transform: &Isometry3,
    ray: &Ray,
    cut: Option<&PlaneCut>,
) -> Option<Hit> {
    let local = ray.to_local(transform);
    let mut best = None;
    for (i, face) in mesh.faces.iter().enumerate() {
        if !face.is_visible() {
            continue;
        }
        let corners = mesh.face_points(face);
        test_polygon(&mut best, i, &corners, &local, transform, cut);
    }
    best
}

/// Nearest visible element hit by a world-space ray.
///
/// With `exterior_only`, a solid element face takes part only when it has no
/// neighbour or the neighbour is hidden. Beams are never hit by rays.
#[must_use]
pub fn nearest_element_hit(
    mesh: &Mesh,
    transform: &Isometry3,
    ray: &Ray,
    cut: Option<&PlaneCut>,
    exterior_only: bool,
) -> Option<Hit> {
    let local = ray.to_local(transform);
    let mut best = None;
    for (i, el) in mesh.elements.iter().enumerate() {
        if !el.is_visible() || el.is_beam() {
            continue;
        }
        for j in 0..el.face_count() {
            if exterior_only && el.is_solid() {
                let covered = el
                    .nbr
                    .get(j)
                    .copied()
                    .flatten()
                    .is_some_and(|n| mesh.elements.get(n).is_some_and(MeshItem::is_visible));
                if covered {
                    continue;
                }
            }
            let corners: Vec<Point3> = el
                .face_nodes(j)
                .iter()
                .map(|&n| mesh.node_position(n))
                .collect();
            test_polygon(&mut best, i, &corners, &local, transform, cut);
        }
    }
    best
}

/// Nearest visible render triangle of an object; the hit index is the
/// owning surface.
#[must_use]
pub fn nearest_render_hit(object: &GObject, ray: &Ray, cut: Option<&PlaneCut>) -> Option<Hit> {
    if !object.visible {
        return None;
    }
    let local = ray.to_local(&object.transform);
    let rm = &object.render_mesh;
    let mut best = None;
    for tri in &rm.triangles {
        if !object.is_surface_visible(tri.surface) {
            continue;
        }
        let Some([a, b, c]) = rm.triangle_points(tri) else {
            continue;
        };
        if let Some(h) = ray_triangle(&local, &a, &b, &c) {
            let point = object.to_world(&h.point);
            if passes_cut(cut, &point) {
                keep_nearest(
                    &mut best,
                    Hit {
                        index: tri.surface,
                        point,
                        distance: h.t,
                    },
                );
            }
        }
    }
    best
}
