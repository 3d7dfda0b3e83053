//! Hit testing: which single entity lies under a screen position.

use crate::math::Point3;
use crate::mesh::{Mesh, MeshItem, MeshItemKind, MeshMode};
use crate::query::backface::{tag_front_edges, tag_front_nodes, FRONT};
use crate::query::{
    nearest_element_hit, nearest_face_hit, nearest_point_in_rect, nearest_render_hit,
    nearest_segment_in_rect, ScreenHit,
};
use crate::selection::{EntityKind, EntityRef, SelectionSettings};
use crate::topology::{GObject, Model};
use crate::view::{PlaneCut, ViewTransform};

/// Screen-space cursor shared by every hit test of one pick.
pub(super) struct Cursor<'a> {
    pub view: &'a dyn ViewTransform,
    pub cut: Option<&'a PlaneCut>,
    pub x: f64,
    pub y: f64,
}

fn closer(a: Option<ScreenHit>, b: Option<ScreenHit>) -> Option<ScreenHit> {
    match (a, b) {
        (Some(a), Some(b)) if b.depth < a.depth => Some(b),
        (Some(a), _) => Some(a),
        (None, b) => b,
    }
}

/// Geometry entity of kind `item` under the cursor, across all objects.
pub(super) fn geometry_hit(
    model: &Model,
    item: EntityKind,
    cursor: &Cursor<'_>,
    settings: &SelectionSettings,
) -> Option<EntityRef> {
    match item {
        EntityKind::Object | EntityKind::Part | EntityKind::Surface => {
            let ray = cursor.view.screen_to_ray(cursor.x, cursor.y)?;
            let mut best: Option<(&GObject, usize, f64)> = None;
            for (_, object) in model.objects() {
                if let Some(hit) = nearest_render_hit(object, &ray, cursor.cut) {
                    if best.is_none_or(|(_, _, d)| hit.distance < d) {
                        best = Some((object, hit.index, hit.distance));
                    }
                }
            }
            let (object, surface, _) = best?;
            match item {
                EntityKind::Object => Some(EntityRef::object(object.gid())),
                EntityKind::Surface => Some(EntityRef::new(item, object.gid(), surface)),
                _ => {
                    let part = object
                        .surfaces
                        .get(surface)?
                        .parts
                        .iter()
                        .flatten()
                        .copied()
                        .find(|&p| object.is_part_visible(p))?;
                    Some(EntityRef::new(item, object.gid(), part))
                }
            }
        }
        EntityKind::Edge => {
            let mut best: Option<(&GObject, ScreenHit)> = None;
            for (_, object) in model.objects().filter(|(_, o)| o.visible) {
                let rm = &object.render_mesh;
                let segments = rm.segments.iter().filter_map(|s| {
                    if !object.is_edge_visible(s.edge) {
                        return None;
                    }
                    let [a, b] = rm.segment_points(s)?;
                    Some((s.edge, object.to_world(&a), object.to_world(&b)))
                });
                let hit = nearest_segment_in_rect(
                    cursor.view,
                    segments,
                    cursor.x,
                    cursor.y,
                    settings.geometry_pick_radius,
                    cursor.cut,
                );
                if let Some(hit) = hit {
                    if best.is_none_or(|(_, b)| hit.depth < b.depth) {
                        best = Some((object, hit));
                    }
                }
            }
            best.map(|(o, h)| EntityRef::new(item, o.gid(), h.index))
        }
        EntityKind::Vertex => {
            let mut best: Option<(&GObject, ScreenHit)> = None;
            for (_, object) in model.objects().filter(|(_, o)| o.visible) {
                let points = object
                    .vertices
                    .iter()
                    .filter(|v| v.is_selectable())
                    .map(|v| (v.index, object.to_world(&v.position)));
                let hit = nearest_point_in_rect(
                    cursor.view,
                    points,
                    cursor.x,
                    cursor.y,
                    settings.geometry_pick_radius,
                    cursor.cut,
                );
                if let Some(hit) = hit {
                    if best.is_none_or(|(_, b)| hit.depth < b.depth) {
                        best = Some((object, hit));
                    }
                }
            }
            best.map(|(o, h)| EntityRef::new(item, o.gid(), h.index))
        }
        _ => None,
    }
}

/// Index of the mesh item of `kind` under the cursor.
///
/// Writes back-face tags into the mesh when culling is on.
pub(super) fn mesh_hit(
    object: &mut GObject,
    mode: MeshMode,
    kind: MeshItemKind,
    cursor: &Cursor<'_>,
    settings: &SelectionSettings,
) -> Option<usize> {
    let transform = object.transform;
    let mesh = object.mesh_mut(mode)?;
    let exterior_only = settings.exterior_only && mode == MeshMode::Volume;
    let radius = settings.mesh_pick_radius;
    let world = |mesh: &Mesh, n: usize| transform * mesh.node_position(n);

    match kind {
        MeshItemKind::Element => {
            let by_ray = cursor
                .view
                .screen_to_ray(cursor.x, cursor.y)
                .and_then(|ray| nearest_element_hit(mesh, &transform, &ray, cursor.cut, exterior_only))
                .map(|h| ScreenHit {
                    index: h.index,
                    depth: cursor.view.world_to_screen(&h.point).z,
                });
            let beams: Vec<(usize, Point3, Point3)> = mesh
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_beam() && e.is_visible())
                .map(|(i, e)| (i, world(mesh, e.nodes[0]), world(mesh, e.nodes[1])))
                .collect();
            let by_rect = nearest_segment_in_rect(cursor.view, beams, cursor.x, cursor.y, radius, cursor.cut);
            closer(by_ray, by_rect).map(|h| h.index)
        }
        MeshItemKind::Face => {
            let ray = cursor.view.screen_to_ray(cursor.x, cursor.y)?;
            nearest_face_hit(mesh, &transform, &ray, cursor.cut).map(|h| h.index)
        }
        MeshItemKind::Edge => {
            let cull = settings.cull_backfaces;
            if cull {
                tag_front_edges(mesh, &transform, cursor.view);
            }
            let segments: Vec<(usize, Point3, Point3)> = mesh
                .edges
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_visible() && (!cull || e.state.tag == FRONT))
                .map(|(i, e)| (i, world(mesh, e.nodes[0]), world(mesh, e.nodes[1])))
                .collect();
            nearest_segment_in_rect(cursor.view, segments, cursor.x, cursor.y, radius, cursor.cut)
                .map(|h| h.index)
        }
        MeshItemKind::Node => {
            let cull = settings.cull_backfaces;
            if cull {
                tag_front_nodes(mesh, &transform, cursor.view);
            }
            let points: Vec<(usize, Point3)> = mesh
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| {
                    n.is_visible()
                        && (!cull || n.state.tag == FRONT)
                        && (!exterior_only || n.exterior)
                })
                .map(|(i, n)| (i, transform * n.position))
                .collect();
            nearest_point_in_rect(cursor.view, points, cursor.x, cursor.y, radius, cursor.cut)
                .map(|h| h.index)
        }
    }
}
