//! Back-face tagging passes.
//!
//! Each pass overwrites the tags of the collections it touches: afterwards
//! `tag == FRONT` marks an item that may be picked with back-face culling
//! on, and every other item carries `BACK`.

use crate::math::polygon_2d::is_backfacing;
use crate::math::{Isometry3, Point2};
use crate::mesh::{Mesh, MeshItem, MeshItemKind};
use crate::view::ViewTransform;

pub const FRONT: i32 = 1;
pub const BACK: i32 = 0;

fn projected(mesh: &Mesh, nodes: &[usize], transform: &Isometry3, view: &dyn ViewTransform) -> Vec<Point2> {
    nodes
        .iter()
        .map(|&n| view.project(&(transform * mesh.node_position(n))))
        .collect()
}

/// `true` if the projected polygon (3 or 4 corners) faces the viewer.
/// A quad faces the viewer if either of its triangles does.
fn polygon_faces_viewer(pts: &[Point2]) -> bool {
    match *pts {
        [a, b, c] => !is_backfacing(&[a, b, c]),
        [a, b, c, d] => !is_backfacing(&[a, b, c]) || !is_backfacing(&[c, d, a]),
        _ => false,
    }
}

/// Tags external faces that face the viewer. Internal faces are `BACK`.
pub fn tag_front_faces(mesh: &mut Mesh, transform: &Isometry3, view: &dyn ViewTransform) {
    let tags: Vec<i32> = mesh
        .faces
        .iter()
        .map(|f| {
            let front = f.is_external()
                && polygon_faces_viewer(&projected(mesh, f.nodes(), transform, view));
            if front {
                FRONT
            } else {
                BACK
            }
        })
        .collect();
    for (f, t) in mesh.faces.iter_mut().zip(tags) {
        f.state.tag = t;
    }
}

/// Tags nodes of front-facing faces. Also overwrites face tags.
pub fn tag_front_nodes(mesh: &mut Mesh, transform: &Isometry3, view: &dyn ViewTransform) {
    tag_front_faces(mesh, transform, view);
    mesh.tag_all_nodes(BACK);
    for fi in 0..mesh.faces.len() {
        if mesh.faces[fi].state.tag != FRONT {
            continue;
        }
        for k in 0..mesh.faces[fi].side_count() {
            let n = mesh.faces[fi].nodes()[k];
            if let Some(node) = mesh.nodes.get_mut(n) {
                node.state.tag = FRONT;
            }
        }
    }
}

/// Tags edges whose two nodes are both front-facing. Also overwrites node
/// and face tags.
pub fn tag_front_edges(mesh: &mut Mesh, transform: &Isometry3, view: &dyn ViewTransform) {
    tag_front_nodes(mesh, transform, view);
    let front_node = |m: &Mesh, n: usize| m.state(MeshItemKind::Node, n).is_some_and(|s| s.tag == FRONT);
    let tags: Vec<i32> = mesh
        .edges
        .iter()
        .map(|e| {
            if front_node(mesh, e.nodes[0]) && front_node(mesh, e.nodes[1]) {
                FRONT
            } else {
                BACK
            }
        })
        .collect();
    for (e, t) in mesh.edges.iter_mut().zip(tags) {
        e.state.tag = t;
    }
}

/// Tags elements with at least one uncovered face (no neighbour, or a
/// hidden one) that faces the viewer. Shells and beams are always `FRONT`.
pub fn tag_front_elements(mesh: &mut Mesh, transform: &Isometry3, view: &dyn ViewTransform) {
    let tags: Vec<i32> = mesh
        .elements
        .iter()
        .map(|el| {
            if !el.is_solid() {
                return FRONT;
            }
            let front = (0..el.face_count()).any(|j| {
                let covered = el.nbr[j].is_some_and(|n| mesh.elements.get(n).is_some_and(MeshItem::is_visible));
                !covered && polygon_faces_viewer(&projected(mesh, &el.face_nodes(j), transform, view))
            });
            if front {
                FRONT
            } else {
                BACK
            }
        })
        .collect();
    for (el, t) in mesh.elements.iter_mut().zip(tags) {
        el.state.tag = t;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::mesh::ElementShape;
    use crate::view::OrthographicView;

    fn cube() -> Mesh {
        let mut m = Mesh::new();
        for z in [0.0, 1.0] {
            for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                m.add_node(Point3::new(x, y, z));
            }
        }
        m.add_element(ElementShape::Hex8, (0..8).collect(), 0).unwrap();
        m.extract_faces();
        m
    }

    fn view() -> OrthographicView {
        OrthographicView::new(100.0, 100.0, 10.0)
    }

    #[test]
    fn only_top_face_faces_down_looking_camera() {
        let mut m = cube();
        tag_front_faces(&mut m, &Isometry3::identity(), &view());
        let front = m.tagged(MeshItemKind::Face, FRONT);
        assert_eq!(front.len(), 1);
        assert!(m.faces[front[0]].normal.z > 0.5);
    }

    #[test]
    fn bottom_nodes_are_back() {
        let mut m = cube();
        tag_front_nodes(&mut m, &Isometry3::identity(), &view());
        assert_eq!(m.tagged(MeshItemKind::Node, FRONT), vec![4, 5, 6, 7]);
    }

    #[test]
    fn edges_follow_node_tags() {
        let mut m = cube();
        m.add_edge([4, 5], None).unwrap();
        m.add_edge([0, 4], None).unwrap();
        tag_front_edges(&mut m, &Isometry3::identity(), &view());
        assert_eq!(m.tagged(MeshItemKind::Edge, FRONT), vec![0]);
    }

    #[test]
    fn solid_with_top_face_is_front() {
        let mut m = cube();
        tag_front_elements(&mut m, &Isometry3::identity(), &view());
        assert_eq!(m.elements[0].state.tag, FRONT);

        // flipped upside down the top face is the old bottom, still external
        let flip = Isometry3::rotation(crate::math::Vector3::new(std::f64::consts::PI, 0.0, 0.0));
        tag_front_elements(&mut m, &flip, &view());
        assert_eq!(m.elements[0].state.tag, FRONT);
    }

    #[test]
    fn shells_are_always_front() {
        let mut m = Mesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
            m.add_node(Point3::new(x, y, 0.0));
        }
        // clockwise seen from above
        m.add_element(ElementShape::Tri3, vec![0, 2, 1], 0).unwrap();
        tag_front_elements(&mut m, &Isometry3::identity(), &view());
        assert_eq!(m.elements[0].state.tag, FRONT);
    }
}
