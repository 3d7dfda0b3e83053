use std::collections::HashMap;

use crate::math::Vector3;
use crate::mesh::{Element, Mesh, MeshItem, MeshItemKind};

use super::{is_visited, mark_unvisited, mark_visited, GrowPolicy};

fn shell_normal(mesh: &Mesh, el: &Element) -> Vector3 {
    el.faces
        .first()
        .copied()
        .flatten()
        .and_then(|f| mesh.faces.get(f))
        .map_or_else(|| mesh.polygon_normal(&el.nodes), |f| f.normal)
}

/// Beams sharing an end node, per node.
fn beams_by_node(mesh: &Mesh) -> HashMap<usize, Vec<usize>> {
    let mut map: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, el) in mesh.elements.iter().enumerate() {
        if el.is_beam() {
            for &n in &el.nodes {
                map.entry(n).or_default().push(i);
            }
        }
    }
    map
}

/// Candidate neighbours of element `ei` under `policy`, before the visited
/// check.
fn candidates(
    mesh: &Mesh,
    ei: usize,
    policy: &GrowPolicy,
    min_cos: Option<f64>,
    beams: &HashMap<usize, Vec<usize>>,
) -> Vec<usize> {
    let el = &mesh.elements[ei];
    let same_part = |other: &Element| !policy.respect_partitions || other.gid == el.gid;
    let mut out = Vec::new();
    if el.is_solid() {
        for (j, nbr) in el.nbr.iter().enumerate() {
            let Some(nb) = nbr.and_then(|n| mesh.elements.get(n).map(|e| (n, e))) else {
                continue;
            };
            if !nb.1.is_visible() || !same_part(nb.1) {
                continue;
            }
            // an interior face that belongs to a surface partition is a wall
            let walled = el
                .faces
                .get(j)
                .copied()
                .flatten()
                .and_then(|f| mesh.faces.get(f))
                .is_some_and(|f| f.gid.is_some());
            if policy.respect_partitions && walled {
                continue;
            }
            if policy.exterior_only && !nb.1.is_exterior() {
                continue;
            }
            out.push(nb.0);
        }
    } else if el.is_shell() {
        let normal = shell_normal(mesh, el);
        for nbr in el.nbr.iter().flatten() {
            let Some(nb) = mesh.elements.get(*nbr) else {
                continue;
            };
            if !nb.is_visible() || !same_part(nb) {
                continue;
            }
            if min_cos.is_some_and(|c| shell_normal(mesh, nb).dot(&normal) < c) {
                continue;
            }
            out.push(*nbr);
        }
    } else {
        for n in &el.nodes {
            for &bi in beams.get(n).into_iter().flatten() {
                if bi != ei && mesh.elements[bi].is_visible() && same_part(&mesh.elements[bi]) {
                    out.push(bi);
                }
            }
        }
    }
    out
}

/// Elements reachable from `seed`.
///
/// Solids grow across shared faces, shells across shared sides (subject to
/// the angle tolerance between the normals of adjacent shells, not against
/// the seed), beams across shared nodes.
/// With partitions respected, growth stays inside the seed's part and does
/// not cross interior faces that carry a surface partition. With
/// `exterior_only`, solid growth only enters exterior elements.
pub fn connected_elements(mesh: &mut Mesh, seed: usize, policy: &GrowPolicy) -> Vec<usize> {
    if !mesh.elements.get(seed).is_some_and(MeshItem::is_visible) {
        return Vec::new();
    }
    let min_cos = policy.min_cosine();
    let beams = beams_by_node(mesh);

    mark_unvisited(mesh, MeshItemKind::Element);
    mark_visited(mesh, MeshItemKind::Element, seed);
    let mut out = Vec::new();
    let mut stack = vec![seed];
    while let Some(ei) = stack.pop() {
        out.push(ei);
        for ni in candidates(mesh, ei, policy, min_cos, &beams) {
            if !is_visited(mesh, MeshItemKind::Element, ni) {
                mark_visited(mesh, MeshItemKind::Element, ni);
                stack.push(ni);
            }
        }
    }
    out.sort_unstable();
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connectivity::fixtures::grid;
    use crate::math::Point3;
    use crate::mesh::ElementShape;

    /// `n` hexes in a row along x; element `i` belongs to part `parts[i]`.
    fn row(parts: &[usize]) -> Mesh {
        let mut m = Mesh::new();
        for i in 0..=parts.len() {
            let x = f64::from(u32::try_from(i).unwrap());
            for (y, z) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                m.add_node(Point3::new(x, y, z));
            }
        }
        for (i, &gid) in parts.iter().enumerate() {
            let a = 4 * i;
            let b = a + 4;
            let nodes = vec![a, b, b + 3, a + 3, a + 1, b + 1, b + 2, a + 2];
            m.add_element(ElementShape::Hex8, nodes, gid).unwrap();
        }
        m.update_topology();
        m
    }

    #[test]
    fn solids_grow_through_shared_faces() {
        let mut m = row(&[0, 0, 0]);
        assert_eq!(connected_elements(&mut m, 0, &GrowPolicy::default()), vec![0, 1, 2]);
    }

    #[test]
    fn part_boundary_stops_solids() {
        let mut m = row(&[0, 0, 1]);
        assert_eq!(connected_elements(&mut m, 0, &GrowPolicy::default()), vec![0, 1]);
        let free = GrowPolicy::default().with_respect_partitions(false);
        assert_eq!(connected_elements(&mut m, 0, &free), vec![0, 1, 2]);
    }

    #[test]
    fn partitioned_interior_face_is_a_wall() {
        let mut m = row(&[0, 0]);
        let shared = m.elements[0].face_nodes(
            m.elements[0].nbr.iter().position(Option::is_some).unwrap(),
        );
        m.add_face(&shared, Some(3)).unwrap();
        m.update_topology();
        assert_eq!(connected_elements(&mut m, 0, &GrowPolicy::default()), vec![0]);
    }

    #[test]
    fn hidden_elements_block_growth() {
        let mut m = row(&[0, 0, 0]);
        m.elements[1].state.visible = false;
        assert_eq!(connected_elements(&mut m, 0, &GrowPolicy::default()), vec![0]);
        assert!(connected_elements(&mut m, 1, &GrowPolicy::default()).is_empty());
    }

    #[test]
    fn shells_respect_angle() {
        let mut m = grid(2, 1);
        // fold the right quad up by 90 degrees around x = 1
        for n in [2, 5] {
            m.nodes[n].position = Point3::new(1.0, m.nodes[n].position.y, 1.0);
        }
        m.update_topology();
        let narrow = GrowPolicy::default().with_angle_tolerance(Some(45.0));
        assert_eq!(connected_elements(&mut m, 0, &narrow), vec![0]);
        let wide = GrowPolicy::default().with_angle_tolerance(Some(95.0));
        assert_eq!(connected_elements(&mut m, 0, &wide), vec![0, 1]);
    }

    #[test]
    fn beams_chain_through_nodes() {
        let mut m = Mesh::new();
        for i in 0..4 {
            m.add_node(Point3::new(f64::from(i), 0.0, 0.0));
        }
        m.add_element(ElementShape::Beam2, vec![0, 1], 0).unwrap();
        m.add_element(ElementShape::Beam2, vec![1, 2], 0).unwrap();
        m.add_element(ElementShape::Beam2, vec![2, 3], 1).unwrap();
        m.update_topology();
        assert_eq!(connected_elements(&mut m, 0, &GrowPolicy::default()), vec![0, 1]);
    }
}
