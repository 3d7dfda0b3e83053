use crate::math::Vector3;
use crate::mesh::{Mesh, MeshItem, MeshItemKind, NodeEdgeList, NodeFaceList};

use super::{is_visited, mark_unvisited, mark_visited, GrowPolicy, VISITED};

/// Nodes connected to `seed`.
///
/// A node on a geometric vertex selects only itself. A node on feature
/// edges follows those edges (the seed's geometric edge when partitions are
/// respected). Any other node follows the faces around it: faces whose
/// normal lies within the angle tolerance of the seed's averaged normal,
/// staying in one surface partition when partitions are respected.
pub fn connected_nodes(mesh: &mut Mesh, seed: usize, policy: &GrowPolicy) -> Vec<usize> {
    let Some(node) = mesh.nodes.get(seed) else {
        return Vec::new();
    };
    if !node.is_visible() {
        return Vec::new();
    }
    if node.gid.is_some() {
        return vec![seed];
    }
    let edges = NodeEdgeList::new(mesh);
    let feature: Vec<usize> = edges
        .edges(seed)
        .iter()
        .copied()
        .filter(|&e| mesh.edges[e].gid.is_some())
        .collect();
    if feature.is_empty() {
        along_faces(mesh, seed, policy)
    } else {
        along_edges(mesh, seed, &feature, &edges, policy)
    }
}

fn along_edges(
    mesh: &mut Mesh,
    seed: usize,
    start: &[usize],
    incidence: &NodeEdgeList,
    policy: &GrowPolicy,
) -> Vec<usize> {
    let gid = start.first().and_then(|&e| mesh.edges[e].gid);
    mark_unvisited(mesh, MeshItemKind::Node);
    mark_visited(mesh, MeshItemKind::Node, seed);
    let mut stack = vec![seed];
    while let Some(n) = stack.pop() {
        let next: Vec<usize> = incidence
            .edges(n)
            .iter()
            .filter_map(|&ei| {
                let e = &mesh.edges[ei];
                let follow = e.gid.is_some()
                    && e.is_visible()
                    && (!policy.respect_partitions || e.gid == gid);
                follow.then_some(if e.nodes[0] == n { e.nodes[1] } else { e.nodes[0] })
            })
            .collect();
        for m in next {
            if !is_visited(mesh, MeshItemKind::Node, m) && mesh.is_visible(MeshItemKind::Node, m) {
                mark_visited(mesh, MeshItemKind::Node, m);
                stack.push(m);
            }
        }
    }
    mesh.tagged(MeshItemKind::Node, VISITED)
}

fn along_faces(mesh: &mut Mesh, seed: usize, policy: &GrowPolicy) -> Vec<usize> {
    let incidence = NodeFaceList::new(mesh);
    let around: Vec<usize> = incidence
        .faces(seed)
        .iter()
        .copied()
        .filter(|&f| mesh.faces[f].is_visible())
        .collect();
    let Some(&first) = around.first() else {
        return vec![seed];
    };
    let reference = around
        .iter()
        .fold(Vector3::zeros(), |acc, &f| acc + mesh.faces[f].normal)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros);
    let gid = mesh.faces[first].gid;
    let min_cos = policy.min_cosine();
    let admits = |mesh: &Mesh, f: usize| {
        let face = &mesh.faces[f];
        face.is_visible()
            && (!policy.respect_partitions || face.gid == gid)
            && min_cos.is_none_or(|c| face.normal.dot(&reference) >= c)
    };

    mark_unvisited(mesh, MeshItemKind::Face);
    let mut stack = Vec::new();
    for &f in &around {
        if admits(mesh, f) {
            mark_visited(mesh, MeshItemKind::Face, f);
            stack.push(f);
        }
    }
    while let Some(f) = stack.pop() {
        let next: Vec<usize> = mesh.faces[f]
            .nbr
            .iter()
            .flatten()
            .copied()
            .filter(|&n| !is_visited(mesh, MeshItemKind::Face, n) && admits(mesh, n))
            .collect();
        for n in next {
            if !is_visited(mesh, MeshItemKind::Face, n) {
                mark_visited(mesh, MeshItemKind::Face, n);
                stack.push(n);
            }
        }
    }

    let reached = mesh.tagged(MeshItemKind::Face, VISITED);
    let mut out: Vec<usize> = reached
        .iter()
        .flat_map(|&f| mesh.faces[f].nodes().to_vec())
        .filter(|&n| mesh.is_visible(MeshItemKind::Node, n))
        .collect();
    out.push(seed);
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connectivity::fixtures::{cube, grid};

    #[test]
    fn corner_node_selects_itself() {
        let mut m = cube();
        assert_eq!(connected_nodes(&mut m, 3, &GrowPolicy::default()), vec![3]);
    }

    #[test]
    fn feature_edge_walk() {
        // 3 x 1 grid with its bottom boundary as one geometric edge
        let mut m = grid(3, 1);
        for k in 0..3 {
            m.add_edge([k, k + 1], Some(7)).unwrap();
        }
        m.add_edge([4, 5], Some(8)).unwrap();
        m.update_topology();
        assert_eq!(connected_nodes(&mut m, 1, &GrowPolicy::default()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn surface_walk_covers_flat_patch() {
        let mut m = grid(2, 2);
        let all: Vec<usize> = (0..9).collect();
        assert_eq!(connected_nodes(&mut m, 4, &GrowPolicy::default()), all);
        let p = GrowPolicy::default().with_angle_tolerance(Some(10.0));
        assert_eq!(connected_nodes(&mut m, 4, &p), all);
    }

    #[test]
    fn surface_partition_limits_walk() {
        let mut m = grid(2, 1);
        m.faces[1].gid = Some(1);
        // node 3 touches only face 0
        assert_eq!(connected_nodes(&mut m, 3, &GrowPolicy::default()), vec![0, 1, 3, 4]);
    }

    #[test]
    fn hidden_seed_is_empty() {
        let mut m = grid(1, 1);
        m.nodes[0].state.visible = false;
        assert!(connected_nodes(&mut m, 0, &GrowPolicy::default()).is_empty());
    }
}
