use crate::mesh::{Mesh, MeshItem, MeshItemKind, NodeEdgeList};

use super::{is_visited, mark_unvisited, mark_visited, GrowPolicy};

/// Mesh edges reachable from `seed` through shared nodes.
///
/// With an angle tolerance every grown edge's tangent must be within it of
/// the seed's tangent, in either direction, so a curve made of short
/// segments stops once it has turned away from the seed. With partitions respected and a seed on
/// a geometric edge, growth stays on that geometric edge.
pub fn connected_edges(mesh: &mut Mesh, seed: usize, policy: &GrowPolicy) -> Vec<usize> {
    let Some(seed_edge) = mesh.edges.get(seed) else {
        return Vec::new();
    };
    if !seed_edge.is_visible() {
        return Vec::new();
    }
    let seed_gid = seed_edge.gid;
    let min_cos = policy.min_cosine();
    let seed_tangent = mesh.edge_tangent(seed);
    let incidence = NodeEdgeList::new(mesh);

    mark_unvisited(mesh, MeshItemKind::Edge);
    mark_visited(mesh, MeshItemKind::Edge, seed);
    let mut out = Vec::new();
    let mut stack = vec![seed];
    while let Some(ei) = stack.pop() {
        out.push(ei);
        let mut next = Vec::new();
        for &node in &mesh.edges[ei].nodes {
            for &oi in incidence.edges(node) {
                if oi == ei || is_visited(mesh, MeshItemKind::Edge, oi) {
                    continue;
                }
                let other = &mesh.edges[oi];
                if !other.is_visible() {
                    continue;
                }
                if policy.respect_partitions && seed_gid.is_some() && other.gid != seed_gid {
                    continue;
                }
                if let Some(c) = min_cos {
                    let aligned = match (seed_tangent, mesh.edge_tangent(oi)) {
                        (Some(t1), Some(t2)) => t1.dot(&t2).abs() >= c,
                        _ => false,
                    };
                    if !aligned {
                        continue;
                    }
                }
                next.push(oi);
            }
        }
        for oi in next {
            if !is_visited(mesh, MeshItemKind::Edge, oi) {
                mark_visited(mesh, MeshItemKind::Edge, oi);
                stack.push(oi);
            }
        }
    }
    out.sort_unstable();
    out
}
