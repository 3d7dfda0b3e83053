use std::collections::HashSet;

use crate::mesh::{Mesh, MeshItem, MeshItemKind};

use super::{is_visited, mark_unvisited, mark_visited, GrowPolicy};

fn side_key(side: [usize; 2]) -> (usize, usize) {
    (side[0].min(side[1]), side[0].max(side[1]))
}

/// Node pairs joined by a partitioned (feature) edge.
fn crease_sides(mesh: &Mesh) -> HashSet<(usize, usize)> {
    mesh.edges
        .iter()
        .filter(|e| e.gid.is_some())
        .map(|e| side_key(e.nodes))
        .collect()
}

/// Faces reachable from `seed` across shared sides.
///
/// A neighbour is entered when it is visible and not yet visited. With an
/// angle tolerance, its normal must lie within the tolerance of the face it
/// is reached from. With partitions respected, it must belong to the seed's
/// surface partition and the shared side must not lie on a feature edge.
///
/// The normal reference is local: each step compares two adjacent faces,
/// so a smooth surface grows across its whole extent even when its far
/// side faces away from the seed. Around a cube, a tolerance above 90°
/// reaches all six sides.
pub fn connected_faces(mesh: &mut Mesh, seed: usize, policy: &GrowPolicy) -> Vec<usize> {
    let Some(seed_face) = mesh.faces.get(seed) else {
        return Vec::new();
    };
    if !seed_face.is_visible() {
        return Vec::new();
    }
    let seed_gid = seed_face.gid;
    let min_cos = policy.min_cosine();
    let creases = if policy.respect_partitions {
        crease_sides(mesh)
    } else {
        HashSet::new()
    };

    mark_unvisited(mesh, MeshItemKind::Face);
    mark_visited(mesh, MeshItemKind::Face, seed);
    let mut out = Vec::new();
    let mut stack = vec![seed];
    while let Some(fi) = stack.pop() {
        out.push(fi);
        let face = &mesh.faces[fi];
        let mut next = Vec::new();
        for j in 0..face.side_count() {
            let Some(ni) = face.nbr[j] else {
                continue;
            };
            let Some(nb) = mesh.faces.get(ni) else {
                continue;
            };
            if is_visited(mesh, MeshItemKind::Face, ni) || !nb.is_visible() {
                continue;
            }
            if min_cos.is_some_and(|c| nb.normal.dot(&face.normal) < c) {
                continue;
            }
            if policy.respect_partitions
                && (nb.gid != seed_gid || creases.contains(&side_key(face.side(j))))
            {
                continue;
            }
            next.push(ni);
        }
        for ni in next {
            if !is_visited(mesh, MeshItemKind::Face, ni) {
                mark_visited(mesh, MeshItemKind::Face, ni);
                stack.push(ni);
            }
        }
    }
    out.sort_unstable();
    out
}
