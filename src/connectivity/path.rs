use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::math::Point3;
use crate::mesh::{Mesh, MeshItem, MeshItemKind, NodeEdgeList};

/// Min-heap entry ordered by cost.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    cost: f64,
    index: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra over `count` vertices. `links(v)` yields `(w, weight)` pairs.
/// Returns the vertices from `from` to `to` inclusive, or `None` if `to`
/// is unreachable.
fn dijkstra(
    count: usize,
    from: usize,
    to: usize,
    mut links: impl FnMut(usize) -> Vec<(usize, f64)>,
) -> Option<Vec<usize>> {
    let mut dist = vec![f64::INFINITY; count];
    let mut prev: Vec<Option<usize>> = vec![None; count];
    let mut heap = BinaryHeap::new();
    *dist.get_mut(from)? = 0.0;
    heap.push(Frontier { cost: 0.0, index: from });
    while let Some(Frontier { cost, index }) = heap.pop() {
        if index == to {
            break;
        }
        if cost > dist[index] {
            continue;
        }
        for (w, weight) in links(index) {
            let next = cost + weight;
            if next < dist[w] {
                dist[w] = next;
                prev[w] = Some(index);
                heap.push(Frontier { cost: next, index: w });
            }
        }
    }
    if !dist.get(to)?.is_finite() {
        return None;
    }
    let mut path = vec![to];
    let mut at = to;
    while let Some(p) = prev[at] {
        path.push(p);
        at = p;
    }
    path.reverse();
    Some(path)
}

fn node_distance(mesh: &Mesh, a: usize, b: usize) -> f64 {
    (mesh.node_position(a) - mesh.node_position(b)).norm()
}

/// Node graph over feature edges only.
fn edge_graph_path(mesh: &Mesh, from: usize, to: usize) -> Option<Vec<usize>> {
    let incidence = NodeEdgeList::new(mesh);
    dijkstra(mesh.nodes.len(), from, to, |n| {
        incidence
            .edges(n)
            .iter()
            .map(|&e| &mesh.edges[e])
            .filter(|e| e.is_visible())
            .map(|e| if e.nodes[0] == n { e.nodes[1] } else { e.nodes[0] })
            .filter(|&m| mesh.is_visible(MeshItemKind::Node, m))
            .map(|m| (m, node_distance(mesh, n, m)))
            .collect()
    })
}

/// Node graph over the sides of visible faces and all visible edges.
fn surface_graph_path(mesh: &Mesh, from: usize, to: usize) -> Option<Vec<usize>> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); mesh.nodes.len()];
    let mut link = |a: usize, b: usize| {
        if a < adjacency.len() && b < adjacency.len() {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    };
    for f in mesh.faces.iter().filter(|f| f.is_visible()) {
        for j in 0..f.side_count() {
            let [a, b] = f.side(j);
            link(a, b);
        }
    }
    for e in mesh.edges.iter().filter(|e| e.is_visible()) {
        link(e.nodes[0], e.nodes[1]);
    }
    dijkstra(mesh.nodes.len(), from, to, |n| {
        adjacency[n]
            .iter()
            .copied()
            .filter(|&m| mesh.is_visible(MeshItemKind::Node, m))
            .map(|m| (m, node_distance(mesh, n, m)))
            .collect()
    })
}

/// Nodes on the shortest path from `from` to `to`, in path order.
///
/// When both anchors lie on mesh edges the path runs along edges only;
/// otherwise it runs over face sides and edges. Paths are weighted by
/// length and avoid hidden nodes. Returns `[from]` when the anchors
/// coincide and an empty list when they are not connected.
#[must_use]
pub fn shortest_node_path(mesh: &Mesh, from: usize, to: usize) -> Vec<usize> {
    if from >= mesh.nodes.len() || to >= mesh.nodes.len() {
        return Vec::new();
    }
    if from == to {
        return vec![from];
    }
    let incidence = NodeEdgeList::new(mesh);
    let on_edges = !incidence.edges(from).is_empty() && !incidence.edges(to).is_empty();
    let path = if on_edges {
        edge_graph_path(mesh, from, to).or_else(|| surface_graph_path(mesh, from, to))
    } else {
        surface_graph_path(mesh, from, to)
    };
    path.unwrap_or_default()
}

/// Faces on the shortest path between two faces, walking across shared
/// sides and weighted by the distance between face centres.
#[must_use]
pub fn shortest_face_path(mesh: &Mesh, from: usize, to: usize) -> Vec<usize> {
    if from >= mesh.faces.len() || to >= mesh.faces.len() {
        return Vec::new();
    }
    if from == to {
        return vec![from];
    }
    let centres: Vec<_> = (0..mesh.faces.len())
        .map(|i| mesh.face_center(i).unwrap_or_else(Point3::origin))
        .collect();
    dijkstra(mesh.faces.len(), from, to, |f| {
        mesh.faces[f]
            .nbr
            .iter()
            .flatten()
            .copied()
            .filter(|&n| mesh.is_visible(MeshItemKind::Face, n))
            .map(|n| (n, (centres[n] - centres[f]).norm()))
            .collect()
    })
    .unwrap_or_default()
}

/// Edges along the shortest chain joining two mesh edges.
///
/// The chain starts from the closest pair of end nodes; the result is every
/// edge with both nodes on that chain or on the two anchor edges.
#[must_use]
pub fn shortest_edge_path(mesh: &Mesh, from: usize, to: usize) -> Vec<usize> {
    let (Some(a), Some(b)) = (mesh.edges.get(from), mesh.edges.get(to)) else {
        return Vec::new();
    };
    if from == to {
        return vec![from];
    }
    let mut best = (a.nodes[0], b.nodes[0]);
    let mut best_d = f64::INFINITY;
    for &na in &a.nodes {
        for &nb in &b.nodes {
            let d = node_distance(mesh, na, nb);
            if d < best_d {
                best_d = d;
                best = (na, nb);
            }
        }
    }
    let Some(chain) = edge_graph_path(mesh, best.0, best.1) else {
        return Vec::new();
    };
    let on_path: HashSet<usize> = chain
        .into_iter()
        .chain(a.nodes)
        .chain(b.nodes)
        .collect();
    mesh.edges
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_visible())
        .filter(|(_, e)| on_path.contains(&e.nodes[0]) && on_path.contains(&e.nodes[1]))
        .map(|(i, _)| i)
        .collect()
}
