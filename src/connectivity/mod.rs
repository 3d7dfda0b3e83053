//! Connectivity growth: flood fills and shortest paths over mesh adjacency.
//!
//! Every traversal here owns the tags of the collection it walks. Tags are
//! reset on entry (unvisited items carry their own index, visited ones
//! [`VISITED`]) and are left clobbered on return.

mod edges;
mod elements;
mod faces;
mod nodes;
mod path;

pub use edges::connected_edges;
pub use elements::connected_elements;
pub use faces::connected_faces;
pub use nodes::connected_nodes;
pub use path::{shortest_edge_path, shortest_face_path, shortest_node_path};

use tracing::debug;

use crate::mesh::{Mesh, MeshItemKind};
use crate::selection::SelectionSettings;

/// Tag value of an item a traversal has already reached.
pub const VISITED: i32 = -1;

/// Constraints applied while growing a selection from a seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowPolicy {
    /// Stop at partition boundaries (parts for elements, surfaces for
    /// faces, geometric edges for edges).
    pub respect_partitions: bool,
    /// Maximum angle in degrees between the representative directions of
    /// two adjacent items. `None`, zero or negative means unconstrained.
    pub angle_tolerance_deg: Option<f64>,
    /// Select along shortest paths between consecutive picks.
    pub shortest_path: bool,
    /// Solid element growth only enters elements with an exterior face.
    pub exterior_only: bool,
}

impl Default for GrowPolicy {
    fn default() -> Self {
        Self {
            respect_partitions: true,
            angle_tolerance_deg: None,
            shortest_path: false,
            exterior_only: false,
        }
    }
}

impl GrowPolicy {
    #[must_use]
    pub fn with_respect_partitions(mut self, on: bool) -> Self {
        self.respect_partitions = on;
        self
    }

    #[must_use]
    pub fn with_angle_tolerance(mut self, degrees: Option<f64>) -> Self {
        self.angle_tolerance_deg = degrees;
        self
    }

    #[must_use]
    pub fn with_shortest_path(mut self, on: bool) -> Self {
        self.shortest_path = on;
        self
    }

    #[must_use]
    pub fn with_exterior_only(mut self, on: bool) -> Self {
        self.exterior_only = on;
        self
    }

    /// Minimum dot product two unit directions must reach, with a small
    /// relative slack so that 0° and 180° limits survive round-off.
    #[must_use]
    pub fn min_cosine(&self) -> Option<f64> {
        self.angle_tolerance_deg
            .filter(|&deg| deg > 0.0)
            .map(|deg| 1.000_001 * deg.to_radians().cos())
    }
}

impl From<&SelectionSettings> for GrowPolicy {
    fn from(s: &SelectionSettings) -> Self {
        Self {
            respect_partitions: s.respect_partitions,
            angle_tolerance_deg: s.angle_limited.then_some(s.angle_tolerance_deg),
            shortest_path: s.select_path,
            exterior_only: s.exterior_only,
        }
    }
}

/// Resets the tags of one collection so that each unvisited item carries
/// its own index.
fn mark_unvisited(mesh: &mut Mesh, kind: MeshItemKind) {
    mesh.for_each_state_mut(kind, |i, s| s.tag = i32::try_from(i).unwrap_or(i32::MAX));
}

fn is_visited(mesh: &Mesh, kind: MeshItemKind, index: usize) -> bool {
    mesh.state(kind, index).is_some_and(|s| s.tag == VISITED)
}

fn mark_visited(mesh: &mut Mesh, kind: MeshItemKind, index: usize) {
    if let Some(s) = mesh.state_mut(kind, index) {
        s.tag = VISITED;
    }
}

/// Items of `kind` reachable from `seed` under `policy`, sorted.
///
/// Empty if the seed is out of range or hidden. Clobbers the tags of the
/// walked collection.
pub fn grow_from_seed(
    mesh: &mut Mesh,
    kind: MeshItemKind,
    seed: usize,
    policy: &GrowPolicy,
) -> Vec<usize> {
    let grown = match kind {
        MeshItemKind::Element => connected_elements(mesh, seed, policy),
        MeshItemKind::Face => connected_faces(mesh, seed, policy),
        MeshItemKind::Edge => connected_edges(mesh, seed, policy),
        MeshItemKind::Node => connected_nodes(mesh, seed, policy),
    };
    debug!(kind = kind.name(), seed, count = grown.len(), "grown from seed");
    grown
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn policy_from_settings() {
        let s = SelectionSettings::default().with_angle_tolerance(45.0);
        let p = GrowPolicy::from(&s);
        assert_eq!(p.angle_tolerance_deg, Some(45.0));
        assert!(p.respect_partitions);

        let p = GrowPolicy::from(&SelectionSettings::default());
        assert_eq!(p.angle_tolerance_deg, None);
        assert!(p.min_cosine().is_none());
    }

    #[test]
    fn zero_tolerance_is_unconstrained() {
        let p = GrowPolicy::default().with_angle_tolerance(Some(0.0));
        assert!(p.min_cosine().is_none());
        let p = GrowPolicy::default().with_angle_tolerance(Some(180.0));
        assert!(p.min_cosine().unwrap() < -1.0);
        let p = GrowPolicy::default().with_angle_tolerance(Some(60.0));
        assert_relative_eq!(p.min_cosine().unwrap(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn dispatch_out_of_range_is_empty() {
        let mut m = fixtures::cube();
        let p = GrowPolicy::default();
        assert!(grow_from_seed(&mut m, MeshItemKind::Face, 99, &p).is_empty());
        assert!(grow_from_seed(&mut m, MeshItemKind::Node, 99, &p).is_empty());
        assert_eq!(grow_from_seed(&mut m, MeshItemKind::Element, 0, &p), vec![0]);
    }
}
