use crate::math::{Point3, Vector3};

/// State shared by every mesh item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState {
    /// Stable external id (1-based, as exported to solvers).
    pub nid: usize,
    /// Scratch integer for traversals. Not persisted; see [`crate::mesh::Mesh`].
    pub tag: i32,
    pub selected: bool,
    pub visible: bool,
}

impl ItemState {
    /// A visible, unselected item with the given external id.
    #[must_use]
    pub fn new(nid: usize) -> Self {
        Self {
            nid,
            tag: 0,
            selected: false,
            visible: true,
        }
    }
}

/// Access to the common state of a mesh item.
pub trait MeshItem {
    fn state(&self) -> &ItemState;
    fn state_mut(&mut self) -> &mut ItemState;

    fn is_visible(&self) -> bool {
        self.state().visible
    }

    fn is_selected(&self) -> bool {
        self.state().selected
    }
}

/// A mesh node.
#[derive(Debug, Clone)]
pub struct Node {
    pub state: ItemState,
    /// Position in the owning object's local frame.
    pub position: Point3,
    /// Geometric vertex this node sits on, if any (a corner node).
    pub gid: Option<usize>,
    /// `true` if the node lies on an external face.
    pub exterior: bool,
}

impl Node {
    #[must_use]
    pub fn new(nid: usize, position: Point3) -> Self {
        Self {
            state: ItemState::new(nid),
            position,
            gid: None,
            exterior: false,
        }
    }
}

/// A mesh edge (feature line of the discretization).
#[derive(Debug, Clone)]
pub struct MeshEdge {
    pub state: ItemState,
    pub nodes: [usize; 2],
    /// Edge continuing the line at `nodes[0]` / `nodes[1]`.
    pub nbr: [Option<usize>; 2],
    /// Geometric edge this mesh edge discretizes, if any.
    pub gid: Option<usize>,
}

impl MeshEdge {
    #[must_use]
    pub fn new(nid: usize, nodes: [usize; 2], gid: Option<usize>) -> Self {
        Self {
            state: ItemState::new(nid),
            nodes,
            nbr: [None; 2],
            gid,
        }
    }

    /// Position of `node` in this edge, if it is one of its end nodes.
    #[must_use]
    pub fn find_node(&self, node: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }
}

/// Supported face shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceShape {
    Tri3,
    Quad4,
}

impl FaceShape {
    /// Number of corner nodes (and sides).
    #[must_use]
    pub fn node_count(self) -> usize {
        match self {
            Self::Tri3 => 3,
            Self::Quad4 => 4,
        }
    }

    /// Shape matching a node count.
    #[must_use]
    pub fn from_node_count(n: usize) -> Option<Self> {
        match n {
            3 => Some(Self::Tri3),
            4 => Some(Self::Quad4),
            _ => None,
        }
    }
}

/// A mesh face: a boundary or partition-interface facet, or the face of a
/// shell element.
#[derive(Debug, Clone)]
pub struct Face {
    pub state: ItemState,
    pub shape: FaceShape,
    nodes: [usize; 4],
    /// Neighbouring face across side `i` (nodes `i` and `i + 1`).
    pub nbr: [Option<usize>; 4],
    /// Elements on either side. `elements[1]` is `None` for an external face.
    pub elements: [Option<usize>; 2],
    /// Unit normal, updated by [`crate::mesh::Mesh::update_topology`].
    pub normal: Vector3,
    /// Surface partition this face belongs to.
    pub gid: Option<usize>,
}

impl Face {
    /// Creates a face from 3 or 4 nodes. Returns `None` for other counts.
    #[must_use]
    pub fn new(nid: usize, nodes: &[usize], gid: Option<usize>) -> Option<Self> {
        let shape = FaceShape::from_node_count(nodes.len())?;
        let mut n = [0; 4];
        n[..nodes.len()].copy_from_slice(nodes);
        Some(Self {
            state: ItemState::new(nid),
            shape,
            nodes: n,
            nbr: [None; 4],
            elements: [None; 2],
            normal: Vector3::zeros(),
            gid,
        })
    }

    /// Corner nodes, counter-clockwise seen from outside.
    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes[..self.shape.node_count()]
    }

    /// Number of sides.
    #[must_use]
    pub fn side_count(&self) -> usize {
        self.shape.node_count()
    }

    /// Node pair of side `i`.
    #[must_use]
    pub fn side(&self, i: usize) -> [usize; 2] {
        let n = self.side_count();
        [self.nodes[i % n], self.nodes[(i + 1) % n]]
    }

    /// Position of `node` in this face, if present.
    #[must_use]
    pub fn find_node(&self, node: usize) -> Option<usize> {
        self.nodes().iter().position(|&n| n == node)
    }

    /// `true` when no second element sits behind this face.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.elements[1].is_none()
    }

    /// Triangulation as node triples: `(0, 1, 2)` and, for quads, `(2, 3, 0)`.
    #[must_use]
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let n = &self.nodes;
        match self.shape {
            FaceShape::Tri3 => vec![[n[0], n[1], n[2]]],
            FaceShape::Quad4 => vec![[n[0], n[1], n[2]], [n[2], n[3], n[0]]],
        }
    }
}

macro_rules! impl_mesh_item {
    ($($ty:ty),*) => {
        $(impl MeshItem for $ty {
            fn state(&self) -> &ItemState {
                &self.state
            }
            fn state_mut(&mut self) -> &mut ItemState {
                &mut self.state
            }
        })*
    };
}

impl_mesh_item!(Node, MeshEdge, Face, super::Element);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn face_rejects_bad_node_count() {
        assert!(Face::new(1, &[0, 1], None).is_none());
        assert!(Face::new(1, &[0, 1, 2, 3, 4], None).is_none());
    }

    #[test]
    fn quad_sides_wrap_around() {
        let f = Face::new(1, &[4, 5, 6, 7], Some(0)).unwrap();
        assert_eq!(f.nodes(), &[4, 5, 6, 7]);
        assert_eq!(f.side(3), [7, 4]);
        assert_eq!(f.triangles(), vec![[4, 5, 6], [6, 7, 4]]);
        assert_eq!(f.find_node(6), Some(2));
        assert!(f.is_external());
    }

    #[test]
    fn tri_has_three_sides() {
        let f = Face::new(1, &[0, 1, 2], None).unwrap();
        assert_eq!(f.side_count(), 3);
        assert_eq!(f.side(2), [2, 0]);
        assert_eq!(f.triangles().len(), 1);
    }

    #[test]
    fn item_state_defaults() {
        let n = Node::new(3, Point3::origin());
        assert!(n.is_visible());
        assert!(!n.is_selected());
        assert_eq!(n.state.nid, 3);
    }
}
