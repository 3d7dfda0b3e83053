mod adjacency;
mod element;
mod items;

pub use adjacency::{NodeEdgeList, NodeFaceList};
pub use element::{Element, ElementShape};
pub use items::{Face, FaceShape, ItemState, MeshEdge, MeshItem, Node};

use crate::error::MeshError;
use crate::math::{Point3, Vector3};

/// Which discretization of an object mesh-level selection works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshMode {
    /// The volume (finite-element) mesh.
    #[default]
    Volume,
    /// The editable surface mesh.
    Surface,
}

/// The four item collections of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshItemKind {
    Element,
    Face,
    Edge,
    Node,
}

impl MeshItemKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Face => "face",
            Self::Edge => "edge",
            Self::Node => "node",
        }
    }
}

/// A discretized mesh owned by one geometric object.
///
/// Items are stored in dense vectors and address each other by index.
/// Neighbour links are rebuilt by [`Mesh::update_topology`].
///
/// # Tags
///
/// Every item carries a scratch `tag`. Tags are a shared workspace: any
/// query or traversal that reads tags first resets the collection it uses
/// (see the `tag_all_*` helpers), and callers must assume all tags are
/// clobbered after such a call.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub nodes: Vec<Node>,
    pub edges: Vec<MeshEdge>,
    pub faces: Vec<Face>,
    pub elements: Vec<Element>,
}

impl Mesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction ---

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, position: Point3) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index + 1, position));
        index
    }

    /// Adds a feature edge and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if a node index is out of range.
    pub fn add_edge(&mut self, nodes: [usize; 2], gid: Option<usize>) -> Result<usize, MeshError> {
        self.check_nodes(&nodes)?;
        let index = self.edges.len();
        self.edges.push(MeshEdge::new(index + 1, nodes, gid));
        Ok(index)
    }

    /// Adds a face (3 or 4 nodes) and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the node count is unsupported or a node index is
    /// out of range.
    pub fn add_face(&mut self, nodes: &[usize], gid: Option<usize>) -> Result<usize, MeshError> {
        self.check_nodes(nodes)?;
        let index = self.faces.len();
        let face = Face::new(index + 1, nodes, gid).ok_or(MeshError::NodeCountMismatch {
            shape: "face",
            nodes: nodes.len(),
        })?;
        self.faces.push(face);
        Ok(index)
    }

    /// Adds an element and returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the node count does not match `shape` or a node
    /// index is out of range.
    pub fn add_element(
        &mut self,
        shape: ElementShape,
        nodes: Vec<usize>,
        gid: usize,
    ) -> Result<usize, MeshError> {
        self.check_nodes(&nodes)?;
        let count = nodes.len();
        let index = self.elements.len();
        let element = Element::new(index + 1, shape, nodes, gid).ok_or(
            MeshError::NodeCountMismatch {
                shape: shape.name(),
                nodes: count,
            },
        )?;
        self.elements.push(element);
        Ok(index)
    }

    fn check_nodes(&self, nodes: &[usize]) -> Result<(), MeshError> {
        match nodes.iter().find(|&&n| n >= self.nodes.len()) {
            Some(&index) => Err(MeshError::IndexOutOfRange {
                collection: "node",
                index,
                len: self.nodes.len(),
            }),
            None => Ok(()),
        }
    }

    // --- Item state ---

    /// Number of items of the given kind.
    #[must_use]
    pub fn count(&self, kind: MeshItemKind) -> usize {
        match kind {
            MeshItemKind::Element => self.elements.len(),
            MeshItemKind::Face => self.faces.len(),
            MeshItemKind::Edge => self.edges.len(),
            MeshItemKind::Node => self.nodes.len(),
        }
    }

    /// State of one item, or `None` if out of range.
    #[must_use]
    pub fn state(&self, kind: MeshItemKind, index: usize) -> Option<&ItemState> {
        match kind {
            MeshItemKind::Element => self.elements.get(index).map(MeshItem::state),
            MeshItemKind::Face => self.faces.get(index).map(MeshItem::state),
            MeshItemKind::Edge => self.edges.get(index).map(MeshItem::state),
            MeshItemKind::Node => self.nodes.get(index).map(MeshItem::state),
        }
    }

    /// Mutable state of one item, or `None` if out of range.
    pub fn state_mut(&mut self, kind: MeshItemKind, index: usize) -> Option<&mut ItemState> {
        match kind {
            MeshItemKind::Element => self.elements.get_mut(index).map(MeshItem::state_mut),
            MeshItemKind::Face => self.faces.get_mut(index).map(MeshItem::state_mut),
            MeshItemKind::Edge => self.edges.get_mut(index).map(MeshItem::state_mut),
            MeshItemKind::Node => self.nodes.get_mut(index).map(MeshItem::state_mut),
        }
    }

    /// Iterates over the states of one collection in index order.
    pub fn states(&self, kind: MeshItemKind) -> Box<dyn Iterator<Item = &ItemState> + '_> {
        match kind {
            MeshItemKind::Element => Box::new(self.elements.iter().map(MeshItem::state)),
            MeshItemKind::Face => Box::new(self.faces.iter().map(MeshItem::state)),
            MeshItemKind::Edge => Box::new(self.edges.iter().map(MeshItem::state)),
            MeshItemKind::Node => Box::new(self.nodes.iter().map(MeshItem::state)),
        }
    }

    /// Applies `f` to every state of one collection, with its index.
    pub fn for_each_state_mut(&mut self, kind: MeshItemKind, mut f: impl FnMut(usize, &mut ItemState)) {
        match kind {
            MeshItemKind::Element => self
                .elements
                .iter_mut()
                .enumerate()
                .for_each(|(i, e)| f(i, &mut e.state)),
            MeshItemKind::Face => self
                .faces
                .iter_mut()
                .enumerate()
                .for_each(|(i, e)| f(i, &mut e.state)),
            MeshItemKind::Edge => self
                .edges
                .iter_mut()
                .enumerate()
                .for_each(|(i, e)| f(i, &mut e.state)),
            MeshItemKind::Node => self
                .nodes
                .iter_mut()
                .enumerate()
                .for_each(|(i, e)| f(i, &mut e.state)),
        }
    }

    /// `true` if the item exists and is visible.
    #[must_use]
    pub fn is_visible(&self, kind: MeshItemKind, index: usize) -> bool {
        self.state(kind, index).is_some_and(|s| s.visible)
    }

    /// Number of selected items of one kind.
    #[must_use]
    pub fn count_selected(&self, kind: MeshItemKind) -> usize {
        self.states(kind).filter(|s| s.selected).count()
    }

    /// Indices of selected items of one kind.
    #[must_use]
    pub fn selected_indices(&self, kind: MeshItemKind) -> Vec<usize> {
        self.states(kind)
            .enumerate()
            .filter_map(|(i, s)| s.selected.then_some(i))
            .collect()
    }

    /// Snapshot of the selection flags of one collection.
    #[must_use]
    pub fn selection_vector(&self, kind: MeshItemKind) -> Box<[bool]> {
        self.states(kind).map(|s| s.selected).collect()
    }

    /// Restores selection flags from a snapshot. Extra or missing entries
    /// are ignored.
    pub fn apply_selection_vector(&mut self, kind: MeshItemKind, flags: &[bool]) {
        self.for_each_state_mut(kind, |i, s| {
            if let Some(&f) = flags.get(i) {
                s.selected = f;
            }
        });
    }

    /// Snapshot of the visibility flags of one collection.
    #[must_use]
    pub fn visibility_vector(&self, kind: MeshItemKind) -> Box<[bool]> {
        self.states(kind).map(|s| s.visible).collect()
    }

    /// Restores visibility flags from a snapshot.
    pub fn apply_visibility_vector(&mut self, kind: MeshItemKind, flags: &[bool]) {
        self.for_each_state_mut(kind, |i, s| {
            if let Some(&f) = flags.get(i) {
                s.visible = f;
            }
        });
    }

    // --- Tags ---

    /// Sets every tag of one collection.
    pub fn tag_all(&mut self, kind: MeshItemKind, tag: i32) {
        self.for_each_state_mut(kind, |_, s| s.tag = tag);
    }

    pub fn tag_all_nodes(&mut self, tag: i32) {
        self.tag_all(MeshItemKind::Node, tag);
    }

    pub fn tag_all_edges(&mut self, tag: i32) {
        self.tag_all(MeshItemKind::Edge, tag);
    }

    pub fn tag_all_faces(&mut self, tag: i32) {
        self.tag_all(MeshItemKind::Face, tag);
    }

    pub fn tag_all_elements(&mut self, tag: i32) {
        self.tag_all(MeshItemKind::Element, tag);
    }

    /// Indices whose tag equals `tag`.
    #[must_use]
    pub fn tagged(&self, kind: MeshItemKind, tag: i32) -> Vec<usize> {
        self.states(kind)
            .enumerate()
            .filter_map(|(i, s)| (s.tag == tag).then_some(i))
            .collect()
    }

    // --- Geometry ---

    /// Local position of a node; the origin for an out-of-range index.
    #[must_use]
    pub fn node_position(&self, index: usize) -> Point3 {
        self.nodes
            .get(index)
            .map_or_else(Point3::origin, |n| n.position)
    }

    /// Corner positions of a face.
    #[must_use]
    pub fn face_points(&self, face: &Face) -> Vec<Point3> {
        face.nodes().iter().map(|&n| self.node_position(n)).collect()
    }

    /// Centroid of the corner nodes of face `index`.
    #[must_use]
    pub fn face_center(&self, index: usize) -> Option<Point3> {
        let face = self.faces.get(index)?;
        let pts = self.face_points(face);
        #[allow(clippy::cast_precision_loss)]
        let n = pts.len() as f64;
        let sum = pts.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / n))
    }

    /// Unit tangent of edge `index`, from its first node to its second.
    #[must_use]
    pub fn edge_tangent(&self, index: usize) -> Option<Vector3> {
        let e = self.edges.get(index)?;
        (self.node_position(e.nodes[1]) - self.node_position(e.nodes[0])).try_normalize(0.0)
    }

    /// Length of edge `index`.
    #[must_use]
    pub fn edge_length(&self, index: usize) -> Option<f64> {
        let e = self.edges.get(index)?;
        Some((self.node_position(e.nodes[1]) - self.node_position(e.nodes[0])).norm())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn strip() -> Mesh {
        let mut m = Mesh::new();
        for i in 0..3 {
            let x = f64::from(i);
            m.add_node(Point3::new(x, 0.0, 0.0));
            m.add_node(Point3::new(x, 1.0, 0.0));
        }
        m.add_face(&[0, 2, 3, 1], Some(0)).unwrap();
        m.add_face(&[2, 4, 5, 3], Some(0)).unwrap();
        m.add_edge([0, 2], Some(0)).unwrap();
        m.add_edge([2, 4], Some(0)).unwrap();
        m
    }

    #[test]
    fn construction_checks_node_indices() {
        let mut m = strip();
        assert!(matches!(
            m.add_edge([0, 42], None),
            Err(MeshError::IndexOutOfRange { index: 42, .. })
        ));
        assert!(matches!(
            m.add_face(&[0, 1], None),
            Err(MeshError::NodeCountMismatch { nodes: 2, .. })
        ));
        assert!(matches!(
            m.add_element(ElementShape::Hex8, vec![0, 1, 2], 0),
            Err(MeshError::NodeCountMismatch { shape: "hex8", .. })
        ));
    }

    #[test]
    fn external_ids_are_one_based() {
        let m = strip();
        assert_eq!(m.nodes[0].state.nid, 1);
        assert_eq!(m.faces[1].state.nid, 2);
    }

    #[test]
    fn selection_vector_round_trip() {
        let mut m = strip();
        m.state_mut(MeshItemKind::Face, 1).unwrap().selected = true;
        let snap = m.selection_vector(MeshItemKind::Face);
        assert_eq!(&*snap, &[false, true]);
        assert_eq!(m.count_selected(MeshItemKind::Face), 1);

        m.apply_selection_vector(MeshItemKind::Face, &[true, false]);
        assert_eq!(m.selected_indices(MeshItemKind::Face), vec![0]);
        m.apply_selection_vector(MeshItemKind::Face, &snap);
        assert_eq!(m.selected_indices(MeshItemKind::Face), vec![1]);
    }

    #[test]
    fn tags_reset_per_collection() {
        let mut m = strip();
        m.tag_all_nodes(7);
        m.tag_all_faces(-1);
        assert_eq!(m.tagged(MeshItemKind::Node, 7).len(), 6);
        assert_eq!(m.tagged(MeshItemKind::Face, -1), vec![0, 1]);
        assert!(m.tagged(MeshItemKind::Edge, 7).is_empty());
    }

    #[test]
    fn face_center_and_edge_tangent() {
        let m = strip();
        let c = m.face_center(0).unwrap();
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
        let t = m.edge_tangent(1).unwrap();
        assert_relative_eq!(t.x, 1.0);
        assert_relative_eq!(m.edge_length(0).unwrap(), 1.0);
        assert!(m.face_center(9).is_none());
    }

    #[test]
    fn out_of_range_state_is_none() {
        let m = strip();
        assert!(m.state(MeshItemKind::Element, 0).is_none());
        assert!(!m.is_visible(MeshItemKind::Node, 99));
        assert!(m.is_visible(MeshItemKind::Node, 0));
    }
}
