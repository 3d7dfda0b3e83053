use super::items::ItemState;

const TET4_FACES: &[&[usize]] = &[&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[0, 2, 1]];

const PENTA6_FACES: &[&[usize]] = &[
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[2, 0, 3, 5],
    &[0, 2, 1],
    &[3, 4, 5],
];

const HEX8_FACES: &[&[usize]] = &[
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
];

const TRI3_FACES: &[&[usize]] = &[&[0, 1, 2]];
const QUAD4_FACES: &[&[usize]] = &[&[0, 1, 2, 3]];

/// Supported element shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementShape {
    Tet4,
    Penta6,
    Hex8,
    /// Triangular shell.
    Tri3,
    /// Quadrilateral shell.
    Quad4,
    Beam2,
}

impl ElementShape {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Tet4 => "tet4",
            Self::Penta6 => "penta6",
            Self::Hex8 => "hex8",
            Self::Tri3 => "tri3",
            Self::Quad4 => "quad4",
            Self::Beam2 => "beam2",
        }
    }

    #[must_use]
    pub fn node_count(self) -> usize {
        match self {
            Self::Tet4 => 4,
            Self::Penta6 => 6,
            Self::Hex8 => 8,
            Self::Tri3 => 3,
            Self::Quad4 => 4,
            Self::Beam2 => 2,
        }
    }

    #[must_use]
    pub fn is_solid(self) -> bool {
        matches!(self, Self::Tet4 | Self::Penta6 | Self::Hex8)
    }

    #[must_use]
    pub fn is_shell(self) -> bool {
        matches!(self, Self::Tri3 | Self::Quad4)
    }

    #[must_use]
    pub fn is_beam(self) -> bool {
        self == Self::Beam2
    }

    /// Local node indices of each face, ordered so the face normal points
    /// out of the element. A shell has a single face; a beam has none.
    #[must_use]
    pub fn face_table(self) -> &'static [&'static [usize]] {
        match self {
            Self::Tet4 => TET4_FACES,
            Self::Penta6 => PENTA6_FACES,
            Self::Hex8 => HEX8_FACES,
            Self::Tri3 => TRI3_FACES,
            Self::Quad4 => QUAD4_FACES,
            Self::Beam2 => &[],
        }
    }

    /// Number of neighbour slots: faces for solids, sides for shells.
    #[must_use]
    pub fn neighbour_count(self) -> usize {
        match self {
            Self::Tet4 | Self::Penta6 | Self::Hex8 => self.face_table().len(),
            Self::Tri3 | Self::Quad4 => self.node_count(),
            Self::Beam2 => 0,
        }
    }
}

/// A finite element.
#[derive(Debug, Clone)]
pub struct Element {
    pub state: ItemState,
    pub shape: ElementShape,
    pub nodes: Vec<usize>,
    /// Neighbour across each face (solids) or side (shells).
    pub nbr: Vec<Option<usize>>,
    /// Mesh face covering each element face, if one exists.
    pub faces: Vec<Option<usize>>,
    /// Part this element belongs to.
    pub gid: usize,
}

impl Element {
    /// Creates an element. Returns `None` if the node count does not match
    /// the shape.
    #[must_use]
    pub fn new(nid: usize, shape: ElementShape, nodes: Vec<usize>, gid: usize) -> Option<Self> {
        if nodes.len() != shape.node_count() {
            return None;
        }
        Some(Self {
            state: ItemState::new(nid),
            shape,
            nodes,
            nbr: vec![None; shape.neighbour_count()],
            faces: vec![None; shape.face_table().len()],
            gid,
        })
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.shape.is_solid()
    }

    #[must_use]
    pub fn is_shell(&self) -> bool {
        self.shape.is_shell()
    }

    #[must_use]
    pub fn is_beam(&self) -> bool {
        self.shape.is_beam()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.shape.face_table().len()
    }

    /// Mesh node indices of local face `j`.
    #[must_use]
    pub fn face_nodes(&self, j: usize) -> Vec<usize> {
        self.shape
            .face_table()
            .get(j)
            .map(|local| local.iter().filter_map(|&k| self.nodes.get(k).copied()).collect())
            .unwrap_or_default()
    }

    /// Node pair of shell side `i`.
    #[must_use]
    pub fn side(&self, i: usize) -> [usize; 2] {
        let n = self.nodes.len();
        [self.nodes[i % n], self.nodes[(i + 1) % n]]
    }

    /// An element is exterior when at least one neighbour slot is empty.
    /// Shells and beams are always exterior.
    #[must_use]
    pub fn is_exterior(&self) -> bool {
        !self.is_solid() || self.nbr.iter().any(Option::is_none)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn node_count_is_checked() {
        assert!(Element::new(1, ElementShape::Hex8, vec![0; 7], 0).is_none());
        assert!(Element::new(1, ElementShape::Tet4, vec![0, 1, 2, 3], 0).is_some());
    }

    #[test]
    fn neighbour_slots_by_shape() {
        let hex = Element::new(1, ElementShape::Hex8, (0..8).collect(), 0).unwrap();
        assert_eq!(hex.nbr.len(), 6);
        assert_eq!(hex.faces.len(), 6);
        let quad = Element::new(1, ElementShape::Quad4, (0..4).collect(), 0).unwrap();
        assert_eq!(quad.nbr.len(), 4);
        assert_eq!(quad.faces.len(), 1);
        let beam = Element::new(1, ElementShape::Beam2, vec![0, 1], 0).unwrap();
        assert!(beam.nbr.is_empty());
        assert_eq!(beam.face_count(), 0);
    }

    #[test]
    fn hex_face_nodes_map_to_mesh_nodes() {
        let hex = Element::new(1, ElementShape::Hex8, (10..18).collect(), 0).unwrap();
        assert_eq!(hex.face_nodes(5), vec![14, 15, 16, 17]);
        assert!(hex.face_nodes(6).is_empty());
    }

    #[test]
    fn isolated_solid_is_exterior() {
        let mut tet = Element::new(1, ElementShape::Tet4, (0..4).collect(), 0).unwrap();
        assert!(tet.is_exterior());
        tet.nbr = vec![Some(1); 4];
        assert!(!tet.is_exterior());
    }
}
