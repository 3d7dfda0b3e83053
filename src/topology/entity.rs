use crate::math::Point3;

use super::GlobalId;

/// A volumetric region of an object.
#[derive(Debug, Clone)]
pub struct GPart {
    pub gid: GlobalId,
    /// Position in the owning object's part list.
    pub index: usize,
    pub visible: bool,
    pub selected: bool,
}

impl GPart {
    /// Creates a visible, unselected part.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            gid: GlobalId::next(),
            index,
            visible: true,
            selected: false,
        }
    }
}

/// A bounding surface, shared by at most two parts.
#[derive(Debug, Clone)]
pub struct GSurface {
    pub gid: GlobalId,
    pub index: usize,
    pub visible: bool,
    pub selected: bool,
    /// Local indices of the parts on either side of the surface.
    pub parts: [Option<usize>; 2],
}

impl GSurface {
    /// Creates a visible, unselected surface between the given parts.
    #[must_use]
    pub fn new(index: usize, parts: [Option<usize>; 2]) -> Self {
        Self {
            gid: GlobalId::next(),
            index,
            visible: true,
            selected: false,
            parts,
        }
    }
}

/// A boundary curve between surfaces.
#[derive(Debug, Clone)]
pub struct GEdge {
    pub gid: GlobalId,
    pub index: usize,
    pub visible: bool,
    pub selected: bool,
    /// Local indices of the end vertices.
    pub vertices: [Option<usize>; 2],
    /// Local indices of the surfaces this edge bounds.
    pub surfaces: [Option<usize>; 2],
}

impl GEdge {
    /// Creates a visible, unselected edge.
    #[must_use]
    pub fn new(index: usize, vertices: [Option<usize>; 2], surfaces: [Option<usize>; 2]) -> Self {
        Self {
            gid: GlobalId::next(),
            index,
            visible: true,
            selected: false,
            vertices,
            surfaces,
        }
    }
}

/// Role of a geometric vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// A regular corner vertex; selectable.
    Vertex,
    /// A construction point of a curve (e.g. an arc center); never selectable.
    Shape,
}

/// A geometric vertex.
#[derive(Debug, Clone)]
pub struct GVertex {
    pub gid: GlobalId,
    pub index: usize,
    pub visible: bool,
    pub selected: bool,
    /// Position in the object's local frame.
    pub position: Point3,
    pub kind: VertexKind,
}

impl GVertex {
    /// Creates a visible, unselected vertex.
    #[must_use]
    pub fn new(index: usize, position: Point3, kind: VertexKind) -> Self {
        Self {
            gid: GlobalId::next(),
            index,
            visible: true,
            selected: false,
            position,
            kind,
        }
    }

    /// Returns `true` if the vertex may take part in picking.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.visible && self.kind == VertexKind::Vertex
    }
}
