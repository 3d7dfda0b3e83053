use crate::error::ModelError;
use crate::math::{Isometry3, Point3};
use crate::mesh::{Mesh, MeshMode};

use super::{GEdge, GPart, GSurface, GVertex, GlobalId, RenderMesh, VertexKind};

/// A geometric object: the unit of ownership for parts, surfaces, edges,
/// vertices and the meshes discretizing them.
///
/// All bounding references are local indices into the object's own lists.
#[derive(Debug, Clone)]
pub struct GObject {
    gid: GlobalId,
    pub name: String,
    pub visible: bool,
    pub selected: bool,
    /// Object-to-world placement.
    pub transform: Isometry3,
    pub parts: Vec<GPart>,
    pub surfaces: Vec<GSurface>,
    pub edges: Vec<GEdge>,
    pub vertices: Vec<GVertex>,
    pub render_mesh: RenderMesh,
    /// Volume discretization.
    pub fe_mesh: Option<Mesh>,
    /// Editable surface discretization.
    pub surface_mesh: Option<Mesh>,
}

impl GObject {
    /// Creates an empty, visible object at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            gid: GlobalId::next(),
            name: name.into(),
            visible: true,
            selected: false,
            transform: Isometry3::identity(),
            parts: Vec::new(),
            surfaces: Vec::new(),
            edges: Vec::new(),
            vertices: Vec::new(),
            render_mesh: RenderMesh::new(),
            fe_mesh: None,
            surface_mesh: None,
        }
    }

    /// The object's own global id.
    #[must_use]
    pub fn gid(&self) -> GlobalId {
        self.gid
    }

    /// Sets the object-to-world placement.
    #[must_use]
    pub fn with_transform(mut self, transform: Isometry3) -> Self {
        self.transform = transform;
        self
    }

    /// Adds a part and returns its local index.
    pub fn add_part(&mut self) -> usize {
        let index = self.parts.len();
        self.parts.push(GPart::new(index));
        index
    }

    /// Adds a surface bounded by the given parts and returns its local index.
    pub fn add_surface(&mut self, parts: [Option<usize>; 2]) -> usize {
        let index = self.surfaces.len();
        self.surfaces.push(GSurface::new(index, parts));
        index
    }

    /// Adds an edge and returns its local index.
    pub fn add_edge(&mut self, vertices: [Option<usize>; 2], surfaces: [Option<usize>; 2]) -> usize {
        let index = self.edges.len();
        self.edges.push(GEdge::new(index, vertices, surfaces));
        index
    }

    /// Adds a vertex and returns its local index.
    pub fn add_vertex(&mut self, position: Point3, kind: VertexKind) -> usize {
        let index = self.vertices.len();
        self.vertices.push(GVertex::new(index, position, kind));
        index
    }

    /// Maps a local point to world coordinates.
    #[must_use]
    pub fn to_world(&self, p: &Point3) -> Point3 {
        self.transform * p
    }

    /// The mesh used at the given mesh mode.
    #[must_use]
    pub fn mesh(&self, mode: MeshMode) -> Option<&Mesh> {
        match mode {
            MeshMode::Volume => self.fe_mesh.as_ref(),
            MeshMode::Surface => self.surface_mesh.as_ref(),
        }
    }

    /// Mutable access to the mesh used at the given mesh mode.
    pub fn mesh_mut(&mut self, mode: MeshMode) -> Option<&mut Mesh> {
        match mode {
            MeshMode::Volume => self.fe_mesh.as_mut(),
            MeshMode::Surface => self.surface_mesh.as_mut(),
        }
    }

    #[must_use]
    pub fn is_part_visible(&self, index: usize) -> bool {
        self.visible && self.parts.get(index).is_some_and(|p| p.visible)
    }

    /// A surface is visible when the object, the surface itself and at
    /// least one bounding part are visible.
    #[must_use]
    pub fn is_surface_visible(&self, index: usize) -> bool {
        let Some(surface) = self.surfaces.get(index) else {
            return false;
        };
        self.visible
            && surface.visible
            && surface
                .parts
                .iter()
                .flatten()
                .any(|&p| self.is_part_visible(p))
    }

    /// An edge is visible when it is not hidden and either bounds no surface
    /// or bounds at least one visible surface.
    #[must_use]
    pub fn is_edge_visible(&self, index: usize) -> bool {
        let Some(edge) = self.edges.get(index) else {
            return false;
        };
        if !self.visible || !edge.visible {
            return false;
        }
        let mut bounded = edge.surfaces.iter().flatten().peekable();
        bounded.peek().is_none() || bounded.any(|&s| self.is_surface_visible(s))
    }

    /// Checks that every bounding reference resolves inside this object and
    /// that local indices are dense.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTopology`] describing the first problem.
    pub fn validate(&self) -> Result<(), ModelError> {
        let bad = |msg: String| Err(ModelError::InvalidTopology(format!("{}: {msg}", self.name)));

        if let Some((i, _)) = self.parts.iter().enumerate().find(|(i, p)| p.index != *i) {
            return bad(format!("part {i} has a non-dense index"));
        }
        for (i, s) in self.surfaces.iter().enumerate() {
            if s.index != i {
                return bad(format!("surface {i} has a non-dense index"));
            }
            if s.parts.iter().flatten().any(|&p| p >= self.parts.len()) {
                return bad(format!("surface {i} references a missing part"));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            if e.index != i {
                return bad(format!("edge {i} has a non-dense index"));
            }
            if e.vertices.iter().flatten().any(|&v| v >= self.vertices.len()) {
                return bad(format!("edge {i} references a missing vertex"));
            }
            if e.surfaces.iter().flatten().any(|&s| s >= self.surfaces.len()) {
                return bad(format!("edge {i} references a missing surface"));
            }
        }
        if let Some((i, _)) = self.vertices.iter().enumerate().find(|(i, v)| v.index != *i) {
            return bad(format!("vertex {i} has a non-dense index"));
        }
        let rm = &self.render_mesh;
        if rm.triangles.iter().any(|t| {
            t.surface >= self.surfaces.len() || rm.triangle_points(t).is_none()
        }) {
            return bad("render triangle with a dangling reference".into());
        }
        if rm
            .segments
            .iter()
            .any(|s| s.edge >= self.edges.len() || rm.segment_points(s).is_none())
        {
            return bad("render segment with a dangling reference".into());
        }
        Ok(())
    }
}
