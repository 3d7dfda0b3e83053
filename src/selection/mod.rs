pub mod geometry;
mod region;

pub use crate::mesh::MeshMode;
pub use region::SelectRegion;

use crate::math::{Isometry3, Point3};
use crate::mesh::{Element, Face, Mesh, MeshEdge, MeshItem, MeshItemKind, Node};
use crate::topology::{GEdge, GObject, GPart, GSurface, GVertex, GlobalId};

/// Every kind of selectable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Object,
    Part,
    Surface,
    Edge,
    Vertex,
    Element,
    Face,
    MeshEdge,
    Node,
}

impl EntityKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Part => "part",
            Self::Surface => "surface",
            Self::Edge => "edge",
            Self::Vertex => "vertex",
            Self::Element => "element",
            Self::Face => "face",
            Self::MeshEdge => "mesh edge",
            Self::Node => "node",
        }
    }

    /// `true` for the mesh item modes.
    #[must_use]
    pub fn is_mesh(self) -> bool {
        self.mesh_kind().is_some()
    }

    /// The mesh collection addressed by a mesh item mode.
    #[must_use]
    pub fn mesh_kind(self) -> Option<MeshItemKind> {
        match self {
            Self::Element => Some(MeshItemKind::Element),
            Self::Face => Some(MeshItemKind::Face),
            Self::MeshEdge => Some(MeshItemKind::Edge),
            Self::Node => Some(MeshItemKind::Node),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_mesh_kind(kind: MeshItemKind) -> Self {
        match kind {
            MeshItemKind::Element => Self::Element,
            MeshItemKind::Face => Self::Face,
            MeshItemKind::Edge => Self::MeshEdge,
            MeshItemKind::Node => Self::Node,
        }
    }
}

/// Reference to one entity: its kind, owning object and local index.
///
/// For [`EntityKind::Object`] the index is unused and zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub object: GlobalId,
    pub index: usize,
}

impl EntityRef {
    #[must_use]
    pub fn object(object: GlobalId) -> Self {
        Self {
            kind: EntityKind::Object,
            object,
            index: 0,
        }
    }

    #[must_use]
    pub fn new(kind: EntityKind, object: GlobalId, index: usize) -> Self {
        Self { kind, object, index }
    }
}

/// Shape used to test an entity against a ray or a screen region,
/// in object-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point(Point3),
    Segments(Vec<[Point3; 2]>),
    Triangles(Vec<[Point3; 3]>),
}

impl Primitive {
    /// The primitive mapped through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Isometry3) -> Self {
        match self {
            Self::Point(p) => Self::Point(transform * p),
            Self::Segments(s) => Self::Segments(
                s.iter()
                    .map(|[a, b]| [transform * a, transform * b])
                    .collect(),
            ),
            Self::Triangles(t) => Self::Triangles(
                t.iter()
                    .map(|[a, b, c]| [transform * a, transform * b, transform * c])
                    .collect(),
            ),
        }
    }

    /// Every corner point.
    #[must_use]
    pub fn points(&self) -> Vec<Point3> {
        match self {
            Self::Point(p) => vec![*p],
            Self::Segments(s) => s.iter().flatten().copied().collect(),
            Self::Triangles(t) => t.iter().flatten().copied().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::Segments(s) => s.is_empty(),
            Self::Triangles(t) => t.is_empty(),
        }
    }
}

/// Common capability of everything that can be picked.
pub trait Pickable {
    /// Data needed to resolve the entity's geometry.
    type Context: ?Sized;

    /// The entity's own visibility flag.
    fn is_visible(&self) -> bool;
    fn is_selected(&self) -> bool;
    fn bounding_primitive(&self, ctx: &Self::Context) -> Primitive;
}

impl Pickable for Node {
    type Context = Mesh;

    fn is_visible(&self) -> bool {
        MeshItem::is_visible(self)
    }
    fn is_selected(&self) -> bool {
        MeshItem::is_selected(self)
    }
    fn bounding_primitive(&self, _mesh: &Mesh) -> Primitive {
        Primitive::Point(self.position)
    }
}

impl Pickable for MeshEdge {
    type Context = Mesh;

    fn is_visible(&self) -> bool {
        MeshItem::is_visible(self)
    }
    fn is_selected(&self) -> bool {
        MeshItem::is_selected(self)
    }
    fn bounding_primitive(&self, mesh: &Mesh) -> Primitive {
        Primitive::Segments(vec![[
            mesh.node_position(self.nodes[0]),
            mesh.node_position(self.nodes[1]),
        ]])
    }
}

fn node_triangles(mesh: &Mesh, tris: &[[usize; 3]]) -> Vec<[Point3; 3]> {
    tris.iter()
        .map(|t| t.map(|n| mesh.node_position(n)))
        .collect()
}

impl Pickable for Face {
    type Context = Mesh;

    fn is_visible(&self) -> bool {
        MeshItem::is_visible(self)
    }
    fn is_selected(&self) -> bool {
        MeshItem::is_selected(self)
    }
    fn bounding_primitive(&self, mesh: &Mesh) -> Primitive {
        Primitive::Triangles(node_triangles(mesh, &self.triangles()))
    }
}

impl Pickable for Element {
    type Context = Mesh;

    fn is_visible(&self) -> bool {
        MeshItem::is_visible(self)
    }
    fn is_selected(&self) -> bool {
        MeshItem::is_selected(self)
    }
    /// Beams are a segment; solids and shells are the triangles of their faces.
    fn bounding_primitive(&self, mesh: &Mesh) -> Primitive {
        if self.is_beam() {
            return Primitive::Segments(vec![[
                mesh.node_position(self.nodes[0]),
                mesh.node_position(self.nodes[1]),
            ]]);
        }
        let tris: Vec<[usize; 3]> = (0..self.face_count())
            .flat_map(|j| fan(&self.face_nodes(j)))
            .collect();
        Primitive::Triangles(node_triangles(mesh, &tris))
    }
}

/// Splits a 3- or 4-node polygon into `(0, 1, 2)` and `(2, 3, 0)`.
pub(crate) fn fan(nodes: &[usize]) -> Vec<[usize; 3]> {
    match *nodes {
        [a, b, c] => vec![[a, b, c]],
        [a, b, c, d] => vec![[a, b, c], [c, d, a]],
        _ => Vec::new(),
    }
}

impl Pickable for GVertex {
    type Context = GObject;

    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    fn bounding_primitive(&self, _object: &GObject) -> Primitive {
        Primitive::Point(self.position)
    }
}

impl Pickable for GEdge {
    type Context = GObject;

    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    /// The render segments tessellating this edge.
    fn bounding_primitive(&self, object: &GObject) -> Primitive {
        let rm = &object.render_mesh;
        Primitive::Segments(
            rm.segments
                .iter()
                .filter(|s| s.edge == self.index)
                .filter_map(|s| rm.segment_points(s))
                .collect(),
        )
    }
}

fn surface_triangles(object: &GObject, keep: impl Fn(usize) -> bool) -> Vec<[Point3; 3]> {
    let rm = &object.render_mesh;
    rm.triangles
        .iter()
        .filter(|t| keep(t.surface))
        .filter_map(|t| rm.triangle_points(t))
        .collect()
}

impl Pickable for GSurface {
    type Context = GObject;

    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    fn bounding_primitive(&self, object: &GObject) -> Primitive {
        Primitive::Triangles(surface_triangles(object, |s| s == self.index))
    }
}

impl Pickable for GPart {
    type Context = GObject;

    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    /// The render triangles of every surface bounding this part.
    fn bounding_primitive(&self, object: &GObject) -> Primitive {
        let bounds = |s: usize| {
            object
                .surfaces
                .get(s)
                .is_some_and(|surf| surf.parts.contains(&Some(self.index)))
        };
        Primitive::Triangles(surface_triangles(object, bounds))
    }
}

impl Pickable for GObject {
    type Context = ();

    fn is_visible(&self) -> bool {
        self.visible
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    fn bounding_primitive(&self, _ctx: &()) -> Primitive {
        Primitive::Triangles(surface_triangles(self, |_| true))
    }
}

/// Current selection level of a document.
///
/// Starts at [`EntityKind::Object`]. Mesh levels need an active object.
/// Switching level never touches the existing selection; clearing or
/// re-deriving it is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLevel {
    item: EntityKind,
    mesh_mode: MeshMode,
}

impl Default for SelectionLevel {
    fn default() -> Self {
        Self {
            item: EntityKind::Object,
            mesh_mode: MeshMode::Volume,
        }
    }
}

impl SelectionLevel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current item mode.
    #[must_use]
    pub fn item(&self) -> EntityKind {
        self.item
    }

    #[must_use]
    pub fn mesh_mode(&self) -> MeshMode {
        self.mesh_mode
    }

    #[must_use]
    pub fn is_mesh_level(&self) -> bool {
        self.item().is_mesh()
    }

    /// Switches to `item`. Returns `false` and stays put when a mesh level
    /// is requested without an active object.
    pub fn switch_to(&mut self, item: EntityKind, has_active_object: bool) -> bool {
        if item.is_mesh() && !has_active_object {
            return false;
        }
        self.item = item;
        true
    }

    pub fn set_mesh_mode(&mut self, mode: MeshMode) {
        self.mesh_mode = mode;
    }

    /// Sets the item mode unconditionally; used when a command replays.
    pub(crate) fn force(&mut self, item: EntityKind) {
        self.item = item;
    }
}

/// View options the selector honours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSettings {
    /// Ignore back-facing items.
    pub cull_backfaces: bool,
    /// Only pick element faces on the exterior (or next to hidden elements).
    pub exterior_only: bool,
    /// Grow the picked item to its connected group.
    pub connected: bool,
    /// Stop growth at the angle tolerance.
    pub angle_limited: bool,
    pub angle_tolerance_deg: f64,
    /// Stop growth at partition boundaries.
    pub respect_partitions: bool,
    /// Select the shortest path from the previous pick.
    pub select_path: bool,
    /// Hide items instead of selecting them.
    pub select_and_hide: bool,
    /// Half-size in pixels of the pick rectangle for geometry points and curves.
    pub geometry_pick_radius: f64,
    /// Half-size in pixels of the pick rectangle for mesh nodes and edges.
    pub mesh_pick_radius: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            cull_backfaces: false,
            exterior_only: true,
            connected: false,
            angle_limited: false,
            angle_tolerance_deg: 30.0,
            respect_partitions: true,
            select_path: false,
            select_and_hide: false,
            geometry_pick_radius: 4.0,
            mesh_pick_radius: 6.0,
        }
    }
}

impl SelectionSettings {
    #[must_use]
    pub fn with_cull_backfaces(mut self, on: bool) -> Self {
        self.cull_backfaces = on;
        self
    }

    #[must_use]
    pub fn with_exterior_only(mut self, on: bool) -> Self {
        self.exterior_only = on;
        self
    }

    #[must_use]
    pub fn with_connected(mut self, on: bool) -> Self {
        self.connected = on;
        self
    }

    /// Enables the angle limit with the given tolerance in degrees.
    #[must_use]
    pub fn with_angle_tolerance(mut self, degrees: f64) -> Self {
        self.angle_limited = true;
        self.angle_tolerance_deg = degrees;
        self
    }

    #[must_use]
    pub fn with_respect_partitions(mut self, on: bool) -> Self {
        self.respect_partitions = on;
        self
    }

    #[must_use]
    pub fn with_select_path(mut self, on: bool) -> Self {
        self.select_path = on;
        self
    }

    #[must_use]
    pub fn with_select_and_hide(mut self, on: bool) -> Self {
        self.select_and_hide = on;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::VertexKind;

    #[test]
    fn level_starts_at_object() {
        let level = SelectionLevel::new();
        assert_eq!(level.item(), EntityKind::Object);
        assert_eq!(level.mesh_mode(), MeshMode::Volume);
        assert!(!level.is_mesh_level());
    }

    #[test]
    fn mesh_levels_need_an_active_object() {
        let mut level = SelectionLevel::new();
        assert!(!level.switch_to(EntityKind::Node, false));
        assert_eq!(level.item(), EntityKind::Object);
        assert!(level.switch_to(EntityKind::Surface, false));
        assert!(level.switch_to(EntityKind::Face, true));
        assert!(level.is_mesh_level());
    }

    #[test]
    fn mesh_kind_mapping() {
        for kind in [
            MeshItemKind::Element,
            MeshItemKind::Face,
            MeshItemKind::Edge,
            MeshItemKind::Node,
        ] {
            assert_eq!(EntityKind::from_mesh_kind(kind).mesh_kind(), Some(kind));
        }
        assert!(EntityKind::Edge.mesh_kind().is_none());
    }

    #[test]
    fn element_primitive_covers_all_faces() {
        let mut m = Mesh::new();
        for p in [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)] {
            m.add_node(Point3::new(p.0, p.1, p.2));
        }
        m.add_element(crate::mesh::ElementShape::Tet4, vec![0, 1, 2, 3], 0)
            .unwrap();
        match m.elements[0].bounding_primitive(&m) {
            Primitive::Triangles(t) => assert_eq!(t.len(), 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn part_primitive_uses_bounding_surfaces() {
        let mut obj = GObject::new("o");
        let p0 = obj.add_part();
        let p1 = obj.add_part();
        obj.add_surface([Some(p0), None]);
        obj.add_surface([Some(p1), None]);
        let a = obj.render_mesh.add_position(Point3::origin());
        let b = obj.render_mesh.add_position(Point3::new(1.0, 0.0, 0.0));
        let c = obj.render_mesh.add_position(Point3::new(0.0, 1.0, 0.0));
        obj.render_mesh.add_triangle([a, b, c], 0);
        obj.render_mesh.add_triangle([a, c, b], 1);
        obj.render_mesh.add_triangle([b, c, a], 1);
        let prim = obj.parts[1].bounding_primitive(&obj);
        assert_eq!(prim.points().len(), 6);
        assert_eq!(obj.bounding_primitive(&()).points().len(), 9);
    }

    #[test]
    fn shape_vertices_are_not_selectable() {
        let mut obj = GObject::new("o");
        obj.add_vertex(Point3::origin(), VertexKind::Shape);
        assert!(!obj.vertices[0].is_selectable());
        assert!(Pickable::is_visible(&obj.vertices[0]));
    }

    #[test]
    fn transformed_primitive_moves_points() {
        let prim = Primitive::Point(Point3::origin());
        let moved = prim.transformed(&Isometry3::translation(1.0, 0.0, 0.0));
        assert_eq!(moved, Primitive::Point(Point3::new(1.0, 0.0, 0.0)));
        assert!(Primitive::Segments(Vec::new()).is_empty());
    }

    #[test]
    fn settings_builder() {
        let s = SelectionSettings::default()
            .with_connected(true)
            .with_angle_tolerance(45.0);
        assert!(s.connected && s.angle_limited);
        assert!((s.angle_tolerance_deg - 45.0).abs() < 1e-12);
        assert!((s.mesh_pick_radius - 6.0).abs() < 1e-12);
    }
}
