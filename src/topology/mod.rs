pub mod entity;
pub mod object;
pub mod render_mesh;

pub use entity::{GEdge, GPart, GSurface, GVertex, VertexKind};
pub use object::GObject;
pub use render_mesh::{RenderMesh, RenderSegment, RenderTriangle};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ModelError;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Arena key of an object inside a [`Model`].
    pub struct ObjectId;
}

/// Process-unique identifier of a geometric entity.
///
/// Allocated from a global counter when the entity is created and never
/// reused, so it stays valid across undo/redo of the owning object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalId(u64);

impl GlobalId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location of a geometric entity: owning object plus local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLocation {
    pub object: ObjectId,
    pub index: usize,
}

/// The geometry model of a document.
///
/// Owns every object in an arena plus a dense order vector; the local index
/// of an object is its position in that vector.
#[derive(Debug, Default)]
pub struct Model {
    objects: SlotMap<ObjectId, GObject>,
    order: Vec<ObjectId>,
}

impl Model {
    /// Creates a new, empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object at the end of the object list.
    pub fn add_object(&mut self, object: GObject) -> ObjectId {
        let id = self.objects.insert(object);
        self.order.push(id);
        id
    }

    /// Removes an object and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the model.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<GObject, ModelError> {
        let object = self
            .objects
            .remove(id)
            .ok_or(ModelError::ObjectNotFound(id))?;
        self.order.retain(|o| *o != id);
        Ok(object)
    }

    /// Returns the object with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the model.
    pub fn object(&self, id: ObjectId) -> Result<&GObject, ModelError> {
        self.objects.get(id).ok_or(ModelError::ObjectNotFound(id))
    }

    /// Returns a mutable reference to the object with the given key.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is not in the model.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut GObject, ModelError> {
        self.objects
            .get_mut(id)
            .ok_or(ModelError::ObjectNotFound(id))
    }

    /// Number of objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.order.len()
    }

    /// Object keys in document order.
    #[must_use]
    pub fn object_ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// Iterates over all objects in document order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &GObject)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(*id).map(|o| (*id, o)))
    }

    /// Applies `f` to every object in document order.
    pub fn for_each_object_mut(&mut self, mut f: impl FnMut(&mut GObject)) {
        for id in &self.order {
            if let Some(o) = self.objects.get_mut(*id) {
                f(o);
            }
        }
    }

    /// Finds the object whose own global id is `gid`.
    #[must_use]
    pub fn find_object(&self, gid: GlobalId) -> Option<ObjectId> {
        self.objects().find(|(_, o)| o.gid() == gid).map(|(id, _)| id)
    }

    /// Finds the part with the given global id.
    #[must_use]
    pub fn find_part(&self, gid: GlobalId) -> Option<EntityLocation> {
        self.locate(|o| o.parts.iter().position(|p| p.gid == gid))
    }

    /// Finds the surface with the given global id.
    #[must_use]
    pub fn find_surface(&self, gid: GlobalId) -> Option<EntityLocation> {
        self.locate(|o| o.surfaces.iter().position(|s| s.gid == gid))
    }

    /// Finds the edge with the given global id.
    #[must_use]
    pub fn find_edge(&self, gid: GlobalId) -> Option<EntityLocation> {
        self.locate(|o| o.edges.iter().position(|e| e.gid == gid))
    }

    /// Finds the vertex with the given global id.
    #[must_use]
    pub fn find_vertex(&self, gid: GlobalId) -> Option<EntityLocation> {
        self.locate(|o| o.vertices.iter().position(|v| v.gid == gid))
    }

    fn locate(&self, find: impl Fn(&GObject) -> Option<usize>) -> Option<EntityLocation> {
        self.objects()
            .find_map(|(id, o)| find(o).map(|index| EntityLocation { object: id, index }))
    }

    /// All parts across the model, in object order.
    pub fn all_parts(&self) -> impl Iterator<Item = (ObjectId, &GPart)> + '_ {
        self.objects()
            .flat_map(|(id, o)| o.parts.iter().map(move |p| (id, p)))
    }

    /// All surfaces across the model, in object order.
    pub fn all_surfaces(&self) -> impl Iterator<Item = (ObjectId, &GSurface)> + '_ {
        self.objects()
            .flat_map(|(id, o)| o.surfaces.iter().map(move |s| (id, s)))
    }

    /// All edges across the model, in object order.
    pub fn all_edges(&self) -> impl Iterator<Item = (ObjectId, &GEdge)> + '_ {
        self.objects()
            .flat_map(|(id, o)| o.edges.iter().map(move |e| (id, e)))
    }

    /// All vertices across the model, in object order.
    pub fn all_vertices(&self) -> impl Iterator<Item = (ObjectId, &GVertex)> + '_ {
        self.objects()
            .flat_map(|(id, o)| o.vertices.iter().map(move |v| (id, v)))
    }

    /// Validates every object.
    ///
    /// # Errors
    ///
    /// Returns the first invalid reference found.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.objects().try_for_each(|(_, o)| o.validate())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn object_with_part(name: &str) -> GObject {
        let mut obj = GObject::new(name);
        let part = obj.add_part();
        obj.add_surface([Some(part), None]);
        obj.add_vertex(Point3::origin(), VertexKind::Vertex);
        obj
    }

    #[test]
    fn global_ids_are_unique() {
        let a = GlobalId::next();
        let b = GlobalId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn objects_keep_insertion_order() {
        let mut model = Model::new();
        let a = model.add_object(GObject::new("a"));
        let b = model.add_object(GObject::new("b"));
        assert_eq!(model.object_ids(), &[a, b]);
        model.remove_object(a).unwrap();
        assert_eq!(model.object_ids(), &[b]);
        assert_eq!(model.object_count(), 1);
    }

    #[test]
    fn removing_twice_fails() {
        let mut model = Model::new();
        let a = model.add_object(GObject::new("a"));
        model.remove_object(a).unwrap();
        assert!(matches!(
            model.remove_object(a),
            Err(ModelError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn find_by_global_id() {
        let mut model = Model::new();
        model.add_object(object_with_part("a"));
        let b = model.add_object(object_with_part("b"));
        let part_gid = model.object(b).unwrap().parts[0].gid;
        let loc = model.find_part(part_gid).unwrap();
        assert_eq!(loc.object, b);
        assert_eq!(loc.index, 0);

        let obj_gid = model.object(b).unwrap().gid();
        assert_eq!(model.find_object(obj_gid), Some(b));
        assert!(model.find_surface(part_gid).is_none());
    }

    #[test]
    fn flattened_iteration() {
        let mut model = Model::new();
        model.add_object(object_with_part("a"));
        model.add_object(object_with_part("b"));
        assert_eq!(model.all_parts().count(), 2);
        assert_eq!(model.all_surfaces().count(), 2);
        assert_eq!(model.all_vertices().count(), 2);
        assert_eq!(model.all_edges().count(), 0);
        assert!(model.validate().is_ok());
    }
}
