//! Document state: the model, the selection level and the undo history.

use tracing::debug;

use crate::command::{Command, CommandHistory, SelectionTarget};
use crate::connectivity::{self, GrowPolicy};
use crate::mesh::{Mesh, MeshMode};
use crate::selection::{geometry, EntityKind, EntityRef, SelectionLevel};
use crate::topology::{GObject, GlobalId, Model};

/// Everything commands act on.
#[derive(Debug, Default)]
pub struct Scene {
    pub model: Model,
    /// Object whose meshes mesh-level selection works on.
    pub active_object: Option<GlobalId>,
    pub level: SelectionLevel,
}

impl Scene {
    #[must_use]
    pub fn new(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// Object with global id `gid`.
    #[must_use]
    pub fn object(&self, gid: GlobalId) -> Option<&GObject> {
        let id = self.model.find_object(gid)?;
        self.model.object(id).ok()
    }

    pub fn object_mut(&mut self, gid: GlobalId) -> Option<&mut GObject> {
        let id = self.model.find_object(gid)?;
        self.model.object_mut(id).ok()
    }

    /// Mesh of object `gid` for `mode`.
    #[must_use]
    pub fn mesh(&self, gid: GlobalId, mode: MeshMode) -> Option<&Mesh> {
        self.object(gid)?.mesh(mode)
    }

    pub fn mesh_mut(&mut self, gid: GlobalId, mode: MeshMode) -> Option<&mut Mesh> {
        self.object_mut(gid)?.mesh_mut(mode)
    }

    /// The active object's mesh for the current mesh mode.
    #[must_use]
    pub fn active_mesh(&self) -> Option<(GlobalId, &Mesh)> {
        let gid = self.active_object?;
        Some((gid, self.mesh(gid, self.level.mesh_mode())?))
    }

    /// The selection of the current level.
    ///
    /// `None` at a mesh level without an active mesh.
    #[must_use]
    pub fn current_selection(&self) -> Option<SelectionTarget> {
        let item = self.level.item();
        match item.mesh_kind() {
            Some(kind) => {
                let (object, mesh) = self.active_mesh()?;
                Some(SelectionTarget::mesh(
                    object,
                    self.level.mesh_mode(),
                    kind,
                    mesh.selected_indices(kind),
                ))
            }
            None => Some(SelectionTarget::geometry(
                item,
                geometry::selected_ids(&self.model, item),
            )),
        }
    }
}

/// An open document.
///
/// The selection starts empty at object level and changes only through
/// commands; [`Document::close`] drops the history.
#[derive(Debug, Default)]
pub struct Document {
    scene: Scene,
    history: CommandHistory,
}

impl Document {
    #[must_use]
    pub fn new(model: Model) -> Self {
        Self {
            scene: Scene::new(model),
            history: CommandHistory::new(),
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn model(&self) -> &Model {
        &self.scene.model
    }

    /// Direct model access for edits that are not undoable (building
    /// geometry, remeshing). Commands in the history may go stale.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.scene.model
    }

    /// Scratch access to a mesh, for queries that clobber tags.
    pub(crate) fn mesh_mut(&mut self, gid: GlobalId, mode: MeshMode) -> Option<&mut Mesh> {
        self.scene.mesh_mut(gid, mode)
    }

    #[must_use]
    pub fn level(&self) -> SelectionLevel {
        self.scene.level
    }

    #[must_use]
    pub fn active_object(&self) -> Option<GlobalId> {
        self.scene.active_object
    }

    /// Makes `gid` the active object, or clears it. Returns `false` if no
    /// such object exists.
    pub fn set_active_object(&mut self, gid: Option<GlobalId>) -> bool {
        if gid.is_some_and(|g| self.scene.model.find_object(g).is_none()) {
            return false;
        }
        self.scene.active_object = gid;
        true
    }

    /// Switches the item mode. Mesh levels need an active object.
    pub fn switch_level(&mut self, item: EntityKind) -> bool {
        let has_active = self.scene.active_object.is_some();
        let switched = self.scene.level.switch_to(item, has_active);
        debug!(level = item.name(), switched, "selection level switch");
        switched
    }

    pub fn set_mesh_mode(&mut self, mode: MeshMode) {
        self.scene.level.set_mesh_mode(mode);
    }

    /// Executes `command` and records it in the history.
    pub fn execute_command(&mut self, command: Command) -> &Command {
        self.history.push(command, &mut self.scene)
    }

    /// Records a command group that was applied member by member.
    pub fn record_applied(&mut self, command: Command) -> &Command {
        self.history.push_applied(command)
    }

    /// Scene and history together, for building a group step by step.
    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.scene)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.scene)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Closes the document: drops the history and the model and returns to
    /// object level with no active object.
    pub fn close(&mut self) {
        self.history.clear();
        self.scene = Scene::default();
        debug!("document closed");
    }

    /// See [`Scene::current_selection`].
    #[must_use]
    pub fn current_selection(&self) -> Option<SelectionTarget> {
        self.scene.current_selection()
    }

    /// Mesh items connected to `seed` under `policy`, in the current mesh
    /// mode. Empty for geometry seeds, unknown objects or missing meshes.
    pub fn grow_from_seed(&mut self, seed: EntityRef, policy: &GrowPolicy) -> Vec<usize> {
        let Some(kind) = seed.kind.mesh_kind() else {
            return Vec::new();
        };
        let mode = self.scene.level.mesh_mode();
        match self.scene.mesh_mut(seed.object, mode) {
            Some(mesh) => connectivity::grow_from_seed(mesh, kind, seed.index, policy),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::{SelectItems, UnselectItems};
    use crate::command::fixtures::strip_scene;
    use crate::mesh::MeshItemKind;

    fn document() -> Document {
        let scene = strip_scene();
        let active = scene.active_object;
        let mut doc = Document::new(scene.model);
        assert!(doc.set_active_object(active));
        doc
    }

    fn node_target(doc: &Document, indices: Vec<usize>) -> SelectionTarget {
        SelectionTarget::mesh(
            doc.active_object().unwrap(),
            MeshMode::Volume,
            MeshItemKind::Node,
            indices,
        )
    }

    #[test]
    fn starts_at_object_level_with_empty_selection() {
        let doc = Document::default();
        assert_eq!(doc.level().item(), EntityKind::Object);
        let sel = doc.current_selection().unwrap();
        assert!(sel.is_empty());
        assert!(!doc.can_undo());
    }

    #[test]
    fn mesh_level_needs_active_object() {
        let mut doc = Document::default();
        assert!(!doc.switch_level(EntityKind::Node));
        let mut doc = document();
        assert!(doc.switch_level(EntityKind::Node));
        assert_eq!(doc.current_selection().unwrap().entity_kind(), EntityKind::Node);
    }

    #[test]
    fn select_unselect_undo_sequence() {
        let mut doc = document();
        let a = SelectItems::new(doc.scene(), node_target(&doc, vec![0]), false).unwrap();
        doc.execute_command(a.into());
        let b = SelectItems::new(doc.scene(), node_target(&doc, vec![1]), true).unwrap();
        doc.execute_command(b.into());
        let u = UnselectItems::new(doc.scene(), node_target(&doc, vec![0])).unwrap();
        doc.execute_command(u.into());

        let selected = |d: &Document| d.current_selection().unwrap().indices().to_vec();
        assert_eq!(selected(&doc), vec![1]);
        doc.undo();
        assert_eq!(selected(&doc), vec![0, 1]);
        doc.undo();
        assert_eq!(selected(&doc), vec![0]);
        doc.undo();
        assert_eq!(doc.level().item(), EntityKind::Object);
        assert!(!doc.can_undo());
    }

    #[test]
    fn close_clears_history() {
        let mut doc = document();
        let a = SelectItems::new(doc.scene(), node_target(&doc, vec![0]), false).unwrap();
        doc.execute_command(a.into());
        doc.close();
        assert!(!doc.can_undo());
        assert!(doc.history().is_empty());
        assert_eq!(doc.model().object_count(), 0);
        assert_eq!(doc.active_object(), None);
    }

    #[test]
    fn grow_passthrough() {
        let mut doc = document();
        let gid = doc.active_object().unwrap();
        let grown = doc.grow_from_seed(
            EntityRef::new(EntityKind::Element, gid, 0),
            &GrowPolicy::default(),
        );
        assert_eq!(grown, vec![0, 1, 2]);
        let none = doc.grow_from_seed(EntityRef::object(gid), &GrowPolicy::default());
        assert!(none.is_empty());
    }

    #[test]
    fn unknown_active_object_is_rejected() {
        let mut doc = document();
        assert!(!doc.set_active_object(Some(GlobalId::next())));
        assert!(doc.set_active_object(None));
    }
}
