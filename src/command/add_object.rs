use tracing::warn;

use crate::document::Scene;
use crate::topology::{GObject, GlobalId};

/// Inserts an object into the model; undo removes it again.
///
/// The object keeps its global id across undo and redo, so commands that
/// address it by id stay valid.
#[derive(Debug)]
pub struct AddObject {
    gid: GlobalId,
    name: String,
    /// Held here while the object is not in the model.
    object: Option<GObject>,
    executed: bool,
}

impl AddObject {
    #[must_use]
    pub fn new(object: GObject) -> Self {
        Self {
            gid: object.gid(),
            name: object.name.clone(),
            object: Some(object),
            executed: false,
        }
    }

    /// Global id of the added object.
    #[must_use]
    pub fn object_gid(&self) -> GlobalId {
        self.gid
    }

    #[must_use]
    pub fn object_name(&self) -> &str {
        &self.name
    }

    pub(crate) fn execute(&mut self, scene: &mut Scene) {
        debug_assert!(!self.executed, "add-object command executed twice");
        if let Some(object) = self.object.take() {
            scene.model.add_object(object);
        }
        self.executed = true;
    }

    pub(crate) fn unexecute(&mut self, scene: &mut Scene) {
        debug_assert!(self.executed, "add-object command undone twice");
        if let Some(id) = scene.model.find_object(self.gid) {
            match scene.model.remove_object(id) {
                Ok(object) => self.object = Some(object),
                Err(e) => warn!(error = %e, "added object could not be removed"),
            }
        }
        if scene.active_object == Some(self.gid) {
            scene.active_object = None;
        }
        self.executed = false;
    }
}
