use crate::document::Scene;
use crate::error::CommandError;

use super::SelectionTarget;

/// Hides entities; hidden entities are also unselected.
#[derive(Debug, Clone)]
pub struct HideItems {
    target: SelectionTarget,
    visible_before: Box<[bool]>,
    selected_before: Box<[bool]>,
    executed: bool,
}

impl HideItems {
    /// # Errors
    ///
    /// Same conditions as [`super::SelectItems::new`].
    pub fn new(scene: &Scene, target: SelectionTarget) -> Result<Self, CommandError> {
        target.validate(scene)?;
        Ok(Self {
            visible_before: target.visibility_vector(scene),
            selected_before: target.selection_vector(scene),
            target,
            executed: false,
        })
    }

    #[must_use]
    pub fn target(&self) -> &SelectionTarget {
        &self.target
    }

    pub(crate) fn execute(&mut self, scene: &mut Scene) {
        debug_assert!(!self.executed, "hide command executed twice");
        self.target.hide(scene);
        self.executed = true;
    }

    pub(crate) fn unexecute(&mut self, scene: &mut Scene) {
        debug_assert!(self.executed, "hide command undone twice");
        self.target.apply_visibility_vector(scene, &self.visible_before);
        self.target.apply_selection_vector(scene, &self.selected_before);
        self.executed = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::fixtures::strip_scene;
    use crate::mesh::{MeshItemKind, MeshMode};

    #[test]
    fn hide_and_restore_faces() {
        let mut scene = strip_scene();
        let object = scene.active_object.unwrap();
        let t = SelectionTarget::mesh(object, MeshMode::Volume, MeshItemKind::Face, vec![1]);
        scene
            .mesh_mut(object, MeshMode::Volume)
            .unwrap()
            .faces[1]
            .state
            .selected = true;

        let mut hide = HideItems::new(&scene, t).unwrap();
        hide.execute(&mut scene);
        let mesh = scene.mesh(object, MeshMode::Volume).unwrap();
        assert!(!mesh.is_visible(MeshItemKind::Face, 1));
        assert_eq!(mesh.count_selected(MeshItemKind::Face), 0);

        hide.unexecute(&mut scene);
        let mesh = scene.mesh(object, MeshMode::Volume).unwrap();
        assert!(mesh.is_visible(MeshItemKind::Face, 1));
        assert_eq!(mesh.selected_indices(MeshItemKind::Face), vec![1]);
    }
}
