use tracing::trace;

use crate::document::Scene;

use super::Command;

/// Linear undo/redo stack with a position pointer.
///
/// Commands before the position are applied; commands after it form the
/// redo tail, which the next [`CommandHistory::push`] discards.
#[derive(Debug, Default)]
pub struct CommandHistory {
    commands: Vec<Command>,
    position: usize,
}

impl CommandHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `command` against `scene` and records it.
    pub fn push(&mut self, mut command: Command, scene: &mut Scene) -> &Command {
        command.execute(scene);
        self.truncate_redo_tail();
        trace!(command = %command.name(), "command pushed");
        self.commands.push(command);
        self.position = self.commands.len();
        &self.commands[self.position - 1]
    }

    /// Records a command that has already been executed.
    pub fn push_applied(&mut self, command: Command) -> &Command {
        self.truncate_redo_tail();
        trace!(command = %command.name(), "applied command recorded");
        self.commands.push(command);
        self.position = self.commands.len();
        &self.commands[self.position - 1]
    }

    fn truncate_redo_tail(&mut self) {
        let dropped = self.commands.len() - self.position;
        if dropped > 0 {
            self.commands.truncate(self.position);
            trace!(dropped, "redo tail discarded");
        }
    }

    /// Reverts the last applied command. Returns `false` if there is none.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.position -= 1;
        let command = &mut self.commands[self.position];
        command.unexecute(scene);
        trace!(command = %command.name(), "command undone");
        true
    }

    /// Re-applies the next command. Returns `false` if there is none.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        if !self.can_redo() {
            return false;
        }
        let command = &mut self.commands[self.position];
        command.execute(scene);
        trace!(command = %command.name(), "command redone");
        self.position += 1;
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.position < self.commands.len()
    }

    /// Drops every command.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.position = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of applied commands.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Names of all recorded commands, oldest first.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(Command::name).collect()
    }

    /// The command `undo` would revert.
    #[must_use]
    pub fn last_applied(&self) -> Option<&Command> {
        self.position.checked_sub(1).and_then(|i| self.commands.get(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::fixtures::strip_scene;
    use crate::command::{SelectItems, SelectionTarget};
    use crate::mesh::{MeshItemKind, MeshMode};

    fn select(scene: &Scene, indices: Vec<usize>, add: bool) -> Command {
        let object = scene.active_object.unwrap();
        let t = SelectionTarget::mesh(object, MeshMode::Volume, MeshItemKind::Node, indices);
        Command::Select(SelectItems::new(scene, t, add).unwrap())
    }

    fn selected(scene: &Scene) -> Vec<usize> {
        let object = scene.active_object.unwrap();
        scene
            .mesh(object, MeshMode::Volume)
            .unwrap()
            .selected_indices(MeshItemKind::Node)
    }

    #[test]
    fn undo_redo_walks_the_stack() {
        let mut scene = strip_scene();
        let mut h = CommandHistory::new();
        assert!(!h.can_undo() && !h.can_redo());

        let c = select(&scene, vec![0], false);
        h.push(c, &mut scene);
        let c = select(&scene, vec![1], true);
        h.push(c, &mut scene);
        assert_eq!(selected(&scene), vec![0, 1]);

        assert!(h.undo(&mut scene));
        assert_eq!(selected(&scene), vec![0]);
        assert!(h.can_redo());
        assert!(h.redo(&mut scene));
        assert_eq!(selected(&scene), vec![0, 1]);
        assert!(!h.redo(&mut scene));
    }

    #[test]
    fn push_discards_redo_tail() {
        let mut scene = strip_scene();
        let mut h = CommandHistory::new();
        for i in 0..3 {
            let c = select(&scene, vec![i], true);
            h.push(c, &mut scene);
        }
        h.undo(&mut scene);
        h.undo(&mut scene);
        assert_eq!(h.len(), 3);
        let c = select(&scene, vec![5], true);
        h.push(c, &mut scene);
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert_eq!(selected(&scene), vec![0, 5]);
        assert_eq!(h.names(), vec!["Select node", "Select node"]);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut scene = strip_scene();
        let mut h = CommandHistory::new();
        assert!(!h.undo(&mut scene));
        assert!(h.last_applied().is_none());
        h.clear();
        assert!(h.is_empty());
    }
}
