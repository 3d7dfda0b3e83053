use crate::document::Scene;
use crate::error::CommandError;
use crate::selection::SelectionLevel;

use super::SelectionTarget;

/// Selection state displaced by a command, captured at construction.
#[derive(Debug, Clone)]
struct Displaced {
    selected: Box<[bool]>,
    level: SelectionLevel,
}

impl Displaced {
    fn capture(scene: &Scene, target: &SelectionTarget) -> Self {
        Self {
            selected: target.selection_vector(scene),
            level: scene.level,
        }
    }

    fn restore(&self, scene: &mut Scene, target: &SelectionTarget) {
        target.apply_selection_vector(scene, &self.selected);
        scene.level = self.level;
    }
}

/// Selects entities, replacing the current selection of their collection
/// unless `add` is set.
#[derive(Debug, Clone)]
pub struct SelectItems {
    target: SelectionTarget,
    add: bool,
    level: SelectionLevel,
    before: Displaced,
    executed: bool,
}

impl SelectItems {
    /// Builds the command against the current scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the target's object or mesh is missing, or an
    /// index or id no longer resolves.
    pub fn new(scene: &Scene, target: SelectionTarget, add: bool) -> Result<Self, CommandError> {
        target.validate(scene)?;
        Ok(Self {
            level: target.level(scene.level),
            before: Displaced::capture(scene, &target),
            target,
            add,
            executed: false,
        })
    }

    #[must_use]
    pub fn target(&self) -> &SelectionTarget {
        &self.target
    }

    #[must_use]
    pub fn is_additive(&self) -> bool {
        self.add
    }

    pub(crate) fn execute(&mut self, scene: &mut Scene) {
        debug_assert!(!self.executed, "select command executed twice");
        if !self.add {
            self.target.clear(scene);
        }
        self.target.set_selected(scene, true);
        scene.level = self.level;
        self.executed = true;
    }

    pub(crate) fn unexecute(&mut self, scene: &mut Scene) {
        debug_assert!(self.executed, "select command undone twice");
        self.before.restore(scene, &self.target);
        self.executed = false;
    }
}

/// Removes entities from the selection of their collection.
#[derive(Debug, Clone)]
pub struct UnselectItems {
    target: SelectionTarget,
    level: SelectionLevel,
    before: Displaced,
    executed: bool,
}

impl UnselectItems {
    /// Builds the command against the current scene.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SelectItems::new`].
    pub fn new(scene: &Scene, target: SelectionTarget) -> Result<Self, CommandError> {
        target.validate(scene)?;
        Ok(Self {
            level: target.level(scene.level),
            before: Displaced::capture(scene, &target),
            target,
            executed: false,
        })
    }

    #[must_use]
    pub fn target(&self) -> &SelectionTarget {
        &self.target
    }

    pub(crate) fn execute(&mut self, scene: &mut Scene) {
        debug_assert!(!self.executed, "unselect command executed twice");
        self.target.set_selected(scene, false);
        scene.level = self.level;
        self.executed = true;
    }

    pub(crate) fn unexecute(&mut self, scene: &mut Scene) {
        debug_assert!(self.executed, "unselect command undone twice");
        self.before.restore(scene, &self.target);
        self.executed = false;
    }
}
