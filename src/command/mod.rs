//! Reversible commands and the undo history.
//!
//! A command captures at construction everything it needs to apply and to
//! revert itself. `execute` and `unexecute` must alternate, starting with
//! `execute`; calling either twice in a row is a programming error caught by
//! debug assertions.

mod add_object;
mod hide;
mod history;
mod select;
mod target;

pub use add_object::AddObject;
pub use hide::HideItems;
pub use history::CommandHistory;
pub use select::{SelectItems, UnselectItems};
pub use target::SelectionTarget;

use crate::document::Scene;

/// One undoable state transition.
#[derive(Debug)]
pub enum Command {
    Select(SelectItems),
    Unselect(UnselectItems),
    Hide(HideItems),
    AddObject(AddObject),
    Group(CommandGroup),
}

impl Command {
    /// Display name for history listings.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Select(c) => format!("Select {}", c.target().entity_kind().name()),
            Self::Unselect(c) => format!("Unselect {}", c.target().entity_kind().name()),
            Self::Hide(c) => format!("Hide {}", c.target().entity_kind().name()),
            Self::AddObject(c) => format!("Add object {}", c.object_name()),
            Self::Group(g) => g.name.clone(),
        }
    }

    /// Applies the command.
    pub fn execute(&mut self, scene: &mut Scene) {
        match self {
            Self::Select(c) => c.execute(scene),
            Self::Unselect(c) => c.execute(scene),
            Self::Hide(c) => c.execute(scene),
            Self::AddObject(c) => c.execute(scene),
            Self::Group(g) => g.execute(scene),
        }
    }

    /// Reverts the command.
    pub fn unexecute(&mut self, scene: &mut Scene) {
        match self {
            Self::Select(c) => c.unexecute(scene),
            Self::Unselect(c) => c.unexecute(scene),
            Self::Hide(c) => c.unexecute(scene),
            Self::AddObject(c) => c.unexecute(scene),
            Self::Group(g) => g.unexecute(scene),
        }
    }

    /// The selection target, for selection-type commands.
    #[must_use]
    pub fn target(&self) -> Option<&SelectionTarget> {
        match self {
            Self::Select(c) => Some(c.target()),
            Self::Unselect(c) => Some(c.target()),
            Self::Hide(c) => Some(c.target()),
            Self::AddObject(_) | Self::Group(_) => None,
        }
    }
}

impl From<SelectItems> for Command {
    fn from(c: SelectItems) -> Self {
        Self::Select(c)
    }
}

impl From<UnselectItems> for Command {
    fn from(c: UnselectItems) -> Self {
        Self::Unselect(c)
    }
}

impl From<HideItems> for Command {
    fn from(c: HideItems) -> Self {
        Self::Hide(c)
    }
}

impl From<AddObject> for Command {
    fn from(c: AddObject) -> Self {
        Self::AddObject(c)
    }
}

impl From<CommandGroup> for Command {
    fn from(g: CommandGroup) -> Self {
        Self::Group(g)
    }
}

/// Commands applied as one undo step: in order on execute, in reverse
/// order on unexecute.
#[derive(Debug)]
pub struct CommandGroup {
    pub name: String,
    commands: Vec<Command>,
}

impl CommandGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// Appends a command to the group.
    #[must_use]
    pub fn with(mut self, command: impl Into<Command>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    /// Executes `command` right away and appends it. Lets later members be
    /// built against the state earlier members produce; record the finished
    /// group with [`CommandHistory::push_applied`].
    pub fn apply(&mut self, command: impl Into<Command>, scene: &mut Scene) {
        let mut command = command.into();
        command.execute(scene);
        self.commands.push(command);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    fn execute(&mut self, scene: &mut Scene) {
        for c in &mut self.commands {
            c.execute(scene);
        }
    }

    fn unexecute(&mut self, scene: &mut Scene) {
        for c in self.commands.iter_mut().rev() {
            c.unexecute(scene);
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    #![allow(clippy::unwrap_used)]

    use crate::document::Scene;
    use crate::math::Point3;
    use crate::mesh::{ElementShape, Mesh};
    use crate::topology::{GObject, Model};

    /// Scene with one active object whose volume mesh is a strip of three
    /// quads (eight nodes).
    pub fn strip_scene() -> Scene {
        let mut mesh = Mesh::new();
        for i in 0..4 {
            mesh.add_node(Point3::new(f64::from(i), 0.0, 0.0));
            mesh.add_node(Point3::new(f64::from(i), 1.0, 0.0));
        }
        for i in 0..3 {
            let a = 2 * i;
            mesh.add_element(ElementShape::Quad4, vec![a, a + 2, a + 3, a + 1], 0)
                .unwrap();
        }
        mesh.extract_faces();
        let mut object = GObject::new("strip");
        object.add_part();
        object.fe_mesh = Some(mesh);
        let gid = object.gid();
        let mut model = Model::new();
        model.add_object(object);
        let mut scene = Scene::new(model);
        scene.active_object = Some(gid);
        scene
    }
}
