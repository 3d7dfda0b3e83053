use crate::document::Scene;
use crate::error::CommandError;
use crate::mesh::{MeshItemKind, MeshMode};
use crate::selection::{geometry, EntityKind, SelectionLevel};
use crate::topology::GlobalId;

/// The entities a command acts on.
///
/// Geometric entities are addressed by global id. Mesh items are addressed
/// by index into one mesh, identified by its owning object's global id and
/// the mesh mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    Geometry {
        kind: EntityKind,
        ids: Vec<GlobalId>,
    },
    Mesh {
        object: GlobalId,
        mode: MeshMode,
        kind: MeshItemKind,
        indices: Vec<usize>,
    },
}

impl SelectionTarget {
    #[must_use]
    pub fn geometry(kind: EntityKind, ids: Vec<GlobalId>) -> Self {
        Self::Geometry { kind, ids }
    }

    #[must_use]
    pub fn mesh(object: GlobalId, mode: MeshMode, kind: MeshItemKind, indices: Vec<usize>) -> Self {
        Self::Mesh {
            object,
            mode,
            kind,
            indices,
        }
    }

    /// Kind of the addressed entities.
    #[must_use]
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Geometry { kind, .. } => *kind,
            Self::Mesh { kind, .. } => EntityKind::from_mesh_kind(*kind),
        }
    }

    /// Number of addressed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Geometry { ids, .. } => ids.len(),
            Self::Mesh { indices, .. } => indices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mesh indices, empty for geometry targets.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Geometry { .. } => &[],
            Self::Mesh { indices, .. } => indices,
        }
    }

    /// Geometry ids, empty for mesh targets.
    #[must_use]
    pub fn ids(&self) -> &[GlobalId] {
        match self {
            Self::Geometry { ids, .. } => ids,
            Self::Mesh { .. } => &[],
        }
    }

    /// Checks that every addressed entity exists in `scene`.
    pub(crate) fn validate(&self, scene: &Scene) -> Result<(), CommandError> {
        match self {
            Self::Geometry { kind, ids } => {
                if kind.is_mesh() {
                    return Err(CommandError::LevelMismatch(kind.name()));
                }
                match ids.iter().find(|gid| !geometry::contains(&scene.model, *kind, **gid)) {
                    Some(gid) => Err(CommandError::UnknownEntity(*gid)),
                    None => Ok(()),
                }
            }
            Self::Mesh {
                object,
                mode,
                kind,
                indices,
            } => {
                if scene.object(*object).is_none() {
                    return Err(CommandError::UnknownEntity(*object));
                }
                let mesh = scene.mesh(*object, *mode).ok_or(CommandError::NoTarget)?;
                let len = mesh.count(*kind);
                match indices.iter().find(|&&i| i >= len) {
                    Some(&index) => Err(CommandError::StaleIndex { index, len }),
                    None => Ok(()),
                }
            }
        }
    }

    /// The level a document is in while this target is selected.
    pub(crate) fn level(&self, current: SelectionLevel) -> SelectionLevel {
        let mut level = current;
        level.force(self.entity_kind());
        if let Self::Mesh { mode, .. } = self {
            level.set_mesh_mode(*mode);
        }
        level
    }

    pub(crate) fn selection_vector(&self, scene: &Scene) -> Box<[bool]> {
        match self {
            Self::Geometry { kind, .. } => geometry::selection_vector(&scene.model, *kind),
            Self::Mesh {
                object, mode, kind, ..
            } => scene
                .mesh(*object, *mode)
                .map(|m| m.selection_vector(*kind))
                .unwrap_or_default(),
        }
    }

    pub(crate) fn visibility_vector(&self, scene: &Scene) -> Box<[bool]> {
        match self {
            Self::Geometry { kind, .. } => geometry::visibility_vector(&scene.model, *kind),
            Self::Mesh {
                object, mode, kind, ..
            } => scene
                .mesh(*object, *mode)
                .map(|m| m.visibility_vector(*kind))
                .unwrap_or_default(),
        }
    }

    pub(crate) fn apply_selection_vector(&self, scene: &mut Scene, snapshot: &[bool]) {
        match self {
            Self::Geometry { kind, .. } => {
                geometry::apply_selection_vector(&mut scene.model, *kind, snapshot);
            }
            Self::Mesh {
                object, mode, kind, ..
            } => {
                if let Some(m) = scene.mesh_mut(*object, *mode) {
                    m.apply_selection_vector(*kind, snapshot);
                }
            }
        }
    }

    pub(crate) fn apply_visibility_vector(&self, scene: &mut Scene, snapshot: &[bool]) {
        match self {
            Self::Geometry { kind, .. } => {
                geometry::apply_visibility_vector(&mut scene.model, *kind, snapshot);
            }
            Self::Mesh {
                object, mode, kind, ..
            } => {
                if let Some(m) = scene.mesh_mut(*object, *mode) {
                    m.apply_visibility_vector(*kind, snapshot);
                }
            }
        }
    }

    /// Clears every selection flag of the addressed collection.
    pub(crate) fn clear(&self, scene: &mut Scene) {
        match self {
            Self::Geometry { kind, .. } => geometry::clear_selection(&mut scene.model, *kind),
            Self::Mesh {
                object, mode, kind, ..
            } => {
                if let Some(m) = scene.mesh_mut(*object, *mode) {
                    m.for_each_state_mut(*kind, |_, s| s.selected = false);
                }
            }
        }
    }

    /// Sets the selection flag of the addressed entities.
    pub(crate) fn set_selected(&self, scene: &mut Scene, on: bool) {
        match self {
            Self::Geometry { kind, ids } => geometry::set_selected(&mut scene.model, *kind, ids, on),
            Self::Mesh {
                object,
                mode,
                kind,
                indices,
            } => {
                if let Some(m) = scene.mesh_mut(*object, *mode) {
                    for &i in indices {
                        if let Some(s) = m.state_mut(*kind, i) {
                            s.selected = on;
                        }
                    }
                }
            }
        }
    }

    /// Hides and unselects the addressed entities.
    pub(crate) fn hide(&self, scene: &mut Scene) {
        match self {
            Self::Geometry { kind, ids } => geometry::hide(&mut scene.model, *kind, ids),
            Self::Mesh {
                object,
                mode,
                kind,
                indices,
            } => {
                if let Some(m) = scene.mesh_mut(*object, *mode) {
                    for &i in indices {
                        if let Some(s) = m.state_mut(*kind, i) {
                            s.visible = false;
                            s.selected = false;
                        }
                    }
                }
            }
        }
    }
}
