//! Interactive selection: turns clicks, drags and hovers into commands.
//!
//! The selector reads the document's selection level, finds what lies
//! under the cursor, optionally grows it, and pushes a select, unselect or
//! hide command onto the document's history.

mod hit;

use tracing::{debug, warn};

use crate::command::{Command, HideItems, SelectItems, SelectionTarget, UnselectItems};
use crate::connectivity::{self, GrowPolicy};
use crate::document::Document;
use crate::error::CommandError;
use crate::mesh::{Mesh, MeshItemKind, MeshMode};
use crate::query::{
    region_edges, region_elements, region_faces, region_geometry, region_nodes, RegionOptions,
};
use crate::selection::{EntityKind, EntityRef, SelectRegion, SelectionSettings};
use crate::topology::GlobalId;
use crate::view::ViewSession;

use hit::Cursor;

/// Picking front end for one document view.
///
/// Holds the user's selection settings and the anchor for shortest-path
/// picking. The anchor is the last item picked in path mode; any other
/// pick, or a miss, clears it.
#[derive(Debug, Default)]
pub struct Selector {
    pub settings: SelectionSettings,
    path_anchor: Option<EntityRef>,
}

impl Selector {
    #[must_use]
    pub fn new(settings: SelectionSettings) -> Self {
        Self {
            settings,
            path_anchor: None,
        }
    }

    /// Current shortest-path anchor.
    #[must_use]
    pub fn path_anchor(&self) -> Option<EntityRef> {
        self.path_anchor
    }

    pub fn reset_path(&mut self) {
        self.path_anchor = None;
    }

    /// Growth policy derived from the settings.
    #[must_use]
    pub fn grow_policy(&self) -> GrowPolicy {
        GrowPolicy::from(&self.settings)
    }

    /// Picks at pixel `(x, y)` and applies the resulting command.
    ///
    /// `additive` adds to the selection, `subtractive` removes from it;
    /// neither replaces it. A click on empty space without `additive` or
    /// `subtractive` clears the current level's selection, if any. Returns
    /// the command that was applied, or `None` if nothing changed.
    pub fn pick<'d>(
        &mut self,
        doc: &'d mut Document,
        session: &ViewSession,
        x: f64,
        y: f64,
        additive: bool,
        subtractive: bool,
    ) -> Option<&'d Command> {
        let level = doc.level();
        let Some(hit) = self.hit_test(doc, session, x, y) else {
            debug!(level = level.item().name(), x, y, "pick missed");
            return self.on_miss(doc, session, additive, subtractive);
        };
        debug!(level = hit.kind.name(), object = %hit.object, index = hit.index, "pick hit");

        let target = match hit.kind.mesh_kind() {
            Some(kind) => {
                let mode = level.mesh_mode();
                let mesh = doc.mesh_mut(hit.object, mode)?;
                let indices = self.expand(mesh, hit, kind);
                SelectionTarget::mesh(hit.object, mode, kind, indices)
            }
            None => {
                self.path_anchor = None;
                let gid = geometry_gid(doc, hit)?;
                SelectionTarget::geometry(hit.kind, vec![gid])
            }
        };
        self.apply(doc, session, target, additive, subtractive)
    }

    /// Selects everything of the current level inside `region`.
    ///
    /// Modifiers work as in [`Selector::pick`]; an empty result behaves
    /// like a miss.
    pub fn pick_region<'d>(
        &mut self,
        doc: &'d mut Document,
        session: &ViewSession,
        region: &SelectRegion,
        additive: bool,
        subtractive: bool,
    ) -> Option<&'d Command> {
        self.path_anchor = None;
        let view = session.view()?;
        let cut = session.plane_cut();
        let level = doc.level();
        let item = level.item();

        let target = match item.mesh_kind() {
            Some(kind) => {
                let gid = doc.active_object()?;
                let mode = level.mesh_mode();
                let object = doc.scene_mut().object_mut(gid)?;
                let transform = object.transform;
                let mesh = object.mesh_mut(mode)?;
                let options = RegionOptions {
                    cull_backfaces: self.settings.cull_backfaces,
                    exterior_only: self.settings.exterior_only && mode == MeshMode::Volume,
                };
                let indices = match kind {
                    MeshItemKind::Node => region_nodes(mesh, &transform, view, region, cut, options),
                    MeshItemKind::Edge => region_edges(mesh, &transform, view, region, cut, options),
                    MeshItemKind::Face => region_faces(mesh, &transform, view, region, cut, options),
                    MeshItemKind::Element => {
                        region_elements(mesh, &transform, view, region, cut, options)
                    }
                };
                SelectionTarget::mesh(gid, mode, kind, indices)
            }
            None => SelectionTarget::geometry(
                item,
                region_geometry(doc.model(), item, view, region, cut, self.settings.cull_backfaces),
            ),
        };
        debug!(level = item.name(), count = target.len(), "region pick");

        if target.is_empty() {
            return self.on_miss(doc, session, additive, subtractive);
        }
        self.apply(doc, session, target, additive, subtractive)
    }

    /// Updates the session's hover highlight to the entity under `(x, y)`
    /// and asks for a redraw if it changed.
    pub fn hover(
        &self,
        doc: &mut Document,
        session: &mut ViewSession,
        x: f64,
        y: f64,
    ) -> Option<EntityRef> {
        let hit = self.hit_test(doc, session, x, y);
        if session.set_highlight(hit) {
            session.request_redraw();
        }
        hit
    }

    /// Mesh items connected to `seed` under the current settings.
    pub fn grow_from_seed(&self, doc: &mut Document, seed: EntityRef) -> Vec<usize> {
        doc.grow_from_seed(seed, &self.grow_policy())
    }

    /// The single entity of the current level under `(x, y)`.
    fn hit_test(
        &self,
        doc: &mut Document,
        session: &ViewSession,
        x: f64,
        y: f64,
    ) -> Option<EntityRef> {
        let cursor = Cursor {
            view: session.view()?,
            cut: session.plane_cut(),
            x,
            y,
        };
        let level = doc.level();
        let item = level.item();
        match item.mesh_kind() {
            Some(kind) => {
                let gid = doc.active_object()?;
                let object = doc.scene_mut().object_mut(gid)?;
                let index = hit::mesh_hit(object, level.mesh_mode(), kind, &cursor, &self.settings)?;
                Some(EntityRef::new(item, gid, index))
            }
            None => hit::geometry_hit(doc.model(), item, &cursor, &self.settings),
        }
    }

    /// Turns a picked mesh item into the indices to act on: a path from the
    /// anchor, a connected group, or the item alone.
    fn expand(&mut self, mesh: &mut Mesh, hit: EntityRef, kind: MeshItemKind) -> Vec<usize> {
        if self.settings.select_path && kind != MeshItemKind::Element {
            let anchor = self
                .path_anchor
                .filter(|a| a.kind == hit.kind && a.object == hit.object)
                .map(|a| a.index);
            self.path_anchor = Some(hit);
            let path = match anchor {
                Some(from) if from != hit.index => match kind {
                    MeshItemKind::Node => connectivity::shortest_node_path(mesh, from, hit.index),
                    MeshItemKind::Face => connectivity::shortest_face_path(mesh, from, hit.index),
                    _ => connectivity::shortest_edge_path(mesh, from, hit.index),
                },
                _ => Vec::new(),
            };
            if path.is_empty() {
                return vec![hit.index];
            }
            return path;
        }

        self.path_anchor = None;
        if self.settings.connected {
            connectivity::grow_from_seed(mesh, kind, hit.index, &self.grow_policy())
        } else {
            vec![hit.index]
        }
    }

    /// Clears the current level's selection after a replace-mode miss.
    fn on_miss<'d>(
        &mut self,
        doc: &'d mut Document,
        session: &ViewSession,
        additive: bool,
        subtractive: bool,
    ) -> Option<&'d Command> {
        self.path_anchor = None;
        if additive || subtractive {
            return None;
        }
        let current = doc.current_selection()?;
        if current.is_empty() {
            return None;
        }
        let empty = match current {
            SelectionTarget::Geometry { kind, .. } => SelectionTarget::geometry(kind, Vec::new()),
            SelectionTarget::Mesh {
                object, mode, kind, ..
            } => SelectionTarget::mesh(object, mode, kind, Vec::new()),
        };
        let command = SelectItems::new(doc.scene(), empty, false).map(Command::from);
        commit(doc, session, command)
    }

    fn apply<'d>(
        &self,
        doc: &'d mut Document,
        session: &ViewSession,
        target: SelectionTarget,
        additive: bool,
        subtractive: bool,
    ) -> Option<&'d Command> {
        let scene = doc.scene();
        let command = if subtractive {
            UnselectItems::new(scene, target).map(Command::from)
        } else if self.settings.select_and_hide {
            HideItems::new(scene, target).map(Command::from)
        } else {
            SelectItems::new(scene, target, additive).map(Command::from)
        };
        commit(doc, session, command)
    }
}

/// Pushes a freshly built command, or logs why it could not be built.
fn commit<'d>(
    doc: &'d mut Document,
    session: &ViewSession,
    command: Result<Command, CommandError>,
) -> Option<&'d Command> {
    match command {
        Ok(command) => {
            let applied = doc.execute_command(command);
            session.request_redraw();
            Some(applied)
        }
        Err(e) => {
            warn!(error = %e, "selection command rejected");
            None
        }
    }
}

/// Global id of a picked geometry entity.
fn geometry_gid(doc: &Document, hit: EntityRef) -> Option<GlobalId> {
    let object = doc.scene().object(hit.object)?;
    match hit.kind {
        EntityKind::Object => Some(object.gid()),
        EntityKind::Part => object.parts.get(hit.index).map(|p| p.gid),
        EntityKind::Surface => object.surfaces.get(hit.index).map(|s| s.gid),
        EntityKind::Edge => object.edges.get(hit.index).map(|e| e.gid),
        EntityKind::Vertex => object.vertices.get(hit.index).map(|v| v.gid),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::fixtures::strip_scene;
    use crate::selection::EntityKind;
    use crate::view::{OrthographicView, PlaneCut, RedrawHandle};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter(Rc<Cell<usize>>);

    impl RedrawHandle for Counter {
        fn request_redraw(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Strip of three unit quads along x, seen from +z at 10 px per unit.
    /// World (x, y) maps to pixel (100 + 10x, 50 + 10y).
    fn setup(level: EntityKind) -> (Document, ViewSession, Rc<Cell<usize>>) {
        let scene = strip_scene();
        let active = scene.active_object;
        let mut doc = Document::new(scene.model);
        doc.set_active_object(active);
        assert!(doc.switch_level(level));
        let mut session = ViewSession::new();
        session.attach(Box::new(OrthographicView::new(200.0, 100.0, 10.0)));
        let redraws = Rc::new(Cell::new(0));
        session.set_redraw_handle(Box::new(Counter(Rc::clone(&redraws))));
        (doc, session, redraws)
    }

    fn px(x: f64, y: f64) -> (f64, f64) {
        (100.0 + 10.0 * x, 50.0 + 10.0 * y)
    }

    fn selected(doc: &Document) -> Vec<usize> {
        doc.current_selection().unwrap().indices().to_vec()
    }

    #[test]
    fn click_selects_element_and_redraws() {
        let (mut doc, session, redraws) = setup(EntityKind::Element);
        let mut sel = Selector::default();
        let (x, y) = px(1.5, 0.5);
        let cmd = sel.pick(&mut doc, &session, x, y, false, false).unwrap();
        assert_eq!(cmd.name(), "Select element");
        assert_eq!(selected(&doc), vec![1]);
        assert_eq!(redraws.get(), 1);
    }

    #[test]
    fn shift_adds_and_ctrl_removes() {
        let (mut doc, session, _) = setup(EntityKind::Element);
        let mut sel = Selector::default();
        let (x0, y0) = px(0.5, 0.5);
        let (x2, y2) = px(2.5, 0.5);
        sel.pick(&mut doc, &session, x0, y0, false, false);
        sel.pick(&mut doc, &session, x2, y2, true, false);
        assert_eq!(selected(&doc), vec![0, 2]);
        sel.pick(&mut doc, &session, x0, y0, false, true);
        assert_eq!(selected(&doc), vec![2]);
    }

    #[test]
    fn miss_clears_only_in_replace_mode() {
        let (mut doc, session, _) = setup(EntityKind::Element);
        let mut sel = Selector::default();
        let (x, y) = px(0.5, 0.5);
        sel.pick(&mut doc, &session, x, y, false, false);
        let (mx, my) = px(0.5, 3.0);
        assert!(sel.pick(&mut doc, &session, mx, my, true, false).is_none());
        assert_eq!(selected(&doc), vec![0]);
        assert!(sel.pick(&mut doc, &session, mx, my, false, false).is_some());
        assert!(selected(&doc).is_empty());
        // Nothing left to clear.
        assert!(sel.pick(&mut doc, &session, mx, my, false, false).is_none());
        assert_eq!(doc.history().len(), 2);
    }

    #[test]
    fn node_pick_uses_pick_radius() {
        let (mut doc, session, _) = setup(EntityKind::Node);
        let mut sel = Selector::new(SelectionSettings::default().with_exterior_only(false));
        let (x, y) = px(1.0, 1.0);
        // Off the node by 3 px each way; every other node is over 6 px out.
        sel.pick(&mut doc, &session, x + 3.0, y - 3.0, false, false);
        assert_eq!(selected(&doc), vec![3]);
        let cmd = sel.pick(&mut doc, &session, x, y + 8.0, false, false);
        // Outside the 6 px square: a miss clears.
        assert!(cmd.is_some());
        assert!(selected(&doc).is_empty());
    }

    #[test]
    fn connected_pick_grows() {
        let (mut doc, session, _) = setup(EntityKind::Element);
        let mut sel = Selector::new(SelectionSettings::default().with_connected(true));
        let (x, y) = px(0.5, 0.5);
        sel.pick(&mut doc, &session, x, y, false, false);
        assert_eq!(selected(&doc), vec![0, 1, 2]);
    }

    #[test]
    fn path_mode_selects_node_chain() {
        let (mut doc, session, _) = setup(EntityKind::Node);
        let mut sel = Selector::new(
            SelectionSettings::default()
                .with_exterior_only(false)
                .with_select_path(true),
        );
        let (x, y) = px(0.0, 0.0);
        sel.pick(&mut doc, &session, x, y, false, false);
        assert_eq!(sel.path_anchor().map(|a| a.index), Some(0));
        let (x, y) = px(3.0, 0.0);
        sel.pick(&mut doc, &session, x, y, false, false);
        assert_eq!(selected(&doc), vec![0, 2, 4, 6]);
        assert_eq!(sel.path_anchor().map(|a| a.index), Some(6));

        let (mx, my) = px(1.5, 4.0);
        sel.pick(&mut doc, &session, mx, my, false, false);
        assert!(sel.path_anchor().is_none());
    }

    #[test]
    fn select_and_hide_hides() {
        let (mut doc, session, _) = setup(EntityKind::Element);
        let mut sel = Selector::new(SelectionSettings::default().with_select_and_hide(true));
        let (x, y) = px(1.5, 0.5);
        let cmd = sel.pick(&mut doc, &session, x, y, false, false).unwrap();
        assert_eq!(cmd.name(), "Hide element");
        let gid = doc.active_object().unwrap();
        let mesh = doc.scene().mesh(gid, MeshMode::Volume).unwrap();
        assert!(!mesh.is_visible(MeshItemKind::Element, 1));
        doc.undo();
        let mesh = doc.scene().mesh(gid, MeshMode::Volume).unwrap();
        assert!(mesh.is_visible(MeshItemKind::Element, 1));
    }

    #[test]
    fn region_pick_selects_faces_inside() {
        let (mut doc, session, _) = setup(EntityKind::Face);
        let mut sel = Selector::default();
        let (x0, y0) = px(-0.5, -0.5);
        let (x1, y1) = px(1.2, 1.5);
        let region = SelectRegion::rect(x0, y0, x1, y1);
        let cmd = sel.pick_region(&mut doc, &session, &region, false, false).unwrap();
        assert_eq!(cmd.name(), "Select face");
        assert_eq!(selected(&doc), vec![0, 1]);
    }

    #[test]
    fn detached_session_finds_nothing() {
        let (mut doc, mut session, _) = setup(EntityKind::Element);
        session.detach();
        let mut sel = Selector::default();
        let (x, y) = px(0.5, 0.5);
        assert!(sel.pick(&mut doc, &session, x, y, false, false).is_none());
        assert!(sel.hover(&mut doc, &mut session, x, y).is_none());
    }

    #[test]
    fn hover_highlights_without_commands() {
        let (mut doc, mut session, redraws) = setup(EntityKind::Face);
        let sel = Selector::default();
        let (x, y) = px(2.5, 0.5);
        let h = sel.hover(&mut doc, &mut session, x, y).unwrap();
        assert_eq!(h.kind, EntityKind::Face);
        assert_eq!(session.highlight(), Some(h));
        assert_eq!(redraws.get(), 1);
        sel.hover(&mut doc, &mut session, x, y);
        assert_eq!(redraws.get(), 1);
        assert!(doc.history().is_empty());
    }

    #[test]
    fn plane_cut_hides_far_side() {
        let (mut doc, mut session, _) = setup(EntityKind::Element);
        session.set_plane_cut(Some(PlaneCut::new(-1.0, 0.0, 0.0, 1.0)));
        let mut sel = Selector::default();
        let (x, y) = px(2.5, 0.5);
        assert!(sel.pick(&mut doc, &session, x, y, true, false).is_none());
        let (x, y) = px(0.5, 0.5);
        sel.pick(&mut doc, &session, x, y, true, false);
        assert_eq!(selected(&doc), vec![0]);
    }
}
