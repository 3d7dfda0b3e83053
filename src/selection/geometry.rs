//! Selection and visibility flags of geometric entities, addressed by kind
//! across the whole model.
//!
//! Flag vectors list the entities of one kind in document order (objects in
//! model order, then each object's entities by local index).

use crate::topology::{GObject, GlobalId, Model};

use super::EntityKind;

/// Mutable view of one entity's flags.
struct Flags<'a> {
    gid: GlobalId,
    selected: &'a mut bool,
    visible: &'a mut bool,
}

fn flags_of(o: &mut GObject, kind: EntityKind) -> Vec<Flags<'_>> {
    match kind {
        EntityKind::Object => {
            let gid = o.gid();
            vec![Flags {
                gid,
                selected: &mut o.selected,
                visible: &mut o.visible,
            }]
        }
        EntityKind::Part => o
            .parts
            .iter_mut()
            .map(|p| Flags {
                gid: p.gid,
                selected: &mut p.selected,
                visible: &mut p.visible,
            })
            .collect(),
        EntityKind::Surface => o
            .surfaces
            .iter_mut()
            .map(|s| Flags {
                gid: s.gid,
                selected: &mut s.selected,
                visible: &mut s.visible,
            })
            .collect(),
        EntityKind::Edge => o
            .edges
            .iter_mut()
            .map(|e| Flags {
                gid: e.gid,
                selected: &mut e.selected,
                visible: &mut e.visible,
            })
            .collect(),
        EntityKind::Vertex => o
            .vertices
            .iter_mut()
            .map(|v| Flags {
                gid: v.gid,
                selected: &mut v.selected,
                visible: &mut v.visible,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `(gid, selected, visible)` of every entity of `kind`, in document order.
fn states(model: &Model, kind: EntityKind) -> Vec<(GlobalId, bool, bool)> {
    let mut out = Vec::new();
    for (_, o) in model.objects() {
        match kind {
            EntityKind::Object => out.push((o.gid(), o.selected, o.visible)),
            EntityKind::Part => out.extend(o.parts.iter().map(|p| (p.gid, p.selected, p.visible))),
            EntityKind::Surface => {
                out.extend(o.surfaces.iter().map(|s| (s.gid, s.selected, s.visible)));
            }
            EntityKind::Edge => out.extend(o.edges.iter().map(|e| (e.gid, e.selected, e.visible))),
            EntityKind::Vertex => {
                out.extend(o.vertices.iter().map(|v| (v.gid, v.selected, v.visible)));
            }
            _ => {}
        }
    }
    out
}

/// `true` if an entity of `kind` with global id `gid` exists.
#[must_use]
pub fn contains(model: &Model, kind: EntityKind, gid: GlobalId) -> bool {
    match kind {
        EntityKind::Object => model.find_object(gid).is_some(),
        EntityKind::Part => model.find_part(gid).is_some(),
        EntityKind::Surface => model.find_surface(gid).is_some(),
        EntityKind::Edge => model.find_edge(gid).is_some(),
        EntityKind::Vertex => model.find_vertex(gid).is_some(),
        _ => false,
    }
}

/// Global ids of the selected entities of `kind`.
#[must_use]
pub fn selected_ids(model: &Model, kind: EntityKind) -> Vec<GlobalId> {
    states(model, kind)
        .into_iter()
        .filter_map(|(gid, sel, _)| sel.then_some(gid))
        .collect()
}

/// Snapshot of the selection flags of `kind`.
#[must_use]
pub fn selection_vector(model: &Model, kind: EntityKind) -> Box<[bool]> {
    states(model, kind).into_iter().map(|(_, s, _)| s).collect()
}

/// Snapshot of the visibility flags of `kind`.
#[must_use]
pub fn visibility_vector(model: &Model, kind: EntityKind) -> Box<[bool]> {
    states(model, kind).into_iter().map(|(_, _, v)| v).collect()
}

fn apply(model: &mut Model, kind: EntityKind, mut f: impl FnMut(usize, &mut Flags<'_>)) {
    let mut i = 0;
    model.for_each_object_mut(|o| {
        for mut flags in flags_of(o, kind) {
            f(i, &mut flags);
            i += 1;
        }
    });
}

/// Restores selection flags from a snapshot.
pub fn apply_selection_vector(model: &mut Model, kind: EntityKind, snapshot: &[bool]) {
    apply(model, kind, |i, f| {
        if let Some(&s) = snapshot.get(i) {
            *f.selected = s;
        }
    });
}

/// Restores visibility flags from a snapshot.
pub fn apply_visibility_vector(model: &mut Model, kind: EntityKind, snapshot: &[bool]) {
    apply(model, kind, |i, f| {
        if let Some(&v) = snapshot.get(i) {
            *f.visible = v;
        }
    });
}

/// Sets the selection flag of every entity of `kind` listed in `ids`.
pub fn set_selected(model: &mut Model, kind: EntityKind, ids: &[GlobalId], on: bool) {
    apply(model, kind, |_, f| {
        if ids.contains(&f.gid) {
            *f.selected = on;
        }
    });
}

/// Clears the selection flag of every entity of `kind`.
pub fn clear_selection(model: &mut Model, kind: EntityKind) {
    apply(model, kind, |_, f| *f.selected = false);
}

/// Hides and unselects every entity of `kind` listed in `ids`.
pub fn hide(model: &mut Model, kind: EntityKind, ids: &[GlobalId]) {
    apply(model, kind, |_, f| {
        if ids.contains(&f.gid) {
            *f.visible = false;
            *f.selected = false;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::topology::VertexKind;

    fn model() -> (Model, Vec<GlobalId>) {
        let mut model = Model::new();
        let mut ids = Vec::new();
        for name in ["a", "b"] {
            let mut o = GObject::new(name);
            o.add_part();
            let v = o.add_vertex(Point3::origin(), VertexKind::Vertex);
            ids.push(o.vertices[v].gid);
            model.add_object(o);
        }
        (model, ids)
    }

    #[test]
    fn vectors_follow_document_order() {
        let (mut m, ids) = model();
        set_selected(&mut m, EntityKind::Vertex, &ids[1..], true);
        assert_eq!(&*selection_vector(&m, EntityKind::Vertex), &[false, true]);
        assert_eq!(selected_ids(&m, EntityKind::Vertex), vec![ids[1]]);
        assert!(selected_ids(&m, EntityKind::Part).is_empty());
    }

    #[test]
    fn snapshot_restores_exactly() {
        let (mut m, ids) = model();
        set_selected(&mut m, EntityKind::Vertex, &ids[..1], true);
        let snap = selection_vector(&m, EntityKind::Vertex);
        clear_selection(&mut m, EntityKind::Vertex);
        set_selected(&mut m, EntityKind::Vertex, &ids[1..], true);
        apply_selection_vector(&mut m, EntityKind::Vertex, &snap);
        assert_eq!(selected_ids(&m, EntityKind::Vertex), vec![ids[0]]);
    }

    #[test]
    fn hide_unselects() {
        let (mut m, ids) = model();
        set_selected(&mut m, EntityKind::Vertex, &ids, true);
        let vis = visibility_vector(&m, EntityKind::Vertex);
        hide(&mut m, EntityKind::Vertex, &ids[..1]);
        assert_eq!(&*visibility_vector(&m, EntityKind::Vertex), &[false, true]);
        assert_eq!(selected_ids(&m, EntityKind::Vertex), vec![ids[1]]);
        apply_visibility_vector(&mut m, EntityKind::Vertex, &vis);
        assert_eq!(&*visibility_vector(&m, EntityKind::Vertex), &[true, true]);
    }

    #[test]
    fn object_kind_uses_object_ids() {
        let (m, _) = model();
        let gid = m.objects().next().map(|(_, o)| o.gid()).unwrap_or_else(GlobalId::next);
        assert!(contains(&m, EntityKind::Object, gid));
        assert!(!contains(&m, EntityKind::Node, gid));
    }
}
