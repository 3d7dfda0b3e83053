use crate::math::polygon_2d::is_backfacing;
use crate::math::{Isometry3, Point2, Point3, TOLERANCE};
use crate::mesh::{Mesh, MeshItem};
use crate::selection::{EntityKind, Pickable, Primitive, SelectRegion, SelectionSettings};
use crate::topology::{GObject, GlobalId, Model};
use crate::view::{passes_cut, PlaneCut, ViewTransform};

use super::backface::{
    tag_front_edges, tag_front_elements, tag_front_faces, tag_front_nodes, FRONT,
};

/// Filters applied by region queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionOptions {
    /// Skip items facing away from the viewer.
    pub cull_backfaces: bool,
    /// Skip interior nodes and covered solid elements.
    pub exterior_only: bool,
}

impl From<&SelectionSettings> for RegionOptions {
    fn from(s: &SelectionSettings) -> Self {
        Self {
            cull_backfaces: s.cull_backfaces,
            exterior_only: s.exterior_only,
        }
    }
}

/// Shared context of one region query.
struct RegionQuery<'a> {
    view: &'a dyn ViewTransform,
    region: &'a SelectRegion,
    cut: Option<&'a PlaneCut>,
}

impl RegionQuery<'_> {
    fn screen(&self, p: &Point3) -> Option<Point2> {
        let s = self.view.world_to_screen(p);
        self.view
            .point_visible_in_frustum(&s)
            .then(|| Point2::new(s.x, s.y))
    }

    /// Tests a world-space primitive. Any corner on the cut-away side
    /// disqualifies it; zero-area triangles never match, and with `cull`
    /// back-facing ones are skipped.
    fn hits(&self, prim: &Primitive, cull: bool) -> bool {
        match prim {
            Primitive::Point(p) => {
                passes_cut(self.cut, p) && self.screen(p).is_some_and(|s| self.region.is_inside(&s))
            }
            Primitive::Segments(segs) => segs.iter().any(|[a, b]| {
                if !passes_cut(self.cut, a) || !passes_cut(self.cut, b) {
                    return false;
                }
                match (self.screen(a), self.screen(b)) {
                    (Some(sa), Some(sb)) => self.region.line_intersects(&sa, &sb),
                    _ => false,
                }
            }),
            Primitive::Triangles(tris) => tris.iter().any(|tri| {
                if tri.iter().any(|p| !passes_cut(self.cut, p)) {
                    return false;
                }
                if (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).norm() < TOLERANCE {
                    return false;
                }
                let (Some(a), Some(b), Some(c)) =
                    (self.screen(&tri[0]), self.screen(&tri[1]), self.screen(&tri[2]))
                else {
                    return false;
                };
                let projected = [a, b, c];
                if cull && is_backfacing(&projected) {
                    return false;
                }
                self.region.triangle_intersects(&projected)
            }),
        }
    }
}

fn mesh_hits<T: Pickable<Context = Mesh>>(
    query: &RegionQuery<'_>,
    mesh: &Mesh,
    item: &T,
    transform: &Isometry3,
) -> bool {
    query.hits(&item.bounding_primitive(mesh).transformed(transform), false)
}

/// Nodes inside the region.
///
/// With culling, only nodes on front-facing faces qualify; otherwise, with
/// `exterior_only`, only exterior nodes do. Overwrites node and face tags.
pub fn region_nodes(
    mesh: &mut Mesh,
    transform: &Isometry3,
    view: &dyn ViewTransform,
    region: &SelectRegion,
    cut: Option<&PlaneCut>,
    opts: RegionOptions,
) -> Vec<usize> {
    if opts.cull_backfaces {
        tag_front_nodes(mesh, transform, view);
    }
    let query = RegionQuery { view, region, cut };
    let mesh = &*mesh;
    mesh.nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| MeshItem::is_visible(*n))
        .filter(|(_, n)| {
            if opts.cull_backfaces {
                n.state.tag == FRONT
            } else {
                !opts.exterior_only || n.exterior
            }
        })
        .filter(|(_, n)| mesh_hits(&query, mesh, *n, transform))
        .map(|(i, _)| i)
        .collect()
}

/// Mesh edges touching the region. Overwrites edge, node and face tags
/// when culling.
pub fn region_edges(
    mesh: &mut Mesh,
    transform: &Isometry3,
    view: &dyn ViewTransform,
    region: &SelectRegion,
    cut: Option<&PlaneCut>,
    opts: RegionOptions,
) -> Vec<usize> {
    if opts.cull_backfaces {
        tag_front_edges(mesh, transform, view);
    }
    let query = RegionQuery { view, region, cut };
    let mesh = &*mesh;
    mesh.edges
        .iter()
        .enumerate()
        .filter(|(_, e)| MeshItem::is_visible(*e) && (!opts.cull_backfaces || e.state.tag == FRONT))
        .filter(|(_, e)| mesh_hits(&query, mesh, *e, transform))
        .map(|(i, _)| i)
        .collect()
}

/// Faces touching the region. Overwrites face tags when culling.
pub fn region_faces(
    mesh: &mut Mesh,
    transform: &Isometry3,
    view: &dyn ViewTransform,
    region: &SelectRegion,
    cut: Option<&PlaneCut>,
    opts: RegionOptions,
) -> Vec<usize> {
    if opts.cull_backfaces {
        tag_front_faces(mesh, transform, view);
    }
    let query = RegionQuery { view, region, cut };
    let mesh = &*mesh;
    mesh.faces
        .iter()
        .enumerate()
        .filter(|(_, f)| MeshItem::is_visible(*f) && (!opts.cull_backfaces || f.state.tag == FRONT))
        .filter(|(_, f)| mesh_hits(&query, mesh, *f, transform))
        .map(|(i, _)| i)
        .collect()
}

/// Elements touching the region.
///
/// With `exterior_only`, a solid qualifies only if one of its faces is
/// uncovered (no neighbour, or a hidden one). Overwrites element tags when
/// culling.
pub fn region_elements(
    mesh: &mut Mesh,
    transform: &Isometry3,
    view: &dyn ViewTransform,
    region: &SelectRegion,
    cut: Option<&PlaneCut>,
    opts: RegionOptions,
) -> Vec<usize> {
    if opts.cull_backfaces {
        tag_front_elements(mesh, transform, view);
    }
    let query = RegionQuery { view, region, cut };
    let mesh = &*mesh;
    let uncovered = |el: &crate::mesh::Element| {
        !el.is_solid()
            || el
                .nbr
                .iter()
                .any(|n| n.is_none_or(|n| !mesh.is_visible(crate::mesh::MeshItemKind::Element, n)))
    };
    mesh.elements
        .iter()
        .enumerate()
        .filter(|(_, el)| MeshItem::is_visible(*el))
        .filter(|(_, el)| !opts.cull_backfaces || el.state.tag == FRONT)
        .filter(|(_, el)| !opts.exterior_only || uncovered(el))
        .filter(|(_, el)| mesh_hits(&query, mesh, *el, transform))
        .map(|(i, _)| i)
        .collect()
}

/// Geometry entities of `kind` touching the region, as global ids.
///
/// Objects, parts and surfaces are tested through their render triangles,
/// edges through their render segments and vertices as points. Mesh kinds
/// yield nothing.
pub fn region_geometry(
    model: &Model,
    kind: EntityKind,
    view: &dyn ViewTransform,
    region: &SelectRegion,
    cut: Option<&PlaneCut>,
    cull_backfaces: bool,
) -> Vec<GlobalId> {
    let query = RegionQuery { view, region, cut };
    let hit = |o: &GObject, prim: Primitive| query.hits(&prim.transformed(&o.transform), cull_backfaces);
    let mut out = Vec::new();
    for (_, o) in model.objects() {
        if !o.visible {
            continue;
        }
        match kind {
            EntityKind::Object => {
                let visible_surface_hit = o.surfaces.iter().any(|s| {
                    o.is_surface_visible(s.index) && hit(o, s.bounding_primitive(o))
                });
                if visible_surface_hit {
                    out.push(o.gid());
                }
            }
            EntityKind::Part => out.extend(
                o.parts
                    .iter()
                    .filter(|p| o.is_part_visible(p.index) && hit(o, p.bounding_primitive(o)))
                    .map(|p| p.gid),
            ),
            EntityKind::Surface => out.extend(
                o.surfaces
                    .iter()
                    .filter(|s| o.is_surface_visible(s.index) && hit(o, s.bounding_primitive(o)))
                    .map(|s| s.gid),
            ),
            EntityKind::Edge => out.extend(
                o.edges
                    .iter()
                    .filter(|e| o.is_edge_visible(e.index) && hit(o, e.bounding_primitive(o)))
                    .map(|e| e.gid),
            ),
            EntityKind::Vertex => out.extend(
                o.vertices
                    .iter()
                    .filter(|v| v.is_selectable() && hit(o, v.bounding_primitive(o)))
                    .map(|v| v.gid),
            ),
            _ => {}
        }
    }
    out
}
