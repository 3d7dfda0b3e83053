use tracing::debug;

use crate::error::{MeshError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{ElementShape, Mesh};
use crate::topology::{GObject, Model, ObjectId, VertexKind};

use super::{add_chain_edges, check_divisions};

/// Box corners as (x, y, z) flags; bottom loop first, then top.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner loops of the six sides, counter-clockwise seen from outside:
/// −y, +x, +y, −x, −z, +z.
const SIDES: [[usize; 4]; 6] = [
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
    [0, 3, 2, 1],
    [4, 5, 6, 7],
];

#[rustfmt::skip]
const EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// Creates an axis-aligned box object with a structured hex mesh.
///
/// The B-rep has one part, six surfaces, twelve edges and eight vertices.
/// The volume mesh carries one face partition per side, one edge partition
/// per box edge and a corner node per vertex.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
    divisions: [usize; 3],
    name: String,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation with one element per axis.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
            divisions: [1, 1, 1],
            name: "Box".into(),
        }
    }

    /// Number of hex elements along x, y and z.
    #[must_use]
    pub fn with_divisions(mut self, nx: usize, ny: usize, nz: usize) -> Self {
        self.divisions = [nx, ny, nz];
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Executes the operation, adding the box to the model.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Degenerate`] if an extent is not positive or a
    /// division count is zero.
    pub fn execute(&self, model: &mut Model) -> Result<ObjectId> {
        let size = self.max_corner - self.min_corner;
        if size.iter().any(|&d| d <= TOLERANCE) {
            return Err(MeshError::Degenerate(format!(
                "box extents must be positive, got {size:?}"
            ))
            .into());
        }
        check_divisions(&self.divisions)?;

        let mut object = GObject::new(self.name.clone());
        let part = object.add_part();
        for c in CORNERS {
            let p = self.corner(c);
            object.add_vertex(p, VertexKind::Vertex);
            object.render_mesh.add_position(p);
        }
        for side in SIDES {
            let s = object.add_surface([Some(part), None]);
            object.render_mesh.add_quad(side, s);
        }
        for e in EDGES {
            let i = object.add_edge([Some(e[0]), Some(e[1])], bounding_sides(e));
            object.render_mesh.add_segment(e, i);
        }
        let mesh = self.volume_mesh()?;
        debug!(
            object = %object.gid(),
            nodes = mesh.nodes.len(),
            elements = mesh.elements.len(),
            faces = mesh.faces.len(),
            "box created"
        );
        object.fe_mesh = Some(mesh);
        Ok(model.add_object(object))
    }

    fn corner(&self, c: [usize; 3]) -> Point3 {
        let pick = |flag: usize, lo: f64, hi: f64| if flag == 0 { lo } else { hi };
        Point3::new(
            pick(c[0], self.min_corner.x, self.max_corner.x),
            pick(c[1], self.min_corner.y, self.max_corner.y),
            pick(c[2], self.min_corner.z, self.max_corner.z),
        )
    }

    #[allow(clippy::cast_precision_loss)]
    fn volume_mesh(&self) -> Result<Mesh> {
        let [nx, ny, nz] = self.divisions;
        let size = self.max_corner - self.min_corner;
        let (w, h) = (nx + 1, ny + 1);
        let id = |i: usize, j: usize, k: usize| (k * h + j) * w + i;

        let mut mesh = Mesh::new();
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    let step = Vector3::new(
                        size.x * i as f64 / nx as f64,
                        size.y * j as f64 / ny as f64,
                        size.z * k as f64 / nz as f64,
                    );
                    mesh.add_node(self.min_corner + step);
                }
            }
        }
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let nodes = vec![
                        id(i, j, k),
                        id(i + 1, j, k),
                        id(i + 1, j + 1, k),
                        id(i, j + 1, k),
                        id(i, j, k + 1),
                        id(i + 1, j, k + 1),
                        id(i + 1, j + 1, k + 1),
                        id(i, j + 1, k + 1),
                    ];
                    mesh.add_element(ElementShape::Hex8, nodes, 0)?;
                }
            }
        }
        mesh.extract_faces();
        for f in 0..mesh.faces.len() {
            let side = mesh.face_center(f).and_then(|c| self.side_of(&c));
            mesh.faces[f].gid = side;
        }

        let grid = |c: [usize; 3]| [c[0] * nx, c[1] * ny, c[2] * nz];
        for (g, [a, b]) in EDGES.into_iter().enumerate() {
            let (from, to) = (grid(CORNERS[a]), grid(CORNERS[b]));
            let Some(axis) = (0..3).find(|&d| from[d] != to[d]) else {
                continue;
            };
            let chain: Vec<usize> = (0..=self.divisions[axis])
                .map(|t| {
                    let mut at = from;
                    at[axis] = if from[axis] == 0 { t } else { from[axis] - t };
                    id(at[0], at[1], at[2])
                })
                .collect();
            add_chain_edges(&mut mesh, &chain, g)?;
        }
        for (v, c) in CORNERS.into_iter().enumerate() {
            let [i, j, k] = grid(c);
            mesh.nodes[id(i, j, k)].gid = Some(v);
        }
        mesh.update_topology();
        Ok(mesh)
    }

    /// Index of the box side `p` lies on, in [`SIDES`] order.
    fn side_of(&self, p: &Point3) -> Option<usize> {
        let tol = TOLERANCE * (self.max_corner - self.min_corner).amax().max(1.0);
        let (lo, hi) = (&self.min_corner, &self.max_corner);
        let on = |a: f64, b: f64| (a - b).abs() <= tol;
        [
            on(p.y, lo.y),
            on(p.x, hi.x),
            on(p.y, hi.y),
            on(p.x, lo.x),
            on(p.z, lo.z),
            on(p.z, hi.z),
        ]
        .iter()
        .position(|&hit| hit)
    }
}

/// The two sides sharing a box edge.
fn bounding_sides(edge: [usize; 2]) -> [Option<usize>; 2] {
    let mut sides = SIDES
        .iter()
        .enumerate()
        .filter(|(_, s)| s.contains(&edge[0]) && s.contains(&edge[1]))
        .map(|(i, _)| i);
    [sides.next(), sides.next()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connectivity::{connected_faces, GrowPolicy};
    use crate::mesh::MeshMode;

    fn make(nx: usize, ny: usize, nz: usize) -> GObject {
        let mut model = Model::new();
        let id = MakeBox::new(Point3::origin(), Point3::new(2.0, 1.0, 1.0))
            .with_divisions(nx, ny, nz)
            .execute(&mut model)
            .unwrap();
        model.object(id).unwrap().clone()
    }

    #[test]
    fn brep_counts() {
        let object = make(1, 1, 1);
        assert_eq!(object.parts.len(), 1);
        assert_eq!(object.surfaces.len(), 6);
        assert_eq!(object.edges.len(), 12);
        assert_eq!(object.vertices.len(), 8);
        assert_eq!(object.render_mesh.triangles.len(), 12);
        assert!(object.validate().is_ok());
        assert!(object.edges.iter().all(|e| e.surfaces.iter().all(Option::is_some)));
    }

    #[test]
    fn structured_mesh_counts() {
        let object = make(2, 1, 1);
        let mesh = object.mesh(MeshMode::Volume).unwrap();
        assert_eq!(mesh.nodes.len(), 12);
        assert_eq!(mesh.elements.len(), 2);
        assert_eq!(mesh.faces.len(), 10);
        assert_eq!(mesh.edges.len(), 16);
        assert!(mesh.faces.iter().all(|f| f.gid.is_some()));
        assert_eq!(mesh.faces.iter().filter(|f| f.gid == Some(0)).count(), 2);
        assert_eq!(mesh.nodes.iter().filter(|n| n.gid.is_some()).count(), 8);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn side_partitions_stop_growth() {
        let mut object = make(2, 2, 1);
        let mesh = object.mesh_mut(MeshMode::Volume).unwrap();
        let top = mesh.faces.iter().position(|f| f.gid == Some(5)).unwrap();
        let grown = connected_faces(mesh, top, &GrowPolicy::default());
        assert_eq!(grown.len(), 4);
    }

    #[test]
    fn rejects_flat_box() {
        let mut model = Model::new();
        let r = MakeBox::new(Point3::origin(), Point3::new(1.0, 0.0, 1.0)).execute(&mut model);
        assert!(r.is_err());
        let r = MakeBox::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
            .with_divisions(1, 0, 1)
            .execute(&mut model);
        assert!(r.is_err());
        assert_eq!(model.object_count(), 0);
    }
}
