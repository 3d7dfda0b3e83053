use tracing::debug;

use crate::error::{MeshError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::mesh::{ElementShape, Mesh};
use crate::topology::{GObject, Model, ObjectId, VertexKind};

use super::{add_chain_edges, check_divisions};

/// Creates a flat rectangular plate in the xy-plane, spanning
/// `[0, width] × [0, height]` and facing +z.
///
/// The volume mesh is a grid of quad shells; the surface mesh is the same
/// grid as bare faces. Both carry one edge partition per plate side and a
/// corner node per vertex.
pub struct MakePlate {
    width: f64,
    height: f64,
    divisions: [usize; 2],
    name: String,
}

impl MakePlate {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            divisions: [1, 1],
            name: "Plate".into(),
        }
    }

    #[must_use]
    pub fn with_divisions(mut self, nx: usize, ny: usize) -> Self {
        self.divisions = [nx, ny];
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Executes the operation, adding the plate to the model.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Degenerate`] if a side is not positive or a
    /// division count is zero.
    pub fn execute(&self, model: &mut Model) -> Result<ObjectId> {
        if self.width <= TOLERANCE || self.height <= TOLERANCE {
            return Err(MeshError::Degenerate(format!(
                "plate sides must be positive, got {} x {}",
                self.width, self.height
            ))
            .into());
        }
        check_divisions(&self.divisions)?;

        let mut object = GObject::new(self.name.clone());
        let part = object.add_part();
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(self.width, 0.0, 0.0),
            Point3::new(self.width, self.height, 0.0),
            Point3::new(0.0, self.height, 0.0),
        ];
        for p in corners {
            object.add_vertex(p, VertexKind::Vertex);
            object.render_mesh.add_position(p);
        }
        let surface = object.add_surface([Some(part), None]);
        object.render_mesh.add_quad([0, 1, 2, 3], surface);
        for a in 0..4 {
            let b = (a + 1) % 4;
            let e = object.add_edge([Some(a), Some(b)], [Some(surface), None]);
            object.render_mesh.add_segment([a, b], e);
        }

        let shells = self.grid_mesh(true)?;
        let faces = self.grid_mesh(false)?;
        debug!(
            object = %object.gid(),
            elements = shells.elements.len(),
            "plate created"
        );
        object.fe_mesh = Some(shells);
        object.surface_mesh = Some(faces);
        Ok(model.add_object(object))
    }

    /// Structured grid, as shell elements with extracted faces or as bare
    /// faces.
    #[allow(clippy::cast_precision_loss)]
    fn grid_mesh(&self, shells: bool) -> Result<Mesh> {
        let [nx, ny] = self.divisions;
        let w = nx + 1;
        let id = |i: usize, j: usize| j * w + i;

        let mut mesh = Mesh::new();
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.add_node(Point3::new(
                    self.width * i as f64 / nx as f64,
                    self.height * j as f64 / ny as f64,
                    0.0,
                ));
            }
        }
        for j in 0..ny {
            for i in 0..nx {
                let quad = [id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)];
                if shells {
                    mesh.add_element(ElementShape::Quad4, quad.to_vec(), 0)?;
                } else {
                    mesh.add_face(&quad, Some(0))?;
                }
            }
        }
        if shells {
            mesh.extract_faces();
            for f in &mut mesh.faces {
                f.gid = Some(0);
            }
        }

        let sides: [Vec<usize>; 4] = [
            (0..=nx).map(|i| id(i, 0)).collect(),
            (0..=ny).map(|j| id(nx, j)).collect(),
            (0..=nx).rev().map(|i| id(i, ny)).collect(),
            (0..=ny).rev().map(|j| id(0, j)).collect(),
        ];
        for (g, chain) in sides.iter().enumerate() {
            add_chain_edges(&mut mesh, chain, g)?;
        }
        for (v, n) in [id(0, 0), id(nx, 0), id(nx, ny), id(0, ny)]
            .into_iter()
            .enumerate()
        {
            mesh.nodes[n].gid = Some(v);
        }
        mesh.update_topology();
        Ok(mesh)
    }
}
