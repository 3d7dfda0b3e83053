use crate::math::Point3;

/// A display triangle tagged with the surface it was tessellated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTriangle {
    /// Indices into [`RenderMesh::positions`], counter-clockwise seen from outside.
    pub nodes: [usize; 3],
    /// Local index of the owning surface.
    pub surface: usize,
}

/// A display segment tagged with the edge it was tessellated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSegment {
    pub nodes: [usize; 2],
    /// Local index of the owning edge.
    pub edge: usize,
}

/// Display tessellation of an object's boundary, in object-local coordinates.
///
/// Geometry-level picking runs against this mesh rather than the exact
/// surfaces.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    pub positions: Vec<Point3>,
    pub triangles: Vec<RenderTriangle>,
    pub segments: Vec<RenderSegment>,
}

impl RenderMesh {
    /// Creates an empty render mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a position and returns its index.
    pub fn add_position(&mut self, p: Point3) -> usize {
        self.positions.push(p);
        self.positions.len() - 1
    }

    /// Appends a triangle owned by `surface`.
    pub fn add_triangle(&mut self, nodes: [usize; 3], surface: usize) {
        self.triangles.push(RenderTriangle { nodes, surface });
    }

    /// Appends a quad as two triangles `(0, 1, 2)` and `(2, 3, 0)`.
    pub fn add_quad(&mut self, nodes: [usize; 4], surface: usize) {
        self.add_triangle([nodes[0], nodes[1], nodes[2]], surface);
        self.add_triangle([nodes[2], nodes[3], nodes[0]], surface);
    }

    /// Appends a segment owned by `edge`.
    pub fn add_segment(&mut self, nodes: [usize; 2], edge: usize) {
        self.segments.push(RenderSegment { nodes, edge });
    }

    /// Corner positions of a triangle, or `None` if an index is out of range.
    #[must_use]
    pub fn triangle_points(&self, tri: &RenderTriangle) -> Option<[Point3; 3]> {
        let [a, b, c] = tri.nodes;
        Some([
            *self.positions.get(a)?,
            *self.positions.get(b)?,
            *self.positions.get(c)?,
        ])
    }

    /// End positions of a segment, or `None` if an index is out of range.
    #[must_use]
    pub fn segment_points(&self, seg: &RenderSegment) -> Option<[Point3; 2]> {
        Some([
            *self.positions.get(seg.nodes[0])?,
            *self.positions.get(seg.nodes[1])?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_splits_into_two_triangles() {
        let mut rm = RenderMesh::new();
        let ids: Vec<usize> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| rm.add_position(Point3::new(x, y, 0.0)))
            .collect();
        rm.add_quad([ids[0], ids[1], ids[2], ids[3]], 7);
        assert_eq!(rm.triangles.len(), 2);
        assert_eq!(rm.triangles[1].nodes, [2, 3, 0]);
        assert!(rm.triangles.iter().all(|t| t.surface == 7));
    }

    #[test]
    fn out_of_range_triangle_has_no_points() {
        let rm = RenderMesh::new();
        let tri = RenderTriangle {
            nodes: [0, 1, 2],
            surface: 0,
        };
        assert!(rm.triangle_points(&tri).is_none());
    }
}
