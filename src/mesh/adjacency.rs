use std::collections::HashMap;

use tracing::debug;

use crate::error::MeshError;
use crate::math::Vector3;

use super::{Face, Mesh};

/// Sorted node set used as a hash key for faces and sides.
fn key(nodes: &[usize]) -> Vec<usize> {
    let mut k = nodes.to_vec();
    k.sort_unstable();
    k
}

impl Mesh {
    /// Newell normal of the polygon through `nodes`, normalized. Zero for
    /// degenerate input.
    #[must_use]
    pub fn polygon_normal(&self, nodes: &[usize]) -> Vector3 {
        let n = nodes.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let a = self.node_position(nodes[i]);
            let b = self.node_position(nodes[(i + 1) % n]);
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        normal.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Rebuilds all derived adjacency: element neighbours, element/face
    /// links, face neighbours, edge neighbours, face normals and exterior
    /// flags.
    ///
    /// Links are written in pairs, so they are reciprocal by construction.
    pub fn update_topology(&mut self) {
        self.update_element_neighbours();
        self.update_element_faces();
        self.update_face_neighbours();
        self.update_edge_neighbours();
        self.update_face_normals();
        self.update_exterior_flags();
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            faces = self.faces.len(),
            elements = self.elements.len(),
            "mesh topology updated"
        );
    }

    fn update_element_neighbours(&mut self) {
        let mut open: HashMap<Vec<usize>, (usize, usize)> = HashMap::new();
        for e in &mut self.elements {
            e.nbr.iter_mut().for_each(|n| *n = None);
        }
        for i in 0..self.elements.len() {
            let el = &self.elements[i];
            let sides: Vec<Vec<usize>> = if el.is_solid() {
                (0..el.face_count()).map(|j| el.face_nodes(j)).collect()
            } else if el.is_shell() {
                (0..el.nodes.len()).map(|j| el.side(j).to_vec()).collect()
            } else {
                Vec::new()
            };
            // solids and shells live in separate key spaces
            let tag = usize::from(el.is_shell());
            for (j, side) in sides.iter().enumerate() {
                let mut k = key(side);
                k.push(usize::MAX - tag);
                match open.remove(&k) {
                    Some((other, oj)) => {
                        self.elements[i].nbr[j] = Some(other);
                        self.elements[other].nbr[oj] = Some(i);
                    }
                    None => {
                        open.insert(k, (i, j));
                    }
                }
            }
        }
    }

    fn update_element_faces(&mut self) {
        let lookup: HashMap<Vec<usize>, usize> = self
            .faces
            .iter()
            .enumerate()
            .map(|(i, f)| (key(f.nodes()), i))
            .collect();
        for f in &mut self.faces {
            f.elements = [None; 2];
        }
        for i in 0..self.elements.len() {
            for j in 0..self.elements[i].face_count() {
                let nodes = self.elements[i].face_nodes(j);
                let face = lookup.get(&key(&nodes)).copied();
                self.elements[i].faces[j] = face;
                if let Some(fi) = face {
                    let slots = &mut self.faces[fi].elements;
                    if slots[0].is_none() {
                        slots[0] = Some(i);
                    } else if slots[1].is_none() && slots[0] != Some(i) {
                        slots[1] = Some(i);
                    }
                }
            }
        }
    }

    fn update_face_neighbours(&mut self) {
        let mut open: HashMap<Vec<usize>, (usize, usize)> = HashMap::new();
        for f in &mut self.faces {
            f.nbr = [None; 4];
        }
        for i in 0..self.faces.len() {
            for j in 0..self.faces[i].side_count() {
                let k = key(&self.faces[i].side(j));
                match open.remove(&k) {
                    Some((other, oj)) => {
                        self.faces[i].nbr[j] = Some(other);
                        self.faces[other].nbr[oj] = Some(i);
                    }
                    None => {
                        open.insert(k, (i, j));
                    }
                }
            }
        }
    }

    /// Edges are neighbours through a node shared by exactly two edges.
    fn update_edge_neighbours(&mut self) {
        let nel = NodeEdgeList::new(self);
        for e in &mut self.edges {
            e.nbr = [None; 2];
        }
        for i in 0..self.edges.len() {
            for k in 0..2 {
                let node = self.edges[i].nodes[k];
                if let [a, b] = nel.edges(node) {
                    self.edges[i].nbr[k] = Some(if *a == i { *b } else { *a });
                }
            }
        }
    }

    fn update_face_normals(&mut self) {
        let normals: Vec<Vector3> = self
            .faces
            .iter()
            .map(|f| self.polygon_normal(f.nodes()))
            .collect();
        for (f, n) in self.faces.iter_mut().zip(normals) {
            f.normal = n;
        }
    }

    fn update_exterior_flags(&mut self) {
        for n in &mut self.nodes {
            n.exterior = false;
        }
        for fi in 0..self.faces.len() {
            if self.faces[fi].is_external() {
                for k in 0..self.faces[fi].side_count() {
                    let n = self.faces[fi].nodes()[k];
                    if let Some(node) = self.nodes.get_mut(n) {
                        node.exterior = true;
                    }
                }
            }
        }
    }

    /// Creates a face for every open solid face and every shell element
    /// that has none yet, then rebuilds adjacency. New faces get no
    /// partition. Returns the number of faces added.
    pub fn extract_faces(&mut self) -> usize {
        self.update_topology();
        let mut added = 0;
        for i in 0..self.elements.len() {
            let el = &self.elements[i];
            let open: Vec<Vec<usize>> = if el.is_solid() {
                (0..el.face_count())
                    .filter(|&j| el.nbr[j].is_none() && el.faces[j].is_none())
                    .map(|j| el.face_nodes(j))
                    .collect()
            } else if el.is_shell() && el.faces[0].is_none() {
                vec![el.nodes.clone()]
            } else {
                Vec::new()
            };
            for nodes in open {
                let nid = self.faces.len() + 1;
                if let Some(face) = Face::new(nid, &nodes, None) {
                    self.faces.push(face);
                    added += 1;
                }
            }
        }
        self.update_topology();
        added
    }

    /// Checks index bounds and neighbour reciprocity.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), MeshError> {
        let out = |collection: &'static str, index: usize, len: usize| MeshError::IndexOutOfRange {
            collection,
            index,
            len,
        };
        let nn = self.nodes.len();
        for e in &self.edges {
            if let Some(&n) = e.nodes.iter().find(|&&n| n >= nn) {
                return Err(out("node", n, nn));
            }
        }
        for (i, e) in self.edges.iter().enumerate() {
            for nb in e.nbr.iter().flatten() {
                let other = self.edges.get(*nb).ok_or(out("edge", *nb, self.edges.len()))?;
                if !other.nbr.contains(&Some(i)) {
                    return Err(MeshError::BrokenAdjacency(format!("edge {i} -> {nb}")));
                }
            }
        }
        for (i, f) in self.faces.iter().enumerate() {
            if let Some(&n) = f.nodes().iter().find(|&&n| n >= nn) {
                return Err(out("node", n, nn));
            }
            for nb in f.nbr.iter().flatten() {
                let other = self.faces.get(*nb).ok_or(out("face", *nb, self.faces.len()))?;
                if !other.nbr.contains(&Some(i)) {
                    return Err(MeshError::BrokenAdjacency(format!("face {i} -> {nb}")));
                }
            }
        }
        for (i, el) in self.elements.iter().enumerate() {
            if let Some(&n) = el.nodes.iter().find(|&&n| n >= nn) {
                return Err(out("node", n, nn));
            }
            for nb in el.nbr.iter().flatten() {
                let other = self
                    .elements
                    .get(*nb)
                    .ok_or(out("element", *nb, self.elements.len()))?;
                if !other.nbr.contains(&Some(i)) {
                    return Err(MeshError::BrokenAdjacency(format!("element {i} -> {nb}")));
                }
            }
            if let Some(&fi) = el.faces.iter().flatten().find(|&&f| f >= self.faces.len()) {
                return Err(out("face", fi, self.faces.len()));
            }
        }
        Ok(())
    }
}

/// Node-to-edge incidence.
#[derive(Debug, Clone, Default)]
pub struct NodeEdgeList {
    edges: Vec<Vec<usize>>,
}

impl NodeEdgeList {
    /// Builds the incidence lists of `mesh`.
    #[must_use]
    pub fn new(mesh: &Mesh) -> Self {
        let mut edges = vec![Vec::new(); mesh.nodes.len()];
        for (i, e) in mesh.edges.iter().enumerate() {
            for &n in &e.nodes {
                if let Some(list) = edges.get_mut(n) {
                    if !list.contains(&i) {
                        list.push(i);
                    }
                }
            }
        }
        Self { edges }
    }

    /// Edges incident to `node`.
    #[must_use]
    pub fn edges(&self, node: usize) -> &[usize] {
        self.edges.get(node).map_or(&[], Vec::as_slice)
    }
}

/// Node-to-face incidence.
#[derive(Debug, Clone, Default)]
pub struct NodeFaceList {
    faces: Vec<Vec<usize>>,
}

impl NodeFaceList {
    /// Builds the incidence lists of `mesh`.
    #[must_use]
    pub fn new(mesh: &Mesh) -> Self {
        let mut faces = vec![Vec::new(); mesh.nodes.len()];
        for (i, f) in mesh.faces.iter().enumerate() {
            for &n in f.nodes() {
                if let Some(list) = faces.get_mut(n) {
                    list.push(i);
                }
            }
        }
        Self { faces }
    }

    /// Faces incident to `node`.
    #[must_use]
    pub fn faces(&self, node: usize) -> &[usize] {
        self.faces.get(node).map_or(&[], Vec::as_slice)
    }
}
