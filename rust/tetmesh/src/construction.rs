// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and removal of simplices.
//!
//! Every simplex is created through the mesh, which checks referential
//! integrity (all referenced sub-simplices must exist and close up), keeps the
//! co-boundary indices in sync, and re-derives the boundary/interface flags of
//! the neighbourhood it touched. Edges and faces are deduplicated: asking for
//! an edge or face that already exists returns the existing key.

use nalgebra::Point3;

use crate::arena::*;
use crate::attributes::*;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::simplex_set::SimplexSet;

impl TetMesh {
    /// Adds a free node at `position`.
    pub fn add_node(&mut self, position: Point3<f64>) -> NodeKey {
        self.nodes.insert(NodeAttributes::new(position))
    }

    /// Creates an edge between two existing nodes, or returns the existing one.
    pub fn add_edge(&mut self, a: NodeKey, b: NodeKey) -> Result<EdgeKey> {
        if !self.nodes.contains_key(a) {
            return Err(Error::NodeNotFound(a));
        }
        if !self.nodes.contains_key(b) {
            return Err(Error::NodeNotFound(b));
        }
        if a == b {
            return Err(Error::DegenerateEdge(a));
        }
        if let Some(existing) = self.find_edge(a, b) {
            return Ok(existing);
        }

        let key = self.edges.insert(EdgeData {
            nodes: [a, b],
            attributes: EdgeAttributes::default(),
        });
        self.link_node_edge(a, key);
        self.link_node_edge(b, key);
        Ok(key)
    }

    /// Creates a triangular face from three edges, or returns the existing one.
    ///
    /// The edges must be distinct and span exactly three nodes.
    pub fn add_face(&mut self, e0: EdgeKey, e1: EdgeKey, e2: EdgeKey) -> Result<FaceKey> {
        let mut nodes: SimplexSet<NodeKey> = SimplexSet::new();
        for ek in [e0, e1, e2] {
            let edge = self.edges.get(ek).ok_or(Error::EdgeNotFound(ek))?;
            nodes.extend(edge.nodes);
        }
        if e0 == e1 || e1 == e2 || e0 == e2 || nodes.len() != 3 {
            return Err(Error::DegenerateFace);
        }
        if let Some(existing) = self.find_face(e0, e1, e2) {
            return Ok(existing);
        }

        let key = self.faces.insert(FaceData {
            edges: [e0, e1, e2],
            nodes: [nodes[0], nodes[1], nodes[2]],
            attributes: FaceAttributes::default(),
        });
        for ek in [e0, e1, e2] {
            self.link_edge_face(ek, key);
        }
        Ok(key)
    }

    /// Creates a tetrahedron bounded by four existing faces.
    ///
    /// The faces must be distinct, span exactly four nodes and six edges, and
    /// each may be shared with at most one other tetrahedron.
    pub fn add_tetrahedron(&mut self, faces: [FaceKey; 4], label: u32) -> Result<TetKey> {
        let mut nodes: SimplexSet<NodeKey> = SimplexSet::new();
        let mut edges: SimplexSet<EdgeKey> = SimplexSet::new();
        for fk in faces {
            let face = self.faces.get(fk).ok_or(Error::FaceNotFound(fk))?;
            nodes.extend(face.nodes);
            edges.extend(face.edges);
        }
        let distinct_faces: SimplexSet<FaceKey> = faces.into();
        if distinct_faces.len() != 4 || nodes.len() != 4 || edges.len() != 6 {
            return Err(Error::DegenerateTetrahedron);
        }
        for fk in faces {
            if self.face_tetrahedra(fk).len() >= 2 {
                return Err(Error::FaceSaturated(fk));
            }
        }

        let key = self.tetrahedra.insert(TetData {
            faces,
            attributes: TetAttributes::new(label),
        });
        for fk in faces {
            self.link_face_tet(fk, key);
        }
        self.refresh_faces(faces);
        Ok(key)
    }

    /// Creates a tetrahedron over four existing nodes, creating or reusing the
    /// six edges and four faces it needs.
    pub fn add_tetrahedron_by_nodes(&mut self, nodes: [NodeKey; 4], label: u32) -> Result<TetKey> {
        for nk in nodes {
            if !self.nodes.contains_key(nk) {
                return Err(Error::NodeNotFound(nk));
            }
        }
        if SimplexSet::from(nodes).len() != 4 {
            return Err(Error::DegenerateTetrahedron);
        }

        // Face i is opposite node i.
        let mut faces = [FaceKey::default(); 4];
        for (i, slot) in faces.iter_mut().enumerate() {
            let [a, b, c] = opposite(nodes, i);
            let ab = self.add_edge(a, b)?;
            let bc = self.add_edge(b, c)?;
            let ca = self.add_edge(c, a)?;
            *slot = self.add_face(ab, bc, ca)?;
        }

        self.add_tetrahedron(faces, label)
    }

    /// Builds a mesh from raw node coordinates and tetrahedra given as indices
    /// into `points`. `labels` may be empty (every label is 0) or one per
    /// tetrahedron.
    pub fn from_tetrahedra(points: &[[f64; 3]], tets: &[[usize; 4]], labels: &[u32]) -> Result<Self> {
        let mut mesh = TetMesh::new();
        let node_keys: Vec<NodeKey> = points
            .iter()
            .map(|p| mesh.add_node(Point3::new(p[0], p[1], p[2])))
            .collect();

        for (i, tet) in tets.iter().enumerate() {
            let mut keys = [NodeKey::default(); 4];
            for (slot, &index) in keys.iter_mut().zip(tet) {
                *slot = *node_keys.get(index).ok_or(Error::InvalidIndex {
                    index,
                    count: node_keys.len(),
                })?;
            }
            let label = labels.get(i).copied().unwrap_or(0);
            mesh.add_tetrahedron_by_nodes(keys, label)?;
        }

        Ok(mesh)
    }

    /// Removes a tetrahedron, then every face, edge and node left without a
    /// co-boundary by the removal.
    pub fn remove_tetrahedron(&mut self, key: TetKey) -> Result<()> {
        let tet = self
            .tetrahedra
            .remove(key)
            .ok_or(Error::TetrahedronNotFound(key))?;

        let mut surviving_faces = Vec::with_capacity(4);
        let mut touched_edges: SimplexSet<EdgeKey> = SimplexSet::new();
        let mut touched_nodes: SimplexSet<NodeKey> = SimplexSet::new();
        for fk in tet.faces {
            if !self.unlink_face_tet(fk, key) {
                surviving_faces.push(fk);
                continue;
            }
            if let Some(face) = self.faces.remove(fk) {
                for ek in face.edges {
                    touched_edges.insert(ek);
                    if self.unlink_edge_face(ek, fk) {
                        if let Some(edge) = self.edges.remove(ek) {
                            for nk in edge.nodes {
                                if self.unlink_node_edge(nk, ek) {
                                    self.nodes.remove(nk);
                                } else {
                                    touched_nodes.insert(nk);
                                }
                            }
                        }
                    }
                }
            }
        }

        self.refresh_faces(surviving_faces);
        self.refresh_edges(touched_edges);
        self.refresh_nodes(touched_nodes);
        Ok(())
    }

    /// Changes the region label of a tetrahedron and re-derives interface flags.
    pub fn set_label(&mut self, key: TetKey, label: u32) -> Result<()> {
        let tet = self
            .tetrahedra
            .get_mut(key)
            .ok_or(Error::TetrahedronNotFound(key))?;
        tet.attributes.label = label;
        let faces = tet.faces;
        self.refresh_faces(faces);
        Ok(())
    }

    /// Re-derives boundary and interface flags of every face, edge and node.
    ///
    /// A face is boundary iff it has exactly one incident tetrahedron and
    /// interface iff it separates two tetrahedra with different labels. An
    /// edge (node) is boundary/interface iff any incident face (edge) is.
    pub fn refresh_flags(&mut self) {
        let faces: Vec<FaceKey> = self.faces.keys().collect();
        self.refresh_faces(faces);
    }

    fn refresh_faces(&mut self, faces: impl IntoIterator<Item = FaceKey>) {
        let mut edges: SimplexSet<EdgeKey> = SimplexSet::new();
        for fk in faces {
            let tets = self.face_tetrahedra(fk);
            let interface = match tets.as_slice() {
                [a, b] => self.label(*a) != self.label(*b),
                _ => false,
            };
            if let Some(face) = self.faces.get_mut(fk) {
                face.attributes.set_boundary(tets.len() == 1);
                face.attributes.set_interface(interface);
                edges.extend(face.edges);
            }
        }
        self.refresh_edges(edges);
    }

    fn refresh_edges(&mut self, edges: impl IntoIterator<Item = EdgeKey>) {
        let mut nodes: SimplexSet<NodeKey> = SimplexSet::new();
        for ek in edges {
            let (boundary, interface) = any_flags(self.edge_faces(ek).iter().filter_map(|fk| {
                let a = &self.faces.get(fk)?.attributes;
                Some((a.is_boundary(), a.is_interface()))
            }));
            if let Some(edge) = self.edges.get_mut(ek) {
                edge.attributes.set_boundary(boundary);
                edge.attributes.set_interface(interface);
                nodes.extend(edge.nodes);
            }
        }
        self.refresh_nodes(nodes);
    }

    fn refresh_nodes(&mut self, nodes: impl IntoIterator<Item = NodeKey>) {
        for nk in nodes {
            let (boundary, interface) = any_flags(self.node_edges(nk).iter().filter_map(|ek| {
                let a = &self.edges.get(ek)?.attributes;
                Some((a.is_boundary(), a.is_interface()))
            }));
            if let Some(node) = self.nodes.get_mut(nk) {
                node.set_boundary(boundary);
                node.set_interface(interface);
            }
        }
    }

    fn label(&self, key: TetKey) -> Option<u32> {
        self.tetrahedra.get(key).map(|t| t.attributes.label)
    }
}

fn any_flags(flags: impl Iterator<Item = (bool, bool)>) -> (bool, bool) {
    flags.fold((false, false), |(b, i), (fb, fi)| (b || fb, i || fi))
}

/// The three nodes of `nodes` other than `nodes[skip]`, in order.
fn opposite(nodes: [NodeKey; 4], skip: usize) -> [NodeKey; 3] {
    let mut out = [NodeKey::default(); 3];
    let mut j = 0;
    for (i, &nk) in nodes.iter().enumerate() {
        if i != skip {
            out[j] = nk;
            j += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn four_nodes(mesh: &mut TetMesh) -> [NodeKey; 4] {
        [
            mesh.add_node(Point3::new(0.0, 0.0, 0.0)),
            mesh.add_node(Point3::new(1.0, 0.0, 0.0)),
            mesh.add_node(Point3::new(0.0, 1.0, 0.0)),
            mesh.add_node(Point3::new(0.0, 0.0, 1.0)),
        ]
    }

    #[test]
    fn add_edge_rejects_missing_node() {
        let mut mesh = TetMesh::new();
        let a = mesh.add_node(Point3::origin());
        let mut other = TetMesh::new();
        other.add_node(Point3::origin());
        let ghost = other.add_node(Point3::origin());

        assert!(matches!(mesh.add_edge(a, ghost), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn add_edge_rejects_loop() {
        let mut mesh = TetMesh::new();
        let a = mesh.add_node(Point3::origin());
        assert!(matches!(mesh.add_edge(a, a), Err(Error::DegenerateEdge(k)) if k == a));
    }

    #[test]
    fn edges_are_deduplicated_in_either_direction() {
        let mut mesh = TetMesh::new();
        let [a, b, ..] = four_nodes(&mut mesh);
        let ab = mesh.add_edge(a, b).unwrap();
        let ba = mesh.add_edge(b, a).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn add_face_requires_closed_triangle() {
        let mut mesh = TetMesh::new();
        let [a, b, c, d] = four_nodes(&mut mesh);
        let ab = mesh.add_edge(a, b).unwrap();
        let bc = mesh.add_edge(b, c).unwrap();
        let cd = mesh.add_edge(c, d).unwrap();
        let ca = mesh.add_edge(c, a).unwrap();

        assert!(matches!(mesh.add_face(ab, bc, cd), Err(Error::DegenerateFace)));
        assert!(matches!(mesh.add_face(ab, ab, bc), Err(Error::DegenerateFace)));

        let face = mesh.add_face(ab, bc, ca).unwrap();
        assert_eq!(mesh.add_face(ca, ab, bc).unwrap(), face);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn single_tetrahedron_has_four_boundary_faces() {
        let (mesh, tet, nodes) = fixtures::single_tet();

        assert_eq!(mesh.tetrahedron(tet).unwrap().faces.len(), 4);
        assert_eq!(mesh.face_count(), 4);
        assert!(mesh.faces().all(|(_, f)| f.attributes.is_boundary()));
        assert!(mesh.faces().all(|(_, f)| !f.attributes.is_interface()));
        assert!(mesh.edges().all(|(_, e)| e.attributes.is_boundary()));
        for nk in nodes {
            assert!(mesh.node(nk).unwrap().is_boundary());
        }
    }

    #[test]
    fn add_tetrahedron_rejects_open_face_set() {
        let mut mesh = TetMesh::new();
        let [a, b, c, d] = four_nodes(&mut mesh);
        let e = mesh.add_node(Point3::new(1.0, 1.0, 1.0));
        mesh.add_tetrahedron_by_nodes([a, b, c, d], 0).unwrap();

        let be = mesh.add_edge(b, e).unwrap();
        let ce = mesh.add_edge(c, e).unwrap();
        let bc = mesh.find_edge(b, c).unwrap();
        let bce = mesh.add_face(bc, ce, be).unwrap();

        let abc = mesh.find_face_by_nodes(a, b, c).unwrap();
        let abd = mesh.find_face_by_nodes(a, b, d).unwrap();
        let acd = mesh.find_face_by_nodes(a, c, d).unwrap();

        assert!(matches!(
            mesh.add_tetrahedron([abc, abd, acd, bce], 0),
            Err(Error::DegenerateTetrahedron)
        ));
        assert!(matches!(
            mesh.add_tetrahedron([abc, abd, abd, acd], 0),
            Err(Error::DegenerateTetrahedron)
        ));
    }

    #[test]
    fn face_accepts_at_most_two_tetrahedra() {
        let mut mesh = TetMesh::new();
        let [a, b, c, d] = four_nodes(&mut mesh);
        let e = mesh.add_node(Point3::new(0.0, 0.0, -1.0));
        let f = mesh.add_node(Point3::new(0.3, 0.3, -2.0));
        mesh.add_tetrahedron_by_nodes([a, b, c, d], 0).unwrap();
        mesh.add_tetrahedron_by_nodes([a, b, c, e], 0).unwrap();

        let result = mesh.add_tetrahedron_by_nodes([a, b, c, f], 0);
        assert!(matches!(result, Err(Error::FaceSaturated(_))));
    }

    #[test]
    fn shared_face_is_interior_and_interface_follows_labels() {
        let mut mesh = TetMesh::new();
        let [a, b, c, d] = four_nodes(&mut mesh);
        let e = mesh.add_node(Point3::new(0.0, 0.0, -1.0));
        mesh.add_tetrahedron_by_nodes([a, b, c, d], 1).unwrap();
        let lower = mesh.add_tetrahedron_by_nodes([a, b, c, e], 1).unwrap();

        let shared = mesh.find_face_by_nodes(a, b, c).unwrap();
        assert!(!mesh.face(shared).unwrap().attributes.is_boundary());
        assert!(!mesh.face(shared).unwrap().attributes.is_interface());
        assert_eq!(mesh.faces().filter(|(_, f)| f.attributes.is_boundary()).count(), 6);

        mesh.set_label(lower, 2).unwrap();
        assert!(mesh.face(shared).unwrap().attributes.is_interface());
        assert!(mesh.node(a).unwrap().is_interface());
        assert!(!mesh.node(d).unwrap().is_interface());
    }

    #[test]
    fn remove_tetrahedron_drops_orphans_and_reflags() {
        let mut mesh = TetMesh::new();
        let [a, b, c, d] = four_nodes(&mut mesh);
        let e = mesh.add_node(Point3::new(0.0, 0.0, -1.0));
        let upper = mesh.add_tetrahedron_by_nodes([a, b, c, d], 0).unwrap();
        mesh.add_tetrahedron_by_nodes([a, b, c, e], 0).unwrap();

        mesh.remove_tetrahedron(upper).unwrap();

        assert_eq!(mesh.tetrahedron_count(), 1);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.edge_count(), 6);
        assert_eq!(mesh.node_count(), 4);
        assert!(mesh.node(d).is_none());
        let shared = mesh.find_face_by_nodes(a, b, c).unwrap();
        assert!(mesh.face(shared).unwrap().attributes.is_boundary());

        assert!(matches!(
            mesh.remove_tetrahedron(upper),
            Err(Error::TetrahedronNotFound(_))
        ));
    }

    #[test]
    fn from_tetrahedra_builds_kuhn_cube() {
        let mesh = fixtures::unit_cube(&[]);
        assert_eq!(mesh.node_count(), 8);
        assert_eq!(mesh.tetrahedron_count(), 6);
        // 12 cube-surface triangles plus 6 interior faces.
        assert_eq!(mesh.face_count(), 18);
        assert_eq!(mesh.faces().filter(|(_, f)| f.attributes.is_boundary()).count(), 12);
        // 12 cube edges, 6 face diagonals, 1 main diagonal.
        assert_eq!(mesh.edge_count(), 19);
    }

    #[test]
    fn from_tetrahedra_rejects_bad_index() {
        let result = TetMesh::from_tetrahedra(&[[0.0; 3]; 3], &[[0, 1, 2, 3]], &[]);
        assert!(matches!(result, Err(Error::InvalidIndex { index: 3, count: 3 })));
    }

    #[test]
    fn refresh_flags_restores_derived_state() {
        let (mut mesh, _, _) = fixtures::single_tet();
        let keys: Vec<_> = mesh.faces().map(|(k, _)| k).collect();
        for fk in &keys {
            mesh.face_attributes_mut(*fk).unwrap().set_boundary(false);
        }
        mesh.refresh_flags();
        assert!(keys.iter().all(|&fk| mesh.face(fk).unwrap().attributes.is_boundary()));
    }
}
