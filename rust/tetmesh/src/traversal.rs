// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adjacency queries for navigating the complex.
//!
//! Downward traversal (tetrahedron → faces → edges → nodes) reads the simplex
//! records; upward traversal (node → edges → faces → tetrahedra) reads the
//! co-boundary index. Upward queries on a key that is unknown or has no
//! co-boundary return an empty set.

use nalgebra::Point3;

use crate::arena::TetMesh;
use crate::keys::*;
use crate::simplex_set::SimplexSet;

// =============================================================================
// Downward traversal: boundaries
// =============================================================================

impl TetMesh {
    /// Returns the two endpoints of an edge.
    pub fn edge_nodes(&self, key: EdgeKey) -> Option<[NodeKey; 2]> {
        self.edges.get(key).map(|e| e.nodes)
    }

    /// Returns the three nodes of a face.
    pub fn face_nodes(&self, key: FaceKey) -> Option<[NodeKey; 3]> {
        self.faces.get(key).map(|f| f.nodes)
    }

    /// Returns the three edges of a face.
    pub fn face_edges(&self, key: FaceKey) -> Option<[EdgeKey; 3]> {
        self.faces.get(key).map(|f| f.edges)
    }

    /// Returns the four faces of a tetrahedron.
    pub fn tetrahedron_faces(&self, key: TetKey) -> Option<[FaceKey; 4]> {
        self.tetrahedra.get(key).map(|t| t.faces)
    }

    /// Returns the six edges of a tetrahedron.
    pub fn tetrahedron_edges(&self, key: TetKey) -> Option<SimplexSet<EdgeKey>> {
        let tet = self.tetrahedra.get(key)?;
        let mut set = SimplexSet::new();
        for fk in tet.faces {
            set.extend(self.face_edges(fk)?);
        }
        Some(set)
    }

    /// Returns the four nodes of a tetrahedron.
    pub fn tetrahedron_nodes(&self, key: TetKey) -> Option<SimplexSet<NodeKey>> {
        let tet = self.tetrahedra.get(key)?;
        let mut set = SimplexSet::new();
        for fk in tet.faces {
            set.extend(self.face_nodes(fk)?);
        }
        Some(set)
    }

    /// Returns the union of the faces of every tetrahedron in `tets`.
    pub fn tetrahedra_faces(&self, tets: &SimplexSet<TetKey>) -> SimplexSet<FaceKey> {
        tets.iter()
            .filter_map(|tk| self.tetrahedron_faces(tk))
            .flatten()
            .collect()
    }

    /// Returns the positions of `keys`, in the same order.
    pub fn positions<const N: usize>(&self, keys: [NodeKey; N]) -> Option<[Point3<f64>; N]> {
        let mut out = [Point3::origin(); N];
        for (slot, key) in out.iter_mut().zip(keys) {
            *slot = self.position(key)?;
        }
        Some(out)
    }

    /// Returns the corner positions of a face.
    pub fn face_positions(&self, key: FaceKey) -> Option<[Point3<f64>; 3]> {
        self.positions(self.face_nodes(key)?)
    }
}

// =============================================================================
// Upward traversal: co-boundaries
// =============================================================================

impl TetMesh {
    /// Returns the edges incident to a node.
    pub fn node_edges(&self, key: NodeKey) -> SimplexSet<EdgeKey> {
        self.node_to_edges.get(&key).cloned().unwrap_or_default()
    }

    /// Returns the faces incident to an edge.
    pub fn edge_faces(&self, key: EdgeKey) -> SimplexSet<FaceKey> {
        self.edge_to_faces.get(&key).cloned().unwrap_or_default()
    }

    /// Returns the co-boundary of a face: one tetrahedron for a boundary face,
    /// two for an interior face.
    pub fn face_tetrahedra(&self, key: FaceKey) -> SimplexSet<TetKey> {
        self.face_to_tets.get(&key).cloned().unwrap_or_default()
    }

    /// Returns every tetrahedron incident to an edge.
    pub fn edge_tetrahedra(&self, key: EdgeKey) -> SimplexSet<TetKey> {
        let mut set = SimplexSet::new();
        for fk in self.edge_faces(key) {
            set.extend(self.face_tetrahedra(fk));
        }
        set
    }

    /// Returns the tetrahedra sharing a face with `key`.
    pub fn tetrahedron_neighbors(&self, key: TetKey) -> SimplexSet<TetKey> {
        let mut set = SimplexSet::new();
        for fk in self.tetrahedron_faces(key).into_iter().flatten() {
            set.extend(self.face_tetrahedra(fk).without(key));
        }
        set
    }

    /// Finds the edge joining `a` and `b`, in either direction.
    pub fn find_edge(&self, a: NodeKey, b: NodeKey) -> Option<EdgeKey> {
        self.node_to_edges.get(&a)?.iter().find(|&ek| {
            self.edges
                .get(ek)
                .is_some_and(|e| e.nodes.contains(&b))
        })
    }

    /// Finds the face bounded by the three given edges, in any order.
    pub fn find_face(&self, e0: EdgeKey, e1: EdgeKey, e2: EdgeKey) -> Option<FaceKey> {
        self.edge_to_faces.get(&e0)?.iter().find(|&fk| {
            self.faces
                .get(fk)
                .is_some_and(|f| f.edges.contains(&e1) && f.edges.contains(&e2))
        })
    }

    /// Finds the face spanned by three nodes, in any order.
    pub fn find_face_by_nodes(&self, a: NodeKey, b: NodeKey, c: NodeKey) -> Option<FaceKey> {
        let ab = self.find_edge(a, b)?;
        let bc = self.find_edge(b, c)?;
        let ca = self.find_edge(c, a)?;
        self.find_face(ab, bc, ca)
    }
}
