// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for a tetrahedral simplicial complex.
//!
//! The [`TetMesh`] owns every node, edge, face and tetrahedron in slot maps
//! with stable, generational keys. Downward relations (tetrahedron → faces →
//! edges → nodes) live in the simplex records; upward relations (node → edges,
//! edge → faces, face → tetrahedra) are kept in co-boundary indices so that
//! the query engine can walk the complex in both directions without holding
//! references into storage.
//!
//! Topology is only changed through the construction methods. Callers get
//! mutable access to attribute records, never to the simplex records.

use nalgebra::Point3;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::attributes::*;
use crate::keys::*;
use crate::simplex_set::SimplexSet;

/// An edge: two nodes and the edge's attribute record.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub nodes: [NodeKey; 2],
    pub attributes: EdgeAttributes,
}

/// A face: three edges, the three nodes they span, and the face's attributes.
///
/// `nodes[0]` and `nodes[1]` are the endpoints of `edges[0]`; `nodes[2]` is the
/// node opposite to it.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub edges: [EdgeKey; 3],
    pub nodes: [NodeKey; 3],
    pub attributes: FaceAttributes,
}

/// A tetrahedron: four faces and its region label.
#[derive(Debug, Clone)]
pub struct TetData {
    pub faces: [FaceKey; 4],
    pub attributes: TetAttributes,
}

/// The central store that owns all simplices and their co-boundary indices.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use tetmesh::TetMesh;
///
/// let mut mesh = TetMesh::new();
/// let a = mesh.add_node(Point3::new(0.0, 0.0, 0.0));
/// let b = mesh.add_node(Point3::new(1.0, 0.0, 0.0));
/// let c = mesh.add_node(Point3::new(0.0, 1.0, 0.0));
/// let d = mesh.add_node(Point3::new(0.0, 0.0, 1.0));
/// mesh.add_tetrahedron_by_nodes([a, b, c, d], 0).unwrap();
///
/// assert_eq!(mesh.edge_count(), 6);
/// assert_eq!(mesh.face_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TetMesh {
    // Simplex storage
    pub(crate) nodes: SlotMap<NodeKey, NodeAttributes>,
    pub(crate) edges: SlotMap<EdgeKey, EdgeData>,
    pub(crate) faces: SlotMap<FaceKey, FaceData>,
    pub(crate) tetrahedra: SlotMap<TetKey, TetData>,

    // Co-boundary: simplex → incident simplices one dimension up
    pub(crate) node_to_edges: FxHashMap<NodeKey, SimplexSet<EdgeKey>>,
    pub(crate) edge_to_faces: FxHashMap<EdgeKey, SimplexSet<FaceKey>>,
    pub(crate) face_to_tets: FxHashMap<FaceKey, SimplexSet<TetKey>>,
}

impl TetMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            tetrahedra: SlotMap::with_key(),

            node_to_edges: FxHashMap::default(),
            edge_to_faces: FxHashMap::default(),
            face_to_tets: FxHashMap::default(),
        }
    }

    // --- Node access ---

    /// Returns the attribute record of a node, or `None` if not found.
    pub fn node(&self, key: NodeKey) -> Option<&NodeAttributes> {
        self.nodes.get(key)
    }

    pub fn node_attributes_mut(&mut self, key: NodeKey) -> Option<&mut NodeAttributes> {
        self.nodes.get_mut(key)
    }

    /// Returns the current position of a node.
    pub fn position(&self, key: NodeKey) -> Option<Point3<f64>> {
        self.nodes.get(key).map(NodeAttributes::position)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates all live nodes in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &NodeAttributes)> + '_ {
        self.nodes.iter()
    }

    // --- Edge access ---

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn edge_attributes_mut(&mut self, key: EdgeKey) -> Option<&mut EdgeAttributes> {
        self.edges.get_mut(key).map(|e| &mut e.attributes)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates all live edges in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &EdgeData)> + '_ {
        self.edges.iter()
    }

    // --- Face access ---

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn face_attributes_mut(&mut self, key: FaceKey) -> Option<&mut FaceAttributes> {
        self.faces.get_mut(key).map(|f| &mut f.attributes)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterates all live faces in storage order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &FaceData)> + '_ {
        self.faces.iter()
    }

    // --- Tetrahedron access ---

    pub fn tetrahedron(&self, key: TetKey) -> Option<&TetData> {
        self.tetrahedra.get(key)
    }

    pub fn tetrahedron_attributes_mut(&mut self, key: TetKey) -> Option<&mut TetAttributes> {
        self.tetrahedra.get_mut(key).map(|t| &mut t.attributes)
    }

    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra.len()
    }

    /// Iterates all live tetrahedra in storage order.
    pub fn tetrahedra(&self) -> impl Iterator<Item = (TetKey, &TetData)> + '_ {
        self.tetrahedra.iter()
    }

    // --- Entity existence checks ---

    /// Returns `true` if the given key references a live simplex.
    pub fn contains(&self, key: SimplexKey) -> bool {
        match key {
            SimplexKey::Node(k) => self.nodes.contains_key(k),
            SimplexKey::Edge(k) => self.edges.contains_key(k),
            SimplexKey::Face(k) => self.faces.contains_key(k),
            SimplexKey::Tetrahedron(k) => self.tetrahedra.contains_key(k),
        }
    }

    // --- Co-boundary index helpers ---

    pub(crate) fn link_node_edge(&mut self, node: NodeKey, edge: EdgeKey) {
        self.node_to_edges.entry(node).or_default().insert(edge);
    }

    pub(crate) fn link_edge_face(&mut self, edge: EdgeKey, face: FaceKey) {
        self.edge_to_faces.entry(edge).or_default().insert(face);
    }

    pub(crate) fn link_face_tet(&mut self, face: FaceKey, tet: TetKey) {
        self.face_to_tets.entry(face).or_default().insert(tet);
    }

    /// Unregisters `edge` from `node`. Returns `true` if the node has no edges left.
    pub(crate) fn unlink_node_edge(&mut self, node: NodeKey, edge: EdgeKey) -> bool {
        unlink(&mut self.node_to_edges, node, edge)
    }

    pub(crate) fn unlink_edge_face(&mut self, edge: EdgeKey, face: FaceKey) -> bool {
        unlink(&mut self.edge_to_faces, edge, face)
    }

    pub(crate) fn unlink_face_tet(&mut self, face: FaceKey, tet: TetKey) -> bool {
        unlink(&mut self.face_to_tets, face, tet)
    }
}

fn unlink<P, C>(index: &mut FxHashMap<P, SimplexSet<C>>, parent: P, child: C) -> bool
where
    P: std::hash::Hash + Eq,
    C: Copy + Eq,
{
    match index.get_mut(&parent) {
        Some(set) => {
            set.remove(&child);
            if set.is_empty() {
                index.remove(&parent);
                true
            } else {
                false
            }
        }
        None => true,
    }
}

impl Default for TetMesh {
    fn default() -> Self {
        Self::new()
    }
}
