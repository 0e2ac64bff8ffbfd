// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for tetrahedral meshes.
//!
//! Only nodes and tetrahedra are stored; edges, faces, co-boundary indices
//! and the boundary/interface flags are rebuilt on load. Node keys are mapped
//! to sequential indices so snapshots are stable across processes.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use nalgebra::Point3;

use crate::arena::TetMesh;
use crate::error::{Error, Result};
use crate::keys::NodeKey;

/// Serializable representation of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub tetrahedra: Vec<TetSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Present only when the node has a pending displacement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TetSnapshot {
    /// Indices into [`MeshSnapshot::nodes`].
    pub nodes: [usize; 4],
    #[serde(default)]
    pub label: u32,
}

impl TetMesh {
    /// Serializes the mesh to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a mesh from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MeshSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Creates a serializable snapshot of the mesh.
    pub fn to_snapshot(&self) -> MeshSnapshot {
        let mut node_ids: FxHashMap<NodeKey, usize> = FxHashMap::default();

        let nodes: Vec<NodeSnapshot> = self
            .nodes()
            .enumerate()
            .map(|(i, (k, n))| {
                node_ids.insert(k, i);
                let p = n.position();
                let d = n.destination();
                NodeSnapshot {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    destination: (d != p).then(|| [d.x, d.y, d.z]),
                }
            })
            .collect();

        let tetrahedra: Vec<TetSnapshot> = self
            .tetrahedra()
            .filter_map(|(k, t)| {
                let corners = self.tetrahedron_nodes(k)?;
                let mut ids = [0usize; 4];
                for (slot, nk) in ids.iter_mut().zip(corners.iter()) {
                    *slot = *node_ids.get(&nk)?;
                }
                Some(TetSnapshot {
                    nodes: ids,
                    label: t.attributes.label,
                })
            })
            .collect();

        MeshSnapshot { nodes, tetrahedra }
    }

    /// Reconstructs a mesh from a snapshot.
    pub fn from_snapshot(snap: &MeshSnapshot) -> Result<Self> {
        let mut mesh = TetMesh::new();

        let mut node_keys: Vec<NodeKey> = Vec::with_capacity(snap.nodes.len());
        for ns in &snap.nodes {
            let nk = mesh.add_node(Point3::new(ns.x, ns.y, ns.z));
            if let (Some([x, y, z]), Some(node)) = (ns.destination, mesh.node_attributes_mut(nk)) {
                node.set_destination(Point3::new(x, y, z));
            }
            node_keys.push(nk);
        }

        for ts in &snap.tetrahedra {
            let mut keys = [NodeKey::default(); 4];
            for (slot, &index) in keys.iter_mut().zip(&ts.nodes) {
                *slot = *node_keys.get(index).ok_or(Error::InvalidIndex {
                    index,
                    count: node_keys.len(),
                })?;
            }
            mesh.add_tetrahedron_by_nodes(keys, ts.label)?;
        }

        Ok(mesh)
    }
}
