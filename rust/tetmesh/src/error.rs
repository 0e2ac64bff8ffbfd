// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh construction and (de)serialization.
//!
//! Queries never fail: absent results are empty sets or empty ray walks.

use crate::keys::{EdgeKey, FaceKey, NodeKey, TetKey};

/// Result type alias for mesh operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or loading a mesh.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Node key not found in the mesh.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// Edge key not found in the mesh.
    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    /// Face key not found in the mesh.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// Tetrahedron key not found in the mesh.
    #[error("tetrahedron not found: {0:?}")]
    TetrahedronNotFound(TetKey),

    /// An edge must connect two distinct nodes.
    #[error("edge endpoints are the same node: {0:?}")]
    DegenerateEdge(NodeKey),

    /// Three edges do not close a triangle over three distinct nodes.
    #[error("edges do not form a triangle")]
    DegenerateFace,

    /// Four faces do not close a tetrahedron over four distinct nodes.
    #[error("faces do not form a tetrahedron")]
    DegenerateTetrahedron,

    /// A face already separates two tetrahedra.
    #[error("face {0:?} already has two incident tetrahedra")]
    FaceSaturated(FaceKey),

    /// A snapshot or index list refers to a node that does not exist.
    #[error("node index {index} out of range ({count} nodes)")]
    InvalidIndex { index: usize, count: usize },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
