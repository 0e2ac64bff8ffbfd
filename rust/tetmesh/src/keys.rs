// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simplex key types for arena-based storage.
//!
//! Each simplex kind gets its own strongly-typed key, created by
//! `slotmap::SlotMap`. Keys carry no ownership: they stay comparable and
//! hashable after the simplex they name has been removed, and lookups with
//! such a key simply return `None`. The null key (`Key::null()`, also the
//! `Default`) is the "no entity" sentinel.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a node (0-simplex, a point in 3D space).
    pub struct NodeKey;

    /// Key for an edge (1-simplex between two nodes).
    pub struct EdgeKey;

    /// Key for a face (2-simplex bounded by three edges).
    pub struct FaceKey;

    /// Key for a tetrahedron (3-simplex bounded by four faces).
    pub struct TetKey;
}

/// A key that can reference any simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimplexKey {
    Node(NodeKey),
    Edge(EdgeKey),
    Face(FaceKey),
    Tetrahedron(TetKey),
}

impl SimplexKey {
    /// Returns the simplex type of this key.
    pub fn simplex_type(&self) -> SimplexType {
        match self {
            SimplexKey::Node(_) => SimplexType::Node,
            SimplexKey::Edge(_) => SimplexType::Edge,
            SimplexKey::Face(_) => SimplexType::Face,
            SimplexKey::Tetrahedron(_) => SimplexType::Tetrahedron,
        }
    }
}

/// Discriminant for simplex kinds, ordered by dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SimplexType {
    Node = 0,
    Edge = 1,
    Face = 2,
    Tetrahedron = 3,
}

impl SimplexType {
    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimplexType::Node => "Node",
            SimplexType::Edge => "Edge",
            SimplexType::Face => "Face",
            SimplexType::Tetrahedron => "Tetrahedron",
        }
    }

    /// Topological dimension of the simplex kind.
    pub fn dimension(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for SimplexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NodeKey> for SimplexKey {
    fn from(k: NodeKey) -> Self {
        SimplexKey::Node(k)
    }
}

impl From<EdgeKey> for SimplexKey {
    fn from(k: EdgeKey) -> Self {
        SimplexKey::Edge(k)
    }
}

impl From<FaceKey> for SimplexKey {
    fn from(k: FaceKey) -> Self {
        SimplexKey::Face(k)
    }
}

impl From<TetKey> for SimplexKey {
    fn from(k: TetKey) -> Self {
        SimplexKey::Tetrahedron(k)
    }
}
