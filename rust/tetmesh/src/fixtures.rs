// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Small meshes shared by the unit tests.

use nalgebra::Point3;

use crate::arena::TetMesh;
use crate::keys::{NodeKey, TetKey};

/// Corners of the unit cube; node `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
pub const CUBE_POINTS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Kuhn subdivision of the cube: six tetrahedra around the 0-7 diagonal.
pub const KUHN_TETS: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 1, 5, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 4, 6, 7],
];

/// The corner tetrahedron `(0,0,0) (1,0,0) (0,1,0) (0,0,1)`.
pub fn single_tet() -> (TetMesh, TetKey, [NodeKey; 4]) {
    let mut mesh = TetMesh::new();
    let nodes = [
        mesh.add_node(Point3::new(0.0, 0.0, 0.0)),
        mesh.add_node(Point3::new(1.0, 0.0, 0.0)),
        mesh.add_node(Point3::new(0.0, 1.0, 0.0)),
        mesh.add_node(Point3::new(0.0, 0.0, 1.0)),
    ];
    let tet = mesh.add_tetrahedron_by_nodes(nodes, 0).unwrap();
    (mesh, tet, nodes)
}

/// The unit cube split into [`KUHN_TETS`], labelled by `labels` (empty for
/// all zero).
pub fn unit_cube(labels: &[u32]) -> TetMesh {
    TetMesh::from_tetrahedra(&CUBE_POINTS, &KUHN_TETS, labels).unwrap()
}

/// Two tetrahedra touching only along the edge `(0,0,0)-(0,0,1)`.
pub fn bow_tie() -> TetMesh {
    let points = [
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, -1.0, 0.0],
    ];
    TetMesh::from_tetrahedra(&points, &[[0, 1, 2, 3], [0, 1, 4, 5]], &[]).unwrap()
}
