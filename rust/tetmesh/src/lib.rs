// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Tetmesh
//!
//! Tetrahedral simplicial complex with a query engine for ray traversal,
//! spatial selection and manifold repair.
//!
//! Nodes, edges, faces and tetrahedra live in slot maps addressed by typed
//! keys, with co-boundary indices kept in sync by the mesh. Every face knows
//! the one or two tetrahedra it bounds, which is what lets a [`Query`] walk a
//! ray from tetrahedron to tetrahedron and report the faces it crosses in
//! order.
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use tetmesh::{Query, QueryType, Ray, TetMesh};
//!
//! let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//! let mesh = TetMesh::from_tetrahedra(&points, &[[0, 1, 2, 3]], &[]).unwrap();
//!
//! let mut query = Query::new();
//! let ray = Ray::new(Point3::new(0.2, 0.2, -1.0), Vector3::z());
//! let hits: Vec<_> = query.raycast(&mesh, ray, QueryType::All).into_iter().collect();
//! assert_eq!(hits.len(), 2);
//! ```

pub mod arena;
pub mod attributes;
pub mod config;
pub mod construction;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod keys;
pub mod query;
pub mod ray_walk;
pub mod serialization;
pub mod simplex_set;
pub mod traversal;

#[cfg(test)]
pub(crate) mod fixtures;

pub use arena::{EdgeData, FaceData, TetData, TetMesh};
pub use attributes::{EdgeAttributes, FaceAttributes, NodeAttributes, TetAttributes};
pub use config::QueryConfig;
pub use error::{Error, Result};
pub use filter::SubsetSelection;
pub use geometry::{Cube, Geometry, Ray, Sphere};
pub use keys::{EdgeKey, FaceKey, NodeKey, SimplexKey, SimplexType, TetKey};
pub use query::Query;
pub use ray_walk::{QueryResult, QueryResultIter, QueryType, RayHit, WalkState};
pub use serialization::{MeshSnapshot, NodeSnapshot, TetSnapshot};
pub use simplex_set::SimplexSet;
