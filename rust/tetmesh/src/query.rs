// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The query engine: raycasting, spatial neighbourhoods and closure queries.
//!
//! A [`Query`] is decoupled from the mesh it inspects; every method takes the
//! mesh by reference. The only state it keeps is a cache of boundary-face
//! keys used to anchor raycasts. The cache is built on the first raycast and
//! is never refreshed on its own: after any edit that changes which faces are
//! boundary faces, call [`Query::invalidate`] (or rebuild it), otherwise
//! raycasts keep anchoring on the old boundary.

use std::collections::BTreeSet;

use nalgebra::Point3;
use tracing::debug;

use crate::arena::TetMesh;
use crate::config::QueryConfig;
use crate::geometry::{Geometry, Ray};
use crate::keys::*;
use crate::ray_walk::{QueryResult, QueryType};

/// Raycasts and set queries over a [`TetMesh`].
#[derive(Debug, Clone, Default)]
pub struct Query {
    config: QueryConfig,
    boundary_faces: Option<Vec<FaceKey>>,
}

impl Query {
    /// Creates a query engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            boundary_faces: None,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    // --- Boundary cache ---

    /// Rebuilds the boundary-face cache from scratch, keeping every face whose
    /// boundary flag is set, in mesh iteration order.
    pub fn rebuild_boundary_cache(&mut self, mesh: &TetMesh) {
        self.boundary_faces = Some(collect_boundary_faces(mesh));
    }

    /// Drops the boundary-face cache; the next raycast rebuilds it.
    pub fn invalidate(&mut self) {
        self.boundary_faces = None;
    }

    /// The cached boundary faces, or `None` if the cache is not built.
    pub fn boundary_faces(&self) -> Option<&[FaceKey]> {
        self.boundary_faces.as_deref()
    }

    // --- Raycasting ---

    /// Casts `ray` into the mesh and returns the faces it crosses.
    ///
    /// The ray origin is first shifted by the configured offset. The walk is
    /// anchored at the boundary face with the smallest signed intersection
    /// distance; on exact ties the face enumerated first wins. A ray that
    /// meets no boundary face yields an empty result.
    pub fn raycast<'m>(&mut self, mesh: &'m TetMesh, ray: Ray, query_type: QueryType) -> QueryResult<'m> {
        let ray = ray.offset(self.config.origin_offset());
        let eps = self.config.parallel_epsilon;
        let boundary = self
            .boundary_faces
            .get_or_insert_with(|| collect_boundary_faces(mesh));

        let mut closest: Option<(FaceKey, f64)> = None;
        for &fk in boundary.iter() {
            let Some([a, b, c]) = mesh.face_positions(fk) else {
                continue;
            };
            if let Some(t) = ray.intersect_triangle_eps(&a, &b, &c, eps) {
                if closest.map_or(true, |(_, best)| t < best) {
                    closest = Some((fk, t));
                }
            }
        }

        match closest {
            Some((face, distance)) => {
                debug!(face = ?face, distance, ?query_type, "raycast anchored");
                QueryResult::new(mesh, face, distance, ray, query_type, eps)
            }
            None => {
                debug!(?query_type, "raycast missed the mesh");
                QueryResult::empty(ray, query_type, eps)
            }
        }
    }

    // --- Spatial neighbourhood ---

    /// Every node strictly closer than `radius` to `point`.
    pub fn neighborhood(&self, mesh: &TetMesh, point: &Point3<f64>, radius: f64) -> BTreeSet<NodeKey> {
        if radius <= 0.0 {
            return BTreeSet::new();
        }
        let radius_sq = radius * radius;
        mesh.nodes()
            .filter(|(_, node)| (node.position() - point).norm_squared() < radius_sq)
            .map(|(key, _)| key)
            .collect()
    }

    /// Every node strictly closer than `radius` to the position of `node`,
    /// including `node` itself. `None` if `node` is not in the mesh.
    pub fn neighborhood_of(&self, mesh: &TetMesh, node: NodeKey, radius: f64) -> Option<BTreeSet<NodeKey>> {
        let position = mesh.position(node)?;
        Some(self.neighborhood(mesh, &position, radius))
    }

    /// Every node whose position lies inside `geometry`.
    pub fn nodes<G: Geometry + ?Sized>(&self, mesh: &TetMesh, geometry: &G) -> BTreeSet<NodeKey> {
        mesh.nodes()
            .filter(|(_, node)| geometry.is_inside(&node.position()))
            .map(|(key, _)| key)
            .collect()
    }

    // --- Closure queries ---

    /// Every edge with both endpoints in `nodes`.
    pub fn edges(&self, mesh: &TetMesh, nodes: &BTreeSet<NodeKey>) -> BTreeSet<EdgeKey> {
        mesh.edges()
            .filter(|(_, edge)| edge.nodes.iter().all(|n| nodes.contains(n)))
            .map(|(key, _)| key)
            .collect()
    }

    /// Every face with all three edges in `edges`.
    pub fn faces(&self, mesh: &TetMesh, edges: &BTreeSet<EdgeKey>) -> BTreeSet<FaceKey> {
        mesh.faces()
            .filter(|(_, face)| face.edges.iter().all(|e| edges.contains(e)))
            .map(|(key, _)| key)
            .collect()
    }

    /// Every tetrahedron with all four faces in `faces`.
    pub fn tetrahedra(&self, mesh: &TetMesh, faces: &BTreeSet<FaceKey>) -> BTreeSet<TetKey> {
        mesh.tetrahedra()
            .filter(|(_, tet)| tet.faces.iter().all(|f| faces.contains(f)))
            .map(|(key, _)| key)
            .collect()
    }
}

fn collect_boundary_faces(mesh: &TetMesh) -> Vec<FaceKey> {
    let faces: Vec<FaceKey> = mesh
        .faces()
        .filter(|(_, face)| face.attributes.is_boundary())
        .map(|(key, _)| key)
        .collect();
    debug!(boundary_faces = faces.len(), "rebuilt boundary face cache");
    faces
}
