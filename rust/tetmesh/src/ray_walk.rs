// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tetrahedron walking along a ray.
//!
//! A [`QueryResult`] is anchored at the first boundary face a ray meets. Its
//! iterator walks the ray through the mesh one tetrahedron at a time: from the
//! current face it looks for the other face of the current tetrahedron that the
//! ray crosses, steps over it into the tetrahedron on the other side, and
//! repeats until the ray leaves the mesh. Faces rejected by the [`QueryType`]
//! are crossed without being reported.
//!
//! The walk is lazy: each call to `next` does only the work needed to find the
//! following reported face.

use std::iter::FusedIterator;

use nalgebra::Point3;
use tracing::trace;

use crate::arena::TetMesh;
use crate::attributes::FaceAttributes;
use crate::geometry::Ray;
use crate::keys::{FaceKey, TetKey};
use crate::simplex_set::SimplexSet;

/// Which faces a ray walk reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryType {
    /// Every face the ray crosses.
    #[default]
    All,
    /// Only faces flagged as interface. The entry face is never reported.
    Interface,
    /// Only faces flagged as boundary.
    Boundary,
}

impl QueryType {
    /// Returns `true` if a face with these attributes is reported.
    pub fn accepts(&self, face: &FaceAttributes) -> bool {
        match self {
            QueryType::All => true,
            QueryType::Interface => face.is_interface(),
            QueryType::Boundary => face.is_boundary(),
        }
    }
}

/// One face crossing along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub face: FaceKey,
    /// Signed ray parameter of the crossing.
    pub distance: f64,
    /// `origin + direction * distance`.
    pub point: Point3<f64>,
}

/// Traversal state of a ray walk.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkState {
    /// Positioned on `face`, about to enter the tetrahedra in `tets` (at most
    /// one; empty once the ray is about to leave the mesh).
    Active {
        face: FaceKey,
        tets: SimplexSet<TetKey>,
        distance: f64,
    },
    /// The ray left the mesh or no further crossing was found.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
struct Anchor<'m> {
    mesh: &'m TetMesh,
    face: FaceKey,
    distance: f64,
}

/// The ordered face crossings of a ray through a mesh.
///
/// Borrowing the mesh keeps it from being edited while a walk is in flight.
#[derive(Debug, Clone, Copy)]
pub struct QueryResult<'m> {
    ray: Ray,
    query_type: QueryType,
    parallel_epsilon: f64,
    anchor: Option<Anchor<'m>>,
}

impl<'m> QueryResult<'m> {
    pub(crate) fn new(
        mesh: &'m TetMesh,
        first_boundary_intersection: FaceKey,
        distance: f64,
        ray: Ray,
        query_type: QueryType,
        parallel_epsilon: f64,
    ) -> Self {
        Self {
            ray,
            query_type,
            parallel_epsilon,
            anchor: Some(Anchor {
                mesh,
                face: first_boundary_intersection,
                distance,
            }),
        }
    }

    /// A result for a ray that misses the mesh.
    pub(crate) fn empty(ray: Ray, query_type: QueryType, parallel_epsilon: f64) -> Self {
        Self {
            ray,
            query_type,
            parallel_epsilon,
            anchor: None,
        }
    }

    /// Returns `true` if the ray missed every boundary face.
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none()
    }

    /// The ray as it was cast, after origin perturbation.
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// The closest boundary face the ray meets, regardless of query type.
    pub fn first_boundary_hit(&self) -> Option<RayHit> {
        self.anchor.map(|a| RayHit {
            face: a.face,
            distance: a.distance,
            point: self.ray.point_at(a.distance),
        })
    }

    /// Starts a new walk from the anchor face.
    pub fn iter(&self) -> QueryResultIter<'m> {
        match self.anchor {
            Some(anchor) => {
                QueryResultIter::start(anchor, self.ray, self.query_type, self.parallel_epsilon)
            }
            None => QueryResultIter::end(self.ray, self.query_type),
        }
    }
}

impl<'m> IntoIterator for QueryResult<'m> {
    type Item = RayHit;
    type IntoIter = QueryResultIter<'m>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'m> IntoIterator for &QueryResult<'m> {
    type Item = RayHit;
    type IntoIter = QueryResultIter<'m>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, forward-only iterator over the faces a ray crosses, in ray order.
#[derive(Debug, Clone)]
pub struct QueryResultIter<'m> {
    mesh: Option<&'m TetMesh>,
    ray: Ray,
    query_type: QueryType,
    parallel_epsilon: f64,
    state: WalkState,
    /// Tetrahedra the walk may still enter. A line crosses each tetrahedron
    /// at most once.
    steps_left: usize,
    /// The current face was already returned; advance before the next item.
    yielded: bool,
}

impl<'m> QueryResultIter<'m> {
    fn start(anchor: Anchor<'m>, ray: Ray, query_type: QueryType, parallel_epsilon: f64) -> Self {
        let mut iter = Self {
            mesh: Some(anchor.mesh),
            ray,
            query_type,
            parallel_epsilon,
            state: WalkState::Active {
                face: anchor.face,
                tets: anchor.mesh.face_tetrahedra(anchor.face),
                distance: anchor.distance,
            },
            steps_left: anchor.mesh.tetrahedron_count(),
            yielded: false,
        };
        if anchor.distance < 0.0 || query_type == QueryType::Interface {
            iter.advance();
        }
        iter
    }

    fn end(ray: Ray, query_type: QueryType) -> Self {
        Self {
            mesh: None,
            ray,
            query_type,
            parallel_epsilon: 0.0,
            state: WalkState::Exhausted,
            steps_left: 0,
            yielded: false,
        }
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// The face the walk is positioned on, or `None` once exhausted.
    pub fn current_face(&self) -> Option<FaceKey> {
        match &self.state {
            WalkState::Active { face, .. } => Some(*face),
            WalkState::Exhausted => None,
        }
    }

    /// The crossing the walk is positioned on, or `None` once exhausted.
    pub fn current(&self) -> Option<RayHit> {
        match &self.state {
            WalkState::Active { face, distance, .. } => Some(RayHit {
                face: *face,
                distance: *distance,
                point: self.ray.point_at(*distance),
            }),
            WalkState::Exhausted => None,
        }
    }

    /// The 3D point where the ray crosses the current face.
    pub fn collision_point(&self) -> Option<Point3<f64>> {
        self.current().map(|hit| hit.point)
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == WalkState::Exhausted
    }

    /// Moves to the next face accepted by the query type, or to `Exhausted`.
    fn advance(&mut self) {
        let state = std::mem::replace(&mut self.state, WalkState::Exhausted);
        let (Some(mesh), WalkState::Active { mut face, mut tets, .. }) = (self.mesh, state) else {
            return;
        };

        while !tets.is_empty() && self.steps_left > 0 {
            self.steps_left -= 1;
            let candidates = &mesh.tetrahedra_faces(&tets) - face;
            let Some((exit, distance)) = self.exit_face(mesh, &candidates) else {
                trace!(face = ?face, "ray walk found no exit face");
                return;
            };

            tets = &mesh.face_tetrahedra(exit) - &tets;
            face = exit;
            trace!(face = ?face, distance, "ray walk crossed face");

            let accepted = mesh
                .face(face)
                .is_some_and(|f| self.query_type.accepts(&f.attributes));
            if accepted {
                self.state = WalkState::Active { face, tets, distance };
                return;
            }
        }
    }

    /// First face in `candidates` crossed by the ray. Faces of a single
    /// tetrahedron other than the entry face are crossed at most once.
    fn exit_face(&self, mesh: &TetMesh, candidates: &SimplexSet<FaceKey>) -> Option<(FaceKey, f64)> {
        candidates.iter().find_map(|fk| {
            let [a, b, c] = mesh.face_positions(fk)?;
            let t = self
                .ray
                .intersect_triangle_eps(&a, &b, &c, self.parallel_epsilon)?;
            Some((fk, t))
        })
    }
}

impl Iterator for QueryResultIter<'_> {
    type Item = RayHit;

    fn next(&mut self) -> Option<RayHit> {
        if self.yielded {
            self.advance();
        }
        let hit = self.current()?;
        self.yielded = true;
        Some(hit)
    }
}

impl FusedIterator for QueryResultIter<'_> {}

/// Two walks are equal when they are positioned on the same face; every
/// exhausted walk equals every other.
impl PartialEq for QueryResultIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.current_face() == other.current_face()
    }
}
