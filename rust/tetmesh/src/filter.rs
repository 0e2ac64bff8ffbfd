// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manifold repair of tetrahedron selections.
//!
//! [`Query::filter_subset`] shrinks a set of tetrahedra until the surface of
//! the selection has no non-manifold edges, then returns the selection
//! together with its downward closure.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::arena::TetMesh;
use crate::keys::*;
use crate::query::Query;

/// A set of tetrahedra together with every face, edge and node they contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsetSelection {
    pub nodes: BTreeSet<NodeKey>,
    pub edges: BTreeSet<EdgeKey>,
    pub faces: BTreeSet<FaceKey>,
    pub tetrahedra: BTreeSet<TetKey>,
}

impl SubsetSelection {
    /// The downward closure of `tets`. Keys not in the mesh are dropped.
    pub fn closure(mesh: &TetMesh, tets: BTreeSet<TetKey>) -> Self {
        let mut selection = Self::default();
        for tk in tets {
            let Some(faces) = mesh.tetrahedron_faces(tk) else {
                continue;
            };
            selection.tetrahedra.insert(tk);
            for fk in faces {
                if !selection.faces.insert(fk) {
                    continue;
                }
                for ek in mesh.face_edges(fk).into_iter().flatten() {
                    if selection.edges.insert(ek) {
                        selection.nodes.extend(mesh.edge_nodes(ek).into_iter().flatten());
                    }
                }
            }
        }
        selection
    }

    pub fn is_empty(&self) -> bool {
        self.tetrahedra.is_empty()
    }
}

impl Query {
    /// Removes tetrahedra from `tets` until no edge of the selection is
    /// non-manifold, and returns the result with its closure.
    ///
    /// A face of the closure is a surface face of the selection when exactly
    /// one of its tetrahedra is selected. Each surface face contributes its
    /// selected tetrahedron to the count of each of its edges; an edge counted
    /// more than twice is non-manifold, and every tetrahedron counted on it is
    /// dropped. Passes repeat until one drops nothing. The output is a subset
    /// of the input, and filtering the output again changes nothing.
    pub fn filter_subset(&self, mesh: &TetMesh, tets: BTreeSet<TetKey>) -> SubsetSelection {
        let requested = tets.len();
        let mut selection = SubsetSelection::closure(mesh, tets);

        for pass in 1.. {
            let removed = non_manifold_tetrahedra(mesh, &selection);
            if removed.is_empty() {
                break;
            }
            debug!(
                pass,
                removed = removed.len(),
                remaining = selection.tetrahedra.len() - removed.len(),
                "subset filter pass"
            );
            let kept = selection
                .tetrahedra
                .iter()
                .filter(|tk| !removed.contains(*tk))
                .copied()
                .collect();
            selection = SubsetSelection::closure(mesh, kept);
        }

        if requested > 0 && selection.is_empty() {
            warn!(requested, "subset filter removed every tetrahedron");
        }
        selection
    }
}

/// Selected tetrahedra lying on a non-manifold edge of the selection surface.
fn non_manifold_tetrahedra(mesh: &TetMesh, selection: &SubsetSelection) -> FxHashSet<TetKey> {
    let member: FxHashSet<TetKey> = selection.tetrahedra.iter().copied().collect();
    let mut removed = FxHashSet::default();

    for &ek in &selection.edges {
        let surface: Vec<TetKey> = mesh
            .edge_faces(ek)
            .iter()
            .filter_map(|fk| {
                let tets = mesh.face_tetrahedra(fk);
                let mut inside = tets.iter().filter(|tk| member.contains(tk));
                match (inside.next(), inside.next()) {
                    (Some(tk), None) => Some(tk),
                    _ => None,
                }
            })
            .collect();

        if surface.len() > 2 {
            removed.extend(surface);
        }
    }
    removed
}
