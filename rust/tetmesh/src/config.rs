// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query engine configuration.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::DEFAULT_PARALLEL_EPSILON;

/// Numerical settings for the query engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Shift applied to every raycast origin. Rays cast from points lying on
    /// the planes of axis-aligned meshes would otherwise graze edges and
    /// vertices; a small non-axis-aligned shift makes that unlikely.
    pub origin_offset: [f64; 3],
    /// Below this determinant a ray is treated as parallel to a triangle.
    pub parallel_epsilon: f64,
}

impl QueryConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn origin_offset(&self) -> Vector3<f64> {
        Vector3::from(self.origin_offset)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            origin_offset: [0.001, 0.003, 0.007],
            parallel_epsilon: DEFAULT_PARALLEL_EPSILON,
        }
    }
}
