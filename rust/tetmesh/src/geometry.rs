// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric primitives used by the query engine.
//!
//! Rays, signed ray–triangle intersection, and the [`Geometry`] trait for
//! point-containment tests that select nodes by region.

use nalgebra::{Point3, Vector3};

/// Parallel-ray cutoff for [`Ray::intersect_triangle`].
pub const DEFAULT_PARALLEL_EPSILON: f64 = 1e-12;

/// A ray (or, for signed intersection, a directed line) in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t` along the ray: `origin + direction * t`.
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Returns the same ray with its origin shifted by `offset`.
    pub fn offset(&self, offset: Vector3<f64>) -> Self {
        Self::new(self.origin + offset, self.direction)
    }

    /// Intersects the line through this ray with triangle `(v0, v1, v2)`.
    ///
    /// Returns the signed parameter `t` of the hit, so hits behind the origin
    /// are reported with negative distance. Uses [`DEFAULT_PARALLEL_EPSILON`].
    pub fn intersect_triangle(
        &self,
        v0: &Point3<f64>,
        v1: &Point3<f64>,
        v2: &Point3<f64>,
    ) -> Option<f64> {
        self.intersect_triangle_eps(v0, v1, v2, DEFAULT_PARALLEL_EPSILON)
    }

    /// Möller–Trumbore intersection returning the signed distance parameter.
    ///
    /// Barycentric bounds are inclusive, so a line through a shared edge hits
    /// both adjacent triangles.
    pub fn intersect_triangle_eps(
        &self,
        v0: &Point3<f64>,
        v1: &Point3<f64>,
        v2: &Point3<f64>,
        parallel_epsilon: f64,
    ) -> Option<f64> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);

        if a.abs() < parallel_epsilon {
            return None; // line parallel to triangle plane
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(&h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(f * edge2.dot(&q))
    }
}

/// A region of space that can decide whether it contains a point.
pub trait Geometry {
    fn is_inside(&self, point: &Point3<f64>) -> bool;
}

impl<G: Geometry + ?Sized> Geometry for &G {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        (**self).is_inside(point)
    }
}

/// Open ball: points strictly closer than `radius` to `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Geometry for Sphere {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        (point - self.center).norm_squared() < self.radius * self.radius
    }
}

/// Axis-aligned box given by its center and half extents, faces included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub center: Point3<f64>,
    pub half_extents: Vector3<f64>,
}

impl Cube {
    pub fn new(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Box spanning `min` to `max`.
    pub fn from_corners(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self::new(nalgebra::center(&min, &max), (max - min) / 2.0)
    }
}

impl Geometry for Cube {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        let d = point - self.center;
        d.x.abs() <= self.half_extents.x
            && d.y.abs() <= self.half_extents.y
            && d.z.abs() <= self.half_extents.z
    }
}
