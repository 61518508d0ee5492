//! Triangle primitive with a cached face normal.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions and a cached unit face normal.
///
/// Winding is **counter-clockwise when viewed from the front** (the normal
/// points toward the viewer by the right-hand rule). The normal is computed
/// once at construction; for a degenerate (zero-area) triangle it is the
/// zero vector, and such triangles should be filtered before they reach the
/// distance-field build.
///
/// # Example
///
/// ```
/// use field_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.normal().z - 1.0).abs() < 1e-12);
/// assert!((tri.area() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
    normal: Vector3<f64>,
}

impl Triangle {
    /// Create a triangle from three points, computing the face normal.
    #[must_use]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        Self { v0, v1, v2, normal }
    }

    /// The cached unit face normal (zero for degenerate triangles).
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Vertices as an array, in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [Point3<f64>; 3] {
        [self.v0, self.v1, self.v2]
    }

    /// Centroid (arithmetic mean of the vertices).
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::new(
            (self.v0.x + self.v1.x + self.v2.x) / 3.0,
            (self.v0.y + self.v1.y + self.v2.y) / 3.0,
            (self.v0.z + self.v1.z + self.v2.z) / 3.0,
        )
    }

    /// Area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm() * 0.5
    }

    /// Length of the longest edge.
    ///
    /// The BVH leaf scan uses this for its conservative bounding-sphere
    /// reject.
    #[inline]
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        let a = (self.v1 - self.v0).norm();
        let b = (self.v2 - self.v1).norm();
        let c = (self.v0 - self.v2).norm();
        a.max(b).max(c)
    }

    /// Check whether the triangle has (near-)zero area.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self, epsilon: f64) -> bool {
        self.area() < epsilon
    }

    /// Axis-aligned bounding box of the three vertices.
    #[must_use]
    pub fn aabb(&self) -> crate::Aabb {
        crate::Aabb::from_points([self.v0, self.v1, self.v2].iter())
    }
}
