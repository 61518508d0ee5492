//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Besides the usual set operations, this carries the two spatial queries
/// the collision pipeline leans on: distance from a point to the box and the
/// slab-method ray test.
///
/// # Example
///
/// ```
/// use field_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
/// assert!(aabb.contains(&Point3::new(1.0, 1.0, 1.0)));
/// assert!((aabb.distance_to_point(&Point3::new(3.0, 1.0, 1.0)) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create an AABB from two corners, correcting a swapped pair per axis.
    #[must_use]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// Create an empty (inverted) AABB, the identity for [`Aabb::union`]
    /// and the usual seed for [`Aabb::expand_to_include`].
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// AABB of an iterator of points. Empty input gives an empty AABB.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// True if min > max on any axis.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Enclosing AABB of two boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Overlap test; touching boxes count as intersecting.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Point containment; the boundary is inside.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Extent per axis.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the space diagonal.
    #[inline]
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// Index of the longest axis (0 = X, 1 = Y, 2 = Z).
    #[must_use]
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Box grown by a uniform margin on all sides.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: Point3::new(
                self.min.x - margin,
                self.min.y - margin,
                self.min.z - margin,
            ),
            max: Point3::new(
                self.max.x + margin,
                self.max.y + margin,
                self.max.z + margin,
            ),
        }
    }

    /// The eight corner points.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        [
            Point3::new(self.min.x, self.min.y, self.min.z),
            Point3::new(self.max.x, self.min.y, self.min.z),
            Point3::new(self.min.x, self.max.y, self.min.z),
            Point3::new(self.max.x, self.max.y, self.min.z),
            Point3::new(self.min.x, self.min.y, self.max.z),
            Point3::new(self.max.x, self.min.y, self.max.z),
            Point3::new(self.min.x, self.max.y, self.max.z),
            Point3::new(self.max.x, self.max.y, self.max.z),
        ]
    }

    /// Euclidean distance from a point to the box; zero inside.
    ///
    /// Computed as `‖p − clamp(p, min, max)‖`.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: &Point3<f64>) -> f64 {
        let closest = Point3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        );
        (point - closest).norm()
    }

    /// Slab-method ray test: does the ray `origin + t·dir`, `t ≥ 0`, hit
    /// the box?
    ///
    /// `dir` need not be normalised. Zero direction components produce
    /// signed infinities that flow through the min/max reductions and give
    /// the correct answer.
    #[must_use]
    pub fn intersects_ray(&self, origin: &Point3<f64>, dir: &Vector3<f64>) -> bool {
        let inv = Vector3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let t1 = (self.min - origin).component_mul(&inv);
        let t2 = (self.max - origin).component_mul(&inv);

        let t_near = t1.x.min(t2.x).max(t1.y.min(t2.y)).max(t1.z.min(t2.z));
        let t_far = t1.x.max(t2.x).min(t1.y.max(t2.y)).min(t1.z.max(t2.z));

        t_near <= t_far && t_far >= 0.0
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_points_spans_extrema() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 5.0, 3.0),
            Point3::new(-2.0, 8.0, 1.0),
        ];
        let aabb = Aabb::from_points(points.iter());
        assert_relative_eq!(aabb.min.x, -2.0);
        assert_relative_eq!(aabb.max.x, 10.0);
        assert_relative_eq!(aabb.max.y, 8.0);
        assert_relative_eq!(aabb.max.z, 3.0);
    }

    #[test]
    fn empty_is_union_identity() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let u = Aabb::empty().union(&a);
        assert_relative_eq!(u.min.x, a.min.x);
        assert_relative_eq!(u.max.x, a.max.x);
        assert!(Aabb::empty().is_empty());
    }

    #[test]
    fn intersects_includes_touching() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let c = Aabb::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn distance_to_point_zero_inside() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(aabb.distance_to_point(&Point3::new(0.5, 0.0, -0.5)), 0.0);
        assert_relative_eq!(aabb.distance_to_point(&Point3::new(3.0, 0.0, 0.0)), 2.0);
        // Corner distance.
        assert_relative_eq!(
            aabb.distance_to_point(&Point3::new(2.0, 2.0, 2.0)),
            3.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn ray_hits_box_ahead() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let origin = Point3::new(-5.0, 0.0, 0.0);
        assert!(aabb.intersects_ray(&origin, &Vector3::new(1.0, 0.0, 0.0)));
        assert!(!aabb.intersects_ray(&origin, &Vector3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn ray_with_zero_components_uses_slab_infinities() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        // Parallel to X, offset outside on Y: must miss.
        assert!(!aabb.intersects_ray(&Point3::new(-5.0, 2.0, 0.0), &Vector3::new(1.0, 0.0, 0.0)));
        // Parallel to X, inside the Y/Z slabs: must hit.
        assert!(aabb.intersects_ray(&Point3::new(-5.0, 0.5, 0.5), &Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn ray_from_inside_hits() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        assert!(aabb.intersects_ray(&Point3::origin(), &Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn longest_axis_picks_largest_extent() {
        let x = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 1.0, 1.0));
        let y = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 10.0, 1.0));
        let z = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 10.0));
        assert_eq!(x.longest_axis(), 0);
        assert_eq!(y.longest_axis(), 1);
        assert_eq!(z.longest_axis(), 2);
    }

    #[test]
    fn corners_enumerates_all_eight() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        let corners = aabb.corners();
        assert_eq!(corners.len(), 8);
        let recon = Aabb::from_points(corners.iter());
        assert_relative_eq!(recon.min.x, aabb.min.x);
        assert_relative_eq!(recon.max.z, aabb.max.z);
    }
}
