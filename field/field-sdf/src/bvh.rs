//! Bounding volume hierarchy over a triangle soup.
//!
//! Serves the two queries the distance-field build needs: nearest-triangle
//! distance (branch-and-bound) and ray crossing counts (for the parity
//! inside/outside test).

use field_types::{Aabb, Triangle};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::query::{point_triangle_distance, ray_triangle_intersection};

/// Leaves hold at most this many triangles.
const MAX_LEAF_SIZE: usize = 4;

/// Depth cap; a safety valve against adversarial splits.
const MAX_DEPTH: usize = 20;

/// Scale factor turning a triangle's longest edge into a bounding-sphere
/// radius around its centroid. The farthest vertex sits at
/// `|e1 + e2|/3 ≤ (|e1| + |e2|)/3 ≤ 2/3 · max_edge`, so 2/3 is the smallest
/// factor that never rejects the nearest triangle.
const BOUNDING_SPHERE_FACTOR: f64 = 2.0 / 3.0;

#[derive(Debug)]
enum Node {
    Leaf {
        bounds: Aabb,
        triangles: SmallVec<[u32; MAX_LEAF_SIZE]>,
    },
    Internal {
        bounds: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    const fn bounds(&self) -> &Aabb {
        match self {
            Self::Leaf { bounds, .. } | Self::Internal { bounds, .. } => bounds,
        }
    }
}

/// A median-split BVH owning its triangles.
///
/// The tree is immutable after [`Bvh::build`]. Build is top-down: each node
/// takes the AABB of its triangles' vertices, becomes a leaf at
/// `MAX_LEAF_SIZE` triangles or depth `MAX_DEPTH`, and otherwise sorts its
/// set by centroid along the longest AABB axis and splits at the median
/// index, which keeps the depth logarithmic regardless of input order.
///
/// # Example
///
/// ```
/// use field_types::generators::uv_sphere;
/// use field_sdf::Bvh;
/// use nalgebra::{Point3, Vector3};
///
/// let bvh = Bvh::build(uv_sphere(1.0, 8, 12).triangles().collect());
/// let d = bvh.closest_distance(&Point3::new(2.0, 0.0, 0.0));
/// assert!((d - 1.0).abs() < 0.05);
///
/// // A ray from inside crosses the closed surface an odd number of times.
/// let hits = bvh.count_intersections(&Point3::new(0.1, 0.05, 0.02), &Vector3::x());
/// assert_eq!(hits % 2, 1);
/// ```
#[derive(Debug)]
pub struct Bvh {
    triangles: Vec<Triangle>,
    root: Option<Node>,
}

impl Bvh {
    /// Build a BVH over the given triangles.
    ///
    /// An empty input produces an empty tree whose queries return `+∞`
    /// distance and zero crossings.
    #[must_use]
    pub fn build(triangles: Vec<Triangle>) -> Self {
        if triangles.is_empty() {
            return Self {
                triangles,
                root: None,
            };
        }
        #[allow(clippy::cast_possible_truncation)]
        let indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let root = build_recursive(&triangles, indices, 0);
        Self {
            triangles,
            root: Some(root),
        }
    }

    /// The triangles this tree was built over.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// True if the tree holds no triangles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Distance from `point` to the nearest triangle.
    ///
    /// Branch-and-bound: subtrees whose AABB distance already exceeds the
    /// best known distance are pruned, and the nearer child is visited
    /// first so the bound tightens as early as possible.
    #[must_use]
    pub fn closest_distance(&self, point: &Point3<f64>) -> f64 {
        let mut best = f64::INFINITY;
        if let Some(root) = &self.root {
            self.closest_recursive(point, root, &mut best);
        }
        best
    }

    fn closest_recursive(&self, point: &Point3<f64>, node: &Node, best: &mut f64) {
        if node.bounds().distance_to_point(point) >= *best {
            return;
        }
        match node {
            Node::Leaf { triangles, .. } => {
                for &idx in triangles {
                    let tri = &self.triangles[idx as usize];
                    // Bounding-sphere reject before the full seven-region
                    // test.
                    let sphere_radius = tri.max_edge_length() * BOUNDING_SPHERE_FACTOR;
                    if (point - tri.centroid()).norm() - sphere_radius >= *best {
                        continue;
                    }
                    let d = point_triangle_distance(point, &tri.v0, &tri.v1, &tri.v2);
                    if d < *best {
                        *best = d;
                    }
                }
            }
            Node::Internal { left, right, .. } => {
                let left_dist = left.bounds().distance_to_point(point);
                let right_dist = right.bounds().distance_to_point(point);
                let (near, far, far_dist) = if left_dist <= right_dist {
                    (left, right, right_dist)
                } else {
                    (right, left, left_dist)
                };
                self.closest_recursive(point, near, best);
                if far_dist < *best {
                    self.closest_recursive(point, far, best);
                }
            }
        }
    }

    /// Number of triangles the ray `origin + t·dir` crosses with `t > ε`.
    ///
    /// Returns the total hit count, not its parity; the caller decides what
    /// oddness means.
    #[must_use]
    pub fn count_intersections(&self, origin: &Point3<f64>, dir: &Vector3<f64>) -> usize {
        self.root
            .as_ref()
            .map_or(0, |root| self.count_recursive(origin, dir, root))
    }

    fn count_recursive(&self, origin: &Point3<f64>, dir: &Vector3<f64>, node: &Node) -> usize {
        if !node.bounds().intersects_ray(origin, dir) {
            return 0;
        }
        match node {
            Node::Leaf { triangles, .. } => triangles
                .iter()
                .filter(|&&idx| {
                    let tri = &self.triangles[idx as usize];
                    ray_triangle_intersection(origin, dir, &tri.v0, &tri.v1, &tri.v2).is_some()
                })
                .count(),
            Node::Internal { left, right, .. } => {
                self.count_recursive(origin, dir, left) + self.count_recursive(origin, dir, right)
            }
        }
    }
}

fn build_recursive(triangles: &[Triangle], mut indices: Vec<u32>, depth: usize) -> Node {
    let mut bounds = Aabb::empty();
    for &idx in &indices {
        for vertex in triangles[idx as usize].vertices() {
            bounds.expand_to_include(&vertex);
        }
    }

    if indices.len() <= MAX_LEAF_SIZE || depth > MAX_DEPTH {
        return Node::Leaf {
            bounds,
            triangles: indices.into_iter().collect(),
        };
    }

    let axis = bounds.longest_axis();
    indices.sort_by(|&a, &b| {
        let ca = triangles[a as usize].centroid()[axis];
        let cb = triangles[b as usize].centroid()[axis];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mid = indices.len() / 2;
    let right_indices = indices.split_off(mid);
    let left = build_recursive(triangles, indices, depth + 1);
    let right = build_recursive(triangles, right_indices, depth + 1);

    Node::Internal {
        bounds,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use field_types::generators::{cuboid, uv_sphere};

    fn brute_force_distance(triangles: &[Triangle], point: &Point3<f64>) -> f64 {
        triangles
            .iter()
            .map(|t| point_triangle_distance(point, &t.v0, &t.v1, &t.v2))
            .fold(f64::INFINITY, f64::min)
    }

    fn brute_force_count(
        triangles: &[Triangle],
        origin: &Point3<f64>,
        dir: &Vector3<f64>,
    ) -> usize {
        triangles
            .iter()
            .filter(|t| ray_triangle_intersection(origin, dir, &t.v0, &t.v1, &t.v2).is_some())
            .count()
    }

    #[test]
    fn empty_tree_queries_are_defined() {
        let bvh = Bvh::build(Vec::new());
        assert!(bvh.is_empty());
        assert_eq!(bvh.closest_distance(&Point3::origin()), f64::INFINITY);
        assert_eq!(bvh.count_intersections(&Point3::origin(), &Vector3::x()), 0);
    }

    #[test]
    fn every_node_encloses_its_subtree() {
        fn check(node: &Node, triangles: &[Triangle]) {
            let bounds = node.bounds();
            match node {
                Node::Leaf {
                    triangles: idx, ..
                } => {
                    for &i in idx {
                        for v in triangles[i as usize].vertices() {
                            assert!(bounds.padded(1e-9).contains(&v));
                        }
                    }
                }
                Node::Internal { left, right, .. } => {
                    // A parent's box contains both children's boxes.
                    let child = left.bounds().union(right.bounds());
                    assert!(bounds.padded(1e-9).contains(&child.min));
                    assert!(bounds.padded(1e-9).contains(&child.max));
                    check(left, triangles);
                    check(right, triangles);
                }
            }
        }

        let bvh = Bvh::build(uv_sphere(1.0, 8, 12).triangles().collect());
        check(bvh.root.as_ref().unwrap(), bvh.triangles());
    }

    #[test]
    fn closest_distance_matches_brute_force() {
        let bvh = Bvh::build(uv_sphere(1.0, 10, 14).triangles().collect());
        let probes = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.3, -0.2, 0.5),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(-1.5, 1.5, 0.7),
            Point3::new(0.99, 0.0, 0.0),
        ];
        for p in &probes {
            assert_relative_eq!(
                bvh.closest_distance(p),
                brute_force_distance(bvh.triangles(), p),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn intersection_count_matches_brute_force() {
        let bvh = Bvh::build(cuboid(Vector3::new(0.5, 0.5, 0.5)).triangles().collect());
        let rays = [
            (Point3::new(0.0, 0.0, 0.0), Vector3::x()),
            (Point3::new(0.0, 0.1, 0.1), Vector3::x()),
            (Point3::new(-2.0, 0.0, 0.0), Vector3::x()),
            (Point3::new(-2.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
            (Point3::new(0.0, 2.0, 0.0), Vector3::x()),
        ];
        for (origin, dir) in &rays {
            assert_eq!(
                bvh.count_intersections(origin, dir),
                brute_force_count(bvh.triangles(), origin, dir),
                "ray from {origin} along {dir}"
            );
        }
    }

    #[test]
    fn parity_separates_inside_from_outside() {
        // Probes sit off the sphere's symmetry planes: a ray that grazes a
        // shared edge exactly can count both incident triangles.
        let bvh = Bvh::build(uv_sphere(1.0, 8, 12).triangles().collect());
        assert_eq!(
            bvh.count_intersections(&Point3::new(0.1, 0.05, 0.02), &Vector3::x()) % 2,
            1
        );
        assert_eq!(
            bvh.count_intersections(&Point3::new(3.0, 0.07, 0.13), &Vector3::x()) % 2,
            0
        );
    }

    #[test]
    fn distance_to_unit_sphere_from_outside() {
        let bvh = Bvh::build(uv_sphere(1.0, 12, 16).triangles().collect());
        // A finely tessellated sphere should be within a percent of the
        // analytic distance.
        assert_relative_eq!(
            bvh.closest_distance(&Point3::new(3.0, 0.0, 0.0)),
            2.0,
            epsilon = 0.02
        );
    }
}
