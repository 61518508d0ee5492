//! Property tests pitting the BVH against brute force over random soups.

#![allow(clippy::unwrap_used)]

use field_sdf::query::{point_triangle_distance, ray_triangle_intersection};
use field_sdf::Bvh;
use field_types::Triangle;
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

const AREA_FLOOR: f64 = 1e-6;

fn coord() -> impl Strategy<Value = f64> {
    -10.0..10.0
}

fn point() -> impl Strategy<Value = Point3<f64>> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

/// Random non-degenerate triangles; near-slivers are filtered because the
/// closest-point routine's contract excludes them.
fn triangle() -> impl Strategy<Value = Triangle> {
    (point(), point(), point())
        .prop_map(|(a, b, c)| Triangle::new(a, b, c))
        .prop_filter("degenerate triangle", |t| !t.is_degenerate(AREA_FLOOR))
}

fn soup() -> impl Strategy<Value = Vec<Triangle>> {
    prop::collection::vec(triangle(), 1..40)
}

fn brute_force_distance(triangles: &[Triangle], p: &Point3<f64>) -> f64 {
    triangles
        .iter()
        .map(|t| point_triangle_distance(p, &t.v0, &t.v1, &t.v2))
        .fold(f64::INFINITY, f64::min)
}

fn brute_force_count(triangles: &[Triangle], origin: &Point3<f64>, dir: &Vector3<f64>) -> usize {
    triangles
        .iter()
        .filter(|t| ray_triangle_intersection(origin, dir, &t.v0, &t.v1, &t.v2).is_some())
        .count()
}

proptest! {
    #[test]
    fn closest_distance_equals_brute_force(triangles in soup(), p in point()) {
        let expected = brute_force_distance(&triangles, &p);
        let bvh = Bvh::build(triangles);
        let got = bvh.closest_distance(&p);
        prop_assert!(
            (got - expected).abs() <= 1e-9 * expected.max(1.0),
            "bvh {got} vs brute force {expected}"
        );
    }

    #[test]
    fn intersection_count_equals_brute_force(triangles in soup(), origin in point()) {
        let dir = Vector3::x();
        let expected = brute_force_count(&triangles, &origin, &dir);
        let bvh = Bvh::build(triangles);
        prop_assert_eq!(bvh.count_intersections(&origin, &dir), expected);
    }

    #[test]
    fn distance_is_nonnegative_and_finite(triangles in soup(), p in point()) {
        let bvh = Bvh::build(triangles);
        let d = bvh.closest_distance(&p);
        prop_assert!(d.is_finite());
        prop_assert!(d >= 0.0);
    }
}
