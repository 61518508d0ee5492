//! Procedural mesh generators.
//!
//! Deterministic, resolution-configurable closed meshes with outward
//! counter-clockwise winding, used by tests, benches, and demo fallbacks.

use crate::TriangleMesh;
use nalgebra::{Point3, Vector3};

/// Generate a UV sphere centred at the origin.
///
/// # Arguments
///
/// * `radius` - Sphere radius.
/// * `stacks` - Number of latitude bands (≥ 2).
/// * `slices` - Number of longitude segments (≥ 3).
///
/// # Panics
///
/// Panics if `stacks < 2` or `slices < 3`.
///
/// # Example
///
/// ```
/// use field_types::generators::uv_sphere;
///
/// let sphere = uv_sphere(1.0, 8, 12);
/// // 2 caps of `slices` triangles plus (stacks - 2) bands of 2·slices.
/// assert_eq!(sphere.face_count(), 12 * 2 + 6 * 12 * 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn uv_sphere(radius: f64, stacks: usize, slices: usize) -> TriangleMesh {
    assert!(stacks >= 2, "uv_sphere requires at least 2 stacks");
    assert!(slices >= 3, "uv_sphere requires at least 3 slices");

    let ring_count = stacks - 1;
    let mut mesh = TriangleMesh::with_capacity(2 + ring_count * slices, 2 * slices * (stacks - 1));

    // North pole, latitude rings, south pole.
    mesh.vertices.push(Point3::new(0.0, radius, 0.0));
    for i in 1..stacks {
        let phi = std::f64::consts::PI * i as f64 / stacks as f64;
        for j in 0..slices {
            let theta = std::f64::consts::TAU * j as f64 / slices as f64;
            mesh.vertices.push(Point3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }
    mesh.vertices.push(Point3::new(0.0, -radius, 0.0));

    let ring = |i: usize, j: usize| (1 + i * slices + j % slices) as u32;
    let north = 0u32;
    let south = (1 + ring_count * slices) as u32;

    // Top cap.
    for j in 0..slices {
        mesh.faces.push([north, ring(0, j + 1), ring(0, j)]);
    }
    // Latitude bands.
    for i in 0..ring_count - 1 {
        for j in 0..slices {
            let u0 = ring(i, j);
            let u1 = ring(i, j + 1);
            let l0 = ring(i + 1, j);
            let l1 = ring(i + 1, j + 1);
            mesh.faces.push([u0, l1, l0]);
            mesh.faces.push([u0, u1, l1]);
        }
    }
    // Bottom cap.
    for j in 0..slices {
        mesh.faces
            .push([south, ring(ring_count - 1, j), ring(ring_count - 1, j + 1)]);
    }

    mesh
}

/// Generate an axis-aligned cuboid centred at the origin.
///
/// # Example
///
/// ```
/// use field_types::generators::cuboid;
/// use nalgebra::Vector3;
///
/// let cube = cuboid(Vector3::new(0.5, 0.5, 0.5));
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// ```
#[must_use]
pub fn cuboid(half_extents: Vector3<f64>) -> TriangleMesh {
    let h = half_extents;
    let vertices = vec![
        Point3::new(-h.x, -h.y, -h.z),
        Point3::new(h.x, -h.y, -h.z),
        Point3::new(-h.x, h.y, -h.z),
        Point3::new(h.x, h.y, -h.z),
        Point3::new(-h.x, -h.y, h.z),
        Point3::new(h.x, -h.y, h.z),
        Point3::new(-h.x, h.y, h.z),
        Point3::new(h.x, h.y, h.z),
    ];
    let faces = vec![
        // -Z
        [0, 2, 3],
        [0, 3, 1],
        // +Z
        [4, 5, 7],
        [4, 7, 6],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [2, 6, 7],
        [2, 7, 3],
        // -X
        [0, 4, 6],
        [0, 6, 2],
        // +X
        [1, 3, 7],
        [1, 7, 5],
    ];
    TriangleMesh::from_parts(vertices, faces)
}
