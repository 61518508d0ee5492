//! Uniform voxel grid of signed distances.

use field_types::TriangleMesh;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info};

use crate::bvh::Bvh;
use crate::error::{SdfError, SdfResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Area below which a triangle is dropped from the distance-field build.
const DEGENERATE_AREA: f64 = 1e-12;

/// Each side of the grid extends this fraction of the mesh extent beyond
/// the mesh bounds.
const PADDING_FRACTION: f64 = 0.1;

/// A regular `R×R×R` grid of signed Euclidean distances to a mesh surface.
///
/// Samples are negative inside the surface and positive outside; the sign
/// comes from counting how many triangles a `+X` ray from the voxel crosses
/// (odd means inside). The grid bounds pad the mesh bounds by 10% per side
/// and the cell spacing is `(max − min) / (R − 1)` per axis. Data layout is
/// `z·R² + y·R + x`.
///
/// The build walks every voxel through the BVH, so it is `O(R³ log n)` and
/// blocks the caller; a 64³ grid over a typical scanned mesh takes seconds.
/// Built once per mesh, never mutated, and deterministic: rebuilding from
/// the same mesh reproduces the grid bit for bit.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignedDistanceGrid {
    resolution: usize,
    data: Vec<f64>,
    min_bounds: Point3<f64>,
    max_bounds: Point3<f64>,
    cell_size: Vector3<f64>,
    #[cfg_attr(feature = "serde", serde(skip, default = "empty_bvh"))]
    bvh: Bvh,
}

#[cfg(feature = "serde")]
fn empty_bvh() -> Bvh {
    Bvh::build(Vec::new())
}

impl SignedDistanceGrid {
    /// Build a signed distance grid from a mesh.
    ///
    /// Degenerate (zero-area) triangles are filtered out before the build.
    ///
    /// # Errors
    ///
    /// - [`SdfError::InvalidResolution`] if `resolution < 2`
    /// - [`SdfError::EmptyMesh`] if no usable triangles remain
    ///
    /// # Example
    ///
    /// ```
    /// use field_types::generators::cuboid;
    /// use field_sdf::SignedDistanceGrid;
    /// use nalgebra::{Point3, Vector3};
    ///
    /// let grid = SignedDistanceGrid::build(&cuboid(Vector3::new(0.5, 0.5, 0.5)), 16).unwrap();
    /// assert!(grid.sample(&Point3::origin()) < 0.0);
    /// ```
    pub fn build(mesh: &TriangleMesh, resolution: usize) -> SdfResult<Self> {
        if resolution < 2 {
            return Err(SdfError::InvalidResolution(resolution));
        }

        let total = mesh.face_count();
        let triangles: Vec<_> = mesh
            .triangles()
            .filter(|t| !t.is_degenerate(DEGENERATE_AREA))
            .collect();
        if triangles.len() < total {
            debug!(
                dropped = total - triangles.len(),
                "filtered degenerate triangles before distance-field build"
            );
        }
        if triangles.is_empty() {
            return Err(SdfError::EmptyMesh);
        }

        let bounds = mesh.bounds();
        let padding = bounds.size() * PADDING_FRACTION;
        let min_bounds = bounds.min - padding;
        let max_bounds = bounds.max + padding;
        #[allow(clippy::cast_precision_loss)]
        let cell_size = (max_bounds - min_bounds) / (resolution - 1) as f64;

        info!(
            resolution,
            triangles = triangles.len(),
            "generating signed distance grid"
        );

        let bvh = Bvh::build(triangles);
        let ray_dir = Vector3::x();
        let mut data = vec![0.0; resolution * resolution * resolution];

        for z in 0..resolution {
            for y in 0..resolution {
                for x in 0..resolution {
                    #[allow(clippy::cast_precision_loss)]
                    let world = Point3::new(
                        min_bounds.x + x as f64 * cell_size.x,
                        min_bounds.y + y as f64 * cell_size.y,
                        min_bounds.z + z as f64 * cell_size.z,
                    );

                    let mut distance = bvh.closest_distance(&world);
                    let inside = bvh.count_intersections(&world, &ray_dir) % 2 == 1;
                    if inside {
                        distance = -distance;
                    }
                    data[z * resolution * resolution + y * resolution + x] = distance;
                }
            }
            debug!(slice = z + 1, of = resolution, "distance grid progress");
        }

        info!("signed distance grid complete");

        Ok(Self {
            resolution,
            data,
            min_bounds,
            max_bounds,
            cell_size,
            bvh,
        })
    }

    /// Samples per axis.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Minimum corner of the grid in build-space coordinates.
    #[must_use]
    pub const fn min_bounds(&self) -> Point3<f64> {
        self.min_bounds
    }

    /// Maximum corner of the grid in build-space coordinates.
    #[must_use]
    pub const fn max_bounds(&self) -> Point3<f64> {
        self.max_bounds
    }

    /// Spacing between adjacent samples, per axis.
    #[must_use]
    pub const fn cell_size(&self) -> Vector3<f64> {
        self.cell_size
    }

    /// Raw samples in `z·R² + y·R + x` order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Signed distance at a point, trilinearly interpolated.
    ///
    /// The query is clamped componentwise to the grid, so points beyond the
    /// bounds read the nearest boundary sample. Continuous but only C⁰: the
    /// gradient is constant within a cell and jumps across cell faces,
    /// which is fine for a surface already band-limited by the resolution.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss, clippy::similar_names)]
    pub fn sample(&self, position: &Point3<f64>) -> f64 {
        let limit = (self.resolution - 1) as f64;
        let gx = ((position.x - self.min_bounds.x) / self.cell_size.x).clamp(0.0, limit);
        let gy = ((position.y - self.min_bounds.y) / self.cell_size.y).clamp(0.0, limit);
        let gz = ((position.z - self.min_bounds.z) / self.cell_size.z).clamp(0.0, limit);

        let x0 = gx.floor() as usize;
        let y0 = gy.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.resolution - 1);
        let y1 = (y0 + 1).min(self.resolution - 1);
        let z1 = (z0 + 1).min(self.resolution - 1);

        let fx = gx - x0 as f64;
        let fy = gy - y0 as f64;
        let fz = gz - z0 as f64;

        let v000 = self.data[self.index(x0, y0, z0)];
        let v100 = self.data[self.index(x1, y0, z0)];
        let v010 = self.data[self.index(x0, y1, z0)];
        let v110 = self.data[self.index(x1, y1, z0)];
        let v001 = self.data[self.index(x0, y0, z1)];
        let v101 = self.data[self.index(x1, y0, z1)];
        let v011 = self.data[self.index(x0, y1, z1)];
        let v111 = self.data[self.index(x1, y1, z1)];

        let v00 = v000 + fx * (v100 - v000);
        let v10 = v010 + fx * (v110 - v010);
        let v01 = v001 + fx * (v101 - v001);
        let v11 = v011 + fx * (v111 - v011);

        let v0 = v00 + fy * (v10 - v00);
        let v1 = v01 + fy * (v11 - v01);

        v0 + fz * (v1 - v0)
    }

    /// Gradient of the sampled field by central differences.
    ///
    /// The step is a tenth of the X cell size. The result is **not
    /// normalised**; callers that need a direction normalise it themselves
    /// (and near-zero gradients mean the query sat in a flat region, e.g.
    /// beyond the clamped boundary).
    #[must_use]
    pub fn gradient(&self, position: &Point3<f64>) -> Vector3<f64> {
        let eps = self.cell_size.x * 0.1;
        let p = position;

        let dx = self.sample(&Point3::new(p.x + eps, p.y, p.z))
            - self.sample(&Point3::new(p.x - eps, p.y, p.z));
        let dy = self.sample(&Point3::new(p.x, p.y + eps, p.z))
            - self.sample(&Point3::new(p.x, p.y - eps, p.z));
        let dz = self.sample(&Point3::new(p.x, p.y, p.z + eps))
            - self.sample(&Point3::new(p.x, p.y, p.z - eps));

        Vector3::new(dx, dy, dz) / (2.0 * eps)
    }

    /// The hierarchy the grid was built with, for exact follow-up queries.
    #[must_use]
    pub const fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    #[inline]
    const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.resolution * self.resolution + y * self.resolution + x
    }
}
