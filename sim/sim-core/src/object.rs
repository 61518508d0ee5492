//! Rigid collision object: a mesh, its distance field, and a transform.

use std::path::Path;

use field_sdf::SignedDistanceGrid;
use field_types::{Aabb, TriangleMesh};
use nalgebra::{Matrix3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3};
use tracing::debug;

use crate::error::SimResult;

/// A rigid body whose shape is a triangle mesh with a precomputed signed
/// distance field.
///
/// The SDF is built once in the object's *local* frame; world-space queries
/// transform the point into local space, sample there, and push results
/// back out. The transform is the composite `M = T(position) · R(rotation)
/// · S(scale)` with `M` and `M⁻¹` cached and refreshed by the setters.
///
/// Scale components must be strictly positive. For non-uniform scale the
/// distance returned by [`CollisionObject::signed_distance`] is corrected by
/// `min(scale)`, which under-estimates the true magnitude; conservative
/// for collision detection.
///
/// Mass zero marks the object static (infinite mass); the default mass is
/// the local bounding-box volume at unit density.
#[derive(Debug)]
pub struct CollisionObject {
    mesh: TriangleMesh,
    sdf: SignedDistanceGrid,
    local_bounds: Aabb,

    position: Point3<f64>,
    rotation: UnitQuaternion<f64>,
    scale: Vector3<f64>,
    velocity: Vector3<f64>,
    mass: f64,
    inverse_mass: f64,

    transform: Matrix4<f64>,
    inverse_transform: Matrix4<f64>,
}

impl CollisionObject {
    /// Build an object from a mesh, generating its distance field at the
    /// given grid resolution.
    ///
    /// # Errors
    ///
    /// Fails if the mesh is empty or the resolution is below 2.
    ///
    /// # Example
    ///
    /// ```
    /// use field_types::generators::uv_sphere;
    /// use sim_core::CollisionObject;
    ///
    /// let object = CollisionObject::from_mesh(uv_sphere(1.0, 8, 12), 16).unwrap();
    /// assert!(!object.is_static());
    /// ```
    pub fn from_mesh(mesh: TriangleMesh, resolution: usize) -> SimResult<Self> {
        let sdf = SignedDistanceGrid::build(&mesh, resolution)?;
        let local_bounds = mesh.bounds();

        // Default mass: bounding-box volume at unit density.
        let size = local_bounds.size();
        let mass = size.x * size.y * size.z;

        let mut object = Self {
            mesh,
            sdf,
            local_bounds,
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            velocity: Vector3::zeros(),
            mass: 0.0,
            inverse_mass: 0.0,
            transform: Matrix4::identity(),
            inverse_transform: Matrix4::identity(),
        };
        object.set_mass(mass);
        debug!(
            triangles = object.mesh.face_count(),
            mass, "collision object ready"
        );
        Ok(object)
    }

    /// Load an OBJ file and build an object from it.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be loaded or the distance field cannot be
    /// built.
    pub fn from_obj_file<P: AsRef<Path>>(path: P, resolution: usize) -> SimResult<Self> {
        let mesh = field_io::load_obj(path)?;
        Self::from_mesh(mesh, resolution)
    }

    /// The mesh in local space.
    #[must_use]
    pub const fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// The distance field, in local space.
    #[must_use]
    pub const fn sdf(&self) -> &SignedDistanceGrid {
        &self.sdf
    }

    /// World-space position of the local origin.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Current rotation.
    #[must_use]
    pub const fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// Current per-axis scale.
    #[must_use]
    pub const fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    /// Linear velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    /// Mass; zero means static.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Cached `1/mass`, zero for static objects.
    #[must_use]
    pub const fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    /// True if the object never moves (mass zero).
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Move the local origin to a new world position.
    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
        self.refresh_transform();
    }

    /// Set the rotation.
    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f64>) {
        self.rotation = rotation;
        self.refresh_transform();
    }

    /// Set the per-axis scale. Components must be strictly positive.
    pub fn set_scale(&mut self, scale: Vector3<f64>) {
        debug_assert!(
            scale.x > 0.0 && scale.y > 0.0 && scale.z > 0.0,
            "scale components must be strictly positive"
        );
        self.scale = scale;
        self.refresh_transform();
    }

    /// Set the linear velocity.
    pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    /// Set the mass, refreshing the cached inverse. Zero makes the object
    /// static.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// The cached `T·R·S` matrix.
    #[must_use]
    pub const fn transform_matrix(&self) -> Matrix4<f64> {
        self.transform
    }

    /// The cached inverse transform.
    #[must_use]
    pub const fn inverse_transform_matrix(&self) -> Matrix4<f64> {
        self.inverse_transform
    }

    /// Map a world-space point into the object's local frame.
    #[must_use]
    pub fn world_to_local(&self, world: &Point3<f64>) -> Point3<f64> {
        self.inverse_transform.transform_point(world)
    }

    /// Map a local-space point into world space.
    #[must_use]
    pub fn local_to_world(&self, local: &Point3<f64>) -> Point3<f64> {
        self.transform.transform_point(local)
    }

    /// Signed distance from a world-space point to the object's surface.
    ///
    /// Samples the local-frame SDF and multiplies by `min(scale)`: exact
    /// for uniform scale, a conservative under-estimate otherwise.
    #[must_use]
    pub fn signed_distance(&self, world: &Point3<f64>) -> f64 {
        let local = self.world_to_local(world);
        let min_scale = self.scale.x.min(self.scale.y).min(self.scale.z);
        self.sdf.sample(&local) * min_scale
    }

    /// Outward unit surface normal at a world-space point.
    ///
    /// The local SDF gradient goes through the inverse-transpose of the
    /// transform (the adjugate transform, correct under non-uniform scale)
    /// and is re-normalised. Returns `None` when the gradient is too short
    /// to orient (e.g. in the flat clamped region outside the grid), in
    /// which case the caller skips its collision response this tick.
    #[must_use]
    pub fn normal_at(&self, world: &Point3<f64>) -> Option<Vector3<f64>> {
        let local = self.world_to_local(world);
        let gradient = self.sdf.gradient(&local);

        let normal_matrix: Matrix3<f64> = self
            .inverse_transform
            .transpose()
            .fixed_view::<3, 3>(0, 0)
            .into_owned();
        (normal_matrix * gradient).try_normalize(1e-3)
    }

    /// World-space AABB: the local bounding box pushed through the
    /// transform corner by corner, then re-boxed.
    ///
    /// This is the AABB of the oriented box, so it stays conservative under
    /// rotation without transforming the whole mesh.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for corner in self.local_bounds.corners() {
            bounds.expand_to_include(&self.transform.transform_point(&corner));
        }
        bounds
    }

    /// Integrate position by one timestep; static objects do not move.
    pub fn advance(&mut self, dt: f64) {
        if !self.is_static() && dt > 0.0 {
            self.set_position(self.position + self.velocity * dt);
        }
    }

    fn refresh_transform(&mut self) {
        let translation = Translation3::from(self.position.coords).to_homogeneous();
        let rotation = self.rotation.to_homogeneous();
        let scale = Matrix4::new_nonuniform_scaling(&self.scale);
        self.transform = translation * rotation * scale;
        self.inverse_transform = self
            .transform
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use field_types::generators::{cuboid, uv_sphere};
    use std::f64::consts::FRAC_PI_4;

    fn sphere_object() -> CollisionObject {
        CollisionObject::from_mesh(uv_sphere(1.0, 10, 12), 24).unwrap()
    }

    #[test]
    fn default_mass_is_bounding_volume() {
        let object = CollisionObject::from_mesh(cuboid(Vector3::new(0.5, 1.0, 1.5)), 8).unwrap();
        // Box 1 x 2 x 3.
        assert_relative_eq!(object.mass(), 6.0, epsilon = 1e-9);
        assert!(!object.is_static());
    }

    #[test]
    fn zero_mass_makes_the_object_static() {
        let mut object = sphere_object();
        object.set_mass(0.0);
        assert!(object.is_static());
        assert_relative_eq!(object.inverse_mass(), 0.0);

        object.set_velocity(Vector3::new(5.0, 0.0, 0.0));
        object.advance(1.0);
        assert_relative_eq!(object.position().x, 0.0);
    }

    #[test]
    fn world_local_round_trip() {
        let mut object = sphere_object();
        object.set_position(Point3::new(2.0, -1.0, 3.0));
        object.set_rotation(UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7));
        object.set_scale(Vector3::new(2.0, 0.5, 1.5));

        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-0.3, 0.9, -2.4),
        ] {
            let round_trip = object.world_to_local(&object.local_to_world(&p));
            assert_relative_eq!(round_trip.x, p.x, epsilon = 1e-10);
            assert_relative_eq!(round_trip.y, p.y, epsilon = 1e-10);
            assert_relative_eq!(round_trip.z, p.z, epsilon = 1e-10);
        }
    }

    #[test]
    fn rotated_unit_cube_world_bounds_span_sqrt2() {
        let mut object =
            CollisionObject::from_mesh(cuboid(Vector3::new(0.5, 0.5, 0.5)), 8).unwrap();
        object.set_rotation(UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_4));

        let bounds = object.world_bounds();
        let half_diag = std::f64::consts::SQRT_2 / 2.0;
        assert_relative_eq!(bounds.min.x, -half_diag, epsilon = 1e-10);
        assert_relative_eq!(bounds.max.x, half_diag, epsilon = 1e-10);
        assert_relative_eq!(bounds.min.z, -half_diag, epsilon = 1e-10);
        assert_relative_eq!(bounds.max.z, half_diag, epsilon = 1e-10);
        assert_relative_eq!(bounds.min.y, -0.5, epsilon = 1e-10);
        assert_relative_eq!(bounds.max.y, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn translation_shifts_world_bounds() {
        let mut object = sphere_object();
        object.set_position(Point3::new(10.0, 0.0, 0.0));
        let bounds = object.world_bounds();
        assert_relative_eq!(bounds.min.x, 9.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.x, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn signed_distance_scales_with_uniform_scale() {
        let mut object = sphere_object();
        object.set_scale(Vector3::new(2.0, 2.0, 2.0));

        // World point 2.2 from the centre of a radius-2 scaled sphere:
        // local sample ~0.1, scaled back by 2 -> ~0.2 (tessellation and
        // trilinear error leave a generous band).
        let d = object.signed_distance(&Point3::new(2.2, 0.05, 0.02));
        assert!(d > 0.1 && d < 0.3, "distance {d} outside expected band");

        // Inside stays negative.
        assert!(object.signed_distance(&Point3::new(0.3, 0.1, 0.0)) < 0.0);
    }

    #[test]
    fn signed_distance_follows_translation() {
        let mut object = sphere_object();
        object.set_position(Point3::new(5.0, 0.0, 0.0));
        assert!(object.signed_distance(&Point3::new(5.1, 0.05, 0.02)) < 0.0);
        assert!(object.signed_distance(&Point3::new(6.1, 0.05, 0.02)) > 0.0);
    }

    #[test]
    fn normal_points_away_from_the_surface() {
        let object = sphere_object();
        let n = object.normal_at(&Point3::new(1.05, 0.03, 0.02)).unwrap();
        assert!((n - Vector3::x()).norm() < 0.15, "normal {n} not ~ +X");
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normal_respects_rotation() {
        let mut object = sphere_object();
        // Rotating a sphere about Y should leave radial normals radial.
        object.set_rotation(UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.1));
        let n = object.normal_at(&Point3::new(0.02, 1.05, 0.03)).unwrap();
        assert!((n - Vector3::y()).norm() < 0.15, "normal {n} not ~ +Y");
    }

    #[test]
    fn transform_matrices_stay_in_sync() {
        let mut object = sphere_object();
        object.set_position(Point3::new(1.0, 2.0, 3.0));
        object.set_scale(Vector3::new(2.0, 2.0, 2.0));
        let product = object.transform_matrix() * object.inverse_transform_matrix();
        let identity = Matrix4::identity();
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(product[(i, j)], identity[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn advance_integrates_velocity() {
        let mut object = sphere_object();
        object.set_velocity(Vector3::new(1.0, -2.0, 0.5));
        object.advance(0.5);
        assert_relative_eq!(object.position().x, 0.5);
        assert_relative_eq!(object.position().y, -1.0);
        assert_relative_eq!(object.position().z, 0.25);
    }
}
