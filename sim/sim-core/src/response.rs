//! Impulse-based collision response.
//!
//! Particles and collision objects both expose the same minimal [`Body`]
//! capability, so one solver serves the particle-vs-object and
//! object-vs-object paths alike.

use nalgebra::Vector3;

use crate::object::CollisionObject;
use crate::particle::Particle;

/// The slice of state the impulse solver needs from a collision partner.
pub trait Body {
    /// Current linear velocity.
    fn velocity(&self) -> Vector3<f64>;
    /// Replace the linear velocity.
    fn set_velocity(&mut self, velocity: Vector3<f64>);
    /// `1/mass`, zero for static bodies.
    fn inverse_mass(&self) -> f64;
}

impl Body for Particle {
    fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    fn inverse_mass(&self) -> f64 {
        self.inverse_mass()
    }
}

impl Body for CollisionObject {
    fn velocity(&self) -> Vector3<f64> {
        self.velocity()
    }

    fn set_velocity(&mut self, velocity: Vector3<f64>) {
        self.set_velocity(velocity);
    }

    fn inverse_mass(&self) -> f64 {
        self.inverse_mass()
    }
}

/// Mirror a velocity about a unit normal: `v' = v − 2(v·n)n`.
#[inline]
#[must_use]
pub fn reflect(velocity: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve a collision between two bodies with an impulse along `normal`.
///
/// `normal` is the unit contact normal oriented **toward `a`**; for a
/// particle against a mesh this is simply the object's outward surface
/// normal. `restitution` is the usual coefficient (1 elastic, 0 plastic).
/// With `vN = (vA − vB) · n`, bodies with `vN > 0` are already separating
/// and are left untouched, as is a static-static pair. Returns whether an
/// impulse was applied.
///
/// The scalar impulse is `j = −(1+e)·vN / (wA + wB)`; with one body static
/// (`w = 0`) the formula collapses to reflecting the dynamic partner.
/// Linear momentum is conserved exactly for any restitution. The applied
/// impulse is invariant under flipping `n`; only the separating check
/// depends on its orientation.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use sim_core::{resolve_impulse, Particle};
///
/// let mut a = Particle::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0), 0.1, 1.0);
/// let mut b = Particle::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0), 0.1, 1.0);
///
/// // Equal masses, e = 1, head on: velocities swap. `b` sits in the +X
/// // direction, so the contact normal toward `a` is -X.
/// let toward_a = Vector3::new(-1.0, 0.0, 0.0);
/// assert!(resolve_impulse(&mut a, &mut b, &toward_a, 1.0));
/// assert!((a.velocity.x + 1.0).abs() < 1e-12);
/// assert!((b.velocity.x - 1.0).abs() < 1e-12);
/// ```
pub fn resolve_impulse(
    a: &mut dyn Body,
    b: &mut dyn Body,
    normal: &Vector3<f64>,
    restitution: f64,
) -> bool {
    let relative = a.velocity() - b.velocity();
    let normal_speed = relative.dot(normal);

    // Separating already.
    if normal_speed > 0.0 {
        return false;
    }

    let inv_mass_sum = a.inverse_mass() + b.inverse_mass();
    if inv_mass_sum <= 0.0 {
        return false;
    }

    let j = -(1.0 + restitution) * normal_speed / inv_mass_sum;
    let impulse = normal * j;

    let va = a.velocity() + impulse * a.inverse_mass();
    let vb = b.velocity() - impulse * b.inverse_mass();
    a.set_velocity(va);
    b.set_velocity(vb);
    true
}
