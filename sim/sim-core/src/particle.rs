//! Point particles and the particle system.

use field_types::Aabb;
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// A point particle with a collision radius.
///
/// Mass zero is the static sentinel: the cached inverse mass becomes zero
/// and the impulse solver treats the particle as immovable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Point3<f64>,
    /// Linear velocity.
    pub velocity: Vector3<f64>,
    /// Collision radius, strictly positive.
    pub radius: f64,
    mass: f64,
    inverse_mass: f64,
}

impl Particle {
    /// Create a particle.
    #[must_use]
    pub fn new(position: Point3<f64>, velocity: Vector3<f64>, radius: f64, mass: f64) -> Self {
        let mut particle = Self {
            position,
            velocity,
            radius,
            mass: 0.0,
            inverse_mass: 0.0,
        };
        particle.set_mass(mass);
        particle
    }

    /// Mass in kilograms; zero means static.
    #[inline]
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Cached `1/mass`, zero for static particles.
    #[inline]
    #[must_use]
    pub const fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    /// Set the mass, refreshing the cached inverse.
    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Advect by the current velocity.
    pub fn advance(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Point3::origin(), Vector3::zeros(), 0.05, 1.0)
    }
}

/// A flat collection of particles.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Create an empty system.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    /// Shared view of the particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view of the particles.
    #[must_use]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True if the system holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append a single particle.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Replace the contents with `count` unit-mass particles scattered
    /// uniformly in `bounds`, each with a random direction at `speed`.
    ///
    /// Directions are drawn by rejection-sampling the unit ball shell
    /// (vectors with norm in `[0.1, 1]`, then normalised), so they are
    /// uniform over the sphere without trigonometry. With a seeded `rng`
    /// the result is reproducible.
    pub fn scatter<R: Rng>(
        &mut self,
        rng: &mut R,
        bounds: &Aabb,
        count: usize,
        speed: f64,
        radius: f64,
    ) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let position = Point3::new(
                rng.gen_range(bounds.min.x..=bounds.max.x),
                rng.gen_range(bounds.min.y..=bounds.max.y),
                rng.gen_range(bounds.min.z..=bounds.max.z),
            );
            let velocity = random_direction(rng) * speed;
            self.particles
                .push(Particle::new(position, velocity, radius, 1.0));
        }
    }

    /// Advect every particle.
    pub fn advance(&mut self, dt: f64) {
        for particle in &mut self.particles {
            particle.advance(dt);
        }
    }

    /// Apply one radius to every particle.
    pub fn set_radius(&mut self, radius: f64) {
        for particle in &mut self.particles {
            particle.radius = radius;
        }
    }
}

/// Uniform random unit vector by rejection sampling.
fn random_direction<R: Rng>(rng: &mut R) -> Vector3<f64> {
    loop {
        let candidate = Vector3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let norm = candidate.norm();
        if (0.1..=1.0).contains(&norm) {
            return candidate / norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn mass_zero_is_static_sentinel() {
        let mut p = Particle::default();
        assert_relative_eq!(p.inverse_mass(), 1.0);
        p.set_mass(0.0);
        assert_relative_eq!(p.inverse_mass(), 0.0);
        p.set_mass(4.0);
        assert_relative_eq!(p.inverse_mass(), 0.25);
    }

    #[test]
    fn advance_moves_along_velocity() {
        let mut p = Particle::new(
            Point3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            0.05,
            1.0,
        );
        p.advance(0.5);
        assert_relative_eq!(p.position.y, 1.0);
        assert_relative_eq!(p.position.x, 1.0);
    }

    #[test]
    fn scatter_stays_in_bounds_with_requested_speed() {
        let bounds = Aabb::new(Point3::new(-2.0, -1.0, 0.0), Point3::new(2.0, 1.0, 3.0));
        let mut system = ParticleSystem::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        system.scatter(&mut rng, &bounds, 200, 3.0, 0.02);

        assert_eq!(system.len(), 200);
        for p in system.particles() {
            assert!(bounds.contains(&p.position));
            assert_relative_eq!(p.velocity.norm(), 3.0, epsilon = 1e-12);
            assert_relative_eq!(p.radius, 0.02);
            assert_relative_eq!(p.mass(), 1.0);
        }
    }

    #[test]
    fn scatter_is_deterministic_under_a_seed() {
        let bounds = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let mut a = ParticleSystem::new();
        let mut b = ParticleSystem::new();
        a.scatter(&mut ChaCha8Rng::seed_from_u64(9), &bounds, 50, 1.0, 0.05);
        b.scatter(&mut ChaCha8Rng::seed_from_u64(9), &bounds, 50, 1.0, 0.05);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn set_radius_applies_to_all() {
        let bounds = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let mut system = ParticleSystem::new();
        system.scatter(&mut ChaCha8Rng::seed_from_u64(1), &bounds, 10, 1.0, 0.05);
        system.set_radius(0.2);
        assert!(system.particles().iter().all(|p| (p.radius - 0.2).abs() < 1e-12));
    }
}
