//! The simulation container and its tick.

use field_types::Aabb;
use nalgebra::Vector3;
use rand::Rng;
use tracing::debug;

use crate::object::CollisionObject;
use crate::particle::{Particle, ParticleSystem};
use crate::response::{reflect, resolve_impulse};

/// Restitution for object-vs-object impacts: perfectly elastic.
const MESH_RESTITUTION: f64 = 1.0;

/// Restitution for a particle striking a dynamic object.
const PARTICLE_RESTITUTION: f64 = 0.8;

/// Restitution for a particle striking a static object; with the object's
/// inverse mass at zero this is pure reflection.
const STATIC_RESTITUTION: f64 = 1.0;

/// Object pairs collide when either centre samples the other's field below
/// this fraction of the smaller world-AABB diagonal.
const CONTACT_FRACTION: f64 = 0.01;

/// Floor on the penetration depth used for pair separation; covers pairs
/// whose AABBs overlap while both centre samples read non-penetrating.
const MIN_PENETRATION_DEPTH: f64 = 0.05;

/// Smallest separation applied when resolving an object pair.
const MIN_SEPARATION: f64 = 0.02;

/// Separation overshoot applied on top of the measured penetration.
const SEPARATION_SLACK: f64 = 1.2;

/// Below this centre distance an object pair counts as coincident and the
/// separation direction falls back to +X.
const COINCIDENT_EPSILON: f64 = 1e-3;

/// Extra clearance when pushing a particle back to an object surface.
const SURFACE_OFFSET: f64 = 1e-3;

/// A particle-and-rigid-body simulation inside a fixed containment box.
///
/// One [`Simulation::update`] call runs a tick in a fixed order: integrate
/// objects, bounce them off the walls, resolve object pairs, integrate
/// particles, bounce them off the walls, resolve particles against objects.
/// The ordering is observable (particles see post-integration object
/// positions) and every step is synchronous and single-threaded.
///
/// # Example
///
/// ```
/// use field_types::{generators::uv_sphere, Aabb};
/// use nalgebra::{Point3, Vector3};
/// use sim_core::{CollisionObject, Simulation};
///
/// let bounds = Aabb::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
/// let mut sim = Simulation::new(bounds);
///
/// let mut object = CollisionObject::from_mesh(uv_sphere(1.0, 8, 12), 16).unwrap();
/// object.set_velocity(Vector3::new(1.0, 0.5, 0.0));
/// sim.add_object(object);
///
/// sim.update(1.0 / 120.0);
/// assert!(sim.objects()[0].position().x > 0.0);
/// ```
#[derive(Debug)]
pub struct Simulation {
    bounds: Aabb,
    particles: ParticleSystem,
    objects: Vec<CollisionObject>,
    time: f64,
    step_count: u64,
}

impl Simulation {
    /// Create a simulation with the given containment bounds.
    #[must_use]
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            particles: ParticleSystem::new(),
            objects: Vec::new(),
            time: 0.0,
            step_count: 0,
        }
    }

    /// The containment box.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Simulated time accumulated so far.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Number of ticks run.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// The particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Add one particle.
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Scatter `count` particles uniformly inside the bounds; see
    /// [`ParticleSystem::scatter`]. A seeded `rng` makes the fill, and
    /// with it the whole run, reproducible.
    pub fn scatter_particles<R: Rng>(
        &mut self,
        rng: &mut R,
        count: usize,
        speed: f64,
        radius: f64,
    ) {
        let bounds = self.bounds;
        self.particles.scatter(rng, &bounds, count, speed, radius);
    }

    /// Add a collision object.
    pub fn add_object(&mut self, object: CollisionObject) {
        debug!(
            index = self.objects.len(),
            is_static = object.is_static(),
            "adding collision object"
        );
        self.objects.push(object);
    }

    /// The collision objects.
    #[must_use]
    pub fn objects(&self) -> &[CollisionObject] {
        &self.objects
    }

    /// Mutable access to the collision objects, for scenario setup.
    #[must_use]
    pub fn objects_mut(&mut self) -> &mut [CollisionObject] {
        &mut self.objects
    }

    /// Advance the simulation by one tick.
    pub fn update(&mut self, dt: f64) {
        for object in &mut self.objects {
            object.advance(dt);
        }
        self.bounce_objects_off_walls();
        self.resolve_object_pairs();

        self.particles.advance(dt);
        self.bounce_particles_off_walls();
        self.resolve_particle_collisions();

        self.time += dt;
        self.step_count += 1;
    }

    /// Clamp every dynamic object back inside the bounds, forcing the
    /// velocity component on a violated axis to point inward.
    ///
    /// Forcing `±|v|` rather than reflecting guarantees escape even when an
    /// object jitters against the wall for several ticks.
    fn bounce_objects_off_walls(&mut self) {
        for object in &mut self.objects {
            if object.is_static() {
                continue;
            }
            let world = object.world_bounds();
            let mut position = object.position();
            let mut velocity = object.velocity();
            let mut bounced = false;

            for axis in 0..3 {
                if world.min[axis] <= self.bounds.min[axis] {
                    velocity[axis] = velocity[axis].abs();
                    position[axis] = self.bounds.min[axis] + (position[axis] - world.min[axis]);
                    bounced = true;
                } else if world.max[axis] >= self.bounds.max[axis] {
                    velocity[axis] = -velocity[axis].abs();
                    position[axis] = self.bounds.max[axis] - (world.max[axis] - position[axis]);
                    bounced = true;
                }
            }

            if bounced {
                object.set_velocity(velocity);
                object.set_position(position);
            }
        }
    }

    /// Detect and resolve object-vs-object collisions over all unordered
    /// pairs.
    ///
    /// Broad phase is world-AABB overlap; narrow phase samples each
    /// object's field at the other's centre. The contact threshold scales
    /// with the smaller object so behaviour is independent of scene units.
    fn resolve_object_pairs(&mut self) {
        let count = self.objects.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.objects.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                if a.is_static() && b.is_static() {
                    continue;
                }

                let bounds_a = a.world_bounds();
                let bounds_b = b.world_bounds();
                if !bounds_a.intersects(&bounds_b) {
                    continue;
                }

                let distance_a_in_b = b.signed_distance(&a.position());
                let distance_b_in_a = a.signed_distance(&b.position());
                let threshold = CONTACT_FRACTION * bounds_a.diagonal().min(bounds_b.diagonal());

                if distance_a_in_b < threshold || distance_b_in_a < threshold {
                    debug!(
                        i,
                        j, distance_a_in_b, distance_b_in_a, "resolving object contact"
                    );
                    resolve_object_pair(a, b, distance_a_in_b, distance_b_in_a);
                }
            }
        }
    }

    /// Reflect and clamp particles that crossed a wall this tick.
    fn bounce_particles_off_walls(&mut self) {
        for particle in self.particles.particles_mut() {
            let mut normal = Vector3::zeros();
            let radius = particle.radius;

            for axis in 0..3 {
                if particle.position[axis] - radius <= self.bounds.min[axis] {
                    normal[axis] = 1.0;
                } else if particle.position[axis] + radius >= self.bounds.max[axis] {
                    normal[axis] = -1.0;
                }
            }
            if normal == Vector3::zeros() {
                continue;
            }
            // Corner hits accumulate more than one component.
            if normal.norm() > 1.0 {
                normal.normalize_mut();
            }

            particle.velocity = reflect(&particle.velocity, &normal);

            for axis in 0..3 {
                if particle.position[axis] - radius < self.bounds.min[axis] {
                    particle.position[axis] = self.bounds.min[axis] + radius;
                }
                if particle.position[axis] + radius > self.bounds.max[axis] {
                    particle.position[axis] = self.bounds.max[axis] - radius;
                }
            }
        }
    }

    /// Resolve particle-vs-object collisions.
    ///
    /// First collision wins per particle per tick, which prevents two
    /// overlapping objects from applying double corrections.
    fn resolve_particle_collisions(&mut self) {
        for particle in self.particles.particles_mut() {
            for object in &mut self.objects {
                let distance = object.signed_distance(&particle.position);
                if distance >= particle.radius {
                    continue;
                }
                // A degenerate gradient cannot orient a response; skip this
                // object for the tick.
                let Some(normal) = object.normal_at(&particle.position) else {
                    continue;
                };

                let restitution = if object.is_static() {
                    STATIC_RESTITUTION
                } else {
                    PARTICLE_RESTITUTION
                };
                resolve_impulse(particle, object, &normal, restitution);
                particle.position += normal * (particle.radius - distance + SURFACE_OFFSET);
                break;
            }
        }
    }
}

/// Separate a colliding pair positionally, then exchange an impulse.
fn resolve_object_pair(
    a: &mut CollisionObject,
    b: &mut CollisionObject,
    distance_a_in_b: f64,
    distance_b_in_a: f64,
) {
    let offset = b.position() - a.position();
    let normal_ab = offset
        .try_normalize(COINCIDENT_EPSILON)
        .unwrap_or_else(Vector3::x);

    // Negative centre samples measure real interpenetration; otherwise fall
    // back to the guaranteed minimum.
    let depth = (-distance_a_in_b)
        .max(-distance_b_in_a)
        .max(MIN_PENETRATION_DEPTH);
    let separation = (SEPARATION_SLACK * depth).max(MIN_SEPARATION);

    match (a.is_static(), b.is_static()) {
        (false, false) => {
            let half = normal_ab * (separation * 0.5);
            a.set_position(a.position() - half);
            b.set_position(b.position() + half);
        }
        (false, true) => a.set_position(a.position() - normal_ab * separation),
        (true, false) => b.set_position(b.position() + normal_ab * separation),
        (true, true) => {}
    }

    // The solver wants the contact normal oriented toward its first body.
    resolve_impulse(a, b, &-normal_ab, MESH_RESTITUTION);
}
