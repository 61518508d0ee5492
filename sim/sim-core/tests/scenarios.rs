//! End-to-end scenario tests driving the full tick.

#![allow(clippy::unwrap_used)]

use field_types::generators::{cuboid, uv_sphere};
use field_types::Aabb;
use nalgebra::{Point3, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_core::{CollisionObject, Simulation};

fn contains_with_radius(bounds: &Aabb, position: &Point3<f64>, radius: f64) -> bool {
    (0..3).all(|axis| {
        position[axis] - radius >= bounds.min[axis] - 1e-6
            && position[axis] + radius <= bounds.max[axis] + 1e-6
    })
}

#[test]
fn particles_around_a_static_sphere_stay_contained() {
    let bounds = Aabb::new(Point3::new(-3.0, -3.0, -3.0), Point3::new(3.0, 3.0, 3.0));
    let mut sim = Simulation::new(bounds);

    let mut sphere = CollisionObject::from_mesh(uv_sphere(1.0, 8, 12), 16).unwrap();
    sphere.set_mass(0.0);
    sim.add_object(sphere);

    let mut rng = ChaCha8Rng::seed_from_u64(21);
    sim.scatter_particles(&mut rng, 60, 2.0, 0.05);

    for _ in 0..500 {
        sim.update(1.0 / 120.0);
        for p in sim.particles() {
            assert!(
                contains_with_radius(sim.bounds(), &p.position, p.radius),
                "particle escaped at {:?}",
                p.position
            );
        }
    }

    // Elastic walls and a static mesh never change particle speeds by more
    // than the restitution against the (dynamic-free) scene allows.
    assert_eq!(sim.particles().len(), 60);
    for p in sim.particles() {
        assert!(p.velocity.norm() <= 2.0 + 1e-6);
    }
}

#[test]
fn dynamic_objects_and_particles_coexist_in_bounds() {
    let bounds = Aabb::new(Point3::new(-4.0, -4.0, -4.0), Point3::new(4.0, 4.0, 4.0));
    let mut sim = Simulation::new(bounds);

    let mut ball = CollisionObject::from_mesh(uv_sphere(1.0, 8, 12), 12).unwrap();
    ball.set_mass(20.0);
    ball.set_position(Point3::new(-2.0, 0.3, 0.1));
    ball.set_velocity(Vector3::new(1.5, 0.4, -0.2));
    sim.add_object(ball);

    let mut block = CollisionObject::from_mesh(cuboid(Vector3::new(0.5, 0.5, 0.5)), 12).unwrap();
    block.set_mass(0.0);
    block.set_position(Point3::new(2.0, 0.0, 0.0));
    sim.add_object(block);

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    sim.scatter_particles(&mut rng, 30, 1.0, 0.04);

    for _ in 0..800 {
        sim.update(1.0 / 120.0);
    }

    // The dynamic object is still inside the walls.
    let world = sim.objects()[0].world_bounds();
    for axis in 0..3 {
        assert!(world.min[axis] >= bounds.min[axis] - 1e-6);
        assert!(world.max[axis] <= bounds.max[axis] + 1e-6);
    }
    // The static block never moved.
    assert_eq!(sim.objects()[1].position(), Point3::new(2.0, 0.0, 0.0));
    // No particle leaked out. A particle squeezed between the moving object
    // and a wall can sit transiently past the boundary until the next
    // tick's wall pass, so allow that displacement scale as slack.
    let slack = 0.25;
    for p in sim.particles() {
        for axis in 0..3 {
            assert!(p.position[axis] >= bounds.min[axis] - slack);
            assert!(p.position[axis] <= bounds.max[axis] + slack);
        }
    }
}
