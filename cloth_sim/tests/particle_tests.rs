use cloth_sim::Particle;
use glam::Vec3;
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn vec3_strategy(range: f32) -> impl Strategy<Value = Vec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

#[test]
fn first_step_from_rest_moves_by_a_dt_squared() {
    let mut p = Particle::new(Vec3::new(1.0, 2.0, 3.0), 1.0);
    p.add_force(Vec3::new(0.0, -9.81, 0.0));
    p.update_verlet(DT);

    let expected = Vec3::new(1.0, 2.0 - 9.81 * DT * DT, 3.0);
    assert!(p.position.abs_diff_eq(expected, 1e-6));
    assert_eq!(p.prev_position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn free_particle_coasts_without_force() {
    let mut p = Particle::new(Vec3::ZERO, 1.0);
    p.prev_position = Vec3::new(0.0, 0.0, -0.01);
    for _ in 0..10 {
        p.update_verlet(DT);
    }
    assert!(p.position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.1), 1e-5));
}

#[test]
fn reset_discards_velocity_and_force() {
    let mut p = Particle::new(Vec3::ZERO, 1.0);
    p.prev_position = Vec3::ONE;
    p.add_force(Vec3::X);
    p.reset_to(Vec3::Y);

    assert_eq!(p.position, Vec3::Y);
    assert_eq!(p.displacement(), Vec3::ZERO);
    assert_eq!(p.acceleration, Vec3::ZERO);
}

#[test]
fn released_pin_does_not_replay_held_force() {
    let mut p = Particle::new(Vec3::ZERO, 1.0);
    p.pin_to(Vec3::ZERO);
    p.add_force(Vec3::new(0.0, -100.0, 0.0));
    p.update_verlet(DT);
    assert_eq!(p.acceleration, Vec3::ZERO);

    p.pinned = false;
    p.update_verlet(DT);
    assert_eq!(p.position, Vec3::ZERO);
}

#[test]
fn velocity_is_displacement_over_dt() {
    let mut p = Particle::new(Vec3::new(0.5, 0.0, 0.0), 1.0);
    p.prev_position = Vec3::ZERO;
    assert!(p.velocity(0.5).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
}

proptest! {
    #[test]
    fn pinned_particle_never_moves(
        start in vec3_strategy(10.0),
        force in vec3_strategy(1000.0),
        steps in 1usize..50,
    ) {
        let mut p = Particle::new(start, 1.0);
        p.pin_to(start);
        for _ in 0..steps {
            p.add_force(force);
            p.update_verlet(DT);
        }
        prop_assert_eq!(p.position, start);
        prop_assert_eq!(p.prev_position, start);
    }

    #[test]
    fn heavier_particles_accelerate_less(
        mass in 0.1f32..100.0,
        force in vec3_strategy(100.0),
    ) {
        let mut p = Particle::new(Vec3::ZERO, mass);
        p.add_force(force);
        prop_assert!(p.acceleration.abs_diff_eq(force / mass, 1e-3));
    }
}
