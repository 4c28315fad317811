use cloth_sim::{ClothConfig, ClothError, CollisionShape, PinningMode, SimMode, Simulation};
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn sim_with(config: ClothConfig) -> Simulation {
    Simulation::new(config).expect("valid config")
}

fn assert_at_rest_layout(sim: &Simulation) {
    for (i, p) in sim.particles().iter().enumerate() {
        assert_eq!(p.position, sim.rest_position(i), "particle {}", i);
        assert_eq!(p.displacement(), Vec3::ZERO, "particle {}", i);
    }
}

#[test]
fn hanging_cloth_falls_under_gravity_only() {
    let mut sim = sim_with(ClothConfig::default().with_grid(3, 3).with_iterations(0));
    assert_eq!(sim.pinning(), PinningMode::TopRow);

    sim.step(DT);

    let drop = 9.81 * DT * DT;
    for (i, p) in sim.particles().iter().enumerate() {
        let rest = sim.rest_position(i);
        if i < 3 {
            assert_eq!(p.position, rest, "top row particle {} moved", i);
        } else {
            let expected = rest - Vec3::Y * drop;
            assert!(
                p.position.abs_diff_eq(expected, 1e-6),
                "particle {}: {:?} vs {:?}",
                i,
                p.position,
                expected
            );
        }
    }
}

#[test]
fn frame_time_is_clamped() {
    let mut sim = sim_with(ClothConfig::default().with_grid(4, 4));
    let max_dt = sim.config().max_dt;

    assert_eq!(sim.step(1.0).dt, max_dt);
    assert_eq!(sim.step(-0.5).dt, 0.0);
    assert!((sim.elapsed() - max_dt).abs() < 1e-7);
    assert_eq!(sim.frame(), 2);
}

#[test]
fn non_finite_dt_leaves_cloth_still() {
    let mut sim = sim_with(ClothConfig::default().with_grid(4, 4));
    let stats = sim.step(f32::NAN);

    assert_eq!(stats.dt, 0.0);
    assert_at_rest_layout(&sim);
}

#[test]
fn pinned_particles_hold_in_every_mode() {
    for mode in SimMode::ALL {
        let mut sim = sim_with(ClothConfig::default().with_grid(6, 8));
        sim.set_mode(mode);
        let cols = sim.config().cols;
        let pinning = sim.pinning();

        for _ in 0..120 {
            sim.step(DT);
        }

        for (i, p) in sim.particles().iter().enumerate() {
            if pinning.pins(i % cols, i / cols, cols) {
                assert!(p.pinned);
                assert_eq!(p.position, sim.rest_position(i), "{:?} particle {}", mode, i);
            }
            assert!(p.position.is_finite(), "{:?} particle {}", mode, i);
        }
    }
}

#[test]
fn pinning_all_freezes_the_cloth() {
    let mut sim = sim_with(ClothConfig::default().with_grid(5, 5));
    sim.set_pinning(PinningMode::All);
    for _ in 0..30 {
        sim.step(DT);
    }
    assert_at_rest_layout(&sim);
}

#[test]
fn weightless_cloth_stays_at_rest() {
    let mut sim = sim_with(ClothConfig::default().with_grid(5, 5).with_gravity(0.0));
    sim.set_pinning(PinningMode::None);
    for _ in 0..30 {
        sim.step(DT);
    }
    assert_at_rest_layout(&sim);
}

#[test]
fn unpinned_cloth_free_falls() {
    let mut sim = sim_with(ClothConfig::default().with_grid(4, 4));
    sim.set_pinning(PinningMode::None);
    for _ in 0..10 {
        sim.step(DT);
    }
    for (i, p) in sim.particles().iter().enumerate() {
        assert!(p.position.y < sim.rest_position(i).y);
    }
}

#[test]
fn mode_change_performs_full_reset() {
    let mut sim = sim_with(ClothConfig::default().with_grid(6, 6));
    sim.tear_around_particle(14);
    for _ in 0..20 {
        sim.step(DT);
    }
    assert!(sim.network().torn_count() > 0);

    sim.advance_mode();

    assert_eq!(sim.mode(), SimMode::Collision);
    assert_eq!(sim.pinning(), PinningMode::TopRow);
    assert_eq!(sim.network().torn_count(), 0);
    assert_eq!(sim.elapsed(), 0.0);
    assert_at_rest_layout(&sim);
}

#[test]
fn modes_cycle_tear_collision_flag() {
    let mut sim = sim_with(ClothConfig::default().with_grid(3, 3));
    let mut seen = vec![sim.mode()];
    for _ in 0..3 {
        sim.advance_mode();
        seen.push(sim.mode());
    }
    assert_eq!(
        seen,
        [SimMode::Tear, SimMode::Collision, SimMode::Flag, SimMode::Tear]
    );
}

#[test]
fn pinning_change_resets_positions_but_keeps_tears() {
    let mut sim = sim_with(ClothConfig::default().with_grid(6, 6));
    let torn = sim.tear_around_particle(14);
    for _ in 0..20 {
        sim.step(DT);
    }

    sim.advance_pinning();

    assert_eq!(sim.pinning(), PinningMode::All);
    assert_eq!(sim.network().torn_count(), torn);
    assert_at_rest_layout(&sim);
}

#[test]
fn reset_restores_default_pinning() {
    let mut sim = sim_with(ClothConfig::default().with_grid(4, 4));
    sim.set_pinning(PinningMode::Corners);
    sim.reset();
    assert_eq!(sim.pinning(), PinningMode::TopRow);

    sim.set_mode(SimMode::Flag);
    sim.reset();
    assert_eq!(sim.pinning(), PinningMode::Flag);
}

#[test]
fn collision_mode_keeps_cloth_outside_object() {
    for shape in [CollisionShape::Cube, CollisionShape::Sphere] {
        let config = ClothConfig::default()
            .with_grid(8, 8)
            .with_collision_shape(shape);
        let mut sim = sim_with(config);
        sim.set_mode(SimMode::Collision);

        for _ in 0..180 {
            sim.step(DT);
            let object = *sim.collision();
            for p in sim.particles().iter().filter(|p| !p.pinned) {
                let depth = object.penetration(p.position).map_or(0.0, |c| c.depth);
                assert!(depth < 1e-4, "{:?}: depth {}", shape, depth);
            }
        }
    }
}

#[test]
fn particle_placed_inside_object_is_pushed_out() {
    let mut sim = sim_with(ClothConfig::default().with_grid(6, 6));
    sim.set_mode(SimMode::Collision);
    // Cut the particle loose so its springs cannot drag it back out first.
    sim.tear_around_particle(20);
    let center = sim.collision().center;
    sim.particles_mut()[20].reset_to(center + Vec3::new(0.01, 0.0, 0.0));

    let stats = sim.step(DT);

    assert!(stats.contacts >= 1);
}

#[test]
fn collisions_are_off_outside_collision_mode() {
    let mut sim = sim_with(ClothConfig::default().with_grid(6, 6));
    let center = sim.collision().center;
    sim.particles_mut()[20].reset_to(center);

    let stats = sim.step(DT);

    assert_eq!(stats.contacts, 0);
}

#[test]
fn collision_shape_toggles_and_resets() {
    let mut sim = sim_with(ClothConfig::default().with_grid(5, 5));
    let center = sim.collision().center;
    sim.tear_around_particle(12);

    sim.advance_collision_shape();

    assert_eq!(sim.collision().shape, CollisionShape::Sphere);
    assert_eq!(sim.collision().center, center);
    assert_eq!(sim.network().torn_count(), 0);

    sim.advance_collision_shape();
    assert_eq!(sim.collision().shape, CollisionShape::Cube);
}

#[test]
fn flag_mode_pins_pole_column() {
    let mut sim = sim_with(ClothConfig::default().with_grid(5, 7));
    sim.set_mode(SimMode::Flag);
    let cols = sim.config().cols;

    let pinned: Vec<usize> = sim
        .particles()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.pinned)
        .map(|(i, _)| i)
        .collect();
    let expected: Vec<usize> = (0..5).map(|y| y * cols).collect();
    assert_eq!(pinned, expected);
}

#[test]
fn identical_inputs_give_identical_runs() {
    let run = || {
        let mut sim = sim_with(ClothConfig::default().with_grid(8, 10));
        sim.set_mode(SimMode::Flag);
        for frame in 0..90 {
            sim.step(DT * (0.5 + (frame % 3) as f32 * 0.25));
        }
        sim.set_mode(SimMode::Tear);
        sim.tear_around_particle(35);
        for _ in 0..30 {
            sim.step(DT);
        }
        sim.positions()
    };

    assert_eq!(run(), run());
}

#[test]
fn rest_normals_face_along_z() {
    let sim = sim_with(ClothConfig::default().with_grid(4, 5));
    let normals = sim.normals();

    assert_eq!(normals.len(), 20);
    for n in normals {
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.z.abs() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn spring_segments_follow_tears() {
    let mut sim = sim_with(ClothConfig::default().with_grid(5, 5));
    let total = sim.network().len();
    assert_eq!(sim.active_spring_segments().len(), total);

    let torn = sim.tear_around_particle(12);
    assert_eq!(sim.active_spring_segments().len(), total - torn);
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(matches!(
        Simulation::new(ClothConfig::default().with_grid(1, 5)),
        Err(ClothError::InvalidGrid { rows: 1, cols: 5 })
    ));
    assert!(matches!(
        Simulation::new(ClothConfig::default().with_spacing(-0.1)),
        Err(ClothError::InvalidParameter { name: "spacing", .. })
    ));
    assert!(matches!(
        Simulation::new(ClothConfig::default().with_tear_radius(f32::NAN)),
        Err(ClothError::InvalidParameter { name: "tear_radius", .. })
    ));
}
