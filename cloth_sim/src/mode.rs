//! Simulation and pinning modes
//!
//! `SimMode` decides which external forces act and whether tearing or
//! collisions are live; `PinningMode` decides which particles are frozen.
//! The two are independent except that flag mode forces flag pinning.

use glam::Vec3;

use crate::config::ClothConfig;
use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimMode {
    #[default]
    Tear,
    Collision,
    Flag,
}

impl SimMode {
    pub const ALL: [SimMode; 3] = [SimMode::Tear, SimMode::Collision, SimMode::Flag];

    pub fn next(self) -> Self {
        match self {
            SimMode::Tear => SimMode::Collision,
            SimMode::Collision => SimMode::Flag,
            SimMode::Flag => SimMode::Tear,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimMode::Tear => "Tear",
            SimMode::Collision => "Collision",
            SimMode::Flag => "Flag",
        }
    }

    pub fn behavior(self) -> ModeBehavior {
        match self {
            SimMode::Tear => ModeBehavior::Hanging,
            SimMode::Collision => ModeBehavior::Draped,
            SimMode::Flag => ModeBehavior::Windblown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PinningMode {
    #[default]
    TopRow,
    All,
    Corners,
    Flag,
    None,
}

impl PinningMode {
    pub fn next(self) -> Self {
        match self {
            PinningMode::TopRow => PinningMode::All,
            PinningMode::All => PinningMode::Corners,
            PinningMode::Corners => PinningMode::Flag,
            PinningMode::Flag => PinningMode::None,
            PinningMode::None => PinningMode::TopRow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PinningMode::TopRow => "Top row",
            PinningMode::All => "All",
            PinningMode::Corners => "Corners",
            PinningMode::Flag => "Flag (left edge)",
            PinningMode::None => "None",
        }
    }

    /// Whether the particle at grid cell (`x`, `y`) is frozen under this mode.
    pub fn pins(self, x: usize, y: usize, cols: usize) -> bool {
        match self {
            PinningMode::TopRow => y == 0,
            PinningMode::All => true,
            PinningMode::Corners => y == 0 && (x == 0 || x == cols - 1),
            PinningMode::Flag => x == 0,
            PinningMode::None => false,
        }
    }

    /// Unpin everything, then pin what this mode selects. Returns the pinned count.
    pub fn apply(self, particles: &mut [Particle], cols: usize) -> usize {
        let mut pinned = 0;
        for (idx, p) in particles.iter_mut().enumerate() {
            p.pinned = self.pins(idx % cols, idx / cols, cols);
            if p.pinned {
                p.prev_position = p.position;
                pinned += 1;
            }
        }
        pinned
    }
}

/// Per-mode force contribution, chosen once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeBehavior {
    /// Gravity along -Y; cloth hangs and can be torn.
    Hanging,
    /// Gravity along -Z so the cloth falls onto the collision object.
    Draped,
    /// Gravity along -Y plus gusting wind, lift and air drag.
    Windblown,
}

impl ModeBehavior {
    pub fn gravity(self, config: &ClothConfig) -> Vec3 {
        match self {
            ModeBehavior::Draped => Vec3::new(0.0, 0.0, -config.gravity),
            ModeBehavior::Hanging | ModeBehavior::Windblown => Vec3::new(0.0, -config.gravity, 0.0),
        }
    }

    pub fn tearing_enabled(self) -> bool {
        self == ModeBehavior::Hanging
    }

    pub fn collisions_enabled(self) -> bool {
        self == ModeBehavior::Draped
    }

    pub fn forced_pinning(self) -> Option<PinningMode> {
        match self {
            ModeBehavior::Windblown => Some(PinningMode::Flag),
            _ => None,
        }
    }

    /// Accumulate this mode's external forces on one particle at time `t`.
    pub fn apply_forces(self, particle: &mut Particle, config: &ClothConfig, t: f32, dt: f32) {
        particle.add_force(self.gravity(config) * particle.mass);

        if self == ModeBehavior::Windblown {
            let wind = &config.wind;
            let direction = wind.direction.normalize_or_zero();
            particle.add_force(direction * wind.gust(t) + wind.lift);

            let velocity = particle.velocity(dt.max(wind.min_velocity_dt));
            particle.add_force(-wind.drag * velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinning_cycles_through_every_mode() {
        let mut mode = PinningMode::TopRow;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, PinningMode::TopRow);
        assert_eq!(
            seen,
            [
                PinningMode::TopRow,
                PinningMode::All,
                PinningMode::Corners,
                PinningMode::Flag,
                PinningMode::None
            ]
        );
    }

    #[test]
    fn sim_mode_cycles() {
        assert_eq!(SimMode::Flag.next(), SimMode::Tear);
        assert_eq!(SimMode::Tear.next().next(), SimMode::Flag);
    }

    #[test]
    fn corners_pins_only_top_corners() {
        let cols = 4;
        let pinned: Vec<usize> = (0..12)
            .filter(|idx| PinningMode::Corners.pins(idx % cols, idx / cols, cols))
            .collect();
        assert_eq!(pinned, vec![0, 3]);
    }

    #[test]
    fn flag_pins_left_column() {
        let mut particles: Vec<Particle> = (0..9).map(|_| Particle::new(Vec3::ZERO, 1.0)).collect();
        let count = PinningMode::Flag.apply(&mut particles, 3);
        assert_eq!(count, 3);
        let pinned: Vec<usize> = particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.pinned)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(pinned, vec![0, 3, 6]);
    }

    #[test]
    fn draped_gravity_points_along_negative_z() {
        let config = ClothConfig::default();
        assert_eq!(ModeBehavior::Draped.gravity(&config), Vec3::new(0.0, 0.0, -9.81));
        assert_eq!(SimMode::Flag.behavior().forced_pinning(), Some(PinningMode::Flag));
    }

    #[test]
    fn wind_pushes_along_positive_x() {
        let config = ClothConfig::default();
        let mut p = Particle::new(Vec3::ZERO, 1.0);
        ModeBehavior::Windblown.apply_forces(&mut p, &config, 0.0, 1.0 / 60.0);
        assert!((p.acceleration.x - config.wind.gust(0.0)).abs() < 1e-5);
        assert!((p.acceleration.y - (0.2 - 9.81)).abs() < 1e-5);
    }

    #[test]
    fn drag_opposes_motion() {
        let config = ClothConfig::default();
        let moving = |dt: f32| {
            let mut p = Particle::new(Vec3::ZERO, 1.0);
            p.prev_position = Vec3::new(0.0, 0.0, 0.01);
            ModeBehavior::Windblown.apply_forces(&mut p, &config, 0.0, dt);
            p.acceleration
        };

        // Moving -Z at 0.6 units/s against drag 0.1.
        let accel = moving(1.0 / 60.0);
        assert!((accel.z - 0.06).abs() < 1e-4, "{:?}", accel);

        // A zero step falls back to the minimum velocity step.
        let accel = moving(0.0);
        assert!((accel.z - 10.0).abs() < 1e-3, "{:?}", accel);
    }

    #[test]
    fn drag_is_windblown_only() {
        let config = ClothConfig::default();
        let mut p = Particle::new(Vec3::ZERO, 1.0);
        p.prev_position = Vec3::new(0.0, 0.0, 0.01);
        ModeBehavior::Hanging.apply_forces(&mut p, &config, 0.0, 1.0 / 60.0);
        assert_eq!(p.acceleration.z, 0.0);
    }
}
