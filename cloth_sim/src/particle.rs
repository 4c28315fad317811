//! Verlet point masses

use glam::Vec3;

/// A point mass integrated with position Verlet.
///
/// Velocity is implicit: it is the difference between `position` and
/// `prev_position` over one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub prev_position: Vec3,
    /// Force accumulator, already divided by mass. Cleared after integration.
    pub acceleration: Vec3,
    pub mass: f32,
    pub pinned: bool,
}

impl Particle {
    /// Create a particle at rest. `mass` must be positive.
    pub fn new(position: Vec3, mass: f32) -> Self {
        debug_assert!(mass > 0.0, "particle mass must be positive");
        Self {
            position,
            prev_position: position,
            acceleration: Vec3::ZERO,
            mass,
            pinned: false,
        }
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.acceleration += force / self.mass;
    }

    /// Advance one step: `x' = x + (x - x_prev) + a·dt²`.
    ///
    /// Pinned particles stay put and drop whatever force was accumulated this
    /// step, so nothing carries over if they are later released.
    pub fn update_verlet(&mut self, dt: f32) {
        if self.pinned {
            self.acceleration = Vec3::ZERO;
            return;
        }
        let next = self.position + (self.position - self.prev_position) + self.acceleration * (dt * dt);
        self.prev_position = self.position;
        self.position = next;
        self.acceleration = Vec3::ZERO;
    }

    /// Pin in place at `pos`, discarding any implicit velocity.
    pub fn pin_to(&mut self, pos: Vec3) {
        self.pinned = true;
        self.position = pos;
        self.prev_position = pos;
    }

    /// Put the particle back at `pos` with no velocity and no pending force.
    pub fn reset_to(&mut self, pos: Vec3) {
        self.position = pos;
        self.prev_position = pos;
        self.acceleration = Vec3::ZERO;
    }

    /// Displacement over the last step.
    pub fn displacement(&self) -> Vec3 {
        self.position - self.prev_position
    }

    /// Velocity estimate over a step of length `dt`.
    pub fn velocity(&self, dt: f32) -> Vec3 {
        self.displacement() / dt
    }
}
