//! Damped springs between two particles
//!
//! Springs refer to their endpoints by index into the particle array owned by
//! the simulation, so the array can be moved or grown without invalidating them.

use glam::Vec3;

use crate::particle::Particle;

/// Grid-adjacency class of a spring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpringKind {
    /// Direct horizontal or vertical neighbour; resists stretch.
    Structural,
    /// Diagonal neighbour; resists in-plane shear.
    Shear,
    /// Neighbour two cells away; resists folding.
    Bend,
}

/// Nonlinear limits shared by every spring in a network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringLimits {
    /// Above this stretch ratio the force is multiplied by `ratio³`.
    pub stiffening_threshold: f32,
    /// Hard ceiling on length, as a multiple of rest length.
    pub max_stretch: f32,
}

impl Default for SpringLimits {
    fn default() -> Self {
        Self {
            stiffening_threshold: 1.1,
            max_stretch: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub kind: SpringKind,
    pub stiffness: f32,
    pub damping: f32,
    rest_length: f32,
}

impl Spring {
    /// Connect particles `a` and `b`; the rest length is their current distance.
    pub fn new(
        particles: &[Particle],
        a: usize,
        b: usize,
        kind: SpringKind,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        let rest_length = particles[a].position.distance(particles[b].position);
        Self {
            a,
            b,
            kind,
            stiffness,
            damping,
            rest_length,
        }
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn current_length(&self, particles: &[Particle]) -> f32 {
        particles[self.a].position.distance(particles[self.b].position)
    }

    /// Accumulate the spring and damping force on both endpoints.
    ///
    /// Pinned endpoints still receive force; integration ignores it.
    pub fn apply_forces(&self, particles: &mut [Particle], limits: &SpringLimits) {
        let p1 = &particles[self.a];
        let p2 = &particles[self.b];

        let delta = p2.position - p1.position;
        let current_length = delta.length();
        if current_length == 0.0 {
            return;
        }

        let direction = delta / current_length;
        let displacement = current_length - self.rest_length;
        let stretch_ratio = current_length / self.rest_length;

        let multiplier = if stretch_ratio > limits.stiffening_threshold {
            stretch_ratio.powi(3)
        } else {
            1.0
        };
        let spring_force = direction * (self.stiffness * displacement * multiplier);

        let relative_velocity = p2.displacement() - p1.displacement();
        let damping_force = direction * (self.damping * relative_velocity.dot(direction));

        let total = spring_force + damping_force;
        particles[self.a].add_force(total);
        particles[self.b].add_force(-total);
    }

    /// Project the endpoints back inside `max_stretch × rest_length`.
    ///
    /// A pinned endpoint never moves; its partner takes the whole correction.
    pub fn satisfy_constraint(&self, particles: &mut [Particle], limits: &SpringLimits) {
        let delta = particles[self.b].position - particles[self.a].position;
        let current_length = delta.length();
        if current_length == 0.0 {
            return;
        }

        let max_length = self.rest_length * limits.max_stretch;
        if current_length <= max_length {
            return;
        }

        let excess = current_length - max_length;
        let correction = delta / current_length * (excess * 0.5);

        match (particles[self.a].pinned, particles[self.b].pinned) {
            (false, false) => {
                particles[self.a].position += correction;
                particles[self.b].position -= correction;
            }
            (true, false) => particles[self.b].position -= correction * 2.0,
            (false, true) => particles[self.a].position += correction * 2.0,
            (true, true) => {}
        }
    }

    /// Closest point on the segment to `point`.
    pub fn closest_point(&self, particles: &[Particle], point: Vec3) -> Vec3 {
        let p1 = particles[self.a].position;
        let p2 = particles[self.b].position;
        let segment = p2 - p1;
        let length = segment.length();
        if length == 0.0 {
            return p1;
        }
        let dir = segment / length;
        let t = (point - p1).dot(dir).clamp(0.0, length);
        p1 + dir * t
    }
}
