//! Frame loop owner: particles, springs, modes and interaction state

use glam::{Mat4, Vec2, Vec3};
use log::{debug, info, trace, warn};

use crate::collision::CollisionObject;
use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::mesh;
use crate::mode::{PinningMode, SimMode};
use crate::network::SpringNetwork;
use crate::particle::Particle;
use crate::picking::{self, Ray, Viewport};
use crate::spring::SpringLimits;

/// A dt this many times over the limit is reported as a stall.
const STALL_FACTOR: f32 = 4.0;

/// Camera matrices the tearing ray is cast through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub pressed: bool,
    pub position: Vec2,
}

/// What happened during one call to [`Simulation::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    /// The dt actually integrated, after clamping.
    pub dt: f32,
    pub torn: usize,
    pub contacts: usize,
}

/// Clamp a frame time into `[0, max_dt]`; non-finite input counts as zero.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt)
    } else {
        0.0
    }
}

pub struct Simulation {
    config: ClothConfig,
    limits: SpringLimits,
    particles: Vec<Particle>,
    rest_positions: Vec<Vec3>,
    network: SpringNetwork,
    indices: Vec<u32>,
    mode: SimMode,
    pinning: PinningMode,
    collision: CollisionObject,
    pointer: PointerState,
    view: Option<ViewState>,
    elapsed: f32,
    frame: u64,
}

impl Simulation {
    pub fn new(config: ClothConfig) -> Result<Self, ClothError> {
        config.validate()?;

        let rest_positions: Vec<Vec3> = (0..config.rows)
            .flat_map(|y| (0..config.cols).map(move |x| (x, y)))
            .map(|(x, y)| config.rest_position(x, y))
            .collect();
        let particles: Vec<Particle> = rest_positions
            .iter()
            .map(|&pos| Particle::new(pos, config.particle_mass))
            .collect();

        let network = SpringNetwork::build(&particles, &config);
        let indices = mesh::grid_indices(config.rows, config.cols);
        let limits = SpringLimits {
            stiffening_threshold: config.stiffening_threshold,
            max_stretch: config.max_stretch,
        };

        info!(
            "cloth {}x{}: {} particles, {} springs",
            config.rows,
            config.cols,
            particles.len(),
            network.len()
        );

        let mut sim = Self {
            collision: config.collision,
            config,
            limits,
            particles,
            rest_positions,
            network,
            indices,
            mode: SimMode::default(),
            pinning: PinningMode::default(),
            pointer: PointerState::default(),
            view: None,
            elapsed: 0.0,
            frame: 0,
        };
        sim.pinning.apply(&mut sim.particles, sim.config.cols);
        Ok(sim)
    }

    /// Advance one frame.
    pub fn step(&mut self, dt: f32) -> StepStats {
        let raw_dt = dt;
        let dt = clamp_dt(dt, self.config.max_dt);
        if raw_dt > self.config.max_dt * STALL_FACTOR {
            warn!("frame took {:.3}s, clamping step to {:.4}s", raw_dt, dt);
        }

        let behavior = self.mode.behavior();
        self.elapsed += dt;
        self.frame += 1;

        if let Some(forced) = behavior.forced_pinning() {
            if forced != self.pinning {
                self.set_pinning(forced);
            }
        }

        let torn = if behavior.tearing_enabled() && self.pointer.pressed {
            self.tear_at_pointer()
        } else {
            0
        };

        self.network.apply_forces(&mut self.particles, &self.limits);

        for p in &mut self.particles {
            behavior.apply_forces(p, &self.config, self.elapsed, dt);
        }

        for p in &mut self.particles {
            p.update_verlet(dt);
        }

        for _ in 0..self.config.constraint_iterations {
            self.network.satisfy_constraints(&mut self.particles, &self.limits);
        }

        let contacts = if behavior.collisions_enabled() {
            self.collision.resolve_all(&mut self.particles)
        } else {
            0
        };

        trace!(
            "frame {} dt={:.5} torn={} contacts={} active={}",
            self.frame,
            dt,
            torn,
            contacts,
            self.network.active_count()
        );

        StepStats { dt, torn, contacts }
    }

    fn tear_at_pointer(&mut self) -> usize {
        let Some(view) = self.view else {
            return 0;
        };
        let Some(ray) = Ray::from_screen(self.pointer.position, view.viewport, view.view, view.projection) else {
            return 0;
        };
        match picking::closest_particle(&self.particles, &ray, self.config.tear_radius) {
            Some(index) => self.tear_around_particle(index),
            None => 0,
        }
    }

    /// Tear intact springs within the tear radius of particle `index`.
    pub fn tear_around_particle(&mut self, index: usize) -> usize {
        let center = self.particles[index].position;
        let torn = self.tear_at(center, self.config.tear_radius);
        if torn > 0 {
            debug!(
                "tore {} springs around particle {} ({} torn total)",
                torn,
                index,
                self.network.torn_count()
            );
        }
        torn
    }

    pub fn tear_at(&mut self, center: Vec3, radius: f32) -> usize {
        picking::tear_springs_around_point(&mut self.network, &self.particles, center, radius)
    }

    /// Particle under a window position, using the last view passed to [`Self::set_view`].
    pub fn pick(&self, screen: Vec2) -> Option<usize> {
        let view = self.view?;
        let ray = Ray::from_screen(screen, view.viewport, view.view, view.projection)?;
        picking::closest_particle(&self.particles, &ray, self.config.tear_radius)
    }

    pub fn set_view(&mut self, view: Mat4, projection: Mat4, viewport: Viewport) {
        self.view = Some(ViewState { view, projection, viewport });
    }

    pub fn set_pointer_pressed(&mut self, pressed: bool) {
        self.pointer.pressed = pressed;
    }

    /// Apply a tear-button transition. Releases always land, even when the UI
    /// owns the pointer, so a drag that ends over a panel stops tearing.
    pub fn pointer_button(&mut self, pressed: bool, captured: bool) {
        if !pressed || !captured {
            self.pointer.pressed = pressed;
        }
    }

    pub fn set_pointer_position(&mut self, position: Vec2) {
        self.pointer.position = position;
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn advance_mode(&mut self) {
        self.mode = self.mode.next();
        info!("simulation mode: {}", self.mode.label());
        self.reset();
    }

    pub fn set_mode(&mut self, mode: SimMode) {
        if mode != self.mode {
            self.mode = mode;
            info!("simulation mode: {}", self.mode.label());
            self.reset();
        }
    }

    pub fn advance_pinning(&mut self) {
        self.set_pinning(self.pinning.next());
    }

    /// Switch pinning rule. Positions return to the rest layout; torn springs stay torn.
    pub fn set_pinning(&mut self, pinning: PinningMode) {
        self.pinning = pinning;
        self.reset_positions();
        let pinned = self.pinning.apply(&mut self.particles, self.config.cols);
        info!("pinning mode: {} ({} pinned)", self.pinning.label(), pinned);
    }

    pub fn advance_collision_shape(&mut self) {
        self.collision = self.collision.with_shape(self.collision.shape.next());
        info!("collision shape: {}", self.collision.shape.label());
        self.reset();
    }

    /// Full reset: rest layout, default pinning for the mode, every spring intact.
    pub fn reset(&mut self) {
        self.reset_positions();
        self.pinning = self.mode.behavior().forced_pinning().unwrap_or_default();
        self.pinning.apply(&mut self.particles, self.config.cols);
        self.network.restore();
        self.elapsed = 0.0;
        info!(
            "reset: mode {}, pinning {}",
            self.mode.label(),
            self.pinning.label()
        );
    }

    fn reset_positions(&mut self) {
        for (p, &rest) in self.particles.iter_mut().zip(&self.rest_positions) {
            p.reset_to(rest);
        }
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Endpoint pairs of every intact spring
    pub fn active_spring_segments(&self) -> Vec<[Vec3; 2]> {
        self.network
            .active_springs()
            .map(|(_, s)| [self.particles[s.a].position, self.particles[s.b].position])
            .collect()
    }

    pub fn normals(&self) -> Vec<Vec3> {
        mesh::compute_normals(&self.positions(), &self.indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn network(&self) -> &SpringNetwork {
        &self.network
    }

    pub fn config(&self) -> &ClothConfig {
        &self.config
    }

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn pinning(&self) -> PinningMode {
        self.pinning
    }

    pub fn collision(&self) -> &CollisionObject {
        &self.collision
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn rest_position(&self, index: usize) -> Vec3 {
        self.rest_positions[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_dt_bounds_stalls() {
        assert_eq!(clamp_dt(0.5, 1.0 / 60.0), 1.0 / 60.0);
        assert_eq!(clamp_dt(-1.0, 1.0 / 60.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 1.0 / 60.0), 0.0);
        assert_eq!(clamp_dt(0.01, 1.0 / 60.0), 0.01);
    }

    #[test]
    fn flag_mode_forces_flag_pinning() {
        let mut sim = Simulation::new(ClothConfig::default().with_grid(4, 5)).expect("valid config");
        sim.advance_mode();
        sim.advance_mode();
        assert_eq!(sim.mode(), SimMode::Flag);
        assert_eq!(sim.pinning(), PinningMode::Flag);

        sim.advance_pinning();
        assert_eq!(sim.pinning(), PinningMode::None);
        sim.step(1.0 / 60.0);
        assert_eq!(sim.pinning(), PinningMode::Flag);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = Simulation::new(ClothConfig::default().with_grid(0, 3));
        assert!(matches!(result, Err(ClothError::InvalidGrid { .. })));
    }
}
