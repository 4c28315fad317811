//! Simulation parameters

use glam::Vec3;

use crate::collision::{CollisionObject, CollisionShape};
use crate::error::ClothError;

/// Stiffness and damping for one class of springs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringParams {
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self { stiffness, damping }
    }
}

/// A single sine term of the gust function: `amplitude * sin(frequency * t + phase)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}

/// Wind applied in flag mode
#[derive(Debug, Clone, PartialEq)]
pub struct WindConfig {
    pub direction: Vec3,
    pub base: f32,
    pub harmonics: Vec<Harmonic>,
    pub lift: Vec3,
    /// Air drag coefficient, applied against the particle velocity.
    pub drag: f32,
    /// Lower bound on dt when turning a position delta into a velocity.
    pub min_velocity_dt: f32,
}

impl WindConfig {
    /// Gust strength at time `t`: `8 + 5·sin(1.5t) + 3·sin(0.5t + 1)` with the defaults.
    pub fn gust(&self, t: f32) -> f32 {
        self.harmonics
            .iter()
            .fold(self.base, |acc, h| acc + h.amplitude * (h.frequency * t + h.phase).sin())
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::X,
            base: 8.0,
            harmonics: vec![
                Harmonic { amplitude: 5.0, frequency: 1.5, phase: 0.0 },
                Harmonic { amplitude: 3.0, frequency: 0.5, phase: 1.0 },
            ],
            lift: Vec3::new(0.0, 0.2, 0.0),
            drag: 0.1,
            min_velocity_dt: 1e-4,
        }
    }
}

/// Full configuration of a cloth simulation
///
/// # Builder Pattern
/// ```
/// use cloth_sim::ClothConfig;
///
/// let config = ClothConfig::default()
///     .with_grid(10, 12)
///     .with_spacing(0.25)
///     .with_iterations(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClothConfig {
    pub rows: usize,
    pub cols: usize,
    /// Distance between neighbouring particles in the rest layout.
    pub spacing: f32,
    pub particle_mass: f32,
    pub structural: SpringParams,
    pub shear: SpringParams,
    pub bend: SpringParams,
    pub tear_radius: f32,
    /// Constraint relaxation sweeps per frame.
    pub constraint_iterations: usize,
    /// Hard ceiling on spring length, as a multiple of rest length.
    pub max_stretch: f32,
    /// Stretch ratio above which spring forces stiffen cubically.
    pub stiffening_threshold: f32,
    /// Upper bound on the integration step.
    pub max_dt: f32,
    /// Gravitational acceleration magnitude.
    pub gravity: f32,
    pub wind: WindConfig,
    pub collision: CollisionObject,
}

impl Default for ClothConfig {
    fn default() -> Self {
        let rows = 30;
        let cols = 40;
        let spacing = 0.18;
        Self {
            rows,
            cols,
            spacing,
            particle_mass: 1.0,
            structural: SpringParams::new(200.0, 10.0),
            shear: SpringParams::new(100.0, 8.0),
            bend: SpringParams::new(50.0, 5.0),
            tear_radius: 0.1,
            constraint_iterations: 5,
            max_stretch: 1.2,
            stiffening_threshold: 1.1,
            max_dt: 1.0 / 60.0,
            gravity: 9.81,
            wind: WindConfig::default(),
            collision: CollisionObject::below_cloth(rows, cols, spacing, CollisionShape::Cube),
        }
    }
}

impl ClothConfig {
    /// Resize the grid; the collision object follows the new cloth centre.
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self.collision = CollisionObject::below_cloth(rows, cols, self.spacing, self.collision.shape);
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self.collision = CollisionObject::below_cloth(self.rows, self.cols, spacing, self.collision.shape);
        self
    }

    pub fn with_tear_radius(mut self, tear_radius: f32) -> Self {
        self.tear_radius = tear_radius;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.constraint_iterations = iterations;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_collision_shape(mut self, shape: CollisionShape) -> Self {
        self.collision = CollisionObject::below_cloth(self.rows, self.cols, self.spacing, shape);
        self
    }

    /// Rest position of the particle at grid cell (`x`, `y`).
    ///
    /// Columns run along +X and rows along -Y, with the cloth in the z = 0 plane.
    pub fn rest_position(&self, x: usize, y: usize) -> Vec3 {
        Vec3::new(x as f32 * self.spacing, -(y as f32) * self.spacing, 0.0)
    }

    /// Centre of the rest layout
    pub fn cloth_center(&self) -> Vec3 {
        Vec3::new(
            (self.cols.saturating_sub(1)) as f32 * self.spacing * 0.5,
            -((self.rows.saturating_sub(1)) as f32) * self.spacing * 0.5,
            0.0,
        )
    }

    pub fn validate(&self) -> Result<(), ClothError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(ClothError::InvalidGrid { rows: self.rows, cols: self.cols });
        }

        positive("spacing", self.spacing)?;
        positive("particle_mass", self.particle_mass)?;
        positive("tear_radius", self.tear_radius)?;
        positive("max_stretch", self.max_stretch)?;
        positive("stiffening_threshold", self.stiffening_threshold)?;
        positive("max_dt", self.max_dt)?;
        non_negative("gravity", self.gravity)?;

        for (name, params) in [
            ("structural", self.structural),
            ("shear", self.shear),
            ("bend", self.bend),
        ] {
            non_negative(name, params.stiffness)?;
            non_negative(name, params.damping)?;
        }

        positive("collision.size", self.collision.size.min_element())?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ClothError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ClothError::InvalidParameter { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ClothError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ClothError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gust_matches_harmonic_formula() {
        let wind = WindConfig::default();
        for t in [0.0f32, 0.5, 1.0, 7.25] {
            let expected = 8.0 + 5.0 * (1.5 * t).sin() + 3.0 * (0.5 * t + 1.0).sin();
            assert!((wind.gust(t) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ClothConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_grid() {
        let config = ClothConfig::default().with_grid(1, 5);
        assert_eq!(
            config.validate(),
            Err(ClothError::InvalidGrid { rows: 1, cols: 5 })
        );
    }

    #[test]
    fn rejects_non_finite_spacing() {
        let config = ClothConfig::default().with_spacing(f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ClothError::InvalidParameter { name: "spacing", .. })
        ));
    }

    #[test]
    fn rest_layout_grows_down_and_right() {
        let config = ClothConfig::default().with_spacing(0.5);
        assert_eq!(config.rest_position(2, 3), Vec3::new(1.0, -1.5, 0.0));
    }
}
