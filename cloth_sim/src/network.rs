//! Structural, shear and bend spring lattice over a particle grid

use crate::config::ClothConfig;
use crate::particle::Particle;
use crate::spring::{Spring, SpringKind, SpringLimits};

/// All springs of a cloth plus their torn/intact state.
///
/// Topology is fixed at construction. Tearing only clears entries of `active`;
/// a torn spring stays torn until [`SpringNetwork::restore`].
#[derive(Debug, Clone)]
pub struct SpringNetwork {
    springs: Vec<Spring>,
    active: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl SpringNetwork {
    /// Build the lattice over `particles`, laid out row-major as `y * cols + x`.
    ///
    /// Rest lengths are taken from the current particle positions.
    pub fn build(particles: &[Particle], config: &ClothConfig) -> Self {
        let (rows, cols) = (config.rows, config.cols);
        debug_assert_eq!(particles.len(), rows * cols);

        let mut springs = Vec::with_capacity(expected_spring_count(rows, cols));
        let mut link = |a: usize, b: usize, kind: SpringKind| {
            let params = match kind {
                SpringKind::Structural => config.structural,
                SpringKind::Shear => config.shear,
                SpringKind::Bend => config.bend,
            };
            springs.push(Spring::new(particles, a, b, kind, params.stiffness, params.damping));
        };

        for y in 0..rows {
            for x in 0..cols {
                let idx = y * cols + x;

                if x + 1 < cols {
                    link(idx, idx + 1, SpringKind::Structural);
                }
                if y + 1 < rows {
                    link(idx, idx + cols, SpringKind::Structural);
                }

                if x + 1 < cols && y + 1 < rows {
                    link(idx, idx + cols + 1, SpringKind::Shear);
                }
                if x > 0 && y + 1 < rows {
                    link(idx, idx + cols - 1, SpringKind::Shear);
                }

                if x + 2 < cols {
                    link(idx, idx + 2, SpringKind::Bend);
                }
                if y + 2 < rows {
                    link(idx, idx + 2 * cols, SpringKind::Bend);
                }
            }
        }

        let active = vec![true; springs.len()];
        Self {
            springs,
            active,
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active[index]
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    pub fn torn_count(&self) -> usize {
        self.len() - self.active_count()
    }

    pub fn count_of(&self, kind: SpringKind) -> usize {
        self.springs.iter().filter(|s| s.kind == kind).count()
    }

    /// Intact springs with their index
    pub fn active_springs(&self) -> impl Iterator<Item = (usize, &Spring)> + '_ {
        self.springs
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.active[*i])
    }

    /// Mark spring `index` as torn. Returns whether it was intact before.
    pub fn tear(&mut self, index: usize) -> bool {
        std::mem::replace(&mut self.active[index], false)
    }

    /// Re-activate every spring.
    pub fn restore(&mut self) {
        self.active.fill(true);
    }

    pub fn apply_forces(&self, particles: &mut [Particle], limits: &SpringLimits) {
        for (_, spring) in self.active_springs() {
            spring.apply_forces(particles, limits);
        }
    }

    /// One relaxation sweep over every intact spring.
    pub fn satisfy_constraints(&self, particles: &mut [Particle], limits: &SpringLimits) {
        for (_, spring) in self.active_springs() {
            spring.satisfy_constraint(particles, limits);
        }
    }
}

/// Number of springs [`SpringNetwork::build`] generates for a `rows × cols` grid.
pub fn expected_spring_count(rows: usize, cols: usize) -> usize {
    let structural = rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1);
    let shear = 2 * rows.saturating_sub(1) * cols.saturating_sub(1);
    let bend = rows * cols.saturating_sub(2) + cols * rows.saturating_sub(2);
    structural + shear + bend
}
