//! Positional collision response against a cube or sphere

use glam::Vec3;

use crate::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollisionShape {
    #[default]
    Cube,
    Sphere,
}

impl CollisionShape {
    pub fn next(self) -> Self {
        match self {
            CollisionShape::Cube => CollisionShape::Sphere,
            CollisionShape::Sphere => CollisionShape::Cube,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollisionShape::Cube => "Cube",
            CollisionShape::Sphere => "Sphere",
        }
    }
}

/// Penetration of a point into a collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Outward surface normal.
    pub normal: Vec3,
    pub depth: f32,
}

/// A static primitive the cloth can rest on.
///
/// For a cube `size` holds the full edge lengths; for a sphere `size.x` is the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionObject {
    pub center: Vec3,
    pub size: Vec3,
    pub shape: CollisionShape,
}

impl CollisionObject {
    pub fn cube(center: Vec3, size: Vec3) -> Self {
        Self { center, size, shape: CollisionShape::Cube }
    }

    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self { center, size: Vec3::splat(radius), shape: CollisionShape::Sphere }
    }

    /// An object sized to the cloth, sitting below its centre along -Z.
    pub fn below_cloth(rows: usize, cols: usize, spacing: f32, shape: CollisionShape) -> Self {
        let width = cols.saturating_sub(1) as f32 * spacing;
        let height = rows.saturating_sub(1) as f32 * spacing;
        let extent = width.min(height).max(spacing);
        let center = Vec3::new(width * 0.5, -height * 0.5, -extent * 0.75);
        match shape {
            CollisionShape::Cube => Self::cube(center, Vec3::splat(extent * 0.5)),
            CollisionShape::Sphere => Self::sphere(center, extent * 0.3),
        }
    }

    pub fn with_shape(self, shape: CollisionShape) -> Self {
        let extent = match self.shape {
            CollisionShape::Cube => self.size.x / 0.5,
            CollisionShape::Sphere => self.size.x / 0.3,
        };
        match shape {
            CollisionShape::Cube => Self::cube(self.center, Vec3::splat(extent * 0.5)),
            CollisionShape::Sphere => Self::sphere(self.center, extent * 0.3),
        }
    }

    pub fn radius(&self) -> f32 {
        self.size.x
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn penetration(&self, point: Vec3) -> Option<Contact> {
        match self.shape {
            CollisionShape::Cube => self.cube_penetration(point),
            CollisionShape::Sphere => self.sphere_penetration(point),
        }
    }

    /// Axis of least penetration wins; ties go to x, then y, then z.
    fn cube_penetration(&self, point: Vec3) -> Option<Contact> {
        let local = point - self.center;
        let half = self.half_extents();
        let overlap = half - local.abs();
        if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
            return None;
        }

        let (axis, depth) = [(Vec3::X, overlap.x), (Vec3::Y, overlap.y), (Vec3::Z, overlap.z)]
            .into_iter()
            .fold((Vec3::X, f32::INFINITY), |best, candidate| {
                if candidate.1 < best.1 { candidate } else { best }
            });

        let sign = if local.dot(axis) < 0.0 { -1.0 } else { 1.0 };
        Some(Contact { normal: axis * sign, depth })
    }

    fn sphere_penetration(&self, point: Vec3) -> Option<Contact> {
        let offset = point - self.center;
        let distance = offset.length();
        let radius = self.radius();
        if distance >= radius {
            return None;
        }

        let normal = if distance > 0.0 { offset / distance } else { Vec3::Z };
        Some(Contact { normal, depth: radius - distance })
    }

    /// Push `particle` out along the contact normal, leaving its implicit velocity alone.
    pub fn resolve(particle: &mut Particle, contact: &Contact) {
        particle.position += contact.normal * contact.depth;
    }

    /// Resolve every unpinned particle inside the volume. Returns the contact count.
    pub fn resolve_all(&self, particles: &mut [Particle]) -> usize {
        let mut contacts = 0;
        for p in particles.iter_mut().filter(|p| !p.pinned) {
            if let Some(contact) = self.penetration(p.position) {
                Self::resolve(p, &contact);
                contacts += 1;
            }
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_pushes_out_through_nearest_face() {
        let cube = CollisionObject::cube(Vec3::ZERO, Vec3::splat(2.0));
        let contact = cube.penetration(Vec3::new(0.2, 0.0, 0.9)).expect("inside");
        assert_eq!(contact.normal, Vec3::Z);
        assert!((contact.depth - 0.1).abs() < 1e-6);
    }

    #[test]
    fn cube_ignores_points_outside() {
        let cube = CollisionObject::cube(Vec3::ZERO, Vec3::splat(2.0));
        assert!(cube.penetration(Vec3::new(0.0, 1.5, 0.0)).is_none());
    }

    #[test]
    fn sphere_normal_is_radial() {
        let sphere = CollisionObject::sphere(Vec3::ZERO, 1.0);
        let contact = sphere.penetration(Vec3::new(0.0, -0.5, 0.0)).expect("inside");
        assert_eq!(contact.normal, Vec3::NEG_Y);
        assert!((contact.depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resolve_keeps_velocity() {
        let sphere = CollisionObject::sphere(Vec3::ZERO, 1.0);
        let mut p = Particle::new(Vec3::new(0.5, 0.0, 0.0), 1.0);
        p.prev_position = Vec3::new(0.6, 0.0, 0.0);
        let before = p.prev_position;
        assert_eq!(sphere.resolve_all(std::slice::from_mut(&mut p)), 1);
        assert!((p.position.x - 1.0).abs() < 1e-6);
        assert_eq!(p.prev_position, before);
    }

    #[test]
    fn shape_swap_keeps_center() {
        let cube = CollisionObject::below_cloth(10, 10, 0.2, CollisionShape::Cube);
        let sphere = cube.with_shape(CollisionShape::Sphere);
        assert_eq!(sphere.center, cube.center);
        assert_eq!(sphere.shape, CollisionShape::Sphere);
    }
}
