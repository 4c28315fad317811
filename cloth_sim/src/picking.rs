//! Mouse-ray picking and spring tearing

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::network::SpringNetwork;
use crate::particle::Particle;

/// Ratio between the pick tolerance and the tear radius.
pub const PICK_RADIUS_FACTOR: f32 = 2.0;

/// Pixel rectangle the scene is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Returns `None` when `direction` cannot be normalised.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Cast from a window position (pixels, origin top-left) into the scene.
    pub fn from_screen(screen: Vec2, viewport: Viewport, view: Mat4, projection: Mat4) -> Option<Self> {
        let near = unproject(screen, 0.0, viewport, view, projection)?;
        let far = unproject(screen, 1.0, viewport, view, projection)?;
        Self::new(near, far - near)
    }

    /// Squared distance from `point` to the infinite line through the ray.
    pub fn distance_squared(&self, point: Vec3) -> f32 {
        let to_point = point - self.origin;
        let closest = self.origin + self.direction * to_point.dot(self.direction);
        point.distance_squared(closest)
    }
}

/// Map a window position at normalised `depth` (0 = near, 1 = far) back to world space.
pub fn unproject(screen: Vec2, depth: f32, viewport: Viewport, view: Mat4, projection: Mat4) -> Option<Vec3> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    let ndc = Vec4::new(
        screen.x / viewport.width * 2.0 - 1.0,
        1.0 - screen.y / viewport.height * 2.0,
        depth,
        1.0,
    );
    let world = (projection * view).inverse() * ndc;
    if world.w == 0.0 || !world.is_finite() {
        return None;
    }
    Some(world.truncate() / world.w)
}

/// Index of the particle nearest the ray, if it lies within `2 × tear_radius` of it.
pub fn closest_particle(particles: &[Particle], ray: &Ray, tear_radius: f32) -> Option<usize> {
    let (index, dist_sq) = particles
        .iter()
        .enumerate()
        .map(|(i, p)| (i, ray.distance_squared(p.position)))
        .fold(None, |best: Option<(usize, f32)>, candidate| match best {
            Some(b) if b.1 <= candidate.1 => Some(b),
            _ => Some(candidate),
        })?;

    let limit = tear_radius * PICK_RADIUS_FACTOR;
    (dist_sq.sqrt() < limit).then_some(index)
}

/// Tear every intact spring with an endpoint, or any point of its segment,
/// closer than `radius` to `center`. Returns the number torn.
pub fn tear_springs_around_point(
    network: &mut SpringNetwork,
    particles: &[Particle],
    center: Vec3,
    radius: f32,
) -> usize {
    let doomed: Vec<usize> = network
        .active_springs()
        .filter(|(_, spring)| {
            let p1 = particles[spring.a].position;
            let p2 = particles[spring.b].position;
            if p1.distance(center) < radius || p2.distance(center) < radius {
                return true;
            }
            p1 != p2 && spring.closest_point(particles, center).distance(center) < radius
        })
        .map(|(i, _)| i)
        .collect();

    for &i in &doomed {
        network.tear(i);
    }
    doomed.len()
}
