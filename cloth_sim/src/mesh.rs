//! Mesh data for the cloth surface and the scene props
//!
//! Cloth topology (triangle indices, texture coordinates) is static; only
//! normals are recomputed per frame from the current particle positions.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Normal used where no triangle contributes a usable direction.
pub const FALLBACK_NORMAL: Vec3 = Vec3::Z;

/// Vertex of a static prop mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Two triangles per grid cell, wound top-left, bottom-left, top-right then
/// top-right, bottom-left, bottom-right.
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1) * 6);
    for y in 0..rows.saturating_sub(1) {
        for x in 0..cols.saturating_sub(1) {
            let top_left = (y * cols + x) as u32;
            let top_right = top_left + 1;
            let bottom_left = ((y + 1) * cols + x) as u32;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }
    indices
}

/// Row-major UVs spanning `[0, 1]²` across the grid.
pub fn grid_tex_coords(rows: usize, cols: usize) -> Vec<Vec2> {
    let u_den = cols.saturating_sub(1).max(1) as f32;
    let v_den = rows.saturating_sub(1).max(1) as f32;
    (0..rows)
        .flat_map(|y| (0..cols).map(move |x| Vec2::new(x as f32 / u_den, y as f32 / v_den)))
        .collect()
}

/// Per-vertex normals: sum of adjacent face normals, renormalised.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (ia, ib, ic) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let a = positions[ia];
        let face = (positions[ib] - a).cross(positions[ic] - a).normalize_or_zero();
        normals[ia] += face;
        normals[ib] += face;
        normals[ic] += face;
    }

    for n in &mut normals {
        *n = if n.length() > 1e-6 { n.normalize() } else { FALLBACK_NORMAL };
    }
    normals
}

/// Open cylinder along +Y with its base at the origin (the flag pole).
pub fn cylinder(radius: f32, height: f32, slices: u32) -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(slices as usize * 6);
    for i in 0..slices {
        let theta = TAU * i as f32 / slices as f32;
        let next = TAU * (i + 1) as f32 / slices as f32;

        let n0 = Vec3::new(theta.cos(), 0.0, theta.sin());
        let n1 = Vec3::new(next.cos(), 0.0, next.sin());
        let bottom0 = n0 * radius;
        let bottom1 = n1 * radius;
        let top0 = bottom0 + Vec3::Y * height;
        let top1 = bottom1 + Vec3::Y * height;

        vertices.push(MeshVertex::new(bottom0, n0));
        vertices.push(MeshVertex::new(bottom1, n1));
        vertices.push(MeshVertex::new(top1, n1));

        vertices.push(MeshVertex::new(bottom0, n0));
        vertices.push(MeshVertex::new(top1, n1));
        vertices.push(MeshVertex::new(top0, n0));
    }
    vertices
}

/// Axis-aligned box centred on the origin with edge length `size`, flat-shaded.
pub fn cube(size: Vec3) -> Vec<MeshVertex> {
    let h = size * 0.5;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::Y, Vec3::X, Vec3::Z),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let center = normal * h;
        let corner = |su: f32, sv: f32| center + u * h * su + v * h * sv;
        let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(MeshVertex::new(quad[i], normal));
        }
    }
    vertices
}

/// UV sphere centred on the origin.
pub fn sphere(radius: f32, rings: u32, sectors: u32) -> Vec<MeshVertex> {
    let point = |ring: u32, sector: u32| {
        let phi = PI * ring as f32 / rings as f32;
        let theta = TAU * sector as f32 / sectors as f32;
        Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
    };

    let mut vertices = Vec::with_capacity((rings * sectors * 6) as usize);
    for i in 0..rings {
        for j in 0..sectors {
            let n0 = point(i, j);
            let n1 = point(i + 1, j);
            let n2 = point(i + 1, j + 1);
            let n3 = point(i, j + 1);
            for n in [n0, n1, n2, n0, n2, n3] {
                vertices.push(MeshVertex::new(n * radius, n));
            }
        }
    }
    vertices
}
