//! Parametric surface sampling for tori and cylinders.
//!
//! Samplers only produce vertex attributes in a fixed emission order; the
//! matching index layout lives in [`crate::triangulate`].

use std::f32::consts::TAU;

use core_types::{CoreError, CoreResult};
use glam::{Vec2, Vec3};

use crate::mesh::Vertex;

/// Smallest ring/slice count that still encloses a surface.
pub const MIN_SAMPLES: u32 = 3;

const CYLINDER_SIDE_COLOR: Vec3 = Vec3::new(0.2, 0.6, 0.5);
const CYLINDER_CAP_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// A torus built from a large loop with small circles around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusDesc {
    /// Distance from the torus center to the center of each small circle.
    pub loop_radius: f32,
    /// Radius of the small circle (tube).
    pub circle_radius: f32,
    /// Samples along the large loop.
    pub rings: u32,
    /// Samples around each small circle.
    pub slices: u32,
    /// Emit `(cos theta, sin phi)` texture coordinates.
    pub texcoords: bool,
}

impl TorusDesc {
    pub fn new(loop_radius: f32, circle_radius: f32, rings: u32, slices: u32) -> Self {
        Self {
            loop_radius,
            circle_radius,
            rings,
            slices,
            texcoords: true,
        }
    }

    #[inline]
    pub fn without_texcoords(mut self) -> Self {
        self.texcoords = false;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.rings as usize * self.slices as usize
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_samples("rings", self.rings)?;
        check_samples("slices", self.slices)?;
        check_finite("loop_radius", self.loop_radius)?;
        check_finite("circle_radius", self.circle_radius)
    }
}

/// A cylinder along +X with two disk caps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylinderDesc {
    /// X coordinate of the first cap.
    pub start: f32,
    pub length: f32,
    pub radius: f32,
    /// Samples around each cap circle.
    pub slices: u32,
}

impl CylinderDesc {
    pub fn new(start: f32, length: f32, radius: f32, slices: u32) -> Self {
        Self {
            start,
            length,
            radius,
            slices,
        }
    }

    /// Two rings plus the two cap centers.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        2 * self.slices as usize + 2
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_samples("slices", self.slices)?;
        check_finite("start", self.start)?;
        check_finite("length", self.length)?;
        check_finite("radius", self.radius)
    }
}

fn check_samples(what: &str, count: u32) -> CoreResult<()> {
    if count < MIN_SAMPLES {
        return Err(CoreError::InvalidTopology(format!(
            "{what} must be >= {MIN_SAMPLES}, got {count}"
        )));
    }
    Ok(())
}

/// Any finite extent is accepted; zero radii give degenerate but valid
/// surfaces.
fn check_finite(what: &str, value: f32) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::InvalidTopology(format!(
            "{what} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// Sample a torus. Vertex `(i, j)` is emitted at index `i * slices + j`.
pub fn sample_torus(desc: &TorusDesc) -> CoreResult<Vec<Vertex>> {
    desc.validate()?;

    let rings = desc.rings as f32;
    let slices = desc.slices as f32;
    let mut vertices = Vec::with_capacity(desc.vertex_count());

    for i in 0..desc.rings {
        let u = i as f32 / rings;
        let theta = TAU * u;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let loop_center = Vec3::new(desc.loop_radius * cos_theta, desc.loop_radius * sin_theta, 0.0);

        for j in 0..desc.slices {
            let v = j as f32 / slices;
            let phi = TAU * v;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = Vec3::new(cos_theta * cos_phi, sin_theta * cos_phi, sin_phi);
            let position = loop_center + normal * desc.circle_radius;
            let color = Vec3::new(1.0 - u, u, v);

            let mut vertex = Vertex::new(position, normal, color);
            if desc.texcoords {
                vertex = vertex.with_uv(Vec2::new(cos_theta, sin_phi));
            }
            vertices.push(vertex);
        }
    }

    Ok(vertices)
}

/// Sample a cylinder.
///
/// Layout: ring 1 at `x = start` (indices `0..S`), ring 2 at
/// `x = start + length` (indices `S..2S`), then the start cap center (`2S`)
/// and the end cap center (`2S + 1`).
pub fn sample_cylinder(desc: &CylinderDesc) -> CoreResult<Vec<Vertex>> {
    desc.validate()?;

    let slices = desc.slices as usize;
    let step = TAU / desc.slices as f32;
    let x0 = desc.start;
    let x1 = desc.start + desc.length;

    let ring: Vec<(f32, Vec2)> = (0..slices)
        .map(|j| {
            let (sin, cos) = (j as f32 * step).sin_cos();
            (j as f32 / slices as f32, Vec2::new(sin, cos) * desc.radius)
        })
        .collect();

    let mut vertices = Vec::with_capacity(desc.vertex_count());
    for (x, v) in [(x0, 0.0), (x1, 1.0)] {
        for &(u, yz) in &ring {
            let position = Vec3::new(x, yz.x, yz.y);
            let normal = Vec3::new(0.0, yz.x, yz.y);
            vertices.push(Vertex::new(position, normal, CYLINDER_SIDE_COLOR).with_uv(Vec2::new(u, v)));
        }
    }

    let cap_uv = Vec2::splat(0.5);
    vertices.push(Vertex::new(Vec3::new(x0, 0.0, 0.0), Vec3::NEG_X, CYLINDER_CAP_COLOR).with_uv(cap_uv));
    vertices.push(Vertex::new(Vec3::new(x1, 0.0, 0.0), Vec3::X, CYLINDER_CAP_COLOR).with_uv(cap_uv));

    Ok(vertices)
}
