//! Index generation for the sampled grids in [`crate::sampler`].
//!
//! Winding is counter-clockwise seen from outside the surface. The exact
//! vertex order of every triangle is part of the contract.

use crate::mesh::Triangle;
use crate::sampler::MIN_SAMPLES;

/// Two triangles per quad over a grid that wraps in both directions.
pub fn triangulate_torus(rings: u32, slices: u32) -> Vec<Triangle> {
    debug_assert!(rings >= MIN_SAMPLES && slices >= MIN_SAMPLES, "torus grid {rings}x{slices}");
    let idx = |i: u32, j: u32| i * slices + j;
    let mut triangles = Vec::with_capacity(2 * rings as usize * slices as usize);

    for i in 0..rings {
        let next_i = (i + 1) % rings;
        for j in 0..slices {
            let next_j = (j + 1) % slices;
            triangles.push([idx(next_i, j), idx(i, next_j), idx(i, j)]);
            triangles.push([idx(next_i, j), idx(next_i, next_j), idx(i, next_j)]);
        }
    }

    triangles
}

/// Side wall of a cylinder: `slices - 1` quads between the two rings plus
/// the closing quad from the last sample back to the first.
pub fn triangulate_cylinder_side(slices: u32) -> Vec<Triangle> {
    debug_assert!(slices >= MIN_SAMPLES, "cylinder slices {slices}");
    let s = slices;
    let mut triangles = Vec::with_capacity(2 * s as usize);

    for k in 0..s - 1 {
        triangles.push([k, s + k, k + 1]);
        triangles.push([k + 1, s + k, s + k + 1]);
    }

    let last = s - 1;
    triangles.push([last, s + last, 0]);
    triangles.push([0, s + last, s]);

    triangles
}

/// Cap fans around the two center vertices. The start cap faces -X, the end
/// cap is walked in reverse so it faces +X.
pub fn triangulate_cylinder_caps(slices: u32) -> Vec<Triangle> {
    debug_assert!(slices >= MIN_SAMPLES, "cylinder slices {slices}");
    let s = slices;
    let start_center = 2 * s;
    let end_center = 2 * s + 1;
    let mut triangles = Vec::with_capacity(2 * s as usize);

    for k in 0..s {
        triangles.push([start_center, k, (k + 1) % s]);
    }
    for k in (0..s).rev() {
        triangles.push([end_center, s + (k + 1) % s, s + k]);
    }

    triangles
}

/// Full cylinder index list: start cap, side wall, end cap.
pub fn triangulate_cylinder(slices: u32) -> Vec<Triangle> {
    let caps = triangulate_cylinder_caps(slices);
    let (start_cap, end_cap) = caps.split_at(slices as usize);

    let mut triangles = Vec::with_capacity(4 * slices as usize);
    triangles.extend_from_slice(start_cap);
    triangles.extend(triangulate_cylinder_side(slices));
    triangles.extend_from_slice(end_cap);
    triangles
}
