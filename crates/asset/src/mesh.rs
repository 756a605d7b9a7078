//! CPU-side mesh representation produced by the procedural generators.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Triangle as three indices into the vertex buffer.
pub type Triangle = [u32; 3];

/// One sampled surface point. Normals are not normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub uv: Option<Vec2>,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Vec3) -> Self {
        Self {
            position,
            normal,
            color,
            uv: None,
        }
    }

    #[inline]
    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = Some(uv);
        self
    }
}

/// Which attributes a persisted mesh carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VertexLayout {
    #[default]
    PositionNormalColor,
    PositionNormalColorUv,
}

/// Packed vertex as stored in a mesh resource.
/// Meshes without texture coordinates store `[0, 0]` in `uv`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl From<&Vertex> for MeshVertex {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            color: v.color.to_array(),
            uv: v.uv.map(|uv| uv.to_array()).unwrap_or([0.0, 0.0]),
        }
    }
}

/// Indexed triangle list with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub layout: VertexLayout,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>, layout: VertexLayout) -> Self {
        Self {
            vertices,
            indices,
            layout,
        }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Raw vertex stream for upload by a rendering backend.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index stream for upload by a rendering backend.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0, 0, 0], VertexLayout::default());
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn packed_vertex_is_eleven_floats() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 11 * 4);
        let data = MeshData::new(
            vec![MeshVertex::default(); 2],
            vec![0, 1, 0],
            VertexLayout::PositionNormalColor,
        );
        assert_eq!(data.vertex_bytes().len(), 2 * 44);
        assert_eq!(data.index_bytes().len(), 12);
    }

    #[test]
    fn missing_uv_packs_as_zero() {
        let v = Vertex::new(Vec3::X, Vec3::Y, Vec3::Z);
        assert_eq!(MeshVertex::from(&v).uv, [0.0, 0.0]);
        let v = v.with_uv(Vec2::new(0.25, 0.5));
        assert_eq!(MeshVertex::from(&v).uv, [0.25, 0.5]);
    }

    #[test]
    fn packs_attributes_in_order() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z, Vec3::new(0.1, 0.2, 0.3))
            .with_uv(Vec2::new(-1.0, 1.0));
        let packed = MeshVertex::from(&v);
        assert_eq!(packed.position, [1.0, 2.0, 3.0]);
        assert_eq!(packed.normal, [0.0, 0.0, 1.0]);
        assert_eq!(packed.color, [0.1, 0.2, 0.3]);
        assert_eq!(packed.uv, [-1.0, 1.0]);
    }
}
