//! Triangle-list streams and conversion into named mesh resources.

use core_types::{CoreError, CoreResult};

use crate::mesh::{MeshData, MeshVertex, Triangle, Vertex, VertexLayout};
use crate::sampler::{CylinderDesc, TorusDesc, sample_cylinder, sample_torus};
use crate::triangulate::{triangulate_cylinder, triangulate_torus};

/// Destination for finished meshes (an engine's resource manager).
pub trait MeshSink {
    /// Store `data` under `name`. Names are global and case-sensitive.
    fn persist(&mut self, name: &str, data: MeshData) -> CoreResult<()>;
}

/// Name of a persisted mesh. Holds no reference into the sink.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshRef(String);

impl MeshRef {
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeshRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An open triangle-list stream. Vertices and triangles are appended in
/// order and validated once in [`MeshStream::end`].
#[derive(Debug)]
pub struct MeshStream {
    name: String,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    with_uv: usize,
}

impl MeshStream {
    pub fn begin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
            with_uv: 0,
        }
    }

    pub fn vertex(&mut self, v: &Vertex) -> &mut Self {
        if v.uv.is_some() {
            self.with_uv += 1;
        }
        self.vertices.push(MeshVertex::from(v));
        self
    }

    pub fn triangle(&mut self, [a, b, c]: Triangle) -> &mut Self {
        self.indices.extend_from_slice(&[a, b, c]);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finish the stream and produce immutable mesh data.
    pub fn end(self) -> CoreResult<MeshData> {
        let fail = |reason: String| Err(CoreError::resource_build(&self.name, reason));

        if self.vertices.is_empty() {
            return fail("stream has no vertices".into());
        }
        if self.indices.is_empty() {
            return fail("stream has no triangles".into());
        }
        let count = self.vertices.len();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return fail(format!("index {bad} out of range for {count} vertices"));
        }
        let layout = match self.with_uv {
            0 => VertexLayout::PositionNormalColor,
            n if n == count => VertexLayout::PositionNormalColorUv,
            n => return fail(format!("{n} of {count} vertices carry texture coordinates")),
        };

        Ok(MeshData::new(self.vertices, self.indices, layout))
    }
}

/// Stream `vertices` and `triangles` into a mesh and persist it in `sink`.
pub fn build_mesh(
    sink: &mut dyn MeshSink,
    name: &str,
    vertices: &[Vertex],
    triangles: &[Triangle],
) -> CoreResult<MeshRef> {
    let mut stream = MeshStream::begin(name);
    for v in vertices {
        stream.vertex(v);
    }
    for &t in triangles {
        stream.triangle(t);
    }
    let data = stream.end()?;

    log::debug!(
        "Mesh '{}': {} vertices, {} triangles, {:?}",
        name,
        data.vertices.len(),
        data.triangle_count(),
        data.layout
    );
    sink.persist(name, data)?;
    Ok(MeshRef(name.to_owned()))
}

/// Sample, triangulate and persist a torus.
pub fn build_torus(sink: &mut dyn MeshSink, name: &str, desc: &TorusDesc) -> CoreResult<MeshRef> {
    let vertices = sample_torus(desc)?;
    let triangles = triangulate_torus(desc.rings, desc.slices);
    build_mesh(sink, name, &vertices, &triangles)
}

/// Sample, triangulate and persist a capped cylinder.
pub fn build_cylinder(
    sink: &mut dyn MeshSink,
    name: &str,
    desc: &CylinderDesc,
) -> CoreResult<MeshRef> {
    let vertices = sample_cylinder(desc)?;
    let triangles = triangulate_cylinder(desc.slices);
    build_mesh(sink, name, &vertices, &triangles)
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::registry::MeshRegistry;

    fn plain(x: f32) -> Vertex {
        Vertex::new(Vec3::new(x, 0.0, 0.0), Vec3::Z, Vec3::ONE)
    }

    #[test]
    fn small_torus_end_to_end() {
        let mut registry = MeshRegistry::new();
        let mesh = build_torus(&mut registry, "Torus", &TorusDesc::new(1.0, 0.5, 4, 4)).unwrap();
        assert_eq!(mesh.name(), "Torus");

        let data = registry.get("Torus").unwrap();
        assert_eq!(data.vertices.len(), 16);
        assert_eq!(data.triangle_count(), 32);
        assert!(data.indices.iter().all(|&i| i < 16));
        assert_eq!(data.layout, VertexLayout::PositionNormalColorUv);
    }

    #[test]
    fn torus_without_uv_has_plain_layout() {
        let mut registry = MeshRegistry::new();
        let desc = TorusDesc::new(0.6, 0.2, 90, 30).without_texcoords();
        build_torus(&mut registry, "TorusMesh", &desc).unwrap();
        let data = registry.get("TorusMesh").unwrap();
        assert_eq!(data.layout, VertexLayout::PositionNormalColor);
        assert_eq!(data.vertices.len(), 2700);
    }

    #[test]
    fn cylinder_end_to_end() {
        let mut registry = MeshRegistry::new();
        build_cylinder(&mut registry, "Cylinder", &CylinderDesc::new(-0.5, 1.0, 1.0, 120)).unwrap();
        let data = registry.get("Cylinder").unwrap();
        assert_eq!(data.vertices.len(), 242);
        assert_eq!(data.triangle_count(), 480);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut stream = MeshStream::begin("broken");
        stream.vertex(&plain(0.0)).vertex(&plain(1.0)).triangle([0, 1, 2]);
        let err = stream.end().unwrap_err();
        assert!(matches!(err, CoreError::ResourceBuild { ref name, .. } if name == "broken"));
    }

    #[test]
    fn rejects_empty_streams() {
        assert!(MeshStream::begin("empty").end().is_err());

        let mut stream = MeshStream::begin("points");
        stream.vertex(&plain(0.0));
        assert!(stream.end().is_err());
    }

    #[test]
    fn rejects_mixed_uv_layout() {
        let mut stream = MeshStream::begin("mixed");
        stream
            .vertex(&plain(0.0))
            .vertex(&plain(1.0).with_uv(Vec2::ZERO))
            .vertex(&plain(2.0))
            .triangle([0, 1, 2]);
        assert!(stream.end().is_err());
    }

    #[test]
    fn invalid_topology_is_not_persisted() {
        let mut registry = MeshRegistry::new();
        let err = build_torus(&mut registry, "Bad", &TorusDesc::new(1.0, 0.5, 2, 4)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTopology(_)));
        assert!(registry.get("Bad").is_none());
    }
}
