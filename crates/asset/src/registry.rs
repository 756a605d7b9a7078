//! In-process mesh resource registry.

use std::collections::HashMap;

use core_types::{CoreError, CoreResult, MeshCatalog};

use crate::builder::MeshSink;
use crate::mesh::MeshData;

/// Owns every built mesh, keyed by name. Meshes are never replaced.
#[derive(Default)]
pub struct MeshRegistry {
    meshes: HashMap<String, MeshData>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&MeshData> {
        self.meshes.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate over `(name, mesh)` in name order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &MeshData)> {
        let mut entries: Vec<_> = self.meshes.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

impl MeshSink for MeshRegistry {
    fn persist(&mut self, name: &str, data: MeshData) -> CoreResult<()> {
        if name.is_empty() {
            return Err(CoreError::resource_build(name, "mesh name is empty"));
        }
        if self.meshes.contains_key(name) {
            return Err(CoreError::resource_build(name, "a mesh with this name already exists"));
        }
        if !data.is_valid() {
            return Err(CoreError::resource_build(name, "mesh has no geometry"));
        }

        log::info!(
            "Registered mesh '{}' ({} vertices, {} triangles)",
            name,
            data.vertices.len(),
            data.triangle_count()
        );
        self.meshes.insert(name.to_owned(), data);
        Ok(())
    }
}

impl MeshCatalog for MeshRegistry {
    fn contains_mesh(&self, name: &str) -> bool {
        self.meshes.contains_key(name)
    }
}
