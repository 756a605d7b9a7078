//! Minimal OBJ writer for inspecting generated meshes in external tools.
//! Vertex colors are written as the common `v x y z r g b` extension.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::mesh::{MeshData, VertexLayout};
use crate::registry::MeshRegistry;

/// Write one mesh as OBJ to any [`Write`] implementation.
pub fn write_obj<W: Write>(mut out: W, name: &str, mesh: &MeshData) -> Result<()> {
    let has_uv = mesh.layout == VertexLayout::PositionNormalColorUv;

    writeln!(out, "o {name}")?;
    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        let [r, g, b] = v.color;
        writeln!(out, "v {x} {y} {z} {r} {g} {b}")?;
    }
    if has_uv {
        for v in &mesh.vertices {
            writeln!(out, "vt {} {}", v.uv[0], v.uv[1])?;
        }
    }
    for v in &mesh.vertices {
        let [nx, ny, nz] = v.normal;
        writeln!(out, "vn {nx} {ny} {nz}")?;
    }

    // OBJ indices are 1-based; attribute arrays share the vertex index.
    for t in mesh.triangles() {
        let [a, b, c] = t.map(|i| i + 1);
        if has_uv {
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        } else {
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Convenience helper returning the OBJ text of a mesh.
pub fn obj_to_string(name: &str, mesh: &MeshData) -> Result<String> {
    let mut buf = Vec::new();
    write_obj(&mut buf, name, mesh)?;
    String::from_utf8(buf).context("OBJ output was not UTF-8")
}

/// Dump every registered mesh to `<dir>/<name>.obj`.
pub fn export_registry(registry: &MeshRegistry, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(registry.len());
    for (name, mesh) in registry.iter_sorted() {
        let path = dir.join(format!("{name}.obj"));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create OBJ file: {}", path.display()))?;
        write_obj(BufWriter::new(file), name, mesh)
            .with_context(|| format!("Failed to write mesh '{name}'"))?;
        log::info!("Exported mesh '{}' to {}", name, path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_cylinder, build_torus};
    use crate::sampler::{CylinderDesc, TorusDesc};

    #[test]
    fn writes_textured_torus() {
        let mut registry = MeshRegistry::new();
        build_torus(&mut registry, "Torus", &TorusDesc::new(1.0, 0.5, 4, 4)).unwrap();
        let text = obj_to_string("Torus", registry.get("Torus").unwrap()).unwrap();

        assert!(text.starts_with("o Torus\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 16);
        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 16);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 16);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 32);
        // first triangle (4, 1, 0) shifted to 1-based
        assert!(text.contains("\nf 5/5/5 2/2/2 1/1/1\n"));
    }

    #[test]
    fn writes_plain_faces_without_uv() {
        let mut registry = MeshRegistry::new();
        let desc = TorusDesc::new(1.0, 0.5, 3, 3).without_texcoords();
        build_torus(&mut registry, "Plain", &desc).unwrap();
        let text = obj_to_string("Plain", registry.get("Plain").unwrap()).unwrap();

        assert!(!text.contains("\nvt "));
        assert!(text.contains("\nf 4//4 2//2 1//1\n"));
    }

    #[test]
    fn exports_one_file_per_mesh() {
        let mut registry = MeshRegistry::new();
        build_torus(&mut registry, "Torus", &TorusDesc::new(1.0, 0.5, 4, 4)).unwrap();
        build_cylinder(&mut registry, "Cylinder", &CylinderDesc::new(-0.5, 1.0, 1.0, 8)).unwrap();

        let dir = std::env::temp_dir().join(format!("toroid-obj-{}", std::process::id()));
        let written = export_registry(&registry, &dir).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("Cylinder.obj"));
        assert!(written.iter().all(|p| p.exists()));
        let _ = fs::remove_dir_all(&dir);
    }
}
