//! Procedural mesh assets.
//! Sampling (torus, cylinder), triangulation, mesh streams and the mesh
//! registry that owns built resources. OBJ export for inspection.

pub mod builder;
pub mod mesh;
pub mod obj;
pub mod registry;
pub mod sampler;
pub mod triangulate;

pub use builder::{MeshRef, MeshSink, MeshStream, build_cylinder, build_mesh, build_torus};
pub use mesh::{MeshData, MeshVertex, Triangle, Vertex, VertexLayout};
pub use registry::MeshRegistry;
pub use sampler::{CylinderDesc, TorusDesc};
