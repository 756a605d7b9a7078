//! Core types: math re-exports, Transform, Camera, scene graph and animation.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod animation;
pub mod camera;
pub mod compound;
pub mod scene;
pub mod transform;
