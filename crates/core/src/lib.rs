//! Core shared types and errors (renderer-agnostic).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Failed to build mesh '{name}': {reason}")]
    ResourceBuild { name: String, reason: String },

    #[error("Entity '{0}' already exists")]
    DuplicateEntityName(String),

    #[error("Scene node '{0}' already exists")]
    DuplicateNodeName(String),

    #[error("Mesh '{0}' was never built")]
    MeshNotFound(String),

    #[error("Scene node '{0}' not found")]
    NodeNotFound(String),

    #[error("Invalid animation: duration={duration}, steps={steps}")]
    InvalidDuration { duration: f32, steps: usize },

    #[error("Animation axis {0:?} has no direction")]
    InvalidAxis([f32; 3]),

    #[error("Effect code {0} out of range (0..=6)")]
    InvalidEffectCode(u8),
}

impl CoreError {
    pub fn resource_build(name: &str, reason: impl Into<String>) -> Self {
        Self::ResourceBuild {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Read-only view over built mesh resources, keyed by name.
pub trait MeshCatalog {
    fn contains_mesh(&self, name: &str) -> bool;
}
