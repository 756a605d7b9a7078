//! The demo scene: a cylinder cross carrying two rings, plus a spinning
//! torus at the origin.

use asset::{CylinderDesc, MeshRegistry, TorusDesc, build_cylinder, build_torus};
use core_types::{CoreError, CoreResult};
use corelib::Vec3;
use corelib::animation::{AnimationTrack, KeyframeAnimationBuilder};
use corelib::compound::{CrossNodes, CrossRole, RingNodes, assemble_cylinder_cross, assemble_ring_pair};
use corelib::scene::{NodeId, SceneGraph};
use corelib::transform::Transform;

use crate::config::AppConfig;

pub const CYLINDER_MESH: &str = "Cylinder";
pub const RING_MESH: &str = "Torus";
pub const SPINNER_MESH: &str = "TorusMesh";
pub const SPINNER_ENTITY: &str = "TorusEnt1";

const CYLINDER_MATERIAL: &str = "ShinyTextureMaterial";
const RING_MATERIAL: &str = "ShinyTexture2Material";
const SPINNER_MATERIAL: &str = "ShinyBlueMaterial";

pub struct DemoScene {
    pub meshes: MeshRegistry,
    pub scene: SceneGraph,
    pub cross: CrossNodes,
    pub rings: RingNodes,
    pub spinner: NodeId,
    pub spin: AnimationTrack,
}

pub fn build(cfg: &AppConfig) -> CoreResult<DemoScene> {
    let mut meshes = MeshRegistry::new();
    let mut scene = SceneGraph::new();
    let root = scene.root();

    let c = &cfg.cylinder;
    build_cylinder(
        &mut meshes,
        CYLINDER_MESH,
        &CylinderDesc::new(c.start, c.length, c.radius, c.resolution),
    )?;
    let cross = assemble_cylinder_cross(&mut scene, root, CYLINDER_MESH, Some(CYLINDER_MATERIAL), &meshes)?;

    let t = &cfg.torus;
    let ring_desc = TorusDesc::new(t.loop_radius, t.circle_radius, t.loop_samples, t.circle_samples);
    build_torus(&mut meshes, RING_MESH, &ring_desc)?;
    let trunk = cross
        .get(CrossRole::Trunk)
        .ok_or_else(|| CoreError::NodeNotFound(format!("{:?}", CrossRole::Trunk)))?;
    let rings = assemble_ring_pair(&mut scene, trunk, RING_MESH, Some(RING_MATERIAL), &meshes)?;

    build_torus(&mut meshes, SPINNER_MESH, &ring_desc.without_texcoords())?;
    let spinner = scene.spawn(
        root,
        SPINNER_ENTITY,
        SPINNER_MESH,
        Some(SPINNER_MATERIAL),
        Transform::identity().scaled(Vec3::splat(0.5)),
        &meshes,
    )?;

    let a = &cfg.animation;
    let spin = KeyframeAnimationBuilder::new(Vec3::Y, a.scale).build(spinner, a.duration, a.steps)?;

    log::info!(
        "Scene ready: {} meshes, {} nodes, {} keyframes on '{}'",
        meshes.len(),
        scene.len(),
        spin.keyframes().len(),
        SPINNER_ENTITY
    );

    Ok(DemoScene {
        meshes,
        scene,
        cross,
        rings,
        spinner,
        spin,
    })
}

#[cfg(test)]
mod tests {
    use corelib::compound::RingRole;

    use super::*;

    fn small_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.torus.loop_samples = 8;
        cfg.torus.circle_samples = 6;
        cfg.cylinder.resolution = 12;
        cfg
    }

    #[test]
    fn builds_full_scene() {
        let demo = build(&small_config()).unwrap();
        assert_eq!(demo.meshes.len(), 3);
        // root + 7 cylinders + 2 rings + spinner
        assert_eq!(demo.scene.len(), 11);
        assert_eq!(demo.scene.find(SPINNER_ENTITY), Some(demo.spinner));
        assert_eq!(demo.spin.target(), demo.spinner);
        assert_eq!(demo.spin.keyframes().len(), 36);

        let trunk = demo.cross.get(CrossRole::Trunk).unwrap();
        let ring = demo.rings.get(RingRole::Right).unwrap();
        assert_eq!(demo.scene.parent(ring), Some(trunk));

        let (entity, _) = demo.scene.entity("Torus0").unwrap();
        assert_eq!(entity.mesh, RING_MESH);
        assert_eq!(entity.material.as_deref(), Some(RING_MATERIAL));
    }

    #[test]
    fn spinner_mesh_has_no_texcoords() {
        let demo = build(&small_config()).unwrap();
        let plain = demo.meshes.get(SPINNER_MESH).unwrap();
        let textured = demo.meshes.get(RING_MESH).unwrap();
        assert_eq!(plain.layout, asset::VertexLayout::PositionNormalColor);
        assert_eq!(textured.layout, asset::VertexLayout::PositionNormalColorUv);
        assert_eq!(plain.vertices.len(), 48);
    }

    #[test]
    fn bad_topology_aborts_startup() {
        let mut cfg = small_config();
        cfg.torus.circle_samples = 2;
        assert!(matches!(build(&cfg), Err(CoreError::InvalidTopology(_))));
    }

    #[test]
    fn bad_animation_aborts_startup() {
        let mut cfg = small_config();
        cfg.animation.steps = 1;
        assert!(matches!(build(&cfg), Err(CoreError::InvalidDuration { .. })));
    }
}
