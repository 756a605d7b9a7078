//! Compound assemblies: one anchor node plus children at fixed relative
//! placements, instancing the same mesh.

use std::marker::PhantomData;

use core_types::{CoreError, CoreResult, MeshCatalog};

use crate::scene::{NodeId, SceneGraph};
use crate::transform::Transform;
use crate::{Vec3, vec3};

/// Logical slot inside a compound.
pub trait Role: Copy + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn slot(self) -> usize;
}

/// Fixed-capacity node table keyed by role.
#[derive(Clone, Debug)]
pub struct RoleSlots<R: Role, const N: usize> {
    slots: [Option<NodeId>; N],
    _role: PhantomData<R>,
}

impl<R: Role, const N: usize> Default for RoleSlots<R, N> {
    fn default() -> Self {
        debug_assert_eq!(R::ALL.len(), N, "role count must match slot capacity");
        Self {
            slots: [None; N],
            _role: PhantomData,
        }
    }
}

impl<R: Role, const N: usize> RoleSlots<R, N> {
    #[inline]
    pub fn get(&self, role: R) -> Option<NodeId> {
        self.slots.get(role.slot()).copied().flatten()
    }

    #[inline]
    fn set(&mut self, role: R, id: NodeId) {
        self.slots[role.slot()] = Some(id);
    }

    /// Filled slots in role order.
    pub fn iter(&self) -> impl Iterator<Item = (R, NodeId)> + '_ {
        R::ALL.iter().filter_map(|&r| self.get(r).map(|id| (r, id)))
    }
}

/// Single-axis turn applied in local space, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Turn {
    None,
    Yaw(f32),
    Roll(f32),
}

/// Where one member of a compound goes. `parent: None` means the anchor
/// node passed to [`assemble`].
#[derive(Clone, Copy, Debug)]
pub struct Placement<R> {
    pub role: R,
    pub name: &'static str,
    pub parent: Option<R>,
    pub offset: Vec3,
    pub scale: Vec3,
    pub turn: Turn,
}

impl<R> Placement<R> {
    pub fn local_transform(&self) -> Transform {
        let t = Transform::identity()
            .scaled(self.scale)
            .translated(self.offset);
        match self.turn {
            Turn::None => t,
            Turn::Yaw(deg) => t.yawed(deg.to_radians()),
            Turn::Roll(deg) => t.rolled(deg.to_radians()),
        }
    }
}

/// Spawn every placement of `blueprint` in order. Parents must precede
/// their children in the blueprint.
pub fn assemble<R: Role, const N: usize>(
    scene: &mut SceneGraph,
    anchor: NodeId,
    mesh: &str,
    material: Option<&str>,
    blueprint: &[Placement<R>],
    catalog: &dyn MeshCatalog,
) -> CoreResult<RoleSlots<R, N>> {
    let mut slots = RoleSlots::<R, N>::default();
    for p in blueprint {
        let parent = match p.parent {
            Some(role) => slots.get(role).ok_or_else(|| {
                CoreError::NodeNotFound(format!("{role:?} (parent of {})", p.name))
            })?,
            None => anchor,
        };
        let id = scene.spawn(parent, p.name, mesh, material, p.local_transform(), catalog)?;
        slots.set(p.role, id);
    }
    log::debug!("Assembled {} nodes from '{}'", blueprint.len(), mesh);
    Ok(slots)
}

/// Members of the cylinder cross.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossRole {
    Trunk,
    LeftHub,
    RightHub,
    LeftRoll,
    LeftYaw,
    RightRoll,
    RightYaw,
}

impl Role for CrossRole {
    const ALL: &'static [Self] = &[
        Self::Trunk,
        Self::LeftHub,
        Self::RightHub,
        Self::LeftRoll,
        Self::LeftYaw,
        Self::RightRoll,
        Self::RightYaw,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

pub type CrossNodes = RoleSlots<CrossRole, 7>;

const ARM_SCALE: Vec3 = vec3(0.5, 0.2, 0.2);
const HUB_SCALE: Vec3 = vec3(0.25, 2.0, 2.0);

/// A long trunk with a hub and two crossed arms at each end.
pub const CYLINDER_CROSS: [Placement<CrossRole>; 7] = [
    Placement {
        role: CrossRole::Trunk,
        name: "Cylinder0",
        parent: None,
        offset: vec3(-2.0, 0.0, -25.0),
        scale: vec3(4.0, 0.25, 0.25),
        turn: Turn::Yaw(-45.0),
    },
    Placement {
        role: CrossRole::LeftHub,
        name: "Cylinder1",
        parent: Some(CrossRole::Trunk),
        offset: vec3(-0.6, 0.0, 0.0),
        scale: HUB_SCALE,
        turn: Turn::None,
    },
    Placement {
        role: CrossRole::RightHub,
        name: "Cylinder2",
        parent: Some(CrossRole::Trunk),
        offset: vec3(0.6, 0.0, 0.0),
        scale: HUB_SCALE,
        turn: Turn::None,
    },
    Placement {
        role: CrossRole::LeftRoll,
        name: "Cylinder3",
        parent: Some(CrossRole::Trunk),
        offset: vec3(-0.7, 0.0, 0.0),
        scale: ARM_SCALE,
        turn: Turn::Roll(90.0),
    },
    Placement {
        role: CrossRole::LeftYaw,
        name: "Cylinder4",
        parent: Some(CrossRole::Trunk),
        offset: vec3(-0.7, 0.0, 0.0),
        scale: ARM_SCALE,
        turn: Turn::Yaw(90.0),
    },
    Placement {
        role: CrossRole::RightRoll,
        name: "Cylinder5",
        parent: Some(CrossRole::Trunk),
        offset: vec3(0.7, 0.0, 0.0),
        scale: ARM_SCALE,
        turn: Turn::Roll(90.0),
    },
    Placement {
        role: CrossRole::RightYaw,
        name: "Cylinder6",
        parent: Some(CrossRole::Trunk),
        offset: vec3(0.7, 0.0, 0.0),
        scale: ARM_SCALE,
        turn: Turn::Yaw(90.0),
    },
];

/// The two tori hung on the cross trunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingRole {
    Right,
    Left,
}

impl Role for RingRole {
    const ALL: &'static [Self] = &[Self::Right, Self::Left];

    fn slot(self) -> usize {
        self as usize
    }
}

pub type RingNodes = RoleSlots<RingRole, 2>;

const RING_SCALE: Vec3 = vec3(0.5, 10.0, 1.0);

pub const RING_PAIR: [Placement<RingRole>; 2] = [
    Placement {
        role: RingRole::Right,
        name: "Torus0",
        parent: None,
        offset: vec3(0.7, 0.0, 0.0),
        scale: RING_SCALE,
        turn: Turn::Yaw(90.0),
    },
    Placement {
        role: RingRole::Left,
        name: "Torus1",
        parent: None,
        offset: vec3(-0.7, 0.0, 0.0),
        scale: RING_SCALE,
        turn: Turn::Yaw(90.0),
    },
];

pub fn assemble_cylinder_cross(
    scene: &mut SceneGraph,
    parent: NodeId,
    mesh: &str,
    material: Option<&str>,
    catalog: &dyn MeshCatalog,
) -> CoreResult<CrossNodes> {
    assemble(scene, parent, mesh, material, &CYLINDER_CROSS, catalog)
}

/// Hang the ring pair under `trunk` (normally the cross trunk).
pub fn assemble_ring_pair(
    scene: &mut SceneGraph,
    trunk: NodeId,
    mesh: &str,
    material: Option<&str>,
    catalog: &dyn MeshCatalog,
) -> CoreResult<RingNodes> {
    assemble(scene, trunk, mesh, material, &RING_PAIR, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AnyMesh;

    impl MeshCatalog for AnyMesh {
        fn contains_mesh(&self, name: &str) -> bool {
            matches!(name, "Cylinder" | "Torus")
        }
    }

    fn build() -> (SceneGraph, CrossNodes, RingNodes) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let cross = assemble_cylinder_cross(&mut scene, root, "Cylinder", None, &AnyMesh).unwrap();
        let trunk = cross.get(CrossRole::Trunk).unwrap();
        let rings = assemble_ring_pair(&mut scene, trunk, "Torus", None, &AnyMesh).unwrap();
        (scene, cross, rings)
    }

    #[test]
    fn cross_has_trunk_and_six_children() {
        let (scene, cross, rings) = build();
        let trunk = cross.get(CrossRole::Trunk).unwrap();
        assert_eq!(cross.iter().count(), 7);
        assert_eq!(rings.iter().count(), 2);
        assert_eq!(scene.parent(trunk), Some(scene.root()));
        // six cylinders plus the two tori
        assert_eq!(scene.children(trunk).len(), 8);
        assert_eq!(scene.name(cross.get(CrossRole::RightYaw).unwrap()), Some("Cylinder6"));
        assert_eq!(scene.name(rings.get(RingRole::Left).unwrap()), Some("Torus1"));
    }

    #[test]
    fn children_sit_at_parent_transformed_offsets() {
        let (scene, cross, _) = build();
        let trunk = cross.get(CrossRole::Trunk).unwrap();
        let trunk_world = scene.world_matrix(trunk).unwrap();

        for p in &CYLINDER_CROSS[1..] {
            let id = cross.get(p.role).unwrap();
            let expected = trunk_world.transform_point3(p.offset);
            let actual = scene.world_position(id).unwrap();
            assert!(actual.abs_diff_eq(expected, 1e-5), "{:?}: {actual:?}", p.role);
        }
    }

    #[test]
    fn left_hub_world_position() {
        let (scene, cross, _) = build();
        // (-0.6, 0, 0) scaled by 4 on x, yawed -45 degrees, moved to (-2, 0, -25).
        let d = 2.4 * std::f32::consts::FRAC_1_SQRT_2;
        let expected = vec3(-2.0 - d, 0.0, -25.0 - d);
        let actual = scene.world_position(cross.get(CrossRole::LeftHub).unwrap()).unwrap();
        assert!(actual.abs_diff_eq(expected, 1e-4), "{actual:?}");
    }

    #[test]
    fn arms_are_turned_in_local_space() {
        let (scene, cross, _) = build();
        let roll = scene.local(cross.get(CrossRole::LeftRoll).unwrap()).unwrap();
        let yaw = scene.local(cross.get(CrossRole::LeftYaw).unwrap()).unwrap();

        assert!((roll.rotation * Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));
        assert!((yaw.rotation * Vec3::X).abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(roll.translation, yaw.translation);
    }

    #[test]
    fn second_assembly_collides_on_names() {
        let (mut scene, _, _) = build();
        let root = scene.root();
        let err = assemble_cylinder_cross(&mut scene, root, "Cylinder", None, &AnyMesh).unwrap_err();
        assert_eq!(err, CoreError::DuplicateEntityName("Cylinder0".into()));
    }

    #[test]
    fn missing_mesh_is_reported() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let err = assemble_ring_pair(&mut scene, root, "Donut", None, &AnyMesh).unwrap_err();
        assert_eq!(err, CoreError::MeshNotFound("Donut".into()));
    }
}
