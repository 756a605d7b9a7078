//! Scene hierarchy: named nodes with local transforms and mesh entities.
//!
//! Nodes live in a dense arena owned by [`SceneGraph`] and are only ever
//! created under an existing parent, so the hierarchy is a tree rooted at
//! [`SceneGraph::root`]. Nothing is removed once created.

use std::collections::HashMap;

use core_types::{CoreError, CoreResult, MeshCatalog};

use crate::transform::Transform;
use crate::{Mat4, Vec3};

pub const ROOT_NODE_NAME: &str = "Root";

/// Node handle (dense index into the arena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Instance of a mesh resource, referenced by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub name: String,
    pub mesh: String,
    pub material: Option<String>,
}

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
    entities: Vec<usize>,
}

pub struct SceneGraph {
    nodes: Vec<Node>,
    node_names: HashMap<String, NodeId>,
    entities: Vec<(Entity, NodeId)>,
    entity_names: HashMap<String, usize>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = Node {
            name: ROOT_NODE_NAME.to_owned(),
            parent: None,
            children: Vec::new(),
            local: Transform::identity(),
            entities: Vec::new(),
        };
        Self {
            nodes: vec![root],
            node_names: HashMap::from([(ROOT_NODE_NAME.to_owned(), NodeId(0))]),
            entities: Vec::new(),
            entity_names: HashMap::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    fn node(&self, id: NodeId) -> CoreResult<&Node> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| CoreError::NodeNotFound(format!("#{}", id.0)))
    }

    /// Create a named child under `parent`.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        name: &str,
        local: Transform,
    ) -> CoreResult<NodeId> {
        self.node(parent)?;
        if self.node_names.contains_key(name) {
            return Err(CoreError::DuplicateNodeName(name.to_owned()));
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.to_owned(),
            parent: Some(parent),
            children: Vec::new(),
            local,
            entities: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        self.node_names.insert(name.to_owned(), id);
        log::debug!("Created node '{}' under '{}'", name, self.nodes[parent.index()].name);
        Ok(id)
    }

    /// Attach a new entity instancing `mesh` to `node`.
    pub fn attach_entity(
        &mut self,
        node: NodeId,
        entity_name: &str,
        mesh: &str,
        material: Option<&str>,
        catalog: &dyn MeshCatalog,
    ) -> CoreResult<()> {
        self.node(node)?;
        self.check_entity(entity_name, mesh, catalog)?;

        let index = self.entities.len();
        self.entities.push((
            Entity {
                name: entity_name.to_owned(),
                mesh: mesh.to_owned(),
                material: material.map(str::to_owned),
            },
            node,
        ));
        self.entity_names.insert(entity_name.to_owned(), index);
        self.nodes[node.index()].entities.push(index);
        Ok(())
    }

    /// Create a node and an entity sharing `name` in one step.
    /// Validates everything up front so a failure leaves the graph untouched.
    pub fn spawn(
        &mut self,
        parent: NodeId,
        name: &str,
        mesh: &str,
        material: Option<&str>,
        local: Transform,
        catalog: &dyn MeshCatalog,
    ) -> CoreResult<NodeId> {
        self.check_entity(name, mesh, catalog)?;
        let id = self.create_child(parent, name, local)?;
        self.attach_entity(id, name, mesh, material, catalog)?;
        Ok(id)
    }

    fn check_entity(&self, entity_name: &str, mesh: &str, catalog: &dyn MeshCatalog) -> CoreResult<()> {
        if self.entity_names.contains_key(entity_name) {
            return Err(CoreError::DuplicateEntityName(entity_name.to_owned()));
        }
        if !catalog.contains_mesh(mesh) {
            return Err(CoreError::MeshNotFound(mesh.to_owned()));
        }
        Ok(())
    }

    #[inline]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    /// Like [`SceneGraph::find`] but reports a missing node as an error.
    pub fn require(&self, name: &str) -> CoreResult<NodeId> {
        self.find(name)
            .ok_or_else(|| CoreError::NodeNotFound(name.to_owned()))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.index()).map(|n| n.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn entity(&self, name: &str) -> Option<(&Entity, NodeId)> {
        self.entity_names
            .get(name)
            .map(|&i| (&self.entities[i].0, self.entities[i].1))
    }

    pub fn entities_of(&self, id: NodeId) -> impl Iterator<Item = &Entity> {
        self.nodes
            .get(id.index())
            .into_iter()
            .flat_map(move |n| n.entities.iter().map(move |&i| &self.entities[i].0))
    }

    #[inline]
    pub fn local(&self, id: NodeId) -> Option<&Transform> {
        self.nodes.get(id.index()).map(|n| &n.local)
    }

    /// Mutable access to a local transform (for animation).
    #[inline]
    pub fn local_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.nodes.get_mut(id.index()).map(|n| &mut n.local)
    }

    /// World matrix: product of local matrices from the root down.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id.index())?;
        let mut m = node.local.matrix();
        while let Some(parent) = node.parent {
            node = &self.nodes[parent.index()];
            m = node.local.matrix() * m;
        }
        Some(m)
    }

    #[inline]
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Iterate over entities with the world matrix of their node.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (Mat4, &Entity)> {
        self.entities.iter().filter_map(move |(entity, node)| {
            self.world_matrix(*node).map(|m| (m, entity))
        })
    }

    /// Depth-first walk from `start`, yielding each node with its depth.
    pub fn walk(&self, start: NodeId) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(start, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            out.push((id, depth));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::vec3;

    struct Meshes(HashSet<&'static str>);

    impl MeshCatalog for Meshes {
        fn contains_mesh(&self, name: &str) -> bool {
            self.0.contains(name)
        }
    }

    fn catalog() -> Meshes {
        Meshes(HashSet::from(["Torus", "Cylinder"]))
    }

    #[test]
    fn spawn_builds_named_hierarchy() {
        let meshes = catalog();
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = scene
            .spawn(root, "A", "Cylinder", None, Transform::identity(), &meshes)
            .unwrap();
        let b = scene
            .spawn(a, "B", "Torus", Some("Shiny"), Transform::identity(), &meshes)
            .unwrap();

        assert_eq!(scene.find("B"), Some(b));
        assert_eq!(scene.parent(b), Some(a));
        assert_eq!(scene.children(root), &[a]);
        let (entity, node) = scene.entity("B").unwrap();
        assert_eq!(node, b);
        assert_eq!(entity.mesh, "Torus");
        assert_eq!(entity.material.as_deref(), Some("Shiny"));
        assert_eq!(scene.walk(root), vec![(root, 0), (a, 1), (b, 2)]);
    }

    #[test]
    fn duplicate_entity_name_is_rejected() {
        let meshes = catalog();
        let mut scene = SceneGraph::new();
        let root = scene.root();
        scene
            .spawn(root, "Ring", "Torus", None, Transform::identity(), &meshes)
            .unwrap();

        let err = scene
            .attach_entity(root, "Ring", "Torus", None, &meshes)
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateEntityName("Ring".into()));

        let err = scene
            .spawn(root, "Ring", "Torus", None, Transform::identity(), &meshes)
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateEntityName("Ring".into()));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn unknown_mesh_leaves_graph_untouched() {
        let meshes = catalog();
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let err = scene
            .spawn(root, "Cube0", "Cube", None, Transform::identity(), &meshes)
            .unwrap_err();
        assert_eq!(err, CoreError::MeshNotFound("Cube".into()));
        assert_eq!(scene.len(), 1);
        assert!(scene.find("Cube0").is_none());
    }

    #[test]
    fn duplicate_node_name_is_rejected() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        scene.create_child(root, "Pivot", Transform::identity()).unwrap();
        let err = scene
            .create_child(root, "Pivot", Transform::identity())
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateNodeName("Pivot".into()));
        assert!(scene.create_child(NodeId(42), "Orphan", Transform::identity()).is_err());
    }

    #[test]
    fn world_transform_composes_parent_first() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let parent = Transform::identity()
            .scaled(vec3(2.0, 2.0, 2.0))
            .translated(vec3(1.0, 0.0, 0.0))
            .yawed(std::f32::consts::FRAC_PI_2);
        let p = scene.create_child(root, "P", parent).unwrap();
        let c = scene
            .create_child(p, "C", Transform::from_translation(vec3(1.0, 0.0, 0.0)))
            .unwrap();

        // +X rotated 90 degrees about Y is -Z, scaled by 2, then shifted by +X.
        let world = scene.world_position(c).unwrap();
        assert!(world.abs_diff_eq(vec3(1.0, 0.0, -2.0), 1e-5), "{world:?}");
        assert_eq!(
            scene.world_matrix(c).unwrap(),
            parent.matrix() * scene.local(c).unwrap().matrix()
        );
    }

    #[test]
    fn renderables_follow_local_edits() {
        let meshes = catalog();
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let n = scene
            .spawn(root, "T", "Torus", None, Transform::identity(), &meshes)
            .unwrap();
        scene.local_mut(n).unwrap().translation = vec3(0.0, 3.0, 0.0);

        let (m, entity) = scene.iter_renderables().next().unwrap();
        assert_eq!(entity.name, "T");
        assert_eq!(m.transform_point3(Vec3::ZERO), vec3(0.0, 3.0, 0.0));
        assert_eq!(scene.entities_of(n).count(), 1);
    }
}
