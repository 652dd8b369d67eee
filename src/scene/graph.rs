//! Minimal rigid-body scene graph
//!
//! Nodes live in an arena and carry a pose relative to their parent. World
//! poses are composed on demand by walking up the parent chain.

use crate::core::Pose;
use crate::scene::{SceneError, SceneResult};
use nalgebra::{Point3, Vector3};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a node inside a [`SceneGraph`].
///
/// Tagged with the graph that issued it; other graphs reject it even when
/// the index is in range. A cloned graph keeps its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Pose,
}

/// Arena scene graph holding rigid transforms
#[derive(Debug, Clone)]
pub struct SceneGraph {
    id: u64,
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// Create a root node with the given world pose
    pub fn create_node(&mut self, name: &str, pose: Pose) -> NodeId {
        let id = NodeId {
            graph: self.id,
            index: self.nodes.len(),
        };
        self.nodes.push(Node {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            local: pose,
        });
        id
    }

    /// Create a node under `parent` with a pose relative to it
    pub fn create_child(&mut self, parent: NodeId, name: &str, local: Pose) -> SceneResult<NodeId> {
        self.node(parent)?;
        let id = self.create_node(name, local);
        self.nodes[id.index].parent = Some(parent);
        self.nodes[parent.index].children.push(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `id` was issued by this graph
    pub fn contains(&self, id: NodeId) -> bool {
        id.graph == self.id && id.index < self.nodes.len()
    }

    pub fn name(&self, id: NodeId) -> SceneResult<&str> {
        Ok(&self.node(id)?.name)
    }

    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children in insertion order
    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// First direct child with the given name
    pub fn find_child(&self, parent: NodeId, name: &str) -> SceneResult<Option<NodeId>> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .copied()
            .find(|child| self.nodes[child.index].name == name))
    }

    pub fn local_pose(&self, id: NodeId) -> SceneResult<Pose> {
        Ok(self.node(id)?.local)
    }

    pub fn set_local_pose(&mut self, id: NodeId, pose: Pose) -> SceneResult<()> {
        self.node_mut(id)?.local = pose;
        Ok(())
    }

    /// Compose the node's pose with all of its ancestors
    pub fn world_pose(&self, id: NodeId) -> SceneResult<Pose> {
        let mut node = self.node(id)?;
        let mut world = node.local;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            world = node.local * world;
        }
        Ok(world)
    }

    /// Place a node at a world pose, adjusting its local pose for the parent
    pub fn set_world_pose(&mut self, id: NodeId, pose: Pose) -> SceneResult<()> {
        let local = match self.node(id)?.parent {
            Some(parent) => self.world_pose(parent)?.inverse() * pose,
            None => pose,
        };
        self.node_mut(id)?.local = local;
        Ok(())
    }

    /// Set only the local translation, keeping the local rotation
    pub fn set_local_position(&mut self, id: NodeId, position: Vector3<f64>) -> SceneResult<()> {
        self.node_mut(id)?.local.translation.vector = position;
        Ok(())
    }

    /// Move `child` under `parent` (or to the root when `None`).
    ///
    /// With `keep_world` the child's world pose is unchanged by the move;
    /// otherwise its local pose is kept and it moves with the new parent.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>, keep_world: bool) -> SceneResult<()> {
        self.node(child)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if self.is_ancestor_or_self(child, parent)? {
                return Err(SceneError::Cycle { child, parent });
            }
        }

        let world = self.world_pose(child)?;

        if let Some(old_parent) = self.nodes[child.index].parent {
            self.nodes[old_parent.index].children.retain(|&c| c != child);
        }

        self.nodes[child.index].parent = parent;
        if let Some(parent) = parent {
            self.nodes[parent.index].children.push(child);
        }

        if keep_world {
            self.set_world_pose(child, world)?;
        }
        Ok(())
    }

    /// Express a world direction in the node's frame (rotation only)
    pub fn inverse_transform_direction(&self, id: NodeId, direction: &Vector3<f64>) -> SceneResult<Vector3<f64>> {
        let world = self.world_pose(id)?;
        Ok(world.rotation.inverse_transform_vector(direction))
    }

    /// Map a point from the node's frame into world space
    pub fn transform_point(&self, id: NodeId, point: &Point3<f64>) -> SceneResult<Point3<f64>> {
        Ok(self.world_pose(id)? * point)
    }

    /// True if `ancestor` is `node` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> SceneResult<bool> {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }

    fn node(&self, id: NodeId) -> SceneResult<&Node> {
        if id.graph != self.id {
            return Err(SceneError::UnknownNode(id));
        }
        self.nodes.get(id.index).ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut Node> {
        if id.graph != self.id {
            return Err(SceneError::UnknownNode(id));
        }
        self.nodes.get_mut(id.index).ok_or(SceneError::UnknownNode(id))
    }
}
