//! Content offset frame bootstrap
//!
//! The offset frame is inserted between the session origin and all of its
//! existing content, so correcting one pose moves everything together.

use crate::core::{Pose, CONTENT_OFFSET_NODE_NAME};
use crate::scene::{NodeId, SceneGraph, SceneResult};
use tracing::debug;

/// Lazily created parent frame for all content under an attachment node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentOffsetFrame {
    attachment: NodeId,
    node: Option<NodeId>,
}

impl ContentOffsetFrame {
    pub fn new(attachment: NodeId) -> Self {
        Self { attachment, node: None }
    }

    pub fn attachment(&self) -> NodeId {
        self.attachment
    }

    /// The offset node, if it has been created
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Return the offset node, creating it on first access.
    ///
    /// On creation every existing child of the attachment is moved under the
    /// new node with its world pose preserved.
    pub fn ensure(&mut self, scene: &mut SceneGraph) -> SceneResult<NodeId> {
        if let Some(node) = self.node {
            return Ok(node);
        }

        let offset = scene.create_child(self.attachment, CONTENT_OFFSET_NODE_NAME, Pose::identity())?;

        let adopted: Vec<NodeId> = scene
            .children(self.attachment)?
            .iter()
            .copied()
            .filter(|&child| child != offset)
            .collect();

        for child in &adopted {
            scene.set_parent(*child, Some(offset), true)?;
        }

        debug!(adopted = adopted.len(), "Created content offset frame");
        self.node = Some(offset);
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pose_from_yaw;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn session_with_content() -> (SceneGraph, NodeId, Vec<NodeId>) {
        let mut scene = SceneGraph::new();
        let origin = scene.create_node("Session Origin", pose_from_yaw(Vector3::new(0.5, 0.0, -1.0), 20.0));
        let camera = scene
            .create_child(origin, "Camera Offset", Pose::translation(0.0, 1.6, 0.0))
            .unwrap();
        let ink = scene
            .create_child(origin, "Ink Parent", pose_from_yaw(Vector3::new(2.0, 0.0, 3.0), -40.0))
            .unwrap();
        (scene, origin, vec![camera, ink])
    }

    #[test]
    fn test_offset_adopts_existing_children() {
        let (mut scene, origin, content) = session_with_content();
        let before: Vec<Pose> = content.iter().map(|&c| scene.world_pose(c).unwrap()).collect();

        let mut frame = ContentOffsetFrame::new(origin);
        let offset = frame.ensure(&mut scene).unwrap();

        assert_eq!(scene.children(origin).unwrap(), &[offset]);
        assert_eq!(scene.children(offset).unwrap(), content.as_slice());
        assert_eq!(scene.name(offset).unwrap(), CONTENT_OFFSET_NODE_NAME);

        for (child, pose) in content.iter().zip(before) {
            assert_relative_eq!(scene.world_pose(*child).unwrap(), pose, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_offset_created_once() {
        let (mut scene, origin, _) = session_with_content();
        let mut frame = ContentOffsetFrame::new(origin);

        let first = frame.ensure(&mut scene).unwrap();
        let node_count = scene.len();

        // Content added later is not adopted by a second access
        let late = scene.create_child(origin, "Late", Pose::identity()).unwrap();
        let second = frame.ensure(&mut scene).unwrap();

        assert_eq!(first, second);
        assert_eq!(scene.len(), node_count + 1);
        assert_eq!(scene.parent(late).unwrap(), Some(origin));
    }

    #[test]
    fn test_offset_on_empty_attachment() {
        let mut scene = SceneGraph::new();
        let origin = scene.create_node("Session Origin", Pose::identity());
        let mut frame = ContentOffsetFrame::new(origin);

        assert!(frame.node().is_none());
        let offset = frame.ensure(&mut scene).unwrap();
        assert_eq!(frame.node(), Some(offset));
        assert!(scene.children(offset).unwrap().is_empty());
    }
}
