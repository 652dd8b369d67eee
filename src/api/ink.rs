//! Receiving side of stroke replication

use crate::api::types::{StrokeEvent, StrokeReplicator};
use crate::core::Pose;
use crate::scene::{NodeId, SceneGraph, SceneResult};
use nalgebra::{Translation3, UnitQuaternion};
use std::collections::VecDeque;
use tracing::trace;

/// In-memory replicator. Every broadcast is recorded and queued for local
/// delivery, which stands in for the network loopback to the sender.
#[derive(Debug, Default)]
pub struct RecordingReplicator {
    sent: Vec<StrokeEvent>,
    pending: VecDeque<StrokeEvent>,
}

impl RecordingReplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything broadcast so far, in order
    pub fn sent(&self) -> &[StrokeEvent] {
        &self.sent
    }

    /// Take queued events for delivery
    pub fn drain(&mut self) -> impl Iterator<Item = StrokeEvent> + '_ {
        self.pending.drain(..)
    }
}

impl StrokeReplicator for RecordingReplicator {
    fn broadcast(&mut self, event: StrokeEvent) {
        self.sent.push(event);
        self.pending.push_back(event);
    }
}

/// Materialises replicated strokes as ink nodes under a parent
#[derive(Debug, Clone)]
pub struct InkCanvas {
    ink_parent: NodeId,
    spawned: usize,
}

impl InkCanvas {
    pub fn new(ink_parent: NodeId) -> Self {
        Self { ink_parent, spawned: 0 }
    }

    pub fn ink_parent(&self) -> NodeId {
        self.ink_parent
    }

    /// Number of ink nodes spawned by this canvas
    pub fn stroke_count(&self) -> usize {
        self.spawned
    }

    /// Apply one received event. Returns the ink node touched, if any.
    pub fn apply(&mut self, scene: &mut SceneGraph, event: &StrokeEvent) -> SceneResult<Option<NodeId>> {
        let position = event.position();

        match event {
            StrokeEvent::Begin(_) => {
                let name = format!("Ink {}", self.spawned);
                let ink = scene.create_child(self.ink_parent, &name, Pose::identity())?;
                let world = Pose::from_parts(Translation3::from(position), UnitQuaternion::identity());
                scene.set_world_pose(ink, world)?;
                self.spawned += 1;
                trace!(node = ink.index(), "Ink spawned");
                Ok(Some(ink))
            }
            StrokeEvent::Extend(_) => {
                let Some(&head) = scene.children(self.ink_parent)?.last() else {
                    return Ok(None);
                };
                scene.set_local_position(head, position)?;
                Ok(Some(head))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pose_from_yaw;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_extend_without_ink_is_ignored() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("Ink Parent", Pose::identity());
        let mut canvas = InkCanvas::new(parent);

        let touched = canvas.apply(&mut scene, &StrokeEvent::Extend([1.0, 0.0, 0.0])).unwrap();
        assert_eq!(touched, None);
        assert!(scene.children(parent).unwrap().is_empty());
    }

    #[test]
    fn test_begin_places_ink_in_world() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("Ink Parent", pose_from_yaw(Vector3::new(5.0, 0.0, 0.0), 90.0));
        let mut canvas = InkCanvas::new(parent);

        let ink = canvas
            .apply(&mut scene, &StrokeEvent::Begin([1.0, 2.0, 3.0]))
            .unwrap()
            .unwrap();

        let world = scene.world_pose(ink).unwrap();
        assert_relative_eq!(world.translation.vector, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(world.rotation.angle(), 0.0, epsilon = 1e-12);
        assert_eq!(canvas.stroke_count(), 1);
    }

    #[test]
    fn test_extend_moves_latest_ink_locally() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("Ink Parent", Pose::translation(0.0, 10.0, 0.0));
        let mut canvas = InkCanvas::new(parent);

        let first = canvas.apply(&mut scene, &StrokeEvent::Begin([0.0, 0.0, 0.0])).unwrap();
        let second = canvas.apply(&mut scene, &StrokeEvent::Begin([1.0, 0.0, 0.0])).unwrap();
        let moved = canvas.apply(&mut scene, &StrokeEvent::Extend([2.0, 0.0, 0.0])).unwrap();

        assert_eq!(moved, second);
        let head = second.unwrap();
        assert_relative_eq!(
            scene.local_pose(head).unwrap().translation.vector,
            Vector3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            scene.world_pose(first.unwrap()).unwrap().translation.vector,
            Vector3::new(0.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_recording_replicator_loops_back() {
        let mut replicator = RecordingReplicator::new();
        replicator.broadcast(StrokeEvent::Begin([0.0; 3]));
        replicator.broadcast(StrokeEvent::Extend([1.0; 3]));

        let delivered: Vec<_> = replicator.drain().collect();
        assert_eq!(delivered.len(), 2);
        assert_eq!(replicator.drain().count(), 0);
        assert_eq!(replicator.sent().len(), 2);
    }
}
