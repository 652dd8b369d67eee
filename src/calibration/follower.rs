//! Places a single object at the anchor's live pose

use crate::calibration::state::CalibrationStatus;
use crate::hardware::{AnchorHandle, AnchorRequest, TrackingBackend};
use crate::scene::{NodeId, SceneGraph, SceneResult};
use crate::utils::config::CalibratorConfig;
use crate::validation::{assess, PoseQualityGate};
use tracing::{debug, info};

/// Moves a target node onto the geospatial anchor every usable tick.
///
/// Uses the same precondition chain and anchor lifecycle as the calibrator
/// but has no stability window and never stops following. Anchor poses are
/// in session space; set the session root with
/// [`with_session_root`](Self::with_session_root) when it is not at the
/// world origin. [`CalibratorConfig::follower`] holds the usual thresholds.
pub struct AnchorFollower {
    config: CalibratorConfig,
    gate: PoseQualityGate,
    target: NodeId,
    session_root: Option<NodeId>,
    anchor: Option<AnchorHandle>,
    status: Option<CalibrationStatus>,
}

impl AnchorFollower {
    pub fn new(config: CalibratorConfig, target: NodeId) -> Self {
        Self {
            gate: config.gate(),
            config,
            target,
            session_root: None,
            anchor: None,
            status: None,
        }
    }

    /// Node whose frame anchor poses are reported in
    pub fn with_session_root(mut self, root: NodeId) -> Self {
        self.session_root = Some(root);
        self
    }

    pub fn anchor(&self) -> Option<AnchorHandle> {
        self.anchor
    }

    pub fn status(&self) -> Option<CalibrationStatus> {
        self.status
    }

    /// Run one tick. Returns true if the target was moved.
    pub fn tick<B: TrackingBackend + ?Sized>(&mut self, backend: &mut B, scene: &mut SceneGraph) -> SceneResult<bool> {
        let readiness = assess(&backend.observe(), &self.gate);
        self.status = Some(CalibrationStatus::from_readiness(readiness));
        if !readiness.is_acceptable() {
            return Ok(false);
        }

        if self.anchor.is_none() {
            self.anchor = backend.create_anchor(&AnchorRequest::at(self.config.target));
            if let Some(handle) = self.anchor {
                info!(anchor = handle.id(), "Follower anchor created");
            }
        }

        let Some(session_pose) = self.anchor.and_then(|handle| backend.anchor_pose(handle)) else {
            return Ok(false);
        };

        let pose = match self.session_root {
            Some(root) => scene.world_pose(root)? * session_pose,
            None => session_pose,
        };
        scene.set_world_pose(self.target, pose)?;
        self.status = Some(CalibrationStatus::Adjusting);
        debug!(position = ?pose.translation.vector, "Follower moved to anchor");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{pose_from_yaw, Pose};
    use crate::hardware::MockTrackingDevice;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_follower_tracks_anchor() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("parent", pose_from_yaw(Vector3::new(1.0, 0.0, 0.0), 45.0));
        let object = scene.create_child(parent, "object", Pose::identity()).unwrap();

        let mut device = MockTrackingDevice::new();
        let mut follower = AnchorFollower::new(CalibratorConfig::default(), object);

        let first = pose_from_yaw(Vector3::new(3.0, 0.0, 4.0), 180.0);
        device.set_anchor_pose(first);
        assert!(follower.tick(&mut device, &mut scene).unwrap());
        assert_relative_eq!(scene.world_pose(object).unwrap(), first, epsilon = 1e-12);

        let second = pose_from_yaw(Vector3::new(3.1, 0.0, 3.9), 178.0);
        device.set_anchor_pose(second);
        assert!(follower.tick(&mut device, &mut scene).unwrap());
        assert_relative_eq!(scene.world_pose(object).unwrap(), second, epsilon = 1e-12);

        assert_eq!(device.create_calls(), 1);
        assert_eq!(follower.status(), Some(CalibrationStatus::Adjusting));
    }

    #[test]
    fn test_follower_composes_session_root() {
        let mut scene = SceneGraph::new();
        let root = scene.create_node("Session Origin", pose_from_yaw(Vector3::new(0.0, 0.0, 10.0), 90.0));
        let object = scene.create_node("object", Pose::identity());

        let mut device = MockTrackingDevice::new();
        device.set_anchor_pose(pose_from_yaw(Vector3::new(0.0, 0.0, 2.0), 0.0));
        let mut follower = AnchorFollower::new(CalibratorConfig::follower(), object).with_session_root(root);

        assert!(follower.tick(&mut device, &mut scene).unwrap());

        // Session +Z is world +X after the root's 90 degree yaw
        let world = scene.world_pose(object).unwrap();
        assert_relative_eq!(world.translation.vector, Vector3::new(2.0, 0.0, 10.0), epsilon = 1e-12);
        assert_relative_eq!(world.rotation.angle(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_follower_preset_accepts_coarser_poses() {
        let mut scene = SceneGraph::new();
        let object = scene.create_node("object", Pose::identity());
        let mut device = MockTrackingDevice::new();
        device.set_accuracy(20.0, 20.0);

        let mut strict = AnchorFollower::new(CalibratorConfig::default(), object);
        assert!(!strict.tick(&mut device, &mut scene).unwrap());

        let mut follower = AnchorFollower::new(CalibratorConfig::follower(), object);
        assert!(follower.tick(&mut device, &mut scene).unwrap());
    }

    #[test]
    fn test_follower_holds_on_low_accuracy() {
        let mut scene = SceneGraph::new();
        let object = scene.create_node("object", Pose::identity());
        let mut device = MockTrackingDevice::new();
        device.set_accuracy(50.0, 50.0);
        device.set_anchor_pose(pose_from_yaw(Vector3::new(3.0, 0.0, 4.0), 0.0));

        let mut follower = AnchorFollower::new(CalibratorConfig::default(), object);
        assert!(!follower.tick(&mut device, &mut scene).unwrap());

        assert_eq!(scene.world_pose(object).unwrap(), Pose::identity());
        assert_eq!(follower.status(), Some(CalibrationStatus::LowAccuracy));
        assert!(follower.anchor().is_none());
    }
}
