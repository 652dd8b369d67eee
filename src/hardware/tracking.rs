//! Tracking subsystem interface traits
//!
//! The calibrator never talks to the device directly; it polls these traits
//! once per tick.

use crate::core::{
    yaw_rotation, EarthTrackingState, FeatureSupport, GeospatialTarget, Pose, PoseQualitySample,
    SessionState, TickObservation, ANCHOR_YAW_OFFSET_DEG,
};
use nalgebra::UnitQuaternion;

/// Opaque handle to an anchor owned by the tracking subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(u32);

impl AnchorHandle {
    pub fn new(id: u32) -> Self {
        AnchorHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Parameters for a geospatial anchor creation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorRequest {
    pub target: GeospatialTarget,
    /// Rotation applied to the anchor's east-up-north frame
    pub rotation_offset: UnitQuaternion<f64>,
}

impl AnchorRequest {
    /// Request with the fixed half-turn yaw used for the content anchor
    pub fn at(target: GeospatialTarget) -> Self {
        Self {
            target,
            rotation_offset: yaw_rotation(ANCHOR_YAW_OFFSET_DEG),
        }
    }
}

/// Host session readiness
pub trait TrackingSession {
    /// True when running inside an editor where geospatial tracking never starts
    fn is_editor(&self) -> bool;

    /// Current session tracking state, polled once per tick
    fn session_state(&self) -> SessionState;
}

/// Geospatial pose provider
pub trait GeospatialProvider {
    /// Whether this device supports geospatial tracking
    fn geospatial_support(&self) -> FeatureSupport;

    /// Current earth tracker state
    fn earth_tracking_state(&self) -> EarthTrackingState;

    /// Accuracy of the latest camera geospatial pose.
    /// Only meaningful while earth tracking is `Tracking`.
    fn camera_pose_accuracy(&self) -> (f64, f64);

    /// Latest quality sample, folding in the earth tracking state
    fn camera_pose_quality(&self) -> PoseQualitySample {
        if self.earth_tracking_state() != EarthTrackingState::Tracking {
            return PoseQualitySample::unavailable();
        }
        let (vertical, horizontal) = self.camera_pose_accuracy();
        PoseQualitySample::new(vertical, horizontal, true)
    }
}

/// Anchor factory and live anchor poses
pub trait AnchorFactory {
    /// Create a geospatial anchor. Returns `None` if the subsystem cannot
    /// create one right now.
    fn create_anchor(&mut self, request: &AnchorRequest) -> Option<AnchorHandle>;

    /// Live pose of an anchor in session space. Anchors ride under the
    /// content offset frame like any other trackable, so its world pose is
    /// the offset frame's world pose composed with this one. The tracking
    /// subsystem refines it continuously; `None` if the handle is not known.
    fn anchor_pose(&self, anchor: AnchorHandle) -> Option<Pose>;
}

/// Everything a calibrator needs from the device
pub trait TrackingBackend: TrackingSession + GeospatialProvider + AnchorFactory {
    /// Snapshot the inputs of the precondition chain
    fn observe(&self) -> TickObservation {
        TickObservation {
            is_editor: self.is_editor(),
            session: self.session_state(),
            support: self.geospatial_support(),
            sample: self.camera_pose_quality(),
        }
    }
}

impl<T: TrackingSession + GeospatialProvider + AnchorFactory> TrackingBackend for T {}
