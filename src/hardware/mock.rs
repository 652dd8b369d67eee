//! Mock tracking device for testing and development

use crate::core::{pose_from_yaw, yaw_degrees, EarthTrackingState, FeatureSupport, Pose, SessionState};
use crate::hardware::{AnchorFactory, AnchorHandle, AnchorRequest, GeospatialProvider, TrackingSession};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One scripted tick of device state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockFrame {
    pub session: SessionState,
    pub support: FeatureSupport,
    pub earth_tracking: EarthTrackingState,
    pub vertical_accuracy_m: f64,
    pub horizontal_accuracy_m: f64,
    /// Live anchor position reported from this tick on, if it changes
    #[serde(default)]
    pub anchor_position: Option<[f64; 3]>,
    /// Live anchor yaw (degrees) reported from this tick on, if it changes
    #[serde(default)]
    pub anchor_yaw_deg: Option<f64>,
}

impl MockFrame {
    /// Tracking, supported, with the given accuracies
    pub fn tracking(vertical_accuracy_m: f64, horizontal_accuracy_m: f64) -> Self {
        Self {
            session: SessionState::Tracking,
            support: FeatureSupport::Supported,
            earth_tracking: EarthTrackingState::Tracking,
            vertical_accuracy_m,
            horizontal_accuracy_m,
            anchor_position: None,
            anchor_yaw_deg: None,
        }
    }

    /// Session still initializing
    pub fn not_ready() -> Self {
        // Finite so scripts survive a JSON round trip
        Self {
            session: SessionState::Initializing,
            earth_tracking: EarthTrackingState::None,
            ..Self::tracking(1000.0, 1000.0)
        }
    }
}

/// Mock tracking device for testing and development
pub struct MockTrackingDevice {
    editor: bool,
    session: SessionState,
    support: FeatureSupport,
    earth_tracking: EarthTrackingState,
    vertical_accuracy_m: f64,
    horizontal_accuracy_m: f64,
    anchor_pose: Pose,
    anchors: Vec<AnchorRequest>,
    create_calls: u32,
    failures_remaining: u32,
    script: VecDeque<MockFrame>,
}

impl MockTrackingDevice {
    /// Create a device that is tracking with high accuracy
    pub fn new() -> Self {
        Self {
            editor: false,
            session: SessionState::Tracking,
            support: FeatureSupport::Supported,
            earth_tracking: EarthTrackingState::Tracking,
            vertical_accuracy_m: 1.0,
            horizontal_accuracy_m: 1.0,
            anchor_pose: Pose::identity(),
            anchors: Vec::new(),
            create_calls: 0,
            failures_remaining: 0,
            script: VecDeque::new(),
        }
    }

    /// Pretend to run inside an editor
    pub fn set_editor(&mut self, editor: bool) {
        self.editor = editor;
    }

    pub fn set_session_state(&mut self, state: SessionState) {
        self.session = state;
    }

    pub fn set_support(&mut self, support: FeatureSupport) {
        self.support = support;
    }

    pub fn set_earth_tracking(&mut self, state: EarthTrackingState) {
        self.earth_tracking = state;
    }

    pub fn set_accuracy(&mut self, vertical_accuracy_m: f64, horizontal_accuracy_m: f64) {
        self.vertical_accuracy_m = vertical_accuracy_m;
        self.horizontal_accuracy_m = horizontal_accuracy_m;
    }

    /// Set the live session-space pose reported for every anchor
    pub fn set_anchor_pose(&mut self, pose: Pose) {
        self.anchor_pose = pose;
    }

    /// Make the next `count` creation requests return `None`
    pub fn fail_anchor_creation(&mut self, count: u32) {
        self.failures_remaining = count;
    }

    /// Number of creation requests received, successful or not
    pub fn create_calls(&self) -> u32 {
        self.create_calls
    }

    /// Requests that produced an anchor
    pub fn anchors_created(&self) -> &[AnchorRequest] {
        &self.anchors
    }

    /// Queue scripted frames, consumed by `advance`
    pub fn load_script<I: IntoIterator<Item = MockFrame>>(&mut self, frames: I) {
        self.script.extend(frames);
    }

    pub fn queued_frame_count(&self) -> usize {
        self.script.len()
    }

    /// Apply the next scripted frame. Returns false once the script is exhausted.
    pub fn advance(&mut self) -> bool {
        match self.script.pop_front() {
            Some(frame) => {
                self.apply_frame(&frame);
                true
            }
            None => false,
        }
    }

    /// Overwrite the device state with a frame
    pub fn apply_frame(&mut self, frame: &MockFrame) {
        self.session = frame.session;
        self.support = frame.support;
        self.earth_tracking = frame.earth_tracking;
        self.vertical_accuracy_m = frame.vertical_accuracy_m;
        self.horizontal_accuracy_m = frame.horizontal_accuracy_m;

        if frame.anchor_position.is_some() || frame.anchor_yaw_deg.is_some() {
            let current = self.anchor_pose.translation.vector;
            let position = frame
                .anchor_position
                .map(|[x, y, z]| Vector3::new(x, y, z))
                .unwrap_or(current);
            let yaw = frame
                .anchor_yaw_deg
                .unwrap_or_else(|| yaw_degrees(&self.anchor_pose.rotation));
            self.anchor_pose = pose_from_yaw(position, yaw);
        }
    }
}

impl Default for MockTrackingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSession for MockTrackingDevice {
    fn is_editor(&self) -> bool {
        self.editor
    }

    fn session_state(&self) -> SessionState {
        self.session
    }
}

impl GeospatialProvider for MockTrackingDevice {
    fn geospatial_support(&self) -> FeatureSupport {
        self.support
    }

    fn earth_tracking_state(&self) -> EarthTrackingState {
        self.earth_tracking
    }

    fn camera_pose_accuracy(&self) -> (f64, f64) {
        (self.vertical_accuracy_m, self.horizontal_accuracy_m)
    }
}

impl AnchorFactory for MockTrackingDevice {
    fn create_anchor(&mut self, request: &AnchorRequest) -> Option<AnchorHandle> {
        self.create_calls += 1;

        if self.failures_remaining > 0 {
            self.failures_remaining -= 1;
            return None;
        }

        self.anchors.push(*request);
        Some(AnchorHandle::new(self.anchors.len() as u32 - 1))
    }

    fn anchor_pose(&self, anchor: AnchorHandle) -> Option<Pose> {
        if (anchor.id() as usize) < self.anchors.len() {
            Some(self.anchor_pose)
        } else {
            None
        }
    }
}
