//! Common API types for calibration consumers

use crate::calibration::FrameCalibrator;
use crate::core::Pose;
use crate::scene::{SceneGraph, SceneResult};
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Phase of a touch in its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Cancelled,
}

/// First active touch of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    /// Screen position in pixels
    pub position: Vector2<f64>,
    pub phase: TouchPhase,
}

impl TouchSample {
    pub fn new(x: f64, y: f64, phase: TouchPhase) -> Self {
        Self {
            position: Vector2::new(x, y),
            phase,
        }
    }
}

/// Replicated drawing event. Carries one position in the origin frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrokeEvent {
    /// Start a new ink stroke at the position
    Begin([f64; 3]),
    /// Move the current stroke's head to the position
    Extend([f64; 3]),
}

impl StrokeEvent {
    pub fn position(&self) -> Vector3<f64> {
        let [x, y, z] = match self {
            StrokeEvent::Begin(p) | StrokeEvent::Extend(p) => *p,
        };
        Vector3::new(x, y, z)
    }
}

/// Read access to calibration progress for consumers
pub trait AlignmentSource {
    fn is_alignment_complete(&self) -> bool;

    /// Convert a world direction into the shared origin frame
    fn world_to_origin_local(&self, scene: &SceneGraph, world: &Vector3<f64>) -> SceneResult<Vector3<f64>>;
}

impl AlignmentSource for FrameCalibrator {
    fn is_alignment_complete(&self) -> bool {
        FrameCalibrator::is_alignment_complete(self)
    }

    fn world_to_origin_local(&self, scene: &SceneGraph, world: &Vector3<f64>) -> SceneResult<Vector3<f64>> {
        FrameCalibrator::world_to_origin_local(self, scene, world)
    }
}

/// Projects a screen position at a depth into world space
pub trait ScreenProjector {
    /// `screen` is (x pixels, y pixels, depth meters)
    fn screen_to_world(&self, screen: &Vector3<f64>) -> Vector3<f64>;
}

/// Pinhole camera projector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeProjector {
    /// Camera world pose, looking down its +Z axis
    pub camera: Pose,
    pub focal_px: f64,
    pub principal_point: Vector2<f64>,
}

impl PinholeProjector {
    pub fn new(camera: Pose, focal_px: f64, width_px: f64, height_px: f64) -> Self {
        Self {
            camera,
            focal_px,
            principal_point: Vector2::new(width_px / 2.0, height_px / 2.0),
        }
    }
}

impl ScreenProjector for PinholeProjector {
    fn screen_to_world(&self, screen: &Vector3<f64>) -> Vector3<f64> {
        let depth = screen.z;
        let local = Point3::new(
            (screen.x - self.principal_point.x) / self.focal_px * depth,
            (screen.y - self.principal_point.y) / self.focal_px * depth,
            depth,
        );
        (self.camera * local).coords
    }
}

/// Sends stroke events to every participant, including the sender.
/// Fire-and-forget: no acknowledgement and no ordering beyond the transport's.
pub trait StrokeReplicator {
    fn broadcast(&mut self, event: StrokeEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_projector_center_ray() {
        let projector = PinholeProjector::new(Pose::translation(0.0, 1.5, 0.0), 500.0, 1000.0, 2000.0);
        let world = projector.screen_to_world(&Vector3::new(500.0, 1000.0, 0.5));
        assert_relative_eq!(world, Vector3::new(0.0, 1.5, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_projector_offset_pixel() {
        let projector = PinholeProjector::new(Pose::identity(), 100.0, 200.0, 200.0);
        let world = projector.screen_to_world(&Vector3::new(200.0, 100.0, 2.0));
        assert_relative_eq!(world, Vector3::new(2.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_stroke_event_position() {
        let event = StrokeEvent::Extend([1.0, -2.0, 0.5]);
        assert_eq!(event.position(), Vector3::new(1.0, -2.0, 0.5));
        assert_eq!(
            serde_json::to_string(&StrokeEvent::Begin([0.0, 1.0, 2.0])).unwrap(),
            r#"{"Begin":[0.0,1.0,2.0]}"#
        );
    }
}
