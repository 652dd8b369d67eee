//! Core data types for geospatial frame calibration

use nalgebra::{Isometry3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Rigid pose (rotation + translation) of a frame in world space
pub type Pose = Isometry3<f64>;

/// Geodetic target the anchor is bound to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeospatialTarget {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude above the WGS84 ellipsoid in meters
    pub altitude: f64,
}

impl GeospatialTarget {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }
}

impl Default for GeospatialTarget {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Accuracy of the device's current geospatial pose estimate.
///
/// Read fresh from the provider every tick and never stored past it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseQualitySample {
    /// Estimated vertical error (meters)
    pub vertical_accuracy_m: f64,
    /// Estimated horizontal error (meters)
    pub horizontal_accuracy_m: f64,
    /// Whether earth tracking is currently producing poses
    pub tracking_available: bool,
}

impl PoseQualitySample {
    pub fn new(vertical_accuracy_m: f64, horizontal_accuracy_m: f64, tracking_available: bool) -> Self {
        Self {
            vertical_accuracy_m,
            horizontal_accuracy_m,
            tracking_available,
        }
    }

    /// Sample reported while earth tracking is not running
    pub fn unavailable() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, false)
    }
}

/// Readiness of the device's AR tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session, or the session failed to start
    None,
    /// Session running but not yet tracking
    Initializing,
    /// Session actively tracking
    Tracking,
}

impl SessionState {
    pub fn is_tracking(&self) -> bool {
        matches!(self, SessionState::Tracking)
    }
}

/// Answer to the geospatial capability query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSupport {
    /// Capability check still pending
    Unknown,
    Unsupported,
    Supported,
}

/// State of the earth (geospatial) tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarthTrackingState {
    None,
    Limited,
    Tracking,
}

/// Everything the precondition chain needs from one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickObservation {
    pub is_editor: bool,
    pub session: SessionState,
    pub support: FeatureSupport,
    pub sample: PoseQualitySample,
}

/// Build a rotation about the world up (+Y) axis
pub fn yaw_rotation(degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), degrees.to_radians())
}

/// Heading of a rotation about the up axis, from where it sends +Z (degrees)
pub fn yaw_degrees(rotation: &UnitQuaternion<f64>) -> f64 {
    let forward = rotation * Vector3::z();
    forward.x.atan2(forward.z).to_degrees()
}

/// Build a pose from a translation and a yaw angle
pub fn pose_from_yaw(position: Vector3<f64>, yaw_degrees: f64) -> Pose {
    Pose::from_parts(position.into(), yaw_rotation(yaw_degrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_yaw_rotation_half_turn() {
        let rotated = yaw_rotation(180.0) * Vector3::new(0.0, 0.0, 1.0);
        assert_relative_eq!(rotated, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_degrees_roundtrip() {
        assert_relative_eq!(yaw_degrees(&yaw_rotation(35.0)), 35.0, epsilon = 1e-9);
        assert_relative_eq!(yaw_degrees(&yaw_rotation(180.0)).abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unavailable_sample() {
        let sample = PoseQualitySample::unavailable();
        assert!(!sample.tracking_available);
        assert!(sample.vertical_accuracy_m.is_infinite());
    }

    #[test]
    fn test_session_state_tracking() {
        assert!(SessionState::Tracking.is_tracking());
        assert!(!SessionState::Initializing.is_tracking());
        assert!(!SessionState::None.is_tracking());
    }
}
