//! Geospatial AR frame calibration
//!
//! Aligns a device's local AR content frame to a real-world geospatial
//! coordinate. A geospatial anchor is created once pose quality is good
//! enough, the content offset frame is pinned to it every tick, and the
//! offset is frozen once quality has held for a sustained scan window.
//! A drawing overlay gates shared stroke input on that completion.

pub mod core;
pub mod hardware;
pub mod validation;
pub mod scene;
pub mod calibration;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{GeospatialTarget, Pose, PoseQualitySample};
pub use hardware::{AnchorFactory, AnchorHandle, AnchorRequest, GeospatialProvider, TrackingBackend, TrackingSession};
pub use validation::{CalibrationError, CalibrationResult, PoseQualityGate, Readiness};
pub use scene::{ContentOffsetFrame, NodeId, SceneError, SceneGraph};
pub use calibration::{
    AnchorFollower, CalibrationMode, CalibrationState, CalibrationStatus, FrameCalibrator, TickReport,
};
pub use api::{DrawingOverlay, InkCanvas, StrokeEvent, StrokeReplicator};
pub use utils::{CalibratorConfig, ConfigError, ConfigurationManager};
