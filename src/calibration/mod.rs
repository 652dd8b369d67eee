//! Geospatial frame calibration
//!
//! [`FrameCalibrator`] keeps the content offset frame pinned to a geospatial
//! anchor and declares calibration complete once pose quality has held for a
//! sustained window.

pub mod state;
pub mod correction;
pub mod calibrator;
pub mod follower;

pub use state::{advance, Action, CalibrationMode, CalibrationState, CalibrationStatus};
pub use correction::compute_correction;
pub use calibrator::{FrameCalibrator, StatusCallback, TickReport};
pub use follower::AnchorFollower;
