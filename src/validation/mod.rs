//! Pose quality validation and error classification

pub mod quality;
pub mod error;

pub use quality::{assess, is_acceptable, PoseQualityGate, Readiness};
pub use error::{CalibrationError, CalibrationResult};
