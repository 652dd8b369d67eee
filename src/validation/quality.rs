//! Pose quality gate and the per-tick precondition chain

use crate::core::{
    FeatureSupport, PoseQualitySample, TickObservation, DEFAULT_HORIZONTAL_THRESHOLD_M,
    DEFAULT_VERTICAL_THRESHOLD_M,
};
use serde::{Deserialize, Serialize};

/// Decide whether a geospatial pose sample is trustworthy enough to correct with.
///
/// The sample is rejected when tracking is unavailable, or when *both* axes
/// exceed their thresholds. A single axis within threshold is enough to pass.
pub fn is_acceptable(sample: &PoseQualitySample, vertical_threshold_m: f64, horizontal_threshold_m: f64) -> bool {
    if !sample.tracking_available {
        return false;
    }

    let vertical_bad = sample.vertical_accuracy_m > vertical_threshold_m;
    let horizontal_bad = sample.horizontal_accuracy_m > horizontal_threshold_m;

    !(vertical_bad && horizontal_bad)
}

/// Accuracy thresholds for geospatial pose samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseQualityGate {
    pub vertical_threshold_m: f64,
    pub horizontal_threshold_m: f64,
}

impl PoseQualityGate {
    pub fn new(vertical_threshold_m: f64, horizontal_threshold_m: f64) -> Self {
        Self {
            vertical_threshold_m,
            horizontal_threshold_m,
        }
    }

    pub fn is_acceptable(&self, sample: &PoseQualitySample) -> bool {
        is_acceptable(sample, self.vertical_threshold_m, self.horizontal_threshold_m)
    }
}

impl Default for PoseQualityGate {
    fn default() -> Self {
        Self::new(DEFAULT_VERTICAL_THRESHOLD_M, DEFAULT_HORIZONTAL_THRESHOLD_M)
    }
}

/// Outcome of the precondition chain, first failing check wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Running inside an editor; geospatial tracking never starts
    Editor,
    /// AR session not tracking yet
    SessionNotReady,
    /// Device cannot do geospatial tracking
    Unsupported,
    /// Quality gate rejected the latest sample
    LowAccuracy,
    Acceptable,
}

impl Readiness {
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Readiness::Acceptable)
    }
}

/// Run the precondition chain over one tick's observation
pub fn assess(observation: &TickObservation, gate: &PoseQualityGate) -> Readiness {
    if observation.is_editor {
        return Readiness::Editor;
    }

    if !observation.session.is_tracking() {
        return Readiness::SessionNotReady;
    }

    // A pending capability check is not treated as unsupported
    if observation.support == FeatureSupport::Unsupported {
        return Readiness::Unsupported;
    }

    if !gate.is_acceptable(&observation.sample) {
        return Readiness::LowAccuracy;
    }

    Readiness::Acceptable
}
