//! Calibration state machine
//!
//! The transition logic is a pure function of the previous state, whether the
//! current tick is usable for correction, and the current time. The
//! calibrator performs the resulting actions.

use crate::validation::Readiness;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether calibration ever completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationMode {
    /// Correct until quality has held for the scan time, then freeze
    StabilityWindow,
    /// Correct on every usable tick, never freeze
    Continuous,
}

/// Calibration progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CalibrationState {
    /// No anchor yet, or no usable tick since start
    Idle,
    /// Anchor exists and corrections are being applied.
    /// `window_start` is `None` after a quality drop until the next usable tick.
    Scanning { window_start: Option<f64> },
    /// Terminal; the offset frame is frozen
    Calibrated,
}

impl CalibrationState {
    pub fn is_calibrated(&self) -> bool {
        matches!(self, CalibrationState::Calibrated)
    }

    /// Seconds of uninterrupted usable quality so far
    pub fn window_elapsed(&self, now: f64) -> Option<f64> {
        match self {
            CalibrationState::Scanning { window_start: Some(start) } => Some(now - start),
            _ => None,
        }
    }
}

/// Human readable status published every tick until calibration completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationStatus {
    Editor,
    SessionNotReady,
    Unsupported,
    LowAccuracy,
    HighAccuracy,
    Adjusting,
    Complete,
}

impl CalibrationStatus {
    /// Status for a tick that failed the precondition chain
    pub fn from_readiness(readiness: Readiness) -> Self {
        match readiness {
            Readiness::Editor => CalibrationStatus::Editor,
            Readiness::SessionNotReady => CalibrationStatus::SessionNotReady,
            Readiness::Unsupported => CalibrationStatus::Unsupported,
            Readiness::LowAccuracy => CalibrationStatus::LowAccuracy,
            Readiness::Acceptable => CalibrationStatus::HighAccuracy,
        }
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CalibrationStatus::Editor => "Running in editor.",
            CalibrationStatus::SessionNotReady => "AR session is not ready.",
            CalibrationStatus::Unsupported => "This device does not support geospatial tracking.",
            CalibrationStatus::LowAccuracy => "Accuracy is low.",
            CalibrationStatus::HighAccuracy => "Accuracy is high.",
            CalibrationStatus::Adjusting => "Adjusting position and rotation.",
            CalibrationStatus::Complete => "Adjustment complete.",
        };
        f.write_str(text)
    }
}

/// What the calibrator must do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the offset frame alone
    Hold,
    /// Recompute and write the correction
    Correct,
    /// Freeze the offset frame and publish completion
    Complete,
}

/// Advance the state machine by one tick.
///
/// `usable` means the precondition chain passed, the anchor exists and its
/// live pose is available.
pub fn advance(
    state: CalibrationState,
    usable: bool,
    now: f64,
    scan_time_s: f64,
    mode: CalibrationMode,
) -> (CalibrationState, Action) {
    match state {
        CalibrationState::Calibrated => (state, Action::Hold),
        CalibrationState::Idle if !usable => (state, Action::Hold),
        CalibrationState::Idle => (
            CalibrationState::Scanning { window_start: Some(now) },
            Action::Correct,
        ),
        CalibrationState::Scanning { .. } if !usable => {
            (CalibrationState::Scanning { window_start: None }, Action::Hold)
        }
        CalibrationState::Scanning { window_start: None } => (
            CalibrationState::Scanning { window_start: Some(now) },
            Action::Correct,
        ),
        CalibrationState::Scanning { window_start: Some(start) } => {
            if mode == CalibrationMode::StabilityWindow && now - start >= scan_time_s {
                (CalibrationState::Calibrated, Action::Complete)
            } else {
                (state, Action::Correct)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN: f64 = 3.0;
    const MODE: CalibrationMode = CalibrationMode::StabilityWindow;

    #[test]
    fn test_idle_waits_for_usable_tick() {
        let (state, action) = advance(CalibrationState::Idle, false, 1.0, SCAN, MODE);
        assert_eq!(state, CalibrationState::Idle);
        assert_eq!(action, Action::Hold);

        let (state, action) = advance(CalibrationState::Idle, true, 1.0, SCAN, MODE);
        assert_eq!(state, CalibrationState::Scanning { window_start: Some(1.0) });
        assert_eq!(action, Action::Correct);
    }

    #[test]
    fn test_completion_at_scan_time() {
        let scanning = CalibrationState::Scanning { window_start: Some(0.0) };

        let (state, action) = advance(scanning, true, 2.9, SCAN, MODE);
        assert_eq!(state, scanning);
        assert_eq!(action, Action::Correct);

        let (state, action) = advance(scanning, true, 3.0, SCAN, MODE);
        assert_eq!(state, CalibrationState::Calibrated);
        assert_eq!(action, Action::Complete);
    }

    #[test]
    fn test_drop_resets_window() {
        let scanning = CalibrationState::Scanning { window_start: Some(0.0) };

        let (state, action) = advance(scanning, false, 2.0, SCAN, MODE);
        assert_eq!(state, CalibrationState::Scanning { window_start: None });
        assert_eq!(action, Action::Hold);

        let (state, action) = advance(state, true, 3.0, SCAN, MODE);
        assert_eq!(state, CalibrationState::Scanning { window_start: Some(3.0) });
        assert_eq!(action, Action::Correct);
    }

    #[test]
    fn test_calibrated_is_terminal() {
        for usable in [true, false] {
            let (state, action) = advance(CalibrationState::Calibrated, usable, 100.0, SCAN, MODE);
            assert_eq!(state, CalibrationState::Calibrated);
            assert_eq!(action, Action::Hold);
        }
    }

    #[test]
    fn test_continuous_mode_never_completes() {
        let scanning = CalibrationState::Scanning { window_start: Some(0.0) };
        let (state, action) = advance(scanning, true, 1e6, SCAN, CalibrationMode::Continuous);
        assert_eq!(state, scanning);
        assert_eq!(action, Action::Correct);
    }

    #[test]
    fn test_zero_scan_time_corrects_once() {
        let (state, action) = advance(CalibrationState::Idle, true, 0.0, 0.0, MODE);
        assert_eq!(action, Action::Correct);

        let (state, action) = advance(state, true, 0.1, 0.0, MODE);
        assert_eq!(state, CalibrationState::Calibrated);
        assert_eq!(action, Action::Complete);
    }

    #[test]
    fn test_window_elapsed() {
        let scanning = CalibrationState::Scanning { window_start: Some(1.5) };
        assert_eq!(scanning.window_elapsed(4.0), Some(2.5));
        assert_eq!(CalibrationState::Scanning { window_start: None }.window_elapsed(4.0), None);
        assert_eq!(CalibrationState::Idle.window_elapsed(4.0), None);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(CalibrationStatus::LowAccuracy.to_string(), "Accuracy is low.");
        assert_eq!(CalibrationStatus::Complete.to_string(), "Adjustment complete.");
        assert_eq!(
            CalibrationStatus::from_readiness(Readiness::SessionNotReady),
            CalibrationStatus::SessionNotReady
        );
    }
}
