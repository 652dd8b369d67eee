//! Scripted calibration sessions for the demo driver

use crate::hardware::MockFrame;
use crate::utils::config::{CalibratorConfig, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A simulated session: configuration, tick rate and per-tick device state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: CalibratorConfig,
    /// Ticks per second of simulated time
    pub tick_rate_hz: f64,
    /// Initial live anchor position in world space
    #[serde(default)]
    pub anchor_position: [f64; 3],
    /// Initial live anchor yaw (degrees)
    #[serde(default)]
    pub anchor_yaw_deg: f64,
    pub frames: Vec<MockFrame>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read scenario '{}': {}", path_str, e),
        })?;

        let scenario: Scenario = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse scenario '{}': {}", path_str, e),
        })?;

        scenario.config.validate().into_result()?;

        if !(scenario.tick_rate_hz.is_finite() && scenario.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "tick_rate_hz".to_string(),
                value: scenario.tick_rate_hz.to_string(),
                reason: "Tick rate must be positive".to_string(),
            });
        }

        Ok(scenario)
    }

    /// Seconds between ticks
    pub fn tick_interval_s(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    /// Built-in session: a few ticks of initialization, a noisy start with
    /// one accuracy dropout, then stable high accuracy
    pub fn builtin(config: CalibratorConfig) -> Self {
        let mut frames = vec![MockFrame::not_ready(); 5];
        frames.extend((0..10).map(|_| MockFrame::tracking(30.0, 40.0)));
        frames.extend((0..20).map(|_| MockFrame::tracking(12.0, 20.0)));
        frames.push(MockFrame::tracking(25.0, 30.0));
        frames.extend((0..120).map(|i| {
            let mut frame = MockFrame::tracking(4.0, 3.0);
            // Anchor pose keeps being refined by the tracker
            let jitter = 0.02 * ((i % 7) as f64 - 3.0);
            frame.anchor_position = Some([3.0 + jitter, -1.2, 8.0 - jitter]);
            frame
        }));

        Self {
            config,
            tick_rate_hz: 30.0,
            anchor_position: [3.0, -1.2, 8.0],
            anchor_yaw_deg: 160.0,
            frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenario() {
        let scenario = Scenario::builtin(CalibratorConfig::default());
        assert_eq!(scenario.frames.len(), 156);
        assert!((scenario.tick_interval_s() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_scenario_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");

        let scenario = Scenario::builtin(CalibratorConfig::default().with_scan_time(2.0));
        fs::write(&path, serde_json::to_string(&scenario).unwrap()).unwrap();

        assert_eq!(Scenario::load(&path).unwrap(), scenario);
    }

    #[test]
    fn test_scenario_rejects_bad_tick_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        fs::write(&path, r#"{ "tick_rate_hz": 0.0, "frames": [] }"#).unwrap();

        assert!(matches!(
            Scenario::load(&path),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
