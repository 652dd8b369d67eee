//! Error classification for calibration setup and consumers

use crate::scene::SceneError;
use crate::utils::config::ConfigError;
use thiserror::Error;

/// Errors raised while wiring up the calibrator and its consumers.
///
/// Runtime conditions such as low accuracy or a failed anchor request are
/// not errors; they are reported through the calibration status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("Missing required reference: {what}")]
    MissingReference { what: String },

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for calibration setup
pub type CalibrationResult<T> = Result<T, CalibrationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    #[test]
    fn test_error_messages() {
        let error = CalibrationError::MissingReference {
            what: "frame calibrator".to_string(),
        };
        assert_eq!(error.to_string(), "Missing required reference: frame calibrator");

        let config: CalibrationError = ConfigError::IoError {
            message: "disk gone".to_string(),
        }
        .into();
        assert_eq!(config.to_string(), "Configuration error: I/O error: disk gone");
    }

    #[test]
    fn test_scene_error_conversion() {
        let mut scene = SceneGraph::new();
        let node = scene.create_node("n", crate::core::Pose::identity());
        let error: CalibrationError = SceneError::Cycle { child: node, parent: node }.into();
        assert!(matches!(error, CalibrationError::Scene(SceneError::Cycle { .. })));
    }
}
