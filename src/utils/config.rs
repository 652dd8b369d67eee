use crate::calibration::CalibrationMode;
use crate::core::{
    GeospatialTarget, DEFAULT_HORIZONTAL_THRESHOLD_M, DEFAULT_SCAN_TIME_S, DEFAULT_VERTICAL_THRESHOLD_M,
    FOLLOWER_THRESHOLD_M, MAX_SCAN_TIME_S, MIN_SCAN_TIME_S,
};
use crate::validation::PoseQualityGate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Calibrator configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    /// Geodetic position the content anchor is bound to
    pub target: GeospatialTarget,
    /// Vertical accuracy threshold for the quality gate (meters)
    pub vertical_threshold_m: f64,
    /// Horizontal accuracy threshold for the quality gate (meters)
    pub horizontal_threshold_m: f64,
    /// Continuous acceptable quality required before calibration completes (seconds)
    pub scan_time_s: f64,
    /// Whether calibration ever completes
    pub mode: CalibrationMode,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            target: GeospatialTarget::default(),
            vertical_threshold_m: DEFAULT_VERTICAL_THRESHOLD_M,
            horizontal_threshold_m: DEFAULT_HORIZONTAL_THRESHOLD_M,
            scan_time_s: DEFAULT_SCAN_TIME_S,
            mode: CalibrationMode::StabilityWindow,
        }
    }
}

impl CalibratorConfig {
    /// Preset for [`AnchorFollower`](crate::calibration::AnchorFollower),
    /// which tolerates coarser poses than the frame calibrator
    pub fn follower() -> Self {
        Self::default().with_thresholds(FOLLOWER_THRESHOLD_M, FOLLOWER_THRESHOLD_M)
    }

    pub fn with_target(mut self, target: GeospatialTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_scan_time(mut self, scan_time_s: f64) -> Self {
        self.scan_time_s = scan_time_s;
        self
    }

    pub fn with_thresholds(mut self, vertical_threshold_m: f64, horizontal_threshold_m: f64) -> Self {
        self.vertical_threshold_m = vertical_threshold_m;
        self.horizontal_threshold_m = horizontal_threshold_m;
        self
    }

    pub fn with_mode(mut self, mode: CalibrationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Quality gate built from the configured thresholds
    pub fn gate(&self) -> PoseQualityGate {
        PoseQualityGate::new(self.vertical_threshold_m, self.horizontal_threshold_m)
    }

    /// Check every parameter, collecting errors and warnings
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !(self.target.latitude.abs() <= 90.0) {
            errors.push(ConfigError::invalid(
                "target.latitude",
                self.target.latitude,
                "Latitude must be between -90 and 90 degrees",
            ));
        }

        if !(self.target.longitude.abs() <= 180.0) {
            errors.push(ConfigError::invalid(
                "target.longitude",
                self.target.longitude,
                "Longitude must be between -180 and 180 degrees",
            ));
        }

        if !self.target.altitude.is_finite() {
            errors.push(ConfigError::invalid(
                "target.altitude",
                self.target.altitude,
                "Altitude must be finite",
            ));
        } else if self.target.altitude < -500.0 || self.target.altitude > 9000.0 {
            warnings.push(format!(
                "Target altitude {} m is unusual for a ground-level anchor",
                self.target.altitude
            ));
        }

        for (parameter, value) in [
            ("vertical_threshold_m", self.vertical_threshold_m),
            ("horizontal_threshold_m", self.horizontal_threshold_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::invalid(parameter, value, "Accuracy threshold must be positive"));
            } else if value > 50.0 {
                warnings.push(format!("{} of {} m will accept very poor poses", parameter, value));
            }
        }

        if !(self.scan_time_s.is_finite() && self.scan_time_s >= 0.0) {
            errors.push(ConfigError::invalid(
                "scan_time_s",
                self.scan_time_s,
                "Scan time must be a non-negative number of seconds",
            ));
        } else if self.mode == CalibrationMode::StabilityWindow
            && !(MIN_SCAN_TIME_S..=MAX_SCAN_TIME_S).contains(&self.scan_time_s)
        {
            warnings.push(format!(
                "Scan time {} s is outside the usual {}-{} s range",
                self.scan_time_s, MIN_SCAN_TIME_S, MAX_SCAN_TIME_S
            ));
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },

    #[error("I/O error: {message}")]
    IoError { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// First error, if any. Warnings are logged and returned on success.
    pub fn into_result(self) -> Result<Vec<String>, ConfigError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &self.warnings {
            warn!("Configuration warning: {}", warning);
        }
        Ok(self.warnings)
    }
}

/// Holds the active configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct ConfigurationManager {
    config: CalibratorConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager and load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: CalibratorConfig) -> Result<(), ConfigError> {
        config.validate().into_result()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Update the stability window, returning the previous value
    pub fn set_scan_time(&mut self, scan_time_s: f64) -> Result<f64, ConfigError> {
        let old_value = self.config.scan_time_s;
        self.update_config(self.config.clone().with_scan_time(scan_time_s))?;
        Ok(old_value)
    }

    /// Update both accuracy thresholds, returning the previous pair
    pub fn set_thresholds(&mut self, vertical_m: f64, horizontal_m: f64) -> Result<(f64, f64), ConfigError> {
        let old_value = (self.config.vertical_threshold_m, self.config.horizontal_threshold_m);
        self.update_config(self.config.clone().with_thresholds(vertical_m, horizontal_m))?;
        Ok(old_value)
    }

    pub fn set_target(&mut self, target: GeospatialTarget) -> Result<GeospatialTarget, ConfigError> {
        let old_value = self.config.target;
        self.update_config(self.config.clone().with_target(target))?;
        Ok(old_value)
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: CalibratorConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate().into_result()?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the path last loaded from or saved to
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }
}
