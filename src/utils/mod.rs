//! Configuration and scripted sessions

pub mod config;
pub mod scenario;

pub use config::{CalibratorConfig, ConfigError, ConfigurationManager, ValidationResult};
pub use scenario::Scenario;
