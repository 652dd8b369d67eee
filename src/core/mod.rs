//! Core types and constants for geospatial frame calibration

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
