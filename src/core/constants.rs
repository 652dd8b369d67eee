//! Calibration constants and defaults

/// Default vertical accuracy threshold for the quality gate (meters)
pub const DEFAULT_VERTICAL_THRESHOLD_M: f64 = 15.0;

/// Default horizontal accuracy threshold for the quality gate (meters)
pub const DEFAULT_HORIZONTAL_THRESHOLD_M: f64 = 15.0;

/// Accuracy threshold used by the anchor follower on both axes (meters)
pub const FOLLOWER_THRESHOLD_M: f64 = 25.0;

/// Default stability window before calibration is declared complete (seconds)
pub const DEFAULT_SCAN_TIME_S: f64 = 3.0;

/// Accepted range for the stability window (seconds)
pub const MIN_SCAN_TIME_S: f64 = 1.0;
pub const MAX_SCAN_TIME_S: f64 = 10.0;

/// Yaw applied to the geospatial anchor at creation, compensating for the
/// anchor's forward-axis convention (degrees)
pub const ANCHOR_YAW_OFFSET_DEG: f64 = 180.0;

/// Name given to the synthetic content offset node
pub const CONTENT_OFFSET_NODE_NAME: &str = "Content Placement Offset";

/// Depth in front of the camera at which touch input is painted (meters)
pub const PAINT_DEPTH_M: f64 = 0.5;
