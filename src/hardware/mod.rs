//! Hardware abstraction layer for the device tracking subsystem
//!
//! The AR session, the geospatial pose provider and the anchor factory are
//! owned by the host platform. This module defines the traits the calibrator
//! polls and a scriptable mock used for testing and the demo driver.

pub mod tracking;
pub mod mock;

pub use tracking::{
    AnchorFactory, AnchorHandle, AnchorRequest, GeospatialProvider, TrackingBackend, TrackingSession,
};
pub use mock::{MockFrame, MockTrackingDevice};
