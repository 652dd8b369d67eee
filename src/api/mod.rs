//! Consumer-facing API
//!
//! A drawing overlay that only accepts input once the frame calibrator has
//! finished, the replication seam that carries strokes between participants,
//! and the ink canvas that materialises them.

pub mod types;
pub mod overlay;
pub mod ink;

pub use types::{
    AlignmentSource, PinholeProjector, ScreenProjector, StrokeEvent, StrokeReplicator, TouchPhase, TouchSample,
};
pub use overlay::{DrawingOverlay, DrawingOverlayBuilder, OverlayOutcome};
pub use ink::{InkCanvas, RecordingReplicator};
