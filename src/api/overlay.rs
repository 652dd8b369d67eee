//! Drawing overlay: turns touch input into replicated strokes once aligned

use crate::api::types::{AlignmentSource, ScreenProjector, StrokeEvent, StrokeReplicator, TouchPhase, TouchSample};
use crate::core::PAINT_DEPTH_M;
use crate::scene::SceneGraph;
use crate::validation::{CalibrationError, CalibrationResult};
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// What the overlay did with a frame's input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayOutcome {
    /// This participant does not own the overlay
    NotOwner,
    /// Alignment incomplete; input dropped
    NotAligned,
    NoInput,
    /// Touch phase that produces no event
    Ignored(TouchPhase),
    Sent(StrokeEvent),
}

/// Builder for [`DrawingOverlay`]
pub struct DrawingOverlayBuilder {
    alignment: Option<Rc<RefCell<dyn AlignmentSource>>>,
    is_local_owner: bool,
    paint_depth_m: f64,
}

impl DrawingOverlayBuilder {
    pub fn new() -> Self {
        Self {
            alignment: None,
            is_local_owner: true,
            paint_depth_m: PAINT_DEPTH_M,
        }
    }

    /// Calibrator whose completion gates input. Required.
    pub fn alignment(mut self, source: Rc<RefCell<dyn AlignmentSource>>) -> Self {
        self.alignment = Some(source);
        self
    }

    /// Whether this participant owns the overlay and may draw
    pub fn local_owner(mut self, is_local_owner: bool) -> Self {
        self.is_local_owner = is_local_owner;
        self
    }

    pub fn paint_depth(mut self, depth_m: f64) -> Self {
        self.paint_depth_m = depth_m;
        self
    }

    pub fn build(self) -> CalibrationResult<DrawingOverlay> {
        let alignment = self.alignment.ok_or_else(|| CalibrationError::MissingReference {
            what: "frame calibrator for drawing overlay".to_string(),
        })?;

        Ok(DrawingOverlay {
            alignment,
            is_local_owner: self.is_local_owner,
            paint_depth_m: self.paint_depth_m,
        })
    }
}

impl Default for DrawingOverlayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared drawing surface input handler
pub struct DrawingOverlay {
    alignment: Rc<RefCell<dyn AlignmentSource>>,
    is_local_owner: bool,
    paint_depth_m: f64,
}

impl DrawingOverlay {
    pub fn builder() -> DrawingOverlayBuilder {
        DrawingOverlayBuilder::new()
    }

    pub fn is_local_owner(&self) -> bool {
        self.is_local_owner
    }

    /// Handle one frame's touch input
    pub fn update<P, R>(
        &self,
        touch: Option<&TouchSample>,
        scene: &SceneGraph,
        projector: &P,
        replicator: &mut R,
    ) -> CalibrationResult<OverlayOutcome>
    where
        P: ScreenProjector + ?Sized,
        R: StrokeReplicator + ?Sized,
    {
        if !self.is_local_owner {
            return Ok(OverlayOutcome::NotOwner);
        }

        let alignment = self.alignment.borrow();
        if !alignment.is_alignment_complete() {
            return Ok(OverlayOutcome::NotAligned);
        }

        let Some(touch) = touch else {
            return Ok(OverlayOutcome::NoInput);
        };

        let screen = Vector3::new(touch.position.x, touch.position.y, self.paint_depth_m);
        let world = projector.screen_to_world(&screen);
        let local = alignment.world_to_origin_local(scene, &world)?;
        let position = [local.x, local.y, local.z];

        let event = match touch.phase {
            TouchPhase::Began => StrokeEvent::Begin(position),
            TouchPhase::Moved | TouchPhase::Stationary => StrokeEvent::Extend(position),
            phase => return Ok(OverlayOutcome::Ignored(phase)),
        };

        trace!(?event, "Broadcasting stroke");
        replicator.broadcast(event);
        Ok(OverlayOutcome::Sent(event))
    }
}
