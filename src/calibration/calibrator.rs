//! Frame calibrator
//!
//! Polls the tracking backend once per tick, creates the geospatial anchor
//! once, and keeps the content offset frame pinned to it until quality has
//! held for the configured scan time.

use crate::calibration::correction::compute_correction;
use crate::calibration::state::{advance, Action, CalibrationState, CalibrationStatus};
use crate::hardware::{AnchorHandle, AnchorRequest, TrackingBackend};
use crate::scene::{ContentOffsetFrame, NodeId, SceneError, SceneGraph, SceneResult};
use crate::utils::config::CalibratorConfig;
use crate::validation::{assess, PoseQualityGate, Readiness};
use crate::CalibrationError;
use nalgebra::Vector3;
use tracing::{debug, info, warn};

/// Callback invoked with the status of every tick until calibration completes
pub type StatusCallback = Box<dyn FnMut(CalibrationStatus)>;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// State after the tick
    pub state: CalibrationState,
    /// Precondition verdict, `None` once calibrated
    pub readiness: Option<Readiness>,
    /// Status published this tick, `None` once calibrated
    pub status: Option<CalibrationStatus>,
    /// Whether the offset frame was written
    pub corrected: bool,
    /// Whether the anchor was created this tick
    pub anchor_created: bool,
}

impl TickReport {
    fn frozen() -> Self {
        Self {
            state: CalibrationState::Calibrated,
            readiness: None,
            status: None,
            corrected: false,
            anchor_created: false,
        }
    }
}

/// Aligns the session's content to a geospatial anchor
pub struct FrameCalibrator {
    config: CalibratorConfig,
    gate: PoseQualityGate,
    offset: ContentOffsetFrame,
    origin: NodeId,
    anchor: Option<AnchorHandle>,
    state: CalibrationState,
    status: Option<CalibrationStatus>,
    on_status: Option<StatusCallback>,
    corrections_applied: u64,
}

impl FrameCalibrator {
    /// Create a calibrator for the content under `attachment`.
    ///
    /// `origin` is the frame used by [`world_to_origin_local`](Self::world_to_origin_local).
    /// Both nodes must exist in `scene`.
    pub fn new(
        config: CalibratorConfig,
        scene: &SceneGraph,
        attachment: NodeId,
        origin: NodeId,
    ) -> Result<Self, CalibrationError> {
        config.validate().into_result()?;

        for node in [attachment, origin] {
            if !scene.contains(node) {
                return Err(SceneError::UnknownNode(node).into());
            }
        }

        Ok(Self {
            gate: config.gate(),
            config,
            offset: ContentOffsetFrame::new(attachment),
            origin,
            anchor: None,
            state: CalibrationState::Idle,
            status: None,
            on_status: None,
            corrections_applied: 0,
        })
    }

    /// Register a status sink
    pub fn on_status<F: FnMut(CalibrationStatus) + 'static>(&mut self, callback: F) {
        self.on_status = Some(Box::new(callback));
    }

    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// Last published status
    pub fn status(&self) -> Option<CalibrationStatus> {
        self.status
    }

    pub fn anchor(&self) -> Option<AnchorHandle> {
        self.anchor
    }

    /// The offset node, once it has been created
    pub fn content_offset(&self) -> Option<NodeId> {
        self.offset.node()
    }

    pub fn origin(&self) -> NodeId {
        self.origin
    }

    pub fn corrections_applied(&self) -> u64 {
        self.corrections_applied
    }

    /// True once the stability window has completed
    pub fn is_alignment_complete(&self) -> bool {
        self.state.is_calibrated()
    }

    /// Express a world direction in the origin frame.
    ///
    /// Returns a value before calibration completes; callers should check
    /// [`is_alignment_complete`](Self::is_alignment_complete) first.
    pub fn world_to_origin_local(&self, scene: &SceneGraph, world: &Vector3<f64>) -> SceneResult<Vector3<f64>> {
        scene.inverse_transform_direction(self.origin, world)
    }

    /// Run one tick at time `now` (seconds, monotonic)
    pub fn tick<B: TrackingBackend + ?Sized>(
        &mut self,
        now: f64,
        backend: &mut B,
        scene: &mut SceneGraph,
    ) -> SceneResult<TickReport> {
        if self.state.is_calibrated() {
            return Ok(TickReport::frozen());
        }

        let readiness = assess(&backend.observe(), &self.gate);
        let mut status = CalibrationStatus::from_readiness(readiness);
        let mut anchor_created = false;
        let mut anchor_pose = None;

        if readiness.is_acceptable() {
            if self.anchor.is_none() {
                self.anchor = backend.create_anchor(&AnchorRequest::at(self.config.target));
                match self.anchor {
                    Some(handle) => {
                        anchor_created = true;
                        info!(anchor = handle.id(), target = ?self.config.target, "Geospatial anchor created");
                    }
                    None => debug!("Anchor creation failed, retrying next tick"),
                }
            }

            if let Some(handle) = self.anchor {
                anchor_pose = backend.anchor_pose(handle);
                if anchor_pose.is_some() {
                    status = CalibrationStatus::Adjusting;
                } else {
                    warn!(anchor = handle.id(), "Anchor pose unavailable");
                }
            }
        }

        let previous = self.state;
        let (next, action) = advance(
            previous,
            anchor_pose.is_some(),
            now,
            self.config.scan_time_s,
            self.config.mode,
        );

        // The scene write is the only fallible step; state is committed after it
        let mut corrected = false;
        match (action, anchor_pose) {
            (Action::Correct, Some(anchor_session)) => {
                let offset = self.offset.ensure(scene)?;
                let current = scene.world_pose(offset)?;
                let anchor_world = current * anchor_session;
                scene.set_world_pose(offset, compute_correction(&anchor_world, &current))?;
                self.corrections_applied += 1;
                corrected = true;
            }
            (Action::Complete, _) => {
                status = CalibrationStatus::Complete;
                info!(
                    corrections = self.corrections_applied,
                    "Calibration complete, content offset frozen"
                );
            }
            _ => {}
        }
        self.state = next;

        match (previous, next) {
            (CalibrationState::Idle, CalibrationState::Scanning { .. }) => {
                info!(now, "Scanning started");
            }
            (CalibrationState::Scanning { window_start: Some(_) }, CalibrationState::Scanning { window_start: None }) => {
                info!(now, ?readiness, "Quality dropped, stability window restarted");
            }
            _ => {}
        }

        debug!(now, ?readiness, state = ?self.state, corrected, "Calibration tick");
        self.publish(status);

        Ok(TickReport {
            state: self.state,
            readiness: Some(readiness),
            status: Some(status),
            corrected,
            anchor_created,
        })
    }

    fn publish(&mut self, status: CalibrationStatus) {
        self.status = Some(status);
        if let Some(callback) = self.on_status.as_mut() {
            callback(status);
        }
    }
}
