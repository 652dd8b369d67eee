use geoalign::api::{
    DrawingOverlay, InkCanvas, OverlayOutcome, PinholeProjector, RecordingReplicator, TouchPhase, TouchSample,
};
use geoalign::core::{pose_from_yaw, yaw_degrees, Pose};
use geoalign::hardware::MockTrackingDevice;
use geoalign::scene::SceneGraph;
use geoalign::utils::{CalibratorConfig, ConfigurationManager, Scenario};
use geoalign::{CalibrationStatus, FrameCalibrator};
use nalgebra::Vector3;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Synthetic stroke drawn once the overlay unlocks: a short swipe across the
/// lower half of a 1080x2340 screen.
fn scripted_touch(ticks_since_complete: usize) -> Option<TouchSample> {
    let phase = match ticks_since_complete {
        0 => TouchPhase::Began,
        1..=8 => TouchPhase::Moved,
        9 => TouchPhase::Ended,
        _ => return None,
    };
    let x = 340.0 + 50.0 * ticks_since_complete as f64;
    Some(TouchSample::new(x, 1600.0, phase))
}

fn run_scenario(scenario: Scenario) -> Result<(), Box<dyn std::error::Error>> {
    let mut scene = SceneGraph::new();
    let session = scene.create_node("AR Session Origin", Pose::identity());
    let origin = scene.create_child(session, "Origin", Pose::identity())?;
    let ink_parent = scene.create_child(origin, "Ink Parent", Pose::identity())?;

    let mut device = MockTrackingDevice::new();
    let [x, y, z] = scenario.anchor_position;
    device.set_anchor_pose(pose_from_yaw(Vector3::new(x, y, z), scenario.anchor_yaw_deg));
    device.load_script(scenario.frames.iter().cloned());

    let calibrator = Rc::new(RefCell::new(FrameCalibrator::new(
        scenario.config.clone(),
        &scene,
        session,
        origin,
    )?));
    let overlay = DrawingOverlay::builder().alignment(calibrator.clone()).build()?;
    let projector = PinholeProjector::new(Pose::translation(0.0, 1.4, 0.0), 1500.0, 1080.0, 2340.0);
    let mut replicator = RecordingReplicator::new();
    let mut canvas = InkCanvas::new(ink_parent);

    let interval = scenario.tick_interval_s();
    let mut last_status: Option<CalibrationStatus> = None;
    let mut completed_at: Option<usize> = None;
    let mut tick = 0usize;

    while device.advance() {
        let now = tick as f64 * interval;
        let report = calibrator.borrow_mut().tick(now, &mut device, &mut scene)?;

        if let Some(status) = report.status {
            if last_status != Some(status) {
                println!("[{:6.2}s] {}", now, status);
                last_status = Some(status);
            }
            if status == CalibrationStatus::Complete {
                completed_at = Some(tick);
            }
        }

        let touch = completed_at.and_then(|done| scripted_touch(tick - done));
        if let OverlayOutcome::Sent(event) = overlay.update(touch.as_ref(), &scene, &projector, &mut replicator)? {
            tracing::debug!(?event, "Stroke sent");
        }
        for event in replicator.drain() {
            canvas.apply(&mut scene, &event)?;
        }

        tick += 1;
    }

    let calibrator = calibrator.borrow();
    println!();
    println!("Ticks run: {}", tick);
    println!("Alignment complete: {}", calibrator.is_alignment_complete());
    println!("Corrections applied: {}", calibrator.corrections_applied());

    if let Some(offset) = calibrator.content_offset() {
        let pose = scene.world_pose(offset)?;
        let t = pose.translation.vector;
        println!(
            "Content offset: x={:.3} m, y={:.3} m, z={:.3} m, yaw={:.2} deg",
            t.x,
            t.y,
            t.z,
            yaw_degrees(&pose.rotation)
        );
    }
    println!("Strokes replicated: {} events, {} ink nodes", replicator.sent().len(), canvas.stroke_count());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("geoalign", |s| s.as_str());

    match args.get(1).map(|s| s.as_str()) {
        Some("--demo") => {
            let config = match args.get(2) {
                Some(path) => ConfigurationManager::from_file(path)?.config().clone(),
                None => CalibratorConfig::default(),
            };
            run_scenario(Scenario::builtin(config))
        }
        Some("--write-config") if args.len() == 3 => {
            let mut manager = ConfigurationManager::new();
            manager.save_to_file(&args[2])?;
            println!("Default configuration written to {}", args[2]);
            Ok(())
        }
        Some(path) if args.len() == 2 && !path.starts_with("--") => run_scenario(Scenario::load(path)?),
        _ => {
            eprintln!("Usage: {} <scenario.json>", program);
            eprintln!("   or: {} --demo [config.json]", program);
            eprintln!("   or: {} --write-config <config.json>", program);
            Err("Invalid arguments".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_touch_sequence() {
        assert_eq!(scripted_touch(0).map(|t| t.phase), Some(TouchPhase::Began));
        assert_eq!(scripted_touch(4).map(|t| t.phase), Some(TouchPhase::Moved));
        assert_eq!(scripted_touch(9).map(|t| t.phase), Some(TouchPhase::Ended));
        assert!(scripted_touch(10).is_none());
    }

    #[test]
    fn test_builtin_demo_runs() {
        run_scenario(Scenario::builtin(CalibratorConfig::default())).unwrap();
    }
}
