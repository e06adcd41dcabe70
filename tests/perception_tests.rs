// Host-side tests for the capture thread lifecycle.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use glam::Vec3;
use lumina_core::*;

fn open_hand() -> LandmarkFrame {
    let wrist = Vec3::new(0.5, 0.5, 0.0);
    let mut points = vec![wrist; LANDMARK_COUNT];
    for &tip in FINGERTIPS.iter() {
        points[tip] = wrist + Vec3::new(0.0, -OPENNESS_MAX_OPEN, 0.0);
    }
    LandmarkFrame::from_points(points)
}

fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn scripted_frames_reach_the_cell() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 0.5);
    runtime.start(ScriptedSource::new(vec![open_hand(); 10]));
    assert!(wait_for(|| cell.snapshot().openness > 0.99));
    let s = cell.snapshot();
    assert!(s.is_detected);
    assert!(s.is_open);
    runtime.stop();
}

#[test]
fn stop_closes_the_source_and_publishes_fallback() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 1.0);
    let mut source = ScriptedSource::new(vec![open_hand(); 3]);
    let closed = source.close_flag();
    runtime.start(source);
    assert!(wait_for(|| cell.snapshot().is_detected));

    runtime.stop();
    assert!(closed.load(Ordering::SeqCst), "source must be closed when stop returns");
    assert!(!runtime.is_running());
    let s = cell.snapshot();
    assert!(!s.is_detected);
    assert_eq!(s.openness, FALLBACK_OPENNESS);

    // no frame lands after stop
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(cell.snapshot(), s);
}

#[test]
fn stop_is_idempotent() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 0.2);
    runtime.stop();
    assert_eq!(cell.snapshot(), ControlSignal::default());

    runtime.start(ScriptedSource::new(Vec::new()));
    runtime.stop();
    let after = cell.snapshot();
    runtime.stop();
    assert_eq!(cell.snapshot(), after);
}

#[test]
fn unavailable_source_leaves_the_scene_idle() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 0.2);
    runtime.start(UnavailableSource::new("no camera"));
    assert!(wait_for(|| !runtime.is_running()));
    assert!(!cell.snapshot().is_detected);
    runtime.stop();
    assert!(!cell.snapshot().is_detected);
}

#[test]
fn empty_frames_mean_no_hand() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 1.0);
    runtime.start(ScriptedSource::new(vec![open_hand(), LandmarkFrame::empty()]));
    assert!(wait_for(|| {
        let s = cell.snapshot();
        !s.is_detected && s.openness == FALLBACK_OPENNESS
    }));
    runtime.stop();
}

#[test]
fn restart_replaces_the_running_session() {
    let cell = SignalCell::new();
    let mut runtime = PerceptionRuntime::new(cell.clone(), 1.0);
    let mut first = ScriptedSource::new(Vec::new());
    let first_closed = first.close_flag();
    runtime.start(first);
    assert!(runtime.is_running());

    runtime.start(ScriptedSource::new(vec![open_hand()]));
    assert!(first_closed.load(Ordering::SeqCst));
    assert!(wait_for(|| cell.snapshot().is_detected));
    runtime.stop();
}

#[test]
fn dropping_the_runtime_stops_capture() {
    let cell = SignalCell::new();
    let mut source = ScriptedSource::new(Vec::new()).with_interval(Duration::from_millis(1));
    let closed = source.close_flag();
    {
        let mut runtime = PerceptionRuntime::new(cell.clone(), 0.2);
        runtime.start(source);
    }
    assert!(closed.load(Ordering::SeqCst));
}

#[test]
fn errors_render_readably() {
    let e = PerceptionError::Unavailable("no camera".into());
    assert_eq!(e.to_string(), "perception unavailable: no camera");
    let e = SceneError::MissingColor(LayerKind::Ribbon);
    assert!(e.to_string().contains("Ribbon"));
}
