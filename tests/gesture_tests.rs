// Host-side tests for landmark interpretation.

use glam::Vec3;
use lumina_core::*;

/// A 21-point hand with every fingertip `reach` away from the wrist.
fn hand(wrist: [f32; 2], reach: f32) -> LandmarkFrame {
    let w = Vec3::new(wrist[0], wrist[1], 0.0);
    let mut points = vec![w; LANDMARK_COUNT];
    for (i, &tip) in FINGERTIPS.iter().enumerate() {
        let angle = i as f32 * 0.4 - 0.8;
        // depth must not count toward the spread
        points[tip] = w + Vec3::new(angle.sin(), -angle.cos(), 0.0) * reach + Vec3::Z * 0.7;
    }
    LandmarkFrame::from_points(points)
}

#[test]
fn fully_spread_hand_is_open() {
    let obs = observe(&hand([0.5, 0.5], OPENNESS_MAX_OPEN));
    assert!(obs.is_detected);
    assert!(obs.is_open);
    assert!((obs.openness - 1.0).abs() < 1e-4);
    assert!(obs.rotation_x.abs() < 1e-6);
    assert!(obs.rotation_y.abs() < 1e-6);
}

#[test]
fn fist_is_closed() {
    let obs = observe(&hand([0.5, 0.5], OPENNESS_MIN_CLOSED));
    assert!(obs.is_detected);
    assert!(!obs.is_open);
    assert!(obs.openness.abs() < 1e-4);
}

#[test]
fn partial_spread_maps_linearly() {
    let obs = observe(&hand([0.5, 0.5], 0.3));
    assert!((obs.openness - 0.4).abs() < 1e-4);
    assert!(!obs.is_open);
    let obs = observe(&hand([0.5, 0.5], 0.4));
    assert!((obs.openness - 0.8).abs() < 1e-4);
    assert!(obs.is_open);
}

#[test]
fn spread_beyond_range_is_clamped() {
    assert_eq!(observe(&hand([0.5, 0.5], 2.0)).openness, 1.0);
    assert_eq!(observe(&hand([0.5, 0.5], 0.01)).openness, 0.0);
    assert_eq!(openness_from_spread(-1.0), 0.0);
}

#[test]
fn wrist_position_maps_to_rotation() {
    let obs = observe(&hand([0.75, 0.25], 0.3));
    assert!((obs.rotation_x - 0.5).abs() < 1e-5);
    assert!((obs.rotation_y + 0.5).abs() < 1e-5);

    let obs = observe(&hand([1.6, -0.4], 0.3));
    assert_eq!(obs.rotation_x, 1.0);
    assert_eq!(obs.rotation_y, -1.0);
}

#[test]
fn empty_frame_falls_back() {
    assert_eq!(observe(&LandmarkFrame::empty()), Observation::FALLBACK);
    let fb = Observation::FALLBACK;
    assert!(fb.is_open);
    assert!(!fb.is_detected);
    assert_eq!(fb.openness, 0.5);
}

#[test]
fn short_frame_falls_back() {
    let full = hand([0.5, 0.5], 0.4);
    let short = LandmarkFrame::from_points(full.points.iter().copied().take(20));
    assert_eq!(short.len(), 20);
    assert_eq!(observe(&short), Observation::FALLBACK);
}

#[test]
fn non_finite_landmarks_fall_back() {
    let mut frame = hand([0.5, 0.5], 0.4);
    frame.points[8] = Vec3::new(f32::NAN, 0.0, 0.0);
    assert_eq!(observe(&frame), Observation::FALLBACK);
}

#[test]
fn processor_smooths_into_the_cell() {
    let cell = SignalCell::new();
    let mut processor = GestureProcessor::new(cell.clone());
    assert_eq!(processor.alpha(), SIGNAL_SMOOTHING_ALPHA);

    let raw = processor.process(&hand([0.5, 0.5], OPENNESS_MAX_OPEN));
    assert!((raw.openness - 1.0).abs() < 1e-4);
    let s = cell.snapshot();
    assert!(s.is_detected);
    assert!(s.is_open);
    assert!((s.openness - 0.2).abs() < 1e-4);
}

#[test]
fn processor_alpha_is_clamped() {
    let p = GestureProcessor::with_alpha(SignalCell::new(), 3.0);
    assert_eq!(p.alpha(), 1.0);
}
