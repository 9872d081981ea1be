// Host-side tests for gesture-to-parameter mapping and the pause gesture.

use dissolve_core::*;
use glam::Vec3;

fn phase_at(intensity: f32) -> PhaseState {
    PhaseState {
        kind: PhaseKind::Peak,
        name: "peak",
        description: "",
        intensity,
        progress: 0.5,
        hue: 0.0,
        time_remaining_sec: 100.0,
    }
}

fn hand(x: f32, pinching: bool, open: bool) -> HandState {
    HandState {
        position: Vec3::new(x, 1.0, -0.5),
        pinching,
        open,
        pointing: false,
    }
}

fn apart_by(d: f32) -> HandFrame {
    HandFrame::new(Some(hand(0.0, false, false)), Some(hand(d, false, false)))
}

#[test]
fn no_hands_passes_phase_intensity_through() {
    let p = map_effects(0.5, None, None);
    assert!((p.intensity - 0.5).abs() < 1e-6);
    assert_eq!(p.spread, 0.0);
    assert_eq!(p.distortion, 0.0);
}

#[test]
fn each_pinching_hand_multiplies_intensity() {
    let pinch = hand(0.0, true, false);
    let one = map_effects(0.5, Some(&pinch), None);
    assert!((one.intensity - 0.75).abs() < 1e-6, "got {}", one.intensity);
    let two = map_effects(0.5, Some(&pinch), Some(&pinch));
    assert!((two.intensity - 1.125).abs() < 1e-6, "compounds without a cap, got {}", two.intensity);
}

#[test]
fn each_open_hand_adds_spread() {
    let open = hand(0.0, false, true);
    assert!((map_effects(0.5, None, Some(&open)).spread - 0.5).abs() < 1e-6);
    let both = map_effects(0.5, Some(&open), Some(&open));
    assert!((both.spread - 1.0).abs() < 1e-6);
    assert!((both.intensity - 0.5).abs() < 1e-6, "open hands leave intensity alone");
}

#[test]
fn distortion_is_never_driven() {
    let h = hand(0.0, true, true);
    let p = map_effects(1.0, Some(&h), Some(&h));
    assert_eq!(p.distortion, 0.0);
}

#[test]
fn level_trigger_toggles_every_frame_hands_are_together() {
    let mut mapper = EffectMapper::new(PauseTrigger::Level);
    let phase = phase_at(0.5);
    for frame in 0..3 {
        assert!(
            mapper.map(&phase, &apart_by(0.15)).toggle_pause,
            "frame {frame} should toggle"
        );
    }
}

#[test]
fn hands_far_apart_never_toggle() {
    let phase = phase_at(0.5);
    for trigger in [PauseTrigger::Level, PauseTrigger::Edge] {
        let mut mapper = EffectMapper::new(trigger);
        for _ in 0..3 {
            assert!(!mapper.map(&phase, &apart_by(0.25)).toggle_pause);
        }
    }
}

#[test]
fn edge_trigger_toggles_once_per_approach() {
    let mut mapper = EffectMapper::new(PauseTrigger::Edge);
    let phase = phase_at(0.5);
    let toggles: Vec<bool> = (0..3)
        .map(|_| mapper.map(&phase, &apart_by(0.1)).toggle_pause)
        .collect();
    assert_eq!(toggles, vec![true, false, false]);

    assert!(!mapper.map(&phase, &apart_by(0.5)).toggle_pause);
    assert!(mapper.map(&phase, &apart_by(0.1)).toggle_pause, "re-armed after separating");
}

#[test]
fn edge_trigger_rearms_when_a_hand_is_lost() {
    let mut mapper = EffectMapper::new(PauseTrigger::Edge);
    let phase = phase_at(0.5);
    assert!(mapper.map(&phase, &apart_by(0.1)).toggle_pause);
    let one_hand = HandFrame::new(Some(hand(0.0, false, false)), None);
    assert!(!mapper.map(&phase, &one_hand).toggle_pause);
    assert!(mapper.map(&phase, &apart_by(0.1)).toggle_pause);
}

#[test]
fn reset_rearms_edge_trigger() {
    let mut mapper = EffectMapper::new(PauseTrigger::Edge);
    let phase = phase_at(0.5);
    mapper.map(&phase, &apart_by(0.1));
    mapper.reset();
    assert!(mapper.map(&phase, &apart_by(0.1)).toggle_pause);
}

#[test]
fn mapper_uses_phase_intensity() {
    let mut mapper = EffectMapper::default();
    assert_eq!(mapper.trigger(), PauseTrigger::Level);
    let pinch = hand(0.0, true, false);
    let m = mapper.map(&phase_at(0.4), &HandFrame::new(Some(pinch), None));
    assert!((m.params.intensity - 0.6).abs() < 1e-6);
}
