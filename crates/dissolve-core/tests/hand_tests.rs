// Host-side tests for hand classification and the input providers.

use dissolve_core::*;
use glam::Vec3;

fn tip(x: f32, y: f32, z: f32) -> Option<Vec3> {
    Some(Vec3::new(x, y, z))
}

#[test]
fn extended_fingers_classify_as_open() {
    let joints = HandJoints {
        wrist: tip(0.0, 0.0, 0.0),
        index_tip: tip(0.0, 0.15, 0.0),
        middle_tip: tip(0.0, 0.16, 0.0),
        ring_tip: tip(0.0, 0.15, 0.02),
        pinky_tip: tip(0.0, 0.12, 0.04),
        ..Default::default()
    };
    let hand = classify_hand(&joints);
    assert!(hand.open);
    assert!(!hand.pinching, "no thumb tracked");
    assert!(!hand.pointing, "middle finger is extended");
}

#[test]
fn close_thumb_and_index_classify_as_pinch() {
    let joints = HandJoints {
        wrist: tip(0.0, 0.0, 0.0),
        thumb_tip: tip(0.05, 0.0, 0.0),
        index_tip: tip(0.07, 0.0, 0.0),
        ..Default::default()
    };
    assert!(classify_hand(&joints).pinching);
}

#[test]
fn pinch_threshold_is_strict() {
    let joints = HandJoints {
        thumb_tip: tip(0.0, 0.0, 0.0),
        index_tip: tip(0.03, 0.0, 0.0),
        ..Default::default()
    };
    assert!(!classify_hand(&joints).pinching);
}

#[test]
fn extended_index_with_curled_middle_is_pointing() {
    let joints = HandJoints {
        wrist: tip(0.0, 0.0, 0.0),
        index_tip: tip(0.0, 0.12, 0.0),
        middle_tip: tip(0.0, 0.05, 0.0),
        ring_tip: tip(0.0, 0.05, 0.01),
        pinky_tip: tip(0.0, 0.04, 0.02),
        ..Default::default()
    };
    let hand = classify_hand(&joints);
    assert!(hand.pointing);
    assert!(!hand.open);
}

#[test]
fn missing_tips_do_not_count_toward_open() {
    let joints = HandJoints {
        wrist: tip(0.0, 0.0, 0.0),
        index_tip: tip(0.0, 0.2, 0.0),
        middle_tip: tip(0.0, 0.2, 0.0),
        ..Default::default()
    };
    assert!(!classify_hand(&joints).open);
}

#[test]
fn missing_wrist_places_hand_at_origin() {
    let joints = HandJoints {
        index_tip: tip(0.3, 0.0, 0.0),
        ..Default::default()
    };
    assert_eq!(classify_hand(&joints).position, Vec3::ZERO);
}

#[test]
fn skeletal_input_reports_only_fresh_joints() {
    let mut input = SkeletalHandInput::new();
    assert!(input.poll().is_none());

    input.set_joints(
        Handedness::Left,
        Some(HandJoints {
            wrist: tip(-0.2, 1.2, -0.4),
            ..Default::default()
        }),
    );
    let frame = input.poll().expect("joints were pushed");
    assert_eq!(frame.left.map(|h| h.position), Some(Vec3::new(-0.2, 1.2, -0.4)));
    assert!(frame.right.is_none());
    assert!(input.poll().is_none(), "poll clears what it consumed");
}

#[test]
fn simulator_without_buttons_has_no_hands() {
    let mut sim = PointerHandSimulator::new();
    sim.pointer_moved(100.0, 100.0, 800.0, 600.0);
    assert_eq!(sim.poll(), Some(HandFrame::default()));
}

#[test]
fn simulator_maps_pixels_to_ndc() {
    let mut sim = PointerHandSimulator::new();
    sim.pointer_moved(400.0, 300.0, 800.0, 600.0);
    assert!(sim.x.abs() < 1e-6 && sim.y.abs() < 1e-6);
    sim.pointer_moved(0.0, 0.0, 800.0, 600.0);
    assert!((sim.x + 1.0).abs() < 1e-6);
    assert!((sim.y - 1.0).abs() < 1e-6, "y points up");
}

#[test]
fn simulator_buttons_drive_both_hands() {
    let mut sim = PointerHandSimulator::new();
    sim.pointer_moved(400.0, 300.0, 800.0, 600.0);
    sim.set_button(PointerButton::Primary, true);
    let frame = sim.hands();
    let (left, right) = (frame.left.unwrap(), frame.right.unwrap());
    assert!(left.pinching && right.pinching);
    assert!(!left.open && !right.open);
    assert!((left.position.x + 0.2).abs() < 1e-6);
    assert!((right.position.x - 0.2).abs() < 1e-6);
    assert!((left.position.z + 1.0).abs() < 1e-6);

    sim.set_button(PointerButton::Primary, false);
    sim.set_button(PointerButton::Secondary, true);
    let frame = sim.hands();
    assert!(frame.left.unwrap().open && !frame.left.unwrap().pinching);
}

#[test]
fn simulated_hands_are_never_close_enough_to_pause() {
    let mut sim = PointerHandSimulator::new();
    sim.set_button(PointerButton::Primary, true);
    let frame = sim.hands();
    assert!((frame.separation().unwrap() - 0.4).abs() < 1e-6);
    assert!(!hands_together(&frame));
}

#[test]
fn button_indices_follow_dom_convention() {
    assert_eq!(PointerHandSimulator::button_from_index(0), Some(PointerButton::Primary));
    assert_eq!(PointerHandSimulator::button_from_index(2), Some(PointerButton::Secondary));
    assert_eq!(PointerHandSimulator::button_from_index(1), None);
}

#[test]
fn hand_frame_lists_present_hands_left_first() {
    let l = HandState {
        position: Vec3::X,
        ..Default::default()
    };
    let r = HandState {
        position: Vec3::Y,
        ..Default::default()
    };
    let frame = HandFrame::new(Some(l), Some(r));
    let present = frame.present();
    assert_eq!(present.len(), 2);
    assert_eq!(present[0].position, Vec3::X);
    assert!(HandFrame::new(Some(l), None).separation().is_none());
}
