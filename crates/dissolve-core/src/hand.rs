//! Hand pose classification and per-frame hand input sources.
//!
//! Both providers, real skeletal tracking and the pointer simulator, produce
//! the same [`HandFrame`] shape so the rest of the pipeline does not care
//! where the hands came from.

use crate::constants::{
    EXTENDED_TIP_DISTANCE, OPEN_MIN_EXTENDED_TIPS, PINCH_DISTANCE, POINTING_INDEX_MIN,
    POINTING_MIDDLE_MAX, SIM_HAND_DEPTH, SIM_HAND_HALF_GAP,
};
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// Discrete pose classification for one hand on one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandState {
    pub position: Vec3,
    pub pinching: bool,
    pub open: bool,
    pub pointing: bool,
}

/// Both hands for one frame. `None` means the hand is not tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandFrame {
    pub left: Option<HandState>,
    pub right: Option<HandState>,
}

impl HandFrame {
    pub fn new(left: Option<HandState>, right: Option<HandState>) -> Self {
        Self { left, right }
    }

    /// Tracked hands, left first.
    pub fn present(&self) -> SmallVec<[HandState; 2]> {
        self.left.iter().chain(self.right.iter()).copied().collect()
    }

    /// Distance between the two hands when both are tracked.
    pub fn separation(&self) -> Option<f32> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some(l.position.distance(r.position)),
            _ => None,
        }
    }
}

/// Joint positions needed for classification. Missing joints are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandJoints {
    pub wrist: Option<Vec3>,
    pub thumb_tip: Option<Vec3>,
    pub index_tip: Option<Vec3>,
    pub middle_tip: Option<Vec3>,
    pub ring_tip: Option<Vec3>,
    pub pinky_tip: Option<Vec3>,
}

/// Classify a hand from its joint positions.
///
/// - position: the wrist, or the origin when the wrist is not tracked
/// - pinching: thumb tip within `PINCH_DISTANCE` of the index tip
/// - open: at least three of the four non-thumb tips farther than
///   `EXTENDED_TIP_DISTANCE` from the hand position
/// - pointing: index tip extended while the middle tip is curled in
pub fn classify_hand(joints: &HandJoints) -> HandState {
    let position = joints.wrist.unwrap_or(Vec3::ZERO);

    let pinching = match (joints.thumb_tip, joints.index_tip) {
        (Some(thumb), Some(index)) => thumb.distance(index) < PINCH_DISTANCE,
        _ => false,
    };

    let extended = [
        joints.index_tip,
        joints.middle_tip,
        joints.ring_tip,
        joints.pinky_tip,
    ]
    .iter()
    .flatten()
    .filter(|tip| position.distance(**tip) > EXTENDED_TIP_DISTANCE)
    .count();
    let open = extended >= OPEN_MIN_EXTENDED_TIPS;

    let pointing = match (joints.index_tip, joints.middle_tip) {
        (Some(index), Some(middle)) => {
            position.distance(index) > POINTING_INDEX_MIN
                && position.distance(middle) < POINTING_MIDDLE_MAX
        }
        _ => false,
    };

    HandState {
        position,
        pinching,
        open,
        pointing,
    }
}

/// A per-frame source of hand classifications.
///
/// `poll` returns `None` when the source has nothing this frame (tracking
/// lost, no session yet). Callers treat that as "no gesture contribution".
pub trait HandInput {
    fn poll(&mut self) -> Option<HandFrame>;
}

impl<T: HandInput + ?Sized> HandInput for Box<T> {
    fn poll(&mut self) -> Option<HandFrame> {
        (**self).poll()
    }
}

/// Always reports no input. Used when no tracking or pointer is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHandInput;

impl HandInput for NoHandInput {
    fn poll(&mut self) -> Option<HandFrame> {
        None
    }
}

/// Skeletal tracking provider. The host pushes the latest joint set per hand
/// each frame; `poll` classifies whatever was pushed and clears it.
#[derive(Clone, Debug, Default)]
pub struct SkeletalHandInput {
    left: Option<HandJoints>,
    right: Option<HandJoints>,
    received: bool,
}

impl SkeletalHandInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_joints(&mut self, hand: Handedness, joints: Option<HandJoints>) {
        match hand {
            Handedness::Left => self.left = joints,
            Handedness::Right => self.right = joints,
        }
        self.received = true;
    }
}

impl HandInput for SkeletalHandInput {
    fn poll(&mut self) -> Option<HandFrame> {
        if !std::mem::take(&mut self.received) {
            return None;
        }
        let left = self.left.take().map(|j| classify_hand(&j));
        let right = self.right.take().map(|j| classify_hand(&j));
        Some(HandFrame { left, right })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer-driven stand-in for hand tracking.
///
/// The pointer position (normalized device coordinates, y up) places two
/// virtual hands either side of the cursor. Holding the primary button makes
/// both hands pinch; holding the secondary button opens them. With no button
/// held there are no hands.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerHandSimulator {
    pub x: f32,
    pub y: f32,
    primary_down: bool,
    secondary_down: bool,
}

impl PointerHandSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from a pointer position in pixels within a `width` x `height` surface.
    pub fn pointer_moved(&mut self, px: f32, py: f32, width: f32, height: f32) {
        let w = width.max(1.0);
        let h = height.max(1.0);
        self.x = (px / w) * 2.0 - 1.0;
        self.y = -(py / h) * 2.0 + 1.0;
    }

    pub fn set_button(&mut self, button: PointerButton, down: bool) {
        match button {
            PointerButton::Primary => self.primary_down = down,
            PointerButton::Secondary => self.secondary_down = down,
        }
    }

    /// Map a DOM/winit-style button index (0 primary, 2 secondary).
    pub fn button_from_index(index: i16) -> Option<PointerButton> {
        match index {
            0 => Some(PointerButton::Primary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }

    pub fn hands(&self) -> HandFrame {
        if !self.primary_down && !self.secondary_down {
            return HandFrame::default();
        }
        let hand_at = |dx: f32| HandState {
            position: Vec3::new(self.x + dx, self.y, SIM_HAND_DEPTH),
            pinching: self.primary_down,
            open: self.secondary_down,
            pointing: !self.primary_down && !self.secondary_down,
        };
        HandFrame {
            left: Some(hand_at(-SIM_HAND_HALF_GAP)),
            right: Some(hand_at(SIM_HAND_HALF_GAP)),
        }
    }
}

impl HandInput for PointerHandSimulator {
    fn poll(&mut self) -> Option<HandFrame> {
        Some(self.hands())
    }
}
