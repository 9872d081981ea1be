//! Gesture-to-parameter mapping.
//!
//! Combines the current [`PhaseState`] with the frame's hand classifications
//! into continuous [`EffectParameters`] for the distortion shader, and decides
//! whether the two-hands-together gesture should toggle pause.

use crate::constants::{OPEN_SPREAD_STEP, PAUSE_HANDS_DISTANCE, PINCH_INTENSITY_GAIN};
use crate::hand::{HandFrame, HandState};
use crate::phase::PhaseState;

/// Continuous shader parameters for one frame. All values are >= 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectParameters {
    pub intensity: f32,
    /// Reserved slot. No gesture drives it yet, so it is always 0.
    pub distortion: f32,
    pub spread: f32,
}

/// When the hands-together gesture toggles pause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PauseTrigger {
    /// Toggle on every frame the hands are together. Holding the gesture
    /// flips pause on and off roughly once per frame.
    #[default]
    Level,
    /// Toggle once when the hands come together; re-arm after they separate
    /// or either hand is lost.
    Edge,
}

/// Output of one mapping step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectMapping {
    pub params: EffectParameters,
    pub toggle_pause: bool,
}

/// Pure parameter mapping.
///
/// Intensity starts at the phase intensity and is multiplied by
/// `PINCH_INTENSITY_GAIN` for each pinching hand; the result is not capped,
/// so two pinching hands compound. Each open hand adds `OPEN_SPREAD_STEP` to
/// spread.
pub fn map_effects(
    phase_intensity: f32,
    left: Option<&HandState>,
    right: Option<&HandState>,
) -> EffectParameters {
    let mut intensity = phase_intensity;
    let mut spread = 0.0;
    for hand in [left, right].into_iter().flatten() {
        if hand.pinching {
            intensity *= PINCH_INTENSITY_GAIN;
        }
        if hand.open {
            spread += OPEN_SPREAD_STEP;
        }
    }
    EffectParameters {
        intensity,
        distortion: 0.0,
        spread,
    }
}

/// True when both hands are tracked and closer than `PAUSE_HANDS_DISTANCE`.
pub fn hands_together(hands: &HandFrame) -> bool {
    hands
        .separation()
        .is_some_and(|d| d < PAUSE_HANDS_DISTANCE)
}

#[derive(Clone, Debug, Default)]
pub struct EffectMapper {
    trigger: PauseTrigger,
    hands_were_together: bool,
}

impl EffectMapper {
    pub fn new(trigger: PauseTrigger) -> Self {
        Self {
            trigger,
            hands_were_together: false,
        }
    }

    pub fn trigger(&self) -> PauseTrigger {
        self.trigger
    }

    pub fn map(&mut self, phase: &PhaseState, hands: &HandFrame) -> EffectMapping {
        let params = map_effects(phase.intensity, hands.left.as_ref(), hands.right.as_ref());
        let together = hands_together(hands);
        let toggle_pause = match self.trigger {
            PauseTrigger::Level => together,
            PauseTrigger::Edge => together && !self.hands_were_together,
        };
        self.hands_were_together = together;
        if toggle_pause {
            log::debug!("[gesture] hands together; toggling pause");
        }
        EffectMapping {
            params,
            toggle_pause,
        }
    }

    /// Forget edge state, e.g. when the experience stops.
    pub fn reset(&mut self) {
        self.hands_were_together = false;
    }
}
