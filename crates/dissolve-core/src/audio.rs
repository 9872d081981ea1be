//! Platform-free model of the soundscape: a binaural beat pair plus a bank of
//! Shepard partials, both steered by the current phase.
//!
//! Frontends own the actual oscillators (WebAudio nodes, a cpal callback) and
//! copy the targets computed here onto them once per frame.

use crate::constants::{
    BINAURAL_CARRIER_HZ, BINAURAL_MAX_BEAT_HZ, BINAURAL_SMOOTHING, BINAURAL_START_BEAT_HZ,
    MASTER_GAIN, SHEPARD_BASE_HZ, SHEPARD_GAIN_SCALE, SHEPARD_WOBBLE_DEPTH, SHEPARD_WOBBLE_RATE,
};
use crate::phase::{PhaseKind, PhaseState};

pub const SHEPARD_PARTIALS: usize = SHEPARD_BASE_HZ.len();

/// Beat frequency each phase steers toward, as a function of phase progress.
///
/// - onset: 4 -> 8 Hz (theta)
/// - peak: 8 -> 30 Hz (alpha into beta)
/// - plateau: 30 -> 40 Hz, never above `BINAURAL_MAX_BEAT_HZ`
/// - comedown: 30 -> 8 Hz
pub fn target_beat_hz(kind: PhaseKind, progress: f32) -> f32 {
    match kind {
        PhaseKind::Onset => 4.0 + progress * 4.0,
        PhaseKind::Peak => 8.0 + progress * 22.0,
        PhaseKind::Plateau => (30.0 + progress * 10.0).min(BINAURAL_MAX_BEAT_HZ),
        PhaseKind::Comedown => 30.0 - progress * 22.0,
    }
}

/// Gaussian loudness envelope over the partial index, loudest in the middle octaves.
pub fn shepard_envelope(index: usize) -> f32 {
    let n = SHEPARD_PARTIALS as f32;
    let center = n / 2.0;
    let sigma = n / 4.0;
    let d = index as f32 - center;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShepardPartial {
    pub frequency_hz: f32,
    pub gain: f32,
}

/// Everything an output backend needs for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundscapeFrame {
    pub master_gain: f32,
    pub left_hz: f32,
    pub right_hz: f32,
    pub partials: [ShepardPartial; SHEPARD_PARTIALS],
}

pub struct Soundscape {
    playing: bool,
    // Output clock, restarted on every start.
    time_sec: f64,
    beat_hz: f32,
    master_gain: f32,
    frame: SoundscapeFrame,
}

impl Default for Soundscape {
    fn default() -> Self {
        Self::new()
    }
}

impl Soundscape {
    pub fn new() -> Self {
        Self {
            playing: false,
            time_sec: 0.0,
            beat_hz: BINAURAL_START_BEAT_HZ,
            master_gain: MASTER_GAIN,
            frame: Self::initial_frame(BINAURAL_START_BEAT_HZ, MASTER_GAIN),
        }
    }

    fn initial_frame(beat_hz: f32, master_gain: f32) -> SoundscapeFrame {
        let mut partials = [ShepardPartial::default(); SHEPARD_PARTIALS];
        for (i, p) in partials.iter_mut().enumerate() {
            p.frequency_hz = SHEPARD_BASE_HZ[i];
            p.gain = shepard_envelope(i) * SHEPARD_GAIN_SCALE;
        }
        SoundscapeFrame {
            master_gain,
            left_hz: BINAURAL_CARRIER_HZ,
            right_hz: BINAURAL_CARRIER_HZ + beat_hz,
            partials,
        }
    }

    /// Begin playback. Calling while already playing is a no-op.
    pub fn start(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        self.time_sec = 0.0;
        self.frame = Self::initial_frame(self.beat_hz, self.master_gain);
        log::info!("[audio] soundscape started");
        true
    }

    /// End playback. Calling while stopped is a no-op.
    pub fn stop(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        self.playing = false;
        log::info!("[audio] soundscape stopped");
        true
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_gain = volume.clamp(0.0, 1.0);
        self.frame.master_gain = self.master_gain;
    }

    pub fn beat_hz(&self) -> f32 {
        self.beat_hz
    }

    /// Ease the beat toward the phase target and recompute the partials.
    ///
    /// `dt_sec` advances the output clock that drives the partials' slow
    /// wobble. Does nothing while stopped.
    pub fn update(&mut self, dt_sec: f32, phase: &PhaseState) {
        if !self.playing {
            return;
        }
        self.time_sec += f64::from(dt_sec);
        let target = target_beat_hz(phase.kind, phase.progress);
        self.beat_hz += (target - self.beat_hz) * BINAURAL_SMOOTHING;

        let t = self.time_sec as f32;
        let mut partials = [ShepardPartial::default(); SHEPARD_PARTIALS];
        for (i, p) in partials.iter_mut().enumerate() {
            let wobble = (t * SHEPARD_WOBBLE_RATE + i as f32).sin() * SHEPARD_WOBBLE_DEPTH;
            p.frequency_hz = SHEPARD_BASE_HZ[i] * (1.0 + wobble);
            p.gain = shepard_envelope(i) * SHEPARD_GAIN_SCALE * phase.intensity;
        }
        self.frame = SoundscapeFrame {
            master_gain: self.master_gain,
            left_hz: BINAURAL_CARRIER_HZ,
            right_hz: BINAURAL_CARRIER_HZ + self.beat_hz,
            partials,
        };
    }

    pub fn time_sec(&self) -> f64 {
        self.time_sec
    }

    pub fn frame(&self) -> &SoundscapeFrame {
        &self.frame
    }
}
