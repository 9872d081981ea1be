//! Trip phase scheduling.
//!
//! [`TripPhaseScheduler`] walks a cyclic table of [`Phase`]s and turns an
//! injected timestamp into a [`PhaseState`]: the current phase plus eased
//! intensity, progress and hue. It never reads a clock itself; every
//! time-dependent call takes `now_sec`, a monotonic time in seconds supplied
//! by the frame driver.

use crate::constants::{EASE_WINDOW, HUE_SWEEP_PER_PHASE, OSCILLATION_AMPLITUDE};

/// The four named segments of the experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Onset,
    Peak,
    Plateau,
    Comedown,
}

impl PhaseKind {
    pub fn name(self) -> &'static str {
        match self {
            PhaseKind::Onset => "onset",
            PhaseKind::Peak => "peak",
            PhaseKind::Plateau => "plateau",
            PhaseKind::Comedown => "comedown",
        }
    }
}

/// Static configuration for one phase.
///
/// Fields:
/// - `kind`: which segment this is (also provides the display name)
/// - `duration_sec`: how long the phase lasts before advancing
/// - `base_intensity`: target intensity in \[0, 1\] held through the middle of the phase
/// - `description`: short human-readable caption
#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    pub kind: PhaseKind,
    pub duration_sec: f64,
    pub base_intensity: f32,
    pub description: &'static str,
}

impl Phase {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Compiled-in phase table: 15 minutes per full cycle.
pub const TRIP_PHASES: [Phase; 4] = [
    Phase {
        kind: PhaseKind::Onset,
        duration_sec: 180.0,
        base_intensity: 0.3,
        description: "Reality begins to shift",
    },
    Phase {
        kind: PhaseKind::Peak,
        duration_sec: 300.0,
        base_intensity: 1.0,
        description: "Full immersion in the experience",
    },
    Phase {
        kind: PhaseKind::Plateau,
        duration_sec: 240.0,
        base_intensity: 0.9,
        description: "Sustained altered state",
    },
    Phase {
        kind: PhaseKind::Comedown,
        duration_sec: 180.0,
        base_intensity: 0.4,
        description: "Gradual return to baseline",
    },
];

/// Derived view of the scheduler at a given instant. Recomputed on every query.
///
/// `time_remaining_sec` may dip slightly below zero between the frame that
/// crosses a phase boundary and the next `update` that advances the phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseState {
    pub kind: PhaseKind,
    pub name: &'static str,
    pub description: &'static str,
    pub intensity: f32,
    pub progress: f32,
    pub hue: f32,
    pub time_remaining_sec: f64,
}

/// Compact summary for a heads-up display.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseInfo {
    /// 1-based position in the cycle.
    pub current: usize,
    pub total: usize,
    pub name: &'static str,
    pub progress: f32,
    /// Whole seconds, rounded up.
    pub time_remaining_sec: i64,
}

pub struct TripPhaseScheduler {
    phases: Vec<Phase>,
    current_index: usize,
    phase_start_sec: f64,
    // Pause time accumulated inside the current phase, excluded from elapsed.
    paused_in_phase_sec: f64,
    paused_since_sec: Option<f64>,
    active: bool,
}

impl Default for TripPhaseScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TripPhaseScheduler {
    pub fn new() -> Self {
        Self::with_phases(TRIP_PHASES.to_vec())
    }

    pub fn with_phases(phases: Vec<Phase>) -> Self {
        let phases = if phases.is_empty() {
            log::warn!("[phase] empty phase table; falling back to the built-in table");
            TRIP_PHASES.to_vec()
        } else {
            phases
        };
        Self {
            phases,
            current_index: 0,
            phase_start_sec: 0.0,
            paused_in_phase_sec: 0.0,
            paused_since_sec: None,
            active: false,
        }
    }

    pub fn start(&mut self, now_sec: f64) {
        self.current_index = 0;
        self.phase_start_sec = now_sec;
        self.paused_in_phase_sec = 0.0;
        self.paused_since_sec = None;
        self.active = true;
        log::info!("[phase] trip phases started");
    }

    /// Deactivate and clear any pause. A pause still open at `now_sec` is
    /// folded into the paused total so the reported state stays where it
    /// froze.
    pub fn stop(&mut self, now_sec: f64) {
        if let Some(since) = self.paused_since_sec.take() {
            self.paused_in_phase_sec += (now_sec - since).max(0.0);
        }
        if !self.active {
            return;
        }
        self.active = false;
        log::info!("[phase] trip phases stopped");
    }

    /// Toggle pause. Returns the new paused state.
    pub fn pause(&mut self, now_sec: f64) -> bool {
        match self.paused_since_sec.take() {
            Some(since) => {
                self.paused_in_phase_sec += (now_sec - since).max(0.0);
                log::info!("[phase] trip phases resumed");
            }
            None => {
                self.paused_since_sec = Some(now_sec);
                log::info!("[phase] trip phases paused");
            }
        }
        self.is_paused()
    }

    /// Advance the schedule to `now_sec` and return the derived state.
    ///
    /// At most one transition happens per call. While inactive or paused the
    /// state is reported without advancing.
    pub fn update(&mut self, now_sec: f64) -> PhaseState {
        if self.active
            && !self.is_paused()
            && self.elapsed_sec(now_sec) >= self.phases[self.current_index].duration_sec
        {
            self.next_phase(now_sec);
        }
        self.current_phase(now_sec)
    }

    /// Jump straight to `index`. Out-of-range indices are ignored.
    pub fn skip_to_phase(&mut self, index: usize, now_sec: f64) {
        if index >= self.phases.len() {
            return;
        }
        self.current_index = index;
        self.begin_phase(now_sec);
        log::info!("[phase] skipped to phase: {}", self.phases[index].name());
    }

    pub fn current_phase(&self, now_sec: f64) -> PhaseState {
        let phase = &self.phases[self.current_index];
        let elapsed = self.elapsed_sec(now_sec);
        let progress = self.progress_for(elapsed);

        let oscillation = now_sec.sin() as f32 * OSCILLATION_AMPLITUDE;
        let intensity = (self.blended_intensity(progress) + oscillation).clamp(0.0, 1.0);

        let count = self.phases.len() as f32;
        let hue = (self.current_index as f32 / count + progress * HUE_SWEEP_PER_PHASE).rem_euclid(1.0);

        PhaseState {
            kind: phase.kind,
            name: phase.name(),
            description: phase.description,
            intensity,
            progress,
            hue,
            time_remaining_sec: phase.duration_sec - elapsed,
        }
    }

    pub fn phase_info(&self, now_sec: f64) -> PhaseInfo {
        let state = self.current_phase(now_sec);
        PhaseInfo {
            current: self.current_index + 1,
            total: self.phases.len(),
            name: state.name,
            progress: state.progress,
            time_remaining_sec: state.time_remaining_sec.ceil() as i64,
        }
    }

    /// Intensity of the current phase at `progress`, before the oscillation
    /// term: blends in from the previous phase over the first ease window and
    /// out toward the next phase over the last one.
    pub fn blended_intensity(&self, progress: f32) -> f32 {
        let n = self.phases.len();
        let current = self.phases[self.current_index].base_intensity;
        if progress < EASE_WINDOW {
            let prev = self.phases[(self.current_index + n - 1) % n].base_intensity;
            lerp(prev, current, progress / EASE_WINDOW)
        } else if progress > 1.0 - EASE_WINDOW {
            let next = self.phases[(self.current_index + 1) % n].base_intensity;
            lerp(current, next, (progress - (1.0 - EASE_WINDOW)) / EASE_WINDOW)
        } else {
            current
        }
    }

    /// Seconds spent in the current phase, excluding paused time.
    pub fn elapsed_sec(&self, now_sec: f64) -> f64 {
        let until = self.paused_since_sec.unwrap_or(now_sec);
        (until - self.phase_start_sec - self.paused_in_phase_sec).max(0.0)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase_start_sec(&self) -> f64 {
        self.phase_start_sec
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since_sec.is_some()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    fn progress_for(&self, elapsed: f64) -> f32 {
        let duration = self.phases[self.current_index].duration_sec;
        if duration > 0.0 {
            (elapsed / duration).min(1.0) as f32
        } else {
            1.0
        }
    }

    fn next_phase(&mut self, now_sec: f64) {
        self.current_index = (self.current_index + 1) % self.phases.len();
        self.begin_phase(now_sec);
        let phase = &self.phases[self.current_index];
        log::info!("[phase] entering phase: {} - {}", phase.name(), phase.description);
    }

    fn begin_phase(&mut self, now_sec: f64) {
        self.phase_start_sec = now_sec;
        self.paused_in_phase_sec = 0.0;
        if self.paused_since_sec.is_some() {
            self.paused_since_sec = Some(now_sec);
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}
