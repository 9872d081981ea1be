//! Per-frame orchestration.
//!
//! [`Experience::tick`] is the deterministic heart of the loop: given a
//! timestamp and the frame's hands it advances the phase schedule, maps
//! gestures to effect parameters and applies the pause gesture.
//! [`FrameDriver`] is the thin layer around it that owns the clock and the
//! input source and forwards results to the presentation [`Sinks`].

use crate::audio::Soundscape;
use crate::constants::{DEFAULT_FRACTAL_SEED, TRAIL_LIFETIME_SEC};
use crate::controls::Control;
use crate::effects::{map_effects, EffectMapper, EffectParameters, PauseTrigger};
use crate::fractal::FractalField;
use crate::hand::{HandFrame, HandInput};
use crate::phase::{Phase, PhaseState, TripPhaseScheduler, TRIP_PHASES};
use crate::shader::MeltUniforms;
use crate::trails::HandTrails;

/// Receives the phase once per frame and turns it into sound.
pub trait AudioSink {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState);
}

/// Receives the gesture-driven parameters for the distortion pass.
pub trait ShaderSink {
    fn apply_effects(&mut self, dt_sec: f32, phase: &PhaseState, params: &EffectParameters);
    fn reset(&mut self) {}
}

/// Receives the phase to animate the fractal scene.
pub trait FractalSink {
    fn generate(&mut self, _seed: u64) {}
    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState);
    fn dispose(&mut self) {}
}

impl AudioSink for Soundscape {
    fn start(&mut self) {
        Soundscape::start(self);
    }

    fn stop(&mut self) {
        Soundscape::stop(self);
    }

    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.update(dt_sec, phase);
    }
}

impl ShaderSink for MeltUniforms {
    fn apply_effects(&mut self, dt_sec: f32, phase: &PhaseState, params: &EffectParameters) {
        self.apply(params);
        self.update(dt_sec, phase);
    }

    fn reset(&mut self) {
        MeltUniforms::reset(self);
    }
}

impl FractalSink for FractalField {
    fn generate(&mut self, seed: u64) {
        FractalField::generate(self, seed);
    }

    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.update(dt_sec, phase);
    }

    fn dispose(&mut self) {
        FractalField::dispose(self);
    }
}

/// Borrowed set of sinks for one call into the driver.
pub struct Sinks<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub shader: &'a mut dyn ShaderSink,
    pub fractals: &'a mut dyn FractalSink,
}

/// Runtime knobs for an [`Experience`].
#[derive(Clone, Debug)]
pub struct ExperienceConfig {
    pub phases: Vec<Phase>,
    pub pause_trigger: PauseTrigger,
    pub fractal_seed: u64,
    pub trail_lifetime_sec: f64,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            phases: TRIP_PHASES.to_vec(),
            pause_trigger: PauseTrigger::default(),
            fractal_seed: DEFAULT_FRACTAL_SEED,
            trail_lifetime_sec: TRAIL_LIFETIME_SEC,
        }
    }
}

/// Result of one frame tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub phase: PhaseState,
    pub effects: EffectParameters,
    pub hands: HandFrame,
    pub pause_toggled: bool,
}

pub struct Experience {
    scheduler: TripPhaseScheduler,
    mapper: EffectMapper,
    trails: HandTrails,
    fractal_seed: u64,
    running: bool,
    emergency_stopped: bool,
}

impl Default for Experience {
    fn default() -> Self {
        Self::new(ExperienceConfig::default())
    }
}

impl Experience {
    pub fn new(config: ExperienceConfig) -> Self {
        Self {
            scheduler: TripPhaseScheduler::with_phases(config.phases),
            mapper: EffectMapper::new(config.pause_trigger),
            trails: HandTrails::new(config.trail_lifetime_sec),
            fractal_seed: config.fractal_seed,
            running: false,
            emergency_stopped: false,
        }
    }

    pub fn start(&mut self, now_sec: f64) {
        self.running = true;
        self.emergency_stopped = false;
        self.mapper.reset();
        self.trails.clear();
        self.scheduler.start(now_sec);
        log::info!("[experience] started");
    }

    /// Stop the experience. Returns false if it was not running.
    pub fn stop(&mut self, now_sec: f64) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.scheduler.stop(now_sec);
        self.mapper.reset();
        self.trails.clear();
        log::info!("[experience] stopped");
        true
    }

    /// Stop and latch the emergency flag so the host can fade out and end
    /// its session.
    pub fn emergency_stop(&mut self, now_sec: f64) -> bool {
        self.emergency_stopped = true;
        log::warn!("[experience] emergency stop");
        self.stop(now_sec)
    }

    /// Advance one frame. `hands` is `None` when the input source had
    /// nothing this frame, which counts as no gesture contribution.
    ///
    /// While stopped the phase state is reported but hands are ignored: no
    /// gesture mapping, no pause toggle, no trails.
    pub fn tick(&mut self, now_sec: f64, hands: Option<HandFrame>) -> FrameOutput {
        let phase = self.scheduler.update(now_sec);
        if !self.running {
            return FrameOutput {
                effects: map_effects(phase.intensity, None, None),
                phase,
                hands: HandFrame::default(),
                pause_toggled: false,
            };
        }
        let hands = hands.unwrap_or_default();
        let mapping = self.mapper.map(&phase, &hands);
        if mapping.toggle_pause {
            self.scheduler.pause(now_sec);
        }
        self.trails.update(now_sec, &hands, phase.hue);
        FrameOutput {
            phase,
            effects: mapping.params,
            hands,
            pause_toggled: mapping.toggle_pause,
        }
    }

    pub fn toggle_pause(&mut self, now_sec: f64) -> bool {
        self.scheduler.pause(now_sec)
    }

    pub fn skip_to_phase(&mut self, index: usize, now_sec: f64) {
        self.scheduler.skip_to_phase(index, now_sec);
    }

    pub fn scheduler(&self) -> &TripPhaseScheduler {
        &self.scheduler
    }

    pub fn trails(&self) -> &HandTrails {
        &self.trails
    }

    pub fn fractal_seed(&self) -> u64 {
        self.fractal_seed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_emergency_stopped(&self) -> bool {
        self.emergency_stopped
    }
}

/// Monotonic time source in seconds.
pub trait Clock {
    fn now_sec(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: instant::Instant,
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Clock for InstantClock {
    fn now_sec(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-advanced clock for deterministic runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    pub now_sec: f64,
}

impl ManualClock {
    pub fn new(now_sec: f64) -> Self {
        Self { now_sec }
    }

    pub fn advance(&mut self, dt_sec: f64) {
        self.now_sec += dt_sec;
    }
}

impl Clock for ManualClock {
    fn now_sec(&self) -> f64 {
        self.now_sec
    }
}

/// Forward a frame's results to the sinks: audio, then shader, then fractals.
pub fn dispatch(output: &FrameOutput, dt_sec: f32, sinks: &mut Sinks<'_>) {
    sinks.audio.apply_phase(dt_sec, &output.phase);
    sinks.shader.apply_effects(dt_sec, &output.phase, &output.effects);
    sinks.fractals.apply_phase(dt_sec, &output.phase);
}

pub struct FrameDriver<C: Clock, I: HandInput> {
    clock: C,
    input: I,
    experience: Experience,
    last_frame_sec: f64,
}

impl<C: Clock, I: HandInput> FrameDriver<C, I> {
    pub fn new(clock: C, input: I, config: ExperienceConfig) -> Self {
        let last_frame_sec = clock.now_sec();
        Self {
            clock,
            input,
            experience: Experience::new(config),
            last_frame_sec,
        }
    }

    pub fn start(&mut self, sinks: &mut Sinks<'_>) {
        let now = self.clock.now_sec();
        self.last_frame_sec = now;
        self.experience.start(now);
        sinks.audio.start();
        sinks.fractals.generate(self.experience.fractal_seed());
    }

    /// Stop and release sink resources. Safe to call when already stopped.
    pub fn stop(&mut self, sinks: &mut Sinks<'_>) {
        let now = self.clock.now_sec();
        if self.experience.stop(now) {
            Self::release(sinks);
        }
    }

    pub fn emergency_stop(&mut self, sinks: &mut Sinks<'_>) {
        let now = self.clock.now_sec();
        if self.experience.emergency_stop(now) {
            Self::release(sinks);
        }
    }

    fn release(sinks: &mut Sinks<'_>) {
        sinks.audio.stop();
        sinks.shader.reset();
        sinks.fractals.dispose();
    }

    /// Run one frame. Returns `None` once the experience is no longer running.
    pub fn frame(&mut self, sinks: &mut Sinks<'_>) -> Option<FrameOutput> {
        if !self.experience.is_running() {
            return None;
        }
        let now = self.clock.now_sec();
        let dt_sec = (now - self.last_frame_sec).max(0.0) as f32;
        self.last_frame_sec = now;

        let hands = self.input.poll();
        let output = self.experience.tick(now, hands);
        dispatch(&output, dt_sec, sinks);
        Some(output)
    }

    pub fn toggle_pause(&mut self) -> bool {
        let now = self.clock.now_sec();
        self.experience.toggle_pause(now)
    }

    pub fn skip_to_phase(&mut self, index: usize) {
        let now = self.clock.now_sec();
        self.experience.skip_to_phase(index, now);
    }

    /// Apply a keyboard control. Pause and skip are ignored while stopped.
    pub fn apply_control(&mut self, control: Control, sinks: &mut Sinks<'_>) {
        match control {
            Control::EmergencyStop => self.emergency_stop(sinks),
            _ if !self.experience.is_running() => {}
            Control::TogglePause => {
                self.toggle_pause();
            }
            Control::SkipToPhase(index) => self.skip_to_phase(index),
        }
    }

    pub fn now_sec(&self) -> f64 {
        self.clock.now_sec()
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
