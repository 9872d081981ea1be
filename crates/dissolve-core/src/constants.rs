// Shared tuning constants used by the core and both frontends.

// Phase blending
pub const EASE_WINDOW: f32 = 0.1; // fraction of a phase spent blending at each end
pub const OSCILLATION_AMPLITUDE: f32 = 0.05; // organic wobble added to intensity
pub const HUE_SWEEP_PER_PHASE: f32 = 0.2; // hue advance across one full phase

// Hand classification (hand-tracking pose units, roughly metres)
pub const PINCH_DISTANCE: f32 = 0.03; // thumb tip to index tip
pub const EXTENDED_TIP_DISTANCE: f32 = 0.10; // fingertip to wrist for "extended"
pub const OPEN_MIN_EXTENDED_TIPS: usize = 3; // of the four non-thumb tips
pub const POINTING_INDEX_MIN: f32 = 0.10;
pub const POINTING_MIDDLE_MAX: f32 = 0.08;

// Gesture mapping
pub const PINCH_INTENSITY_GAIN: f32 = 1.5; // per pinching hand, compounds
pub const OPEN_SPREAD_STEP: f32 = 0.5; // per open hand
pub const PAUSE_HANDS_DISTANCE: f32 = 0.2; // both hands closer than this toggles pause

// Pointer simulation
pub const SIM_HAND_HALF_GAP: f32 = 0.2; // each simulated hand sits this far from the pointer
pub const SIM_HAND_DEPTH: f32 = -1.0;

// Audio
pub const MASTER_GAIN: f32 = 0.3;
pub const BINAURAL_CARRIER_HZ: f32 = 200.0;
pub const BINAURAL_EAR_GAIN: f32 = 0.5;
pub const BINAURAL_START_BEAT_HZ: f32 = 4.0;
pub const BINAURAL_SMOOTHING: f32 = 0.01; // per update toward the phase target
pub const BINAURAL_MAX_BEAT_HZ: f32 = 40.0;
pub const SHEPARD_BASE_HZ: [f32; 7] = [55.0, 110.0, 220.0, 440.0, 880.0, 1760.0, 3520.0];
pub const SHEPARD_GAIN_SCALE: f32 = 0.1;
pub const SHEPARD_WOBBLE_DEPTH: f32 = 0.02;
pub const SHEPARD_WOBBLE_RATE: f32 = 0.1;

// Hand trails
pub const TRAIL_LIFETIME_SEC: f64 = 1.0;
pub const TRAIL_RADIUS: f32 = 0.02;

// Fractal scene layout
pub const SIERPINSKI_ORIGIN: [f32; 3] = [0.0, 1.5, -3.0];
pub const MENGER_ORIGIN: [f32; 3] = [-2.0, 1.5, -3.0];
pub const JULIA_ORIGIN: [f32; 3] = [2.0, 1.5, -3.0];
pub const FLOWER_ORIGIN: [f32; 3] = [0.0, 1.0, -2.0];
pub const DEFAULT_FRACTAL_SEED: u64 = 42;

// Viewer
pub const EYE_HEIGHT: f32 = 1.6;
pub const FOV_Y_DEGREES: f32 = 90.0;
