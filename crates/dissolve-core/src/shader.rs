//! Uniform state for the full-screen "melt" distortion shader.

use crate::effects::EffectParameters;
use crate::phase::PhaseState;
use glam::Vec2;

/// Values uploaded to the shader each frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeltValues {
    pub time: f32,
    pub intensity: f32,
    pub distortion: f32,
    pub spread: f32,
}

/// Holds the gesture-driven settings (each clamped to \[0, 1\]) and scales
/// them by the phase intensity on every update.
#[derive(Clone, Debug, Default)]
pub struct MeltUniforms {
    intensity: f32,
    distortion: f32,
    spread: f32,
    values: MeltValues,
}

impl MeltUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_intensity(&mut self, value: f32) {
        self.intensity = value.clamp(0.0, 1.0);
    }

    pub fn set_distortion(&mut self, value: f32) {
        self.distortion = value.clamp(0.0, 1.0);
    }

    pub fn set_spread(&mut self, value: f32) {
        self.spread = value.clamp(0.0, 1.0);
    }

    pub fn apply(&mut self, params: &EffectParameters) {
        self.set_intensity(params.intensity);
        self.set_distortion(params.distortion);
        self.set_spread(params.spread);
    }

    pub fn update(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.values.time += dt_sec;
        self.values.intensity = self.intensity * phase.intensity;
        self.values.distortion = self.distortion * phase.intensity;
        self.values.spread = self.spread * phase.intensity;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn values(&self) -> MeltValues {
        self.values
    }
}

/// CPU mirror of the shader's melt and radial ripple steps, for renderers
/// that displace geometry instead of sampling a scene texture.
///
/// `uv` is in \[0, 1\] screen space with y up.
pub fn melt_displace(uv: Vec2, values: &MeltValues) -> Vec2 {
    let mut uv = uv;
    uv.y += (uv.x * 10.0 + values.time * 2.0).sin() * values.intensity * 0.05;
    let to_center = uv - Vec2::splat(0.5);
    let dist = to_center.length();
    if dist > 1e-4 {
        let ripple = (dist * 20.0 - values.time * 3.0).sin() * values.distortion * 0.02;
        uv += to_center / dist * ripple;
    }
    uv
}
