//! cpal output for the soundscape: a binaural sine pair panned hard left and
//! right plus the centered Shepard partials, all under the master gain.

use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Sample;
use dissolve_core::{
    AudioSink, PhaseState, SetupError, Soundscape, SoundscapeFrame, BINAURAL_EAR_GAIN,
    SHEPARD_PARTIALS,
};

/// Oscillator state owned by the output callback.
struct Synth {
    sample_rate: f32,
    // None while the soundscape is stopped.
    target: Option<SoundscapeFrame>,
    left_phase: f32,
    right_phase: f32,
    partial_phases: [f32; SHEPARD_PARTIALS],
}

impl Synth {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: sample_rate.max(1.0),
            target: None,
            left_phase: 0.0,
            right_phase: 0.0,
            partial_phases: [0.0; SHEPARD_PARTIALS],
        }
    }

    fn next_frame(&mut self) -> (f32, f32) {
        let Some(frame) = self.target else {
            return (0.0, 0.0);
        };
        let inc = TAU / self.sample_rate;
        let left = self.left_phase.sin() * BINAURAL_EAR_GAIN;
        let right = self.right_phase.sin() * BINAURAL_EAR_GAIN;
        self.left_phase = (self.left_phase + frame.left_hz * inc) % TAU;
        self.right_phase = (self.right_phase + frame.right_hz * inc) % TAU;

        let mut shepard = 0.0f32;
        for (phase, partial) in self.partial_phases.iter_mut().zip(frame.partials.iter()) {
            shepard += phase.sin() * partial.gain;
            *phase = (*phase + partial.frequency_hz * inc) % TAU;
        }
        let g = frame.master_gain;
        (((left + shepard) * g).tanh(), ((right + shepard) * g).tanh())
    }
}

/// Audio sink that keeps the platform-free [`Soundscape`] model and copies
/// its targets to the cpal callback every frame.
pub struct NativeAudio {
    soundscape: Soundscape,
    synth: Arc<Mutex<Synth>>,
    _stream: Option<cpal::Stream>,
}

impl NativeAudio {
    pub fn open() -> Result<Self, SetupError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SetupError::Audio("no output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| SetupError::Audio(e.to_string()))?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let synth = Arc::new(Mutex::new(Synth::new(sample_rate)));
        let stream_config: cpal::StreamConfig = config.config();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, Arc::clone(&synth))
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, Arc::clone(&synth))
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, Arc::clone(&synth))
            }
            other => {
                return Err(SetupError::Audio(format!("unsupported sample format {other:?}")))
            }
        }
        .map_err(|e| SetupError::Audio(e.to_string()))?;
        stream.play().map_err(|e| SetupError::Audio(e.to_string()))?;
        log::info!("[audio] output at {sample_rate} Hz, {channels} channels");

        Ok(Self {
            soundscape: Soundscape::new(),
            synth,
            _stream: Some(stream),
        })
    }

    /// No device: the model still runs so the rest of the experience is unchanged.
    pub fn silent() -> Self {
        Self {
            soundscape: Soundscape::new(),
            synth: Arc::new(Mutex::new(Synth::new(1.0))),
            _stream: None,
        }
    }

    fn publish(&self, frame: Option<SoundscapeFrame>) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.target = frame;
        }
    }
}

impl AudioSink for NativeAudio {
    fn start(&mut self) {
        if self.soundscape.start() {
            self.publish(Some(*self.soundscape.frame()));
        }
    }

    fn stop(&mut self) {
        if self.soundscape.stop() {
            self.publish(None);
        }
    }

    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.soundscape.update(dt_sec, phase);
        if self.soundscape.is_playing() {
            self.publish(Some(*self.soundscape.frame()));
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    synth: Arc<Mutex<Synth>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut synth) = synth.lock() else {
                data.fill(T::EQUILIBRIUM);
                return;
            };
            for frame in data.chunks_mut(channels.max(1)) {
                let (l, r) = synth.next_frame();
                match frame {
                    [mono] => *mono = T::from_sample(0.5 * (l + r)),
                    [left, right, rest @ ..] => {
                        *left = T::from_sample(l);
                        *right = T::from_sample(r);
                        rest.fill(T::EQUILIBRIUM);
                    }
                    [] => {}
                }
            }
        },
        |err| log::error!("[audio] stream error: {err}"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dissolve_core::{TripPhaseScheduler, TRIP_PHASES};

    #[test]
    fn stopped_synth_is_silent() {
        let mut synth = Synth::new(48_000.0);
        for _ in 0..64 {
            assert_eq!(synth.next_frame(), (0.0, 0.0));
        }
    }

    #[test]
    fn binaural_channels_drift_apart() {
        let mut scape = Soundscape::new();
        scape.start();
        let mut scheduler = TripPhaseScheduler::with_phases(TRIP_PHASES.to_vec());
        scheduler.start(0.0);
        scape.update(0.016, &scheduler.update(0.0));

        let mut synth = Synth::new(48_000.0);
        synth.target = Some(*scape.frame());
        let mut max_diff = 0.0f32;
        for _ in 0..4_800 {
            let (l, r) = synth.next_frame();
            assert!(l.abs() <= 1.0 && r.abs() <= 1.0);
            max_diff = max_diff.max((l - r).abs());
        }
        assert!(max_diff > 0.01, "left and right should differ by the beat");
    }

    #[test]
    fn silent_sink_tracks_lifecycle() {
        let mut audio = NativeAudio::silent();
        audio.start();
        assert!(audio.soundscape.is_playing());
        audio.stop();
        audio.stop();
        assert!(!audio.soundscape.is_playing());
        let target = audio.synth.lock().map(|s| s.target).unwrap();
        assert!(target.is_none());
    }
}
