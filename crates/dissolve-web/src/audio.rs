//! WebAudio output for the soundscape. The node graph is built on start
//! (inside the user gesture that unlocks audio) and torn down on stop.

use dissolve_core::{
    AudioSink, PhaseState, SetupError, Soundscape, SoundscapeFrame, BINAURAL_EAR_GAIN,
};
use wasm_bindgen::JsValue;
use web_sys as web;

struct AudioGraph {
    ctx: web::AudioContext,
    master: web::GainNode,
    left: web::OscillatorNode,
    right: web::OscillatorNode,
    partials: Vec<(web::OscillatorNode, web::GainNode)>,
}

fn js_err(e: JsValue) -> SetupError {
    SetupError::Audio(format!("{e:?}"))
}

fn create_gain(ctx: &web::AudioContext, value: f32) -> Result<web::GainNode, SetupError> {
    let g = web::GainNode::new(ctx).map_err(js_err)?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_sine(ctx: &web::AudioContext, frequency_hz: f32) -> Result<web::OscillatorNode, SetupError> {
    let osc = web::OscillatorNode::new(ctx).map_err(js_err)?;
    osc.set_type(web::OscillatorType::Sine);
    osc.frequency().set_value(frequency_hz);
    Ok(osc)
}

/// One ear of the binaural pair: sine -> ear gain -> hard pan -> master.
fn binaural_voice(
    ctx: &web::AudioContext,
    master: &web::GainNode,
    frequency_hz: f32,
    pan: f32,
) -> Result<web::OscillatorNode, SetupError> {
    let osc = create_sine(ctx, frequency_hz)?;
    let gain = create_gain(ctx, BINAURAL_EAR_GAIN)?;
    let panner = web::StereoPannerNode::new(ctx).map_err(js_err)?;
    panner.pan().set_value(pan);
    osc.connect_with_audio_node(&gain).map_err(js_err)?;
    gain.connect_with_audio_node(&panner).map_err(js_err)?;
    panner.connect_with_audio_node(master).map_err(js_err)?;
    osc.start_with_when(0.0).map_err(js_err)?;
    Ok(osc)
}

impl AudioGraph {
    fn build(frame: &SoundscapeFrame) -> Result<Self, SetupError> {
        let ctx = web::AudioContext::new().map_err(js_err)?;
        let master = create_gain(&ctx, frame.master_gain)?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        let left = binaural_voice(&ctx, &master, frame.left_hz, -1.0)?;
        let right = binaural_voice(&ctx, &master, frame.right_hz, 1.0)?;

        let mut partials = Vec::with_capacity(frame.partials.len());
        for p in &frame.partials {
            let osc = create_sine(&ctx, p.frequency_hz)?;
            let gain = create_gain(&ctx, p.gain)?;
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            gain.connect_with_audio_node(&master).map_err(js_err)?;
            osc.start_with_when(0.0).map_err(js_err)?;
            partials.push((osc, gain));
        }
        Ok(Self {
            ctx,
            master,
            left,
            right,
            partials,
        })
    }

    fn apply(&self, frame: &SoundscapeFrame) {
        let now = self.ctx.current_time();
        let _ = self.master.gain().set_value_at_time(frame.master_gain, now);
        let _ = self.left.frequency().set_value_at_time(frame.left_hz, now);
        let _ = self.right.frequency().set_value_at_time(frame.right_hz, now);
        for ((osc, gain), p) in self.partials.iter().zip(frame.partials.iter()) {
            let _ = osc.frequency().set_value_at_time(p.frequency_hz, now);
            let _ = gain.gain().set_value_at_time(p.gain, now);
        }
    }

    fn close(self) {
        let _ = self.left.stop_with_when(0.0);
        let _ = self.right.stop_with_when(0.0);
        for (osc, _) in &self.partials {
            let _ = osc.stop_with_when(0.0);
        }
        let _ = self.ctx.close();
    }
}

#[derive(Default)]
pub struct WebAudio {
    soundscape: Soundscape,
    graph: Option<AudioGraph>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for WebAudio {
    fn start(&mut self) {
        if !self.soundscape.start() {
            return;
        }
        match AudioGraph::build(self.soundscape.frame()) {
            Ok(graph) => self.graph = Some(graph),
            Err(e) => log::warn!("[audio] {e}; continuing without sound"),
        }
    }

    fn stop(&mut self) {
        self.soundscape.stop();
        if let Some(graph) = self.graph.take() {
            graph.close();
        }
    }

    fn apply_phase(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.soundscape.update(dt_sec, phase);
        if let Some(graph) = &self.graph {
            graph.apply(self.soundscape.frame());
        }
    }
}
