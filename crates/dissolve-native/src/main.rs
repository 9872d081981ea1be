use dissolve_core::{
    control_for_key, ExperienceConfig, FractalField, FrameDriver, InstantClock, MeltUniforms,
    PointerButton, PointerHandSimulator, Sinks,
};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

mod audio;
mod render;

use audio::NativeAudio;
use render::{FrameView, GpuState};

type Driver = FrameDriver<InstantClock, PointerHandSimulator>;

/// The concrete sinks the driver feeds each frame.
struct Presentation {
    audio: NativeAudio,
    melt: MeltUniforms,
    fractals: FractalField,
}

impl Presentation {
    fn sinks(&mut self) -> Sinks<'_> {
        Sinks {
            audio: &mut self.audio,
            shader: &mut self.melt,
            fractals: &mut self.fractals,
        }
    }
}

fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::Space) => Some(" "),
        Key::Named(NamedKey::Escape) => Some("Escape"),
        Key::Named(NamedKey::Enter) => Some("Enter"),
        Key::Character(c) => Some(c.as_str()),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn handle_key(name: &str, driver: &mut Driver, presentation: &mut Presentation) {
    // Enter begins (or restarts) a session; everything else goes through the shared controls.
    if name == "Enter" {
        if !driver.experience().is_running() {
            driver.start(&mut presentation.sinks());
        }
        return;
    }
    if let Some(control) = control_for_key(name) {
        driver.apply_control(control, &mut presentation.sinks());
        if driver.experience().is_emergency_stopped() {
            log::warn!("[experience] session ended, press Enter to begin again");
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("The Dissolve")
        .build(&event_loop)?;
    let mut gpu = pollster::block_on(GpuState::new(&window))?;

    let audio = NativeAudio::open().unwrap_or_else(|e| {
        log::warn!("[audio] {e}; continuing without sound");
        NativeAudio::silent()
    });
    let mut presentation = Presentation {
        audio,
        melt: MeltUniforms::new(),
        fractals: FractalField::new(),
    };
    let mut driver = Driver::new(
        InstantClock::new(),
        PointerHandSimulator::new(),
        ExperienceConfig::default(),
    );
    log::info!("[experience] Space pauses, 1-4 jump to a phase, Esc stops");
    driver.start(&mut presentation.sinks());
    let mut shown_phase: &'static str = "";

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                driver.stop(&mut presentation.sinks());
                elwt.exit();
            }
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::CursorMoved { position, .. } => {
                let (w, h) = gpu.size();
                driver
                    .input_mut()
                    .pointer_moved(position.x as f32, position.y as f32, w as f32, h as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(b) = pointer_button(button) {
                    driver
                        .input_mut()
                        .set_button(b, state == ElementState::Pressed);
                }
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(name) = key_name(&event.logical_key) {
                    handle_key(name, &mut driver, &mut presentation);
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            if let Some(out) = driver.frame(&mut presentation.sinks()) {
                if out.phase.name != shown_phase {
                    shown_phase = out.phase.name;
                    gpu.window
                        .set_title(&format!("The Dissolve - {}", shown_phase.to_uppercase()));
                }
            }
            let view = FrameView {
                fractals: &presentation.fractals,
                trails: driver.experience().trails().particles(),
                melt: presentation.melt.values(),
            };
            match gpu.render(&view) {
                Ok(()) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit();
                }
                Err(e) => log::debug!("[gpu] skipped frame: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
