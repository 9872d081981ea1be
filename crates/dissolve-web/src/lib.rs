#![cfg(target_arch = "wasm32")]
use dissolve_core::{
    control_for_key, Control, ExperienceConfig, FractalField, FrameDriver, InstantClock,
    MeltUniforms, PointerHandSimulator, Sinks,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod audio;
mod canvas;
mod dom;

use audio::WebAudio;
use canvas::CanvasRenderer;

const CANVAS_ID: &str = "app-canvas";
const ACCEPT_ID: &str = "accept-btn";
const WARNING_ID: &str = "warning-screen";
const EMERGENCY_ID: &str = "emergency-stop";
const PHASE_TEXT_ID: &str = "phase-text";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("dissolve-web starting");

    if let Err(e) = init() {
        log::error!("init error: {e:#}");
    }
    Ok(())
}

struct Presentation {
    audio: WebAudio,
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

struct App {
    driver: FrameDriver<InstantClock, PointerHandSimulator>,
    presentation: Presentation,
    renderer: CanvasRenderer,
    phase_text: Option<web::Element>,
    shown_phase: &'static str,
}

impl App {
    fn frame(&mut self) {
        if let Some(out) = self.driver.frame(&mut self.presentation.sinks()) {
            if out.phase.name != self.shown_phase {
                self.shown_phase = out.phase.name;
                if let Some(el) = &self.phase_text {
                    el.set_text_content(Some(&out.phase.name.to_uppercase()));
                }
            }
        }
        self.renderer.draw(
            &self.presentation.fractals,
            self.driver.experience().trails().particles(),
            self.presentation.melt.values(),
        );
    }

    fn apply_control(&mut self, control: Control) {
        let was_running = self.driver.experience().is_running();
        self.driver
            .apply_control(control, &mut self.presentation.sinks());
        if was_running && self.driver.experience().is_emergency_stopped() {
            self.renderer.fade_out();
            if let Some(w) = web::window() {
                let _ = w.alert_with_message("Experience stopped. Please remove your headset.");
            }
        }
    }
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{CANVAS_ID} is not a canvas: {e:?}"))?;
    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            w.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
                .ok();
        }
        resize_closure.forget();
    }

    // The warning must be accepted first; the click also unlocks WebAudio.
    static STARTED: AtomicBool = AtomicBool::new(false);
    let doc = document.clone();
    dom::add_click_listener(&document, ACCEPT_ID, move || {
        if STARTED.swap(true, Ordering::SeqCst) {
            log::warn!("[experience] start already triggered; ignoring extra click");
            return;
        }
        if let Ok(warning) = dom::element_by_id(&doc, WARNING_ID) {
            dom::hide(&warning);
        }
        if let Err(e) = launch(&doc, canvas.clone()) {
            log::error!("[experience] launch failed: {e}");
        }
    });
    Ok(())
}

fn launch(document: &web::Document, canvas: web::HtmlCanvasElement) -> anyhow::Result<()> {
    let renderer = CanvasRenderer::new(canvas)?;
    let mut app = App {
        driver: FrameDriver::new(
            InstantClock::new(),
            PointerHandSimulator::new(),
            ExperienceConfig::default(),
        ),
        presentation: Presentation {
            audio: WebAudio::new(),
            melt: MeltUniforms::new(),
            fractals: FractalField::new(),
        },
        renderer,
        phase_text: document.get_element_by_id(PHASE_TEXT_ID),
        shown_phase: "",
    };
    app.driver.start(&mut app.presentation.sinks());
    let app = Rc::new(RefCell::new(app));

    {
        let app = app.clone();
        dom::add_click_listener(document, EMERGENCY_ID, move || {
            app.borrow_mut().apply_control(Control::EmergencyStop);
        });
    }
    wire_keyboard(app.clone());
    wire_pointer(app.clone());
    run_frame_loop(app);
    Ok(())
}

fn wire_keyboard(app: Rc<RefCell<App>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() {
            return;
        }
        if let Some(control) = control_for_key(&ev.key()) {
            ev.prevent_default();
            app.borrow_mut().apply_control(control);
        }
    }) as Box<dyn FnMut(_)>);
    window
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn wire_pointer(app: Rc<RefCell<App>>) {
    let canvas = app.borrow().renderer.canvas().clone();
    {
        let app = app.clone();
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let (x, y) = dom::pointer_canvas_px(&ev, &canvas_move);
            let (w, h) = (canvas_move.width() as f32, canvas_move.height() as f32);
            app.borrow_mut().driver.input_mut().pointer_moved(x, y, w, h);
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
    for (event, down) in [("pointerdown", true), ("pointerup", false)] {
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if let Some(button) = PointerHandSimulator::button_from_index(ev.button()) {
                app.borrow_mut().driver.input_mut().set_button(button, down);
            }
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }
    // Right button drives the open-hand gesture.
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    canvas
        .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
        .ok();
    closure.forget();
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(f.as_ref().unchecked_ref::<js_sys::Function>());
    }
}

fn run_frame_loop(app: Rc<RefCell<App>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_handle = tick.clone();
    *tick_handle.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        app.borrow_mut().frame();
        if let Some(f) = tick.borrow().as_ref() {
            request_animation_frame(f);
        }
    }) as Box<dyn FnMut()>));
    if let Some(f) = tick_handle.borrow().as_ref() {
        request_animation_frame(f);
    }
}
