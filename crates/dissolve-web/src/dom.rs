use dissolve_core::SetupError;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn element_by_id(document: &web::Document, id: &str) -> Result<web::Element, SetupError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::MissingElement(id.to_string()))
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::warn!("[dom] no #{element_id} to listen on");
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Pointer position in canvas backing pixels.
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width().max(1.0) as f32;
    let h = rect.height().max(1.0) as f32;
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    (
        x_css / w * canvas.width() as f32,
        y_css / h * canvas.height() as f32,
    )
}

pub fn hide(el: &web::Element) {
    let _ = el.class_list().add_1("hidden");
}
