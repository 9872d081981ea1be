//! 2D canvas renderer: projects the scene sprites on the CPU and applies the
//! melt displacement and vignette per sprite.

use dissolve_core::{
    collect_sprites, melt_displace, view_projection, FractalField, MeltValues, SetupError,
    Sprite, TrailParticle, FOV_Y_DEGREES,
};
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct CanvasRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    sprites: Vec<Sprite>,
}

impl CanvasRenderer {
    pub fn new(canvas: web::HtmlCanvasElement) -> Result<Self, SetupError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
            .ok_or_else(|| SetupError::Graphics("2d canvas context unavailable".into()))?;
        Ok(Self {
            canvas,
            ctx,
            sprites: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    pub fn draw(&mut self, fractals: &FractalField, trails: &[TrailParticle], melt: MeltValues) {
        let w = self.canvas.width().max(1) as f32;
        let h = self.canvas.height().max(1) as f32;
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str("#000");
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));

        collect_sprites(fractals, trails, &mut self.sprites);
        let view_proj = view_projection(w / h);
        let focal_px = 0.5 * h / (FOV_Y_DEGREES.to_radians() * 0.5).tan();
        let pulse = 0.5 + (melt.time * 2.0).sin() * 0.2 * melt.intensity;

        for s in &self.sprites {
            let clip = view_proj * s.position.extend(1.0);
            if clip.w <= 1e-3 {
                continue;
            }
            let ndc = Vec2::new(clip.x, clip.y) / clip.w;
            let uv = melt_displace(ndc * 0.5 + Vec2::splat(0.5), &melt);
            let vignette = (1.0 - (uv - Vec2::splat(0.5)).length() * pulse).clamp(0.0, 1.0);
            let alpha = s.color[3].clamp(0.0, 1.0) * vignette;
            if alpha <= 0.0 {
                continue;
            }
            let r = (s.radius * focal_px / clip.w).max(0.5) * (1.0 + melt.spread);
            let px = uv.x * w;
            let py = (1.0 - uv.y) * h;
            self.ctx.set_global_alpha(f64::from(alpha));
            self.ctx.set_fill_style_str(&css_rgb(s.color));
            self.ctx.fill_rect(
                f64::from(px - r),
                f64::from(py - r),
                f64::from(2.0 * r),
                f64::from(2.0 * r),
            );
        }
    }

    /// Fade the canvas out via CSS after an emergency stop.
    pub fn fade_out(&self) {
        let style = self.canvas.style();
        let _ = style.set_property("transition", "opacity 1s");
        let _ = style.set_property("opacity", "0");
    }
}

fn css_rgb(color: [f32; 4]) -> String {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgb({},{},{})", c(color[0]), c(color[1]), c(color[2]))
}
