//! Flattens the fractal field and hand trails into camera-facing sprites
//! that any renderer can draw, plus the shared viewer camera.

use crate::constants::{EYE_HEIGHT, FOV_Y_DEGREES, TRAIL_RADIUS};
use crate::fractal::{FractalField, FractalKind};
use crate::trails::TrailParticle;
use glam::{Mat4, Vec3};

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub position: Vec3,
    /// World-space radius.
    pub radius: f32,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

/// Sprite radius for each kind of fractal point.
pub fn point_radius(kind: FractalKind) -> f32 {
    match kind {
        FractalKind::SierpinskiTetrahedron => 0.03,
        FractalKind::MengerCube => 0.05,
        FractalKind::JuliaCloud => 0.015,
        FractalKind::FlowerRing => 0.02,
    }
}

/// Append every fractal point, then every trail particle, to `out`.
pub fn collect_sprites(fractals: &FractalField, trails: &[TrailParticle], out: &mut Vec<Sprite>) {
    out.clear();
    out.reserve(fractals.point_count() + trails.len());
    for obj in fractals.objects() {
        let radius = point_radius(obj.kind) * obj.scale;
        for (i, position) in obj.world_points().enumerate() {
            let [r, g, b] = obj.point_color(i);
            out.push(Sprite {
                position,
                radius,
                color: [r, g, b, obj.opacity],
            });
        }
    }
    for p in trails {
        let [r, g, b] = p.color;
        out.push(Sprite {
            position: p.position,
            radius: TRAIL_RADIUS,
            color: [r, g, b, p.opacity],
        });
    }
}

/// Seated viewer at eye height looking down -Z.
pub fn view_projection(aspect: f32) -> Mat4 {
    let eye = Vec3::new(0.0, EYE_HEIGHT, 0.0);
    let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(1e-4), Z_NEAR, Z_FAR);
    let view = Mat4::look_at_rh(eye, eye + Vec3::NEG_Z, Vec3::Y);
    proj * view
}
