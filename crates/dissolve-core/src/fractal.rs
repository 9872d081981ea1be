//! Procedural fractal scene and its phase-driven animation.
//!
//! Geometry is generated as local-space point sets; each object carries its
//! own transform, color and opacity so any renderer can draw it as points,
//! billboards or lines.

use crate::color::hsl_to_rgb;
use crate::constants::{FLOWER_ORIGIN, JULIA_ORIGIN, MENGER_ORIGIN, SIERPINSKI_ORIGIN};
use crate::phase::PhaseState;
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const SIERPINSKI_SIZE: f32 = 0.5;
const SIERPINSKI_DEPTH: u32 = 2;
const MENGER_SIZE: f32 = 0.6;
const MENGER_DEPTH: u32 = 1;
const JULIA_SAMPLES: usize = 1000;
const JULIA_ITERATIONS: usize = 20;
const JULIA_C: Vec2 = Vec2::new(-0.7, 0.27);
const FLOWER_RADIUS: f32 = 0.3;
const FLOWER_PETALS: usize = 6;
const RING_SEGMENTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FractalKind {
    SierpinskiTetrahedron,
    MengerCube,
    JuliaCloud,
    FlowerRing,
}

#[derive(Clone, Debug)]
pub struct FractalObject {
    pub kind: FractalKind,
    pub origin: Vec3,
    /// Euler angles (XYZ order), radians.
    pub rotation: Vec3,
    pub scale: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Local-space geometry.
    pub points: Vec<Vec3>,
    /// Optional per-point colors, multiplied with `color`.
    pub point_colors: Option<Vec<[f32; 3]>>,
}

impl FractalObject {
    fn new(kind: FractalKind, origin: Vec3, points: Vec<Vec3>, color: [f32; 3], opacity: f32) -> Self {
        Self {
            kind,
            origin,
            rotation: Vec3::ZERO,
            scale: 1.0,
            color,
            opacity,
            points,
            point_colors: None,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.origin)
    }

    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        let model = self.model_matrix();
        self.points.iter().map(move |p| model.transform_point3(*p))
    }

    pub fn point_color(&self, index: usize) -> [f32; 3] {
        match self.point_colors.as_ref().and_then(|c| c.get(index)) {
            Some(pc) => [pc[0] * self.color[0], pc[1] * self.color[1], pc[2] * self.color[2]],
            None => self.color,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FractalField {
    objects: Vec<FractalObject>,
    time: f32,
}

impl FractalField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scene with freshly generated geometry.
    pub fn generate(&mut self, seed: u64) {
        self.dispose();
        let mut rng = StdRng::seed_from_u64(seed);
        self.objects.push(sierpinski_tetrahedron(&mut rng));
        self.objects.extend(menger_sponge(&mut rng));
        self.objects.push(julia_cloud(&mut rng));
        self.objects.extend(flower_of_life());
        log::debug!("[fractal] generated {} objects", self.objects.len());
    }

    pub fn dispose(&mut self) {
        self.objects.clear();
        self.time = 0.0;
    }

    /// Spin, pulse and recolor every object in proportion to the phase intensity.
    pub fn update(&mut self, dt_sec: f32, phase: &PhaseState) {
        self.time += dt_sec;
        let t = self.time;
        let intensity = phase.intensity;
        for (i, obj) in self.objects.iter_mut().enumerate() {
            let fi = i as f32;
            obj.rotation.x += dt_sec * 0.2 * intensity;
            obj.rotation.y += dt_sec * 0.3 * intensity;
            obj.scale = 1.0 + (t * 2.0 + fi).sin() * 0.1 * intensity;
            obj.color = hsl_to_rgb((t * 0.1 + fi * 0.1).rem_euclid(1.0), 1.0, 0.5);
            obj.opacity = 0.5 + (t * 3.0 + fi).sin() * 0.2 * intensity;
        }
    }

    pub fn objects(&self) -> &[FractalObject] {
        &self.objects
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn point_count(&self) -> usize {
        self.objects.iter().map(|o| o.points.len()).sum()
    }
}

fn sierpinski_tetrahedron(rng: &mut StdRng) -> FractalObject {
    let mut vertices = Vec::new();
    add_tetrahedron(Vec3::ZERO, SIERPINSKI_SIZE, SIERPINSKI_DEPTH, &mut vertices);
    let colors = vertices
        .iter()
        .map(|_| [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()])
        .collect();
    let mut obj = FractalObject::new(
        FractalKind::SierpinskiTetrahedron,
        Vec3::from(SIERPINSKI_ORIGIN),
        vertices,
        [1.0, 1.0, 1.0],
        0.8,
    );
    obj.point_colors = Some(colors);
    obj
}

// Emits 12 vertices (four triangles) per leaf tetrahedron.
fn add_tetrahedron(center: Vec3, size: f32, depth: u32, out: &mut Vec<Vec3>) {
    let h = size * (2.0_f32 / 3.0).sqrt();
    let r = size * 3.0_f32.sqrt() / 3.0;
    let around = |radius: f32, y: f32, k: f32| {
        let a = k * TAU / 3.0;
        Vec3::new(center.x + radius * a.cos(), y, center.z + radius * a.sin())
    };
    if depth == 0 {
        let v1 = Vec3::new(center.x, center.y + h, center.z);
        let v2 = around(r, center.y - h / 3.0, 0.0);
        let v3 = around(r, center.y - h / 3.0, 1.0);
        let v4 = around(r, center.y - h / 3.0, 2.0);
        out.extend_from_slice(&[v1, v2, v3, v1, v2, v4, v1, v3, v4, v2, v3, v4]);
        return;
    }
    let half = size / 2.0;
    add_tetrahedron(Vec3::new(center.x, center.y + h / 2.0, center.z), half, depth - 1, out);
    for k in 0..3 {
        add_tetrahedron(around(r / 2.0, center.y - h / 6.0, k as f32), half, depth - 1, out);
    }
}

fn menger_sponge(rng: &mut StdRng) -> Vec<FractalObject> {
    let mut cubes = Vec::new();
    add_cube(Vec3::from(MENGER_ORIGIN), MENGER_SIZE, MENGER_DEPTH, rng, &mut cubes);
    cubes
}

fn add_cube(center: Vec3, size: f32, depth: u32, rng: &mut StdRng, out: &mut Vec<FractalObject>) {
    if depth == 0 {
        let h = size / 2.0;
        let corners = (0..8)
            .map(|c| {
                Vec3::new(
                    if c & 1 == 0 { -h } else { h },
                    if c & 2 == 0 { -h } else { h },
                    if c & 4 == 0 { -h } else { h },
                )
            })
            .collect();
        let color = hsl_to_rgb(rng.gen::<f32>(), 1.0, 0.5);
        out.push(FractalObject::new(FractalKind::MengerCube, center, corners, color, 0.6));
        return;
    }
    let step = size / 3.0;
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                // Drop the face centers and the body center: 27 - 7 = 20 sub-cubes.
                let centered = [i, j, k].iter().filter(|&&c| c == 1).count();
                if centered >= 2 {
                    continue;
                }
                let offset = Vec3::new(i as f32 - 1.0, j as f32 - 1.0, k as f32 - 1.0) * step;
                add_cube(center + offset, step, depth - 1, rng, out);
            }
        }
    }
}

/// True when `z` stays bounded under `z <- z^2 + c` within the iteration limit.
pub fn julia_bounded(z: Vec2, c: Vec2, iterations: usize) -> bool {
    let mut z = z;
    for _ in 0..iterations {
        z = Vec2::new(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y);
        if z.length() > 2.0 {
            return false;
        }
    }
    true
}

fn julia_cloud(rng: &mut StdRng) -> FractalObject {
    let mut points = Vec::new();
    for _ in 0..JULIA_SAMPLES {
        let z = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * 2.0;
        let depth = rng.gen::<f32>() - 0.5;
        if julia_bounded(z, JULIA_C, JULIA_ITERATIONS) {
            points.push(Vec3::new(z.x, z.y, depth));
        }
    }
    FractalObject::new(
        FractalKind::JuliaCloud,
        Vec3::from(JULIA_ORIGIN),
        points,
        [1.0, 0.0, 1.0],
        0.8,
    )
}

fn ring_points() -> Vec<Vec3> {
    (0..RING_SEGMENTS)
        .map(|s| {
            let a = s as f32 / RING_SEGMENTS as f32 * TAU;
            Vec3::new(a.cos() * FLOWER_RADIUS, a.sin() * FLOWER_RADIUS, 0.0)
        })
        .collect()
}

fn flower_of_life() -> Vec<FractalObject> {
    let center = Vec3::from(FLOWER_ORIGIN);
    let mut rings = Vec::with_capacity(FLOWER_PETALS + 1);
    for i in 0..FLOWER_PETALS {
        let angle = i as f32 / FLOWER_PETALS as f32 * PI * 2.0;
        let origin = center + Vec3::new(angle.cos() * FLOWER_RADIUS, 0.0, angle.sin() * FLOWER_RADIUS);
        let color = hsl_to_rgb(i as f32 / FLOWER_PETALS as f32, 1.0, 0.5);
        let mut ring = FractalObject::new(FractalKind::FlowerRing, origin, ring_points(), color, 0.7);
        ring.rotation.x = FRAC_PI_2;
        rings.push(ring);
    }
    let mut middle = FractalObject::new(FractalKind::FlowerRing, center, ring_points(), [1.0, 1.0, 1.0], 0.7);
    middle.rotation.x = FRAC_PI_2;
    rings.push(middle);
    rings
}
