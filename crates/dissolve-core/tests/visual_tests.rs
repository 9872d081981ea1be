// Host-side tests for the visual models: fractal field, melt uniforms,
// hand trails, sprites and color helpers.

use dissolve_core::*;
use glam::{Vec2, Vec3, Vec3Swizzles};

fn phase_with(intensity: f32) -> PhaseState {
    PhaseState {
        kind: PhaseKind::Peak,
        name: "peak",
        description: "",
        intensity,
        progress: 0.5,
        hue: 0.25,
        time_remaining_sec: 10.0,
    }
}

fn count(field: &FractalField, kind: FractalKind) -> usize {
    field.objects().iter().filter(|o| o.kind == kind).count()
}

#[test]
fn generate_builds_the_full_scene() {
    let mut field = FractalField::new();
    field.generate(DEFAULT_FRACTAL_SEED);
    assert_eq!(field.objects().len(), 29);
    assert_eq!(count(&field, FractalKind::SierpinskiTetrahedron), 1);
    assert_eq!(count(&field, FractalKind::MengerCube), 20);
    assert_eq!(count(&field, FractalKind::JuliaCloud), 1);
    assert_eq!(count(&field, FractalKind::FlowerRing), 7);

    let tetra = &field.objects()[0];
    // 4^2 leaves, 12 vertices each
    assert_eq!(tetra.points.len(), 192);
    assert_eq!(tetra.point_colors.as_ref().map(Vec::len), Some(192));
}

#[test]
fn menger_sponge_drops_face_and_body_centers() {
    let mut field = FractalField::new();
    field.generate(1);
    let origin = Vec3::from(MENGER_ORIGIN);
    for cube in field.objects().iter().filter(|o| o.kind == FractalKind::MengerCube) {
        assert_eq!(cube.points.len(), 8);
        let offset = cube.origin - origin;
        let centered = offset.to_array().iter().filter(|c| c.abs() < 1e-4).count();
        assert!(centered < 2, "cube at {offset:?} should have been removed");
        assert!(offset.abs().max_element() < 0.2 + 1e-4);
    }
}

#[test]
fn julia_points_are_bounded_samples() {
    let mut field = FractalField::new();
    field.generate(7);
    let julia = field
        .objects()
        .iter()
        .find(|o| o.kind == FractalKind::JuliaCloud)
        .expect("julia cloud");
    assert!(!julia.points.is_empty() && julia.points.len() <= 1000);
    for p in &julia.points {
        assert!(julia_bounded(p.xy(), Vec2::new(-0.7, 0.27), 20));
        assert!(p.z.abs() <= 0.5);
    }
}

#[test]
fn julia_escape_test() {
    assert!(julia_bounded(Vec2::ZERO, Vec2::ZERO, 50));
    assert!(!julia_bounded(Vec2::new(2.0, 2.0), Vec2::ZERO, 1));
    assert!(!julia_bounded(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 20));
}

#[test]
fn flower_rings_lie_flat() {
    let mut field = FractalField::new();
    field.generate(3);
    let rings: Vec<_> = field
        .objects()
        .iter()
        .filter(|o| o.kind == FractalKind::FlowerRing)
        .collect();
    let center = Vec3::from(FLOWER_ORIGIN);
    for ring in &rings {
        assert_eq!(ring.points.len(), 32);
        for p in ring.world_points() {
            assert!((p.y - center.y).abs() < 1e-4, "ring rotated into the horizontal plane");
        }
    }
    assert_eq!(rings.last().map(|r| r.origin), Some(center));
}

#[test]
fn same_seed_same_scene() {
    let mut a = FractalField::new();
    let mut b = FractalField::new();
    a.generate(99);
    b.generate(99);
    for (x, y) in a.objects().iter().zip(b.objects()) {
        assert_eq!(x.points, y.points);
        assert_eq!(x.color, y.color);
    }
    let mut c = FractalField::new();
    c.generate(100);
    let julia = |f: &FractalField| f.objects()[21].points.clone();
    assert_ne!(julia(&a), julia(&c), "different seeds sample different clouds");
}

#[test]
fn update_animates_in_proportion_to_intensity() {
    let mut field = FractalField::new();
    field.generate(5);
    field.update(1.0, &phase_with(0.0));
    for obj in field.objects() {
        assert_eq!(obj.rotation.y, 0.0);
        assert!((obj.scale - 1.0).abs() < 1e-6);
        assert!((obj.opacity - 0.5).abs() < 1e-6);
    }

    let mut field = FractalField::new();
    field.generate(5);
    field.update(0.5, &phase_with(1.0));
    let first = &field.objects()[0];
    assert!((first.rotation.x - 0.1).abs() < 1e-6);
    assert!((first.rotation.y - 0.15).abs() < 1e-6);
    let expected_scale = 1.0 + (1.0f32).sin() * 0.1;
    assert!((first.scale - expected_scale).abs() < 1e-5);
    assert!((field.time() - 0.5).abs() < 1e-6);
}

#[test]
fn dispose_clears_the_scene() {
    let mut field = FractalField::new();
    field.generate(5);
    field.update(0.5, &phase_with(1.0));
    field.dispose();
    assert!(field.objects().is_empty());
    assert_eq!(field.point_count(), 0);
    assert_eq!(field.time(), 0.0);
}

#[test]
fn melt_setters_clamp_and_update_scales_by_phase() {
    let mut melt = MeltUniforms::new();
    melt.apply(&EffectParameters {
        intensity: 1.125,
        distortion: 0.0,
        spread: 0.5,
    });
    melt.update(0.25, &phase_with(0.8));
    let v = melt.values();
    assert!((v.intensity - 0.8).abs() < 1e-6, "clamped to 1 then scaled");
    assert!((v.spread - 0.4).abs() < 1e-6);
    assert_eq!(v.distortion, 0.0);
    assert!((v.time - 0.25).abs() < 1e-6);

    melt.set_intensity(-3.0);
    melt.update(0.25, &phase_with(0.8));
    assert_eq!(melt.values().intensity, 0.0);
    assert!((melt.values().time - 0.5).abs() < 1e-6);

    melt.reset();
    assert_eq!(melt.values(), MeltValues::default());
}

#[test]
fn melt_uniforms_are_gpu_sized() {
    assert_eq!(std::mem::size_of::<MeltValues>(), 16);
    let v = MeltValues {
        time: 1.0,
        intensity: 0.5,
        distortion: 0.0,
        spread: 0.25,
    };
    let floats: [f32; 4] = bytemuck::cast(v);
    assert_eq!(floats, [1.0, 0.5, 0.0, 0.25]);
}

#[test]
fn melt_displace_is_identity_when_calm() {
    let calm = MeltValues {
        time: 3.0,
        ..Default::default()
    };
    let uv = Vec2::new(0.3, 0.7);
    assert!((melt_displace(uv, &calm) - uv).length() < 1e-6);

    let wild = MeltValues {
        time: 3.0,
        intensity: 1.0,
        distortion: 1.0,
        spread: 0.0,
    };
    let moved = melt_displace(uv, &wild);
    assert!((moved - uv).length() <= 0.05 + 0.02 + 1e-5);
}

#[test]
fn trails_fade_linearly_and_expire() {
    let mut trails = HandTrails::new(1.0);
    let hand = HandState {
        position: Vec3::new(0.1, 1.0, -0.5),
        ..Default::default()
    };
    trails.update(0.0, &HandFrame::new(Some(hand), None), 0.0);
    assert_eq!(trails.len(), 1);
    let p = trails.particles()[0];
    assert_eq!(p.position, hand.position);
    assert!((p.color[0] - 1.0).abs() < 1e-6 && p.color[1].abs() < 1e-6, "hue 0 is red");

    trails.update(0.25, &HandFrame::default(), 0.0);
    assert!((trails.particles()[0].opacity - 0.75).abs() < 1e-6);
    trails.update(1.01, &HandFrame::default(), 0.0);
    assert!(trails.is_empty());
}

#[test]
fn zero_lifetime_trails_do_not_produce_nan() {
    let mut trails = HandTrails::new(0.0);
    let hand = HandState::default();
    trails.update(0.0, &HandFrame::new(Some(hand), Some(hand)), 0.5);
    assert!(trails.particles().iter().all(|p| p.opacity.is_finite()));
}

#[test]
fn hsl_primaries() {
    let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
    assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
    assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
    assert!(close(hsl_to_rgb(1.0, 1.0, 0.5), [1.0, 0.0, 0.0]), "hue wraps");
    assert!(close(hsl_to_rgb(0.4, 0.0, 0.3), [0.3, 0.3, 0.3]));
}

#[test]
fn sprites_cover_points_and_trails() {
    let mut field = FractalField::new();
    field.generate(11);
    let mut trails = HandTrails::new(1.0);
    trails.update(0.0, &HandFrame::new(Some(HandState::default()), None), 0.0);

    let mut sprites = vec![Sprite {
        position: Vec3::ZERO,
        radius: 1.0,
        color: [0.0; 4],
    }];
    collect_sprites(&field, trails.particles(), &mut sprites);
    assert_eq!(sprites.len(), field.point_count() + 1);
    let last = sprites.last().unwrap();
    assert!((last.radius - TRAIL_RADIUS).abs() < 1e-6);
    assert!((last.color[3] - 1.0).abs() < 1e-6);
}

#[test]
fn camera_looks_down_negative_z_at_eye_height() {
    let vp = view_projection(16.0 / 9.0);
    let ahead = vp * Vec3::new(0.0, EYE_HEIGHT, -3.0).extend(1.0);
    assert!(ahead.w > 0.0);
    assert!((ahead.x / ahead.w).abs() < 1e-5 && (ahead.y / ahead.w).abs() < 1e-5);
    let behind = vp * Vec3::new(0.0, EYE_HEIGHT, 3.0).extend(1.0);
    assert!(behind.w < 0.0);
}
