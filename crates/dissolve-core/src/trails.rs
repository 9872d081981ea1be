use crate::color::hsl_to_rgb;
use crate::hand::HandFrame;
use glam::Vec3;

/// A short-lived glowing particle left behind by a tracked hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailParticle {
    pub position: Vec3,
    pub color: [f32; 3],
    pub born_sec: f64,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct HandTrails {
    lifetime_sec: f64,
    particles: Vec<TrailParticle>,
}

impl HandTrails {
    pub fn new(lifetime_sec: f64) -> Self {
        Self {
            lifetime_sec: lifetime_sec.max(f64::EPSILON),
            particles: Vec::new(),
        }
    }

    /// Drop one particle per tracked hand, then age and prune the rest.
    pub fn update(&mut self, now_sec: f64, hands: &HandFrame, hue: f32) {
        let color = hsl_to_rgb(hue, 1.0, 0.5);
        for hand in hands.present() {
            self.particles.push(TrailParticle {
                position: hand.position,
                color,
                born_sec: now_sec,
                opacity: 1.0,
            });
        }
        let lifetime = self.lifetime_sec;
        self.particles.retain_mut(|p| {
            let age = now_sec - p.born_sec;
            if age > lifetime {
                return false;
            }
            p.opacity = (1.0 - age / lifetime).clamp(0.0, 1.0) as f32;
            true
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[TrailParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
