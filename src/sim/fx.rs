//! Cosmetic effects: particles, floating text and one-shot flashes
//!
//! None of this feeds back into gameplay. Creation is capacity-bounded: a
//! burst larger than the remaining headroom is truncated, never rejected.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub color: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub label: String,
    pub color: u32,
    pub life: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Random-target strike
    Strike,
    /// Splash detonation
    Blast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientEffect {
    pub pos: Vec2,
    pub kind: EffectKind,
    pub radius: f32,
    pub life: u32,
}

/// Capacity limits for each cosmetic population
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FxCaps {
    pub particles: usize,
    pub texts: usize,
    pub effects: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fx {
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub effects: Vec<TransientEffect>,
    caps: FxCaps,
}

impl Fx {
    pub fn new(caps: FxCaps) -> Self {
        Self {
            particles: Vec::with_capacity(caps.particles),
            texts: Vec::with_capacity(caps.texts),
            effects: Vec::with_capacity(caps.effects),
            caps,
        }
    }

    /// Burst of up to `count` particles with random velocities
    pub fn spawn_particles<R: Rng>(&mut self, rng: &mut R, pos: Vec2, color: u32, count: usize) {
        let room = self.caps.particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
                (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
            );
            self.particles.push(Particle {
                pos,
                vel,
                life: PARTICLE_LIFE,
                color,
            });
        }
    }

    pub fn spawn_text(&mut self, pos: Vec2, label: impl Into<String>, color: u32) {
        if self.texts.len() >= self.caps.texts {
            return;
        }
        self.texts.push(FloatingText {
            pos,
            label: label.into(),
            color,
            life: TEXT_LIFE,
        });
    }

    /// Floating damage number (whole points)
    pub fn spawn_damage(&mut self, pos: Vec2, damage: f32, color: u32) {
        self.spawn_text(pos, format!("{}", damage.floor() as i64), color);
    }

    pub fn spawn_effect(&mut self, pos: Vec2, kind: EffectKind, radius: f32) {
        if self.effects.len() >= self.caps.effects {
            return;
        }
        self.effects.push(TransientEffect {
            pos,
            kind,
            radius,
            life: EFFECT_LIFE,
        });
    }

    /// Advance and expire everything by one frame
    pub fn decay(&mut self) {
        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });
        self.texts.retain_mut(|t| {
            t.pos.y -= TEXT_RISE;
            t.life = t.life.saturating_sub(1);
            t.life > 0
        });
        self.effects.retain_mut(|e| {
            e.life = e.life.saturating_sub(1);
            e.life > 0
        });
    }
}
