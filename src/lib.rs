//! Neon Survivor - a top-down survival arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (spawning, weapons, loot, leveling)
//! - `config`: Runtime tunables loaded from JSON
//! - `meta`: Cross-session progression fold for the persistence collaborator
//! - `error`: Typed errors for the fallible edges of the crate

pub mod config;
pub mod error;
pub mod meta;
pub mod sim;

pub use config::{QualityPreset, SimConfig};
pub use error::{ConfigError, MetaError, SelectionError};
pub use meta::MetaProgress;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation frames per second (one step per display refresh)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// World dimensions (portrait viewport)
    pub const WORLD_WIDTH: f32 = 360.0;
    pub const WORLD_HEIGHT: f32 = 640.0;
    /// Session length in seconds
    pub const STAGE_DURATION_SECS: u32 = 60;

    /// Roster caps
    pub const MAX_WEAPONS: usize = 6;
    pub const MAX_PASSIVES: usize = 6;

    /// Population caps
    pub const MAX_PICKUPS: usize = 50;
    pub const MAX_PARTICLES: usize = 30;
    pub const MAX_TEXTS: usize = 40;
    pub const MAX_EFFECTS: usize = 16;
    pub const MAX_PROJECTILES: usize = 256;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 4.5;
    pub const PLAYER_BASE_HEALTH: f32 = 100.0;
    /// Player is kept this far inside the world edges
    pub const PLAYER_EDGE_PADDING: f32 = 10.0;
    /// Input below this magnitude doesn't change the facing vector
    pub const FACING_DEADZONE: f32 = 0.1;

    /// Enemy touching the player
    pub const CONTACT_RADIUS: f32 = 15.0;
    pub const CONTACT_BASE_DAMAGE: f32 = 10.0;
    pub const CONTACT_DAMAGE_PER_STAGE: f32 = 2.0;
    pub const CONTACT_TICK_FRAMES: u64 = 30;

    /// Weapons
    pub const MIN_FIRE_COOLDOWN: f32 = 5.0;
    pub const COOLDOWN_MULT_FLOOR: f32 = 0.4;
    pub const ENGAGE_RADIUS: f32 = 250.0;
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const DEFAULT_PROJECTILE_LIFE: u32 = 60;
    pub const SPLASH_FACTOR: f32 = 0.5;
    pub const AURA_TEXT_FRAMES: u64 = 20;
    /// Orbiter angular rate (radians per frame)
    pub const ORBIT_ANGULAR_RATE: f32 = 1.0 / 30.0;

    /// Magnet radius before upgrades
    pub const BASE_MAGNET_RADIUS: f32 = 60.0;
    /// Health scale applied by each max-health passive pick
    pub const MAX_HEALTH_UPGRADE: f32 = 1.2;
    /// Upper bound on the armor damage-reduction fraction
    pub const ARMOR_CAP: f32 = 0.9;

    /// Cosmetic lifetimes (frames)
    pub const TEXT_LIFE: u32 = 30;
    pub const TEXT_RISE: f32 = 0.5;
    pub const PARTICLE_LIFE: u32 = 10;
    pub const PARTICLE_SPEED: f32 = 5.0;
    pub const EFFECT_LIFE: u32 = 12;
}

/// 0xRRGGBB colors handed to the rendering collaborator
pub mod palette {
    pub const PLAYER: u32 = 0x00f3ff;
    pub const EXPERIENCE: u32 = 0x2ecc71;
    pub const ENEMY: u32 = 0xff0055;
    pub const FAST: u32 = 0xff00ff;
    pub const TANK: u32 = 0xff4400;
    pub const TEXT: u32 = 0xffffff;
    pub const BULLET: u32 = 0xffff00;
    pub const GOLD: u32 = 0xffd700;
    pub const DAMAGE: u32 = 0xff0000;
    pub const POISON: u32 = 0x00ff00;
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 { Some(delta / dist) } else { None }
}

/// Convert polar (r, theta) around `center` to cartesian
#[inline]
pub fn polar_offset(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Squared-distance circle overlap test (no square root)
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}
