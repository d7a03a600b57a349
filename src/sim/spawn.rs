//! Enemy spawn director
//!
//! Spawn cadence, placement and archetype are pure functions of difficulty
//! and the session RNG.

use glam::Vec2;
use rand::Rng;

use super::context::SimulationContext;
use super::state::{Enemy, EnemyKind};
use crate::config::{SimConfig, SpawnMode};
use crate::polar_offset;

const BASE_HEALTH: f32 = 12.0;
const HEALTH_PER_DIFFICULTY: f32 = 8.0;
const BASE_SPEED: f32 = 1.6;
const SPEED_PER_DIFFICULTY: f32 = 0.05;

/// Frames between spawns at the given difficulty
pub fn spawn_interval(config: &SimConfig, difficulty: f32) -> u64 {
    let shaved = (difficulty * config.spawn.interval_per_difficulty).floor() as i64;
    let interval = config.spawn.base_interval as i64 - shaved;
    interval.max(config.min_spawn_interval() as i64) as u64
}

/// Pick a spawn position, or `None` if it lands outside the spawn bounds
pub fn spawn_position<R: Rng>(rng: &mut R, config: &SimConfig, player_pos: Vec2) -> Option<Vec2> {
    let (w, h) = (config.world.width, config.world.height);
    let pos = match config.spawn.mode {
        SpawnMode::Radial => {
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            polar_offset(player_pos, config.spawn.radial_distance, theta)
        }
        SpawnMode::Edges => {
            let offset = config.spawn.edge_offset;
            match rng.random_range(0..4) {
                0 => Vec2::new(rng.random::<f32>() * w, -offset),
                1 => Vec2::new(w + offset, rng.random::<f32>() * h),
                2 => Vec2::new(rng.random::<f32>() * w, h + offset),
                _ => Vec2::new(-offset, rng.random::<f32>() * h),
            }
        }
    };

    let margin = config.spawn.bounds_margin;
    let inside = pos.x >= -margin && pos.x <= w + margin && pos.y >= -margin && pos.y <= h + margin;
    inside.then_some(pos)
}

/// Weighted archetype draw
pub fn roll_kind<R: Rng>(rng: &mut R, config: &SimConfig) -> EnemyKind {
    let roll: f32 = rng.random();
    if roll < config.spawn.fast_chance {
        EnemyKind::Fast
    } else if roll < config.spawn.fast_chance + config.spawn.tank_chance {
        EnemyKind::Tank
    } else {
        EnemyKind::Normal
    }
}

/// Build an enemy with health and speed scaled by difficulty
pub fn make_enemy(id: u32, kind: EnemyKind, pos: Vec2, difficulty: f32) -> Enemy {
    let health = (BASE_HEALTH + difficulty * HEALTH_PER_DIFFICULTY) * kind.health_mult();
    let speed = (BASE_SPEED + difficulty * SPEED_PER_DIFFICULTY) * kind.speed_mult();
    Enemy::new(id, kind, pos, health, speed)
}

/// Spawn at most one enemy this frame; returns its id
pub fn update(ctx: &mut SimulationContext) -> Option<u32> {
    if !ctx.config.spawn.enabled {
        return None;
    }

    let difficulty = ctx.difficulty();
    if !ctx.clock.every(spawn_interval(&ctx.config, difficulty)) {
        return None;
    }

    let Some(pos) = spawn_position(&mut ctx.rng, &ctx.config, ctx.player.pos) else {
        log::trace!("frame {}: spawn rejected outside bounds", ctx.clock.frames);
        return None;
    };

    let kind = roll_kind(&mut ctx.rng, &ctx.config);
    let id = ctx.ids.next_id();
    ctx.enemies.push(make_enemy(id, kind, pos, difficulty));
    Some(id)
}
