//! Player and enemy movement, plus enemy contact damage

use glam::Vec2;

use super::context::SimulationContext;
use crate::consts::*;
use crate::{direction_to, palette, within_radius};

/// Clamp a raw input vector to components in [-1, 1] and magnitude ≤ 1
pub fn normalize_input(raw: Vec2) -> Vec2 {
    if !raw.is_finite() {
        return Vec2::ZERO;
    }
    raw.clamp(Vec2::NEG_ONE, Vec2::ONE).clamp_length_max(1.0)
}

/// Contact damage per tick after armor, never below 1
pub fn contact_damage(stage: u32, armor: f32) -> f32 {
    let raw = CONTACT_BASE_DAMAGE + stage as f32 * CONTACT_DAMAGE_PER_STAGE;
    (raw * (1.0 - armor)).max(1.0)
}

pub fn move_player(ctx: &mut SimulationContext, input: Vec2) {
    let input = normalize_input(input);
    if input == Vec2::ZERO {
        return;
    }

    let player = &mut ctx.player;
    let speed = player.speed * ctx.stats.move_speed;
    let pad = PLAYER_EDGE_PADDING;
    let max = Vec2::new(ctx.config.world.width - pad, ctx.config.world.height - pad);
    player.pos = (player.pos + input * speed).clamp(Vec2::splat(pad), max.max(Vec2::splat(pad)));

    if input.x != 0.0 {
        player.facing = input.x.signum();
    }
    let len = input.length();
    if len > FACING_DEADZONE {
        player.facing_vec = input / len;
    }
}

/// Pursue the player; on contact frames, enemies already touching before
/// this frame's step deal damage. Returns the total damage dealt this frame.
pub fn move_enemies(ctx: &mut SimulationContext) -> f32 {
    let target = ctx.player.pos;
    let contact_frame = ctx.clock.every(CONTACT_TICK_FRAMES);
    let damage = contact_damage(ctx.stage, ctx.stats.armor);
    let mut touching = 0u32;

    for enemy in ctx.enemies.iter_mut() {
        if contact_frame && within_radius(enemy.pos, target, CONTACT_RADIUS) {
            touching += 1;
        }
        if let Some(dir) = direction_to(enemy.pos, target) {
            enemy.pos += dir * enemy.speed;
        }
    }

    if touching == 0 {
        return 0.0;
    }

    let mut dealt = 0.0;
    for _ in 0..touching {
        if ctx.player.is_dead() {
            break;
        }
        let before = ctx.player.health;
        ctx.player.apply_damage(damage);
        dealt += before - ctx.player.health;
        ctx.fx.spawn_text(ctx.player.pos, format!("-{}", damage.floor() as i64), palette::DAMAGE);
    }
    dealt
}
