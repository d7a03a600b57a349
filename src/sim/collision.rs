//! Collision detection and damage resolution
//!
//! Everything is a circle. Overlap tests compare squared distances, so no
//! square roots are taken on the hot path.

use glam::Vec2;

use super::catalog::{FirePattern, WeaponKind};
use super::context::SimulationContext;
use super::fx::{EffectKind, Fx};
use super::loot;
use super::state::{Enemy, Projectile};
use crate::consts::*;
use crate::{palette, polar_offset, within_radius};

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect the velocity components that carry `pos` further outside the world
pub fn bounce_off_walls(pos: Vec2, vel: Vec2, width: f32, height: f32) -> Vec2 {
    let mut vel = vel;
    if (pos.x <= 0.0 && vel.x < 0.0) || (pos.x >= width && vel.x > 0.0) {
        vel = reflect_velocity(vel, Vec2::X);
    }
    if (pos.y <= 0.0 && vel.y < 0.0) || (pos.y >= height && vel.y > 0.0) {
        vel = reflect_velocity(vel, Vec2::Y);
    }
    vel
}

/// True once `pos` is more than `margin` outside the world rectangle
pub fn out_of_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x <= -margin || pos.x >= width + margin || pos.y <= -margin || pos.y >= height + margin
}

/// Orbiter centres at `frame`, evenly spaced and rotating at a constant rate
pub fn orbiter_positions(center: Vec2, frame: u64, range: f32, count: u32) -> impl Iterator<Item = Vec2> {
    let base = frame as f32 * ORBIT_ANGULAR_RATE;
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count).map(move |i| polar_offset(center, range, base + i as f32 * step))
}

/// Apply `amount` to every live enemy other than `primary` within `radius` of `center`
fn apply_splash(enemies: &mut [Enemy], primary: usize, center: Vec2, radius: f32, amount: f32) {
    for (j, other) in enemies.iter_mut().enumerate() {
        if j != primary && other.is_alive() && within_radius(other.pos, center, radius) {
            other.health -= amount;
        }
    }
}

/// Test one projectile against every live enemy. Returns true if the
/// projectile was consumed by a non-piercing hit.
fn resolve_hits(projectile: &mut Projectile, enemies: &mut [Enemy], fx: &mut Fx) -> bool {
    for i in 0..enemies.len() {
        let enemy = &enemies[i];
        if !enemy.is_alive() || projectile.hits.contains(&enemy.id) {
            continue;
        }
        if !within_radius(enemy.pos, projectile.pos, enemy.radius + PROJECTILE_RADIUS) {
            continue;
        }

        let id = enemy.id;
        enemies[i].health -= projectile.damage;
        fx.spawn_damage(enemies[i].pos, projectile.damage, palette::TEXT);

        if let Some(radius) = projectile.splash {
            apply_splash(enemies, i, projectile.pos, radius, projectile.damage * SPLASH_FACTOR);
            fx.spawn_effect(projectile.pos, EffectKind::Blast, radius);
        }

        if !projectile.pierce {
            return true;
        }
        projectile.hits.push(id);
    }
    false
}

/// Advance every projectile, resolve its hits and drop the spent ones
pub fn update_projectiles(ctx: &mut SimulationContext) {
    let world = &ctx.config.world;
    let (width, height, margin) = (world.width, world.height, world.bounds_margin);
    let enemies = &mut ctx.enemies;
    let fx = &mut ctx.fx;

    ctx.projectiles.retain_mut(|p| {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
        if let Some(gravity) = p.gravity {
            p.vel.y += gravity;
        }
        if p.bounce {
            p.vel = bounce_off_walls(p.pos, p.vel, width, height);
        }

        let consumed = resolve_hits(p, enemies, fx);
        p.life > 0 && !consumed && (p.bounce || !out_of_bounds(p.pos, width, height, margin))
    });
}

/// Orbiters damage overlapping enemies once per tick window, not every frame.
/// An enemy touched by several orbiters in the same tick is damaged once.
pub fn apply_orbits(ctx: &mut SimulationContext) {
    let Some(level) = ctx.loadout.weapon_level(WeaponKind::Orbit) else {
        return;
    };
    let FirePattern::Orbit {
        range,
        count,
        hit_radius,
        tick_frames,
    } = WeaponKind::Orbit.spec().pattern
    else {
        return;
    };
    if !ctx.clock.every(tick_frames) {
        return;
    }

    let damage = WeaponKind::Orbit.damage(level, ctx.stats.attack);
    let (center, frame, range) = (ctx.player.pos, ctx.clock.frames, range * ctx.stats.area);

    for enemy in ctx.enemies.iter_mut().filter(|e| e.is_alive()) {
        let touching = orbiter_positions(center, frame, range, count)
            .any(|orbiter| within_radius(enemy.pos, orbiter, hit_radius));
        if touching {
            enemy.health -= damage;
        }
    }
}

/// Remove dead enemies, handing each to the loot system exactly once.
/// Returns the number removed.
pub fn prune_dead(ctx: &mut SimulationContext) -> u32 {
    let SimulationContext {
        config,
        enemies,
        pickups,
        fx,
        rng,
        ids,
        kills,
        ..
    } = ctx;

    let mut removed = 0;
    enemies.retain(|enemy| {
        if enemy.is_alive() {
            return true;
        }
        loot::drop_loot(pickups, config, rng, ids, enemy.pos);
        fx.spawn_particles(rng, enemy.pos, enemy.color, 4);
        removed += 1;
        false
    });
    *kills += removed;
    removed
}
