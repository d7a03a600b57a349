//! Weapon cooldowns and firing patterns

use glam::Vec2;
use rand::Rng;

use super::catalog::{FirePattern, Launch, ProjectileSpec, WeaponKind};
use super::context::SimulationContext;
use super::fx::EffectKind;
use super::state::{Enemy, Projectile};
use crate::consts::*;
use crate::{palette, within_radius};

/// Cooldown applied after a shot, never below [`MIN_FIRE_COOLDOWN`]
pub fn fired_cooldown(kind: WeaponKind, cooldown_mult: f32) -> f32 {
    let mult = cooldown_mult.max(COOLDOWN_MULT_FLOOR);
    (kind.spec().cooldown * mult).max(MIN_FIRE_COOLDOWN)
}

/// Nearest live enemy by squared distance
pub fn nearest_enemy(enemies: &[Enemy], pos: Vec2) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
}

/// Count down every timer; fire and reset the ones that expired
pub fn update(ctx: &mut SimulationContext) {
    for i in 0..ctx.loadout.weapons.len() {
        let slot = &ctx.loadout.weapons[i];
        let (kind, level, cooldown) = (slot.kind, slot.level, slot.cooldown);
        if !kind.uses_cooldown() {
            continue;
        }

        if cooldown <= 0.0 {
            fire(ctx, kind, level);
            ctx.loadout.weapons[i].cooldown = fired_cooldown(kind, ctx.stats.cooldown);
        } else {
            ctx.loadout.weapons[i].cooldown = (cooldown - 1.0).max(0.0);
        }
    }
}

pub fn fire(ctx: &mut SimulationContext, kind: WeaponKind, level: u32) {
    let damage = kind.damage(level, ctx.stats.attack);
    let area = ctx.stats.area;
    match kind.spec().pattern {
        FirePattern::Projectile(spec) => fire_projectiles(ctx, kind, &spec, damage),
        FirePattern::RandomStrike => strike_random(ctx, damage),
        FirePattern::Aura { range } => pulse_aura(ctx, range * area, damage),
        FirePattern::Orbit { .. } => {}
    }
}

/// Aim toward the nearest enemy in range, otherwise along the facing vector
fn aim_angle(ctx: &SimulationContext) -> f32 {
    let origin = ctx.player.pos;
    match nearest_enemy(&ctx.enemies, origin) {
        Some(target) if within_radius(target.pos, origin, ENGAGE_RADIUS) => {
            let d = target.pos - origin;
            d.y.atan2(d.x)
        }
        _ => ctx.player.facing_vec.y.atan2(ctx.player.facing_vec.x),
    }
}

fn fire_projectiles(ctx: &mut SimulationContext, kind: WeaponKind, spec: &ProjectileSpec, damage: f32) {
    let aim = aim_angle(ctx);
    let facing = ctx.player.facing;
    let count = spec.count.max(1);
    let center = (count - 1) as f32 / 2.0;

    for i in 0..count {
        if ctx.projectiles.len() >= ctx.config.caps.projectiles {
            break;
        }
        let angle = aim + (i as f32 - center) * spec.spread;
        let vel = match spec.launch {
            Launch::Aimed => Vec2::new(angle.cos(), angle.sin()) * spec.speed,
            Launch::Lob { vy, drift } => Vec2::new(facing * drift, vy),
            Launch::Horizontal => Vec2::new(facing * spec.speed, 0.0),
        };
        let id = ctx.ids.next_id();
        ctx.projectiles.push(Projectile {
            id,
            pos: ctx.player.pos,
            vel,
            damage,
            life: spec.life,
            splash: spec.splash,
            pierce: spec.pierce,
            bounce: spec.bounce,
            gravity: spec.gravity,
            weapon: kind,
            hits: Vec::new(),
        });
    }
}

/// Instant hit on a uniformly random live enemy; no projectile is created
fn strike_random(ctx: &mut SimulationContext, damage: f32) {
    let live = ctx.enemies.iter().filter(|e| e.is_alive()).count();
    if live == 0 {
        return;
    }
    let pick = ctx.rng.random_range(0..live);
    let Some(target) = ctx.enemies.iter_mut().filter(|e| e.is_alive()).nth(pick) else {
        return;
    };

    target.health -= damage;
    let pos = target.pos;
    ctx.fx.spawn_damage(pos, damage, palette::BULLET);
    ctx.fx.spawn_particles(&mut ctx.rng, pos, palette::BULLET, 6);
    ctx.fx.spawn_effect(pos, EffectKind::Strike, 0.0);
}

fn pulse_aura(ctx: &mut SimulationContext, range: f32, damage: f32) {
    let center = ctx.player.pos;
    let show_text = ctx.clock.every(AURA_TEXT_FRAMES);
    for enemy in ctx.enemies.iter_mut().filter(|e| e.is_alive()) {
        if within_radius(enemy.pos, center, range) {
            enemy.health -= damage;
            if show_text {
                ctx.fx.spawn_damage(enemy.pos, damage, palette::POISON);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::SessionParams;
    use crate::sim::spawn::make_enemy;
    use crate::sim::state::{EnemyKind, Loadout};

    fn ctx_with(kind: WeaponKind) -> SimulationContext {
        let params = SessionParams {
            starting_weapon: kind,
            ..Default::default()
        };
        SimulationContext::new(SimConfig::default(), params)
    }

    fn enemy_at(id: u32, pos: Vec2, health: f32) -> Enemy {
        let mut e = make_enemy(id, EnemyKind::Normal, pos, 1.0);
        e.health = health;
        e.max_health = health;
        e
    }

    #[test]
    fn test_fired_cooldown_floors() {
        assert_eq!(fired_cooldown(WeaponKind::Kunai, 1.0), 12.0);
        assert_eq!(fired_cooldown(WeaponKind::Kunai, 0.1), 12.0 * COOLDOWN_MULT_FLOOR);
        assert_eq!(fired_cooldown(WeaponKind::Aura, 0.4), MIN_FIRE_COOLDOWN);
    }

    #[test]
    fn test_weapon_fires_then_waits_for_cooldown() {
        let mut ctx = ctx_with(WeaponKind::Kunai);
        update(&mut ctx);
        assert_eq!(ctx.projectiles.len(), 1);
        assert_eq!(ctx.loadout.weapons[0].cooldown, 12.0);

        for _ in 0..12 {
            update(&mut ctx);
        }
        assert_eq!(ctx.projectiles.len(), 1);
        assert_eq!(ctx.loadout.weapons[0].cooldown, 0.0);
        update(&mut ctx);
        assert_eq!(ctx.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_aims_at_nearest_enemy_in_range() {
        let mut ctx = ctx_with(WeaponKind::Kunai);
        let p = ctx.player.pos;
        ctx.enemies.push(enemy_at(1, p + Vec2::new(100.0, 0.0), 10.0));
        ctx.enemies.push(enemy_at(2, p + Vec2::new(0.0, 200.0), 10.0));
        fire(&mut ctx, WeaponKind::Kunai, 1);
        let vel = ctx.projectiles[0].vel;
        assert!((vel.x - 18.0).abs() < 1e-4);
        assert!(vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_projectile_uses_facing_when_out_of_range() {
        let mut ctx = ctx_with(WeaponKind::Kunai);
        let p = ctx.player.pos;
        ctx.enemies.push(enemy_at(1, p + Vec2::new(300.0, 0.0), 10.0));
        fire(&mut ctx, WeaponKind::Kunai, 1);
        let vel = ctx.projectiles[0].vel;
        assert!(vel.x.abs() < 1e-4);
        assert!((vel.y + 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_shotgun_fan_is_symmetric() {
        let mut ctx = ctx_with(WeaponKind::Shotgun);
        fire(&mut ctx, WeaponKind::Shotgun, 1);
        assert_eq!(ctx.projectiles.len(), 3);
        let angles: Vec<f32> = ctx.projectiles.iter().map(|p| p.vel.y.atan2(p.vel.x)).collect();
        let aim = -std::f32::consts::FRAC_PI_2;
        assert!((angles[1] - aim).abs() < 1e-4);
        assert!(((angles[0] - aim) + (angles[2] - aim)).abs() < 1e-4);
        assert!((angles[2] - angles[0] - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_special_launches() {
        let mut ctx = ctx_with(WeaponKind::Brick);
        ctx.player.facing = -1.0;
        fire(&mut ctx, WeaponKind::Brick, 1);
        fire(&mut ctx, WeaponKind::Drill, 1);
        assert_eq!(ctx.projectiles[0].vel, Vec2::new(-2.0, -13.0));
        assert!(ctx.projectiles[0].pierce);
        assert_eq!(ctx.projectiles[1].vel, Vec2::new(-5.0, 0.0));
        assert!(ctx.projectiles[1].bounce);
        assert_eq!(ctx.projectiles[1].life, 150);
    }

    #[test]
    fn test_random_strike_is_noop_without_enemies() {
        let mut ctx = ctx_with(WeaponKind::Lightning);
        fire(&mut ctx, WeaponKind::Lightning, 1);
        assert!(ctx.projectiles.is_empty());
        assert!(ctx.fx.effects.is_empty());
    }

    #[test]
    fn test_random_strike_hits_live_enemy() {
        let mut ctx = ctx_with(WeaponKind::Lightning);
        ctx.enemies.push(enemy_at(1, Vec2::new(50.0, 50.0), 0.0));
        ctx.enemies.push(enemy_at(2, Vec2::new(60.0, 60.0), 100.0));
        fire(&mut ctx, WeaponKind::Lightning, 1);
        assert_eq!(ctx.enemies[1].health, 50.0);
        assert!(ctx.projectiles.is_empty());
        assert_eq!(ctx.fx.effects.len(), 1);
    }

    #[test]
    fn test_aura_hits_only_enemies_in_scaled_range() {
        let mut ctx = ctx_with(WeaponKind::Aura);
        ctx.loadout = Loadout::with_weapon(WeaponKind::Aura);
        ctx.stats.area = 1.5;
        let p = ctx.player.pos;
        ctx.enemies.push(enemy_at(1, p + Vec2::new(120.0, 0.0), 100.0));
        ctx.enemies.push(enemy_at(2, p + Vec2::new(140.0, 0.0), 100.0));
        fire(&mut ctx, WeaponKind::Aura, 2);
        assert_eq!(ctx.enemies[0].health, 90.0);
        assert_eq!(ctx.enemies[1].health, 100.0);
    }

    #[test]
    fn test_aura_text_only_on_throttle_frames() {
        let mut ctx = ctx_with(WeaponKind::Aura);
        ctx.enemies.push(enemy_at(1, ctx.player.pos + Vec2::new(30.0, 0.0), 100.0));

        ctx.clock.frames = 19;
        fire(&mut ctx, WeaponKind::Aura, 1);
        assert_eq!(ctx.enemies[0].health, 95.0);
        assert!(ctx.fx.texts.is_empty());

        ctx.clock.frames = 20;
        fire(&mut ctx, WeaponKind::Aura, 1);
        assert_eq!(ctx.enemies[0].health, 90.0);
        assert_eq!(ctx.fx.texts.len(), 1);
    }

    #[test]
    fn test_projectile_cap() {
        let mut ctx = ctx_with(WeaponKind::Shotgun);
        ctx.config.caps.projectiles = 4;
        fire(&mut ctx, WeaponKind::Shotgun, 1);
        fire(&mut ctx, WeaponKind::Shotgun, 1);
        assert_eq!(ctx.projectiles.len(), 4);
    }
}
