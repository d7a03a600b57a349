//! Pickup lifecycle: drop, merge, magnetize and collect

use glam::Vec2;
use rand::Rng;

use super::context::SimulationContext;
use super::state::{IdAllocator, Pickup, PickupKind};
use crate::config::SimConfig;
use crate::{palette, within_radius};

/// Offset of the "+NG" label above the player
const COIN_LABEL_OFFSET: Vec2 = Vec2::new(0.0, -20.0);

fn push_capped(pickups: &mut Vec<Pickup>, cap: usize, pickup: Pickup) -> bool {
    if pickups.len() >= cap {
        log::trace!("pickup cap {cap} reached, dropping {:?}", pickup.kind);
        return false;
    }
    pickups.push(pickup);
    true
}

/// Drop loot for an enemy that died at `pos`.
///
/// One experience pickup is always attempted; a coin is attempted with
/// `coin_chance`. The coin roll is drawn even when the cap is full so the
/// random stream does not depend on pickup population.
pub fn drop_loot<R: Rng>(
    pickups: &mut Vec<Pickup>,
    config: &SimConfig,
    rng: &mut R,
    ids: &mut IdAllocator,
    pos: Vec2,
) {
    let cap = config.caps.pickups;
    let loot = &config.loot;

    let exp = Pickup {
        id: ids.next_id(),
        kind: PickupKind::Experience,
        pos,
        value: loot.experience_value,
    };
    push_capped(pickups, cap, exp);

    let roll: f32 = rng.random();
    if roll < loot.coin_chance {
        let coin = Pickup {
            id: ids.next_id(),
            kind: PickupKind::Coin,
            pos,
            value: loot.coin_value,
        };
        push_capped(pickups, cap, coin);
    }
}

/// Combine same-kind pickups closer than `radius`.
///
/// The survivor takes the summed value and sits at the midpoint. Each pickup
/// takes part in at most one merge per pass; absorbed entries are tombstoned
/// and compacted once the pass is over. Returns the number absorbed.
pub fn merge_pickups(pickups: &mut Vec<Pickup>, radius: f32) -> usize {
    let n = pickups.len();
    let mut absorbed = vec![false; n];
    let mut merged = vec![false; n];

    for i in 0..n {
        if absorbed[i] || merged[i] {
            continue;
        }
        for j in (i + 1)..n {
            if absorbed[j] || merged[j] {
                continue;
            }
            let (a, b) = (&pickups[i], &pickups[j]);
            if a.kind != b.kind || !within_radius(a.pos, b.pos, radius) {
                continue;
            }

            let (value, pos) = (b.value, b.pos);
            let survivor = &mut pickups[i];
            survivor.value = survivor.value.saturating_add(value);
            survivor.pos = (survivor.pos + pos) * 0.5;
            absorbed[j] = true;
            merged[i] = true;
            break;
        }
    }

    let mut idx = 0;
    pickups.retain(|_| {
        let keep = !absorbed[idx];
        idx += 1;
        keep
    });
    absorbed.iter().filter(|&&a| a).count()
}

/// Ease pickups inside the magnet radius toward the player and collect the
/// ones inside the pickup radius. Both tests use the distance before easing.
fn magnetize_and_collect(ctx: &mut SimulationContext) {
    let SimulationContext {
        config,
        player,
        stats,
        pickups,
        fx,
        progression,
        coins,
        ..
    } = ctx;

    let target = player.pos;
    let magnet = stats.magnet;
    let ease = config.loot.magnet_ease;
    let pickup_radius = config.loot.pickup_radius;

    pickups.retain_mut(|pickup| {
        let before = pickup.pos;
        if within_radius(before, target, magnet) {
            pickup.pos += (target - before) * ease;
        }
        if !within_radius(before, target, pickup_radius) {
            return true;
        }

        match pickup.kind {
            PickupKind::Coin => {
                *coins = coins.saturating_add(pickup.value);
                fx.spawn_text(target + COIN_LABEL_OFFSET, format!("+{}G", pickup.value), palette::GOLD);
            }
            PickupKind::Experience => progression.gain_experience(pickup.value),
        }
        false
    });
}

pub fn update(ctx: &mut SimulationContext) {
    let interval = ctx.config.loot.merge_interval;
    if ctx.clock.every(interval) && ctx.pickups.len() > 1 {
        let before = ctx.pickups.len();
        let absorbed = merge_pickups(&mut ctx.pickups, ctx.config.loot.merge_radius);
        log::trace!(
            "frame {}: merged {absorbed} of {before} pickups",
            ctx.clock.frames
        );
    }
    magnetize_and_collect(ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SessionParams;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn gem(id: u32, kind: PickupKind, x: f32, y: f32, value: u32) -> Pickup {
        Pickup {
            id,
            kind,
            pos: Vec2::new(x, y),
            value,
        }
    }

    fn ctx() -> SimulationContext {
        SimulationContext::new(SimConfig::default(), SessionParams::default())
    }

    #[test]
    fn test_drop_always_gives_experience() {
        let mut config = SimConfig::default();
        config.loot.coin_chance = 0.0;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = IdAllocator::default();
        let mut pickups = Vec::new();
        drop_loot(&mut pickups, &config, &mut rng, &mut ids, Vec2::ONE);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].kind, PickupKind::Experience);
        assert_eq!(pickups[0].value, 1);
    }

    #[test]
    fn test_drop_coin_when_roll_succeeds() {
        let mut config = SimConfig::default();
        config.loot.coin_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = IdAllocator::default();
        let mut pickups = Vec::new();
        drop_loot(&mut pickups, &config, &mut rng, &mut ids, Vec2::ONE);
        assert_eq!(pickups.len(), 2);
        assert_eq!(pickups[1].kind, PickupKind::Coin);
        assert_eq!(pickups[1].value, 10);
    }

    #[test]
    fn test_drop_respects_cap() {
        let mut config = SimConfig::default();
        config.loot.coin_chance = 1.0;
        config.caps.pickups = 3;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = IdAllocator::default();
        let mut pickups = Vec::new();
        for _ in 0..5 {
            drop_loot(&mut pickups, &config, &mut rng, &mut ids, Vec2::ONE);
        }
        assert_eq!(pickups.len(), 3);
    }

    #[test]
    fn test_merge_sums_and_midpoints() {
        let mut pickups = vec![
            gem(1, PickupKind::Experience, 0.0, 0.0, 1),
            gem(2, PickupKind::Experience, 10.0, 0.0, 3),
        ];
        assert_eq!(merge_pickups(&mut pickups, 16.0), 1);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].value, 4);
        assert_eq!(pickups[0].pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_merge_ignores_other_kinds_and_far_pickups() {
        let mut pickups = vec![
            gem(1, PickupKind::Experience, 0.0, 0.0, 1),
            gem(2, PickupKind::Coin, 1.0, 0.0, 10),
            gem(3, PickupKind::Experience, 40.0, 0.0, 1),
        ];
        assert_eq!(merge_pickups(&mut pickups, 16.0), 0);
        assert_eq!(pickups.len(), 3);
    }

    #[test]
    fn test_merge_each_pickup_once_per_pass() {
        let mut pickups: Vec<Pickup> = (0..5)
            .map(|i| gem(i, PickupKind::Experience, 0.0, 0.0, 1))
            .collect();
        assert_eq!(merge_pickups(&mut pickups, 16.0), 2);
        let values: Vec<u32> = pickups.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2, 2, 1]);
    }

    #[test]
    fn test_magnet_eases_without_snapping() {
        let mut ctx = ctx();
        let start = ctx.player.pos + Vec2::new(50.0, 0.0);
        ctx.pickups.push(gem(1, PickupKind::Experience, start.x, start.y, 1));
        update(&mut ctx);
        assert_eq!(ctx.pickups.len(), 1);
        assert!((ctx.pickups[0].pos.x - (start.x - 10.0)).abs() < 1e-4);
    }

    #[test]
    fn test_outside_magnet_stays_put() {
        let mut ctx = ctx();
        let start = ctx.player.pos + Vec2::new(100.0, 0.0);
        ctx.pickups.push(gem(1, PickupKind::Experience, start.x, start.y, 1));
        update(&mut ctx);
        assert_eq!(ctx.pickups[0].pos, start);
    }

    #[test]
    fn test_collect_coin_and_experience() {
        let mut ctx = ctx();
        let p = ctx.player.pos;
        ctx.pickups.push(gem(1, PickupKind::Coin, p.x + 5.0, p.y, 10));
        ctx.pickups.push(gem(2, PickupKind::Experience, p.x, p.y + 5.0, 3));
        ctx.clock.frames = 1;
        update(&mut ctx);
        assert!(ctx.pickups.is_empty());
        assert_eq!(ctx.coins, 10);
        assert_eq!(ctx.progression.experience, 3);
        assert_eq!(ctx.fx.texts[0].label, "+10G");
    }
}
