//! Fixed timestep simulation step
//!
//! One call advances the session by exactly one frame. Sub-systems run in a
//! fixed order and never interleave.

use glam::Vec2;

use super::context::{Phase, SessionResult, SimulationContext};
use super::stats::DerivedStats;
use super::{collision, loot, movement, progression, spawn, weapons};
use crate::direction_to;

/// Enemies closer than this push the autopilot away
const AUTOPILOT_THREAT_RADIUS: f32 = 120.0;

/// Input commands for a single step (deterministic)
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    /// Movement vector, components in [-1, 1]
    pub movement: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Headless/demo mode - steer automatically and ignore `movement`
    pub autopilot: bool,
}

/// Where the session stands after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    /// Waiting for [`SimulationContext::select_upgrade`]
    LevelingUp,
    Paused,
    Finished(SessionResult),
}

impl StepOutcome {
    fn of(ctx: &SimulationContext) -> Self {
        match (ctx.phase, ctx.result) {
            (Phase::Finished, Some(result)) => StepOutcome::Finished(result),
            (Phase::LevelingUp, _) => StepOutcome::LevelingUp,
            (Phase::Paused, _) => StepOutcome::Paused,
            _ => StepOutcome::Running,
        }
    }
}

/// Steer away from close enemies, otherwise drift toward the nearest pickup
pub fn autopilot_direction(ctx: &SimulationContext) -> Vec2 {
    let pos = ctx.player.pos;
    let threat = ctx
        .enemies
        .iter()
        .filter(|e| e.is_alive() && e.pos.distance_squared(pos) < AUTOPILOT_THREAT_RADIUS.powi(2))
        .fold(Vec2::ZERO, |acc, e| match direction_to(e.pos, pos) {
            Some(away) => acc + away,
            None => acc,
        });
    if let Some(dir) = direction_to(Vec2::ZERO, threat) {
        return dir;
    }

    ctx.pickups
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
        .and_then(|p| direction_to(pos, p.pos))
        .unwrap_or(Vec2::ZERO)
}

/// Advance the session by one frame
pub fn step(ctx: &mut SimulationContext, input: &StepInput) -> StepOutcome {
    if input.pause {
        match ctx.phase {
            Phase::Running => {
                ctx.phase = Phase::Paused;
                return StepOutcome::Paused;
            }
            Phase::Paused => ctx.phase = Phase::Running,
            _ => {}
        }
    }

    // Render keeps going while suspended; the simulation does not
    if ctx.phase != Phase::Running {
        return StepOutcome::of(ctx);
    }

    ctx.clock.tick();
    ctx.stats = DerivedStats::compute(&ctx.base_stats, &ctx.loadout);

    let movement = if input.autopilot {
        autopilot_direction(ctx)
    } else {
        input.movement
    };

    spawn::update(ctx);
    movement::move_player(ctx, movement);
    movement::move_enemies(ctx);
    weapons::update(ctx);
    collision::update_projectiles(ctx);
    collision::apply_orbits(ctx);
    collision::prune_dead(ctx);
    loot::update(ctx);
    progression::begin_level_up(ctx);
    ctx.fx.decay();

    // A level-up opened on the final frame still ends the session
    ctx.check_terminal();
    StepOutcome::of(ctx)
}
