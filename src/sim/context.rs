//! Simulation context and render snapshot
//!
//! [`SimulationContext`] is the single owner of all session state. Sub-systems
//! receive it by `&mut` from [`super::step`]; the rendering collaborator only
//! ever sees a [`Snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{FirePattern, UpgradeId, WeaponKind};
use super::clock::Clock;
use super::collision::orbiter_positions;
use super::fx::{FloatingText, Fx, FxCaps, Particle, TransientEffect};
use super::progression::{self, ProgressionState, UpgradeChoice};
use super::state::{Enemy, IdAllocator, Loadout, PassiveSlot, Pickup, Player, Projectile, WeaponSlot};
use super::stats::{BaseStats, DerivedStats};
use crate::config::SimConfig;
use crate::error::SelectionError;

/// Logical state of the session loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Simulation advances every step
    Running,
    /// Waiting for an upgrade selection; steps are skipped
    LevelingUp,
    /// Explicit pause; steps are skipped
    Paused,
    /// Session over, see [`SimulationContext::result`]
    Finished,
}

/// Terminal report handed to the persistence collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub won: bool,
    pub coins_collected: u32,
}

/// Inputs supplied by the persistence collaborator at session start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParams {
    /// Stage number (drives difficulty)
    pub stage: u32,
    pub base_stats: BaseStats,
    /// Seed for every random draw of the session
    pub seed: u64,
    pub starting_weapon: WeaponKind,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            stage: 1,
            base_stats: BaseStats::default(),
            seed: 0,
            starting_weapon: WeaponKind::Kunai,
        }
    }
}

/// All mutable state of one session
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub config: SimConfig,
    pub stage: u32,
    pub base_stats: BaseStats,
    pub clock: Clock,
    pub rng: Pcg32,
    pub phase: Phase,
    pub player: Player,
    pub stats: DerivedStats,
    pub loadout: Loadout,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub fx: Fx,
    pub progression: ProgressionState,
    /// Coins collected this session
    pub coins: u32,
    pub kills: u32,
    pub result: Option<SessionResult>,
    pub ids: IdAllocator,
}

impl SimulationContext {
    pub fn new(config: SimConfig, params: SessionParams) -> Self {
        let center = Vec2::new(config.world.width / 2.0, config.world.height / 2.0);
        let loadout = Loadout::with_weapon(params.starting_weapon);
        let stats = DerivedStats::compute(&params.base_stats, &loadout);
        let fx = Fx::new(FxCaps {
            particles: config.caps.particles,
            texts: config.caps.texts,
            effects: config.caps.effects,
        });
        let progression = ProgressionState::new(
            config.progression.first_threshold,
            config.progression.growth_factor,
        );

        log::info!(
            "Session start: stage {}, attack lv {}, health lv {}, seed {}",
            params.stage,
            params.base_stats.attack,
            params.base_stats.health,
            params.seed
        );

        Self {
            clock: Clock::new(config.world.fps),
            stage: params.stage,
            base_stats: params.base_stats,
            rng: Pcg32::seed_from_u64(params.seed),
            phase: Phase::Running,
            player: Player::new(center, params.base_stats.max_health()),
            stats,
            loadout,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::with_capacity(config.caps.pickups),
            fx,
            progression,
            coins: 0,
            kills: 0,
            result: None,
            ids: IdAllocator::default(),
            config,
        }
    }

    /// Stage number plus elapsed-time contribution
    pub fn difficulty(&self) -> f32 {
        let per = self.config.spawn.secs_per_difficulty.max(1) as f32;
        self.stage as f32 + self.clock.elapsed_secs() as f32 / per
    }

    pub fn remaining_secs(&self) -> u32 {
        self.config
            .world
            .stage_duration_secs
            .saturating_sub(self.clock.elapsed_secs())
    }

    /// Resolve the pending level-up with one of the offered choices
    pub fn select_upgrade(&mut self, id: UpgradeId) -> Result<UpgradeChoice, SelectionError> {
        progression::apply_choice(self, id)
    }

    /// End the session early (host left the run); reported as a loss
    pub fn abort(&mut self) -> SessionResult {
        if let Some(result) = self.result {
            return result;
        }
        log::info!("Session aborted at frame {}", self.clock.frames);
        self.finish(false)
    }

    pub(crate) fn finish(&mut self, won: bool) -> SessionResult {
        let result = SessionResult {
            won,
            coins_collected: self.coins,
        };
        self.phase = Phase::Finished;
        self.progression.choices.clear();
        self.result = Some(result);
        log::info!(
            "Session finished: {} at {}s, level {}, kills {}, coins {}",
            if won { "won" } else { "lost" },
            self.clock.elapsed_secs(),
            self.progression.level,
            self.kills,
            self.coins
        );
        result
    }

    /// Loss (health exhausted) takes precedence over the win timer
    pub(crate) fn check_terminal(&mut self) -> Option<SessionResult> {
        if self.player.is_dead() {
            return Some(self.finish(false));
        }
        if self.clock.elapsed_secs() >= self.config.world.stage_duration_secs {
            return Some(self.finish(true));
        }
        None
    }

    /// Current orbiter positions for every equipped orbit weapon
    pub fn orbiters(&self) -> Vec<Vec2> {
        self.loadout
            .weapons
            .iter()
            .filter_map(|slot| match slot.kind.spec().pattern {
                FirePattern::Orbit { range, count, .. } => Some((range, count)),
                _ => None,
            })
            .flat_map(|(range, count)| {
                orbiter_positions(
                    self.player.pos,
                    self.clock.frames,
                    range * self.stats.area,
                    count,
                )
            })
            .collect()
    }

    /// Read-only view for the rendering collaborator
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            frame: self.clock.frames,
            elapsed_secs: self.clock.elapsed_secs(),
            remaining_secs: self.remaining_secs(),
            world_size: Vec2::new(self.config.world.width, self.config.world.height),
            player: &self.player,
            stats: self.stats,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            pickups: &self.pickups,
            particles: &self.fx.particles,
            texts: &self.fx.texts,
            effects: &self.fx.effects,
            orbiters: self.orbiters(),
            weapons: &self.loadout.weapons,
            passives: &self.loadout.passives,
            level: self.progression.level,
            experience: self.progression.experience,
            next_threshold: self.progression.next_threshold,
            choices: &self.progression.choices,
            coins: self.coins,
            kills: self.kills,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub frame: u64,
    pub elapsed_secs: u32,
    pub remaining_secs: u32,
    pub world_size: Vec2,
    pub player: &'a Player,
    pub stats: DerivedStats,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub pickups: &'a [Pickup],
    pub particles: &'a [Particle],
    pub texts: &'a [FloatingText],
    pub effects: &'a [TransientEffect],
    pub orbiters: Vec<Vec2>,
    pub weapons: &'a [WeaponSlot],
    pub passives: &'a [PassiveSlot],
    pub level: u32,
    pub experience: u32,
    pub next_threshold: u32,
    /// Pending upgrade choices (empty unless leveling up)
    pub choices: &'a [UpgradeChoice],
    pub coins: u32,
    pub kills: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let ctx = SimulationContext::new(SimConfig::default(), SessionParams::default());
        assert_eq!(ctx.phase, Phase::Running);
        assert_eq!(ctx.player.pos, Vec2::new(180.0, 320.0));
        assert_eq!(ctx.player.health, 100.0);
        assert_eq!(ctx.loadout.weapon_level(WeaponKind::Kunai), Some(1));
        assert_eq!(ctx.progression.next_threshold, 10);
        assert_eq!(ctx.difficulty(), 1.0);
    }

    #[test]
    fn test_difficulty_grows_with_time() {
        let params = SessionParams {
            stage: 3,
            ..Default::default()
        };
        let mut ctx = SimulationContext::new(SimConfig::default(), params);
        ctx.clock.frames = 45 * 60;
        assert!((ctx.difficulty() - 4.5).abs() < 1e-5);
        assert_eq!(ctx.remaining_secs(), 15);
    }

    #[test]
    fn test_abort_reports_loss_once() {
        let mut ctx = SimulationContext::new(SimConfig::default(), SessionParams::default());
        ctx.coins = 30;
        let result = ctx.abort();
        assert_eq!(
            result,
            SessionResult {
                won: false,
                coins_collected: 30
            }
        );
        ctx.coins = 99;
        assert_eq!(ctx.abort(), result);
        assert_eq!(ctx.phase, Phase::Finished);
    }

    #[test]
    fn test_snapshot_serializes() {
        let ctx = SimulationContext::new(SimConfig::default(), SessionParams::default());
        let json = serde_json::to_string(&ctx.snapshot()).expect("snapshot json");
        assert!(json.contains("\"phase\":\"Running\""));
        assert!(json.contains("\"kind\":\"kunai\""));
    }
}
