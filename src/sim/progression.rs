//! Experience, level thresholds and the upgrade-selection state machine
//!
//! Collecting experience never changes phase directly. Crossing the threshold
//! only raises a pending flag; [`begin_level_up`] consumes it after the loot
//! pass has finished iterating.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::catalog::{PassiveKind, UpgradeId, WeaponKind};
use super::context::{Phase, SimulationContext};
use super::state::Loadout;
use super::stats::DerivedStats;
use crate::config::CapsConfig;
use crate::consts::MAX_HEALTH_UPGRADE;
use crate::error::SelectionError;

/// One entry of the level-up menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeChoice {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    /// Level the upgrade will be at once chosen
    pub level: u32,
    /// Not yet owned
    pub is_new: bool,
}

impl UpgradeChoice {
    fn new(id: UpgradeId, level: u32) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            description: id.description().to_string(),
            level,
            is_new: level == 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    pub level: u32,
    pub experience: u32,
    pub next_threshold: u32,
    growth: f32,
    /// Threshold crossed, level-up not yet opened
    pending: bool,
    /// Offered choices while leveling up
    pub choices: Vec<UpgradeChoice>,
}

impl ProgressionState {
    pub fn new(first_threshold: u32, growth: f32) -> Self {
        Self {
            level: 1,
            experience: 0,
            next_threshold: first_threshold.max(1),
            growth,
            pending: false,
            choices: Vec::new(),
        }
    }

    /// Add experience. Reaching the threshold resets the accumulator and
    /// flags a pending level-up.
    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
        if self.experience >= self.next_threshold {
            self.experience = 0;
            self.pending = true;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Bump the level and grow the threshold. The threshold always increases
    /// by at least one even when the floor would leave it unchanged.
    pub fn advance_level(&mut self) -> u32 {
        let prev = self.next_threshold;
        let grown = (prev as f64 * self.growth as f64).floor() as u32;
        self.next_threshold = grown.max(prev.saturating_add(1));
        self.level += 1;
        self.pending = false;
        self.next_threshold
    }
}

/// Shuffled menu of at most `count` upgrades with distinct ids.
///
/// Owned items are offered at their next level; unowned ones only while the
/// matching roster is under its cap.
pub fn build_choices<R: Rng>(
    loadout: &Loadout,
    caps: &CapsConfig,
    rng: &mut R,
    count: usize,
) -> Vec<UpgradeChoice> {
    let mut pool: Vec<UpgradeChoice> = Vec::new();

    for slot in &loadout.weapons {
        pool.push(UpgradeChoice::new(UpgradeId::Weapon(slot.kind), slot.level + 1));
    }
    for slot in &loadout.passives {
        pool.push(UpgradeChoice::new(UpgradeId::Passive(slot.kind), slot.level + 1));
    }
    if loadout.weapons.len() < caps.weapons {
        pool.extend(
            WeaponKind::ALL
                .into_iter()
                .filter(|&kind| loadout.weapon_level(kind).is_none())
                .map(|kind| UpgradeChoice::new(UpgradeId::Weapon(kind), 1)),
        );
    }
    if loadout.passives.len() < caps.passives {
        pool.extend(
            PassiveKind::ALL
                .into_iter()
                .filter(|&kind| loadout.passive_level(kind) == 0)
                .map(|kind| UpgradeChoice::new(UpgradeId::Passive(kind), 1)),
        );
    }

    pool.shuffle(rng);

    let mut choices: Vec<UpgradeChoice> = Vec::with_capacity(count);
    for entry in pool {
        if choices.len() >= count {
            break;
        }
        if !choices.iter().any(|c| c.id == entry.id) {
            choices.push(entry);
        }
    }
    choices
}

/// Open the level-up menu if a threshold was crossed this step.
/// Returns true when the session is now waiting for a selection.
pub fn begin_level_up(ctx: &mut SimulationContext) -> bool {
    if !ctx.progression.is_pending() {
        return false;
    }

    let threshold = ctx.progression.advance_level();
    let count = ctx.config.progression.choice_count;
    let choices = build_choices(&ctx.loadout, &ctx.config.caps, &mut ctx.rng, count);

    log::info!(
        "Level {} at frame {} (next at {threshold} exp), {} choices",
        ctx.progression.level,
        ctx.clock.frames,
        choices.len()
    );

    // Nothing left to offer: the level still counts, play continues
    if choices.is_empty() {
        return false;
    }
    ctx.progression.choices = choices;
    ctx.phase = Phase::LevelingUp;
    true
}

/// Apply one of the offered upgrades and resume
pub fn apply_choice(ctx: &mut SimulationContext, id: UpgradeId) -> Result<UpgradeChoice, SelectionError> {
    if ctx.phase != Phase::LevelingUp {
        return Err(SelectionError::NotLevelingUp);
    }
    let Some(choice) = ctx.progression.choices.iter().find(|c| c.id == id).cloned() else {
        return Err(SelectionError::NotOffered(id));
    };

    match id {
        UpgradeId::Weapon(kind) => ctx.loadout.set_weapon_level(kind, choice.level),
        UpgradeId::Passive(kind) => {
            ctx.loadout.set_passive_level(kind, choice.level);
            if kind == PassiveKind::MaxHp {
                ctx.player.scale_health(MAX_HEALTH_UPGRADE);
            }
        }
    }

    ctx.stats = DerivedStats::compute(&ctx.base_stats, &ctx.loadout);
    ctx.progression.choices.clear();
    ctx.phase = Phase::Running;

    log::debug!("Selected {} (lv {})", choice.name, choice.level);
    Ok(choice)
}
