//! Cross-session meta-progression
//!
//! Folding a [`SessionResult`] into the wallet and stage counter, and buying
//! permanent stat levels. Storage is the host's job; this module only offers
//! JSON round-trips.

use serde::{Deserialize, Serialize};

use crate::error::MetaError;
use crate::sim::{BaseStats, SessionParams, SessionResult};

/// Starting wallet of a fresh profile
pub const STARTING_COINS: u64 = 500;
/// Stage bonus paid per stage number on a win
pub const WIN_BONUS_PER_STAGE: u64 = 100;
/// Permanent upgrade price per level
pub const UPGRADE_COST_STEP: u64 = 200;

/// Permanent stats that can be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Attack,
    Health,
}

/// Persistent player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaProgress {
    pub coins: u64,
    /// Highest stage unlocked
    pub stage: u32,
    pub stats: BaseStats,
}

impl Default for MetaProgress {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            stage: 1,
            stats: BaseStats {
                attack: 1,
                health: 1,
            },
        }
    }
}

impl MetaProgress {
    /// Wipe the profile. Unlike a brand new profile, purchased levels go to zero.
    pub fn reset(&mut self) {
        *self = Self {
            stats: BaseStats::default(),
            ..Self::default()
        };
        log::info!("Profile reset");
    }

    /// Coins earned for a session at `stage`
    pub fn reward(stage: u32, result: &SessionResult) -> u64 {
        let bonus = if result.won {
            stage as u64 * WIN_BONUS_PER_STAGE
        } else {
            0
        };
        result.coins_collected as u64 + bonus
    }

    /// Bank a finished session. A win unlocks the next stage. Returns the reward.
    pub fn apply_result(&mut self, result: &SessionResult) -> u64 {
        let reward = Self::reward(self.stage, result);
        self.coins = self.coins.saturating_add(reward);
        if result.won {
            self.stage += 1;
        }
        log::info!(
            "Banked {reward} coins (wallet {}), stage {}",
            self.coins,
            self.stage
        );
        reward
    }

    pub fn level(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Attack => self.stats.attack,
            StatKind::Health => self.stats.health,
        }
    }

    /// Price of the next level of `stat`
    pub fn upgrade_cost(&self, stat: StatKind) -> u64 {
        (self.level(stat) as u64 + 1) * UPGRADE_COST_STEP
    }

    /// Buy one level of `stat`, returning the new level
    pub fn buy_upgrade(&mut self, stat: StatKind) -> Result<u32, MetaError> {
        let cost = self.upgrade_cost(stat);
        if self.coins < cost {
            return Err(MetaError::InsufficientCoins {
                need: cost,
                have: self.coins,
            });
        }

        self.coins -= cost;
        let level = match stat {
            StatKind::Attack => &mut self.stats.attack,
            StatKind::Health => &mut self.stats.health,
        };
        *level += 1;
        log::debug!("Bought {stat:?} lv {} for {cost}", *level);
        Ok(*level)
    }

    /// Session inputs for the current stage
    pub fn session_params(&self, seed: u64) -> SessionParams {
        SessionParams {
            stage: self.stage,
            base_stats: self.stats,
            seed,
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MetaError> {
        Ok(serde_json::from_str(json)?)
    }
}
