//! Player stat derivation

use serde::{Deserialize, Serialize};

use super::catalog::PassiveKind;
use super::state::Loadout;
use crate::consts::*;

/// Permanent stat levels bought between sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: u32,
    pub health: u32,
}

impl BaseStats {
    /// Attack multiplier before passives
    pub fn attack_mult(&self) -> f32 {
        1.0 + self.attack as f32 * 0.25
    }

    /// Starting max health
    pub fn max_health(&self) -> f32 {
        PLAYER_BASE_HEALTH * (1.0 + self.health as f32 * 0.25)
    }
}

/// Per-frame combat stats; always recomputed, never stored independently
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub attack: f32,
    /// Multiplier on weapon cooldowns, floored at [`COOLDOWN_MULT_FLOOR`]
    pub cooldown: f32,
    pub area: f32,
    /// Radius within which pickups ease toward the player
    pub magnet: f32,
    /// Fraction of contact damage absorbed
    pub armor: f32,
    pub move_speed: f32,
}

impl DerivedStats {
    pub fn compute(base: &BaseStats, loadout: &Loadout) -> Self {
        let level = |kind| loadout.passive_level(kind) as f32;

        let cooldown = 1.0 - level(PassiveKind::Cooldown) * 0.1 - level(PassiveKind::Haste) * 0.05;

        Self {
            attack: base.attack_mult() * (1.0 + level(PassiveKind::Power) * 0.1),
            cooldown: cooldown.max(COOLDOWN_MULT_FLOOR),
            area: 1.0 + level(PassiveKind::Area) * 0.1,
            magnet: BASE_MAGNET_RADIUS * (1.0 + level(PassiveKind::Magnet) * 0.2),
            armor: (level(PassiveKind::Armor) * 0.1).min(ARMOR_CAP),
            move_speed: 1.0 + level(PassiveKind::Speed) * 0.1,
        }
    }
}
