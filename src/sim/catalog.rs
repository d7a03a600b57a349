//! Weapon and passive archetypes
//!
//! The archetype set is closed: every weapon resolves to one [`FirePattern`]
//! and callers dispatch by matching on it.

use serde::{Deserialize, Serialize};

/// Equippable weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Kunai,
    Shotgun,
    Rocket,
    Lightning,
    Orbit,
    Aura,
    Drill,
    Brick,
}

/// How a projectile's initial velocity is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Launch {
    /// Toward the aim angle at `speed`
    Aimed,
    /// Fixed vertical launch velocity plus a small drift along the facing sign
    Lob { vy: f32, drift: f32 },
    /// Along the facing sign only
    Horizontal,
}

/// Projectile weapon parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub count: u32,
    /// Angle between neighbouring projectiles of one volley (radians)
    pub spread: f32,
    pub launch: Launch,
    pub life: u32,
    pub splash: Option<f32>,
    pub pierce: bool,
    pub bounce: bool,
    pub gravity: Option<f32>,
}

impl ProjectileSpec {
    const fn aimed(speed: f32) -> Self {
        Self {
            speed,
            count: 1,
            spread: 0.2,
            launch: Launch::Aimed,
            life: crate::consts::DEFAULT_PROJECTILE_LIFE,
            splash: None,
            pierce: false,
            bounce: false,
            gravity: None,
        }
    }
}

/// Firing behaviour of a weapon archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirePattern {
    Projectile(ProjectileSpec),
    /// Instant hit on a uniformly random live enemy
    RandomStrike,
    /// Points circling the player, damaging on a fixed frame interval
    Orbit {
        range: f32,
        count: u32,
        hit_radius: f32,
        tick_frames: u64,
    },
    /// Pulse around the player each time the cooldown expires
    Aura { range: f32 },
}

/// Static description of a weapon archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub damage: f32,
    /// Cooldown in frames before the cooldown multiplier
    pub cooldown: f32,
    pub pattern: FirePattern,
}

const KUNAI: WeaponSpec = WeaponSpec {
    name: "Homing Ray",
    description: "Fires at the nearest enemy",
    damage: 15.0,
    cooldown: 12.0,
    pattern: FirePattern::Projectile(ProjectileSpec::aimed(18.0)),
};

const SHOTGUN: WeaponSpec = WeaponSpec {
    name: "Plasma Burst",
    description: "Spread of energy shots",
    damage: 10.0,
    cooldown: 45.0,
    pattern: FirePattern::Projectile(ProjectileSpec {
        count: 3,
        spread: 0.4,
        ..ProjectileSpec::aimed(12.0)
    }),
};

const ROCKET: WeaponSpec = WeaponSpec {
    name: "Impact Bomb",
    description: "Explodes on impact",
    damage: 30.0,
    cooldown: 50.0,
    pattern: FirePattern::Projectile(ProjectileSpec {
        splash: Some(70.0),
        ..ProjectileSpec::aimed(10.0)
    }),
};

const LIGHTNING: WeaponSpec = WeaponSpec {
    name: "Thunder Crash",
    description: "Strikes a random enemy",
    damage: 50.0,
    cooldown: 40.0,
    pattern: FirePattern::RandomStrike,
};

const ORBIT: WeaponSpec = WeaponSpec {
    name: "Bit Shield",
    description: "Rotating barrier",
    damage: 10.0,
    cooldown: 1.0,
    pattern: FirePattern::Orbit {
        range: 65.0,
        count: 2,
        hit_radius: 25.0,
        tick_frames: 10,
    },
};

const AURA: WeaponSpec = WeaponSpec {
    name: "Poison Field",
    description: "Damages everything nearby",
    damage: 5.0,
    cooldown: 8.0,
    pattern: FirePattern::Aura { range: 90.0 },
};

const DRILL: WeaponSpec = WeaponSpec {
    name: "Bounce Cutter",
    description: "Blade that ricochets off walls",
    damage: 8.0,
    cooldown: 70.0,
    pattern: FirePattern::Projectile(ProjectileSpec {
        launch: Launch::Horizontal,
        life: 150,
        bounce: true,
        ..ProjectileSpec::aimed(5.0)
    }),
};

const BRICK: WeaponSpec = WeaponSpec {
    name: "Meteor Hammer",
    description: "Heavy arc that falls through enemies",
    damage: 60.0,
    cooldown: 35.0,
    pattern: FirePattern::Projectile(ProjectileSpec {
        launch: Launch::Lob {
            vy: -13.0,
            drift: 2.0,
        },
        pierce: true,
        gravity: Some(0.9),
        ..ProjectileSpec::aimed(10.0)
    }),
};

impl WeaponKind {
    /// Every archetype in offer order
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::Kunai,
        WeaponKind::Shotgun,
        WeaponKind::Rocket,
        WeaponKind::Lightning,
        WeaponKind::Orbit,
        WeaponKind::Aura,
        WeaponKind::Drill,
        WeaponKind::Brick,
    ];

    pub fn spec(self) -> &'static WeaponSpec {
        match self {
            WeaponKind::Kunai => &KUNAI,
            WeaponKind::Shotgun => &SHOTGUN,
            WeaponKind::Rocket => &ROCKET,
            WeaponKind::Lightning => &LIGHTNING,
            WeaponKind::Orbit => &ORBIT,
            WeaponKind::Aura => &AURA,
            WeaponKind::Drill => &DRILL,
            WeaponKind::Brick => &BRICK,
        }
    }

    /// Damage per hit at `level` with the given attack multiplier
    pub fn damage(self, level: u32, attack: f32) -> f32 {
        self.spec().damage * level as f32 * attack
    }

    /// Whether the weapon is driven by its cooldown timer
    pub fn uses_cooldown(self) -> bool {
        !matches!(self.spec().pattern, FirePattern::Orbit { .. })
    }
}

/// Passive upgrade archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassiveKind {
    Power,
    Haste,
    Speed,
    Armor,
    MaxHp,
    Magnet,
    Area,
    Cooldown,
}

impl PassiveKind {
    pub const ALL: [PassiveKind; 8] = [
        PassiveKind::Power,
        PassiveKind::Haste,
        PassiveKind::Speed,
        PassiveKind::Armor,
        PassiveKind::MaxHp,
        PassiveKind::Magnet,
        PassiveKind::Area,
        PassiveKind::Cooldown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassiveKind::Power => "Power Chip",
            PassiveKind::Haste => "Speed Boost",
            PassiveKind::Speed => "Mobility Core",
            PassiveKind::Armor => "Shield Plate",
            PassiveKind::MaxHp => "Vital Drink",
            PassiveKind::Magnet => "Magnet Field",
            PassiveKind::Area => "Amplifier",
            PassiveKind::Cooldown => "Cooldown Chip",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PassiveKind::Power => "Attack up",
            PassiveKind::Haste => "Attack speed up",
            PassiveKind::Speed => "Move speed up",
            PassiveKind::Armor => "Damage taken down",
            PassiveKind::MaxHp => "Max health up",
            PassiveKind::Magnet => "Pickup range up",
            PassiveKind::Area => "Attack area up",
            PassiveKind::Cooldown => "Cooldowns down",
        }
    }
}

/// Identity of an upgrade offered at level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "id", rename_all = "snake_case")]
pub enum UpgradeId {
    Weapon(WeaponKind),
    Passive(PassiveKind),
}

impl UpgradeId {
    pub fn name(self) -> &'static str {
        match self {
            UpgradeId::Weapon(kind) => kind.spec().name,
            UpgradeId::Passive(kind) => kind.name(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UpgradeId::Weapon(kind) => kind.spec().description,
            UpgradeId::Passive(kind) => kind.description(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_scales_with_level_and_attack() {
        assert_eq!(WeaponKind::Kunai.damage(1, 1.0), 15.0);
        assert_eq!(WeaponKind::Kunai.damage(3, 1.5), 67.5);
    }

    #[test]
    fn test_only_orbit_skips_cooldown() {
        let timed: Vec<_> = WeaponKind::ALL
            .iter()
            .filter(|k| !k.uses_cooldown())
            .collect();
        assert_eq!(timed, vec![&WeaponKind::Orbit]);
    }

    #[test]
    fn test_brick_is_piercing_lob() {
        match WeaponKind::Brick.spec().pattern {
            FirePattern::Projectile(p) => {
                assert!(p.pierce);
                assert_eq!(p.gravity, Some(0.9));
                assert!(matches!(p.launch, Launch::Lob { .. }));
            }
            other => panic!("unexpected pattern {other:?}"),
        }
    }

    #[test]
    fn test_upgrade_id_serializes_with_category() {
        let json = serde_json::to_string(&UpgradeId::Passive(PassiveKind::MaxHp)).unwrap();
        assert_eq!(json, r#"{"category":"passive","id":"max_hp"}"#);
    }
}
