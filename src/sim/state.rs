//! Simulation entity types
//!
//! Plain data owned by [`super::SimulationContext`]. Populations are stored as
//! `Vec`s in spawn order; every entity that the renderer may want to key on
//! carries a stable id.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{PassiveKind, WeaponKind};
use crate::consts::*;
use crate::palette;

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Base movement speed (pixels/frame) before the speed multiplier
    pub speed: f32,
    /// Horizontal facing sign (+1 right, -1 left)
    pub facing: f32,
    /// Last significant movement direction (unit length)
    pub facing_vec: Vec2,
    pub health: f32,
    pub max_health: f32,
}

impl Player {
    pub fn new(pos: Vec2, max_health: f32) -> Self {
        Self {
            pos,
            speed: PLAYER_SPEED,
            facing: 1.0,
            facing_vec: Vec2::new(0.0, -1.0),
            health: max_health,
            max_health,
        }
    }

    /// Subtract `amount` from health, never going below zero
    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Scale current and max health together so the ratio is preserved
    pub fn scale_health(&mut self, factor: f32) {
        self.max_health *= factor;
        self.health = (self.health * factor).clamp(0.0, self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Normal,
    Fast,
    Tank,
}

impl EnemyKind {
    /// Collision radius
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Normal => 12.0,
            EnemyKind::Fast => 9.0,
            EnemyKind::Tank => 15.0,
        }
    }

    pub fn health_mult(self) -> f32 {
        match self {
            EnemyKind::Tank => 1.5,
            _ => 1.0,
        }
    }

    pub fn speed_mult(self) -> f32 {
        match self {
            EnemyKind::Fast => 1.3,
            _ => 1.0,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Normal => palette::ENEMY,
            EnemyKind::Fast => palette::FAST,
            EnemyKind::Tank => palette::TANK,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub color: u32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, health: f32, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            health,
            max_health: health,
            speed,
            radius: kind.size(),
            color: kind.color(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    /// Frames left before expiry
    pub life: u32,
    pub splash: Option<f32>,
    pub pierce: bool,
    pub bounce: bool,
    /// Added to vertical velocity each frame
    pub gravity: Option<f32>,
    pub weapon: WeaponKind,
    /// Enemies a piercing projectile has already damaged
    #[serde(skip)]
    pub hits: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Experience,
    Coin,
}

impl PickupKind {
    pub fn color(self) -> u32 {
        match self {
            PickupKind::Experience => palette::EXPERIENCE,
            PickupKind::Coin => palette::GOLD,
        }
    }
}

/// A gem dropped by a defeated enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub value: u32,
}

/// An equipped weapon and its cooldown timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub level: u32,
    /// Frames until the next shot (never negative)
    pub cooldown: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassiveSlot {
    pub kind: PassiveKind,
    pub level: u32,
}

/// Equipped weapons and passives in acquisition order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub weapons: Vec<WeaponSlot>,
    pub passives: Vec<PassiveSlot>,
}

impl Loadout {
    pub fn with_weapon(kind: WeaponKind) -> Self {
        let mut loadout = Self::default();
        loadout.set_weapon_level(kind, 1);
        loadout
    }

    pub fn weapon_level(&self, kind: WeaponKind) -> Option<u32> {
        self.weapons.iter().find(|w| w.kind == kind).map(|w| w.level)
    }

    pub fn passive_level(&self, kind: PassiveKind) -> u32 {
        self.passives
            .iter()
            .find(|p| p.kind == kind)
            .map(|p| p.level)
            .unwrap_or(0)
    }

    /// Set a weapon's level, equipping it with a ready timer if new
    pub fn set_weapon_level(&mut self, kind: WeaponKind, level: u32) {
        match self.weapons.iter_mut().find(|w| w.kind == kind) {
            Some(slot) => slot.level = level,
            None => self.weapons.push(WeaponSlot {
                kind,
                level,
                cooldown: 0.0,
            }),
        }
    }

    pub fn set_passive_level(&mut self, kind: PassiveKind, level: u32) {
        match self.passives.iter_mut().find(|p| p.kind == kind) {
            Some(slot) => slot.level = level,
            None => self.passives.push(PassiveSlot { kind, level }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_damage_clamps_at_zero() {
        let mut player = Player::new(Vec2::ZERO, 50.0);
        player.apply_damage(80.0);
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_scale_health_preserves_ratio() {
        let mut player = Player::new(Vec2::ZERO, 100.0);
        player.apply_damage(50.0);
        player.scale_health(1.2);
        assert!((player.max_health - 120.0).abs() < 1e-4);
        assert!((player.health - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_enemy_archetype_shape() {
        let tank = Enemy::new(1, EnemyKind::Tank, Vec2::ZERO, 30.0, 1.0);
        assert_eq!(tank.radius, 15.0);
        assert_eq!(tank.max_health, 30.0);
        assert_eq!(EnemyKind::Fast.speed_mult(), 1.3);
    }

    #[test]
    fn test_loadout_levels() {
        let mut loadout = Loadout::with_weapon(WeaponKind::Kunai);
        assert_eq!(loadout.weapon_level(WeaponKind::Kunai), Some(1));
        loadout.set_weapon_level(WeaponKind::Kunai, 2);
        assert_eq!(loadout.weapons.len(), 1);
        assert_eq!(loadout.weapon_level(WeaponKind::Kunai), Some(2));
        assert_eq!(loadout.passive_level(PassiveKind::Armor), 0);
        loadout.set_passive_level(PassiveKind::Armor, 1);
        assert_eq!(loadout.passive_level(PassiveKind::Armor), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
    }
}
