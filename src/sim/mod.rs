//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod clock;
pub mod collision;
pub mod context;
pub mod fx;
pub mod loot;
pub mod movement;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod stats;
pub mod tick;
pub mod weapons;

pub use catalog::{FirePattern, Launch, PassiveKind, ProjectileSpec, UpgradeId, WeaponKind, WeaponSpec};
pub use clock::Clock;
pub use context::{Phase, SessionParams, SessionResult, SimulationContext, Snapshot};
pub use fx::{EffectKind, FloatingText, Fx, FxCaps, Particle, TransientEffect};
pub use progression::{ProgressionState, UpgradeChoice};
pub use state::{
    Enemy, EnemyKind, IdAllocator, Loadout, PassiveSlot, Pickup, PickupKind, Player, Projectile,
    WeaponSlot,
};
pub use stats::{BaseStats, DerivedStats};
pub use tick::{StepInput, StepOutcome, autopilot_direction, step};
