//! Simulation tunables
//!
//! Every field has a compile-time default in [`crate::consts`]; a JSON document
//! only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Quality preset levels (cosmetic budget only, never gameplay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => MAX_PARTICLES,
            QualityPreset::High => 90,
        }
    }

    /// Maximum floating texts for this preset
    pub fn max_texts(&self) -> usize {
        match self {
            QualityPreset::Low => 15,
            QualityPreset::Medium => MAX_TEXTS,
            QualityPreset::High => 80,
        }
    }
}

/// Where new enemies appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Fixed distance from the player at a random angle
    #[default]
    Radial,
    /// Just outside a random edge of the viewport
    Edges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    pub stage_duration_secs: u32,
    /// Non-bouncing projectiles are dropped this far outside the world
    pub bounds_margin: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            fps: FRAMES_PER_SECOND,
            stage_duration_secs: STAGE_DURATION_SECS,
            bounds_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsConfig {
    pub weapons: usize,
    pub passives: usize,
    pub pickups: usize,
    pub particles: usize,
    pub texts: usize,
    pub effects: usize,
    pub projectiles: usize,
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            weapons: MAX_WEAPONS,
            passives: MAX_PASSIVES,
            pickups: MAX_PICKUPS,
            particles: MAX_PARTICLES,
            texts: MAX_TEXTS,
            effects: MAX_EFFECTS,
            projectiles: MAX_PROJECTILES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enabled: bool,
    pub mode: SpawnMode,
    pub radial_distance: f32,
    pub edge_offset: f32,
    /// Spawn positions further than this outside the world are rejected
    pub bounds_margin: f32,
    /// Interval in frames at difficulty zero
    pub base_interval: u64,
    /// Interval never drops below this many frames
    pub min_interval: u64,
    /// Frames shaved off the interval per point of difficulty
    pub interval_per_difficulty: f32,
    /// Seconds of session time worth one point of difficulty
    pub secs_per_difficulty: u32,
    pub fast_chance: f32,
    pub tank_chance: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: SpawnMode::Radial,
            radial_distance: 250.0,
            edge_offset: 20.0,
            bounds_margin: 40.0,
            base_interval: 45,
            min_interval: 12,
            interval_per_difficulty: 2.0,
            secs_per_difficulty: 30,
            fast_chance: 0.3,
            tank_chance: 0.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub coin_chance: f32,
    pub experience_value: u32,
    pub coin_value: u32,
    /// Frames between merge passes
    pub merge_interval: u64,
    pub merge_radius: f32,
    pub pickup_radius: f32,
    /// Fraction of the remaining distance covered per frame inside the magnet radius
    pub magnet_ease: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            coin_chance: 0.2,
            experience_value: 1,
            coin_value: 10,
            merge_interval: 30,
            merge_radius: 16.0,
            pickup_radius: 20.0,
            magnet_ease: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub first_threshold: u32,
    pub growth_factor: f32,
    pub choice_count: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            first_threshold: 10,
            growth_factor: 1.5,
            choice_count: 3,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub quality: QualityPreset,
    pub world: WorldConfig,
    pub caps: CapsConfig,
    pub spawn: SpawnConfig,
    pub loot: LootConfig,
    pub progression: ProgressionConfig,
}

impl SimConfig {
    /// Create a config from a quality preset (applies the preset's cosmetic budgets)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a quality preset (updates particle and text budgets)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.caps.particles = preset.max_particles();
        self.caps.texts = preset.max_texts();
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: world {}x{}, {}s stage, spawn {:?}",
            config.world.width,
            config.world.height,
            config.world.stage_duration_secs,
            config.spawn.mode
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            return Err(ConfigError::WorldSize {
                width: world.width,
                height: world.height,
            });
        }
        if world.fps == 0 {
            return Err(ConfigError::FrameRate);
        }
        if world.stage_duration_secs == 0 {
            return Err(ConfigError::Duration);
        }
        if !(self.progression.growth_factor > 1.0) {
            return Err(ConfigError::GrowthFactor(self.progression.growth_factor));
        }
        if self.progression.first_threshold < 2 {
            return Err(ConfigError::FirstThreshold(self.progression.first_threshold));
        }

        let caps = [
            ("weapons", self.caps.weapons),
            ("passives", self.caps.passives),
            ("pickups", self.caps.pickups),
            ("projectiles", self.caps.projectiles),
            ("choice_count", self.progression.choice_count),
        ];
        if let Some((name, _)) = caps.iter().find(|(_, cap)| *cap == 0) {
            return Err(ConfigError::ZeroCapacity(name));
        }

        let probabilities = [
            ("coin_chance", self.loot.coin_chance),
            ("fast_chance", self.spawn.fast_chance),
            ("tank_chance", self.spawn.tank_chance),
            ("magnet_ease", self.loot.magnet_ease),
            (
                "fast_chance + tank_chance",
                self.spawn.fast_chance + self.spawn.tank_chance,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        if self.spawn.min_interval == 0 {
            log::warn!("spawn.min_interval of 0 clamped to 1 frame");
        }

        Ok(())
    }

    /// Frames in a full session
    pub fn stage_frames(&self) -> u64 {
        self.world.stage_duration_secs as u64 * self.world.fps as u64
    }

    /// Spawn interval floor, never below one frame
    pub fn min_spawn_interval(&self) -> u64 {
        self.spawn.min_interval.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config = SimConfig::from_json(r#"{ "spawn": { "enabled": false }, "loot": { "coin_chance": 0.0 } }"#)
            .expect("valid config");
        assert!(!config.spawn.enabled);
        assert_eq!(config.loot.coin_chance, 0.0);
        assert_eq!(config.world.width, WORLD_WIDTH);
        assert_eq!(config.caps.pickups, MAX_PICKUPS);
        assert_eq!(config.spawn.mode, SpawnMode::Radial);
    }

    #[test]
    fn test_invalid_growth_factor_rejected() {
        let err = SimConfig::from_json(r#"{ "progression": { "growth_factor": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::GrowthFactor(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = SimConfig::default();
        config.caps.pickups = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCapacity("pickups"))
        ));
    }

    #[test]
    fn test_preset_budgets() {
        let config = SimConfig::from_preset(QualityPreset::Low);
        assert_eq!(config.caps.particles, 10);
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_to_json_round_trips_through_from_json() {
        let mut config = SimConfig::from_preset(QualityPreset::High);
        config.spawn.mode = SpawnMode::Edges;
        config.loot.coin_chance = 0.5;
        let json = config.to_json().expect("serializable config");
        let back = SimConfig::from_json(&json).expect("valid config");
        assert_eq!(back.quality, QualityPreset::High);
        assert_eq!(back.spawn.mode, SpawnMode::Edges);
        assert_eq!(back.loot.coin_chance, 0.5);
        assert_eq!(back.caps.particles, 90);
    }

    #[test]
    fn test_stage_frames() {
        assert_eq!(SimConfig::default().stage_frames(), 3600);
    }
}
