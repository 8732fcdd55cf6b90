//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The config is built once, validated,
//! and handed to the colony by value; nothing reads it from global state.

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Result};
use crate::core::types::{Footprint, Millis};

/// Rectangle the colony lives in, with its origin at (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { width: 1024.0, height: 768.0 }
    }
}

/// Inclusive range agent speeds are drawn from (world units per second)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub fn fixed(speed: f32) -> Self {
        Self { min: speed, max: speed }
    }
}

impl Default for SpeedRange {
    fn default() -> Self {
        Self { min: 60.0, max: 120.0 }
    }
}

/// Harvest and delivery rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestingConfig {
    /// Distance to a clay pack at which an agent stops and starts attacking
    ///
    /// Measured center to center and not scaled by footprint size.
    pub attack_range: f32,

    /// Distance to the depot at which a carried unit is delivered
    pub drop_off_range: f32,

    /// Hit points every clay pack starts with
    pub max_hit_points: u32,

    /// Hit points removed by one landed strike
    ///
    /// At the defaults (30 / 5) a pack takes six hits, so five
    /// knockback-stun-cooldown cycles plus the final strike.
    pub damage_per_hit: u32,
}

impl Default for HarvestingConfig {
    fn default() -> Self {
        Self {
            attack_range: 50.0,
            drop_off_range: 100.0,
            max_hit_points: 30,
            damage_per_hit: 5,
        }
    }
}

/// Minimum distances used by the spatial placer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Minimum distance between the depot and any clay pack
    pub depot_to_resource: f32,

    /// Minimum distance between two clay packs
    pub resource_to_resource: f32,

    /// Agents never spawn closer than this to the depot
    pub agent_spawn_exclusion: f32,

    /// Extra inset from the world edge on top of half the footprint
    pub placement_margin: f32,

    /// Candidates drawn before the placer gives up and keeps the last one
    pub placement_attempts: u32,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            depot_to_resource: 150.0,
            resource_to_resource: 100.0,
            agent_spawn_exclusion: 120.0,
            placement_margin: 20.0,
            placement_attempts: 100,
        }
    }
}

/// Timings and motion constants for the behavior state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Below this distance a travelling agent stops steering (zero velocity)
    pub arrival_threshold: f32,

    /// Attack-phase counter increment per tick while attacking
    ///
    /// The strike follows sin(2 * phase), so one strike cycle takes
    /// pi / 0.15 ~ 21 ticks.
    pub attack_phase_step: f32,

    /// How far forward the strike lunge reaches from the anchor
    pub strike_distance: f32,

    /// sin(2 * phase) must exceed this for the strike to count as a hit
    pub strike_peak: f32,

    /// Total displacement away from the target after a non-lethal hit
    pub knockback_distance: f32,

    pub knockback_ms: Millis,
    pub stun_ms: Millis,
    pub cooldown_ms: Millis,

    /// Amplitude of the cosmetic wobble while stunned (no net displacement)
    pub stun_jitter: f32,

    /// Animation phase increment per tick while the agent actually moved
    pub walk_phase_step: f32,

    /// Minimum per-tick displacement that counts as walking
    pub walk_threshold: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 8.0,
            attack_phase_step: 0.15,
            strike_distance: 8.0,
            strike_peak: 0.9,
            knockback_distance: 35.0,
            knockback_ms: 300,
            stun_ms: 1000,
            cooldown_ms: 1000,
            stun_jitter: 2.0,
            walk_phase_step: 0.4,
            walk_threshold: 0.8,
        }
    }
}

/// Collision response tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Bound of the random velocity nudge (per axis) given to colliding agents
    pub velocity_jitter: f32,

    /// Push agents out of the depot and clay pack footprints
    pub block_static_obstacles: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            velocity_jitter: 5.0,
            block_static_obstacles: true,
        }
    }
}

/// Configuration for a colony run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the colony RNG; equal seeds give identical runs
    pub seed: u64,

    pub bounds: WorldBounds,

    // === AGENTS ===
    pub agent_count: usize,
    pub agent_speed: SpeedRange,
    /// Diameter of an agent's circular footprint
    pub agent_size: f32,

    // === RESOURCES ===
    pub resource_count: usize,
    pub resource_size: Footprint,

    // === DEPOT ===
    pub depot_size: Footprint,

    pub harvesting: HarvestingConfig,
    pub spacing: SpacingConfig,
    pub behavior: BehaviorConfig,
    pub collision: CollisionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            bounds: WorldBounds::default(),
            agent_count: 10,
            agent_speed: SpeedRange::default(),
            agent_size: 30.0,
            resource_count: 8,
            resource_size: Footprint::square(45.0),
            depot_size: Footprint::square(120.0),
            harvesting: HarvestingConfig::default(),
            spacing: SpacingConfig::default(),
            behavior: BehaviorConfig::default(),
            collision: CollisionConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        positive("bounds.width", self.bounds.width)?;
        positive("bounds.height", self.bounds.height)?;
        positive("agent_size", self.agent_size)?;
        positive("resource_size.width", self.resource_size.width)?;
        positive("resource_size.height", self.resource_size.height)?;
        positive("depot_size.width", self.depot_size.width)?;
        positive("depot_size.height", self.depot_size.height)?;

        non_negative("agent_speed.min", self.agent_speed.min)?;
        finite("agent_speed.max", self.agent_speed.max)?;
        if self.agent_speed.min > self.agent_speed.max {
            return Err(ConfigError::InvertedSpeedRange {
                min: self.agent_speed.min,
                max: self.agent_speed.max,
            });
        }

        positive("harvesting.attack_range", self.harvesting.attack_range)?;
        positive("harvesting.drop_off_range", self.harvesting.drop_off_range)?;
        if self.harvesting.max_hit_points == 0 {
            return Err(ConfigError::NotPositive { field: "harvesting.max_hit_points", value: 0.0 });
        }
        if self.harvesting.damage_per_hit == 0 {
            return Err(ConfigError::NotPositive { field: "harvesting.damage_per_hit", value: 0.0 });
        }

        if self.spacing.placement_attempts == 0 {
            return Err(ConfigError::NotPositive { field: "spacing.placement_attempts", value: 0.0 });
        }
        finite("spacing.placement_margin", self.spacing.placement_margin)?;

        let b = &self.behavior;
        positive("behavior.attack_phase_step", b.attack_phase_step)?;
        non_negative("behavior.arrival_threshold", b.arrival_threshold)?;
        non_negative("behavior.knockback_distance", b.knockback_distance)?;
        non_negative("behavior.strike_distance", b.strike_distance)?;
        non_negative("behavior.stun_jitter", b.stun_jitter)?;
        non_negative("behavior.walk_threshold", b.walk_threshold)?;
        non_negative("behavior.walk_phase_step", b.walk_phase_step)?;
        finite("behavior.strike_peak", b.strike_peak)?;
        // The strike wave is a sine, so a peak outside (-1, 1) fires never or always
        if b.strike_peak <= -1.0 || b.strike_peak >= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "behavior.strike_peak",
                value: b.strike_peak as f64,
                min: -1.0,
                max: 1.0,
            });
        }

        non_negative("collision.velocity_jitter", self.collision.velocity_jitter)?;

        // Every footprint has to leave room for at least one candidate position
        let largest = [
            self.agent_size,
            self.resource_size.width.max(self.resource_size.height),
            self.depot_size.width.max(self.depot_size.height),
        ]
        .into_iter()
        .fold(0.0f32, f32::max);
        let needed = largest + 2.0 * self.spacing.placement_margin.max(0.0);
        if self.bounds.width <= needed || self.bounds.height <= needed {
            return Err(ConfigError::BoundsTooSmall {
                width: self.bounds.width,
                height: self.bounds.height,
                size: needed,
            });
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value: value as f64 })
    }
}

fn non_negative(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value: value as f64 })
    }
}

fn positive(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value: value as f64 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ColonyError;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_harvest_takes_six_hits() {
        let h = HarvestingConfig::default();
        assert_eq!(h.max_hit_points / h.damage_per_hit, 6);
    }

    #[test]
    fn test_zero_max_hit_points_rejected() {
        let mut config = SimulationConfig::default();
        config.harvesting.max_hit_points = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "harvesting.max_hit_points", .. })
        ));
    }

    #[test]
    fn test_inverted_speed_range_rejected() {
        let mut config = SimulationConfig::default();
        config.agent_speed = SpeedRange { min: 200.0, max: 100.0 };
        assert!(matches!(config.validate(), Err(ConfigError::InvertedSpeedRange { .. })));
    }

    #[test]
    fn test_tiny_world_rejected() {
        let mut config = SimulationConfig::default();
        config.bounds = WorldBounds { width: 100.0, height: 100.0 };
        assert!(matches!(config.validate(), Err(ConfigError::BoundsTooSmall { .. })));
    }

    #[test]
    fn test_nan_size_rejected() {
        let mut config = SimulationConfig::default();
        config.agent_size = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NotFinite { field: "agent_size", .. })));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            seed = 7
            agent_count = 3

            [harvesting]
            max_hit_points = 10
        "#;
        let config = SimulationConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.agent_count, 3);
        assert_eq!(config.harvesting.max_hit_points, 10);
        assert_eq!(config.harvesting.damage_per_hit, 5);
        assert_eq!(config.behavior.knockback_ms, 300);
        assert_eq!(config.resource_size, Footprint::square(45.0));
    }

    #[test]
    fn test_invalid_toml_value_rejected() {
        let toml = r#"
            [harvesting]
            damage_per_hit = 0
        "#;
        let err = SimulationConfig::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ColonyError::InvalidConfig(_)));
    }

    #[test]
    fn test_nan_collision_jitter_rejected() {
        let err = SimulationConfig::from_toml_str("[collision]\nvelocity_jitter = nan\n").unwrap_err();
        assert!(matches!(
            err,
            ColonyError::InvalidConfig(ConfigError::NotFinite { field: "collision.velocity_jitter", .. })
        ));
    }

    #[test]
    fn test_infinite_stun_jitter_rejected() {
        let err = SimulationConfig::from_toml_str("[behavior]\nstun_jitter = inf\n").unwrap_err();
        assert!(matches!(
            err,
            ColonyError::InvalidConfig(ConfigError::NotFinite { field: "behavior.stun_jitter", .. })
        ));
    }

    #[test]
    fn test_negative_distances_rejected() {
        let mut config = SimulationConfig::default();
        config.behavior.knockback_distance = -35.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "behavior.knockback_distance", .. })
        ));

        let mut config = SimulationConfig::default();
        config.behavior.arrival_threshold = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "behavior.arrival_threshold", .. })
        ));
    }

    #[test]
    fn test_strike_peak_must_stay_inside_unit_range() {
        for peak in [1.0, -1.0, 3.0] {
            let mut config = SimulationConfig::default();
            config.behavior.strike_peak = peak;
            assert!(
                matches!(config.validate(), Err(ConfigError::OutOfRange { field: "behavior.strike_peak", .. })),
                "strike_peak {} should be rejected",
                peak
            );
        }

        let mut config = SimulationConfig::default();
        config.behavior.strike_peak = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = SimulationConfig::from_toml_str("agent_count = \"many\"").unwrap_err();
        assert!(matches!(err, ColonyError::ConfigParse(_)));
    }
}
