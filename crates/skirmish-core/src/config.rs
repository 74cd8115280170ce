//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `skirmish-config.yaml` at the
//! project root. This module defines strongly-typed structs mirroring
//! the YAML structure, with per-field defaults so a missing file (or a
//! partial one) always yields a runnable simulation. Agent parameter
//! keys also accept the camelCase aliases used by the dashboard client.

use std::path::Path;

use serde::{Deserialize, Serialize};

use skirmish_agents::awareness::ZoneSet;
use skirmish_agents::Agent;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (seed, timing, arena extent).
    #[serde(default)]
    pub world: WorldSettings,

    /// Per-agent tunables and zone ranges.
    #[serde(default)]
    pub parameters: AgentParameters,

    /// Observer server settings.
    #[serde(default)]
    pub observer: ObserverSettings,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Arena bounds as `[min_x, min_y, max_x, max_y]`.
    #[serde(default = "default_bounds")]
    pub bounds: [f64; 4],

    /// Number of random walls the generator aims to place.
    #[serde(default = "default_num_walls")]
    pub num_walls: usize,

    /// Agents spawned per team at startup and on reset.
    #[serde(default = "default_agents_per_team")]
    pub agents_per_team: u32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            bounds: default_bounds(),
            num_walls: default_num_walls(),
            agents_per_team: default_agents_per_team(),
        }
    }
}

/// Per-agent tunables and awareness zone ranges.
///
/// Field names accept both snake_case (YAML config) and the camelCase
/// keys the dashboard sends with `load_config` commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentParameters {
    /// Maximum health applied to agents.
    #[serde(default = "default_base_health", alias = "baseHealth")]
    pub base_health: f64,

    /// Attack damage applied to agents.
    #[serde(default = "default_base_damage", alias = "baseDamage")]
    pub base_damage: f64,

    /// Maximum speed applied to agents.
    #[serde(default = "default_base_speed", alias = "baseSpeed")]
    pub base_speed: f64,

    /// Turn-rate parameter applied to agents.
    #[serde(default = "default_turn_speed", alias = "turnSpeed")]
    pub turn_speed: f64,

    /// Visual zone range.
    #[serde(default = "default_visual_range", alias = "visualRange")]
    pub visual_range: f64,

    /// Recognition zone range.
    #[serde(default = "default_recognition_range", alias = "recognitionRange")]
    pub recognition_range: f64,

    /// Combat zone range.
    #[serde(default = "default_combat_range", alias = "combatRange")]
    pub combat_range: f64,
}

impl Default for AgentParameters {
    fn default() -> Self {
        Self {
            base_health: default_base_health(),
            base_damage: default_base_damage(),
            base_speed: default_base_speed(),
            turn_speed: default_turn_speed(),
            visual_range: default_visual_range(),
            recognition_range: default_recognition_range(),
            combat_range: default_combat_range(),
        }
    }
}

impl AgentParameters {
    /// Apply the tunables to one agent, clamping health to the new
    /// maximum.
    pub fn apply_to_agent(&self, agent: &mut Agent) {
        agent.combat.max_health = self.base_health;
        agent.combat.health = agent.combat.health.min(self.base_health);
        agent.combat.attack_damage = self.base_damage;
        agent.movement.max_speed = self.base_speed;
        agent.movement.turn_speed = self.turn_speed;
    }

    /// Build the awareness zone set described by the range parameters.
    pub fn zone_set(&self) -> ZoneSet {
        ZoneSet::with_ranges(self.visual_range, self.recognition_range, self.combat_range)
    }
}

/// Observer server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverSettings {
    /// The TCP port the observer API listens on.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            port: default_observer_port(),
        }
    }
}

fn default_world_name() -> String {
    String::from("skirmish")
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_bounds() -> [f64; 4] {
    [0.0, 0.0, 800.0, 600.0]
}

const fn default_num_walls() -> usize {
    5
}

const fn default_agents_per_team() -> u32 {
    5
}

const fn default_base_health() -> f64 {
    100.0
}

const fn default_base_damage() -> f64 {
    10.0
}

const fn default_base_speed() -> f64 {
    5.0
}

const fn default_turn_speed() -> f64 {
    0.1
}

const fn default_visual_range() -> f64 {
    150.0
}

const fn default_recognition_range() -> f64 {
    100.0
}

const fn default_combat_range() -> f64 {
    30.0
}

const fn default_observer_port() -> u16 {
    8000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use skirmish_types::{Team, Vec2, ZoneKind};

    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config.world.tick_interval_ms, 16);
        assert_eq!(config.world.bounds, [0.0, 0.0, 800.0, 600.0]);
        assert_eq!(config.parameters.visual_range, 150.0);
        assert_eq!(config.observer.port, 8000);
    }

    #[test]
    fn partial_yaml_overrides_selected_fields() {
        let yaml = r"
world:
  seed: 7
  num_walls: 9
parameters:
  base_health: 250.0
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.num_walls, 9);
        assert_eq!(config.parameters.base_health, 250.0);
        // Untouched fields keep defaults.
        assert_eq!(config.parameters.combat_range, 30.0);
    }

    #[test]
    fn camel_case_aliases_are_accepted() {
        let json = serde_json::json!({
            "baseHealth": 120.0,
            "baseDamage": 15.0,
            "visualRange": 200.0
        });
        let params: AgentParameters = serde_json::from_value(json).unwrap();
        assert_eq!(params.base_health, 120.0);
        assert_eq!(params.base_damage, 15.0);
        assert_eq!(params.visual_range, 200.0);
        assert_eq!(params.recognition_range, 100.0);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(SimulationConfig::parse("world: [not a map").is_err());
    }

    #[test]
    fn apply_to_agent_clamps_health() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut agent = Agent::spawn(Team::Red, Vec2::ZERO, 0.0, &mut rng);
        agent.combat.health = 100.0;

        let params = AgentParameters {
            base_health: 60.0,
            ..AgentParameters::default()
        };
        params.apply_to_agent(&mut agent);

        assert_eq!(agent.combat.max_health, 60.0);
        assert_eq!(agent.combat.health, 60.0);
        assert_eq!(agent.combat.attack_damage, params.base_damage);
        assert_eq!(agent.movement.max_speed, params.base_speed);
    }

    #[test]
    fn zone_set_reflects_ranges() {
        let params = AgentParameters {
            visual_range: 300.0,
            recognition_range: 200.0,
            combat_range: 50.0,
            ..AgentParameters::default()
        };
        let zones = params.zone_set();
        assert_eq!(zones.get(ZoneKind::Visual).unwrap().range, 300.0);
        assert_eq!(zones.get(ZoneKind::Recognition).unwrap().range, 200.0);
        assert_eq!(zones.get(ZoneKind::Combat).unwrap().range, 50.0);
    }
}
