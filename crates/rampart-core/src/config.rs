//! Scenario configuration: the static list of building placements a match
//! starts from.
//!
//! Scenarios are plain JSON:
//!
//! ```json
//! { "buildings": [
//!   { "kind": "barrack", "x": 100, "y": 150, "team": "blue", "initial_soldiers": 50 },
//!   { "kind": "tower", "x": 60, "y": 90, "team": "red", "initial_soldiers": 5, "initial_level": 2 }
//! ] }
//! ```
//!
//! `team` defaults to `neutral` and `initial_soldiers` to 0. Without an
//! explicit `initial_level`, the level follows the starting garrison (see
//! [`level_for_soldiers`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::level_for_soldiers;
use crate::error::ConfigError;
use crate::types::{BuildingKind, BuildingLevel, Position, Team};

/// One building of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    /// Barrack or tower.
    pub kind: BuildingKind,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Starting owner.
    #[serde(default)]
    pub team: Team,
    /// Starting garrison.
    #[serde(default)]
    pub initial_soldiers: u32,
    /// Starting level; derived from the garrison when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_level: Option<BuildingLevel>,
}

impl BuildingPlacement {
    /// A barrack placement without an explicit level.
    #[must_use]
    pub fn barrack(x: f32, y: f32, team: Team, initial_soldiers: u32) -> Self {
        Self {
            kind: BuildingKind::Barrack,
            x,
            y,
            team,
            initial_soldiers,
            initial_level: None,
        }
    }

    /// A tower placement without an explicit level.
    #[must_use]
    pub fn tower(x: f32, y: f32, team: Team, initial_soldiers: u32) -> Self {
        Self {
            kind: BuildingKind::Tower,
            ..Self::barrack(x, y, team, initial_soldiers)
        }
    }

    /// Sets an explicit starting level.
    #[must_use]
    pub const fn with_level(mut self, level: BuildingLevel) -> Self {
        self.initial_level = Some(level);
        self
    }

    /// Placement position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Starting level: the explicit one, or the one implied by the garrison.
    #[must_use]
    pub fn level(&self) -> BuildingLevel {
        self.initial_level
            .unwrap_or_else(|| level_for_soldiers(self.initial_soldiers))
    }
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Buildings in creation order. Building ids follow this order.
    pub buildings: Vec<BuildingPlacement>,
}

impl Default for ScenarioConfig {
    /// The skirmish map: four barracks (neutral, blue, red, green) and a
    /// neutral tower guarding the blue base.
    fn default() -> Self {
        Self {
            buildings: vec![
                BuildingPlacement::barrack(50.0, 200.0, Team::Neutral, 5),
                BuildingPlacement::barrack(100.0, 150.0, Team::Blue, 50),
                BuildingPlacement::barrack(30.0, 50.0, Team::Red, 5),
                BuildingPlacement::barrack(170.0, 30.0, Team::Green, 2),
                BuildingPlacement::tower(110.0, 90.0, Team::Neutral, 3),
            ],
        }
    }
}

impl ScenarioConfig {
    /// Parses and validates a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or out-of-range
    /// levels, and [`ConfigError::NonFinitePosition`] for invalid coordinates.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ScenarioConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every placement.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinitePosition`] for the first placement
    /// whose coordinates are NaN or infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, placement) in self.buildings.iter().enumerate() {
            if !placement.position().is_finite() {
                return Err(ConfigError::NonFinitePosition { index });
            }
        }
        Ok(())
    }

    /// Serializes the scenario as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
