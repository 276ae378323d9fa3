//! Plain value types shared by every simulation module.
//!
//! - [`Position`]: world coordinates (a `glam::Vec2`)
//! - [`Team`]: faction identifier, with [`Team::Neutral`] for unclaimed buildings
//! - [`BuildingLevel`]: upgrade tier, 0 through 3
//! - [`BuildingKind`]: the immutable type tag of a building
//! - [`TroopArrivalOutcome`]: how a troop arrival was resolved

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// World position. Buildings keep theirs fixed for their whole lifetime.
pub type Position = glam::Vec2;

// =============================================================================
// Team
// =============================================================================

/// Faction identifier.
///
/// `Neutral` marks unclaimed buildings. Neutral buildings are never selectable,
/// never produce soldiers and never upgrade. A player is never neutral.
///
/// The ordering is used as the deterministic key order of per-team tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Red faction.
    Red,
    /// Blue faction.
    Blue,
    /// Green faction.
    Green,
    /// Magenta faction.
    Magenta,
    /// Unclaimed.
    #[default]
    Neutral,
}

impl Team {
    /// All playable (non-neutral) teams.
    pub const PLAYABLE: [Team; 4] = [Team::Red, Team::Blue, Team::Green, Team::Magenta];

    /// Returns `true` for [`Team::Neutral`].
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Green => write!(f, "green"),
            Self::Magenta => write!(f, "magenta"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

// =============================================================================
// BuildingLevel
// =============================================================================

/// Upgrade tier of a building, 0 through 3.
///
/// Level 3 is terminal. The level indexes every per-level tuning table in
/// [`crate::constants`].
///
/// # Example
///
/// ```
/// use rampart_core::types::BuildingLevel;
///
/// let level = BuildingLevel::try_from(2).unwrap();
/// assert_eq!(level.next(), Some(BuildingLevel::MAX));
/// assert_eq!(BuildingLevel::MAX.next(), None);
/// assert!(BuildingLevel::try_from(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BuildingLevel(u8);

impl BuildingLevel {
    /// Level 0, the level of every freshly conquered building.
    pub const MIN: Self = Self(0);
    /// Level 3, the terminal level.
    pub const MAX: Self = Self(3);

    /// Returns the raw level value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the level as an index into the per-level tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` at level 3.
    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 >= Self::MAX.0
    }

    /// Returns the following level, or `None` at level 3.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.is_max() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<u8> for BuildingLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidLevel(value))
        }
    }
}

impl From<BuildingLevel> for u8 {
    fn from(level: BuildingLevel) -> Self {
        level.0
    }
}

impl fmt::Display for BuildingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// BuildingKind
// =============================================================================

/// Immutable type tag of a building.
///
/// The tag always matches the building's
/// [`BuildingVariant`](crate::building::BuildingVariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    /// Produces soldiers over time.
    Barrack,
    /// Shoots projectiles at enemy troops in range.
    Tower,
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Barrack => write!(f, "barrack"),
            Self::Tower => write!(f, "tower"),
        }
    }
}

// =============================================================================
// TroopArrivalOutcome
// =============================================================================

/// Result of a troop arriving at a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TroopArrivalOutcome {
    /// Same team: soldiers were added to the garrison.
    Reinforced,
    /// Enemy attack did not exceed the garrison.
    Defended,
    /// Enemy attack exceeded the garrison and took the building.
    Conquered,
}

impl fmt::Display for TroopArrivalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reinforced => write!(f, "reinforced"),
            Self::Defended => write!(f, "defended"),
            Self::Conquered => write!(f, "conquered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_is_default_team() {
        assert_eq!(Team::default(), Team::Neutral);
        assert!(Team::Neutral.is_neutral());
        assert!(Team::PLAYABLE.iter().all(|team| !team.is_neutral()));
    }

    #[test]
    fn team_serializes_lowercase() {
        let json = serde_json::to_string(&Team::Magenta).unwrap();
        assert_eq!(json, "\"magenta\"");
        let team: Team = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(team, Team::Blue);
    }

    #[test]
    fn level_walks_up_to_three() {
        let mut level = BuildingLevel::MIN;
        let mut seen = vec![level.get()];
        while let Some(next) = level.next() {
            level = next;
            seen.push(level.get());
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(level.is_max());
    }

    #[test]
    fn level_rejects_out_of_range() {
        assert!(matches!(
            BuildingLevel::try_from(7),
            Err(ConfigError::InvalidLevel(7))
        ));
        assert!(serde_json::from_str::<BuildingLevel>("4").is_err());
        let level: BuildingLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level.index(), 2);
    }
}
