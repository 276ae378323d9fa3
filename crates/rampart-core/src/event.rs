//! Events emitted by the battlefield during a tick.
//!
//! Events are informational: they are produced after the state change they
//! describe has already been applied, and consumers (rendering, logging,
//! replay) never feed them back into the simulation.
//!
//! Within a tick, events are ordered by pass: upgrade completions and shots
//! (building pass), then projectile resolutions (projectile pass), then troop
//! arrivals and destructions.

use serde::{Deserialize, Serialize};

use crate::ids::{BuildingId, ProjectileId, TroopId};
use crate::projectile::ProjectileStatus;
use crate::types::{BuildingLevel, Team, TroopArrivalOutcome};

/// Something that happened on the battlefield during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    /// A troop reached its target alive and resolved combat there.
    TroopArrived {
        /// Troop that arrived
        troop: TroopId,
        /// Building it left from
        from: BuildingId,
        /// Building it arrived at
        to: BuildingId,
        /// Team of the troop
        team: Team,
        /// How the arrival was resolved
        outcome: TroopArrivalOutcome,
    },
    /// A troop lost all its soldiers in transit.
    TroopDestroyed {
        /// Troop that was destroyed
        troop: TroopId,
        /// Team of the troop
        team: Team,
    },
    /// A tower fired a projectile.
    ProjectileFired {
        /// New projectile
        projectile: ProjectileId,
        /// Tower that fired it
        tower: BuildingId,
        /// Troop it is aimed at
        target: TroopId,
    },
    /// A projectile hit its target or fizzled.
    ProjectileResolved {
        /// Projectile that was removed
        projectile: ProjectileId,
        /// `Hit` or `Fizzled`
        status: ProjectileStatus,
    },
    /// A building finished an upgrade.
    UpgradeCompleted {
        /// Upgraded building
        building: BuildingId,
        /// Level reached
        level: BuildingLevel,
    },
}

impl BattleEvent {
    /// Returns `true` for [`BattleEvent::TroopArrived`].
    #[must_use]
    pub const fn is_arrival(&self) -> bool {
        matches!(self, Self::TroopArrived { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let event = BattleEvent::TroopArrived {
            troop: TroopId::new(3),
            from: BuildingId::new(0),
            to: BuildingId::new(1),
            team: Team::Blue,
            outcome: TroopArrivalOutcome::Conquered,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["event"], "troop_arrived");
        assert_eq!(json["troop"], 3);
        assert_eq!(json["outcome"], "conquered");
        assert!(event.is_arrival());
    }

    #[test]
    fn non_arrivals_are_not_arrivals() {
        let event = BattleEvent::TroopDestroyed {
            troop: TroopId::new(1),
            team: Team::Red,
        };
        assert!(!event.is_arrival());
    }
}
