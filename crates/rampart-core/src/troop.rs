//! Soldiers in transit between two buildings.
//!
//! A [`Troop`] is created by a send-troops command. Its soldiers leave the
//! origin garrison immediately. It walks a straight line to the target at a
//! speed fixed by the origin's level at dispatch, and resolves combat against
//! the target when the transit time has elapsed.
//!
//! Troops hold building *ids* plus the endpoint positions captured at
//! dispatch. Buildings never move and are never destroyed, so both stay valid
//! for the troop's whole life.
//!
//! # Example
//!
//! ```
//! use rampart_core::building::Building;
//! use rampart_core::ids::{BuildingId, TroopId};
//! use rampart_core::troop::{Troop, TroopStatus};
//! use rampart_core::types::{BuildingLevel, Position, Team, TroopArrivalOutcome};
//!
//! let mut origin = Building::barrack(
//!     BuildingId::new(0), Position::ZERO, Team::Blue, 20, BuildingLevel::MIN,
//! );
//! let mut target = Building::barrack(
//!     BuildingId::new(1), Position::new(60.0, 0.0), Team::Neutral, 2, BuildingLevel::MIN,
//! );
//!
//! let mut troop = Troop::dispatch(
//!     TroopId::new(0), &mut origin, (target.id(), target.position()), 5,
//! );
//! assert_eq!(origin.soldier_count(), 15);
//!
//! // 60 units at level-0 speed (60 units/s): one second of transit.
//! assert_eq!(troop.update(0.5, &mut target), TroopStatus::InTransit);
//! assert_eq!(
//!     troop.update(0.5, &mut target),
//!     TroopStatus::Arrived(TroopArrivalOutcome::Conquered)
//! );
//! assert_eq!(target.team(), Team::Blue);
//! assert_eq!(target.soldier_count(), 3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::building::Building;
use crate::constants::troop_speed;
use crate::ids::{BuildingId, TroopId};
use crate::types::{Position, Team, TroopArrivalOutcome};

/// Result of one troop update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TroopStatus {
    /// Still walking.
    InTransit,
    /// Reached the target and resolved combat there.
    Arrived(TroopArrivalOutcome),
    /// All soldiers were killed before arrival. The target was not touched.
    Destroyed,
}

/// A group of soldiers walking from one building to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troop {
    id: TroopId,
    team: Team,
    soldiers: u32,
    origin: BuildingId,
    target: BuildingId,
    from: Position,
    to: Position,
    position: Position,
    /// Seconds needed to cover the whole path.
    total_time: f32,
    /// Seconds walked so far.
    elapsed: f32,
}

impl Troop {
    /// Creates a troop at `origin`'s position, heading for `target` at
    /// `speed` units per second.
    ///
    /// This does not touch any garrison; see [`Troop::dispatch`].
    ///
    /// # Panics
    ///
    /// Panics if `speed` is not strictly positive.
    #[must_use]
    pub fn new(
        id: TroopId,
        team: Team,
        soldiers: u32,
        origin: (BuildingId, Position),
        target: (BuildingId, Position),
        speed: f32,
    ) -> Self {
        assert!(speed > 0.0, "troop speed must be positive, got {speed}");
        let (origin, from) = origin;
        let (target, to) = target;
        Self {
            id,
            team,
            soldiers,
            origin,
            target,
            from,
            to,
            position: from,
            total_time: from.distance(to) / speed,
            elapsed: 0.0,
        }
    }

    /// Sends `soldiers` from `origin` towards `target`.
    ///
    /// The soldiers are debited from the origin right away (saturating, so the
    /// troop never carries more than the origin had). The troop belongs to the
    /// origin's team and walks at the speed of the origin's current level.
    #[must_use]
    pub fn dispatch(
        id: TroopId,
        origin: &mut Building,
        target: (BuildingId, Position),
        soldiers: u32,
    ) -> Self {
        let soldiers = origin.debit_soldiers(soldiers);
        let troop = Self::new(
            id,
            origin.team(),
            soldiers,
            (origin.id(), origin.position()),
            target,
            troop_speed(origin.level()),
        );
        debug!(
            troop = %id,
            team = %troop.team,
            from = %troop.origin,
            to = %troop.target,
            soldiers,
            eta = troop.total_time,
            "Troop dispatched"
        );
        troop
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> TroopId {
        self.id
    }

    /// Owning team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Soldiers still alive in this troop.
    #[must_use]
    pub const fn soldiers(&self) -> u32 {
        self.soldiers
    }

    /// Whether any soldier is left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.soldiers > 0
    }

    /// Building the troop left from.
    #[must_use]
    pub const fn origin(&self) -> BuildingId {
        self.origin
    }

    /// Building the troop is heading for.
    #[must_use]
    pub const fn target(&self) -> BuildingId {
        self.target
    }

    /// Current interpolated position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Seconds needed for the whole trip.
    #[must_use]
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Seconds walked so far.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the trip completed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total_time <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.total_time).min(1.0)
        }
    }

    /// Removes up to `amount` soldiers.
    pub fn take_damage(&mut self, amount: u32) {
        self.soldiers = self.soldiers.saturating_sub(amount);
    }

    /// Advances the troop by `dt` seconds.
    ///
    /// `target` must be the building this troop is heading for. On arrival the
    /// troop delivers its soldiers to it and reports the combat outcome. A
    /// troop with no soldiers left reports [`TroopStatus::Destroyed`] and never
    /// touches the target.
    pub fn update(&mut self, dt: f32, target: &mut Building) -> TroopStatus {
        debug_assert_eq!(target.id(), self.target, "troop updated against the wrong building");

        if !self.is_alive() {
            return TroopStatus::Destroyed;
        }

        self.elapsed += dt;
        if self.elapsed >= self.total_time {
            self.position = self.to;
            let outcome = target.on_troop_arrival(self.team, self.soldiers);
            return TroopStatus::Arrived(outcome);
        }

        self.position = self.from.lerp(self.to, self.elapsed / self.total_time);
        TroopStatus::InTransit
    }
}
