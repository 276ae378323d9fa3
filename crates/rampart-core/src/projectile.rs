//! Homing projectiles fired by towers.
//!
//! A projectile starts at its tower's position and steers toward the target
//! troop's *current* position every tick. It hits when the remaining distance
//! after a step is no longer than the step itself, dealing
//! [`PROJECTILE_DAMAGE`]. It fizzles without damage once it has strayed
//! farther than its maximum range from the tower, or when its target is gone.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{PROJECTILE_DAMAGE, PROJECTILE_RANGE_FACTOR, PROJECTILE_SPEED};
use crate::ids::{BuildingId, ProjectileId, TroopId};
use crate::troop::Troop;
use crate::types::{Position, Team};

/// Result of one projectile update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileStatus {
    /// Still flying.
    InFlight,
    /// Reached the target and damaged it.
    Hit,
    /// Out of range or lost its target. No damage was dealt.
    Fizzled,
}

impl ProjectileStatus {
    /// Whether the projectile is done and must be removed.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::InFlight)
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    id: ProjectileId,
    team: Team,
    tower: BuildingId,
    target: TroopId,
    /// The firing tower's fixed position.
    launch: Position,
    position: Position,
    max_distance: f32,
}

impl Projectile {
    /// Launches a projectile from a tower at `launch` with the given attack
    /// range, aimed at `target`.
    #[must_use]
    pub fn launch(
        id: ProjectileId,
        team: Team,
        tower: BuildingId,
        launch: Position,
        attack_range: f32,
        target: TroopId,
    ) -> Self {
        Self {
            id,
            team,
            tower,
            target,
            launch,
            position: launch,
            max_distance: attack_range * PROJECTILE_RANGE_FACTOR,
        }
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Team of the firing tower at launch.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Tower that fired this projectile.
    #[must_use]
    pub const fn tower(&self) -> BuildingId {
        self.tower
    }

    /// Troop this projectile homes on.
    #[must_use]
    pub const fn target(&self) -> TroopId {
        self.target
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Farthest the projectile may stray from its tower.
    #[must_use]
    pub const fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Advances the projectile by `dt` seconds.
    ///
    /// `target` is the troop this projectile homes on, or `None` if it no
    /// longer exists. A target without soldiers counts as gone.
    pub fn update(&mut self, dt: f32, target: Option<&mut Troop>) -> ProjectileStatus {
        let Some(troop) = target.filter(|troop| troop.is_alive()) else {
            trace!(projectile = %self.id, target = %self.target, "Projectile lost its target");
            return ProjectileStatus::Fizzled;
        };

        let aim = troop.position();
        let offset = aim - self.position;
        let distance = offset.length();
        let step = PROJECTILE_SPEED * dt;

        if distance <= 0.0 {
            return self.hit(troop);
        }

        let next = self.position + offset / distance * step;
        if next.distance(aim) <= step {
            return self.hit(troop);
        }
        self.position = next;

        if self.position.distance(self.launch) > self.max_distance {
            trace!(projectile = %self.id, "Projectile out of range");
            return ProjectileStatus::Fizzled;
        }
        ProjectileStatus::InFlight
    }

    fn hit(&mut self, troop: &mut Troop) -> ProjectileStatus {
        self.position = troop.position();
        troop.take_damage(PROJECTILE_DAMAGE);
        trace!(
            projectile = %self.id,
            troop = %troop.id(),
            remaining = troop.soldiers(),
            "Projectile hit"
        );
        ProjectileStatus::Hit
    }
}
