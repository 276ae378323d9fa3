//! Tower variant: target acquisition and ranged attack.
//!
//! Every tick the tower decays its attack cooldown and rescans for the closest
//! enemy troop in range. It is active while it has a target. When active, not
//! upgrading and off cooldown, it emits a [`FireOrder`]; the battlefield turns
//! the order into a homing [`Projectile`](crate::projectile::Projectile).
//!
//! # Targeting
//!
//! Candidates are troops of another team with at least one soldier, no farther
//! than the attack range. The strictly closest candidate wins. Exact distance
//! ties go to the lowest [`TroopId`], since troops are scanned in id order and
//! a later candidate must be strictly closer to replace the current best.
//!
//! Neutral towers have no allies and fire at every troop in range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BuildingBehavior, BuildingCore, FireOrder, UpdateContext};
use crate::constants::{attack_interval, attack_range};
use crate::ids::TroopId;
use crate::troop::Troop;
use crate::types::{BuildingLevel, Position, Team};

/// Targeting state of a tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerState {
    /// Attack radius, derived from the level.
    attack_range: f32,
    /// Seconds until the tower may fire again.
    attack_cooldown: f32,
    /// Closest enemy troop found by the last scan.
    target: Option<TroopId>,
}

impl TowerState {
    /// Creates the state for a tower at `level`, ready to fire.
    #[must_use]
    pub fn new(level: BuildingLevel) -> Self {
        Self {
            attack_range: attack_range(level),
            attack_cooldown: 0.0,
            target: None,
        }
    }

    /// Attack radius at the current level.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Seconds until the next shot.
    #[must_use]
    pub const fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    /// Target chosen by the last scan.
    #[must_use]
    pub const fn target(&self) -> Option<TroopId> {
        self.target
    }
}

impl BuildingBehavior for TowerState {
    fn on_update(&mut self, core: &BuildingCore, ctx: &UpdateContext<'_>) {
        self.attack_cooldown = (self.attack_cooldown - ctx.dt).max(0.0);
        self.target = acquire_target(core.position(), core.team(), self.attack_range, ctx.troops);
    }

    fn is_active(&self, _core: &BuildingCore) -> bool {
        self.target.is_some()
    }

    fn action(&mut self, core: &mut BuildingCore, _dt: f32) -> Option<FireOrder> {
        if self.attack_cooldown > 0.0 {
            return None;
        }
        let target = self.target?;
        self.attack_cooldown = attack_interval(core.level());
        debug!(team = %core.team(), target = %target, "Tower firing");
        Some(FireOrder { target })
    }

    fn on_conquered(&mut self, core: &BuildingCore) {
        self.attack_range = attack_range(core.level());
        self.attack_cooldown = 0.0;
        self.target = None;
    }

    fn on_upgrade(&mut self, core: &BuildingCore) {
        self.attack_range = attack_range(core.level());
    }
}

/// Finds the closest enemy troop within `range` of `position`.
///
/// Troops of `team` and troops without soldiers are ignored. Ties resolve to
/// the lowest troop id.
#[must_use]
pub fn acquire_target(
    position: Position,
    team: Team,
    range: f32,
    troops: &BTreeMap<TroopId, Troop>,
) -> Option<TroopId> {
    let mut best: Option<(TroopId, f32)> = None;
    for (id, troop) in troops {
        if troop.team() == team || !troop.is_alive() {
            continue;
        }
        let distance = position.distance(troop.position());
        if distance > range {
            continue;
        }
        let closer = match best {
            Some((_, best_distance)) => distance < best_distance,
            None => true,
        };
        if closer {
            best = Some((*id, distance));
        }
    }
    best.map(|(id, _)| id)
}
